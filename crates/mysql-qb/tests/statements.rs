use mysql_qb::prelude::*;
use mysql_qb::qb::{Comparator, Operand};

fn col(name: &str) -> Column {
    Column::new(name).unwrap()
}

#[test]
fn default_select_over_one_table() {
    let mut q = qb::select("test").unwrap();
    assert_eq!(q.sql().unwrap(), "SELECT `t0`.* FROM `test` AS `t0`");
    assert_eq!(q.show_tables(), vec!["test"]);
}

#[test]
fn where_with_limit_and_offset() {
    let mut q = qb::select("test").unwrap();
    q.set_where(Some(Comparison::eq(col("somefield"), 35).unwrap().into()))
        .unwrap()
        .set_limit(10, 2);

    assert_eq!(
        q.sql().unwrap(),
        "SELECT `t0`.* FROM `test` AS `t0` WHERE `t0`.`somefield` = :p1 LIMIT 10 OFFSET 2"
    );
    let params: Vec<(&str, &Value)> = q.parameters().unwrap().iter().collect();
    assert_eq!(params, vec![(":p1", &Value::Int(35))]);
}

#[test]
fn nested_boolean_tree() {
    let tree = Predicate::or(vec![
        Predicate::and(vec![
            Comparison::eq(col("a"), 1).unwrap().into(),
            Comparison::gt(col("b"), 2).unwrap().into(),
        ])
        .unwrap(),
        Predicate::not(Comparison::is_null(col("c")).unwrap()),
    ])
    .unwrap();

    let mut q = qb::select("test").unwrap();
    q.set_where(Some(tree)).unwrap();
    assert_eq!(
        q.sql().unwrap(),
        "SELECT `t0`.* FROM `test` AS `t0` WHERE ((`t0`.`a` = :p1 AND `t0`.`b` > :p2) \
         OR NOT (`t0`.`c` IS NULL))"
    );
    assert_eq!(q.parameters().unwrap().len(), 2);
}

#[test]
fn aliases_are_reused_by_group_and_order() {
    let c = Aggregate::new(AggregateFn::Count, col("user"))
        .unwrap()
        .distinct(true)
        .with_alias("c")
        .unwrap();
    let url = col("very_long_identifier").with_alias("url").unwrap();

    let mut q = qb::select("test").unwrap();
    q.set_select(vec![c.clone().into(), url.clone().into()], false)
        .unwrap()
        .set_group_by(vec![c.into()])
        .unwrap()
        .set_order_by(vec![url.into()], &[])
        .unwrap();

    assert_eq!(
        q.sql().unwrap(),
        "SELECT COUNT(DISTINCT `t0`.`user`) AS `c`, `t0`.`very_long_identifier` AS `url` \
         FROM `test` AS `t0` GROUP BY `c` ORDER BY `url` ASC"
    );
}

#[test]
fn insert_renders_columns_in_order() {
    let mut q = qb::insert("test").unwrap();
    q.with_field("foo", "bar").unwrap();
    assert_eq!(q.sql().unwrap(), "INSERT INTO `test` (`foo`) VALUES (:p1)");
    assert_eq!(
        q.parameters().unwrap().get(":p1"),
        Some(&Value::Text("bar".to_string()))
    );
}

#[test]
fn update_on_multiple_tables() {
    let mut q = qb::update(["orders", "customers"]).unwrap();
    q.set(col("status"), SetValue::value("vip"))
        .unwrap()
        .set_where(Some(
            Predicate::and(vec![
                Comparison::new(
                    Comparator::Eq,
                    col("customer_id"),
                    Some(Operand::from(Column::of("id", 1).unwrap())),
                )
                .unwrap()
                .into(),
                Comparison::gte(Column::of("score", 1).unwrap(), 90).unwrap().into(),
            ])
            .unwrap(),
        ))
        .unwrap();

    assert_eq!(
        q.sql().unwrap(),
        "UPDATE `orders` AS `t0`, `customers` AS `t1` SET `t0`.`status` = :p1 \
         WHERE (`t0`.`customer_id` = `t1`.`id` AND `t1`.`score` >= :p2)"
    );
}

#[test]
fn delete_single_and_multi_table() {
    let mut single = qb::delete("test").unwrap();
    single
        .set_where(Some(Comparison::lt(col("age"), 18).unwrap().into()))
        .unwrap()
        .set_limit(100)
        .unwrap();
    assert_eq!(
        single.sql().unwrap(),
        "DELETE FROM `test` WHERE `test`.`age` < :p1 LIMIT 100"
    );

    let mut multi = qb::delete(["a", "b"]).unwrap();
    multi
        .set_where(Some(
            Comparison::new(
                Comparator::Eq,
                col("id"),
                Some(Column::of("a_id", 1).unwrap().into()),
            )
            .unwrap()
            .into(),
        ))
        .unwrap();
    assert_eq!(
        multi.sql().unwrap(),
        "DELETE FROM `t0` USING `a` AS `t0`, `b` AS `t1` WHERE `t0`.`id` = `t1`.`a_id`"
    );
}

#[test]
fn in_list_is_parameter_bound() {
    let mut q = qb::select("test").unwrap();
    q.set_where(Some(Comparison::in_list(col("id"), [1, 2, 3]).unwrap().into()))
        .unwrap();
    assert_eq!(
        q.sql().unwrap(),
        "SELECT `t0`.* FROM `test` AS `t0` WHERE `t0`.`id` IN (:p1, :p2, :p3)"
    );

    assert!(Comparison::in_list(col("id"), ["1; DROP TABLE test"]).is_err());
    assert!(Comparison::in_list(col("id"), Vec::<i64>::new()).is_err());
}

#[test]
fn null_comparisons() {
    let mut q = qb::select("test").unwrap();
    q.set_where(Some(
        Predicate::and(vec![
            Comparison::eq(col("a"), Value::Null).unwrap().into(),
            Comparison::ne(col("b"), None::<i64>).unwrap().into(),
        ])
        .unwrap(),
    ))
    .unwrap();
    assert_eq!(
        q.sql().unwrap(),
        "SELECT `t0`.* FROM `test` AS `t0` WHERE (`t0`.`a` IS NULL AND `t0`.`b` IS NOT NULL)"
    );
    assert!(q.parameters().unwrap().is_empty());

    assert!(Comparison::gt(col("a"), Value::Null).is_err());
}

#[test]
fn comparator_names_are_case_insensitive() {
    let c = Comparison::parse("LIKE", col("name"), Some(Operand::value("a%"))).unwrap();
    assert_eq!(c.comparator(), Comparator::Like);
    assert!(Comparison::parse("regexp", col("name"), Some(Operand::value("x"))).is_err());
}

#[test]
fn render_is_deterministic_across_statements() {
    let pred: Predicate = Comparison::find_in_set(col("tags"), "red").unwrap().into();

    let mut a = qb::select("items").unwrap();
    let mut b = qb::select("items").unwrap();
    a.set_where(Some(pred.clone())).unwrap();
    b.set_where(Some(pred)).unwrap();

    assert_eq!(a.sql().unwrap(), b.sql().unwrap().to_string());
    assert_eq!(
        a.sql().unwrap(),
        "SELECT `t0`.* FROM `items` AS `t0` WHERE FIND_IN_SET(:p1, `t0`.`tags`)"
    );
    assert_eq!(a.parameters().unwrap(), b.parameters().unwrap());
}

#[test]
fn parameters_require_a_fresh_render() {
    let mut q = qb::update("test").unwrap();
    q.with_field("a", 1).unwrap();
    assert!(q.parameters().unwrap_err().is_state());

    q.sql().unwrap();
    assert!(q.parameters().is_ok());

    q.with_field("b", 2).unwrap();
    assert!(q.parameters().is_err());
}

#[test]
fn cross_schema_select() {
    let mut q = qb::select(vec![
        TableRef::qualified("shop", "orders").unwrap(),
        TableRef::qualified("crm", "customers").unwrap(),
    ])
    .unwrap();
    q.set_select(
        vec![
            Wildcard::new(0).into(),
            Column::of("name", 1).unwrap().with_alias("customer").unwrap().into(),
        ],
        false,
    )
    .unwrap();
    assert_eq!(
        q.sql().unwrap(),
        "SELECT `t0`.*, `t1`.`name` AS `customer` FROM `shop`.`orders` AS `t0`, \
         `crm`.`customers` AS `t1`"
    );
}

#[test]
fn insert_on_duplicate_key_update() {
    let mut q = qb::insert("counters").unwrap();
    q.set_values([("id", Value::Int(1)), ("hits", Value::Int(1))])
        .unwrap()
        .set_on_duplicate_key(Some(OnDuplicateKey::update_except("id").unwrap()));
    assert_eq!(
        q.sql().unwrap(),
        "INSERT INTO `counters` (`id`, `hits`) VALUES (:p1, :p2) \
         ON DUPLICATE KEY UPDATE `hits` = VALUES(`hits`)"
    );
}

#[test]
fn date_functions_in_where() {
    let year = FunctionCall::named("year", vec![col("created").into()]).unwrap();
    let mut q = qb::select("events").unwrap();
    q.set_where(Some(Comparison::eq(year, 2024).unwrap().into()))
        .unwrap();
    assert_eq!(
        q.sql().unwrap(),
        "SELECT `t0`.* FROM `events` AS `t0` WHERE YEAR(`t0`.`created`) = :p1"
    );
    assert!(FunctionCall::named("sleep", vec![]).is_err());
}

#[test]
fn parameters_serialize_as_named_map() {
    let mut q = qb::insert("test").unwrap();
    q.with_field("n", 35).unwrap();
    q.sql().unwrap();
    let json = serde_json::to_value(q.parameters().unwrap()).unwrap();
    assert_eq!(json, serde_json::json!({ ":p1": { "Int": 35 } }));
}

#[test]
fn identifiers_are_escaped() {
    let mut q = qb::select("we`ird").unwrap();
    q.set_select(vec![col("a`b").into()], false).unwrap();
    assert_eq!(
        q.sql().unwrap(),
        "SELECT `t0`.`a``b` FROM `we``ird` AS `t0`"
    );
}

#[test]
fn nested_and_or_not_numbering() {
    let tree = Predicate::and(vec![
        Comparison::gt(col("id"), 12).unwrap().into(),
        Predicate::or(vec![
            Comparison::eq(col("status"), "demolished").unwrap().into(),
            Predicate::not(Comparison::lt(col("age"), 5).unwrap()),
        ])
        .unwrap(),
    ])
    .unwrap();

    let mut q = qb::select("test").unwrap();
    q.set_where(Some(tree)).unwrap();
    assert_eq!(
        q.sql().unwrap(),
        "SELECT `t0`.* FROM `test` AS `t0` WHERE (`t0`.`id` > :p1 AND \
         (`t0`.`status` = :p2 OR NOT (`t0`.`age` < :p3)))"
    );
    let values: Vec<&Value> = q.parameters().unwrap().values().collect();
    assert_eq!(
        values,
        vec![&Value::Int(12), &Value::from("demolished"), &Value::Int(5)]
    );
}

#[test]
fn insert_parameters_follow_field_order() {
    let mut q = qb::insert("test").unwrap();
    q.with_field("field1", "value1")
        .unwrap()
        .with_field("field2", "value2")
        .unwrap();
    assert_eq!(
        q.sql().unwrap(),
        "INSERT INTO `test` (`field1`, `field2`) VALUES (:p1, :p2)"
    );
    let params: Vec<(&str, &Value)> = q.parameters().unwrap().iter().collect();
    assert_eq!(
        params,
        vec![
            (":p1", &Value::from("value1")),
            (":p2", &Value::from("value2")),
        ]
    );
}

#[test]
fn delete_selected_targets() {
    let mut q = qb::delete(["test", "test2", "test3"]).unwrap();
    q.set_targets(vec![0, 2]).unwrap();
    assert_eq!(
        q.sql().unwrap(),
        "DELETE FROM `t0`, `t2` USING `test` AS `t0`, `test2` AS `t1`, `test3` AS `t2`"
    );
    assert!(q.parameters().unwrap().is_empty());
}

#[test]
fn multi_table_update_rejects_limit() {
    let mut q = qb::update(["test", "test2", "test3"]).unwrap();
    let err = q.set_limit(10).unwrap_err();
    assert!(err.is_state());
    assert!(matches!(err, QbError::State(_)));
}

#[test]
fn wildcard_only_allowed_in_select_list() {
    let star = || Expression::from(Wildcard::new(0));

    assert!(Aggregate::new(AggregateFn::Sum, star()).is_err());
    assert!(FunctionCall::new(SqlFunction::Date, vec![star().into()]).is_err());
    assert!(Comparison::new(Comparator::Eq, col("a"), Some(star().into())).is_err());

    let mut q = qb::update("t").unwrap();
    assert!(q.set(col("a"), star()).unwrap_err().is_configuration());

    let mut count = qb::select("t").unwrap();
    count.set_select(vec![Aggregate::count_all().into()], false).unwrap();
    assert_eq!(count.sql().unwrap(), "SELECT COUNT(*) FROM `t` AS `t0`");
}
