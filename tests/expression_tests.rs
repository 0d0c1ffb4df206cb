use aws_sdk_dynamodb::types::AttributeValue;
use dynamo_query::{Filter, Request, SortKeyCondition, Value};
use std::collections::HashSet;

fn placeholders(expression: &str, sigil: char) -> Vec<String> {
    expression
        .split(|c: char| c.is_whitespace() || c == '(' || c == ')' || c == ',')
        .filter(|token| token.starts_with(sigil))
        .map(str::to_string)
        .collect()
}

#[test]
fn test_every_placeholder_is_registered_and_unique() {
    let request = Request::query("customers")
        .partition_key("PK", "CUSTOMER#1")
        .sort_key("SK", &SortKeyCondition::between("ORDER#2024", "ORDER#2025"))
        .filter(&Filter::and([
            Filter::or([Filter::eq("status", "open"), Filter::eq("status", "paid")]),
            Filter::not([Filter::between("total", 10, 20), Filter::is_in("total", [1, 2, 3])]),
        ]))
        .filter(&Filter::begins_with("status", "o"))
        .select(["status", "total"]);

    let key_condition = request.key_condition().unwrap();
    let filter = request.filter_expression().unwrap();
    let projection = request.projection_expression().unwrap();

    let mut values = placeholders(key_condition, ':');
    values.extend(placeholders(filter, ':'));
    let distinct: HashSet<_> = values.iter().cloned().collect();
    assert_eq!(distinct.len(), values.len(), "value placeholder reused");
    assert_eq!(values.len(), request.registry().values().len());
    for value in &values {
        assert!(request.registry().values().contains_key(value), "{value}");
    }

    let mut names = placeholders(filter, '#');
    names.extend(placeholders(projection, '#'));
    for name in &names {
        assert!(request.registry().names().contains_key(name), "{name}");
    }
}

#[test]
fn test_partition_and_filter_on_same_attribute_do_not_collide() {
    let request = Request::query("customers")
        .partition_key("PK", "CUSTOMER#1")
        .filter(&Filter::neq("PK", "CUSTOMER#2"));

    assert_eq!(request.key_condition(), Some("PK = :PK"));
    assert_eq!(request.filter_expression(), Some("#PK <> :PK_1"));
    assert_eq!(
        request.registry().values()[":PK"],
        AttributeValue::S("CUSTOMER#1".into())
    );
}

#[test]
fn test_deep_single_child_nesting_collapses() {
    let mut filter = Filter::eq("Name", "Jane");
    for depth in 0..10 {
        filter = match depth % 3 {
            0 => Filter::and([filter]),
            1 => Filter::or([filter]),
            _ => Filter::not([filter]),
        };
    }

    let request = Request::scan("customers").filter(&filter);
    assert_eq!(request.filter_expression(), Some("#Name = :Name"));
}

#[test]
fn test_nested_grouping_alongside_plain_fragments() {
    let request = Request::scan("customers")
        .filter(&Filter::eq("Name", "Jane"))
        .filter(&Filter::or([
            Filter::and([Filter::gt("Age", 30), Filter::lt("Age", 40)]),
            Filter::eq("Vip", true),
        ]))
        .filter(&Filter::and([Filter::neq("Name", "John")]));

    assert_eq!(
        request.filter_expression(),
        Some("#Name = :Name AND ((#Age > :Age AND #Age < :Age_1) OR #Vip = :Vip) AND #Name <> :Name_1")
    );
    assert_eq!(
        request.registry().values()[":Vip"],
        AttributeValue::Bool(true)
    );
}

#[test]
fn test_structured_operand_encodes_through_serde() {
    #[derive(Debug, serde::Serialize)]
    struct Range {
        from: u32,
        to: u32,
    }

    let request = Request::scan("customers").filter(&Filter::eq(
        "Window",
        Value::encode(&Range { from: 1, to: 2 }),
    ));

    assert!(matches!(
        request.registry().values()[":Window"],
        AttributeValue::M(_)
    ));
}

#[test]
fn test_composition_is_replayable() {
    let filter = Filter::or([Filter::eq("Name", "a"), Filter::eq("Name", "b")]);

    let once = Request::scan("customers").filter(&filter);
    let twice = Request::scan("customers").filter(&filter).filter(&filter);

    assert_eq!(
        once.filter_expression(),
        Some("(#Name = :Name OR #Name = :Name_1)")
    );
    assert_eq!(
        twice.filter_expression(),
        Some("(#Name = :Name OR #Name = :Name_1) AND (#Name = :Name_2 OR #Name = :Name_3)")
    );
}
