//! End-to-end tests for the search pipeline.

use fieldgate::{
    search, Direction, ErrorKind, FieldRegistry, Operator, SearchError, SearchExt, SearchRequest,
    SearchResult,
};
use rust_decimal::Decimal;
use serde_json::json;

// ============================================================================
// Fixtures
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
struct Product {
    name: String,
    category: String,
    price: Decimal,
    is_active: bool,
    discontinued_on: Option<String>,
    supplier_notes: String,
}

fn product(name: &str, category: &str, cents: i64, is_active: bool) -> Product {
    Product {
        name: name.to_string(),
        category: category.to_string(),
        price: Decimal::new(cents, 2),
        is_active,
        discontinued_on: None,
        supplier_notes: format!("{name} supplier"),
    }
}

fn products() -> Vec<Product> {
    vec![
        product("Apple", "Fruit", 150, true),
        product("Banana", "Fruit", 75, true),
        product("Carrot", "Vegetable", 50, true),
        product("Donut", "Bakery", 200, false),
        product("Eclair", "Bakery", 350, true),
    ]
}

fn registry() -> FieldRegistry<Product> {
    FieldRegistry::new()
        .register("Name", |p: &Product| &p.name)
        .and_then(|r| r.register("Category", |p: &Product| &p.category))
        .and_then(|r| r.register("Price", |p: &Product| &p.price))
        .and_then(|r| r.register("IsActive", |p: &Product| &p.is_active))
        .and_then(|r| r.register("DiscontinuedOn", |p: &Product| &p.discontinued_on))
        .unwrap()
}

fn names<'a>(result: &'a SearchResult<&'a Product>) -> Vec<&'a str> {
    result.items().iter().map(|p| p.name.as_str()).collect()
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn filter_by_category_keeps_source_order() {
    let products = products();
    let request = SearchRequest::new().filter("Category", Operator::Equals, "Fruit");

    let result = search(products.as_slice(), &request, &registry()).unwrap();

    assert_eq!(result.total_count(), 2);
    assert_eq!(names(&result), ["Apple", "Banana"]);
}

#[test]
fn filters_are_and_combined() {
    let products = products();
    let request = SearchRequest::new()
        .filter("Category", Operator::Equals, "Bakery")
        .filter("IsActive", Operator::Equals, true);

    let result = search(products.as_slice(), &request, &registry()).unwrap();

    assert_eq!(result.total_count(), 1);
    assert_eq!(names(&result), ["Eclair"]);
}

#[test]
fn multi_key_sort() {
    let products = products();
    let request = SearchRequest::new()
        .sort("Category", Direction::Ascending)
        .sort("Price", Direction::Descending);

    let result = search(products.as_slice(), &request, &registry()).unwrap();

    assert_eq!(
        names(&result),
        ["Eclair", "Donut", "Apple", "Banana", "Carrot"]
    );
}

#[test]
fn last_partial_page() {
    let items: Vec<Product> = (0..10)
        .map(|i| product(&format!("Item{i}"), "Misc", i * 100, true))
        .collect();
    let request = SearchRequest::new().page(4, 3);

    let result = search(items.as_slice(), &request, &registry()).unwrap();

    assert_eq!(result.items().len(), 1);
    assert_eq!(result.items()[0].name, "Item9");
    assert_eq!(result.total_count(), 10);
    assert_eq!(result.total_pages(), 4);
    assert!(!result.has_next_page());
    assert!(result.has_previous_page());
}

#[test]
fn unknown_field_is_rejected() {
    let products = products();
    let request = SearchRequest::new().filter("UnknownField", Operator::Equals, "x");

    let err = search(products.as_slice(), &request, &registry()).unwrap_err();

    assert_eq!(
        err,
        SearchError::UnmappedField {
            field: "UnknownField".to_string()
        }
    );
}

// ============================================================================
// Whitelist and policy
// ============================================================================

#[test]
fn unregistered_field_is_unreachable() {
    let products = products();
    let request = SearchRequest::new().filter("supplier_notes", Operator::Contains, "Apple");
    let err = search(products.as_slice(), &request, &registry()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnmappedField);

    let request = SearchRequest::new().sort("supplier_notes", Direction::Ascending);
    let err = search(products.as_slice(), &request, &registry()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnmappedField);
    assert_eq!(products[0].supplier_notes, "Apple supplier");
}

#[test]
fn field_names_ignore_case() {
    let products = products();
    let request = SearchRequest::new()
        .filter("category", Operator::Equals, "Fruit")
        .sort("PRICE", Direction::Ascending);

    let result = products.apply_search(&request, &registry()).unwrap();

    assert_eq!(names(&result), ["Banana", "Apple"]);
}

#[test]
fn operator_policy_is_enforced() {
    let products = products();
    let registry = registry().allow_operators([Operator::Equals, Operator::NotEquals]);
    let request = SearchRequest::new().filter("Price", Operator::LessThan, 1);

    let err = search(products.as_slice(), &request, &registry).unwrap_err();

    assert_eq!(
        err,
        SearchError::OperatorNotAllowed {
            operator: Operator::LessThan
        }
    );
}

#[test]
fn text_operator_on_decimal_is_type_mismatch() {
    let products = products();
    let request = SearchRequest::new().filter("Price", Operator::Contains, "1");

    let err = search(products.as_slice(), &request, &registry()).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::TypeMismatch);
}

#[test]
fn unconvertible_value_is_rejected() {
    let products = products();
    let request = SearchRequest::new().filter("Price", Operator::GreaterThan, "cheap");

    let err = search(products.as_slice(), &request, &registry()).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ValueConversion);
    assert!(err.to_string().contains("'Price'"));
}

#[test]
fn null_into_non_nullable_field_is_rejected() {
    let products = products();
    let request = SearchRequest::new().filter("Name", Operator::Equals, json!(null));

    let err = search(products.as_slice(), &request, &registry()).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ValueConversion);
}

// ============================================================================
// Values and nulls
// ============================================================================

#[test]
fn range_filters_convert_values() {
    let products = products();
    let request = SearchRequest::new()
        .filter("Price", Operator::GreaterThanOrEqual, "0.75")
        .filter("Price", Operator::LessThan, 2);

    let result = search(products.as_slice(), &request, &registry()).unwrap();

    assert_eq!(names(&result), ["Apple", "Banana"]);
}

#[test]
fn null_filters_on_nullable_field() {
    let mut products = products();
    products[3].discontinued_on = Some("2024-01-31".to_string());

    let request = SearchRequest::new().filter("DiscontinuedOn", Operator::Equals, json!(null));
    let result = search(products.as_slice(), &request, &registry()).unwrap();
    assert_eq!(result.total_count(), 4);

    let request = SearchRequest::new().filter("DiscontinuedOn", Operator::NotEquals, json!(null));
    let result = search(products.as_slice(), &request, &registry()).unwrap();
    assert_eq!(names(&result), ["Donut"]);
}

#[test]
fn not_equals_is_complement_of_equals() {
    let products = products();
    let equals = SearchRequest::new().filter("Category", Operator::Equals, "Bakery");
    let not_equals = SearchRequest::new().filter("Category", Operator::NotEquals, "Bakery");

    let a = search(products.as_slice(), &equals, &registry()).unwrap();
    let b = search(products.as_slice(), &not_equals, &registry()).unwrap();

    assert_eq!(a.total_count() + b.total_count(), products.len());
    assert_eq!(names(&b), ["Apple", "Banana", "Carrot"]);
}

// ============================================================================
// Pagination
// ============================================================================

#[test]
fn page_past_the_end_is_empty() {
    let products = products();
    let request = SearchRequest::new().page(9, 2);

    let result = search(products.as_slice(), &request, &registry()).unwrap();

    assert!(result.items().is_empty());
    assert_eq!(result.total_count(), 5);
    assert_eq!(result.total_pages(), 3);
}

#[test]
fn zero_page_values_are_rejected() {
    let products = products();

    let err = search(
        products.as_slice(),
        &SearchRequest::new().page(0, 10),
        &registry(),
    )
    .unwrap_err();
    assert_eq!(
        err,
        SearchError::Validation {
            message: "pageNumber must be at least 1".to_string()
        }
    );

    let err = search(
        products.as_slice(),
        &SearchRequest::new().page(1, 0),
        &registry(),
    )
    .unwrap_err();
    assert_eq!(
        err,
        SearchError::Validation {
            message: "pageSize must be at least 1".to_string()
        }
    );
}

// ============================================================================
// Wire format
// ============================================================================

#[test]
fn json_request_to_json_result() {
    let products = products();
    let request: SearchRequest = serde_json::from_value(json!({
        "filters": [
            { "field": "IsActive", "operator": "Equals", "value": "true" },
            { "field": "Name", "operator": "EndsWith", "value": "t" }
        ],
        "sorts": [{ "field": "Name", "direction": "Descending" }],
        "pageSize": 1
    }))
    .unwrap();

    let result = search(products.as_slice(), &request, &registry())
        .unwrap()
        .map(|p| p.name.clone());

    assert_eq!(
        serde_json::to_value(&result).unwrap(),
        json!({
            "items": ["Carrot"],
            "totalCount": 1,
            "pageNumber": 1,
            "pageSize": 1,
            "totalPages": 1,
            "hasPreviousPage": false,
            "hasNextPage": false
        })
    );
}

#[test]
fn cloned_results_outlive_the_source() {
    let owned: SearchResult<Product> = {
        let products = products();
        let request = SearchRequest::new().filter("Name", Operator::StartsWith, "E");
        search(&products, &request, &registry()).unwrap().cloned()
    };
    assert_eq!(owned.items()[0].name, "Eclair");
}
