//! Tests for the parameter builder.

use super::*;
use crate::model::SortSpec;

fn shape(search: &str, filter: &str) -> QueryShape {
    QueryShape::new(search, filter, SortSpec::new("name", SortDirection::Ascending))
}

fn chunk(n: u32) -> ChunkIndex {
    ChunkIndex::new(n).expect("non-zero chunk")
}

fn size(n: u32) -> PageSize {
    PageSize::new(n).expect("non-zero size")
}

// ===== Core Keys =====

#[test]
fn build_omits_empty_search_and_filter() {
    let params = ParamBuilder::default().build(&shape("", ""), chunk(1), size(200), "");

    assert_eq!(params.search, None);
    assert_eq!(params.filter, None);
    assert_eq!(params.sort_field, "name");
    assert_eq!(params.sort_direction, SortDirection::Ascending);
    assert_eq!(params.page, 1);
    assert_eq!(params.limit, 200);
}

#[test]
fn build_includes_trimmed_search_and_filter() {
    let params = ParamBuilder::default().build(&shape(" alice ", " active "), chunk(3), size(200), "active");

    assert_eq!(params.search.as_deref(), Some("alice"));
    assert_eq!(params.filter.as_deref(), Some("active"));
    assert_eq!(params.page, 3);
}

#[test]
fn page_is_the_upstream_chunk_not_a_display_page() {
    let params = ParamBuilder::default().build(&shape("", ""), chunk(2), size(200), "");

    assert_eq!(params.chunk(), Some(chunk(2)));
    assert_eq!(params.limit, 200);
}

// ===== Extras =====

#[test]
fn static_extras_are_always_included() {
    let builder = ParamBuilder::new(
        ParamNames::default(),
        ExtraParams::new().with_static("tenant", "acme"),
    );

    let params = builder.build(&shape("", ""), chunk(1), size(50), "");

    assert_eq!(params.extra.get("tenant").map(String::as_str), Some("acme"));
}

#[test]
fn derivation_receives_pending_filter() {
    let extras = ExtraParams::new().with_derivation(|pending| {
        let mut out = BTreeMap::new();
        out.insert("status".to_string(), format!("is:{}", pending));
        out
    });
    let builder = ParamBuilder::new(ParamNames::default(), extras);

    // Committed shape still has no filter, pending value is "banned".
    let params = builder.build(&shape("", ""), chunk(1), size(50), " banned ");

    assert_eq!(params.filter, None);
    assert_eq!(params.extra.get("status").map(String::as_str), Some("is:banned"));
}

#[test]
fn derived_extras_override_static_extras() {
    let extras = ExtraParams::new()
        .with_static("status", "any")
        .with_derivation(|_| BTreeMap::from([("status".to_string(), "derived".to_string())]));
    let builder = ParamBuilder::new(ParamNames::default(), extras);

    let params = builder.build(&shape("", ""), chunk(1), size(50), "x");

    assert_eq!(params.extra.get("status").map(String::as_str), Some("derived"));
}

#[test]
fn extras_cannot_replace_core_keys() {
    let builder = ParamBuilder::new(
        ParamNames::default(),
        ExtraParams::new().with_static("page", "99").with_static("limit", "1"),
    );

    let params = builder.build(&shape("", ""), chunk(2), size(200), "");

    assert!(params.extra.is_empty(), "got: {:?}", params.extra);
    assert_eq!(params.page, 2);
}

// ===== Rendering =====

#[test]
fn to_pairs_uses_configured_names_in_fixed_order() {
    let names = ParamNames {
        search: "q".to_string(),
        ..ParamNames::default()
    };
    let builder = ParamBuilder::new(names.clone(), ExtraParams::new().with_static("zone", "eu"));

    let pairs = builder
        .build(&shape("bob", ""), chunk(1), size(200), "")
        .to_pairs(&names);

    let expected: Vec<(String, String)> = [
        ("q", "bob"),
        ("sortBy", "name"),
        ("sortOrder", "asc"),
        ("page", "1"),
        ("limit", "200"),
        ("zone", "eu"),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    assert_eq!(pairs, expected);
}

#[test]
fn serializes_extras_flattened() {
    let builder = ParamBuilder::new(
        ParamNames::default(),
        ExtraParams::new().with_static("tenant", "acme"),
    );

    let params = builder.build(&shape("", "vip"), chunk(1), size(10), "vip");
    let json = serde_json::to_value(&params).expect("serializable");

    assert_eq!(json["filter"], "vip");
    assert_eq!(json["tenant"], "acme");
    assert_eq!(json["sort_direction"], "asc");
    assert!(json.get("search").is_none());
}
