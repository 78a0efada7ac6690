use http::Method;
use serde_json::json;

use super::{AllowedMethods, RouteMeta, RouteResult, Router};

fn pets_router() -> Router {
    Router::new(vec![
        RouteMeta::new(
            "list_pets",
            "/pets",
            AllowedMethods::List(vec![Method::GET, Method::POST]),
        ),
        RouteMeta::new(
            "get_pet",
            "/pets/{id}",
            AllowedMethods::List(vec![Method::GET]),
        )
        .with_default("cors", json!({ "allowed_origins": ["*"] })),
        RouteMeta::new("delete_pet", "/pets/{id}", AllowedMethods::List(vec![Method::DELETE])),
        RouteMeta::new("catch_all", "/cors/demo", AllowedMethods::Any),
    ])
    .unwrap()
}

#[test]
fn test_root_path() {
    let (re, params) = Router::path_to_regex("/").unwrap();
    assert!(re.is_match("/"));
    assert!(params.is_empty());
}

#[test]
fn test_parameterized_path() {
    let (re, params) = Router::path_to_regex("/items/{id}").unwrap();
    assert!(re.is_match("/items/123"));
    assert_eq!(params.len(), 1);
    assert_eq!(params[0].as_ref(), "id");
}

#[test]
fn test_nested_path() {
    let (re, params) = Router::path_to_regex("/a/{b}/c").unwrap();
    assert!(re.is_match("/a/1/c"));
    assert!(!re.is_match("/a/1/c/d"));
    assert_eq!(params[0].as_ref(), "b");
}

#[test]
fn test_literal_segments_are_escaped() {
    let (re, _) = Router::path_to_regex("/v1.0/items").unwrap();
    assert!(re.is_match("/v1.0/items"));
    assert!(!re.is_match("/v1x0/items"));
}

#[test]
fn test_route_success_exposes_methods_and_params() {
    let router = pets_router();
    let result = router.route(&Method::GET, "/pets/42");

    assert!(result.is_success());
    assert_eq!(result.route_name(), Some("get_pet"));
    assert_eq!(
        result.allowed_methods(),
        Some(AllowedMethods::List(vec![Method::GET]))
    );

    let params = result.matched_params();
    assert_eq!(params.get("id"), Some(&json!("42")));
    assert_eq!(params.get("cors"), Some(&json!({ "allowed_origins": ["*"] })));
}

#[test]
fn test_same_path_routes_per_method() {
    let router = pets_router();
    assert_eq!(
        router.route(&Method::DELETE, "/pets/42").route_name(),
        Some("delete_pet")
    );
}

#[test]
fn test_method_failure_and_not_found() {
    let router = pets_router();

    match router.route(&Method::PUT, "/pets/42") {
        RouteResult::MethodFailure { allowed_methods } => {
            assert!(allowed_methods.contains(&Method::GET));
            assert!(allowed_methods.contains(&Method::DELETE));
        }
        other => panic!("expected method failure, got {other:?}"),
    }

    let missing = router.route(&Method::GET, "/does/not/exist");
    assert!(missing.is_failure());
    assert!(missing.allowed_methods().is_none());
    assert!(missing.matched_params().is_empty());
}

#[test]
fn test_catch_all_route_accepts_any_method() {
    let router = pets_router();
    for method in [Method::TRACE, Method::PATCH, Method::OPTIONS] {
        let result = router.route(&method, "/cors/demo");
        assert_eq!(result.allowed_methods(), Some(AllowedMethods::Any));
    }
}
