mod common;

use brrtcors::message::CorsResponse;
use brrtcors::router::{AllowedMethods, RouteMeta, RouteResult, Router};
use brrtcors::{CorsError, Middleware};
use common::{middleware, project, request, RecordingHandler};
use http::Method;
use serde_json::{json, Value};

#[test]
fn test_cross_origin_request_without_route_is_forwarded_with_vary() {
    let (cors, router) = middleware(
        project(json!({ "allowed_origins": ["*"] })),
        vec![RouteMeta::new(
            "list_pets",
            "/pets",
            AllowedMethods::List(vec![Method::GET]),
        )],
    );
    let handler = RecordingHandler::with_response(CorsResponse::error(404, "Not Found"));

    let response = cors
        .process(
            &request(
                Method::GET,
                "https://app.example.org/missing",
                &[("Origin", "https://other.org")],
            ),
            &handler,
        )
        .unwrap();

    assert_eq!(handler.calls(), 1);
    assert_eq!(response.status, 404);
    assert_eq!(response.body, json!({ "error": "Not Found" }));
    assert_eq!(response.get_header("Access-Control-Allow-Origin"), None);
    assert_eq!(response.get_header("Vary"), Some("Origin"));
    assert_eq!(router.probes().len(), 8);
}

#[test]
fn test_preflight_against_wildcard_route_reports_all_route_methods() {
    let (cors, _router) = middleware(
        project(Value::Null),
        vec![
            RouteMeta::new("list_pets", "/pets", AllowedMethods::List(vec![Method::GET]))
                .with_default("cors", json!({ "allowed_origins": ["*"] })),
            RouteMeta::new("create_pet", "/pets", AllowedMethods::List(vec![Method::POST]))
                .with_default("cors", json!({ "allowed_origins": ["*"] })),
        ],
    );
    let handler = RecordingHandler::new();

    let response = cors
        .process(
            &request(
                Method::OPTIONS,
                "https://api.example.com/pets",
                &[
                    ("Origin", "https://app.example.com"),
                    ("Access-Control-Request-Method", "POST"),
                ],
            ),
            &handler,
        )
        .unwrap();

    assert_eq!(handler.calls(), 0);
    assert_eq!(response.status, 204);
    assert_eq!(response.get_header("Content-Length"), Some("0"));
    assert_eq!(
        response.get_header("Access-Control-Allow-Origin"),
        Some("https://app.example.com")
    );
    assert_eq!(
        response.get_header("Access-Control-Allow-Methods"),
        Some("GET, POST")
    );
    assert_eq!(response.get_header("Access-Control-Max-Age"), Some("-1"));
}

#[test]
fn test_untrusted_origin_is_rejected_without_calling_handler() {
    let (cors, _router) = middleware(
        project(Value::Null),
        vec![RouteMeta::new(
            "list_pets",
            "/pets",
            AllowedMethods::List(vec![Method::GET]),
        )
        .with_default(
            "cors",
            json!({ "allowed_origins": ["https://trusted.example.com"] }),
        )],
    );
    let handler = RecordingHandler::new();

    let response = cors
        .process(
            &request(
                Method::GET,
                "https://api.example.com/pets",
                &[("Origin", "https://evil.example.com")],
            ),
            &handler,
        )
        .unwrap();

    assert_eq!(handler.calls(), 0);
    assert_eq!(response.status, 403);
    assert_eq!(
        response.body,
        json!({ "error": "The origin \"https://evil.example.com\" is not authorized" })
    );
    assert_eq!(response.get_header("Access-Control-Allow-Origin"), None);
}

#[test]
fn test_request_already_routed_is_a_pipeline_error() {
    let routes = vec![RouteMeta::new(
        "list_pets",
        "/pets",
        AllowedMethods::List(vec![Method::GET]),
    )];
    let (cors, router) = middleware(project(Value::Null), routes.clone());
    let handler = RecordingHandler::new();

    let mut req = request(
        Method::GET,
        "https://api.example.com/pets",
        &[("Origin", "https://other.org")],
    );
    match Router::new(routes).unwrap().route(&Method::GET, "/pets") {
        RouteResult::Success(route_match) => req.route_match = Some(route_match),
        other => panic!("fixture route must match, got {other:?}"),
    }

    assert_eq!(
        cors.process(&req, &handler).unwrap_err(),
        CorsError::PipelineMisconfigured
    );
    assert_eq!(handler.calls(), 0);
    assert!(router.probes().is_empty());
}

#[test]
fn test_same_origin_request_is_forwarded_and_varied() {
    let (cors, router) = middleware(project(Value::Null), Vec::new());
    let handler = RecordingHandler::with_response(
        CorsResponse::json(200, json!({})).with_header("Vary", "Accept-Encoding"),
    );

    let response = cors
        .process(
            &request(
                Method::POST,
                "https://api.example.com/pets",
                &[("Origin", "https://api.example.com")],
            ),
            &handler,
        )
        .unwrap();

    assert_eq!(handler.calls(), 1);
    assert_eq!(response.get_header("Vary"), Some("Accept-Encoding, Origin"));
    assert!(router.probes().is_empty());
}

#[test]
fn test_authorized_request_gets_cors_headers_and_credentials() {
    let (cors, _router) = middleware(
        project(json!({
            "allowed_origins": ["https://*.example.com"],
            "credentials_allowed": true,
            "exposed_headers": ["X-Total-Count"],
        })),
        vec![RouteMeta::new(
            "list_pets",
            "/pets",
            AllowedMethods::List(vec![Method::GET]),
        )],
    );
    let handler = RecordingHandler::new();

    let response = cors
        .process(
            &request(
                Method::GET,
                "https://api.example.com/pets",
                &[("Origin", "https://app.example.com")],
            ),
            &handler,
        )
        .unwrap();

    assert_eq!(handler.calls(), 1);
    assert_eq!(response.status, 200);
    assert_eq!(
        response.get_header("Access-Control-Allow-Origin"),
        Some("https://app.example.com")
    );
    assert_eq!(
        response.get_header("Access-Control-Allow-Credentials"),
        Some("true")
    );
    assert_eq!(
        response.get_header("Access-Control-Expose-Headers"),
        Some("X-Total-Count")
    );
    assert_eq!(response.get_header("Vary"), Some("Origin"));
}

#[test]
fn test_preflight_without_route_falls_through_to_handler() {
    let (cors, _router) = middleware(project(json!({ "allowed_origins": ["*"] })), Vec::new());
    let handler = RecordingHandler::with_response(CorsResponse::empty(404));

    let response = cors
        .process(
            &request(
                Method::OPTIONS,
                "https://api.example.com/nowhere",
                &[
                    ("Origin", "https://app.example.com"),
                    ("Access-Control-Request-Method", "GET"),
                ],
            ),
            &handler,
        )
        .unwrap();

    assert_eq!(handler.calls(), 1);
    assert_eq!(response.status, 404);
    assert_eq!(response.get_header("Access-Control-Allow-Origin"), None);
}

#[test]
fn test_invalid_origin_becomes_bad_request_at_the_boundary() {
    let (cors, router) = middleware(project(Value::Null), Vec::new());
    let handler = RecordingHandler::new();
    let req = request(
        Method::GET,
        "https://api.example.com/pets",
        &[("Origin", "http://[::1")],
    );

    let response = cors.handle(&req, &handler).unwrap();

    assert_eq!(response.status, 400);
    assert_eq!(
        response.body,
        json!({ "error": "Provided Origin \"http://[::1\" is invalid." })
    );
    assert_eq!(handler.calls(), 0);
    assert!(router.probes().is_empty());
}

#[test]
fn test_null_origin_without_route_is_forwarded() {
    let (cors, router) = middleware(project(json!({ "allowed_origins": ["*"] })), Vec::new());
    let handler = RecordingHandler::with_response(CorsResponse::error(404, "Not Found"));

    let response = cors
        .handle(
            &request(
                Method::POST,
                "https://api.example.com/unknown",
                &[("Origin", "null")],
            ),
            &handler,
        )
        .unwrap();

    assert_eq!(handler.calls(), 1);
    assert_eq!(response.status, 404);
    assert_eq!(response.get_header("Access-Control-Allow-Origin"), None);
    assert_eq!(response.get_header("Vary"), Some("Origin"));
    assert_eq!(router.probes().len(), 8);
}

#[test]
fn test_null_origin_on_routed_resource_is_unauthorized() {
    let (cors, _router) = middleware(
        project(json!({ "allowed_origins": ["*"] })),
        vec![RouteMeta::new(
            "list_pets",
            "/pets",
            AllowedMethods::List(vec![Method::GET]),
        )],
    );
    let handler = RecordingHandler::new();

    let response = cors
        .handle(
            &request(Method::GET, "https://api.example.com/pets", &[("Origin", "null")]),
            &handler,
        )
        .unwrap();

    assert_eq!(handler.calls(), 0);
    assert_eq!(response.status, 403);
    assert_eq!(
        response.body,
        json!({ "error": "The origin \"null\" is not authorized" })
    );
}
