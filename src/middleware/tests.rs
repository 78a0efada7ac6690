use http::Method;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use super::{vary, CorsMiddleware, CorsOutcome, Handler, Middleware};
use crate::configuration::{Configuration, ProjectConfiguration};
use crate::message::{CorsRequest, CorsResponse};
use crate::router::{AllowedMethods, RouteMeta, Router};
use crate::service::CorsError;

struct CountingHandler(AtomicUsize);

impl CountingHandler {
    fn new() -> Self {
        Self(AtomicUsize::new(0))
    }

    fn calls(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

impl Handler for CountingHandler {
    fn handle(&self, _request: &CorsRequest) -> CorsResponse {
        self.0.fetch_add(1, Ordering::SeqCst);
        CorsResponse::json(200, json!({ "ok": true }))
    }
}

fn middleware() -> CorsMiddleware {
    let router = Router::new(vec![
        RouteMeta::new(
            "list_pets",
            "/pets",
            AllowedMethods::List(vec![Method::GET]),
        )
        .with_default(
            "cors",
            json!({ "allowed_origins": ["https://trusted.example.com"] }),
        ),
        RouteMeta::new(
            "create_pet",
            "/pets",
            AllowedMethods::List(vec![Method::POST]),
        )
        .with_default(
            "cors",
            json!({ "allowed_origins": ["https://trusted.example.com"] }),
        ),
    ])
    .unwrap();
    let project = ProjectConfiguration::from_value(&json!({
        "allowed_headers": ["Content-Type"],
        "exposed_headers": ["X-Request-Id"],
    }))
    .unwrap();
    CorsMiddleware::with_router(project, Arc::new(router))
}

fn request(method: Method, path: &str, headers: &[(&str, &str)]) -> CorsRequest {
    let uri = format!("https://api.example.com{path}");
    headers
        .iter()
        .fold(CorsRequest::parse(method, &uri).unwrap(), |req, (k, v)| {
            req.with_header(k, v)
        })
}

#[test]
fn test_vary_sets_origin_when_absent() {
    let response = vary(CorsResponse::empty(200));
    assert_eq!(response.get_header("vary"), Some("Origin"));
}

#[test]
fn test_vary_appends_to_existing_value() {
    let response = vary(CorsResponse::empty(200).with_header("Vary", "Accept-Encoding"));
    assert_eq!(response.get_header("vary"), Some("Accept-Encoding, Origin"));
}

#[test]
fn test_vary_keeps_existing_origin_token() {
    for value in ["Origin", "Accept, Origin", "origin,Accept", "Accept,Origin, Cookie"] {
        let response = vary(CorsResponse::empty(200).with_header("Vary", value));
        assert_eq!(response.get_header("vary"), Some(value));
    }
}

#[test]
fn test_vary_does_not_match_origin_substrings() {
    let response = vary(CorsResponse::empty(200).with_header("Vary", "X-Origin-Hint"));
    assert_eq!(response.get_header("vary"), Some("X-Origin-Hint, Origin"));
}

#[test]
fn test_closures_are_handlers() {
    let handler = |req: &CorsRequest| CorsResponse::json(200, json!({ "path": req.uri.path() }));
    let response = Handler::handle(&handler, &request(Method::GET, "/x", &[]));
    assert_eq!(response.body, json!({ "path": "/x" }));
}

#[test]
fn test_evaluate_not_cors() {
    let outcome = middleware()
        .evaluate(&request(Method::GET, "/pets", &[]))
        .unwrap();
    assert_eq!(outcome, CorsOutcome::NotCors);
}

#[test]
fn test_evaluate_no_route() {
    let outcome = middleware()
        .evaluate(&request(
            Method::GET,
            "/unknown",
            &[("Origin", "https://trusted.example.com")],
        ))
        .unwrap();
    assert_eq!(outcome, CorsOutcome::NoRoute);
}

#[test]
fn test_evaluate_authorized_merges_project_and_routes() {
    let outcome = middleware()
        .evaluate(&request(
            Method::GET,
            "/pets",
            &[("Origin", "https://trusted.example.com")],
        ))
        .unwrap();

    match outcome {
        CorsOutcome::Authorized {
            origin,
            configuration,
        } => {
            assert_eq!(origin, "https://trusted.example.com");
            assert_eq!(configuration.allowed_methods(), &[Method::GET, Method::POST]);
            assert_eq!(configuration.exposed_headers(), &["X-Request-Id"]);
        }
        other => panic!("expected authorized, got {other:?}"),
    }
}

#[test]
fn test_evaluate_unauthorized() {
    let outcome = middleware()
        .evaluate(&request(
            Method::GET,
            "/pets",
            &[("Origin", "https://evil.example.com")],
        ))
        .unwrap();
    assert_eq!(
        outcome,
        CorsOutcome::Unauthorized {
            origin: "https://evil.example.com".to_string()
        }
    );
}

#[test]
fn test_preflight_for_unauthorized_origin_echoes_null() {
    let outcome = middleware()
        .evaluate(&request(
            Method::OPTIONS,
            "/pets",
            &[
                ("Origin", "https://evil.example.com"),
                ("Access-Control-Request-Method", "POST"),
            ],
        ))
        .unwrap();

    match outcome {
        CorsOutcome::Preflight { origin, .. } => assert_eq!(origin, "null"),
        other => panic!("expected preflight, got {other:?}"),
    }
}

#[test]
fn test_preflight_short_circuits_handler() {
    let handler = CountingHandler::new();
    let response = middleware()
        .process(
            &request(
                Method::OPTIONS,
                "/pets",
                &[
                    ("Origin", "https://trusted.example.com"),
                    ("Access-Control-Request-Method", "POST"),
                ],
            ),
            &handler,
        )
        .unwrap();

    assert_eq!(handler.calls(), 0);
    assert_eq!(response.status, 204);
    assert_eq!(
        response.get_header("access-control-allow-headers"),
        Some("Content-Type")
    );
}

#[test]
fn test_authorized_request_is_annotated_once() {
    let handler = CountingHandler::new();
    let response = middleware()
        .process(
            &request(
                Method::GET,
                "/pets",
                &[("Origin", "https://trusted.example.com")],
            ),
            &handler,
        )
        .unwrap();

    assert_eq!(handler.calls(), 1);
    assert_eq!(response.status, 200);
    assert_eq!(
        response.get_header("access-control-allow-origin"),
        Some("https://trusted.example.com")
    );
    assert_eq!(
        response.get_header("access-control-expose-headers"),
        Some("X-Request-Id")
    );
    assert_eq!(response.get_header("vary"), Some("Origin"));
}

#[test]
fn test_invalid_origin_is_an_error_in_process_and_400_in_handle() {
    let middleware = middleware();
    let handler = CountingHandler::new();
    let req = request(Method::GET, "/pets", &[("Origin", "::not-an-origin::")]);

    assert!(matches!(
        middleware.process(&req, &handler),
        Err(CorsError::InvalidOrigin { .. })
    ));

    let response = middleware.handle(&req, &handler).unwrap();
    assert_eq!(response.status, 400);
    assert_eq!(
        response.body,
        json!({ "error": "Provided Origin \"::not-an-origin::\" is invalid." })
    );
    assert_eq!(handler.calls(), 0);
}

#[test]
fn test_handle_does_not_convert_pipeline_misconfiguration() {
    let middleware = middleware();
    let router = Router::new(vec![RouteMeta::new("any", "/pets", AllowedMethods::Any)]).unwrap();
    let mut req = request(Method::GET, "/pets", &[]);
    if let crate::router::RouteResult::Success(route_match) = router.route(&Method::GET, "/pets") {
        req.route_match = Some(route_match);
    }

    assert_eq!(
        middleware.handle(&req, &CountingHandler::new()).unwrap_err(),
        CorsError::PipelineMisconfigured
    );
}
