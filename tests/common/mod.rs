#![allow(dead_code)]

use brrtcors::message::{CorsRequest, CorsResponse};
use brrtcors::router::{RouteMatcher, RouteMeta, RouteResult, Router};
use brrtcors::{CorsMiddleware, Handler, ProjectConfiguration};
use http::Method;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Wraps a real router and records every probe it answers
pub struct RecordingRouter {
    inner: Router,
    probes: Mutex<Vec<(Method, String)>>,
}

impl RecordingRouter {
    pub fn new(routes: Vec<RouteMeta>) -> Self {
        Self {
            inner: Router::new(routes).unwrap(),
            probes: Mutex::new(Vec::new()),
        }
    }

    pub fn probes(&self) -> Vec<(Method, String)> {
        self.probes.lock().unwrap().clone()
    }

    pub fn probed_methods(&self) -> Vec<Method> {
        self.probes().into_iter().map(|(m, _)| m).collect()
    }
}

impl RouteMatcher for RecordingRouter {
    fn match_request(&self, request: &CorsRequest) -> RouteResult {
        self.probes
            .lock()
            .unwrap()
            .push((request.method.clone(), request.uri.to_string()));
        self.inner.match_request(request)
    }
}

/// Downstream handler that counts invocations and answers 200
pub struct RecordingHandler {
    calls: AtomicUsize,
    response: CorsResponse,
}

impl RecordingHandler {
    pub fn new() -> Self {
        Self::with_response(CorsResponse::json(200, json!({ "ok": true })))
    }

    pub fn with_response(response: CorsResponse) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            response,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Handler for RecordingHandler {
    fn handle(&self, _request: &CorsRequest) -> CorsResponse {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.response.clone()
    }
}

pub fn project(value: Value) -> ProjectConfiguration {
    ProjectConfiguration::from_value(&value).unwrap()
}

pub fn middleware(
    project: ProjectConfiguration,
    routes: Vec<RouteMeta>,
) -> (CorsMiddleware, Arc<RecordingRouter>) {
    let router = Arc::new(RecordingRouter::new(routes));
    let middleware = CorsMiddleware::with_router(project, Arc::clone(&router) as Arc<dyn RouteMatcher>);
    (middleware, router)
}

pub fn request(method: Method, uri: &str, headers: &[(&str, &str)]) -> CorsRequest {
    headers
        .iter()
        .fold(CorsRequest::parse(method, uri).unwrap(), |req, (name, value)| {
            req.with_header(name, value)
        })
}
