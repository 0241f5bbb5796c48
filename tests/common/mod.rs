//! Common helpers shared by integration tests.
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

use mehfil_admin::transport::{ApiError, ApiRequest, ApiResult, Method, Transport};
use serde_json::{Value, json};

/// Scripted transport that records every request it receives.
///
/// Responses are queued per `METHOD /path` (query string ignored). The last
/// queued response of a route is repeated once the others are used up.
#[derive(Default)]
pub struct RecordingTransport {
    routes: RefCell<HashMap<String, VecDeque<ApiResult<Value>>>>,
    sent: RefCell<Vec<ApiRequest>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, method: Method, path: &str, response: ApiResult<Value>) -> Self {
        self.routes
            .borrow_mut()
            .entry(route(method, path))
            .or_default()
            .push_back(response);
        self
    }

    pub fn ok(self, method: Method, path: &str, body: Value) -> Self {
        self.respond(method, path, Ok(body))
    }

    pub fn sent(&self) -> Vec<ApiRequest> {
        self.sent.borrow().clone()
    }

    /// Number of requests sent to `METHOD /path`.
    pub fn count(&self, method: Method, path: &str) -> usize {
        self.sent
            .borrow()
            .iter()
            .filter(|req| req.method == method && req.path == path)
            .count()
    }

    pub fn last(&self, method: Method, path: &str) -> Option<ApiRequest> {
        self.sent
            .borrow()
            .iter()
            .rev()
            .find(|req| req.method == method && req.path == path)
            .cloned()
    }
}

impl Transport for RecordingTransport {
    fn send(&self, request: &ApiRequest) -> ApiResult<Value> {
        self.sent.borrow_mut().push(request.clone());
        let key = route(request.method, &request.path);
        let mut routes = self.routes.borrow_mut();
        let queue = routes.get_mut(&key).ok_or_else(|| ApiError::Http {
            status: 404,
            message: Some(format!("no route for {key}")),
        })?;
        let response = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };
        response.unwrap_or(Ok(Value::Null))
    }
}

fn route(method: Method, path: &str) -> String {
    format!("{method} {path}")
}

pub fn zone(id: i32, title: &str) -> Value {
    json!({
        "id": id,
        "title_en": title,
        "title_ur": "زون",
        "country_en": "Pakistan",
        "country_ur": "پاکستان",
        "city_en": "Lahore",
        "city_ur": "لاہور",
        "primary_phone_number": "03001234567",
    })
}

pub fn page(rows: Vec<Value>, total: u64) -> Value {
    json!({"data": rows, "meta": {"total": total}})
}
