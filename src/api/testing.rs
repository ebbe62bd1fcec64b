//! In-memory transport for tests

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use super::transport::{ApiRequest, ApiResponse, Method, Transport};
use crate::error::CabinetResult;

struct Route {
    method: Method,
    suffix: String,
    responses: VecDeque<ApiResponse>,
}

#[derive(Default)]
struct MockState {
    routes: Vec<Route>,
    requests: Vec<ApiRequest>,
}

/// Answers requests from canned responses and records what was sent
///
/// A route matches when the request path ends with `/<suffix>`. Responses
/// queued on one route are served in order; the last one repeats.
/// Unmatched requests get a 404.
#[derive(Clone, Default)]
pub struct MockTransport {
    state: Rc<RefCell<MockState>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(&self, method: Method, suffix: &str, status: u16, body: impl Into<String>) -> &Self {
        let response = ApiResponse::new(status, body);
        let mut state = self.state.borrow_mut();
        match state
            .routes
            .iter_mut()
            .find(|r| r.method == method && r.suffix == suffix)
        {
            Some(route) => route.responses.push_back(response),
            None => state.routes.push(Route {
                method,
                suffix: suffix.to_string(),
                responses: VecDeque::from([response]),
            }),
        }
        self
    }

    pub fn on_json(&self, method: Method, suffix: &str, body: serde_json::Value) -> &Self {
        self.on(method, suffix, 200, body.to_string())
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.state.borrow().requests.clone()
    }

    pub fn last_request(&self) -> Option<ApiRequest> {
        self.state.borrow().requests.last().cloned()
    }

    /// How many requests hit `method` + `suffix`
    pub fn count(&self, method: Method, suffix: &str) -> usize {
        let needle = format!("/{}", suffix);
        self.state
            .borrow()
            .requests
            .iter()
            .filter(|r| r.method == method && r.path().ends_with(&needle))
            .count()
    }
}

impl Transport for MockTransport {
    fn send(&self, request: &ApiRequest) -> CabinetResult<ApiResponse> {
        let mut state = self.state.borrow_mut();
        state.requests.push(request.clone());

        let path = request.path().to_string();
        let route = state.routes.iter_mut().find(|r| {
            r.method == request.method && path.ends_with(&format!("/{}", r.suffix))
        });

        let response = match route {
            Some(route) if route.responses.len() > 1 => route.responses.pop_front(),
            Some(route) => route.responses.front().cloned(),
            None => None,
        };
        Ok(response.unwrap_or_else(|| ApiResponse::new(404, "no route")))
    }
}
