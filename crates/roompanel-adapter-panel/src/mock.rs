//! Scripted in-memory transport for tests.

use async_trait::async_trait;
use roompanel_adapter_http::{ClientError, RequestBody, Transport};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Get(String),
    Post(String, RequestBody),
}

impl Call {
    pub(crate) fn get(path: &str) -> Self {
        Self::Get(path.to_string())
    }

    /// POST to `path`, matching any body.
    pub(crate) fn post(path: &str) -> Self {
        Self::Post(path.to_string(), RequestBody::Form(Vec::new()))
    }

    fn path(&self) -> &str {
        match self {
            Self::Get(path) | Self::Post(path, _) => path,
        }
    }
}

pub(crate) fn forbidden() -> ClientError {
    ClientError::ApiError {
        status: 403,
        message: "Forbidden".to_string(),
    }
}

pub(crate) fn server_error() -> ClientError {
    ClientError::ApiError {
        status: 500,
        message: "Internal Server Error".to_string(),
    }
}

#[derive(Default)]
struct MockState {
    responses: HashMap<String, VecDeque<Result<String, ClientError>>>,
    calls: Vec<Call>,
}

/// Answers each path from a queue of scripted responses.
///
/// The last response queued for a path repeats forever; unscripted paths
/// answer 404. Every request yields once after it is recorded, so concurrent
/// callers get a chance to interleave while it is in flight.
#[derive(Default)]
pub(crate) struct MockTransport {
    state: Mutex<MockState>,
}

impl MockTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond(&self, path: &str, response: Result<String, ClientError>) -> &Self {
        self.state
            .lock()
            .unwrap()
            .responses
            .entry(path.to_string())
            .or_default()
            .push_back(response);
        self
    }

    /// Calls in order, POST bodies blanked so they compare with [`Call::post`].
    pub(crate) fn calls(&self) -> Vec<Call> {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .map(|call| match call {
                Call::Get(path) => Call::get(path),
                Call::Post(path, _) => Call::post(path),
            })
            .collect()
    }

    pub(crate) fn count(&self, path: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|call| call.path() == path)
            .count()
    }

    pub(crate) fn bodies(&self, path: &str) -> Vec<RequestBody> {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter_map(|call| match call {
                Call::Post(p, body) if p == path => Some(body.clone()),
                _ => None,
            })
            .collect()
    }

    fn answer(&self, call: Call) -> Result<String, ClientError> {
        let mut state = self.state.lock().unwrap();
        let path = call.path().to_string();
        state.calls.push(call);

        match state.responses.get_mut(&path) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
            Some(queue) => queue.front().cloned().unwrap(),
            None => Err(ClientError::ApiError {
                status: 404,
                message: format!("no response scripted for {path}"),
            }),
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(&self, path: &str) -> Result<String, ClientError> {
        let response = self.answer(Call::get(path));
        tokio::task::yield_now().await;
        response
    }

    async fn post(&self, path: &str, body: &RequestBody) -> Result<String, ClientError> {
        let response = self.answer(Call::Post(path.to_string(), body.clone()));
        tokio::task::yield_now().await;
        response
    }

    async fn ping(&self) -> Result<Duration, ClientError> {
        Ok(Duration::from_millis(1))
    }
}
