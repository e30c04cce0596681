//! Scripted transport for unit tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use marquee_domain::{RequestSpec, ResponseSpec};
use serde_json::Value;

use crate::ports::{HttpTransport, TransportError};

type Responder = dyn Fn(&RequestSpec) -> Result<ResponseSpec, TransportError> + Send + Sync;

/// Transport that answers from a closure and records every request.
pub struct ScriptedTransport {
    responder: Box<Responder>,
    sent: Arc<Mutex<Vec<RequestSpec>>>,
}

impl ScriptedTransport {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&RequestSpec) -> Result<ResponseSpec, TransportError> + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Handle to the recorded requests, usable after the transport moved.
    pub fn recorder(&self) -> Recorder {
        Recorder(Arc::clone(&self.sent))
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: &RequestSpec) -> Result<ResponseSpec, TransportError> {
        self.sent
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(request.clone());
        // Let concurrent callers interleave like a real network would.
        tokio::task::yield_now().await;
        (self.responder)(request)
    }
}

#[derive(Clone)]
pub struct Recorder(Arc<Mutex<Vec<RequestSpec>>>);

impl Recorder {
    pub fn all(&self) -> Vec<RequestSpec> {
        self.0
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    pub fn count_path(&self, path: &str) -> usize {
        self.all().iter().filter(|r| r.url.path() == path).count()
    }

    pub fn bearers_for(&self, path: &str) -> Vec<Option<String>> {
        self.all()
            .iter()
            .filter(|r| r.url.path() == path)
            .map(|r| r.bearer().map(str::to_string))
            .collect()
    }
}

pub fn json(status: u16, body: &Value) -> Result<ResponseSpec, TransportError> {
    Ok(ResponseSpec::new(status, body.to_string()))
}
