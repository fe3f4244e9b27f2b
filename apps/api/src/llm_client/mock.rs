//! Scripted `GuidanceModel` double for pipeline and router tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::time::Instant;

use super::{GuidanceModel, GuidanceRequest, LlmError};

/// Replays queued results in order; once the queue is empty, every call
/// returns `repeat` (or a network error if none was set).
pub struct ScriptedModel {
    script: Mutex<VecDeque<Result<String, LlmError>>>,
    repeat: Option<Result<String, LlmError>>,
    calls: Mutex<Vec<Instant>>,
    requests: Mutex<Vec<GuidanceRequest>>,
}

impl ScriptedModel {
    pub fn new(script: Vec<Result<String, LlmError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            repeat: None,
            calls: Mutex::new(Vec::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn always(result: Result<String, LlmError>) -> Self {
        Self {
            repeat: Some(result),
            ..Self::new(Vec::new())
        }
    }

    pub fn replying(text: &str) -> Self {
        Self::always(Ok(text.to_string()))
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn call_times(&self) -> Vec<Instant> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> Option<GuidanceRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl GuidanceModel for ScriptedModel {
    async fn invoke(&self, request: &GuidanceRequest) -> Result<String, LlmError> {
        self.calls.lock().unwrap().push(Instant::now());
        self.requests.lock().unwrap().push(request.clone());

        let next = self.script.lock().unwrap().pop_front();
        next.or_else(|| self.repeat.clone())
            .unwrap_or_else(|| Err(LlmError::Network("script exhausted".to_string())))
    }
}
