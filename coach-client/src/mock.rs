//! Mock CoachService implementation for testing

use crate::error::{ClientError, ClientResult};
use crate::traits::{CoachService, GenerateRequest};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

type Responder = Box<dyn Fn(&GenerateRequest) -> ClientResult<Option<String>> + Send>;

/// Mock service for testing - only compiled in test mode or with the `mock` feature
#[derive(Clone, Default)]
pub struct MockCoachService {
    response: Arc<Mutex<Option<Responder>>>,
    call_log: Arc<Mutex<Vec<GenerateRequest>>>,
}

impl MockCoachService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the response for every request
    pub fn with_response<F>(self, f: F) -> Self
    where
        F: Fn(&GenerateRequest) -> ClientResult<Option<String>> + Send + 'static,
    {
        *self.response.lock().unwrap() = Some(Box::new(f));
        self
    }

    /// Always answer with the given text payload
    pub fn with_text(self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.with_response(move |_| Ok(Some(text.clone())))
    }

    /// Get recorded requests for verification
    pub fn get_calls(&self) -> Vec<GenerateRequest> {
        self.call_log.lock().unwrap().clone()
    }

    /// Clear call history
    pub fn clear_calls(&self) {
        self.call_log.lock().unwrap().clear()
    }
}

#[async_trait]
impl CoachService for MockCoachService {
    async fn generate(&self, request: GenerateRequest) -> ClientResult<Option<String>> {
        let response = self.response.lock().unwrap();
        let result = match response.as_ref() {
            Some(f) => f(&request),
            None => Err(ClientError::NotConfigured("generate".to_string())),
        };
        self.call_log.lock().unwrap().push(request);
        result
    }
}
