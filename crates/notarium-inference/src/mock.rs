//! Mock query backend for deterministic testing.
//!
//! Scripted answers, optional failures, and a call log so tests can assert
//! how the query feature drove the backend.
//!
//! ## Usage
//!
//! ```rust
//! use notarium_inference::mock::MockQueryBackend;
//! use notarium_core::QueryBackend;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let backend = MockQueryBackend::new().with_default_answer("Mock answer");
//! let answer = backend.query_with_notes("anything", &[]).await.unwrap();
//! assert_eq!(answer, "Mock answer");
//! # }
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use notarium_core::{Error, KeyCheck, NoteContext, QueryBackend, Result};

/// Mock query backend for testing.
#[derive(Clone)]
pub struct MockQueryBackend {
    config: Arc<MockConfig>,
    call_log: Arc<Mutex<Vec<MockCall>>>,
}

#[derive(Debug, Clone)]
struct MockConfig {
    key_valid: bool,
    key_message: Option<String>,
    fixed_answers: HashMap<String, String>,
    default_answer: String,
    fail: bool,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            key_valid: true,
            key_message: None,
            fixed_answers: HashMap::new(),
            default_answer: "Mock answer".to_string(),
            fail: false,
        }
    }
}

/// A recorded backend invocation.
#[derive(Debug, Clone)]
pub struct MockCall {
    pub operation: String,
    pub question: String,
    pub context_notes: usize,
}

impl Default for MockQueryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockQueryBackend {
    /// Create a new mock backend with default configuration.
    pub fn new() -> Self {
        Self {
            config: Arc::new(MockConfig::default()),
            call_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Set the answer returned for any unscripted question.
    pub fn with_default_answer(mut self, answer: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config).default_answer = answer.into();
        self
    }

    /// Script an answer for one specific question.
    pub fn with_fixed_answer(
        mut self,
        question: impl Into<String>,
        answer: impl Into<String>,
    ) -> Self {
        Arc::make_mut(&mut self.config)
            .fixed_answers
            .insert(question.into(), answer.into());
        self
    }

    /// Make `test_key` report an invalid key with the given message.
    pub fn with_invalid_key(mut self, message: impl Into<String>) -> Self {
        let config = Arc::make_mut(&mut self.config);
        config.key_valid = false;
        config.key_message = Some(message.into());
        self
    }

    /// Make every operation fail with an inference error.
    pub fn with_failure(mut self) -> Self {
        Arc::make_mut(&mut self.config).fail = true;
        self
    }

    /// Calls recorded so far, in order.
    pub fn calls(&self) -> Vec<MockCall> {
        self.call_log
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.call_log
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    fn record(&self, operation: &str, question: &str, context_notes: usize) {
        self.call_log
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(MockCall {
                operation: operation.to_string(),
                question: question.to_string(),
                context_notes,
            });
    }
}

#[async_trait]
impl QueryBackend for MockQueryBackend {
    async fn test_key(&self) -> Result<KeyCheck> {
        self.record("test_key", "", 0);
        if self.config.fail {
            return Err(Error::Request("mock transport failure".into()));
        }
        if self.config.key_valid {
            Ok(KeyCheck::valid())
        } else {
            Ok(KeyCheck::invalid(
                self.config
                    .key_message
                    .clone()
                    .unwrap_or_else(|| "Invalid API key".to_string()),
            ))
        }
    }

    async fn query_with_notes(&self, question: &str, notes: &[NoteContext]) -> Result<String> {
        self.record("query", question, notes.len());
        if self.config.fail {
            return Err(Error::Inference("mock inference failure".into()));
        }
        Ok(self
            .config
            .fixed_answers
            .get(question)
            .cloned()
            .unwrap_or_else(|| self.config.default_answer.clone()))
    }
}
