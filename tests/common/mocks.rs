//! Mock implementations for test fixtures.
//!
//! Re-exports the mock transport from `swapstream::adapters::mock` and adds
//! a handler that records every callback.

pub use swapstream::adapters::mock::{MockHttpClient, MockResponse};

use serde_json::Value;
use swapstream::{HandlerFault, HandlerResult, StreamError, SwapHandler};

/// One observed callback invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Message(String, Value),
    Error(StreamError),
    Complete(Value),
}

/// How the recording handler misbehaves on a given event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fault {
    ReturnError,
    Panic,
}

/// Handler that records calls and can be told to fail on chosen events.
#[derive(Debug, Default)]
pub struct RecordingHandler {
    pub calls: Vec<Call>,
    fail_on: Vec<(String, Fault)>,
    fail_on_complete: Option<Fault>,
}

impl RecordingHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail `on_message` whenever the effective event equals `event`.
    pub fn failing_on(mut self, event: &str, fault: Fault) -> Self {
        self.fail_on.push((event.to_string(), fault));
        self
    }

    #[allow(dead_code)]
    pub fn failing_on_complete(mut self, fault: Fault) -> Self {
        self.fail_on_complete = Some(fault);
        self
    }

    pub fn messages(&self) -> Vec<(String, Value)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::Message(event, payload) => Some((event.clone(), payload.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn errors(&self) -> Vec<StreamError> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::Error(err) => Some(err.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn completions(&self) -> Vec<Value> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::Complete(payload) => Some(payload.clone()),
                _ => None,
            })
            .collect()
    }

    fn misbehave(fault: Fault, what: &str) -> HandlerResult {
        match fault {
            Fault::ReturnError => Err(HandlerFault::new(format!("{} refused", what))),
            Fault::Panic => panic!("{} exploded", what),
        }
    }
}

impl SwapHandler for RecordingHandler {
    fn on_message(&mut self, event: &str, payload: &Value) -> HandlerResult {
        self.calls.push(Call::Message(event.to_string(), payload.clone()));
        let fault = self
            .fail_on
            .iter()
            .find(|(name, _)| name == event)
            .map(|(_, fault)| *fault);
        match fault {
            Some(fault) => Self::misbehave(fault, event),
            None => Ok(()),
        }
    }

    fn on_error(&mut self, error: &StreamError) -> HandlerResult {
        self.calls.push(Call::Error(error.clone()));
        Ok(())
    }

    fn on_complete(&mut self, payload: &Value) -> HandlerResult {
        self.calls.push(Call::Complete(payload.clone()));
        match self.fail_on_complete {
            Some(fault) => Self::misbehave(fault, "on_complete"),
            None => Ok(()),
        }
    }
}
