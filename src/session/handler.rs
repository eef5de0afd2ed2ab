//! Callback surface and the dispatch barrier around it.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use serde_json::Value;

use crate::error::{HandlerResult, StreamError};

/// Receiver for swap progress.
///
/// `on_message` is called once per block, named by its effective event.
/// `on_complete` is called at most once, after the `done` block's
/// `on_message`. `on_error` is called at most once and nothing follows it.
///
/// Returning an error, or panicking, from any callback is logged and does
/// not stop the stream.
pub trait SwapHandler {
    fn on_message(&mut self, event: &str, payload: &Value) -> HandlerResult;

    fn on_error(&mut self, _error: &StreamError) -> HandlerResult {
        Ok(())
    }

    fn on_complete(&mut self, _payload: &Value) -> HandlerResult {
        Ok(())
    }
}

type MessageFn<'a> = Box<dyn FnMut(&str, &Value) -> HandlerResult + Send + 'a>;
type ErrorFn<'a> = Box<dyn FnMut(&StreamError) -> HandlerResult + Send + 'a>;
type CompleteFn<'a> = Box<dyn FnMut(&Value) -> HandlerResult + Send + 'a>;

/// Closure-based [`SwapHandler`].
///
/// # Example
///
/// ```ignore
/// let mut handler = Callbacks::new(|event, payload| {
///     println!("{event}: {payload}");
///     Ok(())
/// })
/// .on_complete(|payload| {
///     println!("result ready: {payload}");
///     Ok(())
/// });
/// session.run(&upload, &mut handler).await;
/// ```
pub struct Callbacks<'a> {
    on_message: MessageFn<'a>,
    on_error: Option<ErrorFn<'a>>,
    on_complete: Option<CompleteFn<'a>>,
}

impl<'a> Callbacks<'a> {
    pub fn new<F>(on_message: F) -> Self
    where
        F: FnMut(&str, &Value) -> HandlerResult + Send + 'a,
    {
        Self {
            on_message: Box::new(on_message),
            on_error: None,
            on_complete: None,
        }
    }

    pub fn on_error<F>(mut self, on_error: F) -> Self
    where
        F: FnMut(&StreamError) -> HandlerResult + Send + 'a,
    {
        self.on_error = Some(Box::new(on_error));
        self
    }

    pub fn on_complete<F>(mut self, on_complete: F) -> Self
    where
        F: FnMut(&Value) -> HandlerResult + Send + 'a,
    {
        self.on_complete = Some(Box::new(on_complete));
        self
    }
}

impl SwapHandler for Callbacks<'_> {
    fn on_message(&mut self, event: &str, payload: &Value) -> HandlerResult {
        (self.on_message)(event, payload)
    }

    fn on_error(&mut self, error: &StreamError) -> HandlerResult {
        match self.on_error.as_mut() {
            Some(callback) => callback(error),
            None => Ok(()),
        }
    }

    fn on_complete(&mut self, payload: &Value) -> HandlerResult {
        match self.on_complete.as_mut() {
            Some(callback) => callback(payload),
            None => Ok(()),
        }
    }
}

/// Run one callback, containing both error returns and panics.
///
/// Returns `true` if the callback succeeded.
fn guarded<F>(callback: &'static str, f: F) -> bool
where
    F: FnOnce() -> HandlerResult,
{
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(())) => true,
        Ok(Err(fault)) => {
            tracing::warn!(callback, error = %fault, "swap handler failed; continuing");
            false
        }
        Err(panic) => {
            tracing::error!(
                callback,
                panic = %panic_message(panic.as_ref()),
                "swap handler panicked; continuing"
            );
            false
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

pub(crate) fn dispatch_message<H: SwapHandler + ?Sized>(
    handler: &mut H,
    event: &str,
    payload: &Value,
) -> bool {
    guarded("on_message", || handler.on_message(event, payload))
}

pub(crate) fn dispatch_complete<H: SwapHandler + ?Sized>(handler: &mut H, payload: &Value) -> bool {
    guarded("on_complete", || handler.on_complete(payload))
}

pub(crate) fn dispatch_error<H: SwapHandler + ?Sized>(handler: &mut H, error: &StreamError) -> bool {
    guarded("on_error", || handler.on_error(error))
}
