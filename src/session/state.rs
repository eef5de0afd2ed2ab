//! Life cycle of one swap session.

use std::fmt;

/// Session state.
///
/// ```text
/// Init ──ok response──▶ Streaming ──done──────────▶ Completed
///   │                      │ ├─end of body────────▶ ClosedNoComplete
///   │                      │ └─read error─────────▶ Failed
///   ├─rejected / non-2xx───┼──────────────────────▶ Failed
///   └─cancelled────────────┴──────────────────────▶ Cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Request not sent yet
    #[default]
    Init,
    /// Response accepted, blocks being decoded
    Streaming,
    /// Terminal `done` event dispatched
    Completed,
    /// Body ended without a `done` event
    ClosedNoComplete,
    /// Transport or read failure, reported through `on_error`
    Failed,
    /// Stopped through the cancel handle
    Cancelled,
}

impl SessionState {
    /// Check if the session has finished.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SessionState::Init | SessionState::Streaming)
    }

    /// Check if the job reported completion.
    pub fn is_success(&self) -> bool {
        matches!(self, SessionState::Completed)
    }

    /// Whether `next` is a legal successor of this state.
    pub fn can_transition_to(&self, next: SessionState) -> bool {
        use SessionState::*;
        matches!(
            (self, next),
            (Init, Streaming)
                | (Init, Failed)
                | (Init, Cancelled)
                | (Streaming, Streaming)
                | (Streaming, Completed)
                | (Streaming, ClosedNoComplete)
                | (Streaming, Failed)
                | (Streaming, Cancelled)
        )
    }

    /// Move to `next`, logging the transition.
    pub(crate) fn advance(&mut self, next: SessionState) {
        debug_assert!(
            self.can_transition_to(next),
            "illegal session transition {} -> {}",
            self,
            next
        );
        tracing::debug!(from = %self, to = %next, "session state");
        *self = next;
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Init => "init",
            SessionState::Streaming => "streaming",
            SessionState::Completed => "completed",
            SessionState::ClosedNoComplete => "closed_no_complete",
            SessionState::Failed => "failed",
            SessionState::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}
