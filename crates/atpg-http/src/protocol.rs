//! Per-call request / refresh / retry automaton.
//!
//! Every logical call walks this graph from [`Phase::Initial`] to one of the
//! terminal phases. No edge leads back to an earlier phase, so a call sends
//! the original request once, refreshes at most once and retries at most
//! once.
//!
//! ```text
//! Initial -> Sent -> Success
//!                 -> Failed
//!                 -> Unauthorized -> Refreshing -> RetrySent -> Success | Failed
//!                                               -> RefreshFailed -> Failed
//! ```

use serde_json::Value;

use atpg_core::{BearerToken, Error};

/// Payload-free view of a call's state, used for tracing and edge checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Initial,
    Sent,
    Unauthorized,
    Refreshing,
    RetrySent,
    RefreshFailed,
    Success,
    Failed,
}

impl Phase {
    pub const ALL: [Phase; 8] = [
        Phase::Initial,
        Phase::Sent,
        Phase::Unauthorized,
        Phase::Refreshing,
        Phase::RetrySent,
        Phase::RefreshFailed,
        Phase::Success,
        Phase::Failed,
    ];

    /// The phases reachable in one transition.
    ///
    /// `Initial` and `Refreshing` may fail directly when the request cannot
    /// be sent at all.
    pub fn successors(self) -> &'static [Phase] {
        match self {
            Phase::Initial => &[Phase::Sent, Phase::Failed],
            Phase::Sent => &[Phase::Success, Phase::Unauthorized, Phase::Failed],
            Phase::Unauthorized => &[Phase::Refreshing],
            Phase::Refreshing => &[Phase::RetrySent, Phase::RefreshFailed, Phase::Failed],
            Phase::RetrySent => &[Phase::Success, Phase::Failed],
            Phase::RefreshFailed => &[Phase::Failed],
            Phase::Success | Phase::Failed => &[],
        }
    }

    pub fn is_terminal(self) -> bool {
        self.successors().is_empty()
    }

    /// Whether entering this phase put a request for the caller on the wire.
    pub fn sends_request(self) -> bool {
        matches!(self, Phase::Sent | Phase::RetrySent)
    }
}

/// A call's state together with the data the next transition needs.
pub(crate) enum Call {
    Initial,
    Sent {
        response: reqwest::Response,
        credential: Option<BearerToken>,
    },
    Unauthorized {
        rejected: BearerToken,
    },
    Refreshing {
        rejected: BearerToken,
    },
    RetrySent(reqwest::Response),
    RefreshFailed,
    Success(Value),
    Failed(Error),
}

impl Call {
    pub(crate) fn phase(&self) -> Phase {
        match self {
            Call::Initial => Phase::Initial,
            Call::Sent { .. } => Phase::Sent,
            Call::Unauthorized { .. } => Phase::Unauthorized,
            Call::Refreshing { .. } => Phase::Refreshing,
            Call::RetrySent(_) => Phase::RetrySent,
            Call::RefreshFailed => Phase::RefreshFailed,
            Call::Success(_) => Phase::Success,
            Call::Failed(_) => Phase::Failed,
        }
    }
}

impl From<atpg_core::Result<Value>> for Call {
    fn from(result: atpg_core::Result<Value>) -> Self {
        match result {
            Ok(value) => Call::Success(value),
            Err(err) => Call::Failed(err),
        }
    }
}
