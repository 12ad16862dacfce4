use std::fmt;
use std::panic::Location;

use thiserror::Error;

use crate::domain::TransitionId;

/// Call site captured when a correlator is constructed, so a stalled
/// transition can be traced back to the host that requested it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub file: &'static str,
    pub line: u32,
    pub column: u32,
}

impl SourceLocation {
    pub fn from_caller(location: &'static Location<'static>) -> Self {
        Self {
            file: location.file(),
            line: location.line(),
            column: location.column(),
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// Integration bugs surfaced by the correlator.
///
/// Both variants signal a wiring mistake in the host, not a runtime
/// condition to retry. They are delivered as event values so the host can
/// decide whether to log, assert, or abort.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CorrelatorFault {
    #[error(
        "transition '{identifier}' was requested but never prepared \
         (correlator created at {created_at}); forgot to forward the prepare hook?"
    )]
    UnhandledTransition {
        identifier: TransitionId,
        created_at: SourceLocation,
    },

    #[error(
        "transition '{identifier}' resolved to destination '{actual}', \
         expected '{expected}'"
    )]
    DestinationTypeMismatch {
        identifier: TransitionId,
        actual: String,
        expected: &'static str,
    },
}

impl CorrelatorFault {
    pub fn identifier(&self) -> &TransitionId {
        match self {
            Self::UnhandledTransition { identifier, .. }
            | Self::DestinationTypeMismatch { identifier, .. } => identifier,
        }
    }
}
