use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of one transition kind, e.g. `"showDetail"`.
///
/// Identifiers are expected to be non-empty; an empty identifier is accepted
/// but will never match anything a real host delivers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransitionId(pub String);

impl TransitionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for TransitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TransitionId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for TransitionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Where a transition landed: a concrete screen, or a container wrapping
/// further destinations.
///
/// The container variants form a closed set so resolution is plain pattern
/// matching rather than open-ended downcasting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination<S> {
    Screen(S),
    /// Navigation stack; the last entry is the visible child.
    Navigation(Vec<Destination<S>>),
    /// Tab strip; a fresh transition lands on the first tab.
    Tabs(Vec<Destination<S>>),
}

impl<S> Destination<S> {
    pub fn screen(screen: S) -> Self {
        Self::Screen(screen)
    }

    /// Navigation container with `screen` as its only (and visible) entry.
    pub fn pushed(screen: S) -> Self {
        Self::Navigation(vec![Self::Screen(screen)])
    }

    pub fn is_container(&self) -> bool {
        matches!(self, Self::Navigation(_) | Self::Tabs(_))
    }
}

/// Names the concrete screen type for diagnostics, without `dyn Any`.
pub trait ScreenInfo {
    fn screen_name(&self) -> &'static str;
}

/// Payload of one "transition is being prepared" notification.
///
/// The identifier is optional because the underlying mechanism can deliver
/// transitions that were never requested through a correlator; those carry
/// no identifier and are ignored.
#[derive(Debug, Clone)]
pub struct TransitionContext<S> {
    pub identifier: Option<TransitionId>,
    pub destination: Destination<S>,
}

impl<S> TransitionContext<S> {
    pub fn new(identifier: impl Into<TransitionId>, destination: Destination<S>) -> Self {
        Self {
            identifier: Some(identifier.into()),
            destination,
        }
    }

    pub fn unidentified(destination: Destination<S>) -> Self {
        Self {
            identifier: None,
            destination,
        }
    }
}
