use shared::domain::Destination;
use thiserror::Error;

/// Containers nested deeper than this are treated as a wiring bug rather
/// than walked forever.
pub const MAX_CONTAINER_DEPTH: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ResolveFailure {
    /// The container chain bottomed out without reaching a screen.
    #[error("none found")]
    EmptyContainer,
    #[error("container nesting deeper than 32 levels")]
    DepthExceeded,
}

/// Unwraps container destinations until a concrete screen is reached:
/// navigation stacks expose their top entry, tab strips their first tab.
/// Containers resolve transitively, up to [`MAX_CONTAINER_DEPTH`] levels.
pub fn visible_screen<S>(destination: Destination<S>) -> Result<S, ResolveFailure> {
    visible_screen_at(destination, 0)
}

fn visible_screen_at<S>(destination: Destination<S>, depth: usize) -> Result<S, ResolveFailure> {
    if depth > MAX_CONTAINER_DEPTH {
        return Err(ResolveFailure::DepthExceeded);
    }

    match destination {
        Destination::Screen(screen) => Ok(screen),
        Destination::Navigation(mut stack) => match stack.pop() {
            Some(top) => visible_screen_at(top, depth + 1),
            None => Err(ResolveFailure::EmptyContainer),
        },
        Destination::Tabs(tabs) => match tabs.into_iter().next() {
            Some(first) => visible_screen_at(first, depth + 1),
            None => Err(ResolveFailure::EmptyContainer),
        },
    }
}
