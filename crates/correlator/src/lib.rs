use std::{collections::HashMap, panic::Location, sync::Arc, time::Duration};

use anyhow::Result;
use async_trait::async_trait;
use tokio::{
    sync::{broadcast, Mutex},
    task::JoinHandle,
};
use tracing::{debug, error, warn};

mod host;
mod resolve;

pub use host::TransitionPerformer;
pub use resolve::{visible_screen, ResolveFailure, MAX_CONTAINER_DEPTH};
pub use shared::domain::{Destination, ScreenInfo, TransitionContext, TransitionId};
pub use shared::error::{CorrelatorFault, SourceLocation};

/// Long enough for the host to deliver its prepare hook on the next runtime
/// turn, short enough to flag a forgotten hook almost immediately.
pub const DEFAULT_WATCHDOG: Duration = Duration::from_millis(10);

const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// Completion callback for one requested transition.
pub type PreparedHandler<S> = Box<dyn FnOnce(TransitionContext<S>) + Send + 'static>;

/// The object whose fire-and-forget transition mechanism is being adapted.
///
/// `begin_transition` must eventually cause the host to build a
/// [`TransitionContext`] for the same identifier and feed it back through
/// [`TransitionCorrelator::notify_prepared`], exactly once.
#[async_trait]
pub trait TransitionHost: Send + Sync {
    async fn begin_transition(&self, identifier: &TransitionId) -> Result<()>;
}

/// Observable lifecycle of the correlator's pending state.
#[derive(Debug, Clone)]
pub enum CorrelatorEvent {
    /// The prepare notification matched a pending handler and the handler ran.
    Prepared { identifier: TransitionId },
    /// A re-request for an identifier replaced a still-pending handler.
    HandlerReplaced { identifier: TransitionId },
    Fault(CorrelatorFault),
}

/// Correlates identifier-keyed transition requests with the host's
/// later-delivered prepare notifications.
///
/// Each in-flight request holds exactly one pending handler and one watchdog
/// task. A matching [`notify_prepared`](Self::notify_prepared) cancels the
/// watchdog and runs the handler; a watchdog that fires first removes the
/// pair and emits [`CorrelatorFault::UnhandledTransition`].
pub struct TransitionCorrelator<S> {
    host: Arc<dyn TransitionHost>,
    created_at: SourceLocation,
    watchdog: Duration,
    inner: Arc<Mutex<CorrelatorState<S>>>,
    events: broadcast::Sender<CorrelatorEvent>,
}

struct CorrelatorState<S> {
    handlers: HashMap<TransitionId, PreparedHandler<S>>,
    watchdogs: HashMap<TransitionId, JoinHandle<()>>,
}

impl<S> Clone for TransitionCorrelator<S> {
    fn clone(&self) -> Self {
        Self {
            host: Arc::clone(&self.host),
            created_at: self.created_at,
            watchdog: self.watchdog,
            inner: Arc::clone(&self.inner),
            events: self.events.clone(),
        }
    }
}

impl<S: 'static> TransitionCorrelator<S> {
    #[track_caller]
    pub fn new(host: Arc<dyn TransitionHost>) -> Self {
        Self::with_watchdog(host, DEFAULT_WATCHDOG)
    }

    #[track_caller]
    pub fn with_watchdog(host: Arc<dyn TransitionHost>, watchdog: Duration) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            host,
            created_at: SourceLocation::from_caller(Location::caller()),
            watchdog,
            inner: Arc::new(Mutex::new(CorrelatorState {
                handlers: HashMap::new(),
                watchdogs: HashMap::new(),
            })),
            events,
        }
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<CorrelatorEvent> {
        self.events.subscribe()
    }

    /// Fire-and-forget request. The watchdog is still armed so a transition
    /// whose preparation is never reported gets flagged.
    pub async fn request_transition(&self, identifier: impl Into<TransitionId>) {
        self.request_transition_with(identifier, |_context| {}).await;
    }

    /// Requests the transition identified by `identifier` and registers
    /// `on_prepared` to run with the host's prepare notification.
    ///
    /// Never returns an error to the caller: a host that fails to begin the
    /// transition, or never reports preparation, surfaces through the event
    /// channel as [`CorrelatorFault::UnhandledTransition`].
    pub async fn request_transition_with<F>(
        &self,
        identifier: impl Into<TransitionId>,
        on_prepared: F,
    ) where
        F: FnOnce(TransitionContext<S>) + Send + 'static,
    {
        let identifier = identifier.into();
        if identifier.is_empty() {
            warn!("requested a transition with an empty identifier");
        }
        self.arm(identifier.clone(), Box::new(on_prepared)).await;

        if let Err(err) = self.host.begin_transition(&identifier).await {
            warn!(identifier = %identifier, error = %err, "host failed to begin transition");
        }
    }

    /// Typed variant: unwraps container destinations down to the visible
    /// screen and converts it to `T` before invoking the handler.
    ///
    /// Resolution or conversion failure emits
    /// [`CorrelatorFault::DestinationTypeMismatch`] naming the identifier,
    /// the actual destination and the expected type.
    pub async fn request_transition_expecting<T, F>(
        &self,
        identifier: impl Into<TransitionId>,
        on_prepared: F,
    ) where
        S: ScreenInfo,
        T: TryFrom<S> + 'static,
        F: FnOnce(T) + Send + 'static,
    {
        let identifier = identifier.into();
        let events = self.events.clone();
        let fault_identifier = identifier.clone();

        self.request_transition_with(identifier, move |context: TransitionContext<S>| {
            let expected = std::any::type_name::<T>();
            let fault = match resolve::visible_screen(context.destination) {
                Ok(screen) => {
                    let actual = screen.screen_name();
                    match T::try_from(screen) {
                        Ok(typed) => {
                            on_prepared(typed);
                            return;
                        }
                        Err(_) => CorrelatorFault::DestinationTypeMismatch {
                            identifier: fault_identifier,
                            actual: actual.to_string(),
                            expected,
                        },
                    }
                }
                Err(failure) => CorrelatorFault::DestinationTypeMismatch {
                    identifier: fault_identifier,
                    actual: failure.to_string(),
                    expected,
                },
            };
            error!(%fault, "typed destination resolution failed");
            let _ = events.send(CorrelatorEvent::Fault(fault));
        })
        .await;
    }

    /// The host integration point: must be called from the host's
    /// "preparing to complete a transition" lifecycle step.
    ///
    /// A context without an identifier, or with an identifier nothing is
    /// pending for, is ignored. Otherwise the watchdog is cancelled and the
    /// handler removed before it runs, so the handler can re-request the
    /// same identifier without colliding with stale state.
    pub async fn notify_prepared(&self, context: TransitionContext<S>) {
        let Some(identifier) = context.identifier.clone() else {
            debug!("prepare notification without identifier; ignoring");
            return;
        };

        let handler = {
            let mut state = self.inner.lock().await;
            if let Some(watchdog) = state.watchdogs.remove(&identifier) {
                watchdog.abort();
            }
            state.handlers.remove(&identifier)
        };

        let Some(handler) = handler else {
            debug!(identifier = %identifier, "prepare notification with no pending handler; ignoring");
            return;
        };

        handler(context);
        let _ = self.events.send(CorrelatorEvent::Prepared { identifier });
    }

    pub async fn is_pending(&self, identifier: &TransitionId) -> bool {
        self.inner.lock().await.handlers.contains_key(identifier)
    }

    pub async fn pending_count(&self) -> usize {
        self.inner.lock().await.handlers.len()
    }

    async fn arm(&self, identifier: TransitionId, handler: PreparedHandler<S>) {
        let mut state = self.inner.lock().await;

        if state.handlers.insert(identifier.clone(), handler).is_some() {
            warn!(identifier = %identifier, "re-requested transition; replacing pending handler");
            let _ = self.events.send(CorrelatorEvent::HandlerReplaced {
                identifier: identifier.clone(),
            });
        }
        if let Some(stale) = state.watchdogs.remove(&identifier) {
            stale.abort();
        }

        let watchdog = self.spawn_watchdog(identifier.clone());
        state.watchdogs.insert(identifier, watchdog);
    }

    fn spawn_watchdog(&self, identifier: TransitionId) -> JoinHandle<()> {
        let inner = Arc::clone(&self.inner);
        let events = self.events.clone();
        let created_at = self.created_at;
        let delay = self.watchdog;

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            {
                let mut state = inner.lock().await;
                // A prepare notification that won the race already removed
                // this entry.
                if state.watchdogs.remove(&identifier).is_none() {
                    return;
                }
                state.handlers.remove(&identifier);
            }

            let fault = CorrelatorFault::UnhandledTransition {
                identifier: identifier.clone(),
                created_at,
            };
            error!(identifier = %identifier, %created_at, "transition requested but never prepared");
            let _ = events.send(CorrelatorEvent::Fault(fault));
        })
    }
}

#[cfg(test)]
mod tests;
