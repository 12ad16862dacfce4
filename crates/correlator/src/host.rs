use async_trait::async_trait;
use shared::domain::{ScreenInfo, TransitionContext, TransitionId};

use crate::TransitionCorrelator;

/// Gives any host type that owns a correlator the full request surface plus
/// the prepare-hook forwarding, without an inheritance hierarchy: implement
/// [`correlator`](Self::correlator) and the rest comes along.
///
/// The host's underlying lifecycle must route its "preparing to complete a
/// transition" step into [`prepare_for_transition`](Self::prepare_for_transition),
/// once per transition.
#[async_trait]
pub trait TransitionPerformer<S: Send + 'static>: Send + Sync {
    fn correlator(&self) -> &TransitionCorrelator<S>;

    async fn perform<I>(&self, identifier: I)
    where
        I: Into<TransitionId> + Send + 'static,
    {
        self.correlator().request_transition(identifier).await;
    }

    async fn perform_with<I, F>(&self, identifier: I, on_prepared: F)
    where
        I: Into<TransitionId> + Send + 'static,
        F: FnOnce(TransitionContext<S>) + Send + 'static,
    {
        self.correlator()
            .request_transition_with(identifier, on_prepared)
            .await;
    }

    async fn perform_expecting<I, T, F>(&self, identifier: I, on_prepared: F)
    where
        S: ScreenInfo,
        I: Into<TransitionId> + Send + 'static,
        T: TryFrom<S> + 'static,
        F: FnOnce(T) + Send + 'static,
    {
        self.correlator()
            .request_transition_expecting(identifier, on_prepared)
            .await;
    }

    async fn prepare_for_transition(&self, context: TransitionContext<S>) {
        self.correlator().notify_prepared(context).await;
    }
}
