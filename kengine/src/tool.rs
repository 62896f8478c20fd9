//! The contract every AI tool implements.

use kcommon::BoxFuture;
use kprovider::MediaKind;

use crate::{Invocation, LocalSpeechInvocation, OrchestrationFailure};

/// Where a tool goes when its primary attempt fails recoverably.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallbackRoute {
    /// Rerun the whole pipeline on the secondary generation backend.
    #[default]
    Secondary,
    /// Play the result through the native speech capability.
    LocalSpeech,
    Disabled,
}

pub trait Tool: Send + Sync {
    type Output: Send;

    /// Stable name used in trace contexts and metrics labels.
    fn kind(&self) -> &'static str;

    /// Rejects input before any backend is contacted.
    fn validate_input(&self) -> Result<(), String> {
        Ok(())
    }

    fn fallback_route(&self) -> FallbackRoute {
        FallbackRoute::Secondary
    }

    /// Media the pipeline renders. A secondary backend that cannot produce it
    /// is never tried.
    fn required_media(&self) -> Option<MediaKind> {
        None
    }

    /// Runs the full pipeline on one backend. Every step goes through
    /// `invocation`, so a step failure ends the attempt.
    fn run<'a>(
        &'a self,
        invocation: &'a mut Invocation,
    ) -> BoxFuture<'a, Result<Self::Output, OrchestrationFailure>>;

    fn run_local<'a>(
        &'a self,
        _speech: &'a LocalSpeechInvocation,
    ) -> BoxFuture<'a, Result<Self::Output, OrchestrationFailure>> {
        let kind = self.kind();
        Box::pin(async move {
            Err(OrchestrationFailure::backend_rejected(format!(
                "{kind} has no local speech route"
            )))
        })
    }
}
