//! Authentication gate run before any backend call.

use std::sync::Arc;

use kprovider::SessionCapability;

use crate::{CallContext, OrchestrationFailure, OrchestrationHooks};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    pub signed_in: bool,
}

#[derive(Clone)]
pub struct AuthGate {
    session: Arc<dyn SessionCapability>,
    hooks: Arc<dyn OrchestrationHooks>,
}

impl AuthGate {
    pub fn new(session: Arc<dyn SessionCapability>, hooks: Arc<dyn OrchestrationHooks>) -> Self {
        Self { session, hooks }
    }

    /// Ensures a signed-in session, prompting for sign-in at most once.
    ///
    /// Fails with `AuthUnavailable` without touching the network when the
    /// session capability is missing, and with `AuthDenied` when sign-in is
    /// declined or does not take effect.
    pub async fn ensure_session(&self, context: &CallContext) -> Result<Session, OrchestrationFailure> {
        if !self.session.is_available() {
            return Err(OrchestrationFailure::auth_unavailable(
                "session capability is not available",
            ));
        }

        let signed_in = self.query_status().await?;
        self.hooks.on_session_check(context, signed_in);
        if signed_in {
            return Ok(Session { signed_in: true });
        }

        if let Err(error) = self.session.sign_in().await {
            self.hooks.on_sign_in(context, false);
            return Err(OrchestrationFailure::auth_denied(format!(
                "sign-in failed: {error}"
            )));
        }

        let signed_in = self.query_status().await?;
        self.hooks.on_sign_in(context, signed_in);
        if !signed_in {
            return Err(OrchestrationFailure::auth_denied(
                "authentication failed or was cancelled",
            ));
        }

        Ok(Session { signed_in: true })
    }

    pub async fn sign_out(&self) -> Result<(), OrchestrationFailure> {
        self.session
            .sign_out()
            .await
            .map_err(|error| OrchestrationFailure::auth_unavailable(format!("sign-out failed: {error}")))
    }

    async fn query_status(&self) -> Result<bool, OrchestrationFailure> {
        self.session.is_signed_in().await.map_err(|error| {
            OrchestrationFailure::auth_unavailable(format!("session status check failed: {error}"))
        })
    }
}
