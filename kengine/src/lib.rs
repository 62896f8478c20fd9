//! Authentication gating, validated invocation pipelines, and fallback for AI tools.
//!
//! A [`Tool`] describes its pipeline against an [`Invocation`]; the
//! [`Orchestrator`] gates it behind a signed-in session, runs it on the
//! primary backend, and reruns it once on the secondary route when the
//! primary fails recoverably. Every call resolves to one
//! [`OrchestrationOutcome`].
//!
//! ```rust
//! use kengine::{ErrorKind, to_user_message};
//!
//! assert!(ErrorKind::Network.is_recoverable());
//! assert!(!ErrorKind::AuthDenied.is_recoverable());
//! assert!(!to_user_message(ErrorKind::Unknown).is_empty());
//! ```

mod auth;
mod classify;
mod error;
mod fallback;
mod hooks;
mod invocation;
mod orchestrator;
mod outcome;
mod tool;

pub mod prelude;

pub use auth::{AuthGate, Session};
pub use classify::{FailureSignal, classify, classify_provider_error};
pub use error::{ErrorKind, OrchestrationFailure, to_user_message};
pub use fallback::with_fallback;
pub use hooks::{CallContext, CallOperation, NoopOrchestrationHooks, OrchestrationHooks, OutcomeKind};
pub use invocation::{AttemptRole, Invocation, LocalSpeechInvocation};
pub use orchestrator::{Orchestrator, OrchestratorBuilder};
pub use outcome::OrchestrationOutcome;
pub use tool::{FallbackRoute, Tool};

pub use kcontract::Contract;
