//! Production-friendly observability hooks for orchestration calls.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use kobserve::{
//!     CompositeHooks, MetricsObservabilityHooks, SafeOrchestrationHooks,
//!     TracingObservabilityHooks,
//! };
//!
//! let _hooks = SafeOrchestrationHooks::new(
//!     CompositeHooks::new()
//!         .with(Arc::new(TracingObservabilityHooks))
//!         .with(Arc::new(MetricsObservabilityHooks)),
//! );
//! ```

mod composite_hooks;
mod metrics_hooks;
mod safe_hooks;
mod tracing_hooks;

pub use composite_hooks::CompositeHooks;
pub use metrics_hooks::MetricsObservabilityHooks;
pub use safe_hooks::SafeOrchestrationHooks;
pub use tracing_hooks::TracingObservabilityHooks;

pub mod prelude {
    pub use crate::{
        CompositeHooks, MetricsObservabilityHooks, SafeOrchestrationHooks,
        TracingObservabilityHooks,
    };
}
