//! Shared utilities and strongly-typed common values for workspace crates.
//!
//! ```rust
//! use kcommon::{MetadataMap, RequestOptions, TraceId};
//!
//! let trace = TraceId::new("trace-1");
//! let mut metadata = MetadataMap::new();
//! metadata.insert("tool".to_string(), "translator".to_string());
//!
//! let options = RequestOptions::default().with_model("gpt-4o").with_locale("fr-FR");
//! assert_eq!(trace.to_string(), "trace-1");
//! assert_eq!(options.model.as_deref(), Some("gpt-4o"));
//! ```

pub mod future {
    //! Shared async future aliases.
    //!
    //! ```rust
    //! use kcommon::BoxFuture;
    //!
    //! fn str_len<'a>(value: &'a str) -> BoxFuture<'a, usize> {
    //!     Box::pin(async move { value.len() })
    //! }
    //!
    //! let _future = str_len("hello");
    //! ```

    use std::future::Future;
    use std::pin::Pin;

    pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
}

pub mod context {
    //! Shared metadata and the trace identifier threaded through one orchestration.
    //!
    //! ```rust
    //! use kcommon::{MetadataMap, TraceId};
    //!
    //! let trace = TraceId::from("trace-42");
    //! let mut metadata = MetadataMap::new();
    //! metadata.insert("env".to_string(), "test".to_string());
    //!
    //! assert_eq!(trace.as_str(), "trace-42");
    //! ```

    use std::collections::HashMap;
    use std::fmt::{Display, Formatter};
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};

    pub type MetadataMap = HashMap<String, String>;

    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    pub struct TraceId(String);

    impl TraceId {
        pub fn new(value: impl Into<String>) -> Self {
            Self(value.into())
        }

        /// Builds a process-unique id from the wall clock and a counter.
        pub fn generate() -> Self {
            static COUNTER: AtomicU64 = AtomicU64::new(0);

            let millis = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|elapsed| elapsed.as_millis())
                .unwrap_or_default();
            let sequence = COUNTER.fetch_add(1, Ordering::Relaxed);
            Self(format!("klutz-{millis:x}-{sequence}"))
        }

        pub fn as_str(&self) -> &str {
            self.0.as_str()
        }
    }

    impl Display for TraceId {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            f.write_str(&self.0)
        }
    }

    impl From<String> for TraceId {
        fn from(value: String) -> Self {
            Self(value)
        }
    }

    impl From<&str> for TraceId {
        fn from(value: &str) -> Self {
            Self(value.to_string())
        }
    }
}

pub mod options {
    //! Per-request options shared by tool requests and backend calls.
    //!
    //! ```rust
    //! use kcommon::RequestOptions;
    //!
    //! let options = RequestOptions::default()
    //!     .with_model("gpt-4o")
    //!     .with_locale("de-DE")
    //!     .with_temperature(0.2)
    //!     .with_max_tokens(512);
    //!
    //! assert_eq!(options.locale.as_deref(), Some("de-DE"));
    //! assert_eq!(options.temperature, Some(0.2));
    //! assert_eq!(options.max_tokens, Some(512));
    //! ```

    #[derive(Debug, Clone, PartialEq, Default)]
    pub struct RequestOptions {
        pub model: Option<String>,
        pub locale: Option<String>,
        pub temperature: Option<f32>,
        pub max_tokens: Option<u32>,
    }

    impl RequestOptions {
        pub fn with_model(mut self, model: impl Into<String>) -> Self {
            self.model = Some(model.into());
            self
        }

        pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
            self.locale = Some(locale.into());
            self
        }

        pub fn with_temperature(mut self, temperature: f32) -> Self {
            self.temperature = Some(temperature);
            self
        }

        pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
            self.max_tokens = Some(max_tokens);
            self
        }

        /// Returns the configured model, or `default` when none was set.
        pub fn model_or<'a>(&'a self, default: &'a str) -> &'a str {
            self.model
                .as_deref()
                .filter(|model| !model.trim().is_empty())
                .unwrap_or(default)
        }
    }
}

pub mod registry {
    //! Generic registry map wrapper used by runtime registries.
    //!
    //! ```rust
    //! use kcommon::Registry;
    //!
    //! let mut registry = Registry::new();
    //! registry.insert("alpha".to_string(), 1_u32);
    //!
    //! assert_eq!(registry.get("alpha"), Some(&1));
    //! assert!(registry.contains_key("alpha"));
    //! ```

    use std::borrow::Borrow;
    use std::collections::HashMap;
    use std::hash::Hash;

    #[derive(Debug, Clone)]
    pub struct Registry<K, V> {
        items: HashMap<K, V>,
    }

    impl<K, V> Default for Registry<K, V>
    where
        K: Eq + Hash,
    {
        fn default() -> Self {
            Self {
                items: HashMap::new(),
            }
        }
    }

    impl<K, V> Registry<K, V>
    where
        K: Eq + Hash,
    {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn insert(&mut self, key: K, value: V) -> Option<V> {
            self.items.insert(key, value)
        }

        pub fn get<Q>(&self, key: &Q) -> Option<&V>
        where
            K: Borrow<Q>,
            Q: Eq + Hash + ?Sized,
        {
            self.items.get(key)
        }

        pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
        where
            K: Borrow<Q>,
            Q: Eq + Hash + ?Sized,
        {
            self.items.remove(key)
        }

        pub fn contains_key<Q>(&self, key: &Q) -> bool
        where
            K: Borrow<Q>,
            Q: Eq + Hash + ?Sized,
        {
            self.items.contains_key(key)
        }

        pub fn keys(&self) -> impl Iterator<Item = &K> {
            self.items.keys()
        }

        pub fn len(&self) -> usize {
            self.items.len()
        }

        pub fn is_empty(&self) -> bool {
            self.items.is_empty()
        }
    }
}

pub use context::{MetadataMap, TraceId};
pub use future::BoxFuture;
pub use options::RequestOptions;
pub use registry::Registry;

#[cfg(test)]
mod tests {
    use super::{RequestOptions, Registry, TraceId};

    #[test]
    fn trace_id_round_trips_strings() {
        let trace = TraceId::from("trace-1");

        assert_eq!(trace.as_str(), "trace-1");
        assert_eq!(trace.to_string(), "trace-1");
    }

    #[test]
    fn generated_trace_ids_are_distinct() {
        let first = TraceId::generate();
        let second = TraceId::generate();

        assert_ne!(first, second);
        assert!(first.as_str().starts_with("klutz-"));
    }

    #[test]
    fn request_options_model_or_ignores_blank_models() {
        let blank = RequestOptions::default().with_model("   ");
        assert_eq!(blank.model_or("gpt-4o"), "gpt-4o");

        let explicit = RequestOptions::default().with_model("llama3.2");
        assert_eq!(explicit.model_or("gpt-4o"), "llama3.2");
        assert_eq!(RequestOptions::default().model_or("gpt-4o"), "gpt-4o");
    }

    #[test]
    fn generic_registry_basic_lifecycle() {
        let mut registry = Registry::new();
        assert!(registry.is_empty());

        registry.insert("alpha".to_string(), 1_u32);
        assert_eq!(registry.get("alpha"), Some(&1));
        assert!(registry.contains_key("alpha"));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.keys().count(), 1);

        let removed = registry.remove("alpha");
        assert_eq!(removed, Some(1));
        assert!(registry.is_empty());
    }
}
