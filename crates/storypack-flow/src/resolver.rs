use std::collections::HashMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use storypack_types::ResourceBundle;

use crate::error::{FlowError, FlowResult};
use crate::resolvers;

// ---------------------------------------------------------------------------
// ResourceResolver trait
// ---------------------------------------------------------------------------

/// Contributes the resources referenced by one kind of command.
///
/// Each resolver reads its own payload fields and adds zero or more
/// identifiers to the bundle. Fields it does not know about are ignored.
///
/// The trait is object-safe and `Send + Sync` so resolvers can be shared
/// across extraction tasks.
pub trait ResourceResolver: Send + Sync {
    /// The command kind tag this resolver handles (e.g. `"play_sound"`).
    fn kind(&self) -> &str;

    /// Add every resource `payload` references to `bundle`.
    fn resolve(&self, payload: &Value, bundle: &mut ResourceBundle) -> FlowResult<()>;
}

/// Deserialize a resolver's typed payload, tagging failures with `kind`.
pub fn parse_payload<T: DeserializeOwned>(kind: &str, payload: &Value) -> FlowResult<T> {
    T::deserialize(payload).map_err(|e| FlowError::InvalidPayload {
        kind: kind.to_string(),
        reason: e.to_string(),
    })
}

// ---------------------------------------------------------------------------
// ResolverRegistry
// ---------------------------------------------------------------------------

/// Maps command kind tags to resolvers.
///
/// Lookup of an unregistered kind returns `None`; callers skip such commands.
#[derive(Clone, Default)]
pub struct ResolverRegistry {
    resolvers: HashMap<String, Arc<dyn ResourceResolver>>,
}

impl std::fmt::Debug for ResolverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut kinds = self.kinds();
        kinds.sort_unstable();
        f.debug_struct("ResolverRegistry").field("kinds", &kinds).finish()
    }
}

impl ResolverRegistry {
    /// An empty registry. Every command kind is unknown.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in resolver.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        for resolver in resolvers::builtin() {
            registry.register(resolver);
        }
        registry
    }

    /// Register a resolver under its kind tag, replacing any previous one.
    pub fn register(&mut self, resolver: Arc<dyn ResourceResolver>) {
        self.resolvers.insert(resolver.kind().to_string(), resolver);
    }

    pub fn get(&self, kind: &str) -> Option<&dyn ResourceResolver> {
        self.resolvers.get(kind).map(|r| r.as_ref())
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.resolvers.contains_key(kind)
    }

    pub fn kinds(&self) -> Vec<&str> {
        self.resolvers.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }
}
