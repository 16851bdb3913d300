//! Provider registry: resolves a provider id to a live adapter.
//!
//! Lookups never fail. An id nobody registered resolves to a generic
//! OpenAI-compatible adapter named after the id, so orchestration code always
//! receives something it can call.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use lazy_static::lazy_static;

use crate::capabilities::AiProvider;
use crate::options::ProviderSettings;
use crate::providers::{
    Anthropic, Azure, DeepSeek, Fireworks, Google, Groq, Hyperbolic, Mistral, Moonshot, Ollama,
    OpenAi, OpenAiCompatible, OpenAiCompatibleProvider, OpenRouter, Perplexity, SiliconFlow,
    Together, Vendor, XAi,
};

/// Builds an adapter from settings.
pub type ProviderFactory = Arc<dyn Fn(ProviderSettings) -> Arc<dyn AiProvider> + Send + Sync>;

#[derive(Clone)]
pub struct RegistryEntry {
    pub factory: ProviderFactory,
    pub description: String,
}

impl fmt::Debug for RegistryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryEntry")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// A registered id as reported by [`ProviderRegistry::list`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderInfo {
    pub id: String,
    pub description: String,
}

lazy_static! {
    static ref GLOBAL: ProviderRegistry = ProviderRegistry::with_builtins();
}

/// Id → factory map with fallback-on-miss lookup.
///
/// Construct one explicitly and pass it where it is needed; [`ProviderRegistry::global`]
/// exists for call sites that have no better place to get one from.
#[derive(Debug, Default)]
pub struct ProviderRegistry {
    entries: RwLock<HashMap<String, RegistryEntry>>,
}

impl ProviderRegistry {
    /// An empty registry. Every lookup falls back until something is registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry pre-populated with every built-in vendor.
    pub fn with_builtins() -> Self {
        let registry = Self::new();
        registry.register_vendor::<OpenAi>();
        registry.register_vendor::<OpenAiCompatible>();
        registry.register_vendor::<Anthropic>();
        registry.register_vendor::<Google>();
        registry.register_vendor::<Azure>();
        registry.register_vendor::<Ollama>();
        registry.register_vendor::<OpenRouter>();
        registry.register_vendor::<DeepSeek>();
        registry.register_vendor::<Groq>();
        registry.register_vendor::<Mistral>();
        registry.register_vendor::<Together>();
        registry.register_vendor::<XAi>();
        registry.register_vendor::<Moonshot>();
        registry.register_vendor::<Fireworks>();
        registry.register_vendor::<Perplexity>();
        registry.register_vendor::<Hyperbolic>();
        registry.register_vendor::<SiliconFlow>();
        registry
    }

    /// Process-wide default registry, populated with the built-in vendors on first use.
    pub fn global() -> &'static ProviderRegistry {
        &GLOBAL
    }

    /// Insert or replace the entry for `id`.
    pub fn register<F>(&self, id: impl Into<String>, factory: F, description: impl Into<String>)
    where
        F: Fn(ProviderSettings) -> Arc<dyn AiProvider> + Send + Sync + 'static,
    {
        let id = id.into();
        let entry = RegistryEntry {
            factory: Arc::new(factory),
            description: description.into(),
        };
        if self.write().insert(id.clone(), entry).is_some() {
            tracing::debug!("Replaced provider registration: {}", id);
        } else {
            tracing::debug!("Registered provider: {}", id);
        }
    }

    /// Register a built-in vendor under its own id.
    pub fn register_vendor<V: Vendor + 'static>(&self) {
        self.register(
            V::ID,
            |settings| Arc::new(V::create(settings)) as Arc<dyn AiProvider>,
            V::DESCRIPTION,
        );
    }

    /// Remove `id`. Returns whether it was registered.
    pub fn unregister(&self, id: &str) -> bool {
        let removed = self.write().remove(id).is_some();
        if removed {
            tracing::debug!("Unregistered provider: {}", id);
        }
        removed
    }

    pub fn has(&self, id: &str) -> bool {
        self.read().contains_key(id)
    }

    /// Registered ids with their descriptions, sorted by id.
    pub fn list(&self) -> Vec<ProviderInfo> {
        let mut infos: Vec<_> = self
            .read()
            .iter()
            .map(|(id, entry)| ProviderInfo {
                id: id.clone(),
                description: entry.description.clone(),
            })
            .collect();
        infos.sort_by(|a, b| a.id.cmp(&b.id));
        infos
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Resolve `id` to an adapter built from `settings`.
    ///
    /// Unknown ids resolve to [`OpenAiCompatibleProvider::generic`] with a warning;
    /// this is the only unknown-id path.
    pub fn get(&self, id: &str, settings: ProviderSettings) -> Arc<dyn AiProvider> {
        // Clone the factory out so user code never runs under the lock.
        let factory = self.read().get(id).map(|entry| entry.factory.clone());

        match factory {
            Some(factory) => factory(settings),
            None => {
                tracing::warn!(
                    "Provider '{}' is not registered; using a generic OpenAI-compatible adapter",
                    id
                );
                Arc::new(OpenAiCompatibleProvider::generic(id, &settings))
            }
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, RegistryEntry>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, RegistryEntry>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}
