//! Provider registry: resolves the configured provider name to an instance.

use std::collections::HashMap;
use std::sync::Arc;

use crate::entities::ModelSettings;
use crate::errors::{TasksError, TasksResult};

use super::anthropic::AnthropicProvider;
use super::provider::AIProvider;

/// Registry of AI providers keyed by name.
#[derive(Default)]
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn AIProvider>>,
}

impl ProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the built-in providers, honouring a base URL override.
    pub fn with_defaults(settings: &ModelSettings) -> Self {
        let mut registry = Self::new();

        let mut anthropic = AnthropicProvider::from_env();
        if let Some(url) = &settings.base_url {
            anthropic = anthropic.with_base_url(url.clone());
        }
        registry.register(Arc::new(anthropic));

        registry
    }

    /// Register a provider.
    pub fn register(&mut self, provider: Arc<dyn AIProvider>) {
        self.providers.insert(provider.name().to_string(), provider);
    }

    /// Get a provider by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn AIProvider>> {
        self.providers.get(name).cloned()
    }

    /// Get all registered provider names.
    pub fn provider_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.providers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Get a provider that exists and has credentials.
    pub fn require(&self, name: &str) -> TasksResult<Arc<dyn AIProvider>> {
        let provider = self
            .get(name)
            .ok_or_else(|| TasksError::ProviderNotConfigured {
                provider: format!("unknown provider '{name}' (known: {})", self.provider_names().join(", ")),
            })?;
        if !provider.is_configured() {
            return Err(TasksError::ProviderNotConfigured {
                provider: format!("{name} ({} not set)", provider.api_key_env_var()),
            });
        }
        Ok(provider)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_require() {
        let mut registry = ProviderRegistry::new();
        registry.register(Arc::new(AnthropicProvider::new("key")));

        assert_eq!(registry.provider_names(), vec!["anthropic"]);
        assert!(registry.require("anthropic").is_ok());
    }

    #[test]
    fn test_unknown_provider() {
        let registry = ProviderRegistry::new();
        assert!(matches!(
            registry.require("openai"),
            Err(TasksError::ProviderNotConfigured { .. })
        ));
    }
}
