use std::collections::HashMap;
use std::sync::Arc;

use super::types::Provider;

/// Process-wide mapping from model id to owning provider, built once at
/// startup and shared read-only afterwards.
pub struct ModelRegistry {
    providers: HashMap<String, Arc<dyn Provider>>,
    model_owner: HashMap<String, String>,
    model_order: Vec<String>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self {
            providers: HashMap::new(),
            model_owner: HashMap::new(),
            model_order: Vec::new(),
        }
    }

    /// Register a provider under `name` and claim all of its model ids.
    ///
    /// A model id already claimed by an earlier registration is handed to the
    /// later provider (last write wins); the earlier variant becomes
    /// unaddressable by id, so the collision is logged.
    pub fn register(&mut self, name: &str, provider: Arc<dyn Provider>) {
        for model in provider.models() {
            match self.model_owner.insert(model.clone(), name.to_string()) {
                None => self.model_order.push(model),
                Some(previous) if previous != name => {
                    tracing::warn!(
                        model = %model,
                        shadowed = %previous,
                        owner = %name,
                        "duplicate model id, later registration shadows earlier provider"
                    );
                }
                Some(_) => {}
            }
        }
        self.providers.insert(name.to_string(), provider);
    }

    /// Model ids deduplicated, in first-seen registration order.
    pub fn all_models(&self) -> &[String] {
        &self.model_order
    }

    /// Lexicographically sorted copy of the catalog, for display.
    pub fn sorted_models(&self) -> Vec<String> {
        let mut models = self.model_order.clone();
        models.sort();
        models
    }

    /// Name of the provider owning `model`.
    pub fn resolve(&self, model: &str) -> Option<&str> {
        self.model_owner.get(model).map(String::as_str)
    }

    pub fn provider(&self, name: &str) -> Option<Arc<dyn Provider>> {
        self.providers.get(name).cloned()
    }

    pub fn model_count(&self) -> usize {
        self.model_order.len()
    }

    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::new()
    }
}
