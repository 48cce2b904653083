use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::pool::KeyPoolInfo;
use crate::app::{ModelOption, ModelsConfig};
use crate::backend::{AssistantBackend, KeyInfoReport};
use crate::locale::Locale;
use crate::utils::SecretaryError;

/// The model and credential the next chat request should use
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSelection {
    pub active_model: String,
    /// `None` defers to the backend's own key rotation
    pub override_credential: Option<String>,
}

/// What the selector footer shows for one model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolSummary {
    pub model: String,
    pub display_name: String,
    pub key_count: usize,
    pub strategy_label: String,
}

/// Holds the active model choice and the backend's key pool metadata
pub struct ModelSelector {
    catalog: Vec<ModelOption>,
    default_model: String,
    key_pools: KeyPoolInfo,
    loaded: bool,
    locale: Locale,
    selection: watch::Sender<ModelSelection>,
}

impl ModelSelector {
    pub fn new(default_model: impl Into<String>, catalog: Vec<ModelOption>, locale: Locale) -> Self {
        let default_model = default_model.into();
        let (selection, _) = watch::channel(ModelSelection {
            active_model: default_model.clone(),
            override_credential: None,
        });

        Self {
            catalog,
            default_model,
            key_pools: KeyPoolInfo::default(),
            loaded: false,
            locale,
            selection,
        }
    }

    pub fn from_config(config: &ModelsConfig, locale: Locale) -> Self {
        Self::new(config.default.clone(), config.available.clone(), locale)
    }

    /// Receiver that always holds the latest selection
    pub fn subscribe(&self) -> watch::Receiver<ModelSelection> {
        self.selection.subscribe()
    }

    pub fn selection(&self) -> ModelSelection {
        self.selection.borrow().clone()
    }

    pub fn active_model(&self) -> String {
        self.selection.borrow().active_model.clone()
    }

    /// Fetch key pool metadata once; failure leaves the pools empty
    pub async fn initialize(&mut self, backend: &dyn AssistantBackend) -> bool {
        let result = backend.key_info().await;
        self.apply_key_info(result)
    }

    /// Install the result of a key-info fetch, returning whether it succeeded
    pub fn apply_key_info(&mut self, result: Result<KeyInfoReport, SecretaryError>) -> bool {
        match result {
            Ok(report) => {
                self.key_pools = KeyPoolInfo::from_report(report);
                self.loaded = true;
                info!(models = self.key_pools.len(), "key pool metadata loaded");
                self.reconcile_active_model();
                true
            }
            Err(e) => {
                warn!(error = %e, "failed to fetch key pool metadata");
                false
            }
        }
    }

    /// Once metadata exists, the active model must be one it knows about
    fn reconcile_active_model(&mut self) {
        if self.key_pools.is_empty() {
            return;
        }
        let active = self.active_model();
        if self.key_pools.contains(&active) {
            return;
        }

        let fallback = if self.key_pools.contains(&self.default_model) {
            Some(self.default_model.clone())
        } else {
            self.key_pools.models().next().map(str::to_string)
        };

        if let Some(model) = fallback {
            warn!(from = %active, to = %model, "active model not offered by backend, switching");
            self.selection.send_modify(|s| s.active_model = model);
        }
    }

    /// Select a model; it does not have to appear in the key pools
    pub fn select_model(&mut self, model: impl Into<String>) {
        let model = model.into();
        if self.loaded && !self.key_pools.contains(&model) {
            debug!(%model, "selected model has no reported key pool");
        }
        self.selection.send_modify(|s| s.active_model = model);
    }

    /// Advance to the next model in the catalog, wrapping around
    pub fn cycle_model(&mut self) -> String {
        if self.catalog.is_empty() {
            return self.active_model();
        }
        let active = self.active_model();
        let next = self
            .catalog
            .iter()
            .position(|m| m.id == active)
            .map(|i| (i + 1) % self.catalog.len())
            .unwrap_or(0);
        let model = self.catalog[next].id.clone();
        self.select_model(model.clone());
        model
    }

    /// Set the override credential; blank means no override
    pub fn set_override_credential(&mut self, value: &str) {
        let credential = (!value.trim().is_empty()).then(|| value.to_string());
        debug!(has_override = credential.is_some(), "override credential updated");
        self.selection.send_modify(|s| s.override_credential = credential);
    }

    /// Human-readable rotation strategy for `model`, empty when unknown
    pub fn describe_strategy(&self, model: &str) -> String {
        self.key_pools
            .get(model)
            .map(|entry| self.locale.strategy_label(&entry.strategy))
            .unwrap_or_default()
    }

    pub fn key_count(&self, model: &str) -> usize {
        self.key_pools.key_count(model)
    }

    pub fn display_name(&self, model: &str) -> String {
        self.catalog
            .iter()
            .find(|m| m.id == model)
            .map(|m| m.display_name.clone())
            .unwrap_or_else(|| model.to_string())
    }

    pub fn summary(&self, model: &str) -> PoolSummary {
        PoolSummary {
            model: model.to_string(),
            display_name: self.display_name(model),
            key_count: self.key_count(model),
            strategy_label: self.describe_strategy(model),
        }
    }

    pub fn active_summary(&self) -> PoolSummary {
        self.summary(&self.active_model())
    }

    pub fn catalog(&self) -> &[ModelOption] {
        &self.catalog
    }

    pub fn key_pools(&self) -> &KeyPoolInfo {
        &self.key_pools
    }

    /// Whether a key-info fetch has succeeded
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }
}
