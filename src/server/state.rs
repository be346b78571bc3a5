//! Application state management

use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use crate::data::Dataset;
use crate::error::Result;
use crate::export::ModelStore;
use crate::training::{TrainedModel, TrainingConfig};

use super::ServerConfig;

/// Application state shared across handlers.
///
/// Each slot is locked only long enough to read or swap it; nothing
/// orders an upload against a training run already in flight, and the
/// last model written wins.
pub struct AppState {
    pub config: ServerConfig,
    pub training: TrainingConfig,
    pub store: ModelStore,
    pub current_data: RwLock<Option<Dataset>>,
    pub model: RwLock<Option<Arc<TrainedModel>>>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        let store = ModelStore::new(config.model_path.clone());
        Self {
            config,
            training: TrainingConfig::default(),
            store,
            current_data: RwLock::new(None),
            model: RwLock::new(None),
        }
    }

    /// Replace the current dataset
    pub async fn store_dataset(&self, dataset: Dataset) {
        info!(
            name = %dataset.name(),
            rows = dataset.height(),
            columns = dataset.width(),
            "Dataset stored"
        );
        *self.current_data.write().await = Some(dataset);
    }

    /// Snapshot of the current dataset (frames share their buffers)
    pub async fn current_dataset(&self) -> Option<Dataset> {
        self.current_data.read().await.clone()
    }

    pub async fn set_model(&self, model: TrainedModel) -> Arc<TrainedModel> {
        let model = Arc::new(model);
        *self.model.write().await = Some(Arc::clone(&model));
        model
    }

    /// The in-memory model, loading it from the model file on first use
    pub async fn resolve_model(&self) -> Result<Arc<TrainedModel>> {
        if let Some(model) = self.model.read().await.as_ref() {
            return Ok(Arc::clone(model));
        }

        let model = self.store.load()?;
        Ok(self.set_model(model).await)
    }
}
