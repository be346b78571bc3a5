//! Binary persistence of the trained model

use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{PredictorError, Result};
use crate::training::TrainedModel;

/// Bumped whenever the layout of [`TrainedModel`] changes
pub const FORMAT_VERSION: u32 = 1;

/// On-disk envelope around the model
#[derive(Debug, Serialize, Deserialize)]
struct SerializedModel {
    format_version: u32,
    crate_version: String,
    model: TrainedModel,
}

/// The single model file shared by every request and by restarts
#[derive(Debug, Clone)]
pub struct ModelStore {
    path: PathBuf,
}

impl ModelStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Write the model, replacing any previous file wholesale
    pub fn save(&self, model: &TrainedModel) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let envelope = SerializedModel {
            format_version: FORMAT_VERSION,
            crate_version: env!("CARGO_PKG_VERSION").to_string(),
            model: model.clone(),
        };

        let file = File::create(&self.path).map_err(|e| {
            PredictorError::SerializationError(format!(
                "Failed to create model file {}: {}",
                self.path.display(),
                e
            ))
        })?;
        let mut writer = BufWriter::new(file);
        bincode::serialize_into(&mut writer, &envelope)?;
        writer.flush()?;

        info!(path = %self.path.display(), "Model persisted");
        Ok(())
    }

    /// Read the model back; a missing file is reported as `ModelUnavailable`
    pub fn load(&self) -> Result<TrainedModel> {
        if !self.exists() {
            return Err(PredictorError::ModelUnavailable(self.path.display().to_string()));
        }

        let file = File::open(&self.path)?;
        let envelope: SerializedModel = bincode::deserialize_from(BufReader::new(file))?;

        if envelope.format_version != FORMAT_VERSION {
            return Err(PredictorError::SerializationError(format!(
                "Unsupported model format version {} (written by {}), expected {}",
                envelope.format_version, envelope.crate_version, FORMAT_VERSION
            )));
        }

        info!(path = %self.path.display(), trained_at = %envelope.model.trained_at, "Model loaded");
        Ok(envelope.model)
    }
}
