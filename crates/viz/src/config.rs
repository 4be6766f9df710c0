//! Pipeline configuration.
//!
//! All paths are injected here; nothing in the crate reads global state.

use crate::error::{VizError, VizResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Settings shared by the pipeline and its adapters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Where uploaded spreadsheets are stored.
    pub upload_dir: PathBuf,
    /// Where chart images are written.
    pub result_dir: PathBuf,
    /// Where cleaned workbooks are written. Defaults to `upload_dir`.
    pub output_dir: Option<PathBuf>,
    /// Whether to save `{stem}_Cleaned.xlsx` next to the upload.
    pub write_cleaned: bool,
    pub histogram_bins: usize,
    pub bar_top_n: usize,
    pub image_width: u32,
    pub image_height: u32,
    /// Poll interval of the directory watcher.
    pub watch_interval_ms: u64,
    /// Deadline for one processing request.
    pub request_timeout_secs: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("uploads"),
            result_dir: PathBuf::from("results"),
            output_dir: None,
            write_cleaned: true,
            histogram_bins: 15,
            bar_top_n: 10,
            image_width: 1000,
            image_height: 600,
            watch_interval_ms: 500,
            request_timeout_secs: 120,
        }
    }
}

impl PipelineConfig {
    /// Load a configuration from a YAML file. Missing keys keep their defaults.
    pub fn from_yaml_file(path: &Path) -> VizResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| VizError::io(path, e))?;
        Self::from_yaml_str(&text)
            .map_err(|e| VizError::Config(format!("{}: {e}", path.display())))
    }

    /// Parse a configuration from YAML text and validate it.
    pub fn from_yaml_str(text: &str) -> VizResult<Self> {
        let config: Self =
            serde_yaml::from_str(text).map_err(|e| VizError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the renderers cannot work with.
    pub fn validate(&self) -> VizResult<()> {
        if self.histogram_bins == 0 {
            return Err(VizError::Config("histogram_bins must be at least 1".into()));
        }
        if self.bar_top_n == 0 {
            return Err(VizError::Config("bar_top_n must be at least 1".into()));
        }
        if self.image_width < 400 || self.image_height < 300 {
            return Err(VizError::Config(format!(
                "image size {}x{} is too small (minimum 400x300)",
                self.image_width, self.image_height
            )));
        }
        Ok(())
    }

    /// Directory for cleaned workbooks.
    #[must_use]
    pub fn cleaned_dir(&self) -> &Path {
        self.output_dir.as_deref().unwrap_or(&self.upload_dir)
    }

    #[must_use]
    pub fn watch_interval(&self) -> Duration {
        Duration::from_millis(self.watch_interval_ms.max(1))
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Create the upload, result and output directories if missing.
    pub fn ensure_dirs(&self) -> VizResult<()> {
        for dir in [
            self.upload_dir.as_path(),
            self.result_dir.as_path(),
            self.cleaned_dir(),
        ] {
            std::fs::create_dir_all(dir).map_err(|e| VizError::io(dir, e))?;
        }
        Ok(())
    }
}
