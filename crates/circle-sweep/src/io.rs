//! JSON configuration and report helpers.

use std::fs;
use std::path::{Path, PathBuf};

use circle_sweep_blob::{Alliance, BallObservation, MagazineReading, MaskParams};
use circle_sweep_hough::EdgeParams;
use serde::{Deserialize, Serialize};

use crate::review::{AmbiguityPolicy, ReviewVerdict};
use crate::sweep::{LogEntry, SweepConfig, SweepConfigError, SweepOutcome, SweepStats};

#[derive(thiserror::Error, Debug)]
pub enum SweepIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Image(#[from] image::ImageError),
}

/// Everything a sweep run needs besides the image itself.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepRunConfig {
    pub image_path: Option<String>,
    pub sweep: SweepConfig,
    pub edges: EdgeParams,
    /// Gaussian sigma applied to the gray frame before edge detection.
    pub blur_sigma: Option<f32>,
    pub output_dir: Option<String>,
    pub report_path: Option<String>,
    pub on_ambiguous: AmbiguityPolicy,
}

impl SweepRunConfig {
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, SweepIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), SweepIoError> {
        write_json_pretty(self, path)
    }

    pub fn validate(&self) -> Result<(), SweepConfigError> {
        self.sweep.validate()?;
        self.edges.validate()?;
        if let Some(sigma) = self.blur_sigma {
            if !sigma.is_finite() || sigma <= 0.0 {
                return Err(SweepConfigError::InvalidBlur(sigma));
            }
        }
        Ok(())
    }

    /// Directory review frames go to.
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("circle_sweep_review"))
    }
}

/// Where each log entry ended up after review.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub index: usize,
    pub verdict: ReviewVerdict,
    #[serde(default)]
    pub frame_path: Option<String>,
}

/// Summary of one sweep run, written with `--report`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SweepReport {
    pub image_path: String,
    pub width: u32,
    pub height: u32,
    pub config: SweepRunConfig,
    pub stats: SweepStats,
    pub entries: Vec<LogEntry>,
    pub best: Option<LogEntry>,
    #[serde(default)]
    pub review: Vec<ReviewRecord>,
}

impl SweepReport {
    pub fn new(
        image_path: impl Into<String>,
        dimensions: (u32, u32),
        config: &SweepRunConfig,
        outcome: &SweepOutcome,
    ) -> Self {
        Self {
            image_path: image_path.into(),
            width: dimensions.0,
            height: dimensions.1,
            config: config.clone(),
            stats: outcome.stats,
            entries: outcome.log.entries().to_vec(),
            best: outcome.log.best().cloned(),
            review: Vec::new(),
        }
    }

    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, SweepIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), SweepIoError> {
        write_json_pretty(self, path)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BallReport {
    pub image_path: String,
    pub alliance: Alliance,
    pub mask: MaskParams,
    pub observation: BallObservation,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MagazineFrame {
    pub image_path: String,
    pub reading: MagazineReading,
}

/// Write any serializable value as pretty JSON, creating parent directories.
pub fn write_json_pretty<T: Serialize + ?Sized>(
    value: &T,
    path: impl AsRef<Path>,
) -> Result<(), SweepIoError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}
