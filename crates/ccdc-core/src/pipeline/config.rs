use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_BANDS, DEFAULT_MILLIS_FIELD};
use crate::error::{CcdcError, Result};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExtractConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    #[serde(default)]
    pub selection: SelectionPolicy,
    #[serde(default)]
    pub layout: ModelLayout,
    #[serde(default)]
    pub export: ExportConfig,
}

impl ExtractConfig {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            selection: SelectionPolicy::default(),
            layout: ModelLayout::default(),
            export: ExportConfig::default(),
        }
    }

    /// Parse a config from TOML text.
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.layout.validate()?;
        self.export.validate()
    }
}

/// How model and sample fields are named in the sampled table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelLayout {
    /// Band prefixes; each band contributes `<band>_coefs`, `<band>_magnitude`
    /// and `<band>_rmse`.
    pub bands: Vec<String>,
    /// Field holding the sample's query date in milliseconds.
    pub millis_field: String,
    /// Explicit metadata fields to carry through. `None` keeps every field
    /// that is not part of the pixel model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata_fields: Option<Vec<String>>,
}

impl Default for ModelLayout {
    fn default() -> Self {
        Self {
            bands: DEFAULT_BANDS.iter().map(|b| b.to_string()).collect(),
            millis_field: DEFAULT_MILLIS_FIELD.to_string(),
            metadata_fields: None,
        }
    }
}

impl ModelLayout {
    pub fn with_bands<S: AsRef<str>>(bands: &[S]) -> Self {
        Self {
            bands: bands.iter().map(|b| b.as_ref().to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.bands.is_empty() {
            return Err(CcdcError::InvalidConfig("band list is empty".into()));
        }
        for (i, band) in self.bands.iter().enumerate() {
            if band.trim().is_empty() {
                return Err(CcdcError::InvalidConfig(format!("band {i} has an empty name")));
            }
            if self.bands[..i].contains(band) {
                return Err(CcdcError::InvalidConfig(format!("band '{band}' listed twice")));
            }
        }
        if self.millis_field.trim().is_empty() {
            return Err(CcdcError::InvalidConfig("millis_field is empty".into()));
        }
        Ok(())
    }
}

/// Rule for choosing which segment applies at a sample's date.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionPolicy {
    /// First segment ending after the date; dates past the last segment use
    /// the last segment.
    #[default]
    FirstEndingAfter,
    /// First segment ending after the date; no segment past the last end.
    FirstEndingAfterStrict,
    /// Segment whose `[tStart, tEnd]` contains the date; dates inside a break
    /// have no segment.
    Intersecting,
}

impl fmt::Display for SelectionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FirstEndingAfter => write!(f, "First Ending After"),
            Self::FirstEndingAfterStrict => write!(f, "First Ending After (strict)"),
            Self::Intersecting => write!(f, "Intersecting"),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Split output into files of at most this many rows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunk_size: Option<usize>,
    /// Write per-sample failures (row, error) to this CSV.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failures: Option<PathBuf>,
    /// Fixed number of decimals for real-valued attributes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub float_precision: Option<usize>,
}

impl ExportConfig {
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == Some(0) {
            return Err(CcdcError::InvalidConfig("chunk_size must be positive".into()));
        }
        if let Some(p) = self.float_precision {
            if p > 17 {
                return Err(CcdcError::InvalidConfig(format!(
                    "float_precision {p} exceeds 17 digits"
                )));
            }
        }
        Ok(())
    }
}
