//! Export settings.

use joinery_math::Tolerance;
use serde::{Deserialize, Serialize};

use crate::{BtlxError, Result};

/// Precision, tolerance and header metadata for one export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BtlxSettings {
    /// Decimals for lengths and positions.
    pub point_precision: usize,
    /// Decimals for angles.
    pub angle_precision: usize,
    /// Geometric tolerances used while deriving processes.
    pub tolerance: Tolerance,
    /// `Project/@Name`.
    pub project_name: String,
    /// `InitialExportProgram/@CompanyName`.
    pub company_name: String,
    /// `InitialExportProgram/@ProgramName`.
    pub program_name: String,
    /// `InitialExportProgram/@ProgramVersion`.
    pub program_version: String,
    /// `InitialExportProgram/@ComputerName`.
    pub computer_name: String,
    /// `InitialExportProgram/@UserName`.
    pub user_name: String,
    /// `InitialExportProgram/@FileName`.
    pub file_name: String,
    /// `InitialExportProgram/@Comment`.
    pub comment: String,
    /// Export date; left empty when unset so output stays reproducible.
    pub date: Option<String>,
    /// Export time; left empty when unset.
    pub time: Option<String>,
    /// Write each blank as an `IndexedFaceSet`.
    pub emit_shape: bool,
}

impl Default for BtlxSettings {
    fn default() -> Self {
        Self {
            point_precision: 3,
            angle_precision: 3,
            tolerance: Tolerance::DEFAULT,
            project_name: "joinery".into(),
            company_name: String::new(),
            program_name: "joinery".into(),
            program_version: env!("CARGO_PKG_VERSION").into(),
            computer_name: String::new(),
            user_name: String::new(),
            file_name: String::new(),
            comment: String::new(),
            date: None,
            time: None,
            emit_shape: true,
        }
    }
}

impl BtlxSettings {
    /// Parse settings from TOML; absent keys keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let settings: Self = toml::from_str(text).map_err(|e| BtlxError::Settings(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject settings that cannot produce a valid document.
    pub fn validate(&self) -> Result<()> {
        if self.point_precision > 12 || self.angle_precision > 12 {
            return Err(BtlxError::Settings("precision must be at most 12 decimals".into()));
        }
        if !(self.tolerance.linear > 0.0 && self.tolerance.angular > 0.0) {
            return Err(BtlxError::Settings("tolerances must be positive".into()));
        }
        Ok(())
    }
}
