use crate::error::{Result, StockOpnameError};
use chrono::FixedOffset;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Western Indonesia Time (WIB), UTC+07:00.
pub const DEFAULT_UTC_OFFSET_MINUTES: i32 = 7 * 60;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ReportConfig {
    #[schemars(
        description = "Offset from UTC, in minutes, of the warehouses' local time. Zoned ISO timestamps from the ledger are converted to this wall-clock time before comparison with the cut-off window."
    )]
    pub utc_offset_minutes: i32,

    #[schemars(
        description = "Prefix CSV exports with a UTF-8 byte order mark so spreadsheet tools detect the encoding."
    )]
    pub include_bom: bool,

    #[schemars(description = "Append a TOTAL row after the line items in CSV exports.")]
    pub include_totals_row: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            utc_offset_minutes: DEFAULT_UTC_OFFSET_MINUTES,
            include_bom: true,
            include_totals_row: true,
        }
    }
}

impl ReportConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn validate(&self) -> Result<()> {
        if !(-720..=840).contains(&self.utc_offset_minutes) {
            return Err(StockOpnameError::validation(
                "utc_offset_minutes",
                format!(
                    "{} is outside the valid range -720..=840",
                    self.utc_offset_minutes
                ),
            ));
        }
        Ok(())
    }

    pub fn utc_offset(&self) -> Result<FixedOffset> {
        self.validate()?;
        FixedOffset::east_opt(self.utc_offset_minutes * 60).ok_or_else(|| {
            StockOpnameError::validation(
                "utc_offset_minutes",
                format!("{} is not a representable offset", self.utc_offset_minutes),
            )
        })
    }
}
