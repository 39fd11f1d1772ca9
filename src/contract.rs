// 📄 Contracts - Order records (수주) as exported by the fetch layer
//
// One logical project can own several contract rows: the original contract and
// any number of change orders. They share a project_key.

use anyhow::{ensure, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const MAX_PROGRESS: u8 = 100;

// ============================================================================
// AMENDMENT MARKER
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AmendmentMarker {
    /// Original contract (신규)
    #[default]
    #[serde(alias = "original", alias = "신규")]
    New,

    /// Change order (변경)
    #[serde(alias = "amendment", alias = "변경")]
    Change,
}

impl AmendmentMarker {
    pub fn is_original(&self) -> bool {
        matches!(self, AmendmentMarker::New)
    }

    pub fn label(&self) -> &'static str {
        match self {
            AmendmentMarker::New => "신규",
            AmendmentMarker::Change => "변경",
        }
    }
}

// ============================================================================
// CONTRACT RECORD
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractRecord {
    #[serde(default = "default_uuid")]
    pub id: String,

    /// Grouping identifier shared by an original contract and its change orders.
    /// Missing or blank keys make the record an orphan.
    #[serde(default)]
    pub project_key: Option<String>,

    #[serde(default)]
    pub project_name: String,

    #[serde(default)]
    pub client_name: String,

    #[serde(default)]
    pub amendment_marker: AmendmentMarker,

    #[serde(default)]
    pub contract_date: Option<NaiveDate>,

    #[serde(default)]
    pub start_date: Option<NaiveDate>,

    #[serde(default)]
    pub end_date: Option<NaiveDate>,

    pub contract_amount: i64,

    /// 0 - 100
    #[serde(default)]
    pub progress_percentage: u8,
}

fn default_uuid() -> String {
    uuid::Uuid::new_v4().to_string()
}

impl ContractRecord {
    pub fn new(project_key: &str, project_name: &str, contract_amount: i64) -> Self {
        ContractRecord {
            id: default_uuid(),
            project_key: Some(project_key.to_string()),
            project_name: project_name.to_string(),
            client_name: String::new(),
            amendment_marker: AmendmentMarker::New,
            contract_date: None,
            start_date: None,
            end_date: None,
            contract_amount,
            progress_percentage: 0,
        }
    }

    /// Same record marked as a change order
    pub fn amendment(mut self) -> Self {
        self.amendment_marker = AmendmentMarker::Change;
        self
    }

    pub fn with_progress(mut self, progress_percentage: u8) -> Self {
        self.progress_percentage = progress_percentage;
        self
    }

    /// Trimmed project key, or None when the record cannot be grouped
    pub fn grouping_key(&self) -> Option<&str> {
        self.project_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    pub fn is_amendment(&self) -> bool {
        !self.amendment_marker.is_original()
    }

    /// Field ranges the CSV schema cannot express
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.progress_percentage <= MAX_PROGRESS,
            "progress_percentage {} of contract {} is outside 0-{}",
            self.progress_percentage,
            self.id,
            MAX_PROGRESS
        );
        Ok(())
    }
}
