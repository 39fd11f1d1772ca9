// ↕️ List Sorting - Tri-state column sort shared by every list screen
//
// Clicking a column cycles ascending → descending → cleared. Values compare by
// kind: integers exactly, dates as dates, labels case-insensitively on the
// string the user sees (never on the raw code).

use crate::projects::ProjectSummary;
use crate::receivable::ClassifiedReceivable;
use chrono::NaiveDate;
use serde::de::{value::Error as ValueError, DeserializeOwned, IntoDeserializer};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

// ============================================================================
// SORT STATE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    #[serde(rename = "asc", alias = "ascending")]
    Ascending,
    #[serde(rename = "desc", alias = "descending")]
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState<C> {
    active: Option<(C, SortDirection)>,
}

impl<C: Copy + PartialEq> SortState<C> {
    pub fn new() -> Self {
        SortState { active: None }
    }

    pub fn by(column: C, direction: SortDirection) -> Self {
        SortState {
            active: Some((column, direction)),
        }
    }

    /// Advance the state for a click on `column`.
    ///
    /// A different column always starts ascending; the same column goes
    /// asc → desc → cleared.
    pub fn toggle(&mut self, column: C) {
        self.active = match self.active {
            Some((current, SortDirection::Ascending)) if current == column => {
                Some((column, SortDirection::Descending))
            }
            Some((current, SortDirection::Descending)) if current == column => None,
            _ => Some((column, SortDirection::Ascending)),
        };
    }

    pub fn column(&self) -> Option<C> {
        self.active.map(|(c, _)| c)
    }

    pub fn direction(&self) -> Option<SortDirection> {
        self.active.map(|(_, d)| d)
    }

    pub fn is_cleared(&self) -> bool {
        self.active.is_none()
    }
}

impl<C: Copy + PartialEq> Default for SortState<C> {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// SORT VALUES
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum SortValue {
    /// Amounts and counts, compared without a float round-trip
    Integer(i64),
    Date(Option<NaiveDate>),
    /// Display string, compared case-insensitively
    Label(String),
}

impl SortValue {
    pub fn compare(&self, other: &SortValue) -> Ordering {
        match (self, other) {
            (SortValue::Integer(a), SortValue::Integer(b)) => a.cmp(b),
            (SortValue::Date(a), SortValue::Date(b)) => a.cmp(b),
            (SortValue::Label(a), SortValue::Label(b)) => a.to_lowercase().cmp(&b.to_lowercase()),
            // One column always yields one kind
            _ => Ordering::Equal,
        }
    }
}

pub trait Sortable {
    type Column: Copy + PartialEq;

    fn sort_value(&self, column: Self::Column) -> SortValue;
}

/// Stable sort of `rows` by the active column. A cleared state leaves the
/// rows in their current order.
pub fn sort_rows<T: Sortable>(rows: &mut [T], state: &SortState<T::Column>) {
    let Some((column, direction)) = state.active else {
        return;
    };

    rows.sort_by(|a, b| {
        let ordering = a.sort_value(column).compare(&b.sort_value(column));
        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
}

/// Column or direction from its snake_case name (`due_date`, `desc`, ...)
pub fn parse_sort_key<C: DeserializeOwned>(name: &str) -> Option<C> {
    let deserializer: serde::de::value::StrDeserializer<'_, ValueError> = name.trim().into_deserializer();
    C::deserialize(deserializer).ok()
}

// ============================================================================
// RECEIVABLE COLUMNS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReceivableColumn {
    ClientName,
    ClientType,
    ProjectName,
    DueDate,
    TotalAmount,
    PaidAmount,
    RemainingAmount,
    OverdueDays,
    OverdueLevel,
    PaymentStatus,
}

impl Sortable for ClassifiedReceivable {
    type Column = ReceivableColumn;

    fn sort_value(&self, column: ReceivableColumn) -> SortValue {
        match column {
            ReceivableColumn::ClientName => SortValue::Label(self.record.client_name.clone()),
            ReceivableColumn::ClientType => SortValue::Label(self.record.client_type.label().to_string()),
            ReceivableColumn::ProjectName => SortValue::Label(self.record.project_name.clone()),
            ReceivableColumn::DueDate => SortValue::Date(Some(self.record.due_date)),
            ReceivableColumn::TotalAmount => SortValue::Integer(self.record.total_amount),
            ReceivableColumn::PaidAmount => SortValue::Integer(self.record.paid_amount),
            ReceivableColumn::RemainingAmount => SortValue::Integer(self.remaining_amount),
            ReceivableColumn::OverdueDays => SortValue::Integer(self.overdue_days),
            ReceivableColumn::OverdueLevel => SortValue::Label(self.overdue_level.label().to_string()),
            ReceivableColumn::PaymentStatus => SortValue::Label(self.payment_status.label().to_string()),
        }
    }
}

// ============================================================================
// PROJECT COLUMNS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectColumn {
    ProjectName,
    ClientName,
    ContractDate,
    StartDate,
    EndDate,
    ContractAmount,
    ProgressPercentage,
    AmendmentCount,
    AmendmentMarker,
}

impl Sortable for ProjectSummary {
    type Column = ProjectColumn;

    fn sort_value(&self, column: ProjectColumn) -> SortValue {
        let c = &self.contract;
        match column {
            ProjectColumn::ProjectName => SortValue::Label(c.project_name.clone()),
            ProjectColumn::ClientName => SortValue::Label(c.client_name.clone()),
            ProjectColumn::ContractDate => SortValue::Date(c.contract_date),
            ProjectColumn::StartDate => SortValue::Date(c.start_date),
            ProjectColumn::EndDate => SortValue::Date(c.end_date),
            ProjectColumn::ContractAmount => SortValue::Integer(c.contract_amount),
            ProjectColumn::ProgressPercentage => SortValue::Integer(i64::from(c.progress_percentage)),
            ProjectColumn::AmendmentCount => SortValue::Integer(i64::try_from(self.amendment_count()).unwrap_or(i64::MAX)),
            ProjectColumn::AmendmentMarker => SortValue::Label(c.amendment_marker.label().to_string()),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
