// ⏳ Aging Engine - Overdue days, severity level and payment status
//
// Every function here takes the reference date as an argument. The only place
// that looks at the wall clock is AgingEngine::today(), which callers use at the
// edge of the program (CLI, server handlers).

use crate::receivable::{ClassifiedReceivable, OverdueLevel, PaymentStatus, ReceivableRecord};
use crate::stats::ReceivableStats;
use chrono::{Local, NaiveDate};

// ============================================================================
// OVERDUE DAYS
// ============================================================================

/// Whole calendar days from `due_date` to `reference_date`, never negative.
///
/// Both sides are day-granular, so the day difference is already the ceiling
/// of the elapsed time. A due date on or after the reference date yields 0.
pub fn classify_overdue_days(due_date: NaiveDate, reference_date: NaiveDate) -> i64 {
    reference_date
        .signed_duration_since(due_date)
        .num_days()
        .max(0)
}

// ============================================================================
// OVERDUE LEVEL
// ============================================================================

/// Severity bands as (inclusive upper bound, level). Anything above the last
/// bound is `Bad`.
const LEVEL_BANDS: [(i64, OverdueLevel); 3] = [
    (60, OverdueLevel::Normal),
    (90, OverdueLevel::Warning),
    (180, OverdueLevel::Longterm),
];

pub fn classify_overdue_level(overdue_days: i64) -> OverdueLevel {
    LEVEL_BANDS
        .iter()
        .find(|(upper, _)| overdue_days <= *upper)
        .map(|(_, level)| *level)
        .unwrap_or(OverdueLevel::Bad)
}

// ============================================================================
// PAYMENT STATUS
// ============================================================================

/// The three numbers a payment-status rule looks at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusInput {
    pub total_amount: i64,
    pub paid_amount: i64,
    pub overdue_days: i64,
}

type StatusRule = (fn(&StatusInput) -> bool, PaymentStatus);

/// Evaluated top to bottom; the first matching predicate decides.
///
/// The conditions overlap (a fully paid receivable can still be past due), so
/// the order of this table is the business rule.
const PAYMENT_STATUS_RULES: [StatusRule; 4] = [
    (|i: &StatusInput| i.paid_amount >= i.total_amount, PaymentStatus::Paid),
    (|i: &StatusInput| i.overdue_days > 0, PaymentStatus::Overdue),
    (|i: &StatusInput| i.paid_amount > 0, PaymentStatus::Partial),
    (|_: &StatusInput| true, PaymentStatus::Unpaid),
];

pub fn classify_payment_status(total_amount: i64, paid_amount: i64, overdue_days: i64) -> PaymentStatus {
    let input = StatusInput {
        total_amount,
        paid_amount,
        overdue_days,
    };

    PAYMENT_STATUS_RULES
        .iter()
        .find(|(applies, _)| applies(&input))
        .map(|(_, status)| *status)
        .unwrap_or(PaymentStatus::Unpaid)
}

// ============================================================================
// AGING ENGINE
// ============================================================================

/// Classifies receivables against one fixed reference date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgingEngine {
    reference_date: NaiveDate,
}

impl AgingEngine {
    pub fn as_of(reference_date: NaiveDate) -> Self {
        AgingEngine { reference_date }
    }

    /// Engine pinned to the local calendar date at the moment of the call
    pub fn today() -> Self {
        Self::as_of(Local::now().date_naive())
    }

    pub fn reference_date(&self) -> NaiveDate {
        self.reference_date
    }

    pub fn classify(&self, record: &ReceivableRecord) -> ClassifiedReceivable {
        let overdue_days = classify_overdue_days(record.due_date, self.reference_date);

        ClassifiedReceivable {
            record: record.clone(),
            remaining_amount: record.remaining_amount(),
            overdue_days,
            overdue_level: classify_overdue_level(overdue_days),
            payment_status: classify_payment_status(
                record.total_amount,
                record.paid_amount,
                overdue_days,
            ),
        }
    }

    pub fn classify_all(&self, records: &[ReceivableRecord]) -> Vec<ClassifiedReceivable> {
        records.iter().map(|r| self.classify(r)).collect()
    }

    pub fn stats(&self, records: &[ReceivableRecord]) -> ReceivableStats {
        ReceivableStats::from_classified(&self.classify_all(records))
    }
}

// ============================================================================
// TESTS
// ============================================================================
