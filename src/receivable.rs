// 💰 Receivables - Outstanding amounts owed by clients (채권)
//
// A receivable is read from the fetch layer as a plain record. Everything that
// depends on "today" (overdue days, level, status) is derived by the aging engine
// and lives on ClassifiedReceivable, never on the input record.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ============================================================================
// CLIENT TYPE
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientType {
    /// Government / public-sector client (관급)
    #[serde(alias = "관급", alias = "government")]
    Public,

    /// Private-sector client (민간)
    #[serde(alias = "민간")]
    Private,

    /// Anything the export did not label
    #[default]
    #[serde(other)]
    Other,
}

impl ClientType {
    pub const ALL: [ClientType; 3] = [ClientType::Public, ClientType::Private, ClientType::Other];

    pub fn label(&self) -> &'static str {
        match self {
            ClientType::Public => "관급",
            ClientType::Private => "민간",
            ClientType::Other => "기타",
        }
    }
}

// ============================================================================
// OVERDUE LEVEL
// ============================================================================

/// Severity bucket derived from days past due.
///
/// Variants are declared in severity order, so `Ord` compares severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverdueLevel {
    Normal,
    Warning,
    Longterm,
    Bad,
}

impl OverdueLevel {
    pub const ALL: [OverdueLevel; 4] = [
        OverdueLevel::Normal,
        OverdueLevel::Warning,
        OverdueLevel::Longterm,
        OverdueLevel::Bad,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OverdueLevel::Normal => "normal",
            OverdueLevel::Warning => "warning",
            OverdueLevel::Longterm => "longterm",
            OverdueLevel::Bad => "bad",
        }
    }

    /// Display string shown on list screens
    pub fn label(&self) -> &'static str {
        match self {
            OverdueLevel::Normal => "정상",
            OverdueLevel::Warning => "주의",
            OverdueLevel::Longterm => "장기",
            OverdueLevel::Bad => "부실",
        }
    }
}

// ============================================================================
// PAYMENT STATUS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Unpaid,
    Partial,
    Paid,
    Overdue,
}

impl PaymentStatus {
    pub const ALL: [PaymentStatus; 4] = [
        PaymentStatus::Unpaid,
        PaymentStatus::Partial,
        PaymentStatus::Paid,
        PaymentStatus::Overdue,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Unpaid => "unpaid",
            PaymentStatus::Partial => "partial",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Overdue => "overdue",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PaymentStatus::Unpaid => "미수",
            PaymentStatus::Partial => "부분입금",
            PaymentStatus::Paid => "완납",
            PaymentStatus::Overdue => "연체",
        }
    }
}

// ============================================================================
// RECEIVABLE RECORD
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceivableRecord {
    /// Stable identity; exports without an id get a fresh UUID
    #[serde(default = "default_uuid")]
    pub id: String,

    pub client_name: String,

    #[serde(default)]
    pub client_type: ClientType,

    #[serde(default)]
    pub project_name: String,

    /// Integer currency units (KRW)
    pub total_amount: i64,

    pub paid_amount: i64,

    pub due_date: NaiveDate,
}

fn default_uuid() -> String {
    uuid::Uuid::new_v4().to_string()
}

impl ReceivableRecord {
    pub fn new(client_name: &str, total_amount: i64, paid_amount: i64, due_date: NaiveDate) -> Self {
        ReceivableRecord {
            id: default_uuid(),
            client_name: client_name.to_string(),
            client_type: ClientType::Other,
            project_name: String::new(),
            total_amount,
            paid_amount,
            due_date,
        }
    }

    /// Negative when the client over-paid. Saturates at the i64 bounds.
    pub fn remaining_amount(&self) -> i64 {
        self.total_amount.saturating_sub(self.paid_amount)
    }
}

// ============================================================================
// CLASSIFIED RECEIVABLE
// ============================================================================

/// A receivable together with the fields derived for one reference date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedReceivable {
    #[serde(flatten)]
    pub record: ReceivableRecord,
    pub remaining_amount: i64,
    pub overdue_days: i64,
    pub overdue_level: OverdueLevel,
    pub payment_status: PaymentStatus,
}

impl ClassifiedReceivable {
    pub fn is_overdue(&self) -> bool {
        self.payment_status == PaymentStatus::Overdue
    }
}

// ============================================================================
// TESTS
// ============================================================================
