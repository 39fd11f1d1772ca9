// 📊 Receivable Statistics - Collection-level totals for the 채권 dashboard

use crate::receivable::{ClassifiedReceivable, ClientType, OverdueLevel, PaymentStatus};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceivableStats {
    pub record_count: usize,
    pub total_amount: i64,
    pub paid_amount: i64,
    pub remaining_amount: i64,

    /// Remaining amount of receivables whose status is overdue
    pub overdue_amount: i64,

    /// paid / total as a fraction; 0.0 when nothing is billed
    pub collection_rate: f64,

    pub by_client_type: BTreeMap<ClientType, usize>,
    pub by_overdue_level: BTreeMap<OverdueLevel, usize>,
    pub by_payment_status: BTreeMap<PaymentStatus, usize>,
}

impl ReceivableStats {
    pub fn from_classified(receivables: &[ClassifiedReceivable]) -> Self {
        let mut by_client_type: BTreeMap<ClientType, usize> =
            ClientType::ALL.iter().map(|t| (*t, 0)).collect();
        let mut by_overdue_level: BTreeMap<OverdueLevel, usize> =
            OverdueLevel::ALL.iter().map(|l| (*l, 0)).collect();
        let mut by_payment_status: BTreeMap<PaymentStatus, usize> =
            PaymentStatus::ALL.iter().map(|s| (*s, 0)).collect();

        // Summed wide so that no combination of i64 inputs overflows
        let mut total_amount: i128 = 0;
        let mut paid_amount: i128 = 0;
        let mut remaining_amount: i128 = 0;
        let mut overdue_amount: i128 = 0;

        for r in receivables {
            total_amount += i128::from(r.record.total_amount);
            paid_amount += i128::from(r.record.paid_amount);
            remaining_amount += i128::from(r.remaining_amount);

            if r.is_overdue() {
                overdue_amount += i128::from(r.remaining_amount);
            }

            *by_client_type.entry(r.record.client_type).or_insert(0) += 1;
            *by_overdue_level.entry(r.overdue_level).or_insert(0) += 1;
            *by_payment_status.entry(r.payment_status).or_insert(0) += 1;
        }

        ReceivableStats {
            record_count: receivables.len(),
            total_amount: saturate(total_amount),
            paid_amount: saturate(paid_amount),
            remaining_amount: saturate(remaining_amount),
            overdue_amount: saturate(overdue_amount),
            collection_rate: collection_rate(paid_amount, total_amount),
            by_client_type,
            by_overdue_level,
            by_payment_status,
        }
    }

    pub fn collection_rate_percent(&self) -> f64 {
        self.collection_rate * 100.0
    }

    pub fn level_count(&self, level: OverdueLevel) -> usize {
        self.by_overdue_level.get(&level).copied().unwrap_or(0)
    }

    pub fn client_type_count(&self, client_type: ClientType) -> usize {
        self.by_client_type.get(&client_type).copied().unwrap_or(0)
    }

    pub fn summary(&self) -> String {
        format!(
            "{} receivables: total ₩{}, collected ₩{} ({:.1}%), outstanding ₩{}, overdue ₩{}",
            self.record_count,
            self.total_amount,
            self.paid_amount,
            self.collection_rate_percent(),
            self.remaining_amount,
            self.overdue_amount
        )
    }
}

fn collection_rate(paid_amount: i128, total_amount: i128) -> f64 {
    if total_amount == 0 {
        return 0.0;
    }
    paid_amount as f64 / total_amount as f64
}

fn saturate(amount: i128) -> i64 {
    i64::try_from(amount).unwrap_or(if amount < 0 { i64::MIN } else { i64::MAX })
}

// ============================================================================
// TESTS
// ============================================================================
