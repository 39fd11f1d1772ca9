// Property tests for project grouping: inter-group order must not matter,
// intra-group order must be kept, orphans must never leak into a summary.

use proptest::prelude::*;
use soil_erp::{group_by_project, summarize_projects, ContractRecord};

const KEYS: [&str; 4] = ["P-001", "P-002", "화성-03", "P-104"];

fn build_contracts(rows: &[(usize, i64, u8, bool)]) -> Vec<ContractRecord> {
    rows.iter()
        .enumerate()
        .map(|(i, (key, amount, progress, amendment))| {
            let record = ContractRecord::new(KEYS[*key], &format!("contract {}", i), *amount)
                .with_progress(*progress);
            if *amendment {
                record.amendment()
            } else {
                record
            }
        })
        .collect()
}

/// Same records, grouped project by project in reverse key order
fn regroup_reversed(contracts: &[ContractRecord]) -> Vec<ContractRecord> {
    KEYS.iter()
        .rev()
        .flat_map(|key| {
            contracts
                .iter()
                .filter(move |c| c.project_key.as_deref() == Some(*key))
                .cloned()
        })
        .collect()
}

fn row_strategy() -> impl Strategy<Value = Vec<(usize, i64, u8, bool)>> {
    prop::collection::vec((0..KEYS.len(), 0i64..1_000_000, any::<u8>(), any::<bool>()), 1..40)
}

proptest! {
    #[test]
    fn summaries_ignore_inter_group_order(rows in row_strategy()) {
        let contracts = build_contracts(&rows);
        let reordered = regroup_reversed(&contracts);

        prop_assert_eq!(summarize_projects(&contracts), summarize_projects(&reordered));
    }

    #[test]
    fn summary_amount_is_group_sum(rows in row_strategy()) {
        let contracts = build_contracts(&rows);

        for summary in summarize_projects(&contracts) {
            let expected: i64 = summary.members.iter().map(|m| m.contract_amount).sum();
            prop_assert_eq!(summary.contract.contract_amount, expected);
            prop_assert!(summary.contract.progress_percentage <= 100);

            let clamped: Vec<f64> = summary
                .members
                .iter()
                .map(|m| f64::from(m.progress_percentage.min(100)))
                .collect();
            let mean = (clamped.iter().sum::<f64>() / clamped.len() as f64).round();
            prop_assert_eq!(f64::from(summary.contract.progress_percentage), mean);
            prop_assert_eq!(
                summary.amendment_count(),
                summary.members.iter().filter(|m| m.is_amendment()).count()
            );
        }
    }

    #[test]
    fn orphans_never_reach_a_summary(rows in row_strategy(), orphan_at in 0usize..40) {
        let mut contracts = build_contracts(&rows);
        let mut orphan = ContractRecord::new("unused", "orphan", 123);
        orphan.project_key = None;
        let position = orphan_at.min(contracts.len());
        contracts.insert(position, orphan.clone());

        let groups = group_by_project(&contracts);
        prop_assert_eq!(groups.orphans.len(), 1);

        for summary in summarize_projects(&contracts) {
            prop_assert!(summary.members.iter().all(|m| m.id != orphan.id));
        }
    }
}

#[test]
fn three_contract_project_rolls_up() {
    let contracts = vec![
        ContractRecord::new("P-100", "original", 100).with_progress(50),
        ContractRecord::new("P-100", "change 1", 50).with_progress(100).amendment(),
        ContractRecord::new("P-100", "change 2", 30).with_progress(0).amendment(),
    ];

    let summaries = summarize_projects(&contracts);

    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].contract.contract_amount, 180);
    assert_eq!(summaries[0].contract.progress_percentage, 50);
    assert_eq!(summaries[0].contract.project_name, "original");
    assert_eq!(summaries[0].amendment_count(), 2);
    assert_eq!(summaries[0].members.len(), 3);
}
