// 🏗️ Project Aggregator - Original contract + change orders → one project row
//
// Groups contract rows by project key and folds each group into a summary:
// amounts are summed, progress is averaged, and every other field comes from a
// single representative row.

use crate::contract::{ContractRecord, MAX_PROGRESS};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// GROUPING
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectGroups {
    /// Key-ordered, so the result does not depend on how groups were
    /// interleaved in the input. Rows keep their input order within a group.
    pub groups: BTreeMap<String, Vec<ContractRecord>>,

    /// Rows without a usable project key
    pub orphans: Vec<ContractRecord>,
}

impl ProjectGroups {
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn get(&self, project_key: &str) -> Option<&[ContractRecord]> {
        self.groups.get(project_key).map(Vec::as_slice)
    }
}

/// Stable partition of contracts by project key.
///
/// Orphans are reported and left out of every group; they never land under a
/// synthetic key.
pub fn group_by_project(contracts: &[ContractRecord]) -> ProjectGroups {
    let mut result = ProjectGroups::default();

    for contract in contracts {
        match contract.grouping_key() {
            Some(key) => result
                .groups
                .entry(key.to_string())
                .or_default()
                .push(contract.clone()),
            None => {
                tracing::warn!(
                    contract_id = %contract.id,
                    project_name = %contract.project_name,
                    "contract has no project key, skipped from project grouping"
                );
                result.orphans.push(contract.clone());
            }
        }
    }

    if !result.orphans.is_empty() {
        tracing::warn!(orphans = result.orphans.len(), "orphaned contracts excluded");
    }

    result
}

// ============================================================================
// PROJECT SUMMARY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSummary {
    /// Representative row with contract_amount and progress_percentage
    /// replaced by the group totals
    #[serde(flatten)]
    pub contract: ContractRecord,

    /// Change orders in input order
    pub amendments: Vec<ContractRecord>,

    /// Whole group in input order
    pub members: Vec<ContractRecord>,
}

impl ProjectSummary {
    pub fn amendment_count(&self) -> usize {
        self.amendments.len()
    }

    pub fn project_key(&self) -> Option<&str> {
        self.contract.grouping_key()
    }
}

/// Fold one project group into a summary. Returns None for an empty group.
///
/// The representative is the first original contract in the group, or the
/// first row when the group only holds change orders.
pub fn summarize_project(group: &[ContractRecord]) -> Option<ProjectSummary> {
    let representative = group
        .iter()
        .find(|c| !c.is_amendment())
        .or_else(|| group.first())?;

    let contract_amount = group.iter().fold(0i64, |sum, c| sum.saturating_add(c.contract_amount));
    let progress_sum: u32 = group.iter().map(|c| u32::from(clamped_progress(c))).sum();
    let progress_mean = (f64::from(progress_sum) / group.len() as f64).round();

    let mut contract = representative.clone();
    contract.contract_amount = contract_amount;
    contract.progress_percentage = progress_mean as u8;

    Some(ProjectSummary {
        contract,
        amendments: group.iter().filter(|c| c.is_amendment()).cloned().collect(),
        members: group.to_vec(),
    })
}

/// Progress capped at 100; rows above it are reported, not trusted
fn clamped_progress(contract: &ContractRecord) -> u8 {
    if contract.progress_percentage > MAX_PROGRESS {
        tracing::warn!(
            contract_id = %contract.id,
            progress = contract.progress_percentage,
            "progress above 100%, clamped"
        );
        return MAX_PROGRESS;
    }
    contract.progress_percentage
}

/// Group then summarize, in project-key order
pub fn summarize_projects(contracts: &[ContractRecord]) -> Vec<ProjectSummary> {
    group_by_project(contracts)
        .groups
        .values()
        .filter_map(|group| summarize_project(group))
        .collect()
}

// ============================================================================
// PORTFOLIO TOTALS
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioTotals {
    pub project_count: usize,
    pub contract_count: usize,
    pub amendment_count: usize,
    pub total_contract_amount: i64,
    pub orphan_count: usize,
}

impl PortfolioTotals {
    pub fn from_groups(groups: &ProjectGroups) -> Self {
        let members = groups.groups.values().flatten();

        PortfolioTotals {
            project_count: groups.len(),
            contract_count: groups.groups.values().map(Vec::len).sum(),
            amendment_count: members.clone().filter(|c| c.is_amendment()).count(),
            total_contract_amount: members.fold(0i64, |sum, c| sum.saturating_add(c.contract_amount)),
            orphan_count: groups.orphans.len(),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::AmendmentMarker;

    fn contract(key: &str, name: &str, amount: i64, progress: u8) -> ContractRecord {
        ContractRecord::new(key, name, amount).with_progress(progress)
    }

    #[test]
    fn test_summary_sums_amounts_and_averages_progress() {
        let group = vec![
            contract("P-100", "화성 부지 정화", 100, 50),
            contract("P-100", "화성 부지 정화 1차 변경", 50, 100).amendment(),
            contract("P-100", "화성 부지 정화 2차 변경", 30, 0).amendment(),
        ];

        let summary = summarize_project(&group).unwrap();

        assert_eq!(summary.contract.contract_amount, 180);
        assert_eq!(summary.contract.progress_percentage, 50);
        assert_eq!(summary.contract.project_name, "화성 부지 정화");
        assert_eq!(summary.amendment_count(), 2);
        assert_eq!(summary.members, group);
    }

    #[test]
    fn test_progress_mean_rounds_to_nearest() {
        let group = vec![contract("P", "a", 1, 33), contract("P", "b", 1, 34)];
        // 33.5 rounds up
        assert_eq!(summarize_project(&group).unwrap().contract.progress_percentage, 34);

        let group = vec![contract("P", "a", 1, 10), contract("P", "b", 1, 10), contract("P", "c", 1, 11)];
        // 10.33 rounds down
        assert_eq!(summarize_project(&group).unwrap().contract.progress_percentage, 10);
    }

    #[test]
    fn test_progress_above_range_is_clamped() {
        let group = vec![contract("P", "a", 1, 250), contract("P", "b", 1, 200)];
        assert_eq!(summarize_project(&group).unwrap().contract.progress_percentage, 100);

        let group = vec![contract("P", "a", 1, 150), contract("P", "b", 1, 0)];
        assert_eq!(summarize_project(&group).unwrap().contract.progress_percentage, 50);
    }

    #[test]
    fn test_representative_prefers_original_contract() {
        let mut change = contract("P-7", "변경 계약", 20, 0).amendment();
        change.client_name = "(주)그린솔루션".to_string();
        let mut original = contract("P-7", "원 계약", 80, 0);
        original.client_name = "그린솔루션".to_string();

        let summary = summarize_project(&[change.clone(), original.clone()]).unwrap();

        assert_eq!(summary.contract.id, original.id);
        assert_eq!(summary.contract.client_name, "그린솔루션");
        assert_eq!(summary.amendments, vec![change]);
    }

    #[test]
    fn test_representative_falls_back_to_first_row() {
        let first = contract("P-9", "첫 변경", 10, 0).amendment();
        let second = contract("P-9", "두번째 변경", 15, 0).amendment();

        let summary = summarize_project(&[first.clone(), second]).unwrap();

        assert_eq!(summary.contract.id, first.id);
        assert_eq!(summary.contract.amendment_marker, AmendmentMarker::Change);
        assert_eq!(summary.contract.contract_amount, 25);
        assert_eq!(summary.amendment_count(), 2);
    }

    #[test]
    fn test_empty_group_has_no_summary() {
        assert!(summarize_project(&[]).is_none());
    }

    #[test]
    fn test_grouping_preserves_order_within_group() {
        let a1 = contract("A", "a1", 1, 0);
        let b1 = contract("B", "b1", 2, 0);
        let a2 = contract("A", "a2", 3, 0).amendment();
        let b2 = contract("B", "b2", 4, 0).amendment();

        let groups = group_by_project(&[a1.clone(), b1.clone(), a2.clone(), b2.clone()]);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups.get("A").unwrap(), &[a1, a2][..]);
        assert_eq!(groups.get("B").unwrap(), &[b1, b2][..]);
        assert!(groups.orphans.is_empty());
    }

    #[test]
    fn test_orphans_are_excluded_and_reported() {
        let mut orphan = contract("X", "키 없음", 999, 0);
        orphan.project_key = None;
        let mut blank = contract("X", "빈 키", 5, 0);
        blank.project_key = Some(String::new());
        let keyed = contract("A", "정상", 10, 0);

        let contracts = vec![orphan.clone(), keyed.clone(), blank.clone()];
        let groups = group_by_project(&contracts);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups.orphans, vec![orphan.clone(), blank]);

        let summaries = summarize_projects(&contracts);
        assert_eq!(summaries.len(), 1);
        assert!(summaries
            .iter()
            .all(|s| s.members.iter().all(|m| m.id != orphan.id)));
        assert_eq!(summaries[0].contract.contract_amount, 10);
    }

    #[test]
    fn test_whitespace_keys_group_together() {
        let groups = group_by_project(&[contract("P-1", "a", 1, 0), contract(" P-1 ", "b", 2, 0)]);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups.get("P-1").map(|g| g.len()), Some(2));
    }

    #[test]
    fn test_portfolio_totals() {
        let mut orphan = contract("X", "orphan", 7, 0);
        orphan.project_key = None;
        let contracts = vec![
            contract("A", "a", 100, 0),
            contract("A", "a'", 20, 0).amendment(),
            contract("B", "b", 300, 0),
            orphan,
        ];

        let totals = PortfolioTotals::from_groups(&group_by_project(&contracts));

        assert_eq!(
            totals,
            PortfolioTotals {
                project_count: 2,
                contract_count: 3,
                amendment_count: 1,
                total_contract_amount: 420,
                orphan_count: 1,
            }
        );
    }
}
