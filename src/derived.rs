//! Derived columns computed per chart request: the rank pseudo-column and
//! the per-target means behind the drug/discovery summary view.

use crate::axes::NumericField;
use crate::dataset::CompoundRow;
use crate::error::ExplorerError;
use std::collections::BTreeMap;

/// Rank of each row within its Target Group: 0..n-1 ascending by the product
/// `row[field_a] * row[field_b]`, returned aligned to the input order
/// (`ranks[i]` belongs to `rows[i]`).
///
/// `sort_by` is stable, so rows with equal products keep their original
/// relative order; rank is deterministic even for tied products. This
/// stability is part of the contract and pinned by a test below.
pub fn compute_rank(
    rows: &[&CompoundRow],
    field_a: NumericField,
    field_b: NumericField,
) -> Result<Vec<usize>, ExplorerError> {
    if rows.is_empty() {
        return Err(ExplorerError::EmptyGroup);
    }
    let combined: Vec<f64> = rows
        .iter()
        .map(|row| row.numeric(field_a) * row.numeric(field_b))
        .collect();
    let mut order: Vec<usize> = (0..rows.len()).collect();
    order.sort_by(|&i, &j| combined[i].total_cmp(&combined[j]));

    let mut ranks = vec![0; rows.len()];
    for (rank, row_index) in order.into_iter().enumerate() {
        ranks[row_index] = rank;
    }
    Ok(ranks)
}

/// Mean of one numeric field per target id. BTreeMap keeps the iteration
/// order deterministic for chart building.
pub fn mean_by_target(rows: &[&CompoundRow], field: NumericField) -> BTreeMap<String, f64> {
    let mut sums: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    for row in rows {
        let entry = sums.entry(row.target_chemblid.clone()).or_insert((0.0, 0));
        entry.0 += row.numeric(field);
        entry.1 += 1;
    }
    sums.into_iter()
        .map(|(target, (sum, count))| (target, sum / count as f64))
        .collect()
}

/// Splits rows into approved drugs (max_phase 4) and discovery compounds.
pub fn partition_by_phase(rows: &[CompoundRow]) -> (Vec<&CompoundRow>, Vec<&CompoundRow>) {
    rows.iter().partition(|row| row.is_approved_drug())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str, target: &str, le: f64, lle: f64, max_phase: f64) -> CompoundRow {
        CompoundRow {
            cmpd_chemblid: id.to_string(),
            target_chemblid: target.to_string(),
            target: target.to_string(),
            le,
            lle,
            max_phase,
            ..Default::default()
        }
    }

    #[test]
    fn test_rank_sorted_ascending_by_product() {
        // Products (le * lle): 2, 3, 4.
        let rows = vec![
            row("C1", "T", 1.0, 2.0, 0.0),
            row("C2", "T", 3.0, 1.0, 0.0),
            row("C3", "T", 2.0, 2.0, 0.0),
        ];
        let refs: Vec<&CompoundRow> = rows.iter().collect();
        let ranks = compute_rank(&refs, NumericField::Le, NumericField::Lle).unwrap();
        assert_eq!(ranks, vec![0, 1, 2]);
    }

    #[test]
    fn test_rank_is_a_permutation_and_monotone() {
        let rows = vec![
            row("C1", "T", 5.0, 1.0, 0.0),
            row("C2", "T", 1.0, 1.0, 0.0),
            row("C3", "T", 3.0, 1.0, 0.0),
            row("C4", "T", 2.0, 1.0, 0.0),
        ];
        let refs: Vec<&CompoundRow> = rows.iter().collect();
        let ranks = compute_rank(&refs, NumericField::Le, NumericField::Lle).unwrap();
        assert_eq!(ranks.len(), rows.len());
        let mut sorted = ranks.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![0, 1, 2, 3]);
        // Rank order must follow the product order.
        assert_eq!(ranks, vec![3, 0, 2, 1]);
    }

    #[test]
    fn test_rank_ties_keep_original_row_order() {
        let rows = vec![
            row("C1", "T", 2.0, 1.0, 0.0),
            row("C2", "T", 1.0, 2.0, 0.0),
            row("C3", "T", 1.0, 1.0, 0.0),
        ];
        let refs: Vec<&CompoundRow> = rows.iter().collect();
        let ranks = compute_rank(&refs, NumericField::Le, NumericField::Lle).unwrap();
        // C1 and C2 tie at product 2; C1 comes first in the input.
        assert_eq!(ranks, vec![1, 2, 0]);
    }

    #[test]
    fn test_rank_empty_group() {
        let err = compute_rank(&[], NumericField::Le, NumericField::Lle).unwrap_err();
        assert!(matches!(err, ExplorerError::EmptyGroup));
    }

    #[test]
    fn test_mean_by_target() {
        let rows = vec![
            row("C1", "A", 1.0, 0.0, 0.0),
            row("C2", "A", 3.0, 0.0, 0.0),
            row("C3", "B", 5.0, 0.0, 0.0),
        ];
        let refs: Vec<&CompoundRow> = rows.iter().collect();
        let means = mean_by_target(&refs, NumericField::Le);
        assert_eq!(means.len(), 2);
        assert_eq!(means["A"], 2.0);
        assert_eq!(means["B"], 5.0);
    }

    #[test]
    fn test_partition_by_phase() {
        let rows = vec![
            row("C1", "A", 1.0, 0.0, 4.0),
            row("C2", "A", 3.0, 0.0, 2.0),
            row("C3", "B", 5.0, 0.0, 0.0),
        ];
        let (drugs, discovery) = partition_by_phase(&rows);
        assert_eq!(drugs.len(), 1);
        assert_eq!(drugs[0].cmpd_chemblid, "C1");
        assert_eq!(discovery.len(), 2);
    }
}
