//! Ranking and binary-relevance IR metric formulas.
//!
//! Every function here operates on a *ranked relevance sequence*: the boolean
//! relevance flags of all candidates, reordered by score descending. Build it
//! with [`rank_relevance`]. All metrics return 0.0 for degenerate input (no
//! relevant candidates, zero-length cutoff) instead of failing.

/// Rank candidates by score descending and return their relevance flags in
/// rank order.
///
/// `None` marks a candidate the scorer did not score; unscored candidates
/// rank strictly after every scored one, whatever the score values. The sort
/// is stable, so candidates with equal scores (and unscored candidates among
/// themselves) keep their relative order in `scores` (i.e. universe order).
/// `scores` and `relevance` must be aligned to the same order and have the
/// same length.
pub fn rank_relevance(scores: &[Option<f32>], relevance: &[bool]) -> Vec<bool> {
    use std::cmp::Ordering;
    debug_assert_eq!(scores.len(), relevance.len());
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| match (scores[a], scores[b]) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    order.into_iter().map(|i| relevance[i]).collect()
}

/// Ranking length after applying an optional top-k cutoff.
fn limit(ranked: &[bool], k: Option<usize>) -> usize {
    k.unwrap_or(ranked.len()).min(ranked.len())
}

/// Reciprocal rank of the first relevant candidate: 1/rank, or 0.0 if no
/// candidate is relevant.
pub fn reciprocal_rank(ranked: &[bool]) -> f64 {
    ranked
        .iter()
        .position(|&rel| rel)
        .map_or(0.0, |i| 1.0 / (i as f64 + 1.0))
}

/// Precision at R, where R is the total number of relevant candidates.
/// Returns 0.0 when nothing is relevant.
pub fn r_precision(ranked: &[bool]) -> f64 {
    let total_relevant = ranked.iter().filter(|&&rel| rel).count();
    if total_relevant == 0 {
        return 0.0;
    }
    let found = ranked[..total_relevant.min(ranked.len())]
        .iter()
        .filter(|&&rel| rel)
        .count();
    found as f64 / total_relevant as f64
}

/// Hit rate at k: 1.0 if any relevant candidate appears in the top-k, else 0.0.
pub fn hit_rate(ranked: &[bool], k: Option<usize>) -> f64 {
    if ranked[..limit(ranked, k)].iter().any(|&rel| rel) {
        1.0
    } else {
        0.0
    }
}

/// Recall at k: fraction of all relevant candidates that appear in the top-k.
/// Returns 0.0 when nothing is relevant.
pub fn recall_at(ranked: &[bool], k: Option<usize>) -> f64 {
    let total_relevant = ranked.iter().filter(|&&rel| rel).count();
    if total_relevant == 0 {
        return 0.0;
    }
    let found = ranked[..limit(ranked, k)].iter().filter(|&&rel| rel).count();
    found as f64 / total_relevant as f64
}

/// Precision at k: fraction of the top-k that is relevant. A cutoff larger
/// than the ranking is clamped to its length.
pub fn precision_at(ranked: &[bool], k: Option<usize>) -> f64 {
    let n = limit(ranked, k);
    if n == 0 {
        return 0.0;
    }
    let found = ranked[..n].iter().filter(|&&rel| rel).count();
    found as f64 / n as f64
}

/// Average precision over the top-k: mean of precision at each rank where a
/// relevant candidate appears, normalized by min(k, R). Returns 0.0 when
/// nothing is relevant.
pub fn average_precision(ranked: &[bool], k: Option<usize>) -> f64 {
    let total_relevant = ranked.iter().filter(|&&rel| rel).count();
    if total_relevant == 0 {
        return 0.0;
    }
    let n = limit(ranked, k);
    let mut hits = 0usize;
    let mut sum = 0.0;
    for (i, &rel) in ranked[..n].iter().enumerate() {
        if rel {
            hits += 1;
            sum += hits as f64 / (i as f64 + 1.0);
        }
    }
    sum / total_relevant.min(n) as f64
}

/// Normalized discounted cumulative gain over the top-k, with binary gains
/// and the 1/log2(rank+1) discount. Returns 0.0 when nothing is relevant.
pub fn ndcg(ranked: &[bool], k: Option<usize>) -> f64 {
    let total_relevant = ranked.iter().filter(|&&rel| rel).count();
    if total_relevant == 0 {
        return 0.0;
    }
    let n = limit(ranked, k);

    let dcg: f64 = ranked[..n]
        .iter()
        .enumerate()
        .filter(|(_, &rel)| rel)
        .map(|(i, _)| 1.0 / (i as f64 + 2.0).log2())
        .sum();

    // Ideal DCG: all relevant candidates at the top positions
    let idcg: f64 = (0..total_relevant.min(n))
        .map(|i| 1.0 / (i as f64 + 2.0).log2())
        .sum();

    if idcg == 0.0 {
        return 0.0;
    }
    dcg / idcg
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranked(scores: &[f32], relevance: &[bool]) -> Vec<bool> {
        let scored: Vec<Option<f32>> = scores.iter().copied().map(Some).collect();
        rank_relevance(&scored, relevance)
    }

    #[test]
    fn test_rank_relevance_orders_by_score() {
        let r = ranked(&[0.1, 0.9, 0.5], &[true, false, false]);
        // Scores sort to 0.9, 0.5, 0.1 so the relevant entry lands last
        assert_eq!(r, vec![false, false, true]);
    }

    #[test]
    fn test_rank_relevance_stable_on_ties() {
        // Equal scores keep input order
        let r = ranked(&[2.0, 2.0, 1.0], &[false, true, false]);
        assert_eq!(r, vec![false, true, false]);
    }

    #[test]
    fn test_rank_relevance_unscored_always_last() {
        // The unscored entry sits below even the most negative score
        let r = rank_relevance(&[None, Some(f32::MIN), Some(-1.0)], &[true, false, false]);
        assert_eq!(r, vec![false, false, true]);
    }

    #[test]
    fn test_rank_relevance_all_unscored_keeps_input_order() {
        let r = rank_relevance(&[None, None, None], &[true, false, true]);
        assert_eq!(r, vec![true, false, true]);
    }

    #[test]
    fn test_reciprocal_rank_first() {
        assert!((reciprocal_rank(&[true, false, false]) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_reciprocal_rank_third() {
        assert!((reciprocal_rank(&[false, false, true]) - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_reciprocal_rank_none_relevant() {
        assert_eq!(reciprocal_rank(&[false, false]), 0.0);
    }

    #[test]
    fn test_r_precision() {
        // Two relevant, one of them in the top-2
        let score = r_precision(&[true, false, true, false]);
        assert!((score - 0.5).abs() < 1e-12);
        assert_eq!(r_precision(&[false, false]), 0.0);
        assert!((r_precision(&[true, true, false]) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_hit_rate() {
        let r = [false, true, false];
        assert_eq!(hit_rate(&r, Some(1)), 0.0);
        assert_eq!(hit_rate(&r, Some(2)), 1.0);
        assert_eq!(hit_rate(&r, None), 1.0);
        assert_eq!(hit_rate(&[false, false], None), 0.0);
    }

    #[test]
    fn test_recall_at() {
        let r = [true, false, true, false];
        assert!((recall_at(&r, Some(1)) - 0.5).abs() < 1e-12);
        assert!((recall_at(&r, Some(3)) - 1.0).abs() < 1e-12);
        assert_eq!(recall_at(&[false, false], Some(2)), 0.0);
    }

    #[test]
    fn test_precision_at() {
        let r = [true, true, false];
        assert!((precision_at(&r, Some(2)) - 1.0).abs() < 1e-12);
        assert!((precision_at(&r, Some(3)) - 2.0 / 3.0).abs() < 1e-12);
        // Cutoff beyond ranking length clamps to the length
        assert!((precision_at(&r, Some(10)) - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_average_precision_perfect() {
        // P@1=1, P@2=1 -> AP = 1.0
        assert!((average_precision(&[true, true, false], None) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_average_precision_single_relevant_at_rank_3() {
        let score = average_precision(&[false, false, true], None);
        assert!((score - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_average_precision_none_relevant() {
        assert_eq!(average_precision(&[false, false], Some(2)), 0.0);
    }

    #[test]
    fn test_ndcg_perfect_ranking() {
        assert!((ndcg(&[true, true, false], None) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_ndcg_prefers_relevant_on_top() {
        let good = ndcg(&[true, true, false], Some(3));
        let bad = ndcg(&[false, true, true], Some(3));
        assert!(good > bad);
    }

    #[test]
    fn test_ndcg_none_relevant() {
        assert_eq!(ndcg(&[false, false, false], Some(3)), 0.0);
    }

    #[test]
    fn test_ndcg_monotone_in_k() {
        let r = [false, true, false, true, false];
        let n2 = ndcg(&r, Some(2));
        let n4 = ndcg(&r, Some(4));
        assert!(n4 >= n2 - 1e-12);
    }
}
