use crate::interval::Interval;

/// Sorts `ranges` and merges them in place into canonical form: ascending,
/// pairwise disjoint, non-adjacent and free of empty intervals.
///
/// Intervals that survive unmerged are moved, never rewritten.
pub(crate) fn canonicalize<R: Interval>(ranges: &mut Vec<R>) {
    let input_len = ranges.len();
    ranges.sort_by(R::cmp_bounds);

    // ranges[..len] is the output, ranges[len - 1] the accumulator.
    let mut len = 0;
    for i in 0..ranges.len() {
        if ranges[i].is_empty() {
            continue;
        }
        if len > 0 {
            let last = &ranges[len - 1];
            let current = &ranges[i];
            // sorted, so current never starts before the accumulator
            if last.overlaps(current) || last.adjacent(current) {
                let merged = last.union(current);
                ranges[len - 1] = merged;
                continue;
            }
        }
        ranges.swap(len, i);
        len += 1;
    }
    ranges.truncate(len);

    tracing::trace!(input = input_len, output = len, "canonicalized intervals");
}

/// Returns `true` if `ranges` already is in canonical form.
pub(crate) fn is_canonical<R: Interval>(ranges: &[R]) -> bool {
    ranges.iter().all(|r| !r.is_empty())
        && ranges.windows(2).all(|pair| {
            pair[0].cmp_bounds(&pair[1]).is_lt()
                && !pair[0].overlaps(&pair[1])
                && !pair[0].adjacent(&pair[1])
        })
}

#[cfg(test)]
mod test {
    use super::{canonicalize, is_canonical};
    use crate::IntRange;

    fn canonical(mut ranges: Vec<IntRange>) -> Vec<IntRange> {
        canonicalize(&mut ranges);
        assert!(is_canonical(&ranges));
        ranges
    }

    #[test]
    fn adjacent_intervals_merge() {
        let out = canonical(vec![IntRange::new(3, 5), IntRange::new(1, 3)]);
        assert_eq!(out, vec![IntRange::new(1, 5)]);
    }

    #[test]
    fn overlapping_intervals_merge() {
        let out = canonical(vec![IntRange::new(1, 3), IntRange::new(2, 4)]);
        assert_eq!(out, vec![IntRange::new(1, 4)]);
    }

    #[test]
    fn gapped_intervals_stay_apart() {
        let out = canonical(vec![IntRange::new(5, 6), IntRange::new(1, 2)]);
        assert_eq!(out, vec![IntRange::new(1, 2), IntRange::new(5, 6)]);
    }

    #[test]
    fn empties_are_absorbed() {
        let out = canonical(vec![IntRange::Empty, IntRange::new(1, 2), IntRange::Empty]);
        assert_eq!(out, vec![IntRange::new(1, 2)]);
        assert!(canonical(vec![IntRange::Empty]).is_empty());
        assert!(canonical(vec![]).is_empty());
    }

    #[test]
    fn chain_collapses_through_accumulator() {
        let out = canonical(vec![
            IntRange::new(10, 12),
            IntRange::new(1, 4),
            IntRange::new(4, 6),
            IntRange::new(2, 3),
            IntRange::new(5, 10),
            IntRange::new(20, 21),
        ]);
        assert_eq!(out, vec![IntRange::new(1, 12), IntRange::new(20, 21)]);
    }

    #[test]
    fn unbounded_interval_swallows_the_rest() {
        let out = canonical(vec![
            IntRange::new(7, 8),
            IntRange::bounded(Some(3), None),
            IntRange::new(1, 2),
            IntRange::new(100, 200),
        ]);
        assert_eq!(out, vec![IntRange::new(1, 2), IntRange::bounded(Some(3), None)]);
    }

    #[test]
    fn already_canonical_is_untouched() {
        let ranges = vec![IntRange::new(1, 2), IntRange::new(4, 6), IntRange::new(8, 9)];
        assert_eq!(canonical(ranges.clone()), ranges);
    }
}
