/// Zero-filled count vectors over a full calendar enumeration.
use crate::calendar::{Dated, Granularity};

/// Counts records per sub-period. Every slot exists, empty ones hold 0,
/// so the sum of the result equals the number of records.
pub fn build_histogram<'a, T, I>(records: I, granularity: Granularity) -> Vec<usize>
where
    T: Dated + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut counts = vec![0; granularity.slot_count()];
    for record in records {
        counts[granularity.slot(record.bucket())] += 1;
    }
    counts
}

/// Index and value of the largest slot; the earliest wins on ties.
pub fn peak_slot(counts: &[usize]) -> Option<(usize, usize)> {
    counts
        .iter()
        .copied()
        .enumerate()
        .fold(None, |best, (slot, count)| match best {
            Some((_, best_count)) if best_count >= count => best,
            _ if count > 0 => Some((slot, count)),
            _ => best,
        })
}
