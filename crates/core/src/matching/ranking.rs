//! Ranking order and k-way merge of ranked partitions.

use std::cmp::Ordering;
use std::collections::hash_map::Entry;
use std::collections::{BinaryHeap, HashMap};

use super::ScoredVenue;

/// Total ranking order: score descending, then amenity coverage descending,
/// then venue id ascending.
pub fn rank_order(a: &ScoredVenue, b: &ScoredVenue) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| {
            b.subscores
                .amenity_coverage
                .total_cmp(&a.subscores.amenity_coverage)
        })
        .then_with(|| a.venue_id.cmp(&b.venue_id))
}

pub fn sort_ranked(venues: &mut [ScoredVenue]) {
    venues.sort_by(rank_order);
}

/// Refines [`rank_order`] over every field, so two entries compare equal
/// only when they are identical.
fn preference_order(a: &ScoredVenue, b: &ScoredVenue) -> Ordering {
    rank_order(a, b)
        .then_with(|| {
            b.subscores
                .category_match
                .total_cmp(&a.subscores.category_match)
        })
        .then_with(|| b.subscores.capacity_fit.total_cmp(&a.subscores.capacity_fit))
        .then_with(|| a.matched_node_ids.cmp(&b.matched_node_ids))
}

/// Keeps one entry per venue id, the most preferred one, and returns them
/// ranked. The choice depends only on the entries, never on their order.
pub fn keep_best_per_venue<I>(scored: I) -> Vec<ScoredVenue>
where
    I: IntoIterator<Item = ScoredVenue>,
{
    let mut best: HashMap<String, ScoredVenue> = HashMap::new();
    for venue in scored {
        match best.entry(venue.venue_id.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(venue);
            }
            Entry::Occupied(mut slot) => {
                if preference_order(&venue, slot.get()) == Ordering::Less {
                    slot.insert(venue);
                }
            }
        }
    }
    let mut ranked: Vec<ScoredVenue> = best.into_values().collect();
    sort_ranked(&mut ranked);
    ranked
}

/// Head of one partition inside the merge heap.
struct MergeHead {
    venue: ScoredVenue,
    partition: usize,
}

impl PartialEq for MergeHead {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for MergeHead {}

impl PartialOrd for MergeHead {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MergeHead {
    // BinaryHeap pops the greatest element; the best-ranked venue must be greatest.
    fn cmp(&self, other: &Self) -> Ordering {
        rank_order(&other.venue, &self.venue).then_with(|| other.partition.cmp(&self.partition))
    }
}

/// Merges partitions that are each sorted by [`rank_order`] into one ranking.
pub fn merge_ranked(partitions: Vec<Vec<ScoredVenue>>) -> Vec<ScoredVenue> {
    let total = partitions.iter().map(Vec::len).sum();
    let mut merged = Vec::with_capacity(total);
    let mut sources: Vec<_> = partitions.into_iter().map(Vec::into_iter).collect();

    let mut heap = BinaryHeap::with_capacity(sources.len());
    for (partition, source) in sources.iter_mut().enumerate() {
        if let Some(venue) = source.next() {
            heap.push(MergeHead { venue, partition });
        }
    }

    while let Some(MergeHead { venue, partition }) = heap.pop() {
        merged.push(venue);
        if let Some(next) = sources[partition].next() {
            heap.push(MergeHead {
                venue: next,
                partition,
            });
        }
    }

    merged
}
