//! Merge of REST batches and pushed events into one canonical list.
//!
//! Both state machines face the identical race: a REST fetch and a push
//! event can deliver the same entry in either order. All merging goes
//! through [`merge_by_id`] so the dedup/ordering rules exist exactly once.

use std::collections::HashMap;

/// Merges `incoming` into `existing`, de-duplicating by id and re-sorting
/// by the given key ascending.
///
/// An incoming entry whose id is already present replaces the existing
/// entry in place (the server copy is authoritative); new entries are
/// appended before the sort. Returns the number of entries added.
pub fn merge_by_id<T, Id, K, FId, FKey>(
    existing: &mut Vec<T>,
    incoming: Vec<T>,
    id_of: FId,
    sort_key: FKey,
) -> usize
where
    Id: std::hash::Hash + Eq,
    K: Ord,
    FId: Fn(&T) -> Id,
    FKey: Fn(&T) -> K,
{
    let mut index: HashMap<Id, usize> = existing
        .iter()
        .enumerate()
        .map(|(i, item)| (id_of(item), i))
        .collect();

    let mut added = 0;
    for item in incoming {
        match index.get(&id_of(&item)) {
            Some(&i) => existing[i] = item,
            None => {
                index.insert(id_of(&item), existing.len());
                existing.push(item);
                added += 1;
            }
        }
    }

    existing.sort_by(|a, b| sort_key(a).cmp(&sort_key(b)));
    added
}
