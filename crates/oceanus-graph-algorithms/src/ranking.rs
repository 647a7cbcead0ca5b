//! Stable ranking helpers
//!
//! Every ranking here breaks ties by first appearance, so results do not
//! depend on hash iteration order.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::hash::Hash;

/// Count occurrences of each key, in order of first appearance
pub fn count_occurrences<K, I>(keys: I) -> Vec<(K, usize)>
where
    K: Eq + Hash + Clone,
    I: IntoIterator<Item = K>,
{
    let mut position: HashMap<K, usize> = HashMap::new();
    let mut counts: Vec<(K, usize)> = Vec::new();

    for key in keys {
        match position.get(&key) {
            Some(&idx) => counts[idx].1 += 1,
            None => {
                position.insert(key.clone(), counts.len());
                counts.push((key, 1));
            }
        }
    }

    counts
}

/// The `k` most frequent keys, descending by count, ties by first appearance
pub fn top_k_by_count<K, I>(keys: I, k: usize) -> Vec<(K, usize)>
where
    K: Eq + Hash + Clone,
    I: IntoIterator<Item = K>,
{
    let mut counts = count_occurrences(keys);
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(k);
    counts
}

/// Sort items descending by score. The sort is stable; NaN scores compare equal.
pub fn rank_by_score<T, F>(mut items: Vec<T>, score: F) -> Vec<T>
where
    F: Fn(&T) -> f64,
{
    items.sort_by(|a, b| score(b).partial_cmp(&score(a)).unwrap_or(Ordering::Equal));
    items
}
