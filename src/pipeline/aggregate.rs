//! Grouping and per-group summation.

use std::collections::HashMap;
use std::hash::Hash;
use std::iter::Sum;

/// Group records by a key, keeping original order inside each group.
pub fn group_data<'a, T, K, F>(data: &'a [T], key: F) -> HashMap<K, Vec<&'a T>>
where
    K: Eq + Hash,
    F: Fn(&'a T) -> K,
{
    let mut grouped: HashMap<K, Vec<&'a T>> = HashMap::new();
    for data_point in data {
        grouped.entry(key(data_point)).or_default().push(data_point);
    }
    grouped
}

/// Sum one field per group. The sum keeps the field's numeric type.
pub fn sum_grouped_items<T, K, V, F>(grouped: &HashMap<K, Vec<&T>>, field: F) -> HashMap<K, V>
where
    K: Eq + Hash + Clone,
    V: Sum<V>,
    F: Fn(&T) -> V,
{
    grouped
        .iter()
        .map(|(key, data_points)| {
            let total = data_points.iter().map(|data_point| field(*data_point)).sum();
            (key.clone(), total)
        })
        .collect()
}
