//! Append-only rule storage and its tag-keyed index.
//!
//! `RuleStore` is deliberately dumb: it never decides *how* a query should
//! be evaluated, it only remembers what was added and offers two cheap
//! ways to iterate a subset of it. The adaptive strategy decision lives in
//! `spocp-engine`, one layer up.

use std::collections::HashMap;

use spocp_core::Element;

/// One rule as stored: its position (insertion order, the rule's stable
/// identity) and the element itself.
#[derive(Debug, Clone)]
pub struct StoredRule {
    pub index: usize,
    pub element: Element,
}

/// Summary statistics read by the adaptive controller and exposed through
/// the `/stats` monitoring endpoint.
#[derive(Debug, Clone, Default)]
pub struct IndexStats {
    pub total: usize,
    pub distinct_tag_count: usize,
    pub atom_rule_count: usize,
    pub per_tag_sizes: Vec<(Vec<u8>, usize)>,
    pub average_bucket_size: f64,
    pub most_populous_tag: Option<Vec<u8>>,
}

/// Append-only storage for rule elements, indexed by top-level list tag.
#[derive(Debug, Default)]
pub struct RuleStore {
    rules: Vec<Element>,
    tag_buckets: HashMap<Vec<u8>, Vec<usize>>,
    atom_bucket: Vec<usize>,
}

impl RuleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `element` to the store and update the index. Returns the
    /// rule's stable index.
    pub fn add(&mut self, element: Element) -> usize {
        let index = self.rules.len();
        match &element {
            Element::List(list) => {
                self.tag_buckets.entry(list.tag.clone()).or_default().push(index);
            }
            _ => self.atom_bucket.push(index),
        }
        self.rules.push(element);
        index
    }

    pub fn clear(&mut self) {
        self.rules.clear();
        self.tag_buckets.clear();
        self.atom_bucket.clear();
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// All rules, in insertion order.
    pub fn rules(&self) -> &[Element] {
        &self.rules
    }

    pub fn rule(&self, index: usize) -> Option<&Element> {
        self.rules.get(index)
    }

    /// Rule indices sharing `tag`, in insertion order, or an empty slice
    /// if the tag was never seen.
    pub fn tag_bucket(&self, tag: &[u8]) -> &[usize] {
        self.tag_buckets.get(tag).map_or(&[], Vec::as_slice)
    }

    /// Indices of rules whose top-level element is not a `List`.
    pub fn atom_bucket(&self) -> &[usize] {
        &self.atom_bucket
    }

    pub fn iter_tag_bucket<'a>(&'a self, tag: &[u8]) -> impl Iterator<Item = &'a Element> + 'a {
        self.tag_bucket(tag).iter().map(move |&i| &self.rules[i])
    }

    pub fn iter_atom_bucket(&self) -> impl Iterator<Item = &Element> + '_ {
        self.atom_bucket.iter().map(move |&i| &self.rules[i])
    }

    pub fn stats(&self) -> IndexStats {
        let distinct_tag_count = self.tag_buckets.len();
        let bucket_sizes: Vec<(Vec<u8>, usize)> = self
            .tag_buckets
            .iter()
            .map(|(tag, indices)| (tag.clone(), indices.len()))
            .collect();
        let total_bucketed: usize = bucket_sizes.iter().map(|(_, n)| n).sum();
        let average_bucket_size = if distinct_tag_count == 0 {
            0.0
        } else {
            total_bucketed as f64 / distinct_tag_count as f64
        };
        let most_populous_tag = bucket_sizes
            .iter()
            .max_by_key(|(_, n)| *n)
            .map(|(tag, _)| tag.clone());
        let mut per_tag_sizes = bucket_sizes;
        per_tag_sizes.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        IndexStats {
            total: self.rules.len(),
            distinct_tag_count,
            atom_rule_count: self.atom_bucket.len(),
            per_tag_sizes,
            average_bucket_size,
            most_populous_tag,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn add_routes_lists_and_atoms_to_separate_buckets() {
        let mut store = RuleStore::new();
        store.add(Element::list("http", vec![Element::atom("GET")]));
        store.add(Element::atom("bare"));
        store.add(Element::list("http", vec![Element::atom("POST")]));

        assert_eq!(store.len(), 3);
        assert_eq!(store.tag_bucket(b"http"), &[0, 2]);
        assert_eq!(store.atom_bucket(), &[1]);
    }

    #[test]
    fn clear_resets_everything() {
        let mut store = RuleStore::new();
        store.add(Element::list("http", vec![]));
        store.add(Element::atom("bare"));
        store.clear();
        assert!(store.is_empty());
        assert!(store.tag_bucket(b"http").is_empty());
        assert!(store.atom_bucket().is_empty());
    }

    #[test]
    fn stats_reflect_bucket_shape() {
        let mut store = RuleStore::new();
        store.add(Element::list("http", vec![]));
        store.add(Element::list("http", vec![]));
        store.add(Element::list("ftp", vec![]));
        store.add(Element::atom("bare"));

        let stats = store.stats();
        assert_eq!(stats.total, 4);
        assert_eq!(stats.distinct_tag_count, 2);
        assert_eq!(stats.atom_rule_count, 1);
        assert_eq!(stats.most_populous_tag, Some(b"http".to_vec()));
        assert!((stats.average_bucket_size - 1.5).abs() < f64::EPSILON);
    }
}
