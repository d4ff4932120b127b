//! Majority-vote alignment of raw cluster labels to known categories.
//!
//! For every raw label the aligned category is the most frequent ground-truth
//! category among the known records assigned to that label. Ties go to the
//! smallest category id. A label with no assigned records gets no entry.

use std::collections::BTreeMap;
use stratify_core::error::{Result, StratifyError};
use stratify_core::types::{CategoryId, KnownRecord, RawLabel};

/// Winning category of one raw label, with its vote support.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignmentEntry {
    pub category: CategoryId,
    /// Records of the winning category assigned to this label.
    pub votes: usize,
    /// All records assigned to this label.
    pub members: usize,
}

/// Raw label to category mapping for one fit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentMap {
    k: usize,
    entries: BTreeMap<RawLabel, AlignmentEntry>,
}

impl AlignmentMap {
    pub fn k(&self) -> usize {
        self.k
    }

    /// Aligned category for `label`, if any record was assigned to it.
    pub fn get(&self, label: RawLabel) -> Option<CategoryId> {
        self.entries.get(&label).map(|e| e.category)
    }

    pub fn entry(&self, label: RawLabel) -> Option<&AlignmentEntry> {
        self.entries.get(&label)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Labels in `[0, k)` that have no entry.
    pub fn unaligned_labels(&self) -> Vec<RawLabel> {
        (0..self.k)
            .map(RawLabel)
            .filter(|l| !self.entries.contains_key(l))
            .collect()
    }
}

/// Build the alignment map from positionally matched records and labels.
pub fn align(known: &[KnownRecord], raw_labels: &[RawLabel], k: usize) -> Result<AlignmentMap> {
    if known.len() != raw_labels.len() {
        return Err(StratifyError::invalid_input(format!(
            "{} known records but {} raw labels",
            known.len(),
            raw_labels.len()
        )));
    }

    let mut votes: Vec<BTreeMap<CategoryId, usize>> = vec![BTreeMap::new(); k];
    for (record, label) in known.iter().zip(raw_labels) {
        let tally = votes.get_mut(label.index()).ok_or_else(|| {
            StratifyError::invalid_input(format!("{} is outside [0, {})", label, k))
        })?;
        *tally.entry(record.category).or_insert(0) += 1;
    }

    let mut entries = BTreeMap::new();
    for (label, tally) in votes.iter().enumerate() {
        if let Some(entry) = mode(tally) {
            entries.insert(RawLabel(label), entry);
        }
    }

    Ok(AlignmentMap { k, entries })
}

/// Most frequent category; ascending iteration plus a strict comparison
/// keeps the smallest id among equal counts.
fn mode(tally: &BTreeMap<CategoryId, usize>) -> Option<AlignmentEntry> {
    let members = tally.values().sum();
    let mut best: Option<(CategoryId, usize)> = None;
    for (&category, &count) in tally {
        match best {
            Some((_, top)) if count <= top => {}
            _ => best = Some((category, count)),
        }
    }
    best.map(|(category, votes)| AlignmentEntry {
        category,
        votes,
        members,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(categories: &[u32]) -> Vec<KnownRecord> {
        categories
            .iter()
            .map(|&c| KnownRecord::from_parts(0.0, 0.0, c))
            .collect()
    }

    #[test]
    fn picks_the_majority_category() {
        let known = records(&[1, 1, 1, 2, 2]);
        let labels = vec![RawLabel(0); 5];
        let map = align(&known, &labels, 1).unwrap();

        assert_eq!(map.get(RawLabel(0)), Some(CategoryId(1)));
        let entry = map.entry(RawLabel(0)).unwrap();
        assert_eq!(entry.votes, 3);
        assert_eq!(entry.members, 5);
    }

    #[test]
    fn ties_go_to_the_smallest_category() {
        let known = records(&[2, 1]);
        let labels = vec![RawLabel(0); 2];
        let map = align(&known, &labels, 1).unwrap();
        assert_eq!(map.get(RawLabel(0)), Some(CategoryId(1)));
    }

    #[test]
    fn three_way_tie_goes_to_the_smallest_category() {
        let known = records(&[7, 3, 5, 5, 3, 7]);
        let labels = vec![RawLabel(0); 6];
        let map = align(&known, &labels, 1).unwrap();
        assert_eq!(map.get(RawLabel(0)), Some(CategoryId(3)));
    }

    #[test]
    fn labels_are_aligned_independently() {
        let known = records(&[1, 1, 2, 2, 2, 3]);
        let labels = vec![
            RawLabel(1),
            RawLabel(1),
            RawLabel(0),
            RawLabel(0),
            RawLabel(1),
            RawLabel(0),
        ];
        let map = align(&known, &labels, 2).unwrap();
        assert_eq!(map.get(RawLabel(0)), Some(CategoryId(2)));
        assert_eq!(map.get(RawLabel(1)), Some(CategoryId(1)));
        assert!(map.unaligned_labels().is_empty());
    }

    #[test]
    fn empty_label_has_no_entry() {
        let known = records(&[1, 2]);
        let labels = vec![RawLabel(0), RawLabel(2)];
        let map = align(&known, &labels, 3).unwrap();

        assert_eq!(map.len(), 2);
        assert_eq!(map.get(RawLabel(1)), None);
        assert_eq!(map.unaligned_labels(), vec![RawLabel(1)]);
    }

    #[test]
    fn every_used_label_is_aligned() {
        let known = records(&[4, 1, 4, 2, 9, 9, 1]);
        let labels: Vec<RawLabel> = [0, 3, 3, 1, 0, 1, 3].iter().map(|&l| RawLabel(l)).collect();
        let map = align(&known, &labels, 4).unwrap();
        for label in &labels {
            assert!(map.get(*label).is_some(), "{} should be aligned", label);
        }
    }

    #[test]
    fn label_outside_k_is_rejected() {
        let known = records(&[1]);
        let err = align(&known, &[RawLabel(2)], 2).unwrap_err();
        assert!(matches!(err, StratifyError::InvalidInput(_)));
    }

    #[test]
    fn length_mismatch_is_rejected() {
        let known = records(&[1, 2]);
        let err = align(&known, &[RawLabel(0)], 1).unwrap_err();
        assert!(matches!(err, StratifyError::InvalidInput(_)));
    }
}
