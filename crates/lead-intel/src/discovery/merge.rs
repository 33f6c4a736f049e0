use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use super::CandidateRecord;
use crate::model::normalizer::{
    is_name_variant, normalize_domain, normalize_label, normalized_names_match,
};
use crate::model::CompanyIdentity;

/// Normalized identity fields compared when deciding whether two records are one company.
pub(crate) struct IdentityKey {
    tax_id: Option<String>,
    names: Vec<String>,
    domain: Option<String>,
    city: Option<String>,
    state: Option<String>,
}

impl IdentityKey {
    pub(crate) fn of(record: &CandidateRecord) -> Self {
        let profile = &record.profile;
        let label = |value: &Option<String>| {
            value
                .as_deref()
                .map(normalize_label)
                .filter(|value| !value.is_empty())
        };
        Self {
            tax_id: profile.identity.normalized_tax_id(),
            names: profile.identity.normalized_names(),
            domain: profile
                .domain
                .as_deref()
                .map(normalize_domain)
                .filter(|domain| !domain.is_empty()),
            city: label(&profile.city),
            state: label(&profile.state),
        }
    }

    pub(crate) fn of_identity(identity: &CompanyIdentity) -> Self {
        Self {
            tax_id: identity.normalized_tax_id(),
            names: identity.normalized_names(),
            domain: None,
            city: None,
            state: None,
        }
    }

    fn names_match(&self, other: &IdentityKey, threshold: f64) -> bool {
        self.names.iter().any(|left| {
            other
                .names
                .iter()
                .any(|right| normalized_names_match(left, right, threshold))
        })
    }

    /// Every locating field equal and at least one normalized name shared verbatim.
    fn identical_to(&self, other: &IdentityKey) -> bool {
        self.tax_id == other.tax_id
            && self.domain == other.domain
            && self.city == other.city
            && self.state == other.state
            && self.names.iter().any(|name| other.names.contains(name))
    }

    /// Tax ids decide when both sides carry one. Otherwise identical keys are one
    /// company; failing that the names must match and the records must share a
    /// domain or a city and state.
    pub(crate) fn same_company(&self, other: &IdentityKey, threshold: f64) -> bool {
        if let (Some(left), Some(right)) = (&self.tax_id, &other.tax_id) {
            return left == right;
        }
        if self.identical_to(other) {
            return true;
        }
        if !self.names_match(other, threshold) {
            return false;
        }
        let same_domain = self.domain.is_some() && self.domain == other.domain;
        let same_place = self.city.is_some()
            && self.state.is_some()
            && self.city == other.city
            && self.state == other.state;
        same_domain || same_place
    }

    /// Whether `candidate` is the company this key (the discovery target) names.
    pub(crate) fn is_same_entity(&self, candidate: &IdentityKey, threshold: f64) -> bool {
        if let (Some(left), Some(right)) = (&self.tax_id, &candidate.tax_id) {
            return left == right;
        }
        self.names.iter().any(|canonical| {
            candidate
                .names
                .iter()
                .any(|name| is_name_variant(canonical, name, threshold))
        })
    }
}

struct Keyed {
    record: CandidateRecord,
    key: IdentityKey,
    canonical: String,
}

/// Orders records by score (highest first), then by their full serialized content,
/// so every later step is independent of pool and record order.
fn canonical_order(records: Vec<CandidateRecord>) -> Vec<Keyed> {
    let mut keyed: Vec<Keyed> = records
        .into_iter()
        .map(|record| Keyed {
            key: IdentityKey::of(&record),
            canonical: serde_json::to_string(&record).unwrap_or_default(),
            record,
        })
        .collect();
    keyed.sort_by(|left, right| {
        right
            .record
            .similarity_score
            .total_cmp(&left.record.similarity_score)
            .then_with(|| left.canonical.cmp(&right.canonical))
    });
    keyed
}

struct DisjointSet {
    parent: Vec<usize>,
    tax_ids: Vec<BTreeSet<String>>,
}

impl DisjointSet {
    fn new(keys: &[Keyed]) -> Self {
        Self {
            parent: (0..keys.len()).collect(),
            tax_ids: keys
                .iter()
                .map(|keyed| keyed.key.tax_id.iter().cloned().collect())
                .collect(),
        }
    }

    fn find(&mut self, mut node: usize) -> usize {
        let mut root = node;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        while self.parent[node] != root {
            let next = self.parent[node];
            self.parent[node] = root;
            node = next;
        }
        root
    }

    /// Joins two groups unless each already carries a different tax id.
    fn union(&mut self, left: usize, right: usize) -> bool {
        let (left, right) = (self.find(left), self.find(right));
        if left == right {
            return false;
        }
        let (left_ids, right_ids) = (&self.tax_ids[left], &self.tax_ids[right]);
        if !left_ids.is_empty() && !right_ids.is_empty() && left_ids.is_disjoint(right_ids) {
            debug!("refusing to merge groups with conflicting tax ids");
            return false;
        }

        let (root, child) = match left.cmp(&right) {
            Ordering::Less => (left, right),
            _ => (right, left),
        };
        self.parent[child] = root;
        let moved = std::mem::take(&mut self.tax_ids[child]);
        self.tax_ids[root].extend(moved);
        true
    }
}

fn merge_pass(records: Vec<CandidateRecord>, threshold: f64) -> Vec<CandidateRecord> {
    let keyed = canonical_order(records);
    let mut groups = DisjointSet::new(&keyed);

    for left in 0..keyed.len() {
        for right in (left + 1)..keyed.len() {
            if keyed[left].key.same_company(&keyed[right].key, threshold) {
                groups.union(left, right);
            }
        }
    }

    let mut members: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for index in 0..keyed.len() {
        let root = groups.find(index);
        members.entry(root).or_default().push(index);
    }

    let mut slots: Vec<Option<CandidateRecord>> =
        keyed.into_iter().map(|keyed| Some(keyed.record)).collect();
    let mut merged: Vec<CandidateRecord> = Vec::with_capacity(members.len());

    for indices in members.into_values() {
        let mut group = indices.into_iter().filter_map(|index| slots[index].take());
        let Some(mut survivor) = group.next() else {
            continue;
        };
        for other in group {
            survivor.profile.fill_gaps_from(&other.profile);
            survivor.sources.extend(other.sources);
            survivor.similarity_score = survivor.similarity_score.max(other.similarity_score);
        }
        merged.push(survivor);
    }

    merged
}

/// Collapses records describing the same company until no two remaining records match.
pub(crate) fn merge_records(mut records: Vec<CandidateRecord>, threshold: f64) -> Vec<CandidateRecord> {
    loop {
        let before = records.len();
        records = merge_pass(records, threshold);
        if records.len() == before {
            return records;
        }
        debug!(before, after = records.len(), "merge pass collapsed records");
    }
}
