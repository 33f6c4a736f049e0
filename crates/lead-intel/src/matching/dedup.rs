use std::cmp::Ordering;
use std::collections::BTreeMap;

use tracing::debug;

use crate::model::normalizer::{is_name_variant, normalize_name, normalize_tax_id};
use crate::model::{CompanyIdentity, Evidence, MatchClassification};

/// Canonical forms of the identity evidence is checked against.
pub(crate) struct IdentityMatcher {
    names: Vec<String>,
    tax_id: Option<String>,
    threshold: f64,
}

impl IdentityMatcher {
    pub(crate) fn new(identity: &CompanyIdentity, threshold: f64) -> Self {
        Self {
            names: identity.normalized_names(),
            tax_id: identity.normalized_tax_id(),
            threshold,
        }
    }

    pub(crate) fn accepts(&self, matched_company: &str) -> bool {
        let candidate = normalize_name(matched_company);
        if self
            .names
            .iter()
            .any(|name| is_name_variant(name, &candidate, self.threshold))
        {
            return true;
        }

        match &self.tax_id {
            Some(tax_id) => normalize_tax_id(matched_company) == *tax_id,
            None => false,
        }
    }
}

/// Keeps trustworthy, non-rejected evidence about the identity.
pub(crate) fn accepted_evidence<'a>(
    evidence: &'a [Evidence],
    matcher: &IdentityMatcher,
) -> Vec<&'a Evidence> {
    let mut accepted: Vec<&Evidence> = evidence
        .iter()
        .filter(|item| {
            if !item.is_trustworthy() {
                debug!(source = item.source(), "discarding untrustworthy evidence");
                return false;
            }
            if item.classification() == Some(MatchClassification::Rejected) {
                debug!(source = item.source(), "discarding rejected evidence");
                return false;
            }
            if !matcher.accepts(item.matched_company()) {
                debug!(
                    source = item.source(),
                    matched_company = item.matched_company(),
                    "discarding evidence about another company"
                );
                return false;
            }
            true
        })
        .collect();

    accepted.sort_by(|left, right| {
        left.source_key()
            .cmp(&right.source_key())
            .then_with(|| compare_strength(right, left))
    });
    accepted
}

/// Strongest item per source, keyed by the case-folded source identifier.
pub(crate) fn representatives<'a>(accepted: &[&'a Evidence]) -> BTreeMap<String, &'a Evidence> {
    let mut by_source: BTreeMap<String, &Evidence> = BTreeMap::new();
    for item in accepted {
        by_source
            .entry(item.source_key())
            .and_modify(|current| {
                if compare_strength(item, current) == Ordering::Greater {
                    *current = *item;
                }
            })
            .or_insert(*item);
    }
    by_source
}

/// Total order on evidence strength: weight first, then content so the choice
/// never depends on input order.
fn compare_strength(left: &Evidence, right: &Evidence) -> Ordering {
    left.weight()
        .cmp(&right.weight())
        .then_with(|| left.classification().cmp(&right.classification()))
        .then_with(|| left.observed_at().cmp(&right.observed_at()))
        .then_with(|| left.snippet().cmp(right.snippet()))
        .then_with(|| left.url().cmp(right.url()))
        .then_with(|| left.matched_claim().cmp(right.matched_claim()))
        .then_with(|| left.category().cmp(right.category()))
        .then_with(|| left.context().cmp(right.context()))
        .then_with(|| left.matched_company().cmp(right.matched_company()))
        .then_with(|| left.source().cmp(right.source()))
}
