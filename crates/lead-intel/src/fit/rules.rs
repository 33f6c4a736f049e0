use crate::model::normalizer::{normalize_label, normalize_tax_id};
use crate::model::CompanyProfile;

use super::icp::{CriterionPredicate, IcpDefinition};
use super::CriterionContribution;

/// Satisfaction degree in `[0, 1]` plus an audit note.
pub(crate) struct Satisfaction {
    pub degree: f64,
    pub notes: String,
}

/// Scores every criterion and returns the per-criterion breakdown with the 0..=100 total.
pub(crate) fn score_profile(
    profile: &CompanyProfile,
    icp: &IcpDefinition,
) -> (Vec<CriterionContribution>, u8) {
    let evaluated: Vec<(f64, Satisfaction, &str)> = icp
        .criteria
        .iter()
        .map(|criterion| {
            (
                criterion.weight,
                satisfaction(&criterion.predicate, profile),
                criterion.label(),
            )
        })
        .collect();

    // Summed in sorted order so the float result does not depend on criteria order.
    let mut weights: Vec<f64> = evaluated.iter().map(|(weight, _, _)| *weight).collect();
    let mut weighted: Vec<f64> = evaluated
        .iter()
        .map(|(weight, satisfaction, _)| weight * satisfaction.degree)
        .collect();
    weights.sort_by(f64::total_cmp);
    weighted.sort_by(f64::total_cmp);
    let total_weight: f64 = weights.iter().sum();
    let achieved: f64 = weighted.iter().sum();

    let components = evaluated
        .into_iter()
        .map(|(weight, satisfaction, label)| CriterionContribution {
            criterion: label.to_string(),
            weight,
            satisfaction: satisfaction.degree,
            points: if total_weight > 0.0 {
                weight * satisfaction.degree / total_weight * 100.0
            } else {
                0.0
            },
            notes: satisfaction.notes,
        })
        .collect();

    if total_weight <= 0.0 {
        return (components, 0);
    }
    let score = (achieved / total_weight * 100.0).round().clamp(0.0, 100.0) as u8;
    (components, score)
}

pub(crate) fn satisfaction(predicate: &CriterionPredicate, profile: &CompanyProfile) -> Satisfaction {
    match predicate {
        CriterionPredicate::Industry { values } => industry(profile, values),
        CriterionPredicate::ActivityCode { prefixes } => activity_code(profile, prefixes),
        CriterionPredicate::EmployeeRange {
            min,
            max,
            tolerance,
        } => match profile.employee_estimate() {
            Some(count) => {
                let degree = band_degree(
                    f64::from(count),
                    min.map(f64::from),
                    max.map(f64::from),
                    *tolerance,
                );
                Satisfaction {
                    degree,
                    notes: format!("{count} employees against {}", describe_band(*min, *max)),
                }
            }
            None => Satisfaction::unmet("headcount unknown"),
        },
        CriterionPredicate::CapitalRange {
            min,
            max,
            tolerance,
        } => match profile.capital {
            Some(capital) => Satisfaction {
                degree: band_degree(capital, *min, *max, *tolerance),
                notes: format!("capital {capital:.2} against {}", describe_band(*min, *max)),
            },
            None => Satisfaction::unmet("capital unknown"),
        },
        CriterionPredicate::Region { states, cities } => region(profile, states, cities),
        CriterionPredicate::TechSignals {
            any_of,
            min_matches,
        } => tech_signals(profile, any_of, *min_matches),
        CriterionPredicate::RegistrationStatus { allowed } => {
            let Some(status) = profile.registration_status.as_deref() else {
                return Satisfaction::unmet("registration status unknown");
            };
            let normalized = normalize_label(status);
            if allowed.iter().any(|value| normalize_label(value) == normalized) {
                Satisfaction::met(format!("registration status {status} allowed"))
            } else {
                Satisfaction::unmet(format!("registration status {status} not allowed"))
            }
        }
    }
}

impl Satisfaction {
    fn met(notes: impl Into<String>) -> Self {
        Self {
            degree: 1.0,
            notes: notes.into(),
        }
    }

    fn unmet(notes: impl Into<String>) -> Self {
        Self {
            degree: 0.0,
            notes: notes.into(),
        }
    }
}

fn industry(profile: &CompanyProfile, values: &[String]) -> Satisfaction {
    let Some(sector) = profile.identity.sector.as_deref() else {
        return Satisfaction::unmet("sector unknown");
    };
    let normalized = normalize_label(sector);
    let hit = values
        .iter()
        .map(|value| normalize_label(value))
        .find(|value| !value.is_empty() && normalized.contains(value.as_str()));
    match hit {
        Some(value) => Satisfaction::met(format!("sector {sector} matches '{value}'")),
        None => Satisfaction::unmet(format!("sector {sector} outside target industries")),
    }
}

fn activity_code(profile: &CompanyProfile, prefixes: &[String]) -> Satisfaction {
    let code = profile
        .activity_code
        .as_deref()
        .map(normalize_tax_id)
        .unwrap_or_default();
    if code.is_empty() {
        return Satisfaction::unmet("activity code unknown");
    }

    let prefixes: Vec<String> = prefixes
        .iter()
        .map(|prefix| normalize_tax_id(prefix))
        .filter(|prefix| !prefix.is_empty())
        .collect();

    if let Some(prefix) = prefixes.iter().find(|prefix| code.starts_with(prefix.as_str())) {
        return Satisfaction::met(format!("activity code {code} under {prefix}"));
    }
    let same_group = prefixes
        .iter()
        .find(|prefix| prefix.len() >= 2 && code.len() >= 2 && prefix[..2] == code[..2]);
    match same_group {
        Some(prefix) => Satisfaction {
            degree: 0.5,
            notes: format!("activity code {code} shares division with {prefix}"),
        },
        None => Satisfaction::unmet(format!("activity code {code} outside targets")),
    }
}

fn region(profile: &CompanyProfile, states: &[String], cities: &[String]) -> Satisfaction {
    let state = profile.state.as_deref().map(normalize_label);
    let city = profile.city.as_deref().map(normalize_label);

    let state_hit = state
        .as_ref()
        .is_some_and(|state| states.iter().any(|value| normalize_label(value) == *state));
    let city_hit = city
        .as_ref()
        .is_some_and(|city| cities.iter().any(|value| normalize_label(value) == *city));

    if state_hit || city_hit {
        Satisfaction::met(format!(
            "located in {}",
            [profile.city.as_deref(), profile.state.as_deref()]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join("/")
        ))
    } else if state.is_none() && city.is_none() {
        Satisfaction::unmet("location unknown")
    } else {
        Satisfaction::unmet("outside target region")
    }
}

fn tech_signals(profile: &CompanyProfile, any_of: &[String], min_matches: usize) -> Satisfaction {
    let signals = profile.signals();
    let wanted: Vec<String> = any_of
        .iter()
        .map(|value| normalize_label(value))
        .filter(|value| !value.is_empty())
        .collect();
    let matched: Vec<&String> = wanted
        .iter()
        .filter(|value| signals.contains(value.as_str()))
        .collect();

    let required = min_matches.clamp(1, wanted.len().max(1));
    let degree = (matched.len() as f64 / required as f64).min(1.0);
    Satisfaction {
        degree,
        notes: if matched.is_empty() {
            "no target technology detected".to_string()
        } else {
            format!(
                "{} of {required} required signal(s): {}",
                matched.len(),
                matched
                    .iter()
                    .map(|value| value.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        },
    }
}

/// 1.0 inside `[min, max]`, decaying linearly to 0 over `tolerance * bound` outside it.
pub(crate) fn band_degree(value: f64, min: Option<f64>, max: Option<f64>, tolerance: f64) -> f64 {
    let (bound, distance) = match (min, max) {
        (Some(min), _) if value < min => (min, min - value),
        (_, Some(max)) if value > max => (max, value - max),
        _ => return 1.0,
    };
    let margin = bound * tolerance;
    if margin <= 0.0 {
        return 0.0;
    }
    (1.0 - distance / margin).clamp(0.0, 1.0)
}

fn describe_band<T: std::fmt::Display>(min: Option<T>, max: Option<T>) -> String {
    match (min, max) {
        (Some(min), Some(max)) => format!("{min}..={max}"),
        (Some(min), None) => format!(">= {min}"),
        (None, Some(max)) => format!("<= {max}"),
        (None, None) => "any".to_string(),
    }
}
