use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Caller-owned Ideal Customer Profile: a set of weighted criteria.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IcpDefinition {
    pub id: String,
    pub name: String,
    /// Wins ties when a lead is scored against several ICPs.
    #[serde(default)]
    pub primary: bool,
    #[serde(default)]
    pub criteria: Vec<IcpCriterion>,
}

impl IcpDefinition {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            primary: false,
            criteria: Vec::new(),
        }
    }

    pub fn with_criterion(mut self, criterion: IcpCriterion) -> Self {
        self.criteria.push(criterion);
        self
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        for criterion in &self.criteria {
            criterion
                .validate()
                .map_err(|detail| EngineError::MalformedIcp {
                    icp: self.id.clone(),
                    detail: format!("criterion '{}': {detail}", criterion.label()),
                })?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IcpCriterion {
    #[serde(default)]
    pub name: Option<String>,
    pub weight: f64,
    #[serde(flatten)]
    pub predicate: CriterionPredicate,
}

impl IcpCriterion {
    pub fn new(weight: f64, predicate: CriterionPredicate) -> Self {
        Self {
            name: None,
            weight,
            predicate,
        }
    }

    /// Display name, defaulting to the predicate kind.
    pub fn label(&self) -> &str {
        self.name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| self.predicate.kind())
    }

    fn validate(&self) -> Result<(), String> {
        if !self.weight.is_finite() || self.weight < 0.0 {
            return Err(format!("weight {} must be a non-negative number", self.weight));
        }
        self.predicate.validate()
    }
}

fn default_tolerance() -> f64 {
    0.5
}

fn default_min_matches() -> usize {
    1
}

/// Satisfaction predicate evaluated against a company profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CriterionPredicate {
    /// Sector contains one of the keywords.
    Industry { values: Vec<String> },
    /// Activity code starts with a prefix; same two-digit group earns half.
    ActivityCode { prefixes: Vec<String> },
    /// Headcount band. Outside the band the degree decays linearly to zero
    /// over `tolerance` times the nearest bound.
    EmployeeRange {
        #[serde(default)]
        min: Option<u32>,
        #[serde(default)]
        max: Option<u32>,
        #[serde(default = "default_tolerance")]
        tolerance: f64,
    },
    CapitalRange {
        #[serde(default)]
        min: Option<f64>,
        #[serde(default)]
        max: Option<f64>,
        #[serde(default = "default_tolerance")]
        tolerance: f64,
    },
    Region {
        #[serde(default)]
        states: Vec<String>,
        #[serde(default)]
        cities: Vec<String>,
    },
    /// Graded by matched signals over `min_matches`.
    TechSignals {
        any_of: Vec<String>,
        #[serde(default = "default_min_matches")]
        min_matches: usize,
    },
    RegistrationStatus { allowed: Vec<String> },
}

impl CriterionPredicate {
    pub fn kind(&self) -> &'static str {
        match self {
            CriterionPredicate::Industry { .. } => "industry",
            CriterionPredicate::ActivityCode { .. } => "activity_code",
            CriterionPredicate::EmployeeRange { .. } => "employee_range",
            CriterionPredicate::CapitalRange { .. } => "capital_range",
            CriterionPredicate::Region { .. } => "region",
            CriterionPredicate::TechSignals { .. } => "tech_signals",
            CriterionPredicate::RegistrationStatus { .. } => "registration_status",
        }
    }

    fn validate(&self) -> Result<(), String> {
        match self {
            CriterionPredicate::Industry { values } => non_empty("values", values),
            CriterionPredicate::ActivityCode { prefixes } => {
                non_empty("prefixes", prefixes)?;
                if prefixes
                    .iter()
                    .any(|prefix| !prefix.chars().any(|c| c.is_ascii_digit()))
                {
                    return Err("activity code prefixes need digits".to_string());
                }
                Ok(())
            }
            CriterionPredicate::EmployeeRange {
                min,
                max,
                tolerance,
            } => validate_band(min.map(f64::from), max.map(f64::from), *tolerance),
            CriterionPredicate::CapitalRange {
                min,
                max,
                tolerance,
            } => validate_band(*min, *max, *tolerance),
            CriterionPredicate::Region { states, cities } => {
                if states.iter().chain(cities).all(|value| value.trim().is_empty()) {
                    return Err("region needs at least one state or city".to_string());
                }
                Ok(())
            }
            CriterionPredicate::TechSignals { any_of, .. } => non_empty("any_of", any_of),
            CriterionPredicate::RegistrationStatus { allowed } => non_empty("allowed", allowed),
        }
    }
}

fn non_empty(field: &str, values: &[String]) -> Result<(), String> {
    if values.iter().all(|value| value.trim().is_empty()) {
        return Err(format!("{field} must list at least one value"));
    }
    Ok(())
}

fn validate_band(min: Option<f64>, max: Option<f64>, tolerance: f64) -> Result<(), String> {
    if min.is_none() && max.is_none() {
        return Err("range needs a min or a max".to_string());
    }
    for bound in [min, max].into_iter().flatten() {
        if !bound.is_finite() || bound < 0.0 {
            return Err(format!("range bound {bound} must be a non-negative number"));
        }
    }
    if let (Some(min), Some(max)) = (min, max) {
        if min > max {
            return Err(format!("range min {min} exceeds max {max}"));
        }
    }
    if !tolerance.is_finite() || tolerance < 0.0 {
        return Err(format!("tolerance {tolerance} must be a non-negative number"));
    }
    Ok(())
}
