use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::normalizer::{normalize_label, normalize_name, normalize_tax_id};
use crate::error::EngineError;

/// Who a claim is about: legal name, trade name, tax id and sector.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompanyIdentity {
    #[serde(default)]
    pub legal_name: Option<String>,
    #[serde(default)]
    pub trade_name: Option<String>,
    #[serde(default)]
    pub tax_id: Option<String>,
    #[serde(default)]
    pub sector: Option<String>,
}

impl CompanyIdentity {
    pub fn named(legal_name: impl Into<String>) -> Self {
        Self {
            legal_name: Some(legal_name.into()),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.normalized_names().is_empty() && self.normalized_tax_id().is_none() {
            return Err(EngineError::InvalidIdentity(
                "company identity needs a legal/trade name or a tax id".to_string(),
            ));
        }
        Ok(())
    }

    /// Normalized legal and trade names, empties removed.
    pub fn normalized_names(&self) -> Vec<String> {
        let mut names: Vec<String> = [self.legal_name.as_deref(), self.trade_name.as_deref()]
            .into_iter()
            .flatten()
            .map(normalize_name)
            .filter(|name| !name.is_empty())
            .collect();
        names.dedup();
        names
    }

    pub fn normalized_tax_id(&self) -> Option<String> {
        self.tax_id
            .as_deref()
            .map(normalize_tax_id)
            .filter(|digits| !digits.is_empty())
    }

    /// Best label for reports: trade name, then legal name, then tax id.
    pub fn display_name(&self) -> String {
        self.trade_name
            .as_deref()
            .or(self.legal_name.as_deref())
            .or(self.tax_id.as_deref())
            .unwrap_or("unknown company")
            .to_string()
    }
}

/// Firmographic snapshot consumed by fit scoring and discovery.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyProfile {
    #[serde(flatten)]
    pub identity: CompanyIdentity,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    /// Primary activity code (CNAE or NAICS style).
    #[serde(default)]
    pub activity_code: Option<String>,
    #[serde(default)]
    pub employees: Option<u32>,
    #[serde(default)]
    pub size_band: Option<String>,
    #[serde(default)]
    pub capital: Option<f64>,
    #[serde(default)]
    pub registration_status: Option<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub detected_products: Vec<String>,
    #[serde(default)]
    pub disqualified: bool,
}

impl CompanyProfile {
    pub fn named(legal_name: impl Into<String>) -> Self {
        Self {
            identity: CompanyIdentity::named(legal_name),
            ..Self::default()
        }
    }

    /// Headcount, falling back to the midpoint implied by the size band.
    pub fn employee_estimate(&self) -> Option<u32> {
        self.employees
            .filter(|count| *count > 0)
            .or_else(|| self.size_band.as_deref().and_then(estimate_employees))
    }

    /// Normalized technology and product signals used for catalog matching.
    pub fn signals(&self) -> BTreeSet<String> {
        self.technologies
            .iter()
            .chain(self.detected_products.iter())
            .map(|signal| normalize_label(signal))
            .filter(|signal| !signal.is_empty())
            .collect()
    }

    /// Copies fields this profile lacks from `other`.
    pub(crate) fn fill_gaps_from(&mut self, other: &CompanyProfile) {
        fn fill<T: Clone>(slot: &mut Option<T>, value: &Option<T>) {
            if slot.is_none() {
                slot.clone_from(value);
            }
        }

        fill(&mut self.identity.legal_name, &other.identity.legal_name);
        fill(&mut self.identity.trade_name, &other.identity.trade_name);
        fill(&mut self.identity.tax_id, &other.identity.tax_id);
        fill(&mut self.identity.sector, &other.identity.sector);
        fill(&mut self.domain, &other.domain);
        fill(&mut self.city, &other.city);
        fill(&mut self.state, &other.state);
        fill(&mut self.activity_code, &other.activity_code);
        fill(&mut self.employees, &other.employees);
        fill(&mut self.size_band, &other.size_band);
        fill(&mut self.capital, &other.capital);
        fill(&mut self.registration_status, &other.registration_status);

        for technology in &other.technologies {
            if !self.technologies.contains(technology) {
                self.technologies.push(technology.clone());
            }
        }
        for product in &other.detected_products {
            if !self.detected_products.contains(product) {
                self.detected_products.push(product.clone());
            }
        }
        self.disqualified |= other.disqualified;
    }
}

fn estimate_employees(size_band: &str) -> Option<u32> {
    let band = normalize_label(size_band);
    if band.contains("mei") || band.contains("micro") {
        Some(5)
    } else if band.contains("pequen") || band.contains("epp") || band.contains("small") {
        Some(30)
    } else if band.contains("medi") {
        Some(150)
    } else if band.contains("grande") || band.contains("large") || band.contains("enterprise") {
        Some(500)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_without_name_or_tax_id_is_invalid() {
        let identity = CompanyIdentity {
            sector: Some("Retail".to_string()),
            ..CompanyIdentity::default()
        };
        assert!(identity.validate().is_err());

        let identity = CompanyIdentity {
            tax_id: Some("12.345.678/0001-90".to_string()),
            ..CompanyIdentity::default()
        };
        assert!(identity.validate().is_ok());
    }

    #[test]
    fn employee_estimate_uses_size_band() {
        let mut profile = CompanyProfile::named("Acme");
        profile.size_band = Some("Médio Porte".to_string());
        assert_eq!(profile.employee_estimate(), Some(150));

        profile.employees = Some(42);
        assert_eq!(profile.employee_estimate(), Some(42));
    }

    #[test]
    fn fill_gaps_keeps_existing_values() {
        let mut base = CompanyProfile::named("Acme");
        base.domain = Some("acme.com".to_string());
        let mut other = CompanyProfile::named("ACME SA");
        other.domain = Some("acme.com.br".to_string());
        other.city = Some("Curitiba".to_string());
        other.technologies = vec!["Salesforce".to_string()];

        base.fill_gaps_from(&other);

        assert_eq!(base.identity.legal_name.as_deref(), Some("Acme"));
        assert_eq!(base.domain.as_deref(), Some("acme.com"));
        assert_eq!(base.city.as_deref(), Some("Curitiba"));
        assert_eq!(base.technologies, vec!["Salesforce".to_string()]);
    }
}
