use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Deserializer};
use tracing::{info, warn};

use super::{CandidatePool, CandidateRecord};
use crate::model::CompanyProfile;

/// Provider tag given to pools built from Apollo exports.
pub const APOLLO_PROVIDER: &str = "apollo";

#[derive(Debug)]
pub enum CandidateImportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl fmt::Display for CandidateImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CandidateImportError::Io(err) => write!(f, "failed to read candidate export: {}", err),
            CandidateImportError::Csv(err) => write!(f, "invalid candidate CSV data: {}", err),
        }
    }
}

impl std::error::Error for CandidateImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CandidateImportError::Io(err) => Some(err),
            CandidateImportError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for CandidateImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for CandidateImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Reads an Apollo organization export into a candidate pool.
///
/// Rows without a `Similarity Score` column value get `default_score`. Rows
/// without a company name are skipped.
pub fn apollo_pool_from_reader<R: Read>(
    reader: R,
    default_score: f64,
) -> Result<CandidatePool, CandidateImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for (line, row) in csv_reader.deserialize::<ApolloCompanyRow>().enumerate() {
        let row = row?;
        let Some(name) = row.company.clone() else {
            warn!(row = line + 1, "skipping Apollo row without company name");
            continue;
        };
        let score = row.similarity_score().unwrap_or(default_score);
        records.push(CandidateRecord::new(
            APOLLO_PROVIDER,
            row.into_profile(name),
            score,
        ));
    }

    info!(records = records.len(), "Apollo candidates imported");
    Ok(CandidatePool {
        provider: APOLLO_PROVIDER.to_string(),
        records,
    })
}

pub fn apollo_pool_from_path<P: AsRef<Path>>(
    path: P,
    default_score: f64,
) -> Result<CandidatePool, CandidateImportError> {
    let file = File::open(path)?;
    apollo_pool_from_reader(file, default_score)
}

#[derive(Debug, Deserialize)]
struct ApolloCompanyRow {
    #[serde(rename = "Company", default, deserialize_with = "empty_string_as_none")]
    company: Option<String>,
    #[serde(rename = "Website", default, deserialize_with = "empty_string_as_none")]
    website: Option<String>,
    #[serde(
        rename = "Company City",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    city: Option<String>,
    #[serde(
        rename = "Company State",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    state: Option<String>,
    #[serde(
        rename = "# Employees",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    employees: Option<String>,
    #[serde(rename = "Industry", default, deserialize_with = "empty_string_as_none")]
    industry: Option<String>,
    #[serde(
        rename = "Technologies",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    technologies: Option<String>,
    #[serde(
        rename = "Similarity Score",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    similarity_score: Option<String>,
}

impl ApolloCompanyRow {
    fn similarity_score(&self) -> Option<f64> {
        self.similarity_score
            .as_deref()
            .and_then(|value| value.trim_end_matches('%').trim().parse::<f64>().ok())
            .filter(|score| score.is_finite())
    }

    fn into_profile(self, name: String) -> CompanyProfile {
        let mut profile = CompanyProfile::named(name);
        profile.identity.sector = self.industry;
        profile.domain = self.website;
        profile.city = self.city;
        profile.state = self.state;
        profile.employees = self.employees.as_deref().and_then(parse_headcount);
        profile.technologies = self
            .technologies
            .as_deref()
            .map(|value| {
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|technology| !technology.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        profile
    }
}

/// Apollo writes headcounts like `1,200`.
fn parse_headcount(value: &str) -> Option<u32> {
    let digits: String = value.chars().filter(char::is_ascii_digit).collect();
    digits.parse().ok()
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPORT: &str = "\
Company,Website,Company City,Company State,# Employees,Industry,Technologies,Similarity Score
Acme S.A.,https://acme.com,Curitiba,PR,\"1,200\",Retail,\"SAP, Salesforce\",82
Beta Ltda,beta.com.br,,,35,Logistics,,
,orphan.com,,,,,,90
";

    #[test]
    fn parses_rows_into_tagged_pool() {
        let pool = apollo_pool_from_reader(EXPORT.as_bytes(), 50.0).expect("valid export");

        assert_eq!(pool.provider, "apollo");
        assert_eq!(pool.records.len(), 2);

        let acme = &pool.records[0];
        assert_eq!(acme.similarity_score, 82.0);
        assert_eq!(acme.profile.employees, Some(1200));
        assert_eq!(acme.profile.technologies, vec!["SAP", "Salesforce"]);
        assert_eq!(acme.profile.state.as_deref(), Some("PR"));
        assert!(acme.sources.contains("apollo"));

        let beta = &pool.records[1];
        assert_eq!(beta.similarity_score, 50.0);
        assert!(beta.profile.city.is_none());
        assert!(beta.profile.technologies.is_empty());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let error = apollo_pool_from_path("/nonexistent/apollo.csv", 50.0).expect_err("no file");
        assert!(matches!(error, CandidateImportError::Io(_)));
    }
}
