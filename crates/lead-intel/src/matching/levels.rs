use serde::{Deserialize, Serialize};

/// Count of independently confirmed, non-duplicate sources, clamped to five.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchLevel {
    None,
    Single,
    Double,
    Triple,
    Quadruple,
    Quintuple,
}

impl MatchLevel {
    pub fn from_source_count(count: usize) -> Self {
        match count {
            0 => MatchLevel::None,
            1 => MatchLevel::Single,
            2 => MatchLevel::Double,
            3 => MatchLevel::Triple,
            4 => MatchLevel::Quadruple,
            _ => MatchLevel::Quintuple,
        }
    }

    pub fn value(self) -> u8 {
        self as u8
    }

    pub fn confidence(self) -> ConfidenceTier {
        match self {
            MatchLevel::None => ConfidenceTier::None,
            MatchLevel::Single => ConfidenceTier::Baixa,
            MatchLevel::Double => ConfidenceTier::Media,
            MatchLevel::Triple => ConfidenceTier::Boa,
            MatchLevel::Quadruple => ConfidenceTier::MuitoBoa,
            MatchLevel::Quintuple => ConfidenceTier::Excelente,
        }
    }

    pub fn fit_rating(self) -> FitRating {
        match self {
            MatchLevel::None => FitRating::Nenhum,
            MatchLevel::Single => FitRating::Baixo,
            MatchLevel::Double | MatchLevel::Triple => FitRating::Medio,
            MatchLevel::Quadruple | MatchLevel::Quintuple => FitRating::Alto,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfidenceTier {
    None,
    Baixa,
    Media,
    Boa,
    MuitoBoa,
    Excelente,
}

impl ConfidenceTier {
    pub fn percent(self) -> u8 {
        match self {
            ConfidenceTier::None => 0,
            ConfidenceTier::Baixa => 40,
            ConfidenceTier::Media => 60,
            ConfidenceTier::Boa => 75,
            ConfidenceTier::MuitoBoa => 90,
            ConfidenceTier::Excelente => 98,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ConfidenceTier::None => "NONE",
            ConfidenceTier::Baixa => "BAIXA",
            ConfidenceTier::Media => "MEDIA",
            ConfidenceTier::Boa => "BOA",
            ConfidenceTier::MuitoBoa => "MUITO_BOA",
            ConfidenceTier::Excelente => "EXCELENTE",
        }
    }
}

/// Qualitative product-usage fit derived from the match level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FitRating {
    #[serde(rename = "NENHUM")]
    Nenhum,
    #[serde(rename = "BAIXO")]
    Baixo,
    #[serde(rename = "MÉDIO")]
    Medio,
    #[serde(rename = "ALTO")]
    Alto,
}
