use std::fmt;

use serde::{Deserialize, Serialize};

/// Income type codes used on Form 1040-NR Schedule OI to identify the treaty
/// article an exemption is claimed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum IncomeTypeCode {
    /// Scholarship or fellowship grants.
    #[serde(rename = "16")]
    Scholarship,
    /// Compensation for teaching and research.
    #[serde(rename = "19")]
    TeachingResearch,
    /// Compensation during studying and training.
    #[serde(rename = "20")]
    StudyingTraining,
}

impl IncomeTypeCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scholarship => "16",
            Self::TeachingResearch => "19",
            Self::StudyingTraining => "20",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "16" => Some(Self::Scholarship),
            "19" => Some(Self::TeachingResearch),
            "20" => Some(Self::StudyingTraining),
            _ => None,
        }
    }

    pub fn all() -> &'static [IncomeTypeCode] {
        &[
            Self::Scholarship,
            Self::TeachingResearch,
            Self::StudyingTraining,
        ]
    }
}

impl fmt::Display for IncomeTypeCode {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// The income field an exemption provision reduces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExemptionTarget {
    Wages,
    Scholarships,
}

impl ExemptionTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wages => "wages",
            Self::Scholarships => "scholarships",
        }
    }
}

/// Income categories that can be taxed at a reduced treaty rate instead of
/// the statutory flat rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IncomeCategory {
    CapitalGains,
}

impl IncomeCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CapitalGains => "capitalGains",
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn income_type_code_round_trips_through_str() {
        for code in IncomeTypeCode::all() {
            assert_eq!(IncomeTypeCode::parse(code.as_str()), Some(*code));
        }
    }

    #[test]
    fn income_type_code_rejects_unknown() {
        assert_eq!(IncomeTypeCode::parse("17"), None);
        assert_eq!(IncomeTypeCode::parse(""), None);
        assert_eq!(IncomeTypeCode::parse(" 16"), None);
    }

    #[test]
    fn income_type_code_orders_numerically() {
        assert!(IncomeTypeCode::Scholarship < IncomeTypeCode::TeachingResearch);
        assert!(IncomeTypeCode::TeachingResearch < IncomeTypeCode::StudyingTraining);
    }

    #[test]
    fn income_type_code_displays_as_form_code() {
        assert_eq!(IncomeTypeCode::StudyingTraining.to_string(), "20");
    }
}
