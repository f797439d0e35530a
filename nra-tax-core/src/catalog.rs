//! Per-country treaty profiles.
//!
//! The catalog is reference data: built once, shared by every computation,
//! never mutated afterwards. Calculators stay country-agnostic and read all
//! country-specific behaviour from here.

use std::collections::HashMap;
use std::sync::OnceLock;

use rust_decimal_macros::dec;

use crate::models::{
    ExemptionTarget, IncomeCategory, IncomeTypeCode, TreatyExemptionProvision,
    TreatyRateProvision,
};

pub const CHINA: &str = "china";
pub const SOUTH_KOREA: &str = "southKorea";
pub const INDIA: &str = "india";

/// Treaty relief available to residents of one country.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryProfile {
    pub id: &'static str,
    pub display_name: &'static str,
    pub exemptions: Vec<TreatyExemptionProvision>,
    pub rates: Vec<TreatyRateProvision>,
}

/// Mapping from country identifier to treaty profile.
///
/// Unknown countries simply have no relief; lookups never fail.
#[derive(Debug, Clone, Default)]
pub struct TreatyCatalog {
    profiles: HashMap<&'static str, CountryProfile>,
    order: Vec<&'static str>,
}

impl TreatyCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a profile, replacing any existing profile with the same id.
    pub fn insert(
        &mut self,
        profile: CountryProfile,
    ) {
        if !self.profiles.contains_key(profile.id) {
            self.order.push(profile.id);
        }
        self.profiles.insert(profile.id, profile);
    }

    /// The built-in catalog of supported treaty countries.
    pub fn builtin() -> &'static TreatyCatalog {
        static BUILTIN: OnceLock<TreatyCatalog> = OnceLock::new();
        BUILTIN.get_or_init(builtin_catalog)
    }

    pub fn profile(
        &self,
        country: &str,
    ) -> Option<&CountryProfile> {
        self.profiles.get(country)
    }

    /// Exemption provisions for `country`, in catalog order. Empty for
    /// countries without a profile.
    pub fn provisions_for(
        &self,
        country: &str,
    ) -> &[TreatyExemptionProvision] {
        self.profile(country)
            .map(|p| p.exemptions.as_slice())
            .unwrap_or_default()
    }

    /// Reduced-rate provisions for `country`. Empty for countries without a
    /// profile.
    pub fn rates_for(
        &self,
        country: &str,
    ) -> &[TreatyRateProvision] {
        self.profile(country)
            .map(|p| p.rates.as_slice())
            .unwrap_or_default()
    }

    pub fn exemption(
        &self,
        country: &str,
        code: IncomeTypeCode,
    ) -> Option<&TreatyExemptionProvision> {
        self.provisions_for(country).iter().find(|p| p.code == code)
    }

    pub fn rate(
        &self,
        country: &str,
        category: IncomeCategory,
    ) -> Option<&TreatyRateProvision> {
        self.rates_for(country)
            .iter()
            .find(|r| r.category == category)
    }

    /// Profiles in insertion order.
    pub fn countries(&self) -> impl Iterator<Item = &CountryProfile> {
        self.order.iter().filter_map(|id| self.profiles.get(id))
    }
}

fn scholarship_grants() -> TreatyExemptionProvision {
    TreatyExemptionProvision {
        code: IncomeTypeCode::Scholarship,
        name: "Treaty Benefits for Scholarship or Fellowship Grants".to_string(),
        cap: None,
        applies_to: ExemptionTarget::Scholarships,
    }
}

fn teaching_research() -> TreatyExemptionProvision {
    TreatyExemptionProvision {
        code: IncomeTypeCode::TeachingResearch,
        name: "Treaty Benefits for Teaching and Research".to_string(),
        cap: None,
        applies_to: ExemptionTarget::Wages,
    }
}

fn studying_training(cap: rust_decimal::Decimal) -> TreatyExemptionProvision {
    TreatyExemptionProvision {
        code: IncomeTypeCode::StudyingTraining,
        name: "Treaty Benefits for Studying and Training".to_string(),
        cap: Some(cap),
        applies_to: ExemptionTarget::Wages,
    }
}

fn builtin_catalog() -> TreatyCatalog {
    let mut catalog = TreatyCatalog::new();

    catalog.insert(CountryProfile {
        id: CHINA,
        display_name: "China, People's Republic of",
        exemptions: vec![
            studying_training(dec!(5000)),
            teaching_research(),
            scholarship_grants(),
        ],
        rates: vec![],
    });

    catalog.insert(CountryProfile {
        id: SOUTH_KOREA,
        display_name: "Korea, South",
        exemptions: vec![
            scholarship_grants(),
            teaching_research(),
            studying_training(dec!(2000)),
        ],
        rates: vec![TreatyRateProvision {
            category: IncomeCategory::CapitalGains,
            name: "Treaty Rate for Capital Gains".to_string(),
            rate: dec!(0.0),
        }],
    });

    catalog.insert(CountryProfile {
        id: INDIA,
        display_name: "India",
        exemptions: vec![teaching_research()],
        rates: vec![],
    });

    catalog
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn codes(country: &str) -> Vec<IncomeTypeCode> {
        TreatyCatalog::builtin()
            .provisions_for(country)
            .iter()
            .map(|p| p.code)
            .collect()
    }

    #[test]
    fn builtin_lists_three_countries_in_order() {
        let ids: Vec<_> = TreatyCatalog::builtin().countries().map(|p| p.id).collect();

        assert_eq!(ids, vec![CHINA, SOUTH_KOREA, INDIA]);
    }

    #[test]
    fn china_provisions_in_catalog_order() {
        use IncomeTypeCode::*;

        assert_eq!(codes(CHINA), vec![StudyingTraining, TeachingResearch, Scholarship]);
    }

    #[test]
    fn south_korea_provisions_in_catalog_order() {
        use IncomeTypeCode::*;

        assert_eq!(
            codes(SOUTH_KOREA),
            vec![Scholarship, TeachingResearch, StudyingTraining]
        );
    }

    #[test]
    fn india_only_offers_teaching_research() {
        assert_eq!(codes(INDIA), vec![IncomeTypeCode::TeachingResearch]);
    }

    #[test]
    fn studying_training_caps_differ_by_country() {
        let catalog = TreatyCatalog::builtin();

        let china = catalog.exemption(CHINA, IncomeTypeCode::StudyingTraining);
        let korea = catalog.exemption(SOUTH_KOREA, IncomeTypeCode::StudyingTraining);

        assert_eq!(china.and_then(|p| p.cap), Some(dec!(5000)));
        assert_eq!(korea.and_then(|p| p.cap), Some(dec!(2000)));
    }

    #[test]
    fn unknown_country_has_no_relief() {
        let catalog = TreatyCatalog::builtin();

        assert!(catalog.provisions_for("other").is_empty());
        assert!(catalog.rates_for("other").is_empty());
        assert!(catalog.profile("").is_none());
    }

    #[test]
    fn only_south_korea_has_capital_gains_rate() {
        let catalog = TreatyCatalog::builtin();

        let korea = catalog.rate(SOUTH_KOREA, IncomeCategory::CapitalGains);
        assert_eq!(korea.map(|r| r.rate), Some(dec!(0)));
        assert!(catalog.rate(CHINA, IncomeCategory::CapitalGains).is_none());
        assert!(catalog.rate(INDIA, IncomeCategory::CapitalGains).is_none());
    }

    #[test]
    fn insert_replaces_existing_profile_without_duplicating_order() {
        let mut catalog = TreatyCatalog::new();
        let profile = CountryProfile {
            id: "testland",
            display_name: "Testland",
            exemptions: vec![],
            rates: vec![],
        };
        catalog.insert(profile.clone());
        catalog.insert(CountryProfile {
            exemptions: vec![teaching_research()],
            ..profile
        });

        assert_eq!(catalog.countries().count(), 1);
        assert_eq!(catalog.provisions_for("testland").len(), 1);
    }
}
