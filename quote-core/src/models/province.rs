use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Canadian provinces and territories recognised by the tax table.
///
/// Quote headers store the province as free text; [`Province::parse`] is the
/// single place that text is interpreted. Codes that do not parse carry a
/// zero tax rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Province {
    Alberta,
    BritishColumbia,
    Manitoba,
    NewBrunswick,
    NewfoundlandAndLabrador,
    NovaScotia,
    NorthwestTerritories,
    Nunavut,
    Ontario,
    PrinceEdwardIsland,
    Quebec,
    Saskatchewan,
    Yukon,
}

impl Province {
    pub const ALL: [Province; 13] = [
        Self::Alberta,
        Self::BritishColumbia,
        Self::Manitoba,
        Self::NewBrunswick,
        Self::NewfoundlandAndLabrador,
        Self::NovaScotia,
        Self::NorthwestTerritories,
        Self::Nunavut,
        Self::Ontario,
        Self::PrinceEdwardIsland,
        Self::Quebec,
        Self::Saskatchewan,
        Self::Yukon,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Alberta => "AB",
            Self::BritishColumbia => "BC",
            Self::Manitoba => "MB",
            Self::NewBrunswick => "NB",
            Self::NewfoundlandAndLabrador => "NL",
            Self::NovaScotia => "NS",
            Self::NorthwestTerritories => "NT",
            Self::Nunavut => "NU",
            Self::Ontario => "ON",
            Self::PrinceEdwardIsland => "PE",
            Self::Quebec => "QC",
            Self::Saskatchewan => "SK",
            Self::Yukon => "YT",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Alberta => "Alberta",
            Self::BritishColumbia => "British Columbia",
            Self::Manitoba => "Manitoba",
            Self::NewBrunswick => "New Brunswick",
            Self::NewfoundlandAndLabrador => "Newfoundland and Labrador",
            Self::NovaScotia => "Nova Scotia",
            Self::NorthwestTerritories => "Northwest Territories",
            Self::Nunavut => "Nunavut",
            Self::Ontario => "Ontario",
            Self::PrinceEdwardIsland => "Prince Edward Island",
            Self::Quebec => "Quebec",
            Self::Saskatchewan => "Saskatchewan",
            Self::Yukon => "Yukon",
        }
    }

    /// Parses a two-letter code, ignoring case and surrounding whitespace.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AB" => Some(Self::Alberta),
            "BC" => Some(Self::BritishColumbia),
            "MB" => Some(Self::Manitoba),
            "NB" => Some(Self::NewBrunswick),
            "NL" => Some(Self::NewfoundlandAndLabrador),
            "NS" => Some(Self::NovaScotia),
            "NT" => Some(Self::NorthwestTerritories),
            "NU" => Some(Self::Nunavut),
            "ON" => Some(Self::Ontario),
            "PE" => Some(Self::PrinceEdwardIsland),
            "QC" => Some(Self::Quebec),
            "SK" => Some(Self::Saskatchewan),
            "YT" => Some(Self::Yukon),
            _ => None,
        }
    }

    /// Combined sales tax rate applied to quotations for this province.
    pub fn tax_rate(&self) -> Decimal {
        match self {
            Self::Alberta => Decimal::new(5, 2),
            Self::BritishColumbia => Decimal::new(12, 2),
            Self::Manitoba => Decimal::new(12, 2),
            Self::NewBrunswick => Decimal::new(15, 2),
            Self::NewfoundlandAndLabrador => Decimal::new(15, 2),
            Self::NovaScotia => Decimal::new(14, 2),
            Self::NorthwestTerritories => Decimal::new(5, 2),
            Self::Nunavut => Decimal::new(5, 2),
            Self::Ontario => Decimal::new(13, 2),
            Self::PrinceEdwardIsland => Decimal::new(15, 2),
            Self::Quebec => Decimal::new(14975, 5),
            Self::Saskatchewan => Decimal::new(11, 2),
            Self::Yukon => Decimal::new(5, 2),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn parse_accepts_known_codes() {
        assert_eq!(Province::parse("QC"), Some(Province::Quebec));
        assert_eq!(Province::parse("ON"), Some(Province::Ontario));
        assert_eq!(Province::parse("YT"), Some(Province::Yukon));
    }

    #[test]
    fn parse_ignores_case_and_whitespace() {
        assert_eq!(Province::parse(" qc "), Some(Province::Quebec));
        assert_eq!(Province::parse("on"), Some(Province::Ontario));
    }

    #[test]
    fn parse_rejects_unknown_codes() {
        assert_eq!(Province::parse("XX"), None);
        assert_eq!(Province::parse(""), None);
        assert_eq!(Province::parse("Quebec"), None);
    }

    #[test]
    fn parse_round_trips_every_code() {
        for province in Province::ALL {
            assert_eq!(Province::parse(province.as_str()), Some(province));
        }
    }

    #[test]
    fn quebec_rate_matches_combined_gst_qst() {
        assert_eq!(Province::Quebec.tax_rate(), dec!(0.14975));
    }

    #[test]
    fn ontario_rate_matches_hst() {
        assert_eq!(Province::Ontario.tax_rate(), dec!(0.13));
    }

    #[test]
    fn every_rate_is_within_bounds() {
        for province in Province::ALL {
            let rate = province.tax_rate();
            assert!(rate >= Decimal::ZERO, "{} rate below zero", province.as_str());
            assert!(rate <= dec!(0.15), "{} rate above 15%", province.as_str());
        }
    }
}
