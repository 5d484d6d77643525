//! Statutory parameters per accounting year.
//!
//! Each [`YearRates`] bundles the income tax tariff coefficients
//! (§32a EStG), solidarity surcharge exemption limit, child allowance
//! and the social insurance rates and contribution ceilings that the
//! reference calculator needs.  Rates are percentages of the wage;
//! amounts are euro.

/// Parameters for one accounting year.
#[derive(Debug, Clone, PartialEq)]
pub struct YearRates {
    pub year: i32,

    /// Basic tax-free allowance (Grundfreibetrag).
    pub basic_allowance: f64,
    /// Upper end of the first progression zone and its coefficient.
    pub zone2_limit: f64,
    pub zone2_coeff: f64,
    /// Upper end of the second progression zone, coefficient and constant.
    pub zone3_limit: f64,
    pub zone3_coeff: f64,
    pub zone3_const: f64,
    /// Start of the 45 % zone.
    pub zone4_limit: f64,
    /// Constants subtracted in the 42 % and 45 % zones.
    pub zone4_const: f64,
    pub zone5_const: f64,

    /// Annual income tax up to which no solidarity surcharge is due.
    pub soli_exemption: f64,
    /// Child allowance per full unit (both parents).
    pub child_allowance: f64,

    /// Monthly contribution ceilings.
    pub health_ceiling_month: f64,
    pub pension_ceiling_month: f64,

    /// Total contribution rates, split evenly unless noted.
    pub health_rate: f64,
    pub pension_rate: f64,
    pub unemployment_rate: f64,
    /// Employee share of the care insurance rate outside Sachsen.
    pub care_rate_employee: f64,
    /// Employer share of the care insurance rate outside Sachsen.
    pub care_rate_employer: f64,
}

/// Lump sums that did not change across the supported years.
pub const EMPLOYEE_LUMP_SUM: f64 = 1230.0;
pub const SPECIAL_EXPENSES_LUMP_SUM: f64 = 36.0;
pub const SINGLE_PARENT_RELIEF: f64 = 4260.0;
/// Minimum health/care provision: 12 % of the wage, capped.
pub const MIN_PROVISION_RATE: f64 = 0.12;
pub const MIN_PROVISION_CAP: f64 = 1900.0;
pub const MIN_PROVISION_CAP_CLASS_III: f64 = 3000.0;
/// Care insurance surcharge for childless employees from age 23.
pub const CARE_CHILDLESS_SURCHARGE: f64 = 0.6;
pub const CARE_CHILDLESS_MIN_AGE: i64 = 23;
/// Care insurance relief per child from the second to the fifth.
pub const CARE_CHILD_RELIEF: f64 = 0.25;
/// Sachsen shifts this much of the care rate to the employee.
pub const CARE_SAXONY_SHIFT: f64 = 0.5;

static RATES: [YearRates; 3] = [
    YearRates {
        year: 2024,
        basic_allowance: 11_604.0,
        zone2_limit: 17_005.0,
        zone2_coeff: 922.98,
        zone3_limit: 66_760.0,
        zone3_coeff: 181.19,
        zone3_const: 1_025.38,
        zone4_limit: 277_825.0,
        zone4_const: 10_602.13,
        zone5_const: 18_936.88,
        soli_exemption: 18_130.0,
        child_allowance: 9_312.0,
        health_ceiling_month: 5_175.0,
        pension_ceiling_month: 7_550.0,
        health_rate: 14.6,
        pension_rate: 18.6,
        unemployment_rate: 2.6,
        care_rate_employee: 1.7,
        care_rate_employer: 1.7,
    },
    YearRates {
        year: 2025,
        basic_allowance: 12_096.0,
        zone2_limit: 17_443.0,
        zone2_coeff: 932.30,
        zone3_limit: 68_480.0,
        zone3_coeff: 176.64,
        zone3_const: 1_015.13,
        zone4_limit: 277_825.0,
        zone4_const: 10_911.92,
        zone5_const: 19_246.67,
        soli_exemption: 19_950.0,
        child_allowance: 9_600.0,
        health_ceiling_month: 5_512.5,
        pension_ceiling_month: 8_050.0,
        health_rate: 14.6,
        pension_rate: 18.6,
        unemployment_rate: 2.6,
        care_rate_employee: 1.8,
        care_rate_employer: 1.8,
    },
    YearRates {
        year: 2026,
        basic_allowance: 12_348.0,
        zone2_limit: 17_799.0,
        zone2_coeff: 914.51,
        zone3_limit: 69_878.0,
        zone3_coeff: 173.10,
        zone3_const: 1_034.87,
        zone4_limit: 277_825.0,
        zone4_const: 11_135.63,
        zone5_const: 19_470.38,
        soli_exemption: 20_350.0,
        child_allowance: 9_756.0,
        health_ceiling_month: 5_812.5,
        pension_ceiling_month: 8_450.0,
        health_rate: 14.6,
        pension_rate: 18.6,
        unemployment_rate: 2.6,
        care_rate_employee: 1.8,
        care_rate_employer: 1.8,
    },
];

/// Look up the parameters for an accounting year given as text.
pub fn for_year(year: &str) -> Option<&'static YearRates> {
    let year: i32 = year.trim().parse().ok()?;
    RATES.iter().find(|r| r.year == year)
}

/// Whether parameters exist for `year`.
pub fn is_supported(year: i32) -> bool {
    RATES.iter().any(|r| r.year == year)
}

/// Years with parameters, oldest first.
pub fn supported_years() -> impl Iterator<Item = i32> {
    RATES.iter().map(|r| r.year)
}

/// German federal states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FederalState {
    BadenWuerttemberg,
    Bayern,
    Berlin,
    Brandenburg,
    Bremen,
    Hamburg,
    Hessen,
    MecklenburgVorpommern,
    Niedersachsen,
    NordrheinWestfalen,
    RheinlandPfalz,
    Saarland,
    Sachsen,
    SachsenAnhalt,
    SchleswigHolstein,
    Thueringen,
}

impl FederalState {
    /// Parse a German state name.  Case-insensitive; umlauts may be
    /// transcribed (`Thueringen`).
    pub fn from_name(name: &str) -> Option<Self> {
        let key = name
            .trim()
            .to_lowercase()
            .replace("ü", "ue")
            .replace(['-', ' '], "");
        let state = match key.as_str() {
            "badenwuerttemberg" => FederalState::BadenWuerttemberg,
            "bayern" => FederalState::Bayern,
            "berlin" => FederalState::Berlin,
            "brandenburg" => FederalState::Brandenburg,
            "bremen" => FederalState::Bremen,
            "hamburg" => FederalState::Hamburg,
            "hessen" => FederalState::Hessen,
            "mecklenburgvorpommern" => FederalState::MecklenburgVorpommern,
            "niedersachsen" => FederalState::Niedersachsen,
            "nordrheinwestfalen" => FederalState::NordrheinWestfalen,
            "rheinlandpfalz" => FederalState::RheinlandPfalz,
            "saarland" => FederalState::Saarland,
            "sachsen" => FederalState::Sachsen,
            "sachsenanhalt" => FederalState::SachsenAnhalt,
            "schleswigholstein" => FederalState::SchleswigHolstein,
            "thueringen" => FederalState::Thueringen,
            _ => return None,
        };
        Some(state)
    }

    /// Church tax as a fraction of income tax.
    pub fn church_tax_rate(self) -> f64 {
        match self {
            FederalState::Bayern | FederalState::BadenWuerttemberg => 0.08,
            _ => 0.09,
        }
    }
}
