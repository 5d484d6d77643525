//! Social insurance contributions.
//!
//! Contributions are computed on the monthly wage, capped at the
//! year's contribution ceilings.  Results are monthly euro amounts,
//! not yet rounded.

use crate::models::HealthInsurance;
use crate::rates::{
    FederalState, YearRates, CARE_CHILDLESS_MIN_AGE, CARE_CHILDLESS_SURCHARGE, CARE_CHILD_RELIEF,
    CARE_SAXONY_SHIFT,
};

/// Person-specific parameters that influence contributions.
#[derive(Debug, Clone, Copy)]
pub struct InsuranceProfile {
    pub health: HealthInsurance,
    pub state: FederalState,
    /// Statutory additional health contribution in percent.
    pub additional_contribution: f64,
    /// Age reached in the accounting year.
    pub age: i64,
    pub children: i64,
    pub pension_exempt: bool,
    /// Monthly private premium and employer subsidy (PKV only).
    pub pkv_contribution: f64,
    pub employer_subsidy: f64,
}

/// Monthly contributions, split by branch.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Contributions {
    pub health: f64,
    pub care: f64,
    pub pension: f64,
    pub unemployment: f64,
}

impl Contributions {
    pub fn total(&self) -> f64 {
        self.health + self.care + self.pension + self.unemployment
    }
}

/// Employee share of each branch.
pub fn employee_contributions(
    rates: &YearRates,
    profile: &InsuranceProfile,
    gross_month: f64,
) -> Contributions {
    let health_base = gross_month.min(rates.health_ceiling_month);
    let pension_base = gross_month.min(rates.pension_ceiling_month);

    let (health, care) = match profile.health {
        HealthInsurance::Private => (
            (profile.pkv_contribution - profile.employer_subsidy).max(0.0),
            0.0,
        ),
        HealthInsurance::Statutory | HealthInsurance::VoluntaryStatutory => (
            health_base * (rates.health_rate / 2.0 + profile.additional_contribution / 2.0) / 100.0,
            health_base * care_rate_employee(rates, profile) / 100.0,
        ),
    };
    let pension = if profile.pension_exempt {
        0.0
    } else {
        pension_base * rates.pension_rate / 2.0 / 100.0
    };
    let unemployment = pension_base * rates.unemployment_rate / 2.0 / 100.0;

    Contributions {
        health,
        care,
        pension,
        unemployment,
    }
}

/// Employer share of each branch.  For private health insurance the
/// employer pays the subsidy.
pub fn employer_contributions(
    rates: &YearRates,
    profile: &InsuranceProfile,
    gross_month: f64,
) -> Contributions {
    let health_base = gross_month.min(rates.health_ceiling_month);
    let pension_base = gross_month.min(rates.pension_ceiling_month);

    let (health, care) = match profile.health {
        HealthInsurance::Private => (profile.employer_subsidy, 0.0),
        HealthInsurance::Statutory | HealthInsurance::VoluntaryStatutory => {
            let care_rate = if profile.state == FederalState::Sachsen {
                rates.care_rate_employer - CARE_SAXONY_SHIFT
            } else {
                rates.care_rate_employer
            };
            (
                health_base * (rates.health_rate / 2.0 + profile.additional_contribution / 2.0)
                    / 100.0,
                health_base * care_rate / 100.0,
            )
        }
    };
    let pension = if profile.pension_exempt {
        0.0
    } else {
        pension_base * rates.pension_rate / 2.0 / 100.0
    };

    Contributions {
        health,
        care,
        pension,
        unemployment: pension_base * rates.unemployment_rate / 2.0 / 100.0,
    }
}

/// Employee care insurance rate in percent after the childless
/// surcharge, the relief for larger families and the Sachsen shift.
fn care_rate_employee(rates: &YearRates, profile: &InsuranceProfile) -> f64 {
    let mut rate = rates.care_rate_employee;
    if profile.state == FederalState::Sachsen {
        rate += CARE_SAXONY_SHIFT;
    }
    if profile.children == 0 {
        if profile.age >= CARE_CHILDLESS_MIN_AGE {
            rate += CARE_CHILDLESS_SURCHARGE;
        }
    } else {
        let relieved = (profile.children - 1).clamp(0, 4);
        rate -= CARE_CHILD_RELIEF * relieved as f64;
    }
    rate
}
