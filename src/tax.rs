//! Net-wage calculation.
//!
//! The `tax` module defines the [`GrossToNet`] trait, the seam through
//! which the batch engine reaches a net-wage calculator, and
//! [`StandardCalculator`], a simplified reference model of German
//! payroll: employee social insurance, wage tax by the §32a tariff,
//! solidarity surcharge and church tax.  It approximates the official
//! wage tax algorithm and should not be used for real payslips.

use crate::error::CalculationError;
use crate::insurance::{employee_contributions, employer_contributions, InsuranceProfile};
use crate::models::{CalculationResult, GrossToNetInput, HealthInsurance, Period};
use crate::rates::{
    self, FederalState, YearRates, EMPLOYEE_LUMP_SUM, MIN_PROVISION_CAP,
    MIN_PROVISION_CAP_CLASS_III, MIN_PROVISION_RATE, SINGLE_PARENT_RELIEF,
    SPECIAL_EXPENSES_LUMP_SUM,
};

/// A net-wage calculator turns one fully resolved input into the gross
/// to net breakdown, or rejects the input.
///
/// Calculators must be thread‑safe (`Send + Sync`) because the engine
/// invokes them concurrently for the entries of a batch.
pub trait GrossToNet: Send + Sync {
    fn validate_and_calculate(
        &self,
        input: &GrossToNetInput,
    ) -> Result<CalculationResult, CalculationError>;
}

/// Wage tax class (Steuerklasse).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaxClass {
    I,
    II,
    III,
    IV,
    V,
    VI,
}

impl TaxClass {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(TaxClass::I),
            2 => Some(TaxClass::II),
            3 => Some(TaxClass::III),
            4 => Some(TaxClass::IV),
            5 => Some(TaxClass::V),
            6 => Some(TaxClass::VI),
            _ => None,
        }
    }
}

/// Upper bound for any euro amount in the input.
pub const MAX_AMOUNT: f64 = 1_000_000_000.0;

/// Reference calculator backed by the parameter tables in [`crate::rates`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardCalculator;

/// Input after validation, with codes turned into types.
struct Checked<'a> {
    rates: &'static YearRates,
    input: &'a GrossToNetInput,
    tax_class: TaxClass,
    state: FederalState,
    church: bool,
    period: Period,
    profile: InsuranceProfile,
    levies_active: bool,
}

impl StandardCalculator {
    fn validate<'a>(&self, input: &'a GrossToNetInput) -> Result<Checked<'a>, CalculationError> {
        let t = &input.template;

        let rates = rates::for_year(&t.accounting_year).ok_or_else(|| {
            CalculationError::UnsupportedYear {
                year: t.accounting_year.clone(),
                supported: rates::supported_years()
                    .map(|y| y.to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
            }
        })?;
        let tax_class = TaxClass::from_code(t.tax_class).ok_or_else(|| {
            CalculationError::invalid(
                "inputTaxClass",
                format!("must be between 1 and 6, got {}", t.tax_class),
            )
        })?;
        let state = FederalState::from_name(&t.state).ok_or_else(|| {
            CalculationError::invalid("inputState", format!("unknown federal state {:?}", t.state))
        })?;
        let church = flag("inputChurchTax", t.church_tax)?;
        if t.year_of_birth < 1900 || t.year_of_birth > i64::from(rates.year) {
            return Err(CalculationError::invalid(
                "inputYearOfBirth",
                format!("must be between 1900 and {}, got {}", rates.year, t.year_of_birth),
            ));
        }
        if t.children < 0 {
            return Err(CalculationError::invalid(
                "inputChildren",
                format!("must not be negative, got {}", t.children),
            ));
        }
        in_range("inputChildTaxAllowance", t.child_tax_allowance, 0.0, 10.0)?;
        amount("inputTaxAllowance", t.tax_allowance)?;
        amount("inputPkvContribution", t.pkv_contribution)?;
        amount("inputEmployerSubsidy", t.employer_subsidy)?;
        in_range("inputLevyOne", t.levy_one, 0.0, 100.0)?;
        in_range("inputLevyTwo", t.levy_two, 0.0, 100.0)?;
        let pension_exempt = flag("inputPensionInsurance", t.pension_insurance)?;
        let levies_active = flag("inputActivateLevy", t.activate_levy)?;
        let health = HealthInsurance::from_code(t.health_insurance).ok_or_else(|| {
            CalculationError::invalid(
                "inputHealthInsurance",
                format!("must be -1, 0 or 1, got {}", t.health_insurance),
            )
        })?;
        in_range(
            "inputAdditionalContribution",
            t.additional_contribution,
            0.0,
            10.0,
        )?;
        let period = Period::from_code(t.period).ok_or_else(|| {
            CalculationError::invalid("inputPeriod", format!("must be 1 or 2, got {}", t.period))
        })?;
        amount("inputGrossWage", input.gross_wage)?;

        Ok(Checked {
            rates,
            input,
            tax_class,
            state,
            church,
            period,
            profile: InsuranceProfile {
                health,
                state,
                additional_contribution: t.additional_contribution,
                age: i64::from(rates.year) - t.year_of_birth,
                children: t.children,
                pension_exempt,
                pkv_contribution: t.pkv_contribution,
                employer_subsidy: t.employer_subsidy,
            },
            levies_active,
        })
    }
}

impl GrossToNet for StandardCalculator {
    fn validate_and_calculate(
        &self,
        input: &GrossToNetInput,
    ) -> Result<CalculationResult, CalculationError> {
        let c = self.validate(input)?;
        let t = &c.input.template;
        let rates = c.rates;

        let per_year = c.period.per_year();
        let gross_year = c.input.gross_wage * per_year;
        let gross_month = gross_year / 12.0;

        let insurance = employee_contributions(rates, &c.profile, gross_month);
        let employer = employer_contributions(rates, &c.profile, gross_month);

        let taxable = taxable_income(
            c.tax_class,
            gross_year,
            insurance.pension * 12.0,
            (insurance.health + insurance.care) * 12.0,
            t.tax_allowance * per_year,
        );
        let income_tax_year = wage_tax(rates, c.tax_class, taxable);

        // surcharges are assessed after the child allowances
        let child_units = match c.tax_class {
            TaxClass::IV => t.child_tax_allowance / 2.0,
            TaxClass::V | TaxClass::VI => 0.0,
            _ => t.child_tax_allowance,
        };
        let surcharge_base = wage_tax(
            rates,
            c.tax_class,
            (taxable - child_units * rates.child_allowance).max(0.0),
        );
        let soli_year = solidarity_surcharge(rates, c.tax_class, surcharge_base);
        let church_year = if c.church {
            surcharge_base * c.state.church_tax_rate()
        } else {
            0.0
        };

        let income_tax_month = cents(income_tax_year / 12.0);
        let soli_month = cents(soli_year / 12.0);
        let church_month = cents(church_year / 12.0);
        let total_taxes = cents(income_tax_month + soli_month + church_month);

        let health_month = cents(insurance.health);
        let care_month = cents(insurance.care);
        let pension_month = cents(insurance.pension);
        let unemployment_month = cents(insurance.unemployment);
        let total_insurances = cents(health_month + care_month + pension_month + unemployment_month);

        let net_wage_month = cents(gross_month - total_taxes - total_insurances);

        let levies = if c.levies_active {
            gross_month.min(rates.pension_ceiling_month) * (t.levy_one + t.levy_two) / 100.0
        } else {
            0.0
        };

        Ok(CalculationResult {
            gross_wage_month: cents(gross_month),
            gross_wage_year: cents(gross_year),
            net_wage_month,
            net_wage_year: cents(net_wage_month * 12.0),
            income_tax_month,
            solidarity_surcharge_month: soli_month,
            church_tax_month: church_month,
            total_taxes,
            health_insurance_month: health_month,
            care_insurance_month: care_month,
            pension_insurance_month: pension_month,
            unemployment_insurance_month: unemployment_month,
            total_insurances,
            employer_costs_month: cents(gross_month + employer.total() + levies),
        })
    }
}

/// Annual taxable income after lump sums and provision deductions.
pub fn taxable_income(
    class: TaxClass,
    gross_year: f64,
    pension_year: f64,
    health_care_year: f64,
    allowance_year: f64,
) -> f64 {
    let lump_sums = match class {
        TaxClass::VI => 0.0,
        _ => EMPLOYEE_LUMP_SUM + SPECIAL_EXPENSES_LUMP_SUM,
    };
    let min_cap = if class == TaxClass::III {
        MIN_PROVISION_CAP_CLASS_III
    } else {
        MIN_PROVISION_CAP
    };
    let min_provision = (gross_year * MIN_PROVISION_RATE).min(min_cap);
    let provision = pension_year + health_care_year.max(min_provision);
    let relief = if class == TaxClass::II {
        SINGLE_PARENT_RELIEF
    } else {
        0.0
    };
    (gross_year - lump_sums - provision - allowance_year - relief).max(0.0)
}

/// Annual wage tax for the class, rounded down to the full euro.
pub fn wage_tax(rates: &YearRates, class: TaxClass, taxable: f64) -> f64 {
    let tax = match class {
        TaxClass::III => 2.0 * tariff(rates, taxable / 2.0),
        TaxClass::V | TaxClass::VI => {
            let spread = 2.0 * (tariff(rates, taxable * 1.25) - tariff(rates, taxable * 0.75));
            spread.max(taxable * 0.14)
        }
        _ => tariff(rates, taxable),
    };
    tax.floor()
}

/// Income tax tariff (§32a EStG) on an annual taxable income.
pub fn tariff(rates: &YearRates, income: f64) -> f64 {
    let x = income.floor();
    if x <= rates.basic_allowance {
        0.0
    } else if x <= rates.zone2_limit {
        let y = (x - rates.basic_allowance) / 10_000.0;
        (rates.zone2_coeff * y + 1_400.0) * y
    } else if x <= rates.zone3_limit {
        let z = (x - rates.zone2_limit) / 10_000.0;
        (rates.zone3_coeff * z + 2_397.0) * z + rates.zone3_const
    } else if x <= rates.zone4_limit {
        0.42 * x - rates.zone4_const
    } else {
        0.45 * x - rates.zone5_const
    }
}

/// Annual solidarity surcharge including the phase-in above the
/// exemption limit.
pub fn solidarity_surcharge(rates: &YearRates, class: TaxClass, income_tax: f64) -> f64 {
    let exemption = if class == TaxClass::III {
        rates.soli_exemption * 2.0
    } else {
        rates.soli_exemption
    };
    if income_tax <= exemption {
        return 0.0;
    }
    let full = income_tax * 0.055;
    let phased = (income_tax - exemption) * 0.119;
    full.min(phased)
}

fn cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

fn flag(field: &'static str, value: i64) -> Result<bool, CalculationError> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(CalculationError::invalid(
            field,
            format!("must be 0 or 1, got {}", other),
        )),
    }
}

/// Amounts are per period; the cap keeps yearly figures finite.
fn amount(field: &'static str, value: f64) -> Result<(), CalculationError> {
    in_range(field, value, 0.0, MAX_AMOUNT)
}

fn in_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), CalculationError> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(CalculationError::invalid(
            field,
            format!("must be between {} and {}, got {}", min, max, value),
        ))
    }
}
