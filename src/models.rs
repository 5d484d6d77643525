//! Data models for the Brutto-Netto service.
//!
//! The `models` module defines the serialisable records that flow
//! through a batch: the canonical calculator input, the calculator's
//! output and the flattened result entry returned to clients.  Wire
//! names follow the calculator's `input*`/`output*` vocabulary on the
//! calculator side and the German response vocabulary on the client
//! side.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Fully resolved calculation parameters shared by every entry of one
/// gross-wage list.  Produced by [`crate::normalize::normalize`]; the
/// gross wage itself is attached per entry via [`InputTemplate::with_gross_wage`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputTemplate {
    /// Accounting year, always text (e.g. `"2025"`).
    #[serde(rename = "inputAccountingYear")]
    pub accounting_year: String,
    /// Tax class code, 1 to 6 when valid.  Not range-checked here.
    #[serde(rename = "inputTaxClass")]
    pub tax_class: i64,
    /// Personal tax allowance for the same period as the gross wage.
    #[serde(rename = "inputTaxAllowance")]
    pub tax_allowance: f64,
    /// Church tax flag (0 or 1).
    #[serde(rename = "inputChurchTax")]
    pub church_tax: i64,
    /// Federal state by German name, e.g. `"Hamburg"`.
    #[serde(rename = "inputState")]
    pub state: String,
    #[serde(rename = "inputYearOfBirth")]
    pub year_of_birth: i64,
    #[serde(rename = "inputChildren")]
    pub children: i64,
    /// Number of child allowance units (0.5 steps).
    #[serde(rename = "inputChildTaxAllowance")]
    pub child_tax_allowance: f64,
    /// Monthly private health insurance premium.
    #[serde(rename = "inputPkvContribution")]
    pub pkv_contribution: f64,
    /// Monthly employer subsidy towards the private premium.
    #[serde(rename = "inputEmployerSubsidy")]
    pub employer_subsidy: f64,
    /// Pension insurance code: 0 statutory, 1 exempt.
    #[serde(rename = "inputPensionInsurance")]
    pub pension_insurance: i64,
    /// Employer levy U1 rate in percent.
    #[serde(rename = "inputLevyOne")]
    pub levy_one: f64,
    /// Employer levy U2 rate in percent.
    #[serde(rename = "inputLevyTwo")]
    pub levy_two: f64,
    #[serde(rename = "inputActivateLevy")]
    pub activate_levy: i64,
    /// Health insurance type, see [`HealthInsurance`].
    #[serde(rename = "inputHealthInsurance")]
    pub health_insurance: i64,
    /// Statutory health insurance additional contribution in percent.
    #[serde(rename = "inputAdditionalContribution")]
    pub additional_contribution: f64,
    /// Payout period code, see [`Period`].
    #[serde(rename = "inputPeriod")]
    pub period: i64,
}

impl InputTemplate {
    /// Attach one gross wage, producing the record handed to the calculator.
    pub fn with_gross_wage(&self, gross_wage: f64) -> GrossToNetInput {
        GrossToNetInput {
            template: self.clone(),
            gross_wage,
        }
    }
}

/// Input to the net-wage calculator for a single gross wage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrossToNetInput {
    #[serde(flatten)]
    pub template: InputTemplate,
    /// Gross wage for the period selected by `inputPeriod`.
    #[serde(rename = "inputGrossWage")]
    pub gross_wage: f64,
}

/// Health insurance scheme selected by the `inputHealthInsurance` code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthInsurance {
    /// Statutory insurance (GKV), code `0`.
    Statutory,
    /// Private insurance (PKV), code `1`.
    Private,
    /// Voluntarily insured in the statutory scheme, code `-1`.
    VoluntaryStatutory,
}

impl HealthInsurance {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(HealthInsurance::Statutory),
            1 => Some(HealthInsurance::Private),
            -1 => Some(HealthInsurance::VoluntaryStatutory),
            _ => None,
        }
    }
}

/// Payout period the gross wage refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    /// Code `1`.
    Yearly,
    /// Code `2`.
    Monthly,
}

impl Period {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Period::Yearly),
            2 => Some(Period::Monthly),
            _ => None,
        }
    }

    /// Number of periods per year.
    pub fn per_year(self) -> f64 {
        match self {
            Period::Yearly => 1.0,
            Period::Monthly => 12.0,
        }
    }
}

/// Raw output of one calculation.  All amounts are in euro, rounded
/// to cents.  Monthly figures are per month regardless of the input
/// period.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    #[serde(rename = "outputResGrossWageMonth")]
    pub gross_wage_month: f64,
    #[serde(rename = "outputResGrossWageYear")]
    pub gross_wage_year: f64,
    #[serde(rename = "outputResNetWageMonth")]
    pub net_wage_month: f64,
    #[serde(rename = "outputResNetWageYear")]
    pub net_wage_year: f64,
    #[serde(rename = "outputResIncomeTaxMonth")]
    pub income_tax_month: f64,
    #[serde(rename = "outputResSolidaritySurchargeMonth")]
    pub solidarity_surcharge_month: f64,
    #[serde(rename = "outputResChurchTaxMonth")]
    pub church_tax_month: f64,
    /// Sum of income tax, solidarity surcharge and church tax per month.
    #[serde(rename = "outputTotalTaxes")]
    pub total_taxes: f64,
    #[serde(rename = "outputResHealthInsuranceMonth")]
    pub health_insurance_month: f64,
    #[serde(rename = "outputResCareInsuranceMonth")]
    pub care_insurance_month: f64,
    #[serde(rename = "outputResPensionInsuranceMonth")]
    pub pension_insurance_month: f64,
    #[serde(rename = "outputResUnemploymentInsuranceMonth")]
    pub unemployment_insurance_month: f64,
    /// Sum of the employee's social insurance contributions per month.
    #[serde(rename = "outputTotalInsurances")]
    pub total_insurances: f64,
    /// Employer's monthly cost: gross wage plus employer contributions
    /// and, when activated, levies U1/U2.
    #[serde(rename = "outputResEmployerCostsMonth")]
    pub employer_costs_month: f64,
}

/// Public result for one entry of the gross-wage list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultEntry {
    /// The list entry exactly as the client sent it.
    pub brutto: Value,
    pub netto_monat: f64,
    pub netto_jahr: f64,
    pub lohnsteuer_monat: f64,
    pub soli_monat: f64,
    pub kirchensteuer_monat: f64,
    pub steuern_gesamt: f64,
    pub krankenversicherung_monat: f64,
    pub pflegeversicherung_monat: f64,
    pub rentenversicherung_monat: f64,
    pub arbeitslosenversicherung_monat: f64,
    pub sozialabgaben_gesamt: f64,
}

/// Successful `/brutto-netto` response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResponse {
    pub results: Vec<ResultEntry>,
}

/// `/health` response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    /// RFC 3339 timestamp in UTC.
    pub timestamp: String,
}
