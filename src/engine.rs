//! Batch computation engine.
//!
//! The `engine` module turns an [`InputTemplate`] and a gross-wage list
//! into ordered [`ResultEntry`] records.  It uses the [`rayon`] crate
//! to run the per-wage calculations across CPU cores; results are
//! collected in input order and the first failure aborts the batch.

use crate::error::CalculationError;
use crate::models::{CalculationResult, InputTemplate, ResultEntry};
use crate::normalize::as_number;
use crate::tax::GrossToNet;
use rayon::prelude::*;
use serde_json::Value;

/// Run one calculation per entry of `gross_wages`.
///
/// Entries are the raw JSON values from the request so the shaped
/// result can echo them unchanged.  A non-numeric entry fails the
/// whole batch, as does any calculator error.
pub fn run_batch(
    template: &InputTemplate,
    gross_wages: &[Value],
    calculator: &dyn GrossToNet,
) -> Result<Vec<ResultEntry>, CalculationError> {
    tracing::debug!(entries = gross_wages.len(), "running gross-to-net batch");
    gross_wages
        .par_iter()
        .map(|brutto| -> Result<ResultEntry, CalculationError> {
            let gross_wage = as_number(brutto).filter(|_| !brutto.is_boolean()).ok_or_else(|| {
                CalculationError::invalid(
                    "inputGrossWage",
                    format!("expected a number, got {}", brutto),
                )
            })?;
            let result = calculator.validate_and_calculate(&template.with_gross_wage(gross_wage))?;
            Ok(shape(brutto.clone(), &result))
        })
        .collect()
}

/// Pick and rename the published subset of a calculation result.
pub fn shape(brutto: Value, r: &CalculationResult) -> ResultEntry {
    ResultEntry {
        brutto,
        netto_monat: r.net_wage_month,
        netto_jahr: r.net_wage_year,
        lohnsteuer_monat: r.income_tax_month,
        soli_monat: r.solidarity_surcharge_month,
        kirchensteuer_monat: r.church_tax_month,
        steuern_gesamt: r.total_taxes,
        krankenversicherung_monat: r.health_insurance_month,
        pflegeversicherung_monat: r.care_insurance_month,
        rentenversicherung_monat: r.pension_insurance_month,
        arbeitslosenversicherung_monat: r.unemployment_insurance_month,
        sozialabgaben_gesamt: r.total_insurances,
    }
}
