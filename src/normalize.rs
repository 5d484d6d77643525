//! Request normalisation.
//!
//! Clients may name each parameter in German (`steuerklasse`) or in the
//! calculator's own vocabulary (`inputTaxClass`).  Every canonical
//! field is resolved from the German name, then the generic name, then
//! a fixed default.  Two resolution modes exist:
//!
//! * **nullish**: a candidate counts when it is present and not `null`,
//!   so an explicit `0` is kept;
//! * **truthy**: a candidate counts only when it is JSON-truthy, so `""`
//!   or `0` falls through to the next source.
//!
//! A present candidate that cannot be coerced to the field's type is
//! treated as absent.

use crate::models::InputTemplate;
use serde_json::{Map, Value};

/// Default federal state.
pub const DEFAULT_STATE: &str = "Hamburg";
/// Default statutory additional contribution in percent.
pub const DEFAULT_ADDITIONAL_CONTRIBUTION: f64 = 1.7;

/// The two names a canonical field may arrive under.
#[derive(Debug, Clone, Copy)]
pub struct FieldNames {
    pub localized: &'static str,
    pub generic: &'static str,
}

const fn names(localized: &'static str, generic: &'static str) -> FieldNames {
    FieldNames { localized, generic }
}

pub const ACCOUNTING_YEAR: FieldNames = names("year", "inputAccountingYear");
pub const TAX_CLASS: FieldNames = names("steuerklasse", "inputTaxClass");
pub const TAX_ALLOWANCE: FieldNames = names("freibetrag", "inputTaxAllowance");
pub const CHURCH_TAX: FieldNames = names("kirchensteuer", "inputChurchTax");
pub const STATE: FieldNames = names("bundesland", "inputState");
pub const YEAR_OF_BIRTH: FieldNames = names("jahrgang", "inputYearOfBirth");
pub const CHILDREN: FieldNames = names("kinder", "inputChildren");
pub const CHILD_TAX_ALLOWANCE: FieldNames = names("kinderfreibetrag", "inputChildTaxAllowance");
pub const PKV_CONTRIBUTION: FieldNames = names("pkvBeitrag", "inputPkvContribution");
pub const EMPLOYER_SUBSIDY: FieldNames = names("arbeitgeberzuschuss", "inputEmployerSubsidy");
pub const PENSION_INSURANCE: FieldNames = names("rentenversicherung", "inputPensionInsurance");
pub const LEVY_ONE: FieldNames = names("umlage1", "inputLevyOne");
pub const LEVY_TWO: FieldNames = names("umlage2", "inputLevyTwo");
pub const ACTIVATE_LEVY: FieldNames = names("umlageAktiv", "inputActivateLevy");
pub const HEALTH_INSURANCE: FieldNames = names("versicherungsart", "inputHealthInsurance");
pub const ADDITIONAL_CONTRIBUTION: FieldNames =
    names("zusatzbeitrag", "inputAdditionalContribution");
pub const PERIOD: FieldNames = names("periode", "inputPeriod");

/// Build the canonical template from a raw request body.
///
/// `current_year` is the default accounting year.  A body that is not a
/// JSON object has no fields, so every parameter takes its default.
pub fn normalize(body: &Value, current_year: i32) -> InputTemplate {
    let empty = Map::new();
    let fields = body.as_object().unwrap_or(&empty);

    InputTemplate {
        accounting_year: resolve_truthy(fields, ACCOUNTING_YEAR, as_text)
            .unwrap_or_else(|| current_year.to_string()),
        tax_class: resolve_nullish(fields, TAX_CLASS, as_integer).unwrap_or(1),
        tax_allowance: resolve_nullish(fields, TAX_ALLOWANCE, as_number).unwrap_or(0.0),
        church_tax: resolve_nullish(fields, CHURCH_TAX, as_integer).unwrap_or(0),
        state: resolve_truthy(fields, STATE, as_text).unwrap_or_else(|| DEFAULT_STATE.to_string()),
        year_of_birth: resolve_nullish(fields, YEAR_OF_BIRTH, as_integer).unwrap_or(1990),
        children: resolve_nullish(fields, CHILDREN, as_integer).unwrap_or(0),
        child_tax_allowance: resolve_nullish(fields, CHILD_TAX_ALLOWANCE, as_number)
            .unwrap_or(0.0),
        pkv_contribution: resolve_nullish(fields, PKV_CONTRIBUTION, as_number).unwrap_or(0.0),
        employer_subsidy: resolve_nullish(fields, EMPLOYER_SUBSIDY, as_number).unwrap_or(0.0),
        pension_insurance: resolve_nullish(fields, PENSION_INSURANCE, as_integer).unwrap_or(0),
        levy_one: resolve_nullish(fields, LEVY_ONE, as_number).unwrap_or(0.0),
        levy_two: resolve_nullish(fields, LEVY_TWO, as_number).unwrap_or(0.0),
        activate_levy: resolve_nullish(fields, ACTIVATE_LEVY, as_integer).unwrap_or(0),
        health_insurance: resolve_nullish(fields, HEALTH_INSURANCE, as_integer).unwrap_or(0),
        additional_contribution: resolve_nullish(fields, ADDITIONAL_CONTRIBUTION, as_number)
            .unwrap_or(DEFAULT_ADDITIONAL_CONTRIBUTION),
        period: resolve_nullish(fields, PERIOD, as_integer).unwrap_or(2),
    }
}

/// First candidate that is present and not `null` and coerces.
pub fn resolve_nullish<T>(
    fields: &Map<String, Value>,
    names: FieldNames,
    coerce: fn(&Value) -> Option<T>,
) -> Option<T> {
    [names.localized, names.generic]
        .into_iter()
        .filter_map(|name| fields.get(name))
        .filter(|value| !value.is_null())
        .find_map(coerce)
}

/// First candidate that is JSON-truthy and coerces.
pub fn resolve_truthy<T>(
    fields: &Map<String, Value>,
    names: FieldNames,
    coerce: fn(&Value) -> Option<T>,
) -> Option<T> {
    [names.localized, names.generic]
        .into_iter()
        .filter_map(|name| fields.get(name))
        .filter(|value| is_truthy(value))
        .find_map(coerce)
}

/// JSON truthiness: everything except `null`, `false`, `0`, `NaN` and `""`.
/// Arrays and objects are truthy even when empty.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Numbers as is, numeric strings parsed, booleans as 1/0.
pub fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

/// Like [`as_number`], but only whole numbers.
pub fn as_integer(value: &Value) -> Option<i64> {
    if let Some(i) = value.as_i64() {
        return Some(i);
    }
    as_number(value)
        .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
        .map(|f| f as i64)
}

/// Strings as is; numbers and booleans rendered as text.
pub fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(match n.as_f64() {
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => {
                format!("{}", f as i64)
            }
            _ => n.to_string(),
        }),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
