use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::Deserialize;

use underwrite_core::real_estate::underwriting::{self, UnderwritingInput};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse_input(input_json: &str) -> NapiResult<UnderwritingInput> {
    UnderwritingInput::from_json(input_json).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Underwriting
// ---------------------------------------------------------------------------

#[napi]
pub fn underwrite(input_json: String) -> NapiResult<String> {
    let input = parse_input(&input_json)?;
    let output = underwriting::underwrite(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn project_cashflows(input_json: String) -> NapiResult<String> {
    let input = parse_input(&input_json)?;
    let output = underwriting::project_cashflows(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn sensitivity_analysis(input_json: String) -> NapiResult<String> {
    let input = parse_input(&input_json)?;
    let output = underwriting::sensitivity_analysis(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Returns
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct IrrRequest {
    cash_flows: Vec<Decimal>,
}

#[napi]
pub fn solve_irr(input_json: String) -> NapiResult<String> {
    let request: IrrRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = underwriting::solve_irr(&request.cash_flows).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
