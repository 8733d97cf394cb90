use actix_web::{error, web, HttpResponse, Result};
use proplab::parse::normalize::{to_canonical_operators, to_display_symbols};
use proplab::truth_table::{generate_table_with, TruthTableParams};
use proplab::validate_formula;

use crate::{FormulaForm, ParseForm};

pub(crate) async fn validate(form: web::Form<FormulaForm>) -> HttpResponse {
    HttpResponse::Ok().json(validate_formula(&form.formula))
}

pub(crate) async fn normalize(form: web::Form<FormulaForm>) -> HttpResponse {
    HttpResponse::Ok().json(to_canonical_operators(&form.formula))
}

pub(crate) async fn display(form: web::Form<FormulaForm>) -> HttpResponse {
    HttpResponse::Ok().json(to_display_symbols(&form.formula))
}

pub(crate) async fn truth_table(form: web::Form<ParseForm>) -> Result<HttpResponse> {
    let ParseForm { formula, params } = form.0;
    let params: TruthTableParams = match params {
        Some(p) => serde_json::from_str(&p).map_err(error::ErrorBadRequest)?,
        None => TruthTableParams::default(),
    };

    let table = generate_table_with(&formula, params).map_err(error::ErrorBadRequest)?;

    Ok(HttpResponse::Ok().json(table))
}
