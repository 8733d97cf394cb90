use actix_web::{error, web, HttpResponse, Responder, Result};
use proplab::calculi::equivalence::{rule_catalogue, EquivProof, ProofMove, ProofParams, ProofState};
use proplab::Calculus;
use serde::Deserialize;

use crate::{MoveForm, ParseForm, StateForm};

#[derive(Deserialize)]
pub(crate) struct CheckRuleForm {
    from: String,
    to: String,
    rule: String,
}

pub(crate) async fn equivalence() -> impl Responder {
    HttpResponse::Ok().body(
        "Calculus equivalence loaded.
Interact via the /parse /move /close and /validate endpoints"
            .to_string(),
    )
}

pub(crate) async fn rules() -> HttpResponse {
    HttpResponse::Ok().json(rule_catalogue())
}

pub(crate) async fn check_rule(form: web::Form<CheckRuleForm>) -> Result<HttpResponse> {
    let CheckRuleForm { from, to, rule } = form.0;

    let res = proplab::check_rule(&from, &to, &rule).map_err(error::ErrorBadRequest)?;

    Ok(HttpResponse::Ok().json(res))
}

pub(crate) async fn parse(form: web::Form<ParseForm>) -> Result<HttpResponse> {
    let ParseForm { formula, params } = form.0;
    let params: Option<ProofParams> = match params {
        Some(p) => Some(serde_json::from_str(&p).map_err(error::ErrorBadRequest)?),
        None => None,
    };

    let state = EquivProof::parse_formula(&formula, params).map_err(error::ErrorBadRequest)?;

    Ok(HttpResponse::Ok().json(state))
}

pub(crate) async fn validate(form: web::Form<StateForm>) -> Result<HttpResponse> {
    let StateForm { state } = form.0;

    let state: ProofState = serde_json::from_str(&state).map_err(error::ErrorBadRequest)?;
    let res = EquivProof::validate(state);

    Ok(HttpResponse::Ok().json(res))
}

pub(crate) async fn r#move(form: web::Form<MoveForm>) -> Result<HttpResponse> {
    let MoveForm { state, r#move } = form.0;

    let state: ProofState = serde_json::from_str(&state).map_err(error::ErrorBadRequest)?;
    let r#move: ProofMove = serde_json::from_str(&r#move).map_err(error::ErrorBadRequest)?;

    let state = EquivProof::apply_move(state, r#move).map_err(error::ErrorBadRequest)?;

    Ok(HttpResponse::Ok().json(state))
}

pub(crate) async fn close(form: web::Form<StateForm>) -> Result<HttpResponse> {
    let StateForm { state } = form.0;

    let state: ProofState = serde_json::from_str(&state).map_err(error::ErrorBadRequest)?;

    let res = EquivProof::check_close(state);

    Ok(HttpResponse::Ok().json(res))
}
