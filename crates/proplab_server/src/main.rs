use actix_web::{middleware, web, App, HttpResponse, HttpServer, Responder};
use clap::Parser;
use log::info;
use serde::Deserialize;

mod equivalence;
mod formula;

#[derive(Parser, Debug)]
#[command(author, version, about = "HTTP API for the proplab logic tools")]
struct Args {
    /// Address to bind to
    #[arg(long, env = "PROPLAB_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(long, env = "PROPLAB_PORT", default_value_t = 7000)]
    port: u16,
}

#[derive(Deserialize)]
struct FormulaForm {
    formula: String,
}

#[derive(Deserialize)]
struct ParseForm {
    formula: String,
    params: Option<String>,
}

#[derive(Deserialize)]
struct StateForm {
    state: String,
}

#[derive(Deserialize)]
struct MoveForm {
    state: String,
    r#move: String,
}

async fn index() -> impl Responder {
    HttpResponse::Ok().body(
        "proplab API Server

Available endpoints:
/validate /normalize /display /truth-table
/rules /check-rule
/equivalence (parse, move, close, validate)",
    )
}

fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        // Formulas
        .route("/validate", web::post().to(formula::validate))
        .route("/normalize", web::post().to(formula::normalize))
        .route("/display", web::post().to(formula::display))
        .route("/truth-table", web::post().to(formula::truth_table))
        // Rules
        .route("/rules", web::get().to(equivalence::rules))
        .route("/check-rule", web::post().to(equivalence::check_rule))
        // Equivalence proofs
        .route("/equivalence", web::get().to(equivalence::equivalence))
        .route("/equivalence/parse", web::post().to(equivalence::parse))
        .route(
            "/equivalence/validate",
            web::post().to(equivalence::validate),
        )
        .route("/equivalence/move", web::post().to(equivalence::r#move))
        .route("/equivalence/close", web::post().to(equivalence::close));
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    info!("listening on {}:{}", args.host, args.port);

    HttpServer::new(|| {
        App::new()
            .wrap(middleware::Logger::default())
            .wrap(middleware::DefaultHeaders::new().add(("Access-Control-Allow-Origin", "*")))
            .configure(routes)
    })
    .bind((args.host.as_str(), args.port))?
    .run()
    .await
}
