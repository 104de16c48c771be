use std::collections::BTreeMap;

use axum::{
    Json, Router,
    http::StatusCode,
    routing::{get, post},
};
use cut_patterns::pool::CutMapping;
use cut_patterns::{ClimbConfig, CutCatalog, CutsHillClimb, Pattern, PatternError, PatternPool};
use serde::{Deserialize, Serialize};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

#[derive(Deserialize, Serialize)]
struct PatternsRequest {
    stock: u32,
    cuts: Vec<CutRequest>,
    #[serde(default = "default_nbr_hood_size")]
    nbr_hood_size: usize,
    #[serde(default = "default_patterns")]
    patterns: usize,
    #[serde(default = "default_max_calls")]
    max_calls: usize,
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    config: ClimbConfig,
}

#[derive(Deserialize, Serialize)]
struct CutRequest {
    length: u32,
    qty: u32,
}

fn default_nbr_hood_size() -> usize {
    5
}

fn default_patterns() -> usize {
    10
}

fn default_max_calls() -> usize {
    150
}

#[derive(Debug, Serialize)]
struct PatternsResponse {
    patterns: Vec<PatternResponse>,
    cut_mapping: CutMapping,
    demand: BTreeMap<u32, u32>,
}

#[derive(Debug, Serialize)]
struct PatternResponse {
    cuts: Pattern,
    waste: u64,
}

fn error_status(err: &PatternError) -> StatusCode {
    match err {
        PatternError::InvalidCatalog(_) | PatternError::InvalidConfiguration(_) => {
            StatusCode::BAD_REQUEST
        }
        PatternError::ConstructionExhausted { .. } | PatternError::NeighborhoodExhausted { .. } => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
    }
}

fn generate(req: PatternsRequest) -> Result<PatternsResponse, PatternError> {
    let catalog = CutCatalog::new(req.cuts.iter().map(|c| (c.length, c.qty)))?;
    let mut engine = match req.seed {
        Some(seed) => CutsHillClimb::seeded(catalog, req.stock, req.nbr_hood_size, req.config, seed)?,
        None => CutsHillClimb::from_entropy(catalog, req.stock, req.nbr_hood_size, req.config)?,
    };

    let mut pool = PatternPool::new(&mut engine);
    pool.build(req.patterns, req.max_calls)?;

    let input = pool.lp_input();
    let stock = input.stock_length as u64;
    Ok(PatternsResponse {
        patterns: input
            .patterns
            .into_iter()
            .map(|p| PatternResponse {
                waste: stock - p.total_length(),
                cuts: p,
            })
            .collect(),
        cut_mapping: input.cut_mapping,
        demand: input.demand,
    })
}

async fn patterns(
    Json(req): Json<PatternsRequest>,
) -> Result<Json<PatternsResponse>, (StatusCode, String)> {
    tracing::info!(
        body = serde_json::to_string(&req).unwrap_or_default(),
        "POST /patterns"
    );

    // Climbs can run for a while; keep them off the async workers.
    let response = tokio::task::spawn_blocking(move || generate(req))
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
        .map_err(|e| {
            tracing::warn!(error = %e, "pattern generation failed");
            (error_status(&e), e.to_string())
        })?;

    Ok(Json(response))
}

#[tokio::main]
async fn main() {
    let _sentry = std::env::var("SENTRY_DSN").ok().map(|dsn| {
        sentry::init((
            dsn,
            sentry::ClientOptions {
                release: sentry::release_name!(),
                ..Default::default()
            },
        ))
    });

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open("development.log")
        .expect("failed to open development.log");

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_target(false)
        .with_ansi(false)
        .with_max_level(Level::INFO)
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3001".to_string());
    let addr = format!("0.0.0.0:{port}");

    let app = Router::new()
        .route("/up", get(|| async { "ok" }))
        .route("/patterns", post(patterns))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        );

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    eprintln!("Listening on {addr}");
    axum::serve(listener, app).await.unwrap();
}
