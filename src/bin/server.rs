use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use stick_cutter::input::{self, OversizePolicy};
use stick_cutter::packer::{self, DEFAULT_MAX_PIECES, Packer};
use stick_cutter::render;
use stick_cutter::types::{deserialize_u32_from_number, deserialize_u32_vec_from_numbers};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

#[derive(Clone)]
struct AppState {
    max_pieces: usize,
}

#[derive(Deserialize, Serialize)]
struct OptimizeRequest {
    #[serde(deserialize_with = "deserialize_u32_from_number")]
    stock: u32,
    #[serde(default, deserialize_with = "deserialize_u32_vec_from_numbers")]
    lengths: Vec<u32>,
    /// Free-text lengths, appended after `lengths`.
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    skip_oversize: bool,
    #[serde(default)]
    svg: bool,
}

#[derive(Debug, Serialize)]
struct OptimizeResponse {
    stock: u32,
    stick_count: usize,
    piece_count: usize,
    lower_bound: usize,
    total_waste: u64,
    waste_percent: f64,
    discarded: Vec<String>,
    /// Least waste first.
    sticks: Vec<StickResponse>,
}

#[derive(Debug, Serialize)]
struct StickResponse {
    index: usize,
    remaining_space: u32,
    pieces: Vec<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    svg: Option<String>,
}

async fn optimize(
    State(state): State<AppState>,
    payload: Result<Json<OptimizeRequest>, JsonRejection>,
) -> Result<Json<OptimizeResponse>, (StatusCode, String)> {
    let Json(req) = payload.map_err(|e| {
        tracing::info!(error = %e, "POST /optimize rejected");
        (StatusCode::BAD_REQUEST, e.body_text())
    })?;
    tracing::info!(
        body = serde_json::to_string(&req).unwrap_or_default(),
        "POST /optimize"
    );

    let bad_request = |e: stick_cutter::error::PackError| (StatusCode::BAD_REQUEST, e.to_string());

    let policy = if req.skip_oversize {
        OversizePolicy::Skip
    } else {
        OversizePolicy::Reject
    };

    let mut lengths = req.lengths;
    let mut discarded = Vec::new();
    if let Some(text) = &req.text {
        let mut parsed = input::parse_lengths(text);
        discarded = std::mem::take(&mut parsed.discarded);
        lengths.extend(parsed.into_lengths(policy).map_err(bad_request)?);
    }

    let lengths = input::validate_lengths(lengths, req.stock, policy).map_err(bad_request)?;
    let plan = Packer::new(req.stock)
        .with_max_pieces(state.max_pieces)
        .pack(&lengths)
        .map_err(bad_request)?;

    let response = OptimizeResponse {
        stock: plan.capacity,
        stick_count: plan.bin_count(),
        piece_count: plan.piece_count(),
        lower_bound: packer::lower_bound(&lengths, plan.capacity),
        total_waste: plan.total_waste(),
        waste_percent: plan.total_waste_percent(),
        discarded,
        sticks: plan
            .display_order()
            .into_iter()
            .enumerate()
            .map(|(i, bin)| StickResponse {
                index: i + 1,
                remaining_space: bin.remaining_space,
                pieces: bin.pieces.clone(),
                svg: req.svg.then(|| render::render_bar_svg(bin, plan.capacity)),
            })
            .collect(),
    };

    Ok(Json(response))
}

fn app(state: AppState) -> Router {
    Router::new()
        .route("/up", get(|| async { "ok" }))
        .route("/optimize", post(optimize))
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

fn main() {
    // Sentry has to be up before the runtime starts so worker panics are captured.
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
    let max_pieces = std::env::var("MAX_PIECES")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_MAX_PIECES);
    let addr = format!("0.0.0.0:{port}");

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("failed to build tokio runtime")
        .block_on(async {
            let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
            eprintln!("Listening on {addr}");
            tracing::info!(%addr, max_pieces, "server started");
            axum::serve(listener, app(AppState { max_pieces }))
                .await
                .unwrap();
        });
}
