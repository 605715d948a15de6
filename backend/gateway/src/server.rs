//! Main HTTP gateway server.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use psychoscore_config::PsychoScoreConfig;
use psychoscore_core::{ScoreError, SpeechBackend, VisionBackend};
use psychoscore_media::{FileStore, ImageNormalizer};
use psychoscore_tts::{ElevenLabsTts, SpeechRequester};
use psychoscore_understanding::{ComparisonRequester, CritiqueRequester, GeminiVision};
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, instrument, warn};

use crate::pipeline::AnalysisPipeline;
use crate::{analyze, audio, health_api};

const MULTIPART_OVERHEAD: usize = 1024 * 1024;

/// Application state shared across routes. Built once; never mutated.
#[derive(Clone)]
pub struct GatewayState {
    pub pipeline: Arc<AnalysisPipeline>,
    body_limit: usize,
}

impl GatewayState {
    /// Wires the real Gemini and ElevenLabs clients.
    pub fn from_config(config: &PsychoScoreConfig) -> Result<Self, ScoreError> {
        let vision = Arc::new(GeminiVision::from_config(&config.gemini)?);
        let speech = Arc::new(ElevenLabsTts::from_config(&config.elevenlabs)?);
        Ok(Self::with_backends(config, vision, speech))
    }

    pub fn with_backends(
        config: &PsychoScoreConfig,
        vision: Arc<dyn VisionBackend>,
        speech: Arc<dyn SpeechBackend>,
    ) -> Self {
        let upload_store = config
            .storage
            .persist_uploads
            .then(|| FileStore::new(&config.storage.image_upload_path, "card_", "jpg"));
        let speech = SpeechRequester::new(
            speech,
            FileStore::audio(&config.storage.audio_output_path),
            &config.elevenlabs.default_voice_id,
            config.limits.max_text_chars,
        );
        let pipeline = AnalysisPipeline::new(
            ImageNormalizer::from_limits(&config.limits),
            CritiqueRequester::new(vision.clone()),
            ComparisonRequester::new(vision),
            speech,
            upload_store,
        );
        Self {
            pipeline: Arc::new(pipeline),
            // Two images per battle request, plus form framing.
            body_limit: config
                .limits
                .max_file_size
                .saturating_mul(2)
                .saturating_add(MULTIPART_OVERHEAD),
        }
    }
}

/// All routes, without CORS or tracing layers.
pub fn build_router(state: GatewayState) -> Router {
    let body_limit = state.body_limit;
    let analyze_routes = Router::new()
        .route("/business-card", post(analyze::business_card))
        .route("/psycho-score", post(analyze::psycho_score))
        .route("/image-only", post(analyze::image_only))
        .route("/quick-analysis", post(analyze::image_only))
        .route("/alpha-vs-beta", post(analyze::alpha_vs_beta));

    let audio_routes = Router::new()
        .route("/generate", post(audio::generate))
        .route("/patrick-critique", post(audio::patrick_critique))
        .route("/voices", get(audio::voices))
        .route("/file/:name", get(audio::file));

    Router::new()
        .route("/health", get(health_api::get_health))
        .route("/api", get(health_api::get_api_info))
        .nest("/api/analyze", analyze_routes)
        .nest("/api/audio", audio_routes)
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    CorsLayer::permissive().allow_origin(AllowOrigin::list(allowed))
}

/// Starts the Axum HTTP server and runs until ctrl-c.
#[instrument(skip_all)]
pub async fn start_server(config: &PsychoScoreConfig, state: GatewayState) -> Result<()> {
    for dir in [&config.storage.audio_output_path, &config.storage.image_upload_path] {
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.server.cors_origins));

    let addr = format!("{}:{}", config.server.bind, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(addr = %addr, "PsychoScore HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("PsychoScore HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
