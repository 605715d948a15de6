//! Liveness and service description endpoints.

use axum::Json;
use serde_json::{json, Value};

pub const SERVICE_NAME: &str = "Psycho Score API";
pub const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Handler for `GET /health`
pub async fn get_health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": SERVICE_NAME,
        "version": SERVICE_VERSION,
        "patrick_says": "The sophistication of this API is... breathtaking.",
        "endpoints": {
            "analysis": "/api/analyze/business-card",
            "psycho_score": "/api/analyze/psycho-score",
            "image_only": "/api/analyze/image-only",
            "quick_analysis": "/api/analyze/quick-analysis",
            "battle": "/api/analyze/alpha-vs-beta",
            "audio": "/api/audio/generate",
            "voices": "/api/audio/voices",
        },
    }))
}

/// Handler for `GET /api`
pub async fn get_api_info() -> Json<Value> {
    Json(json!({
        "title": SERVICE_NAME,
        "description": "Patrick Bateman's Business Card Analysis Service",
        "version": SERVICE_VERSION,
        "features": [
            "AI-powered business card analysis",
            "Patrick Bateman style critiques",
            "Text-to-speech with character voice",
            "Two-card ALPHA vs BETA battles",
        ],
        "endpoints": {
            "POST /api/analyze/business-card": "Upload a card, get the critique and optional audio",
            "POST /api/analyze/psycho-score": "Upload a card, get the critique with audio",
            "POST /api/analyze/image-only": "Critique only, no audio",
            "POST /api/analyze/quick-analysis": "Critique only, no audio",
            "POST /api/analyze/alpha-vs-beta": "Upload two cards, get the ALPHA/BETA verdict with audio",
            "POST /api/audio/generate": "Generate audio from text",
            "POST /api/audio/patrick-critique": "Generate audio with the signature opener",
            "GET /api/audio/voices": "List available voices",
            "GET /api/audio/file/:name": "Download generated audio",
        },
    }))
}
