//! PsychoScore gateway HTTP API server.
//!
//! Card analysis, ALPHA/BETA battles, speech generation and audio file
//! serving, all rendered through a single error body shape.

pub mod analyze;
pub mod audio;
pub mod error;
pub mod health_api;
pub mod pipeline;
pub mod server;
pub mod upload;

pub use error::{ApiError, ErrorBody};
pub use pipeline::{AnalysisPipeline, AnalysisResponse, BattleResponse};
pub use server::{build_router, start_server, GatewayState};
