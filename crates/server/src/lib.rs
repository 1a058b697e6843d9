//! Front Conference PDFs server
//!
//! Serves the speakers agreement request form and renders the agreement PDF
//! from the submitted query parameters.

use std::path::Path;
use std::sync::Arc;

use agreement::config::DEFAULT_LOGO;
use agreement::{speakers_agreement, AgreementConfig, ConfigOverrides};
use axum::{routing::get, Router};
use pdf_core::Output;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod api;
pub mod error;

pub use error::ServerError;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// SVG markup of the header logo, loaded once at startup
    pub logo: Arc<str>,
}

impl AppState {
    pub fn new(logo: impl Into<Arc<str>>) -> Self {
        Self { logo: logo.into() }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(DEFAULT_LOGO)
    }
}

/// Build the router with all routes and middleware
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(api::handle_form_page))
        .route("/health", get(api::handle_health))
        .route(
            "/speakers-agreement.pdf",
            get(api::handle_speakers_agreement),
        )
        .route(
            "/api/speakers-agreement.pdf",
            get(api::handle_speakers_agreement),
        )
        .fallback(api::handle_not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Render an agreement to `out` without going through HTTP
///
/// `overrides` is a JSON document in the shape of [`ConfigOverrides`].
pub fn render_to_file(
    state: &AppState,
    overrides: Option<&str>,
    out: &Path,
) -> agreement::Result<usize> {
    let overrides = match overrides {
        Some(json) => ConfigOverrides::from_json(json)?,
        None => ConfigOverrides::default(),
    };
    let config = AgreementConfig::default()
        .with_logo_markup(state.logo.clone())
        .merge(overrides)
        .validate()?;

    let rendered = speakers_agreement(&config, Output::File(out.to_path_buf()))?;
    Ok(rendered.document.page_count())
}
