//! API handlers for the agreement server
//!
//! Provides endpoints for:
//! - The HTML request form
//! - Speakers agreement rendering from query parameters
//! - Health checks

use std::collections::HashMap;

use agreement::{
    fields::retain_enabled, render_form_page, speakers_agreement, speakers_agreement_fields,
    AgreementConfig, ConfigOverrides, ValidConfig,
};
use axum::{
    extract::{Query, State},
    http::{header, Uri},
    response::{Html, IntoResponse, Response},
    Json,
};
use pdf_core::Output;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::ServerError;
use crate::AppState;

/// Where the form page submits to
pub const FORM_ACTION: &str = "/api/speakers-agreement.pdf";

const PDF_DISPOSITION: &str = "inline; filename=\"speakers-agreement.pdf\"";

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Handler: GET /health
pub async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "front-pdfs",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Handler: GET /
pub async fn handle_form_page() -> Html<String> {
    Html(render_form_page(&speakers_agreement_fields(), FORM_ACTION))
}

/// Build a validated configuration from submitted form values
///
/// Values of fields that the form would have disabled are dropped first, so a
/// hand-written query behaves like a submission from the page.
pub fn config_from_query(
    state: &AppState,
    query: HashMap<String, String>,
) -> Result<ValidConfig, ServerError> {
    let values = retain_enabled(&speakers_agreement_fields(), query);
    debug!(?values, "agreement query");

    let overrides = ConfigOverrides::from_query(&values)?;
    let config = AgreementConfig::default()
        .with_logo_markup(state.logo.clone())
        .merge(overrides)
        .validate()?;

    Ok(config)
}

/// Render a validated configuration into memory
pub fn render_pdf(config: &ValidConfig) -> agreement::Result<Vec<u8>> {
    let mut buffer = Vec::new();
    speakers_agreement(config, Output::Stream(&mut buffer))?;
    Ok(buffer)
}

/// Handler: GET /speakers-agreement.pdf and GET /api/speakers-agreement.pdf
pub async fn handle_speakers_agreement(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Response, ServerError> {
    let config = config_from_query(&state, query).map_err(|err| {
        warn!(error = %err, "rejected agreement request");
        err
    })?;

    let bytes = tokio::task::spawn_blocking(move || render_pdf(&config))
        .await
        .map_err(|err| ServerError::Internal(err.to_string()))??;

    info!(bytes = bytes.len(), "served speakers agreement");

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf"),
            (header::CONTENT_DISPOSITION, PDF_DISPOSITION),
        ],
        bytes,
    )
        .into_response())
}

/// Fallback for unknown routes
pub async fn handle_not_found(uri: Uri) -> ServerError {
    ServerError::NotFound(uri.path().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_config_from_query_drops_disabled_values() {
        let state = AppState::default();
        let config = config_from_query(
            &state,
            query(&[
                ("duration", "45"),
                ("compensation", "800"),
                ("workshopHalfDay", "true"),
            ]),
        )
        .unwrap();

        assert!(!config.workshop_half_day);
        assert_eq!(config.duration.as_ref().map(ToString::to_string), Some("45".into()));
    }

    #[test]
    fn test_half_day_follows_workshop_flag() {
        let state = AppState::default();

        let config = config_from_query(
            &state,
            query(&[
                ("duration", "30"),
                ("compensation", "1000"),
                ("workshop", "true"),
                ("workshopHalfDay", "true"),
            ]),
        )
        .unwrap();
        assert!(config.has_workshop());
        assert!(config.workshop_half_day);

        // A flag value the form never submits leaves the whole workshop unset
        let config = config_from_query(
            &state,
            query(&[
                ("duration", "30"),
                ("compensation", "1000"),
                ("workshop", "1"),
                ("workshopHalfDay", "true"),
            ]),
        )
        .unwrap();
        assert!(!config.has_workshop());
        assert!(!config.workshop_half_day);
    }

    #[test]
    fn test_config_from_query_requires_compensation() {
        let state = AppState::default();
        let err = config_from_query(&state, query(&[("duration", "30")])).unwrap_err();
        assert!(matches!(err, ServerError::InvalidRequest(_)));
    }

    #[test]
    fn test_workshop_only_needs_no_presentation_terms() {
        let state = AppState::default();
        let config = config_from_query(
            &state,
            query(&[("workshop", "true"), ("workshopOnly", "true")]),
        )
        .unwrap();
        assert!(!config.has_presentation());
    }

    #[test]
    fn test_render_pdf() {
        let state = AppState::default();
        let config =
            config_from_query(&state, query(&[("duration", "30"), ("compensation", "1000")]))
                .unwrap();
        let bytes = render_pdf(&config).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
    }
}
