//! Speakers Agreement - composition of the Front Conference consent form
//!
//! This crate provides:
//! - Typed configuration with defaults, overrides and validation
//! - The ordered clause list with conditional workshop and travel terms
//! - Content, header and footer composition on top of `pdf-core`
//! - Field descriptors and the HTML request form
//!
//! # Example
//!
//! ```ignore
//! use agreement::{speakers_agreement, AgreementConfig, ConfigOverrides};
//! use pdf_core::Output;
//!
//! let overrides = ConfigOverrides::from_json(r#"{"duration": 30, "compensation": 1000}"#)?;
//! let config = AgreementConfig::default().merge(overrides).validate()?;
//! let rendered = speakers_agreement(&config, Output::Buffer)?;
//! ```

pub mod clauses;
pub mod composer;
pub mod config;
pub mod fields;
pub mod form_page;

pub use composer::{field_names, insert_content, insert_footer, insert_header, speakers_agreement};
pub use config::{
    AgreementConfig, ConfigOverrides, FontConfig, LayoutConfig, Logo, Meta, Origin, PageConfig,
    Scalar, ValidConfig,
};
pub use fields::{speakers_agreement_fields, FieldDescriptor, FieldKind, Relation, SelectOption};
pub use form_page::render_form_page;

use thiserror::Error;

/// Errors that can occur while composing an agreement
#[derive(Debug, Error)]
pub enum AgreementError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("PDF error: {0}")]
    PdfError(#[from] pdf_core::PdfError),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type for agreement operations
pub type Result<T> = std::result::Result<T, AgreementError>;
