//! PDF Core - Low-level PDF generation
//!
//! This crate provides functionality for:
//! - Building paginated documents from scratch with the standard fonts
//! - Flowing mixed-style text with word wrap and automatic page breaks
//! - Fillable AcroForm text fields
//! - Embedding vector graphics (an SVG subset)
//! - Two-pass rendering with page-aware headers and footers
//!
//! # Example
//!
//! ```ignore
//! use pdf_core::{Output, PageSetup, Renderer, Span, TextOptions};
//!
//! let rendered = Renderer::new(PageSetup::default())
//!     .footer(|doc, page| {
//!         let label = format!("{} / {}", page.current + 1, page.total);
//!         doc.text_at(&[Span::new(label)], 40.0, 760.0, TextOptions::default())
//!     })
//!     .render(
//!         |doc| {
//!             doc.add_page();
//!             doc.text(&[Span::new("Hello, World!")], TextOptions::default())
//!         },
//!         Output::File("output.pdf".into()),
//!     )?;
//! ```

mod document;
mod font;
mod form;
mod page;
mod render;
mod svg;
mod text;

pub use document::{Color, DocumentInfo, PdfDocument, TextOptions};
pub use font::{encode_win_ansi, FontStyle, FontWeight, StandardFont};
pub use form::{FieldFormat, FormField, TextFieldOptions};
pub use page::{Cursor, Margins, PageSetup, PageSize, Rect};
pub use render::{ContentPass, Output, Pagination, Rendered, Renderer};
pub use svg::{embed_vector_graphic, VectorGraphic, VectorOptions};
pub use text::{generate_text_operators, layout_lines, Line, Span, SpanStyle, TextRenderContext};

use thiserror::Error;

/// Errors that can occur during PDF operations
#[derive(Debug, Error)]
pub enum PdfError {
    #[error("Failed to save PDF: {0}")]
    SaveError(String),

    #[error("Font not found: {0}")]
    FontNotFound(String),

    #[error("Invalid page index: {0} (document has {1} pages)")]
    InvalidPage(usize, usize),

    #[error("Document has no pages")]
    NoPages,

    #[error("No current page; call add_page first")]
    NoCurrentPage,

    #[error("Form not initialized; call init_form first")]
    FormNotInitialized,

    #[error("Duplicate form field: {0}")]
    DuplicateField(String),

    #[error("Vector graphic error: {0}")]
    SvgError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Lopdf error: {0}")]
    LopdfError(#[from] lopdf::Error),
}

/// Result type for PDF operations
pub type Result<T> = std::result::Result<T, PdfError>;

/// Text alignment options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}
