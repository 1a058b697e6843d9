//! Agreement composition
//!
//! [`speakers_agreement`] drives the two-pass renderer: [`insert_content`]
//! writes the body and fields, then [`insert_header`] and [`insert_footer`]
//! decorate every page once the page count is known.

use crate::clauses::{numbered_clauses, ClauseKind};
use crate::config::{AgreementConfig, ValidConfig};
use crate::Result;
use pdf_core::{
    embed_vector_graphic, Align, Color, FieldFormat, Output, Pagination, PdfDocument, Rect,
    Rendered, Renderer, Span, TextFieldOptions, TextOptions, VectorOptions,
};

/// Names of the fillable fields placed in the document
pub mod field_names {
    pub const WORKSHOP_TITLE: &str = "workshopTitle";
    pub const TALK_TITLE: &str = "talkTitle";
    pub const DEPARTURE_CITY: &str = "departureCity";
    pub const SIGNER_NAME: &str = "signerName";
    pub const SIGNATURE_NAME: &str = "signatureName";
    pub const SIGNING_DATE: &str = "signingDate";
}

const SIGNING_DATE_MASK: &str = "yyyy-mm-dd";

const JURISDICTION: &str = "This Consent shall be exclusively governed by Swiss/Zurich law \
    without regard to choice-of-law principles. Any dispute concerning the Presentation and/or \
    Supporting Information, or arising out of or relating to this Consent, shall be resolved in \
    the courts of Zurich, Switzerland.";

/// Render a validated configuration to `output`
pub fn speakers_agreement(config: &ValidConfig, output: Output<'_>) -> Result<Rendered> {
    let config: &AgreementConfig = config;
    tracing::debug!(
        workshop = config.has_workshop(),
        presentation = config.has_presentation(),
        origin = config.origin.as_str(),
        "composing speakers agreement"
    );

    let rendered = Renderer::new(config.pdf.setup())
        .header(|doc, pagination| insert_header(doc, config, pagination))
        .footer(|doc, pagination| insert_footer(doc, config, pagination))
        .render(|doc| insert_content(doc, config), output)?;

    tracing::info!(
        pages = rendered.document.page_count(),
        fields = rendered.document.fields().len(),
        "rendered speakers agreement"
    );

    Ok(rendered)
}

/// Restore baseline typography
fn reset_font(doc: &mut PdfDocument, config: &AgreementConfig) -> pdf_core::Result<()> {
    doc.set_font(&config.font.family, config.font.size)?;
    doc.set_line_gap(config.font.line_gap);
    doc.set_fill_color(Color::black());
    Ok(())
}

fn paragraph(doc: &mut PdfDocument, config: &AgreementConfig, spans: &[Span]) -> pdf_core::Result<()> {
    doc.text(spans, TextOptions::default())?;
    doc.move_down(config.layout.section_gap);
    Ok(())
}

/// Width shared by every inline field
fn field_width(doc: &PdfDocument, config: &AgreementConfig) -> f64 {
    doc.content_width() - config.layout.label_offset
}

/// Write `label` and float a text field up onto the label's line
fn inline_field(
    doc: &mut PdfDocument,
    config: &AgreementConfig,
    label: &str,
    name: &str,
    options: TextFieldOptions,
) -> pdf_core::Result<()> {
    doc.text(&[Span::new(label)], TextOptions::default())?;

    let layout = &config.layout;
    let rect = Rect::new(
        doc.margins().left + layout.label_offset,
        doc.cursor().y - doc.current_line_height() * layout.field_line_offset,
        field_width(doc, config),
        layout.field_height,
    );
    doc.form_text(name, rect, options)
}

fn heading(doc: &mut PdfDocument, config: &AgreementConfig, text: &str) -> pdf_core::Result<()> {
    let bold = config.font.bold()?;
    doc.text(&[Span::new(text).font(bold)], TextOptions::default())
}

fn intro(config: &AgreementConfig) -> String {
    let participation = match (config.has_presentation(), config.has_workshop()) {
        (true, true) => {
            "a Presentation (the \"Presentation\") and a Workshop (the \"Workshop\")"
        }
        (false, true) => "a Workshop (the \"Workshop\")",
        _ => "a Presentation (the \"Presentation\")",
    };

    format!(
        "The Frontend Conference Association (\"FCA\") is organizing the Front Conference \
         Zurich event to be held {} (the \"Event\").\n\nThis consent form (the \"Consent\") \
         will serve as our agreement concerning your participation at the Event with {}.",
        config.date.trim(),
        participation
    )
}

/// Body of the agreement: sections, clauses, fields and jurisdiction
pub fn insert_content(doc: &mut PdfDocument, config: &AgreementConfig) -> pdf_core::Result<()> {
    doc.set_title(config.meta.title.as_str());
    doc.set_author(config.meta.author.as_str());
    doc.set_producer("Front Conference PDFs");

    reset_font(doc, config)?;
    doc.init_form();
    doc.add_page();

    let bold = config.font.bold()?;

    paragraph(doc, config, &[Span::new(intro(config))])?;

    if config.has_workshop() {
        let hours = if config.workshop_half_day { 4 } else { 8 };
        heading(doc, config, "Workshop")?;
        inline_field(
            doc,
            config,
            "Title:",
            field_names::WORKSHOP_TITLE,
            TextFieldOptions::default(),
        )?;
        paragraph(
            doc,
            config,
            &[Span::new(format!(
                "Date: {}\nDuration: {hours} hours",
                config.workshop_date.trim()
            ))],
        )?;
    }

    if config.has_presentation() {
        let duration = config
            .duration
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default();
        heading(doc, config, "Presentation")?;
        inline_field(
            doc,
            config,
            "Title:",
            field_names::TALK_TITLE,
            TextFieldOptions::default(),
        )?;
        paragraph(
            doc,
            config,
            &[Span::new(format!(
                "Date: {}\nDuration: {duration} minutes",
                config.date.trim()
            ))],
        )?;
    }

    paragraph(
        doc,
        config,
        &[Span::new(
            "By signing this Consent, you agree to the following terms:",
        )],
    )?;

    for clause in numbered_clauses(config) {
        paragraph(
            doc,
            config,
            &[
                Span::new(clause.number.to_string()).font(bold),
                Span::new(format!(". {}", clause.text)),
            ],
        )?;

        if clause.kind == ClauseKind::Considerations && !config.origin.is_local() {
            inline_field(
                doc,
                config,
                "Departure city:",
                field_names::DEPARTURE_CITY,
                TextFieldOptions::default(),
            )?;
            doc.move_down(config.layout.section_gap);
        }
    }

    inline_field(
        doc,
        config,
        "Name:",
        field_names::SIGNER_NAME,
        TextFieldOptions::default(),
    )?;
    doc.move_down(config.layout.section_gap);

    inline_field(
        doc,
        config,
        "Signature:",
        field_names::SIGNATURE_NAME,
        TextFieldOptions::default(),
    )?;
    doc.move_down(config.layout.section_gap);

    let mut signing_date =
        TextFieldOptions::default().format(FieldFormat::Date(SIGNING_DATE_MASK.to_string()));
    if !config.signing_date.trim().is_empty() {
        signing_date = signing_date.value(config.signing_date.trim());
    }
    inline_field(
        doc,
        config,
        "Date:",
        field_names::SIGNING_DATE,
        signing_date,
    )?;

    let mut cursor = doc.cursor();
    cursor.y += config.layout.jurisdiction_offset;
    doc.set_cursor(cursor);
    doc.set_font_size(config.layout.jurisdiction_font_size);
    doc.text(&[Span::new(JURISDICTION)], TextOptions::default())?;

    reset_font(doc, config)
}

/// Logo, title and date range at the top of a page
pub fn insert_header(
    doc: &mut PdfDocument,
    config: &AgreementConfig,
    _pagination: Pagination,
) -> pdf_core::Result<()> {
    reset_font(doc, config)?;

    let page_width = doc.page_size().width;
    let margins = doc.margins();
    let mut y = config.pdf.header_top;

    if let Some(logo) = &config.logo {
        let options = VectorOptions {
            width: Some(logo.width),
            height: None,
        };
        let x = (page_width - logo.width) / 2.0;
        let (_, height) = embed_vector_graphic(doc, &logo.markup, x, y, options)?;
        y += height + config.layout.logo_gap;
    }

    let bold = config.font.bold()?;
    doc.text_at(
        &[
            Span::new(config.title.as_str())
                .font(bold)
                .size(config.layout.title_size),
            Span::new(format!("\n\n{}", config.date.trim())),
        ],
        margins.left,
        y,
        TextOptions::align(Align::Center),
    )?;

    reset_font(doc, config)
}

/// `current / total` centered below the content area
pub fn insert_footer(
    doc: &mut PdfDocument,
    config: &AgreementConfig,
    pagination: Pagination,
) -> pdf_core::Result<()> {
    reset_font(doc, config)?;

    let y = doc.page_size().height - doc.margins().bottom - doc.current_line_height()
        + config.layout.footer_offset;
    let label = format!("{} / {}", pagination.current + 1, pagination.total);

    doc.text_at(
        &[Span::new(label)],
        doc.margins().left,
        y,
        TextOptions::align(Align::Center),
    )
}
