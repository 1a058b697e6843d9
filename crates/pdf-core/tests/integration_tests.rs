//! Integration tests for pdf-core
//!
//! These tests render complete documents and load the output back with lopdf.

use lopdf::Document;
use pdf_core::{
    embed_vector_graphic, Align, Color, FieldFormat, Output, PageSetup, PdfDocument, PdfError,
    Rect, Renderer, Span, StandardFont, TextFieldOptions, TextOptions, VectorOptions,
};
use pretty_assertions::assert_eq;

const LOGO: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 50">
    <rect width="100" height="50" fill="#000"/>
    <path d="M10 10 h80 v30 h-80 z" fill="#fff"/>
</svg>"##;

/// Three pages of numbered lines with a header and a footer
fn render_sample(output: Output<'_>) -> pdf_core::Result<pdf_core::Rendered> {
    Renderer::new(PageSetup::default())
        .header(|doc, _| {
            let margins = doc.margins();
            embed_vector_graphic(
                doc,
                LOGO,
                margins.left,
                margins.top - 60.0,
                VectorOptions {
                    width: Some(40.0),
                    height: None,
                },
            )?;
            doc.text_at(
                &[Span::new("SAMPLE HEADER").font(StandardFont::HelveticaBold)],
                margins.left,
                margins.top - 30.0,
                TextOptions::align(Align::Center),
            )
        })
        .footer(|doc, page| {
            let y = doc.page_size().height - doc.margins().bottom + 10.0;
            let label = format!("{} / {}", page.current + 1, page.total);
            doc.text_at(&[Span::new(label)], doc.margins().left, y, TextOptions::align(Align::Center))
        })
        .render(
            |doc| {
                doc.set_title("Sample");
                doc.init_form();
                doc.add_page();
                let body: Vec<String> = (1..=120).map(|i| format!("Line {i}")).collect();
                doc.text(&[Span::new(body.join("\n"))], TextOptions::default())?;

                let y = doc.cursor().y;
                doc.form_text(
                    "date",
                    Rect::new(doc.margins().left, y, 200.0, 16.0),
                    TextFieldOptions::default()
                        .format(FieldFormat::Date("yyyy-mm-dd".to_string()))
                        .border_color(Color::green()),
                )
            },
            output,
        )
}

#[test]
fn test_buffer_stream_and_file_outputs_match() {
    let buffered = render_sample(Output::Buffer).unwrap().bytes.unwrap();

    let mut stream = Vec::new();
    let streamed = render_sample(Output::Stream(&mut stream)).unwrap();
    assert!(streamed.bytes.is_none());

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sample.pdf");
    let filed = render_sample(Output::File(path.clone())).unwrap();
    assert!(filed.bytes.is_none());

    assert_eq!(buffered, stream);
    assert_eq!(buffered, std::fs::read(path).unwrap());
}

#[test]
fn test_content_paginates_and_decorates_every_page() {
    let rendered = render_sample(Output::Buffer).unwrap();
    let doc = &rendered.document;
    let total = doc.page_count();
    assert!(total >= 3);

    for index in 0..total {
        let lines = doc.page_lines(index).unwrap();
        assert!(lines.contains(&"SAMPLE HEADER".to_string()));
        assert_eq!(lines.last().unwrap(), &format!("{} / {}", index + 1, total));
    }

    let loaded = Document::load_mem(&rendered.bytes.unwrap()).unwrap();
    assert_eq!(loaded.get_pages().len(), total);
}

#[test]
fn test_form_field_lands_on_last_page() {
    let rendered = render_sample(Output::Buffer).unwrap();
    let last = rendered.document.page_count() - 1;
    assert_eq!(rendered.document.fields()[0].page, last);

    let loaded = Document::load_mem(&rendered.bytes.unwrap()).unwrap();
    let pages = loaded.get_pages();
    let last_page_id = pages[&(last as u32 + 1)];
    let page = loaded.get_dictionary(last_page_id).unwrap();
    let annots = page.get(b"Annots").unwrap().as_array().unwrap();
    assert_eq!(annots.len(), 1);

    let widget = loaded
        .get_dictionary(annots[0].as_reference().unwrap())
        .unwrap();
    assert_eq!(widget.get(b"T").unwrap().as_str().unwrap(), b"date");
    assert_eq!(widget.get(b"FT").unwrap().as_name_str().unwrap(), "Tx");
}

#[test]
fn test_renders_are_reproducible() {
    let first = render_sample(Output::Buffer).unwrap().bytes.unwrap();
    let second = render_sample(Output::Buffer).unwrap().bytes.unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_invalid_svg_propagates() {
    let result = Renderer::new(PageSetup::default()).render(
        |doc| {
            doc.add_page();
            embed_vector_graphic(doc, "<svg", 0.0, 0.0, VectorOptions::default()).map(|_| ())
        },
        Output::Buffer,
    );
    assert!(matches!(result, Err(PdfError::SvgError(_))));
}

#[test]
fn test_file_output_to_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("out.pdf");
    let result = Renderer::new(PageSetup::default()).render(
        |doc| {
            doc.add_page();
            Ok(())
        },
        Output::File(path),
    );
    assert!(matches!(result, Err(PdfError::IoError(_))));
}

#[test]
fn test_mixed_spans_share_a_line() {
    let mut doc = PdfDocument::new(PageSetup {
        auto_first_page: true,
        ..PageSetup::default()
    });
    doc.text(
        &[
            Span::new("1").font(StandardFont::HelveticaBold),
            Span::new(". The speaker agrees."),
        ],
        TextOptions::default(),
    )
    .unwrap();
    assert_eq!(doc.page_lines(0).unwrap(), &["1. The speaker agrees."]);
}
