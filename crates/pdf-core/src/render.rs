//! Two-pass render driver
//!
//! Content is written first, which fixes the page count. Headers and footers
//! are then drawn on every page with the total known, each with the cursor
//! restored so they never disturb the content pass.

use crate::document::PdfDocument;
use crate::page::PageSetup;
use crate::{PdfError, Result};
use std::io::Write;
use std::path::PathBuf;

/// Position of a page within the finished document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Page index (0-based)
    pub current: usize,
    /// Total number of pages
    pub total: usize,
}

/// Result of the content pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentPass {
    pub page_count: usize,
}

/// Where the serialized document goes
pub enum Output<'a> {
    /// Collect the bytes and hand them back in [`Rendered::bytes`]
    Buffer,
    /// Write to an open stream
    Stream(&'a mut dyn Write),
    /// Create (or truncate) a file
    File(PathBuf),
}

/// A finished render
pub struct Rendered {
    pub document: PdfDocument,
    /// Serialized bytes for [`Output::Buffer`], `None` otherwise
    pub bytes: Option<Vec<u8>>,
}

type Decoration<'a> = Box<dyn Fn(&mut PdfDocument, Pagination) -> Result<()> + 'a>;

/// Builds a document from a content callback plus optional header and footer
pub struct Renderer<'a> {
    setup: PageSetup,
    header: Option<Decoration<'a>>,
    footer: Option<Decoration<'a>>,
}

impl<'a> Renderer<'a> {
    pub fn new(setup: PageSetup) -> Self {
        Self {
            setup,
            header: None,
            footer: None,
        }
    }

    pub fn header<F>(mut self, header: F) -> Self
    where
        F: Fn(&mut PdfDocument, Pagination) -> Result<()> + 'a,
    {
        self.header = Some(Box::new(header));
        self
    }

    pub fn footer<F>(mut self, footer: F) -> Self
    where
        F: Fn(&mut PdfDocument, Pagination) -> Result<()> + 'a,
    {
        self.footer = Some(Box::new(footer));
        self
    }

    /// Run both passes and serialize to `output`
    ///
    /// The content callback must add at least one page.
    pub fn render<C>(self, content: C, output: Output<'_>) -> Result<Rendered>
    where
        C: FnOnce(&mut PdfDocument) -> Result<()>,
    {
        let mut document = PdfDocument::new(self.setup);

        let pass = content_pass(&mut document, content)?;
        tracing::debug!(pages = pass.page_count, "content pass complete");

        if self.header.is_some() || self.footer.is_some() {
            for current in 0..pass.page_count {
                let pagination = Pagination {
                    current,
                    total: pass.page_count,
                };
                document.switch_to_page(current)?;
                let snapshot = document.cursor();

                if let Some(header) = &self.header {
                    header(&mut document, pagination)?;
                    document.set_cursor(snapshot);
                }
                if let Some(footer) = &self.footer {
                    footer(&mut document, pagination)?;
                    document.set_cursor(snapshot);
                }
            }
        }

        let bytes = document.to_bytes()?;
        let bytes = match output {
            Output::Buffer => Some(bytes),
            Output::Stream(writer) => {
                writer.write_all(&bytes)?;
                writer.flush()?;
                None
            }
            Output::File(path) => {
                std::fs::write(&path, &bytes)?;
                None
            }
        };

        Ok(Rendered { document, bytes })
    }
}

fn content_pass<C>(document: &mut PdfDocument, content: C) -> Result<ContentPass>
where
    C: FnOnce(&mut PdfDocument) -> Result<()>,
{
    content(document)?;

    let page_count = document.page_count();
    if page_count == 0 {
        return Err(PdfError::NoPages);
    }

    Ok(ContentPass { page_count })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::TextOptions;
    use crate::text::Span;
    use crate::Align;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;

    #[test]
    fn test_render_without_pages_fails() {
        let result = Renderer::new(PageSetup::default()).render(|_| Ok(()), Output::Buffer);
        assert!(matches!(result, Err(PdfError::NoPages)));
    }

    #[test]
    fn test_decorations_see_every_page_in_order() {
        let seen = RefCell::new(Vec::new());

        let rendered = Renderer::new(PageSetup::default())
            .header(|_, p| {
                seen.borrow_mut().push(("header", p.current, p.total));
                Ok(())
            })
            .footer(|_, p| {
                seen.borrow_mut().push(("footer", p.current, p.total));
                Ok(())
            })
            .render(
                |doc| {
                    doc.add_page();
                    doc.add_page();
                    Ok(())
                },
                Output::Buffer,
            )
            .unwrap();

        assert!(rendered.bytes.is_some());
        assert_eq!(
            seen.into_inner(),
            vec![
                ("header", 0, 2),
                ("footer", 0, 2),
                ("header", 1, 2),
                ("footer", 1, 2),
            ]
        );
    }

    #[test]
    fn test_decorations_restore_cursor() {
        let rendered = Renderer::new(PageSetup::default())
            .footer(|doc, p| {
                let label = format!("{} / {}", p.current + 1, p.total);
                doc.text_at(&[Span::new(label)], 40.0, 760.0, TextOptions::align(Align::Center))
            })
            .render(
                |doc| {
                    doc.add_page();
                    doc.move_down(3.0);
                    Ok(())
                },
                Output::Buffer,
            )
            .unwrap();

        let doc = &rendered.document;
        assert!((doc.cursor().y - (40.0 + 3.0 * doc.current_line_height())).abs() < 1e-9);
        assert_eq!(doc.page_lines(0).unwrap(), &["1 / 1"]);
    }

    #[test]
    fn test_stream_output_matches_buffer() {
        let content = |doc: &mut PdfDocument| {
            doc.add_page();
            doc.text(&[Span::new("Same bytes")], TextOptions::default())
        };

        let buffered = Renderer::new(PageSetup::default())
            .render(content, Output::Buffer)
            .unwrap();

        let mut sink = Vec::new();
        let streamed = Renderer::new(PageSetup::default())
            .render(content, Output::Stream(&mut sink))
            .unwrap();

        assert!(streamed.bytes.is_none());
        assert_eq!(buffered.bytes.unwrap(), sink);
    }
}
