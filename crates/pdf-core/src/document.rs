//! PDF Document builder

use crate::font::{FontStyle, FontWeight, StandardFont};
use crate::form::{acroform_dictionary, FormField, TextFieldOptions};
use crate::page::{Cursor, Margins, PageSetup, PageSize, Rect};
use crate::text::{
    calculate_x_offset, generate_text_operators, layout_lines, Span, SpanStyle,
    TextRenderContext,
};
use crate::{Align, PdfError, Result};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;
use std::path::Path;

/// RGB Color (values 0.0 - 1.0)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    /// Create a new RGB color (values 0.0 - 1.0)
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Create color from RGB values (0-255)
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    /// Parse `#rgb` or `#rrggbb`
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#')?;
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();

        match digits.len() {
            3 => {
                let mut c = digits.chars().map(|ch| channel(&format!("{ch}{ch}")));
                Some(Self::from_rgb(c.next()??, c.next()??, c.next()??))
            }
            6 => Some(Self::from_rgb(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            _ => None,
        }
    }

    /// Parse a CSS-style color: hex, `rgb(r, g, b)` or a basic name
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.starts_with('#') {
            return Self::from_hex(value);
        }

        if let Some(args) = value
            .strip_prefix("rgb(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            let parts: Vec<u8> = args
                .split(',')
                .filter_map(|p| p.trim().parse::<f64>().ok())
                .map(|v| v.clamp(0.0, 255.0) as u8)
                .collect();
            return match parts.as_slice() {
                [r, g, b] => Some(Self::from_rgb(*r, *g, *b)),
                _ => None,
            };
        }

        match value.to_ascii_lowercase().as_str() {
            "black" => Some(Self::black()),
            "white" => Some(Self::white()),
            "red" => Some(Self::red()),
            "green" | "lime" => Some(Self::green()),
            "blue" => Some(Self::blue()),
            "gray" | "grey" => Some(Self::from_rgb(128, 128, 128)),
            _ => None,
        }
    }

    /// Black color
    pub fn black() -> Self {
        Self::rgb(0.0, 0.0, 0.0)
    }

    /// White color
    pub fn white() -> Self {
        Self::rgb(1.0, 1.0, 1.0)
    }

    /// Red color
    pub fn red() -> Self {
        Self::rgb(1.0, 0.0, 0.0)
    }

    /// Green color
    pub fn green() -> Self {
        Self::rgb(0.0, 1.0, 0.0)
    }

    /// Blue color
    pub fn blue() -> Self {
        Self::rgb(0.0, 0.0, 1.0)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::black()
    }
}

/// Document information dictionary entries
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentInfo {
    pub title: Option<String>,
    pub author: Option<String>,
    pub producer: String,
}

impl Default for DocumentInfo {
    fn default() -> Self {
        Self {
            title: None,
            author: None,
            producer: "pdf-core".to_string(),
        }
    }
}

/// Options for a block of text
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TextOptions {
    pub align: Align,
    /// Wrapping width; defaults to the space between the start x and the
    /// right margin
    pub width: Option<f64>,
}

impl TextOptions {
    pub fn align(align: Align) -> Self {
        Self { align, width: None }
    }
}

/// A page under construction
#[derive(Debug, Default)]
struct Page {
    /// Content stream operators
    content: Vec<u8>,
    /// Fonts referenced from the content stream
    fonts: BTreeSet<StandardFont>,
    /// Text of every drawn line, in drawing order
    lines: Vec<String>,
}

/// PDF Document builder providing high-level operations
///
/// Pages stay buffered in memory until the document is serialized, so any
/// page can be revisited with [`PdfDocument::switch_to_page`] after the
/// total page count is known.
pub struct PdfDocument {
    setup: PageSetup,
    pages: Vec<Page>,
    /// Active page index (0-based)
    current_page: Option<usize>,
    cursor: Cursor,
    current_font: StandardFont,
    current_font_size: f64,
    current_fill: Color,
    /// Extra spacing added to every line, in points
    line_gap: f64,
    info: DocumentInfo,
    form_enabled: bool,
    fields: Vec<FormField>,
}

impl PdfDocument {
    /// Create an empty document
    ///
    /// # Example
    /// ```ignore
    /// let mut doc = PdfDocument::new(PageSetup::default());
    /// doc.add_page();
    /// doc.set_font("Helvetica", 12.0)?;
    /// doc.text(&[Span::new("Hello, World!")], TextOptions::default())?;
    /// doc.save("output.pdf")?;
    /// ```
    pub fn new(setup: PageSetup) -> Self {
        let mut doc = Self {
            setup,
            pages: Vec::new(),
            current_page: None,
            cursor: Cursor {
                x: setup.margins.left,
                y: setup.margins.top,
            },
            current_font: StandardFont::Helvetica,
            current_font_size: 12.0,
            current_fill: Color::default(),
            line_gap: 0.0,
            info: DocumentInfo::default(),
            form_enabled: false,
            fields: Vec::new(),
        };

        if setup.auto_first_page {
            doc.add_page();
        }

        doc
    }

    pub fn info(&self) -> &DocumentInfo {
        &self.info
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.info.title = Some(title.into());
    }

    pub fn set_author(&mut self, author: impl Into<String>) {
        self.info.author = Some(author.into());
    }

    pub fn set_producer(&mut self, producer: impl Into<String>) {
        self.info.producer = producer.into();
    }

    /// Set the current font family (regular weight) and size
    pub fn set_font(&mut self, family: &str, size: f64) -> Result<()> {
        self.current_font =
            StandardFont::from_family(family, FontWeight::Regular, FontStyle::Normal)?;
        self.current_font_size = size;
        Ok(())
    }

    /// Set the current font by PostScript name, e.g. `Helvetica-Bold`
    pub fn set_font_by_name(&mut self, name: &str) -> Result<()> {
        self.current_font = StandardFont::from_name(name)?;
        Ok(())
    }

    /// Switch weight within the current family
    pub fn set_font_weight(&mut self, weight: FontWeight) {
        self.current_font = self.current_font.variant(weight, self.current_font.style());
    }

    /// Switch style within the current family
    pub fn set_font_style(&mut self, style: FontStyle) {
        self.current_font = self.current_font.variant(self.current_font.weight(), style);
    }

    pub fn set_font_size(&mut self, size: f64) {
        self.current_font_size = size;
    }

    pub fn set_fill_color(&mut self, color: Color) {
        self.current_fill = color;
    }

    pub fn set_line_gap(&mut self, gap: f64) {
        self.line_gap = gap;
    }

    pub fn font(&self) -> StandardFont {
        self.current_font
    }

    pub fn font_size(&self) -> f64 {
        self.current_font_size
    }

    pub fn fill_color(&self) -> Color {
        self.current_fill
    }

    /// Height of one line in the current font, gap included
    pub fn current_line_height(&self) -> f64 {
        self.current_font.line_height(self.current_font_size, true) + self.line_gap
    }

    /// Style new spans inherit
    pub fn base_style(&self) -> SpanStyle {
        SpanStyle {
            font: self.current_font,
            size: self.current_font_size,
            color: self.current_fill,
        }
    }

    /// Append a blank page, make it current and return its index (0-based)
    ///
    /// The cursor moves to the top-left corner of the content area.
    pub fn add_page(&mut self) -> usize {
        self.pages.push(Page::default());
        let index = self.pages.len() - 1;
        self.current_page = Some(index);
        self.cursor = Cursor {
            x: self.setup.margins.left,
            y: self.setup.margins.top,
        };
        index
    }

    /// Make an existing page current; the cursor is left untouched
    pub fn switch_to_page(&mut self, index: usize) -> Result<()> {
        if index >= self.pages.len() {
            return Err(PdfError::InvalidPage(index, self.pages.len()));
        }
        self.current_page = Some(index);
        Ok(())
    }

    /// Get the number of pages in the document
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn current_page(&self) -> Option<usize> {
        self.current_page
    }

    pub fn page_size(&self) -> PageSize {
        self.setup.size
    }

    pub fn margins(&self) -> Margins {
        self.setup.margins
    }

    /// Width between the left and right margins
    pub fn content_width(&self) -> f64 {
        self.setup.size.width - self.setup.margins.left - self.setup.margins.right
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn set_cursor(&mut self, cursor: Cursor) {
        self.cursor = cursor;
    }

    /// Move the cursor down by a number of current lines
    pub fn move_down(&mut self, lines: f64) {
        self.cursor.y += lines * self.current_line_height();
    }

    /// Flow text from the cursor
    ///
    /// Lines wrap inside the wrapping width; a line that would cross the
    /// bottom margin continues on a new page. The cursor ends below the last
    /// line, at the x it started from.
    pub fn text(&mut self, spans: &[Span], options: TextOptions) -> Result<()> {
        let Cursor { x, y } = self.cursor;
        self.draw_text(spans, x, y, options, true)
    }

    /// Draw text at an absolute position without pagination
    ///
    /// The cursor is moved below the drawn text like [`PdfDocument::text`].
    pub fn text_at(&mut self, spans: &[Span], x: f64, y: f64, options: TextOptions) -> Result<()> {
        self.draw_text(spans, x, y, options, false)
    }

    fn draw_text(
        &mut self,
        spans: &[Span],
        x: f64,
        y: f64,
        options: TextOptions,
        paginate: bool,
    ) -> Result<()> {
        if self.current_page.is_none() {
            return Err(PdfError::NoCurrentPage);
        }

        let base = self.base_style();
        let resolved: Vec<(String, SpanStyle)> = spans.iter().map(|s| s.resolve(base)).collect();
        let width = options
            .width
            .unwrap_or(self.setup.size.width - self.setup.margins.right - x);
        let bottom = self.setup.size.height - self.setup.margins.bottom;

        let mut y = y;
        for line in layout_lines(&resolved, width) {
            let height = line.height + self.line_gap;

            if paginate && y + height > bottom && y > self.setup.margins.top {
                self.add_page();
                y = self.setup.margins.top;
            }

            let baseline = self.setup.size.height - (y + line.ascent);
            let mut pen = x + calculate_x_offset(line.width, width, options.align);

            let mut ops = Vec::new();
            let mut fonts = Vec::new();
            for piece in &line.pieces {
                let ctx = TextRenderContext {
                    font_name: piece.style.font.resource_name(),
                    font_size: piece.style.size,
                    text_width: piece.width,
                    color: piece.style.color,
                };
                ops.extend(generate_text_operators(&piece.text, pen, baseline, &ctx));
                fonts.push(piece.style.font);
                pen += piece.width;
            }

            let page = self.page_mut()?;
            page.content.extend(ops);
            page.fonts.extend(fonts);
            let text = line.text();
            if !text.is_empty() {
                page.lines.push(text);
            }

            y += height;
        }

        self.cursor = Cursor { x, y };
        Ok(())
    }

    /// Append raw content operators to the current page
    pub fn append_content(&mut self, ops: &[u8]) -> Result<()> {
        self.page_mut()?.content.extend_from_slice(ops);
        Ok(())
    }

    fn page_mut(&mut self) -> Result<&mut Page> {
        let index = self.current_page.ok_or(PdfError::NoCurrentPage)?;
        let count = self.pages.len();
        self.pages
            .get_mut(index)
            .ok_or(PdfError::InvalidPage(index, count))
    }

    /// Enable the interactive form; must precede any field
    pub fn init_form(&mut self) {
        self.form_enabled = true;
    }

    /// Place a text field on the current page
    ///
    /// Field names are unique per document. The cursor is not moved.
    pub fn form_text(&mut self, name: &str, rect: Rect, options: TextFieldOptions) -> Result<()> {
        if !self.form_enabled {
            return Err(PdfError::FormNotInitialized);
        }
        let page = self.current_page.ok_or(PdfError::NoCurrentPage)?;
        if self.fields.iter().any(|f| f.name == name) {
            return Err(PdfError::DuplicateField(name.to_string()));
        }

        self.fields.push(FormField {
            name: name.to_string(),
            page,
            rect,
            options,
        });
        Ok(())
    }

    /// Text lines drawn on a page, in drawing order
    pub fn page_lines(&self, index: usize) -> Result<&[String]> {
        self.pages
            .get(index)
            .map(|p| p.lines.as_slice())
            .ok_or(PdfError::InvalidPage(index, self.pages.len()))
    }

    /// Placed form fields, in placement order
    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    /// Save the document to a file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Write the serialized document to a writer
    pub fn save_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        let bytes = self.to_bytes()?;
        writer.write_all(&bytes)?;
        Ok(())
    }

    /// Save the document to bytes
    ///
    /// Output is deterministic: the same sequence of calls always produces
    /// the same bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut doc = self.build()?;

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)
            .map_err(|e| PdfError::SaveError(e.to_string()))?;

        Ok(buffer)
    }

    fn build(&self) -> Result<Document> {
        if self.pages.is_empty() {
            return Err(PdfError::NoPages);
        }

        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();

        let mut used_fonts: BTreeSet<StandardFont> = self
            .pages
            .iter()
            .flat_map(|p| p.fonts.iter().copied())
            .collect();
        if self.form_enabled {
            used_fonts.insert(StandardFont::Helvetica);
        }

        let font_ids: BTreeMap<StandardFont, ObjectId> = used_fonts
            .iter()
            .map(|font| (*font, doc.add_object(font.to_pdf_dictionary())))
            .collect();

        let size = self.setup.size;
        let mut kids = Vec::with_capacity(self.pages.len());
        let mut field_ids = Vec::with_capacity(self.fields.len());

        for (index, page) in self.pages.iter().enumerate() {
            let content_id = doc.add_object(Stream::new(Dictionary::new(), page.content.clone()));
            let page_id = doc.new_object_id();

            let mut font_resources = Dictionary::new();
            for font in &page.fonts {
                if let Some(id) = font_ids.get(font) {
                    font_resources.set(font.resource_name(), Object::Reference(*id));
                }
            }

            let mut annots = Vec::new();
            for field in self.fields.iter().filter(|f| f.page == index) {
                let widget_id = doc.add_object(field.to_widget_dictionary(page_id, size.height));
                annots.push(Object::Reference(widget_id));
                field_ids.push(widget_id);
            }

            let mut page_dict = dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Real(size.width as f32),
                    Object::Real(size.height as f32),
                ],
                "Contents" => content_id,
                "Resources" => dictionary! {
                    "Font" => font_resources,
                },
            };
            if !annots.is_empty() {
                page_dict.set("Annots", annots);
            }

            doc.objects.insert(page_id, Object::Dictionary(page_dict));
            kids.push(Object::Reference(page_id));
        }

        let page_count = kids.len() as i64;
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let mut catalog = dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        };
        if self.form_enabled {
            if let Some(helvetica_id) = font_ids.get(&StandardFont::Helvetica) {
                catalog.set("AcroForm", acroform_dictionary(&field_ids, *helvetica_id));
            }
        }
        let catalog_id = doc.add_object(catalog);

        let mut info = dictionary! {
            "Producer" => text_string(&self.info.producer),
        };
        if let Some(title) = &self.info.title {
            info.set("Title", text_string(title));
        }
        if let Some(author) = &self.info.author {
            info.set("Author", text_string(author));
        }
        let info_id = doc.add_object(info);

        doc.trailer.set("Root", catalog_id);
        doc.trailer.set("Info", info_id);
        doc.compress();

        Ok(doc)
    }
}

/// PDF text string: literal for ASCII, UTF-16BE with BOM otherwise
fn text_string(text: &str) -> Object {
    if text.is_ascii() {
        return Object::string_literal(text);
    }

    let mut bytes = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}
