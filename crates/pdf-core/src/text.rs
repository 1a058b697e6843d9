//! Text layout and rendering utilities

use crate::document::Color;
use crate::font::{encode_win_ansi, StandardFont};
use crate::Align;

/// Resolved style of a run of text
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpanStyle {
    pub font: StandardFont,
    pub size: f64,
    pub color: Color,
}

impl SpanStyle {
    fn width(&self, text: &str) -> f64 {
        self.font.text_width(text, self.size)
    }

    fn line_height(&self) -> f64 {
        self.font.line_height(self.size, true)
    }
}

/// A piece of text inside a paragraph
///
/// Style fields left as `None` inherit the document's current state, so a
/// paragraph can switch to bold for a single span and fall back afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Span {
    pub text: String,
    pub font: Option<StandardFont>,
    pub size: Option<f64>,
    pub color: Option<Color>,
}

impl Span {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn font(mut self, font: StandardFont) -> Self {
        self.font = Some(font);
        self
    }

    pub fn size(mut self, size: f64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// Resolve against a base style
    pub fn resolve(&self, base: SpanStyle) -> (String, SpanStyle) {
        (
            self.text.clone(),
            SpanStyle {
                font: self.font.unwrap_or(base.font),
                size: self.size.unwrap_or(base.size),
                color: self.color.unwrap_or(base.color),
            },
        )
    }
}

/// A contiguous run of one style within a laid out line
#[derive(Debug, Clone, PartialEq)]
pub struct Piece {
    pub text: String,
    pub style: SpanStyle,
    pub width: f64,
}

/// One laid out line
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub pieces: Vec<Piece>,
    /// Total advance width in points
    pub width: f64,
    /// Line height in points (tallest style on the line, gap included)
    pub height: f64,
    /// Distance from line top to baseline
    pub ascent: f64,
}

impl Line {
    /// Plain text of the line
    pub fn text(&self) -> String {
        self.pieces.iter().map(|p| p.text.as_str()).collect()
    }
}

enum Token {
    /// Words glued together without whitespace, possibly across styles
    Unit(Vec<(String, SpanStyle)>),
    Space(String, SpanStyle),
    Break(SpanStyle),
}

fn tokenize(spans: &[(String, SpanStyle)]) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut unit: Vec<(String, SpanStyle)> = Vec::new();

    for (text, style) in spans {
        let mut word = String::new();
        for c in text.chars() {
            if c == '\n' || c == ' ' || c == '\t' {
                if !word.is_empty() {
                    unit.push((std::mem::take(&mut word), *style));
                }
                if !unit.is_empty() {
                    tokens.push(Token::Unit(std::mem::take(&mut unit)));
                }
                if c == '\n' {
                    tokens.push(Token::Break(*style));
                } else {
                    tokens.push(Token::Space(" ".to_string(), *style));
                }
            } else {
                word.push(c);
            }
        }
        if !word.is_empty() {
            unit.push((word, *style));
        }
    }

    if !unit.is_empty() {
        tokens.push(Token::Unit(unit));
    }

    tokens
}

struct LineBuilder {
    pieces: Vec<Piece>,
    width: f64,
    pending: Vec<(String, SpanStyle)>,
    break_style: SpanStyle,
}

impl LineBuilder {
    fn new(break_style: SpanStyle) -> Self {
        Self {
            pieces: Vec::new(),
            width: 0.0,
            pending: Vec::new(),
            break_style,
        }
    }

    fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    fn pending_width(&self) -> f64 {
        self.pending.iter().map(|(t, s)| s.width(t)).sum()
    }

    fn push(&mut self, text: &str, style: SpanStyle) {
        let width = style.width(text);
        self.width += width;
        match self.pieces.last_mut() {
            Some(last) if last.style == style => {
                last.text.push_str(text);
                last.width += width;
            }
            _ => self.pieces.push(Piece {
                text: text.to_string(),
                style,
                width,
            }),
        }
    }

    fn push_unit(&mut self, unit: &[(String, SpanStyle)]) {
        for (text, style) in std::mem::take(&mut self.pending) {
            self.push(&text, style);
        }
        for (text, style) in unit {
            self.push(text, *style);
        }
    }

    fn finish(self) -> Line {
        let (height, ascent) = if self.pieces.is_empty() {
            (
                self.break_style.line_height(),
                self.break_style.font.ascender(self.break_style.size),
            )
        } else {
            self.pieces.iter().fold((0.0f64, 0.0f64), |(h, a), p| {
                (
                    h.max(p.style.line_height()),
                    a.max(p.style.font.ascender(p.style.size)),
                )
            })
        };

        Line {
            pieces: self.pieces,
            width: self.width,
            height,
            ascent,
        }
    }
}

/// Break styled spans into lines no wider than `max_width`
///
/// Words are never split; a single word wider than `max_width` overflows on a
/// line of its own. Newlines force a break and consecutive newlines produce
/// empty lines.
pub fn layout_lines(spans: &[(String, SpanStyle)], max_width: f64) -> Vec<Line> {
    let Some((_, first_style)) = spans.first() else {
        return Vec::new();
    };

    let mut lines = Vec::new();
    let mut current = LineBuilder::new(*first_style);

    for token in tokenize(spans) {
        match token {
            Token::Break(style) => {
                let mut finished = std::mem::replace(&mut current, LineBuilder::new(style));
                if finished.is_empty() {
                    finished.break_style = style;
                }
                lines.push(finished.finish());
            }
            Token::Space(text, style) => {
                if !current.is_empty() {
                    current.pending.push((text, style));
                }
            }
            Token::Unit(unit) => {
                let unit_width: f64 = unit.iter().map(|(t, s)| s.width(t)).sum();
                let needed = current.width + current.pending_width() + unit_width;
                if !current.is_empty() && needed > max_width {
                    let style = unit[0].1;
                    let finished = std::mem::replace(&mut current, LineBuilder::new(style));
                    lines.push(finished.finish());
                }
                current.push_unit(&unit);
            }
        }
    }

    if !current.is_empty() {
        lines.push(current.finish());
    }

    lines
}

/// Context for rendering text
pub struct TextRenderContext {
    /// PDF font resource name (e.g., "F1")
    pub font_name: String,
    /// Font size in points
    pub font_size: f64,
    /// Text width in points (for alignment)
    pub text_width: f64,
    /// Text color (RGB)
    pub color: Color,
}

/// Calculate X offset for text alignment
///
/// # Arguments
/// * `text_width` - Width of text in points
/// * `container_width` - Available width for alignment
/// * `align` - Desired alignment
pub fn calculate_x_offset(text_width: f64, container_width: f64, align: Align) -> f64 {
    match align {
        Align::Left => 0.0,
        Align::Center => (container_width - text_width) / 2.0,
        Align::Right => container_width - text_width,
    }
}

/// Encode text as a PDF literal string, e.g. `(Hello \(World\))`
pub fn pdf_literal(text: &str) -> String {
    let mut out = String::from("(");
    for byte in encode_win_ansi(text) {
        match byte {
            b'(' | b')' | b'\\' => {
                out.push('\\');
                out.push(byte as char);
            }
            0x20..=0x7E => out.push(byte as char),
            _ => out.push_str(&format!("\\{byte:03o}")),
        }
    }
    out.push(')');
    out
}

/// Format a coordinate without trailing noise
pub fn fmt_num(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    if rounded == rounded.trunc() {
        format!("{}", rounded as i64)
    } else {
        let s = format!("{rounded:.3}");
        s.trim_end_matches('0').to_string()
    }
}

/// Generate PDF operators for text insertion
///
/// Creates the PDF text operators (BT, rg, Tf, Td, Tj, ET) to draw text with
/// its baseline starting at `(x, y)` in PDF coordinates.
pub fn generate_text_operators(text: &str, x: f64, y: f64, ctx: &TextRenderContext) -> Vec<u8> {
    let mut ops = String::new();

    ops.push_str("BT\n");
    ops.push_str(&format!(
        "{} {} {} rg\n",
        fmt_num(ctx.color.r as f64),
        fmt_num(ctx.color.g as f64),
        fmt_num(ctx.color.b as f64)
    ));
    ops.push_str(&format!("/{} {} Tf\n", ctx.font_name, fmt_num(ctx.font_size)));
    ops.push_str(&format!("{} {} Td\n", fmt_num(x), fmt_num(y)));
    ops.push_str(&format!("{} Tj\n", pdf_literal(text)));
    ops.push_str("ET\n");

    ops.into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn style(font: StandardFont) -> SpanStyle {
        SpanStyle {
            font,
            size: 10.0,
            color: Color::black(),
        }
    }

    fn plain(text: &str) -> Vec<(String, SpanStyle)> {
        vec![(text.to_string(), style(StandardFont::Courier))]
    }

    #[test]
    fn test_x_offset_left() {
        assert_eq!(calculate_x_offset(50.0, 200.0, Align::Left), 0.0);
    }

    #[test]
    fn test_x_offset_center() {
        assert_eq!(calculate_x_offset(50.0, 200.0, Align::Center), 75.0);
    }

    #[test]
    fn test_x_offset_right() {
        assert_eq!(calculate_x_offset(50.0, 200.0, Align::Right), 150.0);
    }

    #[test]
    fn test_layout_wraps_on_width() {
        // Courier 10pt: 6pt per char, 60pt fits 10 chars
        let lines = layout_lines(&plain("aaaa bbbb cccc"), 60.0);
        let texts: Vec<String> = lines.iter().map(Line::text).collect();
        assert_eq!(texts, vec!["aaaa bbbb", "cccc"]);
        assert!((lines[0].width - 54.0).abs() < 1e-9);
    }

    #[test]
    fn test_layout_hard_breaks() {
        let lines = layout_lines(&plain("one\n\ntwo"), 500.0);
        let texts: Vec<String> = lines.iter().map(Line::text).collect();
        assert_eq!(texts, vec!["one", "", "two"]);
        assert!(lines[1].height > 0.0);
    }

    #[test]
    fn test_layout_trailing_newline() {
        let lines = layout_lines(&plain("one\n"), 500.0);
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn test_layout_overlong_word() {
        let lines = layout_lines(&plain("abcdefghijklmnop x"), 30.0);
        let texts: Vec<String> = lines.iter().map(Line::text).collect();
        assert_eq!(texts, vec!["abcdefghijklmnop", "x"]);
    }

    #[test]
    fn test_layout_mixed_styles_stay_glued() {
        let spans = vec![
            ("1".to_string(), style(StandardFont::HelveticaBold)),
            (". Clause text".to_string(), style(StandardFont::Helvetica)),
        ];
        let lines = layout_lines(&spans, 500.0);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text(), "1. Clause text");
        assert_eq!(lines[0].pieces.len(), 2);
        assert_eq!(lines[0].pieces[0].style.font, StandardFont::HelveticaBold);
    }

    #[test]
    fn test_layout_empty() {
        assert!(layout_lines(&[], 100.0).is_empty());
    }

    #[test]
    fn test_line_height_uses_tallest_style() {
        let spans = vec![
            ("Big".to_string(), SpanStyle { size: 25.0, ..style(StandardFont::Helvetica) }),
            (" small".to_string(), style(StandardFont::Helvetica)),
        ];
        let lines = layout_lines(&spans, 500.0);
        assert!((lines[0].height - StandardFont::Helvetica.line_height(25.0, true)).abs() < 1e-9);
    }

    #[test]
    fn test_pdf_literal_escapes() {
        assert_eq!(pdf_literal("a(b)c\\"), "(a\\(b\\)c\\\\)");
        assert_eq!(pdf_literal("FCA’s"), "(FCA\\222s)");
    }

    #[test]
    fn test_fmt_num() {
        assert_eq!(fmt_num(12.0), "12");
        assert_eq!(fmt_num(12.5), "12.5");
        assert_eq!(fmt_num(0.1234), "0.123");
        assert_eq!(fmt_num(-3.0), "-3");
    }

    #[test]
    fn test_generate_text_operators() {
        let ctx = TextRenderContext {
            font_name: "F1".to_string(),
            font_size: 12.0,
            text_width: 0.0,
            color: Color::red(),
        };
        let ops = String::from_utf8(generate_text_operators("Hi", 40.0, 700.5, &ctx)).unwrap();
        assert_eq!(ops, "BT\n1 0 0 rg\n/F1 12 Tf\n40 700.5 Td\n(Hi) Tj\nET\n");
    }
}
