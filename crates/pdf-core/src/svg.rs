//! Vector graphic embedding
//!
//! A small SVG subset is compiled to PDF path operators so logos stay
//! resolution independent:
//!
//! - `<svg>` root with `viewBox` (or `width`/`height`)
//! - `<g>` grouping with inherited presentation attributes
//! - `<path d="...">` with M, L, H, V, C, S, Q, T, Z (absolute and relative)
//! - `<rect>`, `<circle>`, `<ellipse>`, `<line>`, `<polyline>`, `<polygon>`
//! - `fill`, `stroke`, `stroke-width`, `fill-rule` as attributes or `style=""`
//! - `transform` with translate, scale, rotate, matrix
//!
//! Anything else (text, gradients, arcs, clipping) is skipped.

use crate::document::{Color, PdfDocument};
use crate::text::fmt_num;
use crate::{PdfError, Result};

/// Requested display size of an embedded graphic
///
/// When only one dimension is given the other follows the aspect ratio of
/// the graphic's view box.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VectorOptions {
    pub width: Option<f64>,
    pub height: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Matrix {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
    e: f64,
    f: f64,
}

impl Matrix {
    fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    fn translate(tx: f64, ty: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    fn scale(sx: f64, sy: f64) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    fn rotate(deg: f64) -> Self {
        let (s, c) = deg.to_radians().sin_cos();
        Self::new(c, s, -s, c, 0.0, 0.0)
    }

    /// `self * other`: apply `other` first, then `self`
    fn mul(self, other: Self) -> Self {
        Self {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            e: self.a * other.e + self.c * other.f + self.e,
            f: self.b * other.e + self.d * other.f + self.f,
        }
    }

    fn apply(self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    fn scale_factor(self) -> f64 {
        (self.a * self.d - self.b * self.c).abs().sqrt()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum PathSeg {
    MoveTo(f64, f64),
    LineTo(f64, f64),
    CurveTo(f64, f64, f64, f64, f64, f64),
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Style {
    fill: Option<Color>,
    stroke: Option<Color>,
    stroke_width: f64,
    even_odd: bool,
}

impl Default for Style {
    fn default() -> Self {
        // SVG defaults: black fill, no stroke
        Self {
            fill: Some(Color::black()),
            stroke: None,
            stroke_width: 1.0,
            even_odd: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct CompiledPath {
    segs: Vec<PathSeg>,
    style: Style,
}

/// A parsed graphic ready to be drawn at any position
#[derive(Debug, Clone, PartialEq)]
pub struct VectorGraphic {
    paths: Vec<CompiledPath>,
    /// Display width in points
    pub width: f64,
    /// Display height in points
    pub height: f64,
}

impl VectorGraphic {
    /// Parse markup and fit it to the requested size
    pub fn parse(markup: &str, options: VectorOptions) -> Result<Self> {
        let doc = roxmltree::Document::parse(markup)
            .map_err(|e| PdfError::SvgError(e.to_string()))?;
        let root = doc.root_element();
        if !root.tag_name().name().eq_ignore_ascii_case("svg") {
            return Err(PdfError::SvgError(format!(
                "expected <svg> root, found <{}>",
                root.tag_name().name()
            )));
        }

        let view_box = parse_view_box(root.attribute("viewBox")).or_else(|| {
            let w = parse_number(root.attribute("width")?)?;
            let h = parse_number(root.attribute("height")?)?;
            Some((0.0, 0.0, w, h))
        });
        let (vx, vy, vw, vh) = view_box
            .filter(|&(_, _, w, h)| w > 0.0 && h > 0.0)
            .ok_or_else(|| PdfError::SvgError("missing viewBox or size".to_string()))?;

        let (width, height) = match (options.width, options.height) {
            (Some(w), Some(h)) => (w, h),
            (Some(w), None) => (w, w * vh / vw),
            (None, Some(h)) => (h * vw / vh, h),
            (None, None) => (vw, vh),
        };

        let viewport =
            Matrix::scale(width / vw, height / vh).mul(Matrix::translate(-vx, -vy));

        let mut paths = Vec::new();
        compile_element(&mut paths, root, viewport, Style::default());

        Ok(Self {
            paths,
            width,
            height,
        })
    }

    /// Number of drawable paths
    pub fn path_count(&self) -> usize {
        self.paths.len()
    }

    /// PDF operators drawing the graphic with its top-left corner at `(x, y)`
    /// on a page of `page_height`
    pub fn to_operators(&self, x: f64, y: f64, page_height: f64) -> Vec<u8> {
        let mut ops = String::new();

        ops.push_str("q\n");
        // Flip into top-left space anchored at the requested corner
        ops.push_str(&format!(
            "1 0 0 -1 {} {} cm\n",
            fmt_num(x),
            fmt_num(page_height - y)
        ));

        for path in &self.paths {
            let paint = match (path.style.fill, path.style.stroke) {
                (Some(_), Some(_)) if path.style.even_odd => "B*",
                (Some(_), Some(_)) => "B",
                (Some(_), None) if path.style.even_odd => "f*",
                (Some(_), None) => "f",
                (None, Some(_)) => "S",
                (None, None) => continue,
            };

            if let Some(fill) = path.style.fill {
                ops.push_str(&format!(
                    "{} {} {} rg\n",
                    fmt_num(fill.r as f64),
                    fmt_num(fill.g as f64),
                    fmt_num(fill.b as f64)
                ));
            }
            if let Some(stroke) = path.style.stroke {
                ops.push_str(&format!(
                    "{} {} {} RG\n{} w\n",
                    fmt_num(stroke.r as f64),
                    fmt_num(stroke.g as f64),
                    fmt_num(stroke.b as f64),
                    fmt_num(path.style.stroke_width)
                ));
            }

            for seg in &path.segs {
                match *seg {
                    PathSeg::MoveTo(x, y) => {
                        ops.push_str(&format!("{} {} m\n", fmt_num(x), fmt_num(y)))
                    }
                    PathSeg::LineTo(x, y) => {
                        ops.push_str(&format!("{} {} l\n", fmt_num(x), fmt_num(y)))
                    }
                    PathSeg::CurveTo(x1, y1, x2, y2, x, y) => ops.push_str(&format!(
                        "{} {} {} {} {} {} c\n",
                        fmt_num(x1),
                        fmt_num(y1),
                        fmt_num(x2),
                        fmt_num(y2),
                        fmt_num(x),
                        fmt_num(y)
                    )),
                    PathSeg::Close => ops.push_str("h\n"),
                }
            }
            ops.push_str(paint);
            ops.push('\n');
        }

        ops.push_str("Q\n");
        ops.into_bytes()
    }
}

/// Draw vector markup on the document's current page
///
/// Returns the drawn `(width, height)` in points. The text cursor is left
/// untouched.
pub fn embed_vector_graphic(
    doc: &mut PdfDocument,
    markup: &str,
    x: f64,
    y: f64,
    options: VectorOptions,
) -> Result<(f64, f64)> {
    let graphic = VectorGraphic::parse(markup, options)?;
    let page_height = doc.page_size().height;
    doc.append_content(&graphic.to_operators(x, y, page_height))?;
    Ok((graphic.width, graphic.height))
}

fn compile_element(
    out: &mut Vec<CompiledPath>,
    node: roxmltree::Node<'_, '_>,
    parent_ctm: Matrix,
    parent_style: Style,
) {
    if node.attribute("display") == Some("none") {
        return;
    }

    let ctm = match node.attribute("transform") {
        Some(t) => parent_ctm.mul(parse_transform(t)),
        None => parent_ctm,
    };
    let style = apply_style(node, parent_style);

    let segs = match node.tag_name().name() {
        "svg" | "g" => {
            for child in node.children().filter(|n| n.is_element()) {
                compile_element(out, child, ctm, style);
            }
            return;
        }
        "path" => node.attribute("d").map(parse_path_data),
        "rect" => rect_to_path(node),
        "circle" => circle_to_path(node),
        "ellipse" => ellipse_to_path(node),
        "line" => line_to_path(node),
        "polyline" => poly_points_to_path(node, false),
        "polygon" => poly_points_to_path(node, true),
        _ => None,
    };

    let Some(segs) = segs.filter(|s| !s.is_empty()) else {
        return;
    };

    let segs = segs
        .into_iter()
        .map(|seg| match seg {
            PathSeg::MoveTo(x, y) => {
                let (x, y) = ctm.apply(x, y);
                PathSeg::MoveTo(x, y)
            }
            PathSeg::LineTo(x, y) => {
                let (x, y) = ctm.apply(x, y);
                PathSeg::LineTo(x, y)
            }
            PathSeg::CurveTo(x1, y1, x2, y2, x, y) => {
                let (x1, y1) = ctm.apply(x1, y1);
                let (x2, y2) = ctm.apply(x2, y2);
                let (x, y) = ctm.apply(x, y);
                PathSeg::CurveTo(x1, y1, x2, y2, x, y)
            }
            PathSeg::Close => PathSeg::Close,
        })
        .collect();

    out.push(CompiledPath {
        segs,
        style: Style {
            stroke_width: style.stroke_width * ctm.scale_factor(),
            ..style
        },
    });
}

fn apply_style(node: roxmltree::Node<'_, '_>, parent: Style) -> Style {
    let mut style = parent;

    let mut declarations: Vec<(String, String)> = Vec::new();
    for name in ["fill", "stroke", "stroke-width", "fill-rule"] {
        if let Some(value) = node.attribute(name) {
            declarations.push((name.to_string(), value.to_string()));
        }
    }
    // style="" wins over presentation attributes
    if let Some(inline) = node.attribute("style") {
        for decl in inline.split(';') {
            if let Some((name, value)) = decl.split_once(':') {
                declarations.push((name.trim().to_string(), value.trim().to_string()));
            }
        }
    }

    for (name, value) in declarations {
        match name.as_str() {
            "fill" => style.fill = parse_paint(&value, style.fill),
            "stroke" => style.stroke = parse_paint(&value, style.stroke),
            "stroke-width" => {
                if let Some(w) = parse_number(&value) {
                    style.stroke_width = w;
                }
            }
            "fill-rule" => style.even_odd = value == "evenodd",
            _ => {}
        }
    }

    style
}

fn parse_paint(value: &str, inherited: Option<Color>) -> Option<Color> {
    match value.trim() {
        "none" | "transparent" => None,
        "inherit" | "currentColor" => inherited,
        other => Color::parse(other).or(inherited),
    }
}

fn parse_view_box(value: Option<&str>) -> Option<(f64, f64, f64, f64)> {
    let nums = parse_number_list(value?);
    match nums.as_slice() {
        [x, y, w, h] => Some((*x, *y, *w, *h)),
        _ => None,
    }
}

fn parse_number(input: &str) -> Option<f64> {
    // User units only; common unit suffixes are ignored
    input
        .trim()
        .trim_end_matches("px")
        .trim_end_matches("pt")
        .trim()
        .parse::<f64>()
        .ok()
}

fn parse_number_list(input: &str) -> Vec<f64> {
    input
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse::<f64>().ok())
        .collect()
}

fn parse_transform(input: &str) -> Matrix {
    let mut out = Matrix::identity();
    let mut rest = input.trim();

    while let Some(open) = rest.find('(') {
        let name = rest[..open].trim().trim_start_matches(',').trim();
        let Some(close) = rest[open + 1..].find(')') else {
            break;
        };
        let args = parse_number_list(&rest[open + 1..open + 1 + close]);
        let arg = |i: usize, default: f64| args.get(i).copied().unwrap_or(default);

        let m = match name {
            "translate" => Matrix::translate(arg(0, 0.0), arg(1, 0.0)),
            "scale" => Matrix::scale(arg(0, 1.0), arg(1, arg(0, 1.0))),
            "rotate" if args.len() >= 3 => Matrix::translate(args[1], args[2])
                .mul(Matrix::rotate(args[0]))
                .mul(Matrix::translate(-args[1], -args[2])),
            "rotate" => Matrix::rotate(arg(0, 0.0)),
            "matrix" if args.len() >= 6 => {
                Matrix::new(args[0], args[1], args[2], args[3], args[4], args[5])
            }
            _ => Matrix::identity(),
        };

        out = out.mul(m);
        rest = rest[open + 1 + close + 1..].trim_start();
    }

    out
}

fn attr(node: roxmltree::Node<'_, '_>, name: &str) -> f64 {
    node.attribute(name).and_then(parse_number).unwrap_or(0.0)
}

fn rect_to_path(node: roxmltree::Node<'_, '_>) -> Option<Vec<PathSeg>> {
    let (x, y) = (attr(node, "x"), attr(node, "y"));
    let (w, h) = (attr(node, "width"), attr(node, "height"));
    if w <= 0.0 || h <= 0.0 {
        return None;
    }
    Some(vec![
        PathSeg::MoveTo(x, y),
        PathSeg::LineTo(x + w, y),
        PathSeg::LineTo(x + w, y + h),
        PathSeg::LineTo(x, y + h),
        PathSeg::Close,
    ])
}

fn circle_to_path(node: roxmltree::Node<'_, '_>) -> Option<Vec<PathSeg>> {
    let r = attr(node, "r");
    ellipse_segments(attr(node, "cx"), attr(node, "cy"), r, r)
}

fn ellipse_to_path(node: roxmltree::Node<'_, '_>) -> Option<Vec<PathSeg>> {
    ellipse_segments(
        attr(node, "cx"),
        attr(node, "cy"),
        attr(node, "rx"),
        attr(node, "ry"),
    )
}

fn ellipse_segments(cx: f64, cy: f64, rx: f64, ry: f64) -> Option<Vec<PathSeg>> {
    if rx <= 0.0 || ry <= 0.0 {
        return None;
    }
    // Four cubic Beziers
    let k = 0.552_284_749_8;
    let (ox, oy) = (rx * k, ry * k);
    Some(vec![
        PathSeg::MoveTo(cx + rx, cy),
        PathSeg::CurveTo(cx + rx, cy + oy, cx + ox, cy + ry, cx, cy + ry),
        PathSeg::CurveTo(cx - ox, cy + ry, cx - rx, cy + oy, cx - rx, cy),
        PathSeg::CurveTo(cx - rx, cy - oy, cx - ox, cy - ry, cx, cy - ry),
        PathSeg::CurveTo(cx + ox, cy - ry, cx + rx, cy - oy, cx + rx, cy),
        PathSeg::Close,
    ])
}

fn line_to_path(node: roxmltree::Node<'_, '_>) -> Option<Vec<PathSeg>> {
    Some(vec![
        PathSeg::MoveTo(attr(node, "x1"), attr(node, "y1")),
        PathSeg::LineTo(attr(node, "x2"), attr(node, "y2")),
    ])
}

fn poly_points_to_path(node: roxmltree::Node<'_, '_>, close: bool) -> Option<Vec<PathSeg>> {
    let nums = parse_number_list(node.attribute("points")?);
    let points: Vec<(f64, f64)> = nums.chunks_exact(2).map(|p| (p[0], p[1])).collect();
    let (first, rest) = points.split_first()?;
    if rest.is_empty() {
        return None;
    }

    let mut segs = vec![PathSeg::MoveTo(first.0, first.1)];
    segs.extend(rest.iter().map(|&(x, y)| PathSeg::LineTo(x, y)));
    if close {
        segs.push(PathSeg::Close);
    }
    Some(segs)
}

/// Tokenizer over SVG path data
struct PathParser<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> PathParser<'a> {
    fn new(data: &'a str) -> Self {
        Self {
            bytes: data.as_bytes(),
            pos: 0,
        }
    }

    fn skip_separators(&mut self) {
        while self.pos < self.bytes.len()
            && (self.bytes[self.pos].is_ascii_whitespace() || self.bytes[self.pos] == b',')
        {
            self.pos += 1;
        }
    }

    /// Next command letter, if the next token is one
    fn next_command(&mut self) -> Option<u8> {
        self.skip_separators();
        let b = *self.bytes.get(self.pos)?;
        if b.is_ascii_alphabetic() && b != b'e' && b != b'E' {
            self.pos += 1;
            Some(b)
        } else {
            None
        }
    }

    fn at_end(&mut self) -> bool {
        self.skip_separators();
        self.pos >= self.bytes.len()
    }

    fn next_number(&mut self) -> Option<f64> {
        self.skip_separators();
        let start = self.pos;
        let mut seen_dot = false;
        let mut seen_digit = false;

        if matches!(self.bytes.get(self.pos), Some(b'+') | Some(b'-')) {
            self.pos += 1;
        }
        while let Some(&b) = self.bytes.get(self.pos) {
            match b {
                b'0'..=b'9' => seen_digit = true,
                b'.' if !seen_dot => seen_dot = true,
                b'e' | b'E' if seen_digit => {
                    self.pos += 1;
                    if matches!(self.bytes.get(self.pos), Some(b'+') | Some(b'-')) {
                        self.pos += 1;
                    }
                    continue;
                }
                _ => break,
            }
            self.pos += 1;
        }

        if !seen_digit {
            self.pos = start;
            return None;
        }

        std::str::from_utf8(&self.bytes[start..self.pos])
            .ok()?
            .parse()
            .ok()
    }

    fn next_pair(&mut self) -> Option<(f64, f64)> {
        let start = self.pos;
        match (self.next_number(), self.next_number()) {
            (Some(x), Some(y)) => Some((x, y)),
            _ => {
                self.pos = start;
                None
            }
        }
    }
}

fn quad_to_cubic(x0: f64, y0: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> (f64, f64, f64, f64) {
    (
        x0 + 2.0 / 3.0 * (x1 - x0),
        y0 + 2.0 / 3.0 * (y1 - y0),
        x2 + 2.0 / 3.0 * (x1 - x2),
        y2 + 2.0 / 3.0 * (y1 - y2),
    )
}

fn parse_path_data(d: &str) -> Vec<PathSeg> {
    let mut segs = Vec::new();
    let mut p = PathParser::new(d);
    let (mut cur_x, mut cur_y) = (0.0, 0.0);
    let (mut start_x, mut start_y) = (0.0, 0.0);
    let mut last_cubic: Option<(f64, f64)> = None;
    let mut last_quad: Option<(f64, f64)> = None;
    let mut cmd = 0u8;

    while !p.at_end() {
        if let Some(c) = p.next_command() {
            cmd = c;
        } else if cmd == 0 {
            break;
        }

        let rel = cmd.is_ascii_lowercase();
        let (ox, oy) = if rel { (cur_x, cur_y) } else { (0.0, 0.0) };
        let before = p.pos;

        match cmd.to_ascii_uppercase() {
            b'M' => {
                if let Some((x, y)) = p.next_pair() {
                    let (x, y) = (ox + x, oy + y);
                    segs.push(PathSeg::MoveTo(x, y));
                    (cur_x, cur_y) = (x, y);
                    (start_x, start_y) = (x, y);
                    // Subsequent pairs are implicit line-tos
                    cmd = if rel { b'l' } else { b'L' };
                }
                last_cubic = None;
                last_quad = None;
            }
            b'L' => {
                if let Some((x, y)) = p.next_pair() {
                    (cur_x, cur_y) = (ox + x, oy + y);
                    segs.push(PathSeg::LineTo(cur_x, cur_y));
                }
                last_cubic = None;
                last_quad = None;
            }
            b'H' => {
                if let Some(x) = p.next_number() {
                    cur_x = ox + x;
                    segs.push(PathSeg::LineTo(cur_x, cur_y));
                }
                last_cubic = None;
                last_quad = None;
            }
            b'V' => {
                if let Some(y) = p.next_number() {
                    cur_y = oy + y;
                    segs.push(PathSeg::LineTo(cur_x, cur_y));
                }
                last_cubic = None;
                last_quad = None;
            }
            b'C' => {
                if let (Some((x1, y1)), Some((x2, y2)), Some((x, y))) =
                    (p.next_pair(), p.next_pair(), p.next_pair())
                {
                    let (x1, y1, x2, y2) = (ox + x1, oy + y1, ox + x2, oy + y2);
                    (cur_x, cur_y) = (ox + x, oy + y);
                    segs.push(PathSeg::CurveTo(x1, y1, x2, y2, cur_x, cur_y));
                    last_cubic = Some((x2, y2));
                    last_quad = None;
                }
            }
            b'S' => {
                if let (Some((x2, y2)), Some((x, y))) = (p.next_pair(), p.next_pair()) {
                    let (x1, y1) = match last_cubic {
                        Some((px, py)) => (2.0 * cur_x - px, 2.0 * cur_y - py),
                        None => (cur_x, cur_y),
                    };
                    let (x2, y2) = (ox + x2, oy + y2);
                    (cur_x, cur_y) = (ox + x, oy + y);
                    segs.push(PathSeg::CurveTo(x1, y1, x2, y2, cur_x, cur_y));
                    last_cubic = Some((x2, y2));
                    last_quad = None;
                }
            }
            b'Q' => {
                if let (Some((qx, qy)), Some((x, y))) = (p.next_pair(), p.next_pair()) {
                    let (qx, qy) = (ox + qx, oy + qy);
                    let (x, y) = (ox + x, oy + y);
                    let (c1x, c1y, c2x, c2y) = quad_to_cubic(cur_x, cur_y, qx, qy, x, y);
                    segs.push(PathSeg::CurveTo(c1x, c1y, c2x, c2y, x, y));
                    (cur_x, cur_y) = (x, y);
                    last_quad = Some((qx, qy));
                    last_cubic = Some((c2x, c2y));
                }
            }
            b'T' => {
                if let Some((x, y)) = p.next_pair() {
                    let (qx, qy) = match last_quad {
                        Some((px, py)) => (2.0 * cur_x - px, 2.0 * cur_y - py),
                        None => (cur_x, cur_y),
                    };
                    let (x, y) = (ox + x, oy + y);
                    let (c1x, c1y, c2x, c2y) = quad_to_cubic(cur_x, cur_y, qx, qy, x, y);
                    segs.push(PathSeg::CurveTo(c1x, c1y, c2x, c2y, x, y));
                    (cur_x, cur_y) = (x, y);
                    last_quad = Some((qx, qy));
                    last_cubic = Some((c2x, c2y));
                }
            }
            b'Z' => {
                segs.push(PathSeg::Close);
                (cur_x, cur_y) = (start_x, start_y);
                last_cubic = None;
                last_quad = None;
                cmd = 0;
                continue;
            }
            _ => {
                // Unsupported command (e.g. arcs): drop the rest of the path
                tracing::debug!(command = %(cmd as char), "unsupported path command");
                break;
            }
        }

        if p.pos == before {
            // Malformed arguments; stop rather than loop forever
            break;
        }
    }

    segs
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SQUARE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 10 20">
        <rect x="0" y="0" width="10" height="20" fill="#ff0000"/>
    </svg>"##;

    #[test]
    fn test_parse_keeps_aspect_ratio() {
        let graphic = VectorGraphic::parse(
            SQUARE,
            VectorOptions {
                width: Some(50.0),
                height: None,
            },
        )
        .unwrap();
        assert_eq!(graphic.width, 50.0);
        assert_eq!(graphic.height, 100.0);
        assert_eq!(graphic.path_count(), 1);
    }

    #[test]
    fn test_parse_rejects_invalid_markup() {
        assert!(VectorGraphic::parse("<svg", VectorOptions::default()).is_err());
        assert!(VectorGraphic::parse("<html/>", VectorOptions::default()).is_err());
        assert!(VectorGraphic::parse("<svg/>", VectorOptions::default()).is_err());
    }

    #[test]
    fn test_operators_flip_and_fill() {
        let graphic = VectorGraphic::parse(SQUARE, VectorOptions::default()).unwrap();
        let ops = String::from_utf8(graphic.to_operators(100.0, 50.0, 792.0)).unwrap();
        assert!(ops.starts_with("q\n1 0 0 -1 100 742 cm\n"));
        assert!(ops.contains("1 0 0 rg\n0 0 m\n10 0 l\n10 20 l\n0 20 l\nh\nf\n"));
        assert!(ops.ends_with("Q\n"));
    }

    #[test]
    fn test_group_style_inheritance() {
        let svg = r#"<svg viewBox="0 0 10 10"><g fill="none" stroke="blue">
            <circle cx="5" cy="5" r="4"/><line x1="0" y1="0" x2="10" y2="10"/>
        </g></svg>"#;
        let graphic = VectorGraphic::parse(svg, VectorOptions::default()).unwrap();
        let ops = String::from_utf8(graphic.to_operators(0.0, 0.0, 100.0)).unwrap();
        assert_eq!(ops.matches("\nS\n").count(), 2);
        assert!(!ops.contains(" rg\n"));
    }

    #[test]
    fn test_path_data_relative_and_implicit() {
        let segs = parse_path_data("m10 10 5 0 0 5z");
        assert_eq!(
            segs,
            vec![
                PathSeg::MoveTo(10.0, 10.0),
                PathSeg::LineTo(15.0, 10.0),
                PathSeg::LineTo(15.0, 15.0),
                PathSeg::Close,
            ]
        );
    }

    #[test]
    fn test_path_data_compact_numbers() {
        let segs = parse_path_data("M0-1.5L.5-1.5H3V4");
        assert_eq!(
            segs,
            vec![
                PathSeg::MoveTo(0.0, -1.5),
                PathSeg::LineTo(0.5, -1.5),
                PathSeg::LineTo(3.0, -1.5),
                PathSeg::LineTo(3.0, 4.0),
            ]
        );
    }

    #[test]
    fn test_path_data_incomplete_pair_ends_path() {
        // Implicit line-to after M with a single coordinate
        assert_eq!(
            parse_path_data("M0-1.5.5H3V4"),
            vec![PathSeg::MoveTo(0.0, -1.5)]
        );
        assert_eq!(
            parse_path_data("M0 0 L5 H3"),
            vec![PathSeg::MoveTo(0.0, 0.0)]
        );
    }

    #[test]
    fn test_path_data_stops_at_arcs() {
        let segs = parse_path_data("M0 0 L1 1 A5 5 0 0 1 10 10");
        assert_eq!(segs.len(), 2);
    }

    #[test]
    fn test_transform_translate_scale() {
        let m = parse_transform("translate(10, 20) scale(2)");
        assert_eq!(m.apply(1.0, 1.0), (12.0, 22.0));
    }

    #[test]
    fn test_style_attribute_overrides() {
        let svg = r##"<svg viewBox="0 0 10 10"><rect width="10" height="10" fill="red" style="fill:#00ff00"/></svg>"##;
        let graphic = VectorGraphic::parse(svg, VectorOptions::default()).unwrap();
        let ops = String::from_utf8(graphic.to_operators(0.0, 0.0, 10.0)).unwrap();
        assert!(ops.contains("0 1 0 rg"));
    }
}
