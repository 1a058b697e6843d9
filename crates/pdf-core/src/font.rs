//! Standard (base-14) font handling
//!
//! Documents built by this crate only use the PDF standard fonts, which every
//! viewer ships with. No font program is embedded; the metrics needed for
//! line breaking are compiled in from the Adobe AFM files.

use crate::{PdfError, Result};
use lopdf::{dictionary, Dictionary};

/// Font weight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontWeight {
    #[default]
    Regular,
    Bold,
}

/// Font style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

/// One of the standard fonts with built-in metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
    HelveticaBoldOblique,
    Courier,
    CourierBold,
    CourierOblique,
    CourierBoldOblique,
}

/// Vertical metrics in 1/1000 em
struct VerticalMetrics {
    ascender: i32,
    descender: i32,
    line_gap: i32,
}

// Helvetica: Ascender 718, Descender -207, FontBBox -166 -225 1000 931
const HELVETICA_METRICS: VerticalMetrics = VerticalMetrics {
    ascender: 718,
    descender: -207,
    line_gap: 231,
};

// Helvetica-Bold: FontBBox -170 -228 1003 962
const HELVETICA_BOLD_METRICS: VerticalMetrics = VerticalMetrics {
    ascender: 718,
    descender: -207,
    line_gap: 265,
};

// Courier: Ascender 629, Descender -157, FontBBox -23 -250 715 805
const COURIER_METRICS: VerticalMetrics = VerticalMetrics {
    ascender: 629,
    descender: -157,
    line_gap: 269,
};

/// Glyph widths for WinAnsi codes 32..=126
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

impl StandardFont {
    /// Resolve a family name plus variant to a standard font
    ///
    /// Family names are matched case-insensitively; "Arial" is accepted as an
    /// alias for Helvetica.
    pub fn from_family(family: &str, weight: FontWeight, style: FontStyle) -> Result<Self> {
        let base = match family.to_ascii_lowercase().as_str() {
            "helvetica" | "arial" | "sans-serif" => StandardFont::Helvetica,
            "courier" | "monospace" => StandardFont::Courier,
            _ => return Err(PdfError::FontNotFound(family.to_string())),
        };

        Ok(base.variant(weight, style))
    }

    /// Resolve a PostScript-style name such as `Helvetica-Bold`
    pub fn from_name(name: &str) -> Result<Self> {
        let (family, suffix) = match name.split_once('-') {
            Some((family, suffix)) => (family, suffix.to_ascii_lowercase()),
            None => (name, String::new()),
        };

        let (weight, style) = match suffix.as_str() {
            "" => (FontWeight::Regular, FontStyle::Normal),
            "bold" => (FontWeight::Bold, FontStyle::Normal),
            "oblique" | "italic" => (FontWeight::Regular, FontStyle::Italic),
            "boldoblique" | "bolditalic" => (FontWeight::Bold, FontStyle::Italic),
            _ => return Err(PdfError::FontNotFound(name.to_string())),
        };

        Self::from_family(family, weight, style)
    }

    /// Same family, different weight/style
    pub fn variant(self, weight: FontWeight, style: FontStyle) -> Self {
        use StandardFont::*;

        let courier = matches!(
            self,
            Courier | CourierBold | CourierOblique | CourierBoldOblique
        );

        match (courier, weight, style) {
            (false, FontWeight::Regular, FontStyle::Normal) => Helvetica,
            (false, FontWeight::Bold, FontStyle::Normal) => HelveticaBold,
            (false, FontWeight::Regular, FontStyle::Italic) => HelveticaOblique,
            (false, FontWeight::Bold, FontStyle::Italic) => HelveticaBoldOblique,
            (true, FontWeight::Regular, FontStyle::Normal) => Courier,
            (true, FontWeight::Bold, FontStyle::Normal) => CourierBold,
            (true, FontWeight::Regular, FontStyle::Italic) => CourierOblique,
            (true, FontWeight::Bold, FontStyle::Italic) => CourierBoldOblique,
        }
    }

    /// PostScript base font name
    pub fn base_name(self) -> &'static str {
        match self {
            StandardFont::Helvetica => "Helvetica",
            StandardFont::HelveticaBold => "Helvetica-Bold",
            StandardFont::HelveticaOblique => "Helvetica-Oblique",
            StandardFont::HelveticaBoldOblique => "Helvetica-BoldOblique",
            StandardFont::Courier => "Courier",
            StandardFont::CourierBold => "Courier-Bold",
            StandardFont::CourierOblique => "Courier-Oblique",
            StandardFont::CourierBoldOblique => "Courier-BoldOblique",
        }
    }

    /// Page resource name (e.g. "F2"), stable per font
    pub fn resource_name(self) -> String {
        format!("F{}", self as u8 + 1)
    }

    pub fn is_bold(self) -> bool {
        matches!(
            self,
            StandardFont::HelveticaBold
                | StandardFont::HelveticaBoldOblique
                | StandardFont::CourierBold
                | StandardFont::CourierBoldOblique
        )
    }

    pub fn is_oblique(self) -> bool {
        matches!(
            self,
            StandardFont::HelveticaOblique
                | StandardFont::HelveticaBoldOblique
                | StandardFont::CourierOblique
                | StandardFont::CourierBoldOblique
        )
    }

    /// Current weight of this font
    pub fn weight(self) -> FontWeight {
        if self.is_bold() {
            FontWeight::Bold
        } else {
            FontWeight::Regular
        }
    }

    /// Current style of this font
    pub fn style(self) -> FontStyle {
        if self.is_oblique() {
            FontStyle::Italic
        } else {
            FontStyle::Normal
        }
    }

    fn metrics(self) -> &'static VerticalMetrics {
        match self {
            StandardFont::Helvetica | StandardFont::HelveticaOblique => &HELVETICA_METRICS,
            StandardFont::HelveticaBold | StandardFont::HelveticaBoldOblique => {
                &HELVETICA_BOLD_METRICS
            }
            _ => &COURIER_METRICS,
        }
    }

    /// Ascender in points for the given size
    pub fn ascender(self, size: f64) -> f64 {
        self.metrics().ascender as f64 / 1000.0 * size
    }

    /// Line height in points; `include_gap` adds the font's own line gap
    pub fn line_height(self, size: f64, include_gap: bool) -> f64 {
        let m = self.metrics();
        let gap = if include_gap { m.line_gap } else { 0 };
        (m.ascender - m.descender + gap) as f64 / 1000.0 * size
    }

    /// Advance width of a WinAnsi code in 1/1000 em
    fn code_width(self, code: u8) -> u16 {
        use StandardFont::*;

        if matches!(
            self,
            Courier | CourierBold | CourierOblique | CourierBoldOblique
        ) {
            return 600;
        }

        let bold = self.is_bold();
        match code {
            32..=126 => {
                let index = (code - 32) as usize;
                if bold {
                    HELVETICA_BOLD_WIDTHS[index]
                } else {
                    HELVETICA_WIDTHS[index]
                }
            }
            // quoteleft, quoteright
            0x91 | 0x92 => {
                if bold {
                    278
                } else {
                    222
                }
            }
            // quotedblleft, quotedblright
            0x93 | 0x94 => {
                if bold {
                    500
                } else {
                    333
                }
            }
            0x95 => 350,
            0x96 => 556,
            0x97 | 0x85 => 1000,
            0xA0 => 278,
            _ => 556,
        }
    }

    /// Width of text in points at the given size
    pub fn text_width(self, text: &str, size: f64) -> f64 {
        let units: u32 = encode_win_ansi(text)
            .iter()
            .map(|&code| self.code_width(code) as u32)
            .sum();
        units as f64 / 1000.0 * size
    }

    /// Font dictionary for the page resources
    pub fn to_pdf_dictionary(self) -> Dictionary {
        dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => self.base_name(),
            "Encoding" => "WinAnsiEncoding",
        }
    }
}

/// Encode text as WinAnsi bytes
///
/// Characters outside the encoding are replaced by `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            ' '..='~' => c as u8,
            '\u{A0}'..='\u{FF}' => c as u32 as u8,
            '€' => 0x80,
            '‚' => 0x82,
            '„' => 0x84,
            '…' => 0x85,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '™' => 0x99,
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_from_family() {
        assert_eq!(
            StandardFont::from_family("Helvetica", FontWeight::Bold, FontStyle::Normal).unwrap(),
            StandardFont::HelveticaBold
        );
        assert_eq!(
            StandardFont::from_family("courier", FontWeight::Regular, FontStyle::Italic).unwrap(),
            StandardFont::CourierOblique
        );
        assert!(StandardFont::from_family("Comic Sans", FontWeight::Regular, FontStyle::Normal)
            .is_err());
    }

    #[test]
    fn test_from_name() {
        assert_eq!(
            StandardFont::from_name("Helvetica-Bold").unwrap(),
            StandardFont::HelveticaBold
        );
        assert_eq!(
            StandardFont::from_name("Helvetica").unwrap(),
            StandardFont::Helvetica
        );
        assert!(StandardFont::from_name("Helvetica-Wide").is_err());
    }

    #[test]
    fn test_resource_names_are_distinct() {
        assert_eq!(StandardFont::Helvetica.resource_name(), "F1");
        assert_eq!(StandardFont::HelveticaBold.resource_name(), "F2");
        assert_eq!(StandardFont::CourierBoldOblique.resource_name(), "F8");
    }

    #[test]
    fn test_text_width() {
        // "Hi" = H(722) + i(222) at 10pt
        let width = StandardFont::Helvetica.text_width("Hi", 10.0);
        assert!((width - 9.44).abs() < 1e-9);

        let bold = StandardFont::HelveticaBold.text_width("Hi", 10.0);
        assert!((bold - 10.0).abs() < 1e-9);

        let mono = StandardFont::Courier.text_width("abc", 10.0);
        assert!((mono - 18.0).abs() < 1e-9);
        assert_eq!(StandardFont::Helvetica.text_width("", 12.0), 0.0);
    }

    #[test]
    fn test_line_height() {
        let without_gap = StandardFont::Helvetica.line_height(10.0, false);
        assert!((without_gap - 9.25).abs() < 1e-9);

        let with_gap = StandardFont::Helvetica.line_height(10.0, true);
        assert!((with_gap - 11.56).abs() < 1e-9);
    }

    #[test]
    fn test_encode_win_ansi() {
        assert_eq!(encode_win_ansi("A’B"), vec![b'A', 0x92, b'B']);
        assert_eq!(encode_win_ansi("—"), vec![0x97]);
        assert_eq!(encode_win_ansi("ü"), vec![0xFC]);
        assert_eq!(encode_win_ansi("ก"), vec![b'?']);
    }

    #[test]
    fn test_to_pdf_dictionary() {
        let dict = StandardFont::HelveticaBold.to_pdf_dictionary();
        assert_eq!(
            dict.get(b"BaseFont").unwrap().as_name_str().unwrap(),
            "Helvetica-Bold"
        );
        assert_eq!(dict.get(b"Subtype").unwrap().as_name_str().unwrap(), "Type1");
    }
}
