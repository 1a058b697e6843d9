//! Page geometry
//!
//! All coordinates handed to the document API use a top-left origin with y
//! growing downwards, in points. Conversion to PDF user space happens when
//! operators are generated.

/// Page dimensions in points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
}

impl PageSize {
    pub const LETTER: PageSize = PageSize {
        width: 612.0,
        height: 792.0,
    };

    pub const A4: PageSize = PageSize {
        width: 595.28,
        height: 841.89,
    };

    /// Look up a named paper size ("letter", "a4"), case-insensitive
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "letter" => Some(Self::LETTER),
            "a4" => Some(Self::A4),
            _ => None,
        }
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self::LETTER
    }
}

/// Page margins in points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

impl Margins {
    pub fn uniform(value: f64) -> Self {
        Self {
            top: value,
            bottom: value,
            left: value,
            right: value,
        }
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self::uniform(40.0)
    }
}

/// Options used when constructing a document
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSetup {
    pub size: PageSize,
    pub margins: Margins,
    /// Create the first page on construction
    pub auto_first_page: bool,
}

impl Default for PageSetup {
    fn default() -> Self {
        Self {
            size: PageSize::default(),
            margins: Margins::default(),
            auto_first_page: false,
        }
    }
}

/// Text position in top-left user space
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Cursor {
    pub x: f64,
    pub y: f64,
}

/// Rectangle in top-left user space
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// `[llx, lly, urx, ury]` in PDF user space for a page of `page_height`
    pub fn to_pdf_box(&self, page_height: f64) -> [f64; 4] {
        [
            self.x,
            page_height - self.y - self.height,
            self.x + self.width,
            page_height - self.y,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_page_size_from_name() {
        assert_eq!(PageSize::from_name("A4"), Some(PageSize::A4));
        assert_eq!(PageSize::from_name("letter"), Some(PageSize::LETTER));
        assert_eq!(PageSize::from_name("tabloid"), None);
    }

    #[test]
    fn test_default_setup() {
        let setup = PageSetup::default();
        assert_eq!(setup.margins, Margins::uniform(40.0));
        assert!(!setup.auto_first_page);
    }

    #[test]
    fn test_rect_to_pdf_box() {
        let rect = Rect::new(40.0, 100.0, 200.0, 16.0);
        assert_eq!(rect.to_pdf_box(792.0), [40.0, 676.0, 240.0, 692.0]);
    }
}
