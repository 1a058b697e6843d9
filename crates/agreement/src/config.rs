//! Agreement configuration
//!
//! [`AgreementConfig`] holds fully resolved values. Callers supply a partial
//! [`ConfigOverrides`] (from JSON or an HTTP query string) which is merged
//! field by field over the defaults and then validated.

use crate::{AgreementError, Result};
use pdf_core::{
    FontStyle, FontWeight, Margins, PageSetup, PageSize, StandardFont, VectorGraphic, VectorOptions,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;
use std::sync::Arc;

/// Logo shipped with the crate
pub const DEFAULT_LOGO: &str = include_str!("../assets/logo.svg");

/// A required value that may arrive as text or as a number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Number(f64),
    Text(String),
}

impl Scalar {
    /// Numeric strings become numbers, anything else stays text
    pub fn parse(input: &str) -> Self {
        match input.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => Scalar::Number(n),
            _ => Scalar::Text(input.to_string()),
        }
    }

    /// Non-empty text or any number
    pub fn is_present(&self) -> bool {
        match self {
            Scalar::Number(_) => true,
            Scalar::Text(s) => !s.trim().is_empty(),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Scalar::Number(n) => write!(f, "{n}"),
            Scalar::Text(s) => f.write_str(s.trim()),
        }
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Number(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

/// Where the speaker travels from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Origin {
    Overseas,
    #[default]
    Europe,
    Switzerland,
    Zurich,
}

impl Origin {
    pub const ALL: [Origin; 4] = [
        Origin::Overseas,
        Origin::Europe,
        Origin::Switzerland,
        Origin::Zurich,
    ];

    /// Local speakers get neither travel nor accommodation
    pub fn is_local(self) -> bool {
        matches!(self, Origin::Switzerland | Origin::Zurich)
    }

    /// Hotel nights before any workshop extension
    pub fn base_nights(self) -> u32 {
        match self {
            Origin::Overseas => 5,
            Origin::Europe => 3,
            Origin::Switzerland | Origin::Zurich => 0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Origin::Overseas => "Overseas",
            Origin::Europe => "Europe",
            Origin::Switzerland => "Switzerland",
            Origin::Zurich => "Zurich",
        }
    }
}

impl FromStr for Origin {
    type Err = AgreementError;

    fn from_str(s: &str) -> Result<Self> {
        Origin::ALL
            .into_iter()
            .find(|o| o.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AgreementError::Validation(format!("unknown origin `{s}`")))
    }
}

// Same case-insensitive matching as query parameters
impl<'de> Deserialize<'de> for Origin {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}

/// Document information
#[derive(Debug, Clone, PartialEq)]
pub struct Meta {
    pub title: String,
    pub author: String,
}

impl Default for Meta {
    fn default() -> Self {
        Self {
            title: "Presentation Consent Form".to_string(),
            author: "Front Conference Zurich".to_string(),
        }
    }
}

/// Baseline typography, restored after every styled section
#[derive(Debug, Clone, PartialEq)]
pub struct FontConfig {
    pub family: String,
    pub size: f64,
    pub line_gap: f64,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            family: "Helvetica".to_string(),
            size: 12.0,
            line_gap: 0.0,
        }
    }
}

impl FontConfig {
    pub fn regular(&self) -> pdf_core::Result<StandardFont> {
        StandardFont::from_family(&self.family, FontWeight::Regular, FontStyle::Normal)
    }

    pub fn bold(&self) -> pdf_core::Result<StandardFont> {
        StandardFont::from_family(&self.family, FontWeight::Bold, FontStyle::Normal)
    }
}

/// Paper size and margins
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageConfig {
    pub size: PageSize,
    pub margins: Margins,
    /// Top edge of the header, independent of the content margin
    pub header_top: f64,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            size: PageSize::LETTER,
            margins: Margins {
                top: 120.0,
                bottom: 80.0,
                left: 40.0,
                right: 40.0,
            },
            header_top: 30.0,
        }
    }
}

impl PageConfig {
    pub fn setup(&self) -> PageSetup {
        PageSetup {
            size: self.size,
            margins: self.margins,
            auto_first_page: false,
        }
    }
}

/// Vector logo drawn in the header
#[derive(Debug, Clone, PartialEq)]
pub struct Logo {
    pub markup: Arc<str>,
    /// Display width in points; height follows the aspect ratio
    pub width: f64,
}

impl Default for Logo {
    fn default() -> Self {
        Self {
            markup: Arc::from(DEFAULT_LOGO),
            width: 60.0,
        }
    }
}

/// Hand-tuned layout constants, in points unless noted
///
/// The header (logo, `logo_gap`, one title line at `title_size`, a blank
/// line and the date line) must end above the top margin; validation
/// rejects configurations where it does not, or where the title or date
/// would wrap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    /// Horizontal offset of inline fields from the left margin
    pub label_offset: f64,
    pub field_height: f64,
    /// How far (in lines) an inline field floats up to meet its label
    pub field_line_offset: f64,
    /// Space above the jurisdiction paragraph
    pub jurisdiction_offset: f64,
    pub jurisdiction_font_size: f64,
    pub title_size: f64,
    /// Space between logo and header title
    pub logo_gap: f64,
    /// Footer offset below the bottom margin's last line
    pub footer_offset: f64,
    /// Blank space between paragraphs, in lines
    pub section_gap: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            label_offset: 90.0,
            field_height: 16.0,
            field_line_offset: 1.0,
            jurisdiction_offset: 30.0,
            jurisdiction_font_size: 10.0,
            title_size: 25.0,
            logo_gap: 10.0,
            footer_offset: 40.0,
            section_gap: 1.0,
        }
    }
}

/// Fully resolved configuration for one agreement
#[derive(Debug, Clone, PartialEq)]
pub struct AgreementConfig {
    /// Conference date range
    pub date: String,
    pub workshop_date: String,
    /// Talk duration in minutes
    pub duration: Option<Scalar>,
    /// Compensation in CHF
    pub compensation: Option<Scalar>,
    pub workshop: bool,
    pub workshop_half_day: bool,
    /// Workshop without a presentation
    pub workshop_only: bool,
    pub origin: Origin,
    /// Prefilled signing date (`yyyy-mm-dd`); empty leaves the field blank
    pub signing_date: String,
    pub meta: Meta,
    /// Header title
    pub title: String,
    pub font: FontConfig,
    pub pdf: PageConfig,
    pub logo: Option<Logo>,
    pub layout: LayoutConfig,
}

impl Default for AgreementConfig {
    fn default() -> Self {
        Self {
            date: "27 - 28 August 2020".to_string(),
            workshop_date: "26 August 2020".to_string(),
            duration: None,
            compensation: None,
            workshop: false,
            workshop_half_day: false,
            workshop_only: false,
            origin: Origin::default(),
            signing_date: String::new(),
            meta: Meta::default(),
            title: "FRONT CONFERENCE ZURICH".to_string(),
            font: FontConfig::default(),
            pdf: PageConfig::default(),
            logo: Some(Logo::default()),
            layout: LayoutConfig::default(),
        }
    }
}

impl AgreementConfig {
    /// Apply caller overrides; caller values win, nested groups merge
    pub fn merge(mut self, overrides: ConfigOverrides) -> Self {
        set(&mut self.date, overrides.date);
        set(&mut self.workshop_date, overrides.workshop_date);
        if overrides.duration.is_some() {
            self.duration = overrides.duration;
        }
        if overrides.compensation.is_some() {
            self.compensation = overrides.compensation;
        }
        set(&mut self.workshop, overrides.workshop);
        set(&mut self.workshop_half_day, overrides.workshop_half_day);
        set(&mut self.workshop_only, overrides.workshop_only);
        set(&mut self.origin, overrides.origin);
        set(&mut self.signing_date, overrides.signing_date);
        set(&mut self.title, overrides.title);

        if let Some(meta) = overrides.meta {
            set(&mut self.meta.title, meta.title);
            set(&mut self.meta.author, meta.author);
        }

        if let Some(font) = overrides.font {
            set(&mut self.font.family, font.family);
            set(&mut self.font.size, font.size);
            set(&mut self.font.line_gap, font.line_gap);
        }

        if let Some(pdf) = overrides.pdf {
            if let Some(size) = pdf.size.as_deref().and_then(PageSize::from_name) {
                self.pdf.size = size;
            }
            if let Some(margins) = pdf.margins {
                set(&mut self.pdf.margins.top, margins.top);
                set(&mut self.pdf.margins.bottom, margins.bottom);
                set(&mut self.pdf.margins.left, margins.left);
                set(&mut self.pdf.margins.right, margins.right);
            }
            set(&mut self.pdf.header_top, pdf.header_top);
        }

        if let Some(logo) = overrides.logo {
            if logo.hidden == Some(true) {
                self.logo = None;
            } else if let (Some(current), Some(width)) = (self.logo.as_mut(), logo.width) {
                current.width = width;
            }
        }

        if let Some(layout) = overrides.layout {
            let l = &mut self.layout;
            set(&mut l.label_offset, layout.label_offset);
            set(&mut l.field_height, layout.field_height);
            set(&mut l.field_line_offset, layout.field_line_offset);
            set(&mut l.jurisdiction_offset, layout.jurisdiction_offset);
            set(&mut l.jurisdiction_font_size, layout.jurisdiction_font_size);
            set(&mut l.title_size, layout.title_size);
            set(&mut l.logo_gap, layout.logo_gap);
            set(&mut l.footer_offset, layout.footer_offset);
            set(&mut l.section_gap, layout.section_gap);
        }

        self
    }

    /// Replace the logo markup, keeping the configured width
    pub fn with_logo_markup(mut self, markup: Arc<str>) -> Self {
        let width = self.logo.as_ref().map_or(Logo::default().width, |l| l.width);
        self.logo = Some(Logo { markup, width });
        self
    }

    /// Workshop section is shown
    pub fn has_workshop(&self) -> bool {
        self.workshop || self.workshop_only
    }

    /// Presentation section is shown
    pub fn has_presentation(&self) -> bool {
        !self.workshop_only
    }

    /// Hotel nights offered, zero for local speakers
    pub fn hotel_nights(&self) -> u32 {
        if self.origin.is_local() {
            return 0;
        }
        self.origin.base_nights() + u32::from(self.has_workshop())
    }

    /// Check required fields before anything is rendered
    pub fn validate(self) -> Result<ValidConfig> {
        if self.date.trim().is_empty() {
            return Err(missing("date"));
        }

        if self.has_presentation() {
            for (name, value) in [
                ("duration", &self.duration),
                ("compensation", &self.compensation),
            ] {
                if !value.as_ref().is_some_and(Scalar::is_present) {
                    return Err(missing(name));
                }
            }
        }

        if self.has_workshop() && self.workshop_date.trim().is_empty() {
            return Err(missing("workshopDate"));
        }

        self.font
            .regular()
            .map_err(|e| AgreementError::Validation(e.to_string()))?;

        if self.font.size <= 0.0 {
            return Err(AgreementError::Validation(
                "font size must be positive".to_string(),
            ));
        }

        let margins = self.pdf.margins;
        if margins.left + margins.right + self.layout.label_offset >= self.pdf.size.width {
            return Err(AgreementError::Validation(
                "margins leave no room for form fields".to_string(),
            ));
        }

        self.check_header()?;

        Ok(ValidConfig(self))
    }

    /// Where the header ends, measured from the top of the page
    pub fn header_bottom(&self) -> pdf_core::Result<f64> {
        let regular = self.font.regular()?;
        let bold = self.font.bold()?;
        let gap = self.font.line_gap;
        let mut bottom = self.pdf.header_top;

        if let Some(logo) = &self.logo {
            let graphic = VectorGraphic::parse(
                &logo.markup,
                VectorOptions {
                    width: Some(logo.width),
                    height: None,
                },
            )?;
            bottom += graphic.height + self.layout.logo_gap;
        }

        bottom += bold.line_height(self.layout.title_size, true) + gap;
        bottom += 2.0 * (regular.line_height(self.font.size, true) + gap);
        Ok(bottom)
    }

    /// The header is drawn without pagination, so it has to fit as is
    fn check_header(&self) -> Result<()> {
        let invalid = |e: pdf_core::PdfError| AgreementError::Validation(e.to_string());
        let regular = self.font.regular().map_err(invalid)?;
        let bold = self.font.bold().map_err(invalid)?;
        let margins = self.pdf.margins;
        let content_width = self.pdf.size.width - margins.left - margins.right;

        if bold.text_width(&self.title, self.layout.title_size) > content_width {
            return Err(AgreementError::Validation(format!(
                "header title `{}` does not fit on one line",
                self.title
            )));
        }
        if regular.text_width(self.date.trim(), self.font.size) > content_width {
            return Err(AgreementError::Validation(format!(
                "date `{}` does not fit on one header line",
                self.date.trim()
            )));
        }

        let bottom = self.header_bottom().map_err(invalid)?;
        if bottom > margins.top {
            return Err(AgreementError::Validation(format!(
                "header ends at {bottom:.1}pt, below the top margin of {}pt",
                margins.top
            )));
        }
        Ok(())
    }
}

fn set<T>(target: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *target = value;
    }
}

fn missing(name: &str) -> AgreementError {
    AgreementError::Validation(format!("missing required field `{name}`"))
}

/// A configuration that passed [`AgreementConfig::validate`]
#[derive(Debug, Clone, PartialEq)]
pub struct ValidConfig(AgreementConfig);

impl ValidConfig {
    pub fn into_inner(self) -> AgreementConfig {
        self.0
    }
}

impl Deref for ValidConfig {
    type Target = AgreementConfig;

    fn deref(&self) -> &AgreementConfig {
        &self.0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaOverrides {
    pub title: Option<String>,
    pub author: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontOverrides {
    pub family: Option<String>,
    pub size: Option<f64>,
    pub line_gap: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarginOverrides {
    pub top: Option<f64>,
    pub bottom: Option<f64>,
    pub left: Option<f64>,
    pub right: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageOverrides {
    /// Paper name, e.g. "letter" or "a4"
    pub size: Option<String>,
    pub margins: Option<MarginOverrides>,
    pub header_top: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoOverrides {
    pub width: Option<f64>,
    /// Render without a logo
    pub hidden: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutOverrides {
    pub label_offset: Option<f64>,
    pub field_height: Option<f64>,
    pub field_line_offset: Option<f64>,
    pub jurisdiction_offset: Option<f64>,
    pub jurisdiction_font_size: Option<f64>,
    pub title_size: Option<f64>,
    pub logo_gap: Option<f64>,
    pub footer_offset: Option<f64>,
    pub section_gap: Option<f64>,
}

/// Partial configuration supplied by a caller
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigOverrides {
    pub date: Option<String>,
    pub workshop_date: Option<String>,
    pub duration: Option<Scalar>,
    pub compensation: Option<Scalar>,
    pub workshop: Option<bool>,
    pub workshop_half_day: Option<bool>,
    pub workshop_only: Option<bool>,
    pub origin: Option<Origin>,
    pub signing_date: Option<String>,
    pub title: Option<String>,
    pub meta: Option<MetaOverrides>,
    pub font: Option<FontOverrides>,
    pub pdf: Option<PageOverrides>,
    pub logo: Option<LogoOverrides>,
    pub layout: Option<LayoutOverrides>,
}

impl ConfigOverrides {
    /// Parse overrides from a JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Coerce HTTP query parameters
    ///
    /// Every value arrives as a string. Empty strings count as absent, flags
    /// are set only by `true`, and unknown keys are ignored.
    pub fn from_query(query: &HashMap<String, String>) -> Result<Self> {
        let get = |key: &str| {
            query
                .get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
        };
        let text = |key: &str| get(key).map(str::to_string);
        let flag = |key: &str| get(key).map(is_truthy);

        Ok(Self {
            date: text("date"),
            workshop_date: text("workshopDate"),
            duration: get("duration").map(Scalar::parse),
            compensation: get("compensation").map(Scalar::parse),
            workshop: flag("workshop"),
            workshop_half_day: flag("workshopHalfDay"),
            workshop_only: flag("workshopOnly"),
            origin: get("origin").map(Origin::from_str).transpose()?,
            signing_date: text("signingDate"),
            title: text("title"),
            ..Self::default()
        })
    }
}

/// Whether a submitted flag is set
///
/// Checkboxes submit `true`; every other value, including an absent one,
/// counts as unset. Relations between form fields use the same rule.
pub fn is_truthy(value: &str) -> bool {
    value == "true"
}
