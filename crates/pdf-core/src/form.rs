//! Fillable AcroForm text fields

use crate::document::Color;
use crate::page::Rect;
use lopdf::{dictionary, Dictionary, Object, ObjectId};

/// Input format attached to a field through Acrobat JavaScript actions
#[derive(Debug, Clone, PartialEq)]
pub enum FieldFormat {
    /// Date with an Acrobat mask such as `yyyy-mm-dd`
    Date(String),
}

impl FieldFormat {
    fn actions(&self) -> (String, String) {
        match self {
            FieldFormat::Date(mask) => (
                format!("AFDate_KeystrokeEx(\"{mask}\");"),
                format!("AFDate_FormatEx(\"{mask}\");"),
            ),
        }
    }
}

/// Options for a text field
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextFieldOptions {
    /// Prefilled value
    pub value: Option<String>,
    pub format: Option<FieldFormat>,
    pub border_color: Option<Color>,
}

impl TextFieldOptions {
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn format(mut self, format: FieldFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn border_color(mut self, color: Color) -> Self {
        self.border_color = Some(color);
        self
    }
}

/// A text field placed on a page
#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    pub name: String,
    /// Page index (0-based)
    pub page: usize,
    pub rect: Rect,
    pub options: TextFieldOptions,
}

const ANNOT_FLAG_PRINT: i64 = 4;

/// Helvetica, auto-sized, black
const DEFAULT_APPEARANCE: &str = "/Helv 0 Tf 0 g";

impl FormField {
    /// Merged field/widget dictionary
    pub fn to_widget_dictionary(&self, page_id: ObjectId, page_height: f64) -> Dictionary {
        let [llx, lly, urx, ury] = self.rect.to_pdf_box(page_height);

        let mut dict = dictionary! {
            "Type" => "Annot",
            "Subtype" => "Widget",
            "FT" => "Tx",
            "T" => Object::string_literal(self.name.as_str()),
            "F" => ANNOT_FLAG_PRINT,
            "P" => page_id,
            "Rect" => vec![
                Object::Real(llx as f32),
                Object::Real(lly as f32),
                Object::Real(urx as f32),
                Object::Real(ury as f32),
            ],
            "DA" => Object::string_literal(DEFAULT_APPEARANCE),
        };

        if let Some(value) = &self.options.value {
            dict.set("V", Object::string_literal(value.as_str()));
        }

        if let Some(color) = self.options.border_color {
            dict.set(
                "MK",
                dictionary! {
                    "BC" => vec![
                        Object::Real(color.r),
                        Object::Real(color.g),
                        Object::Real(color.b),
                    ],
                },
            );
        }

        if let Some(format) = &self.options.format {
            let (keystroke, display) = format.actions();
            dict.set(
                "AA",
                dictionary! {
                    "K" => dictionary! {
                        "S" => "JavaScript",
                        "JS" => Object::string_literal(keystroke),
                    },
                    "F" => dictionary! {
                        "S" => "JavaScript",
                        "JS" => Object::string_literal(display),
                    },
                },
            );
        }

        dict
    }
}

/// Interactive form dictionary referencing every placed field
pub fn acroform_dictionary(field_ids: &[ObjectId], helvetica_id: ObjectId) -> Dictionary {
    dictionary! {
        "Fields" => field_ids.iter().map(|id| Object::Reference(*id)).collect::<Vec<_>>(),
        "NeedAppearances" => true,
        "DA" => Object::string_literal(DEFAULT_APPEARANCE),
        "DR" => dictionary! {
            "Font" => dictionary! {
                "Helv" => helvetica_id,
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn field(options: TextFieldOptions) -> FormField {
        FormField {
            name: "signingDate".to_string(),
            page: 0,
            rect: Rect::new(130.0, 500.0, 200.0, 16.0),
            options,
        }
    }

    #[test]
    fn test_widget_rect_in_pdf_space() {
        let dict = field(TextFieldOptions::default()).to_widget_dictionary((7, 0), 792.0);
        let rect = dict.get(b"Rect").unwrap().as_array().unwrap();
        let values: Vec<f32> = rect.iter().map(|o| o.as_float().unwrap()).collect();
        assert_eq!(values, vec![130.0, 276.0, 330.0, 292.0]);
        assert_eq!(dict.get(b"P").unwrap().as_reference().unwrap(), (7, 0));
    }

    #[test]
    fn test_widget_shares_form_appearance() {
        let widget = field(TextFieldOptions::default()).to_widget_dictionary((7, 0), 792.0);
        let form = acroform_dictionary(&[(7, 0)], (2, 0));

        assert_eq!(
            widget.get(b"DA").unwrap().as_str().unwrap(),
            form.get(b"DA").unwrap().as_str().unwrap()
        );
        assert_eq!(widget.get(b"DA").unwrap().as_str().unwrap(), b"/Helv 0 Tf 0 g");
        // Single-line text field
        assert!(widget.get(b"Ff").is_err());
    }

    #[test]
    fn test_widget_value_and_border() {
        let dict = field(
            TextFieldOptions::default()
                .value("2020-02-20")
                .border_color(Color::green()),
        )
        .to_widget_dictionary((1, 0), 792.0);

        assert_eq!(dict.get(b"V").unwrap().as_str().unwrap(), b"2020-02-20");
        assert!(dict.get(b"MK").is_ok());
        assert!(dict.get(b"AA").is_err());
    }

    #[test]
    fn test_date_format_actions() {
        let dict = field(TextFieldOptions::default().format(FieldFormat::Date(
            "yyyy-mm-dd".to_string(),
        )))
        .to_widget_dictionary((1, 0), 792.0);

        let actions = dict.get(b"AA").unwrap().as_dict().unwrap();
        let format = actions.get(b"F").unwrap().as_dict().unwrap();
        assert_eq!(
            format.get(b"JS").unwrap().as_str().unwrap(),
            b"AFDate_FormatEx(\"yyyy-mm-dd\");"
        );
    }

    #[test]
    fn test_acroform_dictionary() {
        let dict = acroform_dictionary(&[(3, 0), (4, 0)], (2, 0));
        assert_eq!(dict.get(b"Fields").unwrap().as_array().unwrap().len(), 2);
        assert!(dict.get(b"NeedAppearances").unwrap().as_bool().unwrap());
    }
}
