//! Form field descriptors for the request form
//!
//! A descriptor may depend on another field through a [`Relation`]. The same
//! rule drives the inline script of the form page and the server-side
//! filtering of submitted values.

use crate::config::{is_truthy, Origin};
use std::collections::HashMap;

/// One `<option>` of a select
#[derive(Debug, Clone, PartialEq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

impl SelectOption {
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            label: value.clone(),
            value,
            selected: false,
        }
    }

    pub fn selected(mut self) -> Self {
        self.selected = true;
        self
    }
}

/// HTML input category
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Text,
    Date,
    Number,
    Email,
    Checkbox,
    Radio,
    Select(Vec<SelectOption>),
}

impl FieldKind {
    /// `type` attribute of the `<input>`; `None` for selects
    pub fn input_type(&self) -> Option<&'static str> {
        match self {
            FieldKind::Text => Some("text"),
            FieldKind::Date => Some("date"),
            FieldKind::Number => Some("number"),
            FieldKind::Email => Some("email"),
            FieldKind::Checkbox => Some("checkbox"),
            FieldKind::Radio => Some("radio"),
            FieldKind::Select(_) => None,
        }
    }

    /// Checkboxes and radios are optional, everything else is required
    pub fn is_required(&self) -> bool {
        !matches!(self, FieldKind::Checkbox | FieldKind::Radio)
    }
}

/// Dependency on the value of another field
#[derive(Debug, Clone, PartialEq)]
pub struct Relation {
    /// Name of the controlling field
    pub field: String,
    /// Required value; empty means "controlling field is unset or falsy"
    pub value: String,
}

impl Relation {
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Whether the dependent field is enabled given the current form values
    pub fn is_satisfied(&self, values: &HashMap<String, String>) -> bool {
        let current = values.get(&self.field).map(String::as_str).unwrap_or("");
        if self.value.is_empty() {
            !is_truthy(current)
        } else {
            current == self.value
        }
    }
}

/// One input control of the form
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    /// Initial value (for checkboxes, the value submitted when checked)
    pub value: String,
    pub relation: Option<Relation>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind,
            value: String::new(),
            relation: None,
        }
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn relation(mut self, field: &str, value: &str) -> Self {
        self.relation = Some(Relation::new(field, value));
        self
    }

    pub fn is_enabled(&self, values: &HashMap<String, String>) -> bool {
        self.relation
            .as_ref()
            .map_or(true, |relation| relation.is_satisfied(values))
    }
}

/// Fields whose relation holds for `values`
pub fn enabled_fields<'a>(
    fields: &'a [FieldDescriptor],
    values: &HashMap<String, String>,
) -> Vec<&'a FieldDescriptor> {
    fields.iter().filter(|f| f.is_enabled(values)).collect()
}

/// Drop submitted values of fields that would be disabled in the form
///
/// Fields are visited in order, so a controlling field dropped earlier no
/// longer enables its dependents. Keys without a descriptor pass through
/// unchanged.
pub fn retain_enabled(
    fields: &[FieldDescriptor],
    mut values: HashMap<String, String>,
) -> HashMap<String, String> {
    for field in fields {
        if !field.is_enabled(&values) {
            values.remove(&field.name);
        }
    }
    values
}

/// Controls of the speakers agreement request form
pub fn speakers_agreement_fields() -> Vec<FieldDescriptor> {
    let origins = Origin::ALL
        .into_iter()
        .map(|origin| {
            let option = SelectOption::new(origin.as_str());
            if origin == Origin::default() {
                option.selected()
            } else {
                option
            }
        })
        .collect();

    vec![
        FieldDescriptor::new("date", "Conference date", FieldKind::Text)
            .value("27 - 28 August 2020"),
        FieldDescriptor::new("workshop", "Workshop", FieldKind::Checkbox).value("true"),
        FieldDescriptor::new("workshopOnly", "Workshop only", FieldKind::Checkbox)
            .value("true")
            .relation("workshop", "true"),
        FieldDescriptor::new("workshopDate", "Workshop date", FieldKind::Text)
            .value("26 August 2020")
            .relation("workshop", "true"),
        FieldDescriptor::new("workshopHalfDay", "Half-day workshop", FieldKind::Checkbox)
            .value("true")
            .relation("workshop", "true"),
        FieldDescriptor::new(
            "duration",
            "Duration [min]",
            FieldKind::Select(vec![
                SelectOption::new("30").selected(),
                SelectOption::new("45"),
            ]),
        )
        .relation("workshopOnly", ""),
        FieldDescriptor::new("compensation", "Compensation [CHF]", FieldKind::Number)
            .relation("workshopOnly", ""),
        FieldDescriptor::new("origin", "Speaker origin", FieldKind::Select(origins)),
    ]
}
