//! HTML request form

use crate::fields::{FieldDescriptor, FieldKind};

const STYLE: &str = r#"body {
    font-family: sans-serif;
}
dl {
    max-width: 30em;
}
dl > div {
    display: flex;
    align-items: center;
}
dl > div + div {
    margin-top: 0.5em;
}
dt {
    flex-basis: 10em;
    margin-right: 1em;
}
dd {
    flex-grow: 1;
    margin: 0;
}
input[type="text"],
input[type="date"],
input[type="number"],
input[type="email"],
select {
    width: 100%;
    box-sizing: border-box;
    font: inherit;
}"#;

// Dependents follow their controlling field in document order, so a single
// pass also settles chained relations.
const SCRIPT: &str = r#"(function () {
    var form = document.querySelector("form");
    function valueOf(name) {
        var el = form.elements[name];
        if (!el || el.disabled) return "";
        if (el.type === "checkbox" || el.type === "radio") return el.checked ? el.value : "";
        return el.value;
    }
    function truthy(value) {
        return value === "true";
    }
    function update() {
        var dependents = form.querySelectorAll("[data-relation]");
        for (var i = 0; i < dependents.length; i++) {
            var el = dependents[i];
            var current = valueOf(el.getAttribute("data-relation"));
            var required = el.getAttribute("data-relation-value");
            el.disabled = required === "" ? truthy(current) : current !== required;
        }
    }
    form.addEventListener("change", update);
    update();
})();"#;

/// Escape text for HTML content and attribute values
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn relation_attributes(field: &FieldDescriptor) -> String {
    match &field.relation {
        Some(relation) => format!(
            r#" data-relation="{}" data-relation-value="{}""#,
            escape_html(&relation.field),
            escape_html(&relation.value)
        ),
        None => String::new(),
    }
}

fn render_control(field: &FieldDescriptor) -> String {
    let name = escape_html(&field.name);
    let relation = relation_attributes(field);
    let required = if field.kind.is_required() {
        " required"
    } else {
        ""
    };

    match &field.kind {
        FieldKind::Select(options) => {
            let options: String = options
                .iter()
                .map(|option| {
                    format!(
                        r#"<option value="{}"{}>{}</option>"#,
                        escape_html(&option.value),
                        if option.selected { " selected" } else { "" },
                        escape_html(&option.label)
                    )
                })
                .collect();
            format!(r#"<select id="{name}" name="{name}"{relation}{required}>{options}</select>"#)
        }
        kind => format!(
            r#"<input id="{name}" name="{name}" type="{}" value="{}"{relation}{required}>"#,
            kind.input_type().unwrap_or("text"),
            escape_html(&field.value)
        ),
    }
}

/// Full HTML document with a GET form posting to `action`
pub fn render_form_page(fields: &[FieldDescriptor], action: &str) -> String {
    let rows: String = fields
        .iter()
        .map(|field| {
            format!(
                r#"
            <div>
                <dt><label for="{}">{}</label></dt>
                <dd>{}</dd>
            </div>"#,
                escape_html(&field.name),
                escape_html(&field.label),
                render_control(field)
            )
        })
        .collect();

    format!(
        r#"<!doctype html>
<html lang=en>
<head>
    <meta charset=utf-8>
    <title>Front Conference PDFs</title>
    <style>
{STYLE}
    </style>
</head>
<body>
    <h1>Front Conference PDFs</h1>
    <h2>Speakers Agreement</h2>
    <form method="get" action="{}">
        <dl>{rows}
        </dl>
        <button type="submit">Create</button>
    </form>
    <script>
{SCRIPT}
    </script>
</body>
</html>
"#,
        escape_html(action)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{speakers_agreement_fields, SelectOption};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
    }

    #[test]
    fn test_checkbox_is_not_required() {
        let field = FieldDescriptor::new("workshop", "Workshop", FieldKind::Checkbox).value("true");
        assert_eq!(
            render_control(&field),
            r#"<input id="workshop" name="workshop" type="checkbox" value="true">"#
        );
    }

    #[test]
    fn test_select_with_relation() {
        let field = FieldDescriptor::new(
            "duration",
            "Duration",
            FieldKind::Select(vec![SelectOption::new("30").selected(), SelectOption::new("45")]),
        )
        .relation("workshopOnly", "");

        assert_eq!(
            render_control(&field),
            concat!(
                r#"<select id="duration" name="duration" data-relation="workshopOnly" "#,
                r#"data-relation-value="" required><option value="30" selected>30</option>"#,
                r#"<option value="45">45</option></select>"#
            )
        );
    }

    #[test]
    fn test_form_page_lists_every_field() {
        let fields = speakers_agreement_fields();
        let html = render_form_page(&fields, "/api/speakers-agreement.pdf");

        assert!(html.starts_with("<!doctype html>"));
        assert!(html.contains(r#"<form method="get" action="/api/speakers-agreement.pdf">"#));
        for field in &fields {
            assert!(html.contains(&format!(r#"<label for="{}">"#, field.name)));
        }
        assert!(html.contains("addEventListener(\"change\", update)"));
    }

    #[test]
    fn test_script_enables_on_checkbox_value_only() {
        let html = render_form_page(&speakers_agreement_fields(), "/");
        assert!(html.contains(r#"return value === "true";"#));
        assert!(crate::config::is_truthy("true"));
        assert!(!crate::config::is_truthy("on"));
    }

    #[test]
    fn test_labels_are_escaped() {
        let fields = vec![FieldDescriptor::new("x", "<b>bold</b>", FieldKind::Text)];
        let html = render_form_page(&fields, "/?a=1&b=2");
        assert!(html.contains("&lt;b&gt;bold&lt;/b&gt;"));
        assert!(html.contains(r#"action="/?a=1&amp;b=2""#));
    }
}
