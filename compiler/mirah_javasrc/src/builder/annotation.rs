//! Annotation rendering.

use mirah_ir::{Annotation, AnnotationValue};

use crate::literal;

/// `@Name` or `@Name(key=value, ...)`.
pub fn render(annotation: &Annotation) -> String {
    let name = annotation.name.replace(['/', '$'], ".");
    if annotation.values.is_empty() {
        return format!("@{name}");
    }
    let values: Vec<String> = annotation
        .values
        .iter()
        .map(|(key, value)| format!("{key}={}", render_value(value)))
        .collect();
    format!("@{name}({})", values.join(", "))
}

fn render_value(value: &AnnotationValue) -> String {
    match value {
        AnnotationValue::Int(n) => literal::int(*n),
        AnnotationValue::Str(s) => literal::quote_string(s),
        AnnotationValue::Class(ty) => literal::class(ty),
        AnnotationValue::Annotation(nested) => render(nested),
        AnnotationValue::Array(items) => {
            let items: Vec<String> = items.iter().map(render_value).collect();
            format!("{{{}}}", items.join(", "))
        }
    }
}
