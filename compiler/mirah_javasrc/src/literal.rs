//! Java literal rendering.

use std::fmt::Write;

use mirah_ir::JvmType;

/// Quote a string as a Java string literal.
pub fn quote_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        escape_into(&mut out, c, '"');
    }
    out.push('"');
    out
}

/// Quote a character as a Java `char` literal.
///
/// Characters outside the basic multilingual plane do not fit a Java `char`;
/// they are written as a narrowing cast of their code point.
pub fn quote_char(value: char) -> String {
    if u32::from(value) > 0xFFFF {
        return format!("(char){}", u32::from(value));
    }
    let mut out = String::with_capacity(4);
    out.push('\'');
    escape_into(&mut out, value, '\'');
    out.push('\'');
    out
}

fn escape_into(out: &mut String, c: char, quote: char) {
    match c {
        '\\' => out.push_str("\\\\"),
        '\n' => out.push_str("\\n"),
        '\r' => out.push_str("\\r"),
        '\t' => out.push_str("\\t"),
        '\u{8}' => out.push_str("\\b"),
        '\u{c}' => out.push_str("\\f"),
        c if c == quote => {
            out.push('\\');
            out.push(c);
        }
        c if c.is_control() => {
            // Writing to a String cannot fail.
            let _ = write!(out, "\\u{:04x}", u32::from(c));
        }
        c => out.push(c),
    }
}

pub fn int(value: i32) -> String {
    value.to_string()
}

pub fn long(value: i64) -> String {
    format!("{value}L")
}

pub fn float(value: f32) -> String {
    if value.is_nan() {
        "Float.NaN".to_string()
    } else if value.is_infinite() {
        if value > 0.0 {
            "Float.POSITIVE_INFINITY".to_string()
        } else {
            "Float.NEGATIVE_INFINITY".to_string()
        }
    } else {
        format!("(float){value:?}")
    }
}

pub fn double(value: f64) -> String {
    if value.is_nan() {
        "Double.NaN".to_string()
    } else if value.is_infinite() {
        if value > 0.0 {
            "Double.POSITIVE_INFINITY".to_string()
        } else {
            "Double.NEGATIVE_INFINITY".to_string()
        }
    } else {
        format!("{value:?}")
    }
}

/// `Foo.class`, `int.class`, `String[].class`.
pub fn class(ty: &JvmType) -> String {
    format!("{}.class", ty.to_source())
}

/// Literal for a bytecode-style constant directive (`iconst_m1`,
/// `lconst_1`, `fconst_2`, ...). `None` for anything else.
pub fn const_directive(directive: &str) -> Option<String> {
    let (prefix, operand) = directive.split_once("const_")?;
    let value: i32 = match operand {
        "m1" => -1,
        digit if digit.len() == 1 => digit.parse().ok()?,
        _ => return None,
    };
    let literal = match prefix {
        "i" if (-1..=5).contains(&value) => int(value),
        "l" if (0..=1).contains(&value) => long(i64::from(value)),
        "f" if (0..=2).contains(&value) => float(f32::from(i16::try_from(value).ok()?)),
        "d" if (0..=1).contains(&value) => double(f64::from(value)),
        _ => return None,
    };
    Some(literal)
}
