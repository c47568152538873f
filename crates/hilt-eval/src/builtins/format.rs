//! printf-style rendering for `shell` command strings.

use hilt_types::Value;

/// `%[flags][width][.precision]verb`, parsed after the `%`.
#[derive(Debug, Default)]
struct Directive {
    left: bool,
    zero: bool,
    plus: bool,
    width: Option<usize>,
    precision: Option<usize>,
}

/// Substitute `operands` into `format` left to right.
///
/// Every verb letter consumes one operand; `%%` is a literal percent.
/// `%s` and `%v` render the operand as text, `%q` quotes it, `%d` prints
/// an integer. Flags `-`, `0`, `+`, a width and a precision are honoured.
/// A verb with no operand left renders as `%!s(MISSING)`, a verb that does
/// not fit its operand as `%!d(string=a)`, and unused operands are appended
/// as `%!(EXTRA string=a, int=1)`.
pub fn sprintf(format: &str, operands: &[Value]) -> String {
    let mut out = String::with_capacity(format.len());
    let mut operands = operands.iter();
    let mut chars = format.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '%' {
            out.push(ch);
            continue;
        }
        if chars.peek() == Some(&'%') {
            chars.next();
            out.push('%');
            continue;
        }

        let mut directive = Directive::default();
        while let Some(&flag) = chars.peek() {
            match flag {
                '-' => directive.left = true,
                '0' => directive.zero = true,
                '+' => directive.plus = true,
                ' ' | '#' => {}
                _ => break,
            }
            chars.next();
        }
        directive.width = number(&mut chars);
        if chars.peek() == Some(&'.') {
            chars.next();
            directive.precision = Some(number(&mut chars).unwrap_or(0));
        }

        let Some(verb) = chars.next() else {
            out.push_str("%!(NOVERB)");
            break;
        };
        match operands.next() {
            Some(value) => out.push_str(&render(&directive, verb, value)),
            None => out.push_str(&format!("%!{verb}(MISSING)")),
        }
    }

    let extra: Vec<String> = operands.map(typed).collect();
    if !extra.is_empty() {
        out.push_str(&format!("%!(EXTRA {})", extra.join(", ")));
    }
    out
}

fn number(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> Option<usize> {
    let mut n: Option<usize> = None;
    while let Some(digit) = chars.peek().and_then(|c| c.to_digit(10)) {
        chars.next();
        n = Some(n.unwrap_or(0).saturating_mul(10).saturating_add(digit as usize));
    }
    n
}

/// `string=a`, the operand as it appears in error markers.
fn typed(value: &Value) -> String {
    format!("{}={value}", value.type_tag())
}

fn render(directive: &Directive, verb: char, value: &Value) -> String {
    let body = match (verb, value) {
        ('s' | 'v', _) => truncate(value.to_string(), directive.precision),
        ('q', Value::String(s)) => format!("{:?}", truncate(s.clone(), directive.precision)),
        ('d', Value::Int(n)) if directive.plus && *n >= 0 => format!("+{n}"),
        ('d', Value::Int(n)) => n.to_string(),
        _ => return format!("%!{verb}({})", typed(value)),
    };
    pad(directive, body)
}

fn truncate(text: String, precision: Option<usize>) -> String {
    match precision {
        Some(p) => text.chars().take(p).collect(),
        None => text,
    }
}

fn pad(directive: &Directive, body: String) -> String {
    let len = body.chars().count();
    let Some(width) = directive.width.filter(|w| *w > len) else {
        return body;
    };
    let fill = width - len;
    if directive.left {
        format!("{body}{}", " ".repeat(fill))
    } else if directive.zero {
        format!("{}{body}", "0".repeat(fill))
    } else {
        format!("{}{body}", " ".repeat(fill))
    }
}
