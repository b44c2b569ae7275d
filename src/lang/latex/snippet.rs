/// Converts a `#{}` template into LSP snippet syntax.
///
/// Each `#{}` becomes a tab stop, `#{text}` a placeholder with `text` as
/// default. Everything else is escaped so it is inserted literally.
pub fn to_lsp_snippet(template: &str) -> String {
    let mut out = String::with_capacity(template.len() + 8);
    let mut stop = 0;
    let mut rest = template;

    while let Some(at) = rest.find("#{") {
        let (before, marker) = rest.split_at(at);
        let close = match marker[2..].find('}') {
            Some(close) => close,
            None => break,
        };

        escape_into(before, &mut out);

        stop += 1;
        let placeholder = &marker[2..2 + close];
        if placeholder.is_empty() {
            out.push_str(&format!("${}", stop));
        } else {
            out.push_str(&format!("${{{}:", stop));
            escape_into(placeholder, &mut out);
            out.push('}');
        }

        rest = &marker[3 + close..];
    }

    escape_into(rest, &mut out);
    out
}

fn escape_into(text: &str, out: &mut String) {
    for c in text.chars() {
        if matches!(c, '\\' | '$' | '}') {
            out.push('\\');
        }
        out.push(c);
    }
}
