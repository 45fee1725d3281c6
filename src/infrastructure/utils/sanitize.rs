/// Escapes the five HTML-significant characters and trims the result.
///
/// Not idempotent: `&lt;` becomes `&amp;lt;` on a second pass, so each
/// submitted field must go through here exactly once.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());

    for ch in input.chars() {
        match ch {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '&' => out.push_str("&amp;"),
            _ => out.push(ch),
        }
    }

    out.trim().to_string()
}
