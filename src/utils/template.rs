// file: src/utils/template.rs
// description: placeholder substitution for the html views
// reference: Internal code standards

/// A template with `{name}` placeholders. Values are inserted verbatim;
/// escape user-supplied text with [`escape_html`] first.
pub struct PageTemplate {
    template: &'static str,
}

impl PageTemplate {
    pub const fn new(template: &'static str) -> Self {
        Self { template }
    }

    pub fn render(&self, values: &[(&str, &str)]) -> String {
        let mut result = self.template.to_string();

        for (key, value) in values {
            let placeholder = format!("{{{}}}", key);
            result = result.replace(&placeholder, value);
        }

        result
    }
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
