//! Placeholder document for records without script or payload content.

const HEADING_START: &str = "<!doctype html><html lang='en'><head><title>Update Information About : ";

const HEADING_END: &str = "</title><meta name='viewport' content='width=device-width, initial-scale=1'>\
<link rel='stylesheet' type='text/css' href='https://maxcdn.bootstrapcdn.com/bootstrap/3.3.5/css/bootstrap.min.css'/>\
</head><body><div class='container'>";

const FOOTING: &str = "</div><script src='https://maxcdn.bootstrapcdn.com/bootstrap/3.3.5/js/bootstrap.min.js'>\
</script></body></html>";

/// Builds an HTML page titled after the record with an empty body.
#[must_use]
pub fn placeholder_document(name: &str) -> String {
    format!("{HEADING_START}{}{HEADING_END}{FOOTING}", escape_html(name))
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\'' => out.push_str("&#39;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
