//! Server-rendered challenge and error pages.
//!
//! Two small pages, composed as escaped HTML strings: the provider-choice
//! challenge and the rejection/error view. Everything interpolated from
//! request or provider data is escaped.

/// A provider entry on the challenge screen.
#[derive(Debug, Clone)]
pub struct ProviderChoice {
    /// Display name.
    pub name: String,
    /// Start endpoint, already carrying the origin parameter.
    pub start_href: String,
    /// Logo URL, when one resolved.
    pub logo_href: Option<String>,
}

/// Escapes text for HTML interpolation.
pub(crate) fn html_escape(text: &str) -> String {
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

/// Wraps page content in the shared document shell.
fn html_page(title: &str, content: &str) -> String {
    let mut html = String::with_capacity(content.len() + 512);
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str("<title>");
    html.push_str(&html_escape(title));
    html.push_str("</title>\n</head>\n<body>\n");
    html.push_str(content);
    html.push_str("\n</body>\n</html>\n");
    html
}

/// Renders the provider-choice challenge.
pub fn login_page(title: &str, subtext: &str, providers: &[ProviderChoice]) -> String {
    let mut content = String::with_capacity(1024);

    content.push_str("<h1>");
    content.push_str(&html_escape(title));
    content.push_str("</h1>\n<p>");
    content.push_str(&html_escape(subtext));
    content.push_str("</p>\n<ul class=\"providers\">\n");
    for provider in providers {
        content.push_str("<li><a href=\"");
        content.push_str(&html_escape(&provider.start_href));
        content.push_str("\">");
        if let Some(logo) = &provider.logo_href {
            content.push_str("<img src=\"");
            content.push_str(&html_escape(logo));
            content.push_str("\" alt=\"\"> ");
        }
        content.push_str(&html_escape(&provider.name));
        content.push_str("</a></li>\n");
    }
    content.push_str("</ul>");

    html_page(title, &content)
}

/// Renders the rejection view with a retry link back into the challenge.
pub fn error_page(title: &str, subtext: &str, retry_href: &str) -> String {
    let mut content = String::with_capacity(512);

    content.push_str("<h1>");
    content.push_str(&html_escape(title));
    content.push_str("</h1>\n<p>");
    content.push_str(&html_escape(subtext));
    content.push_str("</p>\n<p><a href=\"");
    content.push_str(&html_escape(retry_href));
    content.push_str("\">Try again</a></p>");

    html_page(title, &content)
}
