//! URL and text sanitizing for anything rendered into HTML.

use url::Url;

/// Base used to resolve relative avatar references such as
/// `/api/placeholder/40/40`, mirroring how a page resolves them against its
/// own origin.
const RELATIVE_BASE: &str = "http://localhost/";

/// Characters whose presence in a URL is treated as an injection attempt.
const SUSPICIOUS_URL_CHARS: [char; 4] = ['\'', '"', '<', '>'];

/// Validate a URL destined for an `src`/`href` attribute.
///
/// Accepts `http:` and `https:` URLs (relative references resolve to the
/// local origin and are accepted) and `data:image/*` payloads that do not
/// contain the substring `script`. Any URL containing a quote or angle
/// bracket is rejected outright. Returns `fallback` on rejection or when
/// the input cannot be parsed.
pub fn sanitize_url(url: &str, fallback: &str) -> String {
    if url.is_empty() {
        return fallback.to_string();
    }

    let parsed = match Url::parse(RELATIVE_BASE).and_then(|base| base.join(url)) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!(error = %e, "Invalid URL rejected");
            return fallback.to_string();
        }
    };

    let allowed = matches!(parsed.scheme(), "http" | "https")
        || (url.starts_with("data:image/") && !url.contains("script"));
    if !allowed {
        tracing::warn!(scheme = parsed.scheme(), "URL with disallowed scheme rejected");
        return fallback.to_string();
    }

    if url.contains(&SUSPICIOUS_URL_CHARS[..]) {
        tracing::warn!("Potentially dangerous URL rejected");
        return fallback.to_string();
    }

    url.to_string()
}

/// HTML-entity-escape `& < > " '`.
pub fn sanitize_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Replace every character outside `[A-Za-z0-9_-]` with `_`.
pub fn safe_filename_component(value: &str) -> String {
    value
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
