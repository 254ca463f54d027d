//! Redaction helpers for log fields that may carry personal data or secrets.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

// One pass over both patterns: an email claims its span first, so its
// domain is never re-read as an opaque token (JWT segments, long base64url
// or hex runs).
#[allow(clippy::unwrap_used)]
static SENSITIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?P<email>\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{1,}\b)",
        r"|(?P<token>[A-Za-z0-9_\-+/=.]{24,})",
    ))
    .unwrap()
});

/// Masks emails (first character of the local part survives) and opaque
/// tokens (replaced wholesale).
pub fn redact(input: &str) -> String {
    SENSITIVE
        .replace_all(input, |caps: &regex::Captures| match caps.name("email") {
            Some(email) => mask_email(email.as_str()),
            None => "[REDACTED_TOKEN]".to_string(),
        })
        .into_owned()
}

fn mask_email(found: &str) -> String {
    match found.split_once('@') {
        Some((local, domain)) => match local.chars().next() {
            Some(first) => format!("{first}***@{domain}"),
            None => format!("@{domain}"),
        },
        None => found.to_string(),
    }
}

/// Display wrapper that redacts on format.
pub struct Redacted<'a>(pub &'a str);

impl fmt::Display for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&redact(self.0))
    }
}

impl fmt::Debug for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&redact(self.0))
    }
}
