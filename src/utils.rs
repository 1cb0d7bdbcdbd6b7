// src/utils.rs
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+\.[a-zA-Z0-9-.]+$").expect("valid email regex")
    })
}

/// Loose RFC-style check: local part, `@`, dotted domain
pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}

/// Syntax check plus membership of the provider's domain
pub fn is_provider_email(email: &str, domain: &str) -> bool {
    is_valid_email(email) && email.ends_with(&format!("@{}", domain))
}

/// Minimal absolute-URI check (`scheme:rest`)
pub fn looks_like_uri(value: &str) -> bool {
    match value.split_once(':') {
        Some((scheme, rest)) => {
            !rest.is_empty()
                && scheme
                    .chars()
                    .next()
                    .is_some_and(|c| c.is_ascii_alphabetic())
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    }
}

/// Get file extension in lowercase
pub fn get_file_extension(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

/// File name without directory or extension
pub fn file_stem(filename: &str) -> String {
    Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(filename)
        .to_string()
}

/// Substitute `{key}` placeholders; `{{` and `}}` collapse to literal braces.
pub fn fill_placeholders(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(pos) = rest.find(&['{', '}'][..]) {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        if tail.starts_with("{{") {
            out.push('{');
            rest = &tail[2..];
        } else if tail.starts_with("}}") {
            out.push('}');
            rest = &tail[2..];
        } else if tail.starts_with('{') {
            let replaced = tail.find('}').and_then(|end| {
                let key = &tail[1..end];
                values
                    .iter()
                    .find(|(k, _)| *k == key)
                    .map(|(_, v)| (*v, end + 1))
            });
            match replaced {
                Some((value, consumed)) => {
                    out.push_str(value);
                    rest = &tail[consumed..];
                }
                None => {
                    out.push('{');
                    rest = &tail[1..];
                }
            }
        } else {
            out.push('}');
            rest = &tail[1..];
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_email() {
        assert!(is_valid_email("jane.doe+jobs@gmail.com"));
        assert!(is_valid_email("hr@acme.co.uk"));
        assert!(!is_valid_email("jane.doe@"));
        assert!(!is_valid_email("no-at-sign.com"));
        assert!(!is_valid_email("two@@gmail.com"));
        assert!(!is_valid_email("space in@gmail.com"));
    }

    #[test]
    fn test_is_provider_email() {
        assert!(is_provider_email("jane@gmail.com", "gmail.com"));
        assert!(!is_provider_email("jane@outlook.com", "gmail.com"));
        assert!(!is_provider_email("jane@notgmail.com", "gmail.com"));
    }

    #[test]
    fn test_looks_like_uri() {
        assert!(looks_like_uri("https://github.com/jane"));
        assert!(looks_like_uri("mailto:jane@gmail.com"));
        assert!(!looks_like_uri("github.com/jane"));
        assert!(!looks_like_uri("https:"));
    }

    #[test]
    fn test_get_file_extension() {
        assert_eq!(get_file_extension("acme.PNG"), Some("png".to_string()));
        assert_eq!(get_file_extension("logo.tiff"), Some("tiff".to_string()));
        assert_eq!(get_file_extension("noext"), None);
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem("Acme.png"), "Acme");
        assert_eq!(file_stem("big.corp.jpg"), "big.corp");
        assert_eq!(file_stem("plain"), "plain");
    }

    #[test]
    fn test_fill_placeholders() {
        let filled = fill_placeholders(
            "Dear {company} team, {{literal}} and {unknown}.",
            &[("company", "Acme")],
        );
        assert_eq!(filled, "Dear Acme team, {literal} and {unknown}.");
    }
}
