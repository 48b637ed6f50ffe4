//! Shared validation helpers.

use tabshell_common::content::url_scheme;

/// Push an error if `value` is outside `[min, max]`.
pub(crate) fn validate_range(errors: &mut Vec<String>, name: &str, value: u32, min: u32, max: u32) {
    if value < min || value > max {
        errors.push(format!("{name} = {value} is out of range [{min}, {max}]"));
    }
}

pub(crate) fn validate_not_blank(errors: &mut Vec<String>, name: &str, value: &str) {
    if value.trim().is_empty() {
        errors.push(format!("{name} must not be empty"));
    }
}

/// A bare scheme name: ASCII letter followed by letters, digits, `+`, `-`, `.`.
pub(crate) fn is_scheme_name(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        _ => false,
    }
}

/// Push an error unless `url` has one of the `allowed` schemes.
pub(crate) fn validate_url_scheme(
    errors: &mut Vec<String>,
    name: &str,
    url: &str,
    allowed: &[&str],
) {
    match url_scheme(url) {
        Some(scheme) if allowed.iter().any(|a| a.eq_ignore_ascii_case(scheme)) => {}
        Some(scheme) => errors.push(format!(
            "{name} = {url:?} uses scheme {scheme:?}, expected one of {allowed:?}"
        )),
        None => errors.push(format!("{name} = {url:?} is not a URL")),
    }
}
