//! String helpers for script-facing text.
//!
//! Script authors write names and determinations in any case, so comparisons
//! against fixed keywords are ASCII case-insensitive.

/// Converts an empty string to `None`, otherwise returns `Some(value)`.
///
/// # Examples
///
/// ```
/// use mechanist_domain::common::none_if_empty;
///
/// assert_eq!(none_if_empty("hello"), Some("hello"));
/// assert_eq!(none_if_empty(""), None);
/// assert_eq!(none_if_empty(" "), Some(" ")); // Whitespace is not empty
/// ```
pub fn none_if_empty(value: &str) -> Option<&str> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// ASCII case-insensitive equality.
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

/// Strips `prefix` from `value` ignoring ASCII case, preserving the case of
/// the remainder.
///
/// # Examples
///
/// ```
/// use mechanist_domain::common::strip_prefix_ignore_case;
///
/// assert_eq!(strip_prefix_ignore_case("REASON:Griefing", "reason:"), Some("Griefing"));
/// assert_eq!(strip_prefix_ignore_case("message", "reason:"), None);
/// ```
pub fn strip_prefix_ignore_case<'a>(value: &'a str, prefix: &str) -> Option<&'a str> {
    let head = value.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        Some(&value[prefix.len()..])
    } else {
        None
    }
}
