//! Secret and personal-data redaction utilities.
//!
//! Contact submissions carry personal data. Log fields and error metadata are
//! passed through these helpers so message bodies and full addresses never
//! reach a sink.

/// The redacted placeholder string.
pub const REDACTED: &str = "[REDACTED]";

/// Checks if a key/variable name likely refers to a secret.
///
/// # Examples
///
/// ```
/// use folio_shared::is_secret_key;
///
/// assert!(is_secret_key("API_KEY"));
/// assert!(is_secret_key("password"));
/// assert!(!is_secret_key("LOG_LEVEL"));
/// assert!(!is_secret_key("storageKey"));
/// ```
pub fn is_secret_key(key: &str) -> bool {
    let key: String = key
        .chars()
        .filter(|ch| !matches!(ch, '_' | '-' | '.'))
        .map(|ch| ch.to_ascii_uppercase())
        .collect();
    is_secret_key_name(&key)
        || key.contains("TOKEN")
        || key.contains("SECRET")
        || key.contains("PASSWORD")
        || key.contains("CREDENTIAL")
        || key.contains("AUTH")
}

/// `API_KEY`, `apiKey`, `signingKeys`; not `storageKey` or `spamKeywords`.
fn is_secret_key_name(normalized: &str) -> bool {
    let stem = normalized.strip_suffix('S').unwrap_or(normalized);
    stem.ends_with("KEY") && !stem.ends_with("STORAGEKEY")
}

/// Checks if a key refers to personal data captured by the contact form.
///
/// # Examples
///
/// ```
/// use folio_shared::is_personal_key;
///
/// assert!(is_personal_key("message"));
/// assert!(is_personal_key("fromEmail"));
/// assert!(!is_personal_key("emailDomain"));
/// ```
pub fn is_personal_key(key: &str) -> bool {
    let key = key.to_ascii_uppercase();
    if key.ends_with("DOMAIN") {
        return false;
    }
    key.contains("EMAIL") || key.contains("MESSAGE") || key.contains("BODY") || key == "NAME"
}

/// Returns true when the value stored under `key` must not be logged.
pub fn is_sensitive_key(key: &str) -> bool {
    is_secret_key(key) || is_personal_key(key)
}

/// Redacts a value if the key is sensitive.
///
/// # Examples
///
/// ```
/// use folio_shared::redact_if_sensitive;
///
/// assert_eq!(redact_if_sensitive("API_KEY", "sk-123"), "[REDACTED]");
/// assert_eq!(redact_if_sensitive("LOG_LEVEL", "debug"), "debug");
/// ```
pub fn redact_if_sensitive(key: &str, value: &str) -> String {
    if is_sensitive_key(key) {
        REDACTED.to_string()
    } else {
        value.to_string()
    }
}
