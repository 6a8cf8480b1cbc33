use regex::Regex;
use std::sync::LazyLock;

const MIN_NUMBER_LENGTH: usize = 10;
const MIN_NAME_LENGTH: usize = 3;
const UNKNOWN_PREFIX: &str = "UNKNOWN";

// "Display Name" <5551234567>
static NAMED_CALLER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^"([^"]+)" <(\d*)>$"#).unwrap());

/// Caller number plus the display name, when the name looked trustworthy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    pub number: String,
    pub name: Option<String>,
}

impl CallerIdentity {
    /// Name to store in the phonebook; the bare number when no name is known.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.number)
    }
}

pub fn is_valid_number(number: &str) -> bool {
    number.len() >= MIN_NUMBER_LENGTH && number.chars().all(|c| c.is_ascii_digit())
}

pub fn is_valid_name(name: &str) -> bool {
    if name.chars().count() < MIN_NAME_LENGTH || name.starts_with(UNKNOWN_PREFIX) {
        return false;
    }
    // "Springfield IL" style caller ids carry a location, not a name
    name.chars().rev().nth(2) != Some(' ')
}

/// Parses a raw caller id string.
///
/// Accepts `"Name" <Number>` or a bare number. Returns `None` when no valid
/// number can be extracted; an implausible name is dropped but the number kept.
pub fn parse_caller_id(raw: &str) -> Option<CallerIdentity> {
    if let Some(caps) = NAMED_CALLER_RE.captures(raw) {
        let name = caps.get(1).map_or("", |m| m.as_str());
        let number = caps.get(2).map_or("", |m| m.as_str());
        if !is_valid_number(number) {
            return None;
        }
        return Some(CallerIdentity {
            number: number.to_string(),
            name: is_valid_name(name).then(|| name.to_string()),
        });
    }

    if is_valid_number(raw) {
        return Some(CallerIdentity {
            number: raw.to_string(),
            name: None,
        });
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_number() {
        assert!(is_valid_number("5551234567"));
        assert!(is_valid_number("12345678901"));
        assert!(!is_valid_number("12345"));
        assert!(!is_valid_number("12a4567890"));
        assert!(!is_valid_number(""));
        assert!(!is_valid_number("+15551234567"));
    }

    #[test]
    fn test_is_valid_name() {
        assert!(is_valid_name("John Smith"));
        assert!(is_valid_name("Bob"));
        assert!(!is_valid_name("Jo"));
        assert!(!is_valid_name("UNKNOWN CALLER"));
        assert!(!is_valid_name("UNKNOWN"));
        assert!(!is_valid_name("Springfield IL"));
        assert!(is_valid_name("A B"));
    }

    #[test]
    fn test_parse_named_caller() {
        assert_eq!(
            parse_caller_id(r#""Alice Jones" <5551234567>"#),
            Some(CallerIdentity {
                number: "5551234567".to_string(),
                name: Some("Alice Jones".to_string()),
            })
        );
    }

    #[test]
    fn test_parse_named_caller_bad_name() {
        assert_eq!(
            parse_caller_id(r#""SPRINGFIELD IL" <5551234567>"#),
            Some(CallerIdentity {
                number: "5551234567".to_string(),
                name: None,
            })
        );
        assert_eq!(
            parse_caller_id(r#""UNKNOWN NAME" <5551234567>"#).and_then(|c| c.name),
            None
        );
    }

    #[test]
    fn test_parse_named_caller_bad_number() {
        assert_eq!(parse_caller_id(r#""Alice Jones" <12345>"#), None);
        assert_eq!(parse_caller_id(r#""Alice Jones" <>"#), None);
    }

    #[test]
    fn test_parse_bare_number() {
        assert_eq!(
            parse_caller_id("5559876543"),
            Some(CallerIdentity {
                number: "5559876543".to_string(),
                name: None,
            })
        );
    }

    #[test]
    fn test_parse_garbage() {
        assert_eq!(parse_caller_id("Anonymous"), None);
        assert_eq!(parse_caller_id(r#""Alice" <5551234567> ext"#), None);
        assert_eq!(parse_caller_id(""), None);
    }

    #[test]
    fn test_display_name_falls_back_to_number() {
        let caller = CallerIdentity {
            number: "5559876543".to_string(),
            name: None,
        };
        assert_eq!(caller.display_name(), "5559876543");
    }
}
