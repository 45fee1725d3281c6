use derive_more::Display;
use once_cell::sync::Lazy;
use regex::Regex;
use validator::Validate;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
});

static VN_PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\+84|84|0)(3[2-9]|5[689]|7[06-9]|8[1-689]|9[0-46-9])[0-9]{7}$")
        .expect("phone pattern compiles")
});

static SYMBOL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z]{1,5}$").expect("symbol pattern compiles")
});

/// A rejected request field. `error` is the stable machine text, `message`
/// the localized one shown to the visitor.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ValidationFailure {
    #[display("{error}")]
    MissingFields { error: &'static str, message: &'static str },

    #[display("{error}")]
    InvalidFormat { error: &'static str, message: &'static str },

    #[display("{error}")]
    FieldTooLong { error: &'static str, message: &'static str },
}

impl ValidationFailure {
    pub fn error(&self) -> &'static str {
        match self {
            ValidationFailure::MissingFields { error, .. }
            | ValidationFailure::InvalidFormat { error, .. }
            | ValidationFailure::FieldTooLong { error, .. } => error,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ValidationFailure::MissingFields { message, .. }
            | ValidationFailure::InvalidFormat { message, .. }
            | ValidationFailure::FieldTooLong { message, .. } => message,
        }
    }

    pub fn contact_missing_fields() -> Self {
        ValidationFailure::MissingFields {
            error: "Missing required fields",
            message: "Vui lòng điền đầy đủ thông tin: Tên, Email, Chủ đề, và Tin nhắn",
        }
    }
}

/// Route-specific rule set run by [`check_form`]. Length caps come from the
/// form's `validator` derive.
pub trait FormRules: Validate {
    const MISSING: ValidationFailure;
    const TOO_LONG: ValidationFailure;

    fn has_required_fields(&self) -> bool;

    fn check_format(&self) -> Result<(), ValidationFailure> {
        Ok(())
    }
}

/// Presence, then format, then length. The first failing stage wins.
pub fn check_form<F: FormRules>(form: &F) -> Result<(), ValidationFailure> {
    if !form.has_required_fields() {
        return Err(F::MISSING);
    }

    form.check_format()?;

    form.validate().map_err(|errors| {
        tracing::debug!("Length validation failed: {}", errors);
        F::TOO_LONG
    })
}

/// JS-style truthiness for optional strings: absent and empty are missing,
/// whitespace is not.
pub fn present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.is_empty())
}

pub fn present_trimmed(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Spaces and dashes are ignored so "090-123 4567" passes.
pub fn is_valid_vietnamese_phone(phone: &str) -> bool {
    let compact: String = phone.chars().filter(|c| !c.is_whitespace() && *c != '-').collect();
    VN_PHONE_RE.is_match(&compact)
}

pub fn is_valid_symbol(symbol: &str) -> bool {
    SYMBOL_RE.is_match(symbol)
}

pub fn is_absolute_url(candidate: &str) -> bool {
    url::Url::parse(candidate).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Validate)]
    struct Probe {
        #[validate(length(max = 5))]
        name: Option<String>,
        email: Option<String>,
    }

    impl FormRules for Probe {
        const MISSING: ValidationFailure = ValidationFailure::MissingFields {
            error: "Missing required fields",
            message: "missing",
        };
        const TOO_LONG: ValidationFailure = ValidationFailure::FieldTooLong {
            error: "Field too long",
            message: "too long",
        };

        fn has_required_fields(&self) -> bool {
            present(&self.name) && present(&self.email)
        }

        fn check_format(&self) -> Result<(), ValidationFailure> {
            match self.email.as_deref() {
                Some(email) if is_valid_email(email) => Ok(()),
                _ => Err(ValidationFailure::InvalidFormat {
                    error: "Invalid email format",
                    message: "bad email",
                }),
            }
        }
    }

    fn probe(name: &str, email: &str) -> Probe {
        Probe { name: Some(name.into()), email: Some(email.into()) }
    }

    #[test]
    fn presence_is_checked_before_format() {
        let form = Probe { name: None, email: Some("not-an-email".into()) };
        assert_eq!(check_form(&form).unwrap_err().error(), "Missing required fields");
    }

    #[test]
    fn format_is_checked_before_length() {
        let form = probe("much too long", "nope");
        assert_eq!(check_form(&form).unwrap_err().error(), "Invalid email format");
    }

    #[test]
    fn length_cap_applies_last() {
        let form = probe("much too long", "a@b.co");
        assert_eq!(check_form(&form).unwrap_err().error(), "Field too long");

        assert!(check_form(&probe("Ann", "a@b.co")).is_ok());
    }

    #[test]
    fn empty_string_counts_as_missing_but_whitespace_does_not() {
        assert!(!present(&Some(String::new())));
        assert!(present(&Some("  ".into())));
        assert!(!present_trimmed(&Some("  ".into())));
    }

    #[test]
    fn email_pattern_is_permissive() {
        assert!(is_valid_email("john@example.com"));
        assert!(is_valid_email("a.b+c@sub.domain.vn"));
        assert!(!is_valid_email("invalid-email"));
        assert!(!is_valid_email("john@example"));
        assert!(!is_valid_email("jo hn@example.com"));
        assert!(!is_valid_email("john@@example.com"));
    }

    #[test]
    fn vietnamese_mobile_prefixes() {
        assert!(is_valid_vietnamese_phone("0901234567"));
        assert!(is_valid_vietnamese_phone("+84901234567"));
        assert!(is_valid_vietnamese_phone("84 32 123 4567"));
        assert!(is_valid_vietnamese_phone("086-123-4567"));
        // 095 and 031 are not mobile prefixes
        assert!(!is_valid_vietnamese_phone("0951234567"));
        assert!(!is_valid_vietnamese_phone("0311234567"));
        assert!(!is_valid_vietnamese_phone("090123456"));
        assert!(!is_valid_vietnamese_phone("+1 415 555 0100"));
    }

    #[test]
    fn symbols_are_one_to_five_letters() {
        assert!(is_valid_symbol("AAPL"));
        assert!(is_valid_symbol("vnm"));
        assert!(!is_valid_symbol("TOOLONG"));
        assert!(!is_valid_symbol("BRK.B"));
        assert!(!is_valid_symbol(""));
    }

    #[test]
    fn urls_must_be_absolute() {
        assert!(is_absolute_url("https://example.com/listing?page=2"));
        assert!(!is_absolute_url("example.com"));
        assert!(!is_absolute_url("/relative/path"));
    }
}
