//! Composable Validation Rules
//!
//! Pure field rules shared by the client, user and product validators. Every
//! rule is a small value implementing [`ValidationRule`]; a rule never panics
//! on user input and reports a failure as a [`ValidationError`] carrying the
//! field name, a stable code and a human-readable message.

use std::collections::HashSet;
use std::marker::PhantomData;

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::identification::{check_national_id, IdentificationError};

/// Cached regex patterns for validation
static EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern compiles"));
static PERSON_NAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-zÁÉÍÓÚáéíóúÑñÜü ]+$").expect("name pattern compiles"));

/// Minimum password length accepted by [`PasswordPolicy`].
pub const PASSWORD_MIN_LENGTH: usize = 4;

/// Validation result type for composable validation chains
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validation error with detailed information
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub field: String,
    pub code: String,
    pub message: String,
}

impl ValidationError {
    /// Creates a ValidationError with the provided field name, error code, and message.
    ///
    /// # Examples
    ///
    /// ```
    /// # use billing::functional::validation_rules::ValidationError;
    /// let err = ValidationError::new("email", "INVALID_EMAIL", "email is not valid");
    /// assert_eq!(err.field, "email");
    /// assert_eq!(err.code, "INVALID_EMAIL");
    /// ```
    pub fn new(field: &str, code: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            code: code.to_string(),
            message: message.to_string(),
        }
    }
}

/// Core validation rule trait for composable validation
pub trait ValidationRule<T: ?Sized> {
    fn validate(&self, value: &T, field_name: &str) -> ValidationResult<()>;
}

/// Required field validation
///
/// Strings made only of whitespace count as missing, as do `None` options.
pub struct Required;

impl Required {
    fn error(field_name: &str) -> ValidationError {
        ValidationError::new(
            field_name,
            "REQUIRED",
            &format!("{} is required", field_name),
        )
    }
}

impl ValidationRule<str> for Required {
    /// # Examples
    ///
    /// ```
    /// # use billing::functional::validation_rules::{Required, ValidationRule};
    /// assert!(Required.validate("hello", "greeting").is_ok());
    /// let err = Required.validate("   ", "greeting").unwrap_err();
    /// assert_eq!(err.code, "REQUIRED");
    /// assert_eq!(err.message, "greeting is required");
    /// ```
    fn validate(&self, value: &str, field_name: &str) -> ValidationResult<()> {
        if value.trim().is_empty() {
            return Err(Self::error(field_name));
        }
        Ok(())
    }
}

impl<T> ValidationRule<Option<T>> for Required {
    fn validate(&self, value: &Option<T>, field_name: &str) -> ValidationResult<()> {
        match value {
            Some(_) => Ok(()),
            None => Err(Self::error(field_name)),
        }
    }
}

/// String length validation, counted in characters
pub struct Length {
    pub min: Option<usize>,
    pub max: Option<usize>,
}

impl Length {
    pub fn max(max: usize) -> Self {
        Self {
            min: None,
            max: Some(max),
        }
    }

    pub fn between(min: usize, max: usize) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }
}

impl ValidationRule<str> for Length {
    /// Validates that a string's length falls within the optional minimum and maximum bounds.
    ///
    /// If `min` is set and the string has fewer than `min` characters, validation fails with code
    /// `TOO_SHORT`. If `max` is set and the string has more than `max` characters, validation fails
    /// with code `TOO_LONG`. Accented letters count as one character each.
    ///
    /// # Examples
    ///
    /// ```
    /// # use billing::functional::validation_rules::{Length, ValidationRule};
    /// let rule = Length::between(2, 4);
    /// assert!(rule.validate("ñu", "name").is_ok());
    /// assert!(rule.validate("h", "name").is_err()); // TOO_SHORT
    /// assert!(rule.validate("hello", "name").is_err()); // TOO_LONG
    /// ```
    fn validate(&self, value: &str, field_name: &str) -> ValidationResult<()> {
        let len = value.chars().count();

        if let Some(min) = self.min {
            if len < min {
                return Err(ValidationError::new(
                    field_name,
                    "TOO_SHORT",
                    &format!("{} must be at least {} characters", field_name, min),
                ));
            }
        }

        if let Some(max) = self.max {
            if len > max {
                return Err(ValidationError::new(
                    field_name,
                    "TOO_LONG",
                    &format!("{} must be at most {} characters", field_name, max),
                ));
            }
        }

        Ok(())
    }
}

/// Exact string length, counted in characters
pub struct ExactLength(pub usize);

impl ValidationRule<str> for ExactLength {
    fn validate(&self, value: &str, field_name: &str) -> ValidationResult<()> {
        if value.chars().count() != self.0 {
            return Err(ValidationError::new(
                field_name,
                "INVALID_LENGTH",
                &format!("{} must be exactly {} characters", field_name, self.0),
            ));
        }
        Ok(())
    }
}

/// ASCII digits only
pub struct DigitsOnly;

impl ValidationRule<str> for DigitsOnly {
    fn validate(&self, value: &str, field_name: &str) -> ValidationResult<()> {
        if !value.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError::new(
                field_name,
                "DIGITS_ONLY",
                &format!("{} must contain only digits", field_name),
            ));
        }
        Ok(())
    }
}

/// Letters, Spanish accented vowels, ñ, ü and spaces
pub struct PersonName;

impl ValidationRule<str> for PersonName {
    /// # Examples
    ///
    /// ```
    /// # use billing::functional::validation_rules::{PersonName, ValidationRule};
    /// assert!(PersonName.validate("José Ñúñez", "firstName").is_ok());
    /// assert!(PersonName.validate("R2-D2", "firstName").is_err());
    /// ```
    fn validate(&self, value: &str, field_name: &str) -> ValidationResult<()> {
        if !PERSON_NAME_REGEX.is_match(value) {
            return Err(ValidationError::new(
                field_name,
                "INVALID_NAME",
                &format!("{} must contain only letters and spaces", field_name),
            ));
        }
        Ok(())
    }
}

/// Email format validation using regex
pub struct Email;

impl ValidationRule<str> for Email {
    /// Validates that a string looks like `local@domain.tld`: non-space runs
    /// separated by a single `@` and at least one `.` after it.
    ///
    /// # Examples
    ///
    /// ```
    /// # use billing::functional::validation_rules::{Email, ValidationRule};
    /// assert!(Email.validate("user@example.com", "email").is_ok());
    /// assert!(Email.validate("not-an-email", "email").is_err());
    /// ```
    fn validate(&self, value: &str, field_name: &str) -> ValidationResult<()> {
        if !EMAIL_REGEX.is_match(value) {
            return Err(ValidationError::new(
                field_name,
                "INVALID_EMAIL",
                &format!("{} must be a valid email address", field_name),
            ));
        }

        Ok(())
    }
}

/// Ecuadorian cédula: province code, natural-person third digit and check digit
pub struct NationalId;

impl ValidationRule<str> for NationalId {
    fn validate(&self, value: &str, field_name: &str) -> ValidationResult<()> {
        match check_national_id(value) {
            Ok(()) => Ok(()),
            Err(IdentificationError::InvalidLength(_)) => Err(ValidationError::new(
                field_name,
                "INVALID_LENGTH",
                &format!("{} must be exactly 10 characters", field_name),
            )),
            Err(IdentificationError::NonDigit) => Err(ValidationError::new(
                field_name,
                "DIGITS_ONLY",
                &format!("{} must contain only digits", field_name),
            )),
            Err(_) => Err(ValidationError::new(
                field_name,
                "INVALID_NATIONAL_ID",
                &format!(
                    "{} is not a valid national identification number",
                    field_name
                ),
            )),
        }
    }
}

/// Caps decimal places after trailing zeros are dropped, so `10.50` passes
/// a two-place limit.
pub struct MaxScale(pub u32);

impl ValidationRule<Decimal> for MaxScale {
    fn validate(&self, value: &Decimal, field_name: &str) -> ValidationResult<()> {
        if value.normalize().scale() > self.0 {
            return Err(ValidationError::new(
                field_name,
                "DECIMAL_PRECISION_TOO_HIGH",
                &format!("{} must have at most {} decimal places", field_name, self.0),
            ));
        }
        Ok(())
    }
}

/// Validates that a decimal is positive (greater than zero)
pub struct PositiveDecimal;

impl ValidationRule<Decimal> for PositiveDecimal {
    fn validate(&self, value: &Decimal, field_name: &str) -> ValidationResult<()> {
        if *value <= Decimal::ZERO {
            return Err(ValidationError::new(
                field_name,
                "DECIMAL_NOT_POSITIVE",
                &format!("{} must be greater than 0", field_name),
            ));
        }
        Ok(())
    }
}

/// Zero or more (stock counts)
pub struct NonNegative;

impl ValidationRule<i32> for NonNegative {
    fn validate(&self, value: &i32, field_name: &str) -> ValidationResult<()> {
        if *value < 0 {
            return Err(ValidationError::new(
                field_name,
                "NEGATIVE_VALUE",
                &format!("{} must not be negative", field_name),
            ));
        }
        Ok(())
    }
}

/// Password strength cascade.
///
/// Checks run in a fixed order (digit, lowercase, uppercase, symbol, length)
/// and only the first failure is reported.
pub struct PasswordPolicy;

impl ValidationRule<str> for PasswordPolicy {
    /// # Examples
    ///
    /// ```
    /// # use billing::functional::validation_rules::{PasswordPolicy, ValidationRule};
    /// // no digit and no uppercase: only the digit rule is reported
    /// let err = PasswordPolicy.validate("secret!", "password").unwrap_err();
    /// assert_eq!(err.code, "PASSWORD_MISSING_DIGIT");
    /// assert!(PasswordPolicy.validate("Ab1!", "password").is_ok());
    /// ```
    fn validate(&self, value: &str, field_name: &str) -> ValidationResult<()> {
        let checks: [(fn(&str) -> bool, &str, &str); 5] = [
            (
                |v| v.chars().any(|c| c.is_ascii_digit()),
                "PASSWORD_MISSING_DIGIT",
                "must contain at least one digit",
            ),
            (
                |v| v.chars().any(|c| c.is_ascii_lowercase()),
                "PASSWORD_MISSING_LOWERCASE",
                "must contain at least one lowercase letter",
            ),
            (
                |v| v.chars().any(|c| c.is_ascii_uppercase()),
                "PASSWORD_MISSING_UPPERCASE",
                "must contain at least one uppercase letter",
            ),
            (
                |v| v.chars().any(|c| !c.is_ascii_alphanumeric()),
                "PASSWORD_MISSING_SYMBOL",
                "must contain at least one symbol",
            ),
            (
                |v| v.chars().count() >= PASSWORD_MIN_LENGTH,
                "PASSWORD_TOO_SHORT",
                "must be at least 4 characters",
            ),
        ];

        match checks.iter().find(|(passes, _, _)| !passes(value)) {
            Some((_, code, message)) => Err(ValidationError::new(
                field_name,
                code,
                &format!("{} {}", field_name, message),
            )),
            None => Ok(()),
        }
    }
}

/// Equality with another field's value (password confirmation)
pub struct Matches<'a> {
    pub other: &'a str,
    pub other_field: &'a str,
}

impl ValidationRule<str> for Matches<'_> {
    fn validate(&self, value: &str, field_name: &str) -> ValidationResult<()> {
        if value != self.other {
            return Err(ValidationError::new(
                field_name,
                "FIELD_MISMATCH",
                &format!("{} must match {}", field_name, self.other_field),
            ));
        }
        Ok(())
    }
}

/// Membership check against values already taken by other records.
///
/// Textual identities (user names, emails) compare case-insensitively;
/// numeric-string identities (cédulas, product codes) compare exactly.
pub struct Unique {
    taken: HashSet<String>,
    case_insensitive: bool,
}

impl Unique {
    pub fn exact<'a, I>(taken: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        Self {
            taken: taken.into_iter().map(str::to_string).collect(),
            case_insensitive: false,
        }
    }

    pub fn case_insensitive<'a, I>(taken: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        Self {
            taken: taken.into_iter().map(str::to_lowercase).collect(),
            case_insensitive: true,
        }
    }

    pub fn contains(&self, value: &str) -> bool {
        if self.case_insensitive {
            self.taken.contains(&value.to_lowercase())
        } else {
            self.taken.contains(value)
        }
    }
}

impl ValidationRule<str> for Unique {
    fn validate(&self, value: &str, field_name: &str) -> ValidationResult<()> {
        if self.contains(value) {
            return Err(ValidationError::new(
                field_name,
                "DUPLICATE",
                &format!("{} is already in use", field_name),
            ));
        }
        Ok(())
    }
}

/// Validates that a collection is not empty
pub struct NotEmpty;

impl<T> ValidationRule<[T]> for NotEmpty {
    fn validate(&self, value: &[T], field_name: &str) -> ValidationResult<()> {
        if value.is_empty() {
            return Err(ValidationError::new(
                field_name,
                "EMPTY_COLLECTION",
                &format!("at least one item must be selected for {}", field_name),
            ));
        }
        Ok(())
    }
}

/// Applies `rule` only when `condition` returns true for the value.
///
/// If the condition returns false the validation is skipped and treated as successful.
///
/// # Examples
///
/// ```
/// # use billing::functional::validation_rules::{when, PasswordPolicy, ValidationRule};
/// // an empty password on update keeps the stored one
/// let rule = when(|v: &str| !v.is_empty(), PasswordPolicy);
/// assert!(rule.validate("", "password").is_ok());
/// assert!(rule.validate("abc", "password").is_err());
/// ```
pub struct WhenValidator<T, C, R>
where
    T: ?Sized,
    C: Fn(&T) -> bool,
    R: ValidationRule<T>,
{
    condition: C,
    rule: R,
    _phantom: PhantomData<T>,
}

impl<T, C, R> ValidationRule<T> for WhenValidator<T, C, R>
where
    T: ?Sized,
    C: Fn(&T) -> bool,
    R: ValidationRule<T>,
{
    fn validate(&self, value: &T, field_name: &str) -> ValidationResult<()> {
        if (self.condition)(value) {
            self.rule.validate(value, field_name)
        } else {
            Ok(()) // Skip validation if condition not met
        }
    }
}

pub fn when<T, C, R>(condition: C, rule: R) -> WhenValidator<T, C, R>
where
    T: ?Sized,
    C: Fn(&T) -> bool,
    R: ValidationRule<T>,
{
    WhenValidator {
        condition,
        rule,
        _phantom: PhantomData,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct FailingRule;

    impl ValidationRule<str> for FailingRule {
        fn validate(&self, _value: &str, field_name: &str) -> ValidationResult<()> {
            Err(ValidationError::new(
                field_name,
                "INNER_RULE_FAILED",
                &format!("{} failed validation", field_name),
            ))
        }
    }

    struct SpyRule {
        called: Rc<RefCell<bool>>,
    }

    impl ValidationRule<str> for SpyRule {
        fn validate(&self, value: &str, field_name: &str) -> ValidationResult<()> {
            *self.called.borrow_mut() = true;
            FailingRule.validate(value, field_name)
        }
    }

    #[test]
    fn test_required_string() {
        assert!(Required.validate("test", "name").is_ok());
        assert!(Required.validate("", "name").is_err());
        assert!(Required.validate(" \t ", "name").is_err());
    }

    #[test]
    fn test_required_option() {
        assert!(Required.validate(&Some(Decimal::ONE), "price").is_ok());
        let err = Required.validate(&None::<Decimal>, "price").unwrap_err();
        assert_eq!(err.field, "price");
        assert_eq!(err.message, "price is required");
    }

    #[test]
    fn test_length_counts_characters() {
        let rule = Length::max(5);
        assert!(rule.validate("ñañañ", "name").is_ok());
        assert_eq!(
            rule.validate("ñañaña", "name").unwrap_err().code,
            "TOO_LONG"
        );

        let rule = Length::between(3, 50);
        assert_eq!(rule.validate("ab", "userName").unwrap_err().code, "TOO_SHORT");
        assert!(rule.validate("abc", "userName").is_ok());
    }

    #[test]
    fn test_exact_length_and_digits() {
        assert!(ExactLength(10).validate("1234567890", "id").is_ok());
        assert!(ExactLength(10).validate("123456789", "id").is_err());
        assert!(DigitsOnly.validate("0987654321", "phone").is_ok());
        assert_eq!(
            DigitsOnly.validate("098-765", "phone").unwrap_err().code,
            "DIGITS_ONLY"
        );
    }

    #[test]
    fn test_person_name_charset() {
        for name in ["Ana", "María José", "ÁLVARO", "Peña", "Íñigo Úrsula", "Agüero"] {
            assert!(PersonName.validate(name, "firstName").is_ok(), "{}", name);
        }
        for name in ["Ana1", "O'Brien", "Jean-Luc", "Zoë", ""] {
            assert!(PersonName.validate(name, "firstName").is_err(), "{}", name);
        }
    }

    #[test]
    fn test_email_validation() {
        assert!(Email.validate("test@example.com", "email").is_ok());
        assert!(Email.validate("a.b@mail.example.ec", "email").is_ok());
        for email in ["invalid-email", "no@tld", "two@@example.com", "sp ace@example.com"] {
            assert!(Email.validate(email, "email").is_err(), "{}", email);
        }
    }

    #[test]
    fn test_national_id_codes() {
        assert!(NationalId.validate("1710034065", "identificationNumber").is_ok());
        assert_eq!(
            NationalId.validate("17100340", "identificationNumber").unwrap_err().code,
            "INVALID_LENGTH"
        );
        assert_eq!(
            NationalId.validate("17100340ab", "identificationNumber").unwrap_err().code,
            "DIGITS_ONLY"
        );
        assert_eq!(
            NationalId.validate("1710034064", "identificationNumber").unwrap_err().code,
            "INVALID_NATIONAL_ID"
        );
    }

    #[test]
    fn test_non_negative() {
        assert!(NonNegative.validate(&0i32, "stock").is_ok());
        assert_eq!(
            NonNegative.validate(&-3i32, "stock").unwrap_err().code,
            "NEGATIVE_VALUE"
        );
    }

    #[test]
    fn test_decimal_rules() {
        assert!(PositiveDecimal.validate(&Decimal::new(1, 2), "price").is_ok());
        assert!(PositiveDecimal.validate(&Decimal::ZERO, "price").is_err());
        assert!(PositiveDecimal.validate(&Decimal::new(-5, 0), "price").is_err());

        let scale = MaxScale(2);
        assert!(scale.validate(&Decimal::new(1050, 2), "price").is_ok());
        assert!(scale.validate(&Decimal::new(10500, 3), "price").is_ok());
        assert_eq!(
            scale.validate(&Decimal::new(10505, 3), "price").unwrap_err().code,
            "DECIMAL_PRECISION_TOO_HIGH"
        );
    }

    #[test]
    fn test_password_cascade_order() {
        let cases = [
            ("abcdef", "PASSWORD_MISSING_DIGIT"),
            ("ABC1!", "PASSWORD_MISSING_LOWERCASE"),
            ("abc1!", "PASSWORD_MISSING_UPPERCASE"),
            ("Abc1", "PASSWORD_MISSING_SYMBOL"),
            ("A1!", "PASSWORD_MISSING_LOWERCASE"),
            ("a1!", "PASSWORD_MISSING_UPPERCASE"),
            ("aB1", "PASSWORD_MISSING_SYMBOL"),
        ];
        for (password, code) in cases {
            assert_eq!(
                PasswordPolicy.validate(password, "password").unwrap_err().code,
                code,
                "{}",
                password
            );
        }
        assert!(PasswordPolicy.validate("aB1!", "password").is_ok());
        assert!(PasswordPolicy.validate("Contraseña1*", "password").is_ok());
    }

    #[test]
    fn test_password_reports_single_message() {
        // fails digit, uppercase, symbol and length; only the first is reported
        let err = PasswordPolicy.validate("a", "password").unwrap_err();
        assert_eq!(err.code, "PASSWORD_MISSING_DIGIT");
        assert_eq!(err.message, "password must contain at least one digit");
    }

    #[test]
    fn test_matches() {
        let rule = Matches {
            other: "aB1!",
            other_field: "password",
        };
        assert!(rule.validate("aB1!", "confirmPassword").is_ok());
        let err = rule.validate("ab1!", "confirmPassword").unwrap_err();
        assert_eq!(err.code, "FIELD_MISMATCH");
        assert_eq!(err.message, "confirmPassword must match password");
    }

    #[test]
    fn test_unique_case_sensitivity() {
        let exact = Unique::exact(["ABC-1", "1710034065"]);
        assert!(exact.validate("abc-1", "code").is_ok());
        assert!(exact.validate("ABC-1", "code").is_err());

        let folded = Unique::case_insensitive(["Admin@Example.com"]);
        assert_eq!(
            folded.validate("admin@example.COM", "email").unwrap_err().code,
            "DUPLICATE"
        );
        assert!(folded.validate("other@example.com", "email").is_ok());
    }

    #[test]
    fn test_not_empty() {
        let roles: Vec<String> = Vec::new();
        assert!(NotEmpty.validate(roles.as_slice(), "roles").is_err());
        assert!(NotEmpty
            .validate(["ADMIN".to_string()].as_slice(), "roles")
            .is_ok());
    }

    #[test]
    fn when_validator_skips_rule_when_condition_false() {
        let called = Rc::new(RefCell::new(false));
        let spy = SpyRule {
            called: Rc::clone(&called),
        };
        let validator = when(|value: &str| !value.is_empty(), spy);

        assert!(validator.validate("", "password").is_ok());
        assert!(!*called.borrow());
    }

    #[test]
    fn when_validator_returns_error_when_condition_true_and_rule_fails() {
        let called = Rc::new(RefCell::new(false));
        let spy = SpyRule {
            called: Rc::clone(&called),
        };
        let validator = when(|value: &str| !value.is_empty(), spy);

        let error = validator
            .validate("x", "password")
            .expect_err("expected inner rule failure");

        assert!(*called.borrow());
        assert_eq!(error.code, "INNER_RULE_FAILED");
        assert_eq!(error.message, "password failed validation");
    }
}
