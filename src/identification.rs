//! Ecuadorian national identification number (cédula)
//!
//! A cédula is ten ASCII digits: a two digit province code (01-24), a third
//! digit below 6 for natural persons, six sequence digits and a modulus 10
//! check digit computed over the first nine with alternating 2/1 weights.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const NATIONAL_ID_LENGTH: usize = 10;
pub const PROVINCE_COUNT: u32 = 24;
/// Third digits at or above this value belong to companies and public entities.
pub const NATURAL_PERSON_THIRD_DIGIT_LIMIT: u32 = 6;
pub const CHECKSUM_COEFFICIENTS: [u32; 9] = [2, 1, 2, 1, 2, 1, 2, 1, 2];

/// Reason a candidate identification number was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum IdentificationError {
    #[error("identification number must have exactly 10 characters, got {0}")]
    InvalidLength(usize),

    #[error("identification number must contain only digits")]
    NonDigit,

    #[error("province code {0:02} is outside 01-24")]
    InvalidProvince(u32),

    #[error("third digit {0} does not belong to a natural person")]
    InvalidThirdDigit(u32),

    #[error("check digit {actual} does not match expected {expected}")]
    ChecksumMismatch { expected: u32, actual: u32 },
}

/// Returns `true` when `id` is a well formed cédula with a consistent check digit.
///
/// Never panics; any string that is not exactly ten ASCII digits is invalid.
pub fn is_valid_national_id(id: &str) -> bool {
    check_national_id(id).is_ok()
}

/// Runs every gate in order and reports the first one that fails.
pub fn check_national_id(id: &str) -> Result<(), IdentificationError> {
    let digits = parse_digits(id)?;

    let province = digits[0] * 10 + digits[1];
    if province == 0 || province > PROVINCE_COUNT {
        return Err(IdentificationError::InvalidProvince(province));
    }

    if digits[2] >= NATURAL_PERSON_THIRD_DIGIT_LIMIT {
        return Err(IdentificationError::InvalidThirdDigit(digits[2]));
    }

    let mut body = [0u32; 9];
    body.copy_from_slice(&digits[..9]);
    let expected = compute_check_digit(&body);
    let actual = digits[9];
    if expected != actual {
        return Err(IdentificationError::ChecksumMismatch { expected, actual });
    }

    Ok(())
}

/// Check digit for the first nine digits of a cédula.
///
/// Each weighted product of 10 or more is reduced by 9 (the sum of its two
/// decimal digits), and the check digit brings the total up to the next
/// multiple of ten.
pub fn compute_check_digit(body: &[u32; 9]) -> u32 {
    let total: u32 = body
        .iter()
        .zip(CHECKSUM_COEFFICIENTS.iter())
        .map(|(digit, coefficient)| {
            let product = digit * coefficient;
            if product >= 10 {
                product - 9
            } else {
                product
            }
        })
        .sum();

    match total % 10 {
        0 => 0,
        remainder => 10 - remainder,
    }
}

fn parse_digits(id: &str) -> Result<[u32; NATIONAL_ID_LENGTH], IdentificationError> {
    let length = id.chars().count();
    if length != NATIONAL_ID_LENGTH {
        return Err(IdentificationError::InvalidLength(length));
    }

    let mut digits = [0u32; NATIONAL_ID_LENGTH];
    for (slot, c) in digits.iter_mut().zip(id.chars()) {
        if !c.is_ascii_digit() {
            return Err(IdentificationError::NonDigit);
        }
        *slot = c as u32 - '0' as u32;
    }
    Ok(digits)
}

/// A cédula that has passed every gate of [`check_national_id`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IdentificationNumber(String);

impl IdentificationNumber {
    pub fn parse(value: &str) -> Result<Self, IdentificationError> {
        check_national_id(value)?;
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Province code, 1 through 24.
    pub fn province(&self) -> u32 {
        self.0[..2].parse().unwrap_or_default()
    }
}

impl TryFrom<String> for IdentificationNumber {
    type Error = IdentificationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        check_national_id(&value)?;
        Ok(Self(value))
    }
}

impl TryFrom<&str> for IdentificationNumber {
    type Error = IdentificationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl FromStr for IdentificationNumber {
    type Err = IdentificationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<IdentificationNumber> for String {
    fn from(value: IdentificationNumber) -> Self {
        value.0
    }
}

impl AsRef<str> for IdentificationNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdentificationNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_IDS: [&str; 6] = [
        "1710034065",
        "0926687856",
        "1713175071",
        "0102030400",
        "2400000002",
        "1234567897",
    ];

    fn with_check_digit(body: &str) -> String {
        let mut digits = [0u32; 9];
        for (slot, c) in digits.iter_mut().zip(body.chars()) {
            *slot = c.to_digit(10).unwrap();
        }
        format!("{}{}", body, compute_check_digit(&digits))
    }

    #[test]
    fn accepts_golden_vectors() {
        for id in VALID_IDS {
            assert!(is_valid_national_id(id), "{} should be valid", id);
        }
    }

    #[test]
    fn rejects_ids_with_flipped_check_digit() {
        for id in VALID_IDS {
            let (body, last) = id.split_at(9);
            let last = last.parse::<u32>().unwrap();
            for wrong in (0..10).filter(|d| *d != last) {
                let tampered = format!("{}{}", body, wrong);
                assert!(!is_valid_national_id(&tampered), "{} should be invalid", tampered);
            }
        }
    }

    #[test]
    fn rejects_wrong_lengths() {
        for length in (0..=15).filter(|l| *l != NATIONAL_ID_LENGTH) {
            let candidate = "1".repeat(length);
            assert!(!is_valid_national_id(&candidate));
            assert_eq!(
                check_national_id(&candidate),
                Err(IdentificationError::InvalidLength(length))
            );
        }
        // a valid id with trailing whitespace is still the wrong length
        assert!(!is_valid_national_id("1710034065 "));
    }

    #[test]
    fn rejects_non_digit_characters() {
        for id in ["171003406a", "17-0034065", " 710034065", "17100340６5", "１７１００３４０６５"] {
            assert!(!is_valid_national_id(id), "{} should be invalid", id);
        }
        assert_eq!(
            check_national_id("17100340x5"),
            Err(IdentificationError::NonDigit)
        );
    }

    #[test]
    fn multibyte_input_is_measured_in_characters() {
        // 9 characters, 10 bytes
        assert_eq!(
            check_national_id("17100340é"),
            Err(IdentificationError::InvalidLength(9))
        );
    }

    #[test]
    fn rejects_out_of_range_provinces_even_with_consistent_check_digit() {
        assert_eq!(
            check_national_id("0000000000"),
            Err(IdentificationError::InvalidProvince(0))
        );
        assert_eq!(
            check_national_id("2500000001"),
            Err(IdentificationError::InvalidProvince(25))
        );
        for province in 25..=99 {
            let id = with_check_digit(&format!("{:02}1234567", province));
            assert!(!is_valid_national_id(&id), "{} should be invalid", id);
        }
    }

    #[test]
    fn accepts_every_province_in_range() {
        for province in 1..=PROVINCE_COUNT {
            let id = with_check_digit(&format!("{:02}1234567", province));
            assert!(is_valid_national_id(&id), "{} should be valid", id);
        }
    }

    #[test]
    fn rejects_third_digit_at_or_above_six() {
        assert_eq!(
            check_national_id("1760034064"),
            Err(IdentificationError::InvalidThirdDigit(6))
        );
        for third in NATURAL_PERSON_THIRD_DIGIT_LIMIT..10 {
            let id = with_check_digit(&format!("17{}003406", third));
            assert!(!is_valid_national_id(&id), "{} should be invalid", id);
        }
    }

    #[test]
    fn check_digit_reduces_two_digit_products() {
        // 9 * 2 = 18 -> 9 at every even position: 5 * 9 + 4 * 9 = 81
        assert_eq!(compute_check_digit(&[9; 9]), 9);
        assert_eq!(compute_check_digit(&[1, 7, 1, 0, 0, 3, 4, 0, 6]), 5);
        assert_eq!(compute_check_digit(&[0; 9]), 0);
    }

    #[test]
    fn mismatch_reports_expected_digit() {
        assert_eq!(
            check_national_id("1710034060"),
            Err(IdentificationError::ChecksumMismatch {
                expected: 5,
                actual: 0
            })
        );
    }

    #[test]
    fn repeated_calls_agree() {
        for id in VALID_IDS.iter().copied().chain(["1710034064", "abc", ""]) {
            assert_eq!(is_valid_national_id(id), is_valid_national_id(id));
        }
    }

    #[test]
    fn identification_number_round_trips_through_serde() {
        let id = IdentificationNumber::parse("1710034065").unwrap();
        assert_eq!(id.province(), 17);
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"1710034065\"");

        let back: IdentificationNumber = serde_json::from_str("\"0926687856\"").unwrap();
        assert_eq!(back.as_str(), "0926687856");
        assert_eq!(back.province(), 9);

        assert!(serde_json::from_str::<IdentificationNumber>("\"1710034064\"").is_err());
        assert!("2500000001".parse::<IdentificationNumber>().is_err());
    }
}
