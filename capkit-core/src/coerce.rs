//! String → typed value coercion.
//!
//! Every function here answers `None` for "this text is not a value of
//! that type". Nothing panics and nothing allocates an error; the store
//! layers defaults on top.
//!
//! Surrounding whitespace is ignored, since properties values keep
//! trailing blanks. Floats follow `f64::from_str`, so `inf`, `infinity`
//! and `nan` parse in any letter case.

use std::str::FromStr;
use std::time::Duration;

use num_bigint::BigInt;
use rust_decimal::Decimal;

pub fn parse_i32(raw: &str) -> Option<i32> {
    raw.trim().parse().ok()
}

pub fn parse_i64(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}

pub fn parse_i16(raw: &str) -> Option<i16> {
    raw.trim().parse().ok()
}

pub fn parse_f64(raw: &str) -> Option<f64> {
    raw.trim().parse().ok()
}

/// Plain (`12.50`) and scientific (`1.25e1`) notation are both accepted.
pub fn parse_decimal(raw: &str) -> Option<Decimal> {
    let raw = raw.trim();
    Decimal::from_str(raw)
        .ok()
        .or_else(|| Decimal::from_scientific(raw).ok())
}

pub fn parse_big_int(raw: &str) -> Option<BigInt> {
    BigInt::from_str(raw.trim()).ok()
}

/// `true`/`false` in any letter case. Anything else is not a boolean.
pub fn parse_bool(raw: &str) -> Option<bool> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("true") {
        Some(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Human-friendly durations such as `30s`, `1m 30s`, `250ms`.
pub fn parse_duration(raw: &str) -> Option<Duration> {
    humantime::parse_duration(raw.trim()).ok()
}

/// Any `FromStr` type, which covers user enums that implement it.
pub fn parse_enum<T: FromStr>(raw: &str) -> Option<T> {
    raw.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    enum Browser {
        Chrome,
        Firefox,
    }

    impl FromStr for Browser {
        type Err = ();

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            match s.to_ascii_lowercase().as_str() {
                "chrome" => Ok(Browser::Chrome),
                "firefox" => Ok(Browser::Firefox),
                _ => Err(()),
            }
        }
    }

    #[test]
    fn integers_reject_garbage_and_overflow() {
        assert_eq!(parse_i32(" 42 "), Some(42));
        assert_eq!(parse_i32("not-a-number"), None);
        assert_eq!(parse_i32("4.2"), None);
        assert_eq!(parse_i16("40000"), None);
        assert_eq!(parse_i64("9223372036854775807"), Some(i64::MAX));
    }

    #[test]
    fn surrounding_whitespace_and_float_specials() {
        assert_eq!(parse_i64("\t7 "), Some(7));
        assert_eq!(parse_i32("4 2"), None);
        assert_eq!(parse_f64(" 0.25\n"), Some(0.25));
        assert_eq!(parse_f64("inf"), Some(f64::INFINITY));
        assert_eq!(parse_f64("-Infinity"), Some(f64::NEG_INFINITY));
        assert!(parse_f64("NaN").is_some_and(f64::is_nan));
    }

    #[test]
    fn decimals_keep_scale() {
        let d = parse_decimal("12.50").unwrap();
        assert_eq!(d.to_string(), "12.50");
        assert_eq!(parse_decimal("1.25e1").unwrap(), Decimal::from_str("12.5").unwrap());
        assert_eq!(parse_decimal("twelve"), None);
    }

    #[test]
    fn big_ints_exceed_i64() {
        let n = parse_big_int("123456789012345678901234567890").unwrap();
        assert_eq!(n.to_string(), "123456789012345678901234567890");
        assert_eq!(parse_big_int("12x"), None);
    }

    #[test]
    fn booleans_are_strict() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool("false"), Some(false));
        assert_eq!(parse_bool("yes"), None);
        assert_eq!(parse_bool(""), None);
    }

    #[test]
    fn durations_and_enums() {
        assert_eq!(parse_duration("1m 30s"), Some(Duration::from_secs(90)));
        assert_eq!(parse_duration("soon"), None);
        assert_eq!(parse_enum::<Browser>("Chrome"), Some(Browser::Chrome));
        assert_eq!(parse_enum::<Browser>("firefox"), Some(Browser::Firefox));
        assert_eq!(parse_enum::<Browser>("edge"), None);
    }
}
