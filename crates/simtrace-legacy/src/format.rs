//! Legacy numeric formatting.
//!
//! Values below one million print as plain decimals rounded to six
//! significant digits. Everything else prints in normalized scientific
//! notation with at most five fractional mantissa digits and a two-digit
//! minimum exponent: `1.5e+07`. Both paths round exact ties up, away from
//! zero.
//!
//! Both paths start from the shortest decimal representation that round
//! trips to the same `f64`. The legacy tool started from its runtime's
//! own digit string instead, which is not always the shortest for
//! subnormals: `5e-324` rounds from `5` here and from `4.9` there, so the
//! two renderings of subnormal values can differ in the last digit.

/// Threshold between plain and scientific rendering.
const SCIENTIFIC_THRESHOLD: f64 = 1_000_000.0;

/// Significant digits kept by the plain rendering.
const PLAIN_DIGITS: usize = 6;

/// Mantissa digits (one integer + five fractional) kept by the scientific rendering.
const SCIENTIFIC_DIGITS: usize = 6;

/// Decimal digits `d0 d1 d2 ...` of a positive finite value, meaning
/// `d0.d1d2... × 10^exponent`.
struct Decimal {
    digits: Vec<u8>,
    exponent: i32,
}

impl Decimal {
    fn shortest(v: f64) -> Self {
        // `{:e}` yields the shortest round-trip digits, e.g. "1.2345e-7".
        let repr = format!("{:e}", v.abs());
        let (mantissa, exponent) = repr.split_once('e').unwrap_or((repr.as_str(), "0"));
        let digits = mantissa
            .bytes()
            .filter(u8::is_ascii_digit)
            .map(|b| b - b'0')
            .collect();
        Self {
            digits,
            exponent: exponent.parse().unwrap_or(0),
        }
    }

    /// Keep `keep` significant digits, rounding half-up.
    fn round(&mut self, keep: usize) {
        if self.digits.len() <= keep {
            return;
        }
        let round_up = self.digits[keep] >= 5;
        self.digits.truncate(keep);

        if round_up {
            let mut i = keep;
            loop {
                if i == 0 {
                    // Carry out of the leading digit: 9.99.. → 10.0..
                    self.digits.insert(0, 1);
                    self.digits.truncate(keep);
                    self.exponent += 1;
                    break;
                }
                i -= 1;
                if self.digits[i] == 9 {
                    self.digits[i] = 0;
                } else {
                    self.digits[i] += 1;
                    break;
                }
            }
        }
        self.strip_trailing_zeros();
    }

    fn strip_trailing_zeros(&mut self) {
        while self.digits.len() > 1 && self.digits.last() == Some(&0) {
            self.digits.pop();
        }
    }

    fn push_digits(out: &mut String, digits: &[u8]) {
        out.extend(digits.iter().map(|&d| char::from(b'0' + d)));
    }

    fn to_plain(&self, out: &mut String) {
        let len = self.digits.len() as i32;
        let point = self.exponent + 1;
        if point <= 0 {
            out.push_str("0.");
            out.extend(std::iter::repeat_n('0', (-point) as usize));
            Self::push_digits(out, &self.digits);
        } else if point >= len {
            Self::push_digits(out, &self.digits);
            out.extend(std::iter::repeat_n('0', (point - len) as usize));
        } else {
            let (int, frac) = self.digits.split_at(point as usize);
            Self::push_digits(out, int);
            out.push('.');
            Self::push_digits(out, frac);
        }
    }

    fn to_scientific(&self, out: &mut String) {
        let (lead, frac) = self.digits.split_at(1);
        Self::push_digits(out, lead);
        if !frac.is_empty() {
            out.push('.');
            Self::push_digits(out, frac);
        }
        if self.exponent < 0 {
            out.push_str(&format!("e-{:02}", -self.exponent));
        } else {
            out.push_str(&format!("e+{:02}", self.exponent));
        }
    }
}

/// Render a real number the way the legacy trace tool does.
///
/// ```
/// use simtrace_legacy::format_real;
///
/// assert_eq!(format_real(0.1), "0.1");
/// assert_eq!(format_real(123.456789), "123.457");
/// assert_eq!(format_real(1_000_000.0), "1e+06");
/// assert_eq!(format_real(999_999.999999), "1000000");
/// ```
pub fn format_real(v: f64) -> String {
    if v.is_nan() {
        return "NaN".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if v == 0.0 {
        return "0".to_string();
    }

    let mut decimal = Decimal::shortest(v);
    let mut out = String::with_capacity(16);
    if v < 0.0 {
        out.push('-');
    }

    // Signed comparison: large negative values still take the plain path.
    if v < SCIENTIFIC_THRESHOLD {
        decimal.round(PLAIN_DIGITS);
        decimal.strip_trailing_zeros();
        decimal.to_plain(&mut out);
    } else {
        decimal.round(SCIENTIFIC_DIGITS);
        decimal.strip_trailing_zeros();
        decimal.to_scientific(&mut out);
    }
    out
}

/// Render a boolean as `TRUE` / `FALSE`.
pub fn format_bool(v: bool) -> &'static str {
    if v {
        "TRUE"
    } else {
        "FALSE"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn plain_values() {
        assert_eq!(format_real(0.1), "0.1");
        assert_eq!(format_real(1.0), "1");
        assert_eq!(format_real(2.5), "2.5");
        assert_eq!(format_real(10.0), "10");
        assert_eq!(format_real(120.0), "120");
        assert_eq!(format_real(123.456789), "123.457");
        assert_eq!(format_real(0.000_123_456_789), "0.000123457");
        assert_eq!(format_real(1e-7), "0.0000001");
        assert_eq!(format_real(999_999.0), "999999");
    }

    #[test]
    fn half_up_on_plain_path() {
        assert_eq!(format_real(1.234_565), "1.23457");
        assert_eq!(format_real(0.125), "0.125");
        assert_eq!(format_real(2.000_005), "2.00001");
    }

    #[test]
    fn rounding_can_carry_into_new_digit() {
        assert_eq!(format_real(999_999.999_999), "1000000");
        assert_eq!(format_real(9.999_999), "10");
        assert_eq!(format_real(0.099_999_99), "0.1");
    }

    #[test]
    fn zero_of_either_sign() {
        assert_eq!(format_real(0.0), "0");
        assert_eq!(format_real(-0.0), "0");
    }

    #[test]
    fn negative_values_stay_plain() {
        assert_eq!(format_real(-2.5), "-2.5");
        assert_eq!(format_real(-1_234_567.0), "-1234570");
        assert_eq!(format_real(-5e9), "-5000000000");
    }

    #[test]
    fn scientific_values() {
        assert_eq!(format_real(1_000_000.0), "1e+06");
        assert_eq!(format_real(1_500_000.0), "1.5e+06");
        assert_eq!(format_real(12_345_678.0), "1.23457e+07");
        assert_eq!(format_real(1e100), "1e+100");
        assert_eq!(format_real(3.2e21), "3.2e+21");
    }

    #[test]
    fn half_up_on_scientific_path() {
        assert_eq!(format_real(1_000_005.0), "1.00001e+06");
        assert_eq!(format_real(1_000_015.0), "1.00002e+06");
        assert_eq!(format_real(1_000_025.0), "1.00003e+06");
        assert_eq!(format_real(1_234_565.0), "1.23457e+06");
        assert_eq!(format_real(2_986_325.0), "2.98633e+06");
        assert_eq!(format_real(666_870_500.0), "6.66871e+08");
        assert_eq!(format_real(9_999_995.0), "1e+07");
    }

    #[test]
    fn subnormals_round_from_shortest_digits() {
        let s = format_real(5e-324);
        assert!(s.starts_with("0.000"), "{s}");
        assert!(s.ends_with("0005"), "{s}");
        assert_eq!(s.len(), "0.".len() + 323 + 1);
    }

    #[test]
    fn non_finite_values() {
        assert_eq!(format_real(f64::NAN), "NaN");
        assert_eq!(format_real(f64::INFINITY), "Infinity");
        assert_eq!(format_real(f64::NEG_INFINITY), "-Infinity");
    }

    #[test]
    fn booleans() {
        assert_eq!(format_bool(true), "TRUE");
        assert_eq!(format_bool(false), "FALSE");
    }

    proptest! {
        #[test]
        fn plain_output_has_at_most_six_significant_digits(v in -999_999.0f64..999_999.0) {
            let s = format_real(v);
            prop_assert!(!s.contains('e'), "{}", s);
            prop_assert!(!s.ends_with('.'), "{}", s);
            let significant = s
                .trim_start_matches('-')
                .replace('.', "")
                .trim_start_matches('0')
                .trim_end_matches('0')
                .len();
            prop_assert!(significant <= 6, "{} has {} significant digits", s, significant);
        }

        #[test]
        fn plain_output_is_close(v in 1e-3f64..999_999.0) {
            let parsed: f64 = format_real(v).parse().unwrap();
            prop_assert!((parsed - v).abs() <= v * 1e-5, "{} vs {}", parsed, v);
        }

        #[test]
        fn scientific_output_shape(v in 1_000_000.0f64..1e300) {
            let s = format_real(v);
            let (mantissa, exponent) = s.split_once("e+").unwrap();
            prop_assert!(exponent.len() >= 2);
            prop_assert!(exponent.parse::<u32>().unwrap() >= 6);
            prop_assert!(!mantissa.ends_with('0') || mantissa.len() == 1, "{}", s);
            prop_assert!(!mantissa.ends_with('.'));
            let fraction = mantissa.split_once('.').map_or(0, |(_, f)| f.len());
            prop_assert!(fraction <= 5, "{}", s);
            let parsed: f64 = s.replace("e+", "e").parse().unwrap();
            prop_assert!((parsed - v).abs() <= v * 1e-5, "{} vs {}", parsed, v);
        }
    }
}
