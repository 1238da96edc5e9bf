/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Lossless decimal numbers.
//!
//! `Number` fields are never carried through this crate as a native
//! float: floats cannot represent every JSON number exactly, and a
//! round trip through `f64` would silently change digits the source
//! AST actually had. Instead a number is decomposed into `(sign,
//! digits, exponent)`, mirroring Python's `Decimal(text).as_tuple()` —
//! the representation the reference implementation's JSON loader
//! produces by parsing numbers with `parse_int=str, parse_float=str`.
//!
//! Leading zeros are stripped from the combined integer+fraction digit
//! string (at least one digit is always kept), and the exponent is
//! `-len(fraction_digits)` adjusted by any `e`/`E` suffix. `"0.00"`
//! therefore decomposes to `digits = [0]`, `exponent = -2`, not to the
//! more obvious `exponent = 0`.

use crate::error::{Error, Result};

/// A number carried as sign, digit sequence, and decimal exponent:
/// `value = (-1)^sign * digits_as_integer * 10^exponent`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Number {
    pub negative: bool,
    pub digits: Vec<u8>,
    pub exponent: i64,
}

impl Number {
    /// Parses a JSON-grammar decimal number's source text into its
    /// decimal components.
    pub fn parse(text: &str) -> Result<Self> {
        let bytes = text.as_bytes();
        let mut i = 0;
        let negative = bytes.first() == Some(&b'-');
        if negative {
            i += 1;
        }

        let int_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == int_start {
            return Err(Error::SchemaViolation(format!("not a number: {text:?}")));
        }
        let int_digits = &text[int_start..i];

        let mut frac_digits = "";
        if bytes.get(i) == Some(&b'.') {
            i += 1;
            let frac_start = i;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            frac_digits = &text[frac_start..i];
        }

        let mut exp_suffix: i64 = 0;
        if matches!(bytes.get(i), Some(b'e') | Some(b'E')) {
            i += 1;
            let exp_negative = bytes.get(i) == Some(&b'-');
            if matches!(bytes.get(i), Some(b'+') | Some(b'-')) {
                i += 1;
            }
            let exp_start = i;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            let magnitude: i64 = text[exp_start..i]
                .parse()
                .map_err(|_| Error::SchemaViolation(format!("bad exponent in {text:?}")))?;
            exp_suffix = if exp_negative { -magnitude } else { magnitude };
        }

        if i != bytes.len() {
            return Err(Error::SchemaViolation(format!(
                "trailing garbage in number: {text:?}"
            )));
        }

        let mut combined: Vec<u8> = int_digits
            .bytes()
            .chain(frac_digits.bytes())
            .map(|b| b - b'0')
            .collect();
        let first_nonzero = combined.iter().position(|&d| d != 0).unwrap_or(combined.len() - 1);
        combined.drain(0..first_nonzero);

        Ok(Number {
            negative,
            digits: combined,
            exponent: exp_suffix - frac_digits.len() as i64,
        })
    }

    /// Reconstructs the canonical fixed-point decimal text for this
    /// number (no scientific notation).
    pub fn to_decimal_string(&self) -> String {
        let mut out = String::new();
        if self.negative {
            out.push('-');
        }
        let n = self.digits.len() as i64;
        if self.exponent >= 0 {
            for &d in &self.digits {
                out.push((b'0' + d) as char);
            }
            for _ in 0..self.exponent {
                out.push('0');
            }
        } else {
            let frac_len = -self.exponent;
            if frac_len >= n {
                out.push('0');
                out.push('.');
                for _ in 0..(frac_len - n) {
                    out.push('0');
                }
                for &d in &self.digits {
                    out.push((b'0' + d) as char);
                }
            } else {
                let split = (n - frac_len) as usize;
                for &d in &self.digits[..split] {
                    out.push((b'0' + d) as char);
                }
                out.push('.');
                for &d in &self.digits[split..] {
                    out.push((b'0' + d) as char);
                }
            }
        }
        out
    }

    /// Whether this number has no fractional part and fits losslessly
    /// as an integer textual form (exponent is non-negative).
    pub fn is_integral(&self) -> bool {
        self.exponent >= 0
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn zero_with_trailing_fraction_zeros() {
        let n = Number::parse("0.00").unwrap();
        assert_eq!(n.digits, vec![0]);
        assert_eq!(n.exponent, -2);
        assert!(!n.negative);
    }

    #[test]
    fn plain_integer() {
        let n = Number::parse("100").unwrap();
        assert_eq!(n.digits, vec![1, 0, 0]);
        assert_eq!(n.exponent, 0);
    }

    #[test]
    fn simple_decimal() {
        let n = Number::parse("3.14").unwrap();
        assert_eq!(n.digits, vec![3, 1, 4]);
        assert_eq!(n.exponent, -2);
        assert_eq!(n.to_decimal_string(), "3.14");
    }

    #[test]
    fn exponent_suffix() {
        let n = Number::parse("1.5e3").unwrap();
        assert_eq!(n.digits, vec![1, 5]);
        assert_eq!(n.exponent, 2);
        assert_eq!(n.to_decimal_string(), "1500");
    }

    #[test]
    fn negative_zero() {
        let n = Number::parse("-0").unwrap();
        assert!(n.negative);
        assert_eq!(n.digits, vec![0]);
        assert_eq!(n.exponent, 0);
    }

    #[test]
    fn small_fraction_needs_leading_zero_padding() {
        let n = Number::parse("0.0007").unwrap();
        assert_eq!(n.digits, vec![7]);
        assert_eq!(n.exponent, -4);
        assert_eq!(n.to_decimal_string(), "0.0007");
    }
}
