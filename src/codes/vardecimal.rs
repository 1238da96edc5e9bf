/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! `vardecimal`: the fixed canonical code used to emit a `Number`
//! field's digit stream.
//!
//! The alphabet is `{None, 0, 1, …, 9}` (11 symbols), with a
//! terminator (`None`) shorter than most digits so that short digit
//! sequences — by far the common case in real ASTs — stay cheap. The
//! code is built once, lazily, and reused for every `Number` field
//! rather than rebuilt per document.

use std::sync::OnceLock;

use crate::bits::{BitRead, BitWrite};
use crate::codes::CanonicalCode;
use crate::error::Result;

/// One symbol of a `vardecimal`-coded digit stream: either a decimal
/// digit or the stream terminator.
pub type Digit = Option<u8>;

fn alphabet() -> &'static [Digit] {
    static ALPHABET: OnceLock<Vec<Digit>> = OnceLock::new();
    ALPHABET.get_or_init(|| {
        let mut v = vec![None];
        v.extend((0u8..=9).map(Some));
        v
    })
}

fn code() -> &'static CanonicalCode<Digit> {
    static CODE: OnceLock<CanonicalCode<Digit>> = OnceLock::new();
    CODE.get_or_init(|| {
        // Canonical order: terminator at length 2, digits 0 and 1 at
        // length 3 (short numbers lean on small digits), the rest at
        // length 4. length_counts = (0, 1, 2, 8).
        let symbols: Vec<Digit> = vec![
            None,
            Some(0),
            Some(1),
            Some(2),
            Some(3),
            Some(4),
            Some(5),
            Some(6),
            Some(7),
            Some(8),
            Some(9),
        ];
        CanonicalCode::from_parts(symbols, vec![0, 1, 2, 8])
            .expect("vardecimal code is a fixed, valid construction")
    })
}

/// Writes a single digit (or the terminator) using the `vardecimal` code.
pub fn write_digit<W: BitWrite>(digit: Digit, writer: &mut W) {
    code().write_symbol(&digit, writer);
}

/// Reads a single digit (or the terminator) using the `vardecimal` code.
pub fn read_digit<R: BitRead>(reader: &mut R) -> Result<Digit> {
    code().read_symbol(reader)
}

/// Writes a full digit sequence terminated by `None`.
pub fn write_digits<W: BitWrite>(digits: &[u8], writer: &mut W) {
    for &d in digits {
        write_digit(Some(d), writer);
    }
    write_digit(None, writer);
}

/// Reads digits until the terminator is seen.
pub fn read_digits<R: BitRead>(reader: &mut R) -> Result<Vec<u8>> {
    let mut digits = Vec::new();
    loop {
        match read_digit(reader)? {
            Some(d) => digits.push(d),
            None => return Ok(digits),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::bits::{BitReader, BitWriter};

    #[test]
    fn alphabet_matches_length_counts() {
        assert_eq!(alphabet().len(), 11);
        assert_eq!(code().symbols().len(), 11);
    }

    #[test]
    fn digit_sequence_roundtrip() {
        for digits in [vec![], vec![0u8], vec![3, 1, 4, 1, 5, 9], vec![9; 20]] {
            let mut w = BitWriter::new();
            write_digits(&digits, &mut w);
            let bytes = w.into_bytes();
            let mut r = BitReader::new(&bytes);
            assert_eq!(read_digits(&mut r).unwrap(), digits);
        }
    }
}
