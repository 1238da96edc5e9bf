/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! A canonical Huffman encoder/decoder.
//!
//! Codes are assigned in order of increasing length, and within a
//! length in order of the symbol's position in [`CanonicalCode::symbols`].
//! This makes the code fully determined by a length-count histogram
//! plus a symbol permutation, which is what [`CanonicalCode::write_codebook`]
//! serializes: a header recording how many symbols get each length,
//! followed by each symbol's index into a known, shrinking alphabet.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};
use std::hash::Hash;

use crate::bits::{BitRead, BitWrite};
use crate::error::{Error, Result};

/// A canonical Huffman code over a sequence of symbols of type `T`.
#[derive(Debug, Clone)]
pub struct CanonicalCode<T> {
    /// Symbols in canonical order (increasing length, then arrival order
    /// within a length).
    symbols: Vec<T>,
    /// `length_counts[i]` is the number of symbols with code length `i + 1`.
    length_counts: Vec<u32>,
}

/// Yields `(count, slots)` for each declared length: `slots` starts at 2
/// and `slots_next = (slots - count) << 1`.
fn length_slots(length_counts: &[u32]) -> impl Iterator<Item = (u32, u32)> + '_ {
    let mut slots = 2u32;
    length_counts.iter().map(move |&count| {
        let this_slots = slots;
        slots = (slots - count) << 1;
        (count, this_slots)
    })
}

/// Number of bits needed to represent any value in `0..len`.
fn index_bits(len: usize) -> u32 {
    crate::util::bit_width(len)
}

impl<T: Clone + PartialEq> CanonicalCode<T> {
    /// Constructs a canonical code from an explicit symbol order and
    /// length-count histogram, validating completeness.
    ///
    /// Fails if there are fewer than two symbols, if the counts don't
    /// sum to the number of symbols, if any length's count exceeds its
    /// available slots, if the code is incomplete, or if symbols repeat.
    pub fn from_parts(symbols: Vec<T>, length_counts: Vec<u32>) -> Result<Self> {
        if symbols.len() < 2 {
            return Err(Error::Invariant("two or more symbols required".into()));
        }
        if symbols.len() as u32 != length_counts.iter().sum::<u32>() {
            return Err(Error::Invariant("symbol/code count mismatch".into()));
        }
        for i in 0..symbols.len() {
            for j in i + 1..symbols.len() {
                if symbols[i] == symbols[j] {
                    return Err(Error::Invariant("symbols are not unique".into()));
                }
            }
        }

        let mut last_count = 0;
        let mut last_slots = 0;
        for (count, slots) in length_slots(&length_counts) {
            if count > slots {
                return Err(Error::Invariant(
                    "not enough codes available for length".into(),
                ));
            }
            last_count = count;
            last_slots = slots;
        }
        if last_count < last_slots {
            return Err(Error::Invariant("incomplete Huffman code".into()));
        }

        Ok(Self {
            symbols,
            length_counts,
        })
    }

    /// Symbols in canonical order.
    pub fn symbols(&self) -> &[T] {
        &self.symbols
    }

    /// Writes `symbol` to `writer` using this code.
    ///
    /// Panics if `symbol` is not part of this code (an encoder-side
    /// invariant: callers must only encode symbols they accounted for
    /// when building the codebook).
    pub fn write_symbol<W: BitWrite>(&self, symbol: &T, writer: &mut W) {
        let mut code = 0u64;
        let mut index = 0usize;
        for (length, &count) in self.length_counts.iter().enumerate() {
            let length = (length + 1) as u32;
            for x in 0..count as usize {
                if &self.symbols[index + x] == symbol {
                    writer.write_uint(code + x as u64, length);
                    return;
                }
            }
            code = (code + count as u64) << 1;
            index += count as usize;
        }
        panic!("symbol not present in this canonical code");
    }

    /// Reads a symbol from `reader` using this code.
    pub fn read_symbol<R: BitRead>(&self, reader: &mut R) -> Result<T> {
        let mut code = 0u64;
        let mut first = 0u64;
        let mut index = 0usize;
        for &count in &self.length_counts {
            code = (code << 1) | reader.read_uint(1)?;
            if code.wrapping_sub(first) < count as u64 && code >= first {
                return Ok(self.symbols[index + (code - first) as usize].clone());
            }
            index += count as usize;
            first = (first + count as u64) << 1;
        }
        Err(Error::Decode(
            "max code length exceeded while reading symbol".into(),
        ))
    }

    /// Serializes the codebook's length-count histogram followed by
    /// each symbol's index into `alphabet`, which shrinks by one entry
    /// after each symbol is placed.
    pub fn write_codebook<W: BitWrite>(&self, alphabet: &[T], writer: &mut W) {
        for (count, slots) in length_slots(&self.length_counts) {
            let count_bits = bit_length(slots as u64);
            writer.write_uint(count as u64, count_bits);
        }

        let mut remaining: Vec<T> = alphabet.to_vec();
        for symbol in &self.symbols {
            let len_bits = index_bits(remaining.len());
            let index = remaining
                .iter()
                .position(|s| s == symbol)
                .expect("symbol not present in alphabet");
            writer.write_uint(index as u64, len_bits);
            remaining.remove(index);
        }
    }

    /// Reads a codebook serialized by [`Self::write_codebook`] against
    /// the same `alphabet`.
    pub fn read_from_codebook<R: BitRead>(reader: &mut R, alphabet: &[T]) -> Result<Self> {
        let mut remaining: Vec<T> = alphabet.to_vec();
        let mut length_counts = Vec::new();

        let mut slots = 2u32;
        while slots != 0 {
            let count_bits = bit_length(slots as u64);
            let count = reader.read_uint(count_bits)? as u32;
            length_counts.push(count);
            slots = (slots - count) << 1;
        }

        let num_symbols: u32 = length_counts.iter().sum();
        let mut symbols = Vec::with_capacity(num_symbols as usize);
        for _ in 0..num_symbols {
            let len_bits = index_bits(remaining.len());
            let index = reader.read_uint(len_bits)? as usize;
            if index >= remaining.len() {
                return Err(Error::Decode("codebook alphabet index out of range".into()));
            }
            symbols.push(remaining.remove(index));
        }

        Self::from_parts(symbols, length_counts)
    }
}

impl<T: Clone + PartialEq + Eq + Hash + Ord> CanonicalCode<T> {
    /// Builds a canonical code from symbol frequencies. Requires at
    /// least two distinct symbols.
    pub fn from_counts(counts: &[(T, u64)]) -> Result<Self> {
        #[derive(Eq, PartialEq)]
        struct HeapEntry<T> {
            weight: u64,
            // Decreasing insertion order breaks ties in a stable,
            // deterministic way without requiring T: Ord on leaves.
            seq: std::cmp::Reverse<u64>,
            node: Node<T>,
        }
        impl<T: Eq> Ord for HeapEntry<T> {
            fn cmp(&self, other: &Self) -> Ordering {
                other
                    .weight
                    .cmp(&self.weight)
                    .then_with(|| other.seq.cmp(&self.seq))
            }
        }
        impl<T: Eq> PartialOrd for HeapEntry<T> {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }
        enum Node<T> {
            Leaf(T),
            Internal(Box<Node<T>>, Box<Node<T>>),
        }

        let mut heap = BinaryHeap::new();
        let mut seq = 0u64;
        for (symbol, weight) in counts {
            heap.push(HeapEntry {
                weight: *weight,
                seq: std::cmp::Reverse(seq),
                node: Node::Leaf(symbol.clone()),
            });
            seq += 1;
        }

        if heap.len() < 2 {
            return Err(Error::Invariant("two or more symbols required".into()));
        }

        while heap.len() > 1 {
            let a = heap.pop().unwrap();
            let b = heap.pop().unwrap();
            heap.push(HeapEntry {
                weight: a.weight + b.weight,
                seq: std::cmp::Reverse(seq),
                node: Node::Internal(Box::new(a.node), Box::new(b.node)),
            });
            seq += 1;
        }

        let root = heap.pop().unwrap().node;
        let mut lengths: HashMap<T, u32> = HashMap::new();
        fn walk<T: Eq + Hash>(node: &Node<T>, depth: u32, lengths: &mut HashMap<T, u32>)
        where
            T: Clone,
        {
            match node {
                Node::Leaf(symbol) => {
                    lengths.insert(symbol.clone(), depth);
                }
                Node::Internal(left, right) => {
                    walk(left, depth + 1, lengths);
                    walk(right, depth + 1, lengths);
                }
            }
        }
        walk(&root, 0, &mut lengths);

        let mut symbols: Vec<T> = lengths.keys().cloned().collect();
        symbols.sort_by_key(|s| lengths[s]);
        let max_len = *lengths.values().max().unwrap();
        let mut length_counts = vec![0u32; max_len as usize];
        for &len in lengths.values() {
            length_counts[(len - 1) as usize] += 1;
        }

        Self::from_parts(symbols, length_counts)
    }
}

/// Python-style `int.bit_length`: the number of bits needed to
/// represent `v`, with `bit_length(0) == 0`.
fn bit_length(v: u64) -> u32 {
    64 - v.leading_zeros()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn canonical_construction() {
        let code =
            CanonicalCode::from_parts(vec!['a', 'b', 'c', 'd'], vec![1, 1, 2]).unwrap();
        let mut w = crate::bits::BitWriter::new();
        for c in ['a', 'b', 'c', 'd'] {
            code.write_symbol(&c, &mut w);
        }
        let bytes = w.into_bytes();
        let mut r = crate::bits::BitReader::new(&bytes);
        for expect in ['a', 'b', 'c', 'd'] {
            assert_eq!(code.read_symbol(&mut r).unwrap(), expect);
        }
    }

    #[test]
    fn rejects_single_symbol() {
        assert!(CanonicalCode::from_parts(vec!['a'], vec![1]).is_err());
    }

    #[test]
    fn rejects_count_mismatch() {
        assert!(CanonicalCode::from_parts(vec!['a', 'b'], vec![1]).is_err());
    }

    #[test]
    fn rejects_slot_overflow() {
        // length 1 can hold at most 2 codes.
        assert!(CanonicalCode::from_parts(vec!['a', 'b', 'c'], vec![3]).is_err());
    }

    #[test]
    fn rejects_incomplete_code() {
        // one symbol of length 1 leaves a slot unused.
        assert!(CanonicalCode::from_parts(vec!['a'], vec![1, 0]).is_err());
    }

    #[test]
    fn rejects_duplicate_symbols() {
        assert!(CanonicalCode::from_parts(vec!['a', 'a'], vec![2]).is_err());
    }

    #[test]
    fn codebook_roundtrip_over_shrinking_alphabet() {
        let alphabet = vec!["Identifier", "Literal", "CallExpression", "MemberExpression"];
        let counts = vec![
            ("Identifier".to_string(), 10u64),
            ("Literal".to_string(), 4),
            ("CallExpression".to_string(), 2),
            ("MemberExpression".to_string(), 1),
        ];
        let alphabet_owned: Vec<String> = alphabet.iter().map(|s| s.to_string()).collect();
        let code = CanonicalCode::from_counts(&counts).unwrap();

        let mut w = crate::bits::BitWriter::new();
        code.write_codebook(&alphabet_owned, &mut w);
        let bytes = w.into_bytes();
        let mut r = crate::bits::BitReader::new(&bytes);
        let decoded = CanonicalCode::read_from_codebook(&mut r, &alphabet_owned).unwrap();
        assert_eq!(decoded.symbols(), code.symbols());
    }

    #[test]
    fn huffman_message_roundtrip() {
        // English-letter-ish frequency skew, matching the flavor of
        // dsi-bitstream's own Huffman test table.
        let counts = vec![
            ('e', 127u64),
            ('t', 91),
            ('a', 82),
            ('o', 75),
            ('i', 70),
            ('n', 67),
            ('z', 1),
        ];
        let code = CanonicalCode::from_counts(&counts).unwrap();
        let message: Vec<char> = "eaten at noon".chars().filter(|c| *c != ' ').collect();

        let mut w = crate::bits::BitWriter::new();
        for c in &message {
            code.write_symbol(c, &mut w);
        }
        let bytes = w.into_bytes();
        let mut r = crate::bits::BitReader::new(&bytes);
        for expect in &message {
            assert_eq!(code.read_symbol(&mut r).unwrap(), *expect);
        }
    }
}
