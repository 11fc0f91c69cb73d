//! Candidate Keyspace
//!
//! Maps the integer index space `[0, alphabet^length)` onto fixed-length words and
//! splits it into contiguous partitions. The manager and every worker compute the
//! same bounds from the same assignment fields, so nothing but the assignment
//! itself has to travel over the wire.
//!
//! ## Layout
//! - Words are the base-`alphabet.len()` representation of their index, most
//!   significant digit first, always exactly `length` characters wide.
//! - Partition `i` of `n` covers `[chunk * i, chunk * (i + 1))` with
//!   `chunk = total / n`; the last partition is stretched to `total` to absorb
//!   the remainder.

use std::ops::Range;

#[derive(Debug, Clone)]
pub struct Keyspace {
    alphabet: Vec<char>,
    length: u32,
    total: u128,
}

impl Keyspace {
    /// Builds the keyspace of all `length`-character words over `alphabet`.
    ///
    /// Returns `None` for an empty alphabet, a zero length, a length above
    /// `u128::BITS`, or a space whose size does not fit in a `u128`.
    pub fn new(alphabet: &str, length: u32) -> Option<Self> {
        let alphabet: Vec<char> = alphabet.chars().collect();
        // a single-character alphabet never overflows, so bound the width directly
        if alphabet.is_empty() || length == 0 || length > u128::BITS {
            return None;
        }

        let total = (alphabet.len() as u128).checked_pow(length)?;

        Some(Self {
            alphabet,
            length,
            total,
        })
    }

    /// Number of candidate words.
    pub fn total(&self) -> u128 {
        self.total
    }

    pub fn length(&self) -> u32 {
        self.length
    }

    /// Index range owned by `part_number` out of `part_count` partitions.
    pub fn partition(&self, part_number: u32, part_count: u32) -> Option<Range<u128>> {
        if part_count == 0 || part_number >= part_count {
            return None;
        }

        let chunk = self.total / part_count as u128;
        let low = chunk * part_number as u128;
        let high = if part_number == part_count - 1 {
            self.total
        } else {
            chunk * (part_number as u128 + 1)
        };

        Some(low..high)
    }

    /// The word at `index`. Indices past the end wrap around modulo `total`.
    pub fn word_at(&self, index: u128) -> String {
        self.digits_of(index)
            .into_iter()
            .map(|digit| self.alphabet[digit])
            .collect()
    }

    /// Words of `range` in ascending index order.
    pub fn words(&self, range: Range<u128>) -> Words<'_> {
        let end = range.end.min(self.total);
        let remaining = end.saturating_sub(range.start);

        Words {
            alphabet: &self.alphabet,
            digits: self.digits_of(range.start),
            remaining,
        }
    }

    fn digits_of(&self, mut index: u128) -> Vec<usize> {
        let base = self.alphabet.len() as u128;
        let mut digits = vec![0usize; self.length as usize];

        for slot in digits.iter_mut().rev() {
            *slot = (index % base) as usize;
            index /= base;
        }

        digits
    }
}

/// Odometer over consecutive keyspace indices.
///
/// Advancing the digit vector in place avoids a division per digit per word.
pub struct Words<'a> {
    alphabet: &'a [char],
    digits: Vec<usize>,
    remaining: u128,
}

impl Words<'_> {
    fn advance(&mut self) {
        for digit in self.digits.iter_mut().rev() {
            *digit += 1;
            if *digit < self.alphabet.len() {
                return;
            }
            *digit = 0;
        }
    }
}

impl Iterator for Words<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.remaining == 0 {
            return None;
        }

        let word = self.digits.iter().map(|&digit| self.alphabet[digit]).collect();

        self.remaining -= 1;
        if self.remaining > 0 {
            self.advance();
        }

        Some(word)
    }
}
