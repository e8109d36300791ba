//! Letters and the permutation tables built from them.
//!
//! A `DoubleMap` stores a permutation twice in a row, so `map[l + offset]` is
//! valid for any `l, offset < 26` and no modulo is needed in the hot loops.

use crate::error::{BombeError, Result};
use lazy_static::lazy_static;

pub type Letter = u8;

pub const NUM_LETTERS: usize = 26;

pub type SingleMap = [Letter; NUM_LETTERS];
pub type DoubleMap = [Letter; 2 * NUM_LETTERS];

lazy_static! {
    /// Identity table. `NULL_MAP[a + b]` is `(a + b) % 26` for `a, b < 26`.
    pub static ref NULL_MAP: DoubleMap = {
        let mut map = [0; 2 * NUM_LETTERS];
        for (k, slot) in map.iter_mut().take(NUM_LETTERS).enumerate() {
            *slot = k as Letter;
        }
        extend_map(&mut map);
        map
    };
}

pub fn letter_of(ch: char) -> Result<Letter> {
    let upper = ch.to_ascii_uppercase();
    if upper.is_ascii_uppercase() {
        Ok(upper as u8 - b'A')
    } else {
        Err(BombeError::InvalidInput(format!("'{}' is not a letter", ch)))
    }
}

/// Passes `letter` through when it is in the alphabet.
pub fn check_letter(letter: Letter) -> Result<Letter> {
    if (letter as usize) < NUM_LETTERS {
        Ok(letter)
    } else {
        Err(BombeError::InvalidInput(format!("letter {} out of bound", letter)))
    }
}

pub fn char_of(letter: Letter) -> Result<char> {
    Ok((b'A' + check_letter(letter)?) as char)
}

pub fn letters_of(text: &str) -> Result<Vec<Letter>> {
    text.chars().map(letter_of).collect()
}

pub fn chars_of(letters: &[Letter]) -> Result<String> {
    letters.iter().map(|&l| char_of(l)).collect()
}

/// Copies the first 26 entries into the upper half.
pub fn extend_map(map: &mut DoubleMap) {
    let (lower, upper) = map.split_at_mut(NUM_LETTERS);
    upper.copy_from_slice(lower);
}

/// Renders the first 26 entries of a table as letters.
pub fn map_to_string(map: &[Letter]) -> String {
    map.iter()
        .take(NUM_LETTERS)
        .map(|&l| char_of(l).unwrap_or('?'))
        .collect()
}

/// Checks that every letter is paired with a different letter which pairs
/// back to it.
pub fn assert_reciprocal(map: &[Letter]) -> Result<()> {
    if map.len() < NUM_LETTERS {
        return Err(BombeError::InvariantViolation(format!(
            "table holds {} letters",
            map.len()
        )));
    }

    for (l1, &l2) in map.iter().take(NUM_LETTERS).enumerate() {
        if l2 as usize >= NUM_LETTERS || map[l2 as usize] as usize != l1 || l2 as usize == l1 {
            return Err(BombeError::InvariantViolation(format!(
                "table {} is not reciprocal at {}",
                map_to_string(map),
                (b'A' + l1 as u8) as char
            )));
        }
    }

    Ok(())
}
