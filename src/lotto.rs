//! Lottery number generation

use rand::Rng;
use serde::Serialize;
use std::fmt;

/// Numbers per set.
pub const SET_SIZE: usize = 6;

/// Numbers are drawn from 1..=MAX_NUMBER.
pub const MAX_NUMBER: u8 = 45;

/// One group of 6 distinct numbers from 1-45, held in ascending order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NumberSet([u8; SET_SIZE]);

impl NumberSet {
    /// Build a set from parsed values. Keeps the first 6 distinct in-range
    /// values and drops the rest; returns `None` if fewer than 6 remain.
    pub fn from_values(values: &[u8]) -> Option<Self> {
        let mut picked: Vec<u8> = Vec::with_capacity(SET_SIZE);
        for &v in values {
            if (1..=MAX_NUMBER).contains(&v) && !picked.contains(&v) {
                picked.push(v);
                if picked.len() == SET_SIZE {
                    break;
                }
            }
        }
        if picked.len() < SET_SIZE {
            return None;
        }
        picked.sort_unstable();
        let mut numbers = [0u8; SET_SIZE];
        numbers.copy_from_slice(&picked);
        Some(Self(numbers))
    }

    pub fn numbers(&self) -> &[u8; SET_SIZE] {
        &self.0
    }
}

impl fmt::Display for NumberSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for n in self.0 {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{}", n)?;
            first = false;
        }
        Ok(())
    }
}

/// Draw 6 distinct numbers from 1-45 using the given random source.
///
/// Rejection sampling on duplicates: with 6 draws out of 45 the expected
/// number of rejections is small, and tests can pass a seeded rng.
pub fn generate_with<R: Rng + ?Sized>(rng: &mut R) -> NumberSet {
    let mut picked: Vec<u8> = Vec::with_capacity(SET_SIZE);
    while picked.len() < SET_SIZE {
        let n = rng.gen_range(1..=MAX_NUMBER);
        if !picked.contains(&n) {
            picked.push(n);
        }
    }
    picked.sort_unstable();
    let mut numbers = [0u8; SET_SIZE];
    numbers.copy_from_slice(&picked);
    NumberSet(numbers)
}

/// Draw a set from the thread-local random source.
pub fn generate() -> NumberSet {
    generate_with(&mut rand::thread_rng())
}

/// Color bucket for a number ball, matching the frontend display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BallColor {
    Yellow,
    Blue,
    Red,
    Gray,
    Green,
}

pub fn ball_color(n: u8) -> BallColor {
    match n {
        0..=10 => BallColor::Yellow,
        11..=20 => BallColor::Blue,
        21..=30 => BallColor::Red,
        31..=40 => BallColor::Gray,
        _ => BallColor::Green,
    }
}
