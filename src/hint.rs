//! Math hints about the secret number.
//!
//! Predicates are checked in a fixed order and every one that holds contributes
//! a candidate line. When none applies, a single fallback describing the offset
//! from the nearest lower perfect square is produced, so the candidate list is
//! never empty for `n >= 1`.

use crate::random::RandomSource;

pub const PERFECT_SQUARE: &str = "This number is a perfect square";
pub const PRIME: &str = "Think of prime numbers";
pub const EVEN: &str = "It's an even number";
pub const DIVISIBLE_BY_3: &str = "It's divisible by 3";
pub const DIVISIBLE_BY_5: &str = "It's divisible by 5";

/// Largest `r` with `r * r <= n`.
pub fn isqrt(n: u32) -> u32 {
    let mut r = (n as f64).sqrt() as u32;
    // float rounding can land one off in either direction
    while (r as u64) * (r as u64) > n as u64 {
        r -= 1;
    }
    while ((r + 1) as u64) * ((r + 1) as u64) <= n as u64 {
        r += 1;
    }
    r
}

pub fn is_perfect_square(n: u32) -> bool {
    let r = isqrt(n);
    r * r == n
}

/// Trial division up to the square root. Numbers below 2 are not prime.
pub fn is_prime(n: u32) -> bool {
    if n < 2 {
        return false;
    }
    let limit = isqrt(n);
    (2..=limit).all(|d| n % d != 0)
}

pub fn candidates(n: u32) -> Vec<String> {
    let checks: [(bool, &str); 5] = [
        (is_perfect_square(n), PERFECT_SQUARE),
        (is_prime(n), PRIME),
        (n % 2 == 0, EVEN),
        (n % 3 == 0, DIVISIBLE_BY_3),
        (n % 5 == 0, DIVISIBLE_BY_5),
    ];
    let mut hints: Vec<String> = checks
        .iter()
        .filter(|(holds, _)| *holds)
        .map(|(_, text)| text.to_string())
        .collect();
    if hints.is_empty() {
        let root = isqrt(n);
        let nearest_square = root * root;
        hints.push(format!(
            "It's {} more than {}",
            n - nearest_square,
            nearest_square
        ));
    }
    hints
}

/// Picks one candidate uniformly.
pub fn pick(n: u32, rng: &mut dyn RandomSource) -> String {
    let mut hints = candidates(n);
    let idx = rng.index(hints.len());
    hints.swap_remove(idx)
}
