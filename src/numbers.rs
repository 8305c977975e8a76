//! Number theory helpers and the "story" a secret number tells about itself.

use serde::Serialize;

use crate::catalog::special_number;

pub fn is_prime(n: u32) -> bool {
    if n < 2 {
        return false;
    }
    let n = n as u64;
    let mut i = 2u64;
    while i * i <= n {
        if n % i == 0 {
            return false;
        }
        i += 1;
    }
    true
}

pub fn is_perfect_square(n: u32) -> bool {
    let root = n.isqrt();
    root * root == n
}

pub fn is_fibonacci(n: u32) -> bool {
    if n == 0 {
        return true;
    }
    let (mut a, mut b) = (0u64, 1u64);
    while b < n as u64 {
        (a, b) = (b, a + b);
    }
    b == n as u64
}

/// Anything that makes a number eligible for the special-biased draw.
pub fn is_interesting(n: u32) -> bool {
    is_prime(n) || is_perfect_square(n) || is_fibonacci(n) || special_number(n).is_some()
}

/// Property tags the UI shows next to the story fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NumberTag {
    Prime,
    Square,
    Fibonacci,
    Even,
    Odd,
}

/// Spoiler-free description of a secret number plus the reveal shown on a win.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NumberProfile {
    pub tags: Vec<NumberTag>,
    /// Headline without the number itself (shown while the round is live).
    pub title: String,
    pub story: String,
    pub hint: String,
    pub emoji: &'static str,
}

impl NumberProfile {
    pub fn of(n: u32) -> Self {
        let prime = is_prime(n);
        let square = is_perfect_square(n);
        let fib = is_fibonacci(n);

        let mut tags = Vec::with_capacity(3);
        if prime {
            tags.push(NumberTag::Prime);
        }
        if square {
            tags.push(NumberTag::Square);
        }
        if fib {
            tags.push(NumberTag::Fibonacci);
        }
        tags.push(if n % 2 == 0 { NumberTag::Even } else { NumberTag::Odd });

        let (title, story, hint, emoji): (String, &str, &str, &'static str) =
            if let Some(special) = special_number(n) {
                (
                    special.name.to_string(),
                    special.description,
                    "A legendary mathematical constant awaits discovery!",
                    "🌟",
                )
            } else if prime {
                (
                    "Prime Number".into(),
                    "A fundamental building block of mathematics, divisible only by 1 and itself.",
                    "Prime energy resonates through the cosmos!",
                    "✨",
                )
            } else if square {
                (
                    "Perfect Square".into(),
                    "Forms a perfect geometric pattern in the cosmic grid.",
                    "Geometric harmony detected in the quantum field!",
                    "🔷",
                )
            } else if fib {
                (
                    "Fibonacci Number".into(),
                    "Part of nature's favorite sequence, appearing in sunflowers and galaxies alike.",
                    "Golden ratio harmonics echo through space-time!",
                    "📐",
                )
            } else if n % 2 == 0 {
                (
                    "Even Number".into(),
                    "Balanced cosmic energy flows through this number.",
                    "Even frequencies pulse through the universe!",
                    "⚡",
                )
            } else {
                (
                    "Odd Number".into(),
                    "Unique asymmetric vibrations characterize this cosmic value.",
                    "Odd resonances create complex cosmic patterns!",
                    "🌀",
                )
            };

        Self {
            tags,
            title,
            story: story.to_string(),
            hint: hint.to_string(),
            emoji,
        }
    }

    /// Story shown after a classic win, now that the number can be named.
    pub fn reveal(&self, n: u32) -> String {
        let plain = !self
            .tags
            .iter()
            .any(|t| matches!(t, NumberTag::Prime | NumberTag::Square | NumberTag::Fibonacci));
        if plain && special_number(n).is_none() {
            return format!(
                "Cosmic Number {n}: This number holds unique significance in the mathematical universe..."
            );
        }
        if is_perfect_square(n) && special_number(n).is_none() && !is_prime(n) {
            let root = n.isqrt();
            return format!(
                "{} {}: Forms a perfect {}×{} geometric pattern in the cosmic grid.",
                self.title, n, root, root
            );
        }
        format!("{} {}: {}", self.title, n, self.story)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primes() {
        assert!(!is_prime(0));
        assert!(!is_prime(1));
        assert!(is_prime(2));
        assert!(is_prime(3));
        assert!(!is_prime(9));
        assert!(is_prime(97));
        assert!(!is_prime(221)); // 13 * 17
    }

    #[test]
    fn test_perfect_squares() {
        for sq in [0, 1, 4, 9, 16, 25, 400, 484] {
            assert!(is_perfect_square(sq), "{sq}");
        }
        for n in [2, 3, 5, 99, 401] {
            assert!(!is_perfect_square(n), "{n}");
        }
    }

    #[test]
    fn test_fibonacci_membership() {
        for n in [0, 1, 2, 3, 5, 8, 13, 21, 34, 55, 89] {
            assert!(is_fibonacci(n), "{n}");
        }
        for n in [4, 6, 7, 9, 10] {
            assert!(!is_fibonacci(n), "{n}");
        }
    }

    #[test]
    fn test_profile_headline_priority() {
        // 7 is prime, but the legendary record wins.
        let p = NumberProfile::of(7);
        assert_eq!(p.title, "Lucky Seven");
        assert_eq!(p.tags, vec![NumberTag::Prime, NumberTag::Odd]);

        // 1 is both a square and Fibonacci; square comes first.
        assert_eq!(NumberProfile::of(1).title, "Perfect Square");
        assert_eq!(NumberProfile::of(21).title, "Fibonacci Number");
        assert_eq!(NumberProfile::of(50).title, "Even Number");
        assert_eq!(NumberProfile::of(51).title, "Odd Number");
    }

    #[test]
    fn test_profile_hint_hides_number() {
        let p = NumberProfile::of(137);
        assert!(!p.hint.contains("137"));
        assert!(p.reveal(137).contains("137"));
        assert!(NumberProfile::of(49).reveal(49).contains("7×7"));
    }

    #[test]
    fn test_plain_numbers_reveal_as_cosmic() {
        assert_eq!(
            NumberProfile::of(50).reveal(50),
            "Cosmic Number 50: This number holds unique significance in the mathematical universe..."
        );
        assert!(NumberProfile::of(51).reveal(51).starts_with("Cosmic Number 51:"));
        assert!(NumberProfile::of(21).reveal(21).starts_with("Fibonacci Number 21:"));
        assert!(NumberProfile::of(42).reveal(42).starts_with("Answer to Everything 42:"));
    }
}
