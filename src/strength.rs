//! Heuristic password strength scoring.
//!
//! Scores run from 0 to 100 and are built from length, character variety,
//! and a couple of pattern penalties.  The result is advisory only; nothing
//! in the vault refuses a weak password.

use std::fmt;

/// Coarse rating derived from a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Rating {
    VeryWeak,
    Weak,
    Medium,
    Strong,
}

impl Rating {
    /// Map a 0-100 score onto a rating.
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=25 => Self::VeryWeak,
            26..=50 => Self::Weak,
            51..=75 => Self::Medium,
            _ => Self::Strong,
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::VeryWeak => "Very Weak",
            Self::Weak => "Weak",
            Self::Medium => "Medium",
            Self::Strong => "Strong",
        };
        f.write_str(label)
    }
}

/// Result of `check_strength`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrengthReport {
    pub score: u8,
    pub rating: Rating,
    /// Human-readable suggestions, empty for a flawless password.
    pub feedback: Vec<String>,
}

const SEQUENCES: [&str; 2] = ["abcdefghijklmnopqrstuvwxyz", "0123456789"];

/// Score a password.
pub fn check_strength(password: &str) -> StrengthReport {
    let mut score: i32 = 0;
    let mut feedback = Vec::new();

    let len = password.chars().count();
    if len < 8 {
        feedback.push("Password is too short (at least 8 characters recommended)".to_string());
    } else if len >= 12 {
        score += 25;
    } else {
        score += 15;
    }

    let has_lower = password.chars().any(char::is_lowercase);
    let has_upper = password.chars().any(char::is_uppercase);
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_special = password.chars().any(|c| !c.is_alphanumeric());

    for (present, hint) in [
        (has_lower, "Add lowercase letters"),
        (has_upper, "Add uppercase letters"),
        (has_digit, "Add numbers"),
        (has_special, "Add special characters"),
    ] {
        if present {
            score += 10;
        } else {
            feedback.push(hint.to_string());
        }
    }

    if has_repeated_run(password) {
        feedback.push("Avoid repeating characters".to_string());
        score -= 10;
    }

    let lowered = password.to_lowercase();
    for sequence in SEQUENCES {
        if contains_run_of(&lowered, sequence) {
            feedback.push("Avoid sequential characters".to_string());
            score -= 10;
        }
    }

    if len > 16 {
        score += 10;
    }
    if has_lower && has_upper && has_digit && has_special {
        score += 15;
    }

    // Clamped to 0..=100 so the cast is lossless.
    let score = score.clamp(0, 100) as u8;
    StrengthReport {
        score,
        rating: Rating::from_score(score),
        feedback,
    }
}

/// Three or more identical characters in a row.
fn has_repeated_run(password: &str) -> bool {
    let chars: Vec<char> = password.chars().collect();
    chars.windows(3).any(|w| w[0] == w[1] && w[1] == w[2])
}

/// Any three consecutive characters of `sequence` appearing in `haystack`.
fn contains_run_of(haystack: &str, sequence: &str) -> bool {
    sequence
        .as_bytes()
        .windows(3)
        .filter_map(|w| std::str::from_utf8(w).ok())
        .any(|triple| haystack.contains(triple))
}
