//! Difficulty presets. Each preset fixes the upper bound of the guess range.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    /// All presets in selector order.
    pub fn all() -> [Difficulty; 3] {
        [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard]
    }

    pub fn max_number(&self) -> u32 {
        match self {
            Difficulty::Easy => 50,
            Difficulty::Medium => 100,
            Difficulty::Hard => 200,
        }
    }

    /// Stable name, used both as the selector value and in storage keys.
    pub fn name(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn label(&self) -> String {
        format!("{} (1-{})", self.name(), self.max_number())
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown difficulty '{0}'")]
pub struct UnknownDifficulty(pub String);

impl FromStr for Difficulty {
    type Err = UnknownDifficulty;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Difficulty::all()
            .into_iter()
            .find(|d| d.name() == s)
            .ok_or_else(|| UnknownDifficulty(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_numbers_follow_table() {
        assert_eq!(Difficulty::Easy.max_number(), 50);
        assert_eq!(Difficulty::Medium.max_number(), 100);
        assert_eq!(Difficulty::Hard.max_number(), 200);
    }

    #[test]
    fn parses_selector_values() {
        for d in Difficulty::all() {
            assert_eq!(d.name().parse::<Difficulty>(), Ok(d));
        }
        assert!("Nightmare".parse::<Difficulty>().is_err());
        assert!("easy".parse::<Difficulty>().is_err());
    }

    #[test]
    fn label_shows_range() {
        assert_eq!(Difficulty::Hard.label(), "Hard (1-200)");
        assert_eq!(Difficulty::default(), Difficulty::Medium);
    }
}
