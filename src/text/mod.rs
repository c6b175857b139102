pub mod bank;
pub mod difficulty;

pub use bank::TextBank;
pub use difficulty::Difficulty;

use itertools::Itertools;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::{TextBankError, ValidationError, MIN_CUSTOM_TEXT_CHARS};

/// Where the current practice text came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSource {
    Random,
    Custom,
}

/// Picks practice texts. Holds no session state; the only thing that varies
/// between calls is the random source.
#[derive(Debug)]
pub struct TextProvider {
    easy: TextBank,
    medium: TextBank,
    hard: TextBank,
    rng: StdRng,
}

impl TextProvider {
    pub fn new() -> Result<Self, TextBankError> {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Deterministic provider, same seed gives the same sequence of texts
    pub fn with_seed(seed: u64) -> Result<Self, TextBankError> {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Result<Self, TextBankError> {
        Ok(Self {
            easy: TextBank::load(Difficulty::Easy)?,
            medium: TextBank::load(Difficulty::Medium)?,
            hard: TextBank::load(Difficulty::Hard)?,
            rng,
        })
    }

    pub fn bank(&self, difficulty: Difficulty) -> &TextBank {
        match difficulty {
            Difficulty::Easy => &self.easy,
            Difficulty::Medium => &self.medium,
            Difficulty::Hard => &self.hard,
        }
    }

    /// Uniformly choose one curated text of the given tier
    pub fn generate(&mut self, difficulty: Difficulty) -> String {
        let bank = match difficulty {
            Difficulty::Easy => &self.easy,
            Difficulty::Medium => &self.medium,
            Difficulty::Hard => &self.hard,
        };
        // banks are checked non-empty at load time
        bank.texts.choose(&mut self.rng).cloned().unwrap_or_default()
    }

    /// Validate a user-supplied text. Every whitespace run, line breaks and
    /// tabs included, becomes a single space so the text stays typeable.
    pub fn accept_custom(text: &str) -> Result<String, ValidationError> {
        let normalized = text.split_whitespace().join(" ");
        let actual = normalized.chars().count();
        if actual < MIN_CUSTOM_TEXT_CHARS {
            return Err(ValidationError::CustomTextTooShort {
                min: MIN_CUSTOM_TEXT_CHARS,
                actual,
            });
        }
        Ok(normalized)
    }
}
