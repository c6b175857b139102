use include_dir::{include_dir, Dir};
use serde::Deserialize;
use serde_json::from_str;

use super::difficulty::Difficulty;
use crate::error::TextBankError;

static BANK_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/text/banks");

/// Curated practice texts for one difficulty tier
#[derive(Deserialize, Clone, Debug)]
pub struct TextBank {
    pub name: String,
    pub size: u32,
    pub texts: Vec<String>,
}

impl TextBank {
    pub fn load(difficulty: Difficulty) -> Result<Self, TextBankError> {
        read_bank_from_file(&format!("{}.json", difficulty.bank_name()))
    }
}

fn read_bank_from_file(file_name: &str) -> Result<TextBank, TextBankError> {
    let file = BANK_DIR
        .get_file(file_name)
        .ok_or_else(|| TextBankError::Missing(file_name.to_string()))?;

    let contents = file
        .contents_utf8()
        .ok_or_else(|| TextBankError::Encoding(file_name.to_string()))?;

    let bank: TextBank = from_str(contents).map_err(|source| TextBankError::Parse {
        name: file_name.to_string(),
        source,
    })?;

    if bank.texts.is_empty() {
        return Err(TextBankError::Empty(file_name.to_string()));
    }

    Ok(bank)
}
