/// Result of comparing a typed character with the target
#[derive(Clone, Debug, Copy, PartialEq, Eq)]
pub enum Outcome {
    Correct,
    Incorrect,
}

/// How an input-change relates to the previous value
#[derive(Clone, Debug, Copy, PartialEq, Eq)]
pub enum Edit {
    /// Value grew; carries the last character of the new value
    Append(char),
    Delete,
    Unchanged,
}

/// Classify a whole-value change by character length
pub fn classify_edit(previous: &str, next: &str) -> Edit {
    let prev_len = previous.chars().count();
    let next_len = next.chars().count();

    if next_len > prev_len {
        match next.chars().last() {
            Some(c) => Edit::Append(c),
            None => Edit::Unchanged,
        }
    } else if next_len < prev_len {
        Edit::Delete
    } else {
        Edit::Unchanged
    }
}

/// Judge the character typed at `idx` (0-based, in chars). Typing past the
/// end of the target is always incorrect.
pub fn judge(target: &str, idx: usize, typed: char) -> Outcome {
    match target.chars().nth(idx) {
        Some(expected) if expected == typed => Outcome::Correct,
        _ => Outcome::Incorrect,
    }
}

/// Histogram key for a mistyped character
pub fn error_key(typed: char) -> char {
    typed.to_lowercase().next().unwrap_or(typed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_append_delete_unchanged() {
        assert_eq!(classify_edit("ca", "cat"), Edit::Append('t'));
        assert_eq!(classify_edit("cat", "ca"), Edit::Delete);
        assert_eq!(classify_edit("cat", "cat"), Edit::Unchanged);
        assert_eq!(classify_edit("", "c"), Edit::Append('c'));
    }

    #[test]
    fn classify_counts_chars_not_bytes() {
        assert_eq!(classify_edit("é", "ée"), Edit::Append('e'));
        assert_eq!(classify_edit("ab", "é"), Edit::Delete);
    }

    #[test]
    fn judge_compares_against_expected_position() {
        assert_eq!(judge("cat", 0, 'c'), Outcome::Correct);
        assert_eq!(judge("cat", 1, 'x'), Outcome::Incorrect);
        assert_eq!(judge("cat", 1, 'A'), Outcome::Incorrect);
    }

    #[test]
    fn judge_past_end_is_incorrect() {
        assert_eq!(judge("cat", 3, 't'), Outcome::Incorrect);
    }

    #[test]
    fn error_key_folds_case() {
        assert_eq!(error_key('X'), 'x');
        assert_eq!(error_key(' '), ' ');
        assert_eq!(error_key('7'), '7');
    }
}
