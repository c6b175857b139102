pub const CHARS_PER_WORD: f64 = 5.0;

pub fn mean(data: &[f64]) -> Option<f64> {
    let sum = data.iter().sum::<f64>();
    let count = data.len();

    match count {
        positive if positive > 0 => Some(sum / count as f64),
        _ => None,
    }
}

pub fn std_dev(data: &[f64]) -> Option<f64> {
    match (mean(data), data.len()) {
        (Some(data_mean), count) if count > 0 => {
            let variance = data
                .iter()
                .map(|value| {
                    let diff = data_mean - *value;

                    diff * diff
                })
                .sum::<f64>()
                / count as f64;

            Some(variance.sqrt())
        }
        _ => None,
    }
}

/// Unrounded words per minute; zero elapsed time yields 0.0
pub fn raw_wpm(chars: usize, elapsed_ms: i64) -> f64 {
    if elapsed_ms <= 0 {
        return 0.0;
    }
    let minutes = elapsed_ms as f64 / 60_000.0;
    chars as f64 / CHARS_PER_WORD / minutes
}

/// Words per minute rounded to the nearest whole word
pub fn wpm(chars: usize, elapsed_ms: i64) -> u32 {
    raw_wpm(chars, elapsed_ms).round() as u32
}

/// `100 - errors/len*100`, rounded and floored at 0; an empty text scores 0
pub fn accuracy(errors: usize, len: usize) -> u32 {
    if len == 0 {
        return 0;
    }
    let pct = 100.0 - (errors as f64 / len as f64) * 100.0;
    pct.round().max(0.0) as u32
}
