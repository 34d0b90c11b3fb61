use std::sync::OnceLock;

use regex::Regex;

fn re_numeric_run() -> &'static Regex {
    static R: OnceLock<Regex> = OnceLock::new();
    R.get_or_init(|| Regex::new(r"\d(?:[\d.,]|\s)*\d|\d").expect("invalid regex"))
}

/// Pull the first monetary amount out of `raw` and normalize it to
/// `"<lira>.<kuruş> TL"` (or `"<lira> TL"` when no kuruş part is present).
///
/// OCR output and model answers mix Turkish and English conventions:
/// `45,90`, `45.90`, `1.234,56 TL`, `TOPLAM: 45 , 90`. A trailing group of
/// one or two digits after the last separator is taken as kuruş; every
/// other separator is a thousands mark and dropped.
pub fn normalize_amount(raw: &str) -> Option<String> {
    let run: String = re_numeric_run()
        .find(raw)?
        .as_str()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    let (whole, kurus) = match run.rfind(['.', ',']) {
        Some(idx) if (1..=2).contains(&(run.len() - idx - 1)) => {
            (&run[..idx], Some(&run[idx + 1..]))
        }
        _ => (run.as_str(), None),
    };

    let lira: String = whole.chars().filter(|c| c.is_ascii_digit()).collect();
    if lira.is_empty() {
        return None;
    }
    let trimmed = lira.trim_start_matches('0');
    let lira = if trimmed.is_empty() { "0" } else { trimmed };

    Some(match kurus {
        Some(k) => format!("{lira}.{k:0<2} TL"),
        None => format!("{lira} TL"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comma_decimal_separator() {
        assert_eq!(normalize_amount("45,90"), Some("45.90 TL".to_string()));
    }

    #[test]
    fn dot_decimal_separator() {
        assert_eq!(normalize_amount("100.75 TL"), Some("100.75 TL".to_string()));
    }

    #[test]
    fn thousands_marks_are_dropped() {
        assert_eq!(normalize_amount("1.234,56"), Some("1234.56 TL".to_string()));
        assert_eq!(normalize_amount("1,234.56 TL"), Some("1234.56 TL".to_string()));
    }

    #[test]
    fn integer_amount_keeps_no_kurus() {
        assert_eq!(normalize_amount("Total 120"), Some("120 TL".to_string()));
    }

    #[test]
    fn single_kurus_digit_is_padded() {
        assert_eq!(normalize_amount("45,9"), Some("45.90 TL".to_string()));
    }

    #[test]
    fn spaces_around_the_separator_are_stripped() {
        assert_eq!(normalize_amount("TOPLAM : 45 , 90 *"), Some("45.90 TL".to_string()));
    }

    #[test]
    fn leading_zeros_are_trimmed() {
        assert_eq!(normalize_amount("007,50"), Some("7.50 TL".to_string()));
        assert_eq!(normalize_amount("0,99"), Some("0.99 TL".to_string()));
    }

    #[test]
    fn no_digits_means_no_amount() {
        assert_eq!(normalize_amount("bedava"), None);
        assert_eq!(normalize_amount(""), None);
    }
}
