//! Salary text parsing
//!
//! Compensation is published as free text such as `"60 000 – 90 000 руб."`,
//! `"от 120 000 руб."` or `"1 500–2 000 USD"`. Only amounts in the target
//! currency are usable; the site marks foreign currencies with an uppercase
//! Latin code, while the target currency is written in Cyrillic.

/// Characters that close a numeric token
const SEPARATORS: [char; 4] = ['-', '–', '—', '.'];

/// Numeric tokens found in one salary fragment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SalaryRange {
    values: Vec<u64>,
}

impl SalaryRange {
    /// Scans a fragment and collects its numeric tokens
    ///
    /// Digits accumulate into the current token and a separator closes it.
    /// Whitespace and every other character are ignored, so digit groups
    /// split by spaces join into one number. Returns `None` as soon as an
    /// uppercase Latin letter is seen, or when a token does not fit in `u64`.
    pub fn scan(fragment: &str) -> Option<Self> {
        let mut values = Vec::new();
        let mut token = String::new();

        for c in fragment.chars() {
            if c.is_ascii_digit() {
                token.push(c);
            } else if SEPARATORS.contains(&c) {
                close_token(&mut token, &mut values)?;
            } else if c.is_ascii_uppercase() {
                return None;
            }
        }
        close_token(&mut token, &mut values)?;

        Some(Self { values })
    }

    /// The tokens in the order they appeared
    pub fn values(&self) -> &[u64] {
        &self.values
    }

    /// Arithmetic mean of the tokens, truncated
    ///
    /// `None` when no token was found or the sum overflows.
    pub fn representative(&self) -> Option<u64> {
        if self.values.is_empty() {
            return None;
        }

        let sum = self
            .values
            .iter()
            .try_fold(0u64, |acc, value| acc.checked_add(*value))?;

        Some(sum / self.values.len() as u64)
    }
}

fn close_token(token: &mut String, values: &mut Vec<u64>) -> Option<()> {
    if token.is_empty() {
        return Some(());
    }

    let value = token.parse::<u64>().ok()?;
    values.push(value);
    token.clear();
    Some(())
}

/// Reduces a salary fragment to one representative positive amount
///
/// Returns `None` when the fragment is not usable: foreign currency, no
/// numeric token, or a representative value of zero.
///
/// # Example
///
/// ```
/// use vacancy_finder::site::parse_salary;
///
/// assert_eq!(parse_salary("60 000–90 000 руб."), Some(75000));
/// assert_eq!(parse_salary("от 50 000 руб."), Some(50000));
/// assert_eq!(parse_salary("1 000–2 000 USD"), None);
/// ```
pub fn parse_salary(fragment: &str) -> Option<u64> {
    SalaryRange::scan(fragment)?
        .representative()
        .filter(|value| *value > 0)
}
