//! Salary statistics over collected listings
//!
//! This module provides functionality for reducing a listing set into
//! order statistics and comparing several queries side by side.

use crate::site::Listing;
use crate::StatsError;
use std::fmt::Write as _;

/// Salary statistics for one query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statistics {
    /// The query text, trimmed
    pub label: String,

    /// Number of listings
    pub count: usize,

    pub minimum: u64,

    /// Arithmetic mean, truncated
    pub average: u64,

    /// Element at index `count / 2` of the sorted salaries
    pub median: u64,

    /// Element at index `count * 90 / 100` of the sorted salaries
    pub percentile90: u64,

    pub maximum: u64,
}

impl Statistics {
    /// Reduces `listings` into statistics labelled with `label`
    ///
    /// Percentiles pick an element of the sorted salaries, never interpolate.
    ///
    /// # Returns
    ///
    /// * `Ok(Statistics)` - At least one listing was given
    /// * `Err(StatsError::EmptyListingSet)` - `listings` is empty
    pub fn compute(label: &str, listings: &[Listing]) -> Result<Self, StatsError> {
        let mut salaries: Vec<u64> = listings.iter().map(Listing::salary).collect();
        salaries.sort_unstable();

        let (Some(&minimum), Some(&maximum)) = (salaries.first(), salaries.last()) else {
            return Err(StatsError::EmptyListingSet);
        };

        let count = salaries.len();
        let sum: u128 = salaries.iter().map(|&s| u128::from(s)).sum();
        // The mean of u64 values always fits in u64
        let average = u64::try_from(sum / count as u128).unwrap_or(maximum);

        Ok(Self {
            label: label.trim().to_string(),
            count,
            minimum,
            average,
            median: salaries[count / 2],
            percentile90: salaries[count * 90 / 100],
            maximum,
        })
    }
}

/// Statistics of several queries, in the order they were added
#[derive(Debug, Clone, Default)]
pub struct StatsComparison {
    entries: Vec<Statistics>,
}

impl StatsComparison {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `stats` unless its label is already present
    ///
    /// Returns true if it was added.
    pub fn add(&mut self, stats: Statistics) -> bool {
        if self.get(&stats.label).is_some() {
            tracing::debug!("Statistics for {:?} already present", stats.label);
            return false;
        }
        self.entries.push(stats);
        true
    }

    pub fn get(&self, label: &str) -> Option<&Statistics> {
        self.entries.iter().find(|s| s.label == label)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Statistics> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn as_slice(&self) -> &[Statistics] {
        &self.entries
    }

    /// Each label's average as a percentage of the highest average
    pub fn shares(&self) -> Vec<(&str, f64)> {
        let highest = self.entries.iter().map(|s| s.average).max().unwrap_or(0);
        self.entries
            .iter()
            .map(|s| {
                let share = if highest > 0 {
                    s.average as f64 / highest as f64 * 100.0
                } else {
                    0.0
                };
                (s.label.as_str(), share)
            })
            .collect()
    }
}

/// Groups thousands with spaces: `75000` becomes `75 000`
pub fn format_salary(value: u64) -> String {
    let digits = value.to_string();
    let mut formatted = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            formatted.push(' ');
        }
        formatted.push(ch);
    }
    formatted
}

/// Renders the comparison as a text table with a share bar per query
pub fn render_comparison(comparison: &StatsComparison) -> String {
    const BAR_WIDTH: f64 = 20.0;

    let label_width = comparison
        .iter()
        .map(|s| s.label.chars().count())
        .max()
        .unwrap_or(0)
        .max("Query".len());

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<lw$}  {:>8}  {:>11}  {:>11}  {:>11}  {:>11}  {:>11}",
        "Query",
        "Listings",
        "Min",
        "Average",
        "Median",
        "90 P",
        "Max",
        lw = label_width
    );

    for (stats, (_, share)) in comparison.iter().zip(comparison.shares()) {
        let bar = "#".repeat((share / 100.0 * BAR_WIDTH).round() as usize);
        let _ = writeln!(
            out,
            "{:<lw$}  {:>8}  {:>11}  {:>11}  {:>11}  {:>11}  {:>11}  {} {:.0}%",
            stats.label,
            stats.count,
            format_salary(stats.minimum),
            format_salary(stats.average),
            format_salary(stats.median),
            format_salary(stats.percentile90),
            format_salary(stats.maximum),
            bar,
            share,
            lw = label_width
        );
    }
    out
}

/// Prints the comparison table to stdout
pub fn print_statistics(comparison: &StatsComparison) {
    println!("=== Salary Statistics ===\n");
    print!("{}", render_comparison(comparison));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::num::NonZeroU64;

    fn listings(salaries: &[u64]) -> Vec<Listing> {
        salaries
            .iter()
            .enumerate()
            .map(|(i, &s)| {
                Listing::new(
                    format!("Job {}", i),
                    "Acme",
                    None,
                    NonZeroU64::new(s).unwrap(),
                    format!("https://hh.ru/vacancy/{}", i),
                )
            })
            .collect()
    }

    fn stats(label: &str, salaries: &[u64]) -> Statistics {
        Statistics::compute(label, &listings(salaries)).unwrap()
    }

    #[test]
    fn test_eleven_listings() {
        let salaries: Vec<u64> = (1..=11).map(|i| i * 10).collect();
        let s = stats("rust", &salaries);

        assert_eq!(s.count, 11);
        assert_eq!(s.minimum, 10);
        assert_eq!(s.maximum, 110);
        assert_eq!(s.average, 60);
        assert_eq!(s.median, 60);
        assert_eq!(s.percentile90, 100);
    }

    #[test]
    fn test_unsorted_input() {
        let s = stats("rust", &[300, 100, 200]);
        assert_eq!(s.minimum, 100);
        assert_eq!(s.median, 200);
        assert_eq!(s.maximum, 300);
    }

    #[test]
    fn test_even_count_uses_upper_median() {
        let s = stats("rust", &[10, 20, 30, 40]);
        assert_eq!(s.median, 30);
        assert_eq!(s.average, 25);
    }

    #[test]
    fn test_average_truncates() {
        let s = stats("rust", &[1, 2]);
        assert_eq!(s.average, 1);
    }

    #[test]
    fn test_single_listing() {
        let s = stats("rust", &[50000]);
        assert_eq!(s.minimum, 50000);
        assert_eq!(s.median, 50000);
        assert_eq!(s.percentile90, 50000);
        assert_eq!(s.maximum, 50000);
    }

    #[test]
    fn test_large_salaries_do_not_overflow() {
        let s = stats("rust", &[u64::MAX, u64::MAX - 2]);
        assert_eq!(s.average, u64::MAX - 1);
    }

    #[test]
    fn test_label_is_trimmed() {
        let s = stats("  rust developer \n", &[100]);
        assert_eq!(s.label, "rust developer");
    }

    #[test]
    fn test_empty_set_is_an_error() {
        let result = Statistics::compute("rust", &[]);
        assert_eq!(result, Err(StatsError::EmptyListingSet));
    }

    #[test]
    fn test_ordering_holds() {
        let s = stats("rust", &[5, 90, 17, 33, 64, 2, 48, 71]);
        assert!(s.minimum <= s.median && s.median <= s.maximum);
        assert!(s.minimum <= s.average && s.average <= s.maximum);
        assert!(s.percentile90 >= s.median);
    }

    #[test]
    fn test_comparison_ignores_duplicate_labels() {
        let mut comparison = StatsComparison::new();
        assert!(comparison.add(stats("rust", &[100])));
        assert!(!comparison.add(stats(" rust ", &[200])));
        assert!(comparison.add(stats("go", &[50])));

        assert_eq!(comparison.len(), 2);
        assert_eq!(comparison.get("rust").map(|s| s.average), Some(100));
    }

    #[test]
    fn test_shares_relative_to_highest_average() {
        let mut comparison = StatsComparison::new();
        comparison.add(stats("rust", &[200]));
        comparison.add(stats("go", &[50]));

        let shares = comparison.shares();
        assert_eq!(shares[0], ("rust", 100.0));
        assert_eq!(shares[1], ("go", 25.0));
    }

    #[test]
    fn test_format_salary() {
        assert_eq!(format_salary(0), "0");
        assert_eq!(format_salary(999), "999");
        assert_eq!(format_salary(75000), "75 000");
        assert_eq!(format_salary(1234567), "1 234 567");
    }

    #[test]
    fn test_render_comparison_lists_every_query() {
        let mut comparison = StatsComparison::new();
        comparison.add(stats("rust", &[100000, 150000]));
        comparison.add(stats("go", &[90000]));

        let table = render_comparison(&comparison);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Query"));
        assert!(lines[1].starts_with("rust"));
        assert!(lines[1].contains("125 000"));
        assert!(lines[1].ends_with("100%"));
        assert!(lines[2].starts_with("go"));
    }
}
