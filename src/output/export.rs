//! Delimited-text export of listings and statistics
//!
//! Files are UTF-8 with a byte-order marker, `;` separated, with a header
//! row. Fields are written as-is; the delimiter is not escaped.

use crate::output::stats::Statistics;
use crate::site::Listing;
use crate::Result;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

const BOM: &[u8] = "\u{feff}".as_bytes();
const DELIMITER: &str = ";";

const LISTING_HEADER: [&str; 4] = ["Title", "Employer", "Metro station", "Salary"];
const STATISTICS_HEADER: [&str; 6] = [
    "Query",
    "Listings",
    "Min salary",
    "Average salary",
    "90 P",
    "Max salary",
];

fn write_row<W: Write, S: AsRef<str>>(writer: &mut W, fields: &[S]) -> std::io::Result<()> {
    let mut line = String::new();
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            line.push_str(DELIMITER);
        }
        line.push_str(field.as_ref());
    }
    writeln!(writer, "{}", line)
}

/// Writes one row per listing after the header
pub fn write_listings<W: Write>(writer: &mut W, listings: &[Listing]) -> Result<()> {
    writer.write_all(BOM)?;
    write_row(writer, &LISTING_HEADER)?;

    for listing in listings {
        write_row(
            writer,
            &[
                listing.title(),
                listing.employer(),
                listing.metro_station().unwrap_or(""),
                listing.salary().to_string().as_str(),
            ],
        )?;
    }
    Ok(())
}

/// Writes one row per query after the header
pub fn write_statistics<W: Write>(writer: &mut W, statistics: &[Statistics]) -> Result<()> {
    writer.write_all(BOM)?;
    write_row(writer, &STATISTICS_HEADER)?;

    for stats in statistics {
        write_row(
            writer,
            &[
                stats.label.clone(),
                stats.count.to_string(),
                stats.minimum.to_string(),
                stats.average.to_string(),
                stats.percentile90.to_string(),
                stats.maximum.to_string(),
            ],
        )?;
    }
    Ok(())
}

/// Creates (or truncates) `path` and writes the listings to it
///
/// # Arguments
///
/// * `path` - Destination file
/// * `listings` - Listings in the order they should appear
///
/// # Returns
///
/// * `Ok(())` - File written and flushed
/// * `Err(FinderError::Io)` - The file could not be created or written
pub fn export_listings(path: &Path, listings: &[Listing]) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_listings(&mut writer, listings)?;
    writer.flush()?;
    tracing::info!("Wrote {} listings to {}", listings.len(), path.display());
    Ok(())
}

/// Creates (or truncates) `path` and writes the statistics to it
pub fn export_statistics(path: &Path, statistics: &[Statistics]) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_statistics(&mut writer, statistics)?;
    writer.flush()?;
    tracing::info!("Wrote statistics for {} queries to {}", statistics.len(), path.display());
    Ok(())
}
