use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, info};

use crate::database::PriceDb;
use crate::tuple::{PriceTuple, TupleParseError};

/// Rows accumulated before each bulk append. Purely an allocator-friendly
/// batch size; the columns impose no boundary of their own.
pub const INGEST_BATCH_ROWS: usize = 4096;

/// Why a CSV ingest was aborted.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("failed to read csv")]
    Io(#[from] std::io::Error),
    #[error("line {line}: {source}")]
    Record {
        line: usize,
        #[source]
        source: TupleParseError,
    },
}

impl PriceDb {
    /// Stream a CSV into the store.
    ///
    /// The file carries `name, set, time, price` records; header rows
    /// (recognized by a literal `price` in the price field) and blank
    /// lines are skipped. Records are parsed into [PriceTuple]s and pushed
    /// in clumps of [INGEST_BATCH_ROWS].
    ///
    /// # Errors
    /// The first unreadable line or malformed record aborts the ingest,
    /// leaving the rows pushed so far in place.
    pub fn ingest_csv(&mut self, path: impl AsRef<Path>) -> Result<usize, IngestError> {
        let file = File::open(path.as_ref())?;
        let reader = BufReader::new(file);

        let mut batch: Vec<PriceTuple> = Vec::with_capacity(INGEST_BATCH_ROWS);
        let mut total = 0;
        for (number, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let fields = split_record(&line);
            // header and footer rows carry the literal column name
            if fields.len() > 3 && fields[3] == "price" {
                continue;
            }

            let tuple = PriceTuple::from_record(&fields).map_err(|source| {
                IngestError::Record {
                    line: number + 1,
                    source,
                }
            })?;
            batch.push(tuple);

            if batch.len() >= INGEST_BATCH_ROWS {
                self.push(&batch);
                total += batch.len();
                debug!(rows = total, "pushed ingest batch");
                batch.clear();
            }
        }

        // clear off the remaining tuples
        self.push(&batch);
        total += batch.len();

        info!(rows = total, path = %path.as_ref().display(), "csv ingest complete");
        Ok(total)
    }
}

/// Split one CSV line into fields, honoring double-quoted fields so card
/// names containing commas survive. A doubled quote inside a quoted field
/// is an escaped quote.
fn split_record(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                chars.next();
                current.push('"');
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);

    fields
}
