use chrono::{DateTime, NaiveDateTime, Utc};

/// Timestamp layout of the price CSV, interpreted as UTC.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single price observation: card name, printing set, price in cents and
/// the time it was recorded. Row `i` of a store materializes into one of
/// these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceTuple {
    pub name: String,
    pub set: String,
    pub price: u32,
    pub time: DateTime<Utc>,
}

/// Why a raw CSV record could not become a [PriceTuple].
#[derive(Debug, thiserror::Error)]
pub enum TupleParseError {
    #[error("truncated record: expected 4 fields, found {0}")]
    Truncated(usize),
    #[error("malformed price '{value}'")]
    MalformedPrice {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("malformed time '{0}'")]
    MalformedTime(String),
}

impl PriceTuple {
    /// Convert a raw record to a price tuple.
    ///
    /// Fields arrive in CSV order: name, set, time, price. The price must
    /// be a non-negative integer number of cents fitting in 32 bits.
    ///
    /// # Errors
    /// Returns a [TupleParseError] describing the first offending field.
    pub fn from_record(fields: &[String]) -> Result<Self, TupleParseError> {
        if fields.len() < 4 {
            return Err(TupleParseError::Truncated(fields.len()));
        }

        let price = fields[3]
            .parse::<u32>()
            .map_err(|source| TupleParseError::MalformedPrice {
                value: fields[3].clone(),
                source,
            })?;

        let time = NaiveDateTime::parse_from_str(&fields[2], TIME_FORMAT)
            .map_err(|_| TupleParseError::MalformedTime(fields[2].clone()))?
            .and_utc();

        Ok(Self {
            name: fields[0].clone(),
            set: fields[1].clone(),
            price,
            time,
        })
    }
}
