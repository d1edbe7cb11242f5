use chrono::{DateTime, Utc};

use crate::bool_column::BoolColumn;

/// Append-only column of UTC instants.
///
/// Shares the contract of [crate::U32Column]: values only arrive through
/// [TimeColumn::push] and positional reads are O(1).
#[derive(Debug, Clone, Default)]
pub struct TimeColumn {
    contents: Vec<DateTime<Utc>>,
}

impl TimeColumn {
    /// Creates a new, empty column.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the provided values to the end of the column.
    pub fn push(&mut self, values: &[DateTime<Utc>]) {
        self.contents.extend_from_slice(values);
    }

    /// Access the value stored at the named index.
    ///
    /// This performs no range checking in release builds, so the caller is
    /// responsible for ensuring the index is within bounds.
    pub fn access(&self, index: usize) -> DateTime<Utc> {
        debug_assert!(index < self.contents.len(), "access index out of range");
        self.contents[index]
    }

    /// Returns the number of rows currently stored in the column.
    pub fn len(&self) -> usize {
        self.contents.len()
    }

    /// Returns true if there is no row in the column, else false.
    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    /// Determine all times happening strictly after a certain point and
    /// return them positionally as a [BoolColumn]. Equal instants are not
    /// selected.
    pub fn after(&self, when: DateTime<Utc>) -> BoolColumn {
        self.contents.iter().map(|&t| t > when).collect()
    }

    /// Refine an existing query in place, clearing every position whose
    /// time is at or before `when`.
    ///
    /// This fuses `query.and(&self.after(when))` without allocating the
    /// intermediate column. The query must have been produced against this
    /// column, so the lengths match.
    pub fn and_after(&self, when: DateTime<Utc>, query: &mut BoolColumn) {
        debug_assert_eq!(
            self.len(),
            query.len(),
            "and_after requires a query over this column"
        );
        for (index, &t) in self.contents.iter().enumerate() {
            if t <= when {
                query.clear(index);
            }
        }
    }
}
