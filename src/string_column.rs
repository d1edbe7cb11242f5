use std::collections::HashMap;

use crate::bool_column::BoolColumn;
use crate::rle_column::RleU32Column;
use crate::u32_column::U32Column;

/// Two-way translation between strings and compact u32 codes.
///
/// Codes are minted in first-insertion order starting at 1; code 0 is
/// reserved so that translating a string the column has never seen yields
/// a code that matches no stored row. Every dictionary-encoded column owns
/// its own dictionary; codes are never shared between columns.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    translator: HashMap<String, u32>,
    inverter: HashMap<u32, String>,
    counter: u32,
}

/// The reserved code a missed lookup translates to.
const NO_MATCH: u32 = 0;

impl Dictionary {
    fn translate_or_insert(&mut self, value: &str) -> u32 {
        if let Some(&code) = self.translator.get(value) {
            return code;
        }
        self.counter += 1;
        let code = self.counter;
        self.translator.insert(value.to_owned(), code);
        self.inverter.insert(code, value.to_owned());
        code
    }

    fn translate(&self, value: &str) -> u32 {
        self.translator.get(value).copied().unwrap_or(NO_MATCH)
    }

    fn invert(&self, code: u32) -> &str {
        self.inverter.get(&code).map(String::as_str).unwrap_or("")
    }
}

/// A dictionary-encoded string column over flat u32 storage.
///
/// Suits columns whose values repeat but arrive in no particular order,
/// such as the set names of an ingest stream.
#[derive(Debug, Clone, Default)]
pub struct StringColumn {
    // Underlying storage exploits all properties of ints
    contents: U32Column,
    dictionary: Dictionary,
}

impl StringColumn {
    /// Creates a new, empty column.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the provided values, translating each through the
    /// dictionary and minting codes for first appearances.
    pub fn push(&mut self, values: &[&str]) {
        let translated: Vec<u32> = values
            .iter()
            .map(|v| self.dictionary.translate_or_insert(v))
            .collect();
        self.contents.push(&translated);
    }

    /// Access the value stored at the named index.
    ///
    /// Carries the same bounds contract as the underlying storage.
    pub fn access(&self, index: usize) -> &str {
        self.dictionary.invert(self.contents.access(index))
    }

    /// Returns the number of rows currently stored in the column.
    pub fn len(&self) -> usize {
        self.contents.len()
    }

    /// Returns true if there is no row in the column, else false.
    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    /// Determine all values equal to a provided value and return them
    /// positionally as a [BoolColumn].
    ///
    /// A value the dictionary has never seen translates to the reserved
    /// code, so the result is simply all-false.
    pub fn equal(&self, value: &str) -> BoolColumn {
        self.contents.equal(self.dictionary.translate(value))
    }

    /// Determine all values equal to a member of the provided values and
    /// return them positionally as a [BoolColumn].
    ///
    /// Cannot handle empty slices; for single values call
    /// [StringColumn::equal] instead.
    pub fn within(&self, values: &[&str]) -> BoolColumn {
        debug_assert!(!values.is_empty(), "within requires at least one value");
        let Some((first, rest)) = values.split_first() else {
            return BoolColumn::new();
        };
        let mut query = self.equal(first);
        for value in rest {
            query.or(&self.equal(value));
        }
        query
    }
}

/// A dictionary-encoded string column over run-length encoded storage.
///
/// Preferred when rows arrive sorted by this column, as in the name column
/// of the `(name, time)` projection: each distinct string then collapses
/// into a single run.
#[derive(Debug, Clone)]
pub struct RleStringColumn {
    // Underlying storage exploits all properties of ints
    contents: RleU32Column,
    dictionary: Dictionary,
}

impl RleStringColumn {
    /// Creates a column whose step vector covers `capacity` rows.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            contents: RleU32Column::with_capacity(capacity),
            dictionary: Dictionary::default(),
        }
    }

    /// Appends the provided values, translating each through the
    /// dictionary and minting codes for first appearances.
    pub fn push(&mut self, values: &[&str]) {
        let translated: Vec<u32> = values
            .iter()
            .map(|v| self.dictionary.translate_or_insert(v))
            .collect();
        self.contents.push(&translated);
    }

    /// Access the value stored at the named index.
    ///
    /// Carries the same bounds contract as the underlying storage.
    pub fn access(&self, index: usize) -> &str {
        self.dictionary.invert(self.contents.access(index))
    }

    /// Returns the length of this column.
    ///
    /// This reports the step vector's coverage, as documented on
    /// [RleU32Column::len].
    pub fn len(&self) -> usize {
        self.contents.len()
    }

    /// Returns true if the column covers no cells.
    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    /// Determine all values equal to a provided value and return them
    /// positionally as a [BoolColumn].
    pub fn equal(&self, value: &str) -> BoolColumn {
        self.contents.equal(self.dictionary.translate(value))
    }

    /// Determine all values equal to a member of the provided values and
    /// return them positionally as a [BoolColumn].
    ///
    /// Cannot handle empty slices; for single values call
    /// [RleStringColumn::equal] instead.
    pub fn within(&self, values: &[&str]) -> BoolColumn {
        debug_assert!(!values.is_empty(), "within requires at least one value");
        let Some((first, rest)) = values.split_first() else {
            return BoolColumn::new();
        };
        let mut query = self.equal(first);
        for value in rest {
            query.or(&self.equal(value));
        }
        query
    }
}
