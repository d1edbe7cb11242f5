use crate::bool_column::BoolColumn;
use crate::string_column::{RleStringColumn, StringColumn};
use crate::time_column::TimeColumn;
use crate::tuple::PriceTuple;
use crate::u32_column::U32Column;

/// Step-vector coverage of the name column when no explicit capacity is
/// given; sized for the reference million-row price dump.
pub const DEFAULT_ROW_CAPACITY: usize = 1_000_000;

/// The price store: four columns composed by position.
///
/// Row `i` is the tuple formed by reading position `i` from each column.
/// The store is built once through [PriceDb::push] (or the CSV ingest
/// wrapper) and then queried read-only; predicates on the individual
/// columns produce [BoolColumn] masks that
/// [PriceDb::materialize_from_bools] turns back into tuples.
#[derive(Debug)]
pub struct PriceDb {
    pub names: RleStringColumn,
    pub sets: StringColumn,
    pub prices: U32Column,
    pub times: TimeColumn,
}

impl PriceDb {
    /// Creates an empty store sized for [DEFAULT_ROW_CAPACITY] rows.
    ///
    /// Predicates on the name column span the full capacity, so queries
    /// mixing name predicates with other columns expect the store to be
    /// filled to exactly that many rows. Use [PriceDb::with_capacity] when
    /// the row count is known up front.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_ROW_CAPACITY)
    }

    /// Creates an empty store whose name column covers `capacity` rows.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            names: RleStringColumn::with_capacity(capacity),
            sets: StringColumn::new(),
            prices: U32Column::new(),
            times: TimeColumn::new(),
        }
    }

    /// Returns the number of rows pushed so far.
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    /// Returns true if there is no row in the store, else false.
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// Appends a batch of tuples, splitting them into one append per
    /// column. Every column grows by `values.len()`.
    pub fn push(&mut self, values: &[PriceTuple]) {
        let names: Vec<&str> = values.iter().map(|p| p.name.as_str()).collect();
        let sets: Vec<&str> = values.iter().map(|p| p.set.as_str()).collect();
        let prices: Vec<u32> = values.iter().map(|p| p.price).collect();
        let times: Vec<_> = values.iter().map(|p| p.time).collect();

        self.names.push(&names);
        self.sets.push(&sets);
        self.prices.push(&prices);
        self.times.push(&times);
    }

    /// Materialize all tuples selected by the provided query, in ascending
    /// row order.
    ///
    /// The query is assumed to be the result of a predicate executed on
    /// this store, so no range checking is performed; a query produced
    /// elsewhere carries no guarantees.
    pub fn materialize_from_bools(&self, query: &BoolColumn) -> Vec<PriceTuple> {
        let positions = query.truthy_indices();

        // Keep columns separate for as long as possible
        let names: Vec<&str> = positions.iter().map(|&p| self.names.access(p)).collect();
        let sets: Vec<&str> = positions.iter().map(|&p| self.sets.access(p)).collect();
        let prices: Vec<u32> = positions.iter().map(|&p| self.prices.access(p)).collect();
        let times: Vec<_> = positions.iter().map(|&p| self.times.access(p)).collect();

        // Stitch tuples back together
        (0..positions.len())
            .map(|i| PriceTuple {
                name: names[i].to_owned(),
                set: sets[i].to_owned(),
                price: prices[i],
                time: times[i],
            })
            .collect()
    }

    /// Materialize the selected tuples and sort them ascending by time
    /// alone. The sort is not stable on equal times.
    pub fn materialize_time_sort_asc(&self, query: &BoolColumn) -> Vec<PriceTuple> {
        let mut tuples = self.materialize_from_bools(query);
        tuples.sort_unstable_by_key(|t| t.time);
        tuples
    }
}

impl Default for PriceDb {
    fn default() -> Self {
        Self::new()
    }
}
