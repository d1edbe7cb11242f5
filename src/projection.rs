use chrono::Duration;

use crate::bool_column::BoolColumn;
use crate::database::PriceDb;
use crate::string_column::{RleStringColumn, StringColumn};
use crate::time_column::TimeColumn;
use crate::tuple::PriceTuple;
use crate::u32_column::U32Column;

/// How far back from a name's newest observation [NameTimeProjection::latest]
/// still counts a row as part of the latest group, in seconds. Folds in
/// near-simultaneous observations of the same scrape.
const LATEST_TOLERANCE_SECS: i64 = 60;

/// A copy of the price store with rows globally sorted by
/// `(name ascending, time ascending)`.
///
/// The sort turns the name column into long runs, so it is stored
/// run-length encoded, and it pins each name's newest observation to the
/// last row of that name's block, which is what makes
/// [NameTimeProjection::latest] a cheap scan.
///
/// Built once from a fully loaded [PriceDb]; the projection accepts no
/// further appends afterwards.
#[derive(Debug)]
pub struct NameTimeProjection {
    pub names: RleStringColumn,
    pub sets: StringColumn,
    pub prices: U32Column,
    pub times: TimeColumn,
}

impl NameTimeProjection {
    /// Generate a projection from a fully filled store.
    ///
    /// Materializes every source row, sorts the tuples by the composite
    /// key and bulk-appends them. This holds the whole dataset in memory a
    /// second time while it runs; acceptable for a store that is already
    /// memory-resident.
    pub fn from_price_db(db: &PriceDb) -> Self {
        let length = db.len();

        let mut tuples: Vec<PriceTuple> = Vec::with_capacity(length);
        for i in 0..length {
            tuples.push(PriceTuple {
                name: db.names.access(i).to_owned(),
                set: db.sets.access(i).to_owned(),
                price: db.prices.access(i),
                time: db.times.access(i),
            });
        }

        tuples.sort_unstable_by(|a, b| a.name.cmp(&b.name).then_with(|| a.time.cmp(&b.time)));

        let mut projection = Self {
            names: RleStringColumn::with_capacity(length),
            sets: StringColumn::new(),
            prices: U32Column::new(),
            times: TimeColumn::new(),
        };
        projection.push(&tuples);
        projection
    }

    fn push(&mut self, values: &[PriceTuple]) {
        let names: Vec<&str> = values.iter().map(|p| p.name.as_str()).collect();
        let sets: Vec<&str> = values.iter().map(|p| p.set.as_str()).collect();
        let prices: Vec<u32> = values.iter().map(|p| p.price).collect();
        let times: Vec<_> = values.iter().map(|p| p.time).collect();

        self.names.push(&names);
        self.sets.push(&sets);
        self.prices.push(&prices);
        self.times.push(&times);
    }

    /// Returns the number of rows in the projection.
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    /// Returns true if there is no row in the projection, else false.
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// Query for the latest group of prices for a card.
    ///
    /// Selects every row of `name` recorded within one minute of the
    /// name's newest observation. Returns an empty column when the name is
    /// unknown.
    pub fn latest(&self, name: &str) -> BoolColumn {
        let mut query = self.names.equal(name);
        let truthy = query.truthy_indices();

        let Some(&last_index) = truthy.last() else {
            return BoolColumn::new();
        };

        // The sort invariant puts the name's newest time at its last row.
        // Back the threshold off by the tolerance so the strict `after`
        // keeps the whole group.
        let latest_time =
            self.times.access(last_index) - Duration::seconds(LATEST_TOLERANCE_SECS);
        self.times.and_after(latest_time, &mut query);

        query
    }

    /// Materialize all tuples selected by the provided query, in ascending
    /// row order.
    ///
    /// The query is assumed to be the result of a predicate executed on
    /// this projection, so no range checking is performed; a query
    /// produced elsewhere carries no guarantees.
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
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::{Rng, SeedableRng};

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2015, 11, 13, 15, 7, 12).unwrap()
    }

    fn tuple(name: &str, set: &str, price: u32, seconds: i64) -> PriceTuple {
        PriceTuple {
            name: name.to_owned(),
            set: set.to_owned(),
            price,
            time: base_time() + Duration::seconds(seconds),
        }
    }

    // A deterministic pile of observations in scrape order: names
    // interleave and times jump around, nothing is sorted.
    fn shuffled_db(rows: usize) -> PriceDb {
        let names = ["Griselbrand", "Windswept Heath", "Avacyn, Angel of Hope"];
        let sets = ["Avacyn Restored", "Onslaught", "Onslaught Foil"];

        let mut rng = StdRng::seed_from_u64(91235);
        let mut tuples: Vec<PriceTuple> = (0..rows)
            .map(|i| {
                tuple(
                    names[rng.gen_range(0..names.len())],
                    sets[rng.gen_range(0..sets.len())],
                    rng.gen_range(100..20_000),
                    i as i64 * 3600,
                )
            })
            .collect();
        tuples.shuffle(&mut rng);

        let mut db = PriceDb::with_capacity(rows);
        db.push(&tuples);
        db
    }

    #[test]
    fn test_projection_is_sorted() {
        let db = shuffled_db(200);
        let projection = NameTimeProjection::from_price_db(&db);

        assert_eq!(projection.len(), db.len());

        for i in 1..projection.len() {
            let prev_name = projection.names.access(i - 1);
            let name = projection.names.access(i);
            assert!(prev_name <= name, "names out of order at row {i}");
            if prev_name == name {
                assert!(
                    projection.times.access(i - 1) <= projection.times.access(i),
                    "times out of order at row {i}"
                );
            }
        }
    }

    #[test]
    fn test_projection_holds_same_rows() {
        let db = shuffled_db(50);
        let projection = NameTimeProjection::from_price_db(&db);

        let mut everything = BoolColumn::new();
        everything.push_true(db.len());

        let mut from_db = db.materialize_from_bools(&everything);
        let mut from_projection = projection.materialize_from_bools(&everything);

        let key = |t: &PriceTuple| (t.name.clone(), t.time, t.set.clone(), t.price);
        from_db.sort_unstable_by_key(key);
        from_projection.sort_unstable_by_key(key);
        assert_eq!(from_db, from_projection);
    }

    #[test]
    fn test_latest_group_within_tolerance() {
        let tuples = vec![
            // an old observation that must never be selected
            tuple("Windswept Heath", "Onslaught", 9000, 0),
            // the latest group: newest row plus two within the minute
            tuple("Windswept Heath", "Onslaught Foil", 15499, 10_000),
            tuple("Windswept Heath", "Onslaught", 9200, 10_030),
            tuple("Windswept Heath", "Onslaught", 9150, 9_980),
            // exactly one minute back: excluded by the strict after
            tuple("Windswept Heath", "Onslaught", 9100, 9_970),
            // noise from another card at the same instant
            tuple("Griselbrand", "Avacyn Restored", 2300, 10_030),
        ];
        let mut db = PriceDb::with_capacity(tuples.len());
        db.push(&tuples);

        let projection = NameTimeProjection::from_price_db(&db);
        let query = projection.latest("Windswept Heath");
        let mut group = projection.materialize_from_bools(&query);

        assert_eq!(group.len(), 3);
        assert!(group.iter().all(|t| t.name == "Windswept Heath"));
        assert!(group
            .iter()
            .all(|t| t.time > base_time() + Duration::seconds(10_030 - 60)));

        // reduce the group to its highest price
        group.sort_unstable_by_key(|t| t.price);
        let best = group.last().unwrap();
        assert_eq!(best.price, 15499);
        assert_eq!(best.set, "Onslaught Foil");
    }

    #[test]
    fn test_latest_unknown_name() {
        let db = shuffled_db(20);
        let projection = NameTimeProjection::from_price_db(&db);

        let query = projection.latest("Emrakul, the Aeons Torn");
        assert!(query.is_empty());
    }

    #[test]
    fn test_latest_single_observation() {
        let tuples = vec![
            tuple("Griselbrand", "Avacyn Restored", 2300, 0),
            tuple("Windswept Heath", "Onslaught", 9000, 5000),
        ];
        let mut db = PriceDb::with_capacity(tuples.len());
        db.push(&tuples);

        let projection = NameTimeProjection::from_price_db(&db);
        let group = projection.materialize_from_bools(&projection.latest("Griselbrand"));

        assert_eq!(group.len(), 1);
        assert_eq!(group[0], tuples[0]);
    }
}
