pub mod bool_column;
pub mod database;
pub mod ingest;
pub mod projection;
pub mod rle_column;
pub mod string_column;
pub mod time_column;
pub mod tuple;
pub mod u32_column;

pub use bool_column::BoolColumn;
pub use database::PriceDb;
pub use ingest::IngestError;
pub use projection::NameTimeProjection;
pub use rle_column::RleU32Column;
pub use string_column::{Dictionary, RleStringColumn, StringColumn};
pub use time_column::TimeColumn;
pub use tuple::{PriceTuple, TupleParseError};
pub use u32_column::U32Column;
