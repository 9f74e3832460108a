//! Data module - CSV loading, typed records and aggregation

mod loader;
mod processor;
mod records;

pub use loader::{load_dataset, Dataset, LoaderError};
pub use processor::{CategoryCount, DataProcessor, NamedValue};
pub use records::{Paddle, RecordError, Title};
