//! Data module - CSV loading, cleaning and date parsing

mod dates;
mod loader;
mod processor;

pub use dates::{parse_order_date, DatedSales};
pub use loader::{decode_latin1, DataLoader, LoaderError, NULL_MARKERS};
pub use processor::{is_numeric_dtype, numeric_values, DataProcessor, ProcessorError};
