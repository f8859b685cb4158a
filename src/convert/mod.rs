// Imperial -> metric conversion: unit table, numeral parsing, inline text matching

pub mod inline;
pub mod quantity;
pub mod units;


pub use inline::{convert_inline_text, find_measurements, InlineMeasurement};
pub use quantity::parse_quantity;
pub use units::{convert, lookup, lookup_ignore_case, Unit};
