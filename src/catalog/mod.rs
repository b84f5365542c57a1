mod catalog;

pub use catalog::{load_catalog, parse_update, restrict_range, validate_sequence};
