pub mod fs;
pub mod logger;
pub mod time;

pub use fs::{list_update_files, validate_dir};
pub use time::{format_duration, format_timestamp};
