pub mod path;
pub mod size_format;
pub mod time_format;

pub use path::normalize_path;
pub use size_format::format_size;
pub use time_format::{format_datetime, format_duration};
