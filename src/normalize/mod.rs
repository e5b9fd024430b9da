pub mod accessors;
pub mod normalizer;

pub use accessors::{read_array, read_count, read_number, read_str, read_timestamp, read_truthy};
pub use normalizer::{account_age_years, normalize};
