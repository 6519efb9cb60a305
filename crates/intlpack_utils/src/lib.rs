pub mod indexmap;
pub mod sanitize_file_name;
pub mod xxhash;
