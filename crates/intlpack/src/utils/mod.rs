pub mod normalize_options;
pub mod read_messages;
