pub mod clients;
pub mod time_entries;
