pub mod collection;
pub mod types;
