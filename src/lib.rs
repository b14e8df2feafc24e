pub mod feature;
pub mod geometry;
pub mod parse;
pub mod processing;
pub mod schema;
pub mod utils;
