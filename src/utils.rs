pub mod bbox;
pub mod error;
pub mod lonlat;
