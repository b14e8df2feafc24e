pub mod feature_index;
pub mod limit_features;
pub mod s2_cells;
pub mod text_sequence;
