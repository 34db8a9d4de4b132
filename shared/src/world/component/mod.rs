pub mod binding;
pub mod component_update;
pub mod diff_mask;
pub mod error;
pub mod field_cell;
pub mod field_value;
pub mod vector;
