pub mod interpolation;
pub mod update_applier;
