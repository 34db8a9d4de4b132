pub mod identity_tracker;
pub mod update_synthesizer;
