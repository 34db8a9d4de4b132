pub mod authority_gate;
pub mod orphan_adoption;
