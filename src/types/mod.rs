// src/types/mod.rs
pub mod ordered_map;
pub mod profile;

pub use ordered_map::OrderedMap;
pub use profile::{ProfileError, ProfileRecord, TargetCompany};
