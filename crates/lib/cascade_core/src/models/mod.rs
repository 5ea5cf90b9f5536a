//! Domain models for the three configuration tiers and the describe service.

pub mod describe;
pub mod rules;

pub use describe::{FieldDescription, IntegratableObject, ObjectDescribe};
pub use rules::{ContextKey, FieldMapping, ObjectRule, SystemConfig, Tier};
