//! Core data models for SDF.
//!
//! This crate provides the fundamental data types shared by the table store
//! and the KPI engine: identifiers, KPI enumerations and typed cell values.

pub mod enums;
pub mod ids;
pub mod value;

// Re-export main types
pub use enums::{DevelopmentType, KpiKind, KpiStatus, RibaStage};
pub use ids::{KpiId, Tag};
pub use value::{DataKind, Value};
