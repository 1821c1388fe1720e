//! KPI evaluation engine and project container for SDF.
//!
//! This crate provides:
//! - [`KpiPayload`] kinds with their raw-score rules
//! - [`Kpi`] normalisation to a 0-100 score and status classification
//! - [`Project`], which owns KPIs and evaluates them when applicable
//! - JSON [`ProjectDefinition`]s for building projects from files
//!
//! # Example
//!
//! ```
//! use sdf_kpi::{Kpi, KpiPayload, Project};
//! use sdf_models::{DevelopmentType, KpiStatus, RibaStage};
//!
//! let mut project = Project::new(RibaStage::Five, DevelopmentType::Commercial);
//! let kpi = Kpi::builder(KpiPayload::number(76.0))
//!     .all_phases()
//!     .all_dev_types()
//!     .practice_thresholds(65.0, 85.0)
//!     .build()
//!     .unwrap();
//! project.add_kpi("VP1", kpi).unwrap();
//!
//! assert_eq!(project.get_final_score("VP1").unwrap(), Some(73));
//! assert_eq!(project.get_status("VP1").unwrap(), Some(KpiStatus::GoodPractice));
//! ```

pub mod builder;
pub mod definition;
pub mod error;
pub mod kpi;
pub mod payload;
pub mod project;

pub use builder::KpiBuilder;
pub use definition::{load_definition, KpiDefinition, PayloadDefinition, ProjectDefinition};
pub use error::{KpiError, Result};
pub use kpi::Kpi;
pub use payload::{Aggregate, AggregateFn, KpiPayload, NumberSet, Question};
pub use project::{KpiSummary, Project};
