//! JSON project definitions.
//!
//! A definition names the project's phase and development type and lists
//! its KPIs:
//!
//! ```json
//! {
//!   "phase": "five",
//!   "development_type": "commercial",
//!   "kpis": [
//!     {
//!       "identifier": "VP1",
//!       "payload": { "kind": "number", "value": 76 },
//!       "good_practice": 65,
//!       "leading_practice": 85
//!     }
//!   ]
//! }
//! ```
//!
//! Omitted `phases` or `development_types` mean "all".

use std::fs;
use std::path::Path;

use sdf_models::{DevelopmentType, KpiId, RibaStage};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{KpiError, Result};
use crate::kpi::Kpi;
use crate::payload::{Aggregate, KpiPayload, NumberSet, Question};
use crate::project::Project;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectDefinition {
    pub phase: RibaStage,
    pub development_type: DevelopmentType,
    #[serde(default)]
    pub kpis: Vec<KpiDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KpiDefinition {
    pub identifier: KpiId,
    pub payload: PayloadDefinition,
    #[serde(default)]
    pub phases: Vec<RibaStage>,
    #[serde(default)]
    pub development_types: Vec<DevelopmentType>,
    #[serde(default)]
    pub good_practice: Option<f64>,
    #[serde(default)]
    pub leading_practice: Option<f64>,
    #[serde(default)]
    pub reporting_only: bool,
}

/// Serializable form of [`KpiPayload`]. Aggregation functions are chosen
/// by name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PayloadDefinition {
    Number { value: f64 },
    NumbersSet { values: NumberSet, aggregate: Aggregate },
    Quiz { questions: Vec<Question> },
    Checkboxes { questions: Vec<Question> },
    Binary { question: Question },
}

impl From<PayloadDefinition> for KpiPayload {
    fn from(def: PayloadDefinition) -> Self {
        match def {
            PayloadDefinition::Number { value } => KpiPayload::Number { value },
            PayloadDefinition::NumbersSet { values, aggregate } => KpiPayload::NumbersSet {
                values,
                aggregate: aggregate.function(),
            },
            PayloadDefinition::Quiz { questions } => KpiPayload::Quiz { questions },
            PayloadDefinition::Checkboxes { questions } => KpiPayload::Checkboxes { questions },
            PayloadDefinition::Binary { question } => KpiPayload::Binary { question },
        }
    }
}

impl KpiDefinition {
    pub fn into_kpi(self) -> Result<(KpiId, Kpi)> {
        let mut builder = Kpi::builder(self.payload.into()).reporting_only(self.reporting_only);

        builder = if self.phases.is_empty() {
            builder.all_phases()
        } else {
            builder.phases(self.phases)
        };
        builder = if self.development_types.is_empty() {
            builder.all_dev_types()
        } else {
            builder.dev_types(self.development_types)
        };
        if let Some(good) = self.good_practice {
            builder = builder.good_practice(good);
        }
        if let Some(leading) = self.leading_practice {
            builder = builder.leading_practice(leading);
        }

        Ok((self.identifier, builder.build()?))
    }
}

impl ProjectDefinition {
    /// Builds the project and registers every KPI, in definition order.
    pub fn into_project(self) -> Result<Project> {
        let mut project = Project::new(self.phase, self.development_type);
        for def in self.kpis {
            let (identifier, kpi) = def.into_kpi()?;
            project.add_kpi(identifier, kpi)?;
        }
        Ok(project)
    }
}

/// Reads a [`ProjectDefinition`] from a JSON file.
pub fn load_definition(path: impl AsRef<Path>) -> Result<ProjectDefinition> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| KpiError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    let definition: ProjectDefinition = serde_json::from_str(&content)?;
    info!(path = %path.display(), kpis = definition.kpis.len(), "Loaded project definition");
    Ok(definition)
}
