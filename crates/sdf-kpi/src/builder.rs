//! Fluent construction of [`Kpi`] values.

use std::collections::BTreeSet;

use sdf_models::{DevelopmentType, RibaStage};

use crate::error::{KpiError, Result};
use crate::kpi::Kpi;
use crate::payload::KpiPayload;

/// Builder for [`Kpi`].
///
/// A KPI must apply to at least one phase and one development type; the
/// payload must satisfy its kind's shape rules.
///
/// ```
/// use sdf_kpi::{Kpi, KpiPayload};
/// use sdf_models::{DevelopmentType, RibaStage};
///
/// let kpi = Kpi::builder(KpiPayload::number(76.0))
///     .phase(RibaStage::Five)
///     .dev_type(DevelopmentType::Commercial)
///     .practice_thresholds(65.0, 85.0)
///     .build()
///     .unwrap();
/// assert!(!kpi.is_ready());
/// ```
#[derive(Debug, Clone)]
pub struct KpiBuilder {
    payload: KpiPayload,
    phases: BTreeSet<RibaStage>,
    dev_types: BTreeSet<DevelopmentType>,
    good_practice: Option<f64>,
    leading_practice: Option<f64>,
    reporting_only: bool,
}

impl KpiBuilder {
    pub fn new(payload: KpiPayload) -> Self {
        Self {
            payload,
            phases: BTreeSet::new(),
            dev_types: BTreeSet::new(),
            good_practice: None,
            leading_practice: None,
            reporting_only: false,
        }
    }

    /// Adds a phase the KPI applies to.
    pub fn phase(mut self, phase: RibaStage) -> Self {
        self.phases.insert(phase);
        self
    }

    pub fn phases(mut self, phases: impl IntoIterator<Item = RibaStage>) -> Self {
        self.phases.extend(phases);
        self
    }

    /// Applies the KPI to every RIBA stage.
    pub fn all_phases(self) -> Self {
        self.phases(RibaStage::ALL)
    }

    /// Adds a development type the KPI applies to.
    pub fn dev_type(mut self, dev_type: DevelopmentType) -> Self {
        self.dev_types.insert(dev_type);
        self
    }

    pub fn dev_types(mut self, dev_types: impl IntoIterator<Item = DevelopmentType>) -> Self {
        self.dev_types.extend(dev_types);
        self
    }

    pub fn all_dev_types(self) -> Self {
        self.dev_types(DevelopmentType::ALL)
    }

    pub fn good_practice(mut self, threshold: f64) -> Self {
        self.good_practice = Some(threshold);
        self
    }

    pub fn leading_practice(mut self, threshold: f64) -> Self {
        self.leading_practice = Some(threshold);
        self
    }

    /// Sets both practice thresholds.
    pub fn practice_thresholds(self, good: f64, leading: f64) -> Self {
        self.good_practice(good).leading_practice(leading)
    }

    pub fn reporting_only(mut self, reporting_only: bool) -> Self {
        self.reporting_only = reporting_only;
        self
    }

    /// Builds the KPI.
    ///
    /// # Errors
    /// Fails on an empty phase or development type set, or when the payload
    /// does not match its kind's shape.
    pub fn build(self) -> Result<Kpi> {
        if self.phases.is_empty() {
            return Err(KpiError::EmptyApplicability("phases"));
        }
        if self.dev_types.is_empty() {
            return Err(KpiError::EmptyApplicability("development types"));
        }
        self.payload.validate_shape()?;

        Ok(Kpi::from_parts(
            self.payload,
            self.phases,
            self.dev_types,
            self.good_practice,
            self.leading_practice,
            self.reporting_only,
        ))
    }
}
