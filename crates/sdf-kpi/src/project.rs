//! Project container: owns KPIs and gates their evaluation.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use sdf_models::{DevelopmentType, KpiId, KpiKind, KpiStatus, RibaStage};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{KpiError, Result};
use crate::kpi::Kpi;

/// A project at a given phase, with the KPIs registered against it.
///
/// The development type is fixed at creation. KPIs are evaluated lazily by
/// the score accessors and cached on the KPI itself.
#[derive(Debug, Clone)]
pub struct Project {
    phase: RibaStage,
    development_type: DevelopmentType,
    kpis: BTreeMap<KpiId, Kpi>,
}

/// Snapshot of one KPI's evaluation, for reporting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiSummary {
    pub identifier: KpiId,
    pub kind: KpiKind,
    pub raw_score: Option<f64>,
    pub final_score: Option<i64>,
    pub status: KpiStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evaluated_at: Option<DateTime<Utc>>,
}

impl fmt::Display for KpiSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn or_dash<T: fmt::Display>(value: Option<T>) -> String {
            value.map_or_else(|| "-".to_string(), |v| v.to_string())
        }

        writeln!(f, "KPI Summary:")?;
        writeln!(f, "KPI Identifier: {}", self.identifier)?;
        writeln!(f, "KPI type:       {}", self.kind)?;
        writeln!(f, "Raw score:      {}", or_dash(self.raw_score))?;
        writeln!(f, "Final score:    {}", or_dash(self.final_score))?;
        write!(f, "Final status:   {}", self.status)
    }
}

impl Project {
    pub fn new(phase: RibaStage, development_type: DevelopmentType) -> Self {
        Self {
            phase,
            development_type,
            kpis: BTreeMap::new(),
        }
    }

    pub fn phase(&self) -> RibaStage {
        self.phase
    }

    pub fn development_type(&self) -> DevelopmentType {
        self.development_type
    }

    /// Moves the project to another phase.
    pub fn set_phase(&mut self, phase: RibaStage) {
        info!(from = %self.phase, to = %phase, "Project phase changed");
        self.phase = phase;
        // TODO: reset cached KPI results whose applicability changed with the phase
    }

    /// Registers a KPI under a unique identifier.
    ///
    /// # Errors
    /// Returns [`KpiError::DuplicateKpi`] if the identifier is taken.
    pub fn add_kpi(&mut self, identifier: impl Into<KpiId>, kpi: Kpi) -> Result<()> {
        let identifier = identifier.into();
        if self.kpis.contains_key(&identifier) {
            return Err(KpiError::DuplicateKpi(identifier));
        }
        debug!(kpi = %identifier, kind = %kpi.kind(), "KPI added");
        self.kpis.insert(identifier, kpi);
        Ok(())
    }

    pub fn kpi(&self, identifier: &str) -> Option<&Kpi> {
        self.kpis.get(identifier)
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.kpis.contains_key(identifier)
    }

    /// Registered identifiers, in sorted order.
    pub fn kpi_ids(&self) -> impl Iterator<Item = &KpiId> {
        self.kpis.keys()
    }

    pub fn len(&self) -> usize {
        self.kpis.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kpis.is_empty()
    }

    /// True if the KPI applies to the current phase and development type.
    pub fn is_applicable(&self, identifier: &str) -> bool {
        self.kpis.get(identifier).is_some_and(|kpi| {
            kpi.applies_to_phase(self.phase) && kpi.applies_to_dev_type(self.development_type)
        })
    }

    /// Evaluates a KPI unless it is already scored.
    ///
    /// Returns `Ok(false)` for unknown identifiers and for KPIs that do not
    /// apply to this project; those are left unscored.
    pub fn evaluate_kpi(&mut self, identifier: &str) -> Result<bool> {
        if !self.contains(identifier) {
            warn!(kpi = identifier, "KPI identifier is not registered");
            return Ok(false);
        }
        if !self.is_applicable(identifier) {
            debug!(
                kpi = identifier,
                phase = %self.phase,
                development_type = %self.development_type,
                "KPI does not apply to project"
            );
            return Ok(false);
        }

        if let Some(kpi) = self.kpis.get_mut(identifier) {
            kpi.evaluate()?;
        }
        Ok(true)
    }

    /// Raw score after evaluating the KPI. `None` for unknown identifiers.
    pub fn get_raw_score(&mut self, identifier: &str) -> Result<Option<f64>> {
        Ok(self.evaluated(identifier)?.and_then(Kpi::raw_score))
    }

    pub fn get_final_score(&mut self, identifier: &str) -> Result<Option<i64>> {
        Ok(self.evaluated(identifier)?.and_then(Kpi::final_score))
    }

    pub fn get_status(&mut self, identifier: &str) -> Result<Option<KpiStatus>> {
        Ok(self.evaluated(identifier)?.map(Kpi::status))
    }

    /// Evaluates the KPI and returns a snapshot of its results.
    ///
    /// KPIs that do not apply to the project report
    /// [`KpiStatus::NotApplicable`].
    pub fn summary(&mut self, identifier: &str) -> Result<Option<KpiSummary>> {
        let applicable = self.is_applicable(identifier);
        let kpi = match self.evaluated(identifier)? {
            Some(kpi) => kpi,
            None => return Ok(None),
        };
        Ok(Some(KpiSummary {
            identifier: KpiId::from(identifier),
            kind: kpi.kind(),
            raw_score: kpi.raw_score(),
            final_score: kpi.final_score(),
            status: if applicable {
                kpi.status()
            } else {
                KpiStatus::NotApplicable
            },
            evaluated_at: kpi.evaluated_at(),
        }))
    }

    fn evaluated(&mut self, identifier: &str) -> Result<Option<&Kpi>> {
        self.evaluate_kpi(identifier)?;
        Ok(self.kpis.get(identifier))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::KpiPayload;

    fn project() -> Project {
        Project::new(RibaStage::Five, DevelopmentType::Commercial)
    }

    fn vp1() -> Kpi {
        Kpi::builder(KpiPayload::number(76.0))
            .phases(RibaStage::ALL.into_iter().skip(1))
            .all_dev_types()
            .practice_thresholds(65.0, 85.0)
            .build()
            .unwrap()
    }

    #[test]
    fn test_add_kpi_rejects_duplicates() {
        let mut project = project();
        project.add_kpi("VP1", vp1()).unwrap();
        let err = project.add_kpi("VP1", vp1()).unwrap_err();
        assert!(matches!(err, KpiError::DuplicateKpi(id) if id.as_str() == "VP1"));
        assert_eq!(project.len(), 1);
    }

    #[test]
    fn test_accessors_evaluate_eagerly() {
        let mut project = project();
        project.add_kpi("VP1", vp1()).unwrap();
        assert!(!project.kpi("VP1").unwrap().is_ready());

        assert_eq!(project.get_final_score("VP1").unwrap(), Some(73));
        assert_eq!(project.get_raw_score("VP1").unwrap(), Some(76.0));
        assert_eq!(
            project.get_status("VP1").unwrap(),
            Some(KpiStatus::GoodPractice)
        );
    }

    #[test]
    fn test_unknown_kpi_is_not_an_error() {
        let mut project = project();
        assert!(!project.evaluate_kpi("missing").unwrap());
        assert_eq!(project.get_raw_score("missing").unwrap(), None);
        assert_eq!(project.summary("missing").unwrap(), None);
    }

    #[test]
    fn test_inapplicable_dev_type_stays_unscored() {
        let mut project = project();
        let kpi = Kpi::builder(KpiPayload::number(76.0))
            .all_phases()
            .dev_type(DevelopmentType::Residential)
            .practice_thresholds(65.0, 85.0)
            .build()
            .unwrap();
        project.add_kpi("R1", kpi).unwrap();

        assert!(!project.evaluate_kpi("R1").unwrap());
        assert_eq!(project.get_final_score("R1").unwrap(), None);
        assert_eq!(project.get_status("R1").unwrap(), Some(KpiStatus::Undefined));

        let summary = project.summary("R1").unwrap().unwrap();
        assert_eq!(summary.status, KpiStatus::NotApplicable);
        assert_eq!(summary.final_score, None);
    }

    #[test]
    fn test_inapplicable_phase_until_phase_changes() {
        let mut project = Project::new(RibaStage::Zero, DevelopmentType::Commercial);
        project.add_kpi("VP1", vp1()).unwrap();
        assert!(!project.is_applicable("VP1"));
        assert!(!project.evaluate_kpi("VP1").unwrap());

        project.set_phase(RibaStage::Two);
        assert!(project.evaluate_kpi("VP1").unwrap());
        assert!(project.kpi("VP1").unwrap().is_ready());
    }

    #[test]
    fn test_phase_change_keeps_cached_scores() {
        let mut project = project();
        project.add_kpi("VP1", vp1()).unwrap();
        project.evaluate_kpi("VP1").unwrap();

        project.set_phase(RibaStage::Zero);
        assert!(project.kpi("VP1").unwrap().is_ready());
        assert_eq!(project.kpi("VP1").unwrap().final_score(), Some(73));
    }

    #[test]
    fn test_summary_text() {
        let mut project = project();
        project.add_kpi("VP1", vp1()).unwrap();
        let summary = project.summary("VP1").unwrap().unwrap();
        let text = summary.to_string();
        assert!(text.contains("KPI Identifier: VP1"));
        assert!(text.contains("Final score:    73"));
        assert!(text.contains("good_practice"));
    }
}
