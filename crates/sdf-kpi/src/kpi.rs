//! A single KPI: payload, applicability, thresholds and cached results.
//!
//! Evaluation runs once. The raw score is computed from the payload and
//! stored, then normalised to a 0-100 final score, then classified into a
//! [`KpiStatus`]. Once a final score exists, [`Kpi::evaluate`] is a no-op.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use sdf_models::{DevelopmentType, KpiKind, KpiStatus, RibaStage};
use tracing::debug;

use crate::builder::KpiBuilder;
use crate::error::{KpiError, Result};
use crate::payload::KpiPayload;

#[derive(Debug, Clone)]
pub struct Kpi {
    payload: KpiPayload,
    phases: BTreeSet<RibaStage>,
    dev_types: BTreeSet<DevelopmentType>,
    good_practice: Option<f64>,
    leading_practice: Option<f64>,
    reporting_only: bool,
    raw_score: Option<f64>,
    final_score: Option<i64>,
    status: KpiStatus,
    evaluated_at: Option<DateTime<Utc>>,
}

impl Kpi {
    /// Starts a builder for a KPI with the given payload.
    pub fn builder(payload: KpiPayload) -> KpiBuilder {
        KpiBuilder::new(payload)
    }

    pub(crate) fn from_parts(
        payload: KpiPayload,
        phases: BTreeSet<RibaStage>,
        dev_types: BTreeSet<DevelopmentType>,
        good_practice: Option<f64>,
        leading_practice: Option<f64>,
        reporting_only: bool,
    ) -> Self {
        Self {
            payload,
            phases,
            dev_types,
            good_practice,
            leading_practice,
            reporting_only,
            raw_score: None,
            final_score: None,
            status: KpiStatus::Undefined,
            evaluated_at: None,
        }
    }

    pub fn kind(&self) -> KpiKind {
        self.payload.kind()
    }

    pub fn payload(&self) -> &KpiPayload {
        &self.payload
    }

    pub fn phases(&self) -> &BTreeSet<RibaStage> {
        &self.phases
    }

    pub fn dev_types(&self) -> &BTreeSet<DevelopmentType> {
        &self.dev_types
    }

    pub fn good_practice(&self) -> Option<f64> {
        self.good_practice
    }

    pub fn leading_practice(&self) -> Option<f64> {
        self.leading_practice
    }

    pub fn is_reporting_only(&self) -> bool {
        self.reporting_only
    }

    pub fn raw_score(&self) -> Option<f64> {
        self.raw_score
    }

    pub fn final_score(&self) -> Option<i64> {
        self.final_score
    }

    pub fn status(&self) -> KpiStatus {
        self.status
    }

    /// When the final score was computed.
    pub fn evaluated_at(&self) -> Option<DateTime<Utc>> {
        self.evaluated_at
    }

    /// True once a final score has been computed.
    pub fn is_ready(&self) -> bool {
        self.final_score.is_some()
    }

    pub fn applies_to_phase(&self, phase: RibaStage) -> bool {
        self.phases.contains(&phase)
    }

    pub fn applies_to_dev_type(&self, dev_type: DevelopmentType) -> bool {
        self.dev_types.contains(&dev_type)
    }

    /// Replaces both practice thresholds. Cached results are kept.
    pub fn set_practice_thresholds(&mut self, good: f64, leading: f64) {
        self.good_practice = Some(good);
        self.leading_practice = Some(leading);
    }

    /// Computes raw score, final score and status.
    ///
    /// Does nothing if the KPI is already scored. The raw score is stored
    /// before normalisation, so a questionnaire KPI keeps its raw score even
    /// though normalising it fails.
    pub fn evaluate(&mut self) -> Result<()> {
        if self.is_ready() {
            return Ok(());
        }

        let raw = self.payload.raw_score()?;
        self.raw_score = Some(raw);

        let normalised = self.normalise(raw)?;
        self.final_score = Some(normalised);
        self.evaluated_at = Some(Utc::now());

        self.calculate_status()?;
        debug!(
            kind = %self.kind(),
            raw = raw,
            final_score = normalised,
            status = %self.status,
            "KPI evaluated"
        );
        Ok(())
    }

    /// Maps a raw score onto 0-100.
    ///
    /// Below good practice the score rises linearly to 50. Between good
    /// (exclusive) and leading practice (inclusive) it falls from 100 to 50
    /// as `raw` approaches leading practice. Everything else, including
    /// `raw == good`, scores 100. Rounds half away from zero.
    pub fn normalise(&self, raw: f64) -> Result<i64> {
        let kind = self.kind();
        if !matches!(kind, KpiKind::Number | KpiKind::NumbersSet) {
            return Err(KpiError::NormalisationNotImplemented(kind));
        }
        let (good, leading) = match (self.good_practice, self.leading_practice) {
            (Some(good), Some(leading)) => (good, leading),
            _ => return Err(KpiError::MissingThresholds),
        };

        let scaled = if raw < good {
            raw * 50.0 / good
        } else if good < raw && raw <= leading {
            50.0 + 50.0 * ((leading - raw) / (leading - good))
        } else {
            return Ok(100);
        };
        Ok((scaled + 0.5).trunc() as i64)
    }

    /// Classifies the raw score against the practice thresholds.
    ///
    /// Requires a non-zero raw score. Reporting-only KPIs short-circuit, and
    /// a KPI with neither threshold stays [`KpiStatus::Undefined`].
    pub fn calculate_status(&mut self) -> Result<()> {
        let raw = match self.raw_score {
            Some(raw) if raw != 0.0 => raw,
            _ => return Err(KpiError::MissingRawScore),
        };

        if self.reporting_only {
            self.status = KpiStatus::ReportingOnly;
            return Ok(());
        }

        let (good, leading) = match (self.good_practice, self.leading_practice) {
            (None, None) => {
                self.status = KpiStatus::Undefined;
                return Ok(());
            }
            (Some(good), Some(leading)) => (good, leading),
            _ => return Err(KpiError::MissingThresholds),
        };

        self.status = if good < raw && raw < leading {
            KpiStatus::GoodPractice
        } else if raw >= leading {
            KpiStatus::LeadingPractice
        } else if raw < good {
            KpiStatus::NeedsImprovement
        } else {
            return Err(KpiError::StatusOutOfBounds { raw, good, leading });
        };
        Ok(())
    }
}
