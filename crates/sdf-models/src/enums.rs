//! Enumerations shared by the KPI engine and the project container.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Shape of a KPI's input payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KpiKind {
    /// A single number used as-is.
    Number,
    /// A set of named numbers reduced by an aggregation function.
    NumbersSet,
    /// Multiple-choice questionnaire.
    Quiz,
    /// One tick-box per question.
    Checkboxes,
    /// A single yes/no question.
    Binary,
}

impl KpiKind {
    /// Returns true for kinds scored from a questionnaire.
    pub fn is_questionnaire(&self) -> bool {
        matches!(self, KpiKind::Quiz | KpiKind::Checkboxes | KpiKind::Binary)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            KpiKind::Number => "number",
            KpiKind::NumbersSet => "numbers_set",
            KpiKind::Quiz => "quiz",
            KpiKind::Checkboxes => "checkboxes",
            KpiKind::Binary => "binary",
        }
    }
}

impl fmt::Display for KpiKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Qualitative outcome of a KPI evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum KpiStatus {
    /// Not classified yet, or no thresholds to classify against.
    #[default]
    Undefined,
    /// Raw score below the good practice threshold.
    NeedsImprovement,
    /// Raw score between the good and leading practice thresholds.
    GoodPractice,
    /// Raw score at or above the leading practice threshold.
    LeadingPractice,
    /// KPI is reported but never classified.
    ReportingOnly,
    /// KPI does not apply to the project.
    NotApplicable,
}

impl KpiStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            KpiStatus::Undefined => "undefined",
            KpiStatus::NeedsImprovement => "needs_improvement",
            KpiStatus::GoodPractice => "good_practice",
            KpiStatus::LeadingPractice => "leading_practice",
            KpiStatus::ReportingOnly => "reporting_only",
            KpiStatus::NotApplicable => "not_applicable",
        }
    }
}

impl fmt::Display for KpiStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// RIBA plan of work stage.
///
/// Stages are ordered: `Zero < One < ... < Seven`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RibaStage {
    Zero,
    One,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
}

impl RibaStage {
    /// Every stage, in lifecycle order.
    pub const ALL: [RibaStage; 8] = [
        RibaStage::Zero,
        RibaStage::One,
        RibaStage::Two,
        RibaStage::Three,
        RibaStage::Four,
        RibaStage::Five,
        RibaStage::Six,
        RibaStage::Seven,
    ];

    /// Returns the stage number (0-7).
    pub fn as_number(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for RibaStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RIBA stage {}", self.as_number())
    }
}

/// Category of development a project belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DevelopmentType {
    Residential,
    Commercial,
    Masterplan,
}

impl DevelopmentType {
    /// Every development type.
    pub const ALL: [DevelopmentType; 3] = [
        DevelopmentType::Residential,
        DevelopmentType::Commercial,
        DevelopmentType::Masterplan,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DevelopmentType::Residential => "residential",
            DevelopmentType::Commercial => "commercial",
            DevelopmentType::Masterplan => "masterplan",
        }
    }
}

impl fmt::Display for DevelopmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_riba_stage_ordering() {
        assert!(RibaStage::Zero < RibaStage::Seven);
        assert_eq!(RibaStage::Five.as_number(), 5);
        assert_eq!(RibaStage::ALL.len(), 8);
    }

    #[test]
    fn test_kind_serialization() {
        let json = serde_json::to_string(&KpiKind::NumbersSet).unwrap();
        assert_eq!(json, "\"numbers_set\"");

        let parsed: KpiKind = serde_json::from_str("\"binary\"").unwrap();
        assert_eq!(parsed, KpiKind::Binary);
    }

    #[test]
    fn test_questionnaire_kinds() {
        assert!(KpiKind::Quiz.is_questionnaire());
        assert!(KpiKind::Binary.is_questionnaire());
        assert!(!KpiKind::Number.is_questionnaire());
        assert!(!KpiKind::NumbersSet.is_questionnaire());
    }

    #[test]
    fn test_status_default_is_undefined() {
        assert_eq!(KpiStatus::default(), KpiStatus::Undefined);
        assert_eq!(KpiStatus::GoodPractice.to_string(), "good_practice");
    }

    #[test]
    fn test_development_type_display() {
        assert_eq!(DevelopmentType::Masterplan.to_string(), "masterplan");
    }
}
