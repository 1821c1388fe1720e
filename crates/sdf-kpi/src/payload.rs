//! KPI input payloads.
//!
//! Each [`KpiPayload`] variant carries exactly the input its kind needs and
//! knows how to turn it into a raw score:
//!
//! | Kind          | Raw score                                           |
//! |---------------|-----------------------------------------------------|
//! | `Number`      | the value itself                                    |
//! | `NumbersSet`  | the aggregation function applied to the values      |
//! | questionnaire | sum of the scores of each question's selected reply |

use std::collections::BTreeMap;

use sdf_models::KpiKind;
use serde::{Deserialize, Serialize};

use crate::error::{KpiError, Result};

/// Named inputs of a `NumbersSet` KPI, e.g. `{"cars": 100, "vans": 20}`.
pub type NumberSet = BTreeMap<String, f64>;

/// Reduces a [`NumberSet`] to a raw score.
pub type AggregateFn = fn(&NumberSet) -> f64;

/// Built-in aggregation functions, addressable by name from definitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregate {
    Sum,
    Mean,
    Min,
    Max,
}

impl Aggregate {
    pub fn function(&self) -> AggregateFn {
        match self {
            Aggregate::Sum => sum,
            Aggregate::Mean => mean,
            Aggregate::Min => min,
            Aggregate::Max => max,
        }
    }
}

fn sum(values: &NumberSet) -> f64 {
    values.values().sum()
}

fn mean(values: &NumberSet) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    sum(values) / values.len() as f64
}

fn min(values: &NumberSet) -> f64 {
    values.values().copied().reduce(f64::min).unwrap_or(0.0)
}

fn max(values: &NumberSet) -> f64 {
    values.values().copied().reduce(f64::max).unwrap_or(0.0)
}

/// A scored question: reply options with their scores, plus the reply
/// selected by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub text: String,
    pub options: BTreeMap<String, f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply: Option<String>,
}

impl Question {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            options: BTreeMap::new(),
            reply: None,
        }
    }

    /// Adds a reply option with its score.
    pub fn option(mut self, reply: impl Into<String>, score: f64) -> Self {
        self.options.insert(reply.into(), score);
        self
    }

    /// Selects a reply.
    pub fn reply(mut self, reply: impl Into<String>) -> Self {
        self.reply = Some(reply.into());
        self
    }

    /// A yes/no question scoring `yes` and `no`.
    pub fn yes_no(text: impl Into<String>, yes: f64, no: f64) -> Self {
        Self::new(text).option("yes", yes).option("no", no)
    }

    /// Score of the selected reply.
    ///
    /// # Errors
    /// Fails when no reply is selected or the reply is not an option.
    pub fn score(&self) -> Result<f64> {
        let reply = match self.reply.as_deref() {
            Some(reply) if !reply.is_empty() => reply,
            _ => {
                return Err(KpiError::MissingReply {
                    question: self.text.clone(),
                })
            }
        };
        self.options
            .get(reply)
            .copied()
            .ok_or_else(|| KpiError::UnknownReply {
                question: self.text.clone(),
                reply: reply.to_string(),
            })
    }
}

/// Kind-specific KPI input.
#[derive(Debug, Clone)]
pub enum KpiPayload {
    Number { value: f64 },
    NumbersSet { values: NumberSet, aggregate: AggregateFn },
    Quiz { questions: Vec<Question> },
    Checkboxes { questions: Vec<Question> },
    Binary { question: Question },
}

impl KpiPayload {
    pub fn number(value: f64) -> Self {
        KpiPayload::Number { value }
    }

    pub fn numbers_set(values: NumberSet, aggregate: AggregateFn) -> Self {
        KpiPayload::NumbersSet { values, aggregate }
    }

    pub fn kind(&self) -> KpiKind {
        match self {
            KpiPayload::Number { .. } => KpiKind::Number,
            KpiPayload::NumbersSet { .. } => KpiKind::NumbersSet,
            KpiPayload::Quiz { .. } => KpiKind::Quiz,
            KpiPayload::Checkboxes { .. } => KpiKind::Checkboxes,
            KpiPayload::Binary { .. } => KpiKind::Binary,
        }
    }

    /// Checks the structural rules of the payload's kind.
    ///
    /// Quizzes need at least one question with at least one option each.
    /// Checkboxes need exactly one scoreable option per question. A binary
    /// question must offer exactly two options.
    pub fn validate_shape(&self) -> Result<()> {
        let invalid = |reason: String| KpiError::InvalidPayload {
            kind: self.kind(),
            reason,
        };

        match self {
            KpiPayload::Number { .. } | KpiPayload::NumbersSet { .. } => Ok(()),
            KpiPayload::Quiz { questions } => {
                if questions.is_empty() {
                    return Err(invalid("no questions".to_string()));
                }
                match questions.iter().find(|q| q.options.is_empty()) {
                    Some(q) => Err(invalid(format!("question {:?} has no options", q.text))),
                    None => Ok(()),
                }
            }
            KpiPayload::Checkboxes { questions } => {
                if questions.is_empty() {
                    return Err(invalid("no questions".to_string()));
                }
                match questions.iter().find(|q| q.options.len() != 1) {
                    Some(q) => Err(invalid(format!(
                        "question {:?} must have exactly one option, has {}",
                        q.text,
                        q.options.len()
                    ))),
                    None => Ok(()),
                }
            }
            KpiPayload::Binary { question } => {
                if question.options.len() != 2 {
                    return Err(invalid(format!(
                        "question {:?} must have exactly two options, has {}",
                        question.text,
                        question.options.len()
                    )));
                }
                Ok(())
            }
        }
    }

    /// Computes the raw score.
    pub fn raw_score(&self) -> Result<f64> {
        match self {
            KpiPayload::Number { value } => Ok(*value),
            KpiPayload::NumbersSet { values, aggregate } => Ok(aggregate(values)),
            KpiPayload::Quiz { questions } | KpiPayload::Checkboxes { questions } => {
                questions.iter().map(Question::score).sum()
            }
            KpiPayload::Binary { question } => question.score(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vehicles() -> NumberSet {
        NumberSet::from([
            ("cars".to_string(), 100.0),
            ("vans".to_string(), 20.0),
            ("lorries".to_string(), 5.0),
        ])
    }

    fn hw1_calculation(vehicles: &NumberSet) -> f64 {
        vehicles["cars"] * 50.0 + vehicles["vans"] * 100.0 + vehicles["lorries"] * 150.0
    }

    #[test]
    fn test_number_raw_score_is_value() {
        assert_eq!(KpiPayload::number(76.0).raw_score().unwrap(), 76.0);
    }

    #[test]
    fn test_numbers_set_uses_injected_function() {
        let payload = KpiPayload::numbers_set(vehicles(), hw1_calculation);
        assert_eq!(payload.raw_score().unwrap(), 7750.0);
        assert_eq!(payload.kind(), KpiKind::NumbersSet);
    }

    #[test]
    fn test_builtin_aggregates() {
        let values = vehicles();
        assert_eq!(Aggregate::Sum.function()(&values), 125.0);
        assert_eq!(Aggregate::Min.function()(&values), 5.0);
        assert_eq!(Aggregate::Max.function()(&values), 100.0);
        assert!((Aggregate::Mean.function()(&values) - 125.0 / 3.0).abs() < 1e-9);
        assert_eq!(Aggregate::Mean.function()(&NumberSet::new()), 0.0);
    }

    #[test]
    fn test_quiz_sums_selected_replies() {
        let payload = KpiPayload::Quiz {
            questions: vec![
                Question::new("Energy strategy?")
                    .option("none", 0.0)
                    .option("draft", 2.0)
                    .option("approved", 5.0)
                    .reply("draft"),
                Question::yes_no("Metering installed?", 3.0, 0.0).reply("yes"),
            ],
        };
        assert_eq!(payload.raw_score().unwrap(), 5.0);
    }

    #[test]
    fn test_binary_yes_scores_one() {
        let payload = KpiPayload::Binary {
            question: Question::yes_no("Green roof?", 1.0, 0.0).reply("yes"),
        };
        payload.validate_shape().unwrap();
        assert_eq!(payload.raw_score().unwrap(), 1.0);
    }

    #[test]
    fn test_reply_must_be_selected_and_known() {
        let unanswered = Question::yes_no("Q", 1.0, 0.0);
        assert!(matches!(unanswered.score(), Err(KpiError::MissingReply { .. })));

        let empty = Question::yes_no("Q", 1.0, 0.0).reply("");
        assert!(matches!(empty.score(), Err(KpiError::MissingReply { .. })));

        let unknown = Question::yes_no("Q", 1.0, 0.0).reply("maybe");
        assert!(matches!(unknown.score(), Err(KpiError::UnknownReply { .. })));
    }

    #[test]
    fn test_shape_rules() {
        let no_questions = KpiPayload::Quiz { questions: vec![] };
        assert!(no_questions.validate_shape().is_err());

        let two_boxes = KpiPayload::Checkboxes {
            questions: vec![Question::yes_no("Q", 1.0, 0.0)],
        };
        assert!(matches!(
            two_boxes.validate_shape(),
            Err(KpiError::InvalidPayload {
                kind: KpiKind::Checkboxes,
                ..
            })
        ));

        let one_box = KpiPayload::Checkboxes {
            questions: vec![Question::new("Q").option("ticked", 2.0).reply("ticked")],
        };
        one_box.validate_shape().unwrap();
        assert_eq!(one_box.raw_score().unwrap(), 2.0);

        let three_way = KpiPayload::Binary {
            question: Question::yes_no("Q", 1.0, 0.0).option("maybe", 0.5),
        };
        assert!(three_way.validate_shape().is_err());
    }
}
