//! Answer evaluation.
//!
//! Compares a [`Submission`] against a [`RoundRecord`]. Values match by
//! strict equality; a missing guess or an unset toggle is always wrong.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::compliance::{expected_compliance, Metric};
use crate::model::{ComplianceToggles, RoundRecord, Submission, ToggleState};

/// One of the five numeric answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueField {
    LipinskiHba,
    HbondDonors,
    RotatableBonds,
    DatabaseHba,
    DatabaseHbd,
}

impl ValueField {
    pub const ALL: [ValueField; 5] = [
        ValueField::LipinskiHba,
        ValueField::HbondDonors,
        ValueField::RotatableBonds,
        ValueField::DatabaseHba,
        ValueField::DatabaseHbd,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ValueField::LipinskiHba => "HBA",
            ValueField::HbondDonors => "HBD",
            ValueField::RotatableBonds => "NRot",
            ValueField::DatabaseHba => "HBA_actual",
            ValueField::DatabaseHbd => "HBD_actual",
        }
    }

    /// The correct answer for this field.
    ///
    /// Both donor fields share the database donor count.
    pub fn expected(self, round: &RoundRecord) -> u32 {
        match self {
            ValueField::LipinskiHba => round.lipinski_hba,
            ValueField::HbondDonors | ValueField::DatabaseHbd => round.hbond_donors,
            ValueField::RotatableBonds => round.rotatable_bonds,
            ValueField::DatabaseHba => round.hbond_acceptors,
        }
    }

    pub fn submitted(self, submission: &Submission) -> Option<u32> {
        let g = &submission.guesses;
        match self {
            ValueField::LipinskiHba => g.lipinski_hba,
            ValueField::HbondDonors => g.hbond_donors,
            ValueField::RotatableBonds => g.rotatable_bonds,
            ValueField::DatabaseHba => g.database_hba,
            ValueField::DatabaseHbd => g.database_hbd,
        }
    }
}

impl fmt::Display for ValueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome for one numeric field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueCheck {
    pub field: ValueField,
    pub submitted: Option<u32>,
    pub expected: u32,
    pub correct: bool,
}

/// Outcome for one compliance toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceCheck {
    pub metric: Metric,
    pub submitted: ToggleState,
    pub expected: bool,
    pub correct: bool,
}

/// Per-field correctness for one submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// In [`ValueField::ALL`] order.
    pub values: Vec<ValueCheck>,
    /// In [`Metric::ALL`] order.
    pub compliance: Vec<ComplianceCheck>,
}

impl EvaluationReport {
    /// All five values and all six toggles are correct.
    pub fn is_perfect(&self) -> bool {
        self.values.iter().all(|c| c.correct) && self.compliance.iter().all(|c| c.correct)
    }

    pub fn value_ok(&self, field: ValueField) -> bool {
        self.values
            .iter()
            .find(|c| c.field == field)
            .is_some_and(|c| c.correct)
    }

    pub fn compliance_ok(&self, metric: Metric) -> bool {
        self.compliance
            .iter()
            .find(|c| c.metric == metric)
            .is_some_and(|c| c.correct)
    }

    /// Number of correct checks out of eleven.
    pub fn correct_count(&self) -> usize {
        self.values.iter().filter(|c| c.correct).count()
            + self.compliance.iter().filter(|c| c.correct).count()
    }
}

/// Score a submission against a round.
pub fn evaluate(round: &RoundRecord, submission: &Submission) -> EvaluationReport {
    let values = ValueField::ALL
        .iter()
        .map(|&field| {
            let submitted = field.submitted(submission);
            let expected = field.expected(round);
            ValueCheck {
                field,
                submitted,
                expected,
                correct: submitted == Some(expected),
            }
        })
        .collect();

    let compliance = Metric::ALL
        .iter()
        .map(|&metric| {
            let submitted = submission.toggles.get(metric);
            let expected = expected_compliance(metric, round.metric_value(metric));
            ComplianceCheck {
                metric,
                submitted,
                expected,
                correct: submitted.judgment() == Some(expected),
            }
        })
        .collect();

    EvaluationReport { values, compliance }
}

/// Toggles set to the correct judgment for every metric of `round`.
pub fn correct_toggles(round: &RoundRecord) -> ComplianceToggles {
    let mut toggles = ComplianceToggles::default();
    for metric in Metric::ALL {
        let state = if expected_compliance(metric, round.metric_value(metric)) {
            ToggleState::Pass
        } else {
            ToggleState::Fail
        };
        toggles.set(metric, state);
    }
    toggles
}
