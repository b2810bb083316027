//! Learner-facing feedback messages.

use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::evaluator::{EvaluationReport, ValueField};
use crate::model::RoundRecord;

/// Congratulations shown after a perfect round.
pub const STREAK_MESSAGES: [&str; 15] = [
    "Ah, a fellow drug hunter!",
    "POLAR PANIC!!!",
    "Nrot or Not?",
    "Rotor Rumble",
    "Lead or Leave?",
    "Verber Verdict",
    "Are you the Professor?",
    "Enjoying 177?",
    "Pssst, ǝʇɐʇoɹ spuoq",
    "HighFive?",
    "Polar Explorer",
    "Easy on the grease",
    "Preclinical Prodigy",
    "Permeability Pro",
    "Bioavailable Boss",
];

pub const LOAD_FAILED_MESSAGE: &str = "Could not load a molecule, try again.";

/// Pick a congratulation at random.
pub fn pick_message<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    STREAK_MESSAGES
        .choose(rng)
        .copied()
        .unwrap_or(STREAK_MESSAGES[0])
}

/// What the display should tell the learner.
#[derive(Debug, Clone, PartialEq)]
pub enum Feedback {
    /// Every check passed.
    Success { message: String },
    /// At least one check failed; lists what to revise.
    Revise {
        report: EvaluationReport,
        database_hba: u32,
        database_hbd: u32,
    },
    /// Answers were revealed.
    Revealed,
    /// No round could be assembled.
    LoadFailed { reason: String },
}

impl Feedback {
    pub fn revise(report: EvaluationReport, round: &RoundRecord) -> Self {
        Feedback::Revise {
            report,
            database_hba: round.hbond_acceptors,
            database_hbd: round.hbond_donors,
        }
    }

    /// Severity class for styling: `ok`, `warn`, or `info`.
    pub fn class(&self) -> &'static str {
        match self {
            Feedback::Success { .. } => "ok",
            Feedback::Revise { .. } | Feedback::LoadFailed { .. } => "warn",
            Feedback::Revealed => "info",
        }
    }
}

fn mark(ok: bool) -> &'static str {
    if ok {
        "CORRECT"
    } else {
        "REVISE"
    }
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Feedback::Success { message } => write!(f, "All Correct! {message}"),
            Feedback::Revise {
                report,
                database_hba,
                database_hbd,
            } => {
                writeln!(f, "Almost there… revise:")?;
                writeln!(f)?;
                writeln!(f, "Value:")?;
                for field in [
                    ValueField::LipinskiHba,
                    ValueField::HbondDonors,
                    ValueField::RotatableBonds,
                ] {
                    writeln!(f, "• {} {}", field.label(), mark(report.value_ok(field)))?;
                }
                writeln!(f)?;
                writeln!(f, "Compliance:")?;
                for check in &report.compliance {
                    writeln!(f, "• {} {}", check.metric.label(), mark(check.correct))?;
                }
                writeln!(f)?;
                write!(
                    f,
                    "PubChem HBA_actual: {database_hba} · HBD_actual: {database_hbd}"
                )
            }
            Feedback::Revealed => write!(f, "Answer revealed."),
            Feedback::LoadFailed { .. } => f.write_str(LOAD_FAILED_MESSAGE),
        }
    }
}
