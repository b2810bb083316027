//! Lipinski Rule of Five and Veber rule thresholds.
//!
//! Every judged metric passes when its value is at or below the threshold.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnknownMetric;

/// The rule set a metric belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleSet {
    Lipinski,
    Veber,
}

impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleSet::Lipinski => write!(f, "Lipinski"),
            RuleSet::Veber => write!(f, "Veber"),
        }
    }
}

/// One of the six metrics the learner judges as pass/fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Molecular weight in g/mol.
    MolecularWeight,
    /// Lipophilicity index (XLogP).
    LogP,
    /// Hydrogen-bond acceptor count (Lipinski N+O approximation).
    HbondAcceptors,
    /// Hydrogen-bond donor count.
    HbondDonors,
    /// Rotatable-bond count.
    RotatableBonds,
    /// Topological polar surface area in Å².
    PolarSurfaceArea,
}

impl Metric {
    /// All metrics, in display order.
    pub const ALL: [Metric; 6] = [
        Metric::MolecularWeight,
        Metric::LogP,
        Metric::HbondAcceptors,
        Metric::HbondDonors,
        Metric::RotatableBonds,
        Metric::PolarSurfaceArea,
    ];

    /// Inclusive upper bound for a passing value.
    pub fn threshold(self) -> f64 {
        match self {
            Metric::MolecularWeight => 500.0,
            Metric::LogP => 5.0,
            Metric::HbondAcceptors => 10.0,
            Metric::HbondDonors => 5.0,
            Metric::RotatableBonds => 10.0,
            Metric::PolarSurfaceArea => 140.0,
        }
    }

    pub fn rule(self) -> RuleSet {
        match self {
            Metric::RotatableBonds | Metric::PolarSurfaceArea => RuleSet::Veber,
            _ => RuleSet::Lipinski,
        }
    }

    /// Short label used in feedback text.
    pub fn label(self) -> &'static str {
        match self {
            Metric::MolecularWeight => "MW",
            Metric::LogP => "cLogP",
            Metric::HbondAcceptors => "HBA",
            Metric::HbondDonors => "HBD",
            Metric::RotatableBonds => "NRot",
            Metric::PolarSurfaceArea => "TPSA",
        }
    }

    /// Position of this metric in [`Metric::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Metric {
    type Err = UnknownMetric;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mw" | "weight" | "molecular_weight" => Ok(Metric::MolecularWeight),
            "logp" | "clogp" | "xlogp" => Ok(Metric::LogP),
            "hba" | "acceptors" => Ok(Metric::HbondAcceptors),
            "hbd" | "donors" => Ok(Metric::HbondDonors),
            "nrot" | "rotatable_bonds" | "rotb" => Ok(Metric::RotatableBonds),
            "tpsa" | "psa" | "polar_surface_area" => Ok(Metric::PolarSurfaceArea),
            _ => Err(UnknownMetric(s.to_string())),
        }
    }
}

/// Whether `value` passes the rule for `metric`.
///
/// NaN never passes.
pub fn expected_compliance(metric: Metric, value: f64) -> bool {
    value <= metric.threshold()
}
