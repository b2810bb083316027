//! Core data model types for plasmamem.
//!
//! A round is built from a [`PropertyRecord`] fetched from the compound
//! database. Once assembled, a [`RoundRecord`] is never mutated.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::compliance::Metric;
use crate::error::IncompleteRecord;

/// Integer compound identifier (a PubChem CID).
pub type CompoundId = u64;

/// Name shown when neither a synonym nor a systematic name is available.
pub const PLACEHOLDER_NAME: &str = "—";

/// Raw property set for a compound, as reported by the source database.
///
/// Every numeric field may be absent; a record with holes is rejected by
/// the assembler rather than patched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyRecord {
    pub cid: CompoundId,
    #[serde(default)]
    pub molecular_weight: Option<f64>,
    #[serde(default)]
    pub xlogp: Option<f64>,
    #[serde(default)]
    pub tpsa: Option<f64>,
    #[serde(default)]
    pub hbond_donors: Option<u32>,
    #[serde(default)]
    pub hbond_acceptors: Option<u32>,
    #[serde(default)]
    pub rotatable_bonds: Option<u32>,
    /// Systematic (IUPAC) name, used as the display-name fallback.
    #[serde(default)]
    pub iupac_name: Option<String>,
}

impl PropertyRecord {
    /// The first required field that is absent, if any.
    pub fn missing_field(&self) -> Option<&'static str> {
        if self.molecular_weight.is_none() {
            Some("molecular_weight")
        } else if self.xlogp.is_none() {
            Some("xlogp")
        } else if self.tpsa.is_none() {
            Some("tpsa")
        } else if self.hbond_acceptors.is_none() {
            Some("hbond_acceptors")
        } else if self.hbond_donors.is_none() {
            Some("hbond_donors")
        } else if self.rotatable_bonds.is_none() {
            Some("rotatable_bonds")
        } else {
            None
        }
    }

    pub fn is_complete(&self) -> bool {
        self.missing_field().is_none()
    }
}

/// Everything a round needs, fixed at assembly time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    pub cid: CompoundId,
    /// Display name (synonym, systematic name, or placeholder).
    pub name: String,
    /// g/mol.
    pub molecular_weight: f64,
    pub xlogp: f64,
    /// Å².
    pub tpsa: f64,
    pub hbond_donors: u32,
    pub rotatable_bonds: u32,
    /// Acceptor count as reported by the database.
    pub hbond_acceptors: u32,
    /// `#N + #O` from the molecular formula, or the database count when the
    /// formula could not be fetched.
    pub lipinski_hba: u32,
    pub structure_image_url: String,
    pub record_url: String,
}

/// Presentation-only extras attached to a round.
#[derive(Debug, Clone, Default)]
pub struct RoundLinks {
    pub structure_image_url: String,
    pub record_url: String,
}

impl RoundRecord {
    /// Build a round from a complete property record.
    pub fn from_properties(
        props: &PropertyRecord,
        name: String,
        lipinski_hba: u32,
        links: RoundLinks,
    ) -> Result<Self, IncompleteRecord> {
        let missing = |field| IncompleteRecord {
            cid: props.cid,
            field,
        };
        Ok(Self {
            cid: props.cid,
            name,
            molecular_weight: props
                .molecular_weight
                .ok_or_else(|| missing("molecular_weight"))?,
            xlogp: props.xlogp.ok_or_else(|| missing("xlogp"))?,
            tpsa: props.tpsa.ok_or_else(|| missing("tpsa"))?,
            hbond_donors: props.hbond_donors.ok_or_else(|| missing("hbond_donors"))?,
            rotatable_bonds: props
                .rotatable_bonds
                .ok_or_else(|| missing("rotatable_bonds"))?,
            hbond_acceptors: props
                .hbond_acceptors
                .ok_or_else(|| missing("hbond_acceptors"))?,
            lipinski_hba,
            structure_image_url: links.structure_image_url,
            record_url: links.record_url,
        })
    }

    /// The value judged for `metric`.
    ///
    /// The acceptor judgment uses the Lipinski approximation, not the
    /// database acceptor count.
    pub fn metric_value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::MolecularWeight => self.molecular_weight,
            Metric::LogP => self.xlogp,
            Metric::HbondAcceptors => f64::from(self.lipinski_hba),
            Metric::HbondDonors => f64::from(self.hbond_donors),
            Metric::RotatableBonds => f64::from(self.rotatable_bonds),
            Metric::PolarSurfaceArea => self.tpsa,
        }
    }

    /// Molecular weight formatted for display, e.g. `180.16 g/mol`.
    pub fn weight_display(&self) -> String {
        format!("{:.2} g/mol", self.molecular_weight)
    }

    pub fn tpsa_display(&self) -> String {
        format!("{} Å²", self.tpsa)
    }
}

/// Learner's pass/fail judgment for one metric.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToggleState {
    #[default]
    Unset,
    Pass,
    Fail,
}

impl ToggleState {
    /// Next state: unset → pass → fail → unset.
    pub fn cycle(self) -> Self {
        match self {
            ToggleState::Unset => ToggleState::Pass,
            ToggleState::Pass => ToggleState::Fail,
            ToggleState::Fail => ToggleState::Unset,
        }
    }

    /// The judgment as a boolean, or `None` when unset.
    pub fn judgment(self) -> Option<bool> {
        match self {
            ToggleState::Unset => None,
            ToggleState::Pass => Some(true),
            ToggleState::Fail => Some(false),
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            ToggleState::Unset => "—",
            ToggleState::Pass => "✅",
            ToggleState::Fail => "❌",
        }
    }
}

impl fmt::Display for ToggleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// One toggle per judged metric.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceToggles {
    states: [ToggleState; 6],
}

impl ComplianceToggles {
    pub fn get(&self, metric: Metric) -> ToggleState {
        self.states[metric.index()]
    }

    pub fn set(&mut self, metric: Metric, state: ToggleState) {
        self.states[metric.index()] = state;
    }

    /// Advance the toggle for `metric` and return its new state.
    pub fn cycle(&mut self, metric: Metric) -> ToggleState {
        let next = self.get(metric).cycle();
        self.set(metric, next);
        next
    }

    pub fn reset(&mut self) {
        self.states = [ToggleState::Unset; 6];
    }

    pub fn iter(&self) -> impl Iterator<Item = (Metric, ToggleState)> + '_ {
        Metric::ALL.iter().map(move |&m| (m, self.get(m)))
    }
}

/// The five numeric answers a learner may type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueGuesses {
    /// Lipinski HBA (N+O).
    pub lipinski_hba: Option<u32>,
    pub hbond_donors: Option<u32>,
    pub rotatable_bonds: Option<u32>,
    /// Database-reported HBA.
    pub database_hba: Option<u32>,
    /// Database-reported HBD (same ground truth as `hbond_donors`).
    pub database_hbd: Option<u32>,
}

impl ValueGuesses {
    /// Parse five raw text inputs in field order.
    pub fn from_text(
        lipinski_hba: &str,
        hbond_donors: &str,
        rotatable_bonds: &str,
        database_hba: &str,
        database_hbd: &str,
    ) -> Self {
        Self {
            lipinski_hba: parse_guess(lipinski_hba),
            hbond_donors: parse_guess(hbond_donors),
            rotatable_bonds: parse_guess(rotatable_bonds),
            database_hba: parse_guess(database_hba),
            database_hbd: parse_guess(database_hbd),
        }
    }
}

/// A complete learner submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub guesses: ValueGuesses,
    pub toggles: ComplianceToggles,
}

/// Parse a typed count, keeping its leading integer part.
///
/// `"7"`, `" 7 "`, `"+7"` and `"7.9"` give `Some(7)`. Blank text, text
/// without leading digits, negative numbers and overflow give `None`.
pub fn parse_guess(text: &str) -> Option<u32> {
    let trimmed = text.trim();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    if end == 0 {
        return None;
    }
    unsigned[..end].parse().ok()
}
