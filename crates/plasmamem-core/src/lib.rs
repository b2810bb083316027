//! plasmamem-core: round state machine, answer evaluation and drug-likeness rules.
//!
//! This crate defines the data model, the collaborator traits, and the quiz
//! logic that the rest of plasmamem builds on. Network access and rendering
//! live behind the [`traits::CompoundSource`] and [`traits::DisplaySink`]
//! seams.

pub mod assembler;
pub mod compliance;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod feedback;
pub mod formula;
pub mod model;
pub mod pool;
pub mod session;
pub mod traits;
