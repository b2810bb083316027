//! plasmamem-providers: compound data sources.
//!
//! Implements the `CompoundSource` trait for the PubChem REST API and for
//! local JSON fixtures, plus a scriptable mock for tests.

pub mod config;
pub mod error;
pub mod fixture;
pub mod mock;
pub mod pubchem;

pub use config::{create_source, load_config_from, PlasmamemConfig, SourceConfig};
pub use error::SourceError;
