//! The `plasmamem init` command.

use std::path::Path;

use anyhow::{Context, Result};

pub fn execute() -> Result<()> {
    write_if_missing("plasmamem.toml", SAMPLE_CONFIG)?;
    write_if_missing("cid_pool.json", SAMPLE_POOL)?;
    write_if_missing("compounds.json", SAMPLE_FIXTURE)?;

    println!("\nNext steps:");
    println!("  1. Run: plasmamem rules");
    println!("  2. Run: plasmamem play");
    println!("  3. Switch [source] to the fixture in plasmamem.toml to play offline");

    Ok(())
}

fn write_if_missing(path: &str, content: &str) -> Result<()> {
    if Path::new(path).exists() {
        println!("{path} already exists, skipping.");
    } else {
        std::fs::write(path, content).with_context(|| format!("failed to write {path}"))?;
        println!("Created {path}");
    }
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# plasmamem configuration

pool_path = "cid_pool.json"
max_attempts = 12
fetch_timeout_secs = 10

[source]
type = "pubchem"
base_url = "https://pubchem.ncbi.nlm.nih.gov/rest/pug"
timeout_secs = 10

# Offline play from the bundled fixture:
# [source]
# type = "fixture"
# path = "compounds.json"
"#;

const SAMPLE_POOL: &str = "[2244, 2519, 3672, 2764, 5284373]\n";

const SAMPLE_FIXTURE: &str = r#"{
  "compounds": [
    {
      "cid": 2244,
      "molecular_weight": 180.16,
      "xlogp": 1.2,
      "tpsa": 63.6,
      "hbond_donors": 1,
      "hbond_acceptors": 4,
      "rotatable_bonds": 3,
      "iupac_name": "2-acetyloxybenzoic acid",
      "formula": "C9H8O4",
      "synonyms": ["aspirin"]
    },
    {
      "cid": 2519,
      "molecular_weight": 194.19,
      "xlogp": -0.1,
      "tpsa": 58.4,
      "hbond_donors": 0,
      "hbond_acceptors": 3,
      "rotatable_bonds": 0,
      "iupac_name": "1,3,7-trimethylpurine-2,6-dione",
      "formula": "C8H10N4O2",
      "synonyms": ["caffeine"]
    },
    {
      "cid": 3672,
      "molecular_weight": 206.28,
      "xlogp": 3.5,
      "tpsa": 37.3,
      "hbond_donors": 1,
      "hbond_acceptors": 2,
      "rotatable_bonds": 4,
      "iupac_name": "2-[4-(2-methylpropyl)phenyl]propanoic acid",
      "formula": "C13H18O2",
      "synonyms": ["ibuprofen"]
    },
    {
      "cid": 2764,
      "molecular_weight": 331.34,
      "xlogp": -1.1,
      "tpsa": 72.9,
      "hbond_donors": 2,
      "hbond_acceptors": 7,
      "rotatable_bonds": 3,
      "formula": "C17H18FN3O3",
      "synonyms": ["ciprofloxacin"]
    },
    {
      "cid": 5284373,
      "molecular_weight": 1202.6,
      "xlogp": 7.5,
      "tpsa": 279.0,
      "hbond_donors": 5,
      "hbond_acceptors": 12,
      "rotatable_bonds": 15,
      "formula": "C62H111N11O12",
      "synonyms": ["cyclosporin A"]
    }
  ]
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    use plasmamem_core::pool::CompoundPool;
    use plasmamem_providers::config::{parse_config, SourceConfig};
    use plasmamem_providers::fixture::FixtureSource;

    #[test]
    fn sample_config_parses() {
        let config = parse_config(SAMPLE_CONFIG).unwrap();
        assert_eq!(config.max_attempts, 12);
        assert_eq!(config.source, SourceConfig::default());
    }

    #[test]
    fn sample_pool_matches_fixture() {
        let pool = CompoundPool::from_json(SAMPLE_POOL).unwrap();
        let fixture = FixtureSource::from_json(SAMPLE_FIXTURE).unwrap();

        let mut ids = pool.ids().to_vec();
        ids.sort_unstable();
        assert_eq!(ids, fixture.ids());
    }
}
