//! PubChem PUG REST source implementation.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use tracing::instrument;

use plasmamem_core::model::{CompoundId, PropertyRecord};
use plasmamem_core::traits::CompoundSource;

use crate::error::SourceError;

pub const DEFAULT_BASE_URL: &str = "https://pubchem.ncbi.nlm.nih.gov/rest/pug";
pub const RECORD_BASE_URL: &str = "https://pubchem.ncbi.nlm.nih.gov/compound";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
const PROPERTY_LIST: &str =
    "MolecularWeight,XLogP,HBondDonorCount,HBondAcceptorCount,RotatableBondCount,TPSA,IUPACName";

/// PNG depiction of a compound under a PUG REST base URL.
pub fn structure_image_url(base_url: &str, cid: CompoundId) -> String {
    format!("{base_url}/compound/cid/{cid}/PNG")
}

/// Public compound summary page.
pub fn record_url(cid: CompoundId) -> String {
    format!("{RECORD_BASE_URL}/{cid}")
}

/// PubChem compound database.
pub struct PubChemSource {
    base_url: String,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl PubChemSource {
    pub fn new(base_url: Option<String>, timeout_secs: u64) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| SourceError::Client(e.to_string()))?;

        let base_url = base_url
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_secs,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        cid: CompoundId,
        path: &str,
    ) -> Result<T, SourceError> {
        let url = format!("{}/compound/cid/{cid}/{path}", self.base_url);
        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                SourceError::Timeout(self.timeout_secs)
            } else {
                SourceError::NetworkError(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        if status == 404 {
            return Err(SourceError::NotFound(cid));
        }
        if status >= 400 {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<FaultResponse>(&body)
                .map(|f| f.fault.message)
                .unwrap_or(body);
            return Err(SourceError::ApiError { status, message });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| SourceError::Parse(e.to_string()))
    }
}

#[derive(Deserialize)]
struct FaultResponse {
    #[serde(rename = "Fault")]
    fault: Fault,
}

#[derive(Deserialize)]
struct Fault {
    #[serde(rename = "Message", default)]
    message: String,
}

#[derive(Deserialize)]
struct PropertyTableResponse<T> {
    #[serde(rename = "PropertyTable")]
    table: PropertyTable<T>,
}

#[derive(Deserialize)]
struct PropertyTable<T> {
    #[serde(rename = "Properties")]
    properties: Vec<T>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PubChemProperties {
    #[serde(rename = "CID")]
    cid: CompoundId,
    #[serde(default, deserialize_with = "lenient_f64")]
    molecular_weight: Option<f64>,
    #[serde(rename = "XLogP", default, deserialize_with = "lenient_f64")]
    xlogp: Option<f64>,
    #[serde(rename = "TPSA", default, deserialize_with = "lenient_f64")]
    tpsa: Option<f64>,
    #[serde(rename = "HBondDonorCount", default)]
    hbond_donor_count: Option<u32>,
    #[serde(rename = "HBondAcceptorCount", default)]
    hbond_acceptor_count: Option<u32>,
    #[serde(default)]
    rotatable_bond_count: Option<u32>,
    #[serde(rename = "IUPACName", default)]
    iupac_name: Option<String>,
}

impl From<PubChemProperties> for PropertyRecord {
    fn from(p: PubChemProperties) -> Self {
        PropertyRecord {
            cid: p.cid,
            molecular_weight: p.molecular_weight,
            xlogp: p.xlogp,
            tpsa: p.tpsa,
            hbond_donors: p.hbond_donor_count,
            hbond_acceptors: p.hbond_acceptor_count,
            rotatable_bonds: p.rotatable_bond_count,
            iupac_name: p.iupac_name,
        }
    }
}

#[derive(Deserialize)]
struct FormulaEntry {
    #[serde(rename = "MolecularFormula")]
    molecular_formula: String,
}

#[derive(Deserialize)]
struct SynonymsResponse {
    #[serde(rename = "InformationList")]
    information_list: InformationList,
}

#[derive(Deserialize)]
struct InformationList {
    #[serde(rename = "Information", default)]
    information: Vec<SynonymEntry>,
}

#[derive(Deserialize)]
struct SynonymEntry {
    #[serde(rename = "Synonym", default)]
    synonym: Vec<String>,
}

/// PubChem reports some numbers (notably molecular weight) as strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum Numeric {
    Number(f64),
    Text(String),
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Numeric>::deserialize(deserializer)?;
    Ok(raw.and_then(|n| match n {
        Numeric::Number(v) => Some(v),
        Numeric::Text(s) => s.trim().parse().ok(),
    }))
}

#[async_trait]
impl CompoundSource for PubChemSource {
    fn name(&self) -> &str {
        "pubchem"
    }

    #[instrument(skip(self))]
    async fn fetch_properties(&self, cid: CompoundId) -> anyhow::Result<PropertyRecord> {
        let response: PropertyTableResponse<PubChemProperties> = self
            .get_json(cid, &format!("property/{PROPERTY_LIST}/JSON"))
            .await?;
        let props = response
            .table
            .properties
            .into_iter()
            .next()
            .ok_or_else(|| SourceError::Parse("empty property table".into()))?;
        Ok(props.into())
    }

    #[instrument(skip(self))]
    async fn fetch_formula(&self, cid: CompoundId) -> anyhow::Result<String> {
        let response: PropertyTableResponse<FormulaEntry> = self
            .get_json(cid, "property/MolecularFormula/JSON")
            .await?;
        let entry = response
            .table
            .properties
            .into_iter()
            .next()
            .ok_or_else(|| SourceError::Parse("empty formula table".into()))?;
        Ok(entry.molecular_formula)
    }

    #[instrument(skip(self))]
    async fn fetch_synonyms(&self, cid: CompoundId) -> anyhow::Result<Vec<String>> {
        let response: SynonymsResponse = self.get_json(cid, "synonyms/JSON").await?;
        Ok(response
            .information_list
            .information
            .into_iter()
            .next()
            .map(|e| e.synonym)
            .unwrap_or_default())
    }

    fn structure_image_url(&self, cid: CompoundId) -> String {
        structure_image_url(&self.base_url, cid)
    }

    fn record_url(&self, cid: CompoundId) -> String {
        record_url(cid)
    }
}
