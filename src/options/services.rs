use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Remote structure and folding endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Services", inline)]
#[serde(default)]
pub struct ServiceOptions {
    /// AlphaFold DB model URL; `{accession}` is replaced by the UniProt
    /// accession.
    pub alphafold_url: String,
    /// ESMFold endpoint accepting a raw sequence body and returning PDB text.
    pub esmfold_url: String,
    /// Longest sequence ESMFold accepts.
    pub max_fold_length: usize,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            alphafold_url:
                "https://alphafold.ebi.ac.uk/files/AF-{accession}-F1-model_v4.pdb"
                    .to_owned(),
            esmfold_url: "https://api.esmatlas.com/foldSequence/v1/pdb/"
                .to_owned(),
            max_fold_length: 400,
            timeout_secs: 120,
        }
    }
}
