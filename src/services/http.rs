//! Blocking HTTP clients for AlphaFold DB and ESMFold.

use std::time::Duration;

use ureq::Agent;

use super::{
    alphafold_url, check_length, has_coordinates, normalize_accession,
    FoldingService, StructureSource,
};
use crate::error::FoldshiftError;
use crate::options::ServiceOptions;

const USER_AGENT: &str = concat!("foldshift/", env!("CARGO_PKG_VERSION"));

fn agent(timeout_secs: u64) -> Agent {
    Agent::config_builder()
        .timeout_global(Some(Duration::from_secs(timeout_secs)))
        .http_status_as_error(false)
        .build()
        .into()
}

/// Read a PDB response body, mapping HTTP and content failures.
fn read_structure(
    response: ureq::http::Response<ureq::Body>,
    what: &str,
) -> Result<String, FoldshiftError> {
    let status = response.status().as_u16();
    if status == 404 {
        return Err(FoldshiftError::Service(format!("{what}: not found")));
    }
    if status >= 400 {
        return Err(FoldshiftError::Service(format!("{what}: HTTP {status}")));
    }
    let text = response.into_body().read_to_string().map_err(|e| {
        FoldshiftError::Service(format!("{what}: failed to read response: {e}"))
    })?;
    if !has_coordinates(&text) {
        return Err(FoldshiftError::Service(format!(
            "{what}: response contains no coordinate records"
        )));
    }
    Ok(text)
}

/// AlphaFold DB model download.
pub struct AlphaFoldClient {
    agent: Agent,
    url_template: String,
}

impl AlphaFoldClient {
    /// Client for the configured AlphaFold URL template.
    #[must_use]
    pub fn new(options: &ServiceOptions) -> Self {
        Self {
            agent: agent(options.timeout_secs),
            url_template: options.alphafold_url.clone(),
        }
    }
}

impl StructureSource for AlphaFoldClient {
    fn fetch_structure(&self, accession: &str) -> Result<String, FoldshiftError> {
        let accession = normalize_accession(accession)?;
        let url = alphafold_url(&self.url_template, &accession);
        log::info!("Downloading AlphaFold model for {accession}...");

        let response = self
            .agent
            .get(&url)
            .header("User-Agent", USER_AGENT)
            .call()
            .map_err(|e| {
                FoldshiftError::Service(format!("AlphaFold {accession}: {e}"))
            })?;
        let text = read_structure(response, &format!("AlphaFold {accession}"))?;
        log::debug!("AlphaFold {accession}: {} bytes", text.len());
        Ok(text)
    }
}

/// ESMFold single-sequence prediction.
pub struct EsmFoldClient {
    agent: Agent,
    url: String,
    max_length: usize,
}

impl EsmFoldClient {
    /// Client for the configured ESMFold endpoint and length limit.
    #[must_use]
    pub fn new(options: &ServiceOptions) -> Self {
        Self {
            agent: agent(options.timeout_secs),
            url: options.esmfold_url.clone(),
            max_length: options.max_fold_length,
        }
    }
}

impl FoldingService for EsmFoldClient {
    fn max_length(&self) -> usize {
        self.max_length
    }

    fn fold(&self, sequence: &str) -> Result<String, FoldshiftError> {
        check_length(sequence, self.max_length)?;
        log::info!("Folding {} residues with ESMFold...", sequence.len());

        let response = self
            .agent
            .post(&self.url)
            .header("User-Agent", USER_AGENT)
            .header("Content-Type", "text/plain")
            .send(sequence)
            .map_err(|e| FoldshiftError::Service(format!("ESMFold: {e}")))?;
        read_structure(response, "ESMFold")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unreachable_options() -> ServiceOptions {
        ServiceOptions {
            alphafold_url: "http://127.0.0.1:9/AF-{accession}.pdb".to_owned(),
            esmfold_url: "http://127.0.0.1:9/fold".to_owned(),
            max_fold_length: 10,
            timeout_secs: 2,
        }
    }

    #[test]
    fn long_sequence_rejected_before_request() {
        let client = EsmFoldClient::new(&unreachable_options());
        assert_eq!(client.max_length(), 10);
        assert!(matches!(
            client.fold("ACDEFGHIKLM"),
            Err(FoldshiftError::SequenceTooLong { len: 11, limit: 10 })
        ));
    }

    #[test]
    fn malformed_accession_rejected_before_request() {
        let client = AlphaFoldClient::new(&unreachable_options());
        assert!(matches!(
            client.fetch_structure("not-an-id"),
            Err(FoldshiftError::InvalidInput(_))
        ));
    }

    #[test]
    fn transport_failure_is_a_service_error() {
        let client = EsmFoldClient::new(&unreachable_options());
        assert!(matches!(
            client.fold("ACDEF"),
            Err(FoldshiftError::Service(_))
        ));
    }
}
