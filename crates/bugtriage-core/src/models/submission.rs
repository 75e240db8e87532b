use serde::{Deserialize, Serialize};

use super::bug::{Environment, Severity, SubmissionContext};

/// The inbound defect report, before it has passed quality gating or been
/// assigned an id. Mirrors `Bug`'s input fields; everything derived (score,
/// embedding, duplicate linkage, status) is computed downstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub title: String,
    pub description: String,
    pub product: String,

    pub component: Option<String>,
    pub version: Option<String>,
    pub severity: Option<Severity>,
    pub environment: Option<Environment>,
    pub device: Option<String>,
    pub os_version: Option<String>,
    pub build_version: Option<String>,
    pub region: Option<String>,
    pub reporter: Option<String>,
    #[serde(default)]
    pub repro_steps: Vec<String>,
    pub expected_result: Option<String>,
    pub actual_result: Option<String>,
    pub logs: Option<String>,

    #[serde(default)]
    pub context: SubmissionContext,
}

impl Submission {
    /// Text assembled for embedding and for the content-hash cache key.
    /// Single source of truth for C1 input: this must be byte-identical
    /// between insert and query, since any divergence invalidates recall.
    /// Concatenates, space-separated, skipping empty fields: `title`,
    /// `description`, `repro_steps` (joined), `"Device: <device>"`,
    /// `"Build: <build_version>"`, `"Region: <region>"`.
    pub fn embedding_text(&self) -> String {
        let mut parts: Vec<String> = Vec::new();

        if !self.title.trim().is_empty() {
            parts.push(self.title.clone());
        }
        if !self.description.trim().is_empty() {
            parts.push(self.description.clone());
        }
        for step in &self.repro_steps {
            if !step.trim().is_empty() {
                parts.push(step.clone());
            }
        }
        if let Some(device) = self.device.as_deref().filter(|s| !s.trim().is_empty()) {
            parts.push(format!("Device: {device}"));
        }
        if let Some(build) = self
            .build_version
            .as_deref()
            .filter(|s| !s.trim().is_empty())
        {
            parts.push(format!("Build: {build}"));
        }
        if let Some(region) = self.region.as_deref().filter(|s| !s.trim().is_empty()) {
            parts.push(format!("Region: {region}"));
        }

        parts.join(" ")
    }
}
