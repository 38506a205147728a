//! # Model Version Summary
//!
//! Shapes a model version and its files into the compact payload download
//! clients ask for: resource identifier, primary file, download URL and the
//! early-access fields. Rows arrive already fetched; this module only
//! decides what the caller may see and how it is presented.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub type VersionId = u32;

/// Trial generations granted when early access charges but sets no limit.
pub const DEFAULT_TRIAL_LIMIT: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Availability {
    Public,
    Private,
    EarlyAccess,
    Unsearchable,
    Archived,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelType {
    Checkpoint,
    TextualInversion,
    Hypernetwork,
    AestheticGradient,
    #[serde(rename = "LORA")]
    Lora,
    LoCon,
    DoRA,
    Controlnet,
    Upscaler,
    MotionModule,
    #[serde(rename = "VAE")]
    Vae,
    Poses,
    Wildcards,
    Workflows,
    Other,
}

impl ModelType {
    /// Type segment of a resource identifier.
    pub fn air_type(self) -> &'static str {
        match self {
            ModelType::Checkpoint => "checkpoint",
            ModelType::TextualInversion => "embedding",
            ModelType::Hypernetwork => "hypernet",
            ModelType::AestheticGradient => "ag",
            ModelType::Lora => "lora",
            ModelType::LoCon => "lycoris",
            ModelType::DoRA => "dora",
            ModelType::Controlnet => "controlnet",
            ModelType::Upscaler => "upscaler",
            ModelType::MotionModule => "motion",
            ModelType::Vae => "vae",
            ModelType::Poses => "poses",
            ModelType::Wildcards => "wildcards",
            ModelType::Workflows => "workflows",
            ModelType::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarlyAccessConfig {
    #[serde(default)]
    pub charge_for_generation: bool,
    #[serde(default)]
    pub generation_trial_limit: Option<u32>,
}

/// A model version joined with its model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionRow {
    pub id: VersionId,
    pub version_name: String,
    pub model_id: u32,
    pub model_name: String,
    pub base_model: String,
    pub status: String,
    pub availability: Availability,
    #[serde(rename = "type")]
    pub model_type: ModelType,
    #[serde(default)]
    pub early_access_ends_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub require_auth: bool,
    #[serde(default)]
    pub covered: Option<bool>,
    #[serde(default)]
    pub early_access_config: Option<EarlyAccessConfig>,
}

impl VersionRow {
    pub fn is_published(&self) -> bool {
        self.status == "Published"
    }

    /// Early access is still running; callers must check permission.
    pub fn check_permission(&self, now: DateTime<Utc>) -> bool {
        self.availability == Availability::EarlyAccess
            && self.early_access_ends_at.is_some_and(|ends| ends > now)
    }

    pub fn free_trial_limit(&self) -> Option<u32> {
        self.early_access_config
            .as_ref()
            .filter(|config| config.charge_for_generation)
            .map(|config| config.generation_trial_limit.unwrap_or(DEFAULT_TRIAL_LIMIT))
    }

    /// Ecosystem segment of a resource identifier.
    pub fn ecosystem(&self) -> String {
        let base = self.base_model.to_lowercase();
        let ecosystem = if base.starts_with("sd 1") {
            "sd1".to_string()
        } else if base.starts_with("sd 2") {
            "sd2".to_string()
        } else if base.starts_with("sd 3") {
            "sd3".to_string()
        } else if base.starts_with("sdxl") {
            "sdxl".to_string()
        } else if base.starts_with("flux") {
            "flux1".to_string()
        } else {
            base.chars().filter(|c| c.is_ascii_alphanumeric()).collect()
        };

        // Pony resources load as SDXL
        if ecosystem == "pony" {
            "sdxl".to_string()
        } else {
            ecosystem
        }
    }

    /// `urn:air:{ecosystem}:{type}:civitai:{modelId}@{versionId}`
    pub fn air(&self) -> String {
        format!(
            "urn:air:{}:{}:civitai:{}@{}",
            self.ecosystem(),
            self.model_type.air_type(),
            self.model_id,
            self.id
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileMetadata {
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub fp: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRow {
    pub id: u32,
    #[serde(rename = "type")]
    pub file_type: String,
    #[serde(default)]
    pub visibility: String,
    pub url: String,
    #[serde(default)]
    pub metadata: FileMetadata,
    #[serde(rename = "sizeKB")]
    pub size_kb: f64,
    #[serde(default)]
    pub hash: Option<String>,
}

impl FileRow {
    fn is_model_file(&self) -> bool {
        matches!(self.file_type.as_str(), "Model" | "Pruned Model")
    }

    /// Higher is better: SafeTensor beats fp16 beats pruned.
    fn preference(&self) -> (bool, bool, bool) {
        let meta = &self.metadata;
        (
            meta.format.as_deref() == Some("SafeTensor"),
            meta.fp.as_deref() == Some("fp16"),
            meta.size.as_deref() == Some("pruned"),
        )
    }
}

/// The file a download link points at.
///
/// Model files are preferred over anything else attached to the version;
/// among them the best `preference()` wins, earliest first on ties.
pub fn primary_file(files: &[FileRow]) -> Option<&FileRow> {
    let has_model_files = files.iter().any(FileRow::is_model_file);
    files
        .iter()
        .filter(|file| !has_model_files || file.is_model_file())
        .fold(None, |best: Option<&FileRow>, file| match best {
            Some(current) if current.preference() >= file.preference() => Some(current),
            _ => Some(file),
        })
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SummaryError {
    #[error("Missing modelVersionId")]
    MissingVersionId,

    #[error("Model not found")]
    NotFound(VersionId),

    #[error("Missing model file")]
    MissingModelFile(VersionId),
}

impl SummaryError {
    /// HTTP status a handler should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            SummaryError::MissingVersionId => 400,
            SummaryError::NotFound(_) | SummaryError::MissingModelFile(_) => 404,
        }
    }

    /// `{"error": "..."}` response body.
    pub fn to_body(&self) -> serde_json::Value {
        serde_json::json!({ "error": self.to_string() })
    }
}

/// Who is asking, from where, and when.
#[derive(Debug, Clone)]
pub struct SummaryRequest {
    pub version_id: VersionId,
    pub is_moderator: bool,
    /// `Host` header of the incoming request.
    pub host: Option<String>,
    /// Public base URL download links are built on.
    pub base_url: String,
    /// Versions generation is currently switched off for.
    pub unavailable_resources: HashSet<VersionId>,
    pub now: DateTime<Utc>,
}

impl SummaryRequest {
    pub fn new(version_id: VersionId, base_url: impl Into<String>) -> Self {
        Self {
            version_id,
            is_moderator: false,
            host: None,
            base_url: base_url.into(),
            unavailable_resources: HashSet::new(),
            now: Utc::now(),
        }
    }

    /// Download link for the primary file.
    ///
    /// Requests arriving on an `api.` host get a link on the API domain
    /// without the `/api` prefix.
    pub fn download_url(&self, version_id: VersionId) -> String {
        let base = self.base_url.trim_end_matches('/');
        let url = format!("{}/api/download/models/{}", base, version_id);

        match &self.host {
            Some(host) if host.contains("api.") => {
                let (scheme, domain) = base.split_once("://").unwrap_or(("https", base));
                let domain = domain.split('/').next().unwrap_or(domain);
                let origin = format!("{}://{}", scheme, domain);
                let api_origin = format!("{}://api.{}", scheme, domain);
                url.replacen("/api/", "/", 1).replacen(&origin, &api_origin, 1)
            }
            _ => url,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hashes {
    #[serde(rename = "AutoV2", default, skip_serializing_if = "Option::is_none")]
    pub auto_v2: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelVersionSummary {
    pub air: String,
    pub version_name: String,
    pub model_name: String,
    pub base_model: String,
    pub availability: Availability,
    pub size: f64,
    pub hashes: Hashes,
    pub download_urls: Vec<String>,
    pub format: Option<String>,
    pub can_generate: bool,
    pub require_auth: bool,
    pub check_permission: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub early_access_ends_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub free_trial_limit: Option<u32>,
}

impl ModelVersionSummary {
    /// Build the payload for `request.version_id`.
    ///
    /// `version` is the row looked up for that id, if any. Unpublished
    /// versions are only visible to moderators.
    pub fn build(
        request: &SummaryRequest,
        version: Option<&VersionRow>,
        files: &[FileRow],
    ) -> Result<Self, SummaryError> {
        if request.version_id == 0 {
            return Err(SummaryError::MissingVersionId);
        }

        let version = version
            .filter(|v| v.id == request.version_id)
            .filter(|v| request.is_moderator || v.is_published())
            .ok_or(SummaryError::NotFound(request.version_id))?;

        let primary =
            primary_file(files).ok_or(SummaryError::MissingModelFile(request.version_id))?;
        debug!("Primary file {} for version {}", primary.id, version.id);

        let check_permission = version.check_permission(request.now);
        let can_generate = version.covered.unwrap_or(false)
            && !request.unavailable_resources.contains(&version.id);

        Ok(Self {
            air: version.air(),
            version_name: version.version_name.clone(),
            model_name: version.model_name.clone(),
            base_model: version.base_model.clone(),
            availability: version.availability,
            size: primary.size_kb,
            hashes: Hashes {
                auto_v2: primary.hash.clone(),
            },
            download_urls: vec![request.download_url(version.id)],
            format: primary.metadata.format.clone(),
            can_generate,
            require_auth: version.require_auth,
            check_permission,
            early_access_ends_at: version.early_access_ends_at.filter(|_| check_permission),
            free_trial_limit: version.free_trial_limit().filter(|_| check_permission),
        })
    }
}
