use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use utoipa::ToSchema;

use super::MeshFormat;

/// A registered download: the converted artifact plus the data needed to serve it.
///
/// Entries are immutable once created. The entry exclusively owns `file_path`;
/// the file is only ever removed through the download registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadEntry {
    pub token: String,
    pub file_path: PathBuf,
    /// Display name without extension, used to build output filenames.
    pub base_name: String,
    pub expires_at: DateTime<Utc>,
}

impl DownloadEntry {
    /// Whether the entry is invalid at `now`. The expiry instant itself is already expired.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Filename offered to the client for `format`.
    pub fn file_name(&self, format: MeshFormat) -> String {
        format!("{}.{}", self.base_name, format.extension())
    }
}

/// Response of the upload endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateLinkResponse {
    pub success: bool,
    pub download_url: String,
    /// Human readable lifetime, e.g. "600 seconds".
    pub expires_in: String,
}

/// Response of the download-info endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DownloadInfoResponse {
    pub file_name: String,
    pub available_formats: Vec<MeshFormat>,
    pub expires_at: DateTime<Utc>,
    /// Stored OBJ text, used by the download page preview.
    pub obj_content: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry(expires_at: DateTime<Utc>) -> DownloadEntry {
        DownloadEntry {
            token: "t".to_string(),
            file_path: PathBuf::from("/tmp/x.obj"),
            base_name: "bracket_repaired".to_string(),
            expires_at,
        }
    }

    #[test]
    fn expiry_instant_is_already_expired() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let e = entry(at);
        assert!(!e.is_expired_at(at - chrono::Duration::milliseconds(1)));
        assert!(e.is_expired_at(at));
        assert!(e.is_expired_at(at + chrono::Duration::seconds(1)));
    }

    #[test]
    fn file_name_uses_format_extension() {
        let e = entry(Utc::now());
        assert_eq!(e.file_name(MeshFormat::ThreeMf), "bracket_repaired.3mf");
    }

    #[test]
    fn generate_link_response_is_camel_case() {
        let resp = GenerateLinkResponse {
            success: true,
            download_url: "http://localhost:3000/download/abc".to_string(),
            expires_in: "600 seconds".to_string(),
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["downloadUrl"], "http://localhost:3000/download/abc");
        assert_eq!(json["expiresIn"], "600 seconds");
        assert_eq!(json["success"], true);
    }
}
