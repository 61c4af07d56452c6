use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Remote update descriptor, e.g.
/// `{"versionCode": 7, "versionName": "1.6", "updateUrl": "https://...", "description": "..."}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppUpdate {
    pub version_code: i64,
    pub version_name: String,
    pub update_url: String,
    #[serde(default)]
    pub description: String,
}

/// Update state pushed to whoever is listening
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UpdateState {
    pub current_version_code: i64,
    /// Set only when the remote version is newer than the running one
    pub available: Option<AppUpdate>,
    pub downloading: bool,
    /// Path of the last package handed to the installer
    pub last_package: Option<String>,
    pub last_error: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct DownloadUpdateRequest {
    /// Defaults to the url of the available update
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DownloadUpdateResponse {
    /// false when a download was already running or there is nothing to fetch
    pub started: bool,
}
