//! Package metadata.

use serde::Deserialize;

/// Application metadata consumed by installer builds.
///
/// Supplied by the project configuration source; the version string is
/// checked against semver at resolve time.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageSettings {
    /// Product name displayed to users.
    #[serde(default)]
    pub product_name: String,

    /// Version string in semantic versioning format.
    ///
    /// Example: "1.0.0", "3.0.0-beta.2"
    #[serde(default)]
    pub version: String,

    /// Brief description of the application.
    #[serde(default)]
    pub description: String,

    /// Homepage URL for the application.
    #[serde(default)]
    pub homepage: Option<String>,

    /// List of package authors, "Name <email@example.com>".
    #[serde(default)]
    pub authors: Option<Vec<String>>,
}

impl PackageSettings {
    /// Authors joined into a single company string for installer metadata.
    pub fn company_name(&self) -> Option<String> {
        self.authors
            .as_ref()
            .filter(|authors| !authors.is_empty())
            .map(|authors| authors.join(", "))
    }
}
