// Copyright 2025 Helsing GmbH
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use miette::{Context, IntoDiagnostic, miette};
use semver::{Prerelease, Version};
use serde::{Deserialize, Serialize};

/// Path of the manifest inside a package archive
pub const MANIFEST_ENTRY: &str = "package/package.json";

/// An npm `package.json` manifest.
///
/// Only the version is interpreted; every other field passes through the
/// flattened map untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PackageManifest {
    /// Version of the package
    pub version: Version,
    /// All remaining manifest fields
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl PackageManifest {
    /// Parses a manifest from raw JSON.
    pub fn from_slice(data: &[u8]) -> miette::Result<Self> {
        serde_json::from_slice(data)
            .into_diagnostic()
            .wrap_err(miette!("could not deserialize {MANIFEST_ENTRY}"))
    }

    /// Serializes the manifest back to JSON.
    pub fn to_vec(&self) -> miette::Result<Vec<u8>> {
        serde_json::to_vec(self)
            .into_diagnostic()
            .wrap_err(miette!("could not serialize {MANIFEST_ENTRY}"))
    }

    /// Appends `-<commit>` to the rendered version.
    ///
    /// `1.2.3` becomes `1.2.3-8f2c1d4`; a version that already carries a
    /// prerelease keeps it, `1.2.3-beta.1` becomes `1.2.3-beta.1-8f2c1d4`.
    pub fn append_commit(&mut self, commit: &str) -> miette::Result<()> {
        let pre = if self.version.pre.is_empty() {
            commit.to_owned()
        } else {
            format!("{}-{commit}", self.version.pre)
        };

        self.version.pre = Prerelease::new(&pre).into_diagnostic().wrap_err(miette!(
            "commit `{commit}` does not form a valid version suffix"
        ))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const MANIFEST: &str = r#"{
        "name": "client",
        "version": "1.2.3",
        "dependencies": {"common": "0.0.0-deadbeef"}
    }"#;

    #[test]
    fn appends_commit_to_version() {
        let mut manifest = PackageManifest::from_slice(MANIFEST.as_bytes()).unwrap();
        manifest.append_commit("8f2c1d4").unwrap();

        assert_eq!(manifest.version.to_string(), "1.2.3-8f2c1d4");
    }

    #[test]
    fn keeps_existing_prerelease() {
        let mut manifest =
            PackageManifest::from_slice(br#"{"version": "1.2.3-beta.1"}"#).unwrap();
        manifest.append_commit("8f2c1d4").unwrap();

        assert_eq!(manifest.version.to_string(), "1.2.3-beta.1-8f2c1d4");
    }

    #[test]
    fn preserves_unrelated_fields() {
        let manifest = PackageManifest::from_slice(MANIFEST.as_bytes()).unwrap();
        let reparsed = PackageManifest::from_slice(&manifest.to_vec().unwrap()).unwrap();

        assert_eq!(reparsed, manifest);
        assert_eq!(
            reparsed.extra.get("name"),
            Some(&serde_json::Value::String("client".to_owned()))
        );
    }
}
