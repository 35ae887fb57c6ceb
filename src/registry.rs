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

use std::{fmt, str::FromStr};

use miette::Diagnostic;
use url::Url;

use crate::properties::Properties;

/// Properties key prefix under which npm registries are configured
pub const NPM_REPO_PREFIX: &str = "repo.npm.";

/// Error for a registry value that is not a valid URL.
#[derive(thiserror::Error, Diagnostic, Debug)]
#[error("invalid registry uri `{uri}`")]
pub struct InvalidRegistryUri {
    /// The raw value
    pub uri: String,
    #[source]
    source: url::ParseError,
}

/// Error for a repository type without a configured registry.
#[derive(thiserror::Error, Diagnostic, Debug)]
#[error("invalid repo type `{repo_type}`, valid repo types are: {}", .valid.join(", "))]
pub struct UnknownRepoType {
    /// The requested repository type
    pub repo_type: String,
    /// Every configured repository type
    pub valid: Vec<String>,
}

/// The uri of a registry
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct RegistryUri(Url);

impl RegistryUri {
    /// The underlying url of the registry
    pub fn url(&self) -> &Url {
        &self.0
    }
}

impl fmt::Display for RegistryUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for RegistryUri {
    type Err = InvalidRegistryUri;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let url = Url::parse(value).map_err(|source| InvalidRegistryUri {
            uri: value.to_owned(),
            source,
        })?;

        Ok(Self(url))
    }
}

/// Resolves the registry configured for a repository type.
///
/// Repository types are the `repo.npm.*` keys of the deployment properties;
/// an unknown type fails enumerating every configured one.
pub fn resolve(properties: &Properties, repo_type: &str) -> miette::Result<RegistryUri> {
    let key = format!("{NPM_REPO_PREFIX}{repo_type}");

    let Some(raw) = properties.get(&key) else {
        return Err(UnknownRepoType {
            repo_type: repo_type.to_owned(),
            valid: properties
                .with_prefix(NPM_REPO_PREFIX)
                .map(|(name, _)| name.to_owned())
                .collect(),
        }
        .into());
    };

    Ok(raw.parse()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn properties() -> Properties {
        "\
repo.npm.release=https://npm.example.com/
repo.npm.snapshot=https://npm-snapshot.example.com/
repo.apt.release=https://apt.example.com/
"
        .parse()
        .unwrap()
    }

    #[test]
    fn resolves_configured_repo_type() {
        let registry = resolve(&properties(), "snapshot").unwrap();
        assert_eq!(registry.to_string(), "https://npm-snapshot.example.com/");
    }

    #[test]
    fn unknown_repo_type_lists_valid_types() {
        let error = resolve(&properties(), "central").unwrap_err();
        assert_eq!(
            error.to_string(),
            "invalid repo type `central`, valid repo types are: release, snapshot"
        );
    }

    #[test]
    fn rejects_unparsable_registry() {
        let properties: Properties = "repo.npm.release=not a url".parse().unwrap();
        assert!(resolve(&properties, "release").is_err());
    }
}
