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

use std::{collections::BTreeMap, path::Path};

use miette::{Context, IntoDiagnostic, miette};
use serde::Deserialize;
use tokio::fs;

/// Placeholder replaced with the version of the package being built
pub const VERSION_PLACEHOLDER: &str = "{version}";

/// Separator between rendered dependency declarations
pub const DEP_SEPARATOR: &str = ", ";

/// Workspace references pinned by the build system.
///
/// A workspace is either pinned to a commit, rendered as a synthetic
/// `0.0.0-<commit>` version, or to a literal tag.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct WorkspaceRefs {
    /// Commit hash per workspace name
    pub commits: BTreeMap<String, String>,
    /// Tag per workspace name
    pub tags: BTreeMap<String, String>,
}

impl WorkspaceRefs {
    /// Reads workspace references from a JSON file.
    pub async fn read(path: &Path) -> miette::Result<Self> {
        let raw = fs::read_to_string(path)
            .await
            .into_diagnostic()
            .wrap_err(miette!(
                "failed to read workspace references from {}",
                path.display()
            ))?;

        serde_json::from_str(&raw).into_diagnostic().wrap_err(miette!(
            "failed to parse workspace references in {}",
            path.display()
        ))
    }
}

/// The placeholder token for a workspace reference.
pub fn workspace_placeholder(workspace: &str) -> String {
    format!("%{{@{workspace}}}")
}

/// Ordered placeholder substitutions.
///
/// Keys are applied in insertion order. Re-setting a key overwrites its
/// value without changing its position, so a tag pinned for a workspace
/// takes precedence over a commit pinned for the same workspace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Substitutions {
    entries: Vec<(String, String)>,
}

impl Substitutions {
    /// Builds the substitution mapping for a version and set of references.
    pub fn new(version: &str, refs: &WorkspaceRefs) -> Self {
        let mut substitutions = Self::default();

        substitutions.set(VERSION_PLACEHOLDER, version);

        for (workspace, commit) in &refs.commits {
            substitutions.set(&workspace_placeholder(workspace), &format!("0.0.0-{commit}"));
        }

        for (workspace, tag) in &refs.tags {
            substitutions.set(&workspace_placeholder(workspace), tag);
        }

        substitutions
    }

    fn set(&mut self, key: &str, value: &str) {
        match self
            .entries
            .iter_mut()
            .find(|(existing, _)| existing.as_str() == key)
        {
            Some((_, existing)) => *existing = value.to_owned(),
            None => self.entries.push((key.to_owned(), value.to_owned())),
        }
    }

    /// The value a key currently resolves to.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing.as_str() == key)
            .map(|(_, value)| value.as_str())
    }

    /// Replaces every occurrence of every key in `input`.
    pub fn apply(&self, input: &str) -> String {
        self.entries
            .iter()
            .fold(input.to_owned(), |rendered, (key, value)| {
                rendered.replace(key, value)
            })
    }
}

/// Renders dependency declarations into a single joined specification.
pub fn render(version: &str, refs: &WorkspaceRefs, deps: &[String]) -> String {
    let substitutions = Substitutions::new(version, refs);

    deps.iter()
        .map(|dep| substitutions.apply(dep))
        .collect::<Vec<_>>()
        .join(DEP_SEPARATOR)
}
