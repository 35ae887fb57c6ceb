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

use std::{collections::BTreeMap, path::Path, str::FromStr};

use miette::{Context, Diagnostic, IntoDiagnostic, miette};
use tokio::fs;

/// Error for a line that is neither a comment nor a `key=value` pair.
#[derive(thiserror::Error, Diagnostic, Debug)]
#[error("malformed property on line {line}: `{text}`")]
pub struct MalformedProperty {
    /// 1-based line number
    pub line: usize,
    /// The offending line
    pub text: String,
}

/// A flat string-to-string properties mapping.
///
/// Lines are `key=value` pairs; blank lines and `#` comments are skipped.
/// Keys and values are trimmed, a later duplicate key wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    values: BTreeMap<String, String>,
}

impl FromStr for Properties {
    type Err = MalformedProperty;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let mut values = BTreeMap::new();

        for (index, line) in raw.lines().enumerate() {
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                return Err(MalformedProperty {
                    line: index + 1,
                    text: line.to_owned(),
                });
            };

            values.insert(key.trim().to_owned(), value.trim().to_owned());
        }

        Ok(Self { values })
    }
}

impl Properties {
    /// Reads a properties file from the file system.
    pub async fn read(path: &Path) -> miette::Result<Self> {
        let raw = fs::read_to_string(path)
            .await
            .into_diagnostic()
            .wrap_err(miette!("failed to read properties file {}", path.display()))?;

        raw.parse().into_diagnostic()
    }

    /// The value stored for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// All entries whose key starts with `prefix`, with the prefix stripped.
    ///
    /// Entries are yielded in key order.
    pub fn with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = (&'a str, &'a str)> {
        self.values
            .iter()
            .filter_map(move |(key, value)| Some((key.strip_prefix(prefix)?, value.as_str())))
    }
}
