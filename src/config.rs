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

use std::{
    env,
    path::{Path, PathBuf},
};

use miette::{Context, IntoDiagnostic, miette};

/// Name of the properties file describing the deployment targets
pub const DEPLOYMENT_PROPERTIES: &str = "deployment.properties";
/// Pre-built package archive produced by the build
pub const PACKAGE_ARCHIVE: &str = "deploy_npm.tgz";
/// Destination of the version-rewritten package archive
pub const UPDATED_PACKAGE_ARCHIVE: &str = "deploy_npm_updated.tgz";
/// Directory the npm and node binaries are installed in
pub const NODE_BIN_DIR: &str = "external/nodejs/bin/nodejs/bin";
/// Location of the expect binary used to script the npm login
pub const EXPECT_BIN: &str = "/usr/bin/expect";
/// Environment variable exposing the checkout the release is built from
pub const BUILD_WORKSPACE_VAR: &str = "BUILD_WORKSPACE_DIRECTORY";

/// Static configuration of a publish run.
///
/// Everything the publisher takes from the process environment or from
/// fixed locations is resolved here once, so the operations themselves
/// receive plain values.
#[derive(Debug, Clone)]
pub struct DeployConfig {
    /// Properties file describing the available registries
    pub properties_file: PathBuf,
    /// Pre-built package archive
    pub archive: PathBuf,
    /// Destination for the version-rewritten archive
    pub updated_archive: PathBuf,
    /// Directory holding the node and npm binaries
    pub node_bin: PathBuf,
    /// The expect binary driving the interactive login
    pub expect_bin: PathBuf,
    /// Checkout the release is built from, if the build system exposes it
    pub build_workspace: Option<PathBuf>,
}

impl DeployConfig {
    /// Resolves the configuration for the current process.
    pub fn discover() -> miette::Result<Self> {
        let node_bin = std::path::absolute(NODE_BIN_DIR)
            .into_diagnostic()
            .wrap_err(miette!("failed to resolve {NODE_BIN_DIR}"))?;

        Ok(Self {
            properties_file: DEPLOYMENT_PROPERTIES.into(),
            archive: PACKAGE_ARCHIVE.into(),
            updated_archive: UPDATED_PACKAGE_ARCHIVE.into(),
            node_bin,
            expect_bin: EXPECT_BIN.into(),
            build_workspace: env::var_os(BUILD_WORKSPACE_VAR).map(PathBuf::from),
        })
    }

    /// The directory the version control query runs in.
    ///
    /// Falls back to the current directory when the build system does not
    /// expose the workspace.
    pub fn vcs_workspace(&self) -> &Path {
        self.build_workspace.as_deref().unwrap_or(Path::new("."))
    }
}
