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

use std::path::Path;

use miette::{Context, IntoDiagnostic, ensure, miette};
use tokio::{fs, process::Command};

use crate::{
    auth::{Authenticator, ExpectAdduser},
    config::DeployConfig,
    credentials::Credentials,
    package::Package,
    properties::Properties,
    registry::{self, RegistryUri},
    vcs,
};

/// The repository type published with a commit-suffixed version
pub const SNAPSHOT_REPO_TYPE: &str = "snapshot";

/// Handles publishing of a pre-built package archive to a registry
pub struct Publisher {
    config: DeployConfig,
    properties: Properties,
    authenticator: Box<dyn Authenticator + Send + Sync>,
}

impl Publisher {
    /// Creates a publisher from explicit collaborators.
    pub fn new(
        config: DeployConfig,
        properties: Properties,
        authenticator: Box<dyn Authenticator + Send + Sync>,
    ) -> Self {
        Self {
            config,
            properties,
            authenticator,
        }
    }

    /// Opens a publisher with the production collaborators.
    pub async fn open(config: DeployConfig) -> miette::Result<Self> {
        let properties = Properties::read(&config.properties_file).await?;

        let authenticator = Box::new(ExpectAdduser::new(
            config.expect_bin.clone(),
            config.node_bin.clone(),
        ));

        Ok(Self::new(config, properties, authenticator))
    }

    /// Publishes the archive to the registry configured for `repo_type`.
    ///
    /// For the snapshot channel the archive is first rewritten so its
    /// manifest version carries the current commit; the rewritten archive
    /// is removed again after a successful publish. The original archive
    /// is never touched.
    pub async fn publish(&self, repo_type: &str) -> miette::Result<()> {
        let registry = registry::resolve(&self.properties, repo_type)?;

        let credentials = Credentials::from_env()?;

        self.authenticator
            .login(&registry, &credentials)
            .await
            .wrap_err(miette!("failed to log into registry {registry}"))?;

        let (archive, rewritten) = if repo_type == SNAPSHOT_REPO_TYPE {
            tracing::info!("appending current commit to package version");
            self.rewrite_snapshot_archive().await?;
            (self.config.updated_archive.as_path(), true)
        } else {
            (self.config.archive.as_path(), false)
        };

        self.npm_publish(&registry, archive).await?;

        if rewritten {
            fs::remove_file(archive)
                .await
                .into_diagnostic()
                .wrap_err(miette!(
                    "failed to remove intermediate archive {}",
                    archive.display()
                ))?;
        }

        Ok(())
    }

    async fn rewrite_snapshot_archive(&self) -> miette::Result<()> {
        let commit = vcs::head_commit(self.config.vcs_workspace()).await?;

        let package = Package::read(&self.config.archive).await?;
        let updated = package.append_commit(&commit)?;

        tracing::info!("snapshot version is {}", updated.version());

        updated.write(&self.config.updated_archive).await
    }

    async fn npm_publish(&self, registry: &RegistryUri, archive: &Path) -> miette::Result<()> {
        tracing::info!("publishing {} to {registry}", archive.display());

        let status = Command::new("npm")
            .arg("publish")
            .arg(format!("--registry={registry}"))
            .arg(archive)
            .env_clear()
            .env("PATH", &self.config.node_bin)
            .status()
            .await
            .into_diagnostic()
            .wrap_err(miette!("failed to invoke npm publish"))?;

        ensure!(status.success(), "npm publish exited with {status}");

        Ok(())
    }
}
