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

use std::{path::PathBuf, process::Stdio};

use miette::{Context, IntoDiagnostic, ensure, miette};
use tokio::{io::AsyncWriteExt, process::Command};

use crate::{credentials::Credentials, registry::RegistryUri};

/// Capability to log into a registry before publishing
#[async_trait::async_trait]
pub trait Authenticator {
    /// Logs into the registry with the given credentials
    async fn login(&self, registry: &RegistryUri, credentials: &Credentials)
    -> miette::Result<()>;
}

/// Drives `npm adduser` through expect(1).
///
/// npm has no non-interactive adduser, so the login is scripted: a
/// transcript answering npm's prompts is fed to expect over stdin. The
/// child's `PATH` is restricted to the installed node binaries so expect
/// spawns the pinned npm.
pub struct ExpectAdduser {
    expect_bin: PathBuf,
    node_bin: PathBuf,
}

impl ExpectAdduser {
    /// Creates an authenticator from the expect binary and node bin directory.
    pub fn new(expect_bin: PathBuf, node_bin: PathBuf) -> Self {
        Self {
            expect_bin,
            node_bin,
        }
    }

    /// The expect script answering npm's interactive prompts.
    fn transcript(registry: &RegistryUri, credentials: &Credentials) -> String {
        format!(
            "spawn npm adduser --registry={registry}
expect {{
  \"Username:\" {{send \"{username}\r\"; exp_continue}}
  \"Password:\" {{send \"{password}\r\"; exp_continue}}
  \"Email: (this IS public)\" {{send \"{email}\r\"; exp_continue}}
}}",
            username = credentials.username,
            password = credentials.password,
            email = credentials.email,
        )
    }
}

#[async_trait::async_trait]
impl Authenticator for ExpectAdduser {
    async fn login(
        &self,
        registry: &RegistryUri,
        credentials: &Credentials,
    ) -> miette::Result<()> {
        let transcript = Self::transcript(registry, credentials);

        let mut child = Command::new(&self.expect_bin)
            .env_clear()
            .env("PATH", &self.node_bin)
            .stdin(Stdio::piped())
            .spawn()
            .into_diagnostic()
            .wrap_err(miette!("failed to spawn {}", self.expect_bin.display()))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| miette!("failed to open stdin of expect"))?;

        stdin
            .write_all(transcript.as_bytes())
            .await
            .into_diagnostic()
            .wrap_err(miette!("failed to feed the login transcript to expect"))?;

        drop(stdin);

        let status = child
            .wait()
            .await
            .into_diagnostic()
            .wrap_err(miette!("failed to await expect"))?;

        ensure!(status.success(), "npm login exited with {status}");

        tracing::debug!("logged into registry {registry}");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn transcript_answers_every_prompt() {
        let registry: RegistryUri = "https://npm-snapshot.example.com/".parse().unwrap();
        let credentials = Credentials {
            username: "bob".to_owned(),
            password: "hunter2".to_owned(),
            email: "bob@example.com".to_owned(),
        };

        let transcript = ExpectAdduser::transcript(&registry, &credentials);

        assert_eq!(
            transcript,
            "spawn npm adduser --registry=https://npm-snapshot.example.com/
expect {
  \"Username:\" {send \"bob\r\"; exp_continue}
  \"Password:\" {send \"hunter2\r\"; exp_continue}
  \"Email: (this IS public)\" {send \"bob@example.com\r\"; exp_continue}
}"
        );
    }
}
