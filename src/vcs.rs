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
use tokio::process::Command;

/// Queries the commit the given checkout currently points at.
pub async fn head_commit(workspace: &Path) -> miette::Result<String> {
    let output = Command::new("git")
        .arg("rev-parse")
        .arg("HEAD")
        .current_dir(workspace)
        .output()
        .await
        .into_diagnostic()
        .wrap_err(miette!("failed to invoke git in {}", workspace.display()))?;

    ensure!(
        output.status.success(),
        "git rev-parse HEAD in {} exited with {}",
        workspace.display(),
        output.status
    );

    let commit = String::from_utf8(output.stdout)
        .into_diagnostic()
        .wrap_err(miette!(
            "invalid utf-8 character in the output of `git rev-parse`"
        ))?;

    Ok(commit.trim().to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::Command as StdCommand;

    fn git(dir: &Path, args: &[&str]) -> String {
        let output = StdCommand::new("git")
            .args(args)
            .current_dir(dir)
            .output()
            .unwrap();
        assert!(output.status.success(), "git {args:?} failed");
        String::from_utf8(output.stdout).unwrap().trim().to_owned()
    }

    #[tokio::test]
    async fn returns_current_commit() {
        let dir = tempfile::tempdir().unwrap();

        git(dir.path(), &["init", "-q"]);
        git(
            dir.path(),
            &[
                "-c",
                "user.name=test",
                "-c",
                "user.email=test@example.com",
                "commit",
                "--allow-empty",
                "-q",
                "-m",
                "initial",
            ],
        );

        let expected = git(dir.path(), &["rev-parse", "HEAD"]);
        let commit = head_commit(dir.path()).await.unwrap();

        assert_eq!(commit, expected);
        assert_eq!(commit.len(), 40);
    }

    #[tokio::test]
    async fn fails_outside_a_repository() {
        let dir = tempfile::tempdir().unwrap();
        assert!(head_commit(dir.path()).await.is_err());
    }
}
