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

use miette::{Context, IntoDiagnostic, miette};
use tokio::fs;

use crate::render::{self, WorkspaceRefs};

/// Renders a dependency specification into `output`.
///
/// The version file's trimmed contents replace `{version}`; workspace
/// references, when given, replace their `%{@<workspace>}` placeholders.
/// The rendered declarations are joined with `", "` and written as the
/// whole content of the output file.
pub async fn render_deps(
    version_file: &Path,
    workspace_refs: Option<&Path>,
    deps: &[String],
    output: &Path,
) -> miette::Result<()> {
    let version = fs::read_to_string(version_file)
        .await
        .into_diagnostic()
        .wrap_err(miette!(
            "failed to read version file {}",
            version_file.display()
        ))?;

    let refs = match workspace_refs {
        Some(path) => WorkspaceRefs::read(path).await?,
        None => WorkspaceRefs::default(),
    };

    let rendered = render::render(version.trim(), &refs, deps);

    fs::write(output, rendered.as_bytes())
        .await
        .into_diagnostic()
        .wrap_err(miette!(
            "failed to write dependency file {}",
            output.display()
        ))?;

    tracing::debug!("rendered {} dependencies into {}", deps.len(), output.display());

    Ok(())
}
