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

use std::path::PathBuf;

use clap::Parser;
use miette::{Context as _, miette};

/// Renders a dependency specification by substituting version and
/// workspace-reference placeholders
#[derive(Parser)]
#[command(author, version, about, long_about)]
struct Cli {
    /// Output file
    #[clap(long)]
    output: PathBuf,

    /// File containing the version of the package being built
    #[clap(long = "version_file")]
    version_file: PathBuf,

    /// Optional file with workspace references
    #[clap(long = "workspace_refs")]
    workspace_refs: Option<PathBuf>,

    /// Dependency declarations
    #[clap(long, num_args = 1.., required = true)]
    deps: Vec<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> miette::Result<()> {
    human_panic::setup_panic!();

    tracing_subscriber::fmt()
        .compact()
        .without_time()
        .with_level(false)
        .with_file(false)
        .with_target(false)
        .with_line_number(false)
        .try_init()
        .unwrap();

    let cli = Cli::parse();

    deploykit::operations::render_deps(
        &cli.version_file,
        cli.workspace_refs.as_deref(),
        &cli.deps,
        &cli.output,
    )
    .await
    .wrap_err(miette!("render command failed"))
}
