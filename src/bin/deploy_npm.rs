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

use clap::Parser;
use miette::{Context as _, miette};

use deploykit::{config::DeployConfig, operations::Publisher};

/// Publishes the pre-built npm package archive to a configured registry
#[derive(Parser)]
#[command(author, version, about, long_about)]
struct Cli {
    /// Repository type to publish to, e.g. `release` or `snapshot`
    repo_type: String,
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

    let config = DeployConfig::discover()?;

    let publisher = Publisher::open(config).await?;

    publisher
        .publish(&cli.repo_type)
        .await
        .wrap_err(miette!("publish command failed"))
}
