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
    io::{self, Read},
    path::Path,
};

use bytes::{Buf, Bytes};
use miette::{Context, IntoDiagnostic, miette};
use semver::Version;
use tokio::fs;

use crate::{
    archive,
    manifest::{MANIFEST_ENTRY, PackageManifest},
};

/// An in memory representation of an npm package archive
#[derive(Clone, Debug, PartialEq)]
pub struct Package {
    /// Manifest of the package
    pub manifest: PackageManifest,
    /// The `tar.gz` archive containing the published files
    pub tgz: Bytes,
}

impl Package {
    /// Load a package from a precompressed archive.
    pub fn parse(tgz: Bytes) -> miette::Result<Self> {
        let mut tar = Vec::new();

        let mut gz = flate2::read::GzDecoder::new(tgz.clone().reader());

        gz.read_to_end(&mut tar)
            .into_diagnostic()
            .wrap_err(miette!("failed to decompress package"))?;

        let mut tar = tar::Archive::new(Bytes::from(tar).reader());

        let manifest = tar
            .entries()
            .into_diagnostic()
            .wrap_err(miette!("corrupted tar package"))?
            .filter_map(|entry| entry.ok())
            .find(|entry| {
                entry
                    .path()
                    .ok()
                    .filter(|path| path.as_ref() == Path::new(MANIFEST_ENTRY))
                    .is_some()
            })
            .ok_or_else(|| miette!("package archive is missing {MANIFEST_ENTRY}"))?;

        let manifest = manifest
            .bytes()
            .collect::<io::Result<Vec<_>>>()
            .into_diagnostic()
            .wrap_err(miette!("failed to read {MANIFEST_ENTRY}"))?;

        let manifest = PackageManifest::from_slice(&manifest)?;

        Ok(Self { manifest, tgz })
    }

    /// Reads a package archive from the file system.
    pub async fn read(path: &Path) -> miette::Result<Self> {
        let tgz = fs::read(path).await.into_diagnostic().wrap_err(miette!(
            "failed to read package archive {}",
            path.display()
        ))?;

        Self::parse(tgz.into())
    }

    /// Writes the package archive to the file system.
    pub async fn write(&self, path: &Path) -> miette::Result<()> {
        fs::write(path, &self.tgz)
            .await
            .into_diagnostic()
            .wrap_err(miette!(
                "failed to write package archive {}",
                path.display()
            ))
    }

    /// A copy of this package whose manifest version carries the commit.
    ///
    /// Every entry except the manifest is carried over byte for byte.
    pub fn append_commit(&self, commit: &str) -> miette::Result<Self> {
        let mut manifest = self.manifest.clone();
        manifest.append_commit(commit)?;

        let tgz = archive::rewrite_entry(self.tgz.clone(), Path::new(MANIFEST_ENTRY), |_| {
            manifest.to_vec()
        })?;

        Ok(Self { manifest, tgz })
    }

    /// The version of this package
    #[inline]
    pub fn version(&self) -> &Version {
        &self.manifest.version
    }
}
