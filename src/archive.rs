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
    collections::BTreeMap,
    io::{Read, Write},
    path::{Path, PathBuf},
};

use bytes::{Buf, Bytes};
use miette::{Context, Diagnostic, IntoDiagnostic, miette};

/// Error for a rewrite targeting an entry the archive does not contain.
#[derive(thiserror::Error, Diagnostic, Debug)]
#[error("archive does not contain entry `{entry}`")]
pub struct MissingEntry {
    /// Path of the requested entry
    pub entry: String,
}

/// Rewrites a single entry of a gzipped tarball.
///
/// The named entry's contents are passed through `transform`; every other
/// entry is carried over byte for byte. Entries are written back sorted by
/// path, producing a reproducible archive.
pub fn rewrite_entry<F>(tgz: Bytes, entry_path: &Path, transform: F) -> miette::Result<Bytes>
where
    F: FnOnce(Vec<u8>) -> miette::Result<Vec<u8>>,
{
    let mut tar = Vec::new();
    let mut gz = flate2::read::GzDecoder::new(tgz.reader());

    gz.read_to_end(&mut tar)
        .into_diagnostic()
        .wrap_err(miette!("failed to decompress archive"))?;

    let mut archive = tar::Archive::new(Bytes::from(tar).reader());
    let mut entries: BTreeMap<PathBuf, (tar::Header, Vec<u8>)> = BTreeMap::new();

    for entry in archive
        .entries()
        .into_diagnostic()
        .wrap_err(miette!("corrupted tar archive"))?
    {
        let mut entry = entry
            .into_diagnostic()
            .wrap_err(miette!("corrupted tar entry"))?;

        let path = entry
            .path()
            .into_diagnostic()
            .wrap_err(miette!("tar entry has an invalid path"))?
            .into_owned();

        let header = entry.header().clone();

        let mut contents = Vec::new();
        entry
            .read_to_end(&mut contents)
            .into_diagnostic()
            .wrap_err(miette!("failed to read tar entry {}", path.display()))?;

        entries.insert(path, (header, contents));
    }

    let (_, contents) = entries.get_mut(entry_path).ok_or_else(|| MissingEntry {
        entry: entry_path.display().to_string(),
    })?;

    *contents = transform(std::mem::take(contents))?;

    let mut builder = tar::Builder::new(Vec::new());

    for (path, (mut header, contents)) in entries {
        builder
            .append_data(&mut header, &path, contents.as_slice())
            .into_diagnostic()
            .wrap_err(miette!("failed to add {} to archive", path.display()))?;
    }

    let tar = builder
        .into_inner()
        .into_diagnostic()
        .wrap_err(miette!("failed to assemble archive"))?;

    let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    encoder
        .write_all(&tar)
        .into_diagnostic()
        .wrap_err(miette!("failed to compress archive"))?;

    let tgz = encoder
        .finish()
        .into_diagnostic()
        .wrap_err(miette!("failed to finalize compressed archive"))?;

    Ok(tgz.into())
}
