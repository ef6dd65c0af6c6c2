use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use flate2::Compression;
use flate2::write::GzEncoder;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StagingKind {
    Copied,
    Compressed,
    InPlace,
}

/// Puts the scan at `dest` as gzip-compressed NIfTI. Compressed inputs are
/// copied byte for byte.
pub fn stage_scan(src: &Path, dest: &Path) -> Result<StagingKind> {
    if same_file(src, dest) {
        return Ok(StagingKind::InPlace);
    }
    if is_gzip_name(src) {
        std::fs::copy(src, dest).with_context(|| {
            format!("failed to copy {} to {}", src.display(), dest.display())
        })?;
        return Ok(StagingKind::Copied);
    }

    let input = File::open(src).with_context(|| format!("failed to open {}", src.display()))?;
    let output =
        File::create(dest).with_context(|| format!("failed to create {}", dest.display()))?;
    let mut reader = BufReader::new(input);
    let mut encoder = GzEncoder::new(BufWriter::new(output), Compression::default());
    std::io::copy(&mut reader, &mut encoder)
        .with_context(|| format!("failed to compress {}", src.display()))?;
    let mut writer = encoder.finish()?;
    writer.flush()?;
    Ok(StagingKind::Compressed)
}

fn is_gzip_name(path: &Path) -> bool {
    path.extension().and_then(|s| s.to_str()) == Some("gz")
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
