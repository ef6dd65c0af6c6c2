//! Parsers for the plain-text output of the toolkit commands.

use anyhow::{Context, Result, bail};

use crate::metrics::{ImageInfo, RegionStats};

/// `fslinfo` style `key value` lines. Unknown keys are ignored.
pub fn parse_image_info(text: &str) -> ImageInfo {
    let mut info = ImageInfo::default();
    for line in text.lines() {
        let mut parts = line.split_whitespace();
        let (Some(key), Some(value)) = (parts.next(), parts.next()) else {
            continue;
        };
        match key {
            "data_type" => info.data_type = Some(value.to_string()),
            "dim1" | "dim2" | "dim3" | "dim4" => {
                if let Some(slot) = axis_index(key, "dim") {
                    info.dims[slot] = value.parse().ok();
                }
            }
            "pixdim1" | "pixdim2" | "pixdim3" | "pixdim4" => {
                if let Some(slot) = axis_index(key, "pixdim") {
                    info.pixdims[slot] = value.parse().ok();
                }
            }
            _ => {}
        }
    }
    info
}

fn axis_index(key: &str, prefix: &str) -> Option<usize> {
    let n: usize = key.strip_prefix(prefix)?.parse().ok()?;
    n.checked_sub(1)
}

pub fn parse_volume_count(text: &str) -> Result<u64> {
    let token = text
        .split_whitespace()
        .next()
        .context("volume count output is empty")?;
    token
        .parse::<u64>()
        .with_context(|| format!("volume count '{}' is not a non-negative integer", token))
}

/// Output of `fslstats -M -S -R`: mean, std, min, max on one line.
pub fn parse_region_stats(text: &str) -> Result<RegionStats> {
    let values = parse_floats(text)?;
    if values.len() < 4 {
        bail!(
            "expected 4 values (mean std min max), got {} in '{}'",
            values.len(),
            text.trim()
        );
    }
    Ok(RegionStats {
        mean: values[0],
        std: values[1],
        min: values[2],
        max: values[3],
    })
}

pub fn parse_single_stat(text: &str) -> Result<f64> {
    parse_floats(text)?
        .first()
        .copied()
        .with_context(|| format!("no value in statistics output '{}'", text.trim()))
}

fn parse_floats(text: &str) -> Result<Vec<f64>> {
    text.split_whitespace()
        .map(|tok| {
            tok.parse::<f64>()
                .with_context(|| format!("'{}' is not a number", tok))
        })
        .collect()
}

/// Rotation (radians) then translation (mm), the column order of a
/// realignment `.par` file.
pub type MotionParams = [f64; 6];

pub fn parse_avscale(text: &str) -> Result<MotionParams> {
    let mut rotation = None;
    let mut translation = None;
    for line in text.lines() {
        let line = line.trim();
        if line.starts_with("Rotation Angles") {
            rotation = Some(triple_after_eq(line)?);
        } else if line.starts_with("Translations") {
            translation = Some(triple_after_eq(line)?);
        }
    }
    let r = rotation.context("transform decomposition has no rotation angles")?;
    let t = translation.context("transform decomposition has no translations")?;
    Ok([r[0], r[1], r[2], t[0], t[1], t[2]])
}

fn triple_after_eq(line: &str) -> Result<[f64; 3]> {
    let (_, rhs) = line
        .split_once('=')
        .with_context(|| format!("missing '=' in '{}'", line))?;
    let values = parse_floats(rhs)?;
    if values.len() != 3 {
        bail!("expected 3 values in '{}'", line);
    }
    Ok([values[0], values[1], values[2]])
}

pub fn parse_motion_params(text: &str) -> Result<Vec<MotionParams>> {
    let mut rows = Vec::new();
    for (i, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let values = parse_floats(line).with_context(|| format!("line {}", i + 1))?;
        if values.len() != 6 {
            bail!("line {}: expected 6 motion parameters, got {}", i + 1, values.len());
        }
        rows.push([
            values[0], values[1], values[2], values[3], values[4], values[5],
        ]);
    }
    Ok(rows)
}

pub fn format_motion_params(rows: &[MotionParams]) -> String {
    let mut out = String::new();
    for row in rows {
        let cols: Vec<String> = row.iter().map(|v| format!("{:.6}", v)).collect();
        out.push_str(&cols.join("  "));
        out.push('\n');
    }
    out
}
