use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::{info, warn};

use crate::ctx::{ArtifactPaths, Ctx};
use crate::math::stats::max_abs;
use crate::metrics::{MotionSummary, ParamsSource};
use crate::pipeline::{Stage, stage1_staging};
use crate::toolkit::Toolkit;
use crate::toolkit::parse::{
    MotionParams, format_motion_params, parse_avscale, parse_motion_params, parse_single_stat,
};

pub const NAME: &str = "stage3_motion";

pub struct Stage3Motion;

impl Stage3Motion {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage3Motion {
    fn name(&self) -> &'static str {
        NAME
    }

    fn label(&self) -> &'static str {
        "Motion correction"
    }

    fn depends_on(&self) -> &'static [&'static str] {
        &[stage1_staging::NAME]
    }

    fn run(&self, ctx: &mut Ctx, tools: &dyn Toolkit) -> Result<()> {
        let paths = ctx.paths.clone();
        let report = tools.realign(&paths.staged, &paths.mc_base)?;
        fs::write(&paths.mc_report, &report)
            .with_context(|| format!("failed to write {}", paths.mc_report.display()))?;
        if !paths.mc_image.is_file() {
            bail!(
                "realignment produced no corrected series at {}",
                paths.mc_image.display()
            );
        }

        let source = ensure_motion_params(ctx, tools)?;
        let summary = summarize_motion(&paths, source)?;
        info!(
            source = source.as_str(),
            max_translation_mm = ?summary.max_abs_translation_mm,
            max_rotation_deg = ?summary.max_abs_rotation_deg,
            "motion_ready"
        );
        ctx.motion = Some(summary);
        Ok(())
    }
}

/// Makes sure `<base>.par` exists, recovering it from the per-volume
/// matrices when the realignment did not write it.
fn ensure_motion_params(ctx: &mut Ctx, tools: &dyn Toolkit) -> Result<ParamsSource> {
    let paths = ctx.paths.clone();
    if paths.mc_par.is_file() {
        return Ok(ParamsSource::ParFile);
    }

    let matrices = list_matrices(&paths.mc_mat_dir)?;
    if matrices.is_empty() {
        warn!("no motion parameters or transform matrices after realignment");
        ctx.warn("motion parameters unavailable: realignment wrote neither .par nor matrices");
        return Ok(ParamsSource::Unavailable);
    }

    let mut rows: Vec<MotionParams> = Vec::with_capacity(matrices.len());
    for mat in &matrices {
        let text = tools.decompose_transform(mat, &paths.staged)?;
        let params =
            parse_avscale(&text).with_context(|| format!("decomposing {}", mat.display()))?;
        rows.push(params);
    }
    fs::write(&paths.mc_par, format_motion_params(&rows))
        .with_context(|| format!("failed to write {}", paths.mc_par.display()))?;
    ctx.warn(format!(
        "motion parameters recovered from {} transform matrices",
        rows.len()
    ));
    Ok(ParamsSource::Decomposed)
}

fn list_matrices(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut out = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("failed to read {}", dir.display()))? {
        let path = entry?.path();
        let is_mat = path
            .file_name()
            .and_then(|s| s.to_str())
            .is_some_and(|name| name.starts_with("MAT_"));
        if is_mat && path.is_file() {
            out.push(path);
        }
    }
    out.sort();
    Ok(out)
}

/// Reads the parameter and mean-RMS files left by the realignment.
pub fn summarize_motion(paths: &ArtifactPaths, source: ParamsSource) -> Result<MotionSummary> {
    let rows = match source {
        ParamsSource::Unavailable => Vec::new(),
        _ => {
            let text = fs::read_to_string(&paths.mc_par)
                .with_context(|| format!("failed to read {}", paths.mc_par.display()))?;
            parse_motion_params(&text)
                .with_context(|| format!("malformed {}", paths.mc_par.display()))?
        }
    };

    let rotations: Vec<f64> = rows.iter().flat_map(|r| r[0..3].to_vec()).collect();
    let translations: Vec<f64> = rows.iter().flat_map(|r| r[3..6].to_vec()).collect();

    Ok(MotionSummary {
        source,
        n_volumes: rows.len(),
        max_abs_translation_mm: max_abs(&translations),
        max_abs_rotation_deg: max_abs(&rotations).map(f64::to_degrees),
        mean_rel_rms_mm: read_optional_stat(&paths.mc_rel_mean_rms),
        mean_abs_rms_mm: read_optional_stat(&paths.mc_abs_mean_rms),
    })
}

fn read_optional_stat(path: &Path) -> Option<f64> {
    let text = fs::read_to_string(path).ok()?;
    parse_single_stat(&text).ok()
}
