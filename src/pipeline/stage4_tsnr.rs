use std::fs;

use anyhow::{Context, Result};
use tracing::info;

use crate::ctx::{ArtifactPaths, Ctx};
use crate::metrics::RegionStats;
use crate::pipeline::{Stage, stage3_motion};
use crate::toolkit::parse::{parse_region_stats, parse_single_stat};
use crate::toolkit::{StatOp, TemporalOp, Toolkit, VoxelOp};

pub const NAME: &str = "stage4_tsnr";

pub struct Stage4Tsnr;

impl Stage4Tsnr {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage4Tsnr {
    fn name(&self) -> &'static str {
        NAME
    }

    fn label(&self) -> &'static str {
        "Temporal statistics"
    }

    fn depends_on(&self) -> &'static [&'static str] {
        &[stage3_motion::NAME]
    }

    fn run(&self, ctx: &mut Ctx, tools: &dyn Toolkit) -> Result<()> {
        let paths = ctx.paths.clone();
        let mask = ctx.config.mask.clone();

        tools.temporal_reduce(&paths.mc_image, TemporalOp::Mean, &paths.mean)?;
        tools.temporal_reduce(&paths.mc_image, TemporalOp::Std, &paths.std)?;
        // Zero-variance voxels divide by zero here; the toolkit decides what they become.
        tools.voxel_math(&paths.mean, VoxelOp::Div, &paths.std, &paths.tsnr)?;
        tools.voxel_math(&paths.tsnr, VoxelOp::Mask, &mask, &paths.tsnr_masked)?;

        let stats = tools.region_stats(
            &paths.tsnr_masked,
            None,
            &[StatOp::Mean, StatOp::Std, StatOp::Range],
        )?;
        write_text(&paths.tsnr_stats, &stats)?;
        let intensity = tools.region_stats(&paths.mean, Some(&mask), &[StatOp::Mean])?;
        write_text(&paths.mean_stats, &intensity)?;

        let (tsnr, mean_intensity) = read_temporal_stats(&paths)?;
        info!(
            mean_tsnr = tsnr.mean,
            std_tsnr = tsnr.std,
            mean_intensity,
            "tsnr_ready"
        );
        ctx.tsnr = Some(tsnr);
        ctx.mean_intensity = Some(mean_intensity);
        Ok(())
    }
}

pub fn read_temporal_stats(paths: &ArtifactPaths) -> Result<(RegionStats, f64)> {
    let stats = fs::read_to_string(&paths.tsnr_stats)
        .with_context(|| format!("failed to read {}", paths.tsnr_stats.display()))?;
    let tsnr = parse_region_stats(&stats)
        .with_context(|| format!("malformed {}", paths.tsnr_stats.display()))?;
    let intensity = fs::read_to_string(&paths.mean_stats)
        .with_context(|| format!("failed to read {}", paths.mean_stats.display()))?;
    let mean_intensity = parse_single_stat(&intensity)
        .with_context(|| format!("malformed {}", paths.mean_stats.display()))?;
    Ok((tsnr, mean_intensity))
}

fn write_text(path: &std::path::Path, text: &str) -> Result<()> {
    fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))
}
