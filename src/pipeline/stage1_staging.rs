use std::fs;

use anyhow::{Context, Result};
use tracing::info;

use crate::ctx::Ctx;
use crate::io::staging::{StagingKind, stage_scan};
use crate::pipeline::{Stage, stage0_validate};
use crate::toolkit::Toolkit;

pub const NAME: &str = "stage1_staging";

pub struct Stage1Staging;

impl Stage1Staging {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage1Staging {
    fn name(&self) -> &'static str {
        NAME
    }

    fn label(&self) -> &'static str {
        "Staging"
    }

    fn depends_on(&self) -> &'static [&'static str] {
        &[stage0_validate::NAME]
    }

    fn run(&self, ctx: &mut Ctx, _tools: &dyn Toolkit) -> Result<()> {
        let out_dir = ctx.paths.out_dir.clone();
        fs::create_dir_all(&out_dir)
            .with_context(|| format!("failed to create {}", out_dir.display()))?;
        ctx.run_log.open()?;
        info!(out_dir = %out_dir.display(), "output_dir_ready");

        let removed = clear_previous_artifacts(ctx)?;
        if removed > 0 {
            ctx.run_log
                .record(&format!("removed {} artifact(s) from a previous run", removed));
        }

        let kind = stage_scan(&ctx.config.scan, &ctx.paths.staged)?;
        if kind == StagingKind::InPlace {
            ctx.warn("input scan is already the staged copy; left untouched");
        }
        info!(staged = %ctx.paths.staged.display(), kind = ?kind, "scan_staged");
        Ok(())
    }
}

// Stale products of an earlier run must not be mistaken for this run's.
fn clear_previous_artifacts(ctx: &Ctx) -> Result<usize> {
    let scan = ctx.config.scan.canonicalize().ok();
    let mut removed = 0;
    for path in ctx.paths.regenerated_files() {
        if !path.is_file() {
            continue;
        }
        if scan.is_some() && path.canonicalize().ok() == scan {
            continue;
        }
        fs::remove_file(path).with_context(|| format!("failed to remove {}", path.display()))?;
        removed += 1;
    }
    if ctx.paths.mc_mat_dir.is_dir() {
        fs::remove_dir_all(&ctx.paths.mc_mat_dir).with_context(|| {
            format!("failed to remove {}", ctx.paths.mc_mat_dir.display())
        })?;
        removed += 1;
    }
    Ok(removed)
}
