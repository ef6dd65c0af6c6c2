use std::fs;

use anyhow::{Result, bail};
use tracing::info;

use crate::config::check_subject_id;
use crate::ctx::Ctx;
use crate::metrics::ParamsSource;
use crate::pipeline::Stage;
use crate::pipeline::stage3_motion::summarize_motion;
use crate::pipeline::stage4_tsnr::read_temporal_stats;
use crate::toolkit::Toolkit;
use crate::toolkit::parse::parse_image_info;

pub const NAME: &str = "reload";

/// Picks up the text artifacts of an earlier run so the report can be
/// rebuilt without running the toolkit again. Missing pieces become
/// warnings.
pub struct StageReload;

impl StageReload {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for StageReload {
    fn name(&self) -> &'static str {
        NAME
    }

    fn label(&self) -> &'static str {
        "Load previous results"
    }

    fn fatal(&self) -> bool {
        true
    }

    fn run(&self, ctx: &mut Ctx, _tools: &dyn Toolkit) -> Result<()> {
        check_subject_id(&ctx.config.subject)?;
        let paths = ctx.paths.clone();
        if !paths.out_dir.is_dir() {
            bail!("no previous run at {}", paths.out_dir.display());
        }
        ctx.run_log.open()?;

        match fs::read_to_string(&paths.info) {
            Ok(text) => {
                let image = parse_image_info(&text);
                ctx.n_volumes = image.dims[3];
                ctx.image_info = Some(image);
            }
            Err(err) => ctx.warn(format!("image information unavailable: {}", err)),
        }

        let source = if paths.mc_par.is_file() {
            ParamsSource::ParFile
        } else {
            ParamsSource::Unavailable
        };
        if paths.mc_image.is_file() {
            match summarize_motion(&paths, source) {
                Ok(summary) => ctx.motion = Some(summary),
                Err(err) => ctx.warn(format!("motion summary unavailable: {:#}", err)),
            }
        } else {
            ctx.warn("motion-corrected series not found");
        }

        match read_temporal_stats(&paths) {
            Ok((tsnr, intensity)) => {
                ctx.tsnr = Some(tsnr);
                ctx.mean_intensity = Some(intensity);
            }
            Err(err) => ctx.warn(format!("temporal statistics unavailable: {:#}", err)),
        }

        info!(out_dir = %paths.out_dir.display(), "previous_results_loaded");
        Ok(())
    }
}
