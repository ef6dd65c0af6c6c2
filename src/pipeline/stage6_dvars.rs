use anyhow::{Result, bail};
use tracing::info;

use crate::ctx::Ctx;
use crate::pipeline::{Stage, stage3_motion};
use crate::toolkit::{OutlierMetric, OutlierOutputs, Toolkit};

pub const NAME: &str = "stage6_dvars";

/// DVARS, computed on the motion-corrected series.
pub struct Stage6Dvars;

impl Stage6Dvars {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage6Dvars {
    fn name(&self) -> &'static str {
        NAME
    }

    fn label(&self) -> &'static str {
        "DVARS"
    }

    fn depends_on(&self) -> &'static [&'static str] {
        &[stage3_motion::NAME]
    }

    fn run(&self, ctx: &mut Ctx, tools: &dyn Toolkit) -> Result<()> {
        let paths = &ctx.paths;
        let outputs = OutlierOutputs {
            flags: &paths.dvars_outliers,
            series: &paths.dvars_series,
            plot: &paths.dvars_plot,
        };
        tools.motion_outliers(&paths.mc_image, OutlierMetric::Dvars, &outputs)?;
        if !paths.dvars_series.is_file() {
            bail!("no DVARS series written to {}", paths.dvars_series.display());
        }
        info!(series = %paths.dvars_series.display(), "dvars_ready");
        Ok(())
    }
}
