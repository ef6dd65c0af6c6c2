use anyhow::{Result, bail};
use tracing::info;

use crate::ctx::Ctx;
use crate::pipeline::{Stage, stage1_staging};
use crate::toolkit::{OutlierMetric, OutlierOutputs, Toolkit};

pub const NAME: &str = "stage5_fd";

/// Framewise displacement, computed on the staged (uncorrected) series.
pub struct Stage5Fd;

impl Stage5Fd {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage5Fd {
    fn name(&self) -> &'static str {
        NAME
    }

    fn label(&self) -> &'static str {
        "Framewise displacement"
    }

    fn depends_on(&self) -> &'static [&'static str] {
        &[stage1_staging::NAME]
    }

    fn run(&self, ctx: &mut Ctx, tools: &dyn Toolkit) -> Result<()> {
        let paths = &ctx.paths;
        let outputs = OutlierOutputs {
            flags: &paths.fd_outliers,
            series: &paths.fd_series,
            plot: &paths.fd_plot,
        };
        tools.motion_outliers(&paths.staged, OutlierMetric::Fd, &outputs)?;
        if !paths.fd_series.is_file() {
            bail!("no FD series written to {}", paths.fd_series.display());
        }
        info!(series = %paths.fd_series.display(), "fd_ready");
        Ok(())
    }
}
