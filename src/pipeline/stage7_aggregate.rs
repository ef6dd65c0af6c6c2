use anyhow::Result;
use tracing::info;

use crate::ctx::Ctx;
use crate::metrics::series::{aggregate_dvars, aggregate_fd};
use crate::metrics::{DvarsSummary, FdSummary};
use crate::pipeline::{Stage, stage5_fd, stage6_dvars};
use crate::toolkit::Toolkit;

pub const NAME: &str = "stage7_aggregate";

/// Reduces the FD and DVARS series to report scalars. Series whose stage
/// did not succeed in this run are reported as unavailable.
pub struct Stage7Aggregate;

impl Stage7Aggregate {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage7Aggregate {
    fn name(&self) -> &'static str {
        NAME
    }

    fn label(&self) -> &'static str {
        "Metric aggregation"
    }

    fn run(&self, ctx: &mut Ctx, _tools: &dyn Toolkit) -> Result<()> {
        let fd = if ctx.stage_available(stage5_fd::NAME) {
            let (fd, warnings) = aggregate_fd(&ctx.paths.fd_series);
            for w in warnings {
                ctx.warn(w);
            }
            fd
        } else {
            FdSummary::unavailable()
        };

        let dvars = if ctx.stage_available(stage6_dvars::NAME) {
            let (dvars, warnings) =
                aggregate_dvars(&ctx.paths.dvars_series, &ctx.paths.dvars_outliers);
            for w in warnings {
                ctx.warn(w);
            }
            dvars
        } else {
            DvarsSummary::unavailable()
        };

        info!(
            mean_fd = ?fd.series.mean,
            max_fd = ?fd.series.max,
            fd_outliers = fd.series.count_above,
            dvars_outliers = dvars.outlier_count,
            "metrics_aggregated"
        );
        ctx.fd = Some(fd);
        ctx.dvars = Some(dvars);
        Ok(())
    }
}
