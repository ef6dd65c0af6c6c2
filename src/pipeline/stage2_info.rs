use std::fs;

use anyhow::{Context, Result};
use tracing::info;

use crate::ctx::Ctx;
use crate::pipeline::{Stage, stage1_staging};
use crate::toolkit::Toolkit;
use crate::toolkit::parse::{parse_image_info, parse_volume_count};

pub const NAME: &str = "stage2_info";

pub struct Stage2Info;

impl Stage2Info {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage2Info {
    fn name(&self) -> &'static str {
        NAME
    }

    fn label(&self) -> &'static str {
        "Image information"
    }

    fn depends_on(&self) -> &'static [&'static str] {
        &[stage1_staging::NAME]
    }

    fn run(&self, ctx: &mut Ctx, tools: &dyn Toolkit) -> Result<()> {
        let staged = ctx.paths.staged.clone();
        let text = tools.image_info(&staged)?;
        fs::write(&ctx.paths.info, &text)
            .with_context(|| format!("failed to write {}", ctx.paths.info.display()))?;
        let n_volumes = parse_volume_count(&tools.volume_count(&staged)?)?;

        let image = parse_image_info(&text);
        info!(
            n_volumes,
            dims = ?image.spatial_dims(),
            tr = ?image.repetition_time(),
            "image_info_ready"
        );
        if n_volumes < 2 {
            ctx.warn(format!(
                "scan has {} volume(s); temporal statistics need at least 2",
                n_volumes
            ));
        }
        ctx.image_info = Some(image);
        ctx.n_volumes = Some(n_volumes);
        Ok(())
    }
}
