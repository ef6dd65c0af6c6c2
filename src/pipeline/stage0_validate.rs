use anyhow::Result;
use tracing::info;

use crate::config::{check_input_file, check_subject_id};
use crate::ctx::Ctx;
use crate::pipeline::Stage;
use crate::toolkit::Toolkit;

pub const NAME: &str = "stage0_validate";

pub struct Stage0Validate;

impl Stage0Validate {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage0Validate {
    fn name(&self) -> &'static str {
        NAME
    }

    fn label(&self) -> &'static str {
        "Input validation"
    }

    fn fatal(&self) -> bool {
        true
    }

    fn run(&self, ctx: &mut Ctx, _tools: &dyn Toolkit) -> Result<()> {
        check_subject_id(&ctx.config.subject)?;
        check_input_file(&ctx.config.scan, "functional scan")?;
        check_input_file(&ctx.config.mask, "brain mask")?;
        info!(
            scan = %ctx.config.scan.display(),
            mask = %ctx.config.mask.display(),
            subject = %ctx.config.subject,
            "inputs_ok"
        );
        Ok(())
    }
}
