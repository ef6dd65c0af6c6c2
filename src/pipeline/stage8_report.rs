use std::fs;

use anyhow::{Context, Result};
use chrono::Local;
use tracing::info;

use crate::ctx::Ctx;
use crate::io::html::{ReportView, render_report};
use crate::io::json_writer;
use crate::pipeline::Stage;
use crate::toolkit::Toolkit;

pub const NAME: &str = "stage8_report";

pub struct Stage8Report;

impl Stage8Report {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage8Report {
    fn name(&self) -> &'static str {
        NAME
    }

    fn label(&self) -> &'static str {
        "Report"
    }

    fn run(&self, ctx: &mut Ctx, _tools: &dyn Toolkit) -> Result<()> {
        let generated_at = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let view = ReportView::from_ctx(ctx, generated_at);
        let html = render_report(&view)?;
        let path = &ctx.paths.report_html;
        fs::write(path, html).with_context(|| format!("failed to write {}", path.display()))?;
        info!(report = %path.display(), "report_written");

        if ctx.config.write_json {
            json_writer::write_json(&ctx.paths.summary_json, ctx)?;
            info!(summary = %ctx.paths.summary_json.display(), "summary_json_written");
        }
        Ok(())
    }
}
