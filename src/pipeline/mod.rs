use anyhow::Result;
use std::time::Instant;
use tracing::{info, warn};

use crate::ctx::Ctx;
use crate::io::summary::format_progress;
use crate::toolkit::Toolkit;

pub mod reload;
pub mod stage0_validate;
pub mod stage1_staging;
pub mod stage2_info;
pub mod stage3_motion;
pub mod stage4_tsnr;
pub mod stage5_fd;
pub mod stage6_dvars;
pub mod stage7_aggregate;
pub mod stage8_report;

pub trait Stage {
    fn name(&self) -> &'static str;

    fn label(&self) -> &'static str;

    /// Stages that must have succeeded in this run for this one to start.
    fn depends_on(&self) -> &'static [&'static str] {
        &[]
    }

    /// A fatal stage stops the pipeline and fails the run.
    fn fatal(&self) -> bool {
        false
    }

    fn run(&self, ctx: &mut Ctx, tools: &dyn Toolkit) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    Succeeded,
    Failed(String),
    Skipped(String),
}

impl StageOutcome {
    pub fn status(&self) -> &'static str {
        match self {
            Self::Succeeded => "ok",
            Self::Failed(_) => "failed",
            Self::Skipped(_) => "skipped",
        }
    }

    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Succeeded => None,
            Self::Failed(d) | Self::Skipped(d) => Some(d),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StageRecord {
    pub name: &'static str,
    pub label: &'static str,
    pub outcome: StageOutcome,
    pub elapsed_ms: u64,
}

pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
    progress: bool,
}

impl Pipeline {
    pub fn new(stages: Vec<Box<dyn Stage>>) -> Self {
        Self {
            stages,
            progress: false,
        }
    }

    /// Every stage of a full QC run, in execution order.
    pub fn full() -> Self {
        Self::new(vec![
            Box::new(stage0_validate::Stage0Validate::new()),
            Box::new(stage1_staging::Stage1Staging::new()),
            Box::new(stage2_info::Stage2Info::new()),
            Box::new(stage3_motion::Stage3Motion::new()),
            Box::new(stage4_tsnr::Stage4Tsnr::new()),
            Box::new(stage5_fd::Stage5Fd::new()),
            Box::new(stage6_dvars::Stage6Dvars::new()),
            Box::new(stage7_aggregate::Stage7Aggregate::new()),
            Box::new(stage8_report::Stage8Report::new()),
        ])
    }

    /// Re-renders the report from the artifacts of an earlier run.
    pub fn report_only() -> Self {
        Self::new(vec![
            Box::new(reload::StageReload::new()),
            Box::new(stage7_aggregate::Stage7Aggregate::new()),
            Box::new(stage8_report::Stage8Report::new()),
        ])
    }

    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    pub fn run(&self, ctx: &mut Ctx, tools: &dyn Toolkit) -> Result<()> {
        ctx.planned_stages = self.stage_names();
        ctx.run_log.record(&format!(
            "run started: subject={} scan={}",
            ctx.config.subject,
            ctx.config.scan.display()
        ));

        for stage in &self.stages {
            let blocked = stage
                .depends_on()
                .iter()
                .copied()
                .find(|dep| ctx.planned_stages.contains(dep) && !ctx.stage_succeeded(dep));
            if let Some(dep) = blocked {
                let reason = format!("requires {}", dep);
                warn!(stage = stage.name(), reason = %reason, "stage skipped");
                self.finish(ctx, stage.as_ref(), StageOutcome::Skipped(reason), 0);
                continue;
            }

            let start = Instant::now();
            info!(stage = stage.name(), "stage started");
            let result = stage.run(ctx, tools);
            let elapsed_ms = start.elapsed().as_millis() as u64;
            match result {
                Ok(()) => {
                    info!(stage = stage.name(), elapsed_ms, "stage finished");
                    self.finish(ctx, stage.as_ref(), StageOutcome::Succeeded, elapsed_ms);
                }
                Err(err) => {
                    let reason = format!("{:#}", err);
                    warn!(stage = stage.name(), elapsed_ms, error = %reason, "stage failed");
                    self.finish(ctx, stage.as_ref(), StageOutcome::Failed(reason), elapsed_ms);
                    if stage.fatal() {
                        return Err(err);
                    }
                }
            }
        }

        let incomplete = ctx.count_incomplete();
        ctx.run_log.record(&format!(
            "run finished: {} stage(s), {} incomplete",
            ctx.stage_records.len(),
            incomplete
        ));
        Ok(())
    }

    fn finish(&self, ctx: &mut Ctx, stage: &dyn Stage, outcome: StageOutcome, elapsed_ms: u64) {
        let record = StageRecord {
            name: stage.name(),
            label: stage.label(),
            outcome,
            elapsed_ms,
        };
        let line = match record.outcome.detail() {
            Some(detail) => format!(
                "{} [{}]: {}",
                record.label,
                record.outcome.status(),
                detail
            ),
            None => format!("{} [{}]", record.label, record.outcome.status()),
        };
        ctx.run_log.record(&line);
        if self.progress {
            eprintln!("{}", format_progress(&record));
        }
        ctx.stage_records.push(record);
    }
}
