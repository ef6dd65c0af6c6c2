use console::Style;

use crate::ctx::Ctx;
use crate::io::html::fmt_value;
use crate::metrics::classify::classify_tsnr;
use crate::pipeline::{StageOutcome, StageRecord};

pub fn format_summary(ctx: &Ctx) -> String {
    let version = env!("CARGO_PKG_VERSION");
    let mut out = String::new();
    out.push_str(&format!("kira-boldqc v{}\n", version));
    out.push_str(&format!("Subject: {}\n", ctx.config.subject));

    match &ctx.tsnr {
        Some(tsnr) => out.push_str(&format!(
            "tSNR: {} ({})\n",
            fmt_value(tsnr.mean, 2),
            classify_tsnr(tsnr.mean).label
        )),
        None => out.push_str("tSNR: NA\n"),
    }

    let (fd_mean, fd_max, fd_outliers) = match &ctx.fd {
        Some(fd) => (fd.series.mean, fd.series.max, fd.series.count_above),
        None => (None, None, 0),
    };
    out.push_str(&format!(
        "FD: mean={} max={} outliers={}\n",
        opt(fd_mean),
        opt(fd_max),
        fd_outliers
    ));
    out.push_str(&format!(
        "DVARS outliers: {}\n",
        ctx.dvars.map(|d| d.outlier_count).unwrap_or(0)
    ));

    let failed = ctx
        .stage_records
        .iter()
        .filter(|r| matches!(r.outcome, StageOutcome::Failed(_)))
        .count();
    let skipped = ctx
        .stage_records
        .iter()
        .filter(|r| matches!(r.outcome, StageOutcome::Skipped(_)))
        .count();
    let ok = ctx.stage_records.len() - failed - skipped;
    out.push_str(&format!(
        "Stages: {} ok, {} failed, {} skipped\n",
        ok, failed, skipped
    ));
    out.push_str(&format!("Report: {}\n", ctx.paths.report_html.display()));
    out
}

fn opt(v: Option<f64>) -> String {
    v.map(|v| fmt_value(v, 3)).unwrap_or_else(|| "NA".to_string())
}

/// One console line per finished stage: a check mark, a cross, or a dash
/// for skipped stages.
pub fn format_progress(record: &StageRecord) -> String {
    match &record.outcome {
        StageOutcome::Succeeded => {
            format!("{} {}", Style::new().green().apply_to("✓"), record.label)
        }
        StageOutcome::Failed(reason) => format!(
            "{} {}: {}",
            Style::new().red().apply_to("✗"),
            record.label,
            reason
        ),
        StageOutcome::Skipped(reason) => format!(
            "{} {}: skipped ({})",
            Style::new().yellow().apply_to("-"),
            record.label,
            reason
        ),
    }
}
