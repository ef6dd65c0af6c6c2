use std::fmt::Write as FmtWrite;
use std::path::Path;

use anyhow::Result;

use crate::ctx::Ctx;
use crate::metrics::classify::{
    Classification, OVERALL_QUALITY_LABEL, classify_max_fd, classify_mean_fd, classify_tsnr,
};
use crate::metrics::{DvarsSummary, FdSummary, ImageInfo, MotionSummary, RegionStats};
use crate::pipeline::StageRecord;

/// Everything the report shows, detached from the run context so it can
/// be rendered on its own.
#[derive(Debug, Clone)]
pub struct ReportView {
    pub subject: String,
    pub scan: Option<String>,
    pub mask: Option<String>,
    pub generated_at: String,
    pub image: Option<ImageInfo>,
    pub n_volumes: Option<u64>,
    pub tsnr: Option<RegionStats>,
    pub mean_intensity: Option<f64>,
    pub motion: Option<MotionSummary>,
    pub fd: FdSummary,
    pub dvars: DvarsSummary,
    pub fd_plot: String,
    pub dvars_plot: String,
    pub stages: Vec<StageRecord>,
    pub warnings: Vec<String>,
}

impl ReportView {
    pub fn from_ctx(ctx: &Ctx, generated_at: String) -> Self {
        Self {
            subject: ctx.config.subject.clone(),
            scan: known_path(&ctx.config.scan),
            mask: known_path(&ctx.config.mask),
            generated_at,
            image: ctx.image_info.clone(),
            n_volumes: ctx.n_volumes,
            tsnr: ctx.tsnr,
            mean_intensity: ctx.mean_intensity,
            motion: ctx.motion.clone(),
            fd: ctx.fd.unwrap_or_else(FdSummary::unavailable),
            dvars: ctx.dvars.unwrap_or_else(DvarsSummary::unavailable),
            fd_plot: file_name(&ctx.paths.fd_plot),
            dvars_plot: file_name(&ctx.paths.dvars_plot),
            stages: ctx.stage_records.clone(),
            warnings: ctx.warnings.clone(),
        }
    }
}

/// `None` for the empty path a `report` run uses when the caller did not
/// name the input.
pub fn known_path(path: &Path) -> Option<String> {
    if path.as_os_str().is_empty() {
        None
    } else {
        Some(path.display().to_string())
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

pub fn render_report(view: &ReportView) -> Result<String> {
    let mut html = String::with_capacity(16 * 1024);
    let subject = escape_html(&view.subject);

    writeln!(html, "<!DOCTYPE html>")?;
    writeln!(html, "<html lang=\"en\">")?;
    writeln!(html, "<head>")?;
    writeln!(html, "<meta charset=\"utf-8\"/>")?;
    writeln!(html, "<title>fMRI QC report: {}</title>", subject)?;
    writeln!(html, "<style>")?;
    writeln!(
        html,
        "body{{font-family:Arial,Helvetica,sans-serif;margin:20px;color:#222;background:#fff;}}"
    )?;
    writeln!(html, "h1{{margin:0 0 8px 0;font-size:24px;}}")?;
    writeln!(html, "h2{{margin:24px 0 8px 0;font-size:20px;}}")?;
    writeln!(html, ".meta{{color:#555;font-size:13px;margin-bottom:16px;}}")?;
    writeln!(
        html,
        ".overall{{font-size:18px;padding:8px 12px;border:1px solid #ddd;display:inline-block;}}"
    )?;
    writeln!(
        html,
        ".metrics{{border-collapse:collapse;margin:12px 0 20px 0;width:100%;max-width:900px;}}"
    )?;
    writeln!(
        html,
        ".metrics th,.metrics td{{border:1px solid #ddd;padding:6px 10px;text-align:left;}}"
    )?;
    writeln!(html, ".good{{color:#0a7a0a;font-weight:bold;}}")?;
    writeln!(html, ".warning{{color:#d98200;font-weight:bold;}}")?;
    writeln!(html, ".bad{{color:#c00000;font-weight:bold;}}")?;
    writeln!(html, ".na{{color:#777;}}")?;
    writeln!(html, "img{{max-width:900px;border:1px solid #e5e5e5;}}")?;
    writeln!(html, "</style>")?;
    writeln!(html, "</head>")?;
    writeln!(html, "<body>")?;

    writeln!(html, "<h1>fMRI quality control report</h1>")?;
    writeln!(
        html,
        "<div class=\"meta\">Subject: <b>{}</b><br/>Input: {}<br/>Mask: {}<br/>Generated: {}</div>",
        subject,
        or_na(view.scan.as_deref()),
        or_na(view.mask.as_deref()),
        escape_html(&view.generated_at)
    )?;
    writeln!(
        html,
        "<div class=\"overall\">Overall quality: <span class=\"good\">{}</span></div>",
        OVERALL_QUALITY_LABEL
    )?;

    section_image(&mut html, view)?;
    section_tsnr(&mut html, view)?;
    section_motion(&mut html, view)?;
    section_dvars(&mut html, view)?;
    section_stages(&mut html, view)?;
    section_warnings(&mut html, view)?;

    writeln!(html, "</body>")?;
    writeln!(html, "</html>")?;
    Ok(html)
}

fn section_image(out: &mut String, view: &ReportView) -> Result<()> {
    writeln!(out, "<h2>Image</h2>")?;
    writeln!(out, "<table class=\"metrics\">")?;
    let image = view.image.as_ref();
    let dims = image
        .and_then(ImageInfo::spatial_dims)
        .map(|d| format!("{} x {} x {}", d[0], d[1], d[2]));
    let voxel = image
        .and_then(ImageInfo::voxel_size)
        .map(|v| format!("{:.2} x {:.2} x {:.2} mm", v[0], v[1], v[2]));
    let tr = image
        .and_then(ImageInfo::repetition_time)
        .map(|t| format!("{:.3} s", t));
    plain_row(out, "Dimensions", dims)?;
    plain_row(out, "Voxel size", voxel)?;
    plain_row(out, "Repetition time", tr)?;
    plain_row(out, "Volumes", view.n_volumes.map(|n| n.to_string()))?;
    writeln!(out, "</table>")?;
    Ok(())
}

fn section_tsnr(out: &mut String, view: &ReportView) -> Result<()> {
    writeln!(out, "<h2>Temporal SNR</h2>")?;
    writeln!(out, "<table class=\"metrics\">")?;
    let tsnr = view.tsnr.as_ref();
    classified_row(out, "Mean tSNR (in mask)", tsnr.map(|s| s.mean), 2, classify_tsnr)?;
    plain_row(out, "tSNR standard deviation", tsnr.map(|s| fmt_value(s.std, 2)))?;
    plain_row(
        out,
        "tSNR range",
        tsnr.map(|s| format!("{} - {}", fmt_value(s.min, 2), fmt_value(s.max, 2))),
    )?;
    plain_row(
        out,
        "Mean intensity (in mask)",
        view.mean_intensity.map(|v| fmt_value(v, 2)),
    )?;
    writeln!(out, "</table>")?;
    Ok(())
}

fn section_motion(out: &mut String, view: &ReportView) -> Result<()> {
    writeln!(out, "<h2>Head motion</h2>")?;
    writeln!(out, "<table class=\"metrics\">")?;
    let fd = &view.fd.series;
    classified_row(out, "Mean FD (mm)", fd.mean, 3, classify_mean_fd)?;
    classified_row(out, "Max FD (mm)", fd.max, 3, classify_max_fd)?;
    plain_row(
        out,
        &format!("Volumes with FD &gt; {} mm", view.fd.threshold_mm),
        Some(fd.count_above.to_string()),
    )?;

    let motion = view.motion.as_ref();
    plain_row(
        out,
        "Mean relative RMS displacement (mm)",
        motion.and_then(|m| m.mean_rel_rms_mm).map(|v| fmt_value(v, 3)),
    )?;
    plain_row(
        out,
        "Mean absolute RMS displacement (mm)",
        motion.and_then(|m| m.mean_abs_rms_mm).map(|v| fmt_value(v, 3)),
    )?;
    plain_row(
        out,
        "Max translation (mm)",
        motion
            .and_then(|m| m.max_abs_translation_mm)
            .map(|v| fmt_value(v, 3)),
    )?;
    plain_row(
        out,
        "Max rotation (deg)",
        motion
            .and_then(|m| m.max_abs_rotation_deg)
            .map(|v| fmt_value(v, 3)),
    )?;
    plain_row(
        out,
        "Motion parameters",
        motion.map(|m| m.source.as_str().to_string()),
    )?;
    writeln!(out, "</table>")?;
    writeln!(
        out,
        "<div><img src=\"{}\" alt=\"framewise displacement\"/></div>",
        escape_html(&view.fd_plot)
    )?;
    Ok(())
}

fn section_dvars(out: &mut String, view: &ReportView) -> Result<()> {
    writeln!(out, "<h2>DVARS</h2>")?;
    writeln!(out, "<table class=\"metrics\">")?;
    let series = &view.dvars.series;
    plain_row(out, "Mean DVARS", series.mean.map(|v| fmt_value(v, 3)))?;
    plain_row(out, "Max DVARS", series.max.map(|v| fmt_value(v, 3)))?;
    plain_row(
        out,
        "DVARS outliers",
        Some(view.dvars.outlier_count.to_string()),
    )?;
    writeln!(out, "</table>")?;
    writeln!(
        out,
        "<div><img src=\"{}\" alt=\"DVARS\"/></div>",
        escape_html(&view.dvars_plot)
    )?;
    Ok(())
}

fn section_stages(out: &mut String, view: &ReportView) -> Result<()> {
    writeln!(out, "<h2>Processing steps</h2>")?;
    writeln!(out, "<table class=\"metrics\">")?;
    writeln!(out, "<tr><th>Step</th><th>Status</th><th>Detail</th></tr>")?;
    for record in &view.stages {
        let class = match record.outcome.status() {
            "ok" => "good",
            "failed" => "bad",
            _ => "warning",
        };
        writeln!(
            out,
            "<tr><td>{}</td><td class=\"{}\">{}</td><td>{}</td></tr>",
            escape_html(record.label),
            class,
            record.outcome.status(),
            escape_html(record.outcome.detail().unwrap_or(""))
        )?;
    }
    writeln!(out, "</table>")?;
    Ok(())
}

fn section_warnings(out: &mut String, view: &ReportView) -> Result<()> {
    if view.warnings.is_empty() {
        return Ok(());
    }
    writeln!(out, "<h2>Warnings</h2>")?;
    writeln!(out, "<ul>")?;
    for warning in &view.warnings {
        writeln!(out, "<li>{}</li>", escape_html(warning))?;
    }
    writeln!(out, "</ul>")?;
    Ok(())
}

fn classified_row(
    out: &mut String,
    name: &str,
    value: Option<f64>,
    precision: usize,
    classify: fn(f64) -> Classification,
) -> Result<()> {
    match value {
        Some(v) => {
            let class = classify(v);
            writeln!(
                out,
                "<tr><th>{}</th><td class=\"{}\">{} ({})</td></tr>",
                name,
                class.tier.css_class(),
                fmt_value(v, precision),
                class.label
            )?;
        }
        None => {
            writeln!(out, "<tr><th>{}</th><td class=\"na\">NA</td></tr>", name)?;
        }
    }
    Ok(())
}

fn plain_row(out: &mut String, name: &str, value: Option<String>) -> Result<()> {
    match value {
        Some(v) => writeln!(out, "<tr><th>{}</th><td>{}</td></tr>", name, escape_html(&v))?,
        None => writeln!(out, "<tr><th>{}</th><td class=\"na\">NA</td></tr>", name)?,
    }
    Ok(())
}

fn or_na(value: Option<&str>) -> String {
    value.map(escape_html).unwrap_or_else(|| "NA".to_string())
}

pub fn fmt_value(v: f64, precision: usize) -> String {
    if v.is_finite() {
        format!("{:.*}", precision, v)
    } else {
        v.to_string()
    }
}

pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
