use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::ctx::Ctx;
use crate::io::html::known_path;
use crate::metrics::classify::{
    OVERALL_QUALITY_LABEL, classify_max_fd, classify_mean_fd, classify_tsnr,
};
use crate::metrics::{DvarsSummary, FdSummary};
use crate::schema::v1::{
    BoldQcV1, DvarsMetrics, FdMetrics, ImageMeta, InputMeta, MotionMetrics, StageStatus,
    TsnrMetrics,
};

pub fn build_report(ctx: &Ctx) -> BoldQcV1 {
    let image = ctx.image_info.as_ref();
    let tsnr = ctx.tsnr.as_ref();
    let fd = ctx.fd.unwrap_or_else(FdSummary::unavailable);
    let dvars = ctx.dvars.unwrap_or_else(DvarsSummary::unavailable);

    BoldQcV1 {
        tool: "kira-boldqc".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        schema_version: "v1".to_string(),
        input: InputMeta {
            subject: ctx.config.subject.clone(),
            scan: known_path(&ctx.config.scan),
            mask: known_path(&ctx.config.mask),
        },
        image: ImageMeta {
            dims: image.and_then(|i| i.spatial_dims()),
            voxel_size_mm: image.and_then(|i| i.voxel_size()),
            tr_s: image.and_then(|i| i.repetition_time()),
            n_volumes: ctx.n_volumes,
            data_type: image.and_then(|i| i.data_type.clone()),
        },
        tsnr: TsnrMetrics {
            mean: tsnr.map(|s| s.mean),
            std: tsnr.map(|s| s.std),
            min: tsnr.map(|s| s.min),
            max: tsnr.map(|s| s.max),
            tier: tsnr.map(|s| classify_tsnr(s.mean).tier),
            mean_intensity: ctx.mean_intensity,
        },
        motion: ctx.motion.as_ref().map(|m| MotionMetrics {
            params_source: m.source.as_str().to_string(),
            max_abs_translation_mm: m.max_abs_translation_mm,
            max_abs_rotation_deg: m.max_abs_rotation_deg,
            mean_rel_rms_mm: m.mean_rel_rms_mm,
            mean_abs_rms_mm: m.mean_abs_rms_mm,
        }),
        fd: FdMetrics {
            n: fd.series.n,
            mean_mm: fd.series.mean,
            max_mm: fd.series.max,
            threshold_mm: fd.threshold_mm,
            n_above_threshold: fd.series.count_above,
            mean_tier: fd.series.mean.map(|v| classify_mean_fd(v).tier),
            max_tier: fd.series.max.map(|v| classify_max_fd(v).tier),
        },
        dvars: DvarsMetrics {
            n: dvars.series.n,
            mean: dvars.series.mean,
            max: dvars.series.max,
            outlier_count: dvars.outlier_count,
        },
        overall_quality: OVERALL_QUALITY_LABEL.to_string(),
        stages: ctx
            .stage_records
            .iter()
            .map(|r| StageStatus {
                name: r.name.to_string(),
                status: r.outcome.status().to_string(),
                detail: r.outcome.detail().map(str::to_string),
                elapsed_ms: r.elapsed_ms,
            })
            .collect(),
        warnings: ctx.warnings.clone(),
    }
}

pub fn write_json(path: &Path, ctx: &Ctx) -> Result<()> {
    let report = build_report(ctx);
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &report)?;
    writer
        .flush()
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
