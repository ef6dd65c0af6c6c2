use std::path::PathBuf;

use crate::config::RunConfig;
use crate::io::run_log::RunLog;
use crate::metrics::{DvarsSummary, FdSummary, ImageInfo, MotionSummary, RegionStats};
use crate::pipeline::{StageOutcome, StageRecord};

#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    pub out_dir: PathBuf,
    pub staged: PathBuf,
    pub info: PathBuf,
    pub mc_base: PathBuf,
    pub mc_image: PathBuf,
    pub mc_par: PathBuf,
    pub mc_mat_dir: PathBuf,
    pub mc_report: PathBuf,
    pub mc_meanvol: PathBuf,
    pub mc_sigma: PathBuf,
    pub mc_variance: PathBuf,
    pub mc_rel_rms: PathBuf,
    pub mc_abs_rms: PathBuf,
    pub mc_rel_mean_rms: PathBuf,
    pub mc_abs_mean_rms: PathBuf,
    pub mean: PathBuf,
    pub std: PathBuf,
    pub tsnr: PathBuf,
    pub tsnr_masked: PathBuf,
    pub tsnr_stats: PathBuf,
    pub mean_stats: PathBuf,
    pub fd_series: PathBuf,
    pub fd_outliers: PathBuf,
    pub fd_plot: PathBuf,
    pub dvars_series: PathBuf,
    pub dvars_outliers: PathBuf,
    pub dvars_plot: PathBuf,
    pub log: PathBuf,
    pub report_html: PathBuf,
    pub summary_json: PathBuf,
}

impl ArtifactPaths {
    pub fn new(out_dir: PathBuf, subject: &str) -> Self {
        let file = |suffix: &str| out_dir.join(format!("{}_{}", subject, suffix));
        Self {
            staged: file("func.nii.gz"),
            info: file("info.txt"),
            mc_base: file("mc"),
            mc_image: file("mc.nii.gz"),
            mc_par: file("mc.par"),
            mc_mat_dir: file("mc.mat"),
            mc_report: file("mc_report.txt"),
            mc_meanvol: file("mc_meanvol.nii.gz"),
            mc_sigma: file("mc_sigma.nii.gz"),
            mc_variance: file("mc_variance.nii.gz"),
            mc_rel_rms: file("mc_rel.rms"),
            mc_abs_rms: file("mc_abs.rms"),
            mc_rel_mean_rms: file("mc_rel_mean.rms"),
            mc_abs_mean_rms: file("mc_abs_mean.rms"),
            mean: file("mean.nii.gz"),
            std: file("std.nii.gz"),
            tsnr: file("tsnr.nii.gz"),
            tsnr_masked: file("tsnr_masked.nii.gz"),
            tsnr_stats: file("tsnr_stats.txt"),
            mean_stats: file("mean_stats.txt"),
            fd_series: file("fd.txt"),
            fd_outliers: file("fd_outliers.txt"),
            fd_plot: file("fd_plot.png"),
            dvars_series: file("dvars.txt"),
            dvars_outliers: file("dvars_outliers.txt"),
            dvars_plot: file("dvars_plot.png"),
            log: file("processing.log"),
            report_html: file("qc_report.html"),
            summary_json: file("qc_summary.json"),
            out_dir: out_dir.clone(),
        }
    }

    /// Files a run regenerates. The processing log is not among them.
    pub fn regenerated_files(&self) -> Vec<&PathBuf> {
        vec![
            &self.staged,
            &self.info,
            &self.mc_image,
            &self.mc_par,
            &self.mc_report,
            &self.mc_meanvol,
            &self.mc_sigma,
            &self.mc_variance,
            &self.mc_rel_rms,
            &self.mc_abs_rms,
            &self.mc_rel_mean_rms,
            &self.mc_abs_mean_rms,
            &self.mean,
            &self.std,
            &self.tsnr,
            &self.tsnr_masked,
            &self.tsnr_stats,
            &self.mean_stats,
            &self.fd_series,
            &self.fd_outliers,
            &self.fd_plot,
            &self.dvars_series,
            &self.dvars_outliers,
            &self.dvars_plot,
            &self.report_html,
            &self.summary_json,
        ]
    }
}

#[derive(Debug)]
pub struct Ctx {
    pub config: RunConfig,
    pub paths: ArtifactPaths,
    pub run_log: RunLog,
    pub planned_stages: Vec<&'static str>,
    pub stage_records: Vec<StageRecord>,
    pub warnings: Vec<String>,
    pub image_info: Option<ImageInfo>,
    pub n_volumes: Option<u64>,
    pub motion: Option<MotionSummary>,
    pub tsnr: Option<RegionStats>,
    pub mean_intensity: Option<f64>,
    pub fd: Option<FdSummary>,
    pub dvars: Option<DvarsSummary>,
}

impl Ctx {
    pub fn new(config: RunConfig) -> Self {
        let paths = ArtifactPaths::new(config.out_dir(), &config.subject);
        let run_log = RunLog::new(paths.log.clone());
        Self {
            config,
            paths,
            run_log,
            planned_stages: Vec::new(),
            stage_records: Vec::new(),
            warnings: Vec::new(),
            image_info: None,
            n_volumes: None,
            motion: None,
            tsnr: None,
            mean_intensity: None,
            fd: None,
            dvars: None,
        }
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        self.run_log.record(&format!("WARNING {}", message));
        self.warnings.push(message);
    }

    pub fn stage_succeeded(&self, name: &str) -> bool {
        self.stage_records
            .iter()
            .rev()
            .find(|r| r.name == name)
            .map(|r| r.outcome == StageOutcome::Succeeded)
            .unwrap_or(false)
    }

    /// A stage's products can be trusted when it ran successfully in this
    /// run, or when it is not part of the current pipeline at all.
    pub fn stage_available(&self, name: &str) -> bool {
        !self.planned_stages.iter().any(|s| *s == name) || self.stage_succeeded(name)
    }

    pub fn count_incomplete(&self) -> usize {
        self.stage_records
            .iter()
            .filter(|r| r.outcome != StageOutcome::Succeeded)
            .count()
    }
}
