use serde::{Deserialize, Serialize};

use crate::metrics::classify::Tier;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputMeta {
    pub subject: String,
    pub scan: Option<String>,
    pub mask: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageMeta {
    pub dims: Option<[u64; 3]>,
    pub voxel_size_mm: Option<[f64; 3]>,
    pub tr_s: Option<f64>,
    pub n_volumes: Option<u64>,
    pub data_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TsnrMetrics {
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub tier: Option<Tier>,
    pub mean_intensity: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MotionMetrics {
    pub params_source: String,
    pub max_abs_translation_mm: Option<f64>,
    pub max_abs_rotation_deg: Option<f64>,
    pub mean_rel_rms_mm: Option<f64>,
    pub mean_abs_rms_mm: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FdMetrics {
    pub n: usize,
    pub mean_mm: Option<f64>,
    pub max_mm: Option<f64>,
    pub threshold_mm: f64,
    pub n_above_threshold: usize,
    pub mean_tier: Option<Tier>,
    pub max_tier: Option<Tier>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DvarsMetrics {
    pub n: usize,
    pub mean: Option<f64>,
    pub max: Option<f64>,
    pub outlier_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageStatus {
    pub name: String,
    pub status: String,
    pub detail: Option<String>,
    pub elapsed_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoldQcV1 {
    pub tool: String,
    pub version: String,
    pub schema_version: String,
    pub input: InputMeta,
    pub image: ImageMeta,
    pub tsnr: TsnrMetrics,
    pub motion: Option<MotionMetrics>,
    pub fd: FdMetrics,
    pub dvars: DvarsMetrics,
    pub overall_quality: String,
    pub stages: Vec<StageStatus>,
    pub warnings: Vec<String>,
}
