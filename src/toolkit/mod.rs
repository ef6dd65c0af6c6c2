use std::path::Path;

use anyhow::Result;

pub mod fsl;
pub mod parse;

pub use fsl::FslToolkit;

pub const REQUIRED_TOOLS: &[&str] = &[
    "fslinfo",
    "fslnvols",
    "mcflirt",
    "avscale",
    "fslmaths",
    "fslstats",
    "fsl_motion_outliers",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemporalOp {
    Mean,
    Std,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoxelOp {
    Div,
    Mask,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatOp {
    Mean,
    Std,
    Range,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutlierMetric {
    Fd,
    Dvars,
}

#[derive(Debug, Clone, Copy)]
pub struct OutlierOutputs<'a> {
    pub flags: &'a Path,
    pub series: &'a Path,
    pub plot: &'a Path,
}

/// Every numeric computation on images goes through this interface.
/// Methods block until the underlying tool exits.
pub trait Toolkit {
    /// Raw header dump (dimensions, voxel sizes, data type).
    fn image_info(&self, image: &Path) -> Result<String>;

    fn volume_count(&self, image: &Path) -> Result<String>;

    /// Rigid-body (6 dof) realignment. Products share the `out_base` stem:
    /// `<base>.nii.gz`, `<base>.par`, `<base>_{rel,abs}[_mean].rms` and
    /// per-volume matrices under `<base>.mat/`, and the
    /// `<base>_{meanvol,sigma,variance}` images. Returns the text report.
    fn realign(&self, input: &Path, out_base: &Path) -> Result<String>;

    fn decompose_transform(&self, matrix: &Path, reference: &Path) -> Result<String>;

    fn temporal_reduce(&self, input: &Path, op: TemporalOp, output: &Path) -> Result<()>;

    fn voxel_math(&self, input: &Path, op: VoxelOp, operand: &Path, output: &Path) -> Result<()>;

    fn region_stats(&self, image: &Path, mask: Option<&Path>, ops: &[StatOp]) -> Result<String>;

    fn motion_outliers(
        &self,
        input: &Path,
        metric: OutlierMetric,
        outputs: &OutlierOutputs<'_>,
    ) -> Result<()>;
}
