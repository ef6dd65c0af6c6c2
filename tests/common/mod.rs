#![allow(dead_code)]

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use kira_boldqc::config::RunConfig;
use kira_boldqc::toolkit::{OutlierMetric, OutlierOutputs, StatOp, TemporalOp, Toolkit, VoxelOp};

pub const FSLINFO: &str = "data_type      FLOAT32\n\
dim1           64\n\
dim2           64\n\
dim3           36\n\
dim4           5\n\
datatype       16\n\
pixdim1        3.000000\n\
pixdim2        3.000000\n\
pixdim3        3.500000\n\
pixdim4        2.000000\n\
cal_max        0.0000\n\
file_type      NIFTI-1+\n";

pub const PAR: &str = "0.001 -0.002 0.000 0.10 -0.20 0.05\n\
0.002 0.001 -0.003 0.15 0.30 -0.40\n\
0.000 0.000 0.001 0.05 0.00 0.10\n\
-0.001 0.002 0.000 -0.05 0.10 0.20\n\
0.000 0.000 0.000 0.00 0.00 0.00\n";

pub const MCFLIRT_REPORT: &str = "McFLIRT v 2.0 - FMRI motion correction\n\
Reading time series... \n\
Refining with 2 iterations of cost function\n";

pub const AVSCALE: &str = "Rotation & Translation Matrix:\n\
1.000000 0.000000 0.000000 0.000000 \n\
0.000000 1.000000 0.000000 0.000000 \n\
0.000000 0.000000 1.000000 0.000000 \n\
0.000000 0.000000 0.000000 1.000000 \n\
\n\
Rotation Angles (x,y,z) [rads] = 0.010000 -0.020000 0.000000 \n\
\n\
Translations (x,y,z) [mm] = 0.500000 -0.250000 0.125000 \n\
\n\
Scales (x,y,z) = 1.000000 1.000000 1.000000 \n";

/// Stands in for the FSL tools: writes small canned artifacts where the
/// real tools would and records every call.
#[derive(Default)]
pub struct FakeToolkit {
    pub calls: RefCell<Vec<String>>,
    pub fail: Vec<&'static str>,
    pub skip_par: bool,
    pub skip_mats: bool,
}

impl FakeToolkit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(names: &[&'static str]) -> Self {
        Self {
            fail: names.to_vec(),
            ..Self::default()
        }
    }

    pub fn called(&self, name: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.as_str() == name)
            .count()
    }

    fn enter(&self, name: &'static str) -> Result<()> {
        self.calls.borrow_mut().push(name.to_string());
        if self.fail.contains(&name) {
            bail!("{} exited with exit status: 1: simulated failure", name);
        }
        Ok(())
    }
}

fn with_suffix(base: &Path, suffix: &str) -> PathBuf {
    let mut s = base.as_os_str().to_os_string();
    s.push(suffix);
    PathBuf::from(s)
}

impl Toolkit for FakeToolkit {
    fn image_info(&self, _image: &Path) -> Result<String> {
        self.enter("image_info")?;
        Ok(FSLINFO.to_string())
    }

    fn volume_count(&self, _image: &Path) -> Result<String> {
        self.enter("volume_count")?;
        Ok("5\n".to_string())
    }

    fn realign(&self, input: &Path, out_base: &Path) -> Result<String> {
        self.enter("realign")?;
        fs::copy(input, with_suffix(out_base, ".nii.gz"))?;
        if !self.skip_par {
            fs::write(with_suffix(out_base, ".par"), PAR)?;
        }
        if !self.skip_mats {
            let mats = with_suffix(out_base, ".mat");
            fs::create_dir_all(&mats)?;
            for i in 0..5 {
                fs::write(mats.join(format!("MAT_{:04}", i)), "1 0 0 0\n")?;
            }
        }
        fs::write(with_suffix(out_base, "_rel.rms"), "0.05\n0.07\n0.02\n0.04\n")?;
        fs::write(with_suffix(out_base, "_abs.rms"), "0.1\n0.2\n0.1\n0.15\n0.0\n")?;
        fs::write(with_suffix(out_base, "_rel_mean.rms"), "0.045\n")?;
        fs::write(with_suffix(out_base, "_abs_mean.rms"), "0.11\n")?;
        for image in ["_meanvol.nii.gz", "_sigma.nii.gz", "_variance.nii.gz"] {
            fs::write(with_suffix(out_base, image), image)?;
        }
        Ok(MCFLIRT_REPORT.to_string())
    }

    fn decompose_transform(&self, _matrix: &Path, _reference: &Path) -> Result<String> {
        self.enter("decompose_transform")?;
        Ok(AVSCALE.to_string())
    }

    fn temporal_reduce(&self, _input: &Path, op: TemporalOp, output: &Path) -> Result<()> {
        self.enter("temporal_reduce")?;
        fs::write(output, format!("{:?}", op))?;
        Ok(())
    }

    fn voxel_math(&self, _input: &Path, op: VoxelOp, _operand: &Path, output: &Path) -> Result<()> {
        self.enter("voxel_math")?;
        fs::write(output, format!("{:?}", op))?;
        Ok(())
    }

    fn region_stats(&self, _image: &Path, mask: Option<&Path>, ops: &[StatOp]) -> Result<String> {
        self.enter("region_stats")?;
        if mask.is_some() && ops.len() == 1 && ops[0] == StatOp::Mean {
            return Ok("812.500000 \n".to_string());
        }
        Ok("42.100000 10.200000 0.000000 88.300000 \n".to_string())
    }

    fn motion_outliers(
        &self,
        _input: &Path,
        metric: OutlierMetric,
        outputs: &OutlierOutputs<'_>,
    ) -> Result<()> {
        match metric {
            OutlierMetric::Fd => {
                self.enter("motion_outliers_fd")?;
                fs::write(outputs.series, "0.1\n0.3\n0.6\n")?;
                fs::write(outputs.flags, "0 0 1\n")?;
            }
            OutlierMetric::Dvars => {
                self.enter("motion_outliers_dvars")?;
                fs::write(outputs.series, "20.0\n35.5\n18.5\n60.0\n")?;
                fs::write(outputs.flags, "0\n0\n0\n1\n0\n")?;
            }
        }
        fs::write(outputs.plot, b"PNG")?;
        Ok(())
    }
}

/// Scan and mask files in `dir`, plus a config rooted at `out_root`.
pub fn make_inputs(dir: &Path, out_root: &Path, subject: &str) -> RunConfig {
    let scan = dir.join("bold.nii.gz");
    let mask = dir.join("mask.nii.gz");
    fs::write(&scan, b"fake-bold-series").unwrap();
    fs::write(&mask, b"fake-mask").unwrap();
    RunConfig::new(scan, mask, subject.to_string(), out_root.to_path_buf())
}
