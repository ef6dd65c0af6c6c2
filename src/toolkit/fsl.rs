use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::{Context, Result, bail};
use tracing::debug;

use crate::toolkit::{
    OutlierMetric, OutlierOutputs, REQUIRED_TOOLS, StatOp, TemporalOp, Toolkit, VoxelOp,
};

/// Runs FSL command-line tools, either from `$FSLDIR/bin` or from `PATH`.
#[derive(Debug, Clone, Default)]
pub struct FslToolkit {
    fsl_dir: Option<PathBuf>,
}

impl FslToolkit {
    pub fn new(fsl_dir: Option<&Path>) -> Self {
        Self {
            fsl_dir: fsl_dir.map(Path::to_path_buf),
        }
    }

    pub fn command_path(&self, tool: &str) -> PathBuf {
        match &self.fsl_dir {
            Some(dir) => dir.join("bin").join(tool),
            None => PathBuf::from(tool),
        }
    }

    pub fn missing_tools(&self) -> Vec<&'static str> {
        REQUIRED_TOOLS
            .iter()
            .copied()
            .filter(|tool| !self.is_available(tool))
            .collect()
    }

    fn is_available(&self, tool: &str) -> bool {
        if self.fsl_dir.is_some() {
            return self.command_path(tool).is_file();
        }
        std::env::var_os("PATH")
            .map(|paths| std::env::split_paths(&paths).any(|dir| dir.join(tool).is_file()))
            .unwrap_or(false)
    }

    fn run(&self, tool: &str, args: &[&OsStr]) -> Result<String> {
        let program = self.command_path(tool);
        debug!(tool, args = ?args, "invoking toolkit command");
        let mut cmd = Command::new(&program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .env("FSLOUTPUTTYPE", "NIFTI_GZ");
        if let Some(dir) = &self.fsl_dir {
            cmd.env("FSLDIR", dir);
        }
        let output = cmd
            .output()
            .with_context(|| format!("failed to launch {}", program.display()))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let last = stderr
                .lines()
                .rev()
                .map(str::trim)
                .find(|l| !l.is_empty())
                .unwrap_or("no diagnostic output");
            bail!("{} exited with {}: {}", tool, output.status, last);
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl TemporalOp {
    fn flag(self) -> &'static str {
        match self {
            Self::Mean => "-Tmean",
            Self::Std => "-Tstd",
        }
    }
}

impl VoxelOp {
    fn flag(self) -> &'static str {
        match self {
            Self::Div => "-div",
            Self::Mask => "-mas",
        }
    }
}

impl StatOp {
    fn flag(self) -> &'static str {
        match self {
            Self::Mean => "-M",
            Self::Std => "-S",
            Self::Range => "-R",
        }
    }
}

impl OutlierMetric {
    fn flag(self) -> &'static str {
        match self {
            Self::Fd => "--fd",
            Self::Dvars => "--dvars",
        }
    }
}

impl Toolkit for FslToolkit {
    fn image_info(&self, image: &Path) -> Result<String> {
        self.run("fslinfo", &[image.as_os_str()])
    }

    fn volume_count(&self, image: &Path) -> Result<String> {
        self.run("fslnvols", &[image.as_os_str()])
    }

    fn realign(&self, input: &Path, out_base: &Path) -> Result<String> {
        self.run(
            "mcflirt",
            &[
                OsStr::new("-in"),
                input.as_os_str(),
                OsStr::new("-out"),
                out_base.as_os_str(),
                OsStr::new("-plots"),
                OsStr::new("-rmsrel"),
                OsStr::new("-rmsabs"),
                OsStr::new("-report"),
                OsStr::new("-stats"),
                OsStr::new("-mats"),
                OsStr::new("-spline_final"),
            ],
        )
    }

    fn decompose_transform(&self, matrix: &Path, reference: &Path) -> Result<String> {
        self.run(
            "avscale",
            &[
                OsStr::new("--allparams"),
                matrix.as_os_str(),
                reference.as_os_str(),
            ],
        )
    }

    fn temporal_reduce(&self, input: &Path, op: TemporalOp, output: &Path) -> Result<()> {
        self.run(
            "fslmaths",
            &[input.as_os_str(), OsStr::new(op.flag()), output.as_os_str()],
        )?;
        Ok(())
    }

    fn voxel_math(&self, input: &Path, op: VoxelOp, operand: &Path, output: &Path) -> Result<()> {
        self.run(
            "fslmaths",
            &[
                input.as_os_str(),
                OsStr::new(op.flag()),
                operand.as_os_str(),
                output.as_os_str(),
            ],
        )?;
        Ok(())
    }

    fn region_stats(&self, image: &Path, mask: Option<&Path>, ops: &[StatOp]) -> Result<String> {
        let mut args = vec![image.as_os_str()];
        // -k only applies to the options that follow it
        if let Some(mask) = mask {
            args.push(OsStr::new("-k"));
            args.push(mask.as_os_str());
        }
        args.extend(ops.iter().map(|op| OsStr::new(op.flag())));
        self.run("fslstats", &args)
    }

    fn motion_outliers(
        &self,
        input: &Path,
        metric: OutlierMetric,
        outputs: &OutlierOutputs<'_>,
    ) -> Result<()> {
        self.run(
            "fsl_motion_outliers",
            &[
                OsStr::new("-i"),
                input.as_os_str(),
                OsStr::new("-o"),
                outputs.flags.as_os_str(),
                OsStr::new("-s"),
                outputs.series.as_os_str(),
                OsStr::new("-p"),
                outputs.plot.as_os_str(),
                OsStr::new(metric.flag()),
            ],
        )?;
        Ok(())
    }
}
