use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub scan: PathBuf,
    pub mask: PathBuf,
    pub subject: String,
    pub out_root: PathBuf,
    pub fsl_dir: Option<PathBuf>,
    pub write_json: bool,
    pub strict: bool,
}

impl RunConfig {
    pub fn new(scan: PathBuf, mask: PathBuf, subject: String, out_root: PathBuf) -> Self {
        Self {
            scan,
            mask,
            subject,
            out_root,
            fsl_dir: None,
            write_json: false,
            strict: false,
        }
    }

    pub fn out_dir(&self) -> PathBuf {
        self.out_root.join(format!("{}_qc", self.subject))
    }
}

/// Fills in whichever of scan, mask and subject were not given on the
/// command line by asking `prompt`. Answers are trimmed.
pub fn resolve_inputs<F>(
    scan: Option<PathBuf>,
    mask: Option<PathBuf>,
    subject: Option<String>,
    mut prompt: F,
) -> Result<(PathBuf, PathBuf, String)>
where
    F: FnMut(&str) -> Result<String>,
{
    let scan = match scan {
        Some(p) => p,
        None => PathBuf::from(prompt("Path to 4D functional scan")?.trim()),
    };
    let mask = match mask {
        Some(p) => p,
        None => PathBuf::from(prompt("Path to brain mask")?.trim()),
    };
    let subject = match subject {
        Some(s) => s,
        None => prompt("Subject identifier")?.trim().to_string(),
    };
    Ok((scan, mask, subject))
}

pub fn check_input_file(path: &Path, what: &str) -> Result<()> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_file() => Ok(()),
        Ok(_) => bail!("{} is not a regular file: {}", what, path.display()),
        Err(_) => bail!("{} not found: {}", what, path.display()),
    }
}

// The subject id is spliced into every output file name.
pub fn check_subject_id(subject: &str) -> Result<()> {
    if subject.trim().is_empty() {
        bail!("subject identifier must not be empty");
    }
    if subject.contains('/') || subject.contains('\\') {
        bail!("subject identifier '{}' must not contain path separators", subject);
    }
    if subject == "." || subject == ".." {
        bail!("subject identifier '{}' is not a usable name", subject);
    }
    Ok(())
}
