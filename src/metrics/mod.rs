pub mod classify;
pub mod series;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageInfo {
    pub data_type: Option<String>,
    pub dims: [Option<u64>; 4],
    pub pixdims: [Option<f64>; 4],
}

impl ImageInfo {
    pub fn spatial_dims(&self) -> Option<[u64; 3]> {
        Some([self.dims[0]?, self.dims[1]?, self.dims[2]?])
    }

    pub fn voxel_size(&self) -> Option<[f64; 3]> {
        Some([self.pixdims[0]?, self.pixdims[1]?, self.pixdims[2]?])
    }

    pub fn repetition_time(&self) -> Option<f64> {
        self.pixdims[3]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionStats {
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamsSource {
    ParFile,
    Decomposed,
    Unavailable,
}

impl ParamsSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ParFile => "realignment parameter file",
            Self::Decomposed => "decomposed from transform matrices",
            Self::Unavailable => "unavailable",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MotionSummary {
    pub source: ParamsSource,
    pub n_volumes: usize,
    pub max_abs_translation_mm: Option<f64>,
    pub max_abs_rotation_deg: Option<f64>,
    pub mean_rel_rms_mm: Option<f64>,
    pub mean_abs_rms_mm: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesSummary {
    pub n: usize,
    pub mean: Option<f64>,
    pub max: Option<f64>,
    pub count_above: usize,
}

impl SeriesSummary {
    pub fn empty() -> Self {
        Self {
            n: 0,
            mean: None,
            max: None,
            count_above: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FdSummary {
    pub series: SeriesSummary,
    pub threshold_mm: f64,
}

impl FdSummary {
    pub fn unavailable() -> Self {
        Self {
            series: SeriesSummary::empty(),
            threshold_mm: series::FD_THRESHOLD_MM,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DvarsSummary {
    pub series: SeriesSummary,
    pub outlier_count: usize,
}

impl DvarsSummary {
    pub fn unavailable() -> Self {
        Self {
            series: SeriesSummary::empty(),
            outlier_count: 0,
        }
    }
}
