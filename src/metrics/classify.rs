use serde::{Deserialize, Serialize};

pub const TSNR_GOOD_ABOVE: f64 = 20.0;
pub const TSNR_ACCEPTABLE_ABOVE: f64 = 10.0;
pub const MEAN_FD_GOOD_BELOW_MM: f64 = 0.2;
pub const MAX_FD_GOOD_BELOW_MM: f64 = 0.5;

/// Rendered as the overall verdict whatever the metrics say. Nothing
/// computes it yet.
pub const OVERALL_QUALITY_LABEL: &str = "GOOD";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Good,
    Warning,
    Bad,
}

impl Tier {
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Warning => "warning",
            Self::Bad => "bad",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub tier: Tier,
    pub label: &'static str,
}

pub fn classify_tsnr(mean_tsnr: f64) -> Classification {
    if mean_tsnr > TSNR_GOOD_ABOVE {
        Classification {
            tier: Tier::Good,
            label: "Good",
        }
    } else if mean_tsnr > TSNR_ACCEPTABLE_ABOVE {
        Classification {
            tier: Tier::Warning,
            label: "Acceptable",
        }
    } else {
        Classification {
            tier: Tier::Bad,
            label: "Poor",
        }
    }
}

// Mean FD has no bad tier.
pub fn classify_mean_fd(mean_fd_mm: f64) -> Classification {
    if mean_fd_mm < MEAN_FD_GOOD_BELOW_MM {
        Classification {
            tier: Tier::Good,
            label: "Low",
        }
    } else {
        Classification {
            tier: Tier::Warning,
            label: "Elevated",
        }
    }
}

pub fn classify_max_fd(max_fd_mm: f64) -> Classification {
    if max_fd_mm < MAX_FD_GOOD_BELOW_MM {
        Classification {
            tier: Tier::Good,
            label: "Low",
        }
    } else {
        Classification {
            tier: Tier::Warning,
            label: "High",
        }
    }
}
