//! Runtime configuration assembled from hand-parsed CLI arguments.

use std::path::PathBuf;

/// Everything a run needs, independent of how it was parsed.
pub struct SimConfig {
    pub memory_size: usize,
    pub window_scale: u32,
    pub pattern_path: Option<PathBuf>,
    pub steps: Option<u32>,
    pub headless: bool,
    pub screenshot_path: Option<PathBuf>,
    pub record_dir: Option<PathBuf>,
    pub self_test: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            memory_size: mpp_controller::MIN_MEMORY_SIZE,
            window_scale: 3,
            pattern_path: None,
            steps: None,
            headless: false,
            screenshot_path: None,
            record_dir: None,
            self_test: false,
        }
    }
}
