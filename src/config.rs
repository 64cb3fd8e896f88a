//! Render configuration. `RenderSettings::default()` reproduces the
//! hard-coded reference scene's defaults exactly (1280x720, 4x4 tiles,
//! `test.bmp`); `from_env()` layers optional environment-variable overrides
//! on top, so the CLI's no-flags contract is preserved while tests can still
//! render something smaller and faster.

use std::path::PathBuf;

pub const SAMPLES_PER_PIXEL: u32 = 4;
pub const MAX_BOUNCES: u32 = crate::shading::MAX_BOUNCES;

#[derive(Debug, Clone)]
pub struct RenderSettings {
    pub width: u32,
    pub height: u32,
    pub tiles_x: u32,
    pub tiles_y: u32,
    pub samples_per_pixel: u32,
    /// Bounce budget per ray. Not overridable via `from_env()`; exposed here
    /// (rather than only as the free `MAX_BOUNCES` constant) so tests can
    /// read it off a `RenderSettings` value directly.
    pub max_bounces: u32,
    pub worker_threads: usize,
    pub seed: u64,
    pub output_path: PathBuf,
}

impl Default for RenderSettings {
    fn default() -> Self {
        RenderSettings {
            width: 1280,
            height: 720,
            tiles_x: 4,
            tiles_y: 4,
            samples_per_pixel: SAMPLES_PER_PIXEL,
            max_bounces: MAX_BOUNCES,
            worker_threads: default_worker_threads(),
            seed: 0,
            output_path: PathBuf::from("test.bmp"),
        }
    }
}

impl RenderSettings {
    /// Applies optional overrides from `PATHTRACER_WIDTH`, `PATHTRACER_HEIGHT`,
    /// `PATHTRACER_THREADS`, `PATHTRACER_SEED`, and `PATHTRACER_OUTPUT` on top
    /// of [`RenderSettings::default`]. Unset or unparsable variables are
    /// ignored, leaving the default in place.
    pub fn from_env() -> Self {
        let mut settings = RenderSettings::default();

        if let Some(width) = env_parsed("PATHTRACER_WIDTH") {
            settings.width = width;
        }
        if let Some(height) = env_parsed("PATHTRACER_HEIGHT") {
            settings.height = height;
        }
        if let Some(threads) = env_parsed("PATHTRACER_THREADS") {
            settings.worker_threads = threads;
        }
        if let Some(seed) = env_parsed("PATHTRACER_SEED") {
            settings.seed = seed;
        }
        if let Ok(output) = std::env::var("PATHTRACER_OUTPUT") {
            settings.output_path = PathBuf::from(output);
        }

        settings
    }
}

fn env_parsed<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|value| value.parse().ok())
}

fn default_worker_threads() -> usize {
    num_cpus::get().saturating_sub(1).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_the_hard_coded_reference_scene() {
        let settings = RenderSettings::default();
        assert_eq!(settings.width, 1280);
        assert_eq!(settings.height, 720);
        assert_eq!(settings.tiles_x, 4);
        assert_eq!(settings.tiles_y, 4);
        assert_eq!(settings.output_path, PathBuf::from("test.bmp"));
    }
}
