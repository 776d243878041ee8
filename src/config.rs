use crate::error::ConfigError;
use std::time::Duration;

/// Playback settings for a replay.
#[derive(Clone, Debug, PartialEq)]
pub struct PlaybackConfig {
    fps: f64,
}

impl PlaybackConfig {
    /// Creates the playback settings.
    ///
    /// # Arguments
    /// * `fps` - The number of frames drawn per second. Must be positive and finite.
    pub fn new(fps: f64) -> Result<PlaybackConfig, ConfigError> {
        if !fps.is_finite() || fps <= 0.0 {
            return Err(ConfigError::InvalidFps(fps));
        }

        Ok(PlaybackConfig { fps })
    }

    pub fn fps(&self) -> f64 {
        self.fps
    }

    /// The pause before each frame following a step.
    pub fn frame_delay(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.fps)
    }
}

impl Default for PlaybackConfig {
    fn default() -> PlaybackConfig {
        PlaybackConfig { fps: 1.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn when_creating_a_config_the_frame_delay_is_the_inverse_of_the_fps() {
        let config = PlaybackConfig::new(4.0).unwrap();

        assert_eq!(config.frame_delay(), Duration::from_millis(250));
        assert_eq!(PlaybackConfig::default().frame_delay(), Duration::from_secs(1));
    }

    #[test]
    fn when_creating_a_config_with_a_non_positive_fps_an_error_is_returned() {
        assert!(PlaybackConfig::new(0.0).is_err());
        assert!(PlaybackConfig::new(-2.0).is_err());
        assert!(PlaybackConfig::new(f64::NAN).is_err());
        assert!(PlaybackConfig::new(f64::INFINITY).is_err());
    }
}
