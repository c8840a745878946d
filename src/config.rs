//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`VIG_SECTION__KEY`)

use figment::{Figment, providers::{Env, Format, Serialized, Toml}};
use serde::{Serialize, Deserialize};
use std::path::Path;

use vignette_core::{Lens, SequencerSettings};
use vignette_render::Lighting;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Window configuration
    #[serde(default)]
    pub window: WindowConfig,
    /// Camera lens shared by every scene
    #[serde(default)]
    pub camera: CameraConfig,
    /// Transition and caption timing
    #[serde(default)]
    pub timing: TimingConfig,
    /// Simulated loading screen
    #[serde(default)]
    pub loading: LoadingConfig,
    /// Rendering configuration
    #[serde(default)]
    pub rendering: RenderingConfig,
    /// Where the story comes from
    #[serde(default)]
    pub story: StoryConfig,
    /// Debug configuration
    #[serde(default)]
    pub debug: DebugConfig,
}

impl AppConfig {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. `config/default.toml`
    /// 2. `config/user.toml`
    /// 3. Environment variables (`VIG_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        // Defaults underneath, so a file can override a single key
        let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        // Load user config (optional)
        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // Environment variables override everything
        // VIG_WINDOW__TITLE=Test -> window.title = "Test"
        figment = figment.merge(Env::prefixed("VIG_").split("__"));

        figment.extract().map_err(ConfigError::from)
    }

    /// Settings for the step sequencer
    pub fn sequencer_settings(&self) -> SequencerSettings {
        SequencerSettings {
            transition_duration: self.timing.transition_duration,
            text_reveal_delay: self.timing.text_reveal_delay,
            lens: self.camera.to_lens(self.window.width, self.window.height),
            seed: self.debug.seed,
        }
    }
}

/// Window configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Window width in pixels
    pub width: u32,
    /// Window height in pixels
    pub height: u32,
    /// Start in fullscreen mode
    pub fullscreen: bool,
    /// Enable VSync
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "for you".to_string(),
            width: 1280,
            height: 720,
            fullscreen: false,
            vsync: true,
        }
    }
}

/// Camera configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    pub fov: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov: 60.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl CameraConfig {
    /// Lens for a viewport of the given size
    pub fn to_lens(&self, width: u32, height: u32) -> Lens {
        Lens {
            fov_degrees: self.fov,
            near: self.near,
            far: self.far,
            aspect: width.max(1) as f32 / height.max(1) as f32,
        }
    }
}

/// Timing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Seconds a scene-to-scene fade takes
    pub transition_duration: f32,
    /// Seconds before a new scene's caption appears
    pub text_reveal_delay: f32,
    /// Largest frame delta fed to the sequencer, in seconds
    pub max_frame_dt: f32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            transition_duration: 0.6,
            text_reveal_delay: 0.5,
            max_frame_dt: 0.1,
        }
    }
}

/// Loading screen configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadingConfig {
    /// Seconds between progress increments
    pub tick_interval: f32,
    /// Largest single increment, in percent
    pub max_step: f32,
    /// Seconds the full bar stays up before the quiz appears
    pub settle_delay: f32,
}

impl Default for LoadingConfig {
    fn default() -> Self {
        Self {
            tick_interval: 0.15,
            max_step: 15.0,
            settle_delay: 0.3,
        }
    }
}

/// Rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderingConfig {
    /// Clear color outside scenes [r, g, b, a]
    pub background_color: [f32; 4],
    /// Light direction [x, y, z]
    pub light_dir: [f32; 3],
    /// Ambient light strength
    pub ambient_strength: f32,
    /// Diffuse light strength
    pub diffuse_strength: f32,
}

impl Default for RenderingConfig {
    fn default() -> Self {
        Self {
            background_color: [0.04, 0.02, 0.06, 1.0],
            light_dir: [0.5, 1.0, 0.3],
            ambient_strength: 0.45,
            diffuse_strength: 0.6,
        }
    }
}

impl RenderingConfig {
    pub fn lighting(&self) -> Lighting {
        Lighting {
            light_dir: self.light_dir,
            ambient_strength: self.ambient_strength,
            diffuse_strength: self.diffuse_strength,
        }
    }
}

/// Story configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryConfig {
    /// Path to the story RON file; the built-in story is used if it is missing
    pub path: String,
}

impl Default for StoryConfig {
    fn default() -> Self {
        Self {
            path: "assets/story.ron".to_string(),
        }
    }
}

/// Debug configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugConfig {
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
    /// Fixed RNG seed for reproducible runs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            seed: None,
        }
    }
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    message: String,
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError {
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}
