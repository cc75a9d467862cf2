use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub scroll: ScrollConfig,
    #[serde(default)]
    pub forms: FormsConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub keymap: KeymapConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Data directory path (log file, inquiry outbox)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

/// Tuning for the inertia scroll engine.
///
/// The easing factor, settle threshold and line height are heuristics; any
/// values that give smooth, bounded-time convergence are acceptable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrollConfig {
    /// Enable inertia scrolling (false = always use native scrolling)
    #[serde(default = "default_true")]
    pub smooth_enabled: bool,
    /// Fraction of the remaining distance covered per frame
    #[serde(default = "default_ease")]
    pub ease: f64,
    /// Distance in px under which the animation snaps and stops
    #[serde(default = "default_threshold_px")]
    pub threshold_px: f64,
    /// Pixels per line for line-mode wheel deltas
    #[serde(default = "default_line_height_px")]
    pub line_height_px: f64,
    /// Animation frame rate while the loop is running
    #[serde(default = "default_animation_fps")]
    pub animation_fps: u32,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            smooth_enabled: default_true(),
            ease: default_ease(),
            threshold_px: default_threshold_px(),
            line_height_px: default_line_height_px(),
            animation_fps: default_animation_fps(),
        }
    }
}

/// Public form submission guard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormsConfig {
    /// Submissions allowed within one window
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
    /// Sliding window length in seconds
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
}

impl Default for FormsConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            window_secs: default_window_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Tick rate in milliseconds when no animation is running
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    /// Virtual pixel height of one terminal row
    #[serde(default = "default_row_height_px")]
    pub row_height_px: f64,
    /// Scroll offset (px) past which the back-to-top control shows
    #[serde(default = "default_back_to_top_threshold")]
    pub back_to_top_threshold_px: f64,
    /// Lines reported per mouse wheel notch
    #[serde(default = "default_wheel_lines")]
    pub wheel_lines_per_notch: f64,
    /// Theme name ("navy" or "ivory")
    #[serde(default = "default_theme_name")]
    pub theme: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            row_height_px: default_row_height_px(),
            back_to_top_threshold_px: default_back_to_top_threshold(),
            wheel_lines_per_notch: default_wheel_lines(),
            theme: default_theme_name(),
        }
    }
}

/// Keymap configuration using Vim-style notation
/// Format: "j", "k", "<C-d>" (Ctrl+d), "<S-g>" (Shift+g), "<CR>" (Enter),
/// "<Esc>", "<Tab>", "<Space>"
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeymapConfig {
    /// Quit the application
    #[serde(default = "default_key_quit")]
    pub quit: String,
    /// Scroll one line down (native)
    #[serde(default = "default_key_line_down")]
    pub line_down: String,
    /// Scroll one line up (native)
    #[serde(default = "default_key_line_up")]
    pub line_up: String,
    /// Scroll one page down (native)
    #[serde(default = "default_key_page_down")]
    pub page_down: String,
    /// Scroll one page up (native)
    #[serde(default = "default_key_page_up")]
    pub page_up: String,
    /// Ease back to the top of the page
    #[serde(default = "default_key_back_to_top")]
    pub back_to_top: String,
    /// Ease to the end of the page
    #[serde(default = "default_key_jump_to_end")]
    pub jump_to_end: String,
    /// Ease to the next section heading
    #[serde(default = "default_key_next_section")]
    pub next_section: String,
    /// Ease to the previous section heading
    #[serde(default = "default_key_prev_section")]
    pub prev_section: String,
    /// Open the admissions inquiry popup
    #[serde(default = "default_key_inquiry")]
    pub inquiry: String,
    /// Toggle help overlay
    #[serde(default = "default_key_help")]
    pub help: String,
}

impl Default for KeymapConfig {
    fn default() -> Self {
        Self {
            quit: default_key_quit(),
            line_down: default_key_line_down(),
            line_up: default_key_line_up(),
            page_down: default_key_page_down(),
            page_up: default_key_page_up(),
            back_to_top: default_key_back_to_top(),
            jump_to_end: default_key_jump_to_end(),
            next_section: default_key_next_section(),
            prev_section: default_key_prev_section(),
            inquiry: default_key_inquiry(),
            help: default_key_help(),
        }
    }
}

fn default_key_quit() -> String { "q".to_string() }
fn default_key_line_down() -> String { "j".to_string() }
fn default_key_line_up() -> String { "k".to_string() }
fn default_key_page_down() -> String { "<C-f>".to_string() }
fn default_key_page_up() -> String { "<C-b>".to_string() }
fn default_key_back_to_top() -> String { "g".to_string() }
fn default_key_jump_to_end() -> String { "G".to_string() }
fn default_key_next_section() -> String { "<Tab>".to_string() }
fn default_key_prev_section() -> String { "<S-Tab>".to_string() }
fn default_key_inquiry() -> String { "i".to_string() }
fn default_key_help() -> String { "?".to_string() }

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("inertia")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_ease() -> f64 {
    0.08
}

fn default_threshold_px() -> f64 {
    0.5
}

fn default_line_height_px() -> f64 {
    40.0
}

fn default_animation_fps() -> u32 {
    60
}

fn default_max_attempts() -> usize {
    3
}

fn default_window_secs() -> u64 {
    600 // 10 minutes
}

fn default_tick_rate() -> u64 {
    100
}

fn default_row_height_px() -> f64 {
    20.0
}

fn default_back_to_top_threshold() -> f64 {
    300.0
}

fn default_wheel_lines() -> f64 {
    3.0
}

fn default_theme_name() -> String {
    "navy".to_string()
}

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &std::path::Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl ScrollConfig {
    /// Reject values that would stall or overshoot the lerp loop
    pub fn validate(&self) -> crate::Result<()> {
        if !(self.ease > 0.0 && self.ease <= 1.0) {
            return Err(crate::Error::Config(format!(
                "scroll.ease must be in (0, 1], got {}",
                self.ease
            )));
        }
        if !(self.threshold_px > 0.0) {
            return Err(crate::Error::Config(format!(
                "scroll.threshold_px must be positive, got {}",
                self.threshold_px
            )));
        }
        if !(self.line_height_px > 0.0) {
            return Err(crate::Error::Config(format!(
                "scroll.line_height_px must be positive, got {}",
                self.line_height_px
            )));
        }
        Ok(())
    }
}

impl AppConfig {
    /// Load configuration from file or return defaults
    pub fn load() -> crate::Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml(content: &str) -> crate::Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> crate::Result<()> {
        self.scroll.validate()?;
        if self.forms.max_attempts == 0 {
            return Err(crate::Error::Config(
                "forms.max_attempts must be at least 1".to_string(),
            ));
        }
        if !(self.ui.row_height_px > 0.0) {
            return Err(crate::Error::Config(
                "ui.row_height_px must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self) -> crate::Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&config_path, self.to_toml()?)?;

        Ok(())
    }

    pub fn to_toml(&self) -> crate::Result<String> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Get the configuration file path
    /// Always uses ~/.config/inertia/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("inertia")
            .join("config.toml")
    }

    /// Get the data directory (with tilde expansion)
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.general.data_dir)
    }

    /// Get the log file path used while the TUI owns the terminal
    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("inertia.log")
    }

    /// Get the admissions inquiry outbox path
    pub fn outbox_path(&self) -> PathBuf {
        self.data_dir().join("inquiries.jsonl")
    }
}
