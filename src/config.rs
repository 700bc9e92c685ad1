use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use ratatui::style::Color;
use serde::{Deserialize, Deserializer};
use tracing::{info, warn};

use crate::error::{SpriteError, SpriteResult};
use crate::motion::{
    Motion, Point, SeekConfig, SeekController, StrideConfig, StrideController, Variant,
};
use crate::sprite::SpriteSheet;

// ─── Embedded Default ────────────────────────────────────────────────────
/// Baked into the binary at compile time and always the base layer.
const DEFAULT_CONFIG_TOML: &str = include_str!("../default_config.toml");

// ─── CLI Arguments (override layer) ─────────────────────────────────────
/// sprite-walk — a walking sprite that follows your mouse
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "sprite-walk", version, about, long_about = None)]
pub struct CliArgs {
    /// Path to a config file (defaults are built in)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print the default config to stdout and exit
    #[arg(long)]
    pub print_default_config: bool,

    /// Motion model: seek or stride (overrides config file)
    #[arg(short, long)]
    pub variant: Option<Variant>,

    /// Tick period in milliseconds (overrides config file)
    #[arg(short, long)]
    pub tick_ms: Option<u64>,

    /// Turn around at the stage edges in stride mode
    #[arg(long)]
    pub bounce: bool,

    /// Log file path (logging disabled in the TUI if not specified)
    #[arg(long)]
    pub log: Option<PathBuf>,

    /// Log level filter (overrides config file)
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Run without a terminal UI for this many ticks, printing JSON lines
    #[arg(long, value_name = "TICKS")]
    pub headless: Option<u32>,

    /// Headless: press at this stage point before the first tick
    #[arg(long, value_name = "X,Y", value_parser = parse_point)]
    pub touch: Option<Point>,

    /// Headless: release after this many ticks
    #[arg(long, value_name = "TICKS")]
    pub release_after: Option<u32>,

    /// Headless: stage width in cells
    #[arg(long, default_value_t = 80)]
    pub width: i32,
}

/// Parse "X,Y" into a point
pub fn parse_point(s: &str) -> std::result::Result<Point, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got \"{s}\""))?;
    let x = x.trim().parse().map_err(|e| format!("bad x \"{x}\": {e}"))?;
    let y = y.trim().parse().map_err(|e| format!("bad y \"{y}\": {e}"))?;
    Ok(Point::new(x, y))
}

// ─── TOML Structs ───────────────────────────────────────────────────────

/// Root configuration — parsed from TOML, then overridden by CLI flags.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub sprite: SpriteConfig,
    #[serde(default)]
    pub motion: MotionConfig,
    #[serde(default)]
    pub seek: SeekSection,
    #[serde(default)]
    pub stride: StrideSection,
    #[serde(default)]
    pub appearance: AppearanceConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SpriteConfig {
    /// Walk frames in the strip
    pub frame_count: usize,
    /// Walk strip path (empty = built-in walker)
    pub sheet: String,
    /// Idle frame path
    pub idle: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    pub variant: Variant,
    pub start_x: i32,
    pub start_y: i32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SeekSection {
    pub speed: i32,
    pub tick_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StrideSection {
    pub speed_x: i32,
    pub tick_ms: u64,
    pub frame_delay_ms: u64,
    pub bounce: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppearanceConfig {
    pub show_help_bar: bool,

    #[serde(deserialize_with = "deserialize_color")]
    pub accent: Color,
}

// ─── Defaults ───────────────────────────────────────────────────────────

impl Default for Config {
    fn default() -> Self {
        // Parse the embedded TOML — this cannot fail since we control it
        toml::from_str(DEFAULT_CONFIG_TOML)
            .expect("BUG: embedded default_config.toml is invalid TOML")
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".into(),
        }
    }
}

impl Default for SpriteConfig {
    fn default() -> Self {
        Self {
            frame_count: 6,
            sheet: String::new(),
            idle: String::new(),
        }
    }
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            variant: Variant::Seek,
            start_x: 0,
            start_y: 2,
        }
    }
}

impl Default for SeekSection {
    fn default() -> Self {
        Self {
            speed: 2,
            tick_ms: 100,
        }
    }
}

impl Default for StrideSection {
    fn default() -> Self {
        Self {
            speed_x: 1,
            tick_ms: 16,
            frame_delay_ms: 90,
            bounce: false,
        }
    }
}

impl Default for AppearanceConfig {
    fn default() -> Self {
        Self {
            show_help_bar: true,
            accent: Color::Cyan,
        }
    }
}

// ─── Color Deserializer ─────────────────────────────────────────────────

fn deserialize_color<'de, D>(deserializer: D) -> std::result::Result<Color, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_color(&s).ok_or_else(|| serde::de::Error::custom(format!("invalid color: \"{s}\"")))
}

/// Parse a color string into a ratatui Color.
/// Supports: named colors, "reset", "#RRGGBB" hex.
pub fn parse_color(s: &str) -> Option<Color> {
    let s = s.trim().to_lowercase();
    match s.as_str() {
        "reset" | "default" => Some(Color::Reset),
        "black" => Some(Color::Black),
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "yellow" => Some(Color::Yellow),
        "blue" => Some(Color::Blue),
        "magenta" => Some(Color::Magenta),
        "cyan" => Some(Color::Cyan),
        "white" => Some(Color::White),
        "gray" | "grey" => Some(Color::Gray),
        "lightred" | "light_red" => Some(Color::LightRed),
        "lightgreen" | "light_green" => Some(Color::LightGreen),
        "lightyellow" | "light_yellow" => Some(Color::LightYellow),
        "lightblue" | "light_blue" => Some(Color::LightBlue),
        "lightmagenta" | "light_magenta" => Some(Color::LightMagenta),
        "lightcyan" | "light_cyan" => Some(Color::LightCyan),
        hex if hex.starts_with('#') && hex.len() == 7 => {
            let r = u8::from_str_radix(&hex[1..3], 16).ok()?;
            let g = u8::from_str_radix(&hex[3..5], 16).ok()?;
            let b = u8::from_str_radix(&hex[5..7], 16).ok()?;
            Some(Color::Rgb(r, g, b))
        }
        _ => None,
    }
}

// ─── Derived settings ───────────────────────────────────────────────────

impl Config {
    /// Tick period for the active variant
    pub fn tick_period(&self) -> Duration {
        let ms = match self.motion.variant {
            Variant::Seek => self.seek.tick_ms,
            Variant::Stride => self.stride.tick_ms,
        };
        Duration::from_millis(ms)
    }

    pub fn start(&self) -> Point {
        Point::new(self.motion.start_x, self.motion.start_y)
    }

    /// Reject values that would break a controller before it ever ticks
    pub fn validate(&self) -> SpriteResult<()> {
        if self.sprite.frame_count == 0 {
            return Err(SpriteError::Configuration(
                "sprite.frame_count must be at least 1".into(),
            ));
        }
        if self.tick_period().is_zero() {
            return Err(SpriteError::Configuration(format!(
                "{}.tick_ms must be at least 1",
                self.motion.variant
            )));
        }
        if self.seek.speed <= 0 {
            return Err(SpriteError::Configuration(format!(
                "seek.speed must be at least 1, got {}",
                self.seek.speed
            )));
        }
        if self.stride.speed_x <= 0 {
            return Err(SpriteError::Configuration(format!(
                "stride.speed_x must be at least 1, got {}",
                self.stride.speed_x
            )));
        }
        Ok(())
    }

    /// The configured sheet, or the built-in walker
    pub fn sprite_sheet(&self) -> SpriteResult<SpriteSheet> {
        let sheet = self.sprite.sheet.trim();
        if sheet.is_empty() {
            let builtin = SpriteSheet::builtin()?;
            if builtin.frame_count() != self.sprite.frame_count {
                warn!(
                    "built-in walker has {} frames, ignoring frame_count = {}",
                    builtin.frame_count(),
                    self.sprite.frame_count
                );
            }
            return Ok(builtin);
        }

        let idle = self.sprite.idle.trim();
        if idle.is_empty() {
            return Err(SpriteError::Configuration(
                "sprite.idle is required when sprite.sheet is set".into(),
            ));
        }
        SpriteSheet::load(Path::new(sheet), Path::new(idle), self.sprite.frame_count)
    }

    /// Build the controller for the active variant on a stage `viewport_width` wide
    pub fn build_controller(
        &self,
        sheet: &SpriteSheet,
        viewport_width: i32,
    ) -> SpriteResult<Box<dyn Motion>> {
        let cycle = Arc::new(sheet.walk_cycle()?);
        let sprite = sheet.sprite_box();
        let start = self.start();

        let motion: Box<dyn Motion> = match self.motion.variant {
            Variant::Seek => Box::new(SeekController::new(
                SeekConfig {
                    sprite,
                    speed: self.seek.speed,
                    start,
                },
                cycle,
            )?),
            Variant::Stride => Box::new(StrideController::new(
                StrideConfig {
                    sprite,
                    speed_x: self.stride.speed_x,
                    frame_delay_ms: self.stride.frame_delay_ms,
                    viewport_width,
                    bounce: self.stride.bounce,
                    start,
                },
                cycle,
            )?),
        };
        info!(
            "{} controller ready, sprite {}x{}",
            self.motion.variant, sprite.width, sprite.height
        );
        Ok(motion)
    }

    /// Lay CLI flags over the file values
    pub fn apply_cli(&mut self, cli: &CliArgs) {
        if let Some(variant) = cli.variant {
            self.motion.variant = variant;
        }
        if let Some(ms) = cli.tick_ms {
            match self.motion.variant {
                Variant::Seek => self.seek.tick_ms = ms,
                Variant::Stride => self.stride.tick_ms = ms,
            }
        }
        if cli.bounce {
            self.stride.bounce = true;
        }
        if let Some(ref level) = cli.log_level {
            self.general.log_level = level.clone();
        }
    }
}

// ─── Bootloader ─────────────────────────────────────────────────────────

/// The single entry point for configuration. Called exactly once at startup.
///
/// 1. Start from the embedded defaults, or the file named by `--config`
/// 2. Apply CLI overrides on top
/// 3. Validate
pub fn load(cli: &CliArgs) -> Result<Config> {
    let mut config = match cli.config {
        Some(ref path) => {
            let toml_str = std::fs::read_to_string(path)
                .wrap_err_with(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&toml_str).wrap_err_with(|| {
                format!(
                    "Failed to parse config at {}.\n\
                     Start from a fresh copy with:\n  \
                     sprite-walk --print-default-config > {}",
                    path.display(),
                    path.display()
                )
            })?
        }
        None => Config::default(),
    };

    config.apply_cli(cli);
    config.validate()?;
    Ok(config)
}

/// Returns the embedded default config TOML string.
pub fn default_config_toml() -> &'static str {
    DEFAULT_CONFIG_TOML
}
