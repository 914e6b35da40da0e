use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use serde::Deserialize;
use tracing::debug;

use crate::constants::*;
use crate::engine::CachePolicy;
use crate::error::ConfigError;
use crate::queue::ImageId;
use crate::state::Direction;
use crate::texture_loader::{is_remote, load_sorted_image_paths};

/// Runtime knobs of a slideshow. Changes apply from the next cycle on.
#[derive(Debug, Clone, PartialEq)]
pub struct SlideshowConfig {
    pub direction: Direction,
    pub animation_duration: Duration,
    image_switch_delay: Duration,
    pub translation: f32,
    pub crossfade: Duration,
    pub inset: f32,
    pub skip_memory_cache: bool,
}

impl Default for SlideshowConfig {
    fn default() -> Self {
        Self {
            direction: Direction::default(),
            animation_duration: Duration::from_millis(ANIMATION_DURATION_MS),
            image_switch_delay: Duration::from_millis(IMAGE_SWITCH_DELAY_MS),
            translation: TRANSLATION,
            crossfade: Duration::from_millis(CROSSFADE_MS),
            inset: INSET,
            skip_memory_cache: true,
        }
    }
}

impl SlideshowConfig {
    /// How long an image stays active. Directional modes swap images in step
    /// with the slide, so the configured delay only applies when centered.
    pub fn switch_delay(&self) -> Duration {
        if self.direction.is_directional() {
            self.animation_duration
        } else {
            self.image_switch_delay
        }
    }

    /// The delay set by the user, regardless of direction.
    pub fn configured_switch_delay(&self) -> Duration {
        self.image_switch_delay
    }

    pub fn set_image_switch_delay(&mut self, delay: Duration) {
        self.image_switch_delay = delay;
    }

    pub fn cache_policy(&self) -> CachePolicy {
        if self.skip_memory_cache {
            CachePolicy::SkipMemory
        } else {
            CachePolicy::Default
        }
    }
}

/// Slide through a list of images.
#[derive(Parser, Debug, Default)]
#[command(name = "sliding-image", version, about)]
pub struct Cli {
    /// Image URLs, files or directories
    pub images: Vec<String>,

    /// TOML config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long, value_enum)]
    pub direction: Option<Direction>,

    /// Duration of one slide sweep
    #[arg(long)]
    pub animation_ms: Option<u64>,

    /// Time each image stays active (centered mode only)
    #[arg(long)]
    pub switch_delay_ms: Option<u64>,

    /// Slide distance in pixels
    #[arg(long)]
    pub translation: Option<f32>,

    #[arg(long)]
    pub crossfade_ms: Option<u64>,

    /// Overscan on each side in pixels
    #[arg(long)]
    pub inset: Option<f32>,

    /// Keep decoded images in memory between rotations
    #[arg(long)]
    pub keep_memory_cache: bool,

    #[arg(long)]
    pub width: Option<i32>,

    #[arg(long)]
    pub height: Option<i32>,
}

/// Contents of the optional TOML config file.
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub direction: Option<Direction>,
    pub animation_ms: Option<u64>,
    pub switch_delay_ms: Option<u64>,
    pub translation: Option<f32>,
    pub crossfade_ms: Option<u64>,
    pub inset: Option<f32>,
    pub skip_memory_cache: Option<bool>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    #[serde(default)]
    pub images: Vec<String>,
}

impl FileConfig {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }
}

/// Everything the binary needs to start: CLI over file over defaults.
#[derive(Debug)]
pub struct Settings {
    pub config: SlideshowConfig,
    pub images: Vec<ImageId>,
    pub width: i32,
    pub height: i32,
}

impl Settings {
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let file = match &cli.config {
            Some(path) => FileConfig::from_path(path)?,
            None => FileConfig::default(),
        };
        Self::resolve(cli, file)
    }

    pub fn resolve(cli: &Cli, file: FileConfig) -> Result<Self, ConfigError> {
        let mut config = SlideshowConfig::default();

        if let Some(direction) = cli.direction.or(file.direction) {
            config.direction = direction;
        }
        if let Some(ms) = cli.animation_ms.or(file.animation_ms) {
            config.animation_duration = Duration::from_millis(ms);
        }
        if let Some(ms) = cli.switch_delay_ms.or(file.switch_delay_ms) {
            config.set_image_switch_delay(Duration::from_millis(ms));
        }
        if let Some(translation) = cli.translation.or(file.translation) {
            config.translation = translation.abs();
        }
        if let Some(ms) = cli.crossfade_ms.or(file.crossfade_ms) {
            config.crossfade = Duration::from_millis(ms);
        }
        if let Some(inset) = cli.inset.or(file.inset) {
            config.inset = inset.max(0.0);
        }
        if cli.keep_memory_cache {
            config.skip_memory_cache = false;
        } else if let Some(skip) = file.skip_memory_cache {
            config.skip_memory_cache = skip;
        }

        let sources = if cli.images.is_empty() { file.images } else { cli.images.clone() };
        let images = expand_sources(sources)?;
        if images.is_empty() {
            return Err(ConfigError::NoImages);
        }

        Ok(Self {
            config,
            images,
            width: cli.width.or(file.width).unwrap_or(RENDER_WIDTH),
            height: cli.height.or(file.height).unwrap_or(RENDER_HEIGHT),
        })
    }
}

/// Directories expand to the images they contain, sorted by file name.
fn expand_sources(sources: Vec<String>) -> Result<Vec<ImageId>, ConfigError> {
    let mut images = Vec::new();
    for source in sources {
        let path = Path::new(&source);
        if !is_remote(&source) && path.is_dir() {
            let paths = load_sorted_image_paths(path)?;
            debug!(directory = %source, count = paths.len(), "expanded image directory");
            images.extend(paths.into_iter().map(|p| ImageId::new(p.to_string_lossy())));
        } else {
            images.push(ImageId::new(source));
        }
    }
    Ok(images)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn directional_modes_collapse_the_switch_delay() {
        let mut config = SlideshowConfig::default();
        assert_eq!(config.switch_delay(), Duration::from_millis(11000));

        config.direction = Direction::LeftOnly;
        assert_eq!(config.switch_delay(), config.animation_duration);

        config.direction = Direction::Centered;
        assert_eq!(config.switch_delay(), Duration::from_millis(11000));
    }

    #[test]
    fn cache_policy_follows_the_flag() {
        let mut config = SlideshowConfig::default();
        assert_eq!(config.cache_policy(), CachePolicy::SkipMemory);
        config.skip_memory_cache = false;
        assert_eq!(config.cache_policy(), CachePolicy::Default);
    }

    #[test]
    fn parses_a_full_file() {
        let file = FileConfig::parse(
            r#"
            direction = "right-only"
            animation_ms = 4000
            switch_delay_ms = 6000
            translation = 80.0
            crossfade_ms = 500
            inset = 50.0
            skip_memory_cache = false
            images = ["https://example.com/a.png", "b.jpg"]
            "#,
        )
        .unwrap();

        assert_eq!(file.direction, Some(Direction::RightOnly));
        assert_eq!(file.animation_ms, Some(4000));
        assert_eq!(file.images.len(), 2);
    }

    #[test]
    fn rejects_unknown_keys() {
        let err = FileConfig::parse("margin = -200").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn cli_overrides_file_and_file_overrides_defaults() {
        let cli = Cli::try_parse_from([
            "sliding-image",
            "--direction",
            "left-only",
            "--animation-ms",
            "3000",
            "https://example.com/x.png",
        ])
        .unwrap();
        let file = FileConfig {
            direction: Some(Direction::RightOnly),
            switch_delay_ms: Some(7000),
            crossfade_ms: Some(250),
            images: vec!["ignored.png".into()],
            ..FileConfig::default()
        };

        let settings = Settings::resolve(&cli, file).unwrap();
        assert_eq!(settings.config.direction, Direction::LeftOnly);
        assert_eq!(settings.config.animation_duration, Duration::from_millis(3000));
        assert_eq!(settings.config.configured_switch_delay(), Duration::from_millis(7000));
        assert_eq!(settings.config.crossfade, Duration::from_millis(250));
        assert_eq!(settings.config.inset, INSET);
        assert_eq!(settings.images, vec![ImageId::from("https://example.com/x.png")]);
        assert_eq!((settings.width, settings.height), (RENDER_WIDTH, RENDER_HEIGHT));
    }

    #[test]
    fn images_fall_back_to_the_file() {
        let file = FileConfig {
            images: vec!["a.png".into(), "b.png".into()],
            ..FileConfig::default()
        };
        let settings = Settings::resolve(&Cli::default(), file).unwrap();
        assert_eq!(settings.images, vec![ImageId::from("a.png"), ImageId::from("b.png")]);
    }

    #[test]
    fn no_images_is_an_error() {
        let err = Settings::resolve(&Cli::default(), FileConfig::default()).unwrap_err();
        assert!(matches!(err, ConfigError::NoImages));
    }

    #[test]
    fn loads_config_from_disk_and_expands_directories() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.png", "a.jpg", "notes.txt"] {
            fs::File::create(dir.path().join(name)).unwrap();
        }

        let config_path = dir.path().join("slideshow.toml");
        let mut file = fs::File::create(&config_path).unwrap();
        writeln!(file, "direction = \"centered\"").unwrap();
        writeln!(file, "images = [{:?}]", dir.path().to_string_lossy()).unwrap();
        drop(file);

        let cli = Cli {
            config: Some(config_path),
            ..Cli::default()
        };
        let settings = Settings::load(&cli).unwrap();
        let names: Vec<String> = settings
            .images
            .iter()
            .map(|id| Path::new(id.as_str()).file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.jpg", "b.png"]);
    }

    #[test]
    fn missing_config_file_is_reported() {
        let cli = Cli {
            config: Some(PathBuf::from("/definitely/not/here.toml")),
            ..Cli::default()
        };
        assert!(matches!(Settings::load(&cli).unwrap_err(), ConfigError::Read { .. }));
    }
}
