use crate::events::AppEvent;
use crate::gui::dial::{DEFAULT_LABEL_FONT_SIZE, DialAction, FanSpeed, LabelSource};
use async_channel::Sender;
use derive_more::{AsRef, Deref, Display, From, Into};
use directories::ProjectDirs;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use palette::rgb::FromHexError;
use palette::{Srgb, Srgba, WithAlpha};
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, SerializeDisplay, DeserializeFromStr)]
pub struct HexColor(Srgb<u8>);

impl HexColor {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self(Srgb::new(r, g, b))
    }

    pub fn to_srgba(self) -> Srgba<f64> {
        self.0.into_format::<f64>().with_alpha(1.0)
    }
}

impl FromStr for HexColor {
    type Err = FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<Srgb<u8>>().map(Self)
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:X}", self.0)
    }
}

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct LabelText(String);

impl_string_newtype!(LabelText);

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ColorConfig {
    pub low: HexColor,
    pub medium: HexColor,
    pub high: HexColor,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            low: HexColor::rgb(0xFF, 0xEB, 0x3B),
            medium: HexColor::rgb(0xCD, 0xDC, 0x39),
            high: HexColor::rgb(0x00, 0x96, 0x88),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LabelConfig {
    pub off: LabelText,
    pub low: LabelText,
    pub medium: LabelText,
    pub high: LabelText,
    pub change: LabelText,
    pub reset: LabelText,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            off: LabelText::new("off"),
            low: LabelText::new("1"),
            medium: LabelText::new("2"),
            high: LabelText::new("3"),
            change: LabelText::new("change"),
            reset: LabelText::new("reset"),
        }
    }
}

impl LabelSource for LabelConfig {
    fn label_for(&self, speed: FanSpeed) -> &str {
        match speed {
            FanSpeed::Off => self.off.as_str(),
            FanSpeed::Low => self.low.as_str(),
            FanSpeed::Medium => self.medium.as_str(),
            FanSpeed::High => self.high.as_str(),
        }
    }

    fn action_label(&self, action: DialAction) -> &str {
        match action {
            DialAction::Change => self.change.as_str(),
            DialAction::Reset => self.reset.as_str(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DialConfig {
    pub label_font_size: f64,
}

impl Default for DialConfig {
    fn default() -> Self {
        Self {
            label_font_size: DEFAULT_LABEL_FONT_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: i32,
    pub height: i32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 400,
            height: 400,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct Config {
    pub colors: ColorConfig,
    pub labels: LabelConfig,
    pub dial: DialConfig,
    pub window: WindowConfig,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
}

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs = ProjectDirs::from("org", "fandial", "fandial")
        .ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

/// Reads `path` as TOML whatever its extension. A `required` file that is missing is an error.
pub fn load_config(path: &Path, required: bool) -> Result<Config, ConfigError> {
    let s = config::Config::builder()
        .add_source(
            config::File::from(path)
                .format(config::FileFormat::Toml)
                .required(required),
        )
        .add_source(config::Environment::with_prefix("FANDIAL").separator("__"))
        .build()?;

    Ok(s.try_deserialize()?)
}

pub fn load_or_default(path: &Path, required: bool) -> Result<Config, ConfigError> {
    match load_config(path, required) {
        Ok(c) => Ok(c),
        Err(e) if required => Err(e),
        Err(e) => {
            log::warn!("Using default config, failed to load {}: {}", path.display(), e);
            Ok(Config::default())
        }
    }
}

pub fn write_default_config(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(path, DEFAULT_CONFIG)?;
    }
    Ok(())
}

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

const RELOAD_DEBOUNCE: Duration = Duration::from_millis(150);

/// Writes or creations of the config file itself. A removal keeps the loaded config.
fn is_config_change(event: &notify::Event, config_path: &Path) -> bool {
    matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_))
        && event.paths.iter().any(|p| p == config_path)
}

pub async fn run_async_watcher(config_path: PathBuf, tx: Sender<AppEvent>) {
    let Some(config_dir) = config_path.parent().map(Path::to_path_buf) else {
        return;
    };

    if let Err(e) = fs_err::create_dir_all(&config_dir) {
        log::error!("Failed to create config directory for watching: {}", e);
        return;
    }

    let (bridge_tx, bridge_rx) = async_channel::unbounded();
    let watcher = RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    )
    .and_then(|mut w| w.watch(&config_dir, RecursiveMode::NonRecursive).map(|_| w));

    // dropping the watcher stops the notifications
    let _watcher = match watcher {
        Ok(w) => w,
        Err(e) => {
            log::error!("Failed to watch config directory: {}", e);
            return;
        }
    };

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) if is_config_change(&event, &config_path) => {
                // one save can produce a burst of events, reload once after it settles
                tokio::time::sleep(RELOAD_DEBOUNCE).await;
                while bridge_rx.try_recv().is_ok() {}

                if tx.send(AppEvent::ConfigReload).await.is_err() {
                    break;
                }
            }
            Ok(_) => {}
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("fandial-config-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_hex_color_deserialization() {
        let cases = vec![
            ("\"#FFEB3B\"", HexColor::rgb(0xFF, 0xEB, 0x3B)),
            ("\"#ffeb3b\"", HexColor::rgb(0xFF, 0xEB, 0x3B)),
            ("\"009688\"", HexColor::rgb(0x00, 0x96, 0x88)),
            ("\"#fff\"", HexColor::rgb(0xFF, 0xFF, 0xFF)),
        ];

        for (json, expected) in cases {
            let deserialized: HexColor = serde_json::from_str(json).unwrap();
            assert_eq!(deserialized, expected);
        }

        assert!(serde_json::from_str::<HexColor>("\"#nothex\"").is_err());
        assert_eq!(HexColor::rgb(0xCD, 0xDC, 0x39).to_string(), "#CDDC39");
    }

    #[test]
    fn test_default_config_file_matches_defaults() {
        let path = temp_path("defaults.toml");
        let _ = fs_err::remove_file(&path);
        write_default_config(&path).unwrap();

        let loaded = load_config(&path, false).unwrap();
        let _ = fs_err::remove_file(&path);

        assert_eq!(loaded, Config::default());
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let path = temp_path("partial.toml");
        fs_err::write(&path, "[colors]\nlow = \"#123456\"\n\n[labels]\nhigh = \"max\"\n").unwrap();

        let loaded = load_config(&path, false).unwrap();
        let _ = fs_err::remove_file(&path);

        assert_eq!(loaded.colors.low, HexColor::rgb(0x12, 0x34, 0x56));
        assert_eq!(loaded.colors.high, ColorConfig::default().high);
        assert_eq!(loaded.labels.label_for(FanSpeed::High), "max");
        assert_eq!(loaded.labels.label_for(FanSpeed::Off), "off");
        assert_eq!(loaded.window, WindowConfig::default());
    }

    #[test]
    fn test_missing_file_loads_defaults() {
        let path = temp_path("missing.toml");
        assert_eq!(load_or_default(&path, false).unwrap(), Config::default());
    }

    #[test]
    fn test_missing_required_file_is_an_error() {
        let path = temp_path("required-missing.toml");
        assert!(load_config(&path, true).is_err());
        assert!(load_or_default(&path, true).is_err());
    }

    #[test]
    fn test_any_extension_is_read_as_toml() {
        for name in ["custom.conf", "custom"] {
            let path = temp_path(name);
            fs_err::write(&path, "[labels]\nhigh = \"max\"\n").unwrap();

            let loaded = load_config(&path, true);
            let _ = fs_err::remove_file(&path);

            assert_eq!(loaded.unwrap().labels.label_for(FanSpeed::High), "max", "{name}");
        }
    }

    #[test]
    fn test_only_writes_to_the_config_file_trigger_reload() {
        use notify::event::{CreateKind, ModifyKind, RemoveKind};

        let path = temp_path("watched.toml");
        let cases = vec![
            (EventKind::Modify(ModifyKind::Any), path.clone(), true),
            (EventKind::Create(CreateKind::File), path.clone(), true),
            (EventKind::Remove(RemoveKind::File), path.clone(), false),
            (EventKind::Modify(ModifyKind::Any), temp_path("other.toml"), false),
            (EventKind::Access(notify::event::AccessKind::Any), path.clone(), false),
        ];

        for (kind, event_path, expected) in cases {
            let event = notify::Event::new(kind).add_path(event_path);
            assert_eq!(is_config_change(&event, &path), expected, "{:?}", event.kind);
        }
    }

    #[test]
    fn test_bad_color_falls_back_to_defaults() {
        let path = temp_path("bad.toml");
        fs_err::write(&path, "[colors]\nlow = \"green-ish\"\n").unwrap();

        assert!(load_config(&path, false).is_err());
        assert_eq!(load_or_default(&path, false).unwrap(), Config::default());
        assert!(load_or_default(&path, true).is_err());
        let _ = fs_err::remove_file(&path);
    }

    #[test]
    fn test_label_source() {
        let labels = LabelConfig::default();
        assert_eq!(labels.label_for(FanSpeed::Low), "1");
        assert_eq!(labels.action_label(DialAction::Change), "change");
        assert_eq!(labels.action_label(DialAction::Reset), "reset");
    }
}
