/// External configuration loader.
///
/// Reads the first `config.toml` found in the executable's directory, the
/// current working directory, or `~/.local/share/rockfall`, in that order.
/// Falls back to sensible defaults if the file is missing or incomplete.
///
/// A relative `level_file` is looked up in those same directories. A relative
/// `log_file` is created relative to the current working directory, since it
/// usually does not exist yet.
///
/// Problems are collected in `warnings` rather than printed, so the binary
/// can report them once logging is up.

use serde::Deserialize;
use std::path::{Path, PathBuf};

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub speed: SpeedConfig,
    pub gamepad: GamepadConfig,
    /// Level to play instead of the built-in one. Relative paths are
    /// resolved against the config search directories.
    pub level_file: Option<PathBuf>,
    /// Log destination; stderr when unset. Relative to the working directory.
    pub log_file: Option<PathBuf>,
    pub warnings: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct SpeedConfig {
    pub tick_rate_ms: u64,
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub restart: Vec<String>,
    pub quit: Vec<String>,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    speed: TomlSpeed,
    #[serde(default)]
    gamepad: TomlGamepad,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlSpeed {
    #[serde(default = "default_tick_rate")]
    tick_rate_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_restart")]
    restart: Vec<String>,
    #[serde(default = "default_quit")]
    quit: Vec<String>,
}

#[derive(Deserialize, Debug, Default)]
struct TomlGeneral {
    #[serde(default)]
    level_file: Option<String>,
    #[serde(default)]
    log_file: Option<String>,
}

// ── Defaults ──

fn default_tick_rate() -> u64 { 33 } // ~30 ticks per second
fn default_restart() -> Vec<String> { vec!["Start".into()] }
fn default_quit() -> Vec<String> { vec!["Select".into()] }

impl Default for TomlSpeed {
    fn default() -> Self {
        TomlSpeed { tick_rate_ms: default_tick_rate() }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad { restart: default_restart(), quit: default_quit() }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig::from_toml(TomlConfig::default(), &[])
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory,
    /// (3) ~/.local/share/rockfall.
    pub fn load() -> Self {
        let search_dirs = candidate_dirs();
        let mut warnings = Vec::new();
        let toml_cfg = load_toml(&search_dirs, &mut warnings);
        let mut cfg = GameConfig::from_toml(toml_cfg, &search_dirs);
        cfg.warnings.extend(warnings);
        cfg
    }

    /// Parse config text. Relative level paths stay relative.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        let parsed: TomlConfig = toml::from_str(text)?;
        Ok(GameConfig::from_toml(parsed, &[]))
    }

    fn from_toml(toml_cfg: TomlConfig, search_dirs: &[PathBuf]) -> Self {
        let mut warnings = Vec::new();

        let mut tick_rate_ms = toml_cfg.speed.tick_rate_ms;
        if tick_rate_ms == 0 {
            warnings.push("speed.tick_rate_ms must be positive; using default".to_string());
            tick_rate_ms = default_tick_rate();
        }

        let level_file = toml_cfg.general.level_file
            .filter(|s| !s.is_empty())
            .map(|s| resolve_path(&s, search_dirs));
        let log_file = toml_cfg.general.log_file
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        GameConfig {
            speed: SpeedConfig { tick_rate_ms },
            gamepad: GamepadConfig {
                restart: toml_cfg.gamepad.restart,
                quit: toml_cfg.gamepad.quit,
            },
            level_file,
            log_file,
            warnings,
        }
    }
}

/// Absolute paths as-is; relative ones resolved against the first search
/// directory that contains them.
fn resolve_path(path: &str, search_dirs: &[PathBuf]) -> PathBuf {
    let p = Path::new(path);
    if p.is_absolute() {
        return p.to_path_buf();
    }
    search_dirs.iter()
        .map(|d| d.join(p))
        .find(|candidate| candidate.exists())
        .unwrap_or_else(|| p.to_path_buf())
}

/// Candidate directories to search: exe dir + CWD + XDG data dir (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    // 3. XDG data home (~/.local/share/rockfall)
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/rockfall");
        if xdg.is_dir() && !dirs.iter().any(|d| d == &xdg) {
            dirs.push(xdg);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf], warnings: &mut Vec<String>) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if !path.exists() { continue; }
        match std::fs::read_to_string(&path) {
            Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                Ok(cfg) => return cfg,
                Err(e) => {
                    warnings.push(format!("{}: parse error, using defaults: {e}", path.display()));
                    return TomlConfig::default();
                }
            },
            Err(e) => {
                warnings.push(format!("could not read {}: {e}", path.display()));
            }
        }
    }
    TomlConfig::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = GameConfig::from_toml_str("").unwrap();
        assert_eq!(cfg.speed.tick_rate_ms, 33);
        assert_eq!(cfg.gamepad.restart, vec!["Start".to_string()]);
        assert_eq!(cfg.gamepad.quit, vec!["Select".to_string()]);
        assert!(cfg.level_file.is_none());
        assert!(cfg.log_file.is_none());
        assert!(cfg.warnings.is_empty());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = GameConfig::from_toml_str(
            "[speed]\ntick_rate_ms = 50\n[general]\nlevel_file = \"/tmp/cave.txt\"\n",
        ).unwrap();
        assert_eq!(cfg.speed.tick_rate_ms, 50);
        assert_eq!(cfg.level_file, Some(PathBuf::from("/tmp/cave.txt")));
        assert_eq!(cfg.gamepad.quit, vec!["Select".to_string()]);
    }

    #[test]
    fn zero_tick_rate_falls_back_with_warning() {
        let cfg = GameConfig::from_toml_str("[speed]\ntick_rate_ms = 0\n").unwrap();
        assert_eq!(cfg.speed.tick_rate_ms, 33);
        assert_eq!(cfg.warnings.len(), 1);
    }

    #[test]
    fn empty_paths_mean_unset() {
        let cfg = GameConfig::from_toml_str("[general]\nlevel_file = \"\"\nlog_file = \"\"\n").unwrap();
        assert!(cfg.level_file.is_none());
        assert!(cfg.log_file.is_none());
    }

    #[test]
    fn relative_paths_resolve_differently() {
        let dir = std::env::temp_dir().join("rockfall-config-test");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("cave.txt"), "#P#\n").unwrap();

        let parsed: TomlConfig = toml::from_str(
            "[general]\nlevel_file = \"cave.txt\"\nlog_file = \"rockfall.log\"\n",
        ).unwrap();
        let cfg = GameConfig::from_toml(parsed, &[dir.clone()]);
        assert_eq!(cfg.level_file, Some(dir.join("cave.txt")));
        assert_eq!(cfg.log_file, Some(PathBuf::from("rockfall.log")));
    }

    #[test]
    fn bad_types_are_errors() {
        assert!(GameConfig::from_toml_str("[speed]\ntick_rate_ms = \"fast\"\n").is_err());
    }
}
