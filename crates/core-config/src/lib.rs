//! Configuration loading and parsing.
//!
//! Reads `quill.toml` (or an override path provided by the binary):
//!
//! ```toml
//! [editor]
//! tab_width = 4
//! [ui]
//! line_numbers = true
//! git_branch = true
//! ```
//!
//! Every field is optional. Unknown fields are ignored so older binaries
//! accept newer files. A missing file yields defaults; a file that fails to
//! parse also yields defaults, with a warning on target `config`.
//! `tab_width` is clamped into `TAB_WIDTH_RANGE` by `Config::apply_limits`;
//! the raw parsed value is kept in `file` for diagnostics.

use anyhow::Result;
use serde::Deserialize;
use std::ops::RangeInclusive;
use std::{fs, path::PathBuf};
use tracing::{debug, info, warn};

pub const CONFIG_FILE_NAME: &str = "quill.toml";
pub const TAB_WIDTH_RANGE: RangeInclusive<u16> = 1..=16;

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct EditorConfig {
    #[serde(default = "EditorConfig::default_tab_width")]
    pub tab_width: u16,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            tab_width: Self::default_tab_width(),
        }
    }
}

impl EditorConfig {
    const fn default_tab_width() -> u16 {
        4
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct UiConfig {
    #[serde(default = "UiConfig::enabled")]
    pub line_numbers: bool,
    #[serde(default = "UiConfig::enabled")]
    pub git_branch: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            line_numbers: true,
            git_branch: true,
        }
    }
}

impl UiConfig {
    const fn enabled() -> bool {
        true
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    #[serde(default)]
    pub editor: EditorConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// File contents as read, kept for diagnostics.
    pub raw: Option<String>,
    /// File the values came from; `None` for defaults.
    pub source: Option<PathBuf>,
    pub file: ConfigFile,
    /// `file.editor.tab_width` clamped into `TAB_WIDTH_RANGE`.
    pub effective_tab_width: usize,
}

impl Default for Config {
    fn default() -> Self {
        let file = ConfigFile::default();
        Self {
            raw: None,
            source: None,
            effective_tab_width: usize::from(file.editor.tab_width),
            file,
        }
    }
}

/// Config path by convention: `./quill.toml` when present, else the platform
/// config directory (XDG / AppData Roaming).
pub fn discover() -> PathBuf {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("quill").join(CONFIG_FILE_NAME);
    }
    local
}

/// Load `path` (or the discovered path), falling back to defaults.
///
/// Never fails on a bad file; the `Result` covers future hard errors the
/// binary wants to surface.
pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        debug!(target: "config", file = %path.display(), "config_absent_using_defaults");
        return Ok(Config::default());
    };
    let mut cfg = match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => Config {
            raw: Some(content),
            source: Some(path),
            effective_tab_width: usize::from(file.editor.tab_width),
            file,
        },
        Err(e) => {
            warn!(target: "config", file = %path.display(), error = %e, "config_parse_failed_using_defaults");
            return Ok(Config::default());
        }
    };
    cfg.apply_limits();
    Ok(cfg)
}

impl Config {
    /// Clamp raw values into their supported ranges. Returns the effective
    /// tab width.
    pub fn apply_limits(&mut self) -> usize {
        let raw = self.file.editor.tab_width;
        let clamped = raw.clamp(*TAB_WIDTH_RANGE.start(), *TAB_WIDTH_RANGE.end());
        if clamped != raw {
            info!(
                target: "config",
                raw,
                clamped,
                min = *TAB_WIDTH_RANGE.start(),
                max = *TAB_WIDTH_RANGE.end(),
                "tab_width_clamped"
            );
        }
        self.effective_tab_width = usize::from(clamped);
        self.effective_tab_width
    }

    pub fn line_numbers(&self) -> bool {
        self.file.ui.line_numbers
    }

    pub fn git_branch(&self) -> bool {
        self.file.ui.git_branch
    }
}
