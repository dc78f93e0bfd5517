use crate::collaborators::DisplayUtils;
use crate::registry::SectionTable;
use crate::screen::Screen;
use crate::sections::SectionKind;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Screen shown when the preview starts
    #[serde(default)]
    pub start_screen: Screen,
    /// Log filter used when RUST_LOG is not set (default: info)
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Which sections each screen is composed of
    #[serde(default)]
    pub sections: SectionsConfig,
    /// Display metrics handed to sections
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Ordered section kinds per screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionsConfig {
    #[serde(default = "default_lock_screen_sections")]
    pub lock_screen: Vec<SectionKind>,
    #[serde(default = "default_home_screen_sections")]
    pub home_screen: Vec<SectionKind>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub width_px: u32,
    pub height_px: u32,
    pub density: f32,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_lock_screen_sections() -> Vec<SectionKind> {
    vec![SectionKind::Clock, SectionKind::Shortcuts]
}

fn default_home_screen_sections() -> Vec<SectionKind> {
    vec![SectionKind::GridLayout, SectionKind::AppShape]
}

impl Default for SectionsConfig {
    fn default() -> Self {
        Self {
            lock_screen: default_lock_screen_sections(),
            home_screen: default_home_screen_sections(),
        }
    }
}

impl SectionsConfig {
    /// Sections configured for `screen`
    pub fn for_screen(&self, screen: Screen) -> &[SectionKind] {
        match screen {
            Screen::LockScreen => &self.lock_screen,
            Screen::HomeScreen => &self.home_screen,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        let display = DisplayUtils::default();
        Self {
            width_px: display.width_px(),
            height_px: display.height_px(),
            density: display.density(),
        }
    }
}

impl DisplayConfig {
    pub fn display_utils(&self) -> DisplayUtils {
        DisplayUtils::new(self.width_px, self.height_px, self.density)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            start_screen: Screen::LockScreen,
            log_level: default_log_level(),
            sections: SectionsConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file or create default
    pub fn load_or_create(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)
                .with_context(|| format!("Failed to read config file: {:?}", config_path))?;
            let mut config: Config =
                toml::from_str(&content).with_context(|| "Failed to parse config file")?;

            if config.log_level.trim().is_empty() {
                config.log_level = default_log_level();
            }

            config
                .validate()
                .with_context(|| format!("Invalid config file: {:?}", config_path))?;
            tracing::info!("Loaded config from {:?}", config_path);
            Ok(config)
        } else {
            let config = Self::default();
            config.save(config_path)?;
            tracing::info!("Created default config at {:?}", config_path);
            Ok(config)
        }
    }

    /// Save configuration to file with secure permissions
    pub fn save(&self, config_path: &Path) -> Result<()> {
        let content =
            toml::to_string_pretty(self).with_context(|| "Failed to serialize config")?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        std::fs::write(config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        // 600: owner read/write only
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(config_path)
                .with_context(|| format!("Failed to get file metadata: {:?}", config_path))?
                .permissions();
            perms.set_mode(0o600);
            std::fs::set_permissions(config_path, perms)
                .with_context(|| format!("Failed to set file permissions: {:?}", config_path))?;
        }

        Ok(())
    }

    /// Check that every screen has at least one section and lists each kind once
    pub fn validate(&self) -> Result<()> {
        for screen in Screen::all() {
            let kinds = self.sections.for_screen(screen);
            if kinds.is_empty() {
                bail!("No sections configured for {}", screen);
            }
            for (i, kind) in kinds.iter().enumerate() {
                if kinds[..i].contains(kind) {
                    bail!("Section '{}' is listed twice for {}", kind, screen);
                }
            }
        }
        if self.display.density.is_nan() || self.display.density <= 0.0 {
            bail!("Display density must be positive, got {}", self.display.density);
        }
        Ok(())
    }

    /// The screen to section table described by this config
    pub fn section_table(&self) -> Result<SectionTable> {
        self.validate()?;
        Ok(SectionTable::new(
            Screen::all()
                .into_iter()
                .map(|screen| (screen, self.sections.for_screen(screen).to_vec()))
                .collect(),
        ))
    }
}
