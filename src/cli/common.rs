//! Common CLI utilities shared across all CLI commands.
//!
//! This module provides:
//! - `CliContext`: loaded config plus the registry and collaborators built from it
//! - Output helpers: `print_success`, `print_error`, `print_warning`, `print_info`

use crate::collaborators::{CollaboratorBundle, LifecycleState};
use crate::config::Config;
use crate::host::{HostCollaborators, LifecycleRegistry};
use crate::registry::SectionRegistry;
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::rc::Rc;

/// Shared context for CLI commands.
pub struct CliContext {
    /// The loaded configuration
    pub config: Config,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Registry built from the configured section table
    pub registry: SectionRegistry,
    /// Headless collaborators for composing outside the preview
    pub collaborators: HostCollaborators,
}

impl CliContext {
    /// Load the CLI context from the configuration file.
    pub fn load() -> Result<Self> {
        let config_path = crate::utils::get_config_path();
        let config =
            Config::load_or_create(&config_path).context("Failed to load configuration")?;
        Self::from_config(config, config_path)
    }

    pub fn from_config(config: Config, config_path: PathBuf) -> Result<Self> {
        let registry = SectionRegistry::new(
            config
                .section_table()
                .context("Failed to build section table")?,
        );
        let collaborators = HostCollaborators::new(config.display.display_utils());
        Ok(Self {
            config,
            config_path,
            registry,
            collaborators,
        })
    }

    /// A fresh bundle for one composition request.
    pub fn bundle(&self) -> Result<Rc<CollaboratorBundle>> {
        let lifecycle = Rc::new(LifecycleRegistry::new(LifecycleState::Created));
        Ok(self.collaborators.bundle(&lifecycle)?)
    }
}

// =============================================================================
// Output Helpers
// =============================================================================

/// Print a success message with a checkmark prefix.
pub fn print_success(msg: &str) {
    println!("\u{2713} {}", msg);
}

/// Print an error message with an X prefix to stderr.
pub fn print_error(msg: &str) {
    eprintln!("\u{2717} {}", msg);
}

/// Print a warning message with a warning sign prefix.
pub fn print_warning(msg: &str) {
    println!("\u{26A0}\u{FE0F} {}", msg);
}

/// Print an info message with an info sign prefix.
pub fn print_info(msg: &str) {
    println!("\u{2139}\u{FE0F} {}", msg);
}
