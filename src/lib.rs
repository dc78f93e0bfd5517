//! Customizer - composes customization screens from section controllers
//!
//! This library maps a screen (lock screen, home screen) to an ordered list
//! of freshly constructed section controllers, each wired to a shared bundle
//! of collaborators. A terminal preview host and CLI are built on top.

// Core modules
pub mod collaborators;
pub mod error;
pub mod registry;
pub mod screen;
pub mod sections;

// Host modules
pub mod app;
pub mod cli;
pub mod config;
pub mod host;
pub mod tui;
pub mod utils;

// Re-exports for convenience
pub use collaborators::{CollaboratorBundle, SavedState};
pub use config::Config;
pub use error::SectionError;
pub use registry::{CustomizationSections, SectionControllers, SectionRegistry, SectionTable};
pub use screen::Screen;
pub use sections::{SectionController, SectionKind};
