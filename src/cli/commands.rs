use crate::cli::common::{print_info, print_success, print_warning, CliContext};
use crate::collaborators::SavedState;
use crate::registry::{CustomizationSections, SectionControllers};
use crate::screen::Screen;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use indoc::printdoc;
use serde::Serialize;
use std::rc::Rc;

/// Preview and inspect customization screens composed from sections
#[derive(Parser, Debug)]
#[command(name = "customizer", version, about = "Preview and inspect customization screens composed from sections", long_about = None, disable_help_subcommand = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the sections a screen is composed of, in display order
    Sections {
        /// Screen to compose (lock_screen, home_screen, or lock/home)
        #[arg(short, long, conflicts_with = "all")]
        screen: Option<String>,
        /// Compose every section of every screen as one list
        #[arg(short, long)]
        all: bool,
        /// Output results as JSON for scripting
        #[arg(long)]
        json: bool,
    },
    /// Validate the configuration file
    Check,
    /// Configuration file location
    Config,
    /// Shows logs location and how to view them
    Logs,
    /// Generate shell completions
    Completions {
        /// Shell to generate for (detected from $SHELL when omitted)
        shell: Option<Shell>,
    },
}

/// One composed section, as reported by `sections`.
#[derive(Debug, Serialize)]
struct SectionReport {
    kind: String,
    title: &'static str,
    available: bool,
    restores_state: bool,
}

/// One composition request, as reported by `sections`.
#[derive(Debug, Serialize)]
struct CompositionReport {
    screen: String,
    sections: Vec<SectionReport>,
}

impl CompositionReport {
    fn new(screen: String, controllers: &SectionControllers) -> Self {
        Self {
            screen,
            sections: controllers
                .iter()
                .map(|controller| SectionReport {
                    kind: controller.kind().to_string(),
                    title: controller.kind().title(),
                    available: controller.is_available(),
                    restores_state: controller.restored_state().is_some(),
                })
                .collect(),
        }
    }
}

impl Cli {
    /// Run the subcommand. Returns `false` when no subcommand was given and
    /// the preview should start instead.
    pub fn execute(self) -> Result<bool> {
        match self.command {
            Some(Commands::Sections { screen, all, json }) => Self::cmd_sections(screen, all, json)?,
            Some(Commands::Check) => Self::cmd_check()?,
            Some(Commands::Config) => Self::cmd_config()?,
            Some(Commands::Logs) => Self::cmd_logs()?,
            Some(Commands::Completions { shell }) => crate::cli::completions::generate(shell)?,
            None => return Ok(false),
        }
        Ok(true)
    }

    fn cmd_sections(screen: Option<String>, all: bool, json: bool) -> Result<()> {
        let ctx = CliContext::load()?;
        // An empty snapshot tells restoration-capable sections apart.
        let probe = Rc::new(SavedState::new());

        let mut reports = Vec::new();
        if all {
            let controllers = ctx
                .registry
                .all_section_controllers(&ctx.bundle()?, Some(&probe))
                .context("Failed to compose all screens")?;
            reports.push(CompositionReport::new("all".to_string(), &controllers));
        } else if let Some(name) = screen {
            let controllers = ctx
                .registry
                .section_controllers_for_screen_name(&name, &ctx.bundle()?, Some(&probe))
                .with_context(|| format!("Failed to compose screen '{}'", name))?;
            let screen: Screen = name.parse()?;
            reports.push(CompositionReport::new(screen.to_string(), &controllers));
        } else {
            for screen in Screen::all() {
                let controllers = ctx
                    .registry
                    .section_controllers_for_screen(screen, &ctx.bundle()?, Some(&probe))
                    .with_context(|| format!("Failed to compose {}", screen))?;
                reports.push(CompositionReport::new(screen.to_string(), &controllers));
            }
        }

        if json {
            println!(
                "{}",
                serde_json::to_string_pretty(&reports).context("Failed to serialize report")?
            );
            return Ok(());
        }

        for report in &reports {
            println!("{}:", report.screen);
            for (i, section) in report.sections.iter().enumerate() {
                let restore = if section.restores_state { " (restorable)" } else { "" };
                println!("  {}. {} [{}]{}", i + 1, section.title, section.kind, restore);
                if !section.available {
                    print_warning(&format!("{} is not available on this device", section.title));
                }
            }
        }
        Ok(())
    }

    fn cmd_check() -> Result<()> {
        let ctx = CliContext::load()?;
        for (screen, kinds) in ctx.registry.table().rows() {
            let names: Vec<String> = kinds.iter().map(ToString::to_string).collect();
            print_info(&format!("{}: {}", screen, names.join(", ")));
        }
        // Compose everything once so missing collaborators surface here.
        ctx.registry
            .all_section_controllers(&ctx.bundle()?, None)
            .context("Configured sections cannot be composed")?;
        print_success(&format!("{} is valid", ctx.config_path.display()));
        Ok(())
    }

    fn cmd_config() -> Result<()> {
        let config_path = crate::utils::get_config_path();
        println!("{}", config_path.display());
        Ok(())
    }

    fn cmd_logs() -> Result<()> {
        let log_file = crate::utils::get_log_path();
        printdoc! {"
            {path}
            View logs in real-time: tail -f {path}
            Set log_level in {config} or RUST_LOG for more detail
            ",
            path = log_file.display(),
            config = crate::utils::get_config_path().display(),
        }
        Ok(())
    }
}
