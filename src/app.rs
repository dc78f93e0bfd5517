//! Preview application.
//!
//! [`PreviewState`] is the host surface: it asks the registry for the
//! controllers of the selected screen, binds them, draws them in list order
//! and releases them when the screen changes. [`App`] drives it from the
//! terminal.

use crate::collaborators::{HostSurface, LifecycleState, SavedState};
use crate::config::Config;
use crate::host::{HostCollaborators, LifecycleRegistry};
use crate::registry::{CustomizationSections, SectionControllers, SectionRegistry};
use crate::screen::Screen;
use crate::sections::SectionAction;
use crate::tui::Tui;
use anyhow::{Context, Result};
use crossterm::event::{Event, KeyCode, KeyEventKind};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Tabs};
use std::rc::Rc;
use std::time::Duration;
use tracing::{error, info};

/// What the host is currently showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Composition {
    Screen(Screen),
    /// Every section of every screen on one surface.
    All,
}

impl Composition {
    /// Screen the sections should consider themselves on.
    pub fn screen(&self) -> Screen {
        match self {
            Composition::Screen(screen) => *screen,
            Composition::All => Screen::LockScreen,
        }
    }
}

/// Host-side state of the preview, independent of the terminal.
pub struct PreviewState {
    registry: SectionRegistry,
    collaborators: HostCollaborators,
    composition: Composition,
    lifecycle: Rc<LifecycleRegistry>,
    controllers: SectionControllers,
    /// Section state accumulated across compositions.
    saved_state: SavedState,
    focused: usize,
    status: Option<String>,
    should_quit: bool,
}

impl PreviewState {
    pub fn new(config: &Config) -> Result<Self> {
        let registry = SectionRegistry::new(config.section_table()?);
        let collaborators = HostCollaborators::new(config.display.display_utils());
        Self::with_parts(registry, collaborators, Composition::Screen(config.start_screen))
    }

    /// Compose `composition` once with the given registry and collaborators.
    pub fn with_parts(
        registry: SectionRegistry,
        collaborators: HostCollaborators,
        composition: Composition,
    ) -> Result<Self> {
        let mut state = Self {
            registry,
            collaborators,
            composition,
            lifecycle: Rc::new(LifecycleRegistry::new(LifecycleState::Created)),
            controllers: Vec::new(),
            saved_state: SavedState::new(),
            focused: 0,
            status: None,
            should_quit: false,
        };
        state.compose(composition, None)?;
        Ok(state)
    }

    pub fn composition(&self) -> Composition {
        self.composition
    }

    pub fn controllers(&self) -> &SectionControllers {
        &self.controllers
    }

    pub fn focused(&self) -> usize {
        self.focused
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn lifecycle(&self) -> &Rc<LifecycleRegistry> {
        &self.lifecycle
    }

    pub fn collaborators(&self) -> &HostCollaborators {
        &self.collaborators
    }

    /// Replace the current controllers with a fresh composition.
    ///
    /// The new list is built first; on failure the current one stays in
    /// place and the error is returned. On success the previous
    /// composition's lifecycle is destroyed before its controllers are
    /// released.
    pub fn compose(
        &mut self,
        composition: Composition,
        restored_state: Option<Rc<SavedState>>,
    ) -> Result<()> {
        let lifecycle = Rc::new(LifecycleRegistry::new(LifecycleState::Created));
        let bundle = self.collaborators.bundle(&lifecycle)?;
        let restored = restored_state.as_ref();
        let mut controllers = match composition {
            Composition::Screen(screen) => {
                self.registry
                    .section_controllers_for_screen(screen, &bundle, restored)
            }
            Composition::All => self.registry.all_section_controllers(&bundle, restored),
        }
        .with_context(|| format!("Failed to compose {:?}", composition))?;

        controllers.retain(|controller| controller.is_available());
        for controller in &mut controllers {
            controller
                .bind()
                .with_context(|| format!("Failed to bind section '{}'", controller.kind()))?;
            controller.on_screen_switched(composition.screen());
        }

        self.tear_down_lifecycle();
        self.release_controllers();
        lifecycle.dispatch(LifecycleState::Started);
        lifecycle.dispatch(LifecycleState::Resumed);

        info!(
            "Composed {:?} with {} sections",
            composition,
            controllers.len()
        );
        self.lifecycle = lifecycle;
        self.controllers = controllers;
        self.composition = composition;
        self.focused = 0;
        Ok(())
    }

    /// State saved by earlier compositions, overwritten by what the current
    /// controllers save.
    pub fn save_state(&self) -> Result<SavedState> {
        let mut state = self.saved_state.clone();
        for controller in &self.controllers {
            controller
                .save_state(&mut state)
                .with_context(|| format!("Failed to save section '{}'", controller.kind()))?;
        }
        Ok(state)
    }

    /// Recompose as `composition`, carrying section state across.
    pub fn switch_to(&mut self, composition: Composition) -> Result<()> {
        let snapshot = Rc::new(self.save_state()?);
        self.compose(composition, Some(Rc::clone(&snapshot)))?;
        self.saved_state = (*snapshot).clone();
        Ok(())
    }

    pub fn handle_key(&mut self, code: KeyCode) -> Result<()> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab => {
                let next = match self.composition {
                    Composition::All => Composition::Screen(Screen::LockScreen),
                    Composition::Screen(screen) => Composition::Screen(screen.other()),
                };
                self.switch_to(next)?;
            }
            KeyCode::Char('a') => {
                let next = match self.composition {
                    Composition::All => Composition::Screen(Screen::LockScreen),
                    Composition::Screen(_) => Composition::All,
                };
                self.switch_to(next)?;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.focused = self.focused.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.focused + 1 < self.controllers.len() {
                    self.focused += 1;
                }
            }
            other => {
                if let Some(controller) = self.controllers.get_mut(self.focused) {
                    if controller.handle_key(other)? == SectionAction::Update {
                        self.status = None;
                    }
                }
            }
        }
        self.collect_requests();
        Ok(())
    }

    /// Turn requests the sections left with the collaborators into status text.
    fn collect_requests(&mut self) {
        let navigation = &self.collaborators.navigation;
        if let Some(screen) = navigation.take_preview() {
            self.status = Some(format!(
                "Opening full preview of the {}",
                screen.title().to_lowercase()
            ));
        }
        if let Some(section) = navigation.take_section() {
            self.status = Some(format!("Opening {} details", section.title()));
        }
        if self.collaborators.workspace.take_update_request() {
            self.status = Some("Workspace preview refreshed".to_string());
        }
    }

    fn release_controllers(&mut self) {
        for controller in &mut self.controllers {
            controller.release();
        }
        self.controllers.clear();
    }

    /// Walk the current composition's lifecycle down to `Destroyed`.
    fn tear_down_lifecycle(&self) {
        for state in [
            LifecycleState::Paused,
            LifecycleState::Stopped,
            LifecycleState::Destroyed,
        ] {
            self.lifecycle.dispatch(state);
        }
    }

    /// Tear the surface down.
    pub fn shutdown(&mut self) {
        self.tear_down_lifecycle();
        self.collaborators.host.finish();
        self.release_controllers();
    }

    pub fn render(&mut self, frame: &mut Frame) -> Result<()> {
        let area = frame.area();
        let mut constraints = vec![Constraint::Length(3)];
        constraints.extend(
            self.controllers
                .iter()
                .map(|controller| Constraint::Length(controller.preferred_height())),
        );
        constraints.push(Constraint::Min(0));
        constraints.push(Constraint::Length(1));
        let chunks = Layout::vertical(constraints).split(area);

        let host = &self.collaborators.host;
        let titles: Vec<String> = ["lock_screen_tab", "home_screen_tab", "all_screens_tab"]
            .iter()
            .map(|key| {
                host.resource_string(key)
                    .unwrap_or_else(|| (*key).to_string())
            })
            .collect();
        let selected = match self.composition {
            Composition::Screen(Screen::LockScreen) => 0,
            Composition::Screen(Screen::HomeScreen) => 1,
            Composition::All => 2,
        };
        let tabs = Tabs::new(titles)
            .select(selected)
            .block(Block::default().borders(Borders::ALL).title(" Customize "))
            .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
        frame.render_widget(tabs, chunks[0]);

        for (i, controller) in self.controllers.iter_mut().enumerate() {
            controller.render(frame, chunks[i + 1], i == self.focused)?;
        }

        let footer = self.status.clone().unwrap_or_else(|| {
            "Tab: switch screen  a: all  ↑/↓: focus  ←/→/Enter: change  q: quit".to_string()
        });
        frame.render_widget(
            Paragraph::new(footer).style(Style::default().fg(Color::DarkGray)),
            chunks[chunks.len() - 1],
        );
        Ok(())
    }
}

/// Main application
pub struct App {
    state: PreviewState,
    tui: Tui,
}

impl App {
    pub fn new(config: &Config) -> Result<Self> {
        let state = PreviewState::new(config)?;
        let tui = Tui::new()?;
        Ok(Self { state, tui })
    }

    pub fn run(&mut self) -> Result<()> {
        self.tui.enter()?;
        let result = self.event_loop();
        self.state.shutdown();
        self.tui.exit()?;
        result
    }

    fn event_loop(&mut self) -> Result<()> {
        loop {
            self.draw()?;

            if self.state.should_quit() {
                break;
            }

            // 250ms keeps the clock section ticking
            if let Some(Event::Key(key)) = self.tui.poll_event(Duration::from_millis(250))? {
                if key.kind == KeyEventKind::Press {
                    if let Err(e) = self.state.handle_key(key.code) {
                        error!("Failed to handle key: {:#}", e);
                        self.state.status = Some(format!("Error: {e}"));
                    }
                }
            }
        }
        Ok(())
    }

    fn draw(&mut self) -> Result<()> {
        let state = &mut self.state;
        let mut result = Ok(());
        self.tui.terminal_mut().draw(|frame| {
            result = state.render(frame);
        })?;
        result
    }
}
