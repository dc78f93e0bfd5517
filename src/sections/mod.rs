//! Section controllers.
//!
//! A section is one self-contained piece of customization UI. Each section
//! controller owns its own view state and is built fresh for every
//! composition request through its kind's [`SectionFactory`].
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │                  SectionRegistry                        │
//! │   table: Screen -> [SectionKind, ...]                   │
//! │   factories: SectionKind -> fn(&SectionArgs) -> Box<..> │
//! └──────────────────────────┬─────────────────────────────┘
//!                            │ one call per kind, in order
//!                            ▼
//! ┌────────────────────────────────────────────────────────┐
//! │               SectionController trait                   │
//! │  - bind()                                               │
//! │  - render(frame, area, focused)                         │
//! │  - handle_key(code) -> SectionAction                    │
//! │  - save_state(&mut SavedState)                          │
//! │  - release()                                            │
//! └────────────────────────────────────────────────────────┘
//! ```

pub mod app_shape;
pub mod clock;
pub mod color_picker;
pub mod grid_layout;
pub mod shortcuts;
pub mod wallpaper_preview;

pub use app_shape::AppShapeSectionController;
pub use clock::ClockSectionController;
pub use color_picker::ColorPickerSectionController;
pub use grid_layout::GridLayoutSectionController;
pub use shortcuts::ShortcutsSectionController;
pub use wallpaper_preview::WallpaperPreviewSectionController;

use crate::collaborators::{CollaboratorBundle, SavedState};
use crate::error::SectionError;
use crate::screen::Screen;
use anyhow::Result;
use crossterm::event::KeyCode;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

/// Every kind of section the registry knows how to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    WallpaperPreview,
    Clock,
    Shortcuts,
    ColorPicker,
    GridLayout,
    AppShape,
}

impl SectionKind {
    pub fn all() -> [SectionKind; 6] {
        [
            SectionKind::WallpaperPreview,
            SectionKind::Clock,
            SectionKind::Shortcuts,
            SectionKind::ColorPicker,
            SectionKind::GridLayout,
            SectionKind::AppShape,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKind::WallpaperPreview => "wallpaper_preview",
            SectionKind::Clock => "clock",
            SectionKind::Shortcuts => "shortcuts",
            SectionKind::ColorPicker => "color_picker",
            SectionKind::GridLayout => "grid_layout",
            SectionKind::AppShape => "app_shape",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            SectionKind::WallpaperPreview => "Wallpaper",
            SectionKind::Clock => "Clock",
            SectionKind::Shortcuts => "Shortcuts",
            SectionKind::ColorPicker => "Colors",
            SectionKind::GridLayout => "App grid",
            SectionKind::AppShape => "App shape",
        }
    }

    /// Built-in constructor for this kind.
    pub fn factory(&self) -> SectionFactory {
        match self {
            SectionKind::WallpaperPreview => wallpaper_preview::create,
            SectionKind::Clock => clock::create,
            SectionKind::Shortcuts => shortcuts::create,
            SectionKind::ColorPicker => color_picker::create,
            SectionKind::GridLayout => grid_layout::create,
            SectionKind::AppShape => app_shape::create,
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        SectionKind::all()
            .into_iter()
            .find(|kind| kind.as_str() == name)
            .ok_or_else(|| anyhow::anyhow!("Unknown section kind: {}", s))
    }
}

/// Inputs handed to a section factory.
///
/// Both references belong to the composition request; factories clone the
/// `Rc`s they keep.
#[derive(Debug, Clone, Copy)]
pub struct SectionArgs<'a> {
    pub collaborators: &'a Rc<CollaboratorBundle>,
    pub restored_state: Option<&'a Rc<SavedState>>,
}

/// Constructs one fresh controller.
pub type SectionFactory = fn(&SectionArgs<'_>) -> Result<Box<dyn SectionController>, SectionError>;

/// What the host should do after a section handled a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SectionAction {
    /// Key was not consumed.
    #[default]
    None,
    /// Section state changed, needs re-render.
    Update,
}

/// Capability contract of a section controller.
///
/// Construction happens through a [`SectionFactory`]; after that the host
/// binds, renders and finally releases the controller. Controllers share the
/// collaborator bundle with their siblings and must not assume exclusive
/// ownership of anything in it.
pub trait SectionController {
    fn kind(&self) -> SectionKind;

    /// Bundle this controller was constructed with.
    fn collaborators(&self) -> &Rc<CollaboratorBundle>;

    /// Snapshot this controller restored from. Controllers that do not
    /// support restoration keep the default.
    fn restored_state(&self) -> Option<&Rc<SavedState>> {
        None
    }

    /// Whether the section should be shown in the current environment.
    fn is_available(&self) -> bool {
        true
    }

    /// Attach to the host surface. Called once, before the first render.
    fn bind(&mut self) -> Result<()> {
        Ok(())
    }

    /// Rows this section wants, borders included.
    fn preferred_height(&self) -> u16 {
        4
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, focused: bool) -> Result<()>;

    fn handle_key(&mut self, _code: KeyCode) -> Result<SectionAction> {
        Ok(SectionAction::None)
    }

    /// The host switched between lock and home screen.
    fn on_screen_switched(&mut self, _screen: Screen) {}

    /// Write whatever is needed to restore this section later.
    fn save_state(&self, _state: &mut SavedState) -> Result<()> {
        Ok(())
    }

    /// Drop view state. The controller is not used afterwards.
    fn release(&mut self) {}
}

impl fmt::Debug for dyn SectionController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SectionController")
            .field("kind", &self.kind())
            .finish_non_exhaustive()
    }
}

/// Cyclic selection over a fixed list of options.
#[derive(Debug, Clone)]
pub(crate) struct Choice<T: Copy + PartialEq> {
    options: Vec<T>,
    selected: usize,
}

impl<T: Copy + PartialEq> Choice<T> {
    /// `options` must not be empty.
    pub(crate) fn new(options: Vec<T>) -> Self {
        debug_assert!(!options.is_empty());
        Self {
            options,
            selected: 0,
        }
    }

    /// Start on `value` if it is one of the options.
    pub(crate) fn with_selected(mut self, value: Option<T>) -> Self {
        if let Some(index) = value.and_then(|v| self.options.iter().position(|o| *o == v)) {
            self.selected = index;
        }
        self
    }

    pub(crate) fn selected(&self) -> T {
        self.options[self.selected]
    }

    pub(crate) fn options(&self) -> &[T] {
        &self.options
    }

    pub(crate) fn next(&mut self) {
        self.selected = (self.selected + 1) % self.options.len();
    }

    pub(crate) fn previous(&mut self) {
        self.selected = (self.selected + self.options.len() - 1) % self.options.len();
    }

    /// Handle left/right cycling. Returns whether the selection changed.
    pub(crate) fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.options.len() < 2 {
            return false;
        }
        match code {
            KeyCode::Left | KeyCode::Char('h') => {
                self.previous();
                true
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.next();
                true
            }
            _ => false,
        }
    }
}

/// Draw the common bordered frame of a section with `lines` inside.
pub(crate) fn render_section_block(
    frame: &mut Frame,
    area: Rect,
    kind: SectionKind,
    focused: bool,
    lines: Vec<Line<'static>>,
) {
    let border_style = if focused {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(format!(" {} ", kind.title()));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// One line listing `options` with the selected one highlighted.
pub(crate) fn options_line<T: Copy + PartialEq>(
    choice: &Choice<T>,
    label: impl Fn(T) -> &'static str,
) -> Line<'static> {
    let selected = choice.selected();
    let mut spans = Vec::with_capacity(choice.options().len() * 2);
    for (i, option) in choice.options().iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        if *option == selected {
            spans.push(Span::styled(
                format!("[{}]", label(*option)),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ));
        } else {
            spans.push(Span::raw(label(*option)));
        }
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_kind_names_round_trip() {
        for kind in SectionKind::all() {
            assert_eq!(kind.as_str().parse::<SectionKind>().unwrap(), kind);
            assert_eq!(serde_json::to_string(&kind).unwrap(), format!("\"{}\"", kind));
        }
        assert!("weather".parse::<SectionKind>().is_err());
    }

    #[test]
    fn test_choice_cycles_both_ways() {
        let mut choice = Choice::new(vec![1, 2, 3]);
        choice.previous();
        assert_eq!(choice.selected(), 3);
        choice.next();
        assert_eq!(choice.selected(), 1);
        assert!(choice.handle_key(KeyCode::Right));
        assert_eq!(choice.selected(), 2);
        assert!(!choice.handle_key(KeyCode::Enter));
    }

    #[test]
    fn test_choice_with_selected_ignores_unknown_value() {
        let choice = Choice::new(vec!['a', 'b']).with_selected(Some('z'));
        assert_eq!(choice.selected(), 'a');
        let choice = Choice::new(vec!['a', 'b']).with_selected(Some('b'));
        assert_eq!(choice.selected(), 'b');
    }
}
