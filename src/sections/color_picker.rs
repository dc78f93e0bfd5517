//! Theme color section, seeded from the wallpaper colors view model.

use super::{
    render_section_block, Choice, SectionAction, SectionArgs, SectionController, SectionKind,
};
use crate::collaborators::{CollaboratorBundle, Rgb, SavedState};
use crate::error::SectionError;
use crate::screen::Screen;
use anyhow::Result;
use crossterm::event::KeyCode;
use ratatui::prelude::*;
use serde::{Deserialize, Serialize};
use std::rc::Rc;

const SELECTED_SOURCE_KEY: &str = "color_picker.source";

const BASIC_COLORS: [Rgb; 4] = [
    Rgb(0x1b, 0x6e, 0xf3),
    Rgb(0x0b, 0x8a, 0x4b),
    Rgb(0xc2, 0x3b, 0x22),
    Rgb(0x7b, 0x4f, 0xc9),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorSource {
    Wallpaper,
    Basic,
}

pub struct ColorPickerSectionController {
    collaborators: Rc<CollaboratorBundle>,
    restored_state: Option<Rc<SavedState>>,
    sources: Choice<ColorSource>,
    screen: Screen,
}

pub(crate) fn create(args: &SectionArgs<'_>) -> Result<Box<dyn SectionController>, SectionError> {
    Ok(Box::new(ColorPickerSectionController::new(args)))
}

impl ColorPickerSectionController {
    pub fn new(args: &SectionArgs<'_>) -> Self {
        let restored = args
            .restored_state
            .and_then(|state| state.get::<ColorSource>(SELECTED_SOURCE_KEY));
        Self {
            collaborators: Rc::clone(args.collaborators),
            restored_state: args.restored_state.cloned(),
            sources: Choice::new(vec![ColorSource::Wallpaper, ColorSource::Basic])
                .with_selected(restored),
            screen: Screen::default(),
        }
    }

    pub fn selected_source(&self) -> ColorSource {
        self.sources.selected()
    }

    /// Colors currently offered, depending on the selected source.
    pub fn palette(&self) -> Vec<Rgb> {
        match self.sources.selected() {
            ColorSource::Wallpaper => self
                .collaborators
                .wallpaper_colors
                .colors(self.screen)
                .map(|colors| colors.palette())
                .unwrap_or_default(),
            ColorSource::Basic => BASIC_COLORS.to_vec(),
        }
    }
}

impl SectionController for ColorPickerSectionController {
    fn kind(&self) -> SectionKind {
        SectionKind::ColorPicker
    }

    fn collaborators(&self) -> &Rc<CollaboratorBundle> {
        &self.collaborators
    }

    fn restored_state(&self) -> Option<&Rc<SavedState>> {
        self.restored_state.as_ref()
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, focused: bool) -> Result<()> {
        let source = match self.sources.selected() {
            ColorSource::Wallpaper => "Wallpaper colors",
            ColorSource::Basic => "Basic colors",
        };
        let palette = self.palette();
        let swatches = if palette.is_empty() {
            Line::from(Span::styled(
                "No wallpaper colors yet",
                Style::default().fg(Color::DarkGray),
            ))
        } else {
            Line::from(
                palette
                    .into_iter()
                    .map(|Rgb(r, g, b)| Span::styled("██ ", Style::default().fg(Color::Rgb(r, g, b))))
                    .collect::<Vec<_>>(),
            )
        };
        render_section_block(
            frame,
            area,
            self.kind(),
            focused,
            vec![Line::from(format!("< {source} >")), swatches],
        );
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) -> Result<SectionAction> {
        if self.sources.handle_key(code) {
            return Ok(SectionAction::Update);
        }
        Ok(SectionAction::None)
    }

    fn on_screen_switched(&mut self, screen: Screen) {
        self.screen = screen;
    }

    fn save_state(&self, state: &mut SavedState) -> Result<()> {
        state.put(SELECTED_SOURCE_KEY, &self.sources.selected())?;
        Ok(())
    }
}
