//! Wallpaper preview section.
//!
//! Needs the wallpaper info factory at construction time, so it can only be
//! composed from a bundle that carries one.

use super::{render_section_block, SectionAction, SectionArgs, SectionController, SectionKind};
use crate::collaborators::{CollaboratorBundle, CurrentWallpaperInfoFactory, WallpaperInfo};
use crate::error::SectionError;
use crate::screen::Screen;
use anyhow::Result;
use crossterm::event::KeyCode;
use ratatui::prelude::*;
use std::rc::Rc;

pub struct WallpaperPreviewSectionController {
    collaborators: Rc<CollaboratorBundle>,
    info_factory: Rc<dyn CurrentWallpaperInfoFactory>,
    screen: Screen,
    info: Option<WallpaperInfo>,
}

pub(crate) fn create(args: &SectionArgs<'_>) -> Result<Box<dyn SectionController>, SectionError> {
    Ok(Box::new(WallpaperPreviewSectionController::new(args)?))
}

impl WallpaperPreviewSectionController {
    pub fn new(args: &SectionArgs<'_>) -> Result<Self, SectionError> {
        let info_factory = args
            .collaborators
            .require_wallpaper_info_factory(SectionKind::WallpaperPreview)?;
        Ok(Self {
            collaborators: Rc::clone(args.collaborators),
            info_factory: Rc::clone(info_factory),
            screen: Screen::default(),
            info: None,
        })
    }

    pub fn wallpaper_info(&self) -> Option<&WallpaperInfo> {
        self.info.as_ref()
    }

    fn refresh(&mut self) {
        self.info = self.info_factory.current_wallpaper_info(self.screen);
    }
}

impl SectionController for WallpaperPreviewSectionController {
    fn kind(&self) -> SectionKind {
        SectionKind::WallpaperPreview
    }

    fn collaborators(&self) -> &Rc<CollaboratorBundle> {
        &self.collaborators
    }

    fn bind(&mut self) -> Result<()> {
        self.refresh();
        Ok(())
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, focused: bool) -> Result<()> {
        let title = match &self.info {
            Some(info) if info.is_live => format!("{} (live)", info.title),
            Some(info) => info.title.clone(),
            None => "No wallpaper set".to_string(),
        };
        let attribution = self
            .info
            .as_ref()
            .and_then(|info| info.attributions.first().cloned())
            .unwrap_or_else(|| "Enter opens the full preview".to_string());
        let lines = vec![
            Line::from(Span::styled(title, Style::default().add_modifier(Modifier::BOLD))),
            Line::from(Span::styled(attribution, Style::default().fg(Color::DarkGray))),
        ];
        render_section_block(frame, area, self.kind(), focused, lines);
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) -> Result<SectionAction> {
        if code == KeyCode::Enter {
            self.collaborators.preview_navigator.show_preview(self.screen);
            return Ok(SectionAction::Update);
        }
        Ok(SectionAction::None)
    }

    fn on_screen_switched(&mut self, screen: Screen) {
        self.screen = screen;
        self.refresh();
    }

    fn release(&mut self) {
        self.info = None;
    }
}
