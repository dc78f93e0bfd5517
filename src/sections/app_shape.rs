//! Home screen icon shape section.

use super::{
    options_line, render_section_block, Choice, SectionAction, SectionArgs, SectionController,
    SectionKind,
};
use crate::collaborators::CollaboratorBundle;
use crate::error::SectionError;
use anyhow::Result;
use crossterm::event::KeyCode;
use ratatui::prelude::*;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppShape {
    Circle,
    Squircle,
    RoundedSquare,
    Teardrop,
}

impl AppShape {
    fn label(self) -> &'static str {
        match self {
            AppShape::Circle => "Circle",
            AppShape::Squircle => "Squircle",
            AppShape::RoundedSquare => "Rounded square",
            AppShape::Teardrop => "Teardrop",
        }
    }
}

pub struct AppShapeSectionController {
    collaborators: Rc<CollaboratorBundle>,
    shapes: Choice<AppShape>,
}

pub(crate) fn create(args: &SectionArgs<'_>) -> Result<Box<dyn SectionController>, SectionError> {
    Ok(Box::new(AppShapeSectionController::new(args)))
}

impl AppShapeSectionController {
    pub fn new(args: &SectionArgs<'_>) -> Self {
        Self {
            collaborators: Rc::clone(args.collaborators),
            shapes: Choice::new(vec![
                AppShape::Circle,
                AppShape::Squircle,
                AppShape::RoundedSquare,
                AppShape::Teardrop,
            ]),
        }
    }

    pub fn selected_shape(&self) -> AppShape {
        self.shapes.selected()
    }
}

impl SectionController for AppShapeSectionController {
    fn kind(&self) -> SectionKind {
        SectionKind::AppShape
    }

    fn collaborators(&self) -> &Rc<CollaboratorBundle> {
        &self.collaborators
    }

    fn preferred_height(&self) -> u16 {
        3
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, focused: bool) -> Result<()> {
        let lines = vec![options_line(&self.shapes, AppShape::label)];
        render_section_block(frame, area, self.kind(), focused, lines);
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) -> Result<SectionAction> {
        if self.shapes.handle_key(code) {
            self.collaborators.workspace.request_update();
            return Ok(SectionAction::Update);
        }
        Ok(SectionAction::None)
    }
}
