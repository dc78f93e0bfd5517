//! Home screen app grid section.

use super::{
    options_line, render_section_block, Choice, SectionAction, SectionArgs, SectionController,
    SectionKind,
};
use crate::collaborators::{CollaboratorBundle, DisplayUtils, SavedState};
use crate::error::SectionError;
use anyhow::Result;
use crossterm::event::KeyCode;
use ratatui::prelude::*;
use serde::{Deserialize, Serialize};
use std::rc::Rc;

const SELECTED_GRID_KEY: &str = "grid_layout.selected";

/// Displays narrower than this cannot fit a 5x5 grid.
const MIN_WIDTH_DP_FOR_5X5: u32 = 360;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridOption {
    Grid4x4,
    Grid5x5,
    Grid3x3,
    Grid2x2,
}

impl GridOption {
    fn label(self) -> &'static str {
        match self {
            GridOption::Grid4x4 => "4x4",
            GridOption::Grid5x5 => "5x5",
            GridOption::Grid3x3 => "3x3",
            GridOption::Grid2x2 => "2x2",
        }
    }

    /// Options that fit on `display`, in presentation order.
    pub fn available(display: &DisplayUtils) -> Vec<GridOption> {
        let mut options = vec![GridOption::Grid4x4];
        if display.smallest_width_dp() >= MIN_WIDTH_DP_FOR_5X5 {
            options.push(GridOption::Grid5x5);
        }
        options.extend([GridOption::Grid3x3, GridOption::Grid2x2]);
        options
    }
}

pub struct GridLayoutSectionController {
    collaborators: Rc<CollaboratorBundle>,
    restored_state: Option<Rc<SavedState>>,
    grids: Choice<GridOption>,
}

pub(crate) fn create(args: &SectionArgs<'_>) -> Result<Box<dyn SectionController>, SectionError> {
    Ok(Box::new(GridLayoutSectionController::new(args)))
}

impl GridLayoutSectionController {
    pub fn new(args: &SectionArgs<'_>) -> Self {
        let restored = args
            .restored_state
            .and_then(|state| state.get::<GridOption>(SELECTED_GRID_KEY));
        let options = GridOption::available(&args.collaborators.display_utils);
        Self {
            collaborators: Rc::clone(args.collaborators),
            restored_state: args.restored_state.cloned(),
            grids: Choice::new(options).with_selected(restored),
        }
    }

    pub fn selected_grid(&self) -> GridOption {
        self.grids.selected()
    }
}

impl SectionController for GridLayoutSectionController {
    fn kind(&self) -> SectionKind {
        SectionKind::GridLayout
    }

    fn collaborators(&self) -> &Rc<CollaboratorBundle> {
        &self.collaborators
    }

    fn restored_state(&self) -> Option<&Rc<SavedState>> {
        self.restored_state.as_ref()
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, focused: bool) -> Result<()> {
        let lines = vec![
            options_line(&self.grids, GridOption::label),
            Line::from(Span::styled(
                "Enter opens the grid preview",
                Style::default().fg(Color::DarkGray),
            )),
        ];
        render_section_block(frame, area, self.kind(), focused, lines);
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) -> Result<SectionAction> {
        if self.grids.handle_key(code) {
            tracing::debug!("Grid set to {:?}", self.grids.selected());
            self.collaborators.workspace.request_update();
            return Ok(SectionAction::Update);
        }
        if code == KeyCode::Enter {
            self.collaborators.section_navigator.navigate_to(self.kind());
            return Ok(SectionAction::Update);
        }
        Ok(SectionAction::None)
    }

    fn save_state(&self, state: &mut SavedState) -> Result<()> {
        state.put(SELECTED_GRID_KEY, &self.grids.selected())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_narrow_display_hides_5x5() {
        let narrow = DisplayUtils::new(640, 1280, 2.0);
        assert!(!GridOption::available(&narrow).contains(&GridOption::Grid5x5));

        let phone = DisplayUtils::new(1080, 2400, 2.625);
        assert_eq!(
            GridOption::available(&phone),
            vec![
                GridOption::Grid4x4,
                GridOption::Grid5x5,
                GridOption::Grid3x3,
                GridOption::Grid2x2
            ]
        );
    }
}
