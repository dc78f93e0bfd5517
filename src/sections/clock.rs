//! Lock screen clock section.

use super::{
    options_line, render_section_block, Choice, SectionAction, SectionArgs, SectionController,
    SectionKind,
};
use crate::collaborators::{CollaboratorBundle, LifecycleObserver, LifecycleState, SavedState};
use crate::error::SectionError;
use anyhow::Result;
use chrono::Local;
use crossterm::event::KeyCode;
use ratatui::prelude::*;
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::rc::Rc;

const SELECTED_FACE_KEY: &str = "clock.selected_face";

/// Clock faces offered on the lock screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClockFace {
    Default,
    Seconds,
    TwelveHour,
}

impl ClockFace {
    fn label(self) -> &'static str {
        match self {
            ClockFace::Default => "Default",
            ClockFace::Seconds => "Seconds",
            ClockFace::TwelveHour => "12-hour",
        }
    }

    fn format(self) -> &'static str {
        match self {
            ClockFace::Default => "%H:%M",
            ClockFace::Seconds => "%H:%M:%S",
            ClockFace::TwelveHour => "%I:%M %p",
        }
    }
}

/// Stops the clock preview while the host is not resumed.
struct ClockTicker {
    ticking: Rc<Cell<bool>>,
}

impl LifecycleObserver for ClockTicker {
    fn on_state_changed(&self, state: LifecycleState) {
        self.ticking.set(state == LifecycleState::Resumed);
    }
}

pub struct ClockSectionController {
    collaborators: Rc<CollaboratorBundle>,
    restored_state: Option<Rc<SavedState>>,
    faces: Choice<ClockFace>,
    ticking: Rc<Cell<bool>>,
    bound: bool,
}

pub(crate) fn create(args: &SectionArgs<'_>) -> Result<Box<dyn SectionController>, SectionError> {
    Ok(Box::new(ClockSectionController::new(args)))
}

impl ClockSectionController {
    pub fn new(args: &SectionArgs<'_>) -> Self {
        let restored_face = args
            .restored_state
            .and_then(|state| state.get::<ClockFace>(SELECTED_FACE_KEY));
        Self {
            collaborators: Rc::clone(args.collaborators),
            restored_state: args.restored_state.cloned(),
            faces: Choice::new(vec![ClockFace::Default, ClockFace::Seconds, ClockFace::TwelveHour])
                .with_selected(restored_face),
            ticking: Rc::new(Cell::new(false)),
            bound: false,
        }
    }

    pub fn selected_face(&self) -> ClockFace {
        self.faces.selected()
    }
}

impl SectionController for ClockSectionController {
    fn kind(&self) -> SectionKind {
        SectionKind::Clock
    }

    fn collaborators(&self) -> &Rc<CollaboratorBundle> {
        &self.collaborators
    }

    fn restored_state(&self) -> Option<&Rc<SavedState>> {
        self.restored_state.as_ref()
    }

    fn bind(&mut self) -> Result<()> {
        if self.bound {
            return Ok(());
        }
        let lifecycle = &self.collaborators.lifecycle_owner;
        self.ticking
            .set(lifecycle.current_state() == LifecycleState::Resumed);
        lifecycle.add_observer(Rc::new(ClockTicker {
            ticking: Rc::clone(&self.ticking),
        }));
        self.bound = true;
        Ok(())
    }

    fn preferred_height(&self) -> u16 {
        4
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, focused: bool) -> Result<()> {
        let face = self.faces.selected();
        let time = if self.ticking.get() {
            Local::now().format(face.format()).to_string()
        } else {
            "--:--".to_string()
        };
        let lines = vec![
            Line::from(Span::styled(
                time,
                Style::default().add_modifier(Modifier::BOLD),
            )),
            options_line(&self.faces, ClockFace::label),
        ];
        render_section_block(frame, area, self.kind(), focused, lines);
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) -> Result<SectionAction> {
        if self.faces.handle_key(code) {
            tracing::debug!("Clock face set to {:?}", self.faces.selected());
            return Ok(SectionAction::Update);
        }
        Ok(SectionAction::None)
    }

    fn save_state(&self, state: &mut SavedState) -> Result<()> {
        state.put(SELECTED_FACE_KEY, &self.faces.selected())?;
        Ok(())
    }

    fn release(&mut self) {
        self.ticking.set(false);
        self.bound = false;
    }
}
