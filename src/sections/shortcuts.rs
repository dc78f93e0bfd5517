//! Lock screen shortcuts section.
//!
//! Two slots at the bottom of the lock screen. Assigning the camera asks for
//! the camera permission through the shared gateway; the answer arrives
//! whenever the gateway delivers it.

use super::{render_section_block, SectionAction, SectionArgs, SectionController, SectionKind};
use crate::collaborators::CollaboratorBundle;
use crate::error::SectionError;
use anyhow::Result;
use crossterm::event::KeyCode;
use ratatui::prelude::*;
use std::cell::Cell;
use std::rc::Rc;

pub const CAMERA_PERMISSION: &str = "android.permission.CAMERA";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    None,
    Camera,
    Flashlight,
    DoNotDisturb,
    QrScanner,
}

impl Shortcut {
    const ALL: [Shortcut; 5] = [
        Shortcut::None,
        Shortcut::Camera,
        Shortcut::Flashlight,
        Shortcut::DoNotDisturb,
        Shortcut::QrScanner,
    ];

    fn label(self) -> &'static str {
        match self {
            Shortcut::None => "None",
            Shortcut::Camera => "Camera",
            Shortcut::Flashlight => "Flashlight",
            Shortcut::DoNotDisturb => "Do not disturb",
            Shortcut::QrScanner => "QR scanner",
        }
    }

    fn next(self) -> Shortcut {
        let index = Self::ALL.iter().position(|s| *s == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

pub struct ShortcutsSectionController {
    collaborators: Rc<CollaboratorBundle>,
    slots: [Shortcut; 2],
    focused_slot: usize,
    /// `None` until the gateway answers.
    camera_granted: Rc<Cell<Option<bool>>>,
}

pub(crate) fn create(args: &SectionArgs<'_>) -> Result<Box<dyn SectionController>, SectionError> {
    Ok(Box::new(ShortcutsSectionController::new(args)))
}

impl ShortcutsSectionController {
    pub fn new(args: &SectionArgs<'_>) -> Self {
        Self {
            collaborators: Rc::clone(args.collaborators),
            slots: [Shortcut::Flashlight, Shortcut::Camera],
            focused_slot: 0,
            camera_granted: Rc::new(Cell::new(None)),
        }
    }

    pub fn slots(&self) -> [Shortcut; 2] {
        self.slots
    }

    pub fn camera_granted(&self) -> Option<bool> {
        self.camera_granted.get()
    }

    fn request_camera_permission(&self) {
        let granted = Rc::clone(&self.camera_granted);
        self.collaborators.permission_requester.request_permission(
            CAMERA_PERMISSION,
            Box::new(move |result| granted.set(Some(result))),
        );
    }
}

impl SectionController for ShortcutsSectionController {
    fn kind(&self) -> SectionKind {
        SectionKind::Shortcuts
    }

    fn collaborators(&self) -> &Rc<CollaboratorBundle> {
        &self.collaborators
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, focused: bool) -> Result<()> {
        let mut spans = Vec::new();
        for (i, slot) in self.slots.iter().enumerate() {
            let label = format!("{}: {}", if i == 0 { "Left" } else { "Right" }, slot.label());
            if focused && i == self.focused_slot {
                spans.push(Span::styled(
                    format!("[{label}]"),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ));
            } else {
                spans.push(Span::raw(label));
            }
            spans.push(Span::raw("   "));
        }
        let permission = match self.camera_granted.get() {
            Some(false) => Line::from(Span::styled(
                "Camera permission denied",
                Style::default().fg(Color::Red),
            )),
            _ => Line::from(Span::styled(
                "Enter cycles the focused slot",
                Style::default().fg(Color::DarkGray),
            )),
        };
        render_section_block(frame, area, self.kind(), focused, vec![Line::from(spans), permission]);
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) -> Result<SectionAction> {
        match code {
            KeyCode::Left | KeyCode::Char('h') => self.focused_slot = 0,
            KeyCode::Right | KeyCode::Char('l') => self.focused_slot = 1,
            KeyCode::Enter | KeyCode::Char(' ') => {
                let slot = &mut self.slots[self.focused_slot];
                *slot = slot.next();
                tracing::debug!("Shortcut slot {} set to {:?}", self.focused_slot, *slot);
                if *slot == Shortcut::Camera && self.camera_granted.get() != Some(true) {
                    self.request_camera_permission();
                }
            }
            _ => return Ok(SectionAction::None),
        }
        Ok(SectionAction::Update)
    }
}
