//! Section registry.
//!
//! Maps a [`Screen`] to the ordered section controllers that populate it.
//! The mapping is a declarative [`SectionTable`]; construction goes through a
//! kind → factory map. The registry keeps no controller instances: every call
//! builds a new list, and the caller owns it from then on.

use crate::collaborators::{CollaboratorBundle, SavedState};
use crate::error::SectionError;
use crate::screen::Screen;
use crate::sections::{SectionArgs, SectionController, SectionFactory, SectionKind};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use tracing::{debug, warn};

/// Ordered controllers for one composition request, in display order.
pub type SectionControllers = Vec<Box<dyn SectionController>>;

/// Which sections each screen shows, in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionTable {
    rows: Vec<(Screen, Vec<SectionKind>)>,
}

impl SectionTable {
    /// Build a table from explicit rows. A later row for a screen that
    /// already has one is ignored, as is a kind repeated within a row.
    pub fn new(rows: Vec<(Screen, Vec<SectionKind>)>) -> Self {
        let mut deduped: Vec<(Screen, Vec<SectionKind>)> = Vec::with_capacity(rows.len());
        for (screen, kinds) in rows {
            if deduped.iter().any(|(s, _)| *s == screen) {
                warn!("Ignoring duplicate section table row for {}", screen);
                continue;
            }
            let mut row = Vec::with_capacity(kinds.len());
            for kind in kinds {
                if row.contains(&kind) {
                    warn!("Ignoring repeated section '{}' for {}", kind, screen);
                    continue;
                }
                row.push(kind);
            }
            deduped.push((screen, row));
        }
        Self { rows: deduped }
    }

    pub fn rows(&self) -> &[(Screen, Vec<SectionKind>)] {
        &self.rows
    }

    /// Section kinds for `screen`, in display order.
    pub fn kinds_for(&self, screen: Screen) -> Result<&[SectionKind], SectionError> {
        self.rows
            .iter()
            .find(|(s, _)| *s == screen)
            .map(|(_, kinds)| kinds.as_slice())
            .ok_or_else(|| SectionError::InvalidScreen(screen.to_string()))
    }

    /// Every configured kind: rows concatenated in [`Screen::all`] order,
    /// keeping the first occurrence of a kind shared by several screens.
    pub fn all_kinds(&self) -> Vec<SectionKind> {
        let mut kinds = Vec::new();
        for screen in Screen::all() {
            let Ok(row) = self.kinds_for(screen) else {
                continue;
            };
            for kind in row {
                if !kinds.contains(kind) {
                    kinds.push(*kind);
                }
            }
        }
        kinds
    }
}

impl Default for SectionTable {
    /// Lock screen: clock then shortcuts. Home screen: app grid then app shape.
    fn default() -> Self {
        Self::new(vec![
            (
                Screen::LockScreen,
                vec![SectionKind::Clock, SectionKind::Shortcuts],
            ),
            (
                Screen::HomeScreen,
                vec![SectionKind::GridLayout, SectionKind::AppShape],
            ),
        ])
    }
}

/// Provides fresh section controllers for a screen.
///
/// Implementations must not cache controllers: each call returns new
/// instances, since every controller owns view state.
pub trait CustomizationSections {
    /// Controllers for `screen`, in display order.
    fn section_controllers_for_screen(
        &self,
        screen: Screen,
        collaborators: &Rc<CollaboratorBundle>,
        restored_state: Option<&Rc<SavedState>>,
    ) -> Result<SectionControllers, SectionError>;

    /// Controllers for every section of every screen, lock screen first.
    fn all_section_controllers(
        &self,
        collaborators: &Rc<CollaboratorBundle>,
        restored_state: Option<&Rc<SavedState>>,
    ) -> Result<SectionControllers, SectionError>;
}

/// Table-driven [`CustomizationSections`] implementation.
#[derive(Clone)]
pub struct SectionRegistry {
    table: SectionTable,
    factories: BTreeMap<SectionKind, SectionFactory>,
}

impl SectionRegistry {
    /// Registry over `table` using the built-in factory of every kind.
    pub fn new(table: SectionTable) -> Self {
        let factories = SectionKind::all()
            .into_iter()
            .map(|kind| (kind, kind.factory()))
            .collect();
        Self { table, factories }
    }

    /// Replace the factory used for `kind`.
    pub fn with_factory(mut self, kind: SectionKind, factory: SectionFactory) -> Self {
        self.factories.insert(kind, factory);
        self
    }

    /// Remove the factory for `kind`. Composing a screen that lists it fails.
    pub fn without_factory(mut self, kind: SectionKind) -> Self {
        self.factories.remove(&kind);
        self
    }

    pub fn table(&self) -> &SectionTable {
        &self.table
    }

    /// Parse `name` and compose that screen. Nothing is constructed when the
    /// name is not a screen.
    pub fn section_controllers_for_screen_name(
        &self,
        name: &str,
        collaborators: &Rc<CollaboratorBundle>,
        restored_state: Option<&Rc<SavedState>>,
    ) -> Result<SectionControllers, SectionError> {
        let screen: Screen = name.parse()?;
        self.section_controllers_for_screen(screen, collaborators, restored_state)
    }

    fn build(
        &self,
        kinds: &[SectionKind],
        collaborators: &Rc<CollaboratorBundle>,
        restored_state: Option<&Rc<SavedState>>,
    ) -> Result<SectionControllers, SectionError> {
        let args = SectionArgs {
            collaborators,
            restored_state,
        };
        kinds
            .iter()
            .map(|kind| {
                let factory = self
                    .factories
                    .get(kind)
                    .ok_or(SectionError::UnregisteredSection(*kind))?;
                factory(&args)
            })
            .collect::<Result<SectionControllers, SectionError>>()
            .inspect_err(|e| warn!("Section composition failed: {}", e))
    }
}

impl Default for SectionRegistry {
    fn default() -> Self {
        Self::new(SectionTable::default())
    }
}

impl fmt::Debug for SectionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SectionRegistry")
            .field("table", &self.table)
            .field("factories", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl CustomizationSections for SectionRegistry {
    fn section_controllers_for_screen(
        &self,
        screen: Screen,
        collaborators: &Rc<CollaboratorBundle>,
        restored_state: Option<&Rc<SavedState>>,
    ) -> Result<SectionControllers, SectionError> {
        let kinds = self.table.kinds_for(screen)?;
        debug!(
            "Composing {} with sections {:?} (restored state: {})",
            screen,
            kinds,
            restored_state.is_some()
        );
        self.build(kinds, collaborators, restored_state)
    }

    fn all_section_controllers(
        &self,
        collaborators: &Rc<CollaboratorBundle>,
        restored_state: Option<&Rc<SavedState>>,
    ) -> Result<SectionControllers, SectionError> {
        let kinds = self.table.all_kinds();
        debug!(
            "Composing all screens with sections {:?} (restored state: {})",
            kinds,
            restored_state.is_some()
        );
        self.build(&kinds, collaborators, restored_state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_rows() {
        let table = SectionTable::default();
        assert_eq!(
            table.kinds_for(Screen::LockScreen).unwrap(),
            &[SectionKind::Clock, SectionKind::Shortcuts]
        );
        assert_eq!(
            table.kinds_for(Screen::HomeScreen).unwrap(),
            &[SectionKind::GridLayout, SectionKind::AppShape]
        );
    }

    #[test]
    fn test_all_kinds_is_lock_then_home() {
        assert_eq!(
            SectionTable::default().all_kinds(),
            vec![
                SectionKind::Clock,
                SectionKind::Shortcuts,
                SectionKind::GridLayout,
                SectionKind::AppShape,
            ]
        );
    }

    #[test]
    fn test_all_kinds_uses_screen_order_not_row_order() {
        let table = SectionTable::new(vec![
            (Screen::HomeScreen, vec![SectionKind::GridLayout]),
            (Screen::LockScreen, vec![SectionKind::Clock]),
        ]);
        assert_eq!(
            table.all_kinds(),
            vec![SectionKind::Clock, SectionKind::GridLayout]
        );
    }

    #[test]
    fn test_all_kinds_drops_shared_duplicates() {
        let table = SectionTable::new(vec![
            (
                Screen::LockScreen,
                vec![SectionKind::WallpaperPreview, SectionKind::Clock],
            ),
            (
                Screen::HomeScreen,
                vec![SectionKind::WallpaperPreview, SectionKind::AppShape],
            ),
        ]);
        assert_eq!(
            table.all_kinds(),
            vec![
                SectionKind::WallpaperPreview,
                SectionKind::Clock,
                SectionKind::AppShape
            ]
        );
    }

    #[test]
    fn test_missing_row_is_invalid_screen() {
        let table = SectionTable::new(vec![(Screen::LockScreen, vec![SectionKind::Clock])]);
        assert_eq!(
            table.kinds_for(Screen::HomeScreen).unwrap_err(),
            SectionError::InvalidScreen("home_screen".to_string())
        );
        assert_eq!(table.all_kinds(), vec![SectionKind::Clock]);
    }

    #[test]
    fn test_duplicate_row_keeps_first() {
        let table = SectionTable::new(vec![
            (Screen::LockScreen, vec![SectionKind::Clock]),
            (Screen::LockScreen, vec![SectionKind::Shortcuts]),
        ]);
        assert_eq!(table.rows().len(), 1);
        assert_eq!(
            table.kinds_for(Screen::LockScreen).unwrap(),
            &[SectionKind::Clock]
        );
    }

    #[test]
    fn test_repeated_kind_in_row_keeps_first() {
        let table = SectionTable::new(vec![(
            Screen::LockScreen,
            vec![SectionKind::Clock, SectionKind::Shortcuts, SectionKind::Clock],
        )]);
        assert_eq!(
            table.kinds_for(Screen::LockScreen).unwrap(),
            &[SectionKind::Clock, SectionKind::Shortcuts]
        );
    }

    #[test]
    fn test_registry_debug_lists_factories() {
        let registry = SectionRegistry::default().without_factory(SectionKind::Clock);
        let debug = format!("{:?}", registry);
        assert!(debug.contains(
            "factories: [WallpaperPreview, Shortcuts, ColorPicker, GridLayout, AppShape]"
        ));
    }
}
