//! Integration tests for screen composition.
//!
//! Covers the guarantees callers rely on:
//! - Deterministic order per screen
//! - Fresh controller instances on every call
//! - One shared bundle and snapshot handed to every controller
//! - Whole-request failure on invalid screens and missing collaborators

mod common;

use std::cell::Cell;
use std::rc::Rc;

use common::{addr, kinds, TestBundle};
use customizer::sections::{SectionArgs, ShortcutsSectionController};
use customizer::{
    CustomizationSections, SavedState, Screen, SectionController, SectionError, SectionKind,
    SectionRegistry, SectionTable,
};

// ============================================================================
// ORDERING
// ============================================================================

#[test]
fn lock_screen_is_clock_then_shortcuts() {
    let env = TestBundle::new().build();
    let registry = SectionRegistry::default();

    let controllers = registry
        .section_controllers_for_screen(Screen::LockScreen, &env.bundle, None)
        .unwrap();

    assert_eq!(
        kinds(&controllers),
        vec![SectionKind::Clock, SectionKind::Shortcuts]
    );
}

#[test]
fn home_screen_is_grid_then_app_shape() {
    let env = TestBundle::new().build();
    let registry = SectionRegistry::default();

    let controllers = registry
        .section_controllers_for_screen(Screen::HomeScreen, &env.bundle, None)
        .unwrap();

    assert_eq!(
        kinds(&controllers),
        vec![SectionKind::GridLayout, SectionKind::AppShape]
    );
}

#[test]
fn all_sections_concatenate_lock_then_home() {
    let env = TestBundle::new().build();
    let registry = SectionRegistry::default();

    let controllers = registry.all_section_controllers(&env.bundle, None).unwrap();

    assert_eq!(
        kinds(&controllers),
        vec![
            SectionKind::Clock,
            SectionKind::Shortcuts,
            SectionKind::GridLayout,
            SectionKind::AppShape,
        ]
    );
}

#[test]
fn every_screen_composes_a_non_empty_list() {
    let env = TestBundle::new().build();
    let registry = SectionRegistry::default();

    for screen in Screen::all() {
        let controllers = registry
            .section_controllers_for_screen(screen, &env.bundle, None)
            .unwrap();
        assert!(!controllers.is_empty(), "{screen} composed no sections");
    }
}

#[test]
fn repeated_requests_yield_the_same_kinds() {
    let env = TestBundle::new().build();
    let registry = SectionRegistry::default();

    for screen in Screen::all() {
        let first = registry
            .section_controllers_for_screen(screen, &env.bundle, None)
            .unwrap();
        let second = registry
            .section_controllers_for_screen(screen, &env.bundle, None)
            .unwrap();
        assert_eq!(kinds(&first), kinds(&second));
    }
}

#[test]
fn shared_kinds_appear_once_in_all_sections() {
    let env = TestBundle::new().build();
    let registry = SectionRegistry::new(SectionTable::new(vec![
        (
            Screen::LockScreen,
            vec![SectionKind::WallpaperPreview, SectionKind::Clock],
        ),
        (
            Screen::HomeScreen,
            vec![SectionKind::WallpaperPreview, SectionKind::ColorPicker],
        ),
    ]));

    let controllers = registry.all_section_controllers(&env.bundle, None).unwrap();

    assert_eq!(
        kinds(&controllers),
        vec![
            SectionKind::WallpaperPreview,
            SectionKind::Clock,
            SectionKind::ColorPicker,
        ]
    );
}

#[test]
fn repeated_kind_in_a_row_is_built_once() {
    let env = TestBundle::new().build();
    let registry = SectionRegistry::new(SectionTable::new(vec![
        (
            Screen::LockScreen,
            vec![SectionKind::Clock, SectionKind::Shortcuts, SectionKind::Clock],
        ),
        (Screen::HomeScreen, vec![SectionKind::AppShape]),
    ]));

    let lock = registry
        .section_controllers_for_screen(Screen::LockScreen, &env.bundle, None)
        .unwrap();
    let all = registry.all_section_controllers(&env.bundle, None).unwrap();

    assert_eq!(kinds(&lock), vec![SectionKind::Clock, SectionKind::Shortcuts]);
    assert_eq!(
        kinds(&all),
        vec![
            SectionKind::Clock,
            SectionKind::Shortcuts,
            SectionKind::AppShape,
        ]
    );
}

// ============================================================================
// FRESH INSTANCES AND SHARED INPUTS
// ============================================================================

#[test]
fn each_request_builds_new_controllers() {
    let env = TestBundle::new().build();
    let registry = SectionRegistry::default();

    let first = registry.all_section_controllers(&env.bundle, None).unwrap();
    let second = registry.all_section_controllers(&env.bundle, None).unwrap();

    for a in &first {
        for b in &second {
            assert_ne!(addr(a.as_ref()), addr(b.as_ref()));
        }
    }
}

#[test]
fn separate_bundles_get_separate_controllers() {
    let first_env = TestBundle::new().build();
    let second_env = TestBundle::new().build();
    let registry = SectionRegistry::default();
    assert!(!Rc::ptr_eq(&first_env.bundle, &second_env.bundle));

    for screen in Screen::all() {
        let first = registry
            .section_controllers_for_screen(screen, &first_env.bundle, None)
            .unwrap();
        let second = registry
            .section_controllers_for_screen(screen, &second_env.bundle, None)
            .unwrap();

        assert_eq!(kinds(&first), kinds(&second));
        for a in &first {
            assert!(Rc::ptr_eq(a.collaborators(), &first_env.bundle));
            for b in &second {
                assert_ne!(addr(a.as_ref()), addr(b.as_ref()));
            }
        }
        for b in &second {
            assert!(Rc::ptr_eq(b.collaborators(), &second_env.bundle));
        }
    }
}

#[test]
fn controllers_share_the_callers_bundle() {
    let env = TestBundle::new().build();
    let registry = SectionRegistry::default();

    let controllers = registry.all_section_controllers(&env.bundle, None).unwrap();

    for controller in &controllers {
        assert!(
            Rc::ptr_eq(controller.collaborators(), &env.bundle),
            "{} got a different bundle",
            controller.kind()
        );
    }
}

#[test]
fn restorable_sections_receive_the_callers_snapshot() {
    let env = TestBundle::new().build();
    let registry = SectionRegistry::new(SectionTable::new(vec![
        (
            Screen::LockScreen,
            vec![
                SectionKind::WallpaperPreview,
                SectionKind::Clock,
                SectionKind::Shortcuts,
            ],
        ),
        (
            Screen::HomeScreen,
            vec![
                SectionKind::ColorPicker,
                SectionKind::GridLayout,
                SectionKind::AppShape,
            ],
        ),
    ]));
    let snapshot = Rc::new(SavedState::new());

    let controllers = registry
        .all_section_controllers(&env.bundle, Some(&snapshot))
        .unwrap();

    for controller in &controllers {
        match controller.kind() {
            SectionKind::Clock | SectionKind::GridLayout | SectionKind::ColorPicker => {
                let restored = controller.restored_state().unwrap();
                assert!(Rc::ptr_eq(restored, &snapshot));
            }
            SectionKind::Shortcuts | SectionKind::AppShape | SectionKind::WallpaperPreview => {
                assert!(controller.restored_state().is_none());
            }
        }
    }
}

#[test]
fn no_snapshot_means_no_restored_state() {
    let env = TestBundle::new().build();
    let registry = SectionRegistry::default();

    let controllers = registry.all_section_controllers(&env.bundle, None).unwrap();

    assert!(controllers.iter().all(|c| c.restored_state().is_none()));
}

#[test]
fn composing_does_not_touch_collaborators() {
    let env = TestBundle::new().build();
    let registry = SectionRegistry::default();

    let _controllers = registry.all_section_controllers(&env.bundle, None).unwrap();

    assert_eq!(env.lifecycle.observer_count(), 0);
    assert!(env.permissions.requests.borrow().is_empty());
    assert!(env.navigator.sections.borrow().is_empty());
    assert!(!env.workspace.should_update_workspace());
}

// ============================================================================
// FAILURES
// ============================================================================

#[test]
fn unknown_screen_name_is_rejected() {
    let env = TestBundle::new().build();
    let registry = SectionRegistry::default();

    let err = registry
        .section_controllers_for_screen_name("settings", &env.bundle, None)
        .unwrap_err();

    assert_eq!(err, SectionError::InvalidScreen("settings".to_string()));
}

#[test]
fn screen_without_a_table_row_is_rejected() {
    let env = TestBundle::new().build();
    let registry = SectionRegistry::new(SectionTable::new(vec![(
        Screen::LockScreen,
        vec![SectionKind::Clock],
    )]));

    let err = registry
        .section_controllers_for_screen(Screen::HomeScreen, &env.bundle, None)
        .unwrap_err();

    assert!(matches!(err, SectionError::InvalidScreen(_)));
    // The remaining row still composes.
    assert!(registry.all_section_controllers(&env.bundle, None).is_ok());
}

#[test]
fn wallpaper_preview_needs_the_info_factory() {
    let env = TestBundle::new().without_wallpaper_info().build();
    let registry = SectionRegistry::new(SectionTable::new(vec![
        (
            Screen::LockScreen,
            vec![SectionKind::WallpaperPreview, SectionKind::Clock],
        ),
        (Screen::HomeScreen, vec![SectionKind::GridLayout]),
    ]));

    let err = registry
        .section_controllers_for_screen(Screen::LockScreen, &env.bundle, None)
        .unwrap_err();

    assert_eq!(
        err,
        SectionError::MissingCollaborator {
            section: Some(SectionKind::WallpaperPreview),
            collaborator: "wallpaper_info_factory",
        }
    );
    // Screens without the preview are unaffected.
    assert!(registry
        .section_controllers_for_screen(Screen::HomeScreen, &env.bundle, None)
        .is_ok());
}

thread_local! {
    static BUILT: Cell<usize> = const { Cell::new(0) };
}

fn counting_shortcuts(
    args: &SectionArgs<'_>,
) -> Result<Box<dyn SectionController>, SectionError> {
    BUILT.with(|built| built.set(built.get() + 1));
    Ok(Box::new(ShortcutsSectionController::new(args)))
}

#[test]
fn failure_aborts_the_whole_request() {
    let env = TestBundle::new().without_wallpaper_info().build();
    let registry = SectionRegistry::new(SectionTable::new(vec![
        (
            Screen::LockScreen,
            vec![
                SectionKind::Shortcuts,
                SectionKind::WallpaperPreview,
                SectionKind::Shortcuts,
            ],
        ),
        (Screen::HomeScreen, vec![SectionKind::AppShape]),
    ]))
    .with_factory(SectionKind::Shortcuts, counting_shortcuts);
    BUILT.with(|built| built.set(0));

    let result = registry.section_controllers_for_screen(Screen::LockScreen, &env.bundle, None);

    assert!(matches!(
        result,
        Err(SectionError::MissingCollaborator { .. })
    ));
    // Construction stops at the first failure.
    assert_eq!(BUILT.with(Cell::get), 1);
}

#[test]
fn replaced_factory_is_used_for_its_kind() {
    let env = TestBundle::new().build();
    let registry =
        SectionRegistry::default().with_factory(SectionKind::Shortcuts, counting_shortcuts);
    BUILT.with(|built| built.set(0));

    let controllers = registry
        .section_controllers_for_screen(Screen::LockScreen, &env.bundle, None)
        .unwrap();

    assert_eq!(
        kinds(&controllers),
        vec![SectionKind::Clock, SectionKind::Shortcuts]
    );
    assert_eq!(BUILT.with(Cell::get), 1);
}

#[test]
fn kind_without_factory_is_reported() {
    let env = TestBundle::new().build();
    let registry = SectionRegistry::default().without_factory(SectionKind::AppShape);

    let err = registry
        .section_controllers_for_screen(Screen::HomeScreen, &env.bundle, None)
        .unwrap_err();

    assert_eq!(err, SectionError::UnregisteredSection(SectionKind::AppShape));
    assert!(registry
        .section_controllers_for_screen(Screen::LockScreen, &env.bundle, None)
        .is_ok());
}
