//! Terminal implementations of the section collaborators.
//!
//! These back the preview application and the `sections` command. Anything
//! that needs a real device (permission dialogs, full-screen previews) is
//! recorded or logged instead.

use crate::collaborators::{
    CollaboratorBundle, CurrentWallpaperInfoFactory, DisplayUtils, HostSurface, LifecycleObserver,
    LifecycleOwner, LifecycleState, PermissionCallback, PermissionRequester, Rgb,
    SectionNavigationController, WallpaperColors, WallpaperColorsViewModel, WallpaperInfo,
    WallpaperPreviewNavigator, WorkspaceViewModel,
};
use crate::error::SectionError;
use crate::screen::Screen;
use crate::sections::SectionKind;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tracing::{debug, info};

/// The terminal window hosting the preview.
#[derive(Debug)]
pub struct TerminalHost {
    name: String,
    finishing: Cell<bool>,
}

impl TerminalHost {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            finishing: Cell::new(false),
        }
    }

    pub fn finish(&self) {
        self.finishing.set(true);
    }
}

impl HostSurface for TerminalHost {
    fn surface_name(&self) -> &str {
        &self.name
    }

    fn resource_string(&self, key: &str) -> Option<String> {
        let value = match key {
            "lock_screen_tab" => "Lock screen",
            "home_screen_tab" => "Home screen",
            "all_screens_tab" => "All",
            _ => return None,
        };
        Some(value.to_string())
    }

    fn is_finishing(&self) -> bool {
        self.finishing.get()
    }
}

/// Lifecycle of one composition. Observers live as long as the registry.
pub struct LifecycleRegistry {
    state: Cell<LifecycleState>,
    observers: RefCell<Vec<Rc<dyn LifecycleObserver>>>,
}

impl LifecycleRegistry {
    pub fn new(state: LifecycleState) -> Self {
        Self {
            state: Cell::new(state),
            observers: RefCell::new(Vec::new()),
        }
    }

    /// Move to `state` and notify every observer.
    pub fn dispatch(&self, state: LifecycleState) {
        self.state.set(state);
        // Observers may register further observers while being notified.
        let observers = self.observers.borrow().clone();
        debug!("Lifecycle -> {:?} ({} observers)", state, observers.len());
        for observer in observers {
            observer.on_state_changed(state);
        }
    }

    pub fn observer_count(&self) -> usize {
        self.observers.borrow().len()
    }
}

impl LifecycleOwner for LifecycleRegistry {
    fn current_state(&self) -> LifecycleState {
        self.state.get()
    }

    fn add_observer(&self, observer: Rc<dyn LifecycleObserver>) {
        self.observers.borrow_mut().push(observer);
    }
}

/// Grants every permission straight away and remembers what was asked.
#[derive(Debug, Default)]
pub struct GrantingPermissionRequester {
    requested: RefCell<Vec<String>>,
}

impl GrantingPermissionRequester {
    pub fn requested(&self) -> Vec<String> {
        self.requested.borrow().clone()
    }
}

impl PermissionRequester for GrantingPermissionRequester {
    fn request_permission(&self, permission: &str, on_result: PermissionCallback) {
        info!("Granting permission {}", permission);
        self.requested.borrow_mut().push(permission.to_string());
        on_result(true);
    }
}

/// Navigation requests waiting for the app loop to act on them.
#[derive(Debug, Default)]
pub struct PendingNavigation {
    preview: Cell<Option<Screen>>,
    section: Cell<Option<SectionKind>>,
}

impl PendingNavigation {
    pub fn take_preview(&self) -> Option<Screen> {
        self.preview.take()
    }

    pub fn take_section(&self) -> Option<SectionKind> {
        self.section.take()
    }
}

impl WallpaperPreviewNavigator for PendingNavigation {
    fn show_preview(&self, screen: Screen) {
        self.preview.set(Some(screen));
    }
}

impl SectionNavigationController for PendingNavigation {
    fn navigate_to(&self, section: SectionKind) {
        self.section.set(Some(section));
    }
}

/// Wallpaper info that never changes.
#[derive(Debug, Clone, Default)]
pub struct StaticWallpaperInfoFactory {
    lock: Option<WallpaperInfo>,
    home: Option<WallpaperInfo>,
}

impl StaticWallpaperInfoFactory {
    pub fn new(lock: Option<WallpaperInfo>, home: Option<WallpaperInfo>) -> Self {
        Self { lock, home }
    }

    /// Same built-in wallpaper on both screens.
    pub fn builtin() -> Self {
        let info = WallpaperInfo {
            id: "builtin/default".to_string(),
            title: "Default wallpaper".to_string(),
            attributions: vec!["Built-in".to_string()],
            is_live: false,
        };
        Self::new(Some(info.clone()), Some(info))
    }
}

impl CurrentWallpaperInfoFactory for StaticWallpaperInfoFactory {
    fn current_wallpaper_info(&self, screen: Screen) -> Option<WallpaperInfo> {
        match screen {
            Screen::LockScreen => self.lock.clone(),
            Screen::HomeScreen => self.home.clone(),
        }
    }
}

/// Long-lived collaborators owned by the host.
///
/// A new bundle is assembled from these for every composition request; only
/// the lifecycle registry is specific to the request.
pub struct HostCollaborators {
    pub host: Rc<TerminalHost>,
    pub wallpaper_colors: Rc<WallpaperColorsViewModel>,
    pub workspace: Rc<WorkspaceViewModel>,
    pub permissions: Rc<GrantingPermissionRequester>,
    pub navigation: Rc<PendingNavigation>,
    pub wallpaper_info: Option<Rc<StaticWallpaperInfoFactory>>,
    pub display_utils: Rc<DisplayUtils>,
}

impl HostCollaborators {
    pub fn new(display_utils: DisplayUtils) -> Self {
        let wallpaper_colors = WallpaperColorsViewModel::new();
        let colors = WallpaperColors {
            primary: Rgb(0x3a, 0x5f, 0x8c),
            secondary: Some(Rgb(0xd9, 0xa4, 0x41)),
            tertiary: Some(Rgb(0x2f, 0x2b, 0x3a)),
        };
        for screen in Screen::all() {
            wallpaper_colors.set_colors(screen, Some(colors.clone()));
        }

        Self {
            host: Rc::new(TerminalHost::new("customizer")),
            wallpaper_colors: Rc::new(wallpaper_colors),
            workspace: Rc::new(WorkspaceViewModel::new()),
            permissions: Rc::new(GrantingPermissionRequester::default()),
            navigation: Rc::new(PendingNavigation::default()),
            wallpaper_info: Some(Rc::new(StaticWallpaperInfoFactory::builtin())),
            display_utils: Rc::new(display_utils),
        }
    }

    /// Drop the wallpaper info factory, as callers composing without one do.
    pub fn without_wallpaper_info(mut self) -> Self {
        self.wallpaper_info = None;
        self
    }

    /// Assemble the bundle for one composition request.
    pub fn bundle(
        &self,
        lifecycle: &Rc<LifecycleRegistry>,
    ) -> Result<Rc<CollaboratorBundle>, SectionError> {
        let mut builder = CollaboratorBundle::builder()
            .host(self.host.clone())
            .lifecycle_owner(lifecycle.clone())
            .wallpaper_colors(Rc::clone(&self.wallpaper_colors))
            .workspace(Rc::clone(&self.workspace))
            .permission_requester(self.permissions.clone())
            .preview_navigator(self.navigation.clone())
            .section_navigator(self.navigation.clone())
            .display_utils(Rc::clone(&self.display_utils));
        if let Some(factory) = &self.wallpaper_info {
            builder = builder.wallpaper_info_factory(factory.clone());
        }
        builder.build()
    }
}
