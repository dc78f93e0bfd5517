//! Shared collaborators injected into every section controller.
//!
//! The host owns all of these. A [`CollaboratorBundle`] is assembled once per
//! composition request and handed to the registry behind an `Rc`; every
//! controller built for that request clones the `Rc`, so they all observe the
//! same collaborator instances. Nothing in here is mutated by the registry.

use crate::error::SectionError;
use crate::screen::Screen;
use crate::sections::SectionKind;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

// =============================================================================
// Host surface and lifecycle
// =============================================================================

/// Handle to the surface hosting the sections.
pub trait HostSurface {
    /// Name of the hosting surface, used in logs and headers.
    fn surface_name(&self) -> &str;

    /// Look up a localized resource string.
    fn resource_string(&self, key: &str) -> Option<String>;

    /// Whether the surface is being torn down.
    fn is_finishing(&self) -> bool {
        false
    }
}

/// Lifecycle states of the hosting surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Created,
    Started,
    Resumed,
    Paused,
    Stopped,
    Destroyed,
}

/// Receives lifecycle transitions of the hosting surface.
pub trait LifecycleObserver {
    fn on_state_changed(&self, state: LifecycleState);
}

/// Lets a controller subscribe to lifecycle events of the hosting surface.
pub trait LifecycleOwner {
    fn current_state(&self) -> LifecycleState;
    fn add_observer(&self, observer: Rc<dyn LifecycleObserver>);
}

// =============================================================================
// View models
// =============================================================================

/// An sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Colors extracted from a wallpaper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WallpaperColors {
    pub primary: Rgb,
    #[serde(default)]
    pub secondary: Option<Rgb>,
    #[serde(default)]
    pub tertiary: Option<Rgb>,
}

impl WallpaperColors {
    pub fn new(primary: Rgb) -> Self {
        Self {
            primary,
            secondary: None,
            tertiary: None,
        }
    }

    /// Primary, secondary and tertiary colors that are present.
    pub fn palette(&self) -> Vec<Rgb> {
        std::iter::once(self.primary)
            .chain(self.secondary)
            .chain(self.tertiary)
            .collect()
    }
}

/// Wallpaper colors for both screens, observed by color-dependent sections.
#[derive(Debug, Default)]
pub struct WallpaperColorsViewModel {
    home: RefCell<Option<WallpaperColors>>,
    lock: RefCell<Option<WallpaperColors>>,
}

impl WallpaperColorsViewModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Colors for the wallpaper currently set on `screen`.
    pub fn colors(&self, screen: Screen) -> Option<WallpaperColors> {
        self.slot(screen).borrow().clone()
    }

    pub fn set_colors(&self, screen: Screen, colors: Option<WallpaperColors>) {
        *self.slot(screen).borrow_mut() = colors;
    }

    fn slot(&self, screen: Screen) -> &RefCell<Option<WallpaperColors>> {
        match screen {
            Screen::LockScreen => &self.lock,
            Screen::HomeScreen => &self.home,
        }
    }
}

/// Workspace (launcher) preview state.
#[derive(Debug, Default)]
pub struct WorkspaceViewModel {
    update_requested: Cell<bool>,
}

impl WorkspaceViewModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the host to refresh the workspace preview.
    pub fn request_update(&self) {
        self.update_requested.set(true);
    }

    pub fn should_update_workspace(&self) -> bool {
        self.update_requested.get()
    }

    /// Consume a pending update request.
    pub fn take_update_request(&self) -> bool {
        self.update_requested.replace(false)
    }
}

// =============================================================================
// Gateways
// =============================================================================

/// Callback receiving whether a permission was granted.
pub type PermissionCallback = Box<dyn FnOnce(bool)>;

/// Gateway for runtime permission requests. Result delivery is owned by the
/// implementation and may happen after `request_permission` returns.
pub trait PermissionRequester {
    fn request_permission(&self, permission: &str, on_result: PermissionCallback);
}

/// Opens the full wallpaper preview for a screen.
pub trait WallpaperPreviewNavigator {
    fn show_preview(&self, screen: Screen);
}

/// Navigates from one section to another section's detail surface.
pub trait SectionNavigationController {
    fn navigate_to(&self, section: SectionKind);
}

// =============================================================================
// Read-only providers
// =============================================================================

/// Description of the wallpaper currently applied to a screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WallpaperInfo {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub attributions: Vec<String>,
    #[serde(default)]
    pub is_live: bool,
}

/// Provides info about the wallpaper currently set on a screen.
pub trait CurrentWallpaperInfoFactory {
    fn current_wallpaper_info(&self, screen: Screen) -> Option<WallpaperInfo>;
}

/// Display metrics of the device the picker runs on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayUtils {
    width_px: u32,
    height_px: u32,
    density: f32,
}

impl DisplayUtils {
    /// Non-positive densities are treated as 1.0.
    pub fn new(width_px: u32, height_px: u32, density: f32) -> Self {
        let density = if density > 0.0 { density } else { 1.0 };
        Self {
            width_px,
            height_px,
            density,
        }
    }

    pub fn width_px(&self) -> u32 {
        self.width_px
    }

    pub fn height_px(&self) -> u32 {
        self.height_px
    }

    pub fn density(&self) -> f32 {
        self.density
    }

    pub fn is_landscape(&self) -> bool {
        self.width_px > self.height_px
    }

    /// Smallest side of the display in density-independent pixels.
    pub fn smallest_width_dp(&self) -> u32 {
        (self.width_px.min(self.height_px) as f32 / self.density).round() as u32
    }
}

impl Default for DisplayUtils {
    fn default() -> Self {
        Self::new(1080, 2400, 2.625)
    }
}

// =============================================================================
// Restored state
// =============================================================================

/// Opaque snapshot of section state saved before a surface is re-created.
///
/// Keys are owned by the sections that write them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SavedState {
    entries: BTreeMap<String, serde_json::Value>,
}

impl SavedState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put<T: Serialize>(&mut self, key: impl Into<String>, value: &T) -> serde_json::Result<()> {
        let value = serde_json::to_value(value)?;
        self.entries.insert(key.into(), value);
        Ok(())
    }

    /// Read a value back. Returns `None` when the key is absent or holds a
    /// value of a different shape.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.entries.get(key)?;
        match serde_json::from_value(value.clone()) {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::debug!("Ignoring saved state '{}': {}", key, e);
                None
            }
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// =============================================================================
// Bundle
// =============================================================================

/// Read-only aggregate of everything a section controller may need.
pub struct CollaboratorBundle {
    pub host: Rc<dyn HostSurface>,
    pub lifecycle_owner: Rc<dyn LifecycleOwner>,
    pub wallpaper_colors: Rc<WallpaperColorsViewModel>,
    pub workspace: Rc<WorkspaceViewModel>,
    pub permission_requester: Rc<dyn PermissionRequester>,
    pub preview_navigator: Rc<dyn WallpaperPreviewNavigator>,
    pub section_navigator: Rc<dyn SectionNavigationController>,
    /// Absent when the caller composes a surface without wallpaper info.
    pub wallpaper_info_factory: Option<Rc<dyn CurrentWallpaperInfoFactory>>,
    pub display_utils: Rc<DisplayUtils>,
}

impl CollaboratorBundle {
    pub fn builder() -> CollaboratorBundleBuilder {
        CollaboratorBundleBuilder::default()
    }

    /// The wallpaper info factory, or the error `section` fails with when the
    /// bundle was built without one.
    pub fn require_wallpaper_info_factory(
        &self,
        section: SectionKind,
    ) -> Result<&Rc<dyn CurrentWallpaperInfoFactory>, SectionError> {
        self.wallpaper_info_factory
            .as_ref()
            .ok_or_else(|| SectionError::missing_for(section, "wallpaper_info_factory"))
    }
}

impl fmt::Debug for CollaboratorBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollaboratorBundle")
            .field("host", &self.host.surface_name())
            .field("lifecycle_state", &self.lifecycle_owner.current_state())
            .field("has_wallpaper_info_factory", &self.wallpaper_info_factory.is_some())
            .field("display_utils", &self.display_utils)
            .finish_non_exhaustive()
    }
}

/// Builder for [`CollaboratorBundle`].
#[derive(Default)]
pub struct CollaboratorBundleBuilder {
    host: Option<Rc<dyn HostSurface>>,
    lifecycle_owner: Option<Rc<dyn LifecycleOwner>>,
    wallpaper_colors: Option<Rc<WallpaperColorsViewModel>>,
    workspace: Option<Rc<WorkspaceViewModel>>,
    permission_requester: Option<Rc<dyn PermissionRequester>>,
    preview_navigator: Option<Rc<dyn WallpaperPreviewNavigator>>,
    section_navigator: Option<Rc<dyn SectionNavigationController>>,
    wallpaper_info_factory: Option<Rc<dyn CurrentWallpaperInfoFactory>>,
    display_utils: Option<Rc<DisplayUtils>>,
}

impl CollaboratorBundleBuilder {
    pub fn host(mut self, host: Rc<dyn HostSurface>) -> Self {
        self.host = Some(host);
        self
    }

    pub fn lifecycle_owner(mut self, owner: Rc<dyn LifecycleOwner>) -> Self {
        self.lifecycle_owner = Some(owner);
        self
    }

    pub fn wallpaper_colors(mut self, view_model: Rc<WallpaperColorsViewModel>) -> Self {
        self.wallpaper_colors = Some(view_model);
        self
    }

    pub fn workspace(mut self, view_model: Rc<WorkspaceViewModel>) -> Self {
        self.workspace = Some(view_model);
        self
    }

    pub fn permission_requester(mut self, requester: Rc<dyn PermissionRequester>) -> Self {
        self.permission_requester = Some(requester);
        self
    }

    pub fn preview_navigator(mut self, navigator: Rc<dyn WallpaperPreviewNavigator>) -> Self {
        self.preview_navigator = Some(navigator);
        self
    }

    pub fn section_navigator(mut self, navigator: Rc<dyn SectionNavigationController>) -> Self {
        self.section_navigator = Some(navigator);
        self
    }

    pub fn wallpaper_info_factory(mut self, factory: Rc<dyn CurrentWallpaperInfoFactory>) -> Self {
        self.wallpaper_info_factory = Some(factory);
        self
    }

    pub fn display_utils(mut self, display_utils: Rc<DisplayUtils>) -> Self {
        self.display_utils = Some(display_utils);
        self
    }

    /// Assemble the bundle. Every member except the wallpaper info factory
    /// is required.
    pub fn build(self) -> Result<Rc<CollaboratorBundle>, SectionError> {
        fn required<T: ?Sized>(
            value: Option<Rc<T>>,
            collaborator: &'static str,
        ) -> Result<Rc<T>, SectionError> {
            value.ok_or(SectionError::MissingCollaborator {
                section: None,
                collaborator,
            })
        }

        Ok(Rc::new(CollaboratorBundle {
            host: required(self.host, "host")?,
            lifecycle_owner: required(self.lifecycle_owner, "lifecycle_owner")?,
            wallpaper_colors: required(self.wallpaper_colors, "wallpaper_colors")?,
            workspace: required(self.workspace, "workspace")?,
            permission_requester: required(self.permission_requester, "permission_requester")?,
            preview_navigator: required(self.preview_navigator, "preview_navigator")?,
            section_navigator: required(self.section_navigator, "section_navigator")?,
            wallpaper_info_factory: self.wallpaper_info_factory,
            display_utils: required(self.display_utils, "display_utils")?,
        }))
    }
}
