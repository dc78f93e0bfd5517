//! Shared fixtures for composition tests.
//!
//! Provides `TestBundle` - a collaborator bundle made of recording fakes, so
//! tests can assert on exactly what the section controllers did with their
//! collaborators.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use customizer::collaborators::{
    CollaboratorBundle, CurrentWallpaperInfoFactory, DisplayUtils, HostSurface, LifecycleObserver,
    LifecycleOwner, LifecycleState, PermissionCallback, PermissionRequester,
    SectionNavigationController, WallpaperColorsViewModel, WallpaperInfo,
    WallpaperPreviewNavigator, WorkspaceViewModel,
};
use customizer::{Screen, SectionController, SectionControllers, SectionKind};

pub struct FakeHost;

impl HostSurface for FakeHost {
    fn surface_name(&self) -> &str {
        "test-host"
    }

    fn resource_string(&self, key: &str) -> Option<String> {
        Some(format!("res:{key}"))
    }
}

pub struct FakeLifecycle {
    state: Cell<LifecycleState>,
    observers: RefCell<Vec<Rc<dyn LifecycleObserver>>>,
}

#[allow(dead_code)]
impl FakeLifecycle {
    pub fn observer_count(&self) -> usize {
        self.observers.borrow().len()
    }

    pub fn move_to(&self, state: LifecycleState) {
        self.state.set(state);
        for observer in self.observers.borrow().iter() {
            observer.on_state_changed(state);
        }
    }
}

impl LifecycleOwner for FakeLifecycle {
    fn current_state(&self) -> LifecycleState {
        self.state.get()
    }

    fn add_observer(&self, observer: Rc<dyn LifecycleObserver>) {
        self.observers.borrow_mut().push(observer);
    }
}

/// Records permission requests and answers them with a fixed result.
pub struct RecordingPermissionRequester {
    pub grant: bool,
    pub requests: RefCell<Vec<String>>,
}

impl PermissionRequester for RecordingPermissionRequester {
    fn request_permission(&self, permission: &str, on_result: PermissionCallback) {
        self.requests.borrow_mut().push(permission.to_string());
        on_result(self.grant);
    }
}

#[derive(Default)]
pub struct RecordingNavigator {
    pub previews: RefCell<Vec<Screen>>,
    pub sections: RefCell<Vec<SectionKind>>,
}

impl WallpaperPreviewNavigator for RecordingNavigator {
    fn show_preview(&self, screen: Screen) {
        self.previews.borrow_mut().push(screen);
    }
}

impl SectionNavigationController for RecordingNavigator {
    fn navigate_to(&self, section: SectionKind) {
        self.sections.borrow_mut().push(section);
    }
}

pub struct FakeWallpaperInfo;

impl CurrentWallpaperInfoFactory for FakeWallpaperInfo {
    fn current_wallpaper_info(&self, screen: Screen) -> Option<WallpaperInfo> {
        Some(WallpaperInfo {
            id: format!("test/{screen}"),
            title: format!("{} wallpaper", screen.title()),
            attributions: Vec::new(),
            is_live: false,
        })
    }
}

/// A bundle plus handles on the fakes inside it.
#[allow(dead_code)]
pub struct TestBundle {
    pub bundle: Rc<CollaboratorBundle>,
    pub lifecycle: Rc<FakeLifecycle>,
    pub permissions: Rc<RecordingPermissionRequester>,
    pub navigator: Rc<RecordingNavigator>,
    pub workspace: Rc<WorkspaceViewModel>,
}

/// Fluent configuration for `TestBundle`.
pub struct TestBundleBuilder {
    grant_permissions: bool,
    wallpaper_info: bool,
    display: DisplayUtils,
    state: LifecycleState,
}

impl Default for TestBundleBuilder {
    fn default() -> Self {
        Self {
            grant_permissions: true,
            wallpaper_info: true,
            display: DisplayUtils::default(),
            state: LifecycleState::Resumed,
        }
    }
}

#[allow(dead_code)]
impl TestBundleBuilder {
    pub fn deny_permissions(mut self) -> Self {
        self.grant_permissions = false;
        self
    }

    pub fn without_wallpaper_info(mut self) -> Self {
        self.wallpaper_info = false;
        self
    }

    pub fn display(mut self, display: DisplayUtils) -> Self {
        self.display = display;
        self
    }

    pub fn lifecycle_state(mut self, state: LifecycleState) -> Self {
        self.state = state;
        self
    }

    pub fn build(self) -> TestBundle {
        let lifecycle = Rc::new(FakeLifecycle {
            state: Cell::new(self.state),
            observers: RefCell::new(Vec::new()),
        });
        let permissions = Rc::new(RecordingPermissionRequester {
            grant: self.grant_permissions,
            requests: RefCell::new(Vec::new()),
        });
        let navigator = Rc::new(RecordingNavigator::default());
        let workspace = Rc::new(WorkspaceViewModel::new());

        let mut builder = CollaboratorBundle::builder()
            .host(Rc::new(FakeHost))
            .lifecycle_owner(lifecycle.clone())
            .wallpaper_colors(Rc::new(WallpaperColorsViewModel::new()))
            .workspace(Rc::clone(&workspace))
            .permission_requester(permissions.clone())
            .preview_navigator(navigator.clone())
            .section_navigator(navigator.clone())
            .display_utils(Rc::new(self.display));
        if self.wallpaper_info {
            builder = builder.wallpaper_info_factory(Rc::new(FakeWallpaperInfo));
        }

        TestBundle {
            bundle: builder.build().expect("test bundle is complete"),
            lifecycle,
            permissions,
            navigator,
            workspace,
        }
    }
}

impl TestBundle {
    pub fn new() -> TestBundleBuilder {
        TestBundleBuilder::default()
    }
}

/// Section kinds of `controllers`, in order.
#[allow(dead_code)]
pub fn kinds(controllers: &SectionControllers) -> Vec<SectionKind> {
    controllers.iter().map(|c| c.kind()).collect()
}

/// Address of a boxed controller, for identity comparisons.
#[allow(dead_code)]
pub fn addr(controller: &dyn SectionController) -> *const () {
    std::ptr::from_ref(controller).cast::<()>()
}
