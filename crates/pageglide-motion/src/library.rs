//! Seam to the external animation/scroll-trigger library.
//!
//! The toolkit never talks to a real animation runtime; hosts adapt theirs
//! behind [`AnimationLibrary`] and hand it in as a shared handle. Everything
//! here degrades to a quiet no-op when no library is present.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use tracing::debug;

use pageglide_core::config::SmootherConfig;
use pageglide_core::facade::{wrap_page_content, WrapOptions};
use pageglide_core::page::{Document, Rect};

/// Plugins that must be registered before a smoother can be created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LibraryPlugin {
    ScrollTrigger,
    Smoother,
}

/// The slice of the external library the toolkit drives.
pub trait AnimationLibrary {
    fn register_plugins(&mut self, plugins: &[LibraryPlugin]);
    fn create_smoother(&mut self, options: &SmootherOptions);
    fn set_scroller_proxy(&mut self, proxy: ScrollerProxy);
    fn refresh(&mut self);
}

/// Shared handle to a library instance, single-threaded like everything else
/// in the toolkit.
pub type SharedAnimationLibrary = Rc<RefCell<dyn AnimationLibrary>>;

/// Configuration handed to the library's smoother.
///
/// `wrapper` and `content` are element selectors, not bare ids.
#[derive(Debug, Clone, PartialEq)]
pub struct SmootherOptions {
    pub wrapper: String,
    pub content: String,
    /// Catch-up duration factor.
    pub smooth: f64,
    /// Enable data-speed / parallax effects.
    pub effects: bool,
    /// Touch smoothing factor.
    pub smooth_touch: f64,
}

impl Default for SmootherOptions {
    fn default() -> Self {
        Self::from(&SmootherConfig::default())
    }
}

impl From<&SmootherConfig> for SmootherOptions {
    fn from(config: &SmootherConfig) -> Self {
        Self {
            wrapper: format!("#{}", config.wrapper_id),
            content: format!("#{}", config.content_id),
            smooth: config.smooth,
            effects: config.effects,
            smooth_touch: config.smooth_touch,
        }
    }
}

impl SmootherOptions {
    /// Overlay caller-supplied fields onto these options.
    pub fn merged(self, overrides: &SmootherOverrides) -> Self {
        Self {
            wrapper: overrides.wrapper.clone().unwrap_or(self.wrapper),
            content: overrides.content.clone().unwrap_or(self.content),
            smooth: overrides.smooth.unwrap_or(self.smooth),
            effects: overrides.effects.unwrap_or(self.effects),
            smooth_touch: overrides.smooth_touch.unwrap_or(self.smooth_touch),
        }
    }
}

/// Partial [`SmootherOptions`]: only the set fields override the defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SmootherOverrides {
    pub wrapper: Option<String>,
    pub content: Option<String>,
    pub smooth: Option<f64>,
    pub effects: Option<bool>,
    pub smooth_touch: Option<f64>,
}

/// Scroll position source registered with the library in place of the
/// native document offset.
///
/// The getter reports the interpolated position, the setter reseats it.
/// Since no real scrollable container exists the bounding rectangle is
/// synthetic: viewport-sized, at the origin, fixed at registration time.
pub struct ScrollerProxy {
    get: Box<dyn Fn() -> f64>,
    set: Box<dyn Fn(f64)>,
    rect: Rect,
}

impl ScrollerProxy {
    pub fn new(
        get: impl Fn() -> f64 + 'static,
        set: impl Fn(f64) + 'static,
        rect: Rect,
    ) -> Self {
        Self {
            get: Box::new(get),
            set: Box::new(set),
            rect,
        }
    }

    /// Current scroll position as the library should see it.
    pub fn scroll_top(&self) -> f64 {
        (self.get)()
    }

    /// Reposition the scroller. Offsets move immediately; the page is
    /// updated when the frame in flight applies them.
    pub fn set_scroll_top(&self, position: f64) {
        (self.set)(position)
    }

    pub fn bounding_rect(&self) -> Rect {
        self.rect
    }
}

impl fmt::Debug for ScrollerProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollerProxy")
            .field("scroll_top", &self.scroll_top())
            .field("rect", &self.rect)
            .finish_non_exhaustive()
    }
}

/// Options for [`init_smoother`].
#[derive(Default)]
pub struct InitOptions {
    pub wrap: WrapOptions,
    pub smoother: SmootherOverrides,
    /// Invoked after the smoother is created.
    pub post_init: Option<Box<dyn FnOnce(&mut Document)>>,
}

impl InitOptions {
    /// Seed wrap ids and smoother overrides from configuration.
    pub fn from_config(config: &SmootherConfig) -> Self {
        Self {
            wrap: WrapOptions {
                wrapper_id: config.wrapper_id.clone(),
                content_id: config.content_id.clone(),
                target_selector: None,
            },
            smoother: SmootherOverrides {
                wrapper: Some(format!("#{}", config.wrapper_id)),
                content: Some(format!("#{}", config.content_id)),
                smooth: Some(config.smooth),
                effects: Some(config.effects),
                smooth_touch: Some(config.smooth_touch),
            },
            post_init: None,
        }
    }
}

impl fmt::Debug for InitOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InitOptions")
            .field("wrap", &self.wrap)
            .field("smoother", &self.smoother)
            .field("post_init", &self.post_init.is_some())
            .finish()
    }
}

/// Set up library-driven smooth scrolling on a page.
///
/// Registers the scroll-trigger and smoother plugins, ensures the
/// wrapper/content pair exists, creates the smoother with the merged
/// options and finally runs the completion callback. With no library
/// nothing is touched; returns whether initialization happened.
pub fn init_smoother(
    doc: &mut Document,
    lib: Option<&SharedAnimationLibrary>,
    options: InitOptions,
) -> bool {
    let Some(lib) = lib else {
        debug!("no animation library; smoother not initialized");
        return false;
    };

    lib.borrow_mut()
        .register_plugins(&[LibraryPlugin::ScrollTrigger, LibraryPlugin::Smoother]);

    let outcome = wrap_page_content(doc, &options.wrap);
    debug!(?outcome, "content wrap ensured");

    let merged = SmootherOptions::default().merged(&options.smoother);
    lib.borrow_mut().create_smoother(&merged);

    if let Some(post_init) = options.post_init {
        post_init(doc);
    }
    true
}
