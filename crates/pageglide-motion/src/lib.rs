pub mod library;
pub mod scheduler;
pub mod scroll;
mod trigger;
pub mod watch;

pub use library::{init_smoother, AnimationLibrary, InitOptions, SharedAnimationLibrary};
pub use scheduler::{Control, FrameScheduler, SchedulerHandle, TaskHandle};
pub use scroll::{SmoothScroll, SmoothScrollBuilder};
pub use watch::{observe_added, wait_for_element, NavigationWatcher};
