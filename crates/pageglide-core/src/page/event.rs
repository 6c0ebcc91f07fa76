/// Event name used for wheel input.
pub const WHEEL: &str = "wheel";

/// Handle to an attached event handler, used to detach it later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(pub(crate) u64);

/// An event flowing through [`Document::dispatch`](super::document::Document::dispatch).
#[derive(Debug, Clone)]
pub struct PageEvent {
    name: String,
    /// Vertical wheel payload in pixels, positive scrolling down. Zero for
    /// non-wheel events.
    pub delta_y: f64,
    default_prevented: bool,
}

impl PageEvent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            delta_y: 0.0,
            default_prevented: false,
        }
    }

    pub fn wheel(delta_y: f64) -> Self {
        Self {
            name: WHEEL.to_string(),
            delta_y,
            default_prevented: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Suppress the document's native reaction to this event.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}
