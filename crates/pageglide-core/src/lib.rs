pub mod config;
pub mod error;
pub mod facade;
pub mod page;

pub use config::{AppConfig, ScrollConfig, SmootherConfig, WatchConfig};
pub use error::{Error, Result};
pub use page::{Document, ElementId, PageSnapshot, Selector, Viewport};
