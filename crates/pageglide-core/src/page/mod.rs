pub mod builder;
pub mod document;
pub mod element;
pub mod event;
pub mod geometry;
pub mod mutation;
pub mod selector;
pub mod snapshot;
pub mod style;

pub use document::Document;
pub use element::{Content, Element, ElementId};
pub use event::{HandlerId, PageEvent, WHEEL};
pub use geometry::{Rect, Viewport};
pub use mutation::MutationBatch;
pub use selector::Selector;
pub use snapshot::{NodeSnapshot, PageSnapshot};
pub use style::InlineStyle;
