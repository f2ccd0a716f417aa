//! Visual objects and their key-based reconciliation.
//!
//! - [`ObjectKey`]: deterministic identity derived from what an object represents.
//! - [`VisualObject`]: renderer-facing description (world translation, footprint, colour).
//! - [`SceneSynchronizer`]: the live object arena, diffed against each calculation result.
//! - [`ModelRegistry`]: equipment models the renderer can show.
//! - [`events`]: [`LayoutEvent`] and sinks for observing a session.
pub mod events;
pub mod key;
pub mod models;
pub mod object;
pub mod synchronizer;

pub use events::{EventSink, LayoutEvent, VecSink};
pub use key::ObjectKey;
pub use models::{ModelEntry, ModelRegistry};
pub use object::{SceneStyle, VisualKind, VisualObject};
pub use synchronizer::{SceneDiff, SceneSynchronizer};
