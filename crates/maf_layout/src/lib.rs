#![forbid(unsafe_code)]
//! maf_layout: tile-grid painting and scene synchronization for playground equipment layouts.
//!
//! Modules:
//! - grid: geographic projection, rotation-aligned coordinate frame, boundary rasterization,
//!   zone matrix
//! - paint: brushes and square-stamp painting constrained to the site boundary
//! - request: debounced, sequence-numbered dispatch of generation and calculation requests
//! - service: request/response contracts of the external services
//! - scene: stable object keys, visual objects, key-based reconciliation, events
//! - session: orchestration of all of the above for one operator
//!
//! Renderers and service clients live outside this crate; see `bevy_maf_layout` for a
//! Bevy integration.
pub mod config;
pub mod error;
pub mod grid;
pub mod paint;
pub mod request;
pub mod scene;
pub mod service;
pub mod session;
pub mod site;

/// Convenient re-exports for common types. Import with `use maf_layout::prelude::*;`.
pub mod prelude {
    pub use crate::config::LayoutConfig;
    pub use crate::error::{Error, Result};
    pub use crate::grid::{
        BoundaryTiles, CoordinateFrame, GeoCoord, RasterizedShape, ShapeRasterizer, TileBounds,
        TileCoord, Zone, ZoneMatrix,
    };
    pub use crate::paint::{Brush, BrushPainter, StampResult};
    pub use crate::request::{Dispatch, RequestCoordinator, RequestTicket};
    pub use crate::scene::{
        EventSink, LayoutEvent, ModelEntry, ModelRegistry, ObjectKey, SceneDiff, SceneStyle,
        SceneSynchronizer, VecSink, VisualKind, VisualObject,
    };
    pub use crate::service::{
        CalculationRequest, CalculationResponse, CalculationService, EquipmentItem,
        GenerationRequest, GenerationResponse, GenerationService, ServiceKind, Slot,
        ZonePreferences,
    };
    pub use crate::session::{
        Cursor, DriveReport, LayoutSession, LayoutSummary, PlacedEquipment, SiteParameters,
    };
    pub use crate::site::{CameraPose, Site, SiteCatalog};
}
