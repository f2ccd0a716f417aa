#![forbid(unsafe_code)]

mod rendering;
pub mod services;

pub use rendering::{
    init_tracing, render_layout, render_layout_to_png, render_zone_matrix,
    render_zone_matrix_to_png, RenderConfig,
};
pub use services::{demo_catalog, demo_models, BandGenerator, CatalogEntry, GreedyPlacer};
