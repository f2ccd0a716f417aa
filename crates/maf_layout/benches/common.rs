#![allow(dead_code)]

use std::time::Duration;

use criterion::{Criterion, Throughput};
use glam::DVec2;
use maf_layout::prelude::{CoordinateFrame, GeoCoord};

pub const SAMPLE_SIZE: usize = 20;
pub const WARM_UP: Duration = Duration::from_secs(1);
pub const MEASUREMENT_TIME: Duration = Duration::from_secs(2);

pub fn default_criterion() -> Criterion {
    Criterion::default()
        .configure_from_args()
        .sample_size(SAMPLE_SIZE)
        .warm_up_time(WARM_UP)
        .measurement_time(MEASUREMENT_TIME)
}

pub fn elements_throughput(elements: usize) -> Throughput {
    Throughput::Elements(elements.max(1) as u64)
}

pub fn origin() -> GeoCoord {
    GeoCoord::new(37.617698, 55.755864)
}

/// Regular polygon in local metres, slightly rotated so the frame is not axis aligned.
pub fn polygon(vertices: usize, radius: f64) -> Vec<DVec2> {
    let step = std::f64::consts::TAU / vertices as f64;
    (0..vertices)
        .map(|i| {
            let a = 0.3 + step * i as f64;
            DVec2::new(radius * (1.0 + a.cos()), radius * (1.0 + a.sin()))
        })
        .collect()
}

/// Geographic ring for [`polygon`].
pub fn geo_polygon(vertices: usize, radius: f64) -> Vec<GeoCoord> {
    let frame = CoordinateFrame::new(origin(), 1.0);
    polygon(vertices, radius)
        .into_iter()
        .map(|p| frame.to_geo(p))
        .collect()
}
