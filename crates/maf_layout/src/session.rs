//! Orchestration of one operator session.
//!
//! [`LayoutSession`] owns the pieces that make up a layout and moves data between them:
//! pointer positions go through the [`CoordinateFrame`] into the [`BrushPainter`], changed
//! tiles become debounced calculation requests on the [`RequestCoordinator`], and accepted
//! responses are reconciled into the scene by the [`SceneSynchronizer`].
//!
//! The session never talks to a network itself. The caller polls due [`Dispatch`]es, runs
//! them however it likes (a thread pool, an async task, or synchronously through
//! [`LayoutSession::drive`]) and hands the responses back with their tickets.
use std::time::Duration;

use glam::Vec3;
use tracing::{debug, info, warn};

use crate::config::LayoutConfig;
use crate::error::{Error, Result};
use crate::grid::{
    BoundaryTiles, CoordinateFrame, GeoCoord, RasterizedShape, ShapeRasterizer, TileCoord, Zone,
    ZoneMatrix,
};
use crate::paint::{Brush, BrushPainter, StampResult};
use crate::request::{Dispatch, RequestCoordinator, RequestTicket};
use crate::scene::{
    EventSink, LayoutEvent, ModelEntry, ModelRegistry, SceneDiff, SceneSynchronizer, VisualObject,
};
use crate::service::{
    CalculationRequest, CalculationResponse, CalculationService, GenerationRequest,
    GenerationResponse, GenerationService, ServiceKind, ZonePreferences,
};
use crate::site::Site;

/// Parameters the operator can change while a site is set up.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SiteParameters {
    pub budget: u64,
    pub providers: Vec<String>,
    pub zone_preferences: ZonePreferences,
}

impl SiteParameters {
    fn from_site(site: &Site) -> Self {
        Self {
            budget: site.budget,
            providers: site.providers.clone(),
            zone_preferences: site.zone_preferences,
        }
    }
}

/// Brush cursor as the renderer should draw it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cursor {
    pub tile: TileCoord,
    /// Centre of the tile in world space, on the ground.
    pub translation: Vec3,
    /// Edge length of the stamped square in tiles.
    pub extent: u32,
    pub rotation: f32,
}

/// Equipment placed by the last applied calculation.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedEquipment {
    pub key: String,
    pub name: String,
    pub provider: String,
    pub cost: f64,
}

/// Cost overview of the last applied calculation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayoutSummary {
    pub equipment: Vec<PlacedEquipment>,
    /// Sum of the whole-unit part of every cost.
    pub total_cost: u64,
    pub budget: u64,
}

impl LayoutSummary {
    fn from_response(response: &CalculationResponse, budget: u64) -> Self {
        let equipment: Vec<PlacedEquipment> = response
            .equipment()
            .map(|(_, item)| PlacedEquipment {
                key: item.key.clone(),
                name: item.name.clone(),
                provider: item.provider.clone(),
                cost: item.cost,
            })
            .collect();
        let total_cost = equipment.iter().map(|e| e.cost.max(0.0).floor() as u64).sum();
        Self {
            equipment,
            total_cost,
            budget,
        }
    }

    pub fn is_over_budget(&self) -> bool {
        self.total_cost > self.budget
    }

    /// Budget left, negative when over budget.
    pub fn remaining(&self) -> i64 {
        self.budget as i64 - self.total_cost as i64
    }
}

/// What a [`LayoutSession::drive`] call did.
#[derive(Debug, Default)]
pub struct DriveReport {
    pub dispatched: usize,
    pub generations_applied: usize,
    pub calculations_applied: usize,
    pub stale_discarded: usize,
    pub added: usize,
    pub removed: usize,
    /// Failed service calls; the scene kept its previous state for each.
    pub failures: Vec<Error>,
}

impl DriveReport {
    pub fn is_idle(&self) -> bool {
        self.dispatched == 0
    }
}

#[derive(Clone, Debug)]
struct ActiveSite {
    site: Site,
    params: SiteParameters,
    frame: CoordinateFrame,
    shape: RasterizedShape,
    matrix: ZoneMatrix,
}

/// State of one operator session on one site at a time.
#[derive(Debug)]
pub struct LayoutSession {
    config: LayoutConfig,
    active: Option<ActiveSite>,
    painter: BrushPainter,
    coordinator: RequestCoordinator,
    scene: SceneSynchronizer,
    summary: LayoutSummary,
}

impl Default for LayoutSession {
    fn default() -> Self {
        Self::with_valid_config(LayoutConfig::default())
    }
}

impl LayoutSession {
    /// Creates a session without a site. Fails if `config` does not validate.
    pub fn new(config: LayoutConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_valid_config(config))
    }

    fn with_valid_config(config: LayoutConfig) -> Self {
        Self {
            painter: BrushPainter::new(config.max_brush_radius),
            coordinator: RequestCoordinator::new(config.debounce),
            scene: SceneSynchronizer::new(config.scene_style()),
            summary: LayoutSummary::default(),
            active: None,
            config,
        }
    }

    pub fn with_models(mut self, models: ModelRegistry) -> Self {
        self.scene.models_mut().extend_from(&models);
        self
    }

    pub fn register_model(&mut self, name: impl Into<String>, entry: ModelEntry) {
        self.scene.models_mut().register(name, entry);
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn site(&self) -> Option<&Site> {
        self.active.as_ref().map(|a| &a.site)
    }

    pub fn parameters(&self) -> Option<&SiteParameters> {
        self.active.as_ref().map(|a| &a.params)
    }

    pub fn frame(&self) -> Option<&CoordinateFrame> {
        self.active.as_ref().map(|a| &a.frame)
    }

    pub fn boundary(&self) -> Option<&BoundaryTiles> {
        self.active.as_ref().map(|a| &a.shape.boundary)
    }

    pub fn matrix(&self) -> Option<&ZoneMatrix> {
        self.active.as_ref().map(|a| &a.matrix)
    }

    pub fn scene(&self) -> &SceneSynchronizer {
        &self.scene
    }

    pub fn painter(&self) -> &BrushPainter {
        &self.painter
    }

    pub fn coordinator(&self) -> &RequestCoordinator {
        &self.coordinator
    }

    pub fn summary(&self) -> &LayoutSummary {
        &self.summary
    }

    fn active(&self) -> Result<&ActiveSite> {
        self.active.as_ref().ok_or(Error::NoSite)
    }

    fn active_mut(&mut self) -> Result<&mut ActiveSite> {
        self.active.as_mut().ok_or(Error::NoSite)
    }

    /// Switches to `site`: rebuilds frame, boundary and matrix, clears the scene, leaves
    /// painting mode and dispatches a generation on the next poll.
    ///
    /// Requests in flight for the previous site are ignored when they complete.
    pub fn setup(&mut self, site: Site, now: Duration, sink: &mut dyn EventSink) {
        self.coordinator.cancel_pending();
        self.coordinator.invalidate_in_flight();
        self.clear_scene(sink);
        self.painter.set_brush(None);
        self.painter.reset_pointer();

        let frame = CoordinateFrame::setup(&site.boundary, self.config.cell_size);
        let shape = ShapeRasterizer::rasterize(&frame, &site.boundary);
        let matrix = shape.zone_matrix();
        info!(
            "Set up site '{}': {} boundary vertices, {}x{} tiles, rotation {:.3} rad.",
            site.name,
            site.boundary.len(),
            matrix.width(),
            matrix.height(),
            frame.rotation()
        );
        sink.send(LayoutEvent::SiteReady {
            site_name: site.name.clone(),
            width: matrix.width(),
            height: matrix.height(),
        });

        self.summary = LayoutSummary {
            budget: site.budget,
            ..Default::default()
        };
        self.active = Some(ActiveSite {
            params: SiteParameters::from_site(&site),
            site,
            frame,
            shape,
            matrix,
        });

        if let Ok(request) = self.generation_request() {
            self.coordinator.generation_now(now, request);
        }
    }

    /// Removes every object and zeroes the matrix. Does not request a recomputation.
    pub fn erase(&mut self, sink: &mut dyn EventSink) {
        self.clear_scene(sink);
        if let Some(active) = self.active.as_mut() {
            active.matrix.reset();
        }
        sink.send(LayoutEvent::Erased);
    }

    fn clear_scene(&mut self, sink: &mut dyn EventSink) {
        for object in self.scene.clear() {
            sink.send(LayoutEvent::ObjectRemoved { key: object.key });
        }
    }

    /// Selects a brush. `None` leaves painting mode.
    pub fn set_brush(&mut self, brush: Option<Brush>) {
        self.painter.set_brush(brush);
    }

    pub fn brush(&self) -> Option<Brush> {
        self.painter.brush()
    }

    /// Sets the brush radius, clamped to the configured maximum. Returns the applied value.
    pub fn set_brush_radius(&mut self, radius: u32) -> u32 {
        self.painter.set_radius(radius)
    }

    /// Current cursor, once the pointer has been over the map.
    pub fn cursor(&self) -> Option<Cursor> {
        let active = self.active.as_ref()?;
        let tile = self.painter.cursor()?;
        let local = active.frame.tile_to_local(tile);
        Some(Cursor {
            tile,
            translation: active.frame.to_world(local, 0.0),
            extent: self.painter.extent(),
            rotation: active.frame.rotation() as f32,
        })
    }

    /// Starts a stroke at `geo` and paints one stamp.
    pub fn pointer_down(
        &mut self,
        now: Duration,
        geo: GeoCoord,
        sink: &mut dyn EventSink,
    ) -> Result<Option<StampResult>> {
        let tile = self.active()?.frame.geo_to_tile(geo);
        self.painter.begin_stroke();
        self.paint_at(now, tile, sink)
    }

    /// Moves the cursor to `geo`, painting a stamp if a stroke is active.
    pub fn pointer_move(
        &mut self,
        now: Duration,
        geo: GeoCoord,
        sink: &mut dyn EventSink,
    ) -> Result<Option<StampResult>> {
        let tile = self.active()?.frame.geo_to_tile(geo);
        if self.painter.is_stroke_active() {
            self.paint_at(now, tile, sink)
        } else {
            self.painter.set_cursor(tile);
            Ok(None)
        }
    }

    pub fn pointer_up(&mut self) {
        self.painter.end_stroke();
    }

    /// Moves the cursor to `tile` and stamps the selected brush there.
    ///
    /// Returns `Ok(None)` without a brush. Every tile actually changed gets a marker, and a
    /// calculation is requested if anything changed.
    pub fn paint_at(
        &mut self,
        now: Duration,
        tile: TileCoord,
        sink: &mut dyn EventSink,
    ) -> Result<Option<StampResult>> {
        self.painter.set_cursor(tile);
        let active = self.active.as_mut().ok_or(Error::NoSite)?;
        let Some(brush) = self.painter.brush() else {
            return Ok(None);
        };
        let Some(result) = self.painter.stamp(&mut active.matrix, &active.shape.boundary) else {
            return Ok(None);
        };
        if result.is_noop() {
            return Ok(Some(result));
        }

        for tile in &result.changed {
            if let Some(object) = self.scene.insert_marker(&active.frame, brush, *tile) {
                sink.send(LayoutEvent::ObjectAdded { object });
            }
        }
        sink.send(LayoutEvent::TilesPainted {
            brush,
            tiles: result.changed.clone(),
        });
        self.request_calculation(now)?;
        Ok(Some(result))
    }

    pub fn set_budget(&mut self, now: Duration, budget: u64) -> Result<()> {
        self.active_mut()?.params.budget = budget;
        self.summary.budget = budget;
        self.request_calculation(now)
    }

    /// Enables or disables an equipment provider. Returns whether it is now enabled.
    pub fn toggle_provider(&mut self, now: Duration, provider: &str) -> Result<bool> {
        let providers = &mut self.active_mut()?.params.providers;
        let enabled = match providers.iter().position(|p| p == provider) {
            Some(i) => {
                providers.remove(i);
                false
            }
            None => {
                providers.insert(0, provider.to_owned());
                true
            }
        };
        self.request_calculation(now)?;
        Ok(enabled)
    }

    pub fn set_zone_preference(&mut self, now: Duration, zone: Zone, enabled: bool) -> Result<()> {
        self.active_mut()?
            .params
            .zone_preferences
            .set(zone, enabled);
        self.request_generation(now)
    }

    /// Schedules a debounced generation for the current site.
    pub fn request_generation(&mut self, now: Duration) -> Result<()> {
        let request = self.generation_request()?;
        self.coordinator.request_generation(now, request);
        Ok(())
    }

    /// Schedules a debounced calculation for the current matrix.
    pub fn request_calculation(&mut self, now: Duration) -> Result<()> {
        let request = self.calculation_request()?;
        self.coordinator.request_calculation(now, request);
        Ok(())
    }

    /// Makes a generation due on the next poll.
    pub fn generate_now(&mut self, now: Duration) -> Result<()> {
        let request = self.generation_request()?;
        self.coordinator.generation_now(now, request);
        Ok(())
    }

    pub fn generation_request(&self) -> Result<GenerationRequest> {
        let active = self.active()?;
        Ok(GenerationRequest {
            site_name: active.site.name.clone(),
            boundary_tiles: active.shape.boundary.as_slice().to_vec(),
            zone_preferences: active.params.zone_preferences,
        })
    }

    pub fn calculation_request(&self) -> Result<CalculationRequest> {
        let active = self.active()?;
        Ok(CalculationRequest {
            site_name: active.site.name.clone(),
            matrix: active.matrix.to_rows(),
            budget: active.params.budget,
            providers: active.params.providers.clone(),
        })
    }

    /// Returns the requests due at `now`.
    pub fn poll(&mut self, now: Duration, sink: &mut dyn EventSink) -> Vec<Dispatch> {
        let due = self.coordinator.poll(now);
        for dispatch in &due {
            info!("Dispatching {} request {}.", dispatch.service(), dispatch.ticket());
            sink.send(LayoutEvent::RequestDispatched {
                service: dispatch.service(),
                ticket: dispatch.ticket(),
            });
        }
        due
    }

    /// Earliest time at which [`Self::poll`] has something to return.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.coordinator.next_deadline()
    }

    fn accept(
        &mut self,
        service: ServiceKind,
        ticket: RequestTicket,
        sink: &mut dyn EventSink,
    ) -> bool {
        if self.active.is_none() {
            warn!("Ignoring {} response {} without a site.", service, ticket);
            return false;
        }
        if !self.coordinator.accept(service, ticket) {
            sink.send(LayoutEvent::StaleResponseDiscarded { service, ticket });
            return false;
        }
        true
    }

    /// Applies a generation result: zeroes the matrix, writes the generated tiles and makes a
    /// calculation due immediately. Returns `false` for stale responses.
    pub fn apply_generation(
        &mut self,
        now: Duration,
        ticket: RequestTicket,
        response: &GenerationResponse,
        sink: &mut dyn EventSink,
    ) -> bool {
        if !self.accept(ServiceKind::Generation, ticket, sink) {
            return false;
        }
        let Some(active) = self.active.as_mut() else {
            return false;
        };

        active.matrix.reset();
        let mut skipped = 0usize;
        for (tile, zone) in &response.tiles {
            if !active.matrix.contains(*tile) {
                skipped += 1;
                continue;
            }
            active.matrix.set(*tile, *zone);
        }
        if skipped > 0 {
            debug!("Generation {} had {} tiles outside the matrix.", ticket, skipped);
        }

        sink.send(LayoutEvent::ResponseApplied {
            service: ServiceKind::Generation,
            ticket,
        });
        if let Ok(request) = self.calculation_request() {
            self.coordinator.calculation_now(now, request);
        }
        true
    }

    /// Reconciles the scene against a calculation result. Returns `None` for stale responses.
    pub fn apply_calculation(
        &mut self,
        ticket: RequestTicket,
        response: &CalculationResponse,
        sink: &mut dyn EventSink,
    ) -> Option<SceneDiff> {
        if !self.accept(ServiceKind::Calculation, ticket, sink) {
            return None;
        }
        let active = self.active.as_ref()?;
        let diff = self.scene.reconcile(&active.frame, response);
        self.summary = LayoutSummary::from_response(response, active.params.budget);

        for (key, model) in &diff.unknown_equipment {
            sink.send(LayoutEvent::UnknownEquipment {
                key: key.clone(),
                model: model.clone(),
            });
        }
        for object in &diff.removed {
            sink.send(LayoutEvent::ObjectRemoved {
                key: object.key.clone(),
            });
        }
        for object in &diff.added {
            sink.send(LayoutEvent::ObjectAdded {
                object: object.clone(),
            });
        }
        sink.send(LayoutEvent::ResponseApplied {
            service: ServiceKind::Calculation,
            ticket,
        });
        Some(diff)
    }

    /// Records a failed service call. The scene is left as it is.
    pub fn report_failure(&self, service: ServiceKind, error: &Error, sink: &mut dyn EventSink) {
        warn!("{} request failed: {}", service, error);
        let message = match error {
            Error::ServiceUnavailable { message, .. } => message.clone(),
            other => other.to_string(),
        };
        sink.send(LayoutEvent::ServiceUnavailable { service, message });
    }

    /// Runs every due request synchronously until nothing is due at `now`.
    pub fn drive(
        &mut self,
        now: Duration,
        generation: &dyn GenerationService,
        calculation: &dyn CalculationService,
        sink: &mut dyn EventSink,
    ) -> DriveReport {
        let mut report = DriveReport::default();
        loop {
            let due = self.poll(now, sink);
            if due.is_empty() {
                break;
            }
            report.dispatched += due.len();
            for dispatch in due {
                match dispatch {
                    Dispatch::Generation { ticket, request } => {
                        match generation.generate(&request) {
                            Ok(response) => {
                                if self.apply_generation(now, ticket, &response, sink) {
                                    report.generations_applied += 1;
                                } else {
                                    report.stale_discarded += 1;
                                }
                            }
                            Err(err) => {
                                self.report_failure(ServiceKind::Generation, &err, sink);
                                report.failures.push(err);
                            }
                        }
                    }
                    Dispatch::Calculation { ticket, request } => {
                        match calculation.calculate(&request) {
                            Ok(response) => {
                                match self.apply_calculation(ticket, &response, sink) {
                                    Some(diff) => {
                                        report.calculations_applied += 1;
                                        report.added += diff.added.len();
                                        report.removed += diff.removed.len();
                                    }
                                    None => report.stale_discarded += 1,
                                }
                            }
                            Err(err) => {
                                self.report_failure(ServiceKind::Calculation, &err, sink);
                                report.failures.push(err);
                            }
                        }
                    }
                }
            }
        }
        report
    }

    /// Live objects, for renderers that attach late.
    pub fn objects(&self) -> impl Iterator<Item = &VisualObject> {
        self.scene.iter()
    }
}
