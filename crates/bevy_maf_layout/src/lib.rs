//! Bevy plugin for maf_layout providing the session resource, input messages, async service
//! jobs, scene entities and site assets.
#![forbid(unsafe_code)]

use std::sync::Arc;

#[cfg(feature = "ron")]
pub use assets::{SiteAsset, SiteAssetLoader};
use bevy::prelude::*;
use bevy::tasks::{block_on, AsyncComputeTaskPool, Task};
pub use events::{ChannelSink, LayoutBus, LayoutMessage};
use maf_layout::error::{Error, Result};
use maf_layout::prelude::*;
pub use scene::{LayoutEntities, LayoutObject, LayoutObjectSpawned};

#[cfg(feature = "ron")]
mod assets;
mod events;
mod scene;

/// Convenient re-exports for common types. Import with `use bevy_maf_layout::prelude::*;`.
pub mod prelude {
    pub use maf_layout::prelude::*;

    #[cfg(feature = "ron")]
    pub use crate::assets::{SiteAsset, SiteAssetLoader};
    pub use crate::events::{ChannelSink, LayoutBus, LayoutMessage};
    pub use crate::scene::{LayoutEntities, LayoutObject, LayoutObjectSpawned};
    pub use crate::{
        LayoutCatalog, LayoutInput, LayoutServices, LayoutState, MafLayoutPlugin,
    };
}

/// Bevy plugin owning a [`LayoutSession`] and mirroring its scene as entities.
///
/// Service calls run on the [`AsyncComputeTaskPool`]; insert a [`LayoutServices`] resource to
/// provide them. Without it every dispatch is reported as unavailable.
#[derive(Default)]
pub struct MafLayoutPlugin {
    pub config: LayoutConfig,
}

impl MafLayoutPlugin {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }
}

/// The session driven by the plugin.
#[derive(Resource, Default)]
pub struct LayoutState(
    /// Session state; mutate it through [`LayoutInput`] to keep entities in sync.
    pub LayoutSession,
);

/// Generation and calculation backends shared by all jobs.
#[derive(Resource, Clone)]
pub struct LayoutServices {
    pub generation: Arc<dyn GenerationService>,
    pub calculation: Arc<dyn CalculationService>,
}

impl LayoutServices {
    pub fn new(
        generation: impl GenerationService + 'static,
        calculation: impl CalculationService + 'static,
    ) -> Self {
        Self {
            generation: Arc::new(generation),
            calculation: Arc::new(calculation),
        }
    }
}

/// Sites the operator can step through.
#[derive(Resource, Default)]
pub struct LayoutCatalog(pub SiteCatalog);

/// Operator input applied to the session in the order it was written.
#[derive(Message, Debug, Clone)]
pub enum LayoutInput {
    /// Sets up `site` directly, bypassing the catalogue.
    Setup(Site),
    /// Selects a catalogue site by name and sets it up.
    SelectSite(String),
    NextSite,
    PreviousSite,
    /// Adds the site to the catalogue and sets it up once the asset has loaded.
    #[cfg(feature = "ron")]
    LoadSite(Handle<SiteAsset>),
    SetBrush(Option<Brush>),
    SetBrushRadius(u32),
    PointerDown(GeoCoord),
    PointerMove(GeoCoord),
    PointerUp,
    Erase,
    SetBudget(u64),
    ToggleProvider(String),
    SetZonePreference { zone: Zone, enabled: bool },
    /// Dispatches a generation on the next frame.
    Generate,
}

enum JobOutcome {
    Generation(Result<GenerationResponse>),
    Calculation(Result<CalculationResponse>),
}

/// Component holding an in-flight service call.
#[derive(Component)]
struct LayoutJob {
    service: ServiceKind,
    ticket: RequestTicket,
    task: Option<Task<JobOutcome>>,
}

impl Plugin for MafLayoutPlugin {
    fn build(&self, app: &mut App) {
        let session = match LayoutSession::new(self.config.clone()) {
            Ok(session) => session,
            Err(err) => {
                error!("MafLayoutPlugin config rejected, using defaults: {}", err);
                LayoutSession::default()
            }
        };

        app.add_message::<LayoutMessage>()
            .add_message::<LayoutInput>()
            .insert_resource(LayoutState(session))
            .init_resource::<LayoutBus>()
            .init_resource::<LayoutCatalog>()
            .init_resource::<LayoutEntities>()
            .add_systems(
                Update,
                (
                    apply_layout_inputs,
                    dispatch_layout_jobs,
                    poll_layout_jobs,
                    drain_layout_messages,
                    scene::sync_layout_entities,
                )
                    .chain(),
            );

        #[cfg(feature = "ron")]
        app.init_asset::<SiteAsset>()
            .init_asset_loader::<SiteAssetLoader>()
            .init_resource::<PendingSite>()
            .add_systems(
                Update,
                setup_loaded_site
                    .after(apply_layout_inputs)
                    .before(dispatch_layout_jobs),
            );
    }
}

fn apply_layout_inputs(
    time: Res<Time>,
    mut inputs: MessageReader<LayoutInput>,
    mut state: ResMut<LayoutState>,
    mut catalog: ResMut<LayoutCatalog>,
    bus: Res<LayoutBus>,
) {
    let now = time.elapsed();
    let mut sink = bus.sink();
    let session = &mut state.0;

    for input in inputs.read() {
        let outcome = match input {
            LayoutInput::Setup(site) => {
                session.setup(site.clone(), now, &mut sink);
                Ok(())
            }
            LayoutInput::SelectSite(name) => match catalog.0.select(name).cloned() {
                Some(site) => {
                    session.setup(site, now, &mut sink);
                    Ok(())
                }
                None => Err(Error::from(format!("no site named '{name}'"))),
            },
            LayoutInput::NextSite | LayoutInput::PreviousSite => {
                let site = if matches!(input, LayoutInput::NextSite) {
                    catalog.0.next().cloned()
                } else {
                    catalog.0.previous().cloned()
                };
                if let Some(site) = site {
                    session.setup(site, now, &mut sink);
                }
                Ok(())
            }
            #[cfg(feature = "ron")]
            LayoutInput::LoadSite(_) => Ok(()),
            LayoutInput::SetBrush(brush) => {
                session.set_brush(*brush);
                Ok(())
            }
            LayoutInput::SetBrushRadius(radius) => {
                session.set_brush_radius(*radius);
                Ok(())
            }
            LayoutInput::PointerDown(geo) => session.pointer_down(now, *geo, &mut sink).map(drop),
            LayoutInput::PointerMove(geo) => session.pointer_move(now, *geo, &mut sink).map(drop),
            LayoutInput::PointerUp => {
                session.pointer_up();
                Ok(())
            }
            LayoutInput::Erase => {
                session.erase(&mut sink);
                Ok(())
            }
            LayoutInput::SetBudget(budget) => session.set_budget(now, *budget),
            LayoutInput::ToggleProvider(provider) => {
                session.toggle_provider(now, provider).map(drop)
            }
            LayoutInput::SetZonePreference { zone, enabled } => {
                session.set_zone_preference(now, *zone, *enabled)
            }
            LayoutInput::Generate => session.generate_now(now),
        };

        if let Err(err) = outcome {
            warn!("Ignoring {:?}: {}", input, err);
        }
    }
}

/// Handle of the site asset waiting to be set up.
#[cfg(feature = "ron")]
#[derive(Resource, Default)]
struct PendingSite(Option<Handle<SiteAsset>>);

#[cfg(feature = "ron")]
fn setup_loaded_site(
    time: Res<Time>,
    mut inputs: MessageReader<LayoutInput>,
    mut pending: ResMut<PendingSite>,
    assets: Res<Assets<SiteAsset>>,
    mut state: ResMut<LayoutState>,
    mut catalog: ResMut<LayoutCatalog>,
    bus: Res<LayoutBus>,
) {
    for input in inputs.read() {
        if let LayoutInput::LoadSite(handle) = input {
            pending.0 = Some(handle.clone());
        }
    }

    let Some(asset) = pending.0.as_ref().and_then(|handle| assets.get(handle)) else {
        return;
    };
    let site = asset.site.clone();
    pending.0 = None;

    if catalog.0.get(&site.name).is_none() {
        catalog.0.push(site.clone());
    }
    catalog.0.select(&site.name);
    state.0.setup(site, time.elapsed(), &mut bus.sink());
}

fn dispatch_layout_jobs(
    mut commands: Commands,
    time: Res<Time>,
    mut state: ResMut<LayoutState>,
    services: Option<Res<LayoutServices>>,
    bus: Res<LayoutBus>,
) {
    let mut sink = bus.sink();
    let due = state.0.poll(time.elapsed(), &mut sink);
    if due.is_empty() {
        return;
    }

    let Some(services) = services else {
        for dispatch in due {
            let service = dispatch.service();
            let err = Error::service_unavailable(service, "no LayoutServices resource");
            state.0.report_failure(service, &err, &mut sink);
        }
        return;
    };

    let pool = AsyncComputeTaskPool::get();
    for dispatch in due {
        let service = dispatch.service();
        let ticket = dispatch.ticket();
        let task = match dispatch {
            Dispatch::Generation { request, .. } => {
                let generation = services.generation.clone();
                pool.spawn(async move { JobOutcome::Generation(generation.generate(&request)) })
            }
            Dispatch::Calculation { request, .. } => {
                let calculation = services.calculation.clone();
                pool.spawn(async move { JobOutcome::Calculation(calculation.calculate(&request)) })
            }
        };
        commands.spawn(LayoutJob {
            service,
            ticket,
            task: Some(task),
        });
    }
}

fn poll_layout_jobs(
    mut commands: Commands,
    time: Res<Time>,
    mut state: ResMut<LayoutState>,
    bus: Res<LayoutBus>,
    mut jobs: Query<(Entity, &mut LayoutJob)>,
) {
    let mut sink = bus.sink();
    for (entity, mut job) in jobs.iter_mut() {
        let Some(task) = job.task.take() else {
            continue;
        };
        if !task.is_finished() {
            job.task = Some(task);
            continue;
        }

        commands.entity(entity).despawn();
        let result = match block_on(task) {
            JobOutcome::Generation(Ok(response)) => {
                state
                    .0
                    .apply_generation(time.elapsed(), job.ticket, &response, &mut sink);
                Ok(())
            }
            JobOutcome::Calculation(Ok(response)) => {
                state.0.apply_calculation(job.ticket, &response, &mut sink);
                Ok(())
            }
            JobOutcome::Generation(Err(err)) | JobOutcome::Calculation(Err(err)) => Err(err),
        };
        if let Err(err) = result {
            state.0.report_failure(job.service, &err, &mut sink);
        }
    }
}

fn drain_layout_messages(bus: Res<LayoutBus>, mut messages: ResMut<Messages<LayoutMessage>>) {
    while let Ok(message) = bus.receiver().try_recv() {
        messages.write(message);
    }
}
