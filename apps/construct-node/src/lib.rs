use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use construct::{
    construct_lighting::math::Rng,
    construct_time::{tick_budget, Timer},
    construct_world::{Behavior, EyeAdaptation, FixedHead, Scene},
    Construct,
};

mod building;
mod settings;
pub use settings::*;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// TOML settings file; defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of ticks to simulate.
    #[arg(long)]
    ticks: Option<u32>,

    /// Seed of the lighting sampler and the building layout.
    #[arg(long)]
    seed: Option<u64>,

    /// Write the baked sky panorama to this `.hdr` file after the run.
    #[arg(long)]
    sky_out: Option<PathBuf>,

    /// Record puffin profiling scopes.
    #[arg(long, default_value_t = false)]
    profile: bool,
}

const REPORT_INTERVAL: u32 = 60;

pub fn internal_main() -> Result<()> {
    let _construct = Construct::new("Construct Node");

    let args = Args::parse();

    let mut settings = match &args.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    if let Some(ticks) = args.ticks {
        settings.node.ticks = ticks;
    }
    if let Some(seed) = args.seed {
        settings.lighting.seed = seed;
    }
    settings.validate()?;

    construct::construct_profiling::set_enabled(args.profile);

    let mut scene = Scene::with_sky(settings.lighting.clone(), &settings.sky);

    let mut layout_rng = Rng::new(settings.lighting.seed);
    let num_static = building::add_building(&mut scene, &mut layout_rng);
    building::add_sky(&mut scene, settings.node.background_height);
    let interactive = building::add_interface(&mut scene);
    log::info!(
        "Scene holds {} objects, {} of them building parts",
        scene.len(),
        num_static
    );

    let head = FixedHead::new(settings.node.eye_position, settings.node.view_direction);
    let mut exposure = EyeAdaptation::new();

    let budget = tick_budget();
    let mut over_budget = 0;
    let mut total_timer = Timer::new();
    let mut tick_timer = Timer::new();

    for tick in 0..settings.node.ticks {
        construct::construct_profiling::new_frame();
        tick_timer.reset();

        let stats = scene.step(&head);
        let max_luminance = exposure.adapt(&scene, &head);

        if let Some(extracted) = &stats.extracted {
            log::info!(
                "Extracted {} static triangles ({} carried over, {} degenerate skipped)",
                extracted.triangles,
                extracted.carried_over,
                extracted.skipped_degenerate
            );
        }

        let elapsed = tick_timer.elapsed();
        if elapsed > budget {
            over_budget += 1;
            log::warn!(
                "Tick {} took {:.2} ms, over the {:.2} ms budget",
                tick,
                elapsed * 1000.0,
                budget * 1000.0
            );
        }

        if (tick + 1) % REPORT_INTERVAL == 0 {
            log::info!(
                "Tick {}: refined {} triangles with {} rays, lighting cursor at {}/{}, max luminance {:.3}",
                tick + 1,
                stats.lighting.triangles,
                stats.lighting.rays,
                scene.lighting().cursor(),
                scene.static_soup().len(),
                max_luminance
            );
        }
    }

    if let Some(Behavior::Cursor(cursor)) = scene.get(interactive.cursor).map(|o| &o.behavior) {
        log::info!("Cursor hovering: {:?}", cursor.hovered());
    }
    if let Some(Behavior::TextLabel(label)) =
        scene.get(interactive.input_label).map(|o| &o.behavior)
    {
        log::info!(
            "Input label reads {:?}, editing: {}",
            label.text(),
            label.is_editing()
        );
    }

    log::info!(
        "Simulated {} ticks in {:.2} s, {} over budget",
        settings.node.ticks,
        total_timer.lap(),
        over_budget
    );

    if let Some(path) = &args.sky_out {
        scene
            .background_image(settings.node.background_height)
            .save_hdr(path)
            .with_context(|| format!("Failed to export sky to {}", path.display()))?;
        log::info!("Wrote sky panorama to {}", path.display());
    }

    Ok(())
}
