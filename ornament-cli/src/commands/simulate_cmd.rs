use std::time::Duration;

use anyhow::Context;
use ornament_gpu_shared::NullRenderer;
use ornament_sim::{FrameLoop, LoopControl, SceneConfig, Simulation, StopSignal};

/// Aspect ratio of the virtual viewport used for culling.
const HEADLESS_ASPECT: f32 = 16.0 / 9.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulateOptions {
    pub frames: Option<u64>,
    pub fps: f64,
    pub seed: Option<u64>,
    pub realtime: bool,
}

/// What a finished run looked like.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationSummary {
    pub seed: u64,
    pub frames: u64,
    pub substeps: u64,
    pub render_errors: u64,
    pub visible_instances: usize,
    pub mean_distance: f32,
}

/// Mean distance of the ornaments from the origin.
pub fn mean_distance(simulation: &Simulation) -> f32 {
    let ornaments = simulation.ornaments();
    if ornaments.is_empty() {
        return 0.0;
    }
    let total: f32 = ornaments
        .iter()
        .filter_map(|pair| simulation.world().position(pair.body))
        .map(|p| p.length())
        .sum();
    total / ornaments.len() as f32
}

/// Wall-clock length of one frame at `fps`.
pub fn frame_period(fps: f64) -> anyhow::Result<Duration> {
    if !(fps.is_finite() && fps > 0.0) {
        anyhow::bail!("--fps must be a positive number, got {fps}");
    }
    Duration::try_from_secs_f64(1.0 / fps).with_context(|| format!("--fps {fps} is too small"))
}

fn seed_from_clock() -> u64 {
    chrono::Utc::now()
        .timestamp_nanos_opt()
        .map_or(0, |nanos| nanos as u64)
}

/// Drive `simulation` through the frame loop until the frame limit or the
/// stop signal. Without `realtime` frames are fed on a fixed simulated
/// timeline as fast as possible.
pub async fn drive(simulation: &mut Simulation, stop: StopSignal, options: &SimulateOptions) -> SimulationSummary {
    let mut frame_loop = FrameLoop::new(stop);
    let mut renderer = NullRenderer::default();
    let frame_time = 1.0 / options.fps;
    let log_every = (options.fps.round() as u64).max(1);
    let started = tokio::time::Instant::now();
    let mut ticker = match Duration::try_from_secs_f64(frame_time) {
        Ok(period) if options.realtime => Some(tokio::time::interval(period.max(Duration::from_nanos(1)))),
        _ => None,
    };

    let mut frame: u64 = 0;
    loop {
        if options.frames.is_some_and(|limit| frame >= limit) {
            break;
        }
        match ticker.as_mut() {
            Some(ticker) => {
                ticker.tick().await;
            }
            None if frame % 256 == 0 => tokio::task::yield_now().await,
            None => {}
        }

        let elapsed = if options.realtime {
            started.elapsed().as_secs_f64()
        } else {
            (frame + 1) as f64 * frame_time
        };
        if frame_loop.iterate(simulation, elapsed, &mut renderer) == LoopControl::Stop {
            break;
        }
        frame += 1;

        if frame % log_every == 0 {
            log::info!(
                "frame {frame}: t={elapsed:.2}s, mean distance {:.3}, {} visible",
                mean_distance(simulation),
                renderer.last_instance_count,
            );
        }
    }

    SimulationSummary {
        seed: simulation.seed(),
        frames: frame_loop.frames(),
        substeps: simulation.world().substeps_taken(),
        render_errors: frame_loop.render_errors(),
        visible_instances: renderer.last_instance_count,
        mean_distance: mean_distance(simulation),
    }
}

pub async fn run(options: SimulateOptions, config: SceneConfig) -> anyhow::Result<()> {
    frame_period(options.fps)?;
    let mut options = options;
    if options.frames.is_none() && !options.realtime {
        log::info!("No frame limit given, running in real time until Ctrl-C");
        options.realtime = true;
    }

    let seed = options
        .seed
        .or(config.world.seed)
        .unwrap_or_else(seed_from_clock);
    let mut simulation = Simulation::new(config, seed, HEADLESS_ASPECT).context("Failed to build scene")?;

    let stop = StopSignal::new();
    let ctrl_c_stop = stop.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::info!("Interrupted, stopping");
            ctrl_c_stop.stop();
        }
    });

    println!(
        "Simulating {} ornaments (seed {seed}) at {} fps...",
        simulation.ornaments().len(),
        options.fps
    );
    let summary = drive(&mut simulation, stop, &options).await;

    println!("Seed:              {}", summary.seed);
    println!("Frames:            {}", summary.frames);
    println!("Physics substeps:  {}", summary.substeps);
    println!("Visible instances: {}", summary.visible_instances);
    println!("Mean distance:     {:.3}", summary.mean_distance);
    if summary.render_errors > 0 {
        println!("Render errors:     {}", summary.render_errors);
    }
    Ok(())
}
