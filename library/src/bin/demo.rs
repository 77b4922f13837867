use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use log::info;
use node_calc::presets;
use node_calc::{Calculator, EffectLog, EngineConfig};

const DEFAULT_FRAMES: u32 = 120;
const FRAME_TIME: Duration = Duration::from_millis(16);

/// Drive the sine plot startup graph headlessly and log what a window would show.
///
/// Usage: `node_calc_demo [frames]`
fn main() -> anyhow::Result<()> {
    env_logger::init();

    let frames = match std::env::args().nth(1) {
        Some(arg) => arg
            .parse::<u32>()
            .with_context(|| format!("invalid frame count: {arg}"))?,
        None => DEFAULT_FRAMES,
    };

    let mut config = EngineConfig::load_or_default();
    config.mirror_labels = true;

    let start = Instant::now();
    let mut calc = Calculator::new(config, 0.0, EffectLog::new());
    let preset = presets::sine_plot(&mut calc)?;
    info!("Built sine plot: {:?}", preset);

    for _ in 0..frames {
        let report = calc.tick(start.elapsed().as_secs_f64());
        for error in &report.errors {
            info!("Tick {}: {}", report.tick, error);
        }
        calc.presentation_mut().drain();
        thread::sleep(FRAME_TIME);
    }

    let visible = calc.visible_samples(preset.plot);
    info!(
        "{} ticks, {} samples recorded, {} visible",
        calc.tick_count(),
        calc.samples(preset.plot).len(),
        visible.len()
    );
    if let Some(last) = visible.last() {
        println!(
            "sin label: {}, last sample: t={:.3} y={:.3}",
            calc.label(preset.sin)?.unwrap_or("-"),
            last.t,
            last.y
        );
    }
    Ok(())
}
