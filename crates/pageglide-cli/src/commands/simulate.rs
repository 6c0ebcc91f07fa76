use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, bail, Result};
use clap::Args;
use serde::Serialize;
use tracing::debug;

use pageglide_core::page::PageSnapshot;
use pageglide_core::AppConfig;
use pageglide_motion::scroll::SmoothScroll;
use pageglide_motion::FrameScheduler;

use super::demo::demo_page;

#[derive(Args)]
pub struct SimulateArgs {
    /// Page snapshot (JSON); a built-in demo page when omitted
    pub file: Option<PathBuf>,

    /// Number of frames to run
    #[arg(long, default_value_t = 180)]
    pub frames: u32,

    /// Frame rate driving the virtual clock
    #[arg(long, default_value_t = 60.0)]
    pub fps: f64,

    /// Wheel pulses as comma-separated `ms:delta` pairs
    #[arg(long, default_value = "0:600")]
    pub wheel: String,

    /// Emit the frame trace as JSON instead of a table
    #[arg(long)]
    pub json: bool,

    /// Pace frames against the wall clock
    #[arg(long)]
    pub realtime: bool,
}

/// One wheel pulse from the `--wheel` script.
#[derive(Debug, Clone, Copy, PartialEq)]
struct WheelPulse {
    at_ms: f64,
    delta: f64,
}

fn parse_wheel_script(script: &str) -> Result<Vec<WheelPulse>> {
    let mut pulses = Vec::new();
    for part in script.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let Some((at, delta)) = part.split_once(':') else {
            bail!("bad wheel pulse {part:?}, expected ms:delta");
        };
        let at_ms: f64 = at
            .trim()
            .parse()
            .map_err(|_| anyhow!("bad pulse time in {part:?}"))?;
        let delta: f64 = delta
            .trim()
            .parse()
            .map_err(|_| anyhow!("bad pulse delta in {part:?}"))?;
        pulses.push(WheelPulse { at_ms, delta });
    }
    pulses.sort_by(|a, b| a.at_ms.total_cmp(&b.at_ms));
    debug!(count = pulses.len(), "wheel script parsed");
    Ok(pulses)
}

#[derive(Debug, Serialize)]
struct FrameSample {
    frame: u32,
    time_ms: f64,
    target: f64,
    position: f64,
}

#[derive(Debug, Serialize)]
struct Trace {
    location: String,
    fps: f64,
    smoothness: f64,
    max_scroll: f64,
    frames: Vec<FrameSample>,
}

pub async fn run(config: &AppConfig, args: SimulateArgs) -> Result<()> {
    if args.fps <= 0.0 {
        bail!("fps must be positive");
    }
    let pulses = parse_wheel_script(&args.wheel)?;

    let mut doc = match &args.file {
        Some(path) => PageSnapshot::load(path)?.instantiate(),
        None => demo_page(),
    };

    let mut sched = FrameScheduler::new();
    let mut engine = SmoothScroll::builder(config.scroll.clone()).start(&mut doc, &sched.handle());

    let dt = 1.0 / args.fps;
    let mut next_pulse = 0;
    let mut samples = Vec::with_capacity(args.frames as usize);
    for frame in 0..args.frames {
        let time_ms = f64::from(frame) * dt * 1000.0;
        while next_pulse < pulses.len() && pulses[next_pulse].at_ms <= time_ms {
            doc.wheel(pulses[next_pulse].delta);
            next_pulse += 1;
        }
        sched.step(&mut doc, dt);
        samples.push(FrameSample {
            frame,
            time_ms,
            target: engine.target(),
            position: engine.position(),
        });
        if args.realtime {
            tokio::time::sleep(Duration::from_secs_f64(dt)).await;
        }
    }

    let smoothness = engine.smoothness();
    engine.destroy(&mut doc);

    if args.json {
        let trace = Trace {
            location: doc.location().to_string(),
            fps: args.fps,
            smoothness,
            max_scroll: doc.max_scroll(),
            frames: samples,
        };
        println!("{}", serde_json::to_string_pretty(&trace)?);
        return Ok(());
    }

    println!(
        "Simulating {} at {} fps, smoothness {} (max scroll {})",
        doc.location(),
        args.fps,
        smoothness,
        doc.max_scroll()
    );
    println!(
        "{:>6}  {:>9}  {:>9}  {:>9}",
        "frame", "ms", "target", "position"
    );
    let stride = (args.frames / 20).max(1);
    for sample in samples.iter().filter(|s| s.frame % stride == 0) {
        println!(
            "{:>6}  {:>9.1}  {:>9.1}  {:>9.1}",
            sample.frame, sample.time_ms, sample.target, sample.position
        );
    }
    if let Some(last) = samples.last() {
        println!(
            "Final position {:.1} (target {:.1}) after {} frames",
            last.position,
            last.target,
            samples.len()
        );
    }

    Ok(())
}
