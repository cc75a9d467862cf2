use anyhow::{bail, Result};

use inertia_core::scroll::{
    normalize_delta, timing::frames_to_settle, DeltaMode, HeadlessSurface, ScrollProvider,
    ScrollSurface, StrategyKind, WheelInput,
};
use inertia_core::AppConfig;

/// Safety net for configurations that never converge
const MAX_FRAMES: usize = 100_000;

pub struct SimulateOptions {
    pub document_height: f64,
    pub viewport_height: f64,
    pub delta: f64,
    pub mode: DeltaMode,
    pub scroll_to: Option<f64>,
    pub start: f64,
    pub quiet: bool,
}

pub struct SimulationReport {
    pub strategy: StrategyKind,
    pub start: f64,
    pub target: f64,
    /// Offset after each fired frame
    pub positions: Vec<f64>,
    pub final_y: f64,
    /// Frame count predicted from the closed form
    pub predicted_frames: u32,
}

pub fn simulate(config: &AppConfig, options: &SimulateOptions) -> Result<SimulationReport> {
    if !(options.document_height >= 0.0) || !(options.viewport_height > 0.0) {
        bail!("document height must be >= 0 and viewport height > 0");
    }

    let mut surface = HeadlessSurface::new(options.document_height, options.viewport_height);
    surface.external_scroll(options.start);

    let provider = ScrollProvider::mount(surface, &config.scroll);
    let start = provider.with_platform(|s| s.scroll_y());

    match options.scroll_to {
        Some(y) => provider.scroll_to(y),
        None => {
            let input = WheelInput {
                delta_y: options.delta,
                mode: options.mode,
                target: None,
            };
            if !provider.dispatch_wheel(&input).prevents_default() {
                // Native strategy: the host scrolls by itself
                let delta = normalize_delta(
                    &input,
                    config.scroll.line_height_px,
                    options.viewport_height,
                );
                provider.with_platform_mut(|s| s.external_scroll(start + delta));
            }
        }
    }

    let target = provider.snapshot().target;
    let mut positions = Vec::new();
    while let Some(frame) = provider.with_platform_mut(|s| s.take_frame()) {
        provider.run_frame(frame);
        positions.push(provider.with_platform(|s| s.scroll_y()));
        if positions.len() >= MAX_FRAMES {
            bail!("loop did not settle within {} frames", MAX_FRAMES);
        }
    }

    let final_y = provider.with_platform(|s| s.scroll_y());
    let strategy = provider.kind();
    provider.teardown();

    Ok(SimulationReport {
        strategy,
        start,
        target,
        positions,
        final_y,
        predicted_frames: frames_to_settle(
            (target - start).abs(),
            config.scroll.ease,
            config.scroll.threshold_px,
        ),
    })
}

pub fn run(config: &AppConfig, options: &SimulateOptions) -> Result<()> {
    let report = simulate(config, options)?;

    println!(
        "strategy: {}  start: {:.2}px  target: {:.2}px",
        report.strategy, report.start, report.target
    );

    if !options.quiet {
        for (i, y) in report.positions.iter().enumerate() {
            println!("  frame {:>4}  y = {:>10.3}", i + 1, y);
        }
    }

    println!(
        "settled at {:.2}px after {} frames (predicted {})",
        report.final_y,
        report.positions.len(),
        report.predicted_frames
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> SimulateOptions {
        SimulateOptions {
            document_height: 4000.0,
            viewport_height: 800.0,
            delta: 500.0,
            mode: DeltaMode::Pixel,
            scroll_to: None,
            start: 0.0,
            quiet: true,
        }
    }

    #[test]
    fn test_wheel_converges_to_target() {
        let report = simulate(&AppConfig::default(), &options()).unwrap();
        assert_eq!(report.strategy, StrategyKind::Inertia);
        assert_eq!(report.target, 500.0);
        assert_eq!(report.final_y, 500.0);
        assert_eq!(report.positions.last().copied(), Some(500.0));
        // Monotonic approach from below
        assert!(report.positions.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_line_mode_and_clamping() {
        let opts = SimulateOptions {
            delta: 1000.0,
            mode: DeltaMode::Line,
            ..options()
        };
        let report = simulate(&AppConfig::default(), &opts).unwrap();
        assert_eq!(report.final_y, 3200.0);
    }

    #[test]
    fn test_scroll_to_from_offset() {
        let opts = SimulateOptions {
            scroll_to: Some(0.0),
            start: 1000.0,
            ..options()
        };
        let report = simulate(&AppConfig::default(), &opts).unwrap();
        assert_eq!(report.start, 1000.0);
        assert_eq!(report.final_y, 0.0);
    }

    #[test]
    fn test_native_strategy_has_no_frames() {
        let mut config = AppConfig::default();
        config.scroll.smooth_enabled = false;
        let report = simulate(&config, &options()).unwrap();
        assert_eq!(report.strategy, StrategyKind::Native);
        assert!(report.positions.is_empty());
        assert_eq!(report.final_y, 500.0);
    }

    #[test]
    fn test_rejects_bad_geometry() {
        let opts = SimulateOptions {
            viewport_height: 0.0,
            ..options()
        };
        assert!(simulate(&AppConfig::default(), &opts).is_err());
    }
}
