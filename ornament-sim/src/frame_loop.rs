use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use ornament_gpu_shared::SceneRenderer;

use crate::simulation::{FrameStats, Simulation};

/// Cloneable cancellation flag shared between a loop and whoever stops it.
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Turns absolute monotonic timestamps into per-frame deltas.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameClock {
    previous_elapsed: f64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds since the previous call. A clock that runs backwards yields zero.
    pub fn delta(&mut self, elapsed: f64) -> f64 {
        let delta = elapsed - self.previous_elapsed;
        self.previous_elapsed = elapsed;
        if delta.is_finite() {
            delta.max(0.0)
        } else {
            0.0
        }
    }

    pub fn previous_elapsed(&self) -> f64 {
        self.previous_elapsed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Uninitialized,
    Running,
    Stopped,
}

/// What the driver should do after an iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    /// Schedule another iteration.
    Continue,
    /// Do not reschedule.
    Stop,
}

/// One-iteration-at-a-time driver around a [`Simulation`].
///
/// Platform code owns the scheduling (`requestAnimationFrame`, a tokio
/// interval) and calls [`FrameLoop::iterate`] once per display refresh,
/// rescheduling only on [`LoopControl::Continue`].
#[derive(Debug)]
pub struct FrameLoop {
    state: LoopState,
    stop: StopSignal,
    frames: u64,
    render_errors: u64,
}

impl FrameLoop {
    pub fn new(stop: StopSignal) -> Self {
        Self {
            state: LoopState::Uninitialized,
            stop,
            frames: 0,
            render_errors: 0,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn render_errors(&self) -> u64 {
        self.render_errors
    }

    /// Run one frame unless the stop signal has fired.
    ///
    /// Render failures are logged and counted; the loop keeps going.
    pub fn iterate<R: SceneRenderer>(
        &mut self,
        simulation: &mut Simulation,
        elapsed_seconds: f64,
        renderer: &mut R,
    ) -> LoopControl {
        if self.state == LoopState::Stopped {
            return LoopControl::Stop;
        }
        if self.stop.is_stopped() {
            log::info!("Frame loop stopped after {} frames", self.frames);
            self.state = LoopState::Stopped;
            return LoopControl::Stop;
        }
        if self.state == LoopState::Uninitialized {
            log::debug!("Frame loop running");
            self.state = LoopState::Running;
        }

        match simulation.frame(elapsed_seconds, renderer) {
            Ok(FrameStats { substeps, .. }) => {
                log::trace!("frame {}: {substeps} substeps", self.frames);
            }
            Err(e) => {
                self.render_errors += 1;
                log::warn!("Render failed on frame {}: {e}", self.frames);
            }
        }
        self.frames += 1;
        LoopControl::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SceneConfig;
    use ornament_gpu_shared::{NullRenderer, RenderFrame};

    struct FailingRenderer;

    impl SceneRenderer for FailingRenderer {
        type Error = String;

        fn resize(&mut self, _width: u32, _height: u32, _pixel_ratio: f64) {}

        fn render(&mut self, _frame: &RenderFrame) -> Result<(), String> {
            Err("surface lost".to_string())
        }
    }

    fn simulation() -> Simulation {
        Simulation::new(SceneConfig::default(), 1, 16.0 / 9.0).unwrap()
    }

    #[test]
    fn test_clock_delta() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.delta(0.5), 0.5);
        assert_eq!(clock.delta(0.75), 0.25);
        assert_eq!(clock.delta(0.75), 0.0);
        assert_eq!(clock.previous_elapsed(), 0.75);
    }

    #[test]
    fn test_clock_backwards_is_zero() {
        let mut clock = FrameClock::new();
        clock.delta(2.0);
        assert_eq!(clock.delta(1.0), 0.0);
        assert_eq!(clock.delta(1.5), 0.5);
    }

    #[test]
    fn test_loop_runs_until_stopped() {
        let stop = StopSignal::new();
        let mut frame_loop = FrameLoop::new(stop.clone());
        let mut sim = simulation();
        let mut renderer = NullRenderer::default();
        assert_eq!(frame_loop.state(), LoopState::Uninitialized);

        for i in 0..3 {
            let control = frame_loop.iterate(&mut sim, i as f64 / 60.0, &mut renderer);
            assert_eq!(control, LoopControl::Continue);
        }
        assert_eq!(frame_loop.state(), LoopState::Running);
        assert_eq!(renderer.frames_rendered, 3);

        stop.stop();
        assert_eq!(frame_loop.iterate(&mut sim, 0.1, &mut renderer), LoopControl::Stop);
        assert_eq!(frame_loop.state(), LoopState::Stopped);
        assert_eq!(renderer.frames_rendered, 3);
        assert_eq!(frame_loop.frames(), 3);
    }

    #[test]
    fn test_stop_before_first_frame() {
        let stop = StopSignal::new();
        stop.stop();
        let mut frame_loop = FrameLoop::new(stop);
        let mut renderer = NullRenderer::default();
        assert_eq!(frame_loop.iterate(&mut simulation(), 0.0, &mut renderer), LoopControl::Stop);
        assert_eq!(renderer.frames_rendered, 0);
    }

    #[test]
    fn test_render_errors_do_not_stop_loop() {
        let mut frame_loop = FrameLoop::new(StopSignal::new());
        let mut sim = simulation();
        let control = frame_loop.iterate(&mut sim, 0.016, &mut FailingRenderer);
        assert_eq!(control, LoopControl::Continue);
        assert_eq!(frame_loop.render_errors(), 1);
    }

    #[test]
    fn test_stop_signal_shared_between_clones() {
        let signal = StopSignal::new();
        let other = signal.clone();
        assert!(!other.is_stopped());
        signal.stop();
        assert!(other.is_stopped());
    }
}
