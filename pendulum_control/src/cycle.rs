//! Fixed-step tick pipeline and host cycle loop.
//!
//! ## Tick (one call of [`Session::tick`])
//! 1. Arbiter selects the mode from the current angle.
//! 2. Manual: PID state reset, keyboard delta. Automatic: PID command.
//! 3. Pivot actuator clamps the move and derives the pivot velocity.
//! 4. Automatic only: pointer disturbance added to the angle.
//! 5. Plant integrates with the realized pivot velocity.
//!
//! The order is fixed; the plant always sees the velocity the actuator
//! produced in the same tick.
//!
//! ## Cycle loop ([`CycleRunner`])
//! Pulls one [`TickInput`] per tick from an [`InputSource`], stops between
//! ticks on quit, interrupt or tick limit, optionally paces to a host frame
//! rate, and emits periodic telemetry.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use pendulum_common::config::ConfigError;
use pendulum_common::params::{DisturbanceParams, PendulumConfig};
use pendulum_common::state::{ControlMode, PendulumState, TickInput, TickOutput};
use pendulum_plant::PendulumSimulator;
use tracing::{debug, info, trace, warn};

use crate::control::actuator::PivotActuator;
use crate::control::pid::{PidGains, PidOutput, PidState, pid_compute};
use crate::mode::{ModeArbiter, manual_displacement};

// ─── Session Statistics ─────────────────────────────────────────────

/// Per-session counters, updated once per tick with no allocation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SessionStats {
    /// Completed ticks.
    pub ticks: u64,
    /// Ticks spent in Automatic mode.
    pub automatic_ticks: u64,
    /// Manual↔Automatic switches.
    pub mode_switches: u64,
    /// Ticks where the pivot command hit a rail.
    pub rail_saturations: u64,
    /// Largest `|ω|` seen [rad/s].
    pub peak_angular_velocity: f64,
    /// First tick at which `|ω|` exceeded the divergence limit.
    pub diverged_at: Option<u64>,
}

impl SessionStats {
    #[inline]
    pub const fn diverged(&self) -> bool {
        self.diverged_at.is_some()
    }
}

// ─── Session ────────────────────────────────────────────────────────

/// One simulation run: owns the pendulum, controller, pivot and mode.
///
/// Parameters are copied in at construction and never change afterwards.
#[derive(Debug, Clone)]
pub struct Session {
    plant: PendulumSimulator,
    pid: PidState,
    gains: PidGains,
    pivot: PivotActuator,
    arbiter: ModeArbiter,
    disturbance: DisturbanceParams,
    dt: f64,
    manual_step: f64,
    divergence_limit: f64,
    stats: SessionStats,
    last_output: TickOutput,
    rail_contact: bool,
}

impl Session {
    /// Validate `config` and build a session at its initial condition.
    pub fn new(config: &PendulumConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let sim = &config.simulation;
        let plant = PendulumSimulator::new(
            config.physics,
            PendulumState::new(sim.initial_angle, sim.initial_angular_velocity),
        );
        let pivot = PivotActuator::new(config.pivot.initial_x, config.pivot.bounds());

        let mut session = Self {
            plant,
            pid: PidState::default(),
            gains: PidGains::from(&config.controller),
            pivot,
            arbiter: ModeArbiter::new(config.arbiter.threshold_angle),
            disturbance: config.disturbance,
            dt: sim.dt,
            manual_step: config.manual_step(),
            divergence_limit: sim.divergence_limit,
            stats: SessionStats::default(),
            last_output: TickOutput::default(),
            rail_contact: false,
        };
        session.last_output = session.snapshot(0.0, PidOutput::default());
        Ok(session)
    }

    /// Run one full tick of the pipeline.
    pub fn tick(&mut self, input: &TickInput) -> TickOutput {
        let dt = self.dt;
        let angle = self.plant.state().angle;

        // ── 1. Arbitration ──────────────────────────────────
        let transition = self.arbiter.evaluate(angle);
        let mode = transition.mode();
        if transition.is_switch() {
            self.stats.mode_switches += 1;
            debug!(tick = self.stats.ticks + 1, angle, %mode, "control mode switched");
        }

        // ── 2. Pivot source ─────────────────────────────────
        let (displacement, diagnostics) = match mode {
            ControlMode::Manual => {
                self.pid.reset();
                (
                    manual_displacement(input, self.manual_step),
                    PidOutput::default(),
                )
            }
            ControlMode::Automatic => {
                self.stats.automatic_ticks += 1;
                let out = pid_compute(&mut self.pid, &self.gains, angle, dt);
                (out.command, out)
            }
        };

        // ── 3. Actuator ─────────────────────────────────────
        let pivot = self.pivot.apply(displacement, dt);
        if pivot.saturated {
            self.stats.rail_saturations += 1;
            if !self.rail_contact {
                warn!(
                    tick = self.stats.ticks + 1,
                    position = pivot.position,
                    displacement,
                    "pivot reached travel limit"
                );
            }
        }
        self.rail_contact = pivot.saturated;

        // ── 4. Disturbance ──────────────────────────────────
        if mode.is_automatic() {
            self.plant
                .perturb(self.disturbance.angle_offset(input.pointer_x));
        }

        // ── 5. Plant ────────────────────────────────────────
        let state = self.plant.step(pivot.velocity, dt);

        self.stats.ticks += 1;
        self.record_velocity(state.angular_velocity);

        let output = self.snapshot(pivot.velocity, diagnostics);
        trace!(
            tick = output.tick,
            angle = output.angle,
            omega = output.angular_velocity,
            pivot = output.pivot_position,
            %mode,
            "tick"
        );
        self.last_output = output;
        output
    }

    fn record_velocity(&mut self, omega: f64) {
        let magnitude = omega.abs();
        if magnitude > self.stats.peak_angular_velocity {
            self.stats.peak_angular_velocity = magnitude;
        }
        if self.stats.diverged_at.is_none() && !(magnitude <= self.divergence_limit) {
            self.stats.diverged_at = Some(self.stats.ticks);
            warn!(
                tick = self.stats.ticks,
                omega,
                limit = self.divergence_limit,
                "angular velocity beyond divergence limit; check controller gains"
            );
        }
    }

    fn snapshot(&self, pivot_velocity: f64, pid: PidOutput) -> TickOutput {
        let state = self.plant.state();
        TickOutput {
            tick: self.stats.ticks,
            angle: state.angle,
            angular_velocity: state.angular_velocity,
            pivot_position: self.pivot.position(),
            pivot_velocity,
            mode: self.arbiter.mode(),
            error: pid.error,
            integral: pid.integral,
            derivative: pid.derivative,
            energy: self.plant.energy(),
        }
    }

    #[inline]
    pub fn pendulum(&self) -> &PendulumState {
        self.plant.state()
    }

    #[inline]
    pub fn pid_state(&self) -> &PidState {
        &self.pid
    }

    #[inline]
    pub fn pivot_position(&self) -> f64 {
        self.pivot.position()
    }

    #[inline]
    pub fn mode(&self) -> ControlMode {
        self.arbiter.mode()
    }

    #[inline]
    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    #[inline]
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Output of the last completed tick (initial condition before any).
    #[inline]
    pub fn output(&self) -> &TickOutput {
        &self.last_output
    }

    /// Horizontal centre of the render surface, where the pointer has no
    /// effect.
    #[inline]
    pub fn surface_center_x(&self) -> f64 {
        self.disturbance.surface_center_x
    }
}

// ─── Input Source ───────────────────────────────────────────────────

/// Supplies host input for each tick.
pub trait InputSource {
    /// Input for tick `tick` (1-based).
    fn next_input(&mut self, tick: u64) -> TickInput;
}

/// No keys held, pointer parked at the surface centre.
#[derive(Debug, Clone, Copy)]
pub struct IdleInput {
    pub center_x: f64,
}

impl InputSource for IdleInput {
    fn next_input(&mut self, _tick: u64) -> TickInput {
        TickInput::idle(self.center_x)
    }
}

// ─── Frame Timing ───────────────────────────────────────────────────

/// O(1) wall-clock statistics of tick execution.
#[derive(Debug, Clone)]
pub struct FrameTiming {
    pub frames: u64,
    pub min_ns: u64,
    pub max_ns: u64,
    pub sum_ns: u64,
    /// Frames whose work exceeded the pacing budget.
    pub overruns: u64,
}

impl FrameTiming {
    pub const fn new() -> Self {
        Self {
            frames: 0,
            min_ns: u64::MAX,
            max_ns: 0,
            sum_ns: 0,
            overruns: 0,
        }
    }

    #[inline]
    pub fn record(&mut self, duration_ns: u64) {
        self.frames += 1;
        self.min_ns = self.min_ns.min(duration_ns);
        self.max_ns = self.max_ns.max(duration_ns);
        self.sum_ns = self.sum_ns.saturating_add(duration_ns);
    }

    /// Average frame work [ns] (0 if no frames).
    #[inline]
    pub fn avg_ns(&self) -> u64 {
        if self.frames == 0 {
            0
        } else {
            self.sum_ns / self.frames
        }
    }
}

impl Default for FrameTiming {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Cycle Runner ───────────────────────────────────────────────────

/// Why the cycle loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Configured tick limit reached.
    TickLimit,
    /// Input source requested quit.
    QuitRequested,
    /// Shutdown flag cleared (signal).
    Interrupted,
}

/// Loop settings for [`CycleRunner`].
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    /// Stop after this many ticks (`None` = until quit or interrupt).
    pub max_ticks: Option<u64>,
    /// Pace ticks to this frame rate (`None` = as fast as possible).
    pub realtime_fps: Option<u32>,
    /// Telemetry log interval [ticks].
    pub telemetry_interval: u32,
}

/// Final state of a run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub reason: StopReason,
    pub stats: SessionStats,
    pub timing: FrameTiming,
    pub last: TickOutput,
}

/// Drives a [`Session`] from an [`InputSource`] until a stop condition.
pub struct CycleRunner {
    session: Session,
    options: RunOptions,
    running: Arc<AtomicBool>,
    timing: FrameTiming,
}

impl CycleRunner {
    pub fn new(session: Session, options: RunOptions) -> Self {
        Self {
            session,
            options,
            running: Arc::new(AtomicBool::new(true)),
            timing: FrameTiming::new(),
        }
    }

    /// Flag checked between ticks; clearing it stops the loop.
    pub fn shutdown_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.running)
    }

    /// Run the loop, passing every tick's output to `sink`.
    pub fn run<I, F>(&mut self, input: &mut I, mut sink: F) -> RunSummary
    where
        I: InputSource,
        F: FnMut(&TickOutput),
    {
        let frame_budget = self
            .options
            .realtime_fps
            .map(|fps| Duration::from_secs_f64(1.0 / f64::from(fps.max(1))));
        let interval = u64::from(self.options.telemetry_interval.max(1));

        info!(
            dt = self.session.dt(),
            max_ticks = ?self.options.max_ticks,
            fps = ?self.options.realtime_fps,
            "entering cycle loop"
        );

        let reason = loop {
            if !self.running.load(Ordering::SeqCst) {
                break StopReason::Interrupted;
            }
            let next_tick = self.session.stats().ticks + 1;
            if self.options.max_ticks.is_some_and(|max| next_tick > max) {
                break StopReason::TickLimit;
            }

            let tick_input = input.next_input(next_tick);
            if tick_input.quit_requested {
                break StopReason::QuitRequested;
            }

            let frame_start = Instant::now();
            let output = self.session.tick(&tick_input);
            sink(&output);

            if output.tick % interval == 0 {
                log_telemetry(&output);
            }

            let elapsed = frame_start.elapsed();
            self.timing.record(duration_ns(elapsed));

            if let Some(budget) = frame_budget {
                match budget.checked_sub(elapsed) {
                    Some(remaining) => std::thread::sleep(remaining),
                    None => self.timing.overruns += 1,
                }
            }
        };

        info!(?reason, ticks = self.session.stats().ticks, "cycle loop stopped");

        RunSummary {
            reason,
            stats: *self.session.stats(),
            timing: self.timing.clone(),
            last: *self.session.output(),
        }
    }
}

/// Whole nanoseconds in `d`, saturating at `u64::MAX`.
#[inline]
fn duration_ns(d: Duration) -> u64 {
    u64::try_from(d.as_nanos()).unwrap_or(u64::MAX)
}

fn log_telemetry(out: &TickOutput) {
    info!(
        tick = out.tick,
        mode = %out.mode,
        angle = format_args!("{:.4}", out.angle),
        omega = format_args!("{:.4}", out.angular_velocity),
        pivot = format_args!("{:.1}", out.pivot_position),
        error = format_args!("{:.4}", out.error),
        integral = format_args!("{:.4}", out.integral),
        derivative = format_args!("{:.4}", out.derivative),
        "telemetry"
    );
}

// ─── Tests ──────────────────────────────────────────────────────────
