//! Demo — the two-phase run and the host entry points.
//!
//! `Demo` owns the only copy of the bars. A run holds two independent views
//! over them, one per phase, and steps through
//! `PhaseOne → Pause → PhaseTwo → Done`. Phase two reuses the same bars, so
//! every bar enters it with the fill it finished phase one at.

use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::bar::Bar;
use crate::config::DemoConfig;
use crate::error::{DemoError, Result};
use crate::factory::BarFactory;
use crate::phase::{self, BarView, Capacities, PhaseController, PhaseId, Tick};
use crate::shapes::Rect;
use crate::surface::Document;
use crate::timer::{Interval, RunHandle, Timeout, TimerRegistry};

/// Where a run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    PhaseOne,
    Pause,
    PhaseTwo,
    Done,
    /// Cancelled before reaching `Done`; nothing will fire again.
    Stopped,
}

enum RunStage<S> {
    PhaseOne {
        phase: PhaseController,
        tick: Interval,
        surface: S,
        /// Phase two's view, taken up front alongside phase one's.
        view_two: BarView,
    },
    Pause {
        timeout: Timeout,
        view_two: BarView,
    },
    PhaseTwo {
        phase: PhaseController,
        tick: Interval,
        surface: S,
    },
    Done,
}

struct Run<S> {
    handle: RunHandle,
    stage: RunStage<S>,
}

pub struct Demo<D: Document, R = StdRng> {
    config: DemoConfig,
    document: D,
    bars: Vec<Bar>,
    barrier: Rect,
    rng: R,
    run: Option<Run<D::Surface>>,
}

impl<D: Document> Demo<D, StdRng> {
    /// Build a demo whose bar selection is seeded from `config.seed`, or
    /// from the OS when no seed is configured.
    pub fn new(config: DemoConfig, document: D) -> Result<Self> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::with_rng(config, document, rng)
    }
}

impl<D: Document, R: Rng> Demo<D, R> {
    pub fn with_rng(config: DemoConfig, document: D, rng: R) -> Result<Self> {
        config.validate()?;
        let bars = BarFactory::new(config.number, config.phase_one.max_fill, config.bar.clone()).make();
        let barrier = config.barrier.to_rect();
        Ok(Self {
            config,
            document,
            bars,
            barrier,
            rng,
            run: None,
        })
    }

    pub fn config(&self) -> &DemoConfig {
        &self.config
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn barrier(&self) -> &Rect {
        &self.barrier
    }

    /// Paint the phase-one starting state without arming any timer.
    pub fn pre_start(&mut self) -> Result<()> {
        let mut surface = resolve(&self.document, &self.config.canvas)?;
        let view = BarView::all(self.bars.len());
        phase::setup(
            PhaseId::One,
            &mut self.bars,
            &view,
            &self.barrier,
            capacities(&self.config),
            &mut surface,
        );
        Ok(())
    }

    /// Stop any previous run and start a new one at `now`.
    ///
    /// Fails before arming anything if the surface cannot be resolved.
    pub fn start(&mut self, now: Instant) -> Result<RunHandle> {
        self.stop();

        let mut surface = resolve(&self.document, &self.config.canvas)?;
        let view_one = BarView::all(self.bars.len());
        let view_two = BarView::all(self.bars.len());

        phase::setup(
            PhaseId::One,
            &mut self.bars,
            &view_one,
            &self.barrier,
            capacities(&self.config),
            &mut surface,
        );
        let phase = PhaseController::new(
            view_one,
            self.config.size_increment,
            self.config.phase_one.has_barrier,
        );

        let timers = TimerRegistry::new();
        let tick = timers.interval(now, self.config.rate());
        let handle = RunHandle::new(timers);
        self.run = Some(Run {
            handle: handle.clone(),
            stage: RunStage::PhaseOne {
                phase,
                tick,
                surface,
                view_two,
            },
        });
        tracing::info!(bars = self.bars.len(), rate_ms = self.config.rate_ms, "run started");

        Ok(handle)
    }

    /// Cancel every timer of the current run. Painted state stays as is.
    pub fn stop(&mut self) {
        if let Some(run) = &self.run {
            if !run.handle.is_cancelled() {
                tracing::info!(stage = ?run.stage.kind(), "run stopped");
            }
            run.handle.cancel();
        }
    }

    /// Fire whatever is due at `now`: at most one tick, or the end of the
    /// pause.
    pub fn poll(&mut self, now: Instant) -> Result<()> {
        let Some(run) = self.run.as_mut() else {
            return Ok(());
        };

        let stage = std::mem::replace(&mut run.stage, RunStage::Done);
        let next = match stage {
            RunStage::PhaseOne {
                mut phase,
                mut tick,
                mut surface,
                view_two,
            } => {
                if tick.poll(now)
                    && phase.tick(&mut self.bars, &self.barrier, &mut surface, &mut self.rng) == Tick::Done
                {
                    tick.cancel();
                    let timeout = run.handle.timers().timeout(now, self.config.pause());
                    tracing::info!(pause_ms = self.config.phase_two.pause_ms, "phase one done");
                    RunStage::Pause { timeout, view_two }
                } else {
                    RunStage::PhaseOne {
                        phase,
                        tick,
                        surface,
                        view_two,
                    }
                }
            }
            RunStage::Pause {
                mut timeout,
                view_two,
            } => {
                if timeout.poll(now) {
                    let mut surface = match resolve(&self.document, &self.config.canvas) {
                        Ok(surface) => surface,
                        Err(e) => {
                            run.handle.cancel();
                            return Err(e);
                        }
                    };
                    phase::setup(
                        PhaseId::Two,
                        &mut self.bars,
                        &view_two,
                        &self.barrier,
                        capacities(&self.config),
                        &mut surface,
                    );
                    let phase = PhaseController::new(
                        view_two,
                        self.config.size_increment,
                        self.config.phase_two.has_barrier,
                    );
                    let tick = run.handle.timers().interval(now, self.config.rate());
                    tracing::info!("phase two started");
                    RunStage::PhaseTwo {
                        phase,
                        tick,
                        surface,
                    }
                } else {
                    RunStage::Pause { timeout, view_two }
                }
            }
            RunStage::PhaseTwo {
                mut phase,
                mut tick,
                mut surface,
            } => {
                if tick.poll(now)
                    && phase.tick(&mut self.bars, &self.barrier, &mut surface, &mut self.rng) == Tick::Done
                {
                    tick.cancel();
                    tracing::info!("phase two done");
                    RunStage::Done
                } else {
                    RunStage::PhaseTwo {
                        phase,
                        tick,
                        surface,
                    }
                }
            }
            RunStage::Done => RunStage::Done,
        };
        run.stage = next;

        Ok(())
    }

    /// When the next timer of the live run is due.
    pub fn next_deadline(&self) -> Option<Instant> {
        let run = self.run.as_ref()?;
        match &run.stage {
            RunStage::PhaseOne { tick, .. } | RunStage::PhaseTwo { tick, .. } => tick.next_due(),
            RunStage::Pause { timeout, .. } => timeout.due(),
            RunStage::Done => None,
        }
    }

    /// `None` before the first `start`.
    pub fn stage(&self) -> Option<Stage> {
        self.run.as_ref().map(|run| match run.stage.kind() {
            Stage::Done => Stage::Done,
            _ if run.handle.is_cancelled() => Stage::Stopped,
            stage => stage,
        })
    }

    /// Bars still scheduled by the running phase.
    pub fn active_bars(&self) -> usize {
        match self.run.as_ref().map(|run| &run.stage) {
            Some(RunStage::PhaseOne { phase, .. } | RunStage::PhaseTwo { phase, .. }) => {
                phase.active().len()
            }
            _ => 0,
        }
    }

    /// True when there is nothing left to drive: no run, a stopped run, or a
    /// run that reached `Done`.
    pub fn is_finished(&self) -> bool {
        match &self.run {
            None => true,
            Some(run) => run.handle.is_cancelled() || matches!(run.stage, RunStage::Done),
        }
    }
}

impl<S> RunStage<S> {
    fn kind(&self) -> Stage {
        match self {
            RunStage::PhaseOne { .. } => Stage::PhaseOne,
            RunStage::Pause { .. } => Stage::Pause,
            RunStage::PhaseTwo { .. } => Stage::PhaseTwo,
            RunStage::Done => Stage::Done,
        }
    }
}

fn capacities(config: &DemoConfig) -> Capacities {
    Capacities {
        phase_one: config.phase_one.max_fill,
        phase_two: config.phase_two.max_fill,
    }
}

fn resolve<D: Document>(document: &D, canvas: &str) -> Result<D::Surface> {
    document.surface(canvas).ok_or_else(|| DemoError::SurfaceNotFound {
        canvas: canvas.to_string(),
    })
}
