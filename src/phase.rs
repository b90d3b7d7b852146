//! Phase controller — drives one phase of bars to completion.
//!
//! A phase works over a view: a list of indices into the shared bar array.
//! Each tick picks one still-active bar uniformly at random, advances it,
//! redraws the active set (and the barrier, if the phase has one), and
//! retires the bar if it reached capacity. Once the view is empty the next
//! tick moves the phase to `Done` and fires the completion callback.

use rand::Rng;

use crate::bar::Bar;
use crate::shapes::Rect;
use crate::surface::Surface;

/// Which setup a phase gets before it starts ticking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseId {
    One,
    Two,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseState {
    Running,
    Done,
}

/// Result of one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// `bar` (an index into the shared array) was advanced.
    Advanced { bar: usize, retired: bool },
    /// The active set was empty; the phase is finished.
    Done,
}

/// Indices of the bars a phase still schedules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarView(Vec<usize>);

impl BarView {
    /// A view over every bar in an array of `len`.
    pub fn all(len: usize) -> Self {
        Self((0..len).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    fn get(&self, slot: usize) -> usize {
        self.0[slot]
    }

    /// O(1) removal; order of the remaining bars is not preserved.
    fn retire(&mut self, slot: usize) {
        self.0.swap_remove(slot);
    }
}

/// Capacities applied by the two setups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capacities {
    pub phase_one: u32,
    pub phase_two: u32,
}

/// Prepare `view`'s bars for a phase and paint the starting state.
///
/// Phase one resets every bar to empty at the phase-one capacity and draws
/// the barrier on top. Phase two raises the capacity, keeping each bar's
/// fill, and erases the barrier before drawing the bars.
pub fn setup<S: Surface + ?Sized>(
    phase: PhaseId,
    bars: &mut [Bar],
    view: &BarView,
    barrier: &Rect,
    capacities: Capacities,
    surface: &mut S,
) {
    match phase {
        PhaseId::One => {
            for &i in view.indices() {
                bars[i].set_current_fill(0);
                bars[i].set_max_fill(capacities.phase_one);
            }
        }
        PhaseId::Two => {
            for &i in view.indices() {
                bars[i].set_max_fill(capacities.phase_two);
            }
            barrier.clear(surface);
        }
    }

    for &i in view.indices() {
        bars[i].draw(surface);
    }

    if phase == PhaseId::One {
        barrier.draw(surface);
    }
    tracing::debug!(?phase, bars = view.len(), "phase set up");
}

type Completion<P> = Box<dyn FnOnce(P)>;

pub struct PhaseController<P = ()> {
    active: BarView,
    increment: u32,
    has_barrier: bool,
    state: PhaseState,
    completion: Option<(Completion<P>, P)>,
}

impl<P> std::fmt::Debug for PhaseController<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhaseController")
            .field("active", &self.active)
            .field("increment", &self.increment)
            .field("has_barrier", &self.has_barrier)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<P> PhaseController<P> {
    pub fn new(active: BarView, increment: u32, has_barrier: bool) -> Self {
        Self {
            active,
            increment,
            has_barrier,
            state: PhaseState::Running,
            completion: None,
        }
    }

    /// Call `callback(params)` once, on the tick that finishes the phase.
    pub fn on_complete(mut self, callback: impl FnOnce(P) + 'static, params: P) -> Self {
        self.completion = Some((Box::new(callback), params));
        self
    }

    pub fn state(&self) -> PhaseState {
        self.state
    }

    pub fn active(&self) -> &BarView {
        &self.active
    }

    /// Sum of what the active bars still need to reach capacity.
    pub fn remaining(&self, bars: &[Bar]) -> u64 {
        self.active
            .indices()
            .iter()
            .map(|&i| u64::from(bars[i].max_fill().saturating_sub(bars[i].current_fill())))
            .sum()
    }

    /// One state-machine transition. Ticking a finished phase does nothing.
    pub fn tick<S, R>(&mut self, bars: &mut [Bar], barrier: &Rect, surface: &mut S, rng: &mut R) -> Tick
    where
        S: Surface + ?Sized,
        R: Rng,
    {
        if self.state == PhaseState::Done {
            return Tick::Done;
        }

        if self.active.is_empty() {
            self.state = PhaseState::Done;
            if let Some((callback, params)) = self.completion.take() {
                callback(params);
            }
            return Tick::Done;
        }

        let slot = rng.random_range(0..self.active.len());
        let chosen = self.active.get(slot);
        bars[chosen].fill(self.increment);

        for &i in self.active.indices() {
            bars[i].draw(surface);
        }
        if self.has_barrier {
            barrier.draw(surface);
        }

        let retired = bars[chosen].is_complete();
        if retired {
            self.active.retire(slot);
            tracing::debug!(bar = chosen, remaining = self.active.len(), "bar reached capacity");
        }

        Tick::Advanced { bar: chosen, retired }
    }
}
