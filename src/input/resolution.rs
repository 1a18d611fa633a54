//! Per-step conflict resolution
//!
//! A pass first computes every binding's combined state while claiming codes
//! for pressed chords, then dispatches the recorded states. The two phases are
//! separate machine states, so no action can run before every binding has been
//! settled by the claim pass.

use crate::input::binding::{AppContext, Binding, BindingId};
use crate::input::code::AbstractCode;
use crate::input::state::{ButtonState, RawSignalStates};
use crate::movement::MovementOverride;
use crate::pointer::VirtualPointer;
use statum::{machine, state};
use std::collections::HashSet;
use tracing::{trace, warn};

/// Settled outcome for one binding, by position in evaluation order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolvedBinding {
    pub index: usize,
    pub state: ButtonState,
    pub value: f32,
}

#[derive(Clone, Debug, Default)]
pub struct ResolvedStep {
    pub bindings: Vec<ResolvedBinding>,
}

/// An event handed to the actions of a binding.
#[derive(Clone, Debug, PartialEq)]
pub struct BindingEvent {
    pub binding: BindingId,
    pub value: f32,
    pub state: ButtonState,
}

#[derive(Clone, Debug, Default)]
pub struct PassReport {
    pub events: Vec<BindingEvent>,
    /// Actions that returned a fault this pass
    pub faults: usize,
}

#[state]
#[derive(Debug, Clone)]
pub enum ResolutionPhase {
    Computing,
    Dispatching(ResolvedStep),
}

#[machine]
#[derive(Debug)]
pub struct ResolutionPass<S: ResolutionPhase> {
    claimed: HashSet<AbstractCode>,
    step: u64,
}

impl<S: ResolutionPhase> ResolutionPass<S> {
    pub fn step(&self) -> u64 {
        self.step
    }

    pub fn is_claimed(&self, code: AbstractCode) -> bool {
        self.claimed.contains(&code)
    }
}

/// Combines the raw states of a chord.
///
/// Starts at REPEAT. PRESS is recorded and scanning continues; RELEASE or NONE
/// is recorded and ends the scan.
pub fn combined_state(codes: &[AbstractCode], states: &RawSignalStates) -> ButtonState {
    let mut combined = ButtonState::Repeat;
    for code in codes {
        match states.state(*code) {
            ButtonState::Press => combined = ButtonState::Press,
            ButtonState::Repeat => {}
            released => return released,
        }
    }
    combined
}

/// Magnitude of the first analog code, 1.0 for digital chords or an
/// analog code that has no magnitude yet.
pub fn chord_value(codes: &[AbstractCode], states: &RawSignalStates, state: ButtonState) -> f32 {
    if state.is_unpressed() {
        return 0.0;
    }
    codes
        .iter()
        .find(|code| code.is_axis())
        .map(|code| states.value(*code).unwrap_or(1.0))
        .unwrap_or(1.0)
}

impl ResolutionPass<Computing> {
    pub fn start(step: u64) -> Self {
        Self::new(HashSet::new(), step)
    }

    /// Settles every binding; `bindings` must already be in priority order.
    pub fn compute<A: AppContext>(
        mut self,
        bindings: &mut [Binding<A>],
        states: &RawSignalStates,
        app: &A,
    ) -> ResolutionPass<Dispatching> {
        let mut resolved = Vec::with_capacity(bindings.len());
        for (index, binding) in bindings.iter_mut().enumerate() {
            let state = self.settle(binding, states, app);
            let value = chord_value(binding.codes(), states, state);
            if state != ButtonState::None {
                trace!(
                    "Step {}: {} resolved to {} ({:.3})",
                    self.step,
                    binding.id(),
                    state,
                    value
                );
            }
            resolved.push(ResolvedBinding {
                index,
                state,
                value,
            });
        }
        self.transition_with(ResolvedStep { bindings: resolved })
    }

    fn settle<A: AppContext>(
        &mut self,
        binding: &mut Binding<A>,
        states: &RawSignalStates,
        app: &A,
    ) -> ButtonState {
        let mut state = if binding.availability().evaluate(app, binding.id()) {
            combined_state(binding.codes(), states)
        } else {
            ButtonState::None
        };

        let was_pressed = binding.is_pressed();
        if binding.codes().iter().any(|code| self.claimed.contains(code)) {
            state = if was_pressed {
                ButtonState::Release
            } else {
                ButtonState::None
            };
        }
        if state == ButtonState::Release && !was_pressed {
            state = ButtonState::None;
        }

        let pressed = state.is_pressed();
        binding.set_pressed(pressed);
        binding.update();
        if pressed {
            self.claimed.extend(binding.codes().iter().copied());
        }
        state
    }
}

impl ResolutionPass<Dispatching> {
    pub fn resolved(&self) -> &[ResolvedBinding] {
        self.get_state_data()
            .map(|step| step.bindings.as_slice())
            .unwrap_or(&[])
    }

    /// Settled state of the binding at `index` in evaluation order.
    pub fn state_of(&self, index: usize) -> Option<ButtonState> {
        self.resolved()
            .iter()
            .find(|r| r.index == index)
            .map(|r| r.state)
    }

    /// Runs the actions of every binding that did not settle to NONE, in
    /// priority order.
    pub fn dispatch<A>(
        self,
        bindings: &mut [Binding<A>],
        app: &mut A,
        pointer: &mut VirtualPointer,
        movement: &mut MovementOverride,
    ) -> PassReport {
        let mut report = PassReport::default();
        for resolved in self.resolved() {
            if resolved.state == ButtonState::None {
                continue;
            }
            let Some(binding) = bindings.get_mut(resolved.index) else {
                warn!(
                    "Step {}: binding #{} vanished before dispatch",
                    self.step, resolved.index
                );
                continue;
            };
            report.faults += binding.handle(app, pointer, movement, resolved.value, resolved.state);
            report.events.push(BindingEvent {
                binding: binding.id().clone(),
                value: resolved.value,
                state: resolved.state,
            });
        }
        report
    }
}
