use crate::controller::sample::RawSample;
use crate::input::binding::AppContext;
use crate::input::registry::BindingRegistry;
use crate::input::resolution::{PassReport, ResolutionPass};
use crate::input::state::RawSignalStates;
use crate::movement::{MovementOverride, PlayerInput};
use crate::pointer::VirtualPointer;
use tracing::debug;

/// Owns every piece of per-step input state for one host application.
pub struct InputManager<A> {
    states: RawSignalStates,
    registry: BindingRegistry<A>,
    pointer: VirtualPointer,
    movement: MovementOverride,
    step: u64,
}

impl<A: AppContext> InputManager<A> {
    pub fn new(registry: BindingRegistry<A>, window: (u32, u32), analog_movement: bool) -> Self {
        Self {
            states: RawSignalStates::new(),
            registry,
            pointer: VirtualPointer::new(window.0, window.1),
            movement: MovementOverride::new(analog_movement),
            step: 0,
        }
    }

    pub fn registry(&self) -> &BindingRegistry<A> {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut BindingRegistry<A> {
        &mut self.registry
    }

    pub fn states(&self) -> &RawSignalStates {
        &self.states
    }

    pub fn pointer(&self) -> &VirtualPointer {
        &self.pointer
    }

    pub fn pointer_mut(&mut self) -> &mut VirtualPointer {
        &mut self.pointer
    }

    pub fn movement(&self) -> &MovementOverride {
        &self.movement
    }

    pub fn step_count(&self) -> u64 {
        self.step
    }

    /// Advances the pointer and the raw edges; runs before ingesting samples.
    pub fn begin_step(&mut self) {
        self.step += 1;
        self.pointer.advance();
        self.states.advance();
    }

    pub fn ingest(&mut self, sample: &RawSample) {
        for (code, signal) in sample.iter() {
            self.states.ingest(*code, *signal);
        }
    }

    /// Resolves and dispatches every binding for the current step.
    pub fn resolve(&mut self, app: &mut A) -> PassReport {
        let pass = ResolutionPass::start(self.step).compute(
            self.registry.bindings_mut(),
            &self.states,
            app,
        );
        let report = pass.dispatch(
            self.registry.bindings_mut(),
            app,
            &mut self.pointer,
            &mut self.movement,
        );
        if !report.events.is_empty() {
            debug!(
                "Step {}: dispatched {} events, {} faults",
                self.step,
                report.events.len(),
                report.faults
            );
        }
        report
    }

    /// One full simulation step.
    pub fn step(&mut self, app: &mut A, sample: &RawSample) -> PassReport {
        self.begin_step();
        self.ingest(sample);
        self.resolve(app)
    }

    /// Releases every held code, e.g. when the active device disconnects.
    pub fn release_all(&mut self, app: &mut A) -> PassReport {
        self.begin_step();
        self.states.release_all();
        self.resolve(app)
    }

    pub fn render_position(&self, fraction: f32) -> (f64, f64) {
        self.pointer.render_position(fraction)
    }

    pub fn apply_movement(&mut self, input: &mut PlayerInput) {
        self.movement.apply_to(input);
    }
}
