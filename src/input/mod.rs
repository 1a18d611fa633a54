pub mod binding;
pub mod code;
pub mod defaults;
pub mod manager;
pub mod registry;
pub mod resolution;
pub mod state;

pub use binding::{
    ids, press_action, ActionContext, AppContext, Availability, Binding, BindingId, Category,
    PressAction, ScreenKind,
};
pub use code::{AbstractCode, GamepadAxis, GamepadButton};
pub use manager::InputManager;
pub use registry::{codes_equivalent, BindingChange, BindingRegistry};
pub use resolution::{BindingEvent, PassReport};
pub use state::{ButtonState, RawSignalStates, SignalSample};
