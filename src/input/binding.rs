//! Bindings, categories, availability predicates and press actions

use crate::error::HandlerFault;
use crate::input::code::{codes_to_string, AbstractCode};
use crate::input::state::ButtonState;
use crate::movement::MovementOverride;
use crate::pointer::VirtualPointer;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, trace};

/// Steps a cooldown binding waits before its next repeat dispatch.
pub const BINDING_COOLDOWN_STEPS: u8 = 5;

/// Identities of the stock bindings
pub mod ids {
    pub const FORWARD: &str = "forward";
    pub const BACK: &str = "back";
    pub const LEFT: &str = "left";
    pub const RIGHT: &str = "right";
    pub const JUMP: &str = "jump";
    pub const SNEAK: &str = "sneak";
    pub const SPRINT: &str = "sprint";
    pub const ATTACK: &str = "attack";
    pub const USE: &str = "use";
    pub const PICK_BLOCK: &str = "pick_block";
    pub const DROP_ITEM: &str = "drop_item";
    pub const SWAP_HANDS: &str = "swap_hands";
    pub const HOTBAR_LEFT: &str = "hotbar_left";
    pub const HOTBAR_RIGHT: &str = "hotbar_right";
    pub const INVENTORY: &str = "inventory";
    pub const SLOT_UP: &str = "slot_up";
    pub const SLOT_DOWN: &str = "slot_down";
    pub const SLOT_LEFT: &str = "slot_left";
    pub const SLOT_RIGHT: &str = "slot_right";
    pub const PAUSE_GAME: &str = "pause_game";
    pub const SCREENSHOT: &str = "screenshot";
    pub const CHAT: &str = "chat";
    pub const PLAYER_LIST: &str = "player_list";
    pub const TOGGLE_PERSPECTIVE: &str = "toggle_perspective";
    pub const POINTER_UP: &str = "pointer_up";
    pub const POINTER_DOWN: &str = "pointer_down";
    pub const POINTER_LEFT: &str = "pointer_left";
    pub const POINTER_RIGHT: &str = "pointer_right";
}

/// Stable name of a binding.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BindingId(String);

impl BindingId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Identities compare case-insensitively for registry lookups.
    pub fn matches(&self, name: &str) -> bool {
        self.0.eq_ignore_ascii_case(name)
    }
}

impl fmt::Display for BindingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BindingId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Presentation group; the priority only orders categories in menus.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub priority: i32,
}

/// What the host application is currently showing
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScreenKind {
    /// No screen open, the player is in the world
    InGame,
    /// A screen fully navigable with buttons
    Interactive,
    /// A screen that needs pointer input
    NonInteractive,
    /// An item container screen
    Inventory,
    /// The advancements screen
    Advancements,
}

/// Read access to the host application that predicates and actions need.
pub trait AppContext {
    fn screen(&self) -> ScreenKind;

    fn has_player(&self) -> bool {
        true
    }

    fn is_sneaking(&self) -> bool {
        false
    }

    fn is_window_focused(&self) -> bool {
        true
    }
}

type CustomPredicate<A> = Arc<dyn Fn(&A, &BindingId) -> bool>;

/// Enablement predicate of a binding
pub enum Availability<A> {
    Always,
    InGame,
    InNonInteractiveScreens,
    InInventory,
    InAdvancements,
    Custom(CustomPredicate<A>),
}

impl<A: AppContext> Availability<A> {
    pub fn custom(predicate: impl Fn(&A, &BindingId) -> bool + 'static) -> Self {
        Availability::Custom(Arc::new(predicate))
    }

    pub fn evaluate(&self, app: &A, binding: &BindingId) -> bool {
        match self {
            Availability::Always => true,
            Availability::InGame => app.screen() == ScreenKind::InGame,
            Availability::InNonInteractiveScreens => app.screen() == ScreenKind::NonInteractive,
            Availability::InInventory => app.screen() == ScreenKind::Inventory,
            Availability::InAdvancements => app.screen() == ScreenKind::Advancements,
            Availability::Custom(predicate) => predicate(app, binding),
        }
    }
}

impl<A> Availability<A> {
    /// Same predicate instance: equal tags, or the very same custom closure.
    pub fn same_as(&self, other: &Availability<A>) -> bool {
        match (self, other) {
            (Availability::Custom(a), Availability::Custom(b)) => Arc::ptr_eq(a, b),
            _ => std::mem::discriminant(self) == std::mem::discriminant(other),
        }
    }
}

impl<A> Clone for Availability<A> {
    fn clone(&self) -> Self {
        match self {
            Availability::Always => Availability::Always,
            Availability::InGame => Availability::InGame,
            Availability::InNonInteractiveScreens => Availability::InNonInteractiveScreens,
            Availability::InInventory => Availability::InInventory,
            Availability::InAdvancements => Availability::InAdvancements,
            Availability::Custom(predicate) => Availability::Custom(Arc::clone(predicate)),
        }
    }
}

impl<A> fmt::Debug for Availability<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Availability::Always => f.write_str("Always"),
            Availability::InGame => f.write_str("InGame"),
            Availability::InNonInteractiveScreens => f.write_str("InNonInteractiveScreens"),
            Availability::InInventory => f.write_str("InInventory"),
            Availability::InAdvancements => f.write_str("InAdvancements"),
            Availability::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Everything a press action may touch while it runs.
pub struct ActionContext<'a, A> {
    pub app: &'a mut A,
    pub binding: &'a BindingId,
    /// The binding's debounced state after this step's resolution.
    pub pressed: bool,
    pub pointer: &'a mut VirtualPointer,
    pub movement: &'a mut MovementOverride,
}

/// Handler invoked with a binding's resolved `(value, state)`.
///
/// `Ok(true)` consumes the event: later handlers of the same binding are skipped.
pub trait PressAction<A> {
    fn press(
        &mut self,
        cx: &mut ActionContext<'_, A>,
        value: f32,
        state: ButtonState,
    ) -> Result<bool, HandlerFault>;
}

impl<A, F> PressAction<A> for F
where
    F: FnMut(&mut ActionContext<'_, A>, f32, ButtonState) -> Result<bool, HandlerFault>,
{
    fn press(
        &mut self,
        cx: &mut ActionContext<'_, A>,
        value: f32,
        state: ButtonState,
    ) -> Result<bool, HandlerFault> {
        self(cx, value, state)
    }
}

/// Boxes a closure as a press action.
pub fn press_action<A, F>(action: F) -> Box<dyn PressAction<A>>
where
    F: FnMut(&mut ActionContext<'_, A>, f32, ButtonState) -> Result<bool, HandlerFault> + 'static,
{
    Box::new(action)
}

/// A named command driven by one chord of abstract codes.
pub struct Binding<A> {
    id: BindingId,
    default_codes: Vec<AbstractCode>,
    codes: Vec<AbstractCode>,
    category: Option<String>,
    availability: Availability<A>,
    actions: Vec<Box<dyn PressAction<A>>>,
    has_cooldown: bool,
    cooldown: u8,
    pressed: bool,
}

impl<A> Binding<A> {
    pub fn new(id: impl Into<BindingId>, codes: Vec<AbstractCode>) -> Self {
        Self {
            id: id.into(),
            default_codes: codes.clone(),
            codes,
            category: None,
            availability: Availability::Always,
            actions: Vec::new(),
            has_cooldown: false,
            cooldown: 0,
            pressed: false,
        }
    }

    pub fn with_availability(mut self, availability: Availability<A>) -> Self {
        self.availability = availability;
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_cooldown(mut self) -> Self {
        self.has_cooldown = true;
        self
    }

    pub fn with_action(mut self, action: Box<dyn PressAction<A>>) -> Self {
        self.actions.push(action);
        self
    }

    pub fn add_action(&mut self, action: Box<dyn PressAction<A>>) {
        self.actions.push(action);
    }

    pub fn id(&self) -> &BindingId {
        &self.id
    }

    pub fn codes(&self) -> &[AbstractCode] {
        &self.codes
    }

    pub fn default_codes(&self) -> &[AbstractCode] {
        &self.default_codes
    }

    pub fn is_default(&self) -> bool {
        self.codes == self.default_codes
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn availability(&self) -> &Availability<A> {
        &self.availability
    }

    pub fn has_cooldown(&self) -> bool {
        self.has_cooldown
    }

    /// The binding's own debounced state, distinct from raw code states.
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    pub(crate) fn set_codes(&mut self, codes: Vec<AbstractCode>) {
        debug!(
            "Binding {} codes {} -> {}",
            self.id,
            codes_to_string(&self.codes),
            codes_to_string(&codes)
        );
        self.codes = codes;
    }

    pub(crate) fn set_pressed(&mut self, pressed: bool) {
        self.pressed = pressed;
    }

    /// Per-step cooldown bookkeeping.
    pub(crate) fn update(&mut self) {
        if self.has_cooldown && self.cooldown > 0 {
            self.cooldown -= 1;
        }
    }

    /// Runs the press actions in registration order.
    ///
    /// Returns the number of actions that faulted. A fault is logged and the
    /// next action still runs.
    pub(crate) fn handle(
        &mut self,
        app: &mut A,
        pointer: &mut VirtualPointer,
        movement: &mut MovementOverride,
        value: f32,
        state: ButtonState,
    ) -> usize {
        if state == ButtonState::Repeat && self.has_cooldown && self.cooldown != 0 {
            trace!("Binding {} cooling down ({} steps)", self.id, self.cooldown);
            return 0;
        }
        if self.has_cooldown && state.is_pressed() {
            self.cooldown = BINDING_COOLDOWN_STEPS;
        }

        let mut faults = 0;
        for action in self.actions.iter_mut() {
            let mut cx = ActionContext {
                app: &mut *app,
                binding: &self.id,
                pressed: self.pressed,
                pointer: &mut *pointer,
                movement: &mut *movement,
            };
            match action.press(&mut cx, value, state) {
                Ok(true) => break,
                Ok(false) => {}
                Err(fault) => {
                    error!("Binding {} handler failed: {}", self.id, fault);
                    faults += 1;
                }
            }
        }
        faults
    }
}

impl<A> fmt::Debug for Binding<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("id", &self.id)
            .field("codes", &self.codes)
            .field("category", &self.category)
            .field("availability", &self.availability)
            .field("actions", &self.actions.len())
            .field("has_cooldown", &self.has_cooldown)
            .field("pressed", &self.pressed)
            .finish()
    }
}
