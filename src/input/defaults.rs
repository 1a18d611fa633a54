//! Stock categories and bindings

use crate::error::BindingError;
use crate::input::binding::{
    ids, press_action, ActionContext, AppContext, Availability, Binding, PressAction, ScreenKind,
};
use crate::input::code::{AbstractCode, GamepadAxis, GamepadButton};
use crate::input::registry::BindingRegistry;
use crate::input::state::ButtonState;
use tracing::info;

pub mod categories {
    pub const MOVEMENT: &str = "movement";
    pub const GAMEPLAY: &str = "gameplay";
    pub const INVENTORY: &str = "inventory";
    pub const MISC: &str = "misc";
    pub const POINTER: &str = "pointer";
}

fn button(button: GamepadButton) -> AbstractCode {
    AbstractCode::button(button)
}

fn axis(axis: GamepadAxis, positive: bool) -> AbstractCode {
    AbstractCode::axis(axis, positive)
}

/// Feeds the four directional bindings into the movement override while in game.
pub fn movement_action<A: AppContext + 'static>() -> Box<dyn PressAction<A>> {
    press_action(|cx: &mut ActionContext<'_, A>, value, state: ButtonState| {
        if cx.app.screen() != ScreenKind::InGame || !cx.app.has_player() {
            cx.movement.cancel();
            return Ok(false);
        }
        let sneaking = cx.app.is_sneaking();
        cx.movement.press(cx.binding, value, state, sneaking);
        Ok(false)
    })
}

/// Moves the virtual pointer along `(dx, dy)` scaled by the analog value.
pub fn pointer_action<A: 'static>(dx: f64, dy: f64, speed: f32) -> Box<dyn PressAction<A>> {
    press_action(move |cx: &mut ActionContext<'_, A>, value: f32, state: ButtonState| {
        if state.is_pressed() {
            let distance = f64::from(value * speed);
            cx.pointer.queue_relative(dx * distance, dy * distance);
        }
        Ok(false)
    })
}

fn outside_game<A: AppContext + 'static>() -> Availability<A> {
    Availability::custom(|app: &A, _| app.screen() != ScreenKind::InGame)
}

/// Registers the stock set. Pointer bindings are only added with `virtual_mouse`.
pub fn register_defaults<A: AppContext + 'static>(
    registry: &mut BindingRegistry<A>,
    pointer_speed: f32,
    virtual_mouse: bool,
) -> Result<(), BindingError> {
    use GamepadAxis as Ax;
    use GamepadButton as Btn;

    for category in [
        categories::MOVEMENT,
        categories::GAMEPLAY,
        categories::INVENTORY,
        categories::MISC,
        categories::POINTER,
    ] {
        registry.register_category(category);
    }

    let movement = [
        (ids::FORWARD, axis(Ax::LeftY, true)),
        (ids::BACK, axis(Ax::LeftY, false)),
        (ids::LEFT, axis(Ax::LeftX, false)),
        (ids::RIGHT, axis(Ax::LeftX, true)),
    ];
    for (id, code) in movement {
        registry.register(
            Binding::new(id, vec![code])
                .with_category(categories::MOVEMENT)
                .with_availability(Availability::InGame)
                .with_action(movement_action()),
        )?;
    }
    for (id, code) in [
        (ids::JUMP, button(Btn::A)),
        (ids::SNEAK, button(Btn::RightThumb)),
        (ids::SPRINT, button(Btn::LeftThumb)),
    ] {
        registry.register(
            Binding::new(id, vec![code])
                .with_category(categories::MOVEMENT)
                .with_availability(Availability::InGame),
        )?;
    }

    for (id, codes, cooldown) in [
        (ids::ATTACK, vec![axis(Ax::RightTrigger, true)], false),
        (ids::USE, vec![axis(Ax::LeftTrigger, true)], false),
        (ids::PICK_BLOCK, vec![button(Btn::DPadLeft)], false),
        (ids::DROP_ITEM, vec![button(Btn::DPadDown)], false),
        (ids::SWAP_HANDS, vec![button(Btn::X)], false),
        (ids::HOTBAR_LEFT, vec![button(Btn::LeftBumper)], true),
        (ids::HOTBAR_RIGHT, vec![button(Btn::RightBumper)], true),
    ] {
        let mut binding = Binding::new(id, codes)
            .with_category(categories::GAMEPLAY)
            .with_availability(Availability::InGame);
        if cooldown {
            binding = binding.with_cooldown();
        }
        registry.register(binding)?;
    }

    registry.register(
        Binding::new(ids::INVENTORY, vec![button(Btn::Y)])
            .with_category(categories::INVENTORY)
            .with_availability(Availability::Always),
    )?;
    for (id, code) in [
        (ids::SLOT_UP, button(Btn::DPadUp)),
        (ids::SLOT_DOWN, button(Btn::DPadDown)),
        (ids::SLOT_LEFT, button(Btn::DPadLeft)),
        (ids::SLOT_RIGHT, button(Btn::DPadRight)),
    ] {
        registry.register(
            Binding::new(id, vec![code])
                .with_category(categories::INVENTORY)
                .with_availability(Availability::InInventory)
                .with_cooldown(),
        )?;
    }

    for (id, codes, availability) in [
        (ids::PAUSE_GAME, vec![button(Btn::Start)], Availability::Always),
        (ids::SCREENSHOT, vec![button(Btn::Back), button(Btn::DPadUp)], Availability::Always),
        (ids::CHAT, vec![button(Btn::DPadRight)], Availability::InGame),
        (ids::PLAYER_LIST, vec![button(Btn::Back)], Availability::InGame),
        (ids::TOGGLE_PERSPECTIVE, vec![button(Btn::DPadUp)], Availability::InGame),
    ] {
        registry.register(
            Binding::new(id, codes)
                .with_category(categories::MISC)
                .with_availability(availability),
        )?;
    }

    if virtual_mouse {
        for (id, code, dx, dy) in [
            (ids::POINTER_UP, axis(Ax::RightY, true), 0.0, -1.0),
            (ids::POINTER_DOWN, axis(Ax::RightY, false), 0.0, 1.0),
            (ids::POINTER_LEFT, axis(Ax::RightX, false), -1.0, 0.0),
            (ids::POINTER_RIGHT, axis(Ax::RightX, true), 1.0, 0.0),
        ] {
            registry.register(
                Binding::new(id, vec![code])
                    .with_category(categories::POINTER)
                    .with_availability(outside_game())
                    .with_action(pointer_action(dx, dy, pointer_speed)),
            )?;
        }
    }

    info!(
        "Registered {} stock bindings in {} categories",
        registry.len(),
        registry.categories().len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::sample::RawSample;
    use crate::input::manager::InputManager;
    use crate::input::binding::BindingId;
    use crate::movement::{MovementOverride, PlayerInput};
    use crate::pointer::VirtualPointer;

    struct Game {
        screen: ScreenKind,
        sneaking: bool,
    }

    impl AppContext for Game {
        fn screen(&self) -> ScreenKind {
            self.screen
        }

        fn is_sneaking(&self) -> bool {
            self.sneaking
        }
    }

    fn stock() -> InputManager<Game> {
        let mut registry = BindingRegistry::new();
        register_defaults(&mut registry, 10.0, true).unwrap();
        InputManager::new(registry, (800, 600), true)
    }

    #[test]
    fn stock_set_registers_once() {
        let mut registry = BindingRegistry::<Game>::new();
        register_defaults(&mut registry, 10.0, false).unwrap();
        assert!(registry.exists(ids::HOTBAR_RIGHT));
        assert!(!registry.exists(ids::POINTER_UP));
        assert!(registry.lookup(ids::HOTBAR_RIGHT).unwrap().has_cooldown());
        assert!(matches!(
            register_defaults(&mut registry, 10.0, false),
            Err(BindingError::Duplicate(_))
        ));
    }

    #[test]
    fn chord_beats_its_sub_binding() {
        let mut input = stock();
        let mut game = Game {
            screen: ScreenKind::InGame,
            sneaking: false,
        };
        let sample = RawSample::new()
            .digital(button(GamepadButton::Back), true)
            .digital(button(GamepadButton::DPadUp), true);

        let report = input.step(&mut game, &sample);
        let fired: Vec<&str> = report.events.iter().map(|e| e.binding.as_str()).collect();
        assert_eq!(fired, vec![ids::SCREENSHOT]);
    }

    #[test]
    fn stick_drives_movement_override() {
        let mut input = stock();
        let mut game = Game {
            screen: ScreenKind::InGame,
            sneaking: true,
        };
        let sample = RawSample::new().analog(axis(GamepadAxis::LeftY, true), 0.5);
        input.step(&mut game, &sample);

        let mut player = PlayerInput::default();
        input.apply_movement(&mut player);
        assert!(player.pressing_forward);
        assert!((player.movement_forward - 0.075).abs() < 1e-6);
    }

    #[test]
    fn movement_is_ignored_outside_the_game() {
        let mut input = stock();
        let mut game = Game {
            screen: ScreenKind::Inventory,
            sneaking: false,
        };
        let sample = RawSample::new().analog(axis(GamepadAxis::LeftY, true), 1.0);
        input.step(&mut game, &sample);
        assert!(!input.movement().is_pending());
    }

    #[test]
    fn opening_a_screen_drops_pending_movement() {
        let forward = BindingId::new(ids::FORWARD);
        let mut movement = MovementOverride::new(true);
        movement.press(&forward, 1.0, ButtonState::Press, false);

        let mut game = Game {
            screen: ScreenKind::Inventory,
            sneaking: false,
        };
        let mut pointer = VirtualPointer::new(10, 10);
        let mut cx = ActionContext {
            app: &mut game,
            binding: &forward,
            pressed: true,
            pointer: &mut pointer,
            movement: &mut movement,
        };
        let consumed = movement_action::<Game>()
            .press(&mut cx, 1.0, ButtonState::Repeat)
            .unwrap();

        assert!(!consumed);
        assert!(!movement.is_pending());
    }

    #[test]
    fn right_stick_moves_the_pointer_in_menus() {
        let mut input = stock();
        let mut game = Game {
            screen: ScreenKind::NonInteractive,
            sneaking: false,
        };
        let sample = RawSample::new().analog(axis(GamepadAxis::RightX, true), 0.5);
        let report = input.step(&mut game, &sample);

        assert_eq!(report.events[0].state, ButtonState::Press);
        assert_eq!(input.pointer().target(), (405, 300));
    }

    #[test]
    fn slot_navigation_swaps_with_screen() {
        let mut input = stock();
        let mut game = Game {
            screen: ScreenKind::Inventory,
            sneaking: false,
        };
        let sample = RawSample::new().digital(button(GamepadButton::DPadDown), true);
        let report = input.step(&mut game, &sample);
        let fired: Vec<&str> = report.events.iter().map(|e| e.binding.as_str()).collect();
        assert_eq!(fired, vec![ids::SLOT_DOWN]);
    }
}
