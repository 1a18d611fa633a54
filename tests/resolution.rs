use padcontrols::controller::RawSample;
use padcontrols::input::{
    codes_equivalent, AbstractCode, AppContext, Binding, BindingEvent, BindingId, BindingRegistry,
    ButtonState, GamepadAxis, GamepadButton, InputManager, RawSignalStates, ScreenKind,
    SignalSample,
};
use padcontrols::movement::{MovementOverride, PlayerInput};
use padcontrols::pointer::VirtualPointer;

struct Game;

impl AppContext for Game {
    fn screen(&self) -> ScreenKind {
        ScreenKind::InGame
    }
}

fn code(button: GamepadButton) -> AbstractCode {
    AbstractCode::button(button)
}

fn manager(bindings: Vec<Binding<Game>>) -> InputManager<Game> {
    let mut registry = BindingRegistry::new();
    for binding in bindings {
        registry.register(binding).unwrap();
    }
    InputManager::new(registry, (640, 480), true)
}

fn held(buttons: &[GamepadButton]) -> RawSample {
    let mut sample = RawSample::new();
    for button in GamepadButton::ALL {
        sample = sample.digital(code(button), buttons.contains(&button));
    }
    sample
}

fn state_of(events: &[BindingEvent], id: &str) -> ButtonState {
    events
        .iter()
        .find(|e| e.binding.as_str() == id)
        .map(|e| e.state)
        .unwrap_or(ButtonState::None)
}

#[test]
fn raw_states_follow_the_edge_contract() {
    let a = code(GamepadButton::A);
    let mut states = RawSignalStates::new();
    let mut seen = Vec::new();
    for sample in [Some(true), Some(true), Some(false), None] {
        states.advance();
        if let Some(held) = sample {
            states.ingest(a, SignalSample::Digital(held));
        }
        seen.push(states.state(a));
    }
    assert_eq!(
        seen,
        vec![
            ButtonState::Press,
            ButtonState::Repeat,
            ButtonState::Release,
            ButtonState::None
        ]
    );
}

#[test]
fn two_code_chord_needs_both_codes() {
    use GamepadButton::{A, B};
    let mut input = manager(vec![Binding::new("chord", vec![code(A), code(B)])]);
    let mut game = Game;

    for _ in 0..3 {
        let report = input.step(&mut game, &held(&[A]));
        assert_eq!(state_of(&report.events, "chord"), ButtonState::None);
    }

    let report = input.step(&mut game, &held(&[A, B]));
    assert_eq!(state_of(&report.events, "chord"), ButtonState::Press);
    let report = input.step(&mut game, &held(&[A, B]));
    assert_eq!(state_of(&report.events, "chord"), ButtonState::Repeat);

    let report = input.step(&mut game, &held(&[B]));
    assert_eq!(state_of(&report.events, "chord"), ButtonState::Release);
    let report = input.step(&mut game, &held(&[B]));
    assert_eq!(state_of(&report.events, "chord"), ButtonState::None);
    let report = input.step(&mut game, &held(&[]));
    assert_eq!(state_of(&report.events, "chord"), ButtonState::None);
}

#[test]
fn longer_chord_claims_shared_codes() {
    use GamepadButton::{A, B, X};
    let mut input = manager(vec![
        Binding::new("y", vec![code(A)]),
        Binding::new("x", vec![code(A), code(B), code(X)]),
    ]);
    let mut game = Game;

    let report = input.step(&mut game, &held(&[A, B, X]));
    assert_eq!(state_of(&report.events, "x"), ButtonState::Press);
    assert_ne!(state_of(&report.events, "y"), ButtonState::Press);

    let report = input.step(&mut game, &held(&[A, B, X]));
    assert_eq!(state_of(&report.events, "x"), ButtonState::Repeat);
    assert_eq!(state_of(&report.events, "y"), ButtonState::None);
}

#[test]
fn chord_equivalence_ignores_order() {
    let codes = |raw: &[u16]| raw.iter().copied().map(AbstractCode).collect::<Vec<_>>();
    assert!(codes_equivalent(&codes(&[1, 2, 3]), &codes(&[3, 1, 2])));
    assert!(!codes_equivalent(&codes(&[1, 2]), &codes(&[1, 2, 2])));
}

#[test]
fn idle_pointer_renders_in_place() {
    let mut pointer = VirtualPointer::new(640, 480);
    pointer.queue_relative(30.0, -12.0);
    pointer.advance();
    pointer.advance();
    let at_start = pointer.render_position(0.0);
    for fraction in [0.25, 0.5, 1.0] {
        assert_eq!(pointer.render_position(fraction), at_start);
    }
}

#[test]
fn movement_override_is_one_shot() {
    let mut movement = MovementOverride::new(true);
    let forward = BindingId::new("forward");
    let back = BindingId::new("back");
    assert!(movement.press(&forward, 1.0, ButtonState::Press, false));
    assert!(movement.press(&back, 0.5, ButtonState::Repeat, true));

    let mut input = PlayerInput::default();
    movement.apply_to(&mut input);
    assert!(input.pressing_back);
    assert!(!input.pressing_forward);
    assert!((input.movement_forward + 0.075).abs() < 1e-6);

    let mut untouched = PlayerInput {
        movement_forward: 0.4,
        ..Default::default()
    };
    movement.apply_to(&mut untouched);
    assert_eq!(untouched.movement_forward, 0.4);
}

#[test]
fn digital_and_analog_bindings_fire_together() {
    let trigger = AbstractCode::axis(GamepadAxis::LeftTrigger, true);
    let mut input = manager(vec![
        Binding::new("inventory", vec![code(GamepadButton::Y)]),
        Binding::new("attack", vec![trigger]),
    ]);
    let mut game = Game;

    let sample = RawSample::new()
        .digital(code(GamepadButton::Y), true)
        .analog(trigger, 0.8);
    let report = input.step(&mut game, &sample);

    assert_eq!(
        report.events,
        vec![
            BindingEvent {
                binding: BindingId::new("inventory"),
                value: 1.0,
                state: ButtonState::Press,
            },
            BindingEvent {
                binding: BindingId::new("attack"),
                value: 0.8,
                state: ButtonState::Press,
            },
        ]
    );
}
