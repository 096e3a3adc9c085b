use std::collections::HashMap;
use std::io;
use std::time::Duration;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::error;

use crate::game::PlayerAction;

/// What the driver should do in response to one input event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputCommand {
    Player(PlayerAction),
    Restart,
    Quit,
}

/// Translates one key press into at most one command.
pub fn map_key(key: KeyEvent) -> Option<InputCommand> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    let command = match key.code {
        KeyCode::Left => InputCommand::Player(PlayerAction::RotateLeft),
        KeyCode::Right => InputCommand::Player(PlayerAction::RotateRight),
        KeyCode::Up => InputCommand::Player(PlayerAction::ThrustForward),
        KeyCode::Down => InputCommand::Player(PlayerAction::ThrustBackward),
        KeyCode::Char(' ') => InputCommand::Player(PlayerAction::Fire),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => InputCommand::Quit,
        KeyCode::Char('q') | KeyCode::Esc => InputCommand::Quit,
        KeyCode::Char('r') => InputCommand::Restart,
        _ => return None,
    };
    Some(command)
}

fn map_event(event: Event) -> Option<InputCommand> {
    match event {
        Event::Key(key) => map_key(key),
        _ => None,
    }
}

// --- SimulatedInput for debugging ---
pub struct SimulatedInput {
    events: HashMap<u64, Vec<Event>>,
}

impl SimulatedInput {
    pub fn new(events: HashMap<u64, Vec<Event>>) -> Self {
        SimulatedInput { events }
    }

    /// Short scripted session: turn, thrust, fire a spread, then quit.
    pub fn demo_script(quit_frame: u64) -> Self {
        let key = |code: KeyCode| Event::Key(code.into());
        let mut events = HashMap::new();
        events.insert(1, vec![key(KeyCode::Up)]);
        events.insert(2, vec![key(KeyCode::Right), key(KeyCode::Char(' '))]);
        events.insert(3, vec![key(KeyCode::Char(' '))]);
        events.insert(4, vec![key(KeyCode::Left), key(KeyCode::Left), key(KeyCode::Char(' '))]);
        events.insert(6, vec![key(KeyCode::Down)]);
        events.insert(quit_frame, vec![key(KeyCode::Char('q'))]);
        SimulatedInput::new(events)
    }

    pub fn take(&mut self, frame: u64) -> Vec<Event> {
        self.events.remove(&frame).unwrap_or_default()
    }
}

/// Input hook. Never blocks: each call returns whatever is already pending.
pub enum InputSource {
    Terminal,
    Simulated(SimulatedInput),
}

impl InputSource {
    pub fn drain(&mut self, frame: u64) -> io::Result<Vec<InputCommand>> {
        match self {
            InputSource::Terminal => {
                let mut commands = Vec::new();
                while event::poll(Duration::ZERO).map_err(|e| { error!("Failed to poll event: {}", e); e })? {
                    let event = event::read().map_err(|e| { error!("Failed to read event: {}", e); e })?;
                    commands.extend(map_event(event));
                }
                Ok(commands)
            }
            InputSource::Simulated(script) => Ok(script.take(frame).into_iter().filter_map(map_event).collect()),
        }
    }
}
