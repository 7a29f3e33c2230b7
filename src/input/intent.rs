use crate::game::{Command, GamePhase};

use super::handler::KeyAction;

/// Turns key actions into session commands, given the current phase.
///
/// Keys that mean nothing in the current phase yield `None`. Quitting is
/// not a session command and is handled by the caller.
pub fn translate(action: KeyAction, phase: GamePhase) -> Option<Command> {
    match (action, phase) {
        (KeyAction::Move(direction), GamePhase::Playing) => Some(Command::Turn(direction)),
        (KeyAction::TogglePause, GamePhase::Playing | GamePhase::Paused) => {
            Some(Command::TogglePause)
        }
        (KeyAction::Start, GamePhase::Menu) => Some(Command::Start),
        (KeyAction::Start, GamePhase::GameOver) => Some(Command::PlayAgain),
        (KeyAction::Menu, GamePhase::Playing | GamePhase::Paused | GamePhase::GameOver) => {
            Some(Command::Menu)
        }
        _ => None,
    }
}
