use bevy::prelude::*;

pub struct InputPlugin;
impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<SimulationCommand>()
            .add_systems(Update, collect_keyboard_commands);
    }
}

/// User intent for the particle session, decoupled from the key that caused it
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationCommand {
    /// Append one spawn batch of random points
    AddPoints,
    /// Rebuild the initial topology
    Reset,
    TogglePause,
    /// Advance a single step (only while paused)
    StepOnce,
}

const KEY_BINDINGS: [(KeyCode, SimulationCommand); 4] = [
    (KeyCode::Space, SimulationCommand::AddPoints),
    (KeyCode::KeyR, SimulationCommand::Reset),
    (KeyCode::KeyP, SimulationCommand::TogglePause),
    (KeyCode::KeyN, SimulationCommand::StepOnce),
];

fn collect_keyboard_commands(
    keys: Res<ButtonInput<KeyCode>>,
    mut out: MessageWriter<SimulationCommand>,
) {
    for (key, command) in KEY_BINDINGS {
        if keys.just_pressed(key) {
            out.write(command);
        }
    }
}
