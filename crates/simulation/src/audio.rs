//! Audio settings and rumble trigger events.
//!
//! The simulation layer only decides *when* rumble should play and at what
//! volume; synthesizing and playing the actual brown-noise source lives in
//! the rendering crate next to the rest of the playback machinery.

use std::time::Duration;

use bevy::prelude::*;

/// Start one rumble bed. Emitted once per quake phase, so a two-phase quake
/// produces a quiet foreshock rumble followed by a louder main one.
#[derive(Event, Debug, Clone, Copy)]
pub struct PlayRumbleEvent {
    /// Phase power, scales the rumble gain.
    pub power: f32,
    /// Phase length; the bed fades out on its own at the end.
    pub duration: Duration,
}

/// Global audio settings, surfaced in the toolbar.
#[derive(Resource)]
pub struct AudioSettings {
    pub master_volume: f32,
    pub muted: bool,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            muted: false,
        }
    }
}

impl AudioSettings {
    /// Volume actually applied to spawned audio.
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume.clamp(0.0, 1.0)
        }
    }
}

pub struct AudioSettingsPlugin;

impl Plugin for AudioSettingsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AudioSettings>()
            .add_event::<PlayRumbleEvent>();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_muted_silences_regardless_of_volume() {
        let settings = AudioSettings {
            master_volume: 0.9,
            muted: true,
        };
        assert_eq!(settings.effective_volume(), 0.0);
    }

    #[test]
    fn test_effective_volume_clamped() {
        let settings = AudioSettings {
            master_volume: 2.5,
            muted: false,
        };
        assert_eq!(settings.effective_volume(), 1.0);
    }
}
