//! Procedural rumble playback.
//!
//! Consumes [`PlayRumbleEvent`] by synthesizing a brown-noise bed on the fly
//! instead of streaming an asset file: white noise through a leaky
//! integrator, gain scaled by quake power, with a short fade-in and a longer
//! fade-out so phase handoffs do not click. Each event replaces whatever bed
//! is currently playing, which is how the P-wave rumble gets swapped for the
//! louder S-wave one mid-quake.

use std::time::Duration;

use bevy::audio::{AddAudioSource, Decodable, PlaybackMode, Source, Volume};
use bevy::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use simulation::audio::{AudioSettings, PlayRumbleEvent};
use simulation::sim_rng::SimRng;
use simulation::structure::RebuildEvent;

const SAMPLE_RATE: u32 = 44_100;
/// Leaky integrator: retains most of the previous level and mixes in a
/// little fresh white noise, which is what gives brown noise its low rumble.
const LEAK: f32 = 0.995;
const WHITE_MIX: f32 = 0.06;
const FADE_IN: f32 = 0.6;
const FADE_OUT: f32 = 1.2;

/// One rumble bed, fully described by power, length, and noise seed.
#[derive(Asset, TypePath)]
pub struct RumbleSource {
    pub power: f32,
    pub duration: Duration,
    pub seed: u64,
}

pub struct RumbleDecoder {
    rng: ChaCha8Rng,
    level: f32,
    gain: f32,
    sample: u32,
    total_samples: u32,
}

impl RumbleDecoder {
    fn new(source: &RumbleSource) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(source.seed),
            level: 0.0,
            gain: (0.55 * source.power).min(1.0),
            sample: 0,
            total_samples: (source.duration.as_secs_f32() * SAMPLE_RATE as f32) as u32,
        }
    }

    fn envelope(&self) -> f32 {
        let t = self.sample as f32 / SAMPLE_RATE as f32;
        let remaining = (self.total_samples - self.sample) as f32 / SAMPLE_RATE as f32;
        (t / FADE_IN).min(remaining / FADE_OUT).min(1.0)
    }
}

impl Iterator for RumbleDecoder {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.sample >= self.total_samples {
            return None;
        }
        let white: f32 = self.rng.gen_range(-1.0..1.0);
        self.level = (self.level * LEAK + white * WHITE_MIX).clamp(-1.0, 1.0);
        let out = self.level * self.gain * self.envelope();
        self.sample += 1;
        Some(out)
    }
}

impl Source for RumbleDecoder {
    fn current_frame_len(&self) -> Option<usize> {
        None
    }

    fn channels(&self) -> u16 {
        1
    }

    fn sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }

    fn total_duration(&self) -> Option<Duration> {
        Some(Duration::from_secs_f32(
            self.total_samples as f32 / SAMPLE_RATE as f32,
        ))
    }
}

impl Decodable for RumbleSource {
    type DecoderItem = f32;
    type Decoder = RumbleDecoder;

    fn decoder(&self) -> Self::Decoder {
        RumbleDecoder::new(self)
    }
}

/// Marks the currently playing rumble entity.
#[derive(Component)]
pub struct RumbleEmitter;

/// Start (or replace) the rumble bed for a quake phase.
fn start_rumble(
    mut commands: Commands,
    mut events: EventReader<PlayRumbleEvent>,
    mut sources: ResMut<Assets<RumbleSource>>,
    settings: Res<AudioSettings>,
    mut rng: ResMut<SimRng>,
    playing: Query<Entity, With<RumbleEmitter>>,
) {
    for event in events.read() {
        for entity in &playing {
            commands.entity(entity).despawn();
        }
        let volume = settings.effective_volume();
        if volume == 0.0 {
            continue;
        }
        let handle = sources.add(RumbleSource {
            power: event.power,
            duration: event.duration,
            seed: rng.0.gen(),
        });
        commands.spawn((
            RumbleEmitter,
            AudioPlayer(handle),
            PlaybackSettings {
                mode: PlaybackMode::Despawn,
                volume: Volume::new(volume),
                ..default()
            },
        ));
        debug!(
            "rumble started: power {:.2}, {} ms",
            event.power,
            event.duration.as_millis()
        );
    }
}

/// A rebuild cancels the quake, so it silences the rumble too.
fn stop_rumble_on_rebuild(
    mut commands: Commands,
    mut events: EventReader<RebuildEvent>,
    playing: Query<Entity, With<RumbleEmitter>>,
) {
    if events.is_empty() {
        return;
    }
    events.clear();
    for entity in &playing {
        commands.entity(entity).despawn();
    }
}

pub struct AudioPlaybackPlugin;

impl Plugin for AudioPlaybackPlugin {
    fn build(&self, app: &mut App) {
        app.add_audio_source::<RumbleSource>()
            .add_systems(PostUpdate, (start_rumble, stop_rumble_on_rebuild));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(power: f32, secs: f32, seed: u64) -> RumbleSource {
        RumbleSource {
            power,
            duration: Duration::from_secs_f32(secs),
            seed,
        }
    }

    #[test]
    fn test_decoder_emits_exactly_duration_worth_of_samples() {
        let decoder = source(1.0, 2.0, 7).decoder();
        assert_eq!(decoder.count(), (2.0 * SAMPLE_RATE as f32) as usize);
    }

    #[test]
    fn test_samples_stay_in_unit_range() {
        for sample in source(1.4, 1.0, 99).decoder() {
            assert!((-1.0..=1.0).contains(&sample), "{}", sample);
        }
    }

    #[test]
    fn test_same_seed_same_bed() {
        let a: Vec<f32> = source(0.8, 0.25, 5).decoder().collect();
        let b: Vec<f32> = source(0.8, 0.25, 5).decoder().collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_envelope_starts_and_ends_near_silence() {
        let samples: Vec<f32> = source(1.0, 3.0, 11).decoder().collect();
        let head: f32 = samples[..100].iter().map(|s| s.abs()).fold(0.0, f32::max);
        let tail: f32 = samples[samples.len() - 100..]
            .iter()
            .map(|s| s.abs())
            .fold(0.0, f32::max);
        assert!(head < 0.01, "{}", head);
        assert!(tail < 0.01, "{}", tail);
    }
}
