//! Earthquake excitation controller.
//!
//! Drives the kinematic ground platform through a scripted trajectory:
//! sinusoidal sway plus noise, with a two-phase P-wave/S-wave profile for
//! high-magnitude triggers. The phase logic is an explicit state machine
//! with exactly one `Timer` armed per phase; dropping the state cancels
//! everything atomically (no deferred callbacks to chase down).
//!
//! The controller keeps advancing while physics is paused: the quake clock,
//! its timers, and the scripted platform pose all move through a pause, and
//! the frozen bodies catch up on resume. That is intended behavior.

use std::time::Duration;

use bevy::prelude::*;
use fastnoise_lite::{FastNoiseLite, NoiseType};
use rand::Rng;

use crate::audio::PlayRumbleEvent;
use crate::sets::SimulationSet;
use crate::sim_rng::SimRng;
use crate::structure::GroundPlatform;

// =============================================================================
// Constants
// =============================================================================

/// Triggers at or above this power run the two-phase P-wave/S-wave profile.
/// The UI only offers such powers for the bank tower.
pub const TWO_PHASE_THRESHOLD: f32 = 1.4;

/// The P-wave foreshock always runs at this fixed low power.
pub const P_WAVE_POWER: f32 = 0.5;

/// The P-wave takes a randomized 30-40% of the total duration.
const P_WAVE_FRACTION_MIN: f32 = 0.30;
const P_WAVE_FRACTION_MAX: f32 = 0.40;

/// Quake clock accumulates at `frame seconds x 25`.
const TIME_DILATION: f32 = 25.0;

/// Horizontal sway amplitude per unit power, in meters.
const HORIZ_AMPLITUDE: f32 = 0.5;
/// Vertical heave amplitude per unit power.
const VERT_AMPLITUDE: f32 = 0.15;
/// Horizontal noise magnitude per unit power.
const HORIZ_NOISE: f32 = 0.12;
/// Vertical noise magnitude per unit power *squared*.
const VERT_NOISE: f32 = 0.06;
/// Sample spacing along the quake clock for the noise channels.
const NOISE_FREQUENCY: f32 = 3.0;

// =============================================================================
// State
// =============================================================================

/// The single armed timer of the excitation state machine.
#[derive(Debug)]
pub enum QuakePhase {
    /// One continuous phase (power below [`TWO_PHASE_THRESHOLD`]).
    Single { timer: Timer },
    /// Low-power foreshock; `s_wave` is armed when the timer fires, so the
    /// two phases always sum to exactly the requested total.
    PWave { timer: Timer, s_wave: Duration },
    /// Full-power main shock.
    SWave { timer: Timer },
}

/// What advancing the phase machine produced this frame.
#[derive(Debug, PartialEq, Eq)]
enum PhaseOutcome {
    Running,
    EnteredSWave(Duration),
    Finished,
}

/// A live quake. Owns its noise generator so consecutive quakes differ.
pub struct ActiveQuake {
    pub power: f32,
    /// Dilated time accumulator feeding the motion law.
    pub clock: f32,
    pub phase: QuakePhase,
    noise: FastNoiseLite,
}

impl ActiveQuake {
    /// Power in effect right now: the P-wave runs at a fixed low power.
    pub fn effective_power(&self) -> f32 {
        match self.phase {
            QuakePhase::PWave { .. } => P_WAVE_POWER,
            _ => self.power,
        }
    }

    /// Advance the armed timer, transitioning P→S when it fires.
    fn tick_phase(&mut self, delta: Duration) -> PhaseOutcome {
        match &mut self.phase {
            QuakePhase::Single { timer } | QuakePhase::SWave { timer } => {
                timer.tick(delta);
                if timer.finished() {
                    PhaseOutcome::Finished
                } else {
                    PhaseOutcome::Running
                }
            }
            QuakePhase::PWave { timer, s_wave } => {
                timer.tick(delta);
                if timer.finished() {
                    let s = *s_wave;
                    self.phase = QuakePhase::SWave {
                        timer: Timer::new(s, TimerMode::Once),
                    };
                    PhaseOutcome::EnteredSWave(s)
                } else {
                    PhaseOutcome::Running
                }
            }
        }
    }
}

/// At most one quake is live process-wide.
#[derive(Resource, Default)]
pub struct QuakeState {
    pub current: Option<ActiveQuake>,
}

impl QuakeState {
    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }

    /// Arm a new quake. Returns `false` (leaving state and timers untouched)
    /// when one is already active.
    pub fn trigger(&mut self, duration: Duration, power: f32, rng: &mut impl Rng) -> bool {
        if self.current.is_some() {
            return false;
        }
        let phase = if power >= TWO_PHASE_THRESHOLD {
            let fraction = rng.gen_range(P_WAVE_FRACTION_MIN..P_WAVE_FRACTION_MAX);
            let p_wave = duration.mul_f32(fraction);
            // Exact remainder: the two phases sum to the requested total.
            let s_wave = duration - p_wave;
            QuakePhase::PWave {
                timer: Timer::new(p_wave, TimerMode::Once),
                s_wave,
            }
        } else {
            QuakePhase::Single {
                timer: Timer::new(duration, TimerMode::Once),
            }
        };
        self.current = Some(ActiveQuake {
            power,
            clock: 0.0,
            phase,
            noise: quake_noise(rng.gen()),
        });
        true
    }

    /// Drop the live quake, cancelling its armed timer with it.
    pub fn cancel(&mut self) {
        self.current = None;
    }
}

fn quake_noise(seed: i32) -> FastNoiseLite {
    let mut noise = FastNoiseLite::with_seed(seed);
    noise.set_noise_type(Some(NoiseType::OpenSimplex2));
    noise.set_frequency(Some(1.0));
    noise
}

/// Request a quake. Ignored (logged) while one is active; the UI also
/// disables its triggers in that case.
#[derive(Event, Debug, Clone, Copy)]
pub struct TriggerQuakeEvent {
    pub duration_ms: u32,
    pub power: f32,
}

// =============================================================================
// Motion law
// =============================================================================

/// Ground offset from rest at dilated time `clock` and the given power.
/// Horizontal sway and noise scale linearly with power, vertical noise
/// quadratically.
pub fn ground_offset(noise: &FastNoiseLite, clock: f32, power: f32) -> Vec3 {
    let a = HORIZ_AMPLITUDE * power;
    let av = VERT_AMPLITUDE * power;
    let nx = noise.get_noise_2d(clock * NOISE_FREQUENCY, 11.0) * HORIZ_NOISE * power;
    let nz = noise.get_noise_2d(clock * NOISE_FREQUENCY, 47.0) * HORIZ_NOISE * power;
    let ny = noise.get_noise_2d(clock * NOISE_FREQUENCY, 83.0) * VERT_NOISE * power * power;
    Vec3::new(
        a * clock.sin() + nx,
        av * (1.5 * clock).sin() + ny,
        a * (0.9 * clock).cos() + nz,
    )
}

// =============================================================================
// Systems
// =============================================================================

fn handle_trigger_events(
    mut events: EventReader<TriggerQuakeEvent>,
    mut state: ResMut<QuakeState>,
    mut rng: ResMut<SimRng>,
    mut rumble: EventWriter<PlayRumbleEvent>,
) {
    for event in events.read() {
        let duration = Duration::from_millis(u64::from(event.duration_ms));
        if !state.trigger(duration, event.power, &mut rng.0) {
            info!("quake trigger ignored: one is already active");
            continue;
        }
        let Some(quake) = state.current.as_ref() else {
            continue;
        };
        let (label, phase_power, phase_duration) = match &quake.phase {
            QuakePhase::PWave { timer, .. } => ("P-wave", P_WAVE_POWER, timer.duration()),
            QuakePhase::Single { timer } => ("single-phase", quake.power, timer.duration()),
            QuakePhase::SWave { timer } => ("S-wave", quake.power, timer.duration()),
        };
        info!(
            "quake triggered: power {:.2}, {} ms total, {} opening ({} ms)",
            event.power,
            event.duration_ms,
            label,
            phase_duration.as_millis()
        );
        rumble.send(PlayRumbleEvent {
            power: phase_power,
            duration: phase_duration,
        });
    }
}

/// Per-frame: advance the quake clock and armed timer, script the platform
/// pose, and return it to rest when the final phase ends.
fn advance_quake(
    time: Res<Time>,
    mut state: ResMut<QuakeState>,
    mut platform: Query<(&mut Transform, &GroundPlatform)>,
    mut rumble: EventWriter<PlayRumbleEvent>,
) {
    let Ok((mut transform, ground)) = platform.get_single_mut() else {
        return;
    };
    let mut finished = false;
    if let Some(quake) = state.current.as_mut() {
        quake.clock += time.delta_secs() * TIME_DILATION;
        match quake.tick_phase(time.delta()) {
            PhaseOutcome::Finished => finished = true,
            outcome => {
                if let PhaseOutcome::EnteredSWave(s_wave) = outcome {
                    info!("quake entering S-wave phase ({} ms)", s_wave.as_millis());
                    rumble.send(PlayRumbleEvent {
                        power: quake.power,
                        duration: s_wave,
                    });
                }
                transform.translation = ground.rest
                    + ground_offset(&quake.noise, quake.clock, quake.effective_power());
            }
        }
    } else {
        return;
    }
    if finished {
        state.current = None;
        transform.translation = ground.rest;
        info!("quake subsided; ground back at rest");
    }
}

pub struct QuakePlugin;

impl Plugin for QuakePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<QuakeState>()
            .add_event::<TriggerQuakeEvent>()
            .add_systems(
                Update,
                (handle_trigger_events, advance_quake)
                    .chain()
                    .in_set(SimulationSet::StateUpdate),
            );
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng(seed: u64) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(seed)
    }

    #[test]
    fn test_low_power_is_single_phase_of_full_duration() {
        let mut state = QuakeState::default();
        assert!(state.trigger(Duration::from_millis(10_000), 1.0, &mut rng(1)));
        match &state.current.as_ref().unwrap().phase {
            QuakePhase::Single { timer } => {
                assert_eq!(timer.duration(), Duration::from_millis(10_000));
            }
            other => panic!("expected single phase, got {:?}", other),
        }
    }

    #[test]
    fn test_high_power_splits_and_sums_exactly() {
        let total = Duration::from_millis(30_000);
        for seed in 0..50 {
            let mut state = QuakeState::default();
            assert!(state.trigger(total, 1.4, &mut rng(seed)));
            match &state.current.as_ref().unwrap().phase {
                QuakePhase::PWave { timer, s_wave } => {
                    let p = timer.duration();
                    assert!(p >= total.mul_f32(P_WAVE_FRACTION_MIN), "{:?}", p);
                    assert!(p < total.mul_f32(P_WAVE_FRACTION_MAX), "{:?}", p);
                    assert_eq!(p + *s_wave, total);
                }
                other => panic!("expected P-wave opening, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_trigger_while_active_is_a_noop() {
        let mut state = QuakeState::default();
        assert!(state.trigger(Duration::from_secs(10), 1.0, &mut rng(7)));

        // Advance part-way so we can observe the timer being untouched.
        let quake = state.current.as_mut().unwrap();
        let _ = quake.tick_phase(Duration::from_secs(3));
        let elapsed_before = match &quake.phase {
            QuakePhase::Single { timer } => timer.elapsed(),
            other => panic!("unexpected phase {:?}", other),
        };
        let power_before = quake.power;

        assert!(!state.trigger(Duration::from_secs(60), 1.4, &mut rng(8)));

        let quake = state.current.as_ref().unwrap();
        assert_eq!(quake.power, power_before);
        match &quake.phase {
            QuakePhase::Single { timer } => assert_eq!(timer.elapsed(), elapsed_before),
            other => panic!("unexpected phase {:?}", other),
        }
    }

    #[test]
    fn test_p_wave_runs_at_fixed_low_power() {
        let mut state = QuakeState::default();
        state.trigger(Duration::from_secs(30), 1.6, &mut rng(3));
        let quake = state.current.as_ref().unwrap();
        assert_eq!(quake.effective_power(), P_WAVE_POWER);
    }

    #[test]
    fn test_phase_machine_walks_p_then_s_then_finishes() {
        let mut state = QuakeState::default();
        state.trigger(Duration::from_millis(30_000), 1.5, &mut rng(9));
        let quake = state.current.as_mut().unwrap();

        let p_duration = match &quake.phase {
            QuakePhase::PWave { timer, .. } => timer.duration(),
            other => panic!("unexpected phase {:?}", other),
        };

        // Run the P-wave out.
        let outcome = quake.tick_phase(p_duration);
        let s_duration = match outcome {
            PhaseOutcome::EnteredSWave(s) => s,
            other => panic!("expected S-wave transition, got {:?}", other),
        };
        assert_eq!(p_duration + s_duration, Duration::from_millis(30_000));
        assert_eq!(quake.effective_power(), 1.5);

        // Run the S-wave out.
        assert_eq!(quake.tick_phase(s_duration), PhaseOutcome::Finished);
    }

    #[test]
    fn test_cancel_clears_state_and_timer() {
        let mut state = QuakeState::default();
        state.trigger(Duration::from_secs(30), 1.5, &mut rng(4));
        assert!(state.is_active());
        state.cancel();
        assert!(!state.is_active());
        // A fresh trigger is accepted again.
        assert!(state.trigger(Duration::from_secs(5), 0.8, &mut rng(5)));
    }

    #[test]
    fn test_ground_offset_zero_power_is_rest() {
        let noise = quake_noise(123);
        for clock in [0.0_f32, 1.0, 17.3, 400.0] {
            assert_eq!(ground_offset(&noise, clock, 0.0), Vec3::ZERO);
        }
    }

    #[test]
    fn test_ground_offset_deterministic() {
        let a = quake_noise(55);
        let b = quake_noise(55);
        for clock in [0.5_f32, 2.0, 9.9] {
            assert_eq!(ground_offset(&a, clock, 1.2), ground_offset(&b, clock, 1.2));
        }
    }

    #[test]
    fn test_ground_offset_bounded_by_power() {
        let noise = quake_noise(7);
        let bound = HORIZ_AMPLITUDE * 1.4 + HORIZ_NOISE * 1.4 + 1e-3;
        for i in 0..200 {
            let offset = ground_offset(&noise, i as f32 * 0.37, 1.4);
            assert!(offset.x.abs() <= bound, "{}", offset.x);
            assert!(offset.z.abs() <= bound, "{}", offset.z);
        }
    }
}
