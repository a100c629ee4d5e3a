use log::{debug, info};
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::Serialize;
use std::f64::consts::TAU;
use std::fmt;
use wasm_bindgen::prelude::*;

pub mod audio;
pub mod entries;
pub mod render;
pub mod surface;
mod widget;

pub use widget::WheelWidget;

/// Default physics parameters
pub mod defaults {
    /// Lower bound of the base impulse, in radians per frame.
    pub const BASE_VELOCITY_MIN: f64 = 0.30;
    /// Upper bound (exclusive) of the base impulse, in radians per frame.
    pub const BASE_VELOCITY_MAX: f64 = 0.45;
    /// A spin settles on the first frame its speed drops below this.
    pub const STOP_THRESHOLD: f64 = 0.002;
    pub const CHAOS_JITTER_STD_DEV: f64 = 0.004;
    pub const CHAOS_FRICTION_MIN: f64 = 0.95;
    pub const CHAOS_FRICTION_MAX: f64 = 0.995;
}

/// Errors raised while talking to the drawing surface.
#[derive(Debug)]
pub enum WheelError {
    SurfaceUnavailable,
    Js(String),
}

impl fmt::Display for WheelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WheelError::SurfaceUnavailable => write!(f, "2D drawing context is not available"),
            WheelError::Js(msg) => write!(f, "Browser call failed: {}", msg),
        }
    }
}

impl std::error::Error for WheelError {}

impl From<JsValue> for WheelError {
    fn from(value: JsValue) -> Self {
        WheelError::Js(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
    }
}

/// Named bundle of physics parameters, picked at random for every spin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PhysicsPreset {
    pub name: &'static str,
    pub friction_per_frame: f64,
    pub initial_velocity_multiplier: f64,
    pub friction_is_stochastic: bool,
}

pub const PRESETS: [PhysicsPreset; 5] = [
    PhysicsPreset {
        name: "Classic",
        friction_per_frame: 0.985,
        initial_velocity_multiplier: 1.0,
        friction_is_stochastic: false,
    },
    PhysicsPreset {
        name: "Long Glide",
        friction_per_frame: 0.991,
        initial_velocity_multiplier: 0.85,
        friction_is_stochastic: false,
    },
    PhysicsPreset {
        name: "Quick Stop",
        friction_per_frame: 0.975,
        initial_velocity_multiplier: 1.2,
        friction_is_stochastic: false,
    },
    PhysicsPreset {
        name: "Heavy Wheel",
        friction_per_frame: 0.98,
        initial_velocity_multiplier: 1.4,
        friction_is_stochastic: false,
    },
    PhysicsPreset {
        name: "Chaos",
        friction_per_frame: 0.985,
        initial_velocity_multiplier: 1.1,
        friction_is_stochastic: true,
    },
];

/// Per-frame deceleration strategy.
pub trait FrictionModel {
    /// Multiplicative factor to apply to `velocity` on the next frame.
    fn next_friction<R: Rng + ?Sized>(&self, velocity: f64, rng: &mut R) -> f64;
}

impl FrictionModel for PhysicsPreset {
    fn next_friction<R: Rng + ?Sized>(&self, _velocity: f64, rng: &mut R) -> f64 {
        if !self.friction_is_stochastic {
            return self.friction_per_frame;
        }
        let jitter = match Normal::new(0.0, defaults::CHAOS_JITTER_STD_DEV) {
            Ok(normal) => normal.sample(rng),
            Err(_) => 0.0,
        };
        (self.friction_per_frame + jitter)
            .clamp(defaults::CHAOS_FRICTION_MIN, defaults::CHAOS_FRICTION_MAX)
    }
}

/// Pick one preset uniformly from the catalog.
pub fn choose_preset<R: Rng + ?Sized>(rng: &mut R) -> PhysicsPreset {
    PRESETS[rng.random_range(0..PRESETS.len())]
}

/// Sample the starting impulse for `preset`.
pub fn sample_initial_velocity<R: Rng + ?Sized>(preset: &PhysicsPreset, rng: &mut R) -> f64 {
    rng.random_range(defaults::BASE_VELOCITY_MIN..defaults::BASE_VELOCITY_MAX)
        * preset.initial_velocity_multiplier
}

/// Angular width of one slice, `None` for an empty wheel.
#[inline]
pub fn slice_width(count: usize) -> Option<f64> {
    (count > 0).then(|| TAU / count as f64)
}

/// Fold any rotation into `[0, 2π)`.
#[inline]
pub fn normalize_rotation(rotation: f64) -> f64 {
    let r = rotation.rem_euclid(TAU);
    // rem_euclid rounds tiny negative inputs up to exactly TAU
    if r >= TAU {
        0.0
    } else {
        r
    }
}

/// Index of the slice sitting under the pointer (fixed at angle 0) after the
/// wheel has turned by `rotation`.
///
/// Always in `[0, count)`; `None` only when `count == 0`.
pub fn winning_index(rotation: f64, count: usize) -> Option<usize> {
    let width = slice_width(count)?;
    let normalized = normalize_rotation(rotation);
    let pointer_angle = (TAU - normalized).rem_euclid(TAU);
    let raw = (pointer_angle / width).floor();
    if !raw.is_finite() || raw <= 0.0 {
        return Some(0);
    }
    Some((raw as usize).min(count - 1))
}

/// Number of slice boundaries the accumulated rotation has passed.
#[inline]
fn boundary_index(rotation: f64, count: usize) -> i64 {
    match slice_width(count) {
        Some(width) => (rotation / width).floor() as i64,
        None => 0,
    }
}

/// A spin in flight. The entry list is captured when the spin starts and the
/// winner is resolved against that copy.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveSpin {
    pub velocity: f64,
    pub initial_velocity: f64,
    pub preset: PhysicsPreset,
    pub entries: Vec<String>,
    boundary: i64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum SpinPhase {
    #[default]
    Idle,
    Spinning(ActiveSpin),
}

/// Result of asking the wheel to spin.
#[derive(Debug, Clone, PartialEq)]
pub enum SpinOutcome {
    Started {
        preset: &'static str,
        initial_velocity: f64,
    },
    AlreadySpinning,
    NoEntries,
    /// The last winner has not been acknowledged yet.
    WinnerPending,
}

impl SpinOutcome {
    pub fn is_started(&self) -> bool {
        matches!(self, SpinOutcome::Started { .. })
    }
}

/// The settled state of a finished spin.
#[derive(Debug, Clone, PartialEq)]
pub struct SpinResult {
    pub index: usize,
    pub winner: String,
    pub rotation: f64,
    pub preset: &'static str,
}

/// What happened during a single animation frame.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FrameReport {
    /// The wheel crossed at least one slice boundary.
    pub tick: bool,
    /// Number of slice boundaries crossed this frame.
    pub crossings: u32,
    /// Set exactly once per spin, on the frame it came to rest.
    pub settled: Option<SpinResult>,
}

/// Rotation plus the Idle/Spinning state machine.
#[derive(Debug, Clone, Default)]
pub struct SpinEngine {
    rotation: f64,
    phase: SpinPhase,
}

impl SpinEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn phase(&self) -> &SpinPhase {
        &self.phase
    }

    pub fn is_spinning(&self) -> bool {
        matches!(self.phase, SpinPhase::Spinning(_))
    }

    pub fn velocity(&self) -> f64 {
        match &self.phase {
            SpinPhase::Spinning(spin) => spin.velocity,
            SpinPhase::Idle => 0.0,
        }
    }

    /// Idle -> Spinning. Rejected while a spin is in flight or when there is
    /// nothing to land on.
    pub fn trigger<R: Rng + ?Sized>(&mut self, entries: &[String], rng: &mut R) -> SpinOutcome {
        if self.is_spinning() {
            debug!("Spin rejected: wheel is already spinning");
            return SpinOutcome::AlreadySpinning;
        }
        if entries.is_empty() {
            debug!("Spin rejected: no entries on the wheel");
            return SpinOutcome::NoEntries;
        }

        let preset = choose_preset(rng);
        let velocity = sample_initial_velocity(&preset, rng);
        info!(
            "Spin started with preset '{}' at {:.4} rad/frame over {} entries",
            preset.name,
            velocity,
            entries.len()
        );

        self.phase = SpinPhase::Spinning(ActiveSpin {
            velocity,
            initial_velocity: velocity,
            preset,
            entries: entries.to_vec(),
            boundary: boundary_index(self.rotation, entries.len()),
        });

        SpinOutcome::Started {
            preset: preset.name,
            initial_velocity: velocity,
        }
    }

    /// Advance one animation frame.
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> FrameReport {
        let SpinPhase::Spinning(spin) = &mut self.phase else {
            return FrameReport::default();
        };

        let friction = spin.preset.next_friction(spin.velocity, rng);
        spin.velocity *= friction;
        self.rotation += spin.velocity;

        let boundary = boundary_index(self.rotation, spin.entries.len());
        let crossings =
            u32::try_from((boundary - spin.boundary).unsigned_abs()).unwrap_or(u32::MAX);
        let tick = crossings > 0;
        spin.boundary = boundary;

        if spin.velocity.abs() >= defaults::STOP_THRESHOLD {
            return FrameReport {
                tick,
                crossings,
                settled: None,
            };
        }

        let SpinPhase::Spinning(spin) = std::mem::take(&mut self.phase) else {
            return FrameReport::default();
        };
        FrameReport {
            tick,
            crossings,
            settled: self.settle(spin),
        }
    }

    fn settle(&self, spin: ActiveSpin) -> Option<SpinResult> {
        let index = winning_index(self.rotation, spin.entries.len())?;
        let winner = spin.entries.into_iter().nth(index)?;
        info!(
            "Spin settled at {:.4} rad (normalized {:.4}): slice {} '{}'",
            self.rotation,
            normalize_rotation(self.rotation),
            index,
            winner
        );
        Some(SpinResult {
            index,
            winner,
            rotation: self.rotation,
            preset: spin.preset.name,
        })
    }
}

/// Name under the pointer at `rotation`, `None` for an empty list.
pub fn pick_entry(names: &[String], rotation: f64) -> Option<&str> {
    winning_index(rotation, names.len()).map(|idx| names[idx].as_str())
}

/// Winning slice for `count` entries at `rotation`, for scripts sharing the page.
#[wasm_bindgen]
pub fn winning_index_for(rotation: f64, count: usize) -> Option<usize> {
    winning_index(rotation, count)
}

/// Resolve the winner's text from a JS array of names.
///
/// Returns `null` for an empty or malformed list.
#[wasm_bindgen]
pub fn pick_winner(names_js: JsValue, rotation: f64) -> JsValue {
    let names: Vec<String> = match serde_wasm_bindgen::from_value(names_js) {
        Ok(n) => n,
        Err(e) => {
            debug!("pick_winner: failed to deserialize names: {}", e);
            return JsValue::NULL;
        }
    };
    match pick_entry(&names, rotation) {
        Some(name) => JsValue::from_str(name),
        None => JsValue::NULL,
    }
}

/// The physics preset catalog as plain JS objects.
#[wasm_bindgen]
pub fn preset_catalog() -> JsValue {
    serde_wasm_bindgen::to_value(&PRESETS[..]).unwrap_or(JsValue::NULL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::f64::consts::PI;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn run_to_rest(engine: &mut SpinEngine, rng: &mut StdRng) -> (usize, usize, SpinResult) {
        let mut frames = 0;
        let mut ticks = 0;
        loop {
            frames += 1;
            assert!(frames < 100_000, "spin never settled");
            let report = engine.step(rng);
            if report.tick {
                ticks += 1;
            }
            if let Some(result) = report.settled {
                return (frames, ticks, result);
            }
        }
    }

    #[test]
    fn slice_widths_cover_full_turn() {
        for n in 1..=50 {
            let width = slice_width(n).unwrap();
            assert_eq!(width, TAU / n as f64);
            let total: f64 = (0..n).map(|_| width).sum();
            assert!((total - TAU).abs() < 1e-9, "n = {}", n);
        }
        assert_eq!(slice_width(0), None);
    }

    #[test]
    fn winner_matches_documented_scenarios() {
        assert_eq!(winning_index(0.0, 4), Some(0));
        assert_eq!(winning_index(PI, 4), Some(2));
        assert_eq!(winning_index(TAU, 4), Some(0));
        // Mid-slice rotations, clear of any boundary.
        assert_eq!(winning_index(-PI / 4.0, 4), Some(0));
        assert_eq!(winning_index(PI / 4.0, 4), Some(3));
        assert_eq!(winning_index(3.0 * PI / 4.0, 4), Some(2));
    }

    #[test]
    fn winner_index_always_in_bounds() {
        let rotations = [
            0.0,
            TAU,
            -TAU,
            5.0 * TAU,
            -1e-15,
            1e-15,
            TAU - 1e-15,
            f64::EPSILON,
            1234.5678,
            -987.654,
            f64::NAN,
        ];
        for n in 1..=13 {
            for &r in &rotations {
                let idx = winning_index(r, n).unwrap();
                assert!(idx < n, "rotation {} with {} entries gave {}", r, n, idx);
            }
        }
        assert_eq!(winning_index(1.0, 0), None);
    }

    #[test]
    fn fast_frames_count_every_crossing() {
        // 50 slices are narrower than a strong frame's travel.
        let entries: Vec<String> = (0..50).map(|i| format!("N{}", i)).collect();
        let mut rng = StdRng::seed_from_u64(13);
        let mut engine = SpinEngine::new();
        engine.trigger(&entries, &mut rng);

        let mut total = 0u64;
        let mut busiest = 0;
        loop {
            let report = engine.step(&mut rng);
            total += report.crossings as u64;
            busiest = busiest.max(report.crossings);
            if report.settled.is_some() {
                break;
            }
        }
        let width = slice_width(entries.len()).unwrap();
        assert_eq!(total as i64, (engine.rotation() / width).floor() as i64);
        assert!(busiest > 1);
    }

    #[test]
    fn pick_entry_resolves_names() {
        let list = names(&["A", "B", "C", "D"]);
        assert_eq!(pick_entry(&list, 0.0), Some("A"));
        assert_eq!(pick_entry(&list, PI), Some("C"));
        assert_eq!(pick_entry(&list, PI / 4.0), Some("D"));
        assert_eq!(pick_entry(&[], 1.0), None);
    }

    #[test]
    fn normalize_stays_in_range() {
        for &r in &[-1e-17, -TAU, 3.0 * TAU + 0.5, 0.0, -0.25] {
            let n = normalize_rotation(r);
            assert!((0.0..TAU).contains(&n), "{} -> {}", r, n);
        }
    }

    #[test]
    fn trigger_with_no_entries_is_noop() {
        let mut engine = SpinEngine::new();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(engine.trigger(&[], &mut rng), SpinOutcome::NoEntries);
        assert_eq!(engine.phase(), &SpinPhase::Idle);
        assert_eq!(engine.rotation(), 0.0);
    }

    #[test]
    fn trigger_while_spinning_is_noop() {
        let mut engine = SpinEngine::new();
        let mut rng = StdRng::seed_from_u64(2);
        let entries = names(&["A", "B", "C"]);
        assert!(engine.trigger(&entries, &mut rng).is_started());
        engine.step(&mut rng);

        let before = engine.phase().clone();
        let rotation = engine.rotation();
        assert_eq!(
            engine.trigger(&entries, &mut rng),
            SpinOutcome::AlreadySpinning
        );
        assert_eq!(engine.phase(), &before);
        assert_eq!(engine.rotation(), rotation);
    }

    #[test]
    fn initial_velocity_respects_preset_multiplier() {
        let mut rng = StdRng::seed_from_u64(3);
        for preset in PRESETS.iter() {
            for _ in 0..100 {
                let v = sample_initial_velocity(preset, &mut rng);
                assert!(v >= defaults::BASE_VELOCITY_MIN * preset.initial_velocity_multiplier);
                assert!(v < defaults::BASE_VELOCITY_MAX * preset.initial_velocity_multiplier);
            }
        }
    }

    #[test]
    fn velocity_strictly_decreases_and_settles_once() {
        let entries = names(&["A", "B", "C", "D", "E"]);
        for seed in 0..40 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut engine = SpinEngine::new();
            engine.trigger(&entries, &mut rng);

            let mut previous = engine.velocity();
            let mut settled = 0;
            for _ in 0..100_000 {
                let report = engine.step(&mut rng);
                if report.settled.is_some() {
                    settled += 1;
                    break;
                }
                let v = engine.velocity();
                assert!(v < previous, "seed {}: {} !< {}", seed, v, previous);
                assert!(v.abs() >= defaults::STOP_THRESHOLD);
                previous = v;
            }
            assert_eq!(settled, 1);
            assert!(!engine.is_spinning());
            assert_eq!(engine.velocity(), 0.0);
            // Further frames are inert.
            assert_eq!(engine.step(&mut rng), FrameReport::default());
        }
    }

    #[test]
    fn settled_winner_matches_frozen_rotation() {
        let entries = names(&["A", "B", "C", "D"]);
        let mut rng = StdRng::seed_from_u64(99);
        let mut engine = SpinEngine::new();
        engine.trigger(&entries, &mut rng);
        let (_, ticks, result) = run_to_rest(&mut engine, &mut rng);

        assert_eq!(result.rotation, engine.rotation());
        let expected = winning_index(engine.rotation(), entries.len()).unwrap();
        assert_eq!(result.index, expected);
        assert_eq!(result.winner, entries[expected]);
        // A full-strength spin travels well over one full turn.
        assert!(ticks >= entries.len());
    }

    #[test]
    fn ticks_follow_slice_boundaries() {
        let entries = names(&["A", "B", "C", "D", "E", "F"]);
        let width = slice_width(entries.len()).unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        let mut engine = SpinEngine::new();
        engine.trigger(&entries, &mut rng);

        let mut last = (engine.rotation() / width).floor() as i64;
        loop {
            let report = engine.step(&mut rng);
            let now = (engine.rotation() / width).floor() as i64;
            assert_eq!(report.tick, now != last);
            assert_eq!(report.crossings as i64, (now - last).abs());
            last = now;
            if report.settled.is_some() {
                break;
            }
        }
    }

    #[test]
    fn chaos_friction_stays_within_bounds() {
        let chaos = PRESETS.iter().find(|p| p.friction_is_stochastic).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let mut seen_variation = false;
        for _ in 0..1000 {
            let f = chaos.next_friction(0.3, &mut rng);
            assert!((defaults::CHAOS_FRICTION_MIN..=defaults::CHAOS_FRICTION_MAX).contains(&f));
            if (f - chaos.friction_per_frame).abs() > 1e-12 {
                seen_variation = true;
            }
        }
        assert!(seen_variation);

        let classic = &PRESETS[0];
        assert_eq!(classic.next_friction(0.3, &mut rng), classic.friction_per_frame);
    }

    #[test]
    fn every_preset_gets_picked() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..500 {
            seen.insert(choose_preset(&mut rng).name);
        }
        assert_eq!(seen.len(), PRESETS.len());
    }

    #[test]
    fn preset_catalog_serializes() {
        let json = serde_json::to_value(&PRESETS[..]).unwrap();
        assert_eq!(json.as_array().unwrap().len(), 5);
        assert_eq!(json[4]["name"], "Chaos");
        assert_eq!(json[4]["friction_is_stochastic"], true);
    }
}
