//! Procedural sound effects.
//!
//! Two effects are synthesised on the fly: a short triangle-wave tick when the
//! wheel passes a slice boundary, and a staggered major triad when it comes to
//! rest. The underlying `AudioContext` is created lazily on first use, which
//! must happen inside a user gesture for browsers to allow playback.
//!
//! Audio is best effort: every failure is logged and swallowed.

use log::{debug, info, warn};
use std::cell::RefCell;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::{AudioContext, AudioContextState, OscillatorType};

/// Exponential ramps cannot reach zero; this is silent enough.
const SILENCE: f32 = 0.001;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Waveform {
    Sine,
    Triangle,
}

impl From<Waveform> for OscillatorType {
    fn from(w: Waveform) -> Self {
        match w {
            Waveform::Sine => OscillatorType::Sine,
            Waveform::Triangle => OscillatorType::Triangle,
        }
    }
}

/// One oscillator voice with its pitch sweep and gain envelope.
/// Times are seconds relative to the moment the effect is fired.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub waveform: Waveform,
    pub start: f64,
    pub frequency: f32,
    /// Target of an exponential pitch sweep over `sweep` seconds.
    pub sweep_to: Option<f32>,
    pub sweep: f64,
    pub peak_gain: f32,
    /// Linear attack; `0.0` starts at full gain.
    pub attack: f64,
    /// Exponential decay after the attack.
    pub decay: f64,
}

impl Tone {
    pub fn end(&self) -> f64 {
        self.start + self.attack + self.decay
    }
}

pub const TICK_START_HZ: f32 = 800.0;
pub const TICK_END_HZ: f32 = 1200.0;
pub const WIN_CHORD_HZ: [f32; 3] = [523.25, 659.25, 783.99];
pub const WIN_STAGGER_SECS: f64 = 0.1;

pub fn tick_tone() -> Tone {
    Tone {
        waveform: Waveform::Triangle,
        start: 0.0,
        frequency: TICK_START_HZ,
        sweep_to: Some(TICK_END_HZ),
        sweep: 0.01,
        peak_gain: 0.15,
        attack: 0.0,
        decay: 0.05,
    }
}

/// Time one animation frame covers; ticks from a single frame share it.
pub const TICK_SPREAD_SECS: f64 = 1.0 / 60.0;

/// `count` ticks spaced evenly across one frame.
pub fn tick_burst(count: u32) -> Vec<Tone> {
    let spacing = TICK_SPREAD_SECS / count.max(1) as f64;
    (0..count)
        .map(|i| Tone {
            start: i as f64 * spacing,
            ..tick_tone()
        })
        .collect()
}

pub fn win_chord() -> Vec<Tone> {
    WIN_CHORD_HZ
        .iter()
        .enumerate()
        .map(|(i, &frequency)| Tone {
            waveform: Waveform::Sine,
            start: i as f64 * WIN_STAGGER_SECS,
            frequency,
            sweep_to: None,
            sweep: 0.0,
            peak_gain: 0.2,
            attack: 0.05,
            decay: 1.5,
        })
        .collect()
}

/// Lifecycle of the engine's audio context.
pub enum AudioState {
    Uninitialized,
    Ready(AudioContext),
    Suspended(AudioContext),
    /// Creation failed; only an explicit [`AudioEngine::unlock`] retries.
    Unavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Uninitialized,
    Ready,
    Suspended,
    Unavailable,
}

pub struct AudioEngine {
    state: AudioState,
}

impl Default for AudioEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioEngine {
    pub const fn new() -> Self {
        Self {
            state: AudioState::Uninitialized,
        }
    }

    pub fn lifecycle(&self) -> Lifecycle {
        match self.state {
            AudioState::Uninitialized => Lifecycle::Uninitialized,
            AudioState::Ready(_) => Lifecycle::Ready,
            AudioState::Suspended(_) => Lifecycle::Suspended,
            AudioState::Unavailable => Lifecycle::Unavailable,
        }
    }

    /// Create or resume the context from inside a user gesture.
    pub fn unlock(&mut self) {
        if let AudioState::Unavailable = self.state {
            self.state = AudioState::Uninitialized;
        }
        self.acquire();
    }

    pub fn play_ticks(&mut self, count: u32) {
        if count == 0 {
            return;
        }
        if let Some(ctx) = self.acquire() {
            for tone in tick_burst(count) {
                if let Err(err) = schedule(&ctx, &tone) {
                    debug!("Tick sound failed: {:?}", err);
                }
            }
        }
    }

    pub fn play_win(&mut self) {
        if let Some(ctx) = self.acquire() {
            for tone in win_chord() {
                if let Err(err) = schedule(&ctx, &tone) {
                    debug!("Win chord voice failed: {:?}", err);
                }
            }
        }
    }

    fn acquire(&mut self) -> Option<AudioContext> {
        if let AudioState::Uninitialized = self.state {
            self.state = match AudioContext::new() {
                Ok(ctx) => {
                    info!("Audio context created");
                    AudioState::Ready(ctx)
                }
                Err(err) => {
                    warn!("Audio unavailable: {:?}", err);
                    AudioState::Unavailable
                }
            };
        }

        self.state = match std::mem::replace(&mut self.state, AudioState::Unavailable) {
            AudioState::Ready(ctx) | AudioState::Suspended(ctx) => match ctx.state() {
                AudioContextState::Running => AudioState::Ready(ctx),
                AudioContextState::Closed => {
                    debug!("Audio context closed; will recreate on next use");
                    AudioState::Uninitialized
                }
                _ => {
                    resume(&ctx);
                    AudioState::Suspended(ctx)
                }
            },
            other => other,
        };

        match &self.state {
            AudioState::Ready(ctx) | AudioState::Suspended(ctx) => Some(ctx.clone()),
            _ => None,
        }
    }
}

fn resume(ctx: &AudioContext) {
    let promise: js_sys::Promise = match ctx.resume() {
        Ok(p) => p,
        Err(err) => {
            debug!("Audio resume failed: {:?}", err);
            return;
        }
    };
    wasm_bindgen_futures::spawn_local(async move {
        if let Err(err) = JsFuture::from(promise).await {
            debug!("Audio resume rejected: {:?}", err);
        }
    });
}

fn schedule(ctx: &AudioContext, tone: &Tone) -> Result<(), JsValue> {
    let start = ctx.current_time() + tone.start;
    let peak_at = start + tone.attack;
    let end = start + tone.attack + tone.decay;

    let osc = ctx.create_oscillator()?;
    osc.set_type(tone.waveform.into());
    let frequency = osc.frequency();
    frequency.set_value_at_time(tone.frequency, start)?;
    if let Some(target) = tone.sweep_to {
        frequency.exponential_ramp_to_value_at_time(target, start + tone.sweep)?;
    }

    let gain = ctx.create_gain()?;
    let envelope = gain.gain();
    if tone.attack > 0.0 {
        envelope.set_value_at_time(0.0, start)?;
        envelope.linear_ramp_to_value_at_time(tone.peak_gain, peak_at)?;
    } else {
        envelope.set_value_at_time(tone.peak_gain, start)?;
    }
    envelope.exponential_ramp_to_value_at_time(SILENCE, end)?;

    osc.connect_with_audio_node(&gain)?;
    gain.connect_with_audio_node(&ctx.destination())?;
    osc.start_with_when(start)?;
    osc.stop_with_when(end)?;
    Ok(())
}

thread_local! {
    /// Page-wide engine shared by every wheel on the page.
    static ENGINE: RefCell<AudioEngine> = const { RefCell::new(AudioEngine::new()) };
}

pub fn unlock() {
    ENGINE.with(|e| e.borrow_mut().unlock());
}

pub fn play_ticks(count: u32) {
    ENGINE.with(|e| e.borrow_mut().play_ticks(count));
}

pub fn play_win() {
    ENGINE.with(|e| e.borrow_mut().play_win());
}

pub fn lifecycle() -> Lifecycle {
    ENGINE.with(|e| e.borrow().lifecycle())
}
