use crate::entries::{remove_first, shuffle_entries, EditBuffer};
use crate::render::{build_scene, DrawOp};
use crate::{FrameReport, SpinEngine, SpinOutcome, SpinPhase, SpinResult};
use log::{debug, info};
use rand::Rng;

/// All state behind one wheel: the committed entries, the spin engine, the
/// open edit buffer (if any) and the last winner awaiting acknowledgement.
///
/// Every mutation goes through a method here; rendering reads a snapshot via
/// [`WheelWidget::scene`].
#[derive(Debug, Clone, Default)]
pub struct WheelWidget {
    entries: Vec<String>,
    engine: SpinEngine,
    editor: Option<EditBuffer>,
    winner: Option<SpinResult>,
}

impl WheelWidget {
    pub fn new<I, S>(seed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entries: seed.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn rotation(&self) -> f64 {
        self.engine.rotation()
    }

    pub fn is_spinning(&self) -> bool {
        self.engine.is_spinning()
    }

    pub fn can_spin(&self) -> bool {
        !self.is_spinning() && !self.entries.is_empty() && self.winner.is_none()
    }

    pub fn can_shuffle(&self) -> bool {
        self.entries.len() >= 2
    }

    /// Start a spin over a snapshot of the current entries. Refused while
    /// the previous winner is still waiting to be dismissed or removed.
    pub fn trigger_spin<R: Rng + ?Sized>(&mut self, rng: &mut R) -> SpinOutcome {
        if let Some(pending) = &self.winner {
            debug!("Spin rejected: winner '{}' not acknowledged", pending.winner);
            return SpinOutcome::WinnerPending;
        }
        self.engine.trigger(&self.entries, rng)
    }

    /// Advance one animation frame, recording the winner when the wheel stops.
    pub fn frame<R: Rng + ?Sized>(&mut self, rng: &mut R) -> FrameReport {
        let report = self.engine.step(rng);
        if let Some(result) = &report.settled {
            self.winner = Some(result.clone());
        }
        report
    }

    pub fn winner(&self) -> Option<&SpinResult> {
        self.winner.as_ref()
    }

    /// Close the winner dialog without touching the entries.
    pub fn dismiss_winner(&mut self) {
        self.winner = None;
    }

    /// Drop one entry matching the winner's text, then dismiss.
    pub fn remove_winner(&mut self) -> bool {
        let Some(result) = self.winner.take() else {
            return false;
        };
        let removed = remove_first(&mut self.entries, &result.winner);
        if removed {
            info!(
                "Removed winner '{}', {} entries left",
                result.winner,
                self.entries.len()
            );
        }
        removed
    }

    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        shuffle_entries(&mut self.entries, rng)
    }

    /// Open (or reopen) the management view on a fresh copy of the entries.
    pub fn open_editor(&mut self) -> &mut EditBuffer {
        self.editor.insert(EditBuffer::open(&self.entries))
    }

    pub fn editor(&self) -> Option<&EditBuffer> {
        self.editor.as_ref()
    }

    pub fn editor_mut(&mut self) -> Option<&mut EditBuffer> {
        self.editor.as_mut()
    }

    /// Replace the entries with the buffer's contents and close the editor.
    pub fn save_editor(&mut self) -> bool {
        let Some(buffer) = self.editor.take() else {
            return false;
        };
        self.entries = buffer.commit();
        info!("Committed {} entries", self.entries.len());
        true
    }

    /// Close the editor, leaving the entries untouched.
    pub fn discard_editor(&mut self) {
        self.editor = None;
    }

    /// Draw list for the current frame. While spinning, the wheel shows the
    /// entries it will resolve the winner against.
    pub fn scene(&self) -> Vec<DrawOp> {
        let names = match self.engine.phase() {
            SpinPhase::Spinning(spin) => &spin.entries,
            SpinPhase::Idle => &self.entries,
        };
        build_scene(names, self.engine.rotation())
    }
}
