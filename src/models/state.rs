use serde::{Deserialize, Serialize};

/// Writer coordinator state machine.
///
/// State transitions:
/// ```text
/// idle → preparing_to_open → open → draining_part1 → draining_part2
///                              ↓           ↓               ↓
///                            failed ← ── failed        finalized / failed
/// ```
///
/// Transitions are monotonic and the terminal states are absorbing. A new
/// recording attempt always constructs a fresh coordinator; the machine is
/// never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriterState {
    /// Initial state; track registration allowed.
    Idle,
    /// Sink provisioning is in flight on the writer queue.
    PreparingToOpen,
    /// Sink is open and accepting appends.
    Open,
    /// Drain requested; the append gate is closed, in-flight appends run out.
    DrainingPart1,
    /// Writer queue quiesced; sink finalize has been invoked.
    DrainingPart2,
    /// Terminal: artifact finalized and retained.
    Finalized,
    /// Terminal: attempt failed, partial artifact deleted.
    Failed,
}

impl WriterState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finalized | Self::Failed)
    }

    /// Whether the append gate is open.
    pub fn accepts_appends(&self) -> bool {
        matches!(self, Self::Open)
    }

    /// Whether append is permitted at all (past the point where calling it
    /// is a contract violation).
    pub fn append_permitted(&self) -> bool {
        !matches!(self, Self::Idle | Self::PreparingToOpen)
    }
}

impl Default for WriterState {
    fn default() -> Self {
        Self::Idle
    }
}

/// Outer recording session state machine.
///
/// State transitions:
/// ```text
/// idle → starting → active → stopping → idle
///            ↓         ↓
///          idle (on writer failure)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    /// No recording in progress; no writer reference retained.
    Idle,
    /// Writer constructed, waiting for it to finish preparing.
    Starting,
    /// Writer open; incoming samples are forwarded.
    Active,
    /// Drain requested, waiting for the writer to finalize.
    Stopping,
}

impl SessionState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::Idle
    }
}
