//! Interpretation session state machine
//!
//! One interpretation session moves through these states in order, driven
//! by user actions and ad completions. The transition function is pure so
//! any frontend (web page, CLI) can drive it.

/// UI-visible state of one interpretation session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiState {
    Idle,
    Loading,
    Interpreted,
    FirstRevealPending,
    FirstRevealed,
    SecondRevealPending,
    SecondRevealed,
    Failed,
}

/// Events that can advance a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// User submitted (already validated) dream text.
    Submit,
    /// The model responded and parsing produced a result.
    InterpretationReady,
    /// Transport or upstream payload failure.
    InterpretationFailed,
    /// User asked for the first batch of numbers.
    RevealFirst,
    FirstAdFinished,
    /// User asked for the remaining numbers.
    RevealSecond,
    SecondAdFinished,
}

/// Pure transition function. Events that make no sense in the current
/// state leave it unchanged; in particular a second Submit while Loading
/// is ignored, which serializes submissions.
pub fn transition(state: UiState, event: Event) -> UiState {
    use Event::*;
    use UiState::*;

    match (state, event) {
        (Idle | Failed | SecondRevealed, Submit) => Loading,
        (Loading, InterpretationReady) => Interpreted,
        (Loading, InterpretationFailed) => Failed,
        (Interpreted, RevealFirst) => FirstRevealPending,
        (FirstRevealPending, FirstAdFinished) => FirstRevealed,
        (FirstRevealed, RevealSecond) => SecondRevealPending,
        (SecondRevealPending, SecondAdFinished) => SecondRevealed,
        (state, _) => state,
    }
}
