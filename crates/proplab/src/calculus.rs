use serde::{Deserialize, Serialize};

/// Answer to a close check.
#[derive(Debug, Serialize, Deserialize)]
pub struct CloseMsg {
    /// Whether the proof is finished. For an equivalence proof this means the
    /// last step is structurally equal to the target formula.
    pub closed: bool,
    /// Human-readable verdict shown to the student.
    pub msg: String,
}

/// A proof procedure driven by a client. `parse_formula` seeds a state,
/// `apply_move` returns the next state or rejects the move, and
/// `check_close` reports whether the proof is done. `validate` rejects
/// states the client may have tampered with.
pub trait Calculus<'f> {
    type Params;
    type State;
    type Move;
    type Error;

    fn parse_formula(
        formula: &'f str,
        params: Option<Self::Params>,
    ) -> Result<Self::State, Self::Error>;

    fn validate(_state: Self::State) -> bool {
        true
    }

    fn apply_move(state: Self::State, k_move: Self::Move) -> Result<Self::State, Self::Error>;

    fn check_close(state: Self::State) -> CloseMsg;
}
