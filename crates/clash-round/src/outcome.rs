//! Outcome resolution: who won a pair of moves.
//!
//! Pure functions only. Rock beats scissors, scissors beats paper, paper
//! beats rock. Moves outside that set are accepted as submitted and lose to
//! every standard move; two different non-standard moves tie.

use clash_protocol::{Choice, Outcome, Role};

/// Which seat won a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winner {
    Draw,
    Player1,
    Player2,
}

impl Winner {
    /// The result as seen from `role`.
    pub fn outcome_for(self, role: Role) -> Outcome {
        match (self, role) {
            (Self::Draw, _) => Outcome::Draw,
            (Self::Player1, Role::Player1) | (Self::Player2, Role::Player2) => Outcome::Win,
            _ => Outcome::Lose,
        }
    }
}

/// Decides a round given player1's and player2's moves.
pub fn resolve(player1: &Choice, player2: &Choice) -> Winner {
    if player1 == player2 {
        return Winner::Draw;
    }
    match (beats(player1, player2), beats(player2, player1)) {
        (true, _) => Winner::Player1,
        (_, true) => Winner::Player2,
        _ => Winner::Draw,
    }
}

fn beats(a: &Choice, b: &Choice) -> bool {
    match (a, b) {
        (Choice::Rock, Choice::Scissors)
        | (Choice::Scissors, Choice::Paper)
        | (Choice::Paper, Choice::Rock) => true,
        (Choice::Other(_), _) => false,
        (_, Choice::Other(_)) => true,
        _ => false,
    }
}
