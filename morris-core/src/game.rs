//! Game state, rules enforcement and move generation

use crate::board::{
    adjacent, is_on_board, mills_through, neighbors, BOARD_SIZE, FLYING_THRESHOLD,
    MILLS, PIECES_PER_PLAYER,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// CORE TYPES
// ============================================================================

/// Player color
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    One = 0,
    Two = 1,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// Index into the per-player count arrays
    pub fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Player::One => write!(f, "player 1"),
            Player::Two => write!(f, "player 2"),
        }
    }
}

/// Game phase. A single shared field, re-evaluated for whichever player is
/// about to move: a side with three pieces left flies while it is on turn,
/// even if its opponent still has more.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Placement,
    Movement,
    Flying,
}

/// A command against the rules engine
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    /// Place a piece during the placement phase
    Place(u8),
    /// Toggle selection of one of the mover's pieces
    Select(u8),
    /// Relocate a piece
    Shift { from: u8, to: u8 },
    /// Remove an opponent piece after closing a mill
    Capture(u8),
    /// Resolve a mill with nothing to remove
    SkipCapture,
}

/// Rule violations. Every rejected call leaves the state unchanged.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("position {0} is not on the board")]
    OutOfRange(u8),
    #[error("position {0} is already occupied")]
    Occupied(u8),
    #[error("position {0} does not hold the current player's piece")]
    NotYourPiece(u8),
    #[error("positions {from} and {to} are not connected")]
    NotAdjacent { from: u8, to: u8 },
    #[error("no pieces left to place")]
    NoPiecesRemaining,
    #[error("operation is not legal in the {0:?} phase")]
    WrongPhase(Phase),
    #[error("no piece is selected")]
    NoSelection,
    #[error("no capture is pending")]
    NotAwaitingCapture,
    #[error("a capture is pending; only capture or skip is legal")]
    AwaitingCapture,
    #[error("piece at {0} is protected by a mill")]
    ProtectedPiece(u8),
    #[error("position {0} does not hold an opponent piece")]
    NotOpponentPiece(u8),
    #[error("the game is already over")]
    GameOver,
}

// ============================================================================
// GAME STATE
// ============================================================================

/// Full game state. A plain value type: search branches clone it and each
/// copy is fully independent of the live game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// Cell occupancy, indexed by position
    board: [Option<Player>; BOARD_SIZE],

    current_player: Player,
    phase: Phase,

    /// Pieces left to place, per player
    pieces_remaining: [u8; 2],
    /// Pieces currently on the board, per player
    pieces_on_board: [u8; 2],

    /// Selected piece during movement/flying
    selected: Option<u8>,
    /// Removable opponent positions while a mill capture is unresolved.
    /// While set, the turn does not pass and only capture/skip is legal.
    pending_capture: Option<Vec<u8>>,

    game_over: bool,
    winner: Option<Player>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Fresh game: empty board, nine pieces in hand per player
    pub fn new() -> Self {
        Self {
            board: [None; BOARD_SIZE],
            current_player: Player::One,
            phase: Phase::Placement,
            pieces_remaining: [PIECES_PER_PLAYER; 2],
            pieces_on_board: [0; 2],
            selected: None,
            pending_capture: None,
            game_over: false,
            winner: None,
        }
    }

    // ========================================================================
    // ACCESSORS (side-effect free query surface)
    // ========================================================================

    pub fn current_player(&self) -> Player {
        self.current_player
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Board snapshot
    pub fn board(&self) -> &[Option<Player>; BOARD_SIZE] {
        &self.board
    }

    /// Occupant of a single position
    pub fn cell(&self, pos: u8) -> Option<Player> {
        self.board[pos as usize]
    }

    pub fn pieces_remaining(&self, player: Player) -> u8 {
        self.pieces_remaining[player.index()]
    }

    pub fn pieces_on_board(&self, player: Player) -> u8 {
        self.pieces_on_board[player.index()]
    }

    pub fn selected(&self) -> Option<u8> {
        self.selected
    }

    /// Removable positions while a capture is pending
    pub fn pending_capture(&self) -> Option<&[u8]> {
        self.pending_capture.as_deref()
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn winner(&self) -> Option<Player> {
        self.winner
    }

    /// Whether `player` may move to any empty position while on turn
    pub fn can_fly(&self, player: Player) -> bool {
        self.phase == Phase::Flying
            && self.pieces_on_board[player.index()] <= FLYING_THRESHOLD
    }

    // ========================================================================
    // MILL DETECTION
    // ========================================================================

    /// Check if `pos` completes a mill for `player` on the current board
    pub fn forms_mill(&self, pos: u8, player: Player) -> bool {
        mills_through(pos)
            .any(|triple| triple.iter().all(|&p| self.board[p as usize] == Some(player)))
    }

    /// Check if moving `player`'s piece to `to` would close a mill,
    /// treating `from` (if any) as vacated
    pub fn would_close_mill(&self, from: Option<u8>, to: u8, player: Player) -> bool {
        mills_through(to).any(|triple| {
            triple.iter().all(|&p| {
                p == to || (Some(p) != from && self.board[p as usize] == Some(player))
            })
        })
    }

    /// Count completed mills owned by `player`
    pub fn mill_count(&self, player: Player) -> u32 {
        MILLS
            .iter()
            .filter(|triple| triple.iter().all(|&p| self.board[p as usize] == Some(player)))
            .count() as u32
    }

    /// Opponent positions that may legally be removed after a mill.
    /// Pieces inside a mill are protected, unless every opponent piece
    /// sits in a mill, in which case all of them are fair game.
    pub fn removable_positions(&self, opponent: Player) -> Vec<u8> {
        let mut removable: Vec<u8> = (0..BOARD_SIZE as u8)
            .filter(|&p| self.board[p as usize] == Some(opponent) && !self.forms_mill(p, opponent))
            .collect();

        if removable.is_empty() {
            removable = (0..BOARD_SIZE as u8)
                .filter(|&p| self.board[p as usize] == Some(opponent))
                .collect();
        }

        removable
    }

    /// Number of empty positions adjacent to `player`'s pieces
    pub fn mobility(&self, player: Player) -> u32 {
        let mut count = 0;
        for pos in 0..BOARD_SIZE as u8 {
            if self.board[pos as usize] != Some(player) {
                continue;
            }
            for &adj in neighbors(pos) {
                if self.board[adj as usize].is_none() {
                    count += 1;
                }
            }
        }
        count
    }

    /// Whether `player` has at least one legal destination move
    fn has_moves(&self, player: Player) -> bool {
        if self.pieces_on_board[player.index()] <= FLYING_THRESHOLD {
            // A flying side moves anywhere empty
            return self.board.iter().any(|cell| cell.is_none());
        }

        (0..BOARD_SIZE as u8).any(|pos| {
            self.board[pos as usize] == Some(player)
                && neighbors(pos).iter().any(|&adj| self.board[adj as usize].is_none())
        })
    }

    // ========================================================================
    // MUTATING OPERATIONS (validate fully, then mutate)
    // ========================================================================

    /// Place a piece at `pos` for the current player
    pub fn place(&mut self, pos: u8) -> Result<(), RuleError> {
        self.check_active()?;
        if !is_on_board(pos) {
            return Err(RuleError::OutOfRange(pos));
        }
        if self.phase != Phase::Placement {
            return Err(RuleError::WrongPhase(self.phase));
        }
        if self.board[pos as usize].is_some() {
            return Err(RuleError::Occupied(pos));
        }
        if self.pieces_remaining[self.current_player.index()] == 0 {
            return Err(RuleError::NoPiecesRemaining);
        }

        let mover = self.current_player;
        self.board[pos as usize] = Some(mover);
        self.pieces_remaining[mover.index()] -= 1;
        self.pieces_on_board[mover.index()] += 1;

        self.resolve_placement_or_shift(pos, mover);
        Ok(())
    }

    /// Toggle selection of one of the current player's pieces
    pub fn select(&mut self, pos: u8) -> Result<(), RuleError> {
        self.check_active()?;
        if !is_on_board(pos) {
            return Err(RuleError::OutOfRange(pos));
        }
        if self.phase == Phase::Placement {
            return Err(RuleError::WrongPhase(self.phase));
        }

        if self.selected == Some(pos) {
            self.selected = None;
            return Ok(());
        }
        if self.board[pos as usize] != Some(self.current_player) {
            return Err(RuleError::NotYourPiece(pos));
        }
        self.selected = Some(pos);
        Ok(())
    }

    /// Move the selected piece to `to`
    pub fn move_to(&mut self, to: u8) -> Result<(), RuleError> {
        let from = self.selected.ok_or(RuleError::NoSelection)?;
        self.shift(from, to)
    }

    /// Relocate a piece from `from` to `to`
    pub fn shift(&mut self, from: u8, to: u8) -> Result<(), RuleError> {
        self.check_active()?;
        if !is_on_board(from) {
            return Err(RuleError::OutOfRange(from));
        }
        if !is_on_board(to) {
            return Err(RuleError::OutOfRange(to));
        }
        if self.phase == Phase::Placement {
            return Err(RuleError::WrongPhase(self.phase));
        }
        let mover = self.current_player;
        if self.board[from as usize] != Some(mover) {
            return Err(RuleError::NotYourPiece(from));
        }
        if self.board[to as usize].is_some() {
            return Err(RuleError::Occupied(to));
        }
        if !self.can_fly(mover) && !adjacent(from, to) {
            return Err(RuleError::NotAdjacent { from, to });
        }

        self.board[from as usize] = None;
        self.board[to as usize] = Some(mover);
        self.selected = None;

        self.resolve_placement_or_shift(to, mover);
        Ok(())
    }

    /// Remove the opponent piece at `pos` to resolve a pending capture
    pub fn capture(&mut self, pos: u8) -> Result<(), RuleError> {
        if self.game_over {
            return Err(RuleError::GameOver);
        }
        let removable = self
            .pending_capture
            .as_deref()
            .ok_or(RuleError::NotAwaitingCapture)?;
        if !is_on_board(pos) {
            return Err(RuleError::OutOfRange(pos));
        }
        let opponent = self.current_player.opponent();
        if self.board[pos as usize] != Some(opponent) {
            return Err(RuleError::NotOpponentPiece(pos));
        }
        if !removable.contains(&pos) {
            return Err(RuleError::ProtectedPiece(pos));
        }

        self.board[pos as usize] = None;
        self.pieces_on_board[opponent.index()] -= 1;
        self.pending_capture = None;

        self.check_win(opponent);
        if !self.game_over {
            self.end_ply();
        }
        Ok(())
    }

    /// Resolve a pending capture without removing a piece
    pub fn skip_capture(&mut self) -> Result<(), RuleError> {
        if self.game_over {
            return Err(RuleError::GameOver);
        }
        if self.pending_capture.is_none() {
            return Err(RuleError::NotAwaitingCapture);
        }
        self.pending_capture = None;
        self.end_ply();
        Ok(())
    }

    /// Pure application: clone, apply, return the new state.
    /// The search engine works exclusively through this so that no branch
    /// can observe another branch's mutations.
    pub fn apply(&self, mv: Move) -> Result<GameState, RuleError> {
        let mut next = self.clone();
        match mv {
            Move::Place(pos) => next.place(pos)?,
            Move::Select(pos) => next.select(pos)?,
            Move::Shift { from, to } => next.shift(from, to)?,
            Move::Capture(pos) => next.capture(pos)?,
            Move::SkipCapture => next.skip_capture()?,
        }
        Ok(next)
    }

    // ========================================================================
    // MOVE GENERATION
    // ========================================================================

    /// All legal moves for the current player, in deterministic order
    /// (ascending source, then ascending destination)
    pub fn legal_moves(&self) -> Vec<Move> {
        if self.game_over {
            return vec![];
        }

        if let Some(removable) = &self.pending_capture {
            if removable.is_empty() {
                return vec![Move::SkipCapture];
            }
            return removable.iter().map(|&p| Move::Capture(p)).collect();
        }

        let mut moves = Vec::new();
        match self.phase {
            Phase::Placement => {
                for pos in 0..BOARD_SIZE as u8 {
                    if self.board[pos as usize].is_none() {
                        moves.push(Move::Place(pos));
                    }
                }
            }
            Phase::Movement | Phase::Flying => {
                let mover = self.current_player;
                let flying = self.can_fly(mover);
                for from in 0..BOARD_SIZE as u8 {
                    if self.board[from as usize] != Some(mover) {
                        continue;
                    }
                    if flying {
                        for to in 0..BOARD_SIZE as u8 {
                            if self.board[to as usize].is_none() {
                                moves.push(Move::Shift { from, to });
                            }
                        }
                    } else {
                        for &to in neighbors(from) {
                            if self.board[to as usize].is_none() {
                                moves.push(Move::Shift { from, to });
                            }
                        }
                    }
                }
            }
        }
        moves
    }

    // ========================================================================
    // INTERNALS
    // ========================================================================

    fn check_active(&self) -> Result<(), RuleError> {
        if self.game_over {
            return Err(RuleError::GameOver);
        }
        if self.pending_capture.is_some() {
            return Err(RuleError::AwaitingCapture);
        }
        Ok(())
    }

    /// Shared tail of `place` and `shift`: mill check at the played
    /// position, then either open the capture sub-state or pass the turn
    fn resolve_placement_or_shift(&mut self, pos: u8, mover: Player) {
        if self.forms_mill(pos, mover) {
            self.pending_capture = Some(self.removable_positions(mover.opponent()));
        } else {
            self.end_ply();
        }
    }

    /// Pass the turn and re-evaluate the phase for the incoming player
    fn end_ply(&mut self) {
        self.current_player = self.current_player.opponent();
        self.update_phase();
    }

    /// Once placement is exhausted, the shared phase field tracks the
    /// player about to move: Flying when they are down to three pieces
    fn update_phase(&mut self) {
        if self.pieces_remaining == [0, 0] {
            let previous = self.phase;
            self.phase = if self.pieces_on_board[self.current_player.index()] <= FLYING_THRESHOLD {
                Phase::Flying
            } else {
                Phase::Movement
            };
            if self.phase != previous {
                self.selected = None;
            }
        }
    }

    /// Test-only: hand-build a movement-phase position
    #[cfg(test)]
    pub(crate) fn with_pieces(p1: &[u8], p2: &[u8], current: Player) -> Self {
        let mut state = Self::new();
        state.pieces_remaining = [0, 0];
        for &p in p1 {
            state.board[p as usize] = Some(Player::One);
        }
        for &p in p2 {
            state.board[p as usize] = Some(Player::Two);
        }
        state.pieces_on_board = [p1.len() as u8, p2.len() as u8];
        state.current_player = current;
        state.update_phase();
        state
    }

    /// Terminal evaluation, run after every capture. The capturing player
    /// wins if the opponent is down to two pieces with nothing in hand, or
    /// is boxed in with no destination move.
    fn check_win(&mut self, opponent: Player) {
        let starved = self.pieces_on_board[opponent.index()] < 3
            && self.pieces_remaining[opponent.index()] == 0;
        let boxed_in = self.phase != Phase::Placement && !self.has_moves(opponent);

        if starved || boxed_in {
            self.game_over = true;
            self.winner = Some(self.current_player);
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
