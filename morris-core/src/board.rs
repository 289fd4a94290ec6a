//! Board topology for the 24-point morris board
//!
//! Positions are numbered 0-23, outer ring first:
//!
//! ```text
//!  0-----------1-----------2
//!  |           |           |
//!  |   3-------4-------5   |
//!  |   |       |       |   |
//!  |   |   6---7---8   |   |
//!  9--10--11      12--13--14
//!  |   |  15--16--17   |   |
//!  |   |       |       |   |
//!  |  18------19------20   |
//!  |           |           |
//! 21----------22----------23
//! ```

/// Number of positions on the board
pub const BOARD_SIZE: usize = 24;

/// Pieces each player starts with
pub const PIECES_PER_PLAYER: u8 = 9;

/// A player with this many pieces (or fewer) on the board may fly
pub const FLYING_THRESHOLD: u8 = 3;

/// Adjacency relation: which positions are directly connected
pub const NEIGHBORS: [&[u8]; BOARD_SIZE] = [
    &[1, 9],             // 0
    &[0, 2, 4],          // 1
    &[1, 14],            // 2
    &[4, 10],            // 3
    &[1, 3, 5, 7],       // 4
    &[4, 13],            // 5
    &[7, 11],            // 6
    &[4, 6, 8],          // 7
    &[7, 12],            // 8
    &[0, 10, 21],        // 9
    &[3, 9, 11, 18],     // 10
    &[6, 10, 15],        // 11
    &[8, 13, 17],        // 12
    &[5, 12, 14, 20],    // 13
    &[2, 13, 23],        // 14
    &[11, 16],           // 15
    &[15, 17, 19],       // 16
    &[12, 16],           // 17
    &[10, 19],           // 18
    &[16, 18, 20, 22],   // 19
    &[13, 19],           // 20
    &[9, 22],            // 21
    &[19, 21, 23],       // 22
    &[14, 22],           // 23
];

/// The 16 straight-line triples. Declared data; a mill line is not
/// derivable from adjacency alone.
pub const MILLS: [[u8; 3]; 16] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [9, 10, 11],
    [12, 13, 14],
    [15, 16, 17],
    [18, 19, 20],
    [21, 22, 23],
    [0, 9, 21],
    [3, 10, 18],
    [6, 11, 15],
    [1, 4, 7],
    [16, 19, 22],
    [8, 12, 17],
    [5, 13, 20],
    [2, 14, 23],
];

/// Check if a position index is on the board
pub fn is_on_board(pos: u8) -> bool {
    (pos as usize) < BOARD_SIZE
}

/// Positions directly connected to `pos`
pub fn neighbors(pos: u8) -> &'static [u8] {
    NEIGHBORS[pos as usize]
}

/// Check if two positions are directly connected
pub fn adjacent(a: u8, b: u8) -> bool {
    neighbors(a).contains(&b)
}

/// Iterate the mill triples that pass through `pos`
pub fn mills_through(pos: u8) -> impl Iterator<Item = &'static [u8; 3]> {
    MILLS.iter().filter(move |triple| triple.contains(&pos))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjacency_is_symmetric() {
        for a in 0..BOARD_SIZE as u8 {
            for &b in neighbors(a) {
                assert!(adjacent(b, a), "{} -> {} not mirrored", a, b);
            }
        }
    }

    #[test]
    fn test_neighbor_degree_bounds() {
        for a in 0..BOARD_SIZE {
            let degree = NEIGHBORS[a].len();
            assert!((2..=4).contains(&degree), "position {} has degree {}", a, degree);
        }
    }

    #[test]
    fn test_every_position_in_exactly_two_mills() {
        for pos in 0..BOARD_SIZE as u8 {
            assert_eq!(mills_through(pos).count(), 2, "position {}", pos);
        }
    }

    #[test]
    fn test_mill_endpoints_reachable_through_middle() {
        // Each triple is a straight line: ends are adjacent to the middle
        for [a, b, c] in MILLS {
            assert!(adjacent(a, b), "{}-{}", a, b);
            assert!(adjacent(b, c), "{}-{}", b, c);
        }
    }

    #[test]
    fn test_out_of_range() {
        assert!(is_on_board(0));
        assert!(is_on_board(23));
        assert!(!is_on_board(24));
    }
}
