pub const N_CORNERS: usize = 8;
pub const N_EDGES: usize = 12;
pub const N_MOVE: usize = 18;

// phase 1 coordinates
/// 3^7 possible corner orientations
pub const N_TWIST: usize = 2187;
/// 2^11 possible edge flips
pub const N_FLIP: usize = 2048;
/// 12 choose 4 possible positions of the FR, FL, BL, BR edges
pub const N_SLICE1: usize = 495;

// phase 2 coordinates
/// 4! permutations of the FR, FL, BL, BR edges
pub const N_SLICE2: usize = 24;
/// 2 possible corner permutation parities
pub const N_PARITY: usize = 2;
/// 8!/(8-6)! permutations of the URF, UFL, ULB, UBR, DFR, DLF corners
pub const N_URF_TO_DLF: usize = 20160;
/// 12!/(12-4)! permutations of the FR, FL, BL, BR edges
pub const N_FR_TO_BR: usize = 11880;
/// 12!/(12-3)! permutations of the UR, UF, UL edges
pub const N_UR_TO_UL: usize = 1320;
/// 12!/(12-3)! permutations of the UB, DR, DF edges
pub const N_UB_TO_DF: usize = 1320;
/// 8!/(8-6)! permutations of the UR, UF, UL, UB, DR, DF edges
pub const N_UR_TO_DF: usize = 20160;
/// UrToUl and UbToDf values with all three edges inside the U and D faces.
pub const N_MERGE: usize = 336;

/// Marks a merge table entry whose two edge triples overlap.
pub const MERGE_INVALID: u16 = u16::MAX;

/// Solved value of the UbToDf coordinate.
pub const SOLVED_UB_TO_DF: u16 = 114;

/// Capacity of the search stack; no solution longer than this is ever searched.
pub const MAX_SEARCH_DEPTH: usize = 30;
/// Phase 2 is never searched deeper than this.
pub const MAX_PHASE2_DEPTH: usize = 10;
