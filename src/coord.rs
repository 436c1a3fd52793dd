use std::{fmt, path::Path};

use crate::constants::*;
use crate::cubie::{self, Corner, CubieCube};
use crate::load_or_build;
use crate::moves::{Move, MoveTables};

/// The scalar coordinates a cube is summarized by during the search.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Coord {
    /// Orientation of the 8 corners.
    Twist,
    /// Orientation of the 12 edges.
    Flip,
    /// Location and order of the FR, FL, BL and BR edges.
    FrToBr,
    /// Location of the FR, FL, BL and BR edges, `FrToBr / 24`.
    Slice,
    /// Order of the FR, FL, BL and BR edges inside the slice, `FrToBr % 24` in phase 2.
    SlicePerm,
    /// Permutation of the URF, UFL, ULB, UBR, DFR and DLF corners.
    UrfToDlf,
    /// Permutation of the UR, UF and UL edges.
    UrToUl,
    /// Permutation of the UB, DR and DF edges.
    UbToDf,
    /// Permutation of the UR, UF, UL, UB, DR and DF edges, phase 2 only.
    UrToDf,
    /// Parity of the corner permutation.
    Parity,
}

impl Coord {
    /// Number of values the coordinate takes.
    pub fn size(self) -> usize {
        match self {
            Coord::Twist => N_TWIST,
            Coord::Flip => N_FLIP,
            Coord::FrToBr => N_FR_TO_BR,
            Coord::Slice => N_SLICE1,
            Coord::SlicePerm => N_SLICE2,
            Coord::UrfToDlf => N_URF_TO_DLF,
            Coord::UrToUl => N_UR_TO_UL,
            Coord::UbToDf => N_UB_TO_DF,
            Coord::UrToDf => N_UR_TO_DF,
            Coord::Parity => N_PARITY,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Coord::Twist => "twist",
            Coord::Flip => "flip",
            Coord::FrToBr => "fr_to_br",
            Coord::Slice => "slice",
            Coord::SlicePerm => "slice_perm",
            Coord::UrfToDlf => "urf_to_dlf",
            Coord::UrToUl => "ur_to_ul",
            Coord::UbToDf => "ub_to_df",
            Coord::UrToDf => "ur_to_df",
            Coord::Parity => "parity",
        }
    }

    /// The value of this coordinate for `cc`.
    pub fn get(self, cc: &CubieCube) -> u16 {
        match self {
            Coord::Twist => cc.get_twist(),
            Coord::Flip => cc.get_flip(),
            Coord::FrToBr => cc.get_fr_to_br(),
            Coord::Slice => cc.get_fr_to_br() / N_SLICE2 as u16,
            Coord::SlicePerm => cc.get_fr_to_br() % N_SLICE2 as u16,
            Coord::UrfToDlf => cc.get_urf_to_dlf(),
            Coord::UrToUl => cc.get_ur_to_ul(),
            Coord::UbToDf => cc.get_ub_to_df(),
            Coord::UrToDf => cc.get_ur_to_df(),
            Coord::Parity => cc.get_corner_parity() as u16,
        }
    }

    /// Overwrite the pieces described by this coordinate so that `self.get(cc) == value`.
    ///
    /// Pieces not tracked by the coordinate are reset to an arbitrary but valid arrangement.
    pub fn set(self, cc: &mut CubieCube, value: u16) {
        match self {
            Coord::Twist => cc.set_twist(value),
            Coord::Flip => cc.set_flip(value),
            Coord::FrToBr | Coord::SlicePerm => cc.set_fr_to_br(value),
            Coord::Slice => cc.set_fr_to_br(value * N_SLICE2 as u16),
            Coord::UrfToDlf => cc.set_urf_to_dlf(value),
            Coord::UrToUl => cc.set_ur_to_ul(value),
            Coord::UbToDf => cc.set_ub_to_df(value),
            Coord::UrToDf => cc.set_ur_to_df(value),
            Coord::Parity => {
                cc.cp = cubie::ALL_CORNERS;
                if value == 1 {
                    cc.cp.swap(Corner::DBL as usize, Corner::DRB as usize);
                }
            }
        }
    }
}

/// Represent a cube on the coordinate level.
///
/// In phase 1 a state is uniquely determined by the three coordinates flip, twist and slice = fr_to_br / 24.
///
/// The remaining coordinates are carried along through phase 1 so the phase 2 coordinates
/// can be set up without going back to the cubie level.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct CoordCube {
    pub twist: u16,
    pub flip: u16,
    /// Valid in phase 1 (<11880) and phase 2 (<24).
    pub fr_to_br: u16,
    pub urf_to_dlf: u16,
    pub ur_to_ul: u16,
    pub ub_to_df: u16,
    pub parity: u16,
}

impl Default for CoordCube {
    fn default() -> Self {
        Self {
            twist: 0,
            flip: 0,
            fr_to_br: 0,
            urf_to_dlf: 0,
            ur_to_ul: 0,
            ub_to_df: SOLVED_UB_TO_DF,
            parity: 0,
        }
    }
}

impl fmt::Display for CoordCube {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(twist: {}, flip: {}, slice: {}, fr_to_br: {}, urf_to_dlf: {}, ur_to_ul: {}, ub_to_df: {}, parity: {})",
            self.twist,
            self.flip,
            self.slice(),
            self.fr_to_br,
            self.urf_to_dlf,
            self.ur_to_ul,
            self.ub_to_df,
            self.parity
        )
    }
}

impl From<&CubieCube> for CoordCube {
    fn from(cc: &CubieCube) -> Self {
        Self {
            twist: cc.get_twist(),
            flip: cc.get_flip(),
            fr_to_br: cc.get_fr_to_br(),
            urf_to_dlf: cc.get_urf_to_dlf(),
            ur_to_ul: cc.get_ur_to_ul(),
            ub_to_df: cc.get_ub_to_df(),
            parity: cc.get_corner_parity() as u16,
        }
    }
}

impl CoordCube {
    /// The phase 1 slice coordinate.
    pub fn slice(&self) -> u16 {
        self.fr_to_br / N_SLICE2 as u16
    }

    /// Whether the cube is in the phase 2 subgroup.
    pub fn in_phase2(&self) -> bool {
        self.twist == 0 && self.flip == 0 && self.fr_to_br < N_SLICE2 as u16
    }

    /// Update every coordinate when move `m` is applied.
    pub fn apply_move(&mut self, mv: &MoveTables, m: Move) {
        self.twist = mv.apply(Coord::Twist, self.twist, m);
        self.flip = mv.apply(Coord::Flip, self.flip, m);
        self.fr_to_br = mv.apply(Coord::FrToBr, self.fr_to_br, m);
        self.urf_to_dlf = mv.apply(Coord::UrfToDlf, self.urf_to_dlf, m);
        self.ur_to_ul = mv.apply(Coord::UrToUl, self.ur_to_ul, m);
        self.ub_to_df = mv.apply(Coord::UbToDf, self.ub_to_df, m);
        self.parity = mv.apply(Coord::Parity, self.parity, m);
    }

    pub fn apply_moves(&mut self, mv: &MoveTables, moves: &[Move]) {
        for &m in moves {
            self.apply_move(mv, m);
        }
    }
}

/// Retrieves the initial phase 2 ur_to_df coordinate from the ur_to_ul and ub_to_df coordinates.
///
/// Indexed `N_MERGE * ur_to_ul + ub_to_df` for both below 336, which holds whenever the six
/// edges sit in the U and D faces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeMergeTable {
    pub ur_to_df: Vec<u16>,
}

impl EdgeMergeTable {
    pub fn load(dir: Option<&Path>) -> Self {
        Self {
            ur_to_df: load_or_build(dir, "merge_ur_to_ul_ub_to_df", N_MERGE * N_MERGE, || {
                build_merge_table()
            }),
        }
    }

    /// The merged coordinate, or `None` if the two edge triples overlap or leave the U and D faces.
    pub fn merge(&self, ur_to_ul: u16, ub_to_df: u16) -> Option<u16> {
        if ur_to_ul as usize >= N_MERGE || ub_to_df as usize >= N_MERGE {
            return None;
        }
        match self.ur_to_df[N_MERGE * ur_to_ul as usize + ub_to_df as usize] {
            MERGE_INVALID => None,
            v => Some(v),
        }
    }
}

fn build_merge_table() -> Vec<u16> {
    let mut table = vec![MERGE_INVALID; N_MERGE * N_MERGE];
    for ur_to_ul in 0..N_MERGE {
        for ub_to_df in 0..N_MERGE {
            table[N_MERGE * ur_to_ul + ub_to_df] =
                cubie::merge_ur_to_ul_and_ub_to_df(ur_to_ul as u16, ub_to_df as u16);
        }
    }
    table
}

#[cfg(test)]
mod test {
    use rand::{rngs::StdRng, Rng, SeedableRng};

    use crate::coord::*;
    use crate::cubie::Edge;
    use crate::moves::{Move::*, PHASE2_MOVES};
    use crate::scramble::gen_scramble_with;

    #[test]
    fn test_coord_roundtrip() {
        for coord in [
            Coord::Twist,
            Coord::Flip,
            Coord::FrToBr,
            Coord::Slice,
            Coord::SlicePerm,
            Coord::UrfToDlf,
            Coord::UrToUl,
            Coord::UbToDf,
            Coord::UrToDf,
            Coord::Parity,
        ] {
            for v in (0..coord.size()).step_by(13) {
                let mut cc = CubieCube::default();
                coord.set(&mut cc, v as u16);
                assert_eq!(coord.get(&cc), v as u16, "{}", coord.name());
                let (mut cp, _, mut ep, _) = cc.to_vectors();
                cp.sort();
                ep.sort();
                assert_eq!(cp, (1..=8).collect::<Vec<u8>>());
                assert_eq!(ep, (1..=12).collect::<Vec<u8>>());
            }
        }
    }

    #[test]
    fn test_cube_to_coord_roundtrip() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..100 {
            let cc = CubieCube::from(&gen_scramble_with(&mut rng, 25));
            for coord in [
                Coord::Twist,
                Coord::Flip,
                Coord::FrToBr,
                Coord::UrfToDlf,
                Coord::UrToUl,
                Coord::UbToDf,
                Coord::Parity,
            ] {
                let mut fresh = CubieCube::default();
                coord.set(&mut fresh, coord.get(&cc));
                match coord {
                    Coord::Twist => assert_eq!(fresh.co, cc.co),
                    Coord::Flip => assert_eq!(fresh.eo, cc.eo),
                    Coord::Parity => {
                        assert_eq!(fresh.get_corner_parity(), cc.get_corner_parity())
                    }
                    _ => {
                        let (corners, edges) = tracked_pieces(coord);
                        for i in 0..cc.cp.len() {
                            if corners.contains(&cc.cp[i]) || corners.contains(&fresh.cp[i]) {
                                assert_eq!(fresh.cp[i], cc.cp[i], "{}", coord.name());
                            }
                        }
                        for i in 0..cc.ep.len() {
                            if edges.contains(&cc.ep[i]) || edges.contains(&fresh.ep[i]) {
                                assert_eq!(fresh.ep[i], cc.ep[i], "{}", coord.name());
                            }
                        }
                    }
                }
            }
        }

        // phase 2 cubes keep the six U and D edges in the U and D faces
        for _ in 0..100 {
            let moves: Vec<Move> = (0..20)
                .map(|_| PHASE2_MOVES[rng.gen_range(0..PHASE2_MOVES.len())])
                .collect();
            let cc = CubieCube::from(&moves);
            let mut fresh = CubieCube::default();
            Coord::UrToDf.set(&mut fresh, Coord::UrToDf.get(&cc));
            for i in 0..cc.ep.len() {
                if (cc.ep[i] as u8) < Edge::DL as u8 {
                    assert_eq!(fresh.ep[i], cc.ep[i]);
                }
            }
        }
    }

    fn tracked_pieces(coord: Coord) -> (Vec<Corner>, Vec<Edge>) {
        use crate::cubie::Corner::*;
        use crate::cubie::Edge::*;
        match coord {
            Coord::FrToBr => (vec![], vec![FR, FL, BL, BR]),
            Coord::UrfToDlf => (vec![URF, UFL, ULB, UBR, DFR, DLF], vec![]),
            Coord::UrToUl => (vec![], vec![UR, UF, UL]),
            Coord::UbToDf => (vec![], vec![UB, DR, DF]),
            _ => (vec![], vec![]),
        }
    }

    #[test]
    fn test_coordcube_solved() {
        let cdc = CoordCube::from(&CubieCube::default());
        assert_eq!(cdc, CoordCube::default());
        assert!(cdc.in_phase2());
    }

    #[test]
    fn test_coordcube_apply_move() {
        let mv = MoveTables::load(None);
        let moves = vec![R, U3, F2, D, L3, B, U2, R2];
        let mut cdc = CoordCube::default();
        cdc.apply_moves(&mv, &moves);
        let cc = CubieCube::from(&moves);
        assert_eq!(cdc, CoordCube::from(&cc));
        assert!(!cdc.in_phase2());
    }

    #[test]
    fn test_merge_table() {
        let em = EdgeMergeTable::load(None);
        assert_eq!(em.ur_to_df.len(), 112896);
        assert_eq!(em.merge(0, SOLVED_UB_TO_DF), Some(0));
        assert_eq!(em.merge(0, 0), None);
        assert_eq!(em.merge(400, 0), None);

        let cc = CubieCube::from(&vec![U, R2, D3, B2, L2, U2, F2]);
        assert_eq!(
            em.merge(cc.get_ur_to_ul(), cc.get_ub_to_df()),
            Some(cc.get_ur_to_df())
        );
    }
}
