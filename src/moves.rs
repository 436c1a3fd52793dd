use std::path::Path;
use std::{fmt, str::FromStr, thread};

use serde::{Deserialize, Serialize};

use self::Move::*;
use crate::constants::*;
use crate::coord::Coord;
use crate::cubie::{Corner::*, CubieCube, Edge::*};
use crate::error::Error;
use crate::{join, load_or_build};

/// The six faces, in the order the moves are numbered.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum Face {
    U,
    R,
    F,
    D,
    L,
    B,
}

pub const ALL_FACES: [Face; 6] = [Face::U, Face::R, Face::F, Face::D, Face::L, Face::B];

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Layer moves, Up, Right, Front, Down, Left, Back.
///
/// $ clockwise, $2 double, $3 counter-clockwise.
#[rustfmt::skip]
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum Move {
    U, U2, U3,
    R, R2, R3,
    F, F2, F3,
    D, D2, D3,
    L, L2, L3,
    B, B2, B3,
}

#[rustfmt::skip]
pub const ALL_MOVES: [Move; N_MOVE] = [
    U, U2, U3, R, R2, R3, F, F2, F3,
    D, D2, D3, L, L2, L3, B, B2, B3,
];

/// The moves which keep a cube inside the phase 2 subgroup.
pub const PHASE2_MOVES: [Move; 10] = [U, U2, U3, R2, F2, D, D2, D3, L2, B2];

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.power() {
            1 => write!(f, "{}", self.face()),
            2 => write!(f, "{}2", self.face()),
            _ => write!(f, "{}'", self.face()),
        }
    }
}

impl FromStr for Move {
    type Err = Error;

    /// Parses `R`, `R2`, `R'` and the `R3` spelling of a counter-clockwise turn.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let face = match chars.next() {
            Some('U') => Face::U,
            Some('R') => Face::R,
            Some('F') => Face::F,
            Some('D') => Face::D,
            Some('L') => Face::L,
            Some('B') => Face::B,
            _ => return Err(Error::InvalidScramble(s.to_string())),
        };
        let power = match chars.as_str() {
            "" | "1" => 1,
            "2" => 2,
            "'" | "3" => 3,
            _ => return Err(Error::InvalidScramble(s.to_string())),
        };
        Ok(Move::new(face, power))
    }
}

impl Move {
    /// The move turning `face` by `power` quarter turns clockwise, `power` taken mod 4 and not 0.
    pub fn new(face: Face, power: u8) -> Self {
        debug_assert!(power % 4 != 0);
        ALL_MOVES[3 * face as usize + (power as usize + 3) % 4]
    }

    pub fn face(self) -> Face {
        ALL_FACES[self.axis()]
    }

    /// Index of the turned face, 0..6 in the order U, R, F, D, L, B.
    pub fn axis(self) -> usize {
        self as usize / 3
    }

    /// Number of clockwise quarter turns, 1, 2 or 3.
    pub fn power(self) -> u8 {
        self as u8 % 3 + 1
    }

    pub fn get_inverse(self) -> Self {
        Move::new(self.face(), 4 - self.power())
    }

    pub fn is_same_layer(self, other: Move) -> bool {
        self.axis() == other.axis()
    }

    /// Whether `self` and `other` turn opposite faces.
    pub fn is_opposite(self, other: Move) -> bool {
        self.axis() % 3 == other.axis() % 3 && !self.is_same_layer(other)
    }

    /// Whether `self` may follow `prev` in a search path.
    ///
    /// Turns of the same face never follow each other and turns of opposite faces are only
    /// taken in U, R, F before D, L, B order.
    pub fn can_follow(self, prev: Move) -> bool {
        prev.axis() != self.axis() && prev.axis() != self.axis() + 3
    }
}

/// The basic six cube moves described by permutations and changes in orientation.
///
/// U_MOVE
pub const U_MOVE: CubieCube = CubieCube {
    cp: [UBR, URF, UFL, ULB, DFR, DLF, DBL, DRB],
    co: [0, 0, 0, 0, 0, 0, 0, 0],
    ep: [UB, UR, UF, UL, DR, DF, DL, DB, FR, FL, BL, BR],
    eo: [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
};

/// R_MOVE
pub const R_MOVE: CubieCube = CubieCube {
    cp: [DFR, UFL, ULB, URF, DRB, DLF, DBL, UBR],
    co: [2, 0, 0, 1, 1, 0, 0, 2],
    ep: [FR, UF, UL, UB, BR, DF, DL, DB, DR, FL, BL, UR],
    eo: [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
};

/// F_MOVE
pub const F_MOVE: CubieCube = CubieCube {
    cp: [UFL, DLF, ULB, UBR, URF, DFR, DBL, DRB],
    co: [1, 2, 0, 0, 2, 1, 0, 0],
    ep: [UR, FL, UL, UB, DR, FR, DL, DB, UF, DF, BL, BR],
    eo: [0, 1, 0, 0, 0, 1, 0, 0, 1, 1, 0, 0],
};

/// D_MOVE
pub const D_MOVE: CubieCube = CubieCube {
    cp: [URF, UFL, ULB, UBR, DLF, DBL, DRB, DFR],
    co: [0, 0, 0, 0, 0, 0, 0, 0],
    ep: [UR, UF, UL, UB, DF, DL, DB, DR, FR, FL, BL, BR],
    eo: [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
};

/// L_MOVE
pub const L_MOVE: CubieCube = CubieCube {
    cp: [URF, ULB, DBL, UBR, DFR, UFL, DLF, DRB],
    co: [0, 1, 2, 0, 0, 2, 1, 0],
    ep: [UR, UF, BL, UB, DR, DF, FL, DB, FR, UL, DL, BR],
    eo: [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
};

/// B_MOVE
pub const B_MOVE: CubieCube = CubieCube {
    cp: [URF, UFL, UBR, DRB, DFR, DLF, ULB, DBL],
    co: [0, 0, 1, 2, 0, 0, 2, 1],
    ep: [UR, UF, UL, BR, DR, DF, DL, BL, FR, FL, UB, DB],
    eo: [0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 1, 1],
};

pub const BASIC_MOVE_CUBES: [CubieCube; 6] = [U_MOVE, R_MOVE, F_MOVE, D_MOVE, L_MOVE, B_MOVE];

lazy_static! {
    /// The 18 move cubes, indexed by `Move as usize`. The double and counter-clockwise turns
    /// are the quarter turn composed with itself.
    pub static ref MOVE_CUBES: [CubieCube; N_MOVE] = {
        let mut cubes = [CubieCube::default(); N_MOVE];
        for (face, basic) in BASIC_MOVE_CUBES.iter().enumerate() {
            let mut cc = *basic;
            for power in 0..3 {
                cubes[3 * face + power] = cc;
                cc = cc.compose(basic);
            }
        }
        cubes
    };
}

/// The move tables give the coordinate reached by applying a move, indexed `N_MOVE * coord + move`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveTables {
    pub twist_move: Vec<u16>,
    pub flip_move: Vec<u16>,
    pub fr_to_br_move: Vec<u16>,
    pub urf_to_dlf_move: Vec<u16>,
    pub ur_to_ul_move: Vec<u16>,
    pub ub_to_df_move: Vec<u16>,
    /// Only filled for the phase 2 moves, the other entries are 0.
    pub ur_to_df_move: Vec<u16>,
}

impl MoveTables {
    /// Load the move tables from `dir`, building and saving whatever is missing or corrupt.
    ///
    /// Each table is built on its own thread. With `dir = None` everything is built in memory.
    pub fn load(dir: Option<&Path>) -> Self {
        let load = |coord: Coord, moves: &'static [Move]| {
            load_or_build(dir, &format!("move_{}", coord.name()), coord.size() * N_MOVE, || {
                build_move_table(coord, moves)
            })
        };
        thread::scope(|s| {
            let twist = s.spawn(|| load(Coord::Twist, &ALL_MOVES));
            let flip = s.spawn(|| load(Coord::Flip, &ALL_MOVES));
            let fr_to_br = s.spawn(|| load(Coord::FrToBr, &ALL_MOVES));
            let urf_to_dlf = s.spawn(|| load(Coord::UrfToDlf, &ALL_MOVES));
            let ur_to_ul = s.spawn(|| load(Coord::UrToUl, &ALL_MOVES));
            let ub_to_df = s.spawn(|| load(Coord::UbToDf, &ALL_MOVES));
            let ur_to_df = s.spawn(|| load(Coord::UrToDf, &PHASE2_MOVES));
            Self {
                twist_move: join(twist),
                flip_move: join(flip),
                fr_to_br_move: join(fr_to_br),
                urf_to_dlf_move: join(urf_to_dlf),
                ur_to_ul_move: join(ur_to_ul),
                ub_to_df_move: join(ub_to_df),
                ur_to_df_move: join(ur_to_df),
            }
        })
    }

    /// The value of `coord` after applying `m` to a cube whose `coord` is `value`.
    ///
    /// `Slice` and `SlicePerm` are read from the FrToBr table, `Parity` needs no table.
    pub fn apply(&self, coord: Coord, value: u16, m: Move) -> u16 {
        let i = N_MOVE * value as usize + m as usize;
        match coord {
            Coord::Twist => self.twist_move[i],
            Coord::Flip => self.flip_move[i],
            Coord::FrToBr | Coord::SlicePerm => self.fr_to_br_move[i],
            Coord::Slice => {
                self.fr_to_br_move[N_MOVE * N_SLICE2 * value as usize + m as usize]
                    / N_SLICE2 as u16
            }
            Coord::UrfToDlf => self.urf_to_dlf_move[i],
            Coord::UrToUl => self.ur_to_ul_move[i],
            Coord::UbToDf => self.ub_to_df_move[i],
            Coord::UrToDf => {
                debug_assert!(PHASE2_MOVES.contains(&m), "{} leaves the phase 2 subgroup", m);
                self.ur_to_df_move[i]
            }
            Coord::Parity => value ^ (m.power() as u16 & 1),
        }
    }
}

/// Build the move table of `coord` by applying every move in `moves` to a representative cube
/// of every coordinate value.
pub fn build_move_table(coord: Coord, moves: &[Move]) -> Vec<u16> {
    let mut table = vec![0; coord.size() * N_MOVE];
    let mut cc = CubieCube::default();
    for i in 0..coord.size() {
        coord.set(&mut cc, i as u16);
        for &m in moves {
            table[N_MOVE * i + m as usize] = coord.get(&cc.apply_move(m));
        }
    }
    table
}

#[cfg(test)]
mod test {
    use rand::Rng;

    use crate::moves::*;

    lazy_static! {
        static ref TABLES: MoveTables = MoveTables::load(None);
    }

    #[test]
    fn test_move_display() {
        assert_eq!(R.to_string(), "R");
        assert_eq!(U2.to_string(), "U2");
        assert_eq!(F3.to_string(), "F'");
        assert_eq!("B'".parse::<Move>().unwrap(), B3);
        assert_eq!("L3".parse::<Move>().unwrap(), L3);
        assert_eq!("D2".parse::<Move>().unwrap(), D2);
        assert!("X".parse::<Move>().is_err());
        assert!("R4".parse::<Move>().is_err());
    }

    #[test]
    fn test_move_index() {
        for (i, m) in ALL_MOVES.iter().enumerate() {
            assert_eq!(*m as usize, i);
            assert_eq!(Move::new(m.face(), m.power()), *m);
        }
        assert_eq!(R3.get_inverse(), R);
        assert_eq!(B2.get_inverse(), B2);
    }

    #[test]
    fn test_can_follow() {
        assert!(!R.can_follow(R2));
        assert!(D.can_follow(U));
        assert!(!U.can_follow(D));
        assert!(L3.can_follow(R));
        assert!(!R.can_follow(L3));
        assert!(F.can_follow(U));
        assert!(U.is_opposite(D3));
        assert!(!U.is_opposite(U2));
    }

    #[test]
    fn test_move_cubes() {
        for m in ALL_MOVES {
            let cc = CubieCube::default().apply_move(m);
            assert!(cc.verify().is_ok());
            assert!(cc.apply_move(m.get_inverse()).is_solved());
        }
        assert_eq!(MOVE_CUBES[R as usize], R_MOVE);
        assert_eq!(MOVE_CUBES[F2 as usize], F_MOVE.compose(&F_MOVE));
    }

    #[test]
    fn test_move_twist() {
        let move_twist = &TABLES.twist_move;
        assert_eq!(move_twist.len(), 39366);
        // U and D never twist corners
        for m in [U, U2, U3, D, D2, D3] {
            assert_eq!(move_twist[m as usize], 0);
        }
        assert_ne!(move_twist[R as usize], 0);
    }

    #[test]
    fn test_move_ur_to_df_phase2_only() {
        let move_ur_to_df = &TABLES.ur_to_df_move;
        assert_eq!(move_ur_to_df.len(), N_UR_TO_DF * N_MOVE);
        assert_eq!(move_ur_to_df[R as usize], 0);
        assert_ne!(move_ur_to_df[R2 as usize], 0);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "leaves the phase 2 subgroup")]
    fn test_ur_to_df_rejects_phase1_move() {
        let tables = &*TABLES;
        tables.apply(Coord::UrToDf, 0, R);
    }

    #[test]
    fn test_tables_match_compose() {
        let mut rng = rand::thread_rng();
        for coord in [
            Coord::Twist,
            Coord::Flip,
            Coord::FrToBr,
            Coord::Slice,
            Coord::UrfToDlf,
            Coord::UrToUl,
            Coord::UbToDf,
            Coord::Parity,
        ] {
            for _ in 0..200 {
                let value = rng.gen_range(0..coord.size()) as u16;
                let mut cc = CubieCube::default();
                coord.set(&mut cc, value);
                for m in ALL_MOVES {
                    assert_eq!(
                        TABLES.apply(coord, value, m),
                        coord.get(&cc.apply_move(m)),
                        "{:?} {} {}",
                        coord,
                        value,
                        m
                    );
                }
            }
        }
        for coord in [Coord::UrToDf, Coord::SlicePerm] {
            for _ in 0..200 {
                let value = rng.gen_range(0..coord.size()) as u16;
                let mut cc = CubieCube::default();
                coord.set(&mut cc, value);
                for m in PHASE2_MOVES {
                    assert_eq!(TABLES.apply(coord, value, m), coord.get(&cc.apply_move(m)));
                }
            }
        }
    }
}
