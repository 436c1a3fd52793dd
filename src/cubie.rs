use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use self::Corner::*;
use self::Edge::*;
use crate::constants::*;
use crate::error::Error;
use crate::moves::{Move, MOVE_CUBES};
use crate::utils::*;

/// The names of the corner positions of the cube. Corner URF e.g. has an U(p), a R(ight) and a F(ront) facelet.
#[rustfmt::skip]
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Corner {
    URF, UFL, ULB, UBR, DFR, DLF, DBL, DRB,
}

/// The names of the edge positions of the cube. Edge UR e.g. has an U(p) and R(ight) facelet.
#[rustfmt::skip]
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Edge {
    UR, UF, UL, UB, DR, DF, DL, DB, FR, FL, BL, BR,
}

pub const ALL_CORNERS: [Corner; N_CORNERS] = [URF, UFL, ULB, UBR, DFR, DLF, DBL, DRB];
pub const ALL_EDGES: [Edge; N_EDGES] = [UR, UF, UL, UB, DR, DF, DL, DB, FR, FL, BL, BR];

/// Represent a cube on the cubie level with 8 corner cubies, 12 edge cubies and the cubie orientations.
///
/// `cp[i]` is the corner cubie sitting at corner position `i`, `co[i]` its twist (0, 1 or 2).
/// Same for the edges with `ep`/`eo`, where the flip is 0 or 1.
///
/// Is also used to represent the 18 cube moves.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
pub struct CubieCube {
    pub cp: [Corner; N_CORNERS],
    pub co: [u8; N_CORNERS],
    pub ep: [Edge; N_EDGES],
    pub eo: [u8; N_EDGES],
}

/// The solved cube.
pub const SOLVED_CUBIE_CUBE: CubieCube = CubieCube {
    cp: ALL_CORNERS,
    co: [0; N_CORNERS],
    ep: ALL_EDGES,
    eo: [0; N_EDGES],
};

impl Default for CubieCube {
    fn default() -> Self {
        SOLVED_CUBIE_CUBE
    }
}

impl fmt::Display for CubieCube {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (c, o) in self.cp.iter().zip(self.co) {
            write!(f, "({c:?},{o})")?;
        }
        writeln!(f)?;
        for (e, o) in self.ep.iter().zip(self.eo) {
            write!(f, "({e:?},{o})")?;
        }
        Ok(())
    }
}

/// Parses the four vectors of [CubieCube::from_vectors] as comma separated lists joined by `/`,
/// e.g. `"1,2,3,4,5,6,7,8/0,0,0,0,0,0,0,0/1,2,3,4,5,6,7,8,9,10,11,12/0,0,0,0,0,0,0,0,0,0,0,0"`.
impl FromStr for CubieCube {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lists = s
            .split('/')
            .map(|list| {
                list.split(',')
                    .map(|x| x.trim().parse::<u8>())
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| Error::InvalidState(s.to_string()))?;
        match lists.as_slice() {
            [cp, co, ep, eo] => CubieCube::from_vectors(cp, co, ep, eo),
            _ => Err(Error::InvalidState(s.to_string())),
        }
    }
}

impl From<&Vec<Move>> for CubieCube {
    fn from(moves: &Vec<Move>) -> Self {
        CubieCube::default().apply_moves(moves)
    }
}

fn corner_ids(cp: &[Corner; N_CORNERS]) -> [u8; N_CORNERS] {
    cp.map(|c| c as u8)
}

fn edge_ids(ep: &[Edge; N_EDGES]) -> [u8; N_EDGES] {
    ep.map(|e| e as u8)
}

fn corners_from_ids(ids: [u8; N_CORNERS]) -> [Corner; N_CORNERS] {
    ids.map(|i| ALL_CORNERS[i as usize])
}

fn edges_from_ids(ids: [u8; N_EDGES]) -> [Edge; N_EDGES] {
    ids.map(|i| ALL_EDGES[i as usize])
}

/// Converts 1-based piece identifiers into 0-based ones, checking for a bijection of `1..=N`.
fn ids_from_vector<const N: usize>(v: &[u8], piece: &'static str) -> Result<[u8; N], Error> {
    if v.len() != N {
        return Err(Error::InvalidPermutation { piece });
    }
    let mut seen = [false; N];
    let mut ids = [0; N];
    for (i, &p) in v.iter().enumerate() {
        if p == 0 || p as usize > N || seen[p as usize - 1] {
            return Err(Error::InvalidPermutation { piece });
        }
        seen[p as usize - 1] = true;
        ids[i] = p - 1;
    }
    Ok(ids)
}

fn orientation_from_vector<const N: usize>(
    v: &[u8],
    modulus: u8,
    piece: &'static str,
) -> Result<[u8; N], Error> {
    <[u8; N]>::try_from(v)
        .ok()
        .filter(|o| o.iter().all(|&x| x < modulus))
        .ok_or(Error::InvalidOrientation { piece })
}

impl CubieCube {
    /// Build a cube from the standard permutation and orientation vectors.
    ///
    /// Permutations use 1-based identifiers in the corner order URF, UFL, ULB, UBR, DFR, DLF,
    /// DBL, DRB and the edge order UR, UF, UL, UB, DR, DF, DL, DB, FR, FL, BL, BR.
    pub fn from_vectors(cp: &[u8], co: &[u8], ep: &[u8], eo: &[u8]) -> Result<Self, Error> {
        let cube = Self {
            cp: corners_from_ids(ids_from_vector::<N_CORNERS>(cp, "corner")?),
            co: orientation_from_vector::<N_CORNERS>(co, 3, "corner")?,
            ep: edges_from_ids(ids_from_vector::<N_EDGES>(ep, "edge")?),
            eo: orientation_from_vector::<N_EDGES>(eo, 2, "edge")?,
        };
        cube.verify()?;
        Ok(cube)
    }

    /// The permutation (1-based) and orientation vectors of this cube, see [CubieCube::from_vectors].
    pub fn to_vectors(&self) -> (Vec<u8>, Vec<u8>, Vec<u8>, Vec<u8>) {
        (
            self.cp.iter().map(|&c| c as u8 + 1).collect(),
            self.co.to_vec(),
            self.ep.iter().map(|&e| e as u8 + 1).collect(),
            self.eo.to_vec(),
        )
    }

    /// Check the permutation, orientation and parity invariants every reachable cube satisfies.
    pub fn verify(&self) -> Result<(), Error> {
        let mut corner_seen = [false; N_CORNERS];
        for c in self.cp {
            corner_seen[c as usize] = true;
        }
        if corner_seen.contains(&false) {
            return Err(Error::InvalidPermutation { piece: "corner" });
        }
        let mut edge_seen = [false; N_EDGES];
        for e in self.ep {
            edge_seen[e as usize] = true;
        }
        if edge_seen.contains(&false) {
            return Err(Error::InvalidPermutation { piece: "edge" });
        }
        if self.co.iter().any(|&o| o > 2) {
            return Err(Error::InvalidOrientation { piece: "corner" });
        }
        if self.eo.iter().any(|&o| o > 1) {
            return Err(Error::InvalidOrientation { piece: "edge" });
        }
        if self.co.iter().map(|&o| o as u32).sum::<u32>() % 3 != 0 {
            return Err(Error::InvalidTwist);
        }
        if self.eo.iter().map(|&o| o as u32).sum::<u32>() % 2 != 0 {
            return Err(Error::InvalidFlip);
        }
        if self.get_corner_parity() != self.get_edge_parity() {
            return Err(Error::InvalidParity);
        }
        Ok(())
    }

    pub fn is_solved(&self) -> bool {
        *self == SOLVED_CUBIE_CUBE
    }

    /// Multiply this cubie cube with another cubie cube b, restricted to the corners.
    pub fn corner_multiply(&mut self, b: &CubieCube) {
        let mut cp = [URF; N_CORNERS];
        let mut co = [0; N_CORNERS];
        for i in 0..N_CORNERS {
            let from = b.cp[i] as usize;
            cp[i] = self.cp[from];
            co[i] = (self.co[from] + b.co[i]) % 3;
        }
        self.cp = cp;
        self.co = co;
    }

    /// Multiply this cubie cube with another cubie cube b, restricted to the edges.
    pub fn edge_multiply(&mut self, b: &CubieCube) {
        let mut ep = [UR; N_EDGES];
        let mut eo = [0; N_EDGES];
        for i in 0..N_EDGES {
            let from = b.ep[i] as usize;
            ep[i] = self.ep[from];
            eo[i] = (self.eo[from] + b.eo[i]) % 2;
        }
        self.ep = ep;
        self.eo = eo;
    }

    /// Multiply this cubie cube with another cubie cube b in place.
    pub fn multiply(&mut self, b: &CubieCube) {
        self.corner_multiply(b);
        self.edge_multiply(b);
    }

    /// Apply the transformation of `b` to this cube, returning the new state.
    ///
    /// Associative but not commutative. Applying a move is composing with its move cube.
    pub fn compose(&self, b: &CubieCube) -> CubieCube {
        let mut c = *self;
        c.multiply(b);
        c
    }

    /// The cube which undoes this one: `c.compose(&c.inverse())` is solved.
    pub fn inverse(&self) -> CubieCube {
        let mut inv = SOLVED_CUBIE_CUBE;
        for i in 0..N_CORNERS {
            let c = self.cp[i] as usize;
            inv.cp[c] = ALL_CORNERS[i];
            inv.co[c] = (3 - self.co[i]) % 3;
        }
        for i in 0..N_EDGES {
            let e = self.ep[i] as usize;
            inv.ep[e] = ALL_EDGES[i];
            inv.eo[e] = self.eo[i];
        }
        inv
    }

    pub fn apply_move(&self, m: Move) -> CubieCube {
        self.compose(&MOVE_CUBES[m as usize])
    }

    pub fn apply_moves(&self, moves: &[Move]) -> CubieCube {
        moves.iter().fold(*self, |cube, &m| cube.apply_move(m))
    }

    /// Get the twist of the 8 corners. 0 <= twist < 2187 in phase 1, twist = 0 in phase 2.
    pub fn get_twist(&self) -> u16 {
        rank_orientation(&self.co, 3) as u16
    }

    pub fn set_twist(&mut self, twist: u16) {
        self.co = unrank_orientation::<N_CORNERS>(twist as usize, 3);
    }

    /// Get the flip of the 12 edges. 0 <= flip < 2048 in phase 1, flip = 0 in phase 2.
    pub fn get_flip(&self) -> u16 {
        rank_orientation(&self.eo, 2) as u16
    }

    pub fn set_flip(&mut self, flip: u16) {
        self.eo = unrank_orientation::<N_EDGES>(flip as usize, 2);
    }

    /// Parity of the corner permutation, equal to the parity of the edge permutation on a
    /// reachable cube.
    pub fn get_corner_parity(&self) -> u8 {
        permutation_parity(&corner_ids(&self.cp))
    }

    pub fn get_edge_parity(&self) -> u8 {
        permutation_parity(&edge_ids(&self.ep))
    }

    /// Get the location and order of the FR, FL, BL and BR edges.
    ///
    /// 0 <= fr_to_br < 11880 in phase 1, 0 <= fr_to_br < 24 in phase 2, fr_to_br = 0 for the
    /// solved cube. fr_to_br / 24 is the phase 1 slice coordinate.
    pub fn get_fr_to_br(&self) -> u16 {
        rank_subset::<4>(&edge_ids(&self.ep), FR as u8, true) as u16
    }

    pub fn set_fr_to_br(&mut self, idx: u16) {
        self.ep = edges_from_ids(unrank_subset::<4, N_EDGES>(idx as usize, FR as u8, true));
    }

    /// Get the permutation of the URF, UFL, ULB, UBR, DFR and DLF corners.
    pub fn get_urf_to_dlf(&self) -> u16 {
        rank_subset::<6>(&corner_ids(&self.cp), URF as u8, false) as u16
    }

    pub fn set_urf_to_dlf(&mut self, idx: u16) {
        self.cp = corners_from_ids(unrank_subset::<6, N_CORNERS>(idx as usize, URF as u8, false));
    }

    /// Get the permutation of the UR, UF and UL edges. Below 336 in phase 2.
    pub fn get_ur_to_ul(&self) -> u16 {
        rank_subset::<3>(&edge_ids(&self.ep), UR as u8, false) as u16
    }

    pub fn set_ur_to_ul(&mut self, idx: u16) {
        self.ep = edges_from_ids(unrank_subset::<3, N_EDGES>(idx as usize, UR as u8, false));
    }

    /// Get the permutation of the UB, DR and DF edges. Below 336 in phase 2, 114 when solved.
    pub fn get_ub_to_df(&self) -> u16 {
        rank_subset::<3>(&edge_ids(&self.ep), UB as u8, false) as u16
    }

    pub fn set_ub_to_df(&mut self, idx: u16) {
        self.ep = edges_from_ids(unrank_subset::<3, N_EDGES>(idx as usize, UB as u8, false));
    }

    /// Get the permutation of the UR, UF, UL, UB, DR and DF edges. Only meaningful in phase 2
    /// where these edges stay inside the U and D faces.
    pub fn get_ur_to_df(&self) -> u16 {
        rank_subset::<6>(&edge_ids(&self.ep), UR as u8, false) as u16
    }

    pub fn set_ur_to_df(&mut self, idx: u16) {
        self.ep = edges_from_ids(unrank_subset::<6, N_EDGES>(idx as usize, UR as u8, false));
    }
}

/// Combine a UrToUl and a UbToDf coordinate into the UrToDf coordinate.
///
/// Returns [MERGE_INVALID] if the two edge triples claim the same slot.
pub fn merge_ur_to_ul_and_ub_to_df(ur_to_ul: u16, ub_to_df: u16) -> u16 {
    let mut a = CubieCube::default();
    let mut b = CubieCube::default();
    a.set_ur_to_ul(ur_to_ul);
    b.set_ub_to_df(ub_to_df);

    let mut slots: [Option<u8>; N_EDGES] = [None; N_EDGES];
    for i in 0..N_EDGES {
        let ea = a.ep[i] as u8;
        let eb = b.ep[i] as u8;
        let in_a = ea <= UL as u8;
        let in_b = (UB as u8..=DF as u8).contains(&eb);
        match (in_a, in_b) {
            (true, true) => return MERGE_INVALID,
            (true, false) => slots[i] = Some(ea),
            (false, true) => slots[i] = Some(eb),
            (false, false) => {}
        }
    }
    let mut others = DL as u8..;
    let ids = slots.map(|s| s.or_else(|| others.next()).unwrap_or_default());
    rank_subset::<6>(&ids, UR as u8, false) as u16
}
