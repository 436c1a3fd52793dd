use std::{path::Path, thread};

use log::{debug, info, warn};

use crate::constants::*;
use crate::coord::Coord;
use crate::moves::{Move, MoveTables, ALL_MOVES, PHASE2_MOVES};
use crate::{join, load_or_build};

/// Marks an entry not reached yet while a table is built.
pub const UNKNOWN: u8 = 0x0f;

/// A table of 4 bit values, two per byte, low nibble first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedTable {
    len: usize,
    bytes: Vec<u8>,
}

impl PackedTable {
    /// A table of `len` entries, all [UNKNOWN].
    pub fn new(len: usize) -> Self {
        Self {
            len,
            bytes: vec![0xff; len.div_ceil(2)],
        }
    }

    pub fn from_bytes(len: usize, bytes: Vec<u8>) -> Self {
        debug_assert_eq!(bytes.len(), len.div_ceil(2));
        Self { len, bytes }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn get(&self, i: usize) -> u8 {
        (self.bytes[i >> 1] >> ((i & 1) << 2)) & 0x0f
    }

    pub fn set(&mut self, i: usize, value: u8) {
        let shift = (i & 1) << 2;
        let b = &mut self.bytes[i >> 1];
        *b = (*b & !(0x0f << shift)) | ((value & 0x0f) << shift);
    }
}

/// Fill a pruning table by breadth first search from entry 0.
///
/// `step(i, m)` is the entry reached from entry `i` by move `m`. Every entry ends up holding
/// its distance to entry 0, capped at 14.
pub fn build_pruning_table<F>(name: &str, len: usize, moves: &[Move], step: F) -> PackedTable
where
    F: Fn(usize, Move) -> usize,
{
    let mut table = PackedTable::new(len);
    table.set(0, 0);
    let mut done = 1;
    let mut depth = 0;
    info!("Creating {} table...", name);
    while done < len {
        let before = done;
        let next = (depth + 1).min(UNKNOWN - 1);
        for i in 0..len {
            if table.get(i) != depth {
                continue;
            }
            for &m in moves {
                let j = step(i, m);
                if table.get(j) == UNKNOWN {
                    table.set(j, next);
                    done += 1;
                }
            }
        }
        debug!("{} depth: {} done: {}/{}", name, depth + 1, done, len);
        if done == before {
            warn!("{}: {} entries unreachable", name, len - done);
            break;
        }
        depth = next;
    }
    table
}

/// The pruning tables cut the search tree during the search.
///
/// Each entry is a lower bound for the number of moves needed to solve a pair of coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PruningTables {
    /// Indexed `N_SLICE1 * flip + slice`.
    pub slice_flip: PackedTable,
    /// Indexed `N_SLICE1 * twist + slice`.
    pub slice_twist: PackedTable,
    /// Indexed `(N_SLICE2 * urf_to_dlf + slice_perm) * 2 + parity`.
    pub slice_urf_to_dlf_parity: PackedTable,
    /// Indexed `(N_SLICE2 * ur_to_df + slice_perm) * 2 + parity`.
    pub slice_ur_to_df_parity: PackedTable,
}

pub fn slice_flip_index(slice: u16, flip: u16) -> usize {
    N_SLICE1 * flip as usize + slice as usize
}

pub fn slice_twist_index(slice: u16, twist: u16) -> usize {
    N_SLICE1 * twist as usize + slice as usize
}

/// Index into either phase 2 table, `perm` being the urf_to_dlf or ur_to_df coordinate.
pub fn phase2_index(perm: u16, slice_perm: u16, parity: u16) -> usize {
    (N_SLICE2 * perm as usize + slice_perm as usize) * N_PARITY + parity as usize
}

fn load_packed<F>(dir: Option<&Path>, name: &str, len: usize, build: F) -> PackedTable
where
    F: FnOnce() -> PackedTable,
{
    let bytes = load_or_build(dir, name, len.div_ceil(2), || build().bytes);
    PackedTable::from_bytes(len, bytes)
}

impl PruningTables {
    /// Load the pruning tables from `dir`, building and saving whatever is missing or corrupt.
    ///
    /// The tables are built from the move tables in `mv`, one thread per table.
    pub fn load(mv: &MoveTables, dir: Option<&Path>) -> Self {
        thread::scope(|s| {
            let slice_flip = s.spawn(|| {
                let name = "prun_slice_flip";
                load_packed(dir, name, N_SLICE1 * N_FLIP, || {
                    build_pruning_table(name, N_SLICE1 * N_FLIP, &ALL_MOVES, |i, m| {
                        let (flip, slice) = ((i / N_SLICE1) as u16, (i % N_SLICE1) as u16);
                        slice_flip_index(
                            mv.apply(Coord::Slice, slice, m),
                            mv.apply(Coord::Flip, flip, m),
                        )
                    })
                })
            });
            let slice_twist = s.spawn(|| {
                let name = "prun_slice_twist";
                load_packed(dir, name, N_SLICE1 * N_TWIST, || {
                    build_pruning_table(name, N_SLICE1 * N_TWIST, &ALL_MOVES, |i, m| {
                        let (twist, slice) = ((i / N_SLICE1) as u16, (i % N_SLICE1) as u16);
                        slice_twist_index(
                            mv.apply(Coord::Slice, slice, m),
                            mv.apply(Coord::Twist, twist, m),
                        )
                    })
                })
            });
            let urf_to_dlf = s.spawn(|| load_phase2(mv, dir, Coord::UrfToDlf));
            let ur_to_df = s.spawn(|| load_phase2(mv, dir, Coord::UrToDf));
            Self {
                slice_flip: join(slice_flip),
                slice_twist: join(slice_twist),
                slice_urf_to_dlf_parity: join(urf_to_dlf),
                slice_ur_to_df_parity: join(ur_to_df),
            }
        })
    }

    /// Lower bound for the phase 1 distance.
    pub fn phase1_bound(&self, twist: u16, flip: u16, slice: u16) -> u8 {
        self.slice_flip
            .get(slice_flip_index(slice, flip))
            .max(self.slice_twist.get(slice_twist_index(slice, twist)))
    }

    /// Lower bound for the phase 2 distance.
    pub fn phase2_bound(
        &self,
        urf_to_dlf: u16,
        ur_to_df: u16,
        slice_perm: u16,
        parity: u16,
    ) -> u8 {
        self.slice_urf_to_dlf_parity
            .get(phase2_index(urf_to_dlf, slice_perm, parity))
            .max(
                self.slice_ur_to_df_parity
                    .get(phase2_index(ur_to_df, slice_perm, parity)),
            )
    }
}

/// The phase 2 tables pair a permutation coordinate with the slice permutation and the parity,
/// and only use the phase 2 moves.
fn load_phase2(mv: &MoveTables, dir: Option<&Path>, perm: Coord) -> PackedTable {
    let name = format!("prun_slice_{}_parity", perm.name());
    let len = N_SLICE2 * perm.size() * N_PARITY;
    load_packed(dir, &name, len, || {
        build_pruning_table(&name, len, &PHASE2_MOVES, |i, m| {
            let parity = (i % N_PARITY) as u16;
            let slice_perm = ((i / N_PARITY) % N_SLICE2) as u16;
            let p = (i / N_PARITY / N_SLICE2) as u16;
            phase2_index(
                mv.apply(perm, p, m),
                mv.apply(Coord::SlicePerm, slice_perm, m),
                mv.apply(Coord::Parity, parity, m),
            )
        })
    })
}
