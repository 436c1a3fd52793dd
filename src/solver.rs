use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::coord::{Coord, CoordCube, EdgeMergeTable};
use crate::cubie::CubieCube;
use crate::error::Error;
use crate::moves::{Move, MoveTables, ALL_MOVES, PHASE2_MOVES};
use crate::pruning::PruningTables;
use crate::scramble::{scramble_from_str, scramble_to_str, simplify_moves};
use crate::search::{depth_limited, Budget, Phase};

/// All data tables.
///
/// * `mv`: [MoveTables]
/// * `em`: [EdgeMergeTable]
/// * `pr`: [PruningTables]
///
/// Read only once loaded, so one instance can serve any number of concurrent solves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverTables {
    pub mv: MoveTables,
    pub em: EdgeMergeTable,
    pub pr: PruningTables,
}

impl SolverTables {
    /// Load all tables from `dir`, building and saving whatever is missing or corrupt.
    ///
    /// With `dir = None` the tables are built in memory and nothing touches the disk.
    pub fn load(dir: Option<&Path>) -> Self {
        let start = Instant::now();
        let mv = MoveTables::load(dir);
        let em = EdgeMergeTable::load(dir);
        let pr = PruningTables::load(&mv, dir);
        info!("Tables ready in {:?}", start.elapsed());
        Self { mv, em, pr }
    }
}

/// The externally tunable parameters of a solve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Longest solution accepted, at most 30.
    pub max_depth: usize,
    /// Wall-clock budget of one solve, table loading excluded.
    pub timeout: Duration,
    /// Where tables are cached, `None` to keep them in memory only.
    pub table_dir: Option<PathBuf>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_depth: MAX_SEARCH_DEPTH,
            timeout: Duration::from_secs(10),
            table_dir: Some(PathBuf::from("tables")),
        }
    }
}

impl SolverConfig {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_table_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.table_dir = Some(dir.into());
        self
    }

    pub fn without_cache(mut self) -> Self {
        self.table_dir = None;
        self
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.max_depth > MAX_SEARCH_DEPTH {
            return Err(Error::InvalidMaxDepth {
                max_depth: self.max_depth,
                limit: MAX_SEARCH_DEPTH,
            });
        }
        Ok(())
    }
}

/// Solution result:
/// * solution: a Move vector.
/// * phase1_length: number of moves the phase 1 search contributed, before simplification.
/// * solve_time: time to get solution(not include load data tables time.).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SolutionResult {
    pub solution: Vec<Move>,
    pub phase1_length: usize,
    pub solve_time: Duration,
}

impl Default for SolutionResult {
    fn default() -> Self {
        Self {
            solution: Vec::new(),
            phase1_length: 0,
            solve_time: Duration::from_secs(0),
        }
    }
}

impl fmt::Display for SolutionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", scramble_to_str(&self.solution))
    }
}

#[derive(Debug, Clone, Copy)]
struct Phase1Node {
    twist: u16,
    flip: u16,
    slice: u16,
}

/// Phase 1 brings twist, flip and slice to 0 with any of the 18 moves.
struct Phase1<'a> {
    tables: &'a SolverTables,
}

impl Phase for Phase1<'_> {
    type Node = Phase1Node;

    fn moves(&self) -> &[Move] {
        &ALL_MOVES
    }

    fn step(&self, node: &Phase1Node, m: Move) -> Phase1Node {
        let mv = &self.tables.mv;
        Phase1Node {
            twist: mv.apply(Coord::Twist, node.twist, m),
            flip: mv.apply(Coord::Flip, node.flip, m),
            slice: mv.apply(Coord::Slice, node.slice, m),
        }
    }

    fn bound(&self, node: &Phase1Node) -> usize {
        self.tables.pr.phase1_bound(node.twist, node.flip, node.slice) as usize
    }

    // Leaving the subgroup and coming back within 5 moves never shortens a solution.
    fn expand_goal(&self, remaining: usize) -> bool {
        remaining >= 5
    }
}

#[derive(Debug, Clone, Copy)]
struct Phase2Node {
    urf_to_dlf: u16,
    ur_to_df: u16,
    slice_perm: u16,
    parity: u16,
}

/// Phase 2 solves the cube with the 10 moves which keep it in the subgroup.
struct Phase2<'a> {
    tables: &'a SolverTables,
}

impl Phase for Phase2<'_> {
    type Node = Phase2Node;

    fn moves(&self) -> &[Move] {
        &PHASE2_MOVES
    }

    fn step(&self, node: &Phase2Node, m: Move) -> Phase2Node {
        let mv = &self.tables.mv;
        Phase2Node {
            urf_to_dlf: mv.apply(Coord::UrfToDlf, node.urf_to_dlf, m),
            ur_to_df: mv.apply(Coord::UrToDf, node.ur_to_df, m),
            slice_perm: mv.apply(Coord::SlicePerm, node.slice_perm, m),
            parity: mv.apply(Coord::Parity, node.parity, m),
        }
    }

    fn bound(&self, node: &Phase2Node) -> usize {
        self.tables
            .pr
            .phase2_bound(node.urf_to_dlf, node.ur_to_df, node.slice_perm, node.parity)
            as usize
    }

    fn expand_goal(&self, _remaining: usize) -> bool {
        false
    }
}

/// Set up the phase 2 coordinates of the cube `start` after the phase 1 moves `path`.
fn phase2_start(tables: &SolverTables, start: &CoordCube, path: &[Move]) -> Option<Phase2Node> {
    let mut cdc = *start;
    cdc.apply_moves(&tables.mv, path);
    debug_assert!(cdc.in_phase2());
    let ur_to_df = tables.em.merge(cdc.ur_to_ul, cdc.ub_to_df)?;
    Some(Phase2Node {
        urf_to_dlf: cdc.urf_to_dlf,
        ur_to_df,
        slice_perm: cdc.fr_to_br,
        parity: cdc.parity,
    })
}

/// Solve `cube` with the two phase algorithm.
///
/// Phase 1 depths are tried in increasing order. Every phase 1 path reaching the subgroup is
/// completed by the shortest phase 2 path of at most `min(10, max_depth - phase 1 length)`
/// moves, and the first completion found is returned, with adjacent turns of the same face
/// merged.
///
/// # Errors
/// * [Error::InvalidMaxDepth] if `config.max_depth > 30`.
/// * [Error::NoSolution] if no solution of at most `config.max_depth` moves is found.
/// * [Error::Timeout] if `config.timeout` runs out first.
/// * The errors of [CubieCube::verify] for a cube violating the permutation, orientation or
///   parity invariants.
///
/// # Examples
/// ```rust,no_run
/// use twophase::cubie::CubieCube;
/// use twophase::moves::Move::*;
/// use twophase::solver::{solve, SolverConfig, SolverTables};
///
/// let tables = SolverTables::load(Some("tables".as_ref()));
/// let cube = CubieCube::from(&vec![R, U, R3, U3, F2]);
/// let result = solve(&tables, &cube, &SolverConfig::default()).unwrap();
/// println!("{} ({}), ({:?})", result, result.solution.len(), result.solve_time);
/// ```
pub fn solve(
    tables: &SolverTables,
    cube: &CubieCube,
    config: &SolverConfig,
) -> Result<SolutionResult, Error> {
    config.validate()?;
    cube.verify()?;
    let budget = Budget::new(config.timeout);
    if cube.is_solved() {
        return Ok(SolutionResult {
            solve_time: budget.elapsed(),
            ..Default::default()
        });
    }

    let start = CoordCube::from(cube);
    debug!("Solving {}", start);
    let phase1 = Phase1 { tables };
    let phase2 = Phase2 { tables };
    let root = Phase1Node {
        twist: start.twist,
        flip: start.flip,
        slice: start.slice(),
    };
    let mut path1 = Vec::with_capacity(MAX_SEARCH_DEPTH);
    let mut path2 = Vec::with_capacity(MAX_PHASE2_DEPTH);

    for depth1 in phase1.bound(&root)..=config.max_depth {
        budget.check()?;
        debug!("Phase 1 depth {}, {} nodes so far", depth1, budget.nodes());
        let found = depth_limited(&phase1, root, depth1, &budget, &mut path1, |p1, _| {
            let Some(node2) = phase2_start(tables, &start, p1) else {
                return Ok(false);
            };
            let limit = MAX_PHASE2_DEPTH.min(config.max_depth - p1.len());
            for depth2 in phase2.bound(&node2)..=limit {
                if depth_limited(&phase2, node2, depth2, &budget, &mut path2, |_, _| Ok(true))? {
                    return Ok(true);
                }
            }
            Ok(false)
        })?;

        if found {
            let mut solution = path1.clone();
            solution.extend_from_slice(&path2);
            let result = SolutionResult {
                solution: simplify_moves(&solution),
                phase1_length: path1.len(),
                solve_time: budget.elapsed(),
            };
            info!(
                "Solved in {} moves ({} + {}), {} nodes, {:?}",
                result.solution.len(),
                path1.len(),
                path2.len(),
                budget.nodes(),
                result.solve_time
            );
            return Ok(result);
        }
    }
    Err(Error::NoSolution {
        max_depth: config.max_depth,
    })
}

/// Tables and configuration bundled for repeated solves.
#[derive(Debug)]
pub struct Solver {
    tables: SolverTables,
    config: SolverConfig,
}

impl Solver {
    /// Load the tables from `config.table_dir`, building and saving whatever is missing.
    pub fn new(config: SolverConfig) -> Result<Self, Error> {
        config.validate()?;
        let tables = SolverTables::load(config.table_dir.as_deref());
        Ok(Self { tables, config })
    }

    pub fn with_tables(tables: SolverTables, config: SolverConfig) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self { tables, config })
    }

    pub fn tables(&self) -> &SolverTables {
        &self.tables
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn solve(&self, cube: &CubieCube) -> Result<SolutionResult, Error> {
        solve(&self.tables, cube, &self.config)
    }

    /// Solve the cube reached from the solved cube by `scramble`, e.g. `"R U R' U'"`.
    pub fn solve_scramble(&self, scramble: &str) -> Result<SolutionResult, Error> {
        let moves = scramble_from_str(scramble)?;
        self.solve(&CubieCube::from(&moves))
    }
}
