#[macro_use]
extern crate lazy_static;

use std::{fs, thread, time::Duration};

use rand::{rngs::StdRng, SeedableRng};

use twophase::coord::EdgeMergeTable;
use twophase::cubie::CubieCube;
use twophase::error::Error;
use twophase::moves::{Move::*, ALL_MOVES};
use twophase::read_table;
use twophase::scramble::{gen_scramble_with, scramble_from_str};
use twophase::solver::{solve, Solver, SolverConfig, SolverTables};

lazy_static! {
    static ref TABLES: SolverTables = SolverTables::load(None);
}

const SCRAMBLE_20: &str = "R U2 F' D L2 B R' U F2 D' L B2 U' R2 F D2 L' B U2 R";
const SUPERFLIP: &str = "U R2 F B R B2 R U2 L B2 R U' D' R2 F R' L B2 U2 F2";

fn config() -> SolverConfig {
    SolverConfig::default().without_cache()
}

#[test]
fn test_solved_cube() {
    let result = solve(&TABLES, &CubieCube::default(), &config()).unwrap();
    assert!(result.solution.is_empty());
    assert_eq!(result.phase1_length, 0);
}

#[test]
fn test_quarter_turns() {
    for m in ALL_MOVES.iter().filter(|m| m.power() != 2) {
        let cube = CubieCube::default().apply_move(*m);
        let result = solve(&TABLES, &cube, &config()).unwrap();
        assert_eq!(result.solution, vec![m.get_inverse()]);
    }
}

#[test_log::test]
fn test_fixed_scramble() {
    let cube = CubieCube::from(&scramble_from_str(SCRAMBLE_20).unwrap());
    let result = solve(&TABLES, &cube, &config()).unwrap();
    assert!(result.solution.len() <= 30);
    assert!(result.phase1_length <= 30);
    assert!(cube.apply_moves(&result.solution).is_solved());
}

#[test_log::test]
fn test_random_scrambles() {
    let mut rng = StdRng::seed_from_u64(2024);
    for _ in 0..5 {
        let scramble = gen_scramble_with(&mut rng, 25);
        let cube = CubieCube::from(&scramble);
        let result = solve(&TABLES, &cube, &config()).unwrap();
        assert!(result.solution.len() <= 30);
        assert!(cube.apply_moves(&result.solution).is_solved());
        assert!(result.solution.windows(2).all(|w| !w[0].is_same_layer(w[1])));
    }
}

#[test]
fn test_max_depth_too_small() {
    let cube = CubieCube::from(&vec![R, U]);
    let result = solve(&TABLES, &cube, &config().with_max_depth(1));
    assert!(matches!(result, Err(Error::NoSolution { max_depth: 1 })));

    let result = solve(&TABLES, &cube, &config().with_max_depth(2)).unwrap();
    assert_eq!(result.solution, vec![U3, R3]);
}

#[test_log::test]
fn test_timeout() {
    let cube = CubieCube::from(&scramble_from_str(SUPERFLIP).unwrap());
    let result = solve(&TABLES, &cube, &config().with_timeout(Duration::from_nanos(1)));
    assert!(matches!(result, Err(Error::Timeout(_))));
}

#[test]
fn test_invalid_cube() {
    let mut cube = CubieCube::default();
    cube.ep.swap(0, 1);
    assert!(matches!(
        solve(&TABLES, &cube, &config()),
        Err(Error::InvalidParity)
    ));
}

#[test]
fn test_concurrent_solves() {
    let scrambles = ["R U R' U'", "F2 D' L B", SCRAMBLE_20, "U2 D2 F2 B2 L2 R2"];
    thread::scope(|s| {
        let handles: Vec<_> = scrambles
            .iter()
            .map(|scramble| {
                s.spawn(move || {
                    let cube = CubieCube::from(&scramble_from_str(scramble).unwrap());
                    let result = solve(&TABLES, &cube, &config()).unwrap();
                    cube.apply_moves(&result.solution).is_solved()
                })
            })
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap());
        }
    });
}

#[test]
fn test_solver_wrapper() {
    let solver = Solver::with_tables(TABLES.clone(), config()).unwrap();
    let result = solver.solve_scramble("F R' U2").unwrap();
    assert_eq!(result.to_string(), "U2 R F'");
    assert!(matches!(
        solver.solve_scramble("F R' Q"),
        Err(Error::InvalidScramble(_))
    ));
    assert!(Solver::with_tables(TABLES.clone(), config().with_max_depth(31)).is_err());
}

#[test_log::test]
fn test_corrupt_table_is_rebuilt() {
    let dir = std::env::temp_dir().join(format!("twophase-tables-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let name = "merge_ur_to_ul_ub_to_df";
    fs::write(dir.join(name), [0xffu8; 64]).unwrap();

    let em = EdgeMergeTable::load(Some(dir.as_path()));
    assert_eq!(em, TABLES.em);
    let saved: Vec<u16> = read_table(&dir, name, em.ur_to_df.len()).unwrap();
    assert_eq!(saved, em.ur_to_df);
    let _ = fs::remove_dir_all(&dir);
}
