//! A crate for solving the 3x3 Rubik's cube with [Kociemba's two phase algorithm](http://kociemba.org/cube.htm).
//!
//! Build the [solver::SolverTables] once, then solve any number of cubes against them:
//!
//! ```rust,no_run
//! use twophase::scramble::scramble_from_str;
//! use twophase::solver::{Solver, SolverConfig};
//!
//! let solver = Solver::new(SolverConfig::default()).unwrap();
//! let result = solver.solve_scramble("R U R' U' F2 D L'").unwrap();
//! println!("{}", result);
//! ```

#[macro_use]
extern crate lazy_static;

/// Module containing 3x3 cube constants.
pub mod constants;
pub mod coord;
pub mod cubie;
pub mod error;
pub mod moves;
pub mod pruning;
/// Module containing functions for scrambling the cube.
pub mod scramble;
pub mod search;
pub mod solver;
pub mod utils;

use std::{fs, path::Path, thread};

use bincode::{
    config::{self, Configuration},
    error::DecodeError,
    serde::{decode_from_slice, encode_to_vec},
};
use log::{debug, info, warn};
use serde::{de::DeserializeOwned, Serialize};

use crate::error::Error;
pub use crate::{cubie::CubieCube, moves::Move};

const CONFIG: Configuration = config::standard();

pub fn write_table<P, T: Serialize>(path: P, table: &T) -> Result<(), Error>
where
    P: AsRef<Path>,
{
    let encoded = encode_to_vec(table, CONFIG)?;
    fs::write(path, encoded)?;
    Ok(())
}

pub fn decode_table<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, Error> {
    let (decoded, written) = decode_from_slice(bytes, CONFIG)?;
    let additional = bytes.len() - written;

    if additional != 0 {
        return Err(DecodeError::UnexpectedEnd { additional })?;
    }
    Ok(decoded)
}

/// Read the table `name` from `dir` and check that it holds `expected_len` entries.
pub fn read_table<T: DeserializeOwned>(
    dir: &Path,
    name: &str,
    expected_len: usize,
) -> Result<Vec<T>, Error> {
    let table: Vec<T> = decode_table(&fs::read(dir.join(name))?)?;
    if table.len() != expected_len {
        return Err(Error::InvalidTable {
            name: name.to_string(),
            expected: expected_len,
            found: table.len(),
        });
    }
    Ok(table)
}

/// Load the table `name` from `dir`, or build it with `build` and save it there.
///
/// A missing file is built silently, an unreadable or wrongly sized one is logged and rebuilt.
/// A failed save is logged and otherwise ignored, the cache is only an optimization.
pub fn load_or_build<T, F>(dir: Option<&Path>, name: &str, expected_len: usize, build: F) -> Vec<T>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Vec<T>,
{
    let Some(dir) = dir else {
        return build();
    };
    match read_table(dir, name, expected_len) {
        Ok(table) => {
            debug!("Loaded {} table", name);
            return table;
        }
        Err(Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!("Discarding {} table: {}", name, e),
    }

    info!("Creating {} table...", name);
    let table = build();
    debug_assert_eq!(table.len(), expected_len);
    if let Err(e) = fs::create_dir_all(dir)
        .map_err(Error::from)
        .and_then(|_| write_table(dir.join(name), &table))
    {
        warn!("Could not save {} table: {}", name, e);
    }
    table
}

/// Join a table building thread, resuming its panic if it had one.
pub(crate) fn join<T>(handle: thread::ScopedJoinHandle<'_, T>) -> T {
    handle
        .join()
        .unwrap_or_else(|e| std::panic::resume_unwind(e))
}

#[cfg(test)]
mod test {
    use std::path::PathBuf;

    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("twophase-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_decode_rejects_trailing_bytes() {
        let mut bytes = encode_to_vec(vec![1u16, 2, 3], CONFIG).unwrap();
        assert_eq!(decode_table::<Vec<u16>>(&bytes).unwrap(), vec![1, 2, 3]);
        bytes.push(0);
        assert!(matches!(
            decode_table::<Vec<u16>>(&bytes),
            Err(Error::Decode(DecodeError::UnexpectedEnd { additional: 1 }))
        ));
    }

    #[test]
    fn test_load_or_build_caches() {
        let dir = temp_dir("cache");
        let table: Vec<u16> = load_or_build(Some(dir.as_path()), "t", 3, || vec![4, 5, 6]);
        assert_eq!(table, vec![4, 5, 6]);
        assert!(dir.join("t").exists());
        let table: Vec<u16> = load_or_build(Some(dir.as_path()), "t", 3, || unreachable!());
        assert_eq!(table, vec![4, 5, 6]);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_load_or_build_rebuilds_corrupt() {
        let dir = temp_dir("corrupt");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("t"), b"garbage").unwrap();
        let table: Vec<u16> = load_or_build(Some(dir.as_path()), "t", 2, || vec![7, 8]);
        assert_eq!(table, vec![7, 8]);
        assert_eq!(read_table::<u16>(&dir, "t", 2).unwrap(), vec![7, 8]);

        // right encoding, wrong size
        write_table(dir.join("t"), &vec![1u16]).unwrap();
        assert!(matches!(
            read_table::<u16>(&dir, "t", 2),
            Err(Error::InvalidTable { expected: 2, found: 1, .. })
        ));
        let table: Vec<u16> = load_or_build(Some(dir.as_path()), "t", 2, || vec![7, 8]);
        assert_eq!(table, vec![7, 8]);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_load_or_build_without_dir() {
        let table: Vec<u8> = load_or_build(None, "t", 1, || vec![9]);
        assert_eq!(table, vec![9]);
    }
}
