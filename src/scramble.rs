use std::str::FromStr;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::Error;
use crate::moves::{Move, ALL_MOVES};

/// Parse a whitespace separated move sequence such as `"R U R' U' F2"`.
pub fn scramble_from_str(s: &str) -> Result<Vec<Move>, Error> {
    s.split_whitespace().map(Move::from_str).collect()
}

pub fn scramble_to_str(s: &[Move]) -> String {
    s.iter()
        .map(|m| m.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// A random sequence of `length` moves in which no move follows a turn of the same face and
/// opposite faces are always turned in U, R, F before D, L, B order.
pub fn gen_scramble(length: usize) -> Vec<Move> {
    gen_scramble_with(&mut rand::thread_rng(), length)
}

pub fn gen_scramble_with<R: Rng + ?Sized>(rng: &mut R, length: usize) -> Vec<Move> {
    let mut scramble: Vec<Move> = Vec::with_capacity(length);
    while scramble.len() < length {
        let m = match ALL_MOVES.choose(rng) {
            Some(&m) => m,
            None => break,
        };
        if scramble.last().map_or(true, |&prev| m.can_follow(prev)) {
            scramble.push(m);
        }
    }
    scramble
}

/// Merge adjacent turns of the same face, dropping those that cancel, until no two adjacent
/// moves turn the same face.
///
/// Turns of opposite faces commute, so `R L R` also becomes `R2 L`.
pub fn simplify_moves(moves: &[Move]) -> Vec<Move> {
    let mut result: Vec<Move> = Vec::with_capacity(moves.len());
    for &m in moves {
        push_merged(&mut result, m);
    }
    result
}

fn push_merged(result: &mut Vec<Move>, m: Move) {
    let n = result.len();
    // the same face may sit behind one turn of the opposite face
    let target = match n {
        0 => None,
        _ if result[n - 1].is_same_layer(m) => Some(n - 1),
        _ if n >= 2 && result[n - 1].is_opposite(m) && result[n - 2].is_same_layer(m) => {
            Some(n - 2)
        }
        _ => None,
    };
    match target {
        Some(i) => {
            let power = (result[i].power() + m.power()) % 4;
            if power == 0 {
                result.remove(i);
            } else {
                result[i] = Move::new(m.face(), power);
            }
        }
        None => result.push(m),
    }
}

#[cfg(test)]
mod test {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::cubie::CubieCube;
    use crate::moves::Move::*;

    #[test]
    fn test_scramble_from_str() {
        let m = vec![R, U, R3, U3, F, L3, D3, B2, R3, U3];
        assert_eq!(scramble_from_str("R U R' U' F L' D' B2 R' U'").unwrap(), m);
        assert_eq!(scramble_from_str("  R3\tU2\n").unwrap(), vec![R3, U2]);
        assert_eq!(scramble_from_str("").unwrap(), vec![]);
        assert!(matches!(
            scramble_from_str("R U X"),
            Err(Error::InvalidScramble(s)) if s == "X"
        ));
    }

    #[test]
    fn test_scramble_to_str() {
        let m = vec![R, U, R3, U3, F, L3, D3, B2, R3, U3];
        assert_eq!(scramble_to_str(&m), "R U R' U' F L' D' B2 R' U'");
        assert_eq!(scramble_to_str(&[]), "");
    }

    #[test]
    fn test_gen_scramble() {
        let ss = gen_scramble(25);
        assert_eq!(ss.len(), 25);
        assert!(ss.windows(2).all(|w| w[1].can_follow(w[0])));

        let mut a = StdRng::seed_from_u64(7);
        let mut b = StdRng::seed_from_u64(7);
        assert_eq!(gen_scramble_with(&mut a, 20), gen_scramble_with(&mut b, 20));
    }

    #[test]
    fn test_simplify_moves() {
        assert_eq!(simplify_moves(&[R, R]), vec![R2]);
        assert_eq!(simplify_moves(&[R, R3]), vec![]);
        assert_eq!(simplify_moves(&[U, R, R3, U]), vec![U2]);
        assert_eq!(simplify_moves(&[R, L, R]), vec![R2, L]);
        assert_eq!(simplify_moves(&[F, U, F]), vec![F, U, F]);
        assert_eq!(simplify_moves(&[R2, R2, R2]), vec![R2]);
    }

    #[test]
    fn test_simplify_keeps_cube() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            let moves: Vec<Move> = (0..30).map(|_| *ALL_MOVES.choose(&mut rng).unwrap()).collect();
            let simplified = simplify_moves(&moves);
            assert!(simplified.len() <= moves.len());
            assert_eq!(CubieCube::from(&moves), CubieCube::from(&simplified));
        }
    }
}
