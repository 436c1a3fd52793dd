//! Combinatorial helpers for ranking piece permutations and orientations.
//!
//! All piece identifiers here are 0-based.

pub fn factorial(n: usize) -> usize {
    (1..=n).product()
}

/// n choose k, 0 when `k > n`.
pub fn binomial(n: usize, k: usize) -> usize {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    (0..k).fold(1, |acc, i| acc * (n - i) / (i + 1))
}

/// Rank of an orientation vector: the first `len - 1` digits in base `base`, most significant
/// first. The last digit is implied by the sum invariant.
pub fn rank_orientation(orientation: &[u8], base: u8) -> usize {
    orientation[..orientation.len() - 1]
        .iter()
        .fold(0, |acc, &o| acc * base as usize + o as usize)
}

/// Inverse of [rank_orientation]; the last digit is chosen so the sum is 0 mod `base`.
pub fn unrank_orientation<const N: usize>(mut idx: usize, base: u8) -> [u8; N] {
    let mut orientation = [0; N];
    let mut sum = 0;
    for o in orientation[..N - 1].iter_mut().rev() {
        *o = (idx % base as usize) as u8;
        sum += *o as usize;
        idx /= base as usize;
    }
    orientation[N - 1] = ((base as usize - sum % base as usize) % base as usize) as u8;
    orientation
}

/// Parity of a permutation, 0 for even and 1 for odd.
pub fn permutation_parity(perm: &[u8]) -> u8 {
    let mut s = 0;
    for i in (1..perm.len()).rev() {
        for j in (0..i).rev() {
            if perm[j] > perm[i] {
                s += 1;
            }
        }
    }
    (s % 2) as u8
}

/// Rank where and in which order the `K` pieces `first..first + K` sit in `perm`.
///
/// The location part ranks the set of occupied slots with binomial coefficients, scanning from
/// the left (or from the right if `from_end`). The order part counts left rotations of the
/// tracked pieces, giving a factorial number system digit per piece. The result is
/// `K! * location + order`.
pub fn rank_subset<const K: usize>(perm: &[u8], first: u8, from_end: bool) -> usize {
    let n = perm.len();
    let tracked = first..first + K as u8;
    let mut subset = [0u8; K];
    let mut location = 0;
    let mut x = 0;

    if from_end {
        for j in (0..n).rev() {
            if tracked.contains(&perm[j]) {
                location += binomial(n - 1 - j, x + 1);
                subset[K - 1 - x] = perm[j];
                x += 1;
            }
        }
    } else {
        for (i, p) in perm.iter().enumerate() {
            if tracked.contains(p) {
                location += binomial(i, x + 1);
                subset[x] = *p;
                x += 1;
            }
        }
    }
    debug_assert_eq!(x, K, "tracked pieces missing from permutation");

    let mut order = 0;
    for j in (1..K).rev() {
        let mut k = 0;
        while subset[j] != first + j as u8 {
            subset[..=j].rotate_left(1);
            k += 1;
        }
        order = (j + 1) * order + k;
    }
    factorial(K) * location + order
}

/// Inverse of [rank_subset]. Slots not holding a tracked piece get the remaining identifiers in
/// ascending order, so the result is always a permutation of `0..N`.
pub fn unrank_subset<const K: usize, const N: usize>(
    idx: usize,
    first: u8,
    from_end: bool,
) -> [u8; N] {
    let mut subset: [u8; K] = std::array::from_fn(|i| first + i as u8);
    let mut order = idx % factorial(K);
    let mut location = idx / factorial(K);

    for i in 1..K {
        let k = order % (i + 1);
        order /= i + 1;
        subset[..=i].rotate_right(k);
    }

    let mut slots: [Option<u8>; N] = [None; N];
    // x counts the pieces still to be placed
    let mut x = K;
    if from_end {
        for i in 0..N {
            if x == 0 {
                break;
            }
            let c = binomial(N - 1 - i, x);
            if location >= c {
                slots[i] = Some(subset[K - x]);
                location -= c;
                x -= 1;
            }
        }
    } else {
        for i in (0..N).rev() {
            if x == 0 {
                break;
            }
            let c = binomial(i, x);
            if location >= c {
                slots[i] = Some(subset[x - 1]);
                location -= c;
                x -= 1;
            }
        }
    }

    let mut others = (0..N as u8).filter(|p| !(first..first + K as u8).contains(p));
    slots.map(|slot| slot.or_else(|| others.next()).unwrap_or_default())
}
