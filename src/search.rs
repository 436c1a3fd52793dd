//! Depth limited search over a move set guided by an admissible lower bound.
//!
//! Both phases of the solver run through [depth_limited]; a [Phase] supplies the move set, the
//! successor function and the bound.

use std::cell::Cell;
use std::time::{Duration, Instant};

use crate::error::Error;
use crate::moves::Move;

/// A search space explored by [depth_limited].
pub trait Phase {
    type Node: Copy;

    fn moves(&self) -> &[Move];

    fn step(&self, node: &Self::Node, m: Move) -> Self::Node;

    /// Lower bound for the number of moves from `node` to a goal. 0 only at a goal.
    fn bound(&self, node: &Self::Node) -> usize;

    /// Whether a goal node reached with `remaining > 0` moves still to go is expanded further.
    fn expand_goal(&self, remaining: usize) -> bool;
}

/// Wall-clock budget of one solve, shared by both phases.
#[derive(Debug)]
pub struct Budget {
    start: Instant,
    timeout: Duration,
    nodes: Cell<u64>,
}

impl Budget {
    /// The clock starts now.
    pub fn new(timeout: Duration) -> Self {
        Self {
            start: Instant::now(),
            timeout,
            nodes: Cell::new(0),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Number of nodes expanded so far.
    pub fn nodes(&self) -> u64 {
        self.nodes.get()
    }

    pub fn check(&self) -> Result<(), Error> {
        if self.elapsed() >= self.timeout {
            return Err(Error::Timeout(self.timeout));
        }
        Ok(())
    }

    /// Count one expanded node, checking the clock every 1024 nodes.
    pub fn tick(&self) -> Result<(), Error> {
        let n = self.nodes.get() + 1;
        self.nodes.set(n);
        if n % 1024 == 0 {
            self.check()?;
        }
        Ok(())
    }
}

struct Frame<N> {
    node: N,
    /// Index of the next move to try from `node`.
    cursor: usize,
}

/// Enumerate the canonical move sequences of exactly `depth` moves leading from `root` to a
/// goal, skipping every branch whose lower bound exceeds the moves left.
///
/// `on_goal` is called with the path and the goal node; the search stops as soon as it returns
/// `true`. Returns whether it did. `path` is left holding the accepted path.
pub fn depth_limited<P, F>(
    phase: &P,
    root: P::Node,
    depth: usize,
    budget: &Budget,
    path: &mut Vec<Move>,
    mut on_goal: F,
) -> Result<bool, Error>
where
    P: Phase,
    F: FnMut(&[Move], &P::Node) -> Result<bool, Error>,
{
    path.clear();
    let h = phase.bound(&root);
    if h > depth {
        return Ok(false);
    }
    if depth == 0 {
        return on_goal(path, &root);
    }

    let mut stack = Vec::with_capacity(depth);
    stack.push(Frame {
        node: root,
        cursor: 0,
    });
    let moves = phase.moves();

    while let Some(top) = stack.last_mut() {
        if top.cursor == moves.len() {
            stack.pop();
            path.pop();
            continue;
        }
        let m = moves[top.cursor];
        top.cursor += 1;
        if let Some(&prev) = path.last() {
            if !m.can_follow(prev) {
                continue;
            }
        }

        let node = phase.step(&top.node, m);
        budget.tick()?;
        let remaining = depth - path.len() - 1;
        let h = phase.bound(&node);
        if h > remaining || (h == 0 && remaining > 0 && !phase.expand_goal(remaining)) {
            continue;
        }

        path.push(m);
        if remaining == 0 {
            if on_goal(path, &node)? {
                return Ok(true);
            }
            path.pop();
        } else {
            stack.push(Frame { node, cursor: 0 });
        }
    }
    Ok(false)
}
