//! Arithmetic problems and unique-answer generation

use std::collections::BTreeSet;
use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tuning::Tuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    Add,
    Sub,
}

impl Operator {
    pub const fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Sub => '-',
        }
    }

    /// `None` when the result would be negative or overflow
    pub fn apply(self, lhs: u32, rhs: u32) -> Option<u32> {
        match self {
            Operator::Add => lhs.checked_add(rhs),
            Operator::Sub => lhs.checked_sub(rhs),
        }
    }
}

/// An expression shown on a tile, with its precomputed answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Expression")]
pub struct Problem {
    lhs: u32,
    op: Operator,
    rhs: u32,
    answer: u32,
}

/// Serialized operands; the answer is always recomputed
#[derive(Deserialize)]
struct Expression {
    lhs: u32,
    op: Operator,
    rhs: u32,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("{lhs} {} {rhs} has no positive answer", .op.symbol())]
pub struct NonPositiveAnswer {
    pub lhs: u32,
    pub op: Operator,
    pub rhs: u32,
}

impl TryFrom<Expression> for Problem {
    type Error = NonPositiveAnswer;

    fn try_from(Expression { lhs, op, rhs }: Expression) -> Result<Self, Self::Error> {
        Self::new(lhs, op, rhs).ok_or(NonPositiveAnswer { lhs, op, rhs })
    }
}

impl Problem {
    /// Build a problem, or `None` if its answer is not strictly positive
    pub fn new(lhs: u32, op: Operator, rhs: u32) -> Option<Self> {
        let answer = op.apply(lhs, rhs).filter(|&a| a > 0)?;
        Some(Self {
            lhs,
            op,
            rhs,
            answer,
        })
    }

    /// The degenerate `n + 0` problem used when random draws run out
    pub fn trivial(n: u32) -> Option<Self> {
        Self::new(n, Operator::Add, 0)
    }

    pub const fn lhs(&self) -> u32 {
        self.lhs
    }

    pub const fn op(&self) -> Operator {
        self.op
    }

    pub const fn rhs(&self) -> u32 {
        self.rhs
    }

    pub const fn answer(&self) -> u32 {
        self.answer
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.lhs, self.op.symbol(), self.rhs)
    }
}

/// Generate a problem whose answer is not in `used`.
///
/// Draws operands from the tuning's operand range and a random operator, up to
/// `max_generation_attempts` times. If every draw collides or is non-positive,
/// synthesizes `n + 0` for the smallest positive `n` not in `used`.
pub fn generate_problem<R: Rng + ?Sized>(
    rng: &mut R,
    used: &BTreeSet<u32>,
    tuning: &Tuning,
) -> Problem {
    for _ in 0..tuning.max_generation_attempts {
        let lhs = rng.random_range(tuning.operand_min..=tuning.operand_max);
        let rhs = rng.random_range(tuning.operand_min..=tuning.operand_max);
        let op = if rng.random_bool(0.5) {
            Operator::Add
        } else {
            Operator::Sub
        };

        if let Some(problem) = Problem::new(lhs, op, rhs) {
            if !used.contains(&problem.answer) {
                return problem;
            }
        }
    }

    let n = smallest_unused(used);
    log::warn!(
        "Problem generation exhausted {} attempts, falling back to {} + 0",
        tuning.max_generation_attempts,
        n
    );
    // n >= 1
    Problem {
        lhs: n,
        op: Operator::Add,
        rhs: 0,
        answer: n,
    }
}

fn smallest_unused(used: &BTreeSet<u32>) -> u32 {
    (1..=u32::MAX)
        .find(|n| !used.contains(n))
        .unwrap_or(u32::MAX)
}
