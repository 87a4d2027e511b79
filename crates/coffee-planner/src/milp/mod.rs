//! MILP Builder (spec §4.3): two entry points, [`baseline`] and
//! [`advanced`], both producing `good_lp` decision variables, an
//! objective, and a constraint set from assembled parameters.

pub mod advanced;
pub mod baseline;

use good_lp::{variable, ProblemVariables, Variable};

/// A `{0,1}` decision variable. Under the `solver-highs` feature this is a
/// true binary via `good_lp`'s `.binary()` builder; otherwise it is
/// relaxed to `[0,1]` continuous and rounded post-solve per spec §4.3's
/// numerical-semantics tolerance, mirroring
/// `gat_algo::tep::solver::solve_tep`'s relax-and-round strategy.
#[cfg(feature = "solver-highs")]
pub(crate) fn binary(vars: &mut ProblemVariables) -> Variable {
    vars.add(variable().binary())
}

#[cfg(not(feature = "solver-highs"))]
pub(crate) fn binary(vars: &mut ProblemVariables) -> Variable {
    vars.add(variable().min(0.0).max(1.0))
}
