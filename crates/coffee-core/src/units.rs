//! Compile-time unit safety for the quantities the planning core moves
//! around: kilograms of coffee and PLN of cost.
//!
//! Mixing up "kg ordered" and "PLN owed" is exactly the kind of bug that
//! raw `f64` plumbing invites once a MILP builder has a few dozen cost and
//! quantity terms in flight. These newtypes catch it at compile time while
//! staying zero-cost (`#[repr(transparent)]`).

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub};

macro_rules! impl_unit_ops {
    ($type:ty, $unit_name:literal) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl AddAssign for $type {
            fn add_assign(&mut self, rhs: Self) {
                self.0 += rhs.0;
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Neg for $type {
            type Output = Self;
            fn neg(self) -> Self::Output {
                Self(-self.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Mul<$type> for f64 {
            type Output = $type;
            fn mul(self, rhs: $type) -> Self::Output {
                <$type>::new(self * rhs.0)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl Div<$type> for $type {
            type Output = f64;
            fn div(self, rhs: $type) -> Self::Output {
                self.0 / rhs.0
            }
        }

        impl std::fmt::Display for $type {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{:.4} {}", self.0, $unit_name)
            }
        }

        impl $type {
            pub fn new(value: f64) -> Self {
                Self(value)
            }

            pub fn value(self) -> f64 {
                self.0
            }

            pub fn max(self, other: Self) -> Self {
                Self(self.0.max(other.0))
            }

            pub fn min(self, other: Self) -> Self {
                Self(self.0.min(other.0))
            }

            pub fn is_finite(self) -> bool {
                self.0.is_finite()
            }
        }
    };
}

/// Kilograms of coffee — order quantities, inventory levels, demand.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Kilograms(pub f64);
impl_unit_ops!(Kilograms, "kg");

/// PLN (Polish zloty) — prices, costs, the planning objective.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Pln(pub f64);
impl_unit_ops!(Pln, "PLN");

impl Mul<Pln> for Kilograms {
    type Output = Pln;
    fn mul(self, rhs: Pln) -> Pln {
        Pln(self.0 * rhs.0)
    }
}

impl Mul<Kilograms> for Pln {
    type Output = Pln;
    fn mul(self, rhs: Kilograms) -> Pln {
        Pln(self.0 * rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kg_times_price_is_pln() {
        let qty = Kilograms(10.0);
        let price = Pln(12.5);
        assert_eq!((qty * price).value(), 125.0);
    }

    #[test]
    fn arithmetic_stays_in_unit() {
        let a = Kilograms(5.0);
        let b = Kilograms(3.0);
        assert_eq!((a - b).value(), 2.0);
        assert_eq!((a + b).value(), 8.0);
    }
}
