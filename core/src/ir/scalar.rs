//! file: core/src/ir/scalar.rs
//! description: symbolic decimal scalars used by every IR parameter.
//!
//! A `Scalar` is either a decimal literal, a named free variable, or a small
//! arithmetic expression over those. Literal sub-expressions are folded when
//! the expression is built, so fully numeric inputs stay plain literals.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::ops;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use serde::{Deserialize, Serialize};

use super::err::EvalError;

/// Binding of free-variable names to decimal values.
pub type Assignments = HashMap<String, Decimal>;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scalar {
    Literal(Decimal),
    Variable(String),
    Negative(Box<Scalar>),
    Add(Box<Scalar>, Box<Scalar>),
    Mul(Box<Scalar>, Box<Scalar>),
    Div(Box<Scalar>, Box<Scalar>),
    Min(Vec<Scalar>),
    Max(Vec<Scalar>),
}

/// Convert a float through its shortest decimal spelling, so `6.1` becomes
/// exactly `6.1` rather than its binary expansion.
pub fn decimal_from_f64(value: f64) -> Result<Decimal, EvalError> {
    if !value.is_finite() {
        return Err(EvalError::NonFinite);
    }
    Decimal::from_str(&value.to_string())
        .ok()
        .or_else(|| Decimal::from_f64(value))
        .ok_or(EvalError::Overflow)
}

pub fn decimal_to_f64(value: Decimal) -> Result<f64, EvalError> {
    value.to_f64().ok_or(EvalError::Overflow)
}

impl Scalar {
    pub fn var(name: impl Into<String>) -> Self {
        Scalar::Variable(name.into())
    }

    pub fn zero() -> Self {
        Scalar::Literal(Decimal::ZERO)
    }

    pub fn as_literal(&self) -> Option<Decimal> {
        match self {
            Scalar::Literal(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_zero(&self) -> bool {
        matches!(self, Scalar::Literal(v) if v.is_zero())
    }

    pub fn min_with(self, other: Scalar) -> Scalar {
        match (self.as_literal(), other.as_literal()) {
            (Some(a), Some(b)) => Scalar::Literal(a.min(b)),
            _ => Scalar::Min(vec![self, other]),
        }
    }

    pub fn max_with(self, other: Scalar) -> Scalar {
        match (self.as_literal(), other.as_literal()) {
            (Some(a), Some(b)) => Scalar::Literal(a.max(b)),
            _ => Scalar::Max(vec![self, other]),
        }
    }

    /// Evaluate under `assignments`; every free variable must be bound.
    pub fn eval(&self, assignments: &Assignments) -> Result<Decimal, EvalError> {
        match self {
            Scalar::Literal(v) => Ok(*v),
            Scalar::Variable(name) => assignments
                .get(name)
                .copied()
                .ok_or_else(|| EvalError::MissingVariable(name.clone())),
            Scalar::Negative(inner) => Ok(-inner.eval(assignments)?),
            Scalar::Add(lhs, rhs) => lhs
                .eval(assignments)?
                .checked_add(rhs.eval(assignments)?)
                .ok_or(EvalError::Overflow),
            Scalar::Mul(lhs, rhs) => lhs
                .eval(assignments)?
                .checked_mul(rhs.eval(assignments)?)
                .ok_or(EvalError::Overflow),
            Scalar::Div(lhs, rhs) => {
                let num = lhs.eval(assignments)?;
                let den = rhs.eval(assignments)?;
                if den.is_zero() {
                    return Err(EvalError::DivisionByZero);
                }
                num.checked_div(den).ok_or(EvalError::Overflow)
            }
            Scalar::Min(items) => fold_extreme(items, assignments, Decimal::min),
            Scalar::Max(items) => fold_extreme(items, assignments, Decimal::max),
        }
    }

    /// Collect the names of all free variables into `out`.
    pub fn collect_variables(&self, out: &mut BTreeSet<String>) {
        match self {
            Scalar::Literal(_) => {}
            Scalar::Variable(name) => {
                out.insert(name.clone());
            }
            Scalar::Negative(inner) => inner.collect_variables(out),
            Scalar::Add(lhs, rhs) | Scalar::Mul(lhs, rhs) | Scalar::Div(lhs, rhs) => {
                lhs.collect_variables(out);
                rhs.collect_variables(out);
            }
            Scalar::Min(items) | Scalar::Max(items) => {
                for item in items {
                    item.collect_variables(out);
                }
            }
        }
    }
}

fn fold_extreme(
    items: &[Scalar],
    assignments: &Assignments,
    pick: fn(Decimal, Decimal) -> Decimal,
) -> Result<Decimal, EvalError> {
    let mut acc: Option<Decimal> = None;
    for item in items {
        let v = item.eval(assignments)?;
        acc = Some(match acc {
            Some(prev) => pick(prev, v),
            None => v,
        });
    }
    Ok(acc.unwrap_or(Decimal::ZERO))
}

impl ops::Add for Scalar {
    type Output = Scalar;

    fn add(self, rhs: Scalar) -> Scalar {
        match (self.as_literal(), rhs.as_literal()) {
            (Some(a), Some(b)) => match a.checked_add(b) {
                Some(v) => Scalar::Literal(v),
                None => Scalar::Add(Box::new(self), Box::new(rhs)),
            },
            (_, Some(b)) if b.is_zero() => self,
            (Some(a), _) if a.is_zero() => rhs,
            _ => Scalar::Add(Box::new(self), Box::new(rhs)),
        }
    }
}

impl ops::Neg for Scalar {
    type Output = Scalar;

    fn neg(self) -> Scalar {
        match self {
            Scalar::Literal(v) => Scalar::Literal(-v),
            Scalar::Negative(inner) => *inner,
            other => Scalar::Negative(Box::new(other)),
        }
    }
}

impl ops::Sub for Scalar {
    type Output = Scalar;

    fn sub(self, rhs: Scalar) -> Scalar {
        self + (-rhs)
    }
}

impl ops::Mul for Scalar {
    type Output = Scalar;

    fn mul(self, rhs: Scalar) -> Scalar {
        match (self.as_literal(), rhs.as_literal()) {
            (Some(a), Some(b)) => match a.checked_mul(b) {
                Some(v) => Scalar::Literal(v),
                None => Scalar::Mul(Box::new(self), Box::new(rhs)),
            },
            (_, Some(b)) if b == Decimal::ONE => self,
            (Some(a), _) if a == Decimal::ONE => rhs,
            _ => Scalar::Mul(Box::new(self), Box::new(rhs)),
        }
    }
}

impl ops::Div for Scalar {
    type Output = Scalar;

    fn div(self, rhs: Scalar) -> Scalar {
        match (self.as_literal(), rhs.as_literal()) {
            (Some(a), Some(b)) if !b.is_zero() => match a.checked_div(b) {
                Some(v) => Scalar::Literal(v),
                None => Scalar::Div(Box::new(self), Box::new(rhs)),
            },
            (_, Some(b)) if b == Decimal::ONE => self,
            _ => Scalar::Div(Box::new(self), Box::new(rhs)),
        }
    }
}

impl From<Decimal> for Scalar {
    fn from(value: Decimal) -> Self {
        Scalar::Literal(value)
    }
}

impl From<f64> for Scalar {
    /// Non-finite floats become zero; finite floats beyond the decimal range
    /// saturate to `Decimal::MAX` or `Decimal::MIN`.
    fn from(value: f64) -> Self {
        match decimal_from_f64(value) {
            Ok(v) => Scalar::Literal(v),
            Err(EvalError::NonFinite) => {
                log::warn!("non-finite literal {value} replaced by 0");
                Scalar::zero()
            }
            Err(_) => {
                let bound = if value > 0.0 { Decimal::MAX } else { Decimal::MIN };
                log::warn!("literal {value} is out of decimal range, saturated to {bound}");
                Scalar::Literal(bound)
            }
        }
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Scalar::Literal(Decimal::from(value))
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Literal(Decimal::from(value))
    }
}

impl From<usize> for Scalar {
    fn from(value: usize) -> Self {
        Scalar::Literal(Decimal::from(value))
    }
}

impl From<&str> for Scalar {
    fn from(name: &str) -> Self {
        Scalar::Variable(name.to_string())
    }
}

impl From<String> for Scalar {
    fn from(name: String) -> Self {
        Scalar::Variable(name)
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Literal(v) => write!(f, "{}", v.normalize()),
            Scalar::Variable(name) => write!(f, "{name}"),
            Scalar::Negative(inner) => write!(f, "-({inner})"),
            Scalar::Add(lhs, rhs) => write!(f, "({lhs} + {rhs})"),
            Scalar::Mul(lhs, rhs) => write!(f, "({lhs} * {rhs})"),
            Scalar::Div(lhs, rhs) => write!(f, "({lhs} / {rhs})"),
            Scalar::Min(items) | Scalar::Max(items) => {
                let name = if matches!(self, Scalar::Min(_)) { "min" } else { "max" };
                write!(f, "{name}(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, ")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn literals_fold_on_construction() {
        let s = Scalar::from(1.5) + Scalar::from(2) * Scalar::from(3);
        assert_eq!(s, Scalar::Literal(dec!(7.5)));
    }

    #[test]
    fn float_literals_keep_their_decimal_spelling() {
        assert_eq!(Scalar::from(6.1), Scalar::Literal(dec!(6.1)));
        assert_eq!(Scalar::from(0.05), Scalar::Literal(dec!(0.05)));
    }

    #[test]
    fn out_of_range_floats_saturate() {
        assert_eq!(Scalar::from(1e30), Scalar::Literal(Decimal::MAX));
        assert_eq!(Scalar::from(-1e30), Scalar::Literal(Decimal::MIN));
        assert_eq!(Scalar::from(f64::NAN), Scalar::zero());
    }

    #[test]
    fn missing_variable_is_an_eval_error() {
        let s = Scalar::var("t_ramp") + Scalar::from(1);
        let err = s.eval(&Assignments::new()).unwrap_err();
        assert_eq!(err, EvalError::MissingVariable("t_ramp".to_string()));
    }

    #[test]
    fn symbolic_expression_evaluates_under_assignment() {
        let s = (Scalar::var("a") - Scalar::from(1)) / Scalar::var("b");
        let mut a = Assignments::new();
        a.insert("a".to_string(), dec!(5));
        a.insert("b".to_string(), dec!(2));
        assert_eq!(s.eval(&a).unwrap(), dec!(2));

        a.insert("b".to_string(), dec!(0));
        assert_eq!(s.eval(&a).unwrap_err(), EvalError::DivisionByZero);
    }

    #[test]
    fn max_of_symbolic_and_literal() {
        let s = Scalar::var("d").max_with(Scalar::from(3));
        let mut a = Assignments::new();
        a.insert("d".to_string(), dec!(2));
        assert_eq!(s.eval(&a).unwrap(), dec!(3));
    }
}
