//! file: core/src/ir/params.rs
//! description: execution parameters attached to a compiled program.
//!
//! `static_params` are bound at compile time, every `batch_params` entry
//! defines one program variant, and `args_list` names the values supplied
//! when the program is called.

use std::fmt;

use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::err::EvalError;
use super::scalar::Assignments;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Scalar(Decimal),
    /// Per-site values for a run-time vector.
    Vector(Vec<Decimal>),
}

impl ParamValue {
    pub fn as_scalar(&self) -> Option<Decimal> {
        match self {
            ParamValue::Scalar(v) => Some(*v),
            ParamValue::Vector(_) => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Scalar(v) => write!(f, "{v}"),
            ParamValue::Vector(vs) => {
                let parts: Vec<String> = vs.iter().map(|v| v.to_string()).collect();
                write!(f, "[{}]", parts.join(", "))
            }
        }
    }
}

impl From<Decimal> for ParamValue {
    fn from(value: Decimal) -> Self {
        ParamValue::Scalar(value)
    }
}

impl From<Vec<Decimal>> for ParamValue {
    fn from(values: Vec<Decimal>) -> Self {
        ParamValue::Vector(values)
    }
}

pub type ParamMap = IndexMap<String, ParamValue>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameters {
    pub static_params: ParamMap,
    pub batch_params: Vec<ParamMap>,
    pub args_list: Vec<String>,
}

impl Default for Parameters {
    /// One batch entry with no overrides, so a program always runs at least once.
    fn default() -> Self {
        Parameters {
            static_params: ParamMap::new(),
            batch_params: vec![ParamMap::new()],
            args_list: Vec::new(),
        }
    }
}

impl Parameters {
    /// Bind call-time `values` to `args_list` by position.
    pub fn parse_args(&self, values: &[Decimal]) -> Result<ParamMap, EvalError> {
        if values.len() != self.args_list.len() {
            return Err(EvalError::ArgumentCount {
                expected: self.args_list.len(),
                got: values.len(),
            });
        }
        Ok(self
            .args_list
            .iter()
            .cloned()
            .zip(values.iter().map(|v| ParamValue::Scalar(*v)))
            .collect())
    }

    /// Full parameter set for every batch entry: static values, overridden
    /// by the batch entry, overridden by call-time arguments.
    pub fn batch_assignments(&self, args: &[Decimal]) -> Result<Vec<ParamMap>, EvalError> {
        let args = self.parse_args(args)?;
        Ok(self
            .batch_params
            .iter()
            .map(|batch| {
                let mut merged = self.static_params.clone();
                merged.extend(batch.iter().map(|(k, v)| (k.clone(), v.clone())));
                merged.extend(args.iter().map(|(k, v)| (k.clone(), v.clone())));
                merged
            })
            .collect())
    }
}

/// Scalar entries of `params` as an evaluation assignment; vectors are per-site
/// weights and are left out.
pub fn scalar_assignments(params: &ParamMap) -> Assignments {
    params
        .iter()
        .filter_map(|(name, value)| value.as_scalar().map(|v| (name.clone(), v)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn batch_entries_override_static_and_args_override_both() {
        let mut params = Parameters::default();
        params.static_params.insert("a".into(), dec!(1).into());
        params.static_params.insert("b".into(), dec!(1).into());
        params.batch_params = vec![
            ParamMap::from([("b".to_string(), ParamValue::from(dec!(2)))]),
            ParamMap::from([("b".to_string(), ParamValue::from(dec!(3)))]),
        ];
        params.args_list = vec!["a".to_string()];

        let all = params.batch_assignments(&[dec!(9)]).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0]["a"], ParamValue::Scalar(dec!(9)));
        assert_eq!(all[0]["b"], ParamValue::Scalar(dec!(2)));
        assert_eq!(all[1]["b"], ParamValue::Scalar(dec!(3)));
    }

    #[test]
    fn wrong_argument_count_is_rejected() {
        let params = Parameters {
            args_list: vec!["x".to_string(), "y".to_string()],
            ..Parameters::default()
        };
        assert_eq!(
            params.parse_args(&[dec!(1)]).unwrap_err(),
            EvalError::ArgumentCount { expected: 2, got: 1 }
        );
    }

    #[test]
    fn vectors_are_not_scalar_assignments() {
        let mut map = ParamMap::new();
        map.insert("x".into(), dec!(2).into());
        map.insert("mask".into(), vec![dec!(0), dec!(1)].into());
        let a = scalar_assignments(&map);
        assert_eq!(a.len(), 1);
        assert_eq!(a["x"], dec!(2));
    }
}
