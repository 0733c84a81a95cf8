//! file: core/src/ir/waveform.rs
//! description: the waveform algebra and its evaluation semantics.
//!
//! A `Waveform` is a symbolic, time-parameterized scalar function built as an
//! expression tree. Leaves are the instruction shapes (`Constant`, `Linear`,
//! `Poly`, `OpaqueFn`); every other variant combines or wraps waveforms.
//! Values are immutable: combinators consume their inputs and return a new
//! tree.
//!
//! Past its `duration` every waveform reads as zero.

use std::fmt;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::err::EvalError;
use super::scalar::{Assignments, Scalar, decimal_from_f64, decimal_to_f64};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Waveform {
    Constant(Constant),
    Linear(Linear),
    Poly(Poly),
    OpaqueFn(OpaqueFn),
    Append(Append),
    Add(Add),
    Aligned(Aligned),
    Negative(Negative),
    Record(Record),
    Sample(Sample),
    Scale(Scale),
    Slice(Slice),
    Smooth(Smooth),
}

/// f(t) = value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constant {
    pub value: Scalar,
    pub duration: Scalar,
}

/// f(t) = start + (stop - start) / duration * t
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Linear {
    pub start: Scalar,
    pub stop: Scalar,
    pub duration: Scalar,
}

/// f(t) = c[0] + c[1] t + c[2] t^2 + ...
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Poly {
    pub coeffs: Vec<Scalar>,
    pub duration: Scalar,
}

/// Callable of time (in the same unit as the duration) returning the drive value.
#[derive(Clone)]
pub struct TimeFn(Arc<dyn Fn(f64) -> f64 + Send + Sync>);

impl TimeFn {
    pub fn new(f: impl Fn(f64) -> f64 + Send + Sync + 'static) -> Self {
        TimeFn(Arc::new(f))
    }

    pub fn call(&self, clock: f64) -> f64 {
        (self.0)(clock)
    }
}

impl fmt::Debug for TimeFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TimeFn(..)")
    }
}

/// An externally supplied function of time. Structural analyses cannot look
/// inside it; two opaque functions are equal when name and duration match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpaqueFn {
    pub name: String,
    pub duration: Scalar,
    #[serde(skip)]
    pub function: Option<TimeFn>,
}

impl PartialEq for OpaqueFn {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.duration == other.duration
    }
}

/// Sequential concatenation in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Append {
    pub waveforms: Vec<Waveform>,
}

/// Pointwise sum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Add {
    pub left: Box<Waveform>,
    pub right: Box<Waveform>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Alignment {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AlignedValue {
    Left,
    Right,
    Value(Scalar),
}

/// Padding hint used when fields of different length are combined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aligned {
    pub waveform: Box<Waveform>,
    pub alignment: Alignment,
    pub value: AlignedValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Negative {
    pub waveform: Box<Waveform>,
}

/// Tags the end value of `waveform` under the variable `var`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub waveform: Box<Waveform>,
    pub var: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Interpolation {
    Linear,
    Constant,
}

/// Discretization of `waveform` every `dt`, interpolated between samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub waveform: Box<Waveform>,
    pub interpolation: Interpolation,
    pub dt: Scalar,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scale {
    pub factor: Scalar,
    pub waveform: Box<Waveform>,
}

/// Time window `[start, stop)`; a missing bound defaults to the waveform edge.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Interval {
    pub start: Option<Scalar>,
    pub stop: Option<Scalar>,
}

impl Interval {
    pub fn new(start: Option<Scalar>, stop: Option<Scalar>) -> Self {
        Interval { start, stop }
    }

    /// Resolve the interval against a waveform of length `duration`.
    pub fn bounds(
        &self,
        duration: Decimal,
        assignments: &Assignments,
    ) -> Result<(Decimal, Decimal), EvalError> {
        let start = match &self.start {
            Some(s) => s.eval(assignments)?,
            None => Decimal::ZERO,
        };
        let stop = match &self.stop {
            Some(s) => s.eval(assignments)?,
            None => duration,
        };
        if start < Decimal::ZERO || stop < start || stop > duration {
            return Err(EvalError::InvalidSlice);
        }
        Ok((start, stop))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slice {
    pub waveform: Box<Waveform>,
    pub interval: Interval,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SmoothingKernel {
    Gaussian,
    Logistic,
    Sigmoid,
    Triangle,
    Uniform,
    Parabolic,
    Biweight,
    Triweight,
    Tricube,
    Cosine,
}

impl SmoothingKernel {
    /// Kernels with support restricted to `(-1, 1)`.
    pub fn is_finite(self) -> bool {
        !matches!(
            self,
            SmoothingKernel::Gaussian | SmoothingKernel::Logistic | SmoothingKernel::Sigmoid
        )
    }

    pub fn weight(self, x: f64) -> f64 {
        use std::f64::consts::PI;
        match self {
            SmoothingKernel::Gaussian => (-(x * x) / 2.0).exp() / (2.0 * PI).sqrt(),
            SmoothingKernel::Logistic => 1.0 / (x.exp() + 2.0 + (-x).exp()),
            SmoothingKernel::Sigmoid => (2.0 / PI) / (x.exp() + (-x).exp()),
            SmoothingKernel::Triangle => (1.0 - x.abs()).max(0.0),
            SmoothingKernel::Uniform => {
                if x.abs() <= 1.0 {
                    0.5
                } else {
                    0.0
                }
            }
            SmoothingKernel::Parabolic => 0.75 * (1.0 - x * x).max(0.0),
            SmoothingKernel::Biweight => (15.0 / 16.0) * (1.0 - x * x).max(0.0).powi(2),
            SmoothingKernel::Triweight => (35.0 / 32.0) * (1.0 - x * x).max(0.0).powi(3),
            SmoothingKernel::Tricube => (70.0 / 81.0) * (1.0 - x.abs().powi(3)).max(0.0).powi(3),
            SmoothingKernel::Cosine => (PI / 4.0 * (PI / 2.0 * x).cos()).max(0.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Smooth {
    pub waveform: Box<Waveform>,
    pub radius: Scalar,
    pub kernel: SmoothingKernel,
}

fn checked(value: Option<Decimal>) -> Result<Decimal, EvalError> {
    value.ok_or(EvalError::Overflow)
}

// Constructors and combinators.
impl Waveform {
    pub fn constant(value: impl Into<Scalar>, duration: impl Into<Scalar>) -> Self {
        Waveform::Constant(Constant {
            value: value.into(),
            duration: duration.into(),
        })
    }

    pub fn linear(
        start: impl Into<Scalar>,
        stop: impl Into<Scalar>,
        duration: impl Into<Scalar>,
    ) -> Self {
        Waveform::Linear(Linear {
            start: start.into(),
            stop: stop.into(),
            duration: duration.into(),
        })
    }

    pub fn poly<S: Into<Scalar>>(coeffs: impl IntoIterator<Item = S>, duration: impl Into<Scalar>) -> Self {
        Waveform::Poly(Poly {
            coeffs: coeffs.into_iter().map(Into::into).collect(),
            duration: duration.into(),
        })
    }

    pub fn opaque(
        name: impl Into<String>,
        duration: impl Into<Scalar>,
        function: impl Fn(f64) -> f64 + Send + Sync + 'static,
    ) -> Self {
        Waveform::OpaqueFn(OpaqueFn {
            name: name.into(),
            duration: duration.into(),
            function: Some(TimeFn::new(function)),
        })
    }

    /// Ramps between consecutive `values`, segment `i` lasting `durations[i]`.
    /// Returns `None` unless there is exactly one more value than durations.
    pub fn piecewise_linear(durations: Vec<Scalar>, values: Vec<Scalar>) -> Option<Self> {
        if durations.is_empty() || values.len() != durations.len() + 1 {
            return None;
        }
        let segments = durations
            .into_iter()
            .zip(values.windows(2))
            .map(|(d, pair)| Waveform::linear(pair[0].clone(), pair[1].clone(), d))
            .collect();
        Some(Waveform::Append(Append { waveforms: segments }))
    }

    /// Holds `values[i]` for `durations[i]`. Lengths must match.
    pub fn piecewise_constant(durations: Vec<Scalar>, values: Vec<Scalar>) -> Option<Self> {
        if durations.is_empty() || values.len() != durations.len() {
            return None;
        }
        let segments = durations
            .into_iter()
            .zip(values)
            .map(|(d, v)| Waveform::constant(v, d))
            .collect();
        Some(Waveform::Append(Append { waveforms: segments }))
    }

    /// Place `other` after `self` in time, flattening nested appends.
    pub fn append(self, other: Waveform) -> Waveform {
        let mut waveforms = Vec::new();
        for wf in [self, other] {
            match wf {
                Waveform::Append(inner) => waveforms.extend(inner.waveforms),
                wf => waveforms.push(wf),
            }
        }
        Waveform::Append(Append { waveforms })
    }

    pub fn add(self, other: Waveform) -> Waveform {
        Waveform::Add(Add {
            left: Box::new(self),
            right: Box::new(other),
        })
    }

    pub fn scale(self, factor: impl Into<Scalar>) -> Waveform {
        Waveform::Scale(Scale {
            factor: factor.into(),
            waveform: Box::new(self),
        })
    }

    pub fn negative(self) -> Waveform {
        Waveform::Negative(Negative {
            waveform: Box::new(self),
        })
    }

    pub fn slice(self, start: Option<Scalar>, stop: Option<Scalar>) -> Waveform {
        Waveform::Slice(Slice {
            waveform: Box::new(self),
            interval: Interval::new(start, stop),
        })
    }

    pub fn record(self, var: impl Into<String>) -> Waveform {
        Waveform::Record(Record {
            waveform: Box::new(self),
            var: var.into(),
        })
    }

    pub fn sample(self, dt: impl Into<Scalar>, interpolation: Interpolation) -> Waveform {
        Waveform::Sample(Sample {
            waveform: Box::new(self),
            interpolation,
            dt: dt.into(),
        })
    }

    pub fn smooth(self, radius: impl Into<Scalar>, kernel: SmoothingKernel) -> Waveform {
        Waveform::Smooth(Smooth {
            waveform: Box::new(self),
            radius: radius.into(),
            kernel,
        })
    }

    /// Attach an alignment hint. Without an explicit value the waveform is
    /// padded with its own edge value on the aligned side.
    pub fn align(self, alignment: Alignment, value: Option<Scalar>) -> Waveform {
        let value = match (value, alignment) {
            (Some(v), _) => AlignedValue::Value(v),
            (None, Alignment::Left) => AlignedValue::Left,
            (None, Alignment::Right) => AlignedValue::Right,
        };
        Waveform::Aligned(Aligned {
            waveform: Box::new(self),
            alignment,
            value,
        })
    }

    /// Variant name, used in logs and reports.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Waveform::Constant(_) => "Constant",
            Waveform::Linear(_) => "Linear",
            Waveform::Poly(_) => "Poly",
            Waveform::OpaqueFn(_) => "OpaqueFn",
            Waveform::Append(_) => "Append",
            Waveform::Add(_) => "Add",
            Waveform::Aligned(_) => "Aligned",
            Waveform::Negative(_) => "Negative",
            Waveform::Record(_) => "Record",
            Waveform::Sample(_) => "Sample",
            Waveform::Scale(_) => "Scale",
            Waveform::Slice(_) => "Slice",
            Waveform::Smooth(_) => "Smooth",
        }
    }
}

// Evaluation.
impl Waveform {
    pub fn duration(&self, assignments: &Assignments) -> Result<Decimal, EvalError> {
        match self {
            Waveform::Constant(c) => c.duration.eval(assignments),
            Waveform::Linear(l) => l.duration.eval(assignments),
            Waveform::Poly(p) => p.duration.eval(assignments),
            Waveform::OpaqueFn(f) => f.duration.eval(assignments),
            Waveform::Append(a) => {
                let mut total = Decimal::ZERO;
                for wf in &a.waveforms {
                    total = checked(total.checked_add(wf.duration(assignments)?))?;
                }
                Ok(total)
            }
            Waveform::Add(a) => {
                let left = a.left.duration(assignments)?;
                let right = a.right.duration(assignments)?;
                Ok(left.max(right))
            }
            Waveform::Slice(s) => {
                let inner = s.waveform.duration(assignments)?;
                let (start, stop) = s.interval.bounds(inner, assignments)?;
                checked(stop.checked_sub(start))
            }
            Waveform::Aligned(Aligned { waveform, .. })
            | Waveform::Negative(Negative { waveform })
            | Waveform::Record(Record { waveform, .. })
            | Waveform::Sample(Sample { waveform, .. })
            | Waveform::Scale(Scale { waveform, .. })
            | Waveform::Smooth(Smooth { waveform, .. }) => waveform.duration(assignments),
        }
    }

    /// Value at `clock`; zero past the end of the waveform.
    pub fn value_at(&self, clock: Decimal, assignments: &Assignments) -> Result<Decimal, EvalError> {
        match self {
            Waveform::Constant(c) => {
                if clock > c.duration.eval(assignments)? {
                    return Ok(Decimal::ZERO);
                }
                c.value.eval(assignments)
            }
            Waveform::Linear(l) => {
                let duration = l.duration.eval(assignments)?;
                if clock > duration {
                    return Ok(Decimal::ZERO);
                }
                let start = l.start.eval(assignments)?;
                if clock.is_zero() {
                    return Ok(start);
                }
                let stop = l.stop.eval(assignments)?;
                let slope = checked(checked(stop.checked_sub(start))?.checked_div(duration))?;
                checked(checked(slope.checked_mul(clock))?.checked_add(start))
            }
            Waveform::Poly(p) => {
                if clock > p.duration.eval(assignments)? {
                    return Ok(Decimal::ZERO);
                }
                let mut value = Decimal::ZERO;
                let mut power = Decimal::ONE;
                for coeff in &p.coeffs {
                    let term = checked(coeff.eval(assignments)?.checked_mul(power))?;
                    value = checked(value.checked_add(term))?;
                    power = checked(power.checked_mul(clock))?;
                }
                Ok(value)
            }
            Waveform::OpaqueFn(f) => {
                if clock > f.duration.eval(assignments)? {
                    return Ok(Decimal::ZERO);
                }
                let function = f
                    .function
                    .as_ref()
                    .ok_or_else(|| EvalError::OpaqueFunctionUnavailable(f.name.clone()))?;
                decimal_from_f64(function.call(decimal_to_f64(clock)?))
            }
            Waveform::Append(a) => {
                let mut offset = Decimal::ZERO;
                for wf in &a.waveforms {
                    let duration = wf.duration(assignments)?;
                    let end = checked(offset.checked_add(duration))?;
                    if clock <= end {
                        return wf.value_at(checked(clock.checked_sub(offset))?, assignments);
                    }
                    offset = end;
                }
                Ok(Decimal::ZERO)
            }
            Waveform::Add(a) => {
                let left = padded_value(&a.left, clock, assignments)?;
                let right = padded_value(&a.right, clock, assignments)?;
                checked(left.checked_add(right))
            }
            Waveform::Aligned(a) => a.waveform.value_at(clock, assignments),
            Waveform::Negative(n) => Ok(-n.waveform.value_at(clock, assignments)?),
            Waveform::Record(r) => r.waveform.value_at(clock, assignments),
            Waveform::Sample(s) => s.value_at(clock, assignments),
            Waveform::Scale(s) => {
                let factor = s.factor.eval(assignments)?;
                checked(factor.checked_mul(s.waveform.value_at(clock, assignments)?))
            }
            Waveform::Slice(s) => {
                let inner = s.waveform.duration(assignments)?;
                let (start, stop) = s.interval.bounds(inner, assignments)?;
                if clock > checked(stop.checked_sub(start))? {
                    return Ok(Decimal::ZERO);
                }
                s.waveform.value_at(checked(clock.checked_add(start))?, assignments)
            }
            Waveform::Smooth(s) => s.value_at(clock, assignments),
        }
    }
}

fn padded_value(wf: &Waveform, clock: Decimal, assignments: &Assignments) -> Result<Decimal, EvalError> {
    if clock > wf.duration(assignments)? {
        Ok(Decimal::ZERO)
    } else {
        wf.value_at(clock, assignments)
    }
}

impl Sample {
    /// Sample times and values: every `dt` from 0, plus the end point.
    pub fn samples(&self, assignments: &Assignments) -> Result<(Vec<Decimal>, Vec<Decimal>), EvalError> {
        let duration = self.waveform.duration(assignments)?;
        let dt = self.dt.eval(assignments)?;
        if dt <= Decimal::ZERO {
            return Err(EvalError::InvalidSampleStep);
        }

        let mut clocks = Vec::new();
        let mut values = Vec::new();
        let last = checked(duration.checked_sub(dt))?;
        let mut clock = Decimal::ZERO;
        while clock <= last {
            values.push(self.waveform.value_at(clock, assignments)?);
            clocks.push(clock);
            clock = checked(clock.checked_add(dt))?;
        }
        values.push(self.waveform.value_at(duration, assignments)?);
        clocks.push(duration);

        Ok((clocks, values))
    }

    fn value_at(&self, clock: Decimal, assignments: &Assignments) -> Result<Decimal, EvalError> {
        let (times, values) = self.samples(assignments)?;
        let i = times.partition_point(|t| *t < clock);
        if i == times.len() {
            return Ok(Decimal::ZERO);
        }
        if i == 0 {
            return Ok(values[0]);
        }
        match self.interpolation {
            Interpolation::Constant => Ok(values[i - 1]),
            Interpolation::Linear => {
                let rise = checked(values[i].checked_sub(values[i - 1]))?;
                let run = checked(times[i].checked_sub(times[i - 1]))?;
                let slope = checked(rise.checked_div(run))?;
                let elapsed = checked(clock.checked_sub(times[i - 1]))?;
                checked(checked(slope.checked_mul(elapsed))?.checked_add(values[i - 1]))
            }
        }
    }
}

impl Smooth {
    // Composite Simpson rule over the kernel support; infinite kernels are
    // truncated where their tails fall below float noise.
    fn value_at(&self, clock: Decimal, assignments: &Assignments) -> Result<Decimal, EvalError> {
        let duration = self.waveform.duration(assignments)?;
        if clock > duration {
            return Ok(Decimal::ZERO);
        }
        let radius = decimal_to_f64(self.radius.eval(assignments)?)?;
        let t = decimal_to_f64(clock)?;
        let end = decimal_to_f64(duration)?;
        let first = decimal_to_f64(self.waveform.value_at(Decimal::ZERO, assignments)?)?;
        let last = decimal_to_f64(self.waveform.value_at(duration, assignments)?)?;

        let sample = |clock: f64| -> Result<f64, EvalError> {
            if clock < 0.0 {
                Ok(first)
            } else if clock > end {
                Ok(last)
            } else {
                decimal_to_f64(self.waveform.value_at(decimal_from_f64(clock)?, assignments)?)
            }
        };

        let (lo, hi, steps) = if self.kernel.is_finite() {
            (-1.0, 1.0, 200)
        } else {
            (-16.0, 16.0, 1600)
        };
        let h = (hi - lo) / steps as f64;
        let mut total = 0.0;
        for k in 0..=steps {
            let s = lo + h * k as f64;
            let weight = if k == 0 || k == steps {
                1.0
            } else if k % 2 == 1 {
                4.0
            } else {
                2.0
            };
            total += weight * self.kernel.weight(s) * sample(radius * s + t)?;
        }
        decimal_from_f64(total * h / 3.0)
    }
}

impl fmt::Display for Interpolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Interpolation::Linear => write!(f, "linear"),
            Interpolation::Constant => write!(f, "constant"),
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[impl fmt::Display]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl fmt::Display for Waveform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Waveform::Constant(c) => write!(f, "constant({}, {})", c.value, c.duration),
            Waveform::Linear(l) => write!(f, "linear({}, {}, {})", l.start, l.stop, l.duration),
            Waveform::Poly(p) => {
                write!(f, "poly([")?;
                write_list(f, &p.coeffs)?;
                write!(f, "], {})", p.duration)
            }
            Waveform::OpaqueFn(o) => write!(f, "fn {}({})", o.name, o.duration),
            Waveform::Append(a) => {
                write!(f, "append(")?;
                write_list(f, &a.waveforms)?;
                write!(f, ")")
            }
            Waveform::Add(a) => write!(f, "({} + {})", a.left, a.right),
            Waveform::Aligned(a) => {
                let side = match a.alignment {
                    Alignment::Left => "left",
                    Alignment::Right => "right",
                };
                match &a.value {
                    AlignedValue::Value(v) => write!(f, "align({}, {side}, {v})", a.waveform),
                    _ => write!(f, "align({}, {side})", a.waveform),
                }
            }
            Waveform::Negative(n) => write!(f, "-({})", n.waveform),
            Waveform::Record(r) => write!(f, "record({}, {:?})", r.waveform, r.var),
            Waveform::Sample(s) => write!(f, "sample({}, {}, {})", s.waveform, s.interpolation, s.dt),
            Waveform::Scale(s) => write!(f, "({} * {})", s.factor, s.waveform),
            Waveform::Slice(s) => {
                let start = s.interval.start.as_ref().map(|v| v.to_string()).unwrap_or_default();
                let stop = s.interval.stop.as_ref().map(|v| v.to_string()).unwrap_or_default();
                write!(f, "{}[{start}:{stop}]", s.waveform)
            }
            Waveform::Smooth(s) => write!(f, "smooth({}, {:?}, {})", s.waveform, s.kernel, s.radius),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn none() -> Assignments {
        Assignments::new()
    }

    #[test]
    fn append_flattens_nested_appends() {
        let a = Waveform::linear(0, 1, 1);
        let b = Waveform::linear(1, 0, 1);
        let c = Waveform::constant(0, 1);
        let wf = a.clone().append(b.clone()).append(c.clone());
        assert_eq!(wf, Waveform::Append(Append { waveforms: vec![a, b, c] }));
        assert_eq!(wf.duration(&none()).unwrap(), dec!(3));
    }

    #[test]
    fn append_dispatches_by_cumulative_time() {
        let wf = Waveform::linear(0, 1, 1).append(Waveform::constant(5, 2));
        assert_eq!(wf.value_at(dec!(0.5), &none()).unwrap(), dec!(0.5));
        assert_eq!(wf.value_at(dec!(2), &none()).unwrap(), dec!(5));
        assert_eq!(wf.value_at(dec!(4), &none()).unwrap(), dec!(0));
    }

    #[test]
    fn poly_evaluates_in_ascending_powers() {
        let wf = Waveform::poly([1, 2, 3], 10);
        // 1 + 2*2 + 3*4
        assert_eq!(wf.value_at(dec!(2), &none()).unwrap(), dec!(17));
    }

    #[test]
    fn add_reads_shorter_operand_as_zero() {
        let wf = Waveform::constant(1, 1).add(Waveform::constant(2, 3));
        assert_eq!(wf.duration(&none()).unwrap(), dec!(3));
        assert_eq!(wf.value_at(dec!(0.5), &none()).unwrap(), dec!(3));
        assert_eq!(wf.value_at(dec!(2), &none()).unwrap(), dec!(2));
    }

    #[test]
    fn slice_shifts_and_crops() {
        let wf = Waveform::linear(0, 10, 10).slice(Some(Scalar::from(2.5)), Some(Scalar::from(7.5)));
        assert_eq!(wf.duration(&none()).unwrap(), dec!(5));
        assert_eq!(wf.value_at(dec!(0), &none()).unwrap(), dec!(2.5));
        assert_eq!(wf.value_at(dec!(5), &none()).unwrap(), dec!(7.5));
    }

    #[test]
    fn slice_past_the_end_is_rejected() {
        let wf = Waveform::constant(1, 2).slice(None, Some(Scalar::from(3)));
        assert_eq!(wf.duration(&none()).unwrap_err(), EvalError::InvalidSlice);
    }

    #[test]
    fn sample_holds_or_interpolates() {
        let ramp = Waveform::opaque("ramp", 1, |t| t);
        let held = ramp.clone().sample(0.5, Interpolation::Constant);
        let lerp = ramp.sample(0.5, Interpolation::Linear);
        assert_eq!(held.value_at(dec!(0.75), &none()).unwrap(), dec!(0.5));
        assert_eq!(lerp.value_at(dec!(0.75), &none()).unwrap(), dec!(0.75));
    }

    #[test]
    fn opaque_without_callable_fails_to_evaluate() {
        let wf = Waveform::OpaqueFn(OpaqueFn {
            name: "pulse".to_string(),
            duration: Scalar::from(1),
            function: None,
        });
        assert_eq!(
            wf.value_at(dec!(0.5), &none()).unwrap_err(),
            EvalError::OpaqueFunctionUnavailable("pulse".to_string())
        );
    }

    #[test]
    fn leaves_read_zero_only_past_the_end() {
        let wf = Waveform::constant(1, 2);
        assert_eq!(wf.value_at(dec!(3), &none()).unwrap(), dec!(0));
        assert_eq!(wf.value_at(dec!(2), &none()).unwrap(), dec!(1));
        assert_eq!(wf.value_at(dec!(-1), &none()).unwrap(), dec!(1));
    }

    #[test]
    fn linear_slope_overflow_is_an_error() {
        let wf = Waveform::linear(dec!(-5e28), dec!(5e28), 1);
        assert_eq!(wf.value_at(dec!(0.5), &none()).unwrap_err(), EvalError::Overflow);
    }

    #[test]
    fn smoothing_a_constant_keeps_its_level() {
        let wf = Waveform::constant(2, 4).smooth(0.5, SmoothingKernel::Parabolic);
        let v = wf.value_at(dec!(2), &none()).unwrap();
        assert!((v - dec!(2)).abs() < dec!(0.001), "got {v}");
    }

    #[test]
    fn piecewise_linear_requires_one_more_value() {
        let d = vec![Scalar::from(1), Scalar::from(2)];
        assert!(Waveform::piecewise_linear(d.clone(), vec![Scalar::from(0); 2]).is_none());
        let wf = Waveform::piecewise_linear(d, vec![Scalar::from(0), Scalar::from(1), Scalar::from(1)]).unwrap();
        assert_eq!(wf.duration(&none()).unwrap(), dec!(3));
    }
}
