//! A rational data type, used for frame rates (`30000/1001`) and aspect ratios (`16/9`). Values
//! are stored exactly as given: nothing is reduced until [`Fraction::reduce`] is called.

use std::{
    collections::{BTreeMap, HashMap},
    fmt::Display,
    hash::BuildHasher,
    ops::{Div, DivAssign, Mul, MulAssign},
    str::FromStr,
};

use approx::{AbsDiffEq, RelativeEq};
use log::{debug, trace};
use num_traits::{Inv, One};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::parsing;

/// The integer type of both components.
pub type BaseInt = i32;

/// A numerator over a denominator. Equality is structural: `8/6` and `4/3` are different values
/// until reduced. Use the [`approx`] traits to compare the ratios themselves.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct Fraction {
    /// The numerator.
    pub num: BaseInt,
    /// The denominator.
    pub den: BaseInt,
}

#[derive(Debug, Error)]
pub enum FractionError {
    #[error("A fraction needs exactly 2 components, got {0}")]
    InvalidLength(usize),
    #[error("Missing key \"{0}\"")]
    MissingKey(&'static str),
    #[error("Denominator is zero")]
    DivisionByZero,
    #[error("Could not parse {0}")]
    Parse(String),
    #[error("Invalid fraction JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}/{1} does not fit in i32, even in lowest terms")]
    Overflow(i64, i64),
}

impl Fraction {
    /// Creates a new `Fraction`. The values are stored verbatim, a zero denominator included.
    pub const fn new(num: BaseInt, den: BaseInt) -> Self {
        Self { num, den }
    }

    /// Creates a new `Fraction`, rejecting a zero denominator.
    pub fn try_new(num: BaseInt, den: BaseInt) -> Result<Self, FractionError> {
        if den == 0 {
            Err(FractionError::DivisionByZero)
        } else {
            Ok(Self::new(num, den))
        }
    }

    /// Reads the `"num"` and `"den"` entries of a map.
    fn from_lookup(get: impl Fn(&str) -> Option<BaseInt>) -> Result<Self, FractionError> {
        let num = get("num").ok_or(FractionError::MissingKey("num"))?;
        let den = get("den").ok_or(FractionError::MissingKey("den"))?;
        Ok(Self::new(num, den))
    }

    /// Reads a fraction from a JSON object of the form `{"num": 24000, "den": 1001}`.
    pub fn from_json(s: &str) -> Result<Self, FractionError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Writes the fraction as a JSON object of the form `{"num":24000,"den":1001}`.
    pub fn to_json(&self) -> Result<String, FractionError> {
        Ok(serde_json::to_string(self)?)
    }

    /// The greatest common divisor of the numerator and denominator. Always non-negative, and zero
    /// only for `0/0`.
    pub const fn gcd(&self) -> u32 {
        Self::gcd_of(self.num, self.den)
    }

    /// The greatest common divisor of two integers, ignoring their signs.
    pub const fn gcd_of(p: BaseInt, q: BaseInt) -> u32 {
        Self::gcd_wide(p.unsigned_abs() as u64, q.unsigned_abs() as u64) as u32
    }

    const fn gcd_wide(p: u64, q: u64) -> u64 {
        let mut p = p;
        let mut q = q;
        while q != 0 {
            let r = p % q;
            p = q;
            q = r;
        }

        p
    }

    /// Reduces the fraction to lowest terms in place. Afterwards the denominator is non-negative
    /// and carries no sign, unless moving the sign would overflow: `1/i32::MIN` stays as it is.
    /// `n/0` becomes `±1/0`, and `0/0` is left alone.
    pub fn reduce(&mut self) {
        let divisor = self.gcd();
        if divisor == 0 {
            debug!("Cannot reduce {}: both components are zero", self);
            return;
        }
        if self.den == 0 {
            debug!("Reducing {} with a zero denominator", self);
        }

        let divisor = i64::from(divisor);
        let mut num = i64::from(self.num) / divisor;
        let mut den = i64::from(self.den) / divisor;

        let min = i64::from(BaseInt::MIN);
        if den < 0 && num != min && den != min {
            num = -num;
            den = -den;
        }

        trace!("Reduced {} by {} to {}/{}", self, divisor, num, den);
        // Both values were divided by a positive divisor and only negated when in range.
        self.num = num as BaseInt;
        self.den = den as BaseInt;
    }

    /// The reduced form of this fraction, leaving `self` untouched.
    pub fn reduced(mut self) -> Self {
        self.reduce();
        self
    }

    /// Flips the fraction. The receiver is unchanged.
    pub const fn reciprocal(&self) -> Self {
        Self::new(self.den, self.num)
    }

    /// `num / den` in single precision.
    pub fn to_f32(&self) -> f32 {
        self.num as f32 / self.den as f32
    }

    /// `num / den` in double precision.
    pub fn to_f64(&self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Like [`Fraction::to_f64`], but errors instead of producing an infinity or NaN.
    pub fn checked_to_f64(&self) -> Result<f64, FractionError> {
        if self.den == 0 {
            Err(FractionError::DivisionByZero)
        } else {
            Ok(self.to_f64())
        }
    }

    /// The nearest integer, rounding half away from zero.
    pub fn to_int(&self) -> BaseInt {
        self.to_f64().round() as BaseInt
    }

    /// Narrows a wide numerator and denominator. They are kept as given when both fit, and
    /// reduced to lowest terms first when they don't.
    fn from_wide(num: i64, den: i64) -> Result<Self, FractionError> {
        if let (Ok(n), Ok(d)) = (BaseInt::try_from(num), BaseInt::try_from(den)) {
            return Ok(Self::new(n, d));
        }

        // At least one side didn't fit, so it is non-zero and so is the divisor.
        let divisor = Self::gcd_wide(num.unsigned_abs(), den.unsigned_abs()) as i64;
        trace!("Narrowing {}/{} by {}", num, den, divisor);
        match (
            BaseInt::try_from(num / divisor),
            BaseInt::try_from(den / divisor),
        ) {
            (Ok(n), Ok(d)) => Ok(Self::new(n, d)),
            _ => Err(FractionError::Overflow(num, den)),
        }
    }

    /// Multiplies two fractions without reducing, unless the exact product only fits in lowest
    /// terms. Errors if it doesn't fit at all.
    pub fn checked_mul(&self, rhs: Self) -> Result<Self, FractionError> {
        Self::from_wide(
            i64::from(self.num) * i64::from(rhs.num),
            i64::from(self.den) * i64::from(rhs.den),
        )
    }

    /// Divides by `rhs`, i.e. multiplies by its reciprocal. See [`Fraction::checked_mul`].
    pub fn checked_div(&self, rhs: Self) -> Result<Self, FractionError> {
        self.checked_mul(rhs.reciprocal())
    }
}

impl Default for Fraction {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

impl From<(BaseInt, BaseInt)> for Fraction {
    fn from((num, den): (BaseInt, BaseInt)) -> Self {
        Self::new(num, den)
    }
}

impl From<[BaseInt; 2]> for Fraction {
    fn from([num, den]: [BaseInt; 2]) -> Self {
        Self::new(num, den)
    }
}

impl TryFrom<&[BaseInt]> for Fraction {
    type Error = FractionError;

    fn try_from(value: &[BaseInt]) -> Result<Self, Self::Error> {
        match *value {
            [num, den] => Ok(Self::new(num, den)),
            _ => Err(FractionError::InvalidLength(value.len())),
        }
    }
}

impl TryFrom<Vec<BaseInt>> for Fraction {
    type Error = FractionError;

    fn try_from(value: Vec<BaseInt>) -> Result<Self, Self::Error> {
        Self::try_from(value.as_slice())
    }
}

impl<S: BuildHasher> TryFrom<&HashMap<String, BaseInt, S>> for Fraction {
    type Error = FractionError;

    fn try_from(value: &HashMap<String, BaseInt, S>) -> Result<Self, Self::Error> {
        Self::from_lookup(|key| value.get(key).copied())
    }
}

impl TryFrom<&BTreeMap<String, BaseInt>> for Fraction {
    type Error = FractionError;

    fn try_from(value: &BTreeMap<String, BaseInt>) -> Result<Self, Self::Error> {
        Self::from_lookup(|key| value.get(key).copied())
    }
}

impl From<Fraction> for f64 {
    fn from(value: Fraction) -> Self {
        value.to_f64()
    }
}

impl From<Fraction> for f32 {
    fn from(value: Fraction) -> Self {
        value.to_f32()
    }
}

impl FromStr for Fraction {
    type Err = FractionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (o, frac) =
            parsing::fraction(s).map_err(|_e| FractionError::Parse(s.to_string()))?;
        if o.is_empty() {
            Ok(frac)
        } else {
            Err(FractionError::Parse(s.to_string()))
        }
    }
}

impl Mul for Fraction {
    type Output = Self;

    /// Note: this panics when the product cannot be represented even in lowest terms. Use
    /// [`Fraction::checked_mul`] to get an error instead.
    fn mul(self, rhs: Self) -> Self::Output {
        match self.checked_mul(rhs) {
            Ok(product) => product,
            Err(e) => panic!("Cannot multiply {} by {}: {}", self, rhs, e),
        }
    }
}

impl MulAssign for Fraction {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl Mul<BaseInt> for Fraction {
    type Output = Self;

    fn mul(self, rhs: BaseInt) -> Self::Output {
        self * Self::new(rhs, 1)
    }
}

impl Div for Fraction {
    type Output = Self;

    /// Note: this panics like [`Mul`] does. Use [`Fraction::checked_div`] to get an error instead.
    fn div(self, rhs: Self) -> Self::Output {
        match self.checked_div(rhs) {
            Ok(quotient) => quotient,
            Err(e) => panic!("Cannot divide {} by {}: {}", self, rhs, e),
        }
    }
}

impl DivAssign for Fraction {
    fn div_assign(&mut self, rhs: Self) {
        *self = *self / rhs;
    }
}

impl One for Fraction {
    fn one() -> Self {
        Self::new(1, 1)
    }

    fn is_one(&self) -> bool {
        self.num == self.den && self.den != 0
    }
}

impl Inv for Fraction {
    type Output = Self;

    fn inv(self) -> Self::Output {
        self.reciprocal()
    }
}

impl AbsDiffEq for Fraction {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        f64::EPSILON
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.to_f64().abs_diff_eq(&other.to_f64(), epsilon)
    }
}

impl RelativeEq for Fraction {
    fn default_max_relative() -> Self::Epsilon {
        f64::EPSILON
    }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        self.to_f64()
            .relative_eq(&other.to_f64(), epsilon, max_relative)
    }
}

impl Display for Fraction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Fraction({}, {})", self.num, self.den)
    }
}

/// Shorthand for [`Fraction::new`]: `fraction!(16 / 9)`, `fraction!(n / 2)` or `fraction!(24)`.
/// A numerator that is neither a literal nor a plain variable must use `fraction!(num, den)`.
#[macro_export]
macro_rules! fraction {
    ($num:literal / $den:expr) => {
        $crate::fraction::Fraction::new($num, $den)
    };
    ($num:ident / $den:expr) => {
        $crate::fraction::Fraction::new($num, $den)
    };
    ($num:expr, $den:expr) => {
        $crate::fraction::Fraction::new($num, $den)
    };
    ($num:literal) => {
        $crate::fraction::Fraction::new($num, 1)
    };
    ($num:ident) => {
        $crate::fraction::Fraction::new($num, 1)
    };
}
