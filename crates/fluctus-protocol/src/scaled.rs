//! Fixed-point telemetry values
//!
//! Several fields are transmitted as integers in a finer unit than the one
//! they are displayed in (millivolts for a voltage, tenths of a second for a
//! time). [`Scaled`] keeps the wire integer so that decoding and re-encoding a
//! record is bit-exact, and divides by `DIV` only when the physical value is
//! asked for.
//!
//! Converting a physical value back to the wire truncates toward zero.

use std::fmt;

use crate::error::ScaleError;

/// A wire integer of type `T` representing `raw / DIV` physical units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Scaled<T, const DIV: u32>(T);

/// Tenths of a unit
pub type Deci<T> = Scaled<T, 10>;
/// Thousandths of a unit
pub type Milli<T> = Scaled<T, 1_000>;
/// Millionths of a unit
pub type Micro<T> = Scaled<T, 1_000_000>;

impl<T: Copy, const DIV: u32> Scaled<T, DIV> {
    /// The divisor applied to the wire integer
    pub const DIVISOR: u32 = DIV;

    /// Wrap a wire integer
    pub fn from_raw(raw: T) -> Self {
        Self(raw)
    }

    /// The wire integer
    pub fn raw(self) -> T {
        self.0
    }
}

impl<T, const DIV: u32> Scaled<T, DIV>
where
    T: Copy + Into<f64>,
{
    /// The physical value (`raw / DIV`)
    pub fn value(self) -> f64 {
        self.0.into() / f64::from(DIV)
    }
}

impl<T, const DIV: u32> Scaled<T, DIV>
where
    T: TryFrom<i64>,
{
    /// Convert a physical value, truncating toward zero
    pub fn from_value(value: f64) -> Result<Self, ScaleError> {
        Self::from_scaled(value, f64::trunc)
    }

    /// Convert a physical value, rounding to the nearest wire integer
    ///
    /// Recovers the exact wire integer from a value produced by [`Scaled::value`].
    pub fn from_value_rounded(value: f64) -> Result<Self, ScaleError> {
        Self::from_scaled(value, f64::round)
    }

    fn from_scaled(value: f64, to_integer: fn(f64) -> f64) -> Result<Self, ScaleError> {
        if !value.is_finite() {
            return Err(ScaleError::NonFinite);
        }

        let scaled = to_integer(value * f64::from(DIV));
        if scaled < i64::MIN as f64 || scaled > i64::MAX as f64 {
            return Err(ScaleError::OutOfRange(value));
        }

        T::try_from(scaled as i64)
            .map(Self)
            .map_err(|_| ScaleError::OutOfRange(value))
    }
}

impl<T, const DIV: u32> fmt::Display for Scaled<T, DIV>
where
    T: Copy + Into<f64>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let places = DIV.checked_ilog10().unwrap_or(0) as usize;
        write!(f, "{:.*}", places, self.value())
    }
}

#[cfg(feature = "serde")]
impl<T, const DIV: u32> serde::Serialize for Scaled<T, DIV>
where
    T: Copy + Into<f64>,
{
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.value())
    }
}

#[cfg(feature = "serde")]
impl<'de, T, const DIV: u32> serde::Deserialize<'de> for Scaled<T, DIV>
where
    T: TryFrom<i64>,
{
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = <f64 as serde::Deserialize>::deserialize(deserializer)?;
        Self::from_value_rounded(value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_divides() {
        assert_eq!(Deci::<i16>::from_raw(108).value(), 10.8);
        assert_eq!(Milli::<u16>::from_raw(4233).value(), 4.233);
        assert_eq!(Micro::<i32>::from_raw(-95_537_100).value(), -95.5371);
    }

    #[test]
    fn test_from_value_truncates_toward_zero() {
        assert_eq!(Deci::<i16>::from_value(9.87).unwrap().raw(), 98);
        assert_eq!(Deci::<i16>::from_value(-9.87).unwrap().raw(), -98);
        assert_eq!(Milli::<u16>::from_value(8.2).unwrap().raw(), 8200);
    }

    #[test]
    fn test_from_value_rounded_recovers_raw() {
        let batt = Milli::<u16>::from_raw(1005);
        assert_eq!(Milli::<u16>::from_value(batt.value()).unwrap().raw(), 1004);
        assert_eq!(Milli::<u16>::from_value_rounded(batt.value()).unwrap(), batt);

        let lat = Micro::<i32>::from_raw(36_665_800);
        assert_eq!(Micro::<i32>::from_value_rounded(lat.value()).unwrap(), lat);
        assert_eq!(
            Deci::<i16>::from_value_rounded(f64::NAN),
            Err(ScaleError::NonFinite)
        );
    }

    #[test]
    fn test_from_value_range() {
        assert_eq!(
            Milli::<u16>::from_value(-0.5),
            Err(ScaleError::OutOfRange(-0.5))
        );
        assert_eq!(
            Deci::<i16>::from_value(4000.0),
            Err(ScaleError::OutOfRange(4000.0))
        );
        assert_eq!(Deci::<u16>::from_value(f64::NAN), Err(ScaleError::NonFinite));
        // Truncation brings a small negative back to zero
        assert_eq!(Milli::<u16>::from_value(-0.0004).unwrap().raw(), 0);
    }

    #[test]
    fn test_display_uses_divisor_places() {
        assert_eq!(Deci::<u16>::from_raw(65436).to_string(), "6543.6");
        assert_eq!(Milli::<u16>::from_raw(4233).to_string(), "4.233");
        assert_eq!(Micro::<i32>::from_raw(0).to_string(), "0.000000");
    }
}
