//! Value coercion for simulator output tokens
//!
//! Every token read from an LTSpice file goes through the same coercion
//! ladder: integer, then real, then the polar complex notation used by AC
//! measurements, and finally verbatim text. Coercion is applied per token
//! and never fails - a token nothing else accepts stays text.

use std::fmt;
use std::sync::LazyLock;

use num_complex::Complex64;
use regex::Regex;

use crate::error::{LtstepsError, Result};

/// Pattern of the complex notation emitted by LTSpice: `(<mag>dB,<ph>°)`
static COMPLEX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\((?P<mag>.*)dB,(?P<ph>.*)°\)$").unwrap());

/// A complex value in the polar decibel/degree form found in .meas output
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolarComplex {
    /// Magnitude in decibels
    pub mag: f64,
    /// Phase in degrees
    pub ph: f64,
}

impl PolarComplex {
    /// Parse the literal `(<mag>dB,<ph>°)` notation
    ///
    /// Internal whitespace around the two numbers is tolerated. Anything
    /// else is a format error, which the coercion ladder turns into text.
    pub fn parse(token: &str) -> Result<Self> {
        let caps = COMPLEX_RE
            .captures(token.trim())
            .ok_or_else(|| LtstepsError::ComplexFormat {
                token: token.to_string(),
            })?;

        let mag = caps["mag"].trim().parse::<f64>();
        let ph = caps["ph"].trim().parse::<f64>();
        match (mag, ph) {
            (Ok(mag), Ok(ph)) => Ok(PolarComplex { mag, ph }),
            _ => Err(LtstepsError::ComplexFormat {
                token: token.to_string(),
            }),
        }
    }

    /// Convert to rectangular form
    pub fn to_complex(self) -> Complex64 {
        let ph = self.ph / 180.0 * std::f64::consts::PI;
        Complex64::new(self.mag * ph.cos(), self.mag * ph.sin())
    }
}

impl fmt::Display for PolarComplex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.mag, self.ph)
    }
}

/// A token coerced to the most specific type it parses as
#[derive(Debug, Clone, PartialEq)]
pub enum CoercedValue {
    Int(i64),
    Real(f64),
    Complex(PolarComplex),
    Text(String),
}

impl fmt::Display for CoercedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoercedValue::Int(v) => write!(f, "{}", v),
            CoercedValue::Real(v) => write!(f, "{}", v),
            CoercedValue::Complex(v) => write!(f, "{}", v),
            CoercedValue::Text(v) => write!(f, "{}", v),
        }
    }
}

/// Coerce a single token
///
/// Tries integer, real and polar complex parsing in that order and falls
/// back to the verbatim token text. Scientific notation is accepted
/// wherever the platform's float parser accepts it.
pub fn try_convert_value(token: &str) -> CoercedValue {
    let trimmed = token.trim();
    if let Ok(v) = trimmed.parse::<i64>() {
        return CoercedValue::Int(v);
    }
    if let Ok(v) = trimmed.parse::<f64>() {
        return CoercedValue::Real(v);
    }
    match PolarComplex::parse(trimmed) {
        Ok(v) => CoercedValue::Complex(v),
        Err(_) => CoercedValue::Text(token.to_string()),
    }
}

/// Coerce every token of an iterator
pub fn try_convert_values<'a, I>(tokens: I) -> Vec<CoercedValue>
where
    I: IntoIterator<Item = &'a str>,
{
    tokens.into_iter().map(try_convert_value).collect()
}
