use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// The shade of a trait. Each step past Black lowers the success threshold
/// of its dice by one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shade {
    /// Standard shade: dice succeed on 4+.
    #[default]
    Black,
    /// Grey shade: dice succeed on 3+.
    Grey,
    /// White shade: dice succeed on 2+.
    White,
}

impl Shade {
    /// The lowest face that counts as a success.
    pub fn success_threshold(self) -> u32 {
        match self {
            Self::Black => 4,
            Self::Grey => 3,
            Self::White => 2,
        }
    }

    /// Single-letter prefix used when writing an exponent, e.g. `G5`.
    pub fn letter(self) -> char {
        match self {
            Self::Black => 'B',
            Self::Grey => 'G',
            Self::White => 'W',
        }
    }
}

impl fmt::Display for Shade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Black => write!(f, "black"),
            Self::Grey => write!(f, "grey"),
            Self::White => write!(f, "white"),
        }
    }
}

impl FromStr for Shade {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "b" | "black" => Ok(Self::Black),
            "g" | "grey" | "gray" => Ok(Self::Grey),
            "w" | "white" => Ok(Self::White),
            other => Err(CoreError::Unknown {
                kind: "shade",
                value: other.to_string(),
            }),
        }
    }
}
