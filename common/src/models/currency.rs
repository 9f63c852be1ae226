use crate::Error;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Fiat currency used to denominate every displayed monetary figure
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Currency {
    #[default]
    #[serde(rename = "inr")]
    Inr,
    #[serde(rename = "cad")]
    Cad,
}

impl Currency {
    /// Lowercase code used by the upstream `vs_currency` parameter and the
    /// per-currency maps of a coin detail
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Inr => "inr",
            Currency::Cad => "cad",
        }
    }

    pub fn iso_code(&self) -> &'static str {
        match self {
            Currency::Inr => "INR",
            Currency::Cad => "CAD",
        }
    }

    pub fn locale(&self) -> &'static str {
        match self {
            Currency::Inr => "en-IN",
            Currency::Cad => "en-CA",
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Currency {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inr" => Ok(Currency::Inr),
            "cad" => Ok(Currency::Cad),
            other => Err(Error::ParseError(format!(
                "Unknown currency: {}. Supported currencies: inr, cad",
                other
            ))),
        }
    }
}
