//! Display formatting for monetary figures and 24h changes.
//!
//! Each [`Currency`] maps to exactly one locale: INR renders with Indian
//! digit grouping (`₹1,23,45,678.90`), CAD with Canadian English grouping
//! (`$12,345,678.90`).

use crate::models::Currency;
use serde::Serialize;

const NOT_AVAILABLE: &str = "N/A";

pub fn currency_symbol(currency: Currency) -> &'static str {
    match currency {
        Currency::Inr => "\u{20b9}",
        Currency::Cad => "$",
    }
}

// groups of three from the right: 1,234,567
fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

// last three digits, then groups of two: 12,34,567
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut out = String::with_capacity(digits.len() + digits.len() / 2);
    for (i, ch) in head.chars().enumerate() {
        if i > 0 && (head.len() - i) % 2 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out.push(',');
    out.push_str(tail);
    out
}

fn group(digits: &str, currency: Currency) -> String {
    match currency {
        Currency::Inr => group_indian(digits),
        Currency::Cad => group_thousands(digits),
    }
}

/// Formats a monetary value with two fraction digits, the currency symbol
/// and the grouping of the currency's locale. Non-finite values render as
/// `N/A`.
pub fn format_currency(value: f64, currency: Currency) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_string();
    }

    let cents = (value.abs() * 100.0).round() as u128;
    let whole = group(&(cents / 100).to_string(), currency);
    let sign = if value < 0.0 && cents != 0 { "-" } else { "" };

    format!(
        "{}{}{}.{:02}",
        sign,
        currency_symbol(currency),
        whole,
        cents % 100
    )
}

pub fn format_optional_currency(value: Option<f64>, currency: Currency) -> String {
    value
        .map(|v| format_currency(v, currency))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Formats a plain quantity such as a circulating supply: thousands
/// grouping, at most three fraction digits, trailing zeros dropped.
pub fn format_quantity(value: f64) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_string();
    }

    let millis = (value.abs() * 1000.0).round() as u128;
    let whole = group_thousands(&(millis / 1000).to_string());
    let sign = if value < 0.0 && millis != 0 { "-" } else { "" };

    let frac = millis % 1000;
    if frac == 0 {
        return format!("{}{}", sign, whole);
    }
    let frac = format!("{:03}", frac);
    format!("{}{}.{}", sign, whole, frac.trim_end_matches('0'))
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    /// Negative and zero changes
    Down,
}

/// A 24h percentage change prepared for display
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PriceChange {
    pub direction: Direction,
    /// Absolute magnitude with two decimals and a percent sign, e.g. `3.46%`
    pub magnitude: String,
}

impl PriceChange {
    pub fn new(percentage: f64) -> Self {
        let direction = if percentage > 0.0 {
            Direction::Up
        } else {
            Direction::Down
        };

        Self {
            direction,
            magnitude: format!("{:.2}%", percentage.abs()),
        }
    }
}
