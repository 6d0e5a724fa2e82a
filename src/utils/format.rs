use iso_currency::Currency;
use num_format::{Locale, ToFormattedString as _};

/// Every amount is displayed with the same locale regardless of currency.
const DISPLAY_LOCALE: Locale = Locale::en;

/// Formats money with the currency symbol, the currency's number of decimal places (JPY = 0,
/// USD = 2) and thousands separators, e.g. `R$1,234.50` or `-$3.00`.
///
/// Codes that aren't valid ISO 4217 are printed as `XYZ 12.00`.
pub fn format_currency(amount: f64, code: &str) -> String {
    let currency = match Currency::from_code(&code.to_uppercase()) {
        Some(currency) if amount.is_finite() => currency,
        _ => return format!("{code} {amount:.2}"),
    };

    let decimal_places = currency.exponent().unwrap_or(0) as usize;
    let rounded = format!("{:.decimal_places$}", amount.abs());
    let (integer, fraction) = rounded.split_once('.').unwrap_or((rounded.as_str(), ""));
    let integer = integer
        .parse::<u128>()
        .map(|v| v.to_formatted_string(&DISPLAY_LOCALE))
        .unwrap_or_else(|_| integer.to_string());

    let sign = if amount < 0. && rounded.chars().any(|c| matches!(c, '1'..='9')) {
        "-"
    } else {
        ""
    };

    if fraction.is_empty() {
        format!("{sign}{}{integer}", currency.symbol())
    } else {
        format!("{sign}{}{integer}.{fraction}", currency.symbol())
    }
}
