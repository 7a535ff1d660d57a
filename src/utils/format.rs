//! Display formatting for card numbers, money and dates.

use chrono::DateTime;

/// Inserts a dash after every fourth digit.
///
/// ```
/// use redbank::utils::format_card_number_with_dashes;
///
/// assert_eq!(format_card_number_with_dashes("1234567812345678"), "1234-5678-1234-5678");
/// assert_eq!(format_card_number_with_dashes("123456"), "1234-56");
/// ```
#[must_use]
pub fn format_card_number_with_dashes(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 4);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && i % 4 == 0 {
            out.push('-');
        }
        out.push(ch);
    }
    out
}

/// Formats a card number as `xxxx-xxxx-xxxx-xxxx`, ignoring any non-digit
/// input and keeping at most 16 digits.
#[must_use]
pub fn format_card_number(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).take(16).collect();
    format_card_number_with_dashes(&digits)
}

/// US-dollar amount with thousands separators and two decimals.
///
/// ```
/// use redbank::utils::format_to_currency;
///
/// assert_eq!(format_to_currency(1234.5), "$1,234.50");
/// assert_eq!(format_to_currency(-20.0), "-$20.00");
/// ```
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_to_currency(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let dollars = (cents / 100).to_string();

    let mut grouped = String::with_capacity(dollars.len() + dollars.len() / 3);
    for (i, ch) in dollars.chars().enumerate() {
        if i > 0 && (dollars.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}${grouped}.{:02}", cents % 100)
}

/// Formats an RFC 3339 timestamp as `Jan 5, 2024`.
///
/// Unparseable input is returned unchanged.
#[must_use]
pub fn format_date(timestamp: &str) -> String {
    DateTime::parse_from_rfc3339(timestamp).map_or_else(
        |_| timestamp.to_string(),
        |date| date.format("%b %-d, %Y").to_string(),
    )
}
