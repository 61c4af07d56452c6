use crate::entities::raffle_entity as raffles;

/// Renders a ticket number, left-padding its decimal text with `'0'` up to
/// `digits` characters. `digits <= 0` means no padding.
pub fn format_ticket_number(value: i64, digits: i32) -> String {
    let text = value.to_string();
    let width = usize::try_from(digits).unwrap_or(0);
    if text.len() >= width {
        text
    } else {
        format!("{}{}", "0".repeat(width - text.len()), text)
    }
}

/// Inverse of [`format_ticket_number`]. Padding zeros in front of a minus
/// sign ("0-5") are accepted since that is how negative numbers render.
pub fn parse_ticket_number(label: &str) -> Option<i64> {
    let label = label.trim();
    if label.is_empty() {
        return None;
    }
    if let Ok(value) = label.parse::<i64>() {
        return Some(value);
    }
    let unpadded = label.trim_start_matches('0');
    if unpadded.starts_with('-') {
        unpadded.parse::<i64>().ok()
    } else {
        None
    }
}

/// Every ticket label of the raffle, ascending. Empty for an inverted range.
pub fn compute_ticket_universe(raffle: &raffles::Model) -> Vec<String> {
    (i64::from(raffle.range_start)..=i64::from(raffle.range_end))
        .map(|value| format_ticket_number(value, raffle.digits))
        .collect()
}

/// Membership test without materialising the whole universe.
pub fn is_valid_ticket_number(raffle: &raffles::Model, label: &str) -> bool {
    match parse_ticket_number(label) {
        Some(value) => {
            value >= i64::from(raffle.range_start)
                && value <= i64::from(raffle.range_end)
                && format_ticket_number(value, raffle.digits) == label
        }
        None => false,
    }
}

/// Padding width derived from the typed range endpoints: the longer of the
/// two inputs, so "000".."999" renders with three digits.
pub fn digits_for_range_input(range_start: &str, range_end: &str) -> i32 {
    let longest = range_start
        .trim()
        .chars()
        .count()
        .max(range_end.trim().chars().count());
    i32::try_from(longest).unwrap_or(i32::MAX)
}
