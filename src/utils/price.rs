/// Lenient decimal parse of a user-typed price. Anything that is not a
/// finite decimal number counts as 0 so one bad raffle never breaks a report.
pub fn parse_price(text: &str) -> f64 {
    match text.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}
