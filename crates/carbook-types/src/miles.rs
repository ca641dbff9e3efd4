//! Odometer value coercion

/// Coerce raw user input into a non-negative mileage.
///
/// Takes the leading integer of the trimmed input (an optional sign followed
/// by digits) and ignores whatever follows. Input with no leading digits and
/// negative values both become 0. Values past `u64::MAX` saturate.
pub fn parse_miles(raw: &str) -> u64 {
    let s = raw.trim();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let mut value: u64 = 0;
    let mut seen_digit = false;
    for c in digits.chars() {
        let Some(d) = c.to_digit(10) else { break };
        seen_digit = true;
        value = value.saturating_mul(10).saturating_add(u64::from(d));
    }

    if !seen_digit || negative {
        0
    } else {
        value
    }
}
