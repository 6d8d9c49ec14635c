/// Renders a number with at most two fractional digits and no
/// thousands separators. Trailing zeros are trimmed, so `5.0` becomes
/// `"5"` and `1.2` stays `"1.2"`.
pub fn humanize_number(n: f64) -> String {
    let rendered = format!("{n:.2}");
    rendered
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

const DURATION_UNITS: [(f64, &str); 4] = [(86400., "d"), (3600., "h"), (60., "m"), (1., "s")];

/// Decomposes a duration in seconds into days, hours, minutes and
/// seconds, emitting only the non-zero components in descending order.
/// An input of 0 yields an empty string; callers decide what to show
/// for that.
pub fn humanize_duration(seconds: f64) -> String {
    let mut remainder = seconds;
    let mut parts = Vec::new();
    for (unit_seconds, unit) in DURATION_UNITS {
        let amount = (remainder / unit_seconds).floor();
        remainder -= amount * unit_seconds;
        if amount > 0. {
            parts.push(format!("{amount} {unit}"));
        }
    }
    parts.join(", ")
}
