pub fn format_value(value: f64) -> String {
    const UNITS: [&str; 5] = ["", "k", "M", "B", "T"];

    if !value.is_finite() {
        return "–".to_owned();
    }

    let mut scaled = value.abs();
    let mut unit = 0usize;
    while scaled >= 1000.0 && unit < UNITS.len() - 1 {
        scaled /= 1000.0;
        unit += 1;
    }

    let sign = if value < 0.0 { "-" } else { "" };
    if unit == 0 {
        if scaled.fract().abs() < f64::EPSILON {
            format!("{sign}{scaled:.0}")
        } else {
            format!("{sign}{scaled:.1}")
        }
    } else {
        format!("{sign}{scaled:.1}{}", UNITS[unit])
    }
}

pub fn format_share(part: f64, total: f64) -> String {
    if total > 0.0 && part.is_finite() {
        format!("{:.1}%", part / total * 100.0)
    } else {
        "–".to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_with_si_suffixes() {
        assert_eq!(format_value(0.0), "0");
        assert_eq!(format_value(42.0), "42");
        assert_eq!(format_value(12.4), "12.4");
        assert_eq!(format_value(1_500.0), "1.5k");
        assert_eq!(format_value(2_340_000.0), "2.3M");
        assert_eq!(format_value(-7_000.0), "-7.0k");
        assert_eq!(format_value(f64::NAN), "–");
    }

    #[test]
    fn share_guards_zero_totals() {
        assert_eq!(format_share(25.0, 100.0), "25.0%");
        assert_eq!(format_share(1.0, 0.0), "–");
    }
}
