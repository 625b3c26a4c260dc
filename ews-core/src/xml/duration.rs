//! `xs:duration` values as used by time zone biases and transition offsets.

use chrono::TimeDelta;

use crate::error::{EwsError, EwsResult};

/// Parses `[-]P[nD][T[nH][nM][n[.f]S]]`.
///
/// Year and month components are rejected: they have no fixed length and
/// never appear in time zone payloads.
pub fn parse_xs_duration(value: &str) -> EwsResult<TimeDelta> {
    let invalid = || EwsError::invalid_value("xs:duration", value);

    let (negative, rest) = match value.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, value),
    };
    let rest = rest.strip_prefix('P').ok_or_else(invalid)?;
    if rest.is_empty() {
        return Err(invalid());
    }

    let (date_part, time_part) = match rest.split_once('T') {
        Some((date, time)) if !time.is_empty() => (date, Some(time)),
        Some(_) => return Err(invalid()),
        None => (rest, None),
    };

    let mut millis: i64 = 0;
    if !date_part.is_empty() {
        let days = date_part.strip_suffix('D').ok_or_else(invalid)?;
        millis = parse_component(days, 86_400_000)
            .and_then(|days| millis.checked_add(days))
            .ok_or_else(invalid)?;
    }

    if let Some(mut time) = time_part {
        for (designator, unit) in [('H', 3_600_000), ('M', 60_000)] {
            if let Some((number, tail)) = time.split_once(designator) {
                millis = parse_component(number, unit)
                    .and_then(|part| millis.checked_add(part))
                    .ok_or_else(invalid)?;
                time = tail;
            }
        }
        if !time.is_empty() {
            let seconds = time.strip_suffix('S').ok_or_else(invalid)?;
            millis = parse_seconds(seconds)
                .and_then(|part| millis.checked_add(part))
                .ok_or_else(invalid)?;
        }
    }

    let millis = if negative { -millis } else { millis };
    TimeDelta::try_milliseconds(millis).ok_or_else(invalid)
}

/// Formats a duration in the compact form accepted by [`parse_xs_duration`].
pub fn format_xs_duration(duration: TimeDelta) -> String {
    let sign = if duration < TimeDelta::zero() { "-" } else { "" };
    let total_millis = duration.num_milliseconds().unsigned_abs();

    let days = total_millis / 86_400_000;
    let hours = total_millis / 3_600_000 % 24;
    let minutes = total_millis / 60_000 % 60;
    let seconds = total_millis / 1000 % 60;
    let millis = total_millis % 1000;

    let mut out = format!("{sign}P");
    if days > 0 {
        out.push_str(&format!("{days}D"));
    }
    if hours > 0 || minutes > 0 || seconds > 0 || millis > 0 || days == 0 {
        out.push('T');
        if hours > 0 {
            out.push_str(&format!("{hours}H"));
        }
        if minutes > 0 {
            out.push_str(&format!("{minutes}M"));
        }
        if millis > 0 {
            out.push_str(&format!("{seconds}.{millis:03}S"));
        } else if seconds > 0 || (hours == 0 && minutes == 0) {
            out.push_str(&format!("{seconds}S"));
        }
    }
    out
}

fn parse_component(number: &str, unit_millis: i64) -> Option<i64> {
    if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    number.parse::<i64>().ok()?.checked_mul(unit_millis)
}

fn parse_seconds(seconds: &str) -> Option<i64> {
    let (whole, fraction) = seconds.split_once('.').unwrap_or((seconds, ""));
    let mut millis = parse_component(whole, 1000)?;
    if !fraction.is_empty() {
        if !fraction.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        // Keep millisecond precision, pad short fractions ("5" is 500ms).
        let digits: String = fraction.chars().chain("000".chars()).take(3).collect();
        millis = millis.checked_add(digits.parse::<i64>().ok()?)?;
    }
    Some(millis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_common_biases() {
        assert_eq!(parse_xs_duration("PT8H").unwrap(), TimeDelta::hours(8));
        assert_eq!(parse_xs_duration("-PT1H").unwrap(), TimeDelta::hours(-1));
        assert_eq!(
            parse_xs_duration("-PT5H30M").unwrap(),
            -(TimeDelta::hours(5) + TimeDelta::minutes(30))
        );
        assert_eq!(parse_xs_duration("P0DT2H0M0.0S").unwrap(), TimeDelta::hours(2));
        assert_eq!(parse_xs_duration("PT0S").unwrap(), TimeDelta::zero());
        assert_eq!(
            parse_xs_duration("PT1.5S").unwrap(),
            TimeDelta::milliseconds(1500)
        );
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["", "P", "PT", "8H", "P1Y", "PT-1H", "PTH", "P1DT", "PT1X"] {
            assert!(parse_xs_duration(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn test_parse_rejects_overflowing_sum() {
        // Days and hours each fit in i64 milliseconds, their sum does not.
        for bad in ["P106751991167DT23H", "-P106751991167DT23H", "P106751991167DT1440M"] {
            assert!(
                matches!(parse_xs_duration(bad), Err(EwsError::InvalidXmlValue { .. })),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_format_compact_form() {
        assert_eq!(format_xs_duration(TimeDelta::hours(8)), "PT8H");
        assert_eq!(format_xs_duration(TimeDelta::hours(-1)), "-PT1H");
        assert_eq!(format_xs_duration(TimeDelta::zero()), "PT0S");
        assert_eq!(format_xs_duration(TimeDelta::days(1)), "P1D");
        assert_eq!(
            format_xs_duration(TimeDelta::hours(2) + TimeDelta::seconds(30)),
            "PT2H30S"
        );
        assert_eq!(format_xs_duration(TimeDelta::milliseconds(1500)), "PT1.500S");
    }
}
