use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

pub fn now_ms_i64() -> i64 {
    let nanos = OffsetDateTime::now_utc().unix_timestamp_nanos();
    let ms = nanos / 1_000_000i128;
    if ms <= 0 {
        0
    } else if ms >= i64::MAX as i128 {
        i64::MAX
    } else {
        ms as i64
    }
}

pub fn ts_ms_to_rfc3339(ts_ms: i64) -> String {
    let nanos = (ts_ms as i128) * 1_000_000i128;
    let dt = OffsetDateTime::from_unix_timestamp_nanos(nanos).unwrap_or(OffsetDateTime::UNIX_EPOCH);
    dt.format(&Rfc3339)
        .unwrap_or_else(|_| "1970-01-01T00:00:00Z".to_string())
}

/// Date component only, for timestamps too old for a relative label.
pub fn ts_ms_to_date(ts_ms: i64) -> String {
    let full = ts_ms_to_rfc3339(ts_ms);
    full.get(..10).unwrap_or(&full).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_rfc3339_and_date() {
        assert_eq!(ts_ms_to_rfc3339(0), "1970-01-01T00:00:00Z");
        assert_eq!(ts_ms_to_date(0), "1970-01-01");
        assert_eq!(ts_ms_to_date(1_700_000_000_000), "2023-11-14");
    }
}
