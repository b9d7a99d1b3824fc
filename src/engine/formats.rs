//! String format checks
//!
//! Patterns are compiled once per process. Datetime and time options
//! (zone, fractional precision) are checked against the captures.

use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::OnceLock;

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use chrono::NaiveDate;
use regex::Regex;
use uuid::Uuid;

use crate::schema::{DatetimeOptions, IpVersion, StringFormat};

fn cached(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("static pattern compiles"))
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(
        &RE,
        r"(?i)^[A-Z0-9_'+\-.]*[A-Z0-9_+\-]@([A-Z0-9][A-Z0-9\-]*\.)+[A-Z]{2,}$",
    )
}

fn emoji_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"^(\p{Extended_Pictographic}|\p{Emoji_Component})+$")
}

fn nanoid_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"^[a-zA-Z0-9_-]{21}$")
}

fn cuid_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"(?i)^c[^\s-]{8,}$")
}

fn cuid2_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"^[0-9a-z]+$")
}

fn ulid_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"(?i)^[0-9A-HJKMNP-TV-Z]{26}$")
}

fn date_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"^\d{4}-\d{2}-\d{2}$")
}

fn duration_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(
        &RE,
        r"^P(\d+Y)?(\d+M)?(\d+W)?(\d+D)?(T(\d+H)?(\d+M)?(\d+([.,]\d+)?S)?)?$",
    )
}

fn base64url_engine() -> &'static GeneralPurpose {
    static ENGINE: OnceLock<GeneralPurpose> = OnceLock::new();
    ENGINE.get_or_init(|| {
        GeneralPurpose::new(
            &alphabet::URL_SAFE,
            GeneralPurposeConfig::new()
                .with_decode_padding_mode(DecodePaddingMode::Indifferent)
                .with_decode_allow_trailing_bits(true),
        )
    })
}

fn time_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"^([01]\d|2[0-3]):[0-5]\d:[0-5]\d(\.(?P<fraction>\d+))?$")
}

fn datetime_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(
        &RE,
        r"^\d{4}-\d{2}-\d{2}T([01]\d|2[0-3]):[0-5]\d:[0-5]\d(\.(?P<fraction>\d+))?(?P<zone>Z|[+-]\d{2}(:?\d{2})?)?$",
    )
}

/// Fractional seconds against `precision`: any digits when `None`,
/// exactly `n` digits otherwise (none for zero).
fn fraction_fits(fraction: Option<&str>, precision: Option<u32>) -> bool {
    match (precision, fraction) {
        (None, _) => true,
        (Some(0), fraction) => fraction.is_none(),
        (Some(n), Some(digits)) => u32::try_from(digits.len()).map_or(false, |len| len == n),
        (Some(_), None) => false,
    }
}

fn is_time(s: &str, precision: Option<u32>) -> bool {
    time_regex().captures(s).map_or(false, |caps| {
        fraction_fits(caps.name("fraction").map(|m| m.as_str()), precision)
    })
}

fn is_datetime(s: &str, options: DatetimeOptions) -> bool {
    let Some(caps) = datetime_regex().captures(s) else {
        return false;
    };
    let zone_ok = match caps.name("zone").map(|m| m.as_str()) {
        None => options.local,
        Some("Z") => true,
        Some(_) => options.offset,
    };
    zone_ok
        && fraction_fits(caps.name("fraction").map(|m| m.as_str()), options.precision)
        && s.get(..10).map_or(false, is_calendar_date)
}

/// `YYYY-MM-DD` naming a real calendar day.
fn is_calendar_date(s: &str) -> bool {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
}

fn is_email(s: &str) -> bool {
    !s.starts_with('.') && !s.contains("..") && email_regex().is_match(s)
}

fn is_duration(s: &str) -> bool {
    // "P" alone or a dangling "T" designates nothing
    s.len() > 1 && !s.ends_with('T') && duration_regex().is_match(s)
}

fn is_ip(s: &str, version: IpVersion) -> bool {
    let v4 = || s.parse::<Ipv4Addr>().is_ok();
    let v6 = || s.parse::<Ipv6Addr>().is_ok();
    match version {
        IpVersion::V4 => v4(),
        IpVersion::V6 => v6(),
        IpVersion::Any => v4() || v6(),
    }
}

/// Whether `s` satisfies `format`.
pub(crate) fn matches(format: &StringFormat, s: &str) -> bool {
    match format {
        StringFormat::Email => is_email(s),
        StringFormat::Url => url::Url::parse(s).is_ok(),
        StringFormat::Uuid => s.len() == 36 && Uuid::try_parse(s).is_ok(),
        StringFormat::Emoji => emoji_regex().is_match(s),
        StringFormat::Nanoid => nanoid_regex().is_match(s),
        StringFormat::Cuid => cuid_regex().is_match(s),
        StringFormat::Cuid2 => cuid2_regex().is_match(s),
        StringFormat::Ulid => ulid_regex().is_match(s),
        StringFormat::Datetime(options) => is_datetime(s, *options),
        StringFormat::Date => date_regex().is_match(s) && is_calendar_date(s),
        StringFormat::Time(precision) => is_time(s, *precision),
        StringFormat::Duration => is_duration(s),
        StringFormat::Ip(version) => is_ip(s, *version),
        StringFormat::Base64 => STANDARD.decode(s).is_ok(),
        StringFormat::Base64Url => base64url_engine().decode(s).is_ok(),
    }
}
