//! `Set-Cookie` parsing for the renewal cookie
//!
//! Only the pieces the session needs are read: name, value and expiry
//! (`Max-Age` wins over `Expires`). Domain, path and flags are ignored.

use authwire_domain::constants::RENEWAL_COOKIE_NAME;
use authwire_domain::RenewalCookie;
use chrono::{DateTime, Duration, NaiveDateTime, Utc};

/// One cookie as announced by the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetCookie {
    pub name: String,
    pub value: String,
    /// `None` for a session cookie
    pub expires: Option<DateTime<Utc>>,
}

impl SetCookie {
    /// Parse a single `Set-Cookie` header value
    pub fn parse(header: &str) -> Option<Self> {
        Self::parse_at(header, Utc::now())
    }

    /// Parse with `now` as the reference for `Max-Age`
    pub fn parse_at(header: &str, now: DateTime<Utc>) -> Option<Self> {
        let mut parts = header.split(';');
        let (name, value) = parts.next()?.split_once('=')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let mut expires = None;
        let mut max_age = None;
        for part in parts {
            let Some((attr, val)) = part.trim().split_once('=') else { continue };
            let val = val.trim();
            match attr.trim().to_ascii_lowercase().as_str() {
                "expires" => expires = parse_cookie_date(val),
                "max-age" => {
                    if let Ok(secs) = val.parse::<i64>() {
                        max_age = Some(expires_after(now, secs));
                    }
                }
                _ => {}
            }
        }

        Some(Self {
            name: name.to_string(),
            value: value.trim().trim_matches('"').to_string(),
            expires: max_age.or(expires),
        })
    }

    /// Convert into the persisted renewal cookie
    ///
    /// Session cookies are kept until the end of the representable calendar.
    pub fn into_renewal_cookie(self) -> RenewalCookie {
        let expires_at = self.expires.unwrap_or_else(far_future);
        RenewalCookie::new(self.value, expires_at)
    }
}

/// Pick the renewal cookie among all `Set-Cookie` headers of a response
///
/// The `zuid` cookie wins; otherwise the last parsable cookie is used.
pub fn renewal_cookie_from_headers<'a, I>(headers: I) -> Option<RenewalCookie>
where
    I: IntoIterator<Item = &'a str>,
{
    let parsed: Vec<SetCookie> = headers.into_iter().filter_map(SetCookie::parse).collect();
    let chosen = match parsed.iter().rposition(|cookie| cookie.name == RENEWAL_COOKIE_NAME) {
        Some(index) => parsed.into_iter().nth(index),
        None => parsed.into_iter().last(),
    };
    chosen.map(SetCookie::into_renewal_cookie)
}

fn parse_cookie_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc2822(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    // Netscape format: "Wed, 21-Oct-2026 07:28:00 GMT"
    NaiveDateTime::parse_from_str(raw, "%a, %d-%b-%Y %H:%M:%S GMT")
        .ok()
        .map(|naive| naive.and_utc())
}

/// `now + secs`, clamped to the representable range
fn expires_after(now: DateTime<Utc>, secs: i64) -> DateTime<Utc> {
    match Duration::try_seconds(secs).and_then(|delta| now.checked_add_signed(delta)) {
        Some(expiry) => expiry,
        None if secs < 0 => DateTime::<Utc>::UNIX_EPOCH,
        None => far_future(),
    }
}

fn far_future() -> DateTime<Utc> {
    // 9999-12-31T23:59:59Z, still RFC 3339 representable
    DateTime::<Utc>::from_timestamp(253_402_300_799, 0).unwrap_or(DateTime::<Utc>::MAX_UTC)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_parses_expires_attribute() {
        let cookie = SetCookie::parse(
            "zuid=abc123; Path=/access; Expires=Thu, 01 Jan 2099 00:00:00 GMT; HttpOnly; Secure",
        )
        .unwrap();

        assert_eq!(cookie.name, "zuid");
        assert_eq!(cookie.value, "abc123");
        assert_eq!(cookie.expires, Some(Utc.with_ymd_and_hms(2099, 1, 1, 0, 0, 0).unwrap()));
    }

    #[test]
    fn test_parses_netscape_date() {
        let cookie = SetCookie::parse("zuid=v; expires=Wed, 21-Oct-2026 07:28:00 GMT").unwrap();
        assert_eq!(cookie.expires, Some(Utc.with_ymd_and_hms(2026, 10, 21, 7, 28, 0).unwrap()));
    }

    #[test]
    fn test_max_age_wins_over_expires() {
        let now = Utc.with_ymd_and_hms(2030, 6, 1, 12, 0, 0).unwrap();
        let cookie = SetCookie::parse_at(
            "zuid=v; Max-Age=3600; Expires=Thu, 01 Jan 2099 00:00:00 GMT",
            now,
        )
        .unwrap();

        assert_eq!(cookie.expires, Some(now + Duration::hours(1)));
    }

    #[test]
    fn test_non_positive_max_age_expires_immediately() {
        let now = Utc::now();
        let cookie = SetCookie::parse_at("zuid=v; Max-Age=0", now).unwrap();
        assert!(cookie.into_renewal_cookie().is_expired_at(now));
    }

    #[test]
    fn test_out_of_range_max_age_is_clamped() {
        let now = Utc::now();

        let huge = SetCookie::parse_at("zuid=v; Max-Age=9223372036854775807", now).unwrap();
        assert_eq!(huge.expires, Some(far_future()));

        let beyond_calendar = SetCookie::parse_at("zuid=v; Max-Age=9000000000000000", now).unwrap();
        assert_eq!(beyond_calendar.expires, Some(far_future()));
        assert!(!beyond_calendar.into_renewal_cookie().is_expired_at(now));

        let negative = SetCookie::parse_at("zuid=v; Max-Age=-9223372036854775808", now).unwrap();
        assert!(negative.into_renewal_cookie().is_expired_at(now));
    }

    #[test]
    fn test_session_cookie_does_not_expire() {
        let cookie = SetCookie::parse("zuid=v; Path=/").unwrap();
        assert_eq!(cookie.expires, None);
        assert!(!cookie.into_renewal_cookie().is_expired());
    }

    #[test]
    fn test_rejects_malformed_headers() {
        assert!(SetCookie::parse("no-equals-sign").is_none());
        assert!(SetCookie::parse("=value").is_none());
    }

    #[test]
    fn test_prefers_renewal_cookie_name() {
        let headers = [
            "zuid=renewal; Max-Age=600",
            "tracking=abc; Max-Age=600",
        ];
        let cookie = renewal_cookie_from_headers(headers).unwrap();
        assert_eq!(cookie.value, "renewal");

        let fallback = renewal_cookie_from_headers(["other=x", "last=y"]).unwrap();
        assert_eq!(fallback.value, "y");

        assert!(renewal_cookie_from_headers(std::iter::empty()).is_none());
    }
}
