//! Parsing and formatting of the focal point field value.
//!
//! The field holds the single source of truth as plain text,
//! `"<x>,<y>"`. Reading is permissive the way browser integer parsing
//! is: leading whitespace and a sign are accepted and anything after the
//! leading digits of a component is ignored (`"30px, 70%"` reads as
//! `30,70`). Anything else falls back to the image center. Reading never
//! clamps; out-of-range values are corrected when the indicator is next
//! placed.

use std::str::FromStr;

use crate::error::ParseError;
use crate::types::FocalPoint;

/// Read a field value, falling back to [`FocalPoint::CENTER`].
///
/// An absent or empty value is the unset state. A malformed value is
/// logged at debug level and also yields the center.
#[must_use]
pub fn parse(raw: Option<&str>) -> FocalPoint {
    match raw {
        None | Some("") => FocalPoint::CENTER,
        Some(value) => value.parse().unwrap_or_else(|e| {
            log::debug!("focal point value {value:?} unreadable ({e}), using center");
            FocalPoint::CENTER
        }),
    }
}

/// Serialize a focal point into the field wire format.
#[must_use]
pub fn format(point: FocalPoint) -> String {
    point.to_string()
}

impl FromStr for FocalPoint {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ParseError::Empty);
        }
        let mut parts = s.split(',');
        let (Some(x), Some(y), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(ParseError::ComponentCount {
                found: s.split(',').count(),
            });
        };
        Ok(Self::new(parse_leading_int(x)?, parse_leading_int(y)?))
    }
}

/// Parse the leading base-10 integer of `component`.
///
/// Saturates at the `i32` bounds; such values are clamped later anyway.
fn parse_leading_int(component: &str) -> Result<i32, ParseError> {
    let trimmed = component.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit);
    let mut seen = false;
    let magnitude = digits.fold(0_i64, |acc, b| {
        seen = true;
        acc.saturating_mul(10).saturating_add(i64::from(b - b'0'))
    });
    if !seen {
        return Err(ParseError::NotAnInteger {
            component: component.to_owned(),
        });
    }
    let value = if negative { -magnitude } else { magnitude };
    Ok(i32::try_from(value).unwrap_or(if negative { i32::MIN } else { i32::MAX }))
}

/// The field value as last written or observed.
///
/// Writes report whether the stored text changed so that callers notify
/// dependents only on real changes; this is what keeps the
/// indicator <-> field synchronization from looping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoordinateStore {
    raw: Option<String>,
}

impl CoordinateStore {
    /// Create a store holding the field's current contents.
    #[must_use]
    pub const fn new(raw: Option<String>) -> Self {
        Self { raw }
    }

    /// The raw field text, exactly as stored.
    #[must_use]
    pub fn raw(&self) -> Option<&str> {
        self.raw.as_deref()
    }

    /// The stored value read as a focal point (not clamped).
    #[must_use]
    pub fn point(&self) -> FocalPoint {
        parse(self.raw())
    }

    /// Record a value observed in the field (e.g. typed by the user).
    ///
    /// Returns `true` if it differs from what was stored.
    pub fn observe(&mut self, raw: Option<&str>) -> bool {
        if self.raw() == raw {
            return false;
        }
        self.raw = raw.map(str::to_owned);
        true
    }

    /// Store `point` in wire format.
    ///
    /// Returns `true` if the formatted value differs from the current
    /// contents, i.e. a change notification is due.
    pub fn write(&mut self, point: FocalPoint) -> bool {
        let formatted = format(point);
        if self.raw() == Some(formatted.as_str()) {
            return false;
        }
        self.raw = Some(formatted);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_absent_yield_center() {
        assert_eq!(parse(Some("")), FocalPoint::CENTER);
        assert_eq!(parse(None), FocalPoint::CENTER);
    }

    #[test]
    fn plain_pair_parses() {
        assert_eq!(parse(Some("30,70")), FocalPoint::new(30, 70));
    }

    #[test]
    fn parse_does_not_clamp() {
        assert_eq!(parse(Some("150,-20")), FocalPoint::new(150, -20));
    }

    #[test]
    fn trailing_garbage_is_ignored() {
        assert_eq!(parse(Some("30px, 70%")), FocalPoint::new(30, 70));
        assert_eq!(parse(Some("12.9,4e2")), FocalPoint::new(12, 4));
        assert_eq!(parse(Some("+5, -0")), FocalPoint::new(5, 0));
    }

    #[test]
    fn malformed_values_fall_back_to_center() {
        for raw in ["abc", "30", "30,", ",70", "a,b", "1,2,3", " ", "-,5"] {
            assert_eq!(parse(Some(raw)), FocalPoint::CENTER, "input {raw:?}");
        }
    }

    #[test]
    fn from_str_reports_reason() {
        assert_eq!("".parse::<FocalPoint>(), Err(ParseError::Empty));
        assert_eq!(
            "1,2,3".parse::<FocalPoint>(),
            Err(ParseError::ComponentCount { found: 3 })
        );
        assert_eq!(
            "40".parse::<FocalPoint>(),
            Err(ParseError::ComponentCount { found: 1 })
        );
        assert_eq!(
            "40,abc".parse::<FocalPoint>(),
            Err(ParseError::NotAnInteger {
                component: "abc".into()
            })
        );
    }

    #[test]
    fn huge_components_saturate() {
        assert_eq!(
            parse(Some("99999999999,-99999999999")),
            FocalPoint::new(i32::MAX, i32::MIN)
        );
    }

    #[test]
    fn format_then_parse_round_trips_whole_range() {
        for x in 0..=100 {
            for y in 0..=100 {
                let point = FocalPoint::new(x, y);
                assert_eq!(parse(Some(&format(point))), point);
            }
        }
    }

    #[test]
    fn write_reports_only_real_changes() {
        let mut store = CoordinateStore::new(Some("30,70".into()));
        assert!(!store.write(FocalPoint::new(30, 70)));
        assert!(store.write(FocalPoint::new(31, 70)));
        assert_eq!(store.raw(), Some("31,70"));
    }

    #[test]
    fn write_normalizes_unformatted_text() {
        // Same point, different text: the field must be rewritten.
        let mut store = CoordinateStore::new(Some(" 30 ,70".into()));
        assert_eq!(store.point(), FocalPoint::new(30, 70));
        assert!(store.write(FocalPoint::new(30, 70)));
        assert_eq!(store.raw(), Some("30,70"));
    }

    #[test]
    fn observe_tracks_external_edits() {
        let mut store = CoordinateStore::default();
        assert!(store.observe(Some("10,20")));
        assert!(!store.observe(Some("10,20")));
        assert!(store.observe(None));
        assert_eq!(store.point(), FocalPoint::CENTER);
    }
}
