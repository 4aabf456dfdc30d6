use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::error::{Error, Result};

/// Inclusive bounds on a conversation's last activity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Parse optional `date_from`/`date_to` parameters
    ///
    /// Accepts `YYYY-MM-DD` (start of day for `from`, end of day for `to`, UTC) or
    /// RFC3339. Blank values count as absent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an unparseable date or when `from` is after `to`.
    pub fn parse(from: Option<&str>, to: Option<&str>) -> Result<Self> {
        let from = non_blank(from).map(|value| parse_bound(value, Edge::Start)).transpose()?;
        let to = non_blank(to).map(|value| parse_bound(value, Edge::End)).transpose()?;

        if let (Some(from), Some(to)) = (from, to)
            && from > to
        {
            return Err(Error::validation(format!(
                "date_from ({}) is after date_to ({})",
                from.format("%Y-%m-%d %H:%M:%S"),
                to.format("%Y-%m-%d %H:%M:%S")
            )));
        }

        Ok(Self { from, to })
    }

    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    /// Whether `timestamp` falls inside the range. A missing timestamp only
    /// matches an unbounded range.
    pub fn contains(&self, timestamp: Option<DateTime<Utc>>) -> bool {
        if self.is_unbounded() {
            return true;
        }
        let Some(timestamp) = timestamp else {
            return false;
        };
        self.from.is_none_or(|from| timestamp >= from) && self.to.is_none_or(|to| timestamp <= to)
    }
}

#[derive(Debug, Clone, Copy)]
enum Edge {
    Start,
    End,
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_bound(value: &str, edge: Edge) -> Result<DateTime<Utc>> {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        let time = match edge {
            Edge::Start => Some(NaiveTime::MIN),
            Edge::End => NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999),
        };
        return time
            .map(|time| date.and_time(time).and_utc())
            .ok_or_else(|| Error::validation(format!("invalid date '{}'", value)));
    }

    value.parse::<DateTime<Utc>>().map_err(|_| {
        Error::validation(format!("invalid date '{}': expected YYYY-MM-DD or RFC3339", value))
    })
}
