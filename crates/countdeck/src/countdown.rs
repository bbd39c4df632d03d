use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::display::{DisplaySink, RenderedDuration};
use crate::error::{CountdownError, InvalidDate, StoreError};
use crate::store::Store;
use crate::timer::{COUNTDOWN_PERIOD_MS, Millis, Ticker};

pub const TARGET_DATE_KEY: &str = "targetDate";
pub const DEFAULT_TARGET_DATE: &str = "2028-10-01T00:00:00";

const MS_PER_DAY: i64 = 86_400_000;
const MS_PER_HOUR: i64 = 3_600_000;
const MS_PER_MINUTE: i64 = 60_000;
const MS_PER_SECOND: i64 = 1_000;

/// Wall-clock forms accepted without an offset, tried in order.
const LOCAL_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// The moment the countdown runs to, with the text it was entered as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetDate {
    raw: String,
    timestamp_ms: Millis,
    /// Wall-clock time in the display time zone, used for labels.
    local: NaiveDateTime,
}

impl TargetDate {
    /// Parse user input. Offset-less forms are wall-clock time in `tz`; a
    /// bare `YYYY-MM-DD` is midnight UTC.
    pub fn parse_in<Tz: TimeZone>(input: &str, tz: &Tz) -> Result<Self, InvalidDate> {
        let raw = input.trim();
        if raw.is_empty() {
            return Err(InvalidDate::Empty);
        }

        let at = if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            dt.with_timezone(&Utc)
        } else if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            let midnight = date
                .and_hms_opt(0, 0, 0)
                .ok_or_else(|| InvalidDate::Unparseable(raw.to_string()))?;
            Utc.from_utc_datetime(&midnight)
        } else {
            let naive = LOCAL_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                .ok_or_else(|| InvalidDate::Unparseable(raw.to_string()))?;
            resolve_local(tz, &naive)
                .ok_or_else(|| InvalidDate::Unparseable(raw.to_string()))?
        };

        Ok(Self {
            raw: raw.to_string(),
            timestamp_ms: at.timestamp_millis(),
            local: at.with_timezone(tz).naive_local(),
        })
    }

    pub fn default_in<Tz: TimeZone>(tz: &Tz) -> Self {
        Self::parse_in(DEFAULT_TARGET_DATE, tz).expect("default target date parses")
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn timestamp_ms(&self) -> Millis {
        self.timestamp_ms
    }

    pub fn is_past(&self, now: Millis) -> bool {
        self.timestamp_ms <= now
    }

    /// `Target Date: October 1, 2028, 12:00:00 AM`
    pub fn date_label(&self) -> String {
        format!(
            "Target Date: {}",
            self.local.format("%B %-d, %Y, %I:%M:%S %p")
        )
    }

    /// `Countdown to October 1, 2028`
    pub fn title(&self) -> String {
        format!("Countdown to {}", self.local.format("%B %-d, %Y"))
    }

    /// The `YYYY-MM-DDTHH:MM` prefix used to pre-fill the date input.
    pub fn input_prefill(&self) -> String {
        self.raw.chars().take(16).collect()
    }
}

/// Map a wall-clock time to an instant. Ambiguous times take the earlier
/// instant; times inside a DST gap move forward an hour.
fn resolve_local<Tz: TimeZone>(tz: &Tz, naive: &NaiveDateTime) -> Option<DateTime<Utc>> {
    tz.from_local_datetime(naive)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(*naive + Duration::hours(1))).earliest())
        .map(|dt| dt.with_timezone(&Utc))
}

/// Time remaining split into whole days and the hours, minutes and seconds
/// left within the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Remaining {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl Remaining {
    /// Split a positive millisecond delta. Returns `None` once the target is
    /// reached (`delta <= 0`).
    pub fn from_delta(delta_ms: i64) -> Option<Self> {
        if delta_ms <= 0 {
            return None;
        }
        Some(Self {
            days: delta_ms / MS_PER_DAY,
            hours: (delta_ms % MS_PER_DAY) / MS_PER_HOUR,
            minutes: (delta_ms % MS_PER_HOUR) / MS_PER_MINUTE,
            seconds: (delta_ms % MS_PER_MINUTE) / MS_PER_SECOND,
        })
    }

    #[cfg(test)]
    fn as_ms(&self) -> i64 {
        self.days * MS_PER_DAY
            + self.hours * MS_PER_HOUR
            + self.minutes * MS_PER_MINUTE
            + self.seconds * MS_PER_SECOND
    }

    pub fn render(&self) -> RenderedDuration {
        RenderedDuration {
            days: self.days.to_string(),
            hours: format!("{:02}", self.hours),
            minutes: format!("{:02}", self.minutes),
            seconds: format!("{:02}", self.seconds),
        }
    }
}

pub fn render_delta(delta_ms: i64) -> RenderedDuration {
    Remaining::from_delta(delta_ms)
        .map(|r| r.render())
        .unwrap_or_else(RenderedDuration::zero)
}

pub struct Countdown {
    target: TargetDate,
    ticker: Ticker,
}

impl Countdown {
    /// Read the persisted target date. A missing or unparseable value falls
    /// back to [`DEFAULT_TARGET_DATE`].
    pub fn load<S: Store, Tz: TimeZone>(store: &S, tz: &Tz, now: Millis) -> Self {
        let target = match store.get(TARGET_DATE_KEY) {
            Some(raw) => TargetDate::parse_in(&raw, tz).unwrap_or_else(|e| {
                tracing::warn!("Stored target date {raw:?} is unusable ({e}), using default");
                TargetDate::default_in(tz)
            }),
            None => TargetDate::default_in(tz),
        };
        tracing::debug!("Counting down to {}", target.raw());
        Self {
            target,
            ticker: Ticker::starting_at(now, COUNTDOWN_PERIOD_MS),
        }
    }

    pub fn target(&self) -> &TargetDate {
        &self.target
    }

    /// Parse `input` and apply it. Nothing changes when parsing fails.
    pub fn set_target<S: Store, D: DisplaySink, Tz: TimeZone>(
        &mut self,
        input: &str,
        tz: &Tz,
        store: &mut S,
        display: &mut D,
        now: Millis,
    ) -> Result<(), CountdownError> {
        let target = TargetDate::parse_in(input, tz)?;
        self.apply_target(target, store, display, now)?;
        Ok(())
    }

    /// Show an already-parsed target, tick, and persist it. A failed save is
    /// returned; the new target stays on screen.
    pub fn apply_target<S: Store, D: DisplaySink>(
        &mut self,
        target: TargetDate,
        store: &mut S,
        display: &mut D,
        now: Millis,
    ) -> Result<(), StoreError> {
        let saved = store
            .set(TARGET_DATE_KEY, target.raw())
            .inspect_err(|e| tracing::warn!("Failed to persist target date: {e}"));
        tracing::info!("Target date set to {}", target.raw());
        self.target = target;
        self.render_labels(display);
        self.tick(display, now);
        self.ticker.reset(now);
        saved
    }

    pub fn render_labels<D: DisplaySink>(&self, display: &mut D) {
        display.set_date_label(&self.target.date_label());
        display.set_title(&self.target.title());
    }

    pub fn tick<D: DisplaySink>(&self, display: &mut D, now: Millis) -> RenderedDuration {
        let fields = render_delta(self.target.timestamp_ms - now);
        display.set_countdown(&fields);
        fields
    }

    /// Tick when the one-second cadence is due. Returns whether it ticked.
    pub fn poll<D: DisplaySink>(&mut self, display: &mut D, now: Millis) -> bool {
        if !self.ticker.poll(now) {
            return false;
        }
        self.tick(display, now);
        true
    }

    pub fn next_tick_in(&self, now: Millis) -> std::time::Duration {
        self.ticker.remaining(now)
    }
}
