use std::time::Duration;

use chrono::TimeZone;

use crate::countdown::{Countdown, TargetDate};
use crate::data_url::FileBlob;
use crate::display::{DisplaySink, RenderedDuration};
use crate::error::{CountdownError, InvalidDate, StoreError};
use crate::slideshow::Slideshow;
use crate::store::Store;
use crate::timer::Millis;

/// One store, one render target and the two controllers that share them.
/// The controllers never see each other; each operation lends them the
/// store and the sink.
pub struct Dashboard<S, D, Tz: TimeZone> {
    store: S,
    display: D,
    tz: Tz,
    countdown: Countdown,
    slideshow: Slideshow,
}

impl<S: Store, D: DisplaySink, Tz: TimeZone> Dashboard<S, D, Tz> {
    /// Load persisted state and render everything once.
    pub fn open(store: S, mut display: D, tz: Tz, advance_interval: Millis, now: Millis) -> Self {
        let mut countdown = Countdown::load(&store, &tz, now);
        countdown.render_labels(&mut display);
        countdown.poll(&mut display, now);

        let mut slideshow = Slideshow::load(&store, advance_interval);
        slideshow.render(&mut display, now);

        Self {
            store,
            display,
            tz,
            countdown,
            slideshow,
        }
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    pub fn slideshow(&self) -> &Slideshow {
        &self.slideshow
    }

    pub fn parse_target(&self, input: &str) -> Result<TargetDate, InvalidDate> {
        TargetDate::parse_in(input, &self.tz)
    }

    pub fn set_target(&mut self, input: &str, now: Millis) -> Result<(), CountdownError> {
        self.countdown
            .set_target(input, &self.tz, &mut self.store, &mut self.display, now)
    }

    pub fn apply_target(&mut self, target: TargetDate, now: Millis) -> Result<(), StoreError> {
        self.countdown
            .apply_target(target, &mut self.store, &mut self.display, now)
    }

    pub fn tick(&mut self, now: Millis) -> RenderedDuration {
        self.countdown.tick(&mut self.display, now)
    }

    pub async fn add_images(&mut self, files: &[FileBlob], now: Millis) -> Result<(), StoreError> {
        self.slideshow
            .add_images(files, &mut self.store, &mut self.display, now)
            .await
    }

    pub fn append_images(&mut self, urls: Vec<String>, now: Millis) -> Result<(), StoreError> {
        self.slideshow
            .append_images(urls, &mut self.store, &mut self.display, now)
    }

    pub fn clear_images(&mut self, now: Millis) {
        self.slideshow
            .clear(&mut self.store, &mut self.display, now);
    }

    pub fn navigate(&mut self, delta: i64, now: Millis) {
        self.slideshow.navigate(delta, &mut self.display, now);
    }

    /// Run whichever timers are due. Returns whether anything re-rendered.
    pub fn poll(&mut self, now: Millis) -> bool {
        let ticked = self.countdown.poll(&mut self.display, now);
        let advanced = self.slideshow.poll(&mut self.display, now);
        ticked || advanced
    }

    /// How long until the next scheduled change.
    pub fn next_wakeup(&self, now: Millis) -> Duration {
        let tick = self.countdown.next_tick_in(now);
        match self.slideshow.next_advance_in(now) {
            Some(advance) => tick.min(advance),
            None => tick,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::countdown::TARGET_DATE_KEY;
    use crate::display::{DisplayState, SlideImage};
    use crate::slideshow::SLIDESHOW_KEY;
    use crate::store::{DEFAULT_QUOTA_BYTES, FileStore, MemoryStore};
    use crate::timer::{Clock, DEFAULT_ADVANCE_MS, ManualClock};
    use chrono::Utc;

    fn at(input: &str) -> Millis {
        TargetDate::parse_in(input, &Utc).unwrap().timestamp_ms()
    }

    fn open(store: MemoryStore, now: Millis) -> Dashboard<MemoryStore, DisplayState, Utc> {
        Dashboard::open(store, DisplayState::default(), Utc, DEFAULT_ADVANCE_MS, now)
    }

    #[test]
    fn test_open_renders_defaults() {
        let dash = open(MemoryStore::new(), at("2028-09-30T23:00:00"));
        let display = dash.display();
        assert_eq!(display.title, "Countdown to October 1, 2028");
        assert_eq!(
            display.date_label,
            "Target Date: October 1, 2028, 12:00:00 AM"
        );
        assert_eq!(display.countdown.days, "0");
        assert_eq!(display.countdown.hours, "01");
        assert_eq!(display.countdown.minutes, "00");
        assert_eq!(display.countdown.seconds, "00");
        assert_eq!(display.slide.image, SlideImage::Placeholder);
    }

    #[test]
    fn test_open_restores_persisted_state() {
        let mut store = MemoryStore::new();
        store.set(TARGET_DATE_KEY, "2030-01-01T00:00").unwrap();
        store
            .set(SLIDESHOW_KEY, r#"["data:image/png;base64,AA==","data:image/png;base64,AQ=="]"#)
            .unwrap();

        let dash = open(store, at("2029-12-31T00:00:00"));
        assert_eq!(dash.display().countdown.days, "1");
        assert_eq!(dash.display().slide.indicator.as_deref(), Some("1 / 2"));
        assert_eq!(dash.slideshow().len(), 2);
    }

    #[test]
    fn test_poll_drives_both_timers() {
        let mut store = MemoryStore::new();
        store
            .set(SLIDESHOW_KEY, r#"["data:,a","data:,b","data:,c"]"#)
            .unwrap();
        let clock = ManualClock::at(at("2028-09-30T23:00:00"));
        let mut dash = open(store, clock.now_ms());

        assert_eq!(dash.next_wakeup(clock.now_ms()), Duration::from_secs(1));
        assert!(!dash.poll(clock.now_ms()));

        for _ in 0..5 {
            clock.advance(1_000);
            assert!(dash.poll(clock.now_ms()));
        }
        assert_eq!(dash.slideshow().index(), 1);
        assert_eq!(dash.display().slide.indicator.as_deref(), Some("2 / 3"));
        assert_eq!(dash.display().countdown.minutes, "59");
        assert_eq!(dash.display().countdown.seconds, "55");
    }

    #[test]
    fn test_set_target_then_navigate() {
        let mut store = MemoryStore::new();
        store
            .set(SLIDESHOW_KEY, r#"["data:,a","data:,b","data:,c"]"#)
            .unwrap();
        let now = at("2030-01-01T00:00:00");
        let mut dash = open(store, now);

        dash.set_target("2030-01-01T00:00:30", now).unwrap();
        assert_eq!(dash.display().countdown.seconds, "30");
        assert!(dash.set_target("garbage", now).is_err());
        assert_eq!(dash.countdown().target().raw(), "2030-01-01T00:00:30");

        dash.navigate(-1, now);
        assert_eq!(dash.slideshow().index(), 2);
        dash.clear_images(now);
        assert_eq!(dash.display().slide.image, SlideImage::Placeholder);
        assert_eq!(dash.next_wakeup(now + 200), Duration::from_millis(800));
    }

    #[test]
    fn test_past_target_via_parse_and_apply() {
        let now = at("2030-01-01T00:00:00");
        let mut dash = open(MemoryStore::new(), now);
        let target = dash.parse_target("2029-06-01T00:00").unwrap();
        assert!(target.is_past(now));

        dash.apply_target(target, now).unwrap();
        assert_eq!(dash.tick(now + 1_000), RenderedDuration::zero());
        assert_eq!(dash.display().countdown, RenderedDuration::zero());
    }

    #[test]
    fn test_unwritable_store_fails_set_target() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::create_dir(&path).unwrap();

        let now = at("2029-01-01T00:00:00");
        let store = FileStore::open(&path, DEFAULT_QUOTA_BYTES);
        let mut dash = Dashboard::open(store, DisplayState::default(), Utc, DEFAULT_ADVANCE_MS, now);

        let err = dash.set_target("2030-01-01T00:00", now).unwrap_err();
        assert!(matches!(err, CountdownError::Store(StoreError::Io(_))));
        assert_eq!(dash.display().title, "Countdown to January 1, 2030");

        std::fs::remove_dir(&path).unwrap();
        let reopened = FileStore::open(&path, DEFAULT_QUOTA_BYTES);
        assert_eq!(reopened.get(TARGET_DATE_KEY), None);
    }
}
