use std::sync::Arc;

use crate::data_url::{self, FileBlob};
use crate::display::{DisplaySink, SlideImage, SlideView};
use crate::error::{DecodeFailure, StoreError};
use crate::store::Store;
use crate::timer::{AutoAdvance, Millis};

pub const SLIDESHOW_KEY: &str = "slideshowImages";

pub const SAVE_WARNING: &str =
    "Could not save images: storage limit may be exceeded. Try using fewer or smaller images.";

/// Read the persisted image collection.
pub fn decode_collection(raw: &str) -> Result<Vec<String>, DecodeFailure> {
    Ok(serde_json::from_str(raw)?)
}

/// Read the persisted collection, treating anything unreadable as empty.
pub fn load_initial<S: Store>(store: &S) -> Vec<String> {
    let Some(raw) = store.get(SLIDESHOW_KEY) else {
        return Vec::new();
    };
    decode_collection(&raw).unwrap_or_else(|e| {
        tracing::debug!("{e}");
        Vec::new()
    })
}

pub struct Slideshow {
    images: Vec<String>,
    index: usize,
    timer: AutoAdvance,
    interval: Millis,
}

impl Slideshow {
    pub fn new(images: Vec<String>, interval: Millis) -> Self {
        Self {
            images,
            index: 0,
            timer: AutoAdvance::Stopped,
            interval,
        }
    }

    pub fn load<S: Store>(store: &S, interval: Millis) -> Self {
        let images = load_initial(store);
        tracing::debug!("Loaded {} slide(s)", images.len());
        Self::new(images, interval)
    }

    pub fn images(&self) -> &[String] {
        &self.images
    }

    #[cfg(test)]
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    #[cfg(test)]
    pub fn timer(&self) -> AutoAdvance {
        self.timer
    }

    /// Convert `files` concurrently and append them. Zero files is a no-op.
    /// A failed save is returned but the new slides stay in memory.
    pub async fn add_images<S: Store, D: DisplaySink>(
        &mut self,
        files: &[FileBlob],
        store: &mut S,
        display: &mut D,
        now: Millis,
    ) -> Result<(), StoreError> {
        if files.is_empty() {
            return Ok(());
        }
        let urls = data_url::read_all(files).await;
        self.append_images(urls, store, display, now)
    }

    /// Append already-converted images, restart from the first slide and
    /// persist.
    pub fn append_images<S: Store, D: DisplaySink>(
        &mut self,
        urls: Vec<String>,
        store: &mut S,
        display: &mut D,
        now: Millis,
    ) -> Result<(), StoreError> {
        tracing::info!("Adding {} slide(s)", urls.len());
        self.images.extend(urls);
        self.index = 0;
        self.timer.stop();
        let saved = self.save(store);
        self.render(display, now);
        saved
    }

    pub fn clear<S: Store, D: DisplaySink>(&mut self, store: &mut S, display: &mut D, now: Millis) {
        self.images.clear();
        self.index = 0;
        self.timer.stop();
        store.remove(SLIDESHOW_KEY);
        self.render(display, now);
    }

    /// Move by `delta` slides, wrapping in both directions. Manual navigation
    /// restarts the auto-advance cycle.
    pub fn navigate<D: DisplaySink>(&mut self, delta: i64, display: &mut D, now: Millis) {
        if self.images.is_empty() {
            return;
        }
        let len = self.images.len() as i64;
        self.index = (self.index as i64 + delta).rem_euclid(len) as usize;
        self.timer.stop();
        self.render(display, now);
    }

    pub fn render<D: DisplaySink>(&mut self, display: &mut D, now: Millis) {
        display.set_slide(&self.view());
        if self.images.len() > 1 {
            self.timer.start(now, self.interval);
        } else {
            self.timer.stop();
        }
    }

    /// Advance one slide when the auto-advance timer is due.
    pub fn poll<D: DisplaySink>(&mut self, display: &mut D, now: Millis) -> bool {
        if !self.timer.fire(now, self.interval) {
            return false;
        }
        self.index = (self.index + 1) % self.images.len();
        self.render(display, now);
        true
    }

    pub fn next_advance_in(&self, now: Millis) -> Option<std::time::Duration> {
        self.timer.remaining(now)
    }

    pub fn view(&self) -> SlideView {
        match self.images.get(self.index) {
            None => SlideView::placeholder(),
            Some(url) => {
                let many = self.images.len() > 1;
                SlideView {
                    image: SlideImage::Embedded(Arc::from(url.as_str())),
                    controls_visible: many,
                    indicator: many.then(|| format!("{} / {}", self.index + 1, self.images.len())),
                }
            }
        }
    }

    fn save<S: Store>(&self, store: &mut S) -> Result<(), StoreError> {
        let json = serde_json::to_string(&self.images)?;
        store.set(SLIDESHOW_KEY, &json).inspect_err(|e| {
            tracing::warn!("Could not save {} slide(s): {e}", self.images.len());
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::DisplayState;
    use crate::store::MemoryStore;
    use crate::timer::DEFAULT_ADVANCE_MS;

    fn slides(n: usize) -> Vec<String> {
        (0..n)
            .map(|i| format!("data:image/png;base64,{}", "A".repeat(4 * (i + 1))))
            .collect()
    }

    fn rendered(n: usize) -> (Slideshow, DisplayState) {
        let mut show = Slideshow::new(slides(n), DEFAULT_ADVANCE_MS);
        let mut display = DisplayState::default();
        show.render(&mut display, 0);
        (show, display)
    }

    #[test]
    fn test_empty_collection_shows_placeholder() {
        let (show, display) = rendered(0);
        assert_eq!(display.slide.image, SlideImage::Placeholder);
        assert!(!display.slide.controls_visible);
        assert_eq!(display.slide.indicator, None);
        assert!(!show.timer().is_running());
    }

    #[test]
    fn test_single_image_has_no_controls_or_timer() {
        let (show, display) = rendered(1);
        assert_eq!(display.slide.image, SlideImage::Embedded(slides(1)[0].as_str().into()));
        assert!(!display.slide.controls_visible);
        assert_eq!(display.slide.indicator, None);
        assert!(!show.timer().is_running());
    }

    #[test]
    fn test_multiple_images_show_controls_and_start_timer() {
        let (show, display) = rendered(3);
        assert!(display.slide.controls_visible);
        assert_eq!(display.slide.indicator.as_deref(), Some("1 / 3"));
        assert_eq!(show.timer(), AutoAdvance::Running { next_due: 5_000 });
    }

    #[test]
    fn test_navigate_back_from_first_wraps_to_last() {
        let (mut show, mut display) = rendered(3);
        show.navigate(-1, &mut display, 0);
        assert_eq!(show.index(), 2);
        assert_eq!(display.slide.indicator.as_deref(), Some("3 / 3"));
    }

    #[test]
    fn test_navigate_is_modular_for_any_delta() {
        for len in 1..=5usize {
            for k in -12i64..=12 {
                let (mut a, mut da) = rendered(len);
                let (mut b, mut db) = rendered(len);
                a.navigate(k, &mut da, 0);
                b.navigate(k.rem_euclid(len as i64), &mut db, 0);
                assert_eq!(a.index(), b.index(), "len={len} k={k}");
                assert!(a.index() < len);
            }
        }
    }

    #[test]
    fn test_navigate_empty_is_noop() {
        let (mut show, mut display) = rendered(0);
        let before = display.clone();
        show.navigate(1, &mut display, 0);
        assert_eq!(show.index(), 0);
        assert_eq!(display, before);
    }

    #[test]
    fn test_navigate_restarts_cycle() {
        let (mut show, mut display) = rendered(3);
        show.navigate(1, &mut display, 4_000);
        assert_eq!(show.timer(), AutoAdvance::Running { next_due: 9_000 });
        assert!(!show.poll(&mut display, 5_000));
        assert!(show.poll(&mut display, 9_000));
        assert_eq!(show.index(), 2);
    }

    #[test]
    fn test_auto_advance_wraps() {
        let (mut show, mut display) = rendered(2);
        assert!(show.poll(&mut display, 5_000));
        assert_eq!(show.index(), 1);
        assert!(show.poll(&mut display, 10_000));
        assert_eq!(show.index(), 0);
        assert_eq!(display.slide.indicator.as_deref(), Some("1 / 2"));
        assert_eq!(
            show.next_advance_in(12_000),
            Some(std::time::Duration::from_millis(3_000))
        );
    }

    #[test]
    fn test_clear_twice_matches_clear_once() {
        let mut store = MemoryStore::new();
        let (mut show, mut display) = rendered(3);
        show.save(&mut store).unwrap();

        show.clear(&mut store, &mut display, 1_000);
        let once = display.clone();
        assert_eq!(store.get(SLIDESHOW_KEY), None);

        show.clear(&mut store, &mut display, 2_000);
        assert_eq!(display, once);
        assert_eq!(once.slide, SlideView::placeholder());
        assert!(show.is_empty());
        assert!(!show.timer().is_running());
    }

    #[test]
    fn test_append_resets_index_and_persists_in_order() {
        let mut store = MemoryStore::new();
        let (mut show, mut display) = rendered(2);
        show.navigate(1, &mut display, 0);

        let extra = vec!["data:image/gif;base64,R0lG".to_string()];
        show.append_images(extra.clone(), &mut store, &mut display, 7_000)
            .unwrap();

        assert_eq!(show.index(), 0);
        assert_eq!(show.len(), 3);
        assert_eq!(show.timer(), AutoAdvance::Running { next_due: 12_000 });
        let mut expected = slides(2);
        expected.extend(extra);
        assert_eq!(load_initial(&store), expected);
    }

    #[test]
    fn test_quota_failure_keeps_images_in_memory() {
        let mut store = MemoryStore::with_quota(32);
        let (mut show, mut display) = rendered(0);

        let err = show
            .append_images(slides(3), &mut store, &mut display, 0)
            .unwrap_err();
        assert!(matches!(err, StoreError::QuotaExceeded { .. }));
        assert_eq!(show.len(), 3);
        assert_eq!(display.slide.indicator.as_deref(), Some("1 / 3"));
        assert_eq!(store.get(SLIDESHOW_KEY), None);
    }

    #[test]
    fn test_malformed_persisted_collection_loads_empty() {
        let mut store = MemoryStore::new();
        for bad in ["not json", "{\"a\":1}", "[1, 2]", "[\"ok\","] {
            store.set(SLIDESHOW_KEY, bad).unwrap();
            assert!(load_initial(&store).is_empty(), "{bad}");
        }
        assert!(decode_collection("[\"data:,x\"]").is_ok());
    }

    #[tokio::test]
    async fn test_add_images_roundtrip_through_store() {
        let dir = tempfile::tempdir().unwrap();
        let f1 = dir.path().join("f1.png");
        let f2 = dir.path().join("f2.jpg");
        std::fs::write(&f1, b"first").unwrap();
        std::fs::write(&f2, b"second").unwrap();

        let mut store = MemoryStore::new();
        let mut display = DisplayState::default();
        let mut show = Slideshow::load(&store, DEFAULT_ADVANCE_MS);

        show.add_images(
            &[FileBlob::Path(f1), FileBlob::Path(f2)],
            &mut store,
            &mut display,
            0,
        )
        .await
        .unwrap();

        let stored = load_initial(&store);
        assert_eq!(stored.len(), 2);
        assert_eq!(data_url::decode(&stored[0]).unwrap().bytes, b"first");
        assert_eq!(data_url::decode(&stored[1]).unwrap().bytes, b"second");
        assert_eq!(stored, show.images());
    }

    #[tokio::test]
    async fn test_add_zero_images_is_noop() {
        let mut store = MemoryStore::new();
        let (mut show, mut display) = rendered(2);
        show.navigate(1, &mut display, 0);

        show.add_images(&[], &mut store, &mut display, 0).await.unwrap();
        assert_eq!(show.index(), 1);
        assert_eq!(store.get(SLIDESHOW_KEY), None);
    }

    #[test]
    fn test_cloned_view_shares_image() {
        let (_, display) = rendered(2);
        let copy = display.slide.clone();
        match (&display.slide.image, &copy.image) {
            (SlideImage::Embedded(a), SlideImage::Embedded(b)) => assert!(Arc::ptr_eq(a, b)),
            _ => panic!("expected an embedded slide"),
        }
    }
}
