use std::sync::Arc;

/// The four countdown fields as they are shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDuration {
    pub days: String,
    pub hours: String,
    pub minutes: String,
    pub seconds: String,
}

impl RenderedDuration {
    /// All fields `"0"` (unpadded), shown once the target has passed.
    pub fn zero() -> Self {
        Self {
            days: "0".to_string(),
            hours: "0".to_string(),
            minutes: "0".to_string(),
            seconds: "0".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlideImage {
    Placeholder,
    /// An embedded `data:` reference, shared so clones stay cheap.
    Embedded(Arc<str>),
}

/// What the slide area shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideView {
    pub image: SlideImage,
    pub controls_visible: bool,
    /// `position / total`, only present with more than one slide.
    pub indicator: Option<String>,
}

impl SlideView {
    pub fn placeholder() -> Self {
        Self {
            image: SlideImage::Placeholder,
            controls_visible: false,
            indicator: None,
        }
    }
}

/// Render target for both controllers.
pub trait DisplaySink {
    fn set_title(&mut self, text: &str);
    fn set_date_label(&mut self, text: &str);
    fn set_countdown(&mut self, fields: &RenderedDuration);
    fn set_slide(&mut self, view: &SlideView);
}

/// Keeps the last value written to every render target. The window draws
/// from it each frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayState {
    pub title: String,
    pub date_label: String,
    pub countdown: RenderedDuration,
    pub slide: SlideView,
}

impl Default for DisplayState {
    fn default() -> Self {
        Self {
            title: String::new(),
            date_label: String::new(),
            countdown: RenderedDuration::zero(),
            slide: SlideView::placeholder(),
        }
    }
}

impl DisplaySink for DisplayState {
    fn set_title(&mut self, text: &str) {
        self.title = text.to_string();
    }

    fn set_date_label(&mut self, text: &str) {
        self.date_label = text.to_string();
    }

    fn set_countdown(&mut self, fields: &RenderedDuration) {
        self.countdown = fields.clone();
    }

    fn set_slide(&mut self, view: &SlideView) {
        self.slide = view.clone();
    }
}
