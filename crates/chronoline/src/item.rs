//! The timeline item data model.
//!
//! A [`TimelineItem`] is an opaque record: the engine never parses the title
//! or interprets the date format. Those fields exist for the renderer, which
//! decides how to display them.

/// The date-format pattern a renderer should assume when an item with
/// [`TitleFormat::Date`] carries no explicit pattern.
pub const DEFAULT_TITLE_DATE_FORMAT: &str = "YYYY-MM-DD";

/// How a renderer should interpret an item's title string.
///
/// The engine itself treats the title as opaque either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TitleFormat {
    /// Plain text, displayed verbatim.
    #[default]
    Text,
    /// A date value, formatted per the item's pattern (or
    /// [`DEFAULT_TITLE_DATE_FORMAT`]).
    Date,
}

/// One record in the timeline.
///
/// Items are immutable once fetched; there are no setters. Identity is the
/// `id` field, not the positional index; the cache uses it to reject
/// duplicates.
///
/// # Example
///
/// ```
/// use chronoline::item::{TimelineItem, TitleFormat};
///
/// let item = TimelineItem::new(7, "2021-06-01", "Project kickoff")
///     .with_title_format(TitleFormat::Date)
///     .with_tooltip("First planning meeting");
///
/// assert_eq!(item.id(), 7);
/// assert_eq!(item.title_format(), TitleFormat::Date);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineItem {
    id: u64,
    title: String,
    title_format: TitleFormat,
    title_date_format: Option<String>,
    content: String,
    tooltip: Option<String>,
    image_src: Option<String>,
}

impl TimelineItem {
    /// Create an item with the default (plain text) title format.
    pub fn new(id: u64, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            title_format: TitleFormat::default(),
            title_date_format: None,
            content: content.into(),
            tooltip: None,
            image_src: None,
        }
    }

    /// Sets how the renderer should interpret the title.
    pub fn with_title_format(mut self, format: TitleFormat) -> Self {
        self.title_format = format;
        self
    }

    /// Sets an explicit date-format pattern for [`TitleFormat::Date`] titles.
    pub fn with_title_date_format(mut self, pattern: impl Into<String>) -> Self {
        self.title_date_format = Some(pattern.into());
        self
    }

    /// Sets the hover tooltip text.
    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }

    /// Sets an illustration reference displayed next to the item.
    pub fn with_image_src(mut self, src: impl Into<String>) -> Self {
        self.image_src = Some(src.into());
        self
    }

    /// Unique identity of this item.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// The first-row text (usually an event date).
    pub fn title(&self) -> &str {
        &self.title
    }

    /// How the renderer should interpret [`title`](Self::title).
    pub fn title_format(&self) -> TitleFormat {
        self.title_format
    }

    /// Explicit date pattern, if any. Renderers fall back to
    /// [`DEFAULT_TITLE_DATE_FORMAT`] when `None`.
    pub fn title_date_format(&self) -> Option<&str> {
        self.title_date_format.as_deref()
    }

    /// The second-row body text.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Hover tooltip text, if any.
    pub fn tooltip(&self) -> Option<&str> {
        self.tooltip.as_deref()
    }

    /// Illustration reference, if any.
    pub fn image_src(&self) -> Option<&str> {
        self.image_src.as_deref()
    }
}
