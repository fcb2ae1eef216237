//! Viewer state machine
//!
//! Tracks the transient display state of one open document: current page,
//! zoom factor, and rotation. Nothing here is persisted; a state instance
//! lives only as long as the viewing session and is bound to the page
//! count of the document it displays.
//!
//! All transitions are pure, synchronous, total functions. Out-of-range
//! requests clamp instead of failing.

/// Default zoom factor for a freshly opened document
pub const DEFAULT_ZOOM: f32 = 1.0;

/// Zoom limits and step size, usually taken from [`Config::zoom_bounds`]
///
/// [`Config::zoom_bounds`]: crate::config::Config::zoom_bounds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomBounds {
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl Default for ZoomBounds {
    fn default() -> Self {
        Self {
            min: 0.5,
            max: 3.0,
            step: 0.2,
        }
    }
}

impl ZoomBounds {
    /// Clamp a zoom factor into this range
    pub fn clamp(&self, zoom: f32) -> f32 {
        zoom.clamp(self.min, self.max)
    }
}

/// Display state of one open document
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerState {
    page: u32,
    total_pages: u32,
    zoom: f32,
    rotation: u16,
    bounds: ZoomBounds,
}

impl ViewerState {
    /// Open a document with the default zoom bounds, at page 1
    pub fn new(total_pages: u32) -> Self {
        Self::with_bounds(total_pages, ZoomBounds::default())
    }

    /// Open a document with specific zoom bounds, at page 1
    pub fn with_bounds(total_pages: u32, bounds: ZoomBounds) -> Self {
        Self {
            page: 1,
            total_pages,
            zoom: bounds.clamp(DEFAULT_ZOOM),
            rotation: 0,
            bounds,
        }
    }

    /// Current page, 1-indexed
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Total pages of the open document
    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// Current zoom factor
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Current rotation in degrees: 0, 90, 180, or 270
    pub fn rotation(&self) -> u16 {
        self.rotation
    }

    /// Whether the first page is showing
    pub fn at_first_page(&self) -> bool {
        self.page <= 1
    }

    /// Whether the last page is showing
    pub fn at_last_page(&self) -> bool {
        self.page >= self.last_page()
    }

    /// Advance one page, clamped to the last page
    pub fn next_page(&mut self) {
        self.page = (self.page + 1).min(self.last_page());
    }

    /// Go back one page, clamped to page 1
    pub fn prev_page(&mut self) {
        self.page = self.page.saturating_sub(1).max(1);
    }

    /// Jump to the first page
    pub fn first_page(&mut self) {
        self.page = 1;
    }

    /// Jump to the last page
    pub fn last_page_jump(&mut self) {
        self.page = self.last_page();
    }

    /// Jump to a specific page, clamped to [1, total]
    pub fn go_to(&mut self, page: u32) {
        self.page = page.clamp(1, self.last_page());
    }

    /// Zoom in one step, clamped to the configured maximum
    pub fn zoom_in(&mut self) {
        self.zoom = self.bounds.clamp(self.zoom + self.bounds.step);
    }

    /// Zoom out one step, clamped to the configured minimum
    pub fn zoom_out(&mut self) {
        self.zoom = self.bounds.clamp(self.zoom - self.bounds.step);
    }

    /// Rotate clockwise by 90 degrees, wrapping past 360
    pub fn rotate(&mut self) {
        self.rotation = (self.rotation + 90) % 360;
    }

    /// Return to page 1, default zoom, no rotation
    pub fn reset(&mut self) {
        self.page = 1;
        self.zoom = self.bounds.clamp(DEFAULT_ZOOM);
        self.rotation = 0;
    }

    /// Upper page bound; a zero-page document still shows a page-1 frame
    fn last_page(&self) -> u32 {
        self.total_pages.max(1)
    }
}
