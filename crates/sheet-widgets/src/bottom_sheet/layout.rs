#![forbid(unsafe_code)]

//! Content measurement glue and panel geometry.
//!
//! [`LayoutObserver`] turns raw content measurements into the content height
//! the controller works with. [`SheetLayout`] places the panel, its drag
//! indicator, the close control, and the keyboard spacer for a given offset,
//! and resolves pointer positions to the region they land on.
//!
//! ```text
//!   viewport.height + offset ──► ┌──────[ indicator ]──────┐  5 + 3 gap
//!                                ╭─────────────────────────╮
//!                                │ 16 ┌──────────────[x]┐  │  close 24×24
//!                                │    │    children     │  │
//!                                │    ├─────────────────┤  │
//!                                │    │ keyboard spacer │  │
//!                                ╰─────────────────────────╯
//! ```

use sheet_core::geometry::{Point, Rect, Size};

use super::style::SheetStyle;

/// Width of the drag indicator.
pub const INDICATOR_WIDTH: f64 = 80.0;
/// Height of the drag indicator.
pub const INDICATOR_HEIGHT: f64 = 5.0;
/// Gap between the indicator and the panel.
pub const INDICATOR_GAP: f64 = 3.0;
/// Inner padding of the panel.
pub const CONTENT_PADDING: f64 = 16.0;
/// Radius of the panel's top corners.
pub const CORNER_RADIUS: f64 = 20.0;
/// Side of the square close control.
pub const CLOSE_ICON_SIZE: f64 = 24.0;
/// Default margin added to every measurement.
pub const DEFAULT_SAFETY_MARGIN: f64 = 70.0;

/// Converts layout passes into content heights.
///
/// Each measurement replaces the previous one; only changes are reported.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutObserver {
    margin: f64,
    last: Option<f64>,
}

impl Default for LayoutObserver {
    fn default() -> Self {
        Self::new(DEFAULT_SAFETY_MARGIN)
    }
}

impl LayoutObserver {
    /// Create an observer adding `margin` to every measurement.
    #[must_use]
    pub fn new(margin: f64) -> Self {
        Self {
            margin: if margin.is_finite() { margin.max(0.0) } else { 0.0 },
            last: None,
        }
    }

    /// Margin added to measurements.
    #[inline]
    pub fn margin(&self) -> f64 {
        self.margin
    }

    /// Last reported content height.
    #[inline]
    pub fn last(&self) -> Option<f64> {
        self.last
    }

    /// Feed one measurement. Returns the new content height if it changed.
    pub fn observe(&mut self, measured: f64) -> Option<f64> {
        let measured = if measured.is_finite() { measured.max(0.0) } else { 0.0 };
        let height = measured + self.margin;
        if self.last == Some(height) {
            return None;
        }
        self.last = Some(height);
        Some(height)
    }

    /// Forget the last measurement so the next one is always reported.
    pub fn reset(&mut self) {
        self.last = None;
    }
}

/// Region a pointer position falls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetHit {
    /// The close control.
    CloseIcon,
    /// The draggable panel (indicator band included).
    Panel,
    /// Outside the panel: the dimmed backdrop.
    Backdrop,
}

/// Computed geometry of the sheet for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SheetLayout {
    /// Viewport the sheet is laid out in.
    pub viewport: Rect,
    /// Whole draggable container: indicator band plus panel.
    pub container: Rect,
    /// Drag indicator, when shown.
    pub indicator: Option<Rect>,
    /// Rounded panel surface.
    pub panel: Rect,
    /// Panel interior after padding.
    pub content: Rect,
    /// Close control, when shown.
    pub close_icon: Option<Rect>,
    /// Space reserved above the keyboard, at the bottom of the shown region.
    pub keyboard_spacer: Rect,
}

impl SheetLayout {
    /// Lay out the sheet at `offset` inside `viewport`.
    ///
    /// The container's top edge sits at `viewport.height + offset`. The panel
    /// extends at least to the bottom of the viewport so dragging up to the
    /// overshoot cap never reveals a gap under it.
    pub fn compute(
        viewport: Size,
        offset: f64,
        content_height: f64,
        keyboard_height: f64,
        style: &SheetStyle,
    ) -> Self {
        let viewport_rect = Rect::from_size(viewport);
        let top = viewport.height + offset;
        let content_height = content_height.max(0.0);
        let keyboard_height = keyboard_height.max(0.0);

        let (indicator, panel_top) = if style.line_above {
            let x = (viewport.width - INDICATOR_WIDTH) / 2.0;
            (
                Some(Rect::new(x, top, INDICATOR_WIDTH, INDICATOR_HEIGHT)),
                top + INDICATOR_HEIGHT + INDICATOR_GAP,
            )
        } else {
            (None, top)
        };

        let panel_height = content_height.max(viewport.height - panel_top);
        let panel = Rect::new(0.0, panel_top, viewport.width, panel_height);
        let container = Rect::new(0.0, top, viewport.width, panel.bottom() - top);
        let content = panel.inset(CONTENT_PADDING);

        let close_icon = style.close_icon.then(|| {
            Rect::new(
                content.right() - CLOSE_ICON_SIZE,
                content.y,
                CLOSE_ICON_SIZE,
                CLOSE_ICON_SIZE,
            )
        });

        let spacer_height = keyboard_height.min(content_height);
        let keyboard_spacer = Rect::new(
            content.x,
            panel_top + content_height - spacer_height,
            content.width,
            spacer_height,
        );

        Self {
            viewport: viewport_rect,
            container,
            indicator,
            panel,
            content,
            close_icon,
            keyboard_spacer,
        }
    }

    /// Resolve a pointer position.
    pub fn hit_test(&self, point: Point) -> SheetHit {
        if self.close_icon.is_some_and(|r| r.contains(point)) {
            SheetHit::CloseIcon
        } else if self.container.contains(point) {
            SheetHit::Panel
        } else {
            SheetHit::Backdrop
        }
    }

    /// Part of the container currently inside the viewport.
    pub fn visible_height(&self) -> f64 {
        (self.viewport.bottom().min(self.container.bottom()) - self.container.y.max(0.0)).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Size = Size::new(390.0, 844.0);

    #[test]
    fn observer_adds_margin() {
        let mut obs = LayoutObserver::default();
        assert_eq!(obs.observe(330.0), Some(400.0));
        assert_eq!(obs.last(), Some(400.0));
    }

    #[test]
    fn observer_replaces_instead_of_accumulating() {
        let mut obs = LayoutObserver::new(70.0);
        obs.observe(330.0);
        assert_eq!(obs.observe(380.0), Some(450.0));
        assert_eq!(obs.observe(100.0), Some(170.0));
    }

    #[test]
    fn observer_suppresses_repeats() {
        let mut obs = LayoutObserver::new(70.0);
        assert_eq!(obs.observe(10.0), Some(80.0));
        assert_eq!(obs.observe(10.0), None);
        obs.reset();
        assert_eq!(obs.observe(10.0), Some(80.0));
    }

    #[test]
    fn observer_sanitizes_measurements() {
        let mut obs = LayoutObserver::new(70.0);
        assert_eq!(obs.observe(-5.0), Some(70.0));
        assert_eq!(obs.observe(f64::NAN), None);
        assert_eq!(LayoutObserver::new(f64::INFINITY).margin(), 0.0);
    }

    #[test]
    fn hidden_sheet_sits_below_viewport() {
        let layout = SheetLayout::compute(VIEWPORT, 0.0, 400.0, 0.0, &SheetStyle::default());
        assert_eq!(layout.container.y, 844.0);
        assert_eq!(layout.visible_height(), 0.0);
    }

    #[test]
    fn shown_sheet_geometry() {
        let layout = SheetLayout::compute(VIEWPORT, -400.0, 400.0, 0.0, &SheetStyle::default());
        assert_eq!(layout.container.y, 444.0);

        let indicator = layout.indicator.expect("indicator");
        assert_eq!(indicator, Rect::new(155.0, 444.0, 80.0, 5.0));

        assert_eq!(layout.panel.y, 452.0);
        assert_eq!(layout.panel.height, 400.0);
        assert_eq!(layout.content, Rect::new(16.0, 468.0, 358.0, 368.0));

        let close = layout.close_icon.expect("close icon");
        assert_eq!(close, Rect::new(350.0, 468.0, 24.0, 24.0));
        assert_eq!(layout.visible_height(), 400.0);
    }

    #[test]
    fn optional_parts_can_be_disabled() {
        let style = SheetStyle::default().close_icon(false).line_above(false);
        let layout = SheetLayout::compute(VIEWPORT, -400.0, 400.0, 0.0, &style);
        assert!(layout.indicator.is_none());
        assert!(layout.close_icon.is_none());
        assert_eq!(layout.panel.y, 444.0);
    }

    #[test]
    fn panel_reaches_viewport_bottom_on_overshoot() {
        let layout = SheetLayout::compute(VIEWPORT, -420.0, 400.0, 0.0, &SheetStyle::default());
        assert!(layout.panel.bottom() >= 844.0);
    }

    #[test]
    fn keyboard_spacer_at_bottom_of_shown_region() {
        let layout =
            SheetLayout::compute(VIEWPORT, -650.0, 650.0, 250.0, &SheetStyle::default());
        assert_eq!(layout.keyboard_spacer.height, 250.0);
        assert_eq!(layout.keyboard_spacer.bottom(), layout.panel.y + 650.0);
    }

    #[test]
    fn keyboard_spacer_never_exceeds_content() {
        let layout = SheetLayout::compute(VIEWPORT, -100.0, 100.0, 250.0, &SheetStyle::default());
        assert_eq!(layout.keyboard_spacer.height, 100.0);
    }

    #[test]
    fn hit_test_regions() {
        let layout = SheetLayout::compute(VIEWPORT, -400.0, 400.0, 0.0, &SheetStyle::default());
        assert_eq!(layout.hit_test(Point::new(360.0, 470.0)), SheetHit::CloseIcon);
        assert_eq!(layout.hit_test(Point::new(100.0, 600.0)), SheetHit::Panel);
        // Indicator band beside the indicator still belongs to the container.
        assert_eq!(layout.hit_test(Point::new(10.0, 446.0)), SheetHit::Panel);
        assert_eq!(layout.hit_test(Point::new(100.0, 200.0)), SheetHit::Backdrop);
    }

    #[test]
    fn hidden_sheet_hits_backdrop_everywhere() {
        let layout = SheetLayout::compute(VIEWPORT, 0.0, 400.0, 0.0, &SheetStyle::default());
        assert_eq!(layout.hit_test(Point::new(100.0, 843.0)), SheetHit::Backdrop);
    }
}
