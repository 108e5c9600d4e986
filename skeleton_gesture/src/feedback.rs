//! On-screen joint markers.
//!
//! The pipeline reports where the head and hands are, and whether each hand's
//! gesture is latched, through [`FeedbackSink`].  [`MarkerOverlay`] is the
//! renderer-independent state a window draws from.

use crate::joint::Vec3;

// ════════════════════════════════════════════════════════════════════════════
// Coordinates
// ════════════════════════════════════════════════════════════════════════════

/// A point in display (color image) pixels, origin top-left.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DisplayPoint {
    pub x: f32,
    pub y: f32,
}

/// Projection from sensor body space onto the display.  Supplied by the
/// sensor, since it depends on the camera's intrinsics.
pub trait CoordinateMapper {
    fn map(&self, position: Vec3) -> DisplayPoint;
}

// ════════════════════════════════════════════════════════════════════════════
// Markers
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Marker {
    Head,
    LeftHand,
    RightHand,
}

impl Marker {
    pub const ALL: [Marker; 3] = [Marker::Head, Marker::LeftHand, Marker::RightHand];

    fn index(self) -> usize {
        match self {
            Marker::Head      => 0,
            Marker::LeftHand  => 1,
            Marker::RightHand => 2,
        }
    }
}

/// Size and color of a marker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MarkerStyle {
    /// Diameter in pixels.
    pub diameter: u32,
    /// Packed ARGB.
    pub color:    u32,
}

impl MarkerStyle {
    pub const ACTIVE:   MarkerStyle = MarkerStyle { diameter: 60, color: 0xFF00FF00 };
    pub const INACTIVE: MarkerStyle = MarkerStyle { diameter: 20, color: 0xFFFF0000 };

    pub fn for_highlight(highlighted: bool) -> Self {
        if highlighted { Self::ACTIVE } else { Self::INACTIVE }
    }
}

/// Receives marker updates from the pipeline.
pub trait FeedbackSink {
    fn place_marker(&mut self, marker: Marker, at: DisplayPoint, highlighted: bool);
}

/// Where one marker was last drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MarkerPlacement {
    pub center: DisplayPoint,
    pub style:  MarkerStyle,
}

// ════════════════════════════════════════════════════════════════════════════
// MarkerOverlay
// ════════════════════════════════════════════════════════════════════════════

/// State of the three markers plus the user's show/hide choice.
///
/// Placements keep updating while hidden so the markers reappear in the right
/// place.
#[derive(Clone, Debug)]
pub struct MarkerOverlay {
    placements: [Option<MarkerPlacement>; 3],
    visible:    bool,
}

impl Default for MarkerOverlay {
    fn default() -> Self {
        MarkerOverlay { placements: [None; 3], visible: true }
    }
}

impl MarkerOverlay {
    pub fn new() -> Self { Self::default() }

    pub fn is_visible(&self) -> bool { self.visible }

    pub fn show(&mut self) { self.visible = true; }
    pub fn hide(&mut self) { self.visible = false; }

    /// Flip visibility and return the new value.
    pub fn toggle(&mut self) -> bool {
        self.visible = !self.visible;
        self.visible
    }

    pub fn placement(&self, marker: Marker) -> Option<MarkerPlacement> {
        self.placements[marker.index()]
    }

    /// Placements to draw; empty while hidden.
    pub fn visible_markers(&self) -> impl Iterator<Item = (Marker, MarkerPlacement)> + '_ {
        Marker::ALL
            .into_iter()
            .filter(move |_| self.visible)
            .filter_map(move |m| self.placement(m).map(|p| (m, p)))
    }
}

impl FeedbackSink for MarkerOverlay {
    fn place_marker(&mut self, marker: Marker, at: DisplayPoint, highlighted: bool) {
        self.placements[marker.index()] = Some(MarkerPlacement {
            center: at,
            style:  MarkerStyle::for_highlight(highlighted),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(x: f32, y: f32) -> DisplayPoint { DisplayPoint { x, y } }

    #[test]
    fn toggle_twice_restores_visibility() {
        let mut overlay = MarkerOverlay::new();
        let before = overlay.is_visible();
        overlay.toggle();
        assert_ne!(overlay.is_visible(), before);
        overlay.toggle();
        assert_eq!(overlay.is_visible(), before);

        overlay.hide();
        overlay.toggle();
        overlay.toggle();
        assert!(!overlay.is_visible());
    }

    #[test]
    fn highlighted_marker_is_big_and_green() {
        let mut overlay = MarkerOverlay::new();
        overlay.place_marker(Marker::RightHand, pt(100.0, 50.0), true);
        overlay.place_marker(Marker::LeftHand, pt(10.0, 50.0), false);

        let right = overlay.placement(Marker::RightHand).unwrap();
        assert_eq!(right.style, MarkerStyle::ACTIVE);
        assert_eq!(right.center, pt(100.0, 50.0));

        let left = overlay.placement(Marker::LeftHand).unwrap();
        assert_eq!(left.style.diameter, 20);
        assert_eq!(left.style.color, 0xFFFF0000);
    }

    #[test]
    fn hidden_overlay_draws_nothing_but_keeps_tracking() {
        let mut overlay = MarkerOverlay::new();
        overlay.place_marker(Marker::Head, pt(1.0, 2.0), false);
        assert_eq!(overlay.visible_markers().count(), 1);

        overlay.hide();
        overlay.place_marker(Marker::Head, pt(5.0, 6.0), false);
        assert_eq!(overlay.visible_markers().count(), 0);

        overlay.show();
        let (_, p) = overlay.visible_markers().next().unwrap();
        assert_eq!(p.center, pt(5.0, 6.0));
    }
}
