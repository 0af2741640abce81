//! Interactive crop-rectangle editor: hit testing and drag handling.
//!
//! The editor works in displayed-image coordinates. Because the view fits
//! the image with a uniform scale, a width/height quotient in displayed
//! space equals the same quotient in source space, so ratio locks apply
//! directly with no conversion.

use eframe::egui;

use crate::geometry::{CropRect, DisplaySize};

/// Which part of the rectangle a drag grabs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ResizeHandle {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Top,
    Bottom,
    Left,
    Right,
    Center, // Moving
}

const HANDLE_TOLERANCE: f32 = 10.0;

pub fn hit_test(pos: egui::Pos2, rect: egui::Rect) -> Option<ResizeHandle> {
    let min = rect.min;
    let max = rect.max;

    if pos.distance(min) < HANDLE_TOLERANCE {
        return Some(ResizeHandle::TopLeft);
    }
    if pos.distance(egui::pos2(max.x, min.y)) < HANDLE_TOLERANCE {
        return Some(ResizeHandle::TopRight);
    }
    if pos.distance(egui::pos2(min.x, max.y)) < HANDLE_TOLERANCE {
        return Some(ResizeHandle::BottomLeft);
    }
    if pos.distance(max) < HANDLE_TOLERANCE {
        return Some(ResizeHandle::BottomRight);
    }

    if (pos.x - min.x).abs() < HANDLE_TOLERANCE && pos.y > min.y && pos.y < max.y {
        return Some(ResizeHandle::Left);
    }
    if (pos.x - max.x).abs() < HANDLE_TOLERANCE && pos.y > min.y && pos.y < max.y {
        return Some(ResizeHandle::Right);
    }
    if (pos.y - min.y).abs() < HANDLE_TOLERANCE && pos.x > min.x && pos.x < max.x {
        return Some(ResizeHandle::Top);
    }
    if (pos.y - max.y).abs() < HANDLE_TOLERANCE && pos.x > min.x && pos.x < max.x {
        return Some(ResizeHandle::Bottom);
    }

    if rect.contains(pos) {
        return Some(ResizeHandle::Center);
    }

    None
}

/// Grow a fresh selection from the point where the drag began.
pub fn create(
    anchor: egui::Pos2,
    current: egui::Pos2,
    ratio: Option<f32>,
    display: DisplaySize,
) -> CropRect {
    let mut rect = egui::Rect::from_two_pos(anchor, current);

    if let Some(ratio) = ratio {
        let dim = project_onto_ratio(rect.size(), ratio);
        let sign_x = if current.x >= anchor.x { 1.0 } else { -1.0 };
        let sign_y = if current.y >= anchor.y { 1.0 } else { -1.0 };
        rect = egui::Rect::from_two_pos(
            anchor,
            anchor + egui::vec2(sign_x * dim.x, sign_y * dim.y),
        );
    }

    from_rect(clamp_to_display(rect, display))
}

/// Apply one frame of drag to the selection.
pub fn drag(
    crop: CropRect,
    handle: ResizeHandle,
    delta: egui::Vec2,
    ratio: Option<f32>,
    display: DisplaySize,
) -> CropRect {
    let mut rect = to_rect(crop);
    let bounds = egui::Rect::from_min_size(egui::Pos2::ZERO, egui::vec2(display.w, display.h));

    match ratio {
        Some(ratio) => match handle {
            ResizeHandle::Center => pan(&mut rect, delta, bounds),

            ResizeHandle::TopLeft
            | ResizeHandle::TopRight
            | ResizeHandle::BottomLeft
            | ResizeHandle::BottomRight => {
                // Anchor is the opposite corner; the dragged corner suggests
                // a size that gets projected back onto the ratio direction.
                let (anchor, corner) = match handle {
                    ResizeHandle::TopLeft => (rect.max, rect.min),
                    ResizeHandle::TopRight => (
                        egui::pos2(rect.min.x, rect.max.y),
                        egui::pos2(rect.max.x, rect.min.y),
                    ),
                    ResizeHandle::BottomLeft => (
                        egui::pos2(rect.max.x, rect.min.y),
                        egui::pos2(rect.min.x, rect.max.y),
                    ),
                    ResizeHandle::BottomRight => (rect.min, rect.max),
                    _ => unreachable!(),
                };

                let corner = corner + delta;
                let raw = egui::vec2((corner.x - anchor.x).abs(), (corner.y - anchor.y).abs());
                let dim = project_onto_ratio(raw, ratio);

                let (new_min, new_max) = match handle {
                    ResizeHandle::TopLeft => (anchor - dim, anchor),
                    ResizeHandle::TopRight => (
                        egui::pos2(anchor.x, anchor.y - dim.y),
                        egui::pos2(anchor.x + dim.x, anchor.y),
                    ),
                    ResizeHandle::BottomLeft => (
                        egui::pos2(anchor.x - dim.x, anchor.y),
                        egui::pos2(anchor.x, anchor.y + dim.y),
                    ),
                    ResizeHandle::BottomRight => (anchor, anchor + dim),
                    _ => unreachable!(),
                };
                rect = egui::Rect::from_min_max(new_min, new_max);
            }

            // Side handles drive one dimension; the other follows, centered.
            ResizeHandle::Left | ResizeHandle::Right => {
                match handle {
                    ResizeHandle::Left => rect.min.x += delta.x,
                    ResizeHandle::Right => rect.max.x += delta.x,
                    _ => {}
                }
                let new_h = rect.width() / ratio;
                let center_y = rect.center().y;
                rect.min.y = center_y - new_h * 0.5;
                rect.max.y = center_y + new_h * 0.5;
            }
            ResizeHandle::Top | ResizeHandle::Bottom => {
                match handle {
                    ResizeHandle::Top => rect.min.y += delta.y,
                    ResizeHandle::Bottom => rect.max.y += delta.y,
                    _ => {}
                }
                let new_w = rect.height() * ratio;
                let center_x = rect.center().x;
                rect.min.x = center_x - new_w * 0.5;
                rect.max.x = center_x + new_w * 0.5;
            }
        },

        None => match handle {
            ResizeHandle::Center => pan(&mut rect, delta, bounds),
            ResizeHandle::TopLeft => rect.min += delta,
            ResizeHandle::TopRight => {
                rect.min.y += delta.y;
                rect.max.x += delta.x;
            }
            ResizeHandle::BottomLeft => {
                rect.min.x += delta.x;
                rect.max.y += delta.y;
            }
            ResizeHandle::BottomRight => rect.max += delta,
            ResizeHandle::Top => rect.min.y += delta.y,
            ResizeHandle::Bottom => rect.max.y += delta.y,
            ResizeHandle::Left => rect.min.x += delta.x,
            ResizeHandle::Right => rect.max.x += delta.x,
        },
    }

    from_rect(clamp_to_display(rect, display))
}

/// Move the whole rectangle, constraining the delta so it never leaves the
/// bounds.
fn pan(rect: &mut egui::Rect, delta: egui::Vec2, bounds: egui::Rect) {
    let mut delta = delta;
    if rect.min.x + delta.x < bounds.min.x {
        delta.x = bounds.min.x - rect.min.x;
    }
    if rect.max.x + delta.x > bounds.max.x {
        delta.x = bounds.max.x - rect.max.x;
    }
    if rect.min.y + delta.y < bounds.min.y {
        delta.y = bounds.min.y - rect.min.y;
    }
    if rect.max.y + delta.y > bounds.max.y {
        delta.y = bounds.max.y - rect.max.y;
    }
    *rect = rect.translate(delta);
}

/// Project a suggested size onto the ratio direction `(ratio, 1)`.
fn project_onto_ratio(size: egui::Vec2, ratio: f32) -> egui::Vec2 {
    let u = egui::vec2(ratio, 1.0);
    let lambda = size.dot(u) / u.length_sq();
    u * lambda
}

fn clamp_to_display(mut rect: egui::Rect, display: DisplaySize) -> egui::Rect {
    if rect.min.x > rect.max.x {
        std::mem::swap(&mut rect.min.x, &mut rect.max.x);
    }
    if rect.min.y > rect.max.y {
        std::mem::swap(&mut rect.min.y, &mut rect.max.y);
    }
    rect.min.x = rect.min.x.max(0.0);
    rect.min.y = rect.min.y.max(0.0);
    rect.max.x = rect.max.x.min(display.w);
    rect.max.y = rect.max.y.min(display.h);
    rect
}

fn to_rect(crop: CropRect) -> egui::Rect {
    egui::Rect::from_min_size(egui::pos2(crop.x, crop.y), egui::vec2(crop.w, crop.h))
}

fn from_rect(rect: egui::Rect) -> CropRect {
    CropRect::new(rect.min.x, rect.min.y, rect.width(), rect.height())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn display() -> DisplaySize {
        DisplaySize::new(1000.0, 1000.0)
    }

    #[test]
    fn hit_test_finds_corners_edges_and_interior() {
        let rect = egui::Rect::from_min_max(egui::pos2(100.0, 100.0), egui::pos2(300.0, 200.0));

        assert_eq!(
            hit_test(egui::pos2(101.0, 99.0), rect),
            Some(ResizeHandle::TopLeft)
        );
        assert_eq!(
            hit_test(egui::pos2(299.0, 201.0), rect),
            Some(ResizeHandle::BottomRight)
        );
        assert_eq!(
            hit_test(egui::pos2(100.0, 150.0), rect),
            Some(ResizeHandle::Left)
        );
        assert_eq!(
            hit_test(egui::pos2(200.0, 199.0), rect),
            Some(ResizeHandle::Bottom)
        );
        assert_eq!(
            hit_test(egui::pos2(200.0, 150.0), rect),
            Some(ResizeHandle::Center)
        );
        assert_eq!(hit_test(egui::pos2(500.0, 500.0), rect), None);
    }

    #[test]
    fn free_edge_drag_moves_only_that_edge() {
        let crop = CropRect::new(100.0, 100.0, 200.0, 100.0);
        let out = drag(
            crop,
            ResizeHandle::Right,
            egui::vec2(30.0, 0.0),
            None,
            display(),
        );
        assert_eq!(out, CropRect::new(100.0, 100.0, 230.0, 100.0));
    }

    #[test]
    fn pan_is_clamped_at_the_display_edge() {
        let crop = CropRect::new(900.0, 0.0, 100.0, 100.0);
        let out = drag(
            crop,
            ResizeHandle::Center,
            egui::vec2(50.0, -20.0),
            None,
            display(),
        );
        // Already flush against the right and top edges: no movement.
        assert_eq!(out, crop);
    }

    #[test]
    fn locked_side_drag_keeps_the_quotient() {
        let crop = CropRect::new(100.0, 400.0, 200.0, 100.0);
        let out = drag(
            crop,
            ResizeHandle::Right,
            egui::vec2(20.0, 0.0),
            Some(2.0),
            display(),
        );
        assert!((out.w - 220.0).abs() < 1e-3);
        assert!((out.w / out.h - 2.0).abs() < 1e-3);
        // Height grows symmetrically about the old centerline.
        assert!((out.y + out.h / 2.0 - 450.0).abs() < 1e-3);
    }

    #[test]
    fn locked_corner_drag_keeps_the_quotient_and_anchor() {
        let crop = CropRect::new(100.0, 100.0, 200.0, 100.0);
        let out = drag(
            crop,
            ResizeHandle::BottomRight,
            egui::vec2(40.0, 10.0),
            Some(2.0),
            display(),
        );
        // Top-left corner stays put.
        assert_eq!((out.x, out.y), (100.0, 100.0));
        assert!((out.w / out.h - 2.0).abs() < 1e-3);
    }

    #[test]
    fn crossing_the_anchor_normalizes_the_rectangle() {
        let crop = CropRect::new(100.0, 100.0, 50.0, 50.0);
        let out = drag(
            crop,
            ResizeHandle::BottomRight,
            egui::vec2(-80.0, -80.0),
            None,
            display(),
        );
        assert!(out.w >= 0.0 && out.h >= 0.0);
        assert!(out.x <= 100.0);
    }

    #[test]
    fn creation_spans_the_dragged_diagonal() {
        let out = create(
            egui::pos2(50.0, 60.0),
            egui::pos2(150.0, 120.0),
            None,
            display(),
        );
        assert_eq!(out, CropRect::new(50.0, 60.0, 100.0, 60.0));
    }

    #[test]
    fn creation_with_lock_projects_onto_the_ratio() {
        let out = create(
            egui::pos2(0.0, 0.0),
            egui::pos2(100.0, 100.0),
            Some(1.0),
            display(),
        );
        assert!((out.w - out.h).abs() < 1e-3);
    }
}
