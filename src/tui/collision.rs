//! Drop-target detection for pointer drags.
//!
//! Uses the closest-corners heuristic: the dragged card's rectangle is
//! compared corner by corner against every drop zone and the zone with the
//! smallest mean corner distance wins.

use ratatui::layout::Rect;

/// A rectangle in signed cell coordinates; a dragged card may leave the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl From<Rect> for DragRect {
    fn from(r: Rect) -> Self {
        DragRect {
            x: r.x as i32,
            y: r.y as i32,
            width: r.width as i32,
            height: r.height as i32,
        }
    }
}

impl DragRect {
    pub fn translate(self, dx: i32, dy: i32) -> Self {
        DragRect {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }

    /// Top-left, top-right, bottom-left, bottom-right.
    fn corners(&self) -> [(f64, f64); 4] {
        let (left, top) = (self.x as f64, self.y as f64);
        let (right, bottom) = (left + self.width as f64, top + self.height as f64);
        [(left, top), (right, top), (left, bottom), (right, bottom)]
    }

    /// Clip to a screen area; `None` when fully outside.
    pub fn clip(&self, area: Rect) -> Option<Rect> {
        let left = self.x.max(area.x as i32);
        let top = self.y.max(area.y as i32);
        let right = (self.x + self.width).min(area.x as i32 + area.width as i32);
        let bottom = (self.y + self.height).min(area.y as i32 + area.height as i32);
        if right <= left || bottom <= top {
            return None;
        }
        Some(Rect::new(
            left as u16,
            top as u16,
            (right - left) as u16,
            (bottom - top) as u16,
        ))
    }
}

/// A rendered drop zone: a column body or a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Droppable {
    pub id: String,
    pub area: Rect,
}

fn mean_corner_distance(a: &DragRect, b: &DragRect) -> f64 {
    a.corners()
        .iter()
        .zip(b.corners().iter())
        .map(|((ax, ay), (bx, by))| ((ax - bx).powi(2) + (ay - by).powi(2)).sqrt())
        .sum::<f64>()
        / 4.0
}

/// Pick the drop zone whose corners are closest to the dragged rectangle.
/// Ties go to the zone listed first.
pub fn closest_corners(collision: DragRect, droppables: &[Droppable]) -> Option<&str> {
    let mut best: Option<(&Droppable, f64)> = None;
    for droppable in droppables {
        let distance = mean_corner_distance(&collision, &DragRect::from(droppable.area));
        match best {
            Some((_, d)) if d <= distance => {}
            _ => best = Some((droppable, distance)),
        }
    }
    best.map(|(d, _)| d.id.as_str())
}

/// Whether a terminal cell lies inside `area`.
pub fn contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x
        && column < area.x.saturating_add(area.width)
        && row >= area.y
        && row < area.y.saturating_add(area.height)
}
