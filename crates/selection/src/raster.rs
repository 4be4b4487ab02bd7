//! Rasterization primitives behind the lasso and magic-wand tools.

use std::collections::VecDeque;

use level_core::{Position, Rect};

use crate::mask::LayerSelection;

/// Vertical offset of the corner probes from the row's grid line.
const PROBE_EPSILON: f32 = 0.05;

/// Probe offsets relative to a row's ray origin: (x shift, y shift).
///
/// The ray origin sits on the left edge of the polygon's bounding box. Shifting
/// it one cell to the left moves every hit one column to the right, which
/// probes the right-hand corners of each cell.
const CORNER_PROBES: [(f32, f32); 4] = [
    (0.0, PROBE_EPSILON),
    (-1.0, PROBE_EPSILON),
    (0.0, -PROBE_EPSILON),
    (-1.0, -PROBE_EPSILON),
];

/// Rasterizes the closed polygon through `points` into a mask covering the
/// points' bounding box.
///
/// For each row, a rightward ray is cast from four corner probes against
/// every polygon edge whose vertical span contains the probe. Sorted hit
/// distances are consumed in pairs and the columns between each pair are
/// filled; an unpaired trailing hit fills to the end of the row. A cell is
/// selected when any of its probes lands inside.
///
/// Returns `None` for an empty point list.
pub fn rasterize_polygon(points: &[Position]) -> Option<LayerSelection> {
    let first = *points.first()?;
    let bounds = points
        .iter()
        .fold(Rect::from_corners(first, first), |rect, point| {
            rect.union(&Rect::from_corners(*point, *point))
        });
    let width = bounds.width();
    let mut mask = LayerSelection::new(bounds);

    let mut edges: Vec<(Position, Position)> = points.windows(2).map(|w| (w[0], w[1])).collect();
    let last = points[points.len() - 1];
    if last != first {
        edges.push((last, first));
    }

    let mut distances = Vec::with_capacity(edges.len());
    for row in 0..bounds.height() {
        let grid_y = (bounds.min.y + row as i32) as f32;
        for (probe_x, probe_y) in CORNER_PROBES {
            cast_ray(
                &edges,
                bounds.min.x as f32 + probe_x,
                grid_y + probe_y,
                &mut distances,
            );

            for span in distances.chunks(2) {
                let start = (span[0] as i64).max(0) as usize;
                let end = span
                    .get(1)
                    .map_or(width, |end| (*end as i64).clamp(0, width as i64) as usize);
                for column in start..end.min(width) {
                    mask.set_local(column, row, true);
                }
            }
        }
    }

    Some(mask)
}

/// Collects the sorted horizontal distances from `(origin_x, y)` to every
/// edge crossing the horizontal line at `y`.
fn cast_ray(edges: &[(Position, Position)], origin_x: f32, y: f32, distances: &mut Vec<f32>) {
    distances.clear();
    for (a, b) in edges {
        let (ax, ay) = (a.x as f32, a.y as f32);
        let (bx, by) = (b.x as f32, b.y as f32);
        if y < ay.min(by) || y > ay.max(by) {
            continue;
        }

        let distance = if ax == bx {
            ax - origin_x
        } else {
            let slope = (by - ay) / (bx - ax);
            if slope == 0.0 {
                // Parallel to the ray.
                continue;
            }
            (y - ay) / slope + ax - origin_x
        };
        distances.push(distance);
    }
    distances.sort_by(f32::total_cmp);
}

/// The flood fill visited more cells than allowed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FloodFillOverflow {
    pub limit: usize,
}

/// Bounded 4-connected flood fill over a `width x height` area.
///
/// Starting at `seed`, grows through orthogonal neighbours for which
/// `is_similar` holds. Returns the visited positions, or an overflow once
/// more than `limit` cells would be visited. A seed outside the area or
/// failing `is_similar` yields an empty region.
pub fn flood_fill<F>(
    seed: Position,
    width: usize,
    height: usize,
    limit: usize,
    mut is_similar: F,
) -> Result<Vec<Position>, FloodFillOverflow>
where
    F: FnMut(Position) -> bool,
{
    let in_area = |p: Position| {
        p.x >= 0 && p.y >= 0 && (p.x as usize) < width && (p.y as usize) < height
    };
    if !in_area(seed) || !is_similar(seed) {
        return Ok(Vec::new());
    }

    let mut visited = vec![false; width * height];
    let index = |p: Position| p.y as usize * width + p.x as usize;

    let mut region = Vec::new();
    let mut queue = VecDeque::from([seed]);
    visited[index(seed)] = true;

    while let Some(current) = queue.pop_front() {
        region.push(current);
        if region.len() > limit {
            return Err(FloodFillOverflow { limit });
        }

        for next in current.neighbors() {
            if in_area(next) && !visited[index(next)] && is_similar(next) {
                visited[index(next)] = true;
                queue.push_back(next);
            }
        }
    }

    Ok(region)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn selected(mask: &LayerSelection) -> BTreeSet<(i32, i32)> {
        mask.selected().map(|p| (p.x, p.y)).collect()
    }

    #[test]
    fn empty_polygon_is_none() {
        assert!(rasterize_polygon(&[]).is_none());
    }

    #[test]
    fn single_point_selects_nothing() {
        let mask = rasterize_polygon(&[Position::new(3, 3)]).unwrap();
        assert!(mask.is_empty());
    }

    #[test]
    fn right_triangle_boundary_cells() {
        let mask = rasterize_polygon(&[
            Position::new(5, 5),
            Position::new(8, 5),
            Position::new(5, 8),
        ])
        .unwrap();

        let expected: BTreeSet<_> = [
            (5, 5),
            (6, 5),
            (7, 5),
            (5, 6),
            (6, 6),
            (7, 6),
            (5, 7),
            (6, 7),
        ]
        .into_iter()
        .collect();
        assert_eq!(selected(&mask), expected);
    }

    #[test]
    fn axis_aligned_square() {
        let mask = rasterize_polygon(&[
            Position::new(0, 0),
            Position::new(3, 0),
            Position::new(3, 3),
            Position::new(0, 3),
        ])
        .unwrap();

        // The upper probes of the bottom row still hit both vertical edges, so
        // the whole inclusive box is selected.
        let expected: BTreeSet<_> = (0..4)
            .flat_map(|y| (0..4).map(move |x| (x, y)))
            .collect();
        assert_eq!(selected(&mask), expected);
    }

    #[test]
    fn flood_fill_stays_in_region() {
        // Two regions separated by a wall at x == 2.
        let region = flood_fill(Position::new(0, 0), 5, 3, 100, |p| p.x != 2).unwrap();
        assert_eq!(region.len(), 6);
        assert!(region.iter().all(|p| p.x < 2));
    }

    #[test]
    fn flood_fill_is_four_connected() {
        // Only the diagonal is similar; the fill must not leak along it.
        let region = flood_fill(Position::new(0, 0), 4, 4, 100, |p| p.x == p.y).unwrap();
        assert_eq!(region, vec![Position::new(0, 0)]);
    }

    #[test]
    fn flood_fill_overflows_past_limit() {
        let result = flood_fill(Position::new(1, 1), 10, 10, 99, |_| true);
        assert_eq!(result, Err(FloodFillOverflow { limit: 99 }));

        let exact = flood_fill(Position::new(1, 1), 10, 10, 100, |_| true).unwrap();
        assert_eq!(exact.len(), 100);
    }

    #[test]
    fn flood_fill_outside_area_is_empty() {
        let region = flood_fill(Position::new(-1, 0), 3, 3, 10, |_| true).unwrap();
        assert!(region.is_empty());
    }
}
