use crate::coordinate::Coordinate;

/// How the simplifier walks the track. Both produce identical output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Plain recursion over index ranges.
    Recursive,
    /// Explicit work-list, safe for very long tracks.
    #[default]
    Stack,
}

fn point_line_distance(x0: f64, y0: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    if x1 == x2 && y1 == y2 {
        return ((x0 - x1).powi(2) + (y0 - y1).powi(2)).sqrt();
    }
    let numerator = ((y2 - y1) * x0 - (x2 - x1) * y0 + x2 * y1 - y2 * x1).abs();
    let denominator = ((y2 - y1).powi(2) + (x2 - x1).powi(2)).sqrt();
    numerator / denominator
}

/// Distance from `p` to the infinite line through `a` and `b`, in degrees.
///
/// Longitude and latitude are used as flat x/y. When `a` and `b` share a
/// position the plain Euclidean distance from `p` to `a` is returned.
pub fn perpendicular_distance(a: &Coordinate, b: &Coordinate, p: &Coordinate) -> f64 {
    point_line_distance(
        p.longitude, p.latitude,
        a.longitude, a.latitude,
        b.longitude, b.latitude,
    )
}

// First interior index with the largest distance to the start..end chord.
fn farthest_point(points: &[Coordinate], start: usize, end: usize) -> (usize, f64) {
    let mut max_distance = 0.0;
    let mut max_index = start + 1;

    for i in start + 1..end {
        let distance = perpendicular_distance(&points[start], &points[end], &points[i]);
        if distance > max_distance {
            max_distance = distance;
            max_index = i;
        }
    }

    (max_index, max_distance)
}

// Each accepted range emits its start index only; the caller appends the
// final index once so shared pivots are never duplicated.
fn douglas_peucker_recursive(
    points: &[Coordinate],
    start: usize,
    end: usize,
    tolerance: f64,
    kept: &mut Vec<usize>,
) {
    if end - start < 2 {
        kept.push(start);
        return;
    }

    let (max_index, max_distance) = farthest_point(points, start, end);

    if max_distance > tolerance {
        douglas_peucker_recursive(points, start, max_index, tolerance, kept);
        douglas_peucker_recursive(points, max_index, end, tolerance, kept);
    } else {
        kept.push(start);
    }
}

fn douglas_peucker_stack(points: &[Coordinate], tolerance: f64, kept: &mut Vec<usize>) {
    let mut pending = vec![(0, points.len() - 1)];

    while let Some((start, end)) = pending.pop() {
        if end - start < 2 {
            kept.push(start);
            continue;
        }

        let (max_index, max_distance) = farthest_point(points, start, end);

        if max_distance > tolerance {
            // right half first so the left half is popped next
            pending.push((max_index, end));
            pending.push((start, max_index));
        } else {
            kept.push(start);
        }
    }
}

/// Indices of the points that survive simplification, in track order.
pub fn douglas_peucker_indices(points: &[Coordinate], tolerance: f64, strategy: Strategy) -> Vec<usize> {
    if points.len() <= 2 {
        return (0..points.len()).collect();
    }

    let mut kept = Vec::new();
    match strategy {
        Strategy::Recursive => douglas_peucker_recursive(points, 0, points.len() - 1, tolerance, &mut kept),
        Strategy::Stack => douglas_peucker_stack(points, tolerance, &mut kept),
    }
    kept.push(points.len() - 1);
    kept
}

pub fn douglas_peucker(points: &[Coordinate], tolerance: f64, strategy: Strategy) -> Vec<Coordinate> {
    douglas_peucker_indices(points, tolerance, strategy)
        .into_iter()
        .map(|i| points[i].clone())
        .collect()
}

/// Simplifies a track with the default strategy.
pub fn simplify(points: &[Coordinate], tolerance: f64) -> Vec<Coordinate> {
    douglas_peucker(points, tolerance, Strategy::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(xy: &[(f64, f64)]) -> Vec<Coordinate> {
        xy.iter()
            .enumerate()
            .map(|(i, &(x, y))| Coordinate::new(x, y, format!("p{}", i)))
            .collect()
    }

    fn positions(points: &[Coordinate]) -> Vec<(f64, f64)> {
        points.iter().map(|p| (p.longitude, p.latitude)).collect()
    }

    fn is_subsequence(sub: &[Coordinate], full: &[Coordinate]) -> bool {
        let mut rest = full.iter();
        sub.iter().all(|p| rest.any(|q| q == p))
    }

    #[test]
    fn test_distance_degenerate_segment() {
        let a = Coordinate::new(1.0, 1.0, "a");
        let p = Coordinate::new(4.0, 5.0, "p");
        assert!((perpendicular_distance(&a, &a, &p) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_distance_point_on_line() {
        let a = Coordinate::new(0.0, 0.0, "a");
        let b = Coordinate::new(2.0, 2.0, "b");
        assert_eq!(perpendicular_distance(&a, &b, &Coordinate::new(1.0, 1.0, "p")), 0.0);
        // beyond the endpoint still measures against the infinite line
        assert_eq!(perpendicular_distance(&a, &b, &Coordinate::new(5.0, 5.0, "p")), 0.0);
    }

    #[test]
    fn test_distance_general_case() {
        let a = Coordinate::new(0.0, 0.0, "a");
        let b = Coordinate::new(2.0, 0.0, "b");
        let p = Coordinate::new(1.0, 0.05, "p");
        assert!((perpendicular_distance(&a, &b, &p) - 0.05).abs() < 1e-12);

        let c = Coordinate::new(0.0, 2.0, "c");
        let q = Coordinate::new(2.0, 2.0, "q");
        assert!((perpendicular_distance(&a, &b, &q) - 2.0).abs() < 1e-12);
        assert!((perpendicular_distance(&a, &c, &q) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_short_tracks_unchanged() {
        for strategy in [Strategy::Recursive, Strategy::Stack] {
            assert!(douglas_peucker(&[], 0.1, strategy).is_empty());

            let one = track(&[(3.0, 4.0)]);
            assert_eq!(douglas_peucker(&one, 0.1, strategy), one);

            let two = track(&[(0.0, 0.0), (1.0, 1.0)]);
            assert_eq!(douglas_peucker(&two, 0.1, strategy), two);
            assert_eq!(douglas_peucker(&two, 100.0, strategy), two);
            assert_eq!(douglas_peucker(&two, -1.0, strategy), two);
        }
    }

    #[test]
    fn test_middle_point_within_tolerance() {
        let points = track(&[(0.0, 0.0), (1.0, 0.05), (2.0, 0.0)]);
        let simplified = simplify(&points, 0.1);
        assert_eq!(positions(&simplified), vec![(0.0, 0.0), (2.0, 0.0)]);
    }

    #[test]
    fn test_middle_point_above_tolerance() {
        let points = track(&[(0.0, 0.0), (1.0, 0.05), (2.0, 0.0)]);
        let simplified = simplify(&points, 0.01);
        assert_eq!(simplified, points);
    }

    #[test]
    fn test_first_maximum_wins() {
        // p1 and p3 are equally far from the chord, p1 must be the pivot
        let points = track(&[(0.0, 0.0), (1.0, 1.0), (2.0, 0.0), (3.0, 1.0), (4.0, 0.0)]);
        let (index, distance) = farthest_point(&points, 0, 4);
        assert_eq!(index, 1);
        assert!((distance - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_zigzag_keeps_every_vertex() {
        let points = track(&[(0.0, 0.0), (1.0, 1.0), (2.0, 0.0), (3.0, 1.0), (4.0, 0.0)]);
        let simplified = simplify(&points, 0.1);
        assert_eq!(simplified, points);
        assert_eq!(simplify(&simplified, 0.1), simplified);
    }

    #[test]
    fn test_collinear_points_collapse() {
        let points = track(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (3.0, 3.0)]);
        assert_eq!(douglas_peucker_indices(&points, 0.0, Strategy::Recursive), vec![0, 3]);
        assert_eq!(douglas_peucker_indices(&points, 0.0, Strategy::Stack), vec![0, 3]);
    }

    #[test]
    fn test_negative_tolerance_keeps_everything() {
        let points = track(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (3.0, 3.0), (4.0, 4.0)]);
        for strategy in [Strategy::Recursive, Strategy::Stack] {
            assert_eq!(douglas_peucker_indices(&points, -1.0, strategy), vec![0, 1, 2, 3, 4]);
        }
    }

    #[test]
    fn test_closed_loop_uses_degenerate_distance() {
        // first and last coincide, so interior points are measured radially
        let points = track(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0), (0.0, 0.0)]);
        let kept = douglas_peucker_indices(&points, 0.5, Strategy::Stack);
        assert_eq!(kept, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_labels_and_altitude_carried_through() {
        let mut points = track(&[(0.0, 0.0), (1.0, 3.0), (2.0, 0.0)]);
        points[1] = points[1].clone().with_altitude(-4.5);
        let simplified = simplify(&points, 0.1);
        assert_eq!(simplified[1].label, "p1");
        assert_eq!(simplified[1].altitude, Some(-4.5));
    }

    #[test]
    fn test_long_noisy_line_collapses() {
        let points: Vec<Coordinate> = (0..10_000)
            .map(|i| {
                let x = i as f64 * 0.001;
                let noise = 0.01 * (i as f64 * 12.9898).sin();
                Coordinate::new(x, noise, i.to_string())
            })
            .collect();
        let simplified = simplify(&points, 0.1);
        assert_eq!(simplified.len(), 2);
        assert_eq!(simplified[0], points[0]);
        assert_eq!(simplified[1], points[9_999]);
    }

    #[test]
    fn test_long_line_keeps_spike() {
        let mut points: Vec<Coordinate> = (0..10_000)
            .map(|i| {
                let x = i as f64 * 0.001;
                let noise = 0.01 * (i as f64 * 12.9898).sin();
                Coordinate::new(x, noise, i.to_string())
            })
            .collect();
        points[5_000].latitude = 5.0;

        for strategy in [Strategy::Recursive, Strategy::Stack] {
            let simplified = douglas_peucker(&points, 0.1, strategy);
            assert!(simplified.contains(&points[5_000]));
            assert_eq!(simplified.first(), points.first());
            assert_eq!(simplified.last(), points.last());
            assert!(is_subsequence(&simplified, &points));
        }
    }

    #[test]
    fn test_strategies_agree() {
        let points: Vec<Coordinate> = (0..2_000)
            .map(|i| {
                let t = i as f64 * 0.01;
                Coordinate::new(t, t.sin() * 2.0 + (t * 7.3).cos() * 0.3, i.to_string())
            })
            .collect();
        for tolerance in [0.0, 0.05, 0.1, 0.5, 2.0] {
            let recursive = douglas_peucker_indices(&points, tolerance, Strategy::Recursive);
            let stack = douglas_peucker_indices(&points, tolerance, Strategy::Stack);
            assert_eq!(recursive, stack);
            assert!(recursive.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn test_does_not_mutate_input() {
        let points = track(&[(0.0, 0.0), (1.0, 0.05), (2.0, 0.0), (3.0, 4.0)]);
        let before = points.clone();
        let _ = simplify(&points, 0.1);
        assert_eq!(points, before);
    }
}
