use std::cmp::Ordering;

use super::coordinate::{cross, polar_angle, Coordinate};

/// Graham scan over `points`, returning the hull in counter-clockwise order starting at
/// the pivot (lowest latitude, then lowest longitude). Fewer than 3 points are returned
/// unchanged. The hull is not closed; see [`super::ring::close_ring`].
pub fn convex_hull(points: &[Coordinate]) -> Vec<Coordinate> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let pivot_idx = points
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| {
            a.lat
                .total_cmp(&b.lat)
                .then_with(|| a.lon.total_cmp(&b.lon))
        })
        .map(|(idx, _)| idx)
        .unwrap_or(0);
    let pivot = points[pivot_idx];

    let mut rest = points
        .iter()
        .enumerate()
        .filter(|(idx, _)| *idx != pivot_idx)
        .map(|(_, point)| (polar_angle(&pivot, point), pivot.distance_squared(point), *point))
        .collect::<Vec<_>>();
    rest.sort_by(|a, b| {
        a.0.partial_cmp(&b.0)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal))
    });

    let mut hull = vec![pivot];
    for (_, _, point) in rest {
        while hull.len() > 1 && cross(&hull[hull.len() - 2], &hull[hull.len() - 1], &point) <= 0.0
        {
            hull.pop();
        }
        hull.push(point);
    }

    hull
}

#[cfg(test)]
mod test {
    use geo::{Contains, Coord, LineString, Polygon};

    use super::*;
    use crate::geometry::ring::close_ring;

    fn as_polygon(ring: &[Coordinate]) -> Polygon<f64> {
        Polygon::new(
            LineString::from(ring.iter().map(|c| Coord::from(*c)).collect::<Vec<_>>()),
            vec![],
        )
    }

    #[test]
    fn square_with_interior_points() {
        let points = vec![
            Coordinate::new(0.5, 0.5),
            Coordinate::new(1.0, 1.0),
            Coordinate::new(0.0, 1.0),
            Coordinate::new(0.2, 0.7),
            Coordinate::new(1.0, 0.0),
            Coordinate::new(0.0, 0.0),
        ];
        let hull = convex_hull(&points);
        assert_eq!(
            hull,
            vec![
                Coordinate::new(0.0, 0.0),
                Coordinate::new(1.0, 0.0),
                Coordinate::new(1.0, 1.0),
                Coordinate::new(0.0, 1.0),
            ]
        );
    }

    #[test]
    fn every_input_point_is_covered() {
        let points = vec![
            Coordinate::new(20.1, 105.3),
            Coordinate::new(20.4, 105.9),
            Coordinate::new(20.9, 105.4),
            Coordinate::new(20.5, 105.5),
            Coordinate::new(20.3, 105.2),
            Coordinate::new(20.6, 106.1),
            Coordinate::new(20.7, 105.7),
        ];
        let hull = close_ring(convex_hull(&points));
        let polygon = as_polygon(&hull);
        for point in points.iter().filter(|p| !hull.contains(p)) {
            assert!(polygon.contains(&Coord::from(*point)), "{point} outside hull");
        }
        assert!(hull.len() <= points.len() + 1);
    }

    #[test]
    fn fewer_than_three_points_pass_through() {
        let points = vec![Coordinate::new(1.0, 1.0), Coordinate::new(0.0, 0.0)];
        assert_eq!(convex_hull(&points), points);
        assert!(convex_hull(&[]).is_empty());
    }

    #[test]
    fn collinear_points_do_not_crash() {
        let points = vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(2.0, 2.0),
            Coordinate::new(1.0, 1.0),
            Coordinate::new(3.0, 3.0),
        ];
        let hull = convex_hull(&points);
        assert!(!hull.is_empty());
        assert!(hull.len() <= 2);
        assert_eq!(hull[0], Coordinate::new(0.0, 0.0));
    }

    #[test]
    fn duplicated_points() {
        let points = vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(0.0, 0.0),
            Coordinate::new(1.0, 0.0),
            Coordinate::new(0.0, 1.0),
            Coordinate::new(1.0, 0.0),
        ];
        let hull = convex_hull(&points);
        assert_eq!(hull.len(), 3);
    }
}
