// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Planar element geometry.
//!
//! Elements are drawn as points, polylines or polygons in a coordinate frame
//! local to their page. The heavy lifting (intersection predicates, segment
//! crossing, centroids, bounding boxes) is delegated to the `geo` crate; this
//! module only adds the operations relationship discovery needs on top of it.

use geo::line_intersection::line_intersection;
use geo::{
    BoundingRect, Centroid, Coord, EuclideanDistance, Geometry, Intersects, Line,
    LineIntersection, LineString, Point, Polygon, Rect,
};

/// Tolerance used when comparing degenerate bounding boxes.
pub const BOX_EPSILON: f64 = 1e-9;

/// The geometry of a single element on its page.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementGeometry {
    /// A point mark (e.g. a column drawn as a dot).
    Point(Point<f64>),
    /// A line or polyline (beams, joists).
    Line(LineString<f64>),
    /// A closed area (column footprints, slabs).
    Polygon(Polygon<f64>),
}

impl ElementGeometry {
    /// Creates a point geometry.
    pub fn point(x: f64, y: f64) -> Self {
        ElementGeometry::Point(Point::new(x, y))
    }

    /// Creates a line geometry through the given vertices, in order.
    pub fn line(vertices: &[(f64, f64)]) -> Self {
        ElementGeometry::Line(LineString::from(vertices.to_vec()))
    }

    /// Creates a polygon from its exterior ring. The ring is closed
    /// automatically if the last vertex differs from the first.
    pub fn polygon(exterior: &[(f64, f64)]) -> Self {
        ElementGeometry::Polygon(Polygon::new(LineString::from(exterior.to_vec()), Vec::new()))
    }

    /// Returns the geometry kind as a lowercase string.
    pub fn kind(&self) -> &'static str {
        match self {
            ElementGeometry::Point(_) => "point",
            ElementGeometry::Line(_) => "line",
            ElementGeometry::Polygon(_) => "polygon",
        }
    }

    /// Converts into the `geo` sum type.
    pub fn to_geo(&self) -> Geometry<f64> {
        match self {
            ElementGeometry::Point(p) => Geometry::Point(*p),
            ElementGeometry::Line(ls) => Geometry::LineString(ls.clone()),
            ElementGeometry::Polygon(poly) => Geometry::Polygon(poly.clone()),
        }
    }

    /// Axis-aligned bounding box, or `None` for empty geometry.
    pub fn bounding_rect(&self) -> Option<Rect<f64>> {
        self.to_geo().bounding_rect()
    }

    /// Centroid, or `None` for empty geometry.
    pub fn centroid(&self) -> Option<Point<f64>> {
        self.to_geo().centroid()
    }

    /// Distance between the two centroids.
    pub fn centroid_distance(&self, other: &ElementGeometry) -> Option<f64> {
        let a = self.centroid()?;
        let b = other.centroid()?;
        Some(a.euclidean_distance(&b))
    }

    /// Intersection-over-union of the two bounding boxes.
    pub fn bbox_iou(&self, other: &ElementGeometry) -> Option<f64> {
        Some(rect_iou(&self.bounding_rect()?, &other.bounding_rect()?))
    }

    /// Closed-set intersection test: geometries that only touch intersect.
    pub fn intersects(&self, other: &ElementGeometry) -> bool {
        self.to_geo().intersects(&other.to_geo())
    }

    /// Straight segments making up the geometry (empty for a point).
    pub fn segments(&self) -> Vec<Line<f64>> {
        match self {
            ElementGeometry::Point(_) => Vec::new(),
            ElementGeometry::Line(ls) => ls.lines().collect(),
            ElementGeometry::Polygon(poly) => poly
                .exterior()
                .lines()
                .chain(poly.interiors().iter().flat_map(|ring| ring.lines()))
                .collect(),
        }
    }

    /// First vertex of the geometry.
    pub fn first_coord(&self) -> Option<Coord<f64>> {
        match self {
            ElementGeometry::Point(p) => Some(p.0),
            ElementGeometry::Line(ls) => ls.0.first().copied(),
            ElementGeometry::Polygon(poly) => poly.exterior().0.first().copied(),
        }
    }

    /// Returns one representative contact point between two intersecting
    /// geometries.
    ///
    /// A point geometry is its own contact point. Otherwise segments of `self`
    /// are walked in order against segments of `other` and the first crossing
    /// wins (the start of the shared piece for collinear overlaps). When one
    /// geometry lies inside a polygon without touching its boundary, the first
    /// vertex of the contained geometry is used.
    ///
    /// Returns `None` if no contact can be found, including when the
    /// geometries do not intersect at all.
    pub fn contact_point(&self, other: &ElementGeometry) -> Option<Point<f64>> {
        if let ElementGeometry::Point(p) = self {
            return other.intersects(self).then_some(*p);
        }
        if let ElementGeometry::Point(p) = other {
            return self.intersects(other).then_some(*p);
        }

        let theirs = other.segments();
        for a in self.segments() {
            for &b in &theirs {
                match line_intersection(a, b) {
                    Some(LineIntersection::SinglePoint { intersection, .. }) => {
                        return Some(intersection.into());
                    }
                    Some(LineIntersection::Collinear { intersection }) => {
                        return Some(intersection.start.into());
                    }
                    None => {}
                }
            }
        }

        // No boundary crossing: one geometry sits inside the other.
        [(self, other), (other, self)]
            .into_iter()
            .filter_map(|(inner, outer)| {
                let c = Point::from(inner.first_coord()?);
                outer.to_geo().intersects(&Geometry::Point(c)).then_some(c)
            })
            .next()
    }
}

impl From<Point<f64>> for ElementGeometry {
    fn from(p: Point<f64>) -> Self {
        ElementGeometry::Point(p)
    }
}

impl From<LineString<f64>> for ElementGeometry {
    fn from(ls: LineString<f64>) -> Self {
        ElementGeometry::Line(ls)
    }
}

impl From<Polygon<f64>> for ElementGeometry {
    fn from(poly: Polygon<f64>) -> Self {
        ElementGeometry::Polygon(poly)
    }
}

/// Intersection-over-union of two axis-aligned boxes.
///
/// Boxes with zero union area (points, axis-aligned lines) score 1.0 when they
/// coincide within [`BOX_EPSILON`] and 0.0 otherwise.
pub fn rect_iou(a: &Rect<f64>, b: &Rect<f64>) -> f64 {
    let overlap_w = (a.max().x.min(b.max().x) - a.min().x.max(b.min().x)).max(0.0);
    let overlap_h = (a.max().y.min(b.max().y) - a.min().y.max(b.min().y)).max(0.0);
    let overlap = overlap_w * overlap_h;
    let union = a.width() * a.height() + b.width() * b.height() - overlap;

    if union <= BOX_EPSILON {
        let same = (a.min().x - b.min().x).abs() <= BOX_EPSILON
            && (a.min().y - b.min().y).abs() <= BOX_EPSILON
            && (a.max().x - b.max().x).abs() <= BOX_EPSILON
            && (a.max().y - b.max().y).abs() <= BOX_EPSILON;
        return if same { 1.0 } else { 0.0 };
    }

    overlap / union
}

/// Grows a box by `margin` on every side.
pub fn expand_rect(rect: &Rect<f64>, margin: f64) -> Rect<f64> {
    Rect::new(
        Coord {
            x: rect.min().x - margin,
            y: rect.min().y - margin,
        },
        Coord {
            x: rect.max().x + margin,
            y: rect.max().y + margin,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square(x: f64, y: f64, size: f64) -> ElementGeometry {
        ElementGeometry::polygon(&[(x, y), (x, y + size), (x + size, y + size), (x + size, y)])
    }

    #[test]
    fn crossing_lines_meet_at_single_point() {
        let beam = ElementGeometry::line(&[(101.5, 52.0), (101.5, 85.3)]);
        let joist = ElementGeometry::line(&[(90.0, 65.2), (110.0, 65.2)]);

        assert!(beam.intersects(&joist));
        let p = beam.contact_point(&joist).unwrap();
        assert_relative_eq!(p.x(), 101.5, epsilon = 1e-9);
        assert_relative_eq!(p.y(), 65.2, epsilon = 1e-9);
    }

    #[test]
    fn touching_endpoint_counts() {
        let beam = ElementGeometry::line(&[(0.0, 0.0), (10.0, 0.0)]);
        let column = square(10.0, -1.0, 2.0);

        assert!(beam.intersects(&column));
        let p = beam.contact_point(&column).unwrap();
        assert_relative_eq!(p.x(), 10.0);
        assert_relative_eq!(p.y(), 0.0);
    }

    #[test]
    fn disjoint_has_no_contact() {
        let a = ElementGeometry::line(&[(0.0, 0.0), (1.0, 0.0)]);
        let b = ElementGeometry::line(&[(0.0, 5.0), (1.0, 5.0)]);

        assert!(!a.intersects(&b));
        assert!(a.contact_point(&b).is_none());
    }

    #[test]
    fn line_inside_polygon_uses_first_vertex() {
        let slab = square(0.0, 0.0, 10.0);
        let joist = ElementGeometry::line(&[(2.0, 2.0), (8.0, 2.0)]);

        let p = joist.contact_point(&slab).unwrap();
        assert_eq!((p.x(), p.y()), (2.0, 2.0));
        let q = slab.contact_point(&joist).unwrap();
        assert_eq!((q.x(), q.y()), (2.0, 2.0));
    }

    #[test]
    fn point_geometry_is_its_own_contact() {
        let post = ElementGeometry::point(5.0, 0.0);
        let beam = ElementGeometry::line(&[(0.0, 0.0), (10.0, 0.0)]);

        assert_eq!(post.contact_point(&beam), Some(Point::new(5.0, 0.0)));
        assert_eq!(beam.contact_point(&post), Some(Point::new(5.0, 0.0)));
    }

    #[test]
    fn collinear_overlap_reports_start_of_shared_piece() {
        let a = ElementGeometry::line(&[(0.0, 0.0), (10.0, 0.0)]);
        let b = ElementGeometry::line(&[(5.0, 0.0), (15.0, 0.0)]);

        let p = a.contact_point(&b).unwrap();
        assert_relative_eq!(p.y(), 0.0);
        assert!(p.x() >= 5.0 && p.x() <= 10.0);
    }

    #[test]
    fn iou_of_identical_and_shifted_boxes() {
        let a = square(0.0, 0.0, 2.0);
        let b = square(1.0, 0.0, 2.0);

        assert_relative_eq!(a.bbox_iou(&a).unwrap(), 1.0);
        // overlap 2, union 6
        assert_relative_eq!(a.bbox_iou(&b).unwrap(), 1.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn iou_of_degenerate_boxes() {
        let a = ElementGeometry::line(&[(1.0, 0.0), (1.0, 5.0)]);
        let b = ElementGeometry::line(&[(1.0, 0.0), (1.0, 5.0)]);
        let c = ElementGeometry::line(&[(2.0, 0.0), (2.0, 5.0)]);

        assert_eq!(a.bbox_iou(&b), Some(1.0));
        assert_eq!(a.bbox_iou(&c), Some(0.0));
    }

    #[test]
    fn centroid_of_square() {
        let c = square(100.0, 100.0, 3.0).centroid().unwrap();
        assert_relative_eq!(c.x(), 101.5);
        assert_relative_eq!(c.y(), 101.5);
    }

    #[test]
    fn expand_rect_grows_every_side() {
        let r = square(0.0, 0.0, 1.0).bounding_rect().unwrap();
        let grown = expand_rect(&r, 0.5);
        assert_eq!(grown.min(), Coord { x: -0.5, y: -0.5 });
        assert_eq!(grown.max(), Coord { x: 1.5, y: 1.5 });
    }
}
