//! The ifs module provides an iterated-function-system generator: a set of
//! affine maps applied repeatedly to a starting figure, producing the
//! self-similar point-figures of classics like the Sierpinski triangle and
//! Barnsley fern. Take a look at the [`crate::ifs::Ifs`] struct for more
//! details, and examples.

use crate::errors::DefinitionError;
use crate::geometry::Bounds;
use crate::turtle::degrees;
use geo::bounding_rect::BoundingRect;
use geo::coord;
use geo::map_coords::MapCoords;
use geo_types::{LineString, MultiLineString};
use nalgebra::{Affine2, Matrix3, Point2 as NPoint2};

/// # Transformable
///
/// Whole-figure adjustment of already-generated geometry: uniform scaling,
/// rotation and centering about the cached bounding-box centroid, and plain
/// translation. These are post-processing moves for fitting output onto a
/// target surface, not part of generation itself, which is why they live in
/// their own narrow trait rather than on every generator.
pub trait Transformable {
    /// Multiplies every coordinate by `factor` and refreshes the bounding
    /// box.
    fn scale(&mut self, factor: f64) -> &mut Self;

    /// Rotates every figure counter-clockwise by `angle_degrees` about the
    /// cached bounding-box centroid, then refreshes the bounding box.
    fn rotate(&mut self, angle_degrees: f64) -> &mut Self;

    /// Adds `(dx, dy)` to every coordinate. The cached bounding box is left
    /// untouched; [`Transformable::center_to`] refreshes it before use, so
    /// interleaved translates never mis-center a later fit.
    fn translate(&mut self, dx: f64, dy: f64) -> &mut Self;

    /// Translates the whole figure collection so its bounding-box centroid
    /// lands exactly on `(x, y)`. Idempotent: repeating the call with the
    /// same target moves nothing.
    fn center_to(&mut self, x: f64, y: f64) -> &mut Self;
}

/// # Ifs
///
/// An iterated function system: a current generation of figures (each an
/// ordered point sequence) and a fixed set of affine maps, each given by six
/// coefficients `(a, b, c, d, e, f)` taking `(x, y)` to
/// `(a·x + b·y + e, c·x + d·y + f)`.
///
/// Each call to [`Ifs::iterate`] replaces the generation outright: every map
/// is applied to every figure of the immediately preceding generation, so
/// with `T` maps the figure count after `n` rounds is exactly `T^n`. Earlier
/// generations are not accumulated.
///
/// # Example
///
/// ```rust
/// use fractogen::ifs::{Ifs, Transformable};
/// use geo_types::LineString;
///
/// // Sierpinski triangle: three half-scale copies of the unit triangle.
/// let triangle = LineString::from(vec![(0.0, 0.0), (1.0, 0.0), (0.5, 1.0), (0.0, 0.0)]);
/// let mut sierpinski = Ifs::new(
///     triangle,
///     vec![
///         [0.5, 0.0, 0.0, 0.5, 0.0, 0.0],
///         [0.5, 0.0, 0.0, 0.5, 0.5, 0.0],
///         [0.5, 0.0, 0.0, 0.5, 0.25, 0.5],
///     ],
/// )
/// .unwrap();
/// sierpinski.iterate(4).scale(100.0).center_to(0.0, 0.0);
/// assert_eq!(sierpinski.figures().len(), 81);
/// ```
#[derive(Clone, Debug)]
pub struct Ifs {
    figures: Vec<LineString<f64>>,
    transforms: Vec<Affine2<f64>>,
    bounds: Bounds,
    total_iterations: u32,
}

impl Ifs {
    /// Creates a system from a starting figure and a list of six-coefficient
    /// mapping rows. Fails if the figure has no points or the mapping list
    /// is empty, since either would make every later generation empty.
    pub fn new(
        starting_figure: LineString<f64>,
        mappings: Vec<[f64; 6]>,
    ) -> Result<Self, DefinitionError> {
        if starting_figure.0.is_empty() {
            return Err(DefinitionError::EmptyStartingFigure);
        }
        if mappings.is_empty() {
            return Err(DefinitionError::EmptyTransformList);
        }
        let transforms = mappings.iter().map(Self::affine_from_row).collect();
        let mut ifs = Ifs {
            figures: vec![starting_figure],
            transforms,
            bounds: Bounds::empty(),
            total_iterations: 0,
        };
        ifs.refresh_bounds();
        Ok(ifs)
    }

    /// Builds the affine map for one coefficient row. Row-major layout in
    /// the homogeneous matrix puts the translation pair `(e, f)` in the
    /// third column.
    fn affine_from_row(row: &[f64; 6]) -> Affine2<f64> {
        let [a, b, c, d, e, f] = *row;
        Affine2::from_matrix_unchecked(Matrix3::new(a, b, e, c, d, f, 0.0, 0.0, 1.0))
    }

    fn apply(affine: &Affine2<f64>, figure: &LineString<f64>) -> LineString<f64> {
        figure.map_coords(|xy| {
            let out = affine * NPoint2::new(xy.x, xy.y);
            coord!(x: out.x, y: out.y)
        })
    }

    fn transform_figures(&mut self, affine: &Affine2<f64>) {
        self.figures = self
            .figures
            .iter()
            .map(|figure| Self::apply(affine, figure))
            .collect();
    }

    fn refresh_bounds(&mut self) {
        self.bounds = Bounds::empty();
        for figure in &self.figures {
            if let Some(rect) = figure.bounding_rect() {
                self.bounds.expand_rect(&rect);
            }
        }
    }

    /// # iterate
    ///
    /// Advances the system by `generations` rounds. Each round applies every
    /// mapping to every figure of the previous generation and replaces the
    /// stored collection with the results, ordered mapping-major (all output
    /// of the first mapping, then the second, and so on). Refreshes the
    /// bounding box once at the end.
    pub fn iterate(&mut self, generations: u32) -> &mut Self {
        for _ in 0..generations {
            let mut next = Vec::with_capacity(self.transforms.len() * self.figures.len());
            for affine in &self.transforms {
                for figure in &self.figures {
                    next.push(Self::apply(affine, figure));
                }
            }
            self.figures = next;
            self.total_iterations += 1;
        }
        self.refresh_bounds();
        self
    }

    /// The current generation of figures.
    pub fn figures(&self) -> &[LineString<f64>] {
        &self.figures
    }

    /// The cached bounding box. Fresh after `iterate`, `scale`, `rotate`
    /// and `center_to`; stale after a bare `translate`.
    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    /// How many generation rounds have been applied, summed across every
    /// call to [`Ifs::iterate`].
    pub fn total_iterations(&self) -> u32 {
        self.total_iterations
    }

    /// Collects the current generation into a single [`MultiLineString`],
    /// ready for plotting.
    pub fn to_multiline(&self) -> MultiLineString<f64> {
        MultiLineString::new(self.figures.clone())
    }
}

impl Transformable for Ifs {
    fn scale(&mut self, factor: f64) -> &mut Self {
        let affine = Self::affine_from_row(&[factor, 0.0, 0.0, factor, 0.0, 0.0]);
        self.transform_figures(&affine);
        self.refresh_bounds();
        self
    }

    fn rotate(&mut self, angle_degrees: f64) -> &mut Self {
        let radians = degrees(angle_degrees);
        let pivot = self.bounds.center();
        let affine = Self::affine_from_row(&[1.0, 0.0, 0.0, 1.0, pivot.x(), pivot.y()])
            * Self::affine_from_row(&[
                radians.cos(),
                -radians.sin(),
                radians.sin(),
                radians.cos(),
                0.0,
                0.0,
            ])
            * Self::affine_from_row(&[1.0, 0.0, 0.0, 1.0, -pivot.x(), -pivot.y()]);
        self.transform_figures(&affine);
        self.refresh_bounds();
        self
    }

    fn translate(&mut self, dx: f64, dy: f64) -> &mut Self {
        let affine = Self::affine_from_row(&[1.0, 0.0, 0.0, 1.0, dx, dy]);
        self.transform_figures(&affine);
        self
    }

    fn center_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.refresh_bounds();
        let center = self.bounds.center();
        let (dx, dy) = (x - center.x(), y - center.y());
        let affine = Self::affine_from_row(&[1.0, 0.0, 0.0, 1.0, dx, dy]);
        self.transform_figures(&affine);
        self.bounds.translate(dx, dy);
        self
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::geometry::VectorOps;
    use geo_types::Point;

    fn close(coord: geo_types::Coord<f64>, x: f64, y: f64) -> bool {
        (coord.x - x).abs() < 1e-9 && (coord.y - y).abs() < 1e-9
    }

    fn unit_square() -> LineString<f64> {
        LineString::from(vec![
            (0.0, 0.0),
            (10.0, 0.0),
            (10.0, 10.0),
            (0.0, 10.0),
            (0.0, 0.0),
        ])
    }

    #[test]
    fn test_identity_transform_is_a_fixed_point() {
        let point = LineString::from(vec![(0.0, 0.0)]);
        let mut ifs = Ifs::new(point, vec![[1.0, 0.0, 0.0, 1.0, 0.0, 0.0]]).unwrap();
        ifs.iterate(5);
        assert_eq!(ifs.figures().len(), 1);
        assert!(close(ifs.figures()[0].0[0], 0.0, 0.0));
        assert_eq!(ifs.total_iterations(), 5);
    }

    #[test]
    fn test_figure_count_is_transforms_to_the_nth() {
        let point = LineString::from(vec![(1.0, 1.0)]);
        let mut ifs = Ifs::new(
            point,
            vec![
                [0.5, 0.0, 0.0, 0.5, 0.0, 0.0],
                [0.5, 0.0, 0.0, 0.5, 0.5, 0.0],
            ],
        )
        .unwrap();
        ifs.iterate(1);
        assert_eq!(ifs.figures().len(), 2);
        ifs.iterate(2);
        assert_eq!(ifs.figures().len(), 8);
        assert_eq!(ifs.total_iterations(), 3);
    }

    #[test]
    fn test_coefficient_row_semantics() {
        // (x, y) -> (a*x + b*y + e, c*x + d*y + f)
        let point = LineString::from(vec![(1.0, 1.0)]);
        let mut ifs = Ifs::new(point, vec![[2.0, 3.0, 4.0, 5.0, 6.0, 7.0]]).unwrap();
        ifs.iterate(1);
        assert!(close(ifs.figures()[0].0[0], 11.0, 16.0));
    }

    #[test]
    fn test_scale_refreshes_bounds() {
        let mut ifs = Ifs::new(unit_square(), vec![[1.0, 0.0, 0.0, 1.0, 0.0, 0.0]]).unwrap();
        ifs.scale(2.0);
        assert!((ifs.bounds().width() - 20.0).abs() < 1e-9);
        assert!((ifs.bounds().center().dist(&Point::new(10.0, 10.0))) < 1e-9);
    }

    #[test]
    fn test_translate_moves_figures_but_not_bounds() {
        let mut ifs = Ifs::new(unit_square(), vec![[1.0, 0.0, 0.0, 1.0, 0.0, 0.0]]).unwrap();
        ifs.translate(5.0, -3.0);
        assert!(close(ifs.figures()[0].0[0], 5.0, -3.0));
        // The cached box still describes the pre-translate geometry.
        assert!((ifs.bounds().center().dist(&Point::new(5.0, 5.0))) < 1e-9);
    }

    #[test]
    fn test_rotate_pivots_about_cached_center() {
        let mut ifs = Ifs::new(unit_square(), vec![[1.0, 0.0, 0.0, 1.0, 0.0, 0.0]]).unwrap();
        ifs.rotate(90.0);
        // A square centered on (5, 5) maps onto itself; the origin corner
        // lands a quarter-turn around at (10, 0).
        assert!(close(ifs.figures()[0].0[0], 10.0, 0.0));
        assert!((ifs.bounds().center().dist(&Point::new(5.0, 5.0))) < 1e-9);
    }

    #[test]
    fn test_center_to_is_idempotent() {
        let mut ifs = Ifs::new(
            unit_square(),
            vec![
                [0.5, 0.0, 0.0, 0.5, 0.0, 0.0],
                [0.5, 0.0, 0.0, 0.5, 5.0, 5.0],
            ],
        )
        .unwrap();
        ifs.iterate(3).center_to(640.0, 360.0);
        let once: Vec<LineString<f64>> = ifs.figures().to_vec();
        ifs.center_to(640.0, 360.0);
        assert_eq!(ifs.figures(), &once[..]);
        assert!((ifs.bounds().center().dist(&Point::new(640.0, 360.0))) < 1e-9);
    }

    #[test]
    fn test_center_to_recovers_from_stale_bounds() {
        let mut ifs = Ifs::new(unit_square(), vec![[1.0, 0.0, 0.0, 1.0, 0.0, 0.0]]).unwrap();
        ifs.translate(100.0, 100.0).center_to(0.0, 0.0);
        assert!((ifs.bounds().center().dist(&Point::new(0.0, 0.0))) < 1e-9);
        assert!(close(ifs.figures()[0].0[0], -5.0, -5.0));
    }

    #[test]
    fn test_empty_inputs_are_rejected() {
        let empty_figure: LineString<f64> = LineString::new(vec![]);
        assert!(matches!(
            Ifs::new(empty_figure, vec![[1.0, 0.0, 0.0, 1.0, 0.0, 0.0]]),
            Err(DefinitionError::EmptyStartingFigure)
        ));
        let point = LineString::from(vec![(0.0, 0.0)]);
        assert!(matches!(
            Ifs::new(point, vec![]),
            Err(DefinitionError::EmptyTransformList)
        ));
    }

    #[test]
    fn test_to_multiline_collects_generation() {
        let mut ifs = Ifs::new(
            unit_square(),
            vec![
                [0.5, 0.0, 0.0, 0.5, 0.0, 0.0],
                [0.5, 0.0, 0.0, 0.5, 5.0, 0.0],
            ],
        )
        .unwrap();
        ifs.iterate(2);
        assert_eq!(ifs.to_multiline().0.len(), 4);
    }
}
