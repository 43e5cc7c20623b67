use crate::errors::WordError;
use crate::geometry::Bounds;
use crate::stack::Stack;
use geo_types::{Coord, Line, LineString, MultiLineString, Point};
use std::f64::consts::PI;

/// Helper function to convert degrees to radians
pub fn degrees(deg: f64) -> f64 {
    PI * (deg / 180.0)
}

/// # Turtle
///
/// Logo-style turtle: a pen with a position and a heading, walked one fixed
/// step at a time. Every [`Turtle::forward`] with the pen down records one
/// line segment; the running bounding box grows on every move whether or not
/// the pen touches the paper. The recorded segments (plus the box) are what
/// the rendering side consumes.
///
/// Heading is kept in radians normalized to `[0, 2π)` internally and exposed
/// in degrees, matching the rest of the crate's degree-based API.
///
/// # Example
///
/// ```rust
/// use fractogen::turtle::Turtle;
///
/// let mut turtle = Turtle::new(10.0);
/// turtle.pen_down().forward().rotate(90.0).forward();
/// assert_eq!(turtle.lines().len(), 2);
/// let end = turtle.position();
/// assert!((end.x() - 10.0).abs() < 1e-9);
/// assert!((end.y() - 10.0).abs() < 1e-9);
/// ```
#[derive(Clone, Debug)]
pub struct Turtle {
    position: Point<f64>,
    heading: f64,
    step: f64,
    pen: bool,
    lines: Vec<Line<f64>>,
    bounds: Bounds,
}

impl Turtle {
    /// New turtle at the origin, heading 0°, pen up.
    pub fn new(step: f64) -> Self {
        Turtle::at(step, Point::new(0.0, 0.0), 0.0)
    }

    /// New turtle at an arbitrary start pose.
    pub fn at(step: f64, position: Point<f64>, heading_degrees: f64) -> Self {
        Turtle {
            position,
            heading: degrees(heading_degrees).rem_euclid(2.0 * PI),
            step,
            pen: false,
            lines: vec![],
            bounds: Bounds::of(position),
        }
    }

    pub fn position(&self) -> Point<f64> {
        self.position
    }

    /// Directly reposition the turtle (no segment is drawn). Used to restore
    /// saved branch state.
    pub fn set_position(&mut self, position: Point<f64>) -> &mut Self {
        self.position = position;
        self
    }

    /// Heading in degrees, `[0, 360)`.
    pub fn heading(&self) -> f64 {
        self.heading * 180.0 / PI
    }

    /// Directly set the heading in degrees. Used to restore saved branch
    /// state.
    pub fn set_heading(&mut self, heading_degrees: f64) -> &mut Self {
        self.heading = degrees(heading_degrees).rem_euclid(2.0 * PI);
        self
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn set_step(&mut self, step: f64) -> &mut Self {
        self.step = step;
        self
    }

    pub fn is_pen_down(&self) -> bool {
        self.pen
    }

    pub fn pen_down(&mut self) -> &mut Self {
        self.pen = true;
        self
    }

    pub fn pen_up(&mut self) -> &mut Self {
        self.pen = false;
        self
    }

    /// Turn by `delta_degrees` (positive is counter-clockwise in standard
    /// coordinates). The heading wraps back into `[0, 2π)`.
    pub fn rotate(&mut self, delta_degrees: f64) -> &mut Self {
        self.heading = (self.heading + degrees(delta_degrees)).rem_euclid(2.0 * PI);
        self
    }

    /// Advance one step along the current heading. With the pen down the
    /// `(previous, new)` pair is recorded as a segment; the bounding box is
    /// updated either way.
    pub fn forward(&mut self) -> &mut Self {
        let prev = self.position;
        self.position = prev
            + Point::new(
                self.step * self.heading.cos(),
                self.step * self.heading.sin(),
            );
        if self.pen {
            self.lines.push(Line::new(prev, self.position));
        }
        self.bounds.expand(prev);
        self.bounds.expand(self.position);
        self
    }

    /// Segments recorded so far, in draw order.
    pub fn lines(&self) -> &[Line<f64>] {
        &self.lines
    }

    /// Bounding box over every position the turtle visited.
    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    /// Translate the whole recorded figure so the bounding-box centroid lands
    /// on `(x, y)`. This is a post-process over the finished drawing, not an
    /// incremental operation; calling it again with the same target is a
    /// no-op.
    pub fn center_to(&mut self, x: f64, y: f64) -> &mut Self {
        let delta: Coord<f64> = (Point::new(x, y) - self.bounds.center()).into();
        for line in self.lines.iter_mut() {
            line.start = line.start + delta;
            line.end = line.end + delta;
        }
        self.bounds.translate(delta.x, delta.y);
        self
    }

    /// The recorded segments stitched into polylines: consecutive segments
    /// that share an endpoint become one [`LineString`]. Handy for plotters
    /// and SVG writers that prefer paths over thousands of two-point lines.
    pub fn to_multiline(&self) -> MultiLineString<f64> {
        let mut out: Vec<LineString<f64>> = vec![];
        let mut current: Vec<Coord<f64>> = vec![];
        for segment in &self.lines {
            match current.last() {
                Some(last) if *last == segment.start => current.push(segment.end),
                Some(_) => {
                    out.push(LineString::new(std::mem::take(&mut current)));
                    current.push(segment.start);
                    current.push(segment.end);
                }
                None => {
                    current.push(segment.start);
                    current.push(segment.end);
                }
            }
        }
        if current.len() >= 2 {
            out.push(LineString::new(current));
        }
        MultiLineString::new(out)
    }

    /// # walk_word
    ///
    /// Interpret a generated symbol word, one character at a time:
    ///
    /// * `+` — rotate by `+angle_degrees`
    /// * `-` — rotate by `-angle_degrees`
    /// * `f` — pen up, then forward
    /// * `[` — save `(position, heading)`
    /// * `]` — restore the most recently saved `(position, heading)`
    /// * anything else — pen down, then forward
    ///
    /// A `]` without a matching `[` is a malformed word and fails
    /// immediately with [`WordError::UnbalancedBranch`].
    ///
    /// # Example
    ///
    /// ```rust
    /// use fractogen::turtle::Turtle;
    ///
    /// let mut turtle = Turtle::new(10.0);
    /// turtle.walk_word("F[+F]F", 90.0).unwrap();
    /// assert_eq!(turtle.lines().len(), 3);
    /// ```
    pub fn walk_word(&mut self, word: &str, angle_degrees: f64) -> Result<&mut Self, WordError> {
        let mut saved: Stack<(Point<f64>, f64)> = Stack::new();
        for (index, symbol) in word.chars().enumerate() {
            match symbol {
                '+' => {
                    self.rotate(angle_degrees);
                }
                '-' => {
                    self.rotate(-angle_degrees);
                }
                'f' => {
                    self.pen_up().forward();
                }
                '[' => saved.push((self.position, self.heading())),
                ']' => {
                    let (position, heading) = saved
                        .pop()
                        .map_err(|_| WordError::UnbalancedBranch(index))?;
                    self.set_position(position).set_heading(heading);
                }
                _ => {
                    self.pen_down().forward();
                }
            }
        }
        Ok(self)
    }
}
