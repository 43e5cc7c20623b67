//! The tea module provides a generalized escape-time evaluator: an
//! arbitrary recurrence from [`crate::tea::expr`] iterated over a sampled
//! complex-plane grid, Mandelbrot and Julia sets being the familiar special
//! cases. Take a look at the [`crate::tea::Tea`] struct for more details,
//! and examples.

pub mod expr;

use crate::color::ColorRamp;
use crate::errors::DefinitionError;
use expr::Expression;
use num::complex::Complex64;
use rayon::prelude::*;
use std::f64::consts::LN_2;

/// Runs one cell to escape or budget exhaustion. The count is the number of
/// completed in-radius evaluations; the evaluation that leaves the radius
/// (or overflows to a non-finite value) is not counted. Returns the count
/// and the last value computed.
fn evaluate_cell(
    expression: &Expression,
    c: Complex64,
    escape_radius: f64,
    budget: u32,
    scratch: &mut Vec<Complex64>,
) -> (u32, Complex64) {
    let mut z = Complex64::new(0.0, 0.0);
    let mut count = 0;
    while count < budget {
        z = expression.eval(z, c, scratch);
        if !z.re.is_finite() || !z.im.is_finite() || z.norm() > escape_radius {
            break;
        }
        count += 1;
    }
    (count, z)
}

/// # Tea
///
/// An escape-time grid evaluator. Construction maps a pixel-space window of
/// `width x height`, sampled every `sample_step` pixels, onto a rectangle of
/// the complex plane; each grid cell holds one complex sample. A call to
/// [`Tea::iterate`] runs the recurrence at every cell, starting the iterated
/// variable at zero with the parameter bound to the cell's sample, until the
/// value's magnitude exceeds the escape radius or the budget runs out.
///
/// Cells that exhaust the budget keep a count equal to the budget and are
/// "inside" the set; everything else escaped. Each `iterate` call recomputes
/// the whole grid for its budget, so results never mix budgets. Rows are
/// evaluated in parallel.
///
/// Grid accessors take `(col, row)` with the origin cell sampling the
/// `(x_min, y_min)` corner of the plot range.
///
/// # Example
///
/// ```rust
/// use fractogen::tea::Tea;
///
/// let mut tea = Tea::new(100, 100, 10, [-2.0, 2.0, -2.0, 2.0], "z*z + c", "z", "c", 2.0)
///     .unwrap();
/// tea.iterate(25);
/// assert_eq!(tea.dimensions(), (10, 10));
/// // c = -2 + -2i is far outside the set; the center never leaves it.
/// assert!(tea.escaped(0, 0));
/// assert!(!tea.escaped(5, 5));
/// ```
#[derive(Clone, Debug)]
pub struct Tea {
    cols: usize,
    rows: usize,
    samples: Vec<Complex64>,
    counts: Vec<u32>,
    last_values: Vec<Complex64>,
    expression: Expression,
    escape_radius: f64,
    plot_range: [f64; 4],
    max_iterations: u32,
}

impl Tea {
    /// # new
    ///
    /// Builds the sampling grid and compiles the recurrence. `plot_range` is
    /// `[x_min, x_max, y_min, y_max]`; the cell at `(col, row)` samples
    /// `x_min + col*sample_step*(x_max - x_min)/width` (and likewise for y),
    /// mirroring a pixel-to-plane projection of the window. Fails on a
    /// window that yields no cells, a non-positive or non-finite escape
    /// radius, or a recurrence that does not parse.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        width: u32,
        height: u32,
        sample_step: u32,
        plot_range: [f64; 4],
        sequence: &str,
        next_member: &str,
        explore_var: &str,
        escape_radius: f64,
    ) -> Result<Tea, DefinitionError> {
        if sample_step == 0 || width / sample_step == 0 || height / sample_step == 0 {
            return Err(DefinitionError::BadSampleWindow {
                width,
                height,
                step: sample_step,
            });
        }
        if !(escape_radius > 0.0 && escape_radius.is_finite()) {
            return Err(DefinitionError::BadEscapeRadius(escape_radius));
        }
        let expression = Expression::parse(sequence, next_member, explore_var)?;

        let cols = (width / sample_step) as usize;
        let rows = (height / sample_step) as usize;
        let [x_min, x_max, y_min, y_max] = plot_range;
        let x_scale = (x_max - x_min) / width as f64;
        let y_scale = (y_max - y_min) / height as f64;
        let step = sample_step as usize;
        let mut samples = Vec::with_capacity(cols * rows);
        for row in 0..rows {
            let y = y_min + (row * step) as f64 * y_scale;
            for col in 0..cols {
                let x = x_min + (col * step) as f64 * x_scale;
                samples.push(Complex64::new(x, y));
            }
        }

        Ok(Tea {
            cols,
            rows,
            samples,
            counts: vec![0; cols * rows],
            last_values: vec![Complex64::new(0.0, 0.0); cols * rows],
            expression,
            escape_radius,
            plot_range,
            max_iterations: 0,
        })
    }

    /// # iterate
    ///
    /// Recomputes every cell with the given iteration budget, replacing any
    /// previous pass outright. Rows are distributed across the rayon pool,
    /// each worker carrying its own evaluation scratch stack.
    pub fn iterate(&mut self, max_iterations: u32) -> &mut Self {
        self.max_iterations = max_iterations;
        let expression = &self.expression;
        let escape_radius = self.escape_radius;
        let cols = self.cols;
        self.counts
            .par_chunks_mut(cols)
            .zip(self.last_values.par_chunks_mut(cols))
            .zip(self.samples.par_chunks(cols))
            .for_each_init(Vec::new, |scratch, ((count_row, value_row), sample_row)| {
                for ((count, value), &c) in count_row
                    .iter_mut()
                    .zip(value_row.iter_mut())
                    .zip(sample_row)
                {
                    let (cell_count, cell_value) =
                        evaluate_cell(expression, c, escape_radius, max_iterations, scratch);
                    *count = cell_count;
                    *value = cell_value;
                }
            });
        self
    }

    fn index(&self, col: usize, row: usize) -> usize {
        row * self.cols + col
    }

    /// Grid shape as `(cols, rows)`.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.cols, self.rows)
    }

    /// The budget used by the most recent [`Tea::iterate`] call.
    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    pub fn escape_radius(&self) -> f64 {
        self.escape_radius
    }

    /// The plot rectangle as `[x_min, x_max, y_min, y_max]`.
    pub fn plot_range(&self) -> [f64; 4] {
        self.plot_range
    }

    /// Per-cell iteration counts, row-major.
    pub fn counts(&self) -> &[u32] {
        &self.counts
    }

    /// Per-cell last computed values, row-major.
    pub fn last_values(&self) -> &[Complex64] {
        &self.last_values
    }

    /// The complex sample backing one cell.
    pub fn sample(&self, col: usize, row: usize) -> Complex64 {
        self.samples[self.index(col, row)]
    }

    /// Whether the cell left the escape radius within the last budget.
    pub fn escaped(&self, col: usize, row: usize) -> bool {
        self.counts[self.index(col, row)] < self.max_iterations
    }

    /// # smooth_index
    ///
    /// The continuous escape index `count + 1 - ln(ln(|z|))/ln(2)`, with the
    /// magnitude floored at `1e-10` so the inner logarithm stays away from
    /// zero. Returns `None` for cells inside the set. Cells that escaped by
    /// overflowing to a non-finite value fall back to the plain count.
    pub fn smooth_index(&self, col: usize, row: usize) -> Option<f64> {
        if !self.escaped(col, row) {
            return None;
        }
        let idx = self.index(col, row);
        let count = self.counts[idx] as f64;
        let magnitude = self.last_values[idx].norm().max(1e-10);
        let smooth = count + 1.0 - magnitude.ln().ln() / LN_2;
        Some(if smooth.is_finite() { smooth } else { count })
    }

    /// # boundary_mask
    ///
    /// Marks the cells sitting on the inside/escaped boundary: a cell is set
    /// when any of its 4-connected neighbours has the other classification.
    /// Row-major, same shape as the count grid.
    pub fn boundary_mask(&self) -> Vec<bool> {
        let mut mask = vec![false; self.cols * self.rows];
        for row in 0..self.rows {
            for col in 0..self.cols {
                let here = self.escaped(col, row);
                let mut boundary = false;
                if col > 0 {
                    boundary |= self.escaped(col - 1, row) != here;
                }
                if col + 1 < self.cols {
                    boundary |= self.escaped(col + 1, row) != here;
                }
                if row > 0 {
                    boundary |= self.escaped(col, row - 1) != here;
                }
                if row + 1 < self.rows {
                    boundary |= self.escaped(col, row + 1) != here;
                }
                mask[self.index(col, row)] = boundary;
            }
        }
        mask
    }

    /// # colorize
    ///
    /// One hex color per cell, row-major. Escaped cells map their smooth
    /// index, normalized by the budget, through the ramp; inside cells get
    /// the ramp's interior color.
    pub fn colorize(&self, ramp: &ColorRamp) -> Vec<String> {
        let budget = self.max_iterations.max(1) as f64;
        let mut colors = Vec::with_capacity(self.cols * self.rows);
        for row in 0..self.rows {
            for col in 0..self.cols {
                match self.smooth_index(col, row) {
                    Some(smooth) => colors.push(ramp.color_at(smooth / budget)),
                    None => colors.push(ramp.interior_color().to_string()),
                }
            }
        }
        colors
    }
}
