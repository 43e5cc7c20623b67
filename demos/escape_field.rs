use anyhow::Result;
use fractogen::prelude::*;

/// Evaluates the Mandelbrot recurrence over a coarse grid and dumps it as
/// ASCII, then samples the smooth-colored version of the same field.
fn main() -> Result<()> {
    let mut tea = Tea::new(
        720,
        240,
        10,
        [-2.5, 1.5, -1.2, 1.2],
        "z*z + c",
        "z",
        "c",
        2.0,
    )?;
    tea.iterate(60);

    let (cols, rows) = tea.dimensions();
    let shades = [' ', '.', ':', '-', '=', '+', '*', '%', '@'];
    for row in 0..rows {
        let mut line = String::with_capacity(cols);
        for col in 0..cols {
            let glyph = match tea.smooth_index(col, row) {
                None => '#',
                Some(smooth) => {
                    let t = (smooth / tea.max_iterations() as f64).clamp(0.0, 1.0);
                    shades[(t * (shades.len() - 1) as f64).round() as usize]
                }
            };
            line.push(glyph);
        }
        println!("{}", line);
    }

    // Boundary-only view: just the cells touching the inside/escaped edge.
    let mask = tea.boundary_mask();
    println!("{} boundary cells of {}", mask.iter().filter(|&&b| b).count(), cols * rows);

    // The continuous coloring a rasterizer would consume.
    let ramp = ColorRamp::from_controls(vec![
        (240.0, 80.0, 30.0),
        (180.0, 100.0, 100.0),
        (60.0, 100.0, 100.0),
    ])
    .with_interior_color("#000000");
    let colors = tea.colorize(&ramp);
    println!("first escaped cell colors: {:?}", &colors[..4]);

    Ok(())
}
