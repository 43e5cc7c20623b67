use anyhow::Result;
use fractogen::prelude::*;
use geo_types::LineString;

/// Builds the Sierpinski triangle as an IFS and fits it to a 1280x720
/// window, the same flow a plotter frontend would run.
fn main() -> Result<()> {
    let triangle = LineString::from(vec![(0.0, 0.0), (1.0, 0.0), (0.5, 1.0), (0.0, 0.0)]);
    let mut sierpinski = Ifs::new(
        triangle,
        vec![
            [0.5, 0.0, 0.0, 0.5, 0.0, 0.0],
            [0.5, 0.0, 0.0, 0.5, 0.5, 0.0],
            [0.5, 0.0, 0.0, 0.5, 0.25, 0.5],
        ],
    )?;

    sierpinski
        .iterate(6)
        .scale(600.0)
        .center_to(640.0, 360.0);

    println!(
        "{} figures after {} generations",
        sierpinski.figures().len(),
        sierpinski.total_iterations()
    );
    let bounds = sierpinski.bounds();
    println!(
        "fitted to {:.0} x {:.0} at ({:.0}, {:.0})",
        bounds.width(),
        bounds.height(),
        bounds.center().x(),
        bounds.center().y()
    );

    // One MultiLineString, ready for an SVG writer or plotter driver.
    let multiline = sierpinski.to_multiline();
    println!("{} polylines in the handoff geometry", multiline.0.len());

    Ok(())
}
