use anyhow::Result;
use fractogen::prelude::*;
use serde_json::json;

/// Grows the classic bracketed plant and reports what the turtle drew.
/// The definition record is exactly what an on-disk JSON file would hold.
fn main() -> Result<()> {
    let value = json!({
        "name": "plant",
        "axiom": "X",
        "rules": {
            "X": "F+[[X]-X]-F[-FX]+X",
            "F": "FF"
        },
        "rotateByAngle": 25.0
    });
    let def = FractalDef::classify(&value)?;

    let params = GenerateParams {
        step: 4.0,
        iterations: 5,
        start_angle: 65.0,
        ..GenerateParams::default()
    };

    match def.generate(&params)? {
        FractalOutput::Lines { lines, bounds } => {
            println!("{}: {} segments", def.name(), lines.len());
            println!(
                "figure spans {:.1} x {:.1}, centered on ({:.0}, {:.0})",
                bounds.width(),
                bounds.height(),
                bounds.center().x(),
                bounds.center().y()
            );
        }
        _ => unreachable!("an L-system definition generates lines"),
    }

    // The same grammar, driven by hand for progress watching.
    let mut system = LSystem::new(
        "X",
        [
            ('X', "F+[[X]-X]-F[-FX]+X".to_string()),
            ('F', "FF".to_string()),
        ]
        .into_iter()
        .collect(),
    );
    system.iterate_with(5, |word, round| {
        println!("round {}: {} symbols", round, word.len());
    });

    Ok(())
}
