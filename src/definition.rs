//! Declarative fractal definitions: the serde record types an external
//! loader deserializes into, key-set classification of raw JSON values, and
//! the dispatch that turns a classified definition plus session parameters
//! into generated geometry or an escape-time grid.

use crate::errors::{DefinitionError, GenerateError};
use crate::geometry::Bounds;
use crate::ifs::{Ifs, Transformable};
use crate::l_system::LSystem;
use crate::tea::Tea;
use crate::turtle::Turtle;
use geo_types::{Line, LineString, Point};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An L-system definition: axiom, production rules and the fixed rotation
/// step (degrees) the turtle applies for `+` and `-`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LSystemDef {
    pub name: String,
    pub axiom: String,
    pub rules: HashMap<String, String>,
    #[serde(rename = "rotateByAngle")]
    pub rotate_by_angle: f64,
}

/// An IFS definition: a starting figure as `[x, y]` pairs and a list of
/// six-coefficient affine mapping rows.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IfsDef {
    pub name: String,
    pub starting_figure: Vec<[f64; 2]>,
    pub mappings: Vec<[f64; 6]>,
}

/// An escape-time definition: the recurrence text (`sequence`), the names of
/// the iterated variable (`next_member`) and the per-sample parameter
/// (`explore_var`), the complex-plane rectangle and the escape radius.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TeaDef {
    pub name: String,
    pub sequence: String,
    pub next_member: String,
    pub explore_var: String,
    pub plot_range: [f64; 4],
    pub escape_radius: f64,
}

const LSYSTEM_KEYS: &[&str] = &["name", "axiom", "rules", "rotateByAngle"];
const IFS_KEYS: &[&str] = &["name", "starting_figure", "mappings"];
const TEA_KEYS: &[&str] = &[
    "name",
    "sequence",
    "next_member",
    "explore_var",
    "plot_range",
    "escape_radius",
];

/// # FractalDef
///
/// A classified fractal definition, one variant per family. This is the
/// crate's answer to "which generator does this record drive": an external
/// loader reads a JSON file, [`FractalDef::classify`] names the family from
/// the record's key-set, and [`FractalDef::generate`] runs the matching
/// generator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FractalDef {
    LSystem(LSystemDef),
    Ifs(IfsDef),
    Tea(TeaDef),
}

impl FractalDef {
    /// # classify
    ///
    /// Matches a raw JSON value against the three known key-sets and
    /// deserializes into the corresponding record. A record whose keys fit
    /// no family fails with [`DefinitionError::UnrecognizedShape`] listing
    /// the keys it did have; a record with the right keys but wrong field
    /// types fails with a field-specific message. Either way the failure
    /// fires before any generation work.
    pub fn classify(value: &serde_json::Value) -> Result<FractalDef, DefinitionError> {
        let keys: Vec<String> = match value.as_object() {
            Some(map) => map.keys().cloned().collect(),
            None => {
                return Err(DefinitionError::UnrecognizedShape { keys: vec![] });
            }
        };
        let has_all = |wanted: &[&str]| wanted.iter().all(|key| keys.iter().any(|k| k == key));

        if has_all(LSYSTEM_KEYS) {
            let def: LSystemDef =
                serde_json::from_value(value.clone()).map_err(|err| {
                    DefinitionError::Malformed {
                        kind: "L-system",
                        message: err.to_string(),
                    }
                })?;
            Ok(FractalDef::LSystem(def))
        } else if has_all(IFS_KEYS) {
            let def: IfsDef =
                serde_json::from_value(value.clone()).map_err(|err| {
                    DefinitionError::Malformed {
                        kind: "IFS",
                        message: err.to_string(),
                    }
                })?;
            Ok(FractalDef::Ifs(def))
        } else if has_all(TEA_KEYS) {
            let def: TeaDef =
                serde_json::from_value(value.clone()).map_err(|err| {
                    DefinitionError::Malformed {
                        kind: "TEA",
                        message: err.to_string(),
                    }
                })?;
            Ok(FractalDef::Tea(def))
        } else {
            Err(DefinitionError::UnrecognizedShape { keys })
        }
    }

    /// The definition's display name.
    pub fn name(&self) -> &str {
        match self {
            FractalDef::LSystem(def) => &def.name,
            FractalDef::Ifs(def) => &def.name,
            FractalDef::Tea(def) => &def.name,
        }
    }

    /// # generate
    ///
    /// Runs the generator this definition describes and returns its output,
    /// centered on the middle of the session window where centering applies:
    ///
    /// * L-system: grow the word `iterations` rounds, walk it with a turtle
    ///   starting at `start_angle`, center the figure.
    /// * IFS: iterate `iterations` generations, apply the session `scale`
    ///   and `start_angle` rotation, center the figures.
    /// * TEA: build the sampling grid over the definition's plot range and
    ///   run `iterations` as the escape budget (no centering; the grid is
    ///   already pinned to the window).
    pub fn generate(&self, params: &GenerateParams) -> Result<FractalOutput, GenerateError> {
        let center_x = params.width as f64 / 2.0;
        let center_y = params.height as f64 / 2.0;
        match self {
            FractalDef::LSystem(def) => {
                let rules = char_rules(&def.rules)?;
                if def.axiom.is_empty() {
                    return Err(DefinitionError::Malformed {
                        kind: "L-system",
                        message: "axiom must not be empty".to_string(),
                    }
                    .into());
                }
                let mut system = LSystem::new(def.axiom.clone(), rules);
                system.iterate(params.iterations);
                let mut turtle =
                    Turtle::at(params.step, Point::new(0.0, 0.0), params.start_angle);
                turtle.walk_word(system.word(), def.rotate_by_angle)?;
                turtle.center_to(center_x, center_y);
                Ok(FractalOutput::Lines {
                    lines: turtle.lines().to_vec(),
                    bounds: *turtle.bounds(),
                })
            }
            FractalDef::Ifs(def) => {
                let figure = LineString::from(
                    def.starting_figure
                        .iter()
                        .map(|&[x, y]| (x, y))
                        .collect::<Vec<_>>(),
                );
                let mut ifs = Ifs::new(figure, def.mappings.clone())?;
                ifs.iterate(params.iterations)
                    .scale(params.scale)
                    .rotate(params.start_angle)
                    .center_to(center_x, center_y);
                Ok(FractalOutput::Figures(ifs.figures().to_vec()))
            }
            FractalDef::Tea(def) => {
                let mut tea = Tea::new(
                    params.width,
                    params.height,
                    params.sample_step,
                    def.plot_range,
                    &def.sequence,
                    &def.next_member,
                    &def.explore_var,
                    def.escape_radius,
                )?;
                tea.iterate(params.iterations);
                Ok(FractalOutput::Grid(tea))
            }
        }
    }
}

/// Converts the JSON rule table (string keys) into the rewriter's char
/// table. Every key must be exactly one character.
fn char_rules(rules: &HashMap<String, String>) -> Result<HashMap<char, String>, DefinitionError> {
    let mut table = HashMap::with_capacity(rules.len());
    for (key, replacement) in rules {
        let mut chars = key.chars();
        match (chars.next(), chars.next()) {
            (Some(symbol), None) => {
                table.insert(symbol, replacement.clone());
            }
            _ => {
                return Err(DefinitionError::Malformed {
                    kind: "L-system",
                    message: format!("rule key '{}' is not a single symbol", key),
                });
            }
        }
    }
    Ok(table)
}

/// # GenerateParams
///
/// Per-session knobs: the window the output is fitted to, the turtle step,
/// the escape-grid sampling step, the iteration budget shared by all three
/// families, the start angle, and the IFS post-scale. Defaults match the
/// original tool's command-line defaults (1280x720 window, step 5, one
/// iteration, angle 0).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerateParams {
    pub width: u32,
    pub height: u32,
    pub step: f64,
    pub sample_step: u32,
    pub iterations: u32,
    pub start_angle: f64,
    pub scale: f64,
}

impl Default for GenerateParams {
    fn default() -> Self {
        GenerateParams {
            width: 1280,
            height: 720,
            step: 5.0,
            sample_step: 5,
            iterations: 1,
            start_angle: 0.0,
            scale: 1.0,
        }
    }
}

/// What a generation pass hands to the rendering collaborator: line art for
/// L-systems, point-figures for IFS, the evaluated grid for TEA.
#[derive(Clone, Debug)]
pub enum FractalOutput {
    Lines {
        lines: Vec<Line<f64>>,
        bounds: Bounds,
    },
    Figures(Vec<LineString<f64>>),
    Grid(Tea),
}
