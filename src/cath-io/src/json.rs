//! JSON (de)serialisation for the public data types, numbers encoded as
//! strings to avoid precision loss across the FFI-ish language boundary a
//! JSON file represents. Built directly on `serde_json::Value`
//! rather than `#[derive(Serialize)]` on the geometry/alignment types
//! themselves, since those derive plain-numeric serde impls for their own
//! (Rust-internal) uses.

use alignment::Alignment;
use cluster::{Hierarchy, HierarchyRef};
use geometry::{Coord, RigidTransform, Rotation};
use serde_json::{json, Value};

use crate::error::IoError;

fn num(f: f64) -> Value {
    Value::String(f.to_string())
}

fn parse_num(value: &Value, field: &str) -> Result<f64, IoError> {
    value
        .as_str()
        .ok_or_else(|| IoError::Parse(format!("field '{field}' is not a string-encoded number")))?
        .parse::<f64>()
        .map_err(|e| IoError::Parse(format!("field '{field}': {e}")))
}

pub fn coord_to_json(c: &Coord) -> Value {
    json!({"x": num(c.x()), "y": num(c.y()), "z": num(c.z())})
}

pub fn coord_from_json(value: &Value) -> Result<Coord, IoError> {
    let x = parse_num(&value["x"], "x")?;
    let y = parse_num(&value["y"], "y")?;
    let z = parse_num(&value["z"], "z")?;
    Coord::try_new(x, y, z).map_err(|e| IoError::Parse(e.to_string()))
}

pub fn rotation_to_json(r: &Rotation) -> Value {
    let rows = r.rows();
    Value::Array(
        rows.iter()
            .map(|row| Value::Array(row.iter().map(|&cell| num(cell)).collect()))
            .collect(),
    )
}

pub fn rotation_from_json(value: &Value) -> Result<Rotation, IoError> {
    let rows = value.as_array().ok_or_else(|| IoError::Parse("rotation must be a 3x3 array".to_string()))?;
    if rows.len() != 3 {
        return Err(IoError::Parse("rotation must have exactly 3 rows".to_string()));
    }
    let mut flat = [0.0_f64; 9];
    for (r, row) in rows.iter().enumerate() {
        let cells = row.as_array().ok_or_else(|| IoError::Parse("rotation row must be an array".to_string()))?;
        if cells.len() != 3 {
            return Err(IoError::Parse("rotation row must have exactly 3 entries".to_string()));
        }
        for (c, cell) in cells.iter().enumerate() {
            flat[r * 3 + c] = parse_num(cell, "rotation cell")?;
        }
    }
    Rotation::try_new(flat[0], flat[1], flat[2], flat[3], flat[4], flat[5], flat[6], flat[7], flat[8])
        .map_err(|e| IoError::Parse(e.to_string()))
}

pub fn superposition_to_json(transforms: &[RigidTransform]) -> Value {
    Value::Array(
        transforms
            .iter()
            .map(|t| json!({"rotation": rotation_to_json(t.rotation()), "translation": coord_to_json(t.translation())}))
            .collect(),
    )
}

pub fn superposition_from_json(value: &Value) -> Result<Vec<RigidTransform>, IoError> {
    value
        .as_array()
        .ok_or_else(|| IoError::Parse("superposition must be a JSON array".to_string()))?
        .iter()
        .map(|entry| {
            let rotation = rotation_from_json(&entry["rotation"])?;
            let translation = coord_from_json(&entry["translation"])?;
            Ok(RigidTransform::new(rotation, translation))
        })
        .collect()
}

/// Renders an [`Alignment`] as JSON: one object per row, each entry's
/// position as a string-encoded number (or `null` for a gap) and, when
/// present, its score.
pub fn alignment_to_json(alignment: &Alignment) -> Value {
    let rows = (0..alignment.length())
        .map(|row| {
            let cells = (0..alignment.num_entries())
                .map(|entry| {
                    let position = alignment.position_of(entry, row);
                    let score = alignment.score_of(entry, row);
                    json!({
                        "position": position.map_or(Value::Null, |p| Value::String(p.to_string())),
                        "score": score.map_or(Value::Null, |s| Value::String(s.to_string())),
                    })
                })
                .collect::<Vec<_>>();
            Value::Array(cells)
        })
        .collect::<Vec<_>>();
    Value::Array(rows)
}

pub fn alignment_from_json(value: &Value) -> Result<Alignment, IoError> {
    let rows = value.as_array().ok_or_else(|| IoError::Parse("alignment must be a JSON array of rows".to_string()))?;
    let mut positions = Vec::with_capacity(rows.len());
    let mut scores = Vec::with_capacity(rows.len());
    for row in rows {
        let cells = row.as_array().ok_or_else(|| IoError::Parse("alignment row must be a JSON array".to_string()))?;
        let mut parsed_row = Vec::with_capacity(cells.len());
        let mut parsed_scores = Vec::with_capacity(cells.len());
        for cell in cells {
            let position = match &cell["position"] {
                Value::Null => None,
                other => Some(
                    other
                        .as_str()
                        .ok_or_else(|| IoError::Parse("alignment position must be a string-encoded number".to_string()))?
                        .parse::<u32>()
                        .map_err(|e| IoError::Parse(e.to_string()))?,
                ),
            };
            let score = match &cell["score"] {
                Value::Null => None,
                other => Some(
                    other
                        .as_str()
                        .ok_or_else(|| IoError::Parse("alignment score must be a string-encoded number".to_string()))?
                        .parse::<f32>()
                        .map_err(|e| IoError::Parse(e.to_string()))?,
                ),
            };
            parsed_row.push(position);
            parsed_scores.push(score);
        }
        positions.push(parsed_row);
        scores.push(parsed_scores);
    }
    let mut alignment = Alignment::try_new(positions).map_err(|e| IoError::Parse(e.to_string()))?;
    for (row, row_scores) in scores.into_iter().enumerate() {
        for (entry, score) in row_scores.into_iter().enumerate() {
            if let Some(score) = score {
                alignment.set_score(entry, row, score).map_err(|e| IoError::Parse(e.to_string()))?;
            }
        }
    }
    Ok(alignment)
}

pub fn hierarchy_to_json(hierarchy: &Hierarchy) -> Value {
    let layers = (0..hierarchy.num_layers())
        .map(|depth| {
            Value::Array(
                hierarchy
                    .groups_at(depth)
                    .iter()
                    .map(|group| {
                        Value::Array(
                            group
                                .iter()
                                .map(|v| {
                                    json!({
                                        "kind": match v.kind() {
                                            HierarchyRef::Entry => "entry",
                                            HierarchyRef::Cluster => "cluster",
                                        },
                                        "index": v.index(),
                                    })
                                })
                                .collect(),
                        )
                    })
                    .collect(),
            )
        })
        .collect::<Vec<_>>();
    Value::Array(layers)
}

pub fn hierarchy_from_json(value: &Value) -> Result<Hierarchy, IoError> {
    use cluster::{HierarchyGroup, HierarchyValue};

    let layers_json = value.as_array().ok_or_else(|| IoError::Parse("hierarchy must be a JSON array".to_string()))?;
    let mut layers = Vec::with_capacity(layers_json.len());
    for layer in layers_json {
        let groups_json = layer.as_array().ok_or_else(|| IoError::Parse("hierarchy layer must be a JSON array".to_string()))?;
        let mut groups = Vec::with_capacity(groups_json.len());
        for group in groups_json {
            let values_json = group.as_array().ok_or_else(|| IoError::Parse("hierarchy group must be a JSON array".to_string()))?;
            let mut values = Vec::with_capacity(values_json.len());
            for value in values_json {
                let kind = value["kind"].as_str().ok_or_else(|| IoError::Parse("hierarchy value missing 'kind'".to_string()))?;
                let index = value["index"]
                    .as_u64()
                    .ok_or_else(|| IoError::Parse("hierarchy value missing 'index'".to_string()))? as usize;
                values.push(match kind {
                    "entry" => HierarchyValue::entry(index),
                    "cluster" => HierarchyValue::cluster(index),
                    other => return Err(IoError::Parse(format!("unknown hierarchy value kind '{other}'"))),
                });
            }
            groups.push(HierarchyGroup::new(values));
        }
        layers.push(groups);
    }
    Ok(Hierarchy::new(layers))
}

#[cfg(test)]
mod tests {
    use cluster::ClusterEdge;

    use super::*;

    #[test]
    fn coord_round_trips() {
        let c = Coord::try_new(1.5, -2.25, 0.0).unwrap();
        let round_tripped = coord_from_json(&coord_to_json(&c)).unwrap();
        assert_eq!(c, round_tripped);
    }

    #[test]
    fn coord_json_uses_strings_for_numbers() {
        let c = Coord::try_new(1.5, -2.25, 0.0).unwrap();
        let value = coord_to_json(&c);
        assert!(value["x"].is_string());
    }

    #[test]
    fn rotation_round_trips() {
        let r = Rotation::IDENTITY;
        let round_tripped = rotation_from_json(&rotation_to_json(&r)).unwrap();
        assert_eq!(r, round_tripped);
    }

    #[test]
    fn superposition_round_trips() {
        let transforms = vec![RigidTransform::IDENTITY, RigidTransform::new(Rotation::IDENTITY, Coord::try_new(1.0, 2.0, 3.0).unwrap())];
        let round_tripped = superposition_from_json(&superposition_to_json(&transforms)).unwrap();
        assert_eq!(transforms, round_tripped);
    }

    #[test]
    fn alignment_round_trips() {
        let mut alignment = Alignment::try_new(vec![vec![Some(0), None], vec![Some(1), Some(0)]]).unwrap();
        alignment.set_score(0, 0, 0.75).unwrap();
        let round_tripped = alignment_from_json(&alignment_to_json(&alignment)).unwrap();
        assert_eq!(round_tripped.position_of(0, 0), Some(0));
        assert_eq!(round_tripped.position_of(1, 0), None);
        assert_eq!(round_tripped.position_of(1, 1), Some(0));
        assert_eq!(round_tripped.score_of(0, 0), Some(0.75));
        assert_eq!(round_tripped.score_of(1, 1), None);
    }

    #[test]
    fn hierarchy_round_trips() {
        let edges = vec![ClusterEdge::new(0, 1, 0.9), ClusterEdge::new(2, 3, 0.85), ClusterEdge::new(1, 2, 0.4)];
        let hierarchy = cluster::build_hierarchy(4, &edges, &[0.8, 0.3], None).unwrap();
        let round_tripped = hierarchy_from_json(&hierarchy_to_json(&hierarchy)).unwrap();
        assert_eq!(hierarchy.dfs(), round_tripped.dfs());
    }
}
