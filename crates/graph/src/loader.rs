//! Builds a [`StarGraph`] from JSON map data.
//!
//! ```json
//! { "systems": [
//!     { "id": 1, "name": "Sol", "position": [0, 0, 0], "faction": "UEE",
//!       "jump_points": [ { "destination": 2, "type": "NORMAL" } ] }
//! ] }
//! ```

use crate::graph::{GraphBuilder, JumpKind, StarGraph, System, SystemId};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
struct MapData {
    systems: Vec<SystemRecord>,
}

#[derive(Debug, Deserialize)]
struct SystemRecord {
    id: u32,
    name: String,
    #[serde(default)]
    position: [f64; 3],
    #[serde(default)]
    faction: String,
    #[serde(default)]
    hostile: bool,
    #[serde(default)]
    off_limits: bool,
    #[serde(default)]
    jump_points: Vec<JumpPointRecord>,
}

#[derive(Debug, Deserialize)]
struct JumpPointRecord {
    destination: u32,
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    length: Option<f64>,
}

pub fn load_map(path: &Path) -> Result<StarGraph> {
    let file = File::open(path)
        .with_context(|| format!("failed to open map file {}", path.display()))?;
    let data: MapData = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("failed to parse map file {}", path.display()))?;
    let graph = build(data)?;
    info!(
        path = %path.display(),
        systems = graph.system_count(),
        jump_points = graph.jump_point_count(),
        "map loaded"
    );
    Ok(graph)
}

pub fn parse_map(content: &str) -> Result<StarGraph> {
    let data: MapData = serde_json::from_str(content).context("failed to parse map data")?;
    build(data)
}

fn build(data: MapData) -> Result<StarGraph> {
    let mut builder = GraphBuilder::default();

    // Systems first, so jump points can reference any of them.
    for record in &data.systems {
        builder
            .add_system(system_from(record))
            .with_context(|| format!("invalid system '{}'", record.name))?;
    }

    for record in data.systems {
        for jump in record.jump_points {
            let kind = match jump.kind.as_deref() {
                None => JumpKind::Undiscovered,
                Some(code) => JumpKind::from_code(code).unwrap_or_else(|| {
                    warn!(system = record.id, code, "unknown jump point type, treating as undiscovered");
                    JumpKind::Undiscovered
                }),
            };
            // A bad jump point drops only that connection.
            if let Err(e) = builder.connect_named(
                SystemId(record.id),
                SystemId(jump.destination),
                kind,
                jump.name,
                jump.length,
            ) {
                warn!(
                    system = record.id,
                    destination = jump.destination,
                    error = %e,
                    "skipping invalid jump point"
                );
            }
        }
    }

    Ok(builder.build())
}

fn system_from(record: &SystemRecord) -> System {
    let mut system = System::new(record.id, record.name.clone(), record.position)
        .with_faction(record.faction.clone());
    system.hostile = record.hostile;
    system.off_limits = record.off_limits;
    system
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_systems_and_jump_points() {
        let graph = parse_map(
            r#"{ "systems": [
                { "id": 1, "name": "Sol", "position": [0, 0, 0],
                  "jump_points": [ { "destination": 2, "type": "normal" } ] },
                { "id": 2, "name": "Vega", "position": [0, 3, 4], "hostile": true,
                  "jump_points": [ { "destination": 1 } ] }
            ] }"#,
        )
        .unwrap();

        assert_eq!(graph.system_count(), 2);
        let there = graph.jump_point(SystemId(1), SystemId(2)).unwrap();
        assert_eq!(there.kind, JumpKind::Normal);
        assert_eq!(there.length, 5.0);
        let back = graph.opposite(there).unwrap();
        assert_eq!(back.kind, JumpKind::Undiscovered);
        assert!(graph.system(SystemId(2)).unwrap().hostile);
    }

    #[test]
    fn invalid_jump_points_are_skipped() {
        let graph = parse_map(
            r#"{ "systems": [
                { "id": 1, "name": "Sol", "faction": "UEE",
                  "jump_points": [ { "destination": 1 },
                                   { "destination": 7 },
                                   { "destination": 2, "length": -1 },
                                   { "destination": 2, "type": "UNCONF" } ] },
                { "id": 2, "name": "Vega", "position": [1, 0, 0] }
            ] }"#,
        )
        .unwrap();

        assert_eq!(graph.jump_point_count(), 1);
        let jump = graph.jump_point(SystemId(1), SystemId(2)).unwrap();
        assert_eq!(jump.kind.code(), "UNCONF");
        assert_eq!(graph.system(SystemId(1)).unwrap().faction, "UEE");
        assert_eq!(graph.system(SystemId(2)).unwrap().faction, "");
    }
}
