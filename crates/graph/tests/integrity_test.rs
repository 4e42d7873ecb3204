use anyhow::Result;
use starroute_graph::{load_map, JumpKind, StarGraph, System, SystemId, SystemLookup};
use std::collections::HashSet;
use std::fs;
use tempfile::TempDir;

/// A ring of `n` systems with jump points in both directions and a spoke
/// from every system to the hub at id 0.
fn ring(n: u32) -> Result<StarGraph> {
    let mut builder = StarGraph::builder();
    builder.add_system(System::new(0, "Hub", [0.0, 0.0, 0.0]))?;
    for i in 1..=n {
        let angle = i as f64 / n as f64 * std::f64::consts::TAU;
        builder.add_system(System::new(
            i,
            format!("Ring {}", i),
            [angle.cos() * 10.0, angle.sin() * 10.0, 0.0],
        ))?;
    }
    for i in 1..=n {
        let next = if i == n { 1 } else { i + 1 };
        builder.connect_both(SystemId(i), SystemId(next), JumpKind::Normal)?;
        builder.connect(SystemId(i), SystemId(0), JumpKind::Unconfirmed)?;
    }
    Ok(builder.build())
}

#[test]
fn test_graph_integrity_ring() -> Result<()> {
    let n = 50;
    let graph = ring(n)?;

    assert_eq!(graph.system_count(), n as usize + 1);
    assert_eq!(graph.jump_point_count(), n as usize * 3);

    for system in graph.systems() {
        for jump in graph.jump_points_from(system.id) {
            assert_ne!(jump.source, jump.destination, "self loop in {}", jump.name);
            assert_eq!(jump.source, system.id);
            assert!(graph.contains(jump.destination));
            assert!(jump.length >= 0.0);

            // Ring jumps are reciprocal, spokes to the hub are not.
            let opposite = graph.opposite(jump);
            if jump.destination == SystemId(0) {
                assert!(opposite.is_none());
            } else {
                let back = opposite.expect("ring jump should have an opposite");
                assert_eq!(back.destination, jump.source);
                assert_eq!(back.length, jump.length);
            }
        }
    }

    let names: HashSet<&str> = graph.systems().map(|s| s.name.as_str()).collect();
    assert_eq!(names.len(), n as usize + 1);
    assert!(graph.resolve(SystemId(n + 1)).is_none());

    Ok(())
}

#[test]
fn test_load_map_from_file() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("systems.json");
    fs::write(
        &path,
        r#"{ "systems": [
            { "id": 10, "name": "Stanton", "position": [0, 0, 0], "faction": "UEE",
              "jump_points": [
                { "destination": 11, "type": "NORMAL", "name": "Stanton - Pyro" },
                { "destination": 12, "type": "UNCONF", "length": 7.5 }
              ] },
            { "id": 11, "name": "Pyro", "position": [6, 8, 0], "off_limits": true,
              "jump_points": [ { "destination": 10, "type": "NORMAL" } ] },
            { "id": 12, "name": "Terra", "position": [1, 0, 0] }
        ] }"#,
    )?;

    let graph = load_map(&path)?;
    assert_eq!(graph.system_count(), 3);
    assert_eq!(graph.jump_point_count(), 3);

    let to_pyro = graph.jump_point(SystemId(10), SystemId(11)).unwrap();
    assert_eq!(to_pyro.name, "Stanton - Pyro");
    assert_eq!(to_pyro.length, 10.0);

    let to_terra = graph.jump_point(SystemId(10), SystemId(12)).unwrap();
    assert_eq!(to_terra.kind, JumpKind::Unconfirmed);
    assert_eq!(to_terra.length, 7.5);
    assert_eq!(to_terra.name, "[Stanton to Terra]");

    assert_eq!(graph.system(SystemId(10)).unwrap().faction, "UEE");
    assert!(graph.system(SystemId(11)).unwrap().off_limits);
    Ok(())
}

#[test]
fn test_load_map_reports_missing_file() {
    let err = load_map(std::path::Path::new("/nope/systems.json")).unwrap_err();
    assert!(err.to_string().contains("failed to open map file"));
}

#[test]
fn test_load_map_skips_dangling_jump_point() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("systems.json");
    fs::write(
        &path,
        r#"{ "systems": [
            { "id": 1, "name": "Sol", "jump_points": [ { "destination": 2 }, { "destination": 3 } ] },
            { "id": 3, "name": "Nyx", "position": [0, 1, 0] }
        ] }"#,
    )?;
    let graph = load_map(&path)?;
    assert_eq!(graph.system_count(), 2);
    assert_eq!(graph.jump_point_count(), 1);
    assert!(graph.jump_point(SystemId(1), SystemId(3)).is_some());
    Ok(())
}
