//! State Snapshotter Tests
//!
//! Tests for:
//! - Record shape: key order, dotted keys, registry-resolved `type`
//! - Missing intermediates and non-primitive values omitted
//! - Length / order preservation over a tracked list
//! - SceneSnapshot JSON shape
//! - Number formatting shared with the graph dump

use serde_json::json;
use stagehand::host::{HostAdapter, ObjectRef, SyntheticHost, Value};
use stagehand::probe::{GraphSerializer, Primitive, PropertyPath, RedactKeys, SceneSnapshot, StateSnapshotter};
use stagehand::registry::TypeRegistry;
use stagehand::settings::ProbeSettings;

// ============================================================================
// Helper
// ============================================================================

fn paths(list: &[&str]) -> Vec<PropertyPath> {
    list.iter().map(|p| p.parse().unwrap()).collect()
}

fn discovered(host: &SyntheticHost) -> TypeRegistry {
    let registry = TypeRegistry::new();
    registry.discover(&host.library().unwrap(), "PIXI", 2);
    registry
}

// ============================================================================
// Records
// ============================================================================

#[test]
fn record_follows_path_order() {
    let host = SyntheticHost::new();
    let registry = discovered(&host);
    let paths = paths(&["y", "name", "type", "x"]);

    let sprite = host.classes().sprite("hero", "hero.png");
    sprite.set("x", 12.0);
    sprite.set("y", 34.0);

    let record = StateSnapshotter::new(&registry, &paths).record(&sprite);
    let keys: Vec<&str> = record.keys().collect();
    assert_eq!(keys, ["y", "name", "type", "x"]);
    assert_eq!(record.get("type"), Some(&Primitive::String("PIXI.Sprite".into())));
    assert_eq!(record.get("x").and_then(Primitive::as_f64), Some(12.0));
}

#[test]
fn record_flattens_nested_paths() {
    let host = SyntheticHost::new();
    let registry = discovered(&host);
    let paths = paths(&["texture.baseTexture.resource.url", "texture.frame.width", "scale.x"]);

    let sprite = host.classes().sprite("hero", "assets/hero.png");
    let record = StateSnapshotter::new(&registry, &paths).record(&sprite);

    assert_eq!(
        record.get("texture.baseTexture.resource.url").and_then(Primitive::as_str),
        Some("assets/hero.png")
    );
    assert_eq!(record.get("texture.frame.width").and_then(Primitive::as_f64), Some(64.0));
    assert_eq!(record.get("scale.x").and_then(Primitive::as_f64), Some(1.0));
}

#[test]
fn record_omits_missing_intermediates() {
    let host = SyntheticHost::new();
    let registry = discovered(&host);
    let paths = paths(&["name", "anchor.x", "anchor.y", "texture.frame.x"]);

    let sprite = host.classes().sprite("no-anchor", "a.png");
    sprite.remove("anchor");
    sprite.remove("texture");

    let record = StateSnapshotter::new(&registry, &paths).record(&sprite);
    assert!(!record.contains_key("anchor.x"));
    assert!(!record.contains_key("anchor.y"));
    assert!(!record.contains_key("texture.frame.x"));
    assert_eq!(record.len(), 1);
}

#[test]
fn record_omits_non_primitive_values() {
    let host = SyntheticHost::new();
    let registry = discovered(&host);
    let paths = paths(&["scale", "children", "texture", "name"]);

    let sprite = host.classes().sprite("hero", "a.png");
    let record = StateSnapshotter::new(&registry, &paths).record(&sprite);

    let keys: Vec<&str> = record.keys().collect();
    assert_eq!(keys, ["name"]);
}

#[test]
fn record_keeps_explicit_null() {
    let registry = TypeRegistry::new();
    let paths = paths(&["name"]);

    let node = ObjectRef::new().with("name", Value::Null);
    let record = StateSnapshotter::new(&registry, &paths).record(&node);
    assert_eq!(record.get("name"), Some(&Primitive::Null));
}

#[test]
fn record_indexes_into_lists() {
    let registry = TypeRegistry::new();
    let paths = paths(&["points.1.x"]);

    let node = ObjectRef::new().with(
        "points",
        Value::from(vec![
            Value::from(ObjectRef::new().with("x", 1.0)),
            Value::from(ObjectRef::new().with("x", 2.0)),
        ]),
    );
    let record = StateSnapshotter::new(&registry, &paths).record(&node);
    assert_eq!(record.get("points.1.x").and_then(Primitive::as_f64), Some(2.0));
}

#[test]
fn text_node_default_record() {
    let host = SyntheticHost::new();
    let registry = discovered(&host);
    let paths = ProbeSettings::default().property_paths().unwrap();

    let title = host.classes().text("title", "Main Menu");
    let record = StateSnapshotter::new(&registry, &paths).record(&title);

    assert_eq!(record.get("type").and_then(Primitive::as_str), Some("PIXI.Text"));
    assert_eq!(record.get("text").and_then(Primitive::as_str), Some("Main Menu"));
    assert_eq!(record.get("_font").and_then(Primitive::as_str), Some("normal 26px Arial"));
    assert_eq!(record.get("visible").and_then(Primitive::as_bool), Some(true));
    assert!(!record.contains_key("texture.baseTexture.resource.url"));
}

// ============================================================================
// Snapshots
// ============================================================================

#[test]
fn snapshot_preserves_length_and_order() {
    let host = SyntheticHost::new();
    let registry = discovered(&host);
    let paths = paths(&["name"]);

    let nodes: Vec<ObjectRef> = (0..8)
        .map(|i| host.classes().sprite(&format!("n{i}"), "n.png"))
        .collect();
    // Duplicates keep their slot.
    let mut tracked = nodes.clone();
    tracked.push(nodes[3].clone());

    let records = StateSnapshotter::new(&registry, &paths).snapshot(&tracked);
    assert_eq!(records.len(), tracked.len());
    for (record, node) in records.iter().zip(&tracked) {
        assert_eq!(
            record.get("name").and_then(Primitive::as_str),
            node.get("name").as_ref().and_then(Value::as_str)
        );
    }
}

#[test]
fn snapshot_of_empty_list_is_empty() {
    let registry = TypeRegistry::new();
    let paths = paths(&["name"]);
    assert!(StateSnapshotter::new(&registry, &paths).snapshot(&[]).is_empty());
}

#[test]
fn scene_snapshot_json_shape() {
    let host = SyntheticHost::new();
    let registry = discovered(&host);
    let paths = paths(&["name", "type", "visible"]);

    let sprite = host.classes().sprite("hero", "hero.png");
    let snapshot = SceneSnapshot {
        resolution: 2.0,
        size: [800.0, 600.0],
        scene: StateSnapshotter::new(&registry, &paths).snapshot(&[sprite]),
    };

    let value = serde_json::to_value(&snapshot).unwrap();
    assert_eq!(
        value,
        json!({
            "resolution": 2,
            "size": [800, 600],
            "scene": [{ "name": "hero", "type": "PIXI.Sprite", "visible": true }]
        })
    );

    let back: SceneSnapshot = serde_json::from_value(value).unwrap();
    assert_eq!(back, snapshot);
}

#[test]
fn snapshot_numbers_match_graph_dump() {
    let host = SyntheticHost::new();
    let registry = discovered(&host);
    let paths = paths(&["name", "x", "y", "alpha"]);

    let sprite = host.classes().sprite("hero", "hero.png");
    sprite.set("x", 12.0);
    sprite.set("y", -3.0);
    sprite.set("alpha", 0.5);
    let snapshot = SceneSnapshot {
        resolution: 1.0,
        size: [800.0, 600.0],
        scene: StateSnapshotter::new(&registry, &paths).snapshot(std::slice::from_ref(&sprite)),
    };

    let text = serde_json::to_string(&snapshot).unwrap();
    assert!(text.contains(r#""resolution":1,"#), "{text}");
    assert!(text.contains(r#""size":[800,600]"#), "{text}");
    assert!(text.contains(r#""x":12,"#), "{text}");
    assert!(text.contains(r#""y":-3,"#), "{text}");
    assert!(text.contains(r#""alpha":0.5"#), "{text}");

    let record: serde_json::Value = serde_json::from_str(&text).unwrap();
    let graph: serde_json::Value =
        serde_json::from_str(&GraphSerializer::new().serialize_object(&sprite, &RedactKeys::new()).unwrap()).unwrap();
    for key in ["x", "y", "alpha"] {
        assert_eq!(record["scene"][0][key], graph[key], "{key}");
    }
}

#[test]
fn non_finite_snapshot_numbers_become_null() {
    let snapshot = SceneSnapshot {
        resolution: f64::NAN,
        size: [f64::INFINITY, 600.0],
        scene: Vec::new(),
    };
    let text = serde_json::to_string(&snapshot).unwrap();
    assert_eq!(text, r#"{"resolution":null,"size":[null,600],"scene":[]}"#);
}
