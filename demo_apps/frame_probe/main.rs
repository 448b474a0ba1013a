//! Frame Probe Demo
//!
//! Builds a small synthetic scene, installs the probe, runs a few frames and
//! then takes one consistent sample: freeze, read, unfreeze.
//!
//! ```text
//! RUST_LOG=debug cargo run -p frame_probe -- [settings.json]
//! ```

use anyhow::Context;
use stagehand::host::{ObjectRef, SyntheticHost};
use stagehand::{Probe, ProbeSettings, RedactKeys};

fn build_scene(host: &SyntheticHost) -> ObjectRef {
    let classes = host.classes();
    let stage = classes.container();

    let menu = classes.container();
    menu.set("x", 200.0);
    menu.set("y", 120.0);
    stage.add_child(&menu);

    let play = classes.sprite("play", "assets/ui/play.png");
    play.set("x", 10.0);
    menu.add_child(&play);

    let quit = classes.sprite("quit", "assets/ui/quit.png");
    quit.set("x", 10.0);
    quit.set("y", 80.0);
    menu.add_child(&quit);

    let title = classes.text("title", "Main Menu");
    title.set("x", 260.0);
    title.set("y", 40.0);
    stage.add_child(&title);

    // Not tracked: hidden, and an excluded vector-drawing type.
    let hidden = classes.sprite("tooltip", "assets/ui/tooltip.png");
    hidden.set("visible", false);
    stage.add_child(&hidden);
    stage.add_child(&classes.graphics());

    stage
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = match std::env::args().nth(1) {
        Some(path) => ProbeSettings::load(&path).with_context(|| format!("loading settings from {path}"))?,
        None => ProbeSettings::default(),
    };

    let host = SyntheticHost::new();
    let stage = build_scene(&host);

    let probe = Probe::new(settings)?;
    probe.install(&host)?;

    for _ in 0..3 {
        host.render(&stage);
    }

    probe.freeze();
    host.render(&stage);
    let frame = probe.frame();
    let snapshot = probe.snapshot();
    let redact: RedactKeys = ["parent", "_texture"].into_iter().collect();
    let graph = probe.serialize_graph(&redact)?;
    probe.unfreeze();

    log::info!(
        "Frame {}: {} tracked nodes, {} draws",
        frame.index,
        frame.tracked.len(),
        host.draws()
    );

    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    println!("{graph}");

    let hits = probe.query().of_type("PIXI.Sprite").count();
    log::info!("{hits} sprites on screen");

    Ok(())
}
