// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Greyout basics.
//!
//! Grey out everything in a small model except the selected parts, flip the
//! mode a few times as a UI toggle would, and print what each part shows.
//!
//! Run:
//! - `cargo run -p understory_demos --example greyout_basics`

use understory_greyout::arena::{NodeId, SceneArena};
use understory_greyout::trace::EventLog;
use understory_greyout::{Greyout, Mode};

fn print_parts(scene: &SceneArena<&'static str>, parts: &[(&str, NodeId)]) {
    for (name, id) in parts {
        match scene.appearance_of(*id) {
            Some(material) => println!("  {name:<8} {material}"),
            None => println!("  {name:<8} (no visual)"),
        }
    }
}

fn main() {
    // model -> [hull, rig], hull -> [engine], rig has no visual -> [mast]
    let mut scene = SceneArena::new();
    let model = scene.insert(None, Some("paint"));
    let hull = scene.insert(Some(model), Some("steel"));
    let engine = scene.insert(Some(hull), Some("copper"));
    let rig = scene.insert(Some(model), None);
    let mast = scene.insert(Some(rig), Some("oak"));
    let parts = [
        ("model", model),
        ("hull", hull),
        ("engine", engine),
        ("rig", rig),
        ("mast", mast),
    ];

    let mut greyout = Greyout::new(model, "grey").with_selection([engine, rig]);
    greyout.start(&mut scene).expect("model is a live root");

    for (frame, requested) in [Mode::Greyed, Mode::Greyed, Mode::Normal, Mode::Greyed]
        .into_iter()
        .enumerate()
    {
        greyout.set_mode(requested);
        let ran = greyout.update(&mut scene).expect("model is a live root");
        println!("frame {frame}: {requested:?} (pass ran: {ran})");
        print_parts(&scene, &parts);
    }

    // Explain the final state of the hull.
    let mut log = EventLog::new();
    let selection = greyout.selection().clone();
    greyout
        .reconciler_mut()
        .apply_mode_with_trace(&mut scene, model, &selection, Mode::Greyed, &"grey", &mut log)
        .expect("model is a live root");
    println!("hull: {:?}", log.last_cause(hull));
}
