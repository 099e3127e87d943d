//! Two scatter plots sharing an x domain, rendered to a recording context.
//!
//! Run with:
//! `RUST_LOG=trellis_charts=debug cargo run -p trellis_charts --example linked_scatter_demo`

use anyhow::Result;
use serde_json::json;
use trellis_charts::prelude::*;
use trellis_core::{Point, PointerDispatcher, PointerEvent, PointerKind, RecordingContext, SurfaceId};
use trellis_layout::ComponentTree;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let x_top = QuantitativeScale::new();
    let x_bottom = QuantitativeScale::new();
    let y_top = QuantitativeScale::new();
    let y_bottom = QuantitativeScale::new();
    let _link = ScaleDomainCoordinator::new(vec![x_top.clone(), x_bottom.clone()])?;

    let wave = Dataset::new(
        (0..40)
            .map(|i| {
                let t = i as f64 / 4.0;
                json!({ "t": t, "v": t.sin() })
            })
            .collect(),
    );
    let ramp = Dataset::new((0..20).map(|i| json!({ "t": i, "v": i * i })).collect());

    let top = Plot::scatter();
    top.project_scaled("x", "t", &x_top);
    top.project_scaled("y", "v", &y_top);
    top.add_dataset_with_key("wave", wave.clone());

    let bottom = Plot::scatter();
    bottom.project_scaled("x", "t", &x_bottom);
    bottom.project_scaled("y", "v", &y_bottom);
    bottom.project("symbol", Accessor::Constant(json!("diamond")));
    bottom.add_dataset_with_key("ramp", ramp);
    bottom.set_animated(true);

    let mut tree = ComponentTree::new();
    let top_id = tree.insert(top.clone());
    let bottom_id = tree.insert(bottom.clone());
    let root = tree.create_table(vec![vec![Some(top_id)], vec![Some(bottom_id)]])?;

    let mut ctx = RecordingContext::new();
    tree.render_to(root, SurfaceId::new(1), 800.0, 600.0, &mut ctx)?;
    tracing::info!(
        commands = ctx.commands().len(),
        x_domain = ?x_top.domain(),
        "initial render"
    );

    let hover = HoverInteraction::new();
    hover
        .on_hover_over(|mark| tracing::info!(index = mark.index, datum = %mark.datum, "hover over"))
        .on_hover_out(|mark| tracing::info!(index = mark.index, "hover out"));
    let mut dispatcher = PointerDispatcher::new();
    hover.attach(&mut dispatcher, bottom_id.pointer_target(), bottom.clone());

    for x in [0.0, 40.0, 400.0] {
        let local = Point::new(x, 280.0);
        dispatcher.dispatch(&mut PointerEvent::new(
            PointerKind::Move,
            bottom_id.pointer_target(),
            local,
        ));
    }

    wave.push(json!({ "t": 30.0, "v": 0.0 }));
    let relaid = tree.redraw(root, &mut ctx)?;
    tracing::info!(relaid, x_domain = ?x_bottom.domain(), "after data update");

    for elapsed in [0.0, 100.0, 300.0] {
        let mut frame = RecordingContext::new();
        bottom.render_frame(&mut frame, elapsed);
        tracing::info!(elapsed, circles = frame.commands().len(), "frame");
    }
    Ok(())
}
