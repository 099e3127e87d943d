use std::cell::RefCell;
use std::rc::Rc;

use serde_json::json;
use trellis_animation::{Animator, BaseAnimator};
use trellis_charts::plot::{Accessor, MAIN_ANIMATOR, RESET_ANIMATOR};
use trellis_charts::prelude::*;
use trellis_core::{Point, PointerDispatcher, PointerEvent, PointerKind, RecordingContext, SurfaceId};
use trellis_layout::{ComponentTree, Lifecycle};

fn points(coords: &[(f64, f64)]) -> Dataset {
    Dataset::new(coords.iter().map(|(x, y)| json!({"px": x, "py": y})).collect())
}

fn pixel_plot() -> Plot {
    let plot = Plot::scatter();
    plot.project("x", "px");
    plot.project("y", "py");
    plot
}

#[test]
fn containing_marks_pick_the_nearest() {
    let plot = pixel_plot();
    plot.project("r", 15.0);
    plot.add_dataset(points(&[(112.0, 100.0), (103.0, 100.0)]));

    let hit = plot.closest_mark(Point::new(100.0, 100.0), 5.0).unwrap();
    assert_eq!(hit.index, 1);
    assert_eq!(hit.pixel_position, Point::new(103.0, 100.0));
    assert_eq!(hit.datum["px"], 103.0);
}

#[test]
fn nothing_within_radius_is_no_match() {
    let plot = pixel_plot();
    plot.add_dataset(points(&[(0.0, 0.0), (40.0, 40.0)]));
    assert!(plot.closest_mark(Point::new(20.0, 20.0), 5.0).is_none());
    assert!(plot.do_hover(Point::new(20.0, 20.0)).is_none());
    assert!(plot.do_hover(Point::new(4.0, 0.0)).is_some());
}

#[test]
fn hit_test_scans_datasets_in_key_order() {
    let plot = pixel_plot();
    plot.add_dataset_with_key("b", points(&[(10.0, 10.0)]));
    plot.add_dataset_with_key("a", points(&[(10.0, 10.0)]));
    let hit = plot.closest_mark(Point::new(10.0, 10.0), 5.0).unwrap();
    assert_eq!(hit.dataset_key, "b");
}

#[test]
fn dataset_keys_follow_insertion_and_replacement() {
    let plot = Plot::scatter();
    let first = points(&[(1.0, 1.0)]);
    assert_eq!(plot.add_dataset(first.clone()), "_0");
    assert_eq!(plot.add_dataset(points(&[])), "_1");
    plot.add_dataset_with_key("named", points(&[]));

    plot.add_dataset_with_key("_0", points(&[(2.0, 2.0)]));
    assert_eq!(plot.dataset_keys(), vec!["_1", "named", "_0"]);
    assert!(!plot.datasets()[2].ptr_eq(&first));

    assert!(plot.remove_dataset("named").is_ok());
    assert_eq!(
        plot.remove_dataset("named").unwrap_err(),
        ChartError::UnknownDataset("named".into())
    );

    let shared = points(&[]);
    plot.add_dataset(shared.clone());
    plot.add_dataset(shared.clone());
    assert!(plot.remove_dataset_instance(&shared));
    assert_eq!(plot.dataset_keys(), vec!["_1", "_0"]);
}

#[test]
fn default_projectors_fill_unset_attributes() {
    let plot = Plot::scatter();
    plot.project("r", 7.0);
    let attrs = plot.generate_attr_to_projector();
    let meta = PlotMetadata::new("_0");
    let eval = |name: &str| attrs[name](&json!({}), 0, &json!(null), &meta);

    assert_eq!(eval("r"), AttrValue::Number(7.0));
    assert_eq!(eval("opacity"), AttrValue::Number(0.6));
    assert_eq!(eval("symbol"), AttrValue::Symbol(SymbolKind::Circle));
    assert_eq!(eval("fill"), AttrValue::Color(ColorScale::new().range()[0]));
}

#[test]
fn reset_step_only_for_animated_data_changes() {
    let plot = pixel_plot();
    plot.add_dataset(points(&[(1.0, 1.0)]));

    let steps = plot.generate_draw_steps();
    assert_eq!(steps.len(), 1);
    assert_eq!(steps[0].animator, Animator::Null);

    plot.set_animated(true);
    let steps = plot.generate_draw_steps();
    let keys: Vec<_> = steps.iter().map(|s| s.animator_key.as_str()).collect();
    assert_eq!(keys, vec![RESET_ANIMATOR, MAIN_ANIMATOR]);
    let meta = PlotMetadata::new("_0");
    let r = |i: usize| steps[i].attr("r", &json!({}), 0, &json!(null), &meta);
    assert_eq!(r(0), Some(AttrValue::Number(0.0)));
    assert_eq!(r(1), Some(AttrValue::Number(3.0)));
    assert_eq!(
        steps[1].animator,
        Animator::Base(BaseAnimator::new().duration(250.0).start_delay(5.0))
    );

    let mut tree = ComponentTree::new();
    let id = tree.insert(plot.clone());
    tree.render_to(id, SurfaceId::new(1), 100.0, 100.0, &mut RecordingContext::new())
        .unwrap();
    assert_eq!(plot.generate_draw_steps().len(), 1);

    plot.datasets()[0].push(json!({"px": 5, "py": 5}));
    assert_eq!(plot.generate_draw_steps().len(), 2);

    let custom = Animator::Base(BaseAnimator::new().duration(40.0));
    plot.set_animator(MAIN_ANIMATOR, custom);
    assert_eq!(plot.generate_draw_steps()[1].animator, custom);
}

#[test]
fn dataset_changes_drive_scale_extents() {
    let x = QuantitativeScale::new();
    let plot = Plot::scatter();
    let data = Dataset::new(vec![json!({"v": 0}), json!({"v": 100})]);
    plot.project_scaled("x", "v", &x);
    plot.add_dataset(data.clone());
    assert_eq!(x.domain(), [-2.5, 102.5]);

    data.push(json!({"v": 200}));
    assert_eq!(x.domain(), [-5.0, 205.0]);

    plot.remove_dataset("_0").unwrap();
    assert!(x.extents().is_empty());
}

#[test]
fn function_accessors_see_plot_metadata() {
    let plot = pixel_plot();
    plot.project(
        "opacity",
        Accessor::function(|_, i, _, meta| json!(if meta.extra["faded"] == true { 0.1 } else { i as f64 })),
    );
    plot.add_dataset_with_metadata("faded", points(&[(0.0, 0.0)]), json!({"faded": true}));
    let steps = plot.generate_draw_steps();
    let meta = PlotMetadata {
        dataset_key: "faded".into(),
        extra: json!({"faded": true}),
    };
    let opacity = steps[0].attr("opacity", &json!({}), 0, &json!(null), &meta);
    assert_eq!(opacity, Some(AttrValue::Number(0.1)));
}

#[test]
fn plot_in_tree_lays_out_scales_and_tears_down() {
    let x = QuantitativeScale::new();
    let y = QuantitativeScale::new();
    x.set_domain([0.0, 10.0]);
    y.set_domain([0.0, 10.0]);

    let plot = Plot::scatter();
    plot.project_scaled("x", "px", &x);
    plot.project_scaled("y", "py", &y);
    plot.add_dataset(points(&[(5.0, 5.0)]));

    let mut tree = ComponentTree::new();
    let id = tree.insert(plot.clone());
    let table = tree.create_table(vec![vec![Some(id)]]).unwrap();
    let mut ctx = RecordingContext::new();
    tree.render_to(table, SurfaceId::new(1), 200.0, 100.0, &mut ctx)
        .unwrap();

    assert_eq!(x.range(), [0.0, 200.0]);
    assert_eq!(y.range(), [100.0, 0.0]);
    let circle = ctx.circles().next().unwrap();
    assert_eq!(circle.0, Point::new(100.0, 50.0));

    plot.datasets()[0].push(json!({"px": 1, "py": 1}));
    assert!(tree.redraw(table, &mut ctx).unwrap());

    x.auto_domain();
    tree.remove(table).unwrap();
    assert_eq!(tree.lifecycle(id), Lifecycle::Detached);
    assert!(x.extents().is_empty());
    assert_eq!(x.domain()[0], -0.025);
}

#[test]
fn hover_interaction_through_dispatcher() {
    let plot = pixel_plot();
    plot.add_dataset(points(&[(10.0, 10.0), (50.0, 10.0)]));

    let seen = Rc::new(RefCell::new(Vec::new()));
    let hover = HoverInteraction::new();
    let s = seen.clone();
    hover.on_hover_over(move |m| s.borrow_mut().push(("over", m.index)));
    let s = seen.clone();
    hover.on_hover_out(move |m| s.borrow_mut().push(("out", m.index)));

    let mut dispatcher = PointerDispatcher::new();
    hover.attach(&mut dispatcher, 7, plot.clone());

    for (kind, x) in [
        (PointerKind::Move, 11.0),
        (PointerKind::Move, 49.0),
        (PointerKind::Move, 30.0),
        (PointerKind::Move, 51.0),
        (PointerKind::Leave, 51.0),
    ] {
        dispatcher.dispatch(&mut PointerEvent::new(kind, 7, Point::new(x, 10.0)));
    }

    assert_eq!(
        *seen.borrow(),
        vec![("over", 0), ("out", 0), ("over", 1), ("out", 1), ("over", 1), ("out", 1)]
    );
    assert!(hover.current().is_none());
}
