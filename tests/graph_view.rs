use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use glam::Vec3;
use steer_graph::graph::{
    Goal, GraphDataSource, GraphDelegate, GraphPresentation, GraphView, LinkProperty, Metadata,
    NodeAppearance, NodeId, Provider,
};

const FRAME: f32 = 1.0 / 60.0;
const WARM_UP_FRAMES: usize = 3000;
const CHECKPOINT_FRAMES: usize = 300;
const CHECKPOINTS: usize = 6;

const NAMES: [&str; 8] = ["n0", "n1", "n2", "n3", "n4", "n5", "n6", "n7"];
const RING: [(&str, &[&str]); 8] = [
    ("n0", &["n1", "n4"]),
    ("n1", &["n2"]),
    ("n2", &["n3"]),
    ("n3", &["n4"]),
    ("n4", &["n5"]),
    ("n5", &["n6"]),
    ("n6", &["n7"]),
    ("n7", &["n0"]),
];

#[derive(Default)]
struct MapSource {
    links: BTreeMap<String, Vec<String>>,
}

impl MapSource {
    fn new(entries: &[(&str, &[&str])]) -> Self {
        Self {
            links: entries
                .iter()
                .map(|(name, targets)| {
                    (
                        (*name).to_owned(),
                        targets.iter().map(|target| (*target).to_owned()).collect(),
                    )
                })
                .collect(),
        }
    }
}

impl GraphDataSource for MapSource {
    fn node_names(&self) -> Vec<NodeId> {
        self.links
            .keys()
            .map(|name| NodeId::from(name.as_str()))
            .collect()
    }

    fn outgoing_links(&self, node: &NodeId) -> Vec<NodeId> {
        self.links
            .get(node.as_str())
            .map(|targets| {
                targets
                    .iter()
                    .map(|target| NodeId::from(target.as_str()))
                    .collect()
            })
            .unwrap_or_default()
    }
}

struct Arrows;

impl GraphPresentation for Arrows {
    fn node_appearance(&self, _node: &NodeId) -> NodeAppearance {
        NodeAppearance::default()
    }

    fn link_property(&self, _from: &NodeId, _to: &NodeId) -> Option<LinkProperty> {
        Some(LinkProperty {
            arrow_shaped: true,
            ..LinkProperty::default()
        })
    }

    fn metadata(&self, _node: &NodeId) -> Metadata {
        Metadata::new()
    }
}

struct Recorder(Rc<RefCell<Vec<String>>>);

impl GraphDelegate for Recorder {
    fn node_selected(&mut self, node: &NodeId) {
        self.0.borrow_mut().push(node.to_string());
    }
}

fn run(view: &mut GraphView, frames: usize) {
    for _ in 0..frames {
        view.tick(FRAME);
    }
}

fn position(view: &GraphView, node: &str) -> Vec3 {
    view.layout()
        .position(node)
        .unwrap_or_else(|| panic!("{node} has an agent"))
}

fn unlinked_source() -> MapSource {
    MapSource::new(&NAMES.map(|name| (name, &[] as &[&str])))
}

fn min_pairwise_distance(view: &GraphView) -> f32 {
    let positions = view.layout().positions().into_values().collect::<Vec<_>>();
    let mut min = f32::INFINITY;
    for (index, a) in positions.iter().enumerate() {
        for b in &positions[index + 1..] {
            min = min.min(a.distance(*b));
        }
    }
    min
}

/// Lets the layout settle, then requires the closest pair never to get
/// noticeably closer from one checkpoint to the next.
fn assert_spreads_apart(view: &mut GraphView) {
    let separation = view.layout_config().separation_distance;
    let tolerance = separation * 0.05;
    let planar = view.is_planar();
    run(view, WARM_UP_FRAMES);

    let mut previous = min_pairwise_distance(view);
    for checkpoint in 1..=CHECKPOINTS {
        run(view, CHECKPOINT_FRAMES);
        let current = min_pairwise_distance(view);
        assert!(
            current >= previous - tolerance,
            "planar={planar} checkpoint {checkpoint}: closest pair went {previous} -> {current}"
        );
        previous = current;
    }
    assert!(
        previous >= separation * 0.5,
        "planar={planar}: agents only {previous} apart"
    );
    if planar {
        let mut agents = view.layout().agents();
        assert!(agents.all(|agent| agent.position().z == 0.0));
    }
}

#[test]
fn reload_with_unchanged_graph_keeps_agents() {
    let source = MapSource::new(&[("a", &["b"]), ("b", &["c"]), ("c", &[])]);
    let provider = Provider::new(&source);
    let mut view = GraphView::default();
    view.reload(&provider);
    run(&mut view, 30);

    let positions = view.layout().positions();
    let velocities = view
        .layout()
        .agents()
        .map(|agent| agent.velocity())
        .collect::<Vec<_>>();
    let links = view
        .model()
        .links()
        .map(|(source, target)| (source.clone(), target.clone()))
        .collect::<Vec<_>>();

    view.reload(&provider);

    assert_eq!(view.layout().positions(), positions);
    assert_eq!(
        view.layout()
            .agents()
            .map(|agent| agent.velocity())
            .collect::<Vec<_>>(),
        velocities
    );
    assert_eq!(
        view.model()
            .links()
            .map(|(source, target)| (source.clone(), target.clone()))
            .collect::<Vec<_>>(),
        links
    );
}

#[test]
fn reloading_one_node_leaves_the_rest_alone() {
    let mut source = MapSource::new(&[("a", &["b"]), ("b", &[]), ("c", &["d"]), ("d", &[])]);
    let mut view = GraphView::default();
    view.reload(&Provider::new(&source).with_presentation(&Arrows));
    run(&mut view, 20);
    let before = view.layout().positions();

    source.links.insert("a".to_owned(), vec!["c".to_owned()]);
    source.links.insert("c".to_owned(), vec!["a".to_owned()]);
    view.reload_node(&"a".into(), &Provider::new(&source));

    assert_eq!(view.layout().positions(), before);
    let a_links = view.model().outgoing("a").cloned().collect::<Vec<_>>();
    assert_eq!(a_links, vec![NodeId::from("c")]);
    // c was not reloaded, so its old link and its arrow survive.
    let c_links = view.model().outgoing("c").cloned().collect::<Vec<_>>();
    assert_eq!(c_links, vec![NodeId::from("d")]);
    let model = view.model();
    assert!(model.has_custom_link_property(&"c".into(), &"d".into()));
    assert!(!model.has_custom_link_property(&"a".into(), &"c".into()));

    let link_weight = view.layout_config().link_weight;
    let a = view.layout().agent("a").expect("a keeps its agent");
    let seek_c = Goal::SeekAgent { target: "c".into() };
    let seek_b = Goal::SeekAgent { target: "b".into() };
    assert_eq!(a.behavior().weight_of(&seek_c), Some(link_weight));
    assert_eq!(a.behavior().weight_of(&seek_b), None);
}

#[test]
fn switching_dimensionality_keeps_positions() {
    let source = MapSource::new(&[("a", &["b"]), ("b", &["c"]), ("c", &["a"]), ("d", &[])]);
    let mut view = GraphView::default();
    view.reload(&Provider::new(&source));
    run(&mut view, 60);
    let spatial = view.layout().positions();

    view.set_planar(true);
    assert!(view.is_planar());
    for agent in view.layout().agents() {
        let old = spatial[agent.id()];
        assert_eq!(agent.position(), Vec3::new(old.x, old.y, 0.0));
        assert_eq!(agent.velocity(), Vec3::ZERO);
    }

    run(&mut view, 120);
    let mut agents = view.layout().agents();
    assert!(agents.all(|agent| agent.position().z == 0.0));
    drop(agents);
    let planar = view.layout().positions();

    view.set_planar(false);
    assert_eq!(view.layout().positions(), planar);
    let mut agents = view.layout().agents();
    assert!(agents.all(|agent| agent.velocity() == Vec3::ZERO));
}

#[test]
fn unlinked_nodes_spread_apart() {
    for planar in [false, true] {
        let mut view = GraphView::default();
        view.set_planar(planar);
        view.reload(&Provider::new(&unlinked_source()));
        assert_spreads_apart(&mut view);
    }
}

#[test]
fn dropping_links_lets_a_settled_graph_spread() {
    for planar in [false, true] {
        let mut view = GraphView::default();
        view.set_planar(planar);
        view.reload(&Provider::new(&MapSource::new(&RING)));
        run(&mut view, 600);
        let linked = view.layout().positions();

        view.reload(&Provider::new(&unlinked_source()));
        assert_eq!(view.model().link_count(), 0);
        assert_eq!(view.layout().positions(), linked);
        assert_spreads_apart(&mut view);
    }
}

#[test]
fn link_geometry_follows_agents() {
    let source = MapSource::new(&[("a", &["b"]), ("b", &[])]);
    let mut view = GraphView::default();
    view.reload(&Provider::new(&source).with_presentation(&Arrows));
    run(&mut view, 90);

    let a = position(&view, "a");
    let b = position(&view, "b");
    let link = view.scene().link("a", "b").expect("link is rendered");
    let geometry = link.geometry;
    let length = a.distance(b);

    assert!(geometry.anchor.distance((a + b) * 0.5) < 1e-4);
    assert!((geometry.length - length).abs() < 1e-4);
    assert!((geometry.shaft_length - length * 0.9).abs() < 1e-3);
    assert!((geometry.direction - (b - a).normalize()).length() < 1e-4);
    let head = geometry.arrow_head.expect("arrow shaped link");
    assert!(head.tip.distance(b) < 1e-4);
}

#[test]
fn dangling_links_are_not_rendered() {
    let mut source = MapSource::new(&[("a", &["ghost", "b"]), ("b", &[])]);
    let mut view = GraphView::default();
    view.reload(&Provider::new(&source));
    run(&mut view, 10);

    assert_eq!(view.model().link_count(), 2);
    assert_eq!(view.scene().links.len(), 1);
    assert!(view.scene().link("a", "ghost").is_none());
    assert!(view.scene().node("ghost").is_none());

    source.links.insert("ghost".to_owned(), Vec::new());
    view.reload_node(&"ghost".into(), &Provider::new(&source));
    assert!(view.scene().node("ghost").is_some());
    assert!(view.scene().link("a", "ghost").is_some());
}

#[test]
fn first_frame_after_load_does_not_move() {
    let source = MapSource::new(&[("a", &["b"]), ("b", &["a"]), ("c", &[])]);
    let mut view = GraphView::default();
    view.reload(&Provider::new(&source));
    let spawned = view.layout().positions();

    assert!(!view.update(100.0));
    assert_eq!(view.layout().positions(), spawned);

    assert!(view.update(100.0 + f64::from(FRAME)));
    assert_ne!(view.layout().positions(), spawned);

    view.clear();
    view.reload(&Provider::new(&source));
    let respawned = view.layout().positions();
    view.tick(0.5);
    assert_eq!(view.layout().positions(), respawned);
}

#[test]
fn empty_reload_clears_everything() {
    let source = MapSource::new(&[("a", &["b"]), ("b", &[])]);
    let mut view = GraphView::default();
    view.reload(&Provider::new(&source));
    view.select(Some("a".into()));
    run(&mut view, 5);

    view.reload(&Provider::new(&MapSource::default()));
    assert!(view.model().is_empty());
    assert!(view.layout().is_empty());
    assert!(view.scene().nodes.is_empty());
    assert!(view.scene().links.is_empty());
    assert_eq!(view.selected(), None);
    assert!(!view.tick(FRAME));
}

#[test]
fn selection_reports_changes_and_drops_vanished_nodes() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut source = MapSource::new(&[("a", &[]), ("b", &[])]);
    let mut view = GraphView::default();
    view.set_delegate(Box::new(Recorder(Rc::clone(&seen))));
    view.reload(&Provider::new(&source));

    assert!(view.select(Some("b".into())));
    assert!(!view.select(Some("b".into())));
    assert_eq!(view.scene().selection, view.layout().position("b"));

    source.links.remove("b");
    view.reload(&Provider::new(&source));
    assert_eq!(view.selected(), None);
    assert_eq!(view.scene().selection, None);
    assert_eq!(*seen.borrow(), vec!["b".to_owned()]);
}

#[test]
fn visual_signals_travel_and_expire() {
    let source = MapSource::new(&[("a", &["b"]), ("b", &[])]);
    let mut view = GraphView::default();
    view.reload(&Provider::new(&source));

    let appearance = NodeAppearance::default();
    let a = NodeId::from("a");
    let b = NodeId::from("b");
    let nowhere = NodeId::from("nowhere");
    assert!(!view.send_visual_signal(&a, &nowhere, appearance.clone()));
    assert!(view.send_visual_signal(&a, &b, appearance));
    let signal = view.scene().signals.first().expect("queued signal").clone();
    assert_eq!(signal.progress, 0.0);
    assert_eq!(signal.position, position(&view, "a"));

    let duration = view.scene_config().signal_duration;
    view.tick(duration * 0.5);
    let halfway = view.scene().signals.first().map(|signal| signal.progress);
    assert!(halfway.is_some_and(|progress| (progress - 0.5).abs() < 1e-5));

    view.tick(duration);
    assert!(view.scene().signals.is_empty());
}
