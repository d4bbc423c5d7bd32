//! Tests for double dispatch and the ready-made traversal operations

use generational_arena::Index;
use plantree::util::testing::init_test_setup;
use plantree::{
    accept, walk_children, Command, CostTotal, Element, Fetch, Notify, PlanArena, PlanVisitor,
    Renderer, Stage, StepCount,
};

/// Records which handler fired, in order.
#[derive(Default)]
struct Recorder {
    calls: Vec<String>,
}

impl PlanVisitor for Recorder {
    fn visit_command(&mut self, step: &Command) {
        self.calls.push(format!("command:{}", step.line));
    }

    fn visit_fetch(&mut self, step: &Fetch) {
        self.calls.push(format!("fetch:{}", step.url));
    }

    fn visit_notify(&mut self, step: &Notify) {
        self.calls.push(format!("notify:{}", step.channel));
    }

    fn visit_stage(&mut self, plan: &PlanArena, idx: Index, stage: &Stage) {
        self.calls.push(format!("stage:{}", stage.name));
        walk_children(plan, idx, self);
    }
}

/// Visits the stage itself but never descends.
#[derive(Default)]
struct ShallowCount {
    stages: usize,
}

impl PlanVisitor for ShallowCount {
    fn visit_command(&mut self, _step: &Command) {}
    fn visit_fetch(&mut self, _step: &Fetch) {}
    fn visit_notify(&mut self, _step: &Notify) {}

    fn visit_stage(&mut self, _plan: &PlanArena, _idx: Index, _stage: &Stage) {
        self.stages += 1;
    }
}

fn build_reference_plan() -> PlanArena {
    let mut plan = PlanArena::new();
    let root = plan.insert_node(Element::stage("release"), None).unwrap();
    plan.insert_node(Element::command("make", 1), Some(root))
        .unwrap();
    plan.insert_node(Element::fetch("https://example.invalid/a.tar", 2), Some(root))
        .unwrap();
    plan.insert_node(Element::notify("#ops", 3), Some(root))
        .unwrap();
    plan.insert_node(Element::stage("empty"), Some(root))
        .unwrap();
    let nested = plan
        .insert_node(Element::stage("publish"), Some(root))
        .unwrap();
    plan.insert_node(Element::command("make upload", 4), Some(nested))
        .unwrap();
    plan
}

// ============================================================
// Dispatch Correctness Tests
// ============================================================

#[test]
fn given_each_variant_when_accepted_then_exactly_matching_handler_fires() {
    init_test_setup();
    let cases = [
        (Element::command("make", 1), "command:make"),
        (Element::fetch("https://x", 1), "fetch:https://x"),
        (Element::notify("#ops", 1), "notify:#ops"),
        (Element::stage("build"), "stage:build"),
    ];

    for (element, expected) in cases {
        let mut plan = PlanArena::new();
        let idx = match element {
            // leaves need a stage above them, stages can be the root
            Element::Stage(_) => plan.insert_node(element, None).unwrap(),
            _ => {
                let root = plan.insert_node(Element::stage("root"), None).unwrap();
                plan.insert_node(element, Some(root)).unwrap()
            }
        };

        let mut recorder = Recorder::default();
        accept(&plan, idx, &mut recorder);
        assert_eq!(recorder.calls, vec![expected.to_string()]);
    }
}

#[test]
fn given_reference_plan_when_recording_then_calls_follow_preorder() {
    let plan = build_reference_plan();
    let mut recorder = Recorder::default();

    accept(&plan, plan.root().unwrap(), &mut recorder);

    assert_eq!(
        recorder.calls,
        vec![
            "stage:release",
            "command:make",
            "fetch:https://example.invalid/a.tar",
            "notify:#ops",
            "stage:empty",
            "stage:publish",
            "command:make upload",
        ]
    );
}

#[test]
fn given_shallow_visitor_when_accepting_root_then_children_are_not_visited() {
    let plan = build_reference_plan();
    let mut shallow = ShallowCount::default();

    // traversal is owned by the stage handler, not by the tree
    accept(&plan, plan.root().unwrap(), &mut shallow);
    assert_eq!(shallow.stages, 1);
}

// ============================================================
// End-to-End Scenario Tests
// ============================================================

#[test]
fn given_reference_plan_when_totalling_costs_then_sum_is_ten() {
    let plan = build_reference_plan();
    let mut total = CostTotal::default();

    accept(&plan, plan.root().unwrap(), &mut total);
    assert_eq!(total.total, 10);
}

#[test]
fn given_reference_plan_when_counting_steps_then_four_leaves_found() {
    let plan = build_reference_plan();
    let mut count = StepCount::default();

    accept(&plan, plan.root().unwrap(), &mut count);
    assert_eq!(count.steps, 4, "the empty stage is not a step");
}

#[test]
fn given_subtree_when_totalling_costs_then_only_that_subtree_counts() {
    let plan = build_reference_plan();
    let root = plan.root().unwrap();
    let publish = plan.get_node(root).unwrap().children[4];

    let mut total = CostTotal::default();
    accept(&plan, publish, &mut total);
    assert_eq!(total.total, 4);
}

#[test]
fn given_reference_plan_when_rendering_then_lines_match_structure() {
    let plan = build_reference_plan();
    let mut renderer = Renderer::new();

    accept(&plan, plan.root().unwrap(), &mut renderer);

    assert_eq!(renderer.lines.len(), 7);
    assert_eq!(renderer.lines[0], "stage: release");
    assert_eq!(renderer.lines[6], "    command: make upload (cost 4)");
}
