//! Ready-made traversal operations.

use generational_arena::Index;

use crate::arena::PlanArena;
use crate::element::{Command, Fetch, Notify, Stage};
use crate::visit::{walk_children, PlanVisitor};

/// Sums the estimated cost of every leaf step under the visited node.
#[derive(Debug, Default)]
pub struct CostTotal {
    pub total: u64,
}

impl PlanVisitor for CostTotal {
    fn visit_command(&mut self, step: &Command) {
        self.total += step.cost;
    }

    fn visit_fetch(&mut self, step: &Fetch) {
        self.total += step.cost;
    }

    fn visit_notify(&mut self, step: &Notify) {
        self.total += step.cost;
    }

    fn visit_stage(&mut self, plan: &PlanArena, idx: Index, _stage: &Stage) {
        walk_children(plan, idx, self);
    }
}

/// Counts leaf steps; stages are containers and are not counted.
#[derive(Debug, Default)]
pub struct StepCount {
    pub steps: usize,
}

impl PlanVisitor for StepCount {
    fn visit_command(&mut self, _step: &Command) {
        self.steps += 1;
    }

    fn visit_fetch(&mut self, _step: &Fetch) {
        self.steps += 1;
    }

    fn visit_notify(&mut self, _step: &Notify) {
        self.steps += 1;
    }

    fn visit_stage(&mut self, plan: &PlanArena, idx: Index, _stage: &Stage) {
        walk_children(plan, idx, self);
    }
}

/// Renders the visited subtree as indented text lines.
///
/// Lines are collected in `lines` rather than written to a stream, the
/// caller decides where output goes.
#[derive(Debug, Default)]
pub struct Renderer {
    pub lines: Vec<String>,
    depth: usize,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, text: String) {
        self.lines.push(format!("{}{}", "  ".repeat(self.depth), text));
    }
}

impl PlanVisitor for Renderer {
    fn visit_command(&mut self, step: &Command) {
        self.push(format!("command: {} (cost {})", step.line, step.cost));
    }

    fn visit_fetch(&mut self, step: &Fetch) {
        self.push(format!("fetch: {} (cost {})", step.url, step.cost));
    }

    fn visit_notify(&mut self, step: &Notify) {
        self.push(format!("notify: {} (cost {})", step.channel, step.cost));
    }

    fn visit_stage(&mut self, plan: &PlanArena, idx: Index, stage: &Stage) {
        self.push(format!("stage: {}", stage.name));
        self.depth += 1;
        walk_children(plan, idx, self);
        self.depth -= 1;
    }
}
