//! Double dispatch over the element hierarchy.
//!
//! An operation over a plan tree is one `PlanVisitor` impl. `accept` matches
//! the node's concrete variant and calls exactly the matching handler, so a
//! new operation never touches the element types, and a new element variant
//! refuses to compile until every operation handles it.

use generational_arena::Index;

use crate::arena::PlanArena;
use crate::element::{Command, Element, Fetch, Notify, Stage};

/// One handler per concrete element variant.
///
/// The stage handler receives the arena and node index and decides itself
/// whether and in which order to descend; `walk_children` gives the usual
/// pre-order descent.
pub trait PlanVisitor {
    fn visit_command(&mut self, step: &Command);
    fn visit_fetch(&mut self, step: &Fetch);
    fn visit_notify(&mut self, step: &Notify);
    fn visit_stage(&mut self, plan: &PlanArena, idx: Index, stage: &Stage);
}

/// Dispatches the node at `idx` to the handler matching its variant.
///
/// Missing nodes are skipped silently; an index only dangles after its
/// subtree was removed, in which case there is nothing left to visit.
pub fn accept<V: PlanVisitor>(plan: &PlanArena, idx: Index, visitor: &mut V) {
    let Some(node) = plan.get_node(idx) else {
        return;
    };
    match &node.element {
        Element::Command(step) => visitor.visit_command(step),
        Element::Fetch(step) => visitor.visit_fetch(step),
        Element::Notify(step) => visitor.visit_notify(step),
        Element::Stage(stage) => visitor.visit_stage(plan, idx, stage),
    }
}

/// Re-invokes dispatch on each child of `idx` in insertion order.
pub fn walk_children<V: PlanVisitor>(plan: &PlanArena, idx: Index, visitor: &mut V) {
    let Some(node) = plan.get_node(idx) else {
        return;
    };
    for &child in &node.children {
        accept(plan, child, visitor);
    }
}
