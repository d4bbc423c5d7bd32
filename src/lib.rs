//! plantree: heterogeneous task plan trees with pluggable operations.
//!
//! A plan is an arena-backed tree of [`Element`] nodes: leaf steps
//! (commands, fetches, notifications) grouped under stages. Operations over
//! a plan are [`PlanVisitor`] impls dispatched per concrete variant, so new
//! operations never touch the element types. [`TemplateRegistry`] hands out
//! fresh copies of registered step exemplars, and [`InstanceCache`] shares
//! one instance per key across callers.

pub mod arena;
pub mod cache;
pub mod display;
pub mod element;
pub mod errors;
pub mod ops;
pub mod registry;
pub mod util;
pub mod visit;

pub use arena::{PlanArena, PlanNode};
pub use cache::{CacheKey, InstanceCache};
pub use display::TreeRender;
pub use element::{Command, Element, ElementTag, Fetch, Notify, Stage};
pub use errors::{PlanError, PlanResult};
pub use ops::{CostTotal, Renderer, StepCount};
pub use registry::{default_templates, TemplateRegistry};
pub use visit::{accept, walk_children, PlanVisitor};
