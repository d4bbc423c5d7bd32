use generational_arena::Index;
use thiserror::Error;

use crate::element::ElementTag;

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("Node not found in arena: {0:?}")]
    NodeNotFound(Index),

    #[error("Node {0:?} is not a stage and cannot hold children")]
    NotAStage(Index),

    #[error("Node {0:?} already has a parent")]
    AlreadyAttached(Index),

    #[error("Arena already has a root node")]
    RootAlreadySet,

    #[error("Cycle detected: node {0:?} would become its own ancestor")]
    CycleDetected(Index),

    #[error("Template already registered for tag: {0}")]
    DuplicateTemplate(ElementTag),
}

pub type PlanResult<T> = Result<T, PlanError>;
