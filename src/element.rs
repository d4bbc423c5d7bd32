//! Plan elements: the closed set of node kinds a plan tree can hold.

use std::fmt;

/// Shell command step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Command line to execute
    pub line: String,
    /// Estimated cost in abstract units
    pub cost: u64,
}

/// Remote artifact download step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fetch {
    /// Source URL
    pub url: String,
    /// Estimated cost in abstract units
    pub cost: u64,
}

/// Notification step (chat channel, mail alias, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notify {
    /// Target channel
    pub channel: String,
    /// Estimated cost in abstract units
    pub cost: u64,
}

/// Named container grouping other elements. Children live in the arena,
/// not in the stage itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stage {
    /// Stage name for display and reporting
    pub name: String,
}

/// One node payload in a plan tree.
///
/// The variant set is closed: traversal operations match over it
/// exhaustively, so an operation that forgets a kind does not compile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    Command(Command),
    Fetch(Fetch),
    Notify(Notify),
    Stage(Stage),
}

/// Type tag identifying an element kind without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementTag {
    Command,
    Fetch,
    Notify,
    Stage,
}

impl Element {
    pub fn command(line: impl Into<String>, cost: u64) -> Self {
        Self::Command(Command {
            line: line.into(),
            cost,
        })
    }

    pub fn fetch(url: impl Into<String>, cost: u64) -> Self {
        Self::Fetch(Fetch {
            url: url.into(),
            cost,
        })
    }

    pub fn notify(channel: impl Into<String>, cost: u64) -> Self {
        Self::Notify(Notify {
            channel: channel.into(),
            cost,
        })
    }

    pub fn stage(name: impl Into<String>) -> Self {
        Self::Stage(Stage { name: name.into() })
    }

    pub fn tag(&self) -> ElementTag {
        match self {
            Element::Command(_) => ElementTag::Command,
            Element::Fetch(_) => ElementTag::Fetch,
            Element::Notify(_) => ElementTag::Notify,
            Element::Stage(_) => ElementTag::Stage,
        }
    }

    /// Estimated cost of this element alone. Stages carry no cost of
    /// their own.
    pub fn cost(&self) -> u64 {
        match self {
            Element::Command(c) => c.cost,
            Element::Fetch(f) => f.cost,
            Element::Notify(n) => n.cost,
            Element::Stage(_) => 0,
        }
    }

    pub fn is_stage(&self) -> bool {
        matches!(self, Element::Stage(_))
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::Command(c) => write!(f, "command: {} (cost {})", c.line, c.cost),
            Element::Fetch(x) => write!(f, "fetch: {} (cost {})", x.url, x.cost),
            Element::Notify(n) => write!(f, "notify: {} (cost {})", n.channel, n.cost),
            Element::Stage(s) => write!(f, "stage: {}", s.name),
        }
    }
}

impl fmt::Display for ElementTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ElementTag::Command => "command",
            ElementTag::Fetch => "fetch",
            ElementTag::Notify => "notify",
            ElementTag::Stage => "stage",
        };
        write!(f, "{}", name)
    }
}
