//! Variable-access ledger.
//!
//! Records, in traversal order, which variables the generated kernel call
//! reads and writes. Dependence analysis consumes this to decide whether
//! loop transformations are legal, so the granularity of what gets recorded
//! (one event per facet vs. one aggregate event) is part of each producer's
//! contract, not a choice made here.

use std::fmt;

/// Dotted identity path of a variable (e.g. `op1_proxy%ncell_3d`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    parts: Vec<String>,
}

impl Signature {
    pub fn new(name: &str) -> Signature {
        Signature {
            parts: name.split('%').map(|p| p.trim().to_string()).collect(),
        }
    }

    /// The variable identity: the first component of the path.
    pub fn base(&self) -> &str {
        &self.parts[0]
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.parts.join("%"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessKind {
    Read,
    Write,
    ReadWrite,
    /// Increment: read-add-write on shared dofs along column boundaries.
    Inc,
}

impl AccessKind {
    pub fn name(self) -> &'static str {
        match self {
            AccessKind::Read => "read",
            AccessKind::Write => "write",
            AccessKind::ReadWrite => "readwrite",
            AccessKind::Inc => "inc",
        }
    }

    pub fn is_written(self) -> bool {
        !matches!(self, AccessKind::Read)
    }
}

#[derive(Debug, Clone)]
pub struct AccessEvent {
    pub signature: Signature,
    pub kind: AccessKind,
    /// Name of the kernel whose call produced this access.
    pub kernel: String,
    /// Index components for partial-array accesses (e.g. `colour`, `cell`
    /// for a colour-map lookup).
    pub components: Vec<String>,
}

/// Append-only event log; insertion order is traversal order and is
/// significant for conflict analysis.
#[derive(Debug, Default)]
pub struct AccessLedger {
    events: Vec<AccessEvent>,
}

impl AccessLedger {
    pub fn new() -> AccessLedger {
        AccessLedger { events: vec![] }
    }

    pub fn add(&mut self, signature: Signature, kind: AccessKind, kernel: &str) {
        self.add_with_components(signature, kind, kernel, vec![]);
    }

    pub fn add_with_components(
        &mut self,
        signature: Signature,
        kind: AccessKind,
        kernel: &str,
        components: Vec<String>,
    ) {
        self.events.push(AccessEvent {
            signature,
            kind,
            kernel: kernel.into(),
            components,
        });
    }

    pub fn events(&self) -> &[AccessEvent] {
        &self.events
    }

    pub fn for_signature<'a>(
        &'a self,
        signature: &'a Signature,
    ) -> impl Iterator<Item = &'a AccessEvent> {
        self.events.iter().filter(move |e| &e.signature == signature)
    }

    pub fn is_written(&self, signature: &Signature) -> bool {
        self.for_signature(signature).any(|e| e.kind.is_written())
    }
}
