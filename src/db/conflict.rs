//! Write-time conflict resolution.
//!
//! One static policy per entity kind, declared next to the kind itself.

/// How a uniqueness collision is resolved when a batch is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conflict {
    /// Refresh only the allow-listed mutable columns when `key` collides.
    Update {
        key: &'static [&'static str],
        set: &'static [&'static str],
    },
    /// Idempotent re-insert: a collision is silently ignored, not an error.
    DoNothing,
    /// Fallback for kinds without an explicit policy: on collision of the
    /// declared key, touch the bookkeeping timestamp and nothing else.
    Touch { key: &'static [&'static str] },
}

impl Conflict {
    /// Primary entities collide on their external id.
    pub const fn update_on_id(set: &'static [&'static str]) -> Self {
        Conflict::Update { key: &["id"], set }
    }
}
