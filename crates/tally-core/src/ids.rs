//! ID prefixes and the id-generation collaborator.
//!
//! IDs look like `asg-a3f8b2c1`: a short entity prefix, a dash, and eight
//! lowercase hex characters.

use std::collections::HashSet;

pub const PREFIX_SESSION: &str = "inv";
pub const PREFIX_ASSIGNMENT: &str = "asg";

/// Join a prefix and a hex suffix into an id.
#[must_use]
pub fn format_id(prefix: &str, suffix: &str) -> String {
    format!("{prefix}-{suffix}")
}

/// Source of fresh ids. The engine asks for one id per new entity.
pub trait IdGenerator {
    fn next_id(&mut self, prefix: &str) -> String;
}

impl<G: IdGenerator + ?Sized> IdGenerator for &mut G {
    fn next_id(&mut self, prefix: &str) -> String {
        (**self).next_id(prefix)
    }
}

impl<G: IdGenerator + ?Sized> IdGenerator for Box<G> {
    fn next_id(&mut self, prefix: &str) -> String {
        (**self).next_id(prefix)
    }
}

/// Random 32-bit hex ids.
#[derive(Debug, Default)]
pub struct RandomIds {
    fallback_counter: u64,
}

impl RandomIds {
    #[must_use]
    pub const fn new() -> Self {
        Self { fallback_counter: 0 }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn random_suffix(&mut self) -> String {
        let mut bytes = [0u8; 4];
        if getrandom::fill(&mut bytes).is_err() {
            // OS entropy unavailable: derive from the clock and a counter.
            self.fallback_counter = self.fallback_counter.wrapping_add(1);
            let nanos = chrono::Utc::now()
                .timestamp_nanos_opt()
                .unwrap_or_default()
                .unsigned_abs();
            let mixed = nanos ^ self.fallback_counter.wrapping_mul(0x9E37_79B9_7F4A_7C15);
            bytes = (mixed as u32).to_le_bytes();
        }
        bytes.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl IdGenerator for RandomIds {
    fn next_id(&mut self, prefix: &str) -> String {
        format_id(prefix, &self.random_suffix())
    }
}

/// Deterministic ids (`asg-00000001`, `asg-00000002`, ...). Used by tests and
/// by tooling that needs reproducible output.
#[derive(Debug, Default)]
pub struct SequentialIds {
    next: u32,
}

impl SequentialIds {
    #[must_use]
    pub const fn starting_at(next: u32) -> Self {
        Self { next }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next = self.next.wrapping_add(1);
        format_id(prefix, &format!("{:08x}", self.next))
    }
}

/// Wraps another generator and never returns an id from `taken` or one it
/// already handed out.
pub struct UniqueIds<G> {
    inner: G,
    taken: HashSet<String>,
}

impl<G: IdGenerator> UniqueIds<G> {
    pub fn new(inner: G, taken: impl IntoIterator<Item = String>) -> Self {
        Self {
            inner,
            taken: taken.into_iter().collect(),
        }
    }
}

impl<G: IdGenerator> IdGenerator for UniqueIds<G> {
    fn next_id(&mut self, prefix: &str) -> String {
        loop {
            let id = self.inner.next_id(prefix);
            if self.taken.insert(id.clone()) {
                return id;
            }
        }
    }
}
