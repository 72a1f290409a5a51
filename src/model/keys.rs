//! Primary-key allocation for the combined record space.

/// Allocates primary keys for one run's combined record set.
///
/// Every run starts a fresh key space at 1; keys only need to be unique
/// within the archive the run produces, and the website loader treats
/// them as opaque. Single records (date, chassis, os) take one key at a
/// time; merging a result file reserves a contiguous block via
/// [`begin_merge`](KeyAllocator::begin_merge) /
/// [`commit_merge`](KeyAllocator::commit_merge), inside which every
/// record keeps `original key + offset`. Gaps in the sequence are
/// normal and harmless.
#[derive(Debug)]
pub struct KeyAllocator {
    next: i64,
}

impl Default for KeyAllocator {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl KeyAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out a single key.
    pub fn allocate(&mut self) -> i64 {
        let key = self.next;
        self.next += 1;
        key
    }

    /// Start a file merge. Every local key in the file shifts by the
    /// returned offset; the original key is recoverable as
    /// `global - offset`.
    pub fn begin_merge(&self) -> i64 {
        self.next
    }

    /// Finish a file merge whose highest local key was `local_highest`,
    /// advancing past the whole reserved block so nothing allocated
    /// later can collide with it. Saturates at the top of the key
    /// space rather than wrapping into keys already handed out.
    pub fn commit_merge(&mut self, local_highest: i64) {
        self.next = self.next.saturating_add(local_highest).saturating_add(1);
    }
}
