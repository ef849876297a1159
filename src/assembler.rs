/// Sentinel for an index that is not yet part of the boundary.
const UNLINKED: usize = usize::MAX;

/// Maintains the cyclic, ordered boundary of a hull under construction as a
/// doubly-linked arrangement over original input indices.
///
/// Inserting a vertex between a known neighbor pair is O(1), no matter how
/// many insertions happened elsewhere on the boundary in the meantime.
pub(crate) struct BoundaryAssembler {
    next: Vec<usize>,
    prev: Vec<usize>,
    head: usize,
    len: usize,
}

impl BoundaryAssembler {
    /// Creates an empty assembler for a point set of the given size.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            next: vec![UNLINKED; capacity],
            prev: vec![UNLINKED; capacity],
            head: UNLINKED,
            len: 0,
        }
    }

    /// Seeds the boundary with the cyclic pair `[a, b]`.
    ///
    /// Traversal starts at `a`.
    pub(crate) fn seed_pair(&mut self, a: usize, b: usize) {
        debug_assert_eq!(self.len, 0);
        debug_assert_ne!(a, b);

        self.next[a] = b;
        self.next[b] = a;
        self.prev[a] = b;
        self.prev[b] = a;
        self.head = a;
        self.len = 2;
    }

    /// Inserts `vertex` into the boundary between the adjacent pair
    /// `before -> after`, preserving traversal order.
    pub(crate) fn insert_between(&mut self, before: usize, vertex: usize, after: usize) {
        debug_assert_eq!(self.next[before], after);
        debug_assert_eq!(self.prev[after], before);
        debug_assert_eq!(self.next[vertex], UNLINKED);

        self.next[before] = vertex;
        self.prev[vertex] = before;
        self.next[vertex] = after;
        self.prev[after] = vertex;
        self.len += 1;
    }

    /// Consumes the assembler and returns the boundary as a vector of input
    /// indices in traversal order, starting at the seed vertex.
    pub(crate) fn into_indices(self) -> Vec<usize> {
        let mut indices = Vec::with_capacity(self.len);

        if self.len == 0 {
            return indices;
        }

        let mut current = self.head;
        for _ in 0..self.len {
            indices.push(current);
            current = self.next[current];
        }
        debug_assert_eq!(current, self.head);

        indices
    }
}
