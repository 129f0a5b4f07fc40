//! Arena allocation for the front end.
//!
//! All syntax tree nodes are allocated from a bump arena: each node is
//! produced exactly once during parsing and the whole tree is freed in one
//! step, so bump allocation gives O(1) nodes and cheap slice storage for
//! node lists.

use bumpalo::Bump;

/// The compiler arena wraps a bump allocator for all tree allocations.
pub struct CompilerArena {
    bump: Bump,
}

impl CompilerArena {
    /// Create a new arena with default capacity.
    pub fn new() -> Self {
        Self { bump: Bump::new() }
    }

    /// Create a new arena with the specified initial capacity in bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bump: Bump::with_capacity(capacity),
        }
    }

    /// Get a reference to the underlying bump allocator.
    #[inline]
    pub fn bump(&self) -> &Bump {
        &self.bump
    }

    /// Allocate a value in the arena and return a reference to it.
    #[inline]
    pub fn alloc<T>(&self, val: T) -> &T {
        self.bump.alloc(val)
    }

    /// Allocate a string slice in the arena.
    #[inline]
    pub fn alloc_str(&self, s: &str) -> &str {
        self.bump.alloc_str(s)
    }

    /// Move a Vec's elements into the arena and return them as a slice.
    ///
    /// Uses ManuallyDrop to prevent double-free on panic inside
    /// alloc_slice_fill_with.
    pub fn alloc_vec<T>(&self, vec: Vec<T>) -> &[T] {
        if vec.is_empty() {
            return &[];
        }
        let mut vec = std::mem::ManuallyDrop::new(vec);
        let len = vec.len();
        let ptr = vec.as_ptr();
        let slice = self.bump.alloc_slice_fill_with(len, |i| {
            // SAFETY: i < len, and each element is read exactly once.
            // ManuallyDrop prevents the Vec destructor from running, so
            // elements won't be double-freed even if this closure panics
            // partway through.
            unsafe { std::ptr::read(ptr.add(i)) }
        });
        // All elements have been moved out; set len to 0 so that if
        // ManuallyDrop is ever manually dropped, it won't try to drop
        // moved-from elements.
        unsafe {
            vec.set_len(0);
        }
        slice
    }

    /// Returns the total bytes allocated in this arena.
    pub fn allocated_bytes(&self) -> usize {
        self.bump.allocated_bytes()
    }
}

impl Default for CompilerArena {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alloc_vec_moves_elements() {
        let arena = CompilerArena::new();
        let slice = arena.alloc_vec(vec![String::from("a"), String::from("b")]);
        assert_eq!(slice.len(), 2);
        assert_eq!(slice[0], "a");
        assert_eq!(slice[1], "b");
    }

    #[test]
    fn test_alloc_vec_empty() {
        let arena = CompilerArena::new();
        let slice: &[u32] = arena.alloc_vec(Vec::new());
        assert!(slice.is_empty());
    }

    #[test]
    fn test_alloc_str() {
        let arena = CompilerArena::new();
        let s = arena.alloc_str("hello");
        assert_eq!(s, "hello");
    }
}
