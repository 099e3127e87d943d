//! Rendering surface identifiers

/// Handle to a live rendering surface that components anchor to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SurfaceId(pub u64);

impl SurfaceId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

/// Generator for unique surface IDs
#[derive(Debug, Default)]
pub struct SurfaceIdGenerator {
    next: u64,
}

impl SurfaceIdGenerator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn next(&mut self) -> SurfaceId {
        let id = SurfaceId(self.next);
        self.next += 1;
        id
    }
}
