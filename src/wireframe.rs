//! Renderer-agnostic line geometry for debug drawing of collision shapes.
//!
//! Shapes never draw themselves; they describe their outline as vertices and
//! index pairs, and an external renderer decides what to do with it.

/// Vertex/line description of a shape outline, in the shape's local frame.
///
/// Line entries index into `vertices`.
///
/// # Type Parameters
/// * `N` - Maximum number of vertices and of lines (compile-time capacity).
#[derive(Debug, Clone, Default)]
pub struct Wireframe<const N: usize> {
    pub vertices: heapless::Vec<[f32; 3], N>,
    pub lines: heapless::Vec<[usize; 2], N>,
}

impl<const N: usize> Wireframe<N> {
    pub fn new() -> Self {
        Self {
            vertices: heapless::Vec::new(),
            lines: heapless::Vec::new(),
        }
    }

    /// Resolve every line to its pair of endpoint positions.
    pub fn segments(&self) -> impl Iterator<Item = ([f32; 3], [f32; 3])> + '_ {
        self.lines
            .iter()
            .filter_map(|[a, b]| Some((*self.vertices.get(*a)?, *self.vertices.get(*b)?)))
    }
}
