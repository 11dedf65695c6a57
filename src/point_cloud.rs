use crate::params::ParameterSet;

/// A generated galaxy: parallel position and color arrays.
///
/// Both arrays hold `3 * point_count()` floats, interleaved per point as
/// `(x, y, z)` and `(r, g, b)`. The parameter snapshot the cloud was built
/// from travels with it.
#[derive(Debug, Clone, PartialEq)]
pub struct PointCloud {
    pub positions: Vec<f32>,
    pub colors: Vec<f32>,
    pub params: ParameterSet,
}

impl PointCloud {
    pub(crate) fn with_capacity(params: &ParameterSet) -> Self {
        let floats = params.count as usize * 3;
        Self {
            positions: Vec::with_capacity(floats),
            colors: Vec::with_capacity(floats),
            params: params.clone(),
        }
    }

    #[inline]
    pub fn point_count(&self) -> u32 {
        (self.positions.len() / 3) as u32
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Position of point `i`.
    pub fn position(&self, i: usize) -> [f32; 3] {
        let i3 = i * 3;
        [self.positions[i3], self.positions[i3 + 1], self.positions[i3 + 2]]
    }

    /// Iterate `(position, color)` pairs.
    pub fn points(&self) -> impl Iterator<Item = ([f32; 3], [f32; 3])> + '_ {
        self.positions
            .chunks_exact(3)
            .zip(self.colors.chunks_exact(3))
            .map(|(p, c)| ([p[0], p[1], p[2]], [c[0], c[1], c[2]]))
    }

    pub(crate) fn push(&mut self, position: [f32; 3], color: [f32; 3]) {
        self.positions.extend_from_slice(&position);
        self.colors.extend_from_slice(&color);
    }
}
