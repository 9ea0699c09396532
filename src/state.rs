use crate::error::ConfigError;
use crate::solver::PolarGeometry;

/// Scalar values over an annular grid with one ghost layer on every side.
///
/// Logical coordinates are `(i, j)` with `i` radial in `0..=nr + 1` and `j`
/// angular in `0..=ntheta + 1`. Rows `i = 0` and `i = nr + 1` and columns
/// `j = 0` and `j = ntheta + 1` are ghosts, written only by `set_bnd`.
#[derive(Debug, Clone, PartialEq)]
pub struct GridField {
    nr: usize,
    ntheta: usize,
    data: Vec<f32>,
}

impl GridField {
    /// Zero-filled field.
    pub fn new(nr: usize, ntheta: usize) -> Self {
        Self { nr, ntheta, data: vec![0.0; (nr + 2) * (ntheta + 2)] }
    }

    pub fn for_geometry(geometry: &PolarGeometry) -> Self {
        Self { nr: geometry.nr, ntheta: geometry.ntheta, data: vec![0.0; geometry.len()] }
    }

    /// Wrap existing storage laid out as `i + (nr + 2) * j`.
    pub fn from_vec(nr: usize, ntheta: usize, data: Vec<f32>) -> Result<Self, ConfigError> {
        let expected = (nr + 2) * (ntheta + 2);
        if data.len() != expected {
            return Err(ConfigError::BufferSizeMismatch { expected, actual: data.len() });
        }
        Ok(Self { nr, ntheta, data })
    }

    #[inline]
    pub fn nr(&self) -> usize {
        self.nr
    }

    #[inline]
    pub fn ntheta(&self) -> usize {
        self.ntheta
    }

    /// Linear offset of `(i, j)`. Panics outside the ghost-inclusive range;
    /// there is no wraparound here.
    #[inline(always)]
    pub fn idx(&self, i: usize, j: usize) -> usize {
        assert!(
            i <= self.nr + 1 && j <= self.ntheta + 1,
            "grid index ({i}, {j}) outside 0..={} x 0..={}",
            self.nr + 1,
            self.ntheta + 1
        );
        i + (self.nr + 2) * j
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f32 {
        self.data[self.idx(i, j)]
    }

    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: f32) {
        let k = self.idx(i, j);
        self.data[k] = value;
    }

    #[inline]
    pub fn add(&mut self, i: usize, j: usize, amount: f32) {
        let k = self.idx(i, j);
        self.data[k] += amount;
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    pub fn fill(&mut self, value: f32) {
        self.data.fill(value);
    }

    pub fn copy_from(&mut self, other: &GridField) {
        debug_assert_eq!((self.nr, self.ntheta), (other.nr, other.ntheta));
        self.data.copy_from_slice(&other.data);
    }

    /// `self += scale * other`, cell by cell.
    pub fn add_scaled(&mut self, other: &GridField, scale: f32) {
        debug_assert_eq!((self.nr, self.ntheta), (other.nr, other.ntheta));
        for (x, s) in self.data.iter_mut().zip(other.data.iter()) {
            *x += scale * s;
        }
    }

    /// Iterator over interior coordinates in storage order (`i` fastest).
    pub fn interior(&self) -> impl Iterator<Item = (usize, usize)> + use<> {
        let (nr, ntheta) = (self.nr, self.ntheta);
        (1..=ntheta).flat_map(move |j| (1..=nr).map(move |i| (i, j)))
    }
}

/// Two buffers of the same quantity: `current` and `source`.
///
/// The source buffer first collects external forcing, then after `swap`
/// becomes the read-only snapshot a stage diffuses or advects from. Swapping
/// only flips which slot plays which role.
#[derive(Debug, Clone)]
pub struct FieldPair {
    buffers: [GridField; 2],
    current: usize,
}

impl FieldPair {
    pub fn new(nr: usize, ntheta: usize) -> Self {
        Self { buffers: [GridField::new(nr, ntheta), GridField::new(nr, ntheta)], current: 0 }
    }

    #[inline]
    pub fn swap(&mut self) {
        self.current ^= 1;
    }

    #[inline]
    pub fn current(&self) -> &GridField {
        &self.buffers[self.current]
    }

    #[inline]
    pub fn current_mut(&mut self) -> &mut GridField {
        &mut self.buffers[self.current]
    }

    #[inline]
    pub fn source(&self) -> &GridField {
        &self.buffers[self.current ^ 1]
    }

    #[inline]
    pub fn source_mut(&mut self) -> &mut GridField {
        &mut self.buffers[self.current ^ 1]
    }

    /// Mutable current together with shared source.
    pub fn split_mut(&mut self) -> (&mut GridField, &GridField) {
        let [a, b] = &mut self.buffers;
        if self.current == 0 { (a, &*b) } else { (b, &*a) }
    }

    /// `current += scale * source`.
    pub fn add_source(&mut self, scale: f32) {
        let (cur, src) = self.split_mut();
        cur.add_scaled(src, scale);
    }
}

/// Every grid the simulation owns.
pub struct SimState {
    pub density: FieldPair,
    pub ur: FieldPair,
    pub utheta: FieldPair,
    /// Pressure potential, reused by every projection.
    pub pressure: GridField,
    /// Velocity divergence, reused by every projection.
    pub divergence: GridField,
}

impl SimState {
    pub fn new(geometry: &PolarGeometry) -> Self {
        let (nr, nt) = (geometry.nr, geometry.ntheta);
        Self {
            density: FieldPair::new(nr, nt),
            ur: FieldPair::new(nr, nt),
            utheta: FieldPair::new(nr, nt),
            pressure: GridField::new(nr, nt),
            divergence: GridField::new(nr, nt),
        }
    }

    /// Zero the three forcing buffers.
    pub fn clear_sources(&mut self) {
        self.density.source_mut().fill(0.0);
        self.ur.source_mut().fill(0.0);
        self.utheta.source_mut().fill(0.0);
    }

    /// Copy current fields into a pre-allocated snapshot, avoiding allocation.
    pub fn snapshot_into(&self, dst: &mut FrameSnapshot) {
        dst.density.copy_from(self.density.current());
        dst.ur.copy_from(self.ur.current());
        dst.utheta.copy_from(self.utheta.current());
    }
}

/// Copy of the displayable fields taken between frame steps.
#[derive(Debug, Clone)]
pub struct FrameSnapshot {
    pub geometry: PolarGeometry,
    pub density: GridField,
    pub ur: GridField,
    pub utheta: GridField,
}

impl FrameSnapshot {
    /// Pre-allocate a snapshot buffer matching the given geometry.
    pub fn new_empty(geometry: PolarGeometry) -> Self {
        Self {
            geometry,
            density: GridField::for_geometry(&geometry),
            ur: GridField::for_geometry(&geometry),
            utheta: GridField::for_geometry(&geometry),
        }
    }
}
