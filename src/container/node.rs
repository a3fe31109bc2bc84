use crate::schema::TypeDescriptor;

/// How a container was opened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    /// Reads only; every mutation fails with `ReadOnly`
    ReadOnly,
    /// Reads and writes
    ReadWrite,
}

/// Kind of a link in the container hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// A group that may hold further links
    Group,
    /// A typed, growable array
    Array,
}

/// Opaque reference to an open array.
///
/// Handles stay valid for the lifetime of the container that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArrayHandle(pub(super) usize);

#[derive(Debug, Clone)]
pub(super) enum Node {
    Group,
    Array(ArrayHandle),
}

impl Node {
    pub(super) fn kind(&self) -> NodeKind {
        match self {
            Node::Group => NodeKind::Group,
            Node::Array(_) => NodeKind::Array,
        }
    }
}

/// In-memory state of one array
#[derive(Debug, Clone)]
pub(super) struct ArrayData {
    pub(super) path: String,
    pub(super) dtype: TypeDescriptor,
    pub(super) extent: Vec<u64>,
    /// `None` marks an unlimited axis
    pub(super) max_extent: Vec<Option<u64>>,
    pub(super) chunk: Vec<u64>,
    /// Row-major element storage; `None` means never written
    pub(super) elements: Vec<Option<Vec<u8>>>,
}

impl ArrayData {
    /// Number of elements covered by `extent`; `None` on overflow
    pub(super) fn element_count(extent: &[u64]) -> Option<u64> {
        extent.iter().try_fold(1u64, |acc, &len| acc.checked_mul(len))
    }

    /// Row-major linear positions covered by a hyperslab
    pub(super) fn slab_positions(&self, offset: &[u64], count: &[u64]) -> Vec<usize> {
        let rank = self.extent.len();
        // count lies inside the extent, so this cannot overflow
        let total = count.iter().product::<u64>() as usize;
        let mut positions = Vec::with_capacity(total);
        if total == 0 {
            return positions;
        }

        let mut cursor = vec![0u64; rank];
        loop {
            let mut linear = 0u64;
            for axis in 0..rank {
                linear = linear * self.extent[axis] + offset[axis] + cursor[axis];
            }
            positions.push(linear as usize);

            // odometer increment, last axis fastest
            let mut axis = rank;
            loop {
                if axis == 0 {
                    return positions;
                }
                axis -= 1;
                cursor[axis] += 1;
                if cursor[axis] < count[axis] {
                    break;
                }
                cursor[axis] = 0;
            }
        }
    }
}
