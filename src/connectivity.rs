use crate::arrays::LabelMap;
use multiversion::multiversion;

const UNASSIGNED: u32 = u32::MAX;

/// Result of the connected-component analysis of a label map.
#[derive(Debug, Clone)]
pub struct ComponentSet {
    pub num_components: u32,
    /// For every pixel the number of its component. Components are numbered in the order in
    /// which the row-major scan first reaches them.
    pub component_assignment: Vec<u32>,
    pub num_component_members: Vec<u32>,
    /// Index of the first pixel (in scan order) of every component.
    pub component_leaders: Vec<usize>,
}

/// Union-find over component numbers used when components get merged.
pub struct DisjointSet {
    parents: Vec<u32>,
}

impl DisjointSet {
    pub fn new(size: u32) -> Self {
        DisjointSet {
            parents: (0..size).collect(),
        }
    }

    pub fn find(&mut self, node: u32) -> u32 {
        let mut node = node as usize;
        while self.parents[node] as usize != node {
            // path halving
            let grandparent = self.parents[self.parents[node] as usize];
            self.parents[node] = grandparent;
            node = grandparent as usize;
        }
        node as u32
    }

    /// Attaches the tree containing `node_i` below the root of the tree containing `node_j`,
    /// so the root of `node_j` stays the representative.
    pub fn merge_into(&mut self, node_i: u32, node_j: u32) {
        let root_i = self.find(node_i);
        let root_j = self.find(node_j);
        if root_i != root_j {
            self.parents[root_i as usize] = root_j;
        }
    }
}

/// 4-neighbors of pixel `index` in a row-major grid of `len` pixels.
#[inline(always)]
pub(crate) fn neighbors_4(index: usize, width: usize, len: usize) -> impl Iterator<Item = usize> {
    let x = index % width;
    let left = (x > 0).then(|| index - 1);
    let right = (x + 1 < width).then(|| index + 1);
    let up = index.checked_sub(width);
    let down = Some(index + width).filter(|i| *i < len);
    [left, right, up, down].into_iter().flatten()
}

/// Flood fills every 4-connected region of equal labels.
///
/// Pixels are scanned row by row; an unassigned pixel starts a depth-first fill over the
/// pixels sharing its label and the whole fill gets the next component number. The same input
/// therefore always gives the same numbering. Runs in O(width * height).
#[multiversion(targets = "simd")]
pub fn find_components(labels: &LabelMap) -> ComponentSet {
    let len = labels.data.len();
    let width = labels.width;
    let data = labels.data.as_slice();
    let mut component_assignment = vec![UNASSIGNED; len];
    let mut num_component_members: Vec<u32> = Vec::new();
    let mut component_leaders: Vec<usize> = Vec::new();
    let mut stack: Vec<usize> = Vec::new();

    for start in 0..len {
        if component_assignment[start] != UNASSIGNED {
            continue;
        }
        let component_no = num_component_members.len() as u32;
        let label = data[start];
        let mut members = 0u32;
        component_assignment[start] = component_no;
        stack.push(start);
        while let Some(index) = stack.pop() {
            members += 1;
            for neighbor in neighbors_4(index, width, len) {
                if component_assignment[neighbor] == UNASSIGNED && data[neighbor] == label {
                    component_assignment[neighbor] = component_no;
                    stack.push(neighbor);
                }
            }
        }
        num_component_members.push(members);
        component_leaders.push(start);
    }

    ComponentSet {
        num_components: num_component_members.len() as u32,
        component_assignment,
        num_component_members,
        component_leaders,
    }
}

/// Splits every label whose pixels are not 4-connected, so each label is exactly one
/// superpixel afterwards. Labels become the component numbers of [`find_components()`].
///
/// Returns the number of components.
pub fn relabel_connected(labels: &mut LabelMap) -> u32 {
    let cc_set = find_components(labels);
    labels
        .data
        .copy_from_slice(cc_set.component_assignment.as_slice());
    log::debug!(
        "connectivity: {}x{} label map split into {} components",
        labels.width,
        labels.height,
        cc_set.num_components
    );
    cc_set.num_components
}
