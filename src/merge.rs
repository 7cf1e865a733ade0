use crate::arrays::LabelMap;
use crate::common::{substitute_labels, Config};
use crate::connectivity::{find_components, ComponentSet, DisjointSet};
use crate::error::{Error, Result};
use assume::assume;
use std::collections::BTreeMap;

/// Outcome of a size enforcement run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Number of components merged into a neighbor.
    pub merges: u32,
    /// Components still smaller than `min_size`. Only a component without any neighbor (the
    /// whole image) can stay undersized, so this is 0 or 1 for a non-empty label map.
    pub residual_undersized: u32,
    pub min_size: u32,
}

impl MergeReport {
    /// Turns leftover undersized components into [`Error::DegenerateMerge`].
    pub fn check(&self) -> Result<()> {
        if self.residual_undersized > 0 {
            return Err(Error::DegenerateMerge {
                residual: self.residual_undersized,
                min_size: self.min_size,
            });
        }
        Ok(())
    }
}

/// Components with their sizes and shared boundary lengths.
struct RegionGraph {
    /// Label of every component (taken from its leader pixel).
    labels: Vec<u32>,
    sizes: Vec<u32>,
    /// Neighbor component -> number of 4-adjacent pixel pairs shared with it.
    neighbors: Vec<BTreeMap<u32, u32>>,
    /// Components sorted by (label, discovery order).
    order: Vec<u32>,
    /// Position of every component in `order`.
    rank: Vec<u32>,
}

impl RegionGraph {
    fn new(labels: &LabelMap, cc_set: &ComponentSet) -> Self {
        let num_components = cc_set.num_components as usize;
        let width = labels.width;
        let assignment = cc_set.component_assignment.as_slice();
        let mut neighbors: Vec<BTreeMap<u32, u32>> = vec![BTreeMap::new(); num_components];
        for y in 0..labels.height {
            for x in 0..width {
                let index = y * width + x;
                let a = assignment[index];
                if x + 1 < width {
                    let b = assignment[index + 1];
                    if a != b {
                        *neighbors[a as usize].entry(b).or_insert(0) += 1;
                        *neighbors[b as usize].entry(a).or_insert(0) += 1;
                    }
                }
                if y + 1 < labels.height {
                    let b = assignment[index + width];
                    if a != b {
                        *neighbors[a as usize].entry(b).or_insert(0) += 1;
                        *neighbors[b as usize].entry(a).or_insert(0) += 1;
                    }
                }
            }
        }
        let component_labels: Vec<u32> = cc_set
            .component_leaders
            .iter()
            .map(|leader| labels.data[*leader])
            .collect();
        let mut order: Vec<u32> = (0..cc_set.num_components).collect();
        order.sort_by_key(|c| (component_labels[*c as usize], *c));
        let mut rank = vec![0u32; num_components];
        for (position, component) in order.iter().enumerate() {
            rank[*component as usize] = position as u32;
        }
        Self {
            labels: component_labels,
            sizes: cc_set.num_component_members.clone(),
            neighbors,
            order,
            rank,
        }
    }

    /// Neighbor sharing the longest boundary with `component`; ties go to the neighbor that
    /// comes first in the processing order (lowest label).
    fn merge_target(&self, component: u32) -> Option<u32> {
        self.neighbors[component as usize]
            .iter()
            .max_by(|(a, a_length), (b, b_length)| {
                a_length
                    .cmp(b_length)
                    .then_with(|| self.rank[**b as usize].cmp(&self.rank[**a as usize]))
            })
            .map(|(neighbor, _)| *neighbor)
    }

    /// Moves `source` into `target`, transferring its size and boundaries.
    fn absorb(&mut self, source: u32, target: u32) {
        let source_neighbors = std::mem::take(&mut self.neighbors[source as usize]);
        for (neighbor, length) in source_neighbors {
            self.neighbors[neighbor as usize].remove(&source);
            if neighbor == target {
                continue;
            }
            *self.neighbors[neighbor as usize].entry(target).or_insert(0) += length;
            *self.neighbors[target as usize].entry(neighbor).or_insert(0) += length;
        }
        self.sizes[target as usize] += self.sizes[source as usize];
        self.sizes[source as usize] = 0;
    }
}

/// Merges every 4-connected component smaller than `min_size` pixels into a neighbor.
///
/// Components are visited once, in ascending label order (discovery order for equal labels).
/// An undersized component takes the label of the neighbor it shares the longest boundary
/// with, ties going to the lowest label. Sizes are updated right after each merge, so an
/// absorbing component that is still too small is handled when the scan reaches it. Sizes
/// only grow, a component the scan has passed is either merged away or large enough.
///
/// A component without neighbors cannot be merged; if the whole image is smaller than
/// `min_size` it ends up as a single component which is reported in `residual_undersized`.
/// Merged labels are not renumbered.
pub fn enforce_minimum_size(labels: &mut LabelMap, min_size: u32) -> MergeReport {
    let cc_set = find_components(labels);
    let mut graph = RegionGraph::new(labels, &cc_set);
    let num_components = cc_set.num_components;
    let mut disjoint_set = DisjointSet::new(num_components);
    let mut merges = 0u32;

    for rank in 0..num_components as usize {
        let component = graph.order[rank];
        let size = graph.sizes[component as usize];
        if size == 0 || size >= min_size {
            continue;
        }
        let Some(target) = graph.merge_target(component) else {
            continue;
        };
        graph.absorb(component, target);
        disjoint_set.merge_into(component, target);
        merges += 1;
    }

    let residual_undersized = graph
        .sizes
        .iter()
        .filter(|size| **size > 0 && **size < min_size)
        .count() as u32;

    if merges > 0 {
        let final_labels: Vec<u32> = (0..num_components)
            .map(|component| graph.labels[disjoint_set.find(component) as usize])
            .collect();
        let assignment = cc_set.component_assignment.as_slice();
        substitute_labels(&mut labels.data, |i, _| {
            assume!(unsafe: i < assignment.len(), "i: {i} > {}", assignment.len());
            let component_no = assignment[i] as usize;
            assume!(unsafe: component_no < final_labels.len(), "component_no: {component_no} > {}", final_labels.len());
            final_labels[component_no]
        });
    }

    log::debug!(
        "minimum size {min_size}: {merges} of {num_components} components merged"
    );
    if residual_undersized > 0 {
        log::warn!(
            "{residual_undersized} component(s) remain below {min_size} pixels, \
             the image has only {} pixels",
            labels.data.len()
        );
    }

    MergeReport {
        merges,
        residual_undersized,
        min_size,
    }
}

/// Size threshold derived from a component count:
/// _max(1, round(min_size_factor * width * height / bound))_.
pub fn min_size_from_bound(labels: &LabelMap, bound: u32, config: &Config) -> Result<u32> {
    if bound == 0 {
        return Err(Error::InvalidInput(
            "component bound must be positive".to_string(),
        ));
    }
    config.validate()?;
    let mean_size = labels.data.len() as f64 / bound as f64;
    Ok(((config.min_size_factor as f64 * mean_size).round() as u32).max(1))
}

/// [`enforce_minimum_size()`] with the threshold derived from `bound`, usually the component
/// count returned by `connectivity::relabel_connected()`. Fragments small compared to the
/// average component are merged away.
pub fn enforce_minimum_size_up_to(
    labels: &mut LabelMap,
    bound: u32,
    config: &Config,
) -> Result<MergeReport> {
    let min_size = min_size_from_bound(labels, bound, config)?;
    Ok(enforce_minimum_size(labels, min_size))
}

/// Runs [`enforce_minimum_size()`] up to `max_passes` times with the same threshold, stopping
/// after the first pass without merges. `merges` is summed over the passes, the residual is
/// the one of the last pass.
pub fn enforce_minimum_size_repeated(
    labels: &mut LabelMap,
    min_size: u32,
    max_passes: u8,
) -> MergeReport {
    let mut report = MergeReport {
        min_size,
        ..MergeReport::default()
    };
    for _ in 0..max_passes {
        let pass = enforce_minimum_size(labels, min_size);
        report.merges += pass.merges;
        report.residual_undersized = pass.residual_undersized;
        if pass.merges == 0 {
            break;
        }
    }
    report
}
