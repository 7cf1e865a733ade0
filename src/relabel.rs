use crate::arrays::LabelMap;
use crate::common::substitute_labels;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Renumbers labels to `0..K` in the order they are first met in a row-major scan, `K` being
/// the number of distinct labels. Returns `K`.
///
/// The result depends only on how pixels are grouped, not on the label values, so two maps
/// describing the same partition give the same output. Running it twice changes nothing.
pub fn canonicalize(labels: &mut LabelMap) -> u32 {
    let mut substitute: HashMap<u32, u32> = HashMap::new();
    for label in labels.data.iter() {
        let next = substitute.len() as u32;
        if let Entry::Vacant(entry) = substitute.entry(*label) {
            entry.insert(next);
        }
    }
    let num_labels = substitute.len() as u32;
    if substitute.iter().any(|(label, new_label)| label != new_label) {
        substitute_labels(&mut labels.data, |_, label| substitute[&label]);
    }
    log::debug!("relabel: {num_labels} labels");
    num_labels
}

#[cfg(test)]
mod tests {
    use super::canonicalize;
    use crate::arrays::LabelMap;
    use crate::connectivity::tests::noisy_labels;

    #[test]
    fn first_seen_order() {
        let mut labels = LabelMap::from_slice(&[0, 2, 5, 5, 2, 0], 6, 1).unwrap();
        assert_eq!(canonicalize(&mut labels), 3);
        assert_eq!(labels.data.as_slice(), &[0, 1, 2, 2, 1, 0][..]);
    }

    #[test]
    fn dense_without_gaps() {
        let mut labels = LabelMap::from_rows(&[[90u32, 4, 4], [17, 90, 3000]]).unwrap();
        let num_labels = canonicalize(&mut labels);
        assert_eq!(num_labels, 4);
        let mut seen: Vec<u32> = labels.data.to_vec();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen, (0..num_labels).collect::<Vec<_>>());
    }

    #[test]
    fn same_partition_same_output() {
        let base = noisy_labels(37, 23, 6, 9);
        let mut permuted = base.clone();
        for label in permuted.data.iter_mut() {
            // injective remapping of the label values
            *label = *label * 7919 + 13;
        }
        let mut base = base;
        assert_eq!(canonicalize(&mut base), canonicalize(&mut permuted));
        assert_eq!(base.data.as_slice(), permuted.data.as_slice());
    }

    #[test]
    fn idempotent() {
        let mut labels = noisy_labels(16, 16, 5, 4);
        canonicalize(&mut labels);
        let once = labels.clone();
        canonicalize(&mut labels);
        assert_eq!(once.data.as_slice(), labels.data.as_slice());
    }

    #[test]
    fn empty_map_has_no_labels() {
        let mut labels = LabelMap::from_fill(0, 0, 5);
        assert_eq!(canonicalize(&mut labels), 0);
    }
}
