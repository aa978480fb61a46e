use hco_core::crd::{NodePlacement, Placement};
use std::collections::BTreeMap;

/// Translate a HyperConverged node placement into the NetworkAddonsConfig
/// placement schema.
///
/// Returns `None` when there is nothing to place: no input, or an input with
/// no affinity, no tolerations and no node selector entries. Tolerations keep
/// their order so the result diffs deterministically.
pub fn hco_placement_to_cnao(placement: Option<&NodePlacement>) -> Option<Placement> {
    let placement = placement?;

    let affinity = placement.affinity.clone();
    let tolerations: Vec<_> = placement.tolerations.iter().flatten().cloned().collect();
    let node_selector: BTreeMap<String, String> = placement
        .node_selector
        .iter()
        .flatten()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    if affinity.is_none() && tolerations.is_empty() && node_selector.is_empty() {
        return None;
    }

    Some(Placement {
        affinity,
        tolerations: (!tolerations.is_empty()).then_some(tolerations),
        node_selector: (!node_selector.is_empty()).then_some(node_selector),
    })
}
