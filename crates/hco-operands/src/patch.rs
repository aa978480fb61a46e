//! JSON patch overlays carried in HyperConverged annotations.
//!
//! Operators of the cluster can tune operand fields the HyperConverged API
//! does not expose by annotating it with an RFC 6902 patch. The patch is
//! applied to the computed desired object and may only touch `/spec/...`.

use crate::error::{OperandError, Result};
use hco_core::{HyperConverged, Resource};
use json_patch::Patch;

/// Annotation holding the patch for the NetworkAddonsConfig
pub const JSON_PATCH_CNAO_ANNOTATION: &str = "networkaddonsconfigs.kubevirt.io/jsonpatch";

/// Apply the patch stored under `annotation` on `hc`, if any, to `obj`
pub fn apply_patch_to_spec<K: Resource>(
    hc: &HyperConverged,
    annotation: &str,
    obj: &mut K,
) -> Result<()> {
    match hc.annotation(annotation) {
        Some(raw) => apply_annotation_patch(annotation, raw, obj),
        None => Ok(()),
    }
}

fn apply_annotation_patch<K: Resource>(annotation: &str, raw: &str, obj: &mut K) -> Result<()> {
    let patch: Patch = serde_json::from_str(raw)
        .map_err(|e| OperandError::invalid_patch(annotation, e.to_string()))?;

    for op in patch.0.iter() {
        let op = serde_json::to_value(op)
            .map_err(|e| OperandError::invalid_patch(annotation, e.to_string()))?;
        let path = op.get("path").and_then(|p| p.as_str()).unwrap_or_default();
        if !path.starts_with("/spec/") {
            return Err(OperandError::invalid_patch(
                annotation,
                format!("can only modify spec fields, got path '{}'", path),
            ));
        }
    }

    let mut doc = hco_core::to_value(&*obj)?;
    json_patch::patch(&mut doc, &patch)
        .map_err(|e| OperandError::invalid_patch(annotation, e.to_string()))?;
    *obj = serde_json::from_value(doc)
        .map_err(|e| OperandError::invalid_patch(annotation, e.to_string()))?;

    Ok(())
}
