use std::collections::BTreeMap;

use crate::assets::source::FramePattern;
use crate::config::model::{SheetDef, SourceDef};
use crate::foundation::error::{SheetError, SheetResult};

/// Cross-check a sheet against the project's sources before building a layout.
///
/// Shape checks (equal run lengths, grid capacity) live in [`crate::SheetLayout::new`].
pub(crate) fn validate_sheet(
    name: &str,
    def: &SheetDef,
    sources: &BTreeMap<String, SourceDef>,
) -> SheetResult<()> {
    let bad = |msg: String| SheetError::config(format!("sheet '{name}': {msg}"));

    for d in &def.order {
        if !def.sequences.contains_key(d) {
            return Err(bad(format!("direction '{d}' is in the order but has no sequence")));
        }
    }
    for d in def.sequences.keys() {
        if !def.order.contains(d) {
            return Err(bad(format!(
                "sequence for direction '{d}' is not listed in the order"
            )));
        }
    }

    for (d, frames) in &def.sequences {
        for f in frames {
            let Some(src) = sources.get(&f.source) else {
                return Err(bad(format!(
                    "direction '{d}' references unknown source '{}'",
                    f.source
                )));
            };
            FramePattern::parse(&src.pattern)
                .map_err(|e| bad(format!("source '{}': {e}", f.source)))?;
        }
    }

    if !is_const_ident(&def.output.const_prefix) {
        return Err(bad(format!(
            "const_prefix '{}' must be an uppercase identifier",
            def.output.const_prefix
        )));
    }

    def.classifier
        .validate()
        .map_err(|e| bad(format!("classifier: {e}")))?;
    Ok(())
}

fn is_const_ident(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_uppercase() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

#[cfg(test)]
#[path = "../../tests/unit/config/validate.rs"]
mod tests;
