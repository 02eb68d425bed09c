//! Plug-path and literal formatting helpers shared by the engine and the recorders.

/// Channel ceiling for any operand of a set-or-connect.
pub const MAX_CHANNELS: usize = 3;

/// Split `node.attr` at the first dot. Anything after the first dot is the attribute path,
/// which keeps index-qualified paths like `input3D[0].input3Dx` intact.
pub fn split_plug(plug: &str) -> Option<(&str, &str)> {
    let (node, attr) = plug.split_once('.')?;
    if node.is_empty() || attr.is_empty() {
        return None;
    }
    Some((node, attr))
}

/// Join a node name and an attribute path into a plug.
pub fn join_plug(node: &str, attr: &str) -> String {
    format!("{node}.{attr}")
}

/// Render a number the way it appears in trace logs and provenance expressions.
pub fn format_number(v: f64) -> String {
    format!("{v}")
}

/// Short token for a literal inside a generated node name. Fractional values are truncated and
/// suffixed with `f`.
pub(crate) fn number_token(v: f64) -> String {
    if v.fract() == 0.0 && v.is_finite() {
        format!("{}", v as i64)
    } else if v.is_finite() {
        format!("{}f", v.trunc() as i64)
    } else {
        "nan".to_owned()
    }
}

/// Replace characters a host node name cannot hold with `_`.
pub(crate) fn sanitize_node_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Keep only ASCII alphanumerics (used for exposed container plug names).
pub(crate) fn alnum_only(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_alphanumeric()).collect()
}

/// Last dot-separated segment of a path.
pub(crate) fn last_segment(path: &str) -> &str {
    path.rsplit('.').next().unwrap_or(path)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
