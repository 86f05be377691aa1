use serde_json::Value;

use crate::model::Dependency;

const NODE_MODULES_PREFIX: &str = "node_modules/";

/// Extracts installed packages from an npm v2/v3 lockfile document.
///
/// The `"packages"` object maps install paths (`""`, `"node_modules/lodash"`,
/// `"node_modules/@scope/pkg"`) to records carrying a `"version"`. Any shape
/// mismatch is treated as absent: a document without a `"packages"` object
/// yields an empty list, and records that are not objects are skipped.
///
/// Entries are returned in map iteration order and are not deduplicated.
/// An entry with a missing or non-string version keeps an empty version.
pub fn extract_npm_packages(lock: &Value) -> Vec<Dependency> {
    let Some(packages) = lock.get("packages").and_then(Value::as_object) else {
        return Vec::new();
    };

    let mut out = Vec::with_capacity(packages.len());
    for (path, entry) in packages {
        let Some(entry) = entry.as_object() else {
            continue;
        };

        // Root project
        if path.is_empty() {
            continue;
        }

        let version = entry
            .get("version")
            .and_then(Value::as_str)
            .unwrap_or_default();

        out.push(Dependency::new(package_name(path), version));
    }
    out
}

/// Derives a package name from its install path.
///
/// Nested installs collapse to the outer package: both
/// `node_modules/foo/node_modules/bar` and
/// `node_modules/@scope/pkg/node_modules/bar` lose the inner name.
fn package_name(path: &str) -> &str {
    let name = path.strip_prefix(NODE_MODULES_PREFIX).unwrap_or(path);

    if name.starts_with('@') && name.contains('/') {
        // keep "@scope/pkg"
        return match name.match_indices('/').nth(1) {
            Some((end, _)) => &name[..end],
            None => name,
        };
    }

    match name.find('/') {
        Some(end) => &name[..end],
        None => name,
    }
}
