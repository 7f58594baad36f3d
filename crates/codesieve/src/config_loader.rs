//! Configuration loading with include resolution.
//!
//! This module handles loading configuration files with support for:
//! - `includes` directive to compose configs from multiple files
//! - Circular include detection (a file shared by sibling includes is fine)
//! - `${VAR}` and `${VAR:-default}` environment expansion
//! - Merge semantics (later files override earlier ones field by field;
//!   `extend_*` lists accumulate)

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result, bail};
use regex::Regex;
use tracing::debug;

use codesieve_types::{ConfigFile, Defaults};

/// Maximum depth for include resolution to prevent excessive nesting.
const MAX_INCLUDE_DEPTH: usize = 10;

/// Load a configuration file with include resolution.
///
/// Included files are applied first, in order; the including file is
/// applied last so its settings win.
pub fn load_config_with_includes(path: &Path) -> Result<ConfigFile> {
    let mut visited = HashSet::new();
    load_config_recursive(path, &mut visited, 0)
}

fn load_config_recursive(
    path: &Path,
    visited: &mut HashSet<PathBuf>,
    depth: usize,
) -> Result<ConfigFile> {
    if depth > MAX_INCLUDE_DEPTH {
        bail!(
            "Include depth exceeded maximum of {} levels at '{}'",
            MAX_INCLUDE_DEPTH,
            path.display()
        );
    }

    // Canonicalize path for consistent comparison
    let canonical = path
        .canonicalize()
        .with_context(|| format!("canonicalize path '{}'", path.display()))?;

    // `visited` holds the current include chain only.
    if !visited.insert(canonical.clone()) {
        bail!("Circular include detected: '{}'", path.display());
    }
    let result = load_and_merge(path, visited, depth);
    visited.remove(&canonical);
    result
}

fn load_and_merge(
    path: &Path,
    visited: &mut HashSet<PathBuf>,
    depth: usize,
) -> Result<ConfigFile> {
    debug!("Loading config from '{}' (depth {})", path.display(), depth);

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read config '{}'", path.display()))?;

    let expanded = expand_env_vars(&text, |name| std::env::var(name).ok())?;

    let config: ConfigFile =
        toml::from_str(&expanded).with_context(|| format!("parse config '{}'", path.display()))?;

    if config.includes.is_empty() {
        return Ok(config);
    }

    let base_dir = path.parent().unwrap_or(Path::new("."));
    let mut merged = Defaults::default();

    for include_path in &config.includes {
        let full_path = base_dir.join(include_path);
        debug!(
            "Resolving include '{}' relative to '{}'",
            include_path,
            base_dir.display()
        );

        if !full_path.exists() {
            bail!(
                "Included config file not found: '{}' (resolved from '{}')",
                full_path.display(),
                include_path
            );
        }

        let included = load_config_recursive(&full_path, visited, depth + 1)?;
        merged = merge_defaults(merged, included.defaults);
    }

    Ok(ConfigFile {
        includes: vec![],
        defaults: merge_defaults(merged, config.defaults),
    })
}

fn env_var_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .expect("env var regex should compile")
    })
}

/// Expand `${VAR}` and `${VAR:-default}` in config text.
///
/// An unset variable without a default is an error.
pub fn expand_env_vars<F>(content: &str, lookup: F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    let mut result = String::with_capacity(content.len());
    let mut last_end = 0;

    for cap in env_var_regex().captures_iter(content) {
        let Some(full_match) = cap.get(0) else {
            continue;
        };
        let var_name = &cap[1];
        let default_value = cap.get(2).map(|m| m.as_str());

        result.push_str(&content[last_end..full_match.start()]);

        match (lookup(var_name), default_value) {
            (Some(value), _) => {
                debug!("Expanded env var ${{{}}}", var_name);
                result.push_str(&value);
            }
            (None, Some(default)) => {
                debug!(
                    "Env var ${{{0}}} not set, using default: {1}",
                    var_name, default
                );
                result.push_str(default);
            }
            (None, None) => bail!(
                "Environment variable '{}' is not set and no default provided",
                var_name
            ),
        }

        last_end = full_match.end();
    }

    result.push_str(&content[last_end..]);
    Ok(result)
}

/// Layer `other` on top of `base`.
pub fn merge_defaults(base: Defaults, other: Defaults) -> Defaults {
    let mut extend_select = base.extend_select;
    extend_select.extend(other.extend_select);
    let mut extend_ignore = base.extend_ignore;
    extend_ignore.extend(other.extend_ignore);

    Defaults {
        select: other.select.or(base.select),
        ignore: other.ignore.or(base.ignore),
        extend_select,
        extend_ignore,
        format: other.format.or(base.format),
        color: other.color.or(base.color),
        show_source: other.show_source.or(base.show_source),
        disable_noqa: other.disable_noqa.or(base.disable_noqa),
    }
}
