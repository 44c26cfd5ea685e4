//! # Namespace Resolution
//!
//! Maps the `host` and `path` git sends to the key credentials are stored
//! under. Every repository below the same first path segment (the
//! organization or group) shares one namespace, however deep it is nested.

/// Resolve the storage namespace for `host` and `path`
///
/// ```
/// use credorg_core::namespace::resolve;
///
/// assert_eq!(resolve("gitlab.com", "org1/project/repo.git"), "gitlab.com/org1");
/// assert_eq!(resolve("gitlab.com", ""), "gitlab.com");
/// ```
pub fn resolve(host: &str, path: &str) -> String {
  if path.is_empty() {
    return host.to_string();
  }

  let path = path.strip_prefix('/').unwrap_or(path);
  let segment = path.split_once('/').map_or(path, |(first, _)| first);
  let segment = segment.strip_suffix(".git").unwrap_or(segment);

  if segment.is_empty() {
    host.to_string()
  } else {
    format!("{host}/{segment}")
  }
}
