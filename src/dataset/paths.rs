use log::debug;

use crate::container::{Container, NodeKind};

use super::DatasetError;

/// Cumulative prefixes of `path`: `/a/b/c` yields `/a`, `/a/b`, `/a/b/c`
fn prefixes(path: &str) -> impl Iterator<Item = String> + '_ {
    path.split('/')
        .filter(|s| !s.is_empty())
        .scan(String::new(), |current, segment| {
            current.push('/');
            current.push_str(segment);
            Some(current.clone())
        })
}

/// Whether every prefix of `path` exists. Never modifies the container.
pub(crate) fn exists(container: &Container, path: &str) -> bool {
    prefixes(path).all(|prefix| container.link_exists(&prefix))
}

/// Create every missing prefix of `path` as a group.
///
/// Idempotent. A prefix that exists as an array is a [`DatasetError::PathConflict`].
pub(crate) fn ensure_group(container: &mut Container, path: &str) -> Result<(), DatasetError> {
    for prefix in prefixes(path) {
        match container.node_kind(&prefix) {
            Some(NodeKind::Group) => {}
            Some(NodeKind::Array) => {
                return Err(DatasetError::PathConflict(format!(
                    "{} exists as an array",
                    prefix
                )))
            }
            None => {
                container.create_group(&prefix)?;
                debug!("Created missing group {}", prefix);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixes_skip_empty_segments() {
        let all: Vec<String> = prefixes("//dataset//data/").collect();
        assert_eq!(all, vec!["/dataset", "/dataset/data"]);
        assert_eq!(prefixes("/").count(), 0);
    }
}
