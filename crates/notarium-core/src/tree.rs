//! Folder-path derivation over the in-memory collections.
//!
//! Read-only projection; walks `parent_id` links without touching storage.

use uuid::Uuid;

use crate::models::Folder;

/// Compute the POSIX-style absolute path of a folder (`/A/B/C`).
///
/// Returns `/` for the root (`None`). The walk is bounded by the collection
/// size, so a `parent_id` cycle terminates with a partial path instead of
/// looping. A dangling `parent_id` stops the walk at the last known folder.
pub fn path_of(folders: &[Folder], folder_id: Option<Uuid>) -> String {
    let Some(start) = folder_id else {
        return "/".to_string();
    };

    let mut segments: Vec<&str> = Vec::new();
    let mut current = Some(start);

    for _ in 0..folders.len() {
        let Some(id) = current else { break };
        let Some(folder) = folders.iter().find(|f| f.id == id) else {
            break;
        };
        segments.push(&folder.name);
        current = folder.parent_id;
    }

    segments.reverse();
    format!("/{}", segments.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Folder;

    fn chain() -> Vec<Folder> {
        let a = Folder::new("A", None);
        let b = Folder::new("B", Some(a.id));
        let c = Folder::new("C", Some(b.id));
        vec![a, b, c]
    }

    #[test]
    fn test_path_of_root_is_slash() {
        assert_eq!(path_of(&[], None), "/");
    }

    #[test]
    fn test_path_of_nested_chain() {
        let folders = chain();
        let c = folders[2].id;
        assert_eq!(path_of(&folders, Some(c)), "/A/B/C");
    }

    #[test]
    fn test_path_of_intermediate_folder() {
        let folders = chain();
        let b = folders[1].id;
        assert_eq!(path_of(&folders, Some(b)), "/A/B");
    }

    #[test]
    fn test_path_of_unknown_id_is_root() {
        let folders = chain();
        assert_eq!(path_of(&folders, Some(uuid::Uuid::nil())), "/");
    }

    #[test]
    fn test_path_of_dangling_parent_stops_walk() {
        let mut folders = chain();
        // Orphan B by pointing it at a folder that no longer exists.
        folders[1].parent_id = Some(uuid::Uuid::nil());
        let c = folders[2].id;
        assert_eq!(path_of(&folders, Some(c)), "/B/C");
    }

    #[test]
    fn test_path_of_cycle_terminates() {
        let mut folders = chain();
        // A → C closes a cycle A → B → C → A.
        let c = folders[2].id;
        folders[0].parent_id = Some(c);
        let path = path_of(&folders, Some(c));
        assert!(path.starts_with('/'));
        // Bounded walk: no more segments than folders.
        assert!(path.matches('/').count() <= folders.len());
    }
}
