//! Local media directory listing

use std::path::Path;

use tracing::warn;
use walkdir::WalkDir;

use crate::model::PlayItem;
use crate::playlist::Playlist;

/// Files under `root` that the playlist does not reference yet, as items
/// with root-relative, `/`-separated urls. Hidden files are skipped.
pub(crate) fn unlisted_files(root: &Path, playlist: &Playlist, limit: usize) -> Vec<PlayItem> {
    if !root.is_dir() {
        return Vec::new();
    }

    WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Error accessing entry: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| !entry.file_name().to_string_lossy().starts_with('.'))
        .filter_map(|entry| relative_url(root, entry.path()))
        .filter(|url| !playlist.contains_url(url))
        .take(limit)
        .map(PlayItem::url)
        .collect()
}

fn relative_url(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(parts.join("/"))
}
