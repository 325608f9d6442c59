//! Ordered playlist consumed by autoplay
//!
//! Every edit is bounds-checked and leaves the list untouched when it fails.
//! The list is shared between the autoplay handlers of all sessions and the
//! presentation layer, so it always lives behind one mutex (see
//! [`CastSystem`](crate::CastSystem)).

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{CastError, Result};
use crate::model::PlayItem;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Playlist {
    items: Vec<PlayItem>,
}

impl Playlist {
    pub fn new(items: Vec<PlayItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[PlayItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Tolerant lookup; a stale index simply yields `None`.
    pub fn get(&self, index: usize) -> Option<&PlayItem> {
        self.items.get(index)
    }

    pub fn contains_url(&self, url: &str) -> bool {
        self.items.iter().any(|item| item.url == url)
    }

    pub fn append(&mut self, item: PlayItem) {
        self.items.push(item);
    }

    pub fn replace_at(&mut self, index: usize, item: PlayItem) -> Result<()> {
        self.check(index)?;
        self.items[index] = item;
        Ok(())
    }

    pub fn remove_at(&mut self, index: usize) -> Result<PlayItem> {
        self.check(index)?;
        Ok(self.items.remove(index))
    }

    /// Swap the item with its predecessor; the head wraps to the tail.
    pub fn move_earlier(&mut self, index: usize) -> Result<()> {
        self.check(index)?;
        if index == 0 {
            let item = self.items.remove(0);
            self.items.push(item);
        } else {
            self.items.swap(index, index - 1);
        }
        Ok(())
    }

    /// Swap the item with its successor; the tail wraps to the head.
    pub fn move_later(&mut self, index: usize) -> Result<()> {
        self.check(index)?;
        if index == self.items.len() - 1 {
            let item = self.items.remove(index);
            self.items.insert(0, item);
        } else {
            self.items.swap(index, index + 1);
        }
        Ok(())
    }

    /// Absolute URL a renderer can fetch for `item`.
    ///
    /// `http` and `https` URLs pass through; anything else is served by the
    /// local static file route at `http://{host}:{port}/{static_prefix}/{url}`.
    pub fn resolve_url(item: &PlayItem, host: &str, port: u16, static_prefix: &str) -> String {
        if is_http_url(&item.url) {
            return item.url.clone();
        }
        format!(
            "http://{}:{}/{}/{}",
            host,
            port,
            static_prefix.trim_matches('/'),
            item.url.trim_start_matches('/')
        )
    }

    fn check(&self, index: usize) -> Result<()> {
        if index >= self.items.len() {
            return Err(CastError::IndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        Ok(())
    }
}

impl From<Vec<PlayItem>> for Playlist {
    fn from(items: Vec<PlayItem>) -> Self {
        Self::new(items)
    }
}

fn is_http_url(raw: &str) -> bool {
    let lower = raw.get(..8).unwrap_or(raw).to_ascii_lowercase();
    if !(lower.starts_with("http://") || lower.starts_with("https://")) {
        return false;
    }
    Url::parse(raw)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn playlist(urls: &[&str]) -> Playlist {
        Playlist::new(urls.iter().map(|u| PlayItem::url(*u)).collect())
    }

    fn urls(playlist: &Playlist) -> Vec<&str> {
        playlist.items().iter().map(|i| i.url.as_str()).collect()
    }

    #[test]
    fn test_append_and_replace() {
        let mut list = playlist(&["a"]);
        list.append(PlayItem::url("b"));
        list.replace_at(0, PlayItem::url("z")).unwrap();
        assert_eq!(urls(&list), vec!["z", "b"]);
    }

    #[test]
    fn test_remove_shifts_following_items() {
        let mut list = playlist(&["a", "b", "c"]);
        let removed = list.remove_at(1).unwrap();
        assert_eq!(removed.url, "b");
        assert_eq!(urls(&list), vec!["a", "c"]);
    }

    #[rstest]
    #[case(0, vec!["b", "c", "a"])]
    #[case(1, vec!["b", "a", "c"])]
    #[case(2, vec!["a", "c", "b"])]
    fn test_move_earlier(#[case] index: usize, #[case] expected: Vec<&str>) {
        let mut list = playlist(&["a", "b", "c"]);
        list.move_earlier(index).unwrap();
        assert_eq!(urls(&list), expected);
    }

    #[rstest]
    #[case(0, vec!["b", "a", "c"])]
    #[case(1, vec!["a", "c", "b"])]
    #[case(2, vec!["c", "a", "b"])]
    fn test_move_later(#[case] index: usize, #[case] expected: Vec<&str>) {
        let mut list = playlist(&["a", "b", "c"]);
        list.move_later(index).unwrap();
        assert_eq!(urls(&list), expected);
    }

    #[test]
    fn test_out_of_range_leaves_list_unchanged() {
        let mut list = playlist(&["a", "b"]);
        let before = list.clone();

        assert!(matches!(
            list.remove_at(2),
            Err(CastError::IndexOutOfRange { index: 2, len: 2 })
        ));
        assert!(list.replace_at(5, PlayItem::url("x")).is_err());
        assert!(list.move_earlier(2).is_err());
        assert!(list.move_later(2).is_err());
        assert_eq!(list, before);
    }

    #[test]
    fn test_edits_on_empty_list_fail() {
        let mut list = Playlist::default();
        assert!(matches!(
            list.move_later(0),
            Err(CastError::IndexOutOfRange { index: 0, len: 0 })
        ));
    }

    #[test]
    fn test_single_item_moves_are_identity() {
        let mut list = playlist(&["only"]);
        list.move_earlier(0).unwrap();
        list.move_later(0).unwrap();
        assert_eq!(urls(&list), vec!["only"]);
    }

    #[rstest]
    #[case("http://cdn.example/a.mp4", "http://cdn.example/a.mp4")]
    #[case("https://cdn.example/a.mp4", "https://cdn.example/a.mp4")]
    #[case("slides/one.jpg", "http://10.0.0.2:8686/static/slides/one.jpg")]
    #[case("/one.jpg", "http://10.0.0.2:8686/static/one.jpg")]
    #[case("ftp://host/a.mp4", "http://10.0.0.2:8686/static/ftp://host/a.mp4")]
    #[case("httpfile.mp4", "http://10.0.0.2:8686/static/httpfile.mp4")]
    fn test_resolve_url(#[case] url: &str, #[case] expected: &str) {
        let item = PlayItem::url(url);
        assert_eq!(Playlist::resolve_url(&item, "10.0.0.2", 8686, "static"), expected);
    }

    #[test]
    fn test_contains_url() {
        let list = playlist(&["a.mp4", "dir/b.jpg"]);
        assert!(list.contains_url("dir/b.jpg"));
        assert!(!list.contains_url("b.jpg"));
    }
}
