//! Property tests for playlist reordering.

use dlnacast::{CastError, PlayItem, Playlist};
use proptest::prelude::*;

fn playlist(len: usize) -> Playlist {
    Playlist::new((0..len).map(|i| PlayItem::url(format!("{}.mp4", i))).collect())
}

fn urls(playlist: &Playlist) -> Vec<String> {
    playlist.items().iter().map(|i| i.url.clone()).collect()
}

proptest! {
    #[test]
    fn test_moves_are_inverse(len in 1usize..20, seed in any::<usize>()) {
        let index = seed % len;
        let mut moved = playlist(len);
        moved.move_later(index).unwrap();
        let back = if index == len - 1 { 0 } else { index + 1 };
        moved.move_earlier(back).unwrap();
        prop_assert_eq!(urls(&moved), urls(&playlist(len)));
    }

    #[test]
    fn test_moves_keep_every_item(len in 1usize..20, ops in prop::collection::vec((any::<bool>(), any::<usize>()), 0..30)) {
        let mut list = playlist(len);
        for (earlier, seed) in ops {
            let index = seed % len;
            if earlier {
                list.move_earlier(index).unwrap();
            } else {
                list.move_later(index).unwrap();
            }
        }
        let mut sorted = urls(&list);
        sorted.sort();
        let mut expected = urls(&playlist(len));
        expected.sort();
        prop_assert_eq!(sorted, expected);
    }

    #[test]
    fn test_head_wraps_to_tail(len in 2usize..20) {
        let mut list = playlist(len);
        list.move_earlier(0).unwrap();

        let mut expected = urls(&playlist(len));
        expected.rotate_left(1);
        prop_assert_eq!(urls(&list), expected);
    }

    #[test]
    fn test_out_of_range_leaves_playlist_unchanged(len in 0usize..10, extra in 0usize..5) {
        let mut list = playlist(len);
        let index = len + extra;

        let removed = list.remove_at(index);
        let is_out_of_range = matches!(removed, Err(CastError::IndexOutOfRange { .. }));
        prop_assert!(is_out_of_range);
        prop_assert!(list.move_earlier(index).is_err());
        prop_assert!(list.move_later(index).is_err());
        prop_assert!(list.replace_at(index, PlayItem::url("x.mp4")).is_err());
        prop_assert_eq!(urls(&list), urls(&playlist(len)));
    }
}
