mod common;

use common::test_utils::white_pixels;
use genesis_v::{
    config::DEFAULT_LABEL,
    platform::{BACK_BUTTON, LabelError, PlatformState, Selection},
    resources::{AssetDir, texture::load_label_bitmap},
};

#[test]
fn back_button_hit_raises_the_finish_request() {
    let platform = PlatformState::new(Selection::example(3));
    assert!(platform.pointer_down(25.0, 25.0));
    assert!(platform.take_finish_request());
    assert!(!platform.finish_requested());
}

#[test]
fn pointer_outside_the_button_is_ignored() {
    let platform = PlatformState::new(Selection::scene(0));
    assert!(!platform.pointer_down(500.0, 500.0));
    assert!(!platform.pointer_down(BACK_BUTTON.right() + 1.0, 25.0));
    assert!(!platform.finish_requested());
}

#[test]
fn the_base_scene_has_no_back_button() {
    let platform = PlatformState::new(Selection::default());
    assert!(!platform.pointer_down(25.0, 25.0));
    assert!(!platform.finish_requested());
}

#[test]
fn pending_label_is_taken_once() {
    let platform = PlatformState::new(Selection::example(1));
    platform.set_pending(2, 1, white_pixels(2, 1)).unwrap();
    let label = platform.try_take_pending().unwrap();
    assert_eq!((label.width, label.height, label.pixels.len()), (2, 1, 8));
    assert!(platform.try_take_pending().is_none());
}

#[test]
fn a_new_label_replaces_the_pending_one() {
    let platform = PlatformState::new(Selection::example(1));
    platform.set_pending(1, 1, white_pixels(1, 1)).unwrap();
    platform.set_pending(4, 2, white_pixels(4, 2)).unwrap();
    assert_eq!(platform.try_take_pending().map(|l| l.width), Some(4));

    platform.set_pending(1, 1, white_pixels(1, 1)).unwrap();
    platform.clear_pending();
    assert!(platform.try_take_pending().is_none());
}

#[test]
fn malformed_labels_are_rejected() {
    let platform = PlatformState::new(Selection::example(1));
    assert_eq!(
        platform.set_pending(0, 4, Vec::new()),
        Err(LabelError::EmptySize { width: 0, height: 4 })
    );
    assert!(matches!(
        platform.set_pending(2, 2, vec![0; 15]),
        Err(LabelError::ShortBuffer { expected: 16, actual: 15, .. })
    ));
    assert!(platform.try_take_pending().is_none());
}

#[test]
fn selecting_one_index_resets_the_other() {
    let platform = PlatformState::new(Selection::example(9));
    platform.set_scene_index(0);
    assert_eq!(platform.selection(), Selection::scene(0));
    assert_eq!(platform.selection().example_index(), 0);

    platform.set_example_index(5);
    assert_eq!(platform.selection().scene_index(), -1);
    assert!(platform.selection().has_back_button());
}

#[test]
fn shipped_label_decodes_into_the_pending_slot() {
    let assets = AssetDir::new(concat!(env!("CARGO_MANIFEST_DIR"), "/assets"));
    let label = load_label_bitmap(&assets, DEFAULT_LABEL).unwrap();
    assert_eq!((label.width, label.height), (256, 64));

    let alpha: Vec<u8> = label.pixels.chunks_exact(4).map(|px| px[3]).collect();
    assert_eq!(alpha[0], 0, "background is transparent");
    assert!(alpha.iter().any(|&a| a == 255), "text is drawn");

    let platform = PlatformState::new(Selection::example(1));
    platform.set_pending(label.width, label.height, label.pixels).unwrap();
    assert_eq!(platform.try_take_pending().map(|l| l.width), Some(256));
}
