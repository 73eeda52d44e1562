use std::{collections::HashMap, io::Write};

use genesis_v::{
    TextureId,
    level::{LevelError, LevelRenderer, TILE_SIZE, default_level, parse_level},
};

fn resolver(ids: &[i32]) -> impl FnMut(i32) -> Option<TextureId> + '_ {
    move |tile_id| {
        ids.contains(&tile_id)
            .then(|| TextureId::new(100 + tile_id as u32))
            .flatten()
    }
}

#[test]
fn non_zero_cells_become_positioned_tiles() {
    let mut level = LevelRenderer::new();
    level.load_level(&[vec![1, 0], vec![0, 2]], resolver(&[1, 2]));
    let positions: Vec<_> = level.tiles().iter().map(|t| t.position).collect();
    assert_eq!(positions, vec![[0.0, 0.0, 0.0], [TILE_SIZE, -TILE_SIZE, 0.0]]);
    assert_eq!(level.tiles()[1].texture, TextureId::new(102).unwrap());
}

#[test]
fn unresolved_tiles_are_skipped() {
    let mut level = LevelRenderer::new();
    level.load_level(&default_level(), |_| None);
    assert!(level.tiles().is_empty());
}

#[test]
fn rows_may_differ_in_length() {
    let mut level = LevelRenderer::new();
    level.load_level(&[vec![1], vec![1, 1, 1]], resolver(&[1]));
    assert_eq!(level.tiles().len(), 4);
    assert_eq!(level.tiles()[3].position, [2.0 * TILE_SIZE, -TILE_SIZE, 0.0]);
}

#[test]
fn missing_file_keeps_the_current_tiles() {
    let mut level = LevelRenderer::new();
    level.load_level(&default_level(), resolver(&[1, 2, 3, 5, 7]));
    let before = level.tiles().to_vec();
    assert_eq!(before.len(), 8);

    let err = level
        .load_level_from_file("does/not/exist.txt", resolver(&[1]))
        .unwrap_err();
    assert!(matches!(err, LevelError::Io { .. }));
    assert_eq!(level.tiles(), &before[..]);
}

#[test]
fn level_file_replaces_the_tiles() {
    let path = std::env::temp_dir().join(format!("genesis-level-{}.txt", std::process::id()));
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "1 2\n\n0 3").unwrap();
    drop(file);

    let mut seen = HashMap::new();
    let mut level = LevelRenderer::new();
    level
        .load_level_from_file(&path, |id| {
            *seen.entry(id).or_insert(0) += 1;
            TextureId::new(id as u32)
        })
        .unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(level.tiles().len(), 3);
    assert!(!seen.contains_key(&0));
}

#[test]
fn parsing_stops_at_the_first_bad_token() {
    assert_eq!(
        parse_level("1 2 x 3\n  \n4\tfive\nseven\n"),
        vec![vec![1, 2], vec![4]]
    );
}

#[test]
fn tokens_keep_their_numeric_prefix() {
    assert_eq!(
        parse_level("12abc 7\n3,4\n1.5 2\n"),
        vec![vec![12], vec![3], vec![1]]
    );
    // a signed value may follow the previous one without whitespace
    assert_eq!(parse_level("12-3 +4\n"), vec![vec![12, -3, 4]]);
    assert_eq!(parse_level("1 99999999999 2\n"), vec![vec![1]]);
}

#[test]
fn junk_prefixed_rows_do_not_shift_later_rows() {
    let mut level = LevelRenderer::new();
    let matrix = parse_level("5x\n0 6\n");
    level.load_level(&matrix, resolver(&[5, 6]));
    let positions: Vec<_> = level.tiles().iter().map(|t| t.position).collect();
    assert_eq!(positions, vec![[0.0, 0.0, 0.0], [TILE_SIZE, -TILE_SIZE, 0.0]]);
}
