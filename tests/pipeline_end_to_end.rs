//! Picture pipeline tests across module boundaries: image in, chunks out,
//! and back again.

mod common;

use common::test_bitmaps::{blocky_grid, random_grid};
use common::test_images::{
    BLACK, PHOTO_SIZES, WHITE, checkerboard, horizontal_gradient, solid,
};
use image::DynamicImage;
use messagebox::processing::{
    PicturePipeline, binarize::binarize, chunk, decode_picture, encode_picture, rle,
};
use messagebox::{FitPreset, GRID_CELLS, GRID_SIDE, Symbol};

#[test]
fn test_all_black_photo_produces_canonical_chunks() {
    let encoded = encode_picture(&solid(640, 480, BLACK)).unwrap();

    assert_eq!(encoded.payload, "0:16384,");
    assert_eq!(encoded.chunks(), ("0:16$".to_string(), "384,".to_string()));
}

#[test]
fn test_all_white_photo_produces_canonical_chunks() {
    let encoded = encode_picture(&solid(128, 128, WHITE)).unwrap();

    assert_eq!(encoded.payload, "1:16384,");
    assert_eq!(encoded.chunks(), ("1:16$".to_string(), "384,".to_string()));
}

#[test]
fn test_every_photo_size_yields_a_full_grid() {
    for &(w, h) in PHOTO_SIZES {
        let encoded = encode_picture(&horizontal_gradient(w, h)).unwrap();
        assert_eq!(encoded.bitmap.len(), GRID_CELLS, "{}x{}", w, h);

        let (first, second) = encoded.chunks();
        assert_eq!(decode_picture(&first, &second).unwrap(), encoded.bitmap);
    }
}

#[test]
fn test_gradient_is_dark_left_and_bright_right() {
    let encoded = encode_picture(&horizontal_gradient(640, 480)).unwrap();

    for y in [0, GRID_SIDE / 2, GRID_SIDE - 1] {
        assert_eq!(encoded.bitmap.get(0, y), Some(Symbol::Zero));
        assert_eq!(encoded.bitmap.get(GRID_SIDE - 1, y), Some(Symbol::One));
    }
}

#[test]
fn test_encoding_is_deterministic() {
    let image = DynamicImage::ImageRgba8(checkerboard(300, 200, 7));
    let a = encode_picture(&image).unwrap();
    let b = encode_picture(&image).unwrap();
    assert_eq!(a, b);

    // A reused pipeline gives the same answer as a fresh one.
    let mut pipeline = PicturePipeline::new(FitPreset::Stretch.to_aspect()).unwrap();
    assert_eq!(pipeline.encode(&image).unwrap(), a);
    assert_eq!(pipeline.encode(&image).unwrap(), a);
}

#[test]
fn test_checkerboard_binarizes_cell_for_cell() {
    let bitmap = binarize(&checkerboard(GRID_SIDE, GRID_SIDE, 1)).unwrap();

    assert_eq!(bitmap.count_ones(), GRID_CELLS / 2);
    assert_eq!(bitmap.get(0, 0), Some(Symbol::Zero));
    assert_eq!(bitmap.get(1, 0), Some(Symbol::One));
    assert_eq!(bitmap.get(0, 1), Some(Symbol::One));

    // Alternating cells mean mostly single-symbol runs; rows meet on equal
    // symbols, so each row boundary contributes one run of two.
    let runs = rle::runs(&bitmap);
    assert_eq!(runs.iter().map(|t| t.count).sum::<usize>(), GRID_CELLS);
    assert_eq!(runs.iter().filter(|t| t.count == 2).count(), GRID_SIDE as usize - 1);
    assert!(runs.iter().all(|t| t.count <= 2));
}

#[test]
fn test_random_bitmaps_survive_encode_split_reassemble_decode() {
    for seed in 0..8 {
        for bitmap in [random_grid(seed, 0.5), random_grid(seed, 0.05), blocky_grid(seed)] {
            let payload = rle::encode(&bitmap);
            let (first, second) = chunk::split(&payload);

            assert!(first.ends_with('$'));
            assert!(!second.contains('$'));
            assert_eq!(first.len() - 1, payload.len() / 2);
            assert_eq!(decode_picture(&first, &second).unwrap(), bitmap);
        }
    }
}

#[test]
fn test_adjacent_tokens_never_repeat_a_symbol() {
    for seed in 0..4 {
        let runs = rle::runs(&blocky_grid(seed));
        assert!(runs.windows(2).all(|w| w[0].symbol != w[1].symbol));
        assert!(runs.iter().all(|t| t.count >= 1));
    }
}

#[test]
fn test_letterbox_keeps_aspect_and_fills_bands() {
    let mut pipeline = PicturePipeline::new(FitPreset::LetterboxBlack.to_aspect()).unwrap();
    let encoded = pipeline.encode(&solid(256, 128, WHITE)).unwrap();

    // 2:1 content lands in rows 32..96; the bands above and below are black.
    assert_eq!(encoded.bitmap.get(64, 0), Some(Symbol::Zero));
    assert_eq!(encoded.bitmap.get(64, 16), Some(Symbol::Zero));
    assert_eq!(encoded.bitmap.get(64, 64), Some(Symbol::One));
    assert_eq!(encoded.bitmap.get(64, GRID_SIDE - 1), Some(Symbol::Zero));
    assert_eq!(encoded.bitmap.count_ones(), GRID_CELLS / 2);

    // Stretch fills the whole grid with the same photo.
    assert_eq!(encode_picture(&solid(256, 128, WHITE)).unwrap().payload, "1:16384,");
}

#[test]
fn test_zero_sized_image_is_rejected() {
    let err = encode_picture(&solid(0, 10, BLACK)).unwrap_err();
    assert_eq!(err.category(), "invalid_image");
}

#[test]
fn test_load_image_from_png_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("board.png");
    checkerboard(256, 256, 64).save(&path).unwrap();

    let image = messagebox::load_image(&path).unwrap();
    let encoded = encode_picture(&image).unwrap();

    // 64 px cells become 32 px cells; sample the cell centres.
    assert_eq!(encoded.bitmap.get(16, 16), Some(Symbol::Zero));
    assert_eq!(encoded.bitmap.get(48, 16), Some(Symbol::One));
    assert_eq!(encoded.bitmap.get(16, 48), Some(Symbol::One));
    assert_eq!(encoded.bitmap.get(112, 112), Some(Symbol::Zero));
}

#[test]
fn test_load_image_rejects_missing_and_corrupt_files() {
    let dir = tempfile::tempdir().unwrap();

    let missing = messagebox::load_image(dir.path().join("nope.png")).unwrap_err();
    assert_eq!(missing.category(), "invalid_image");

    let corrupt = dir.path().join("corrupt.png");
    std::fs::write(&corrupt, b"definitely not a png").unwrap();
    let err = messagebox::load_image(&corrupt).unwrap_err();
    assert_eq!(err.category(), "invalid_image");
}
