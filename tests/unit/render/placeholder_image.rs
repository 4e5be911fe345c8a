use super::*;

#[test]
fn gradient_matches_linear_formula() {
    assert_eq!(gradient_row(0, 512), [70, 130, 180]);
    // 70 + 110 * 256/512 = 125, 130 - 30 * 0.5 = 115, 180 + 20 * 0.5 = 190
    assert_eq!(gradient_row(256, 512), [125, 115, 190]);
    // Truncation toward zero on the decreasing green channel: 130 - 30/512 = 129.94 -> 129.
    assert_eq!(gradient_row(1, 512)[1], 129);
    let last = gradient_row(511, 512);
    assert!(last[0] < 180 && last[0] >= 179);
}

#[test]
fn short_labels_are_kept_whole() {
    assert_eq!(label_for("a cat"), "Dream: a cat");
    let exactly = "x".repeat(MAX_LABEL_CHARS - "Dream: ".len());
    assert_eq!(label_for(&exactly).chars().count(), MAX_LABEL_CHARS);
}

#[test]
fn long_labels_are_truncated_with_ellipsis() {
    let prompt = "A peaceful sunset over the ocean with gentle waves rolling onto a quiet beach";
    let label = label_for(prompt);
    assert!(label.ends_with("..."));
    assert_eq!(label.chars().count(), "Dream: ".len() + TRUNCATED_PROMPT_CHARS + 3);
    assert!(label.starts_with("Dream: A peaceful sunset"));
}

#[test]
fn truncation_respects_char_boundaries() {
    let prompt = "🌅".repeat(80);
    let label = label_for(&prompt);
    assert_eq!(label.chars().filter(|c| *c == '🌅').count(), TRUNCATED_PROMPT_CHARS);
}

#[test]
fn star_scatter_is_fixed_and_inside_margin() {
    let stars = star_positions(Canvas::square_512());
    assert_eq!(stars.len(), STAR_COUNT as usize);
    assert_eq!(stars[0], (60, 60));
    assert_eq!(stars[1], (100, 97));
    for (x, y) in &stars {
        assert!((60..452).contains(x));
        assert!((60..452).contains(y));
    }
    assert_eq!(stars, star_positions(Canvas::square_512()));
}

#[test]
fn tiny_canvas_has_no_stars() {
    assert!(star_positions(Canvas::new(100, 512).unwrap()).is_empty());
}

#[test]
fn render_is_deterministic() {
    let renderer = PlaceholderImageRenderer::new(FontBook::system());
    let a = renderer.render("neon koi pond", Canvas::square_512()).unwrap();
    let b = renderer.render("neon koi pond", Canvas::square_512()).unwrap();
    assert_eq!(a.dimensions(), (512, 512));
    assert_eq!(a.as_raw(), b.as_raw());
}

#[test]
fn text_overlay_leaves_background_and_frame_alone() {
    let renderer = PlaceholderImageRenderer::new(FontBook::bundled());
    let img = renderer.render("anything", Canvas::square_512()).unwrap();
    assert_eq!(img.get_pixel(5, 0).0, [70, 130, 180]);
    assert_eq!(img.get_pixel(256, 41).0, [255, 255, 255]);
    assert_eq!(img.get_pixel(60, 60).0, [255, 255, 255]);
}

#[test]
fn prompt_changes_pixels_with_only_the_bundled_face() {
    let renderer = PlaceholderImageRenderer::new(FontBook::bundled());
    let a = renderer
        .render(
            "A peaceful sunset over the ocean with gentle waves",
            Canvas::square_512(),
        )
        .unwrap();
    let b = renderer
        .render("a completely different prompt", Canvas::square_512())
        .unwrap();
    assert_ne!(a.as_raw(), b.as_raw());
}

#[test]
fn label_lands_near_the_center() {
    let renderer = PlaceholderImageRenderer::new(FontBook::bundled());
    let a = renderer.render("lighthouse", Canvas::square_512()).unwrap();
    let b = renderer.render("harbor at dawn", Canvas::square_512()).unwrap();

    let changed_rows: Vec<u32> = (0..512)
        .filter(|&y| (0..512).any(|x| a.get_pixel(x, y) != b.get_pixel(x, y)))
        .collect();
    assert!(!changed_rows.is_empty());
    let first = changed_rows[0];
    let last = changed_rows[changed_rows.len() - 1];
    assert!(first > 200 && last < 312, "text rows {first}..{last}");
}
