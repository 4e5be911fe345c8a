use super::*;

fn canvas(width: u32, height: u32) -> Canvas {
    Canvas::new(width, height).unwrap()
}

#[test]
fn fill_rows_paints_opaque_rows() {
    let mut surface = Surface::new(canvas(4, 3)).unwrap();
    surface.fill_rows(|y| [y as u8 * 10, 20, 30]);
    assert_eq!(surface.pixel(0, 0), Some([0, 20, 30, 255]));
    assert_eq!(surface.pixel(3, 2), Some([20, 20, 30, 255]));
    assert_eq!(surface.pixel(4, 0), None);
}

#[test]
fn rgb_readback_drops_alpha() {
    let mut surface = Surface::new(canvas(2, 2)).unwrap();
    surface.fill_rows(|_| [1, 2, 3]);
    let img = surface.into_rgb_image().unwrap();
    assert_eq!(img.dimensions(), (2, 2));
    assert_eq!(img.get_pixel(1, 1).0, [1, 2, 3]);
}

#[test]
fn frame_readback_is_premultiplied_rgba() {
    let mut surface = Surface::new(canvas(2, 2)).unwrap();
    surface.fill_rows(|_| [9, 8, 7]);
    let frame = surface.into_frame();
    assert!(frame.premultiplied);
    assert_eq!(frame.data.len(), 2 * 2 * 4);
    assert_eq!(&frame.data[..4], &[9, 8, 7, 255]);
}

#[test]
fn filled_circle_covers_its_center() {
    let mut surface = Surface::new(canvas(16, 16)).unwrap();
    surface.fill_rows(|_| [0, 0, 0]);
    surface.fill_circle(8.0, 8.0, 3.0, [255, 255, 255, 255]);
    assert_eq!(surface.pixel(8, 8), Some([255, 255, 255, 255]));
    assert_eq!(surface.pixel(0, 0), Some([0, 0, 0, 255]));
}

#[test]
fn inside_stroke_stays_within_bounds() {
    let mut surface = Surface::new(canvas(20, 20)).unwrap();
    surface.fill_rows(|_| [0, 0, 0]);
    surface.stroke_rect_inside([4.0, 4.0, 16.0, 16.0], 2.0, [255, 255, 255, 255]);
    assert_eq!(surface.pixel(4, 10), Some([255, 255, 255, 255]));
    assert_eq!(surface.pixel(3, 10), Some([0, 0, 0, 255]));
    assert_eq!(surface.pixel(10, 10), Some([0, 0, 0, 255]));
}

#[test]
fn degenerate_rect_is_ignored() {
    let mut surface = Surface::new(canvas(8, 8)).unwrap();
    surface.fill_rows(|_| [5, 5, 5]);
    surface.stroke_rect_inside([6.0, 6.0, 2.0, 2.0], 3.0, [255, 0, 0, 255]);
    assert_eq!(surface.pixel(4, 4), Some([5, 5, 5, 255]));
}
