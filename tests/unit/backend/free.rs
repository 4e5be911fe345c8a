use super::*;

fn png_bytes(w: u32, h: u32) -> Vec<u8> {
    let img = image::RgbImage::from_fn(w, h, |x, y| image::Rgb([(x * 7) as u8, (y * 3) as u8, 99]));
    let mut out = std::io::Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

#[test]
fn url_encodes_prompt_as_path_segment() {
    let url = build_request_url(
        "https://image.pollinations.ai/prompt/",
        "sunset, ocean waves",
        Canvas::square_512(),
    );
    assert_eq!(
        url,
        "https://image.pollinations.ai/prompt/sunset%2C%20ocean%20waves?width=512&height=512&nologo=true"
    );
}

#[test]
fn url_adds_missing_separator_and_escapes_slashes() {
    let url = build_request_url("http://127.0.0.1:9/prompt", "a/b?c", Canvas::new(64, 32).unwrap());
    assert_eq!(
        url,
        "http://127.0.0.1:9/prompt/a%2Fb%3Fc?width=64&height=32&nologo=true"
    );
}

#[test]
fn tiny_body_is_rejected_even_with_200() {
    let err = validate_image_body(StatusCode::OK, &[0u8; 999], 1000).unwrap_err();
    assert!(matches!(err, BackendError::TooSmall { size: 999, min: 1000 }));
}

#[test]
fn non_200_is_rejected() {
    let body = png_bytes(64, 64);
    let err = validate_image_body(StatusCode::BAD_GATEWAY, &body, 10).unwrap_err();
    assert!(matches!(err, BackendError::Status { status: 502, .. }));
}

#[test]
fn garbage_body_is_undecodable() {
    let err = validate_image_body(StatusCode::OK, &[7u8; 2048], 1000).unwrap_err();
    assert!(matches!(err, BackendError::Undecodable(_)));
}

#[test]
fn real_png_is_accepted() {
    let body = png_bytes(64, 64);
    assert!(body.len() >= 100);
    validate_image_body(StatusCode::OK, &body, 100).unwrap();
}

#[test]
fn header_check_leaves_pixel_decoding_to_the_caller() {
    let mut body = png_bytes(64, 64);
    body.truncate(100);
    validate_image_body(StatusCode::OK, &body, 50).unwrap();
    let err = crate::orchestrator::image::decode_rgb(body).unwrap_err();
    assert!(matches!(err, BackendError::Undecodable(_)));
}

#[test]
fn unreachable_endpoint_is_a_backend_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let cfg = FreeApiConfig {
        url: format!("http://127.0.0.1:{port}/prompt/"),
        timeout_secs: 2,
        min_body_bytes: 1000,
    };
    let backend = FreeApiBackend::from_config(&cfg, Canvas::square_512()).unwrap();
    assert_eq!(backend.id(), "free");
    let err = backend.attempt("anything").unwrap_err();
    assert!(matches!(err, BackendError::Transport(_) | BackendError::Timeout));
}
