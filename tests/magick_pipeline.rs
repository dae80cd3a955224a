//! End-to-end conversion through the system ImageMagick. Skipped when `convert` is not on PATH.

use std::io::Cursor;

use assetkit::{AssetStore, AssetStoreOpts, ConvertOpts, MagickTool, MagickToolOpts, VariantSpec};

async fn magick_available() -> bool {
    MagickTool::new(MagickToolOpts::default()).is_available().await
}

fn example_jpg() -> Vec<u8> {
    let img = image::RgbImage::from_fn(320, 200, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Jpeg)
        .unwrap();
    buf
}

#[tokio::test]
async fn convert_produces_variants_with_one_invocation() {
    if !magick_available().await {
        eprintln!("skipping: ImageMagick `convert` not available");
        return;
    }
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let tmp = tempfile::tempdir().unwrap();
    let store = AssetStore::new(AssetStoreOpts::new(tmp.path())).unwrap();
    store
        .save_temp_binary("example.jpg", &example_jpg())
        .await
        .unwrap();

    let specs = vec![
        VariantSpec::new("medium", "100x>").with_ext("png"),
        VariantSpec::new("thumbnail", "30x>").with_ext("jpg"),
    ];
    let manifest = store
        .convert("example.jpg", &specs, &ConvertOpts::namespace("74"))
        .await
        .unwrap();

    let ns = tmp.path().join("74");
    assert!(ns.join("original/example.jpg").is_file());
    assert!(ns.join("medium/example.png").is_file());
    assert!(ns.join("thumbnail/example.jpg").is_file());

    let widths: Vec<_> = manifest.iter().map(|e| (e.kind.as_str(), e.width)).collect();
    assert_eq!(
        widths,
        vec![("thumbnail", 30), ("medium", 100), ("original", 320)]
    );
}

#[tokio::test]
async fn missing_tool_is_fatal_after_commit() {
    let tmp = tempfile::tempdir().unwrap();
    let mut opts = AssetStoreOpts::new(tmp.path());
    opts.tool = MagickToolOpts::new("/nonexistent/imagemagick/convert");
    let store = AssetStore::new(opts).unwrap();
    store
        .save_temp_binary("example.jpg", &example_jpg())
        .await
        .unwrap();

    let err = store
        .convert(
            "example.jpg",
            &[VariantSpec::new("thumb", "30x")],
            &ConvertOpts::default(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, assetkit::AssetError::Process(_)));
    // The commit already happened.
    assert!(tmp.path().join("original/example.jpg").is_file());
}
