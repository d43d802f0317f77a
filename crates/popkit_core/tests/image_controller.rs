use image::{ImageFormat, Rgba, RgbaImage};
use popkit_core::codec::data_url;
use popkit_core::platform::PlatformResult;
use popkit_core::store::image_cache::{IMAGE_DATA_KEY, IMAGE_TIME_KEY};
use popkit_core::{
    open_store, open_store_in_memory, Clipboard, DownloadSink, ImageCache, ImageIntent,
    ImageUiController, ImageUiError, IngestChannel, KeyValueStore, PlatformError,
    SqliteKeyValueStore, DOWNLOAD_FILE_NAME, FRESHNESS_WINDOW_MS,
};
use std::cell::RefCell;
use std::io::Cursor;
use std::rc::Rc;

const T0: i64 = 1_700_000_000_000;

#[test]
fn init_with_empty_cache_enables_intake() {
    let mut controller = memory_controller().0;
    controller.init(T0).unwrap();

    assert!(controller.intake_enabled());
    assert_eq!(controller.preview(), None);
    assert_eq!(controller.resized(), None);
}

#[test]
fn ingest_previews_persists_and_disables_intake() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cache.db");

    let (mut controller, _clipboard, _downloads) = file_controller(&path);
    controller.init(T0).unwrap();
    controller
        .handle(ingest_intent(IngestChannel::FilePicker, 4, 2), T0)
        .unwrap();

    assert!(!controller.intake_enabled());
    let preview = controller.preview().expect("preview should be set");
    assert!(preview.starts_with("data:image/png;base64,"));

    // Persisted with the capture timestamp: a second cache over the same
    // file restores it within the window.
    let cache = ImageCache::new(open_store(&path).unwrap());
    let entry = cache
        .load(T0 + FRESHNESS_WINDOW_MS)
        .unwrap()
        .expect("entry should be cached");
    assert_eq!(entry.data, preview);
    assert_eq!(entry.saved_at, T0);
}

#[test]
fn second_ingest_while_loaded_is_a_benign_noop() {
    let mut controller = memory_controller().0;
    controller.init(T0).unwrap();

    controller
        .handle(ingest_intent(IngestChannel::FilePicker, 4, 2), T0)
        .unwrap();
    let first_preview = controller.preview().unwrap().to_string();

    controller
        .handle(ingest_intent(IngestChannel::DragDrop, 8, 8), T0 + 1_000)
        .unwrap();

    assert_eq!(controller.preview(), Some(first_preview.as_str()));
}

#[test]
fn ingest_of_non_image_payload_is_skipped() {
    let mut controller = memory_controller().0;
    controller.init(T0).unwrap();

    controller
        .handle(
            ImageIntent::Ingest {
                channel: IngestChannel::Paste,
                mime: "text/plain".to_string(),
                bytes: b"just text".to_vec(),
            },
            T0,
        )
        .unwrap();

    assert!(controller.intake_enabled());
    assert_eq!(controller.preview(), None);
}

#[test]
fn copy_and_download_before_resize_are_noops() {
    let (mut controller, clipboard, downloads) = memory_controller();
    controller.init(T0).unwrap();
    controller
        .handle(ingest_intent(IngestChannel::Paste, 4, 2), T0)
        .unwrap();

    controller.handle(ImageIntent::CopyImage, T0).unwrap();
    controller.handle(ImageIntent::Download, T0).unwrap();

    assert!(clipboard.images().is_empty());
    assert!(downloads.saved().is_empty());
}

#[test]
fn resize_reencodes_at_natural_dimensions() {
    let mut controller = memory_controller().0;
    controller.init(T0).unwrap();
    controller
        .handle(ingest_intent(IngestChannel::FilePicker, 5, 3), T0)
        .unwrap();

    controller.handle(ImageIntent::Resize, T0 + 100).unwrap();

    let resized = controller.resized().expect("resized output should exist");
    assert_eq!(controller.preview(), Some(resized));

    let decoded = data_url::parse(resized).unwrap();
    assert_eq!(decoded.mime, "image/png");
    let img = image::load_from_memory(&decoded.bytes).unwrap();
    assert_eq!((img.width(), img.height()), (5, 3));
}

#[test]
fn resize_without_working_image_is_a_benign_noop() {
    let mut controller = memory_controller().0;
    controller.init(T0).unwrap();

    controller.handle(ImageIntent::Resize, T0).unwrap();
    assert_eq!(controller.resized(), None);
}

#[test]
fn resize_overwrites_cache_and_refreshes_timestamp() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cache.db");

    let (mut controller, _clipboard, _downloads) = file_controller(&path);
    controller.init(T0).unwrap();
    controller
        .handle(ingest_intent(IngestChannel::FilePicker, 4, 2), T0)
        .unwrap();

    let resize_at = T0 + 300_000;
    controller.handle(ImageIntent::Resize, resize_at).unwrap();

    // Past the original capture's window, but fresh relative to the resize.
    let cache = ImageCache::new(open_store(&path).unwrap());
    let entry = cache
        .load(resize_at + FRESHNESS_WINDOW_MS - 1)
        .unwrap()
        .expect("refreshed entry should be fresh");
    assert_eq!(entry.saved_at, resize_at);
    assert_eq!(entry.data, controller.resized().unwrap());
}

#[test]
fn copy_after_resize_writes_png_image_object() {
    let (mut controller, clipboard, _downloads) = memory_controller();
    controller.init(T0).unwrap();
    controller
        .handle(ingest_intent(IngestChannel::DragDrop, 4, 2), T0)
        .unwrap();
    controller.handle(ImageIntent::Resize, T0).unwrap();

    controller.handle(ImageIntent::CopyImage, T0).unwrap();

    let images = clipboard.images();
    assert_eq!(images.len(), 1);
    let (mime, bytes) = &images[0];
    assert_eq!(mime, "image/png");
    let img = image::load_from_memory(bytes).unwrap();
    assert_eq!((img.width(), img.height()), (4, 2));
}

#[test]
fn clipboard_failure_surfaces_as_alert_error() {
    let store = open_store_in_memory().unwrap();
    let mut controller = ImageUiController::new(
        ImageCache::new(store),
        RecordingClipboard::failing(),
        RecordingDownloads::new(),
    );
    controller.init(T0).unwrap();
    controller
        .handle(ingest_intent(IngestChannel::FilePicker, 4, 2), T0)
        .unwrap();
    controller.handle(ImageIntent::Resize, T0).unwrap();

    let err = controller.handle(ImageIntent::CopyImage, T0).unwrap_err();
    assert!(matches!(err, ImageUiError::Clipboard(_)));
}

#[test]
fn download_after_resize_uses_fixed_filename() {
    let (mut controller, _clipboard, downloads) = memory_controller();
    controller.init(T0).unwrap();
    controller
        .handle(ingest_intent(IngestChannel::FilePicker, 4, 2), T0)
        .unwrap();
    controller.handle(ImageIntent::Resize, T0).unwrap();

    controller.handle(ImageIntent::Download, T0).unwrap();

    let saved = downloads.saved();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].0, DOWNLOAD_FILE_NAME);
    assert!(image::load_from_memory(&saved[0].1).is_ok());
}

#[test]
fn clear_purges_cache_and_reenables_intake() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cache.db");

    let (mut controller, _clipboard, _downloads) = file_controller(&path);
    controller.init(T0).unwrap();
    controller
        .handle(ingest_intent(IngestChannel::FilePicker, 4, 2), T0)
        .unwrap();

    controller.handle(ImageIntent::Clear, T0).unwrap();

    assert!(controller.intake_enabled());
    assert_eq!(controller.preview(), None);

    let raw = open_store(&path).unwrap();
    assert!(raw.get(&[IMAGE_DATA_KEY, IMAGE_TIME_KEY]).unwrap().is_empty());
}

#[test]
fn init_restores_fresh_entry_and_purges_expired_one() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cache.db");

    let seeded_url = {
        let cache = ImageCache::new(open_store(&path).unwrap());
        let url = data_url::encode("image/png", &png_bytes(4, 2));
        cache.store(&url, T0).unwrap();
        url
    };

    // One millisecond inside the window: restored, intake disabled.
    let (mut fresh_popup, _c1, _d1) = file_controller(&path);
    fresh_popup.init(T0 + FRESHNESS_WINDOW_MS - 1).unwrap();
    assert_eq!(fresh_popup.preview(), Some(seeded_url.as_str()));
    assert!(!fresh_popup.intake_enabled());

    // One millisecond past the window: purged before any render.
    let (mut expired_popup, _c2, _d2) = file_controller(&path);
    expired_popup.init(T0 + FRESHNESS_WINDOW_MS + 1).unwrap();
    assert_eq!(expired_popup.preview(), None);
    assert!(expired_popup.intake_enabled());

    let raw = open_store(&path).unwrap();
    assert!(raw.get(&[IMAGE_DATA_KEY, IMAGE_TIME_KEY]).unwrap().is_empty());
}

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let surface = RgbaImage::from_pixel(width, height, Rgba([30, 120, 200, 255]));
    let mut out = Cursor::new(Vec::new());
    surface.write_to(&mut out, ImageFormat::Png).unwrap();
    out.into_inner()
}

fn ingest_intent(channel: IngestChannel, width: u32, height: u32) -> ImageIntent {
    ImageIntent::Ingest {
        channel,
        mime: "image/png".to_string(),
        bytes: png_bytes(width, height),
    }
}

type TestController<S> = ImageUiController<S, RecordingClipboard, RecordingDownloads>;

fn memory_controller() -> (
    TestController<SqliteKeyValueStore>,
    RecordingClipboard,
    RecordingDownloads,
) {
    let clipboard = RecordingClipboard::new();
    let downloads = RecordingDownloads::new();
    let controller = ImageUiController::new(
        ImageCache::new(open_store_in_memory().unwrap()),
        clipboard.clone(),
        downloads.clone(),
    );
    (controller, clipboard, downloads)
}

fn file_controller(
    path: &std::path::Path,
) -> (
    TestController<SqliteKeyValueStore>,
    RecordingClipboard,
    RecordingDownloads,
) {
    let clipboard = RecordingClipboard::new();
    let downloads = RecordingDownloads::new();
    let controller = ImageUiController::new(
        ImageCache::new(open_store(path).unwrap()),
        clipboard.clone(),
        downloads.clone(),
    );
    (controller, clipboard, downloads)
}

#[derive(Clone)]
struct RecordingClipboard {
    images: Rc<RefCell<Vec<(String, Vec<u8>)>>>,
    fail: bool,
}

impl RecordingClipboard {
    fn new() -> Self {
        Self {
            images: Rc::new(RefCell::new(Vec::new())),
            fail: false,
        }
    }

    fn failing() -> Self {
        Self {
            images: Rc::new(RefCell::new(Vec::new())),
            fail: true,
        }
    }

    fn images(&self) -> Vec<(String, Vec<u8>)> {
        self.images.borrow().clone()
    }
}

impl Clipboard for RecordingClipboard {
    fn write_text(&mut self, _text: &str) -> PlatformResult<()> {
        Err(PlatformError::Rejected(
            "text payloads unsupported by this fake".to_string(),
        ))
    }

    fn write_image(&mut self, mime: &str, bytes: &[u8]) -> PlatformResult<()> {
        if self.fail {
            return Err(PlatformError::Rejected("clipboard unavailable".to_string()));
        }
        self.images
            .borrow_mut()
            .push((mime.to_string(), bytes.to_vec()));
        Ok(())
    }
}

#[derive(Clone)]
struct RecordingDownloads {
    saved: Rc<RefCell<Vec<(String, Vec<u8>)>>>,
}

impl RecordingDownloads {
    fn new() -> Self {
        Self {
            saved: Rc::new(RefCell::new(Vec::new())),
        }
    }

    fn saved(&self) -> Vec<(String, Vec<u8>)> {
        self.saved.borrow().clone()
    }
}

impl DownloadSink for RecordingDownloads {
    fn save(&mut self, file_name: &str, bytes: &[u8]) -> PlatformResult<()> {
        self.saved
            .borrow_mut()
            .push((file_name.to_string(), bytes.to_vec()));
        Ok(())
    }
}
