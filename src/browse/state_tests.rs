use super::*;
use crate::model::{Item, MediaKind};
use crate::testing::{RecordingHost, sample_item};

fn gallery(n: usize) -> Vec<Media> {
    (0..n)
        .map(|i| Media::new(format!("https://cdn.example/foto-{i}.jpg"), MediaKind::Image))
        .collect()
}

fn hosted() -> (Arc<RecordingHost>, MediaBrowser<Item>) {
    let host = Arc::new(RecordingHost::default());
    let browser = MediaBrowser::with_host(host.clone());
    (host, browser)
}

#[test]
fn test_starts_closed() {
    let browser: MediaBrowser<Item> = MediaBrowser::new();
    assert_eq!(browser.state(), BrowserState::Closed);
    assert!(!browser.is_listening());
}

#[test]
fn test_open_detail_from_closed_and_detail() {
    let mut browser = MediaBrowser::new();
    browser.open_detail(sample_item("a")).unwrap();
    assert_eq!(browser.state(), BrowserState::DetailOpen);

    browser.open_detail(sample_item("b")).unwrap();
    assert_eq!(browser.detail().map(|i| i.id.as_str()), Some("b"));
}

#[test]
fn test_open_detail_rejected_above_carousel() {
    let mut browser = MediaBrowser::new();
    browser.open_carousel(gallery(2), 0).unwrap();

    let err = browser.open_detail(sample_item("a")).unwrap_err();
    assert_eq!(
        err,
        BrowseError::InvalidTransition {
            from: BrowserState::CarouselOpen,
            action: "open detail",
        }
    );
    assert!(browser.detail().is_none());

    browser.open_fullscreen(gallery(1).remove(0));
    assert!(matches!(
        browser.open_detail(sample_item("a")),
        Err(BrowseError::InvalidTransition {
            from: BrowserState::FullscreenOpen,
            ..
        })
    ));
}

#[test]
fn test_carousel_of_four_starting_at_three() {
    let mut browser: MediaBrowser<Item> = MediaBrowser::new();
    assert_eq!(browser.open_carousel(gallery(4), 3), Ok(3));
    assert_eq!(browser.next(), Some(0));
    assert_eq!(browser.prev(), Some(3));
    assert_eq!(browser.jump_to(7), Some(3));
}

#[test]
fn test_navigation_without_carousel_is_noop() {
    let mut browser: MediaBrowser<Item> = MediaBrowser::new();
    assert_eq!(browser.next(), None);
    assert_eq!(browser.prev(), None);
    assert_eq!(browser.jump_to(1), None);
}

#[test]
fn test_empty_carousel_changes_nothing() {
    let mut browser = MediaBrowser::new();
    browser.open_detail(sample_item("a")).unwrap();

    let docs = vec![Media::new("edital.pdf", MediaKind::Document)];
    assert_eq!(browser.open_carousel(docs, 0), Err(BrowseError::EmptyCarousel));
    assert_eq!(browser.state(), BrowserState::DetailOpen);
}

#[test]
fn test_open_carousel_replaces_fullscreen() {
    let mut browser: MediaBrowser<Item> = MediaBrowser::new();
    browser.open_fullscreen(gallery(1).remove(0));
    browser.open_carousel(gallery(3), 1).unwrap();
    assert_eq!(browser.state(), BrowserState::CarouselOpen);
    assert!(browser.fullscreen().is_none());
}

#[test]
fn test_escape_closes_topmost_surface() {
    let (host, mut browser) = hosted();
    browser.open_detail(sample_item("a")).unwrap();
    browser.open_carousel(gallery(3), 0).unwrap();
    browser.open_fullscreen(gallery(1).remove(0));
    assert_eq!(host.active(), 1);

    assert_eq!(
        browser.handle_key(BrowserKey::Escape),
        KeyOutcome::Closed(BrowserState::CarouselOpen)
    );
    assert_eq!(
        browser.handle_key(BrowserKey::Escape),
        KeyOutcome::Closed(BrowserState::DetailOpen)
    );
    assert!(browser.is_listening());
    assert_eq!(
        browser.handle_key(BrowserKey::Escape),
        KeyOutcome::Closed(BrowserState::Closed)
    );

    assert!(!browser.is_listening());
    assert_eq!(host.active(), 0);
    assert_eq!(browser.handle_key(BrowserKey::Escape), KeyOutcome::Ignored);
}

#[test]
fn test_arrows_only_move_topmost_carousel() {
    let mut browser: MediaBrowser<Item> = MediaBrowser::new();
    browser.open_carousel(gallery(3), 0).unwrap();

    assert_eq!(browser.handle_key(BrowserKey::ArrowRight), KeyOutcome::Moved(1));
    assert_eq!(browser.handle_key(BrowserKey::ArrowLeft), KeyOutcome::Moved(0));
    assert_eq!(browser.handle_key(BrowserKey::ArrowLeft), KeyOutcome::Moved(2));

    browser.open_fullscreen(gallery(1).remove(0));
    assert_eq!(browser.handle_key(BrowserKey::ArrowRight), KeyOutcome::Ignored);
    assert_eq!(browser.carousel().map(CarouselState::index), Some(2));
}

#[test]
fn test_arrows_ignored_in_detail() {
    let mut browser = MediaBrowser::new();
    browser.open_detail(sample_item("a")).unwrap();
    assert_eq!(browser.handle_key(BrowserKey::ArrowRight), KeyOutcome::Ignored);
}

#[test]
fn test_close_releases_listener_once() {
    let (host, mut browser) = hosted();
    browser.open_detail(sample_item("a")).unwrap();
    browser.open_carousel(gallery(2), 0).unwrap();
    assert_eq!(host.attached(), 1, "one listener for the whole stack");

    browser.close();
    assert_eq!(browser.state(), BrowserState::Closed);
    assert_eq!(host.detached(), 1);

    browser.open_fullscreen(gallery(1).remove(0));
    assert_eq!(host.attached(), 2);
    drop(browser);
    assert_eq!(host.active(), 0);
}

#[test]
fn test_patch_detail_view_count() {
    let mut browser = MediaBrowser::new();
    browser.open_detail(sample_item("a")).unwrap();

    assert!(!browser.patch_view_count(&"b".into(), 9));
    assert!(browser.patch_view_count(&"a".into(), 9));
    assert_eq!(browser.detail().and_then(|i| i.view_count), Some(9));
}

#[test]
fn test_media_failure_placeholder() {
    let mut browser: MediaBrowser<Item> = MediaBrowser::new();
    let photo = gallery(1).remove(0);
    browser.report_media_failure(photo.url.clone());
    assert!(matches!(browser.media_display(&photo), MediaDisplay::Placeholder(_)));
}
