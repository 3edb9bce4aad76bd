//! Drive the media browser from the terminal
//!
//! Opens a detail modal, then a carousel over a small gallery, and feeds real
//! key presses into it: Left/Right (or h/l) move, Esc closes the topmost
//! surface. The demo ends when every surface is closed.
//!
//! ```bash
//! cargo run --example carousel_demo
//! ```

use chrono::Utc;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use vitrine::VitrineError;
use vitrine::browse::{BrowserKey, BrowserState, KeyOutcome, KeyboardHost, ListenerId, MediaBrowser};
use vitrine::model::{Item, Media, MediaKind};

/// Prints attach/detach so the listener lifecycle is visible
#[derive(Default)]
struct TerminalHost {
    next: AtomicU64,
}

impl KeyboardHost for TerminalHost {
    fn attach(&self) -> ListenerId {
        let id = ListenerId(self.next.fetch_add(1, Ordering::Relaxed));
        print!("(key listener {} attached)\r\n", id.0);
        id
    }

    fn detach(&self, id: ListenerId) {
        print!("(key listener {} detached)\r\n", id.0);
    }
}

fn gallery() -> Vec<Media> {
    vec![
        Media::new("https://cdn.example/feira-1.jpg", MediaKind::Image),
        Media::new("https://cdn.example/feira-2.jpg", MediaKind::Image),
        Media::new("https://cdn.example/programa.pdf", MediaKind::Document),
        Media::new("https://cdn.example/abertura.mp4", MediaKind::Video),
        Media::new("https://cdn.example/feira-3.jpg", MediaKind::Image),
    ]
}

fn describe(browser: &MediaBrowser<Item>) -> String {
    match (browser.state(), browser.carousel()) {
        (BrowserState::CarouselOpen, Some(carousel)) => {
            format!(
                "carousel {}/{}: {}",
                carousel.index() + 1,
                carousel.len(),
                carousel.current().url
            )
        }
        (state, _) => state.to_string(),
    }
}

fn run(browser: &mut MediaBrowser<Item>) -> Result<(), VitrineError> {
    loop {
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        let Ok(browser_key) = BrowserKey::try_from(&key) else {
            continue;
        };

        match browser.handle_key(browser_key) {
            KeyOutcome::Closed(BrowserState::Closed) => {
                print!("{browser_key}: all surfaces closed\r\n");
                return Ok(());
            }
            KeyOutcome::Closed(_) | KeyOutcome::Moved(_) => {
                print!("{browser_key}: {}\r\n", describe(browser));
            }
            KeyOutcome::Ignored => print!("{browser_key}: ignored\r\n"),
        }
    }
}

fn main() -> Result<(), VitrineError> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let item = Item::new("feira-2024", "Feira agrícola 2024", Utc::now())
        .with_description("Fotografias e vídeo da abertura")
        .with_media(Media::new("https://cdn.example/feira-1.jpg", MediaKind::Image));

    let mut browser = MediaBrowser::with_host(Arc::new(TerminalHost::default()));
    browser.open_detail(item)?;
    let start = browser.open_carousel(gallery(), 0)?;
    println!("Detail open, carousel at {start}. Left/Right to move, Esc to close.");

    enable_raw_mode()?;
    let outcome = run(&mut browser);
    disable_raw_mode()?;
    outcome
}
