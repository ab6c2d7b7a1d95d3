// loader.rs — background fetch and decode of panorama images

use image::io::Reader as ImageReader;
use image::{DynamicImage, RgbaImage};
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
}

/// Where the bytes of a panorama come from.
pub trait Fetch: Send + Sync {
    fn fetch(&self, url: &str) -> Result<RgbaImage, LoadError>;
}

/// Local paths, `file://` and `http(s)://` URLs.
#[derive(Debug, Default)]
pub struct DefaultFetcher;

impl DefaultFetcher {
    fn read_bytes(url: &str) -> Result<Vec<u8>, LoadError> {
        if url.starts_with("http://") || url.starts_with("https://") {
            let response = reqwest::blocking::get(url)?;
            if !response.status().is_success() {
                return Err(LoadError::Status {
                    url: url.to_string(),
                    status: response.status().as_u16(),
                });
            }
            return Ok(response.bytes()?.to_vec());
        }

        let path = PathBuf::from(url.strip_prefix("file://").unwrap_or(url));
        std::fs::read(&path).map_err(|source| LoadError::Io { path, source })
    }
}

impl Fetch for DefaultFetcher {
    fn fetch(&self, url: &str) -> Result<RgbaImage, LoadError> {
        let bytes = Self::read_bytes(url)?;
        let mut reader = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(image::ImageError::IoError)?;
        reader.no_limits();
        Ok(reader.decode()?.to_rgba8())
    }
}

/// Downscales `img` so neither side exceeds `max_side`, keeping aspect.
pub fn fit_within(img: RgbaImage, max_side: u32) -> RgbaImage {
    let (w, h) = img.dimensions();
    if w <= max_side && h <= max_side {
        return img;
    }
    let scale = max_side as f32 / w.max(h) as f32;
    let new_w = ((w as f32 * scale) as u32).max(1);
    let new_h = ((h as f32 * scale) as u32).max(1);
    log::warn!("image {w}x{h} exceeds {max_side}px, scaled to {new_w}x{new_h}");
    DynamicImage::ImageRgba8(img)
        .resize_exact(new_w, new_h, image::imageops::FilterType::Lanczos3)
        .to_rgba8()
}

#[derive(Debug)]
pub struct LoadOutcome {
    pub generation: u64,
    pub url: String,
    pub result: Result<RgbaImage, LoadError>,
}

/// Runs each load on its own worker thread and funnels results back to the
/// owning (UI) thread. Loads are never cancelled.
pub struct ImageLoader {
    fetcher: Arc<dyn Fetch>,
    max_side: u32,
    tx: Sender<LoadOutcome>,
    rx: Receiver<LoadOutcome>,
}

impl ImageLoader {
    pub fn new(fetcher: Arc<dyn Fetch>, max_side: u32) -> Self {
        let (tx, rx) = channel();
        Self {
            fetcher,
            max_side,
            tx,
            rx,
        }
    }

    pub fn spawn(&self, generation: u64, url: String) {
        let fetcher = Arc::clone(&self.fetcher);
        let tx = self.tx.clone();
        let max_side = self.max_side;
        thread::spawn(move || {
            log::info!("loading panorama {url}");
            let result = fetcher.fetch(&url).map(|img| fit_within(img, max_side));
            if let Ok(img) = &result {
                let (w, h) = img.dimensions();
                log::info!("panorama {url} decoded ({w}x{h})");
            }
            // The receiver lives as long as the viewer; a send error only
            // means the viewer was dropped.
            let _ = tx.send(LoadOutcome {
                generation,
                url,
                result,
            });
        });
    }

    pub fn try_next(&self) -> Option<LoadOutcome> {
        self.rx.try_recv().ok()
    }

    pub fn next_timeout(&self, timeout: Duration) -> Option<LoadOutcome> {
        match self.rx.recv_timeout(timeout) {
            Ok(outcome) => Some(outcome),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }
}
