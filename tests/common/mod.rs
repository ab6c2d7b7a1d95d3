#![allow(dead_code)]

use glam::Vec2;
use image::RgbaImage;
use std::collections::HashMap;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex};
use tour360::input::Cursor;
use tour360::loader::{Fetch, LoadError};
use tour360::{Host, HostError};

/// In-memory host element.
#[derive(Debug)]
pub struct FakeHost {
    pub size: Vec2,
    pub height: f32,
    pub fullscreen: bool,
    pub refuse_fullscreen: bool,
    pub cursor: Option<Cursor>,
    pub fullscreen_requests: u32,
}

impl Default for FakeHost {
    fn default() -> Self {
        Self {
            size: Vec2::new(800.0, 500.0),
            height: 0.0,
            fullscreen: false,
            refuse_fullscreen: false,
            cursor: None,
            fullscreen_requests: 0,
        }
    }
}

impl Host for FakeHost {
    fn element_size(&self) -> Vec2 {
        self.size
    }

    fn set_element_height(&mut self, height: f32) {
        self.height = height;
    }

    fn fullscreen_element(&self) -> bool {
        self.fullscreen
    }

    fn request_fullscreen(&mut self) -> Result<(), HostError> {
        self.fullscreen_requests += 1;
        if self.refuse_fullscreen {
            return Err(HostError::Unsupported("fullscreen"));
        }
        self.fullscreen = true;
        Ok(())
    }

    fn exit_fullscreen(&mut self) -> Result<(), HostError> {
        self.fullscreen = false;
        Ok(())
    }

    fn set_cursor(&mut self, cursor: Cursor) {
        self.cursor = Some(cursor);
    }
}

/// Serves images of fixed widths by URL; unknown URLs fail like a 404.
/// URLs registered as gated block until the test releases them.
#[derive(Default)]
pub struct FakeFetcher {
    widths: HashMap<String, u32>,
    gates: Mutex<HashMap<String, Receiver<()>>>,
}

impl FakeFetcher {
    pub fn with(mut self, url: &str, width: u32) -> Self {
        self.widths.insert(url.to_string(), width);
        self
    }

    /// Makes `url` wait for a send on the returned sender.
    pub fn gate(&self, url: &str) -> Sender<()> {
        let (tx, rx) = channel();
        self.gates.lock().unwrap().insert(url.to_string(), rx);
        tx
    }
}

impl Fetch for FakeFetcher {
    fn fetch(&self, url: &str) -> Result<RgbaImage, LoadError> {
        let gate = self.gates.lock().unwrap().remove(url);
        if let Some(rx) = gate {
            let _ = rx.recv();
        }
        match self.widths.get(url) {
            Some(&w) => Ok(RgbaImage::new(w, (w / 2).max(1))),
            None => Err(LoadError::Status {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}

pub fn fetcher(f: FakeFetcher) -> Arc<FakeFetcher> {
    Arc::new(f)
}
