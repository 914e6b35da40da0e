use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;
use std::time::Duration;

use raylib::prelude::*;
use tracing::{debug, info, warn};

use crate::constants::FETCH_TIMEOUT_SECS;
use crate::engine::{CachePolicy, ImageLoader, RenderRequest};
use crate::error::LoadError;
use crate::queue::ImageId;
use crate::slide::SlideSurface;
use crate::texture_loader::{fetch_bytes, load_texture};

type FetchResult = (ImageId, Result<Vec<u8>, LoadError>);

/// Image loader backed by a background fetch thread and raylib textures.
///
/// Bytes are fetched off the UI thread; decoding and texture upload happen in
/// `pump`, which the frame loop calls once per frame.
pub struct RaylibImageLoader {
    requests: Sender<ImageId>,
    results: Receiver<FetchResult>,
    in_flight: HashSet<ImageId>,
    bytes: HashMap<ImageId, Vec<u8>>,
    textures: HashMap<ImageId, Rc<Texture2D>>,
    pending: Option<(ImageId, RenderRequest)>,
}

impl RaylibImageLoader {
    pub fn new() -> Result<Self, LoadError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
            .build()?;

        let (request_tx, request_rx) = mpsc::channel::<ImageId>();
        let (result_tx, result_rx) = mpsc::channel::<FetchResult>();

        // Exits once the loader (and with it the request sender) is dropped
        thread::Builder::new()
            .name("image-fetch".into())
            .spawn(move || {
                for id in request_rx {
                    let result = fetch_bytes(&client, &id);
                    if result_tx.send((id, result)).is_err() {
                        break;
                    }
                }
            })
            .map_err(LoadError::Worker)?;

        Ok(Self {
            requests: request_tx,
            results: result_rx,
            in_flight: HashSet::new(),
            bytes: HashMap::new(),
            textures: HashMap::new(),
            pending: None,
        })
    }

    fn request(&mut self, id: &ImageId) {
        if self.bytes.contains_key(id) || self.in_flight.contains(id) {
            return;
        }
        if self.requests.send(id.clone()).is_err() {
            warn!(%id, "fetch worker is gone, dropping request");
            return;
        }
        self.in_flight.insert(id.clone());
    }

    /// Collects finished fetches and shows the pending image once its bytes
    /// are available.
    pub fn pump(&mut self, rl: &mut RaylibHandle, thread: &RaylibThread, surface: &mut SlideSurface) {
        loop {
            match self.results.try_recv() {
                Ok((id, Ok(bytes))) => {
                    debug!(%id, size = bytes.len(), "fetched image");
                    self.in_flight.remove(&id);
                    self.bytes.insert(id, bytes);
                }
                Ok((id, Err(e))) => {
                    warn!(%id, "failed to fetch image: {}", e);
                    self.in_flight.remove(&id);
                    if self.pending.as_ref().is_some_and(|(pending, _)| *pending == id) {
                        self.pending = None;
                    }
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }

        let Some((id, request)) = self.pending.take() else {
            return;
        };
        let Some(bytes) = self.bytes.get(&id) else {
            self.pending = Some((id, request));
            return;
        };

        let texture = match request.cache {
            CachePolicy::Default => match self.textures.get(&id) {
                Some(texture) => Ok(Rc::clone(texture)),
                None => load_texture(rl, thread, &id, bytes).map(Rc::new).inspect(|texture| {
                    self.textures.insert(id.clone(), Rc::clone(texture));
                }),
            },
            CachePolicy::SkipMemory => load_texture(rl, thread, &id, bytes).map(Rc::new),
        };

        match texture {
            Ok(texture) => {
                info!(%id, "showing image");
                surface.show(texture, request.crossfade);
            }
            Err(e) => warn!(%id, "failed to load image: {}", e),
        }
    }
}

impl ImageLoader for RaylibImageLoader {
    fn prefetch(&mut self, id: &ImageId) {
        self.request(id);
    }

    fn render(&mut self, id: &ImageId, request: RenderRequest) {
        // A newer render always wins over one still waiting for bytes
        self.pending = Some((id.clone(), request));
        self.request(id);
    }
}
