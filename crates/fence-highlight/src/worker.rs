//! Background worker that owns the highlighting engine.
//!
//! The worker thread is the only owner of the engine instance:
//! - the engine is created lazily, on the first request
//! - callers send a request and block on a per-request reply channel
//! - requests are handled one at a time, so on-demand language and theme
//!   loads never race
//!
//! Dropping the [`HighlightWorker`] shuts the thread down and drops the engine.

use crate::engine::{self, HighlightEngine, RenderRequest};
use crate::error::HighlightError;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

/// Creates the engine inside the worker thread.
pub type EngineFactory =
    Box<dyn FnOnce() -> Result<Box<dyn HighlightEngine>, HighlightError> + Send>;

type Reply<T> = Sender<Result<T, HighlightError>>;

enum WorkerRequest {
    Preload {
        langs: Vec<String>,
        themes: Vec<String>,
        reply: Reply<()>,
    },
    Render {
        request: RenderRequest,
        reply: Reply<String>,
    },
    LoadedLanguages {
        reply: Reply<Vec<String>>,
    },
    Shutdown,
}

/// Handle to the highlight worker thread.
pub struct HighlightWorker {
    request_tx: Sender<WorkerRequest>,
    handle: Option<thread::JoinHandle<()>>,
}

impl std::fmt::Debug for HighlightWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HighlightWorker")
            .field("running", &self.handle.is_some())
            .finish()
    }
}

impl HighlightWorker {
    /// Spawn the worker thread. The engine is built by `factory` on first use.
    pub fn spawn(factory: EngineFactory) -> Result<Self, HighlightError> {
        let (request_tx, request_rx) = mpsc::channel();

        let handle = thread::Builder::new()
            .name("fence-highlight-worker".to_string())
            .spawn(move || worker_loop(request_rx, factory))
            .map_err(|e| HighlightError::WorkerUnavailable(e.to_string()))?;

        Ok(Self {
            request_tx,
            handle: Some(handle),
        })
    }

    /// Load languages and themes ahead of the first render.
    pub fn preload(&self, langs: Vec<String>, themes: Vec<String>) -> Result<(), HighlightError> {
        self.call(|reply| WorkerRequest::Preload {
            langs,
            themes,
            reply,
        })
    }

    /// Render one code block, blocking until the worker replies.
    pub fn render(&self, request: RenderRequest) -> Result<String, HighlightError> {
        self.call(|reply| WorkerRequest::Render { request, reply })
    }

    /// Languages the engine has loaded so far.
    pub fn loaded_languages(&self) -> Result<Vec<String>, HighlightError> {
        self.call(|reply| WorkerRequest::LoadedLanguages { reply })
    }

    fn call<T>(
        &self,
        build: impl FnOnce(Reply<T>) -> WorkerRequest,
    ) -> Result<T, HighlightError> {
        let (reply_tx, reply_rx) = mpsc::channel();

        self.request_tx.send(build(reply_tx)).map_err(|_| {
            HighlightError::WorkerUnavailable("worker thread has stopped".to_string())
        })?;

        reply_rx.recv().map_err(|_| {
            HighlightError::WorkerUnavailable("worker dropped the request".to_string())
        })?
    }
}

impl Drop for HighlightWorker {
    fn drop(&mut self) {
        // fails only if the thread is already gone
        let _ = self.request_tx.send(WorkerRequest::Shutdown);

        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("Highlight worker panicked");
            }
        }
    }
}

/// The engine as seen from inside the worker thread.
enum EngineSlot {
    Pending(EngineFactory),
    Ready(Box<dyn HighlightEngine>),
    Failed(HighlightError),
}

impl EngineSlot {
    fn get(&mut self) -> Result<&mut dyn HighlightEngine, HighlightError> {
        let placeholder = EngineSlot::Failed(HighlightError::WorkerUnavailable(
            "engine initialization did not complete".to_string(),
        ));

        *self = match std::mem::replace(self, placeholder) {
            EngineSlot::Pending(factory) => match factory() {
                Ok(engine) => {
                    log::info!("Highlight engine initialized");
                    EngineSlot::Ready(engine)
                }
                Err(e) => {
                    log::error!("Failed to initialize highlight engine: {}", e);
                    EngineSlot::Failed(e)
                }
            },
            other => other,
        };

        match self {
            EngineSlot::Ready(engine) => Ok(engine.as_mut()),
            EngineSlot::Failed(e) => Err(e.clone()),
            EngineSlot::Pending(_) => Err(HighlightError::WorkerUnavailable(
                "engine not initialized".to_string(),
            )),
        }
    }
}

fn worker_loop(request_rx: Receiver<WorkerRequest>, factory: EngineFactory) {
    log::info!("Highlight worker started");

    let mut slot = EngineSlot::Pending(factory);

    for request in request_rx {
        match request {
            WorkerRequest::Preload {
                langs,
                themes,
                reply,
            } => {
                let result = slot
                    .get()
                    .and_then(|engine| engine::preload(engine, &langs, &themes));
                send_reply(&reply, result);
            }
            WorkerRequest::Render { request, reply } => {
                log::debug!(
                    "Rendering {} block with theme '{}'",
                    request.lang,
                    request.theme
                );
                let result = slot.get().and_then(|engine| engine::render(engine, &request));
                send_reply(&reply, result);
            }
            WorkerRequest::LoadedLanguages { reply } => {
                let result = slot.get().map(|engine| engine.loaded_languages());
                send_reply(&reply, result);
            }
            WorkerRequest::Shutdown => {
                log::info!("Highlight worker received shutdown signal");
                break;
            }
        }
    }

    log::info!("Highlight worker stopped");
}

fn send_reply<T>(reply: &Reply<T>, result: Result<T, HighlightError>) {
    if reply.send(result).is_err() {
        log::warn!("Highlight worker: caller went away before the reply");
    }
}
