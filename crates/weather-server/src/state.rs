use crate::tools::{self, ToolContext, WeatherTool};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use uuid::Uuid;

/// Outbound messages buffered per SSE session before senders wait.
const SESSION_BUFFER: usize = 32;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub tools: Arc<Vec<Box<dyn WeatherTool>>>,
    pub ctx: Arc<ToolContext>,
    pub sessions: SessionRegistry,
}

impl AppState {
    pub fn new(ctx: ToolContext) -> Self {
        Self {
            tools: Arc::new(tools::all_tools()),
            ctx: Arc::new(ctx),
            sessions: SessionRegistry::default(),
        }
    }
}

/// Open SSE sessions, keyed by the id handed out in the `endpoint` event.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    inner: Arc<Mutex<HashMap<Uuid, mpsc::Sender<String>>>>,
}

impl SessionRegistry {
    pub fn open(&self) -> (Uuid, mpsc::Receiver<String>) {
        let id = Uuid::new_v4();
        let (tx, rx) = mpsc::channel(SESSION_BUFFER);
        self.lock().insert(id, tx);
        (id, rx)
    }

    pub fn sender(&self, id: &Uuid) -> Option<mpsc::Sender<String>> {
        self.lock().get(id).cloned()
    }

    pub fn close(&self, id: &Uuid) -> bool {
        self.lock().remove(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<Uuid, mpsc::Sender<String>>> {
        // A poisoned map is still structurally valid; keep serving.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}
