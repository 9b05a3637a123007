//! Suggestion worker thread
//!
//! Runs provider calls off the UI thread. Receives requests via channel,
//! resolves them on a single-threaded tokio runtime, and sends exactly one
//! response per request back. Failures are sent as empty text.

use std::sync::mpsc::{Receiver, Sender};
use std::thread::JoinHandle;

use super::{SuggestError, SuggestionProvider, SuggestionRequest, SuggestionResponse, get_suggestion};

/// Spawn the suggestion worker thread
///
/// The worker exits when the request channel is closed (every sender
/// dropped) or the response receiver goes away.
pub fn spawn_worker(
    provider: Result<SuggestionProvider, SuggestError>,
    request_rx: Receiver<SuggestionRequest>,
    response_tx: Sender<SuggestionResponse>,
) -> JoinHandle<()> {
    std::thread::spawn(move || {
        worker_loop(provider, request_rx, response_tx);
    })
}

/// Main worker loop - processes requests until the channel is closed
fn worker_loop(
    provider: Result<SuggestionProvider, SuggestError>,
    request_rx: Receiver<SuggestionRequest>,
    response_tx: Sender<SuggestionResponse>,
) {
    let provider = match provider {
        Ok(p) => Some(p),
        Err(e) => {
            log::warn!("Suggestion provider unavailable: {}", e);
            None
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => Some(rt),
        Err(e) => {
            log::error!("Failed to start suggestion runtime: {}", e);
            None
        }
    };

    while let Ok(request) = request_rx.recv() {
        let text = match (&provider, &runtime) {
            (Some(provider), Some(runtime)) => {
                runtime.block_on(get_suggestion(provider, &request.context))
            }
            _ => String::new(),
        };

        log::debug!(
            "Suggestion {} resolved ({} chars)",
            request.request_id,
            text.chars().count()
        );

        let response = SuggestionResponse {
            request_id: request.request_id,
            text,
        };
        if response_tx.send(response).is_err() {
            // Main thread disconnected
            break;
        }
    }

    log::debug!("Suggestion worker shutting down");
}
