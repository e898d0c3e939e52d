//! Debounced suggestion lookups.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;

use crate::error::Channel;
use crate::messages::SearchMessage;
use crate::sources::SuggestionSource;
use crate::task::run_isolated;

/// Wait out the debounce window, then fetch suggestions for `text`.
///
/// Cancelling `token` before the window elapses abandons the lookup without
/// sending anything. Once the request is out it always reports back, even if
/// the source panics, and the session decides by generation whether the
/// answer still matters.
pub fn request_suggestions(
    tx: &UnboundedSender<SearchMessage>,
    source: Arc<dyn SuggestionSource>,
    generation: u64,
    text: String,
    delay: Duration,
    token: CancellationToken,
) {
    let tx = tx.clone();

    tokio::spawn(async move {
        tokio::select! {
            _ = token.cancelled() => {
                tracing::trace!("Suggestion lookup for {:?} superseded", text);
                return;
            }
            _ = tokio::time::sleep(delay) => {}
        }

        let _ = tx.send(SearchMessage::SuggestionsStarted { generation });
        let result = run_isolated(Channel::Suggestions, async move {
            source.suggest(&text).await
        })
        .await;
        let _ = tx.send(SearchMessage::SuggestionsDone { generation, result });
    });
}
