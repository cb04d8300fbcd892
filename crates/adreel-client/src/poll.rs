//! Fixed-interval status polling.
//!
//! Polling stops on the first terminal status (`completed` or `error`) and
//! never issues another request after it. A cancellation future stops the
//! timer between ticks.

use std::future::Future;
use std::time::Duration;

use tokio::time::MissedTickBehavior;

use adreel_models::VideoId;

use crate::api::{RelayClient, StatusView};
use crate::error::{ClientError, ClientResult};

/// Default time between status checks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Anything that can report a video's status.
#[allow(async_fn_in_trait)]
pub trait StatusSource {
    async fn fetch_status(&self, video_id: &VideoId) -> ClientResult<StatusView>;
}

impl StatusSource for RelayClient {
    async fn fetch_status(&self, video_id: &VideoId) -> ClientResult<StatusView> {
        self.status(video_id).await
    }
}

/// Poll until the video reaches a terminal status.
///
/// `on_update` sees every observation, including the terminal one, which is
/// also returned. Errors from the source end polling immediately. When
/// `cancel` resolves first, returns [`ClientError::Cancelled`].
pub async fn watch_status<S, F, C>(
    source: &S,
    video_id: &VideoId,
    interval: Duration,
    cancel: C,
    mut on_update: F,
) -> ClientResult<StatusView>
where
    S: StatusSource,
    F: FnMut(&StatusView),
    C: Future<Output = ()>,
{
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tokio::pin!(cancel);

    loop {
        tokio::select! {
            biased;
            _ = &mut cancel => return Err(ClientError::Cancelled),
            _ = ticker.tick() => {}
        }

        let status = source.fetch_status(video_id).await?;
        on_update(&status);
        if status.status.is_terminal() {
            return Ok(status);
        }
    }
}
