//! Notification streams for chairs and users

use axum::{
    extract::{Path, State},
    response::sse::{Event, Sse},
};
use futures::stream::Stream;
use ridematch_common::events::Channel;
use ridematch_common::{ChairId, UserId};
use std::convert::Infallible;

use crate::AppState;

/// GET /api/chair/:chair_id/notification
pub async fn chair_notifications(
    State(state): State<AppState>,
    Path(chair_id): Path<ChairId>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    state.notifier.handle_sse_connection(Channel::Chair(chair_id))
}

/// GET /api/app/:user_id/notification
pub async fn user_notifications(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    state.notifier.handle_sse_connection(Channel::User(user_id))
}
