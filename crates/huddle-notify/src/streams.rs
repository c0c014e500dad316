//! The standard per-session stream set.

use huddle_core::enums::Collection;
use huddle_core::identity::SessionIdentity;
use huddle_store::{ChangeStreamWatcher, EntityStore, Filter, StoreError};

use crate::engine::StreamKind;

/// Open the six streams a session watches: the user's assigned or created
/// tasks, the team's projects, team chat, direct messages involving the
/// user, project discussions, and the activity log.
///
/// Each watcher is an independent lifecycle-scoped handle; close one without
/// touching the rest. Which direct message is "latest per peer" is the store
/// query's concern; the filter here admits every DM the user participates
/// in.
///
/// # Errors
///
/// Returns the first `StoreError` hit while subscribing; already-opened
/// watchers are dropped (and thereby closed) in that case.
pub async fn open_session_streams<S: EntityStore>(
    store: &S,
    identity: &SessionIdentity,
) -> Result<Vec<(StreamKind, ChangeStreamWatcher)>, StoreError> {
    let user = identity.user_id.as_str();
    let team = identity.team_id.as_str();

    let plan = [
        (
            StreamKind::Tasks,
            Collection::Tasks,
            Filter::any_of(vec![
                Filter::eq("assigned_to", user),
                Filter::eq("assigned_by", user),
            ]),
        ),
        (
            StreamKind::Projects,
            Collection::Projects,
            Filter::eq("team_id", team),
        ),
        (
            StreamKind::TeamChat,
            Collection::TeamChat,
            Filter::eq("conversation_id", team),
        ),
        (
            StreamKind::DirectMessages,
            Collection::DirectMessages,
            Filter::contains("participants", user),
        ),
        (StreamKind::ProjectDiscussion, Collection::ProjectDiscussion, Filter::All),
        (StreamKind::Activity, Collection::Activity, Filter::All),
    ];

    let mut watchers = Vec::with_capacity(plan.len());
    for (stream, collection, filter) in plan {
        let watcher = ChangeStreamWatcher::open(store, collection, filter).await?;
        watchers.push((stream, watcher));
    }
    Ok(watchers)
}
