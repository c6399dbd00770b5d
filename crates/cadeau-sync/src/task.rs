//! The replication task: push on every save, reconcile on an interval.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

use cadeau_store::{StoreEvent, UserRecord, UserStore};

use crate::client::SyncClient;

/// Spawn the background replication loop.
///
/// Saves are pushed to the hub as they happen (via the store's event
/// channel); on each `interval` tick the hub copy is pulled and adopted
/// when it wins the reconciliation rule.  Abort the returned handle on
/// shutdown.
pub fn spawn_replication(
    store: Arc<UserStore>,
    client: SyncClient,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut events = store.subscribe();
        let mut ticker = tokio::time::interval(interval);

        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Ok(StoreEvent::UsersUpdated) => {
                        client.push(&store.users()).await;
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        // Pushes are wholesale, so catching up with one
                        // push covers everything that was skipped.
                        tracing::debug!(skipped, "replication lagged behind saves");
                        client.push(&store.users()).await;
                    }
                    Err(RecvError::Closed) => break,
                },
                _ = ticker.tick() => {
                    if let Some(remote) = client.pull().await {
                        let local = store.users();
                        if should_adopt(&local, &remote) {
                            tracing::info!(
                                local = local.len(),
                                remote = remote.len(),
                                "adopting hub user list"
                            );
                            store.save_users(&remote);
                        }
                    }
                }
            }
        }
    })
}

/// Length-biased last-writer-wins: the hub copy is adopted when it differs
/// from the local list and is at least as long.
fn should_adopt(local: &[UserRecord], remote: &[UserRecord]) -> bool {
    remote.len() >= local.len() && remote != local
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: i64, email: &str) -> UserRecord {
        serde_json::from_value(serde_json::json!({ "id": id, "email": email })).unwrap()
    }

    #[test]
    fn equal_lists_are_not_adopted() {
        let a = vec![user(1, "a@example.com")];
        assert!(!should_adopt(&a, &a.clone()));
    }

    #[test]
    fn longer_remote_wins() {
        let local = vec![user(1, "a@example.com")];
        let remote = vec![user(1, "a@example.com"), user(2, "b@example.com")];
        assert!(should_adopt(&local, &remote));
    }

    #[test]
    fn shorter_remote_never_wins() {
        let local = vec![user(1, "a@example.com"), user(2, "b@example.com")];
        let remote = vec![user(3, "c@example.com")];
        assert!(!should_adopt(&local, &remote));
    }

    #[test]
    fn same_length_but_different_content_wins() {
        let local = vec![user(1, "a@example.com")];
        let remote = vec![user(1, "renamed@example.com")];
        assert!(should_adopt(&local, &remote));
    }
}
