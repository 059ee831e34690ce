//! Per-member question completion tracking.
//!
//! A `(member, question)` record exists iff the member completed the
//! question. [`ProgressToggle::toggle`] is the only transition and flips
//! the state with one atomic store operation per attempt. When the store
//! reports that the create lost a uniqueness race, the toggle is re-issued
//! so the final state always matches the parity of the number of calls.

use std::sync::Arc;

use crate::error::CoreError;
use crate::store::{RelationStore, ToggleOutcome};
use crate::types::{CompletionState, DbId, MemberId, QuestionId};

/// Upper bound on re-issued toggles after `Contended` outcomes.
pub const MAX_TOGGLE_ATTEMPTS: usize = 8;

/// Idempotent, concurrency-safe completion flip.
#[derive(Clone)]
pub struct ProgressToggle {
    store: Arc<dyn RelationStore>,
}

impl ProgressToggle {
    pub fn new(store: Arc<dyn RelationStore>) -> Self {
        Self { store }
    }

    /// Flip the completion state of `(member_id, question_id)`.
    ///
    /// Returns the resulting state.
    pub async fn toggle(
        &self,
        question_id: DbId,
        member_id: &str,
    ) -> Result<CompletionState, CoreError> {
        let question_id = QuestionId::new(question_id)?;
        let member_id = MemberId::parse(member_id)?;

        for attempt in 1..=MAX_TOGGLE_ATTEMPTS {
            let state = match self.store.toggle_completion(&member_id, question_id).await? {
                ToggleOutcome::Created => CompletionState::Present,
                ToggleOutcome::Removed => CompletionState::Absent,
                ToggleOutcome::Contended => {
                    tracing::debug!(%member_id, %question_id, attempt, "Toggle contended, re-issuing");
                    continue;
                }
            };

            tracing::info!(%member_id, %question_id, ?state, "Question completion toggled");
            return Ok(state);
        }

        tracing::warn!(%member_id, %question_id, "Toggle still contended after retries");
        Err(CoreError::Conflict(format!(
            "completion of question {question_id} for member {member_id} is being toggled concurrently"
        )))
    }

    /// Questions the member has completed.
    pub async fn list_completed(&self, member_id: &str) -> Result<Vec<QuestionId>, CoreError> {
        let member_id = MemberId::parse(member_id)?;
        Ok(self.store.list_completed(&member_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use assert_matches::assert_matches;
    use async_trait::async_trait;

    use super::*;
    use crate::memory::MemoryRelationStore;
    use crate::store::{OwnerLookup, RelationStoreError, SwapOutcome};
    use crate::types::{MembershipPair, OwnerRef, ResourceRef};

    fn setup() -> (Arc<MemoryRelationStore>, ProgressToggle) {
        let store = Arc::new(MemoryRelationStore::new());
        store.add_member(&MemberId::parse("m1").unwrap());
        let toggle = ProgressToggle::new(store.clone());
        (store, toggle)
    }

    #[tokio::test]
    async fn toggle_is_self_inverse() {
        let (_store, progress) = setup();

        assert_eq!(progress.toggle(3, "m1").await.unwrap(), CompletionState::Present);
        assert_eq!(progress.list_completed("m1").await.unwrap(), vec![QuestionId::new(3).unwrap()]);
        assert_eq!(progress.toggle(3, "m1").await.unwrap(), CompletionState::Absent);
        assert!(progress.list_completed("m1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_completed_is_per_member() {
        let (store, progress) = setup();
        store.add_member(&MemberId::parse("m2").unwrap());

        progress.toggle(1, "m1").await.unwrap();
        progress.toggle(2, "m1").await.unwrap();
        progress.toggle(2, "m2").await.unwrap();

        let ids: Vec<DbId> = progress
            .list_completed("m1")
            .await
            .unwrap()
            .into_iter()
            .map(QuestionId::get)
            .collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn rejects_malformed_ids() {
        let (_store, progress) = setup();
        assert_matches!(progress.toggle(0, "m1").await, Err(CoreError::InvalidInput(_)));
        assert_matches!(progress.toggle(-1, "m1").await, Err(CoreError::InvalidInput(_)));
        assert_matches!(progress.toggle(1, " ").await, Err(CoreError::InvalidInput(_)));
        assert_matches!(progress.list_completed("").await, Err(CoreError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn store_outage_is_not_retried() {
        let (store, progress) = setup();
        store.set_unavailable(true);
        assert_matches!(progress.toggle(1, "m1").await, Err(CoreError::StoreUnavailable(_)));
    }

    #[tokio::test]
    async fn concurrent_toggles_follow_parity() {
        for n in [1usize, 2, 7, 16] {
            let (_store, progress) = setup();
            let calls = (0..n).map(|_| {
                let progress = progress.clone();
                tokio::spawn(async move { progress.toggle(9, "m1").await })
            });
            for result in futures::future::join_all(calls).await {
                result.unwrap().unwrap();
            }

            let completed = progress.list_completed("m1").await.unwrap();
            assert_eq!(completed.len(), n % 2, "n = {n}");
        }
    }

    /// Store whose toggle reports `Contended` a fixed number of times
    /// before delegating.
    struct ContendedStore {
        inner: MemoryRelationStore,
        contentions_left: AtomicUsize,
    }

    #[async_trait]
    impl RelationStore for ContendedStore {
        async fn insert_memberships(&self, pairs: &[MembershipPair]) -> Result<u64, RelationStoreError> {
            self.inner.insert_memberships(pairs).await
        }

        async fn delete_membership(&self, pair: &MembershipPair) -> Result<bool, RelationStoreError> {
            self.inner.delete_membership(pair).await
        }

        async fn list_members(&self, resource: ResourceRef) -> Result<Vec<MemberId>, RelationStoreError> {
            self.inner.list_members(resource).await
        }

        async fn toggle_completion(
            &self,
            member_id: &MemberId,
            question_id: QuestionId,
        ) -> Result<ToggleOutcome, RelationStoreError> {
            let left = self.contentions_left.load(Ordering::SeqCst);
            if left > 0 {
                self.contentions_left.store(left - 1, Ordering::SeqCst);
                return Ok(ToggleOutcome::Contended);
            }
            self.inner.toggle_completion(member_id, question_id).await
        }

        async fn list_completed(&self, member_id: &MemberId) -> Result<Vec<QuestionId>, RelationStoreError> {
            self.inner.list_completed(member_id).await
        }

        async fn find_attachment_ref(&self, owner: &OwnerRef) -> Result<OwnerLookup, RelationStoreError> {
            self.inner.find_attachment_ref(owner).await
        }

        async fn swap_attachment_ref(
            &self,
            owner: &OwnerRef,
            expected: Option<&str>,
            new: Option<&str>,
        ) -> Result<SwapOutcome, RelationStoreError> {
            self.inner.swap_attachment_ref(owner, expected, new).await
        }

        async fn delete_resource(&self, resource: ResourceRef) -> Result<bool, RelationStoreError> {
            self.inner.delete_resource(resource).await
        }
    }

    fn contended(times: usize) -> ProgressToggle {
        let inner = MemoryRelationStore::new();
        inner.add_member(&MemberId::parse("m1").unwrap());
        ProgressToggle::new(Arc::new(ContendedStore {
            inner,
            contentions_left: AtomicUsize::new(times),
        }))
    }

    #[tokio::test]
    async fn contended_toggle_is_reissued() {
        let progress = contended(3);
        assert_eq!(progress.toggle(4, "m1").await.unwrap(), CompletionState::Present);
    }

    #[tokio::test]
    async fn persistent_contention_is_a_conflict() {
        let progress = contended(MAX_TOGGLE_ATTEMPTS);
        assert_matches!(progress.toggle(4, "m1").await, Err(CoreError::Conflict(_)));
        assert!(progress.list_completed("m1").await.unwrap().is_empty());
    }
}
