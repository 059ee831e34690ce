//! In-memory implementations of the collaborator traits.
//!
//! Used by unit tests here and by the HTTP tests in `club-api`. Each trait
//! method takes the lock once, so every call is atomic just like a single
//! statement against the real stores.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::locator::LocatorFormat;
use crate::store::{
    AttachmentStore, AttachmentStoreError, OwnerLookup, RelationStore, RelationStoreError,
    SwapOutcome, ToggleOutcome,
};
use crate::types::{MemberId, MembershipPair, OwnerRef, QuestionId, ResourceRef};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

// ---------------------------------------------------------------------------
// Attachment store
// ---------------------------------------------------------------------------

/// An object held by [`MemoryAttachmentStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Attachment store backed by a map, with switchable failure injection.
pub struct MemoryAttachmentStore {
    locators: LocatorFormat,
    objects: Mutex<HashMap<String, StoredObject>>,
    fail_writes: AtomicBool,
    fail_removes: AtomicBool,
    offline: AtomicBool,
}

impl MemoryAttachmentStore {
    pub fn new(locators: LocatorFormat) -> Self {
        Self {
            locators,
            objects: Mutex::new(HashMap::new()),
            fail_writes: AtomicBool::new(false),
            fail_removes: AtomicBool::new(false),
            offline: AtomicBool::new(false),
        }
    }

    /// Make every subsequent call fail as if the store were unreachable.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_reachable(&self) -> Result<(), AttachmentStoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(AttachmentStoreError::Unavailable("injected outage".into()));
        }
        Ok(())
    }

    /// Make every subsequent `write` fail (or succeed again).
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent `remove` fail (or succeed again).
    pub fn fail_removes(&self, fail: bool) {
        self.fail_removes.store(fail, Ordering::SeqCst);
    }

    pub fn get(&self, path: &str) -> Option<StoredObject> {
        lock(&self.objects).get(path).cloned()
    }

    pub fn contains(&self, path: &str) -> bool {
        lock(&self.objects).contains_key(path)
    }

    pub fn len(&self) -> usize {
        lock(&self.objects).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl AttachmentStore for MemoryAttachmentStore {
    fn backend_tag(&self) -> &'static str {
        "memory"
    }

    async fn write(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), AttachmentStoreError> {
        self.check_reachable()?;
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AttachmentStoreError::Rejected("injected write failure".into()));
        }
        lock(&self.objects).insert(
            path.to_string(),
            StoredObject {
                bytes,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    async fn remove(&self, path: &str) -> Result<(), AttachmentStoreError> {
        self.check_reachable()?;
        if self.fail_removes.load(Ordering::SeqCst) {
            return Err(AttachmentStoreError::Rejected("injected remove failure".into()));
        }
        lock(&self.objects).remove(path);
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        self.locators.render(path)
    }
}

// ---------------------------------------------------------------------------
// Relation store
// ---------------------------------------------------------------------------

#[derive(Default)]
struct Relations {
    members: HashMap<MemberId, Option<String>>,
    resources: HashMap<ResourceRef, Option<String>>,
    memberships: HashSet<(ResourceRef, MemberId)>,
    completed: BTreeSet<(MemberId, QuestionId)>,
}

impl Relations {
    fn binding_mut(&mut self, owner: &OwnerRef) -> Option<&mut Option<String>> {
        match owner {
            OwnerRef::Member(id) => self.members.get_mut(id),
            OwnerRef::Project(id) => self.resources.get_mut(&ResourceRef::project(*id)),
            OwnerRef::Achievement(id) => self.resources.get_mut(&ResourceRef::achievement(*id)),
        }
    }
}

/// Relation store backed by in-process collections.
///
/// Members and resources must be registered with [`Self::add_member`] and
/// [`Self::add_resource`] before they can be referenced, mirroring the
/// foreign keys of the SQL schema.
#[derive(Default)]
pub struct MemoryRelationStore {
    inner: Mutex<Relations>,
    unavailable: AtomicBool,
}

impl MemoryRelationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_member(&self, id: &MemberId) {
        lock(&self.inner).members.entry(id.clone()).or_insert(None);
    }

    pub fn add_resource(&self, resource: ResourceRef) {
        lock(&self.inner).resources.entry(resource).or_insert(None);
    }

    /// Make every subsequent call fail as if the datastore were down.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn has_resource(&self, resource: ResourceRef) -> bool {
        lock(&self.inner).resources.contains_key(&resource)
    }

    fn check_available(&self) -> Result<(), RelationStoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(RelationStoreError::Unavailable("injected outage".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl RelationStore for MemoryRelationStore {
    async fn insert_memberships(&self, pairs: &[MembershipPair]) -> Result<u64, RelationStoreError> {
        self.check_available()?;
        let mut inner = lock(&self.inner);

        for pair in pairs {
            if !inner.resources.contains_key(&pair.resource) {
                return Err(RelationStoreError::MissingReference {
                    entity: pair.resource.kind.label(),
                    key: pair.resource.id.to_string(),
                });
            }
            if !inner.members.contains_key(&pair.member_id) {
                return Err(RelationStoreError::MissingReference {
                    entity: "Member",
                    key: pair.member_id.to_string(),
                });
            }
        }

        let created = pairs
            .iter()
            .filter(|pair| {
                inner
                    .memberships
                    .insert((pair.resource, pair.member_id.clone()))
            })
            .count();
        Ok(created as u64)
    }

    async fn delete_membership(&self, pair: &MembershipPair) -> Result<bool, RelationStoreError> {
        self.check_available()?;
        Ok(lock(&self.inner)
            .memberships
            .remove(&(pair.resource, pair.member_id.clone())))
    }

    async fn list_members(&self, resource: ResourceRef) -> Result<Vec<MemberId>, RelationStoreError> {
        self.check_available()?;
        let mut members: Vec<MemberId> = lock(&self.inner)
            .memberships
            .iter()
            .filter(|(r, _)| *r == resource)
            .map(|(_, m)| m.clone())
            .collect();
        members.sort();
        Ok(members)
    }

    async fn toggle_completion(
        &self,
        member_id: &MemberId,
        question_id: QuestionId,
    ) -> Result<ToggleOutcome, RelationStoreError> {
        self.check_available()?;
        let mut inner = lock(&self.inner);
        if !inner.members.contains_key(member_id) {
            return Err(RelationStoreError::MissingReference {
                entity: "Member",
                key: member_id.to_string(),
            });
        }
        let key = (member_id.clone(), question_id);
        if inner.completed.remove(&key) {
            Ok(ToggleOutcome::Removed)
        } else {
            inner.completed.insert(key);
            Ok(ToggleOutcome::Created)
        }
    }

    async fn list_completed(&self, member_id: &MemberId) -> Result<Vec<QuestionId>, RelationStoreError> {
        self.check_available()?;
        Ok(lock(&self.inner)
            .completed
            .iter()
            .filter(|(m, _)| m == member_id)
            .map(|(_, q)| *q)
            .collect())
    }

    async fn find_attachment_ref(&self, owner: &OwnerRef) -> Result<OwnerLookup, RelationStoreError> {
        self.check_available()?;
        Ok(match lock(&self.inner).binding_mut(owner) {
            Some(binding) => OwnerLookup::Found {
                attachment_ref: binding.clone(),
            },
            None => OwnerLookup::Missing,
        })
    }

    async fn swap_attachment_ref(
        &self,
        owner: &OwnerRef,
        expected: Option<&str>,
        new: Option<&str>,
    ) -> Result<SwapOutcome, RelationStoreError> {
        self.check_available()?;
        let mut inner = lock(&self.inner);
        let Some(binding) = inner.binding_mut(owner) else {
            return Ok(SwapOutcome::OwnerMissing);
        };
        if binding.as_deref() != expected {
            return Ok(SwapOutcome::Stale);
        }
        *binding = new.map(str::to_string);
        Ok(SwapOutcome::Swapped)
    }

    async fn delete_resource(&self, resource: ResourceRef) -> Result<bool, RelationStoreError> {
        self.check_available()?;
        let mut inner = lock(&self.inner);
        if inner.resources.remove(&resource).is_none() {
            return Ok(false);
        }
        inner.memberships.retain(|(r, _)| *r != resource);
        Ok(true)
    }
}
