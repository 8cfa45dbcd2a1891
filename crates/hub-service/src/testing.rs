//! In-memory repositories and collaborators for tests
//!
//! All four repositories share one [`InMemoryStore`], so joins such as owner
//! emails and file counts behave like the PostgreSQL implementation. Rows are
//! listed newest first by insertion order.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use hub_core::entities::{
    AuditEntryWithActor, AuditLogEntry, FileAttachment, NewUser, Project, ProjectWithOwner, User,
};
use hub_core::traits::{
    AuditLogRepository, FileRepository, InsertOutcome, ObjectStorage, ProjectRepository,
    RepoResult, UserRepository, ViewInvalidator,
};
use hub_core::{DomainError, ProjectStatus, Role, StaleView};
use parking_lot::Mutex;
use uuid::Uuid;

use crate::services::{ServiceContext, SharedSecretVerifier, UploadPolicy};

pub const TEST_WEBHOOK_SECRET: &str = "whsec_test_secret";

/// How `insert_if_absent` misbehaves, to reproduce races deterministically
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InsertConflict {
    #[default]
    None,
    /// A concurrent sign-in inserted the row first and the store reported the conflict
    ConcurrentInsert,
    /// A concurrent insert was immediately followed by a provisioning delete
    ConcurrentInsertThenDelete,
}

#[derive(Debug, Clone)]
struct StoredUser {
    user: User,
    deleted: bool,
}

#[derive(Debug, Default)]
struct State {
    users: Vec<StoredUser>,
    projects: Vec<Project>,
    files: Vec<FileAttachment>,
    audit: Vec<AuditLogEntry>,
    user_writes: usize,
    /// (external id, email) of every user insert or update, in commit order
    email_writes: Vec<(String, String)>,
}

#[derive(Debug, Default)]
struct Faults {
    database_down: bool,
    audit_down: bool,
    insert_conflict: InsertConflict,
}

/// Shared backing state for the in-memory repositories
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<State>>,
    faults: Arc<Mutex<Faults>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every repository call fails with `DatabaseError`
    pub fn set_database_down(&self, down: bool) {
        self.faults.lock().database_down = down;
    }

    /// Only audit appends fail
    pub fn set_audit_down(&self, down: bool) {
        self.faults.lock().audit_down = down;
    }

    pub fn set_insert_conflict(&self, conflict: InsertConflict) {
        self.faults.lock().insert_conflict = conflict;
    }

    fn check_database(&self) -> RepoResult<()> {
        if self.faults.lock().database_down {
            Err(DomainError::DatabaseError("connection refused".to_string()))
        } else {
            Ok(())
        }
    }

    // === Inspection ===

    /// Live and deleted rows for one external id
    pub fn user_rows(&self, external_id: &str) -> usize {
        self.state
            .lock()
            .users
            .iter()
            .filter(|u| u.user.external_id == external_id)
            .count()
    }

    /// Number of user inserts and updates performed
    pub fn user_writes(&self) -> usize {
        self.state.lock().user_writes
    }

    /// Email carried by the most recent committed write for one external id
    pub fn last_email_written(&self, external_id: &str) -> Option<String> {
        self.state
            .lock()
            .email_writes
            .iter()
            .rev()
            .find(|(ext, _)| ext == external_id)
            .map(|(_, email)| email.clone())
    }

    pub fn project(&self, id: Uuid) -> Option<Project> {
        self.state.lock().projects.iter().find(|p| p.id == id).cloned()
    }

    pub fn files(&self) -> Vec<FileAttachment> {
        self.state.lock().files.clone()
    }

    /// Audit entries in append order
    pub fn audit_entries(&self) -> Vec<AuditLogEntry> {
        self.state.lock().audit.clone()
    }

    /// Insert a live user directly, bypassing the reconciler
    pub fn seed_user(&self, external_id: &str, email: &str, role: Role) -> User {
        let mut user = NewUser::new(external_id, email).into_user();
        user.role = role;
        self.state.lock().users.push(StoredUser {
            user: user.clone(),
            deleted: false,
        });
        user
    }

    fn live_user(state: &State, external_id: &str) -> Option<User> {
        state
            .users
            .iter()
            .find(|u| !u.deleted && u.user.external_id == external_id)
            .map(|u| u.user.clone())
    }
}

// ============================================================================
// Repositories
// ============================================================================

#[derive(Debug, Clone)]
pub struct InMemoryUserRepository(InMemoryStore);

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<User>> {
        self.0.check_database()?;
        let state = self.0.state.lock();
        Ok(state
            .users
            .iter()
            .find(|u| !u.deleted && u.user.id == id)
            .map(|u| u.user.clone()))
    }

    async fn find_by_external_id(&self, external_id: &str) -> RepoResult<Option<User>> {
        self.0.check_database()?;
        Ok(InMemoryStore::live_user(&self.0.state.lock(), external_id))
    }

    async fn insert_if_absent(&self, user: &NewUser) -> RepoResult<InsertOutcome> {
        self.0.check_database()?;
        // Give concurrent callers a chance to interleave before the atomic step
        tokio::task::yield_now().await;

        let conflict = self.0.faults.lock().insert_conflict;
        let mut guard = self.0.state.lock();
        let state = &mut *guard;

        if let Some(existing) = state
            .users
            .iter_mut()
            .find(|u| u.user.external_id == user.external_id)
        {
            if existing.deleted {
                return Err(DomainError::DuplicateExternalId(user.external_id.clone()));
            }
            existing.user.email.clone_from(&user.email);
            existing.user.updated_at = Utc::now();
            let refreshed = existing.user.clone();
            state.user_writes += 1;
            state
                .email_writes
                .push((user.external_id.clone(), user.email.clone()));
            return Ok(InsertOutcome::AlreadyExists(refreshed));
        }

        let created = user.clone().into_user();
        state.user_writes += 1;
        match conflict {
            InsertConflict::None => {
                state
                    .email_writes
                    .push((user.external_id.clone(), user.email.clone()));
                state.users.push(StoredUser {
                    user: created.clone(),
                    deleted: false,
                });
                Ok(InsertOutcome::Created(created))
            }
            InsertConflict::ConcurrentInsert | InsertConflict::ConcurrentInsertThenDelete => {
                state.users.push(StoredUser {
                    user: created,
                    deleted: conflict == InsertConflict::ConcurrentInsertThenDelete,
                });
                Err(DomainError::DuplicateExternalId(user.external_id.clone()))
            }
        }
    }

    async fn upsert_by_external_id(&self, user: &NewUser) -> RepoResult<User> {
        self.0.check_database()?;
        let mut state = self.0.state.lock();
        state.user_writes += 1;
        state
            .email_writes
            .push((user.external_id.clone(), user.email.clone()));

        if let Some(stored) = state
            .users
            .iter_mut()
            .find(|u| u.user.external_id == user.external_id)
        {
            stored.user.email.clone_from(&user.email);
            stored.user.updated_at = Utc::now();
            stored.deleted = false;
            return Ok(stored.user.clone());
        }

        let created = user.clone().into_user();
        state.users.push(StoredUser {
            user: created.clone(),
            deleted: false,
        });
        Ok(created)
    }

    async fn soft_delete_by_external_id(&self, external_id: &str) -> RepoResult<bool> {
        self.0.check_database()?;
        let mut guard = self.0.state.lock();
        let state = &mut *guard;
        match state
            .users
            .iter_mut()
            .find(|u| !u.deleted && u.user.external_id == external_id)
        {
            Some(stored) => {
                stored.deleted = true;
                state.user_writes += 1;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn count(&self) -> RepoResult<i64> {
        self.0.check_database()?;
        let live = self.0.state.lock().users.iter().filter(|u| !u.deleted).count();
        Ok(live as i64)
    }
}

#[derive(Debug, Clone)]
pub struct InMemoryProjectRepository(InMemoryStore);

impl InMemoryProjectRepository {
    fn file_count(state: &State, project_id: Uuid) -> i64 {
        state.files.iter().filter(|f| f.project_id == project_id).count() as i64
    }
}

#[async_trait]
impl ProjectRepository for InMemoryProjectRepository {
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Project>> {
        self.0.check_database()?;
        Ok(self.0.project(id))
    }

    async fn create(&self, project: &Project) -> RepoResult<()> {
        self.0.check_database()?;
        self.0.state.lock().projects.push(project.clone());
        Ok(())
    }

    async fn update_status(&self, id: Uuid, status: ProjectStatus) -> RepoResult<Project> {
        self.0.check_database()?;
        let mut state = self.0.state.lock();
        let project = state
            .projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(DomainError::ProjectNotFound(id))?;
        project.status = status;
        project.updated_at = Utc::now();
        Ok(project.clone())
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> RepoResult<Vec<(Project, i64)>> {
        self.0.check_database()?;
        let state = self.0.state.lock();
        Ok(state
            .projects
            .iter()
            .rev()
            .filter(|p| p.owner_id == owner_id)
            .map(|p| (p.clone(), Self::file_count(&state, p.id)))
            .collect())
    }

    async fn list_all_with_owners(&self) -> RepoResult<Vec<ProjectWithOwner>> {
        self.0.check_database()?;
        let state = self.0.state.lock();
        Ok(state
            .projects
            .iter()
            .rev()
            .filter_map(|p| {
                let owner = state.users.iter().find(|u| u.user.id == p.owner_id)?;
                Some(ProjectWithOwner {
                    project: p.clone(),
                    owner_email: owner.user.email.clone(),
                    file_count: Self::file_count(&state, p.id),
                })
            })
            .collect())
    }

    async fn count(&self) -> RepoResult<i64> {
        self.0.check_database()?;
        Ok(self.0.state.lock().projects.len() as i64)
    }
}

#[derive(Debug, Clone)]
pub struct InMemoryFileRepository(InMemoryStore);

#[async_trait]
impl FileRepository for InMemoryFileRepository {
    async fn create(&self, file: &FileAttachment) -> RepoResult<()> {
        self.0.check_database()?;
        self.0.state.lock().files.push(file.clone());
        Ok(())
    }

    async fn list_by_project(&self, project_id: Uuid) -> RepoResult<Vec<FileAttachment>> {
        self.0.check_database()?;
        Ok(self
            .0
            .state
            .lock()
            .files
            .iter()
            .rev()
            .filter(|f| f.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn count(&self) -> RepoResult<i64> {
        self.0.check_database()?;
        Ok(self.0.state.lock().files.len() as i64)
    }
}

#[derive(Debug, Clone)]
pub struct InMemoryAuditLogRepository(InMemoryStore);

#[async_trait]
impl AuditLogRepository for InMemoryAuditLogRepository {
    async fn append(&self, entry: &AuditLogEntry) -> RepoResult<()> {
        self.0.check_database()?;
        if self.0.faults.lock().audit_down {
            return Err(DomainError::DatabaseError("audit_logs unavailable".to_string()));
        }
        self.0.state.lock().audit.push(entry.clone());
        Ok(())
    }

    async fn list_recent(&self, limit: i64) -> RepoResult<Vec<AuditEntryWithActor>> {
        self.0.check_database()?;
        let state = self.0.state.lock();
        let limit = usize::try_from(limit).unwrap_or(0);
        Ok(state
            .audit
            .iter()
            .rev()
            .take(limit)
            .map(|entry| AuditEntryWithActor {
                entry: entry.clone(),
                actor_email: state
                    .users
                    .iter()
                    .find(|u| u.user.id == entry.actor_id)
                    .map(|u| u.user.email.clone()),
            })
            .collect())
    }
}

// ============================================================================
// Collaborators
// ============================================================================

/// Object storage keeping everything in memory
#[derive(Debug, Default)]
pub struct MemoryObjectStorage {
    objects: Mutex<Vec<(String, String, usize)>>,
    failing: bool,
}

impl MemoryObjectStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage that rejects every put
    pub fn failing() -> Self {
        Self {
            objects: Mutex::default(),
            failing: true,
        }
    }

    /// `(key, content_type, size)` of every stored object
    pub fn objects(&self) -> Vec<(String, String, usize)> {
        self.objects.lock().clone()
    }
}

#[async_trait]
impl ObjectStorage for MemoryObjectStorage {
    async fn put_object(&self, key: &str, content_type: &str, bytes: &[u8]) -> RepoResult<String> {
        if self.failing {
            return Err(DomainError::StorageError("bucket unavailable".to_string()));
        }
        self.objects
            .lock()
            .push((key.to_string(), content_type.to_string(), bytes.len()));
        Ok(format!("/uploads/{key}"))
    }
}

/// Invalidator that remembers what it was told
#[derive(Debug, Default)]
pub struct RecordingInvalidator {
    views: Mutex<Vec<StaleView>>,
    failing: bool,
}

impl RecordingInvalidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            views: Mutex::default(),
            failing: true,
        }
    }

    pub fn views(&self) -> Vec<StaleView> {
        self.views.lock().clone()
    }
}

#[async_trait]
impl ViewInvalidator for RecordingInvalidator {
    async fn invalidate(&self, views: &[StaleView]) -> RepoResult<()> {
        if self.failing {
            return Err(DomainError::CacheError("publish failed".to_string()));
        }
        self.views.lock().extend_from_slice(views);
        Ok(())
    }
}

// ============================================================================
// Harness
// ============================================================================

/// A [`ServiceContext`] wired to in-memory doubles, with handles to inspect them
pub struct TestContext {
    pub ctx: ServiceContext,
    pub store: InMemoryStore,
    pub storage: Arc<MemoryObjectStorage>,
    pub invalidator: Arc<RecordingInvalidator>,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_collaborators(MemoryObjectStorage::new(), RecordingInvalidator::new())
    }

    pub fn with_collaborators(storage: MemoryObjectStorage, invalidator: RecordingInvalidator) -> Self {
        let store = InMemoryStore::new();
        let storage = Arc::new(storage);
        let invalidator = Arc::new(invalidator);

        let ctx = ServiceContext::builder()
            .user_repo(Arc::new(InMemoryUserRepository(store.clone())))
            .project_repo(Arc::new(InMemoryProjectRepository(store.clone())))
            .file_repo(Arc::new(InMemoryFileRepository(store.clone())))
            .audit_repo(Arc::new(InMemoryAuditLogRepository(store.clone())))
            .object_storage(storage.clone())
            .view_invalidator(invalidator.clone())
            .webhook_verifier(Arc::new(SharedSecretVerifier::new(TEST_WEBHOOK_SECRET)))
            .upload_policy(UploadPolicy::new(1024))
            .build()
            .expect("all dependencies supplied");

        Self {
            ctx,
            store,
            storage,
            invalidator,
        }
    }

    pub fn user(&self, external_id: &str) -> User {
        self.store
            .seed_user(external_id, &format!("{external_id}@example.com"), Role::User)
    }

    pub fn admin(&self, external_id: &str) -> User {
        self.store
            .seed_user(external_id, &format!("{external_id}@example.com"), Role::Admin)
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
