//! In-process vault.
//!
//! Holds folders, resources, groups and users in memory, optionally
//! persisted to a JSON file so a `file://` server survives between runs.
//! Values are stored in plaintext: this backend is for tests, demos and
//! offline work, never for real secrets.
//!
//! Tests can inject failures with [`LocalBackend::fail_next`],
//! [`LocalBackend::fail_resource`] and [`LocalBackend::set_latency`].
//! Failing resources are saved with the vault, so they also hold for another
//! process opening the same file.

use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, trace};

use super::{same_name, Backend};
use crate::core::constants;
use crate::core::domain::{
    Folder, Group, GroupMember, Holder, MembershipChange, Permission, PermissionLevel, Resource,
    Target, User,
};
use crate::core::types::{FolderId, ResourceId};
use crate::error::{Result, VaultError};

/// Kind of failure to inject.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    /// The session was rejected.
    Auth,
    /// The request failed.
    Request,
}

impl Failure {
    fn into_error(self) -> VaultError {
        match self {
            Self::Auth => VaultError::Auth("session expired".to_string()),
            Self::Request => VaultError::Request("injected failure".to_string()),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct State {
    #[serde(default)]
    folders: Vec<StoredFolder>,
    #[serde(default)]
    resources: Vec<StoredResource>,
    #[serde(default)]
    groups: Vec<Group>,
    #[serde(default)]
    users: Vec<User>,
    #[serde(default, skip_serializing_if = "HashSet::is_empty")]
    failing: HashSet<ResourceId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredFolder {
    id: FolderId,
    name: String,
    #[serde(default)]
    parent_id: Option<FolderId>,
    #[serde(default)]
    permissions: Vec<Permission>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredResource {
    id: ResourceId,
    folder_id: FolderId,
    name: String,
    value: String,
}

#[derive(Debug, Default)]
struct Injected {
    next: Option<(Failure, usize)>,
    latency: Option<Duration>,
}

#[cfg(unix)]
fn set_private(file: &std::fs::File) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(std::fs::Permissions::from_mode(constants::VAULT_FILE_MODE))
}

#[cfg(not(unix))]
fn set_private(_file: &std::fs::File) -> std::io::Result<()> {
    Ok(())
}

/// In-memory vault, optionally backed by a JSON file.
#[derive(Debug, Default)]
pub struct LocalBackend {
    state: Mutex<State>,
    path: Option<PathBuf>,
    injected: Mutex<Injected>,
    logins: AtomicUsize,
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn poisoned<T>(_: T) -> VaultError {
    VaultError::Request("local vault state is poisoned".to_string())
}

impl LocalBackend {
    /// Empty vault that lives only in memory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a vault file, starting empty if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let state = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            serde_json::from_str(&contents)?
        } else {
            debug!(path = %path.display(), "local vault file does not exist yet");
            State::default()
        };

        Ok(Self {
            state: Mutex::new(state),
            path: Some(path),
            ..Self::default()
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>> {
        Ok(self.state.lock().map_err(poisoned)?)
    }

    /// Replace the vault file atomically. Owner read/write only on unix.
    fn save(&self, state: &State) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let json = serde_json::to_string_pretty(state)?;
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = NamedTempFile::new_in(dir)?;
        set_private(tmp.as_file())?;
        tmp.write_all(json.as_bytes())?;
        tmp.persist(path).map_err(|e| e.error)?;
        trace!(path = %path.display(), "local vault saved");
        Ok(())
    }

    /// Run `f` against the state and persist the result.
    fn mutate<T>(&self, f: impl FnOnce(&mut State) -> Result<T>) -> Result<T> {
        let mut state = self.lock()?;
        let value = f(&mut state)?;
        self.save(&state)?;
        Ok(value)
    }

    /// Apply latency and consume any injected failure.
    async fn enter(&self, resource: Option<&str>) -> Result<()> {
        let latency = {
            let mut injected = self.injected.lock().map_err(poisoned)?;
            if let Some((failure, remaining)) = injected.next.as_mut() {
                let failure = *failure;
                *remaining -= 1;
                if *remaining == 0 {
                    injected.next = None;
                }
                return Err(failure.into_error().into());
            }
            injected.latency
        };
        let failing = match resource {
            Some(id) => self.lock()?.failing.contains(id),
            None => false,
        };
        if let (true, Some(id)) = (failing, resource) {
            return Err(VaultError::Request(format!("failed to fetch resource {}", id)).into());
        }

        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        Ok(())
    }

    /// Make the next `count` calls fail. Logins are never affected.
    pub fn fail_next(&self, failure: Failure, count: usize) {
        if let Ok(mut injected) = self.injected.lock() {
            injected.next = (count > 0).then_some((failure, count));
        }
    }

    /// Make every fetch of this resource fail.
    ///
    /// # Errors
    ///
    /// Returns error if the vault file cannot be written.
    pub fn fail_resource(&self, id: &str) -> Result<()> {
        self.mutate(|state| {
            state.failing.insert(id.to_string());
            Ok(())
        })
    }

    /// Delay every call.
    pub fn set_latency(&self, latency: Duration) {
        if let Ok(mut injected) = self.injected.lock() {
            injected.latency = Some(latency);
        }
    }

    /// Number of logins so far.
    pub fn login_count(&self) -> usize {
        self.logins.load(Ordering::SeqCst)
    }

    /// Create a folder holding the given secrets. Returns the folder id.
    ///
    /// # Errors
    ///
    /// Returns error if the vault file cannot be written.
    pub fn seed_folder(&self, name: &str, secrets: &[(&str, &str)]) -> Result<FolderId> {
        self.mutate(|state| {
            let id = new_id();
            state.folders.push(StoredFolder {
                id: id.clone(),
                name: name.to_string(),
                parent_id: None,
                permissions: Vec::new(),
            });
            for (key, value) in secrets {
                state.resources.push(StoredResource {
                    id: new_id(),
                    folder_id: id.clone(),
                    name: key.to_string(),
                    value: value.to_string(),
                });
            }
            Ok(id)
        })
    }

    /// Create a user.
    ///
    /// # Errors
    ///
    /// Returns error if the vault file cannot be written.
    pub fn seed_user(&self, username: &str, first_name: &str, last_name: &str) -> Result<User> {
        self.mutate(|state| {
            let user = User {
                id: new_id(),
                username: username.to_string(),
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
            };
            state.users.push(user.clone());
            Ok(user)
        })
    }

    /// Create a group with members given as `(user, is_manager)`.
    ///
    /// # Errors
    ///
    /// Returns error if the vault file cannot be written.
    pub fn seed_group(&self, name: &str, members: &[(&User, bool)]) -> Result<Group> {
        self.mutate(|state| {
            let group = Group {
                id: new_id(),
                name: name.to_string(),
                members: members
                    .iter()
                    .map(|(user, manager)| GroupMember::from_user(user, *manager))
                    .collect(),
            };
            state.groups.push(group.clone());
            Ok(group)
        })
    }

    /// Grant a user or group access to a folder.
    ///
    /// # Errors
    ///
    /// Returns error if the folder does not exist or the file cannot be written.
    pub fn seed_permission(&self, folder_id: &str, holder: Holder, level: PermissionLevel) -> Result<()> {
        self.mutate(|state| {
            let folder = state
                .folders
                .iter_mut()
                .find(|f| f.id == folder_id)
                .ok_or_else(|| VaultError::FolderNotFound(folder_id.to_string()))?;
            folder.permissions.push(Permission {
                target: Target::Folder(folder_id.to_string()),
                holder,
                level,
            });
            Ok(())
        })
    }

    /// Parent of a folder, if it has one.
    pub fn parent_of(&self, folder_id: &str) -> Option<FolderId> {
        let state = self.lock().ok()?;
        state
            .folders
            .iter()
            .find(|f| f.id == folder_id)
            .and_then(|f| f.parent_id.clone())
    }

    /// Value of the secret `key` in the folder named `folder`.
    pub fn secret(&self, folder: &str, key: &str) -> Option<String> {
        let state = self.lock().ok()?;
        let folder = state.folders.iter().find(|f| f.name == folder)?;
        state
            .resources
            .iter()
            .find(|r| r.folder_id == folder.id && r.name == key)
            .map(|r| r.value.clone())
    }

    /// Id of the resource `key` in the folder named `folder`.
    pub fn resource_id(&self, folder: &str, key: &str) -> Option<ResourceId> {
        let state = self.lock().ok()?;
        let folder = state.folders.iter().find(|f| f.name == folder)?;
        state
            .resources
            .iter()
            .find(|r| r.folder_id == folder.id && r.name == key)
            .map(|r| r.id.clone())
    }
}

impl State {
    fn folder_view(&self, folder: &StoredFolder) -> Folder {
        Folder {
            id: folder.id.clone(),
            name: folder.name.clone(),
            resources: self
                .resources
                .iter()
                .filter(|r| r.folder_id == folder.id)
                .map(|r| Resource {
                    id: r.id.clone(),
                    name: r.name.clone(),
                })
                .collect(),
            permissions: folder.permissions.clone(),
        }
    }

    fn has_folder(&self, id: &str) -> bool {
        self.folders.iter().any(|f| f.id == id)
    }
}

#[async_trait]
impl Backend for LocalBackend {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn login(&self) -> Result<()> {
        self.logins.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn search_folders(&self, query: &str) -> Result<Vec<Folder>> {
        self.enter(None).await?;
        let state = self.lock()?;
        let query = query.to_lowercase();
        Ok(state
            .folders
            .iter()
            .filter(|f| f.name.to_lowercase().contains(&query))
            .map(|f| state.folder_view(f))
            .collect())
    }

    async fn fetch_resource(&self, id: &str) -> Result<(String, String)> {
        self.enter(Some(id)).await?;
        let state = self.lock()?;
        state
            .resources
            .iter()
            .find(|r| r.id == id)
            .map(|r| (r.name.clone(), r.value.clone()))
            .ok_or_else(|| VaultError::ResourceNotFound(id.to_string()).into())
    }

    async fn create_resource(
        &self,
        folder_id: &str,
        name: &str,
        value: &str,
    ) -> Result<ResourceId> {
        self.enter(None).await?;
        self.mutate(|state| {
            if !state.has_folder(folder_id) {
                return Err(VaultError::FolderNotFound(folder_id.to_string()).into());
            }
            let id = new_id();
            state.resources.push(StoredResource {
                id: id.clone(),
                folder_id: folder_id.to_string(),
                name: name.to_string(),
                value: value.to_string(),
            });
            Ok(id)
        })
    }

    async fn update_resource(&self, id: &str, value: &str) -> Result<()> {
        self.enter(Some(id)).await?;
        self.mutate(|state| {
            let resource = state
                .resources
                .iter_mut()
                .find(|r| r.id == id)
                .ok_or_else(|| VaultError::ResourceNotFound(id.to_string()))?;
            resource.value = value.to_string();
            Ok(())
        })
    }

    async fn list_groups(&self) -> Result<Vec<Group>> {
        self.enter(None).await?;
        Ok(self.lock()?.groups.clone())
    }

    async fn create_group(&self, name: &str, members: &[GroupMember]) -> Result<Group> {
        self.enter(None).await?;
        self.mutate(|state| {
            if !members.iter().any(|m| m.is_manager) {
                return Err(VaultError::Request("a group needs at least one manager".into()).into());
            }
            if state.groups.iter().any(|g| same_name(&g.name, name)) {
                return Err(VaultError::Request(format!("group {} already exists", name)).into());
            }
            let group = Group {
                id: new_id(),
                name: name.to_string(),
                members: members.to_vec(),
            };
            state.groups.push(group.clone());
            Ok(group)
        })
    }

    async fn update_group(&self, group_id: &str, changes: &[MembershipChange]) -> Result<()> {
        self.enter(None).await?;
        self.mutate(|state| {
            let index = state
                .groups
                .iter()
                .position(|g| g.id == group_id)
                .ok_or_else(|| VaultError::GroupNotFound(group_id.to_string()))?;

            for change in changes {
                match change {
                    MembershipChange::Add { user_id, is_manager } => {
                        let group = &mut state.groups[index];
                        if let Some(member) = group.members.iter_mut().find(|m| &m.user_id == user_id) {
                            member.is_manager = *is_manager;
                            continue;
                        }
                        let user = state
                            .users
                            .iter()
                            .find(|u| &u.id == user_id)
                            .ok_or_else(|| VaultError::UserNotFound(user_id.clone()))?;
                        let member = GroupMember::from_user(user, *is_manager);
                        state.groups[index].members.push(member);
                    }
                    MembershipChange::Remove { user_id } => {
                        state.groups[index].members.retain(|m| &m.user_id != user_id);
                    }
                }
            }
            Ok(())
        })
    }

    async fn move_folder(&self, folder_id: &str, parent_id: Option<&str>) -> Result<()> {
        self.enter(None).await?;
        self.mutate(|state| {
            if let Some(parent) = parent_id {
                if parent == folder_id || !state.has_folder(parent) {
                    return Err(VaultError::FolderNotFound(parent.to_string()).into());
                }
            }
            let folder = state
                .folders
                .iter_mut()
                .find(|f| f.id == folder_id)
                .ok_or_else(|| VaultError::FolderNotFound(folder_id.to_string()))?;
            folder.parent_id = parent_id.map(str::to_string);
            Ok(())
        })
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        self.enter(None).await?;
        Ok(self.lock()?.users.clone())
    }
}
