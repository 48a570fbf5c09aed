//! HTTP backend for Passbolt-style JSON APIs.
//!
//! Every response is wrapped in a `{ "header": ..., "body": ... }` envelope.
//! Secret payloads are ASCII-armored OpenPGP messages handled through
//! [`Gpg`]. The session is a pre-issued bearer token; `login` only checks
//! that the vault still accepts it.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, trace};
use zeroize::Zeroizing;

use super::Backend;
use crate::core::domain::{
    Folder, Group, GroupMember, Holder, MembershipChange, Permission, PermissionLevel, Resource,
    Target, User,
};
use crate::core::gpg::Gpg;
use crate::core::types::ResourceId;
use crate::error::{Result, VaultError};

/// Vault reached over HTTP.
pub struct HttpBackend {
    base_url: String,
    token: Zeroizing<String>,
    client: Client,
    gpg: Gpg,
}

#[derive(Deserialize)]
struct Envelope<T> {
    body: T,
}

#[derive(Deserialize)]
struct Header {
    #[serde(default)]
    message: String,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    header: Header,
}

#[derive(Deserialize)]
struct WireFolder {
    id: String,
    name: String,
    #[serde(default)]
    children_resources: Vec<WireResource>,
    #[serde(default)]
    permissions: Vec<WirePermission>,
}

#[derive(Deserialize)]
struct WireResource {
    id: String,
    name: String,
}

#[derive(Deserialize)]
struct WirePermission {
    aco: String,
    aco_foreign_key: String,
    aro: String,
    aro_foreign_key: String,
    #[serde(rename = "type")]
    level: u32,
}

#[derive(Deserialize)]
struct WireSecret {
    data: String,
}

#[derive(Deserialize, Default)]
struct WireProfile {
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    last_name: String,
}

#[derive(Deserialize)]
struct WireGpgKey {
    fingerprint: String,
}

#[derive(Deserialize)]
struct WireUser {
    id: String,
    username: String,
    #[serde(default = "active_default")]
    active: bool,
    #[serde(default)]
    profile: Option<WireProfile>,
    #[serde(default)]
    gpgkey: Option<WireGpgKey>,
}

fn active_default() -> bool {
    true
}

#[derive(Deserialize)]
struct WireGroupUser {
    #[serde(default)]
    id: String,
    user_id: String,
    #[serde(default)]
    is_admin: bool,
    #[serde(default)]
    user: Option<WireUser>,
}

#[derive(Deserialize)]
struct WireGroup {
    id: String,
    name: String,
    #[serde(default)]
    groups_users: Vec<WireGroupUser>,
}

#[derive(Serialize)]
struct NewMembership<'a> {
    user_id: &'a str,
    is_admin: bool,
}

impl From<WireUser> for User {
    fn from(wire: WireUser) -> Self {
        let profile = wire.profile.unwrap_or_default();
        Self {
            id: wire.id,
            username: wire.username,
            first_name: profile.first_name,
            last_name: profile.last_name,
        }
    }
}

impl From<WireGroup> for Group {
    fn from(wire: WireGroup) -> Self {
        let members = wire
            .groups_users
            .into_iter()
            .map(|gu| {
                let user = gu.user.map(User::from);
                GroupMember {
                    user_id: gu.user_id,
                    username: user.as_ref().map(|u| u.username.clone()).unwrap_or_default(),
                    first_name: user.as_ref().map(|u| u.first_name.clone()).unwrap_or_default(),
                    last_name: user.map(|u| u.last_name).unwrap_or_default(),
                    is_manager: gu.is_admin,
                }
            })
            .collect();
        Self {
            id: wire.id,
            name: wire.name,
            members,
        }
    }
}

impl WirePermission {
    fn into_permission(self) -> Option<Permission> {
        let target = match self.aco.as_str() {
            "Folder" => Target::Folder(self.aco_foreign_key),
            "Resource" => Target::Resource(self.aco_foreign_key),
            _ => return None,
        };
        let holder = match self.aro.as_str() {
            "User" => Holder::User(self.aro_foreign_key),
            "Group" => Holder::Group(self.aro_foreign_key),
            _ => return None,
        };
        let level = PermissionLevel::from_code(self.level)?;
        Some(Permission {
            target,
            holder,
            level,
        })
    }
}

impl From<WireFolder> for Folder {
    fn from(wire: WireFolder) -> Self {
        Self {
            id: wire.id,
            name: wire.name,
            resources: wire
                .children_resources
                .into_iter()
                .map(|r| Resource {
                    id: r.id,
                    name: r.name,
                })
                .collect(),
            permissions: wire
                .permissions
                .into_iter()
                .filter_map(WirePermission::into_permission)
                .collect(),
        }
    }
}

impl HttpBackend {
    /// Backend for the vault at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::Request` if the HTTP client cannot be built.
    pub fn new(base_url: &str, token: Zeroizing<String>, gpg: Gpg) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("dotsync/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| VaultError::Request(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            client,
            gpg,
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        trace!(%method, %url, "vault request");
        self.client
            .request(method, url)
            .bearer_auth(self.token.as_str())
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        not_found: impl FnOnce() -> VaultError,
    ) -> Result<T> {
        let response = request
            .send()
            .await
            .map_err(|e| VaultError::Request(e.to_string()))?;
        let status = response.status();

        if status.is_success() {
            let envelope: Envelope<T> = response
                .json()
                .await
                .map_err(|e| VaultError::Decode(e.to_string()))?;
            return Ok(envelope.body);
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorEnvelope>(&text)
            .map(|e| e.header.message)
            .unwrap_or(text);

        Err(match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => VaultError::Auth(message),
            StatusCode::NOT_FOUND => not_found(),
            _ => VaultError::Request(format!("{}: {}", status.as_u16(), message)),
        }
        .into())
    }

    fn missing_endpoint(path: &str) -> impl FnOnce() -> VaultError + '_ {
        move || VaultError::Request(format!("{} not found", path))
    }

    /// Fingerprints of the users who can read a resource.
    async fn recipients(&self, resource_id: &str) -> Result<Vec<(String, String)>> {
        let path = format!(
            "/users.json?filter[has-access]={}&contain[gpgkey]=1",
            resource_id
        );
        let users: Vec<WireUser> = self
            .send(self.request(Method::GET, &path), || {
                VaultError::ResourceNotFound(resource_id.to_string())
            })
            .await?;

        Ok(users
            .into_iter()
            .filter_map(|u| u.gpgkey.map(|k| (u.id, k.fingerprint)))
            .collect())
    }

    fn own_key(&self) -> Result<String> {
        self.gpg
            .key()
            .map(str::to_string)
            .ok_or_else(|| VaultError::Crypto("no gpg key configured, run dotsync configure".into()).into())
    }
}

#[async_trait]
impl Backend for HttpBackend {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn login(&self) -> Result<()> {
        let path = "/auth/is-authenticated.json";
        let _: serde_json::Value = self
            .send(self.request(Method::GET, path), Self::missing_endpoint(path))
            .await?;
        debug!("vault session accepted");
        Ok(())
    }

    async fn search_folders(&self, query: &str) -> Result<Vec<Folder>> {
        let request = self.request(Method::GET, "/folders.json").query(&[
            ("filter[search]", query),
            ("contain[children_resources]", "1"),
            ("contain[permissions]", "1"),
        ]);
        let folders: Vec<WireFolder> = self
            .send(request, || VaultError::FolderNotFound(query.to_string()))
            .await?;
        Ok(folders.into_iter().map(Folder::from).collect())
    }

    async fn fetch_resource(&self, id: &str) -> Result<(String, String)> {
        let not_found = || VaultError::ResourceNotFound(id.to_string());

        let resource: WireResource = self
            .send(self.request(Method::GET, &format!("/resources/{}.json", id)), not_found)
            .await?;
        let secret: WireSecret = self
            .send(
                self.request(Method::GET, &format!("/secrets/resource/{}.json", id)),
                not_found,
            )
            .await?;

        // gpg blocks; keep it off the runtime thread so fetches overlap
        let gpg = self.gpg.clone();
        let plaintext = tokio::task::spawn_blocking(move || gpg.decrypt(&secret.data))
            .await
            .map_err(|e| VaultError::Crypto(e.to_string()))??;
        Ok((resource.name, plaintext.as_str().to_owned()))
    }

    async fn create_resource(
        &self,
        folder_id: &str,
        name: &str,
        value: &str,
    ) -> Result<ResourceId> {
        let data = self.gpg.encrypt(value, &[self.own_key()?])?;
        let body = json!({
            "name": name,
            "folder_parent_id": folder_id,
            "secrets": [{ "data": data }],
        });
        let created: WireResource = self
            .send(
                self.request(Method::POST, "/resources.json").json(&body),
                || VaultError::FolderNotFound(folder_id.to_string()),
            )
            .await?;
        Ok(created.id)
    }

    async fn update_resource(&self, id: &str, value: &str) -> Result<()> {
        let recipients = self.recipients(id).await?;
        let mut secrets = Vec::with_capacity(recipients.len());
        for (user_id, fingerprint) in &recipients {
            let data = self.gpg.encrypt(value, std::slice::from_ref(fingerprint))?;
            secrets.push(json!({ "user_id": user_id, "data": data }));
        }

        let _: serde_json::Value = self
            .send(
                self.request(Method::PUT, &format!("/resources/{}.json", id))
                    .json(&json!({ "secrets": secrets })),
                || VaultError::ResourceNotFound(id.to_string()),
            )
            .await?;
        Ok(())
    }

    async fn list_groups(&self) -> Result<Vec<Group>> {
        let path = "/groups.json?contain[groups_users.user.profile]=1";
        let groups: Vec<WireGroup> = self
            .send(self.request(Method::GET, path), Self::missing_endpoint(path))
            .await?;
        Ok(groups.into_iter().map(Group::from).collect())
    }

    async fn create_group(&self, name: &str, members: &[GroupMember]) -> Result<Group> {
        let memberships: Vec<NewMembership<'_>> = members
            .iter()
            .map(|m| NewMembership {
                user_id: &m.user_id,
                is_admin: m.is_manager,
            })
            .collect();
        let body = json!({ "name": name, "groups_users": memberships });

        let path = "/groups.json";
        let group: WireGroup = self
            .send(
                self.request(Method::POST, path).json(&body),
                Self::missing_endpoint(path),
            )
            .await?;
        Ok(group.into())
    }

    async fn update_group(&self, group_id: &str, changes: &[MembershipChange]) -> Result<()> {
        let not_found = || VaultError::GroupNotFound(group_id.to_string());
        let current: WireGroup = self
            .send(
                self.request(
                    Method::GET,
                    &format!("/groups/{}.json?contain[groups_users]=1", group_id),
                ),
                not_found,
            )
            .await?;

        let mut entries = Vec::with_capacity(changes.len());
        for change in changes {
            match change {
                MembershipChange::Add {
                    user_id,
                    is_manager,
                } => match current.groups_users.iter().find(|gu| &gu.user_id == user_id) {
                    Some(existing) => {
                        entries.push(json!({ "id": existing.id, "is_admin": is_manager }))
                    }
                    None => entries.push(json!({ "user_id": user_id, "is_admin": is_manager })),
                },
                MembershipChange::Remove { user_id } => {
                    if let Some(existing) = current.groups_users.iter().find(|gu| &gu.user_id == user_id) {
                        entries.push(json!({ "id": existing.id, "delete": true }));
                    }
                }
            }
        }

        let _: serde_json::Value = self
            .send(
                self.request(Method::PUT, &format!("/groups/{}.json", group_id))
                    .json(&json!({ "name": current.name, "groups_users": entries })),
                not_found,
            )
            .await?;
        Ok(())
    }

    async fn move_folder(&self, folder_id: &str, parent_id: Option<&str>) -> Result<()> {
        let _: serde_json::Value = self
            .send(
                self.request(Method::PUT, &format!("/move/folder/{}.json", folder_id))
                    .json(&json!({ "folder_parent_id": parent_id })),
                || VaultError::FolderNotFound(folder_id.to_string()),
            )
            .await?;
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        let path = "/users.json?contain[profile]=1";
        let users: Vec<WireUser> = self
            .send(self.request(Method::GET, path), Self::missing_endpoint(path))
            .await?;
        Ok(users
            .into_iter()
            .filter(|u| u.active)
            .map(User::from)
            .collect())
    }
}
