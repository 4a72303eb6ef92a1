// SPDX-FileCopyrightText: 2026 Enlist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! MTProto user-account client built on grammers.

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use enlist_config::model::TelegramConfig;
use enlist_core::{EnlistError, EntityKind, Member, MessagingClient, ResolvedEntity};
use grammers_client::types::{Chat, LoginToken, PasswordToken};
use grammers_client::{Client, Config, InitParams, InvocationError, SignInError};
use grammers_session::{PackedChat, PackedType, Session};
use grammers_tl_types as tl;
use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, info};

use crate::link::{Lookup, lookup_for};
use crate::rpc::{classify_message, classify_rpc};

/// Offset of marked channel ids (`-100...`).
const CHANNEL_ID_OFFSET: i64 = 1_000_000_000_000;

/// [`MessagingClient`] over a persisted grammers session.
pub struct MtprotoClient {
    api_id: i32,
    api_hash: String,
    session_path: PathBuf,
    client: OnceCell<Client>,
    /// Pending login tokens keyed by the challenge handle given to callers.
    login_tokens: Mutex<HashMap<String, LoginToken>>,
    password_token: Mutex<Option<PasswordToken>>,
}

impl MtprotoClient {
    /// Creates an unconnected client.
    ///
    /// Requires `telegram.api_id` and `telegram.api_hash`.
    pub fn new(config: &TelegramConfig) -> Result<Self, EnlistError> {
        let (Some(api_id), Some(api_hash)) = (config.api_id, config.api_hash.clone()) else {
            return Err(EnlistError::Config(
                "telegram.api_id and telegram.api_hash are required".into(),
            ));
        };

        Ok(Self {
            api_id,
            api_hash,
            session_path: config.session_path(),
            client: OnceCell::new(),
            login_tokens: Mutex::new(HashMap::new()),
            password_token: Mutex::new(None),
        })
    }

    async fn client(&self) -> Result<&Client, EnlistError> {
        self.client.get_or_try_init(|| self.open()).await
    }

    async fn open(&self) -> Result<Client, EnlistError> {
        if let Some(dir) = self.session_path.parent() {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| EnlistError::Config(format!("cannot create session dir: {e}")))?;
        }
        let session = Session::load_file_or_create(&self.session_path).map_err(|e| {
            EnlistError::Config(format!(
                "cannot open session {}: {e}",
                self.session_path.display()
            ))
        })?;

        let client = Client::connect(Config {
            session,
            api_id: self.api_id,
            api_hash: self.api_hash.clone(),
            params: init_params(),
        })
        .await
        .map_err(|e| EnlistError::Transport {
            message: e.to_string(),
            source: None,
        })?;

        info!(session = %self.session_path.display(), "connected to telegram");
        Ok(client)
    }
}

/// Connection parameters. Flood waits surface as [`EnlistError::FloodWait`]
/// instead of being slept through and retried inside the client.
fn init_params() -> InitParams {
    InitParams {
        flood_sleep_threshold: 0,
        ..InitParams::default()
    }
}

fn map_invocation(err: InvocationError) -> EnlistError {
    match err {
        InvocationError::Rpc(rpc) => classify_rpc(rpc.code, &rpc.name, rpc.value),
        other => EnlistError::Transport {
            message: other.to_string(),
            source: None,
        },
    }
}

fn map_sign_in(err: SignInError) -> EnlistError {
    match err {
        SignInError::InvalidCode => EnlistError::Login("PHONE_CODE_INVALID".into()),
        SignInError::InvalidPassword => EnlistError::Login("PASSWORD_HASH_INVALID".into()),
        SignInError::Other(e) => map_invocation(e),
        other => EnlistError::Login(other.to_string()),
    }
}

fn kind_of(ty: PackedType) -> EntityKind {
    match ty {
        PackedType::User | PackedType::Bot => EntityKind::User,
        PackedType::Chat => EntityKind::Group,
        _ => EntityKind::Channel,
    }
}

fn entity_from_chat(chat: &Chat) -> ResolvedEntity {
    let packed = chat.pack();
    ResolvedEntity {
        id: packed.id,
        kind: kind_of(packed.ty),
        access_hash: packed.access_hash,
        title: Some(chat.name().to_string()),
    }
}

fn entity_from_tl(chat: &tl::enums::Chat) -> Option<ResolvedEntity> {
    let (id, kind, access_hash, title) = match chat {
        tl::enums::Chat::Empty(_) => return None,
        tl::enums::Chat::Chat(c) => (c.id, EntityKind::Group, None, c.title.clone()),
        tl::enums::Chat::Forbidden(c) => (c.id, EntityKind::Group, None, c.title.clone()),
        tl::enums::Chat::Channel(c) => (c.id, EntityKind::Channel, c.access_hash, c.title.clone()),
        tl::enums::Chat::ChannelForbidden(c) => {
            (c.id, EntityKind::Channel, Some(c.access_hash), c.title.clone())
        }
    };
    Some(ResolvedEntity {
        id,
        kind,
        access_hash,
        title: Some(title),
    })
}

fn packed_for(entity: &ResolvedEntity) -> PackedChat {
    PackedChat {
        ty: match entity.kind {
            EntityKind::User => PackedType::User,
            EntityKind::Group => PackedType::Chat,
            EntityKind::Channel => PackedType::Megagroup,
        },
        id: entity.id,
        access_hash: entity.access_hash,
    }
}

/// Whether `id` names this peer, bare or in marked (`-id`, `-100id`) form.
fn id_matches(packed: &PackedChat, id: i64) -> bool {
    let marked = match packed.ty {
        PackedType::User | PackedType::Bot => packed.id,
        PackedType::Chat => -packed.id,
        _ => -(CHANNEL_ID_OFFSET + packed.id),
    };
    packed.id == id || marked == id
}

#[async_trait]
impl MessagingClient for MtprotoClient {
    async fn connect(&self) -> Result<(), EnlistError> {
        self.client().await.map(drop)
    }

    async fn is_authorized(&self) -> Result<bool, EnlistError> {
        self.client()
            .await?
            .is_authorized()
            .await
            .map_err(map_invocation)
    }

    async fn request_login_code(&self, phone: &str) -> Result<String, EnlistError> {
        let token = self
            .client()
            .await?
            .request_login_code(phone)
            .await
            .map_err(|e| {
                let message = e.to_string();
                classify_message(&message).unwrap_or(EnlistError::Login(message))
            })?;

        let challenge = uuid::Uuid::new_v4().to_string();
        self.login_tokens
            .lock()
            .await
            .insert(challenge.clone(), token);
        Ok(challenge)
    }

    async fn sign_in(&self, _phone: &str, code: &str, challenge: &str) -> Result<(), EnlistError> {
        let client = self.client().await?;
        let mut tokens = self.login_tokens.lock().await;
        let token = tokens
            .get(challenge)
            .ok_or_else(|| EnlistError::Login("unknown or expired login challenge".into()))?;

        match client.sign_in(token, code.trim()).await {
            Ok(_) => {
                tokens.remove(challenge);
                Ok(())
            }
            Err(SignInError::PasswordRequired(password_token)) => {
                tokens.remove(challenge);
                *self.password_token.lock().await = Some(password_token);
                debug!("account requires a two-factor password");
                Err(EnlistError::PasswordRequired)
            }
            Err(e) => Err(map_sign_in(e)),
        }
    }

    async fn check_password(&self, password: &str) -> Result<(), EnlistError> {
        let client = self.client().await?;
        let mut pending = self.password_token.lock().await;
        let token = pending
            .clone()
            .ok_or_else(|| EnlistError::Login("no pending two-factor challenge".into()))?;

        match client.check_password(token, password.trim()).await {
            Ok(_) => {
                *pending = None;
                Ok(())
            }
            // A wrong password leaves the challenge open for another attempt.
            Err(e @ SignInError::InvalidPassword) => Err(map_sign_in(e)),
            Err(e) => {
                *pending = None;
                Err(map_sign_in(e))
            }
        }
    }

    async fn save_session(&self) -> Result<(), EnlistError> {
        self.client()
            .await?
            .session()
            .save_to_file(&self.session_path)
            .map_err(EnlistError::transport)
    }

    async fn import_chat_invite(&self, hash: &str) -> Result<(), EnlistError> {
        let request = tl::functions::messages::ImportChatInvite {
            hash: hash.to_string(),
        };
        self.client()
            .await?
            .invoke(&request)
            .await
            .map(drop)
            .map_err(map_invocation)
    }

    async fn check_chat_invite(&self, hash: &str) -> Result<Option<ResolvedEntity>, EnlistError> {
        let request = tl::functions::messages::CheckChatInvite {
            hash: hash.to_string(),
        };
        let invite = self
            .client()
            .await?
            .invoke(&request)
            .await
            .map_err(map_invocation)?;

        Ok(match invite {
            tl::enums::ChatInvite::Already(already) => entity_from_tl(&already.chat),
            tl::enums::ChatInvite::Peek(peek) => entity_from_tl(&peek.chat),
            tl::enums::ChatInvite::Invite(_) => None,
        })
    }

    async fn resolve(&self, reference: &str) -> Result<Option<ResolvedEntity>, EnlistError> {
        let client = self.client().await?;
        match lookup_for(reference) {
            Some(Lookup::Username(name)) => Ok(client
                .resolve_username(&name)
                .await
                .map_err(map_invocation)?
                .map(|chat| entity_from_chat(&chat))),
            Some(Lookup::Id(id)) => {
                // Numeric ids are only addressable through a known dialog.
                let mut dialogs = client.iter_dialogs();
                while let Some(dialog) = dialogs.next().await.map_err(map_invocation)? {
                    let chat = dialog.chat();
                    if id_matches(&chat.pack(), id) {
                        return Ok(Some(entity_from_chat(chat)));
                    }
                }
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn participants(&self, group: &ResolvedEntity) -> Result<Vec<Member>, EnlistError> {
        let client = self.client().await?;
        let mut iter = client.iter_participants(packed_for(group));
        let mut members = Vec::new();

        while let Some(participant) = iter.next().await.map_err(map_invocation)? {
            let user = &participant.user;
            members.push(Member {
                id: user.id(),
                access_hash: user.pack().access_hash,
                username: user.username().map(String::from),
            });
        }

        debug!(group = %group.label(), count = members.len(), "participants fetched");
        Ok(members)
    }

    async fn invite_to_channel(
        &self,
        channel: &ResolvedEntity,
        member: &Member,
    ) -> Result<(), EnlistError> {
        let client = self.client().await?;
        let user = tl::enums::InputUser::User(tl::types::InputUser {
            user_id: member.id,
            access_hash: member.access_hash.unwrap_or_default(),
        });

        let result = match channel.kind {
            EntityKind::Channel => {
                let request = tl::functions::channels::InviteToChannel {
                    channel: tl::enums::InputChannel::Channel(tl::types::InputChannel {
                        channel_id: channel.id,
                        access_hash: channel.access_hash.unwrap_or_default(),
                    }),
                    users: vec![user],
                };
                client.invoke(&request).await.map(drop)
            }
            EntityKind::Group => {
                let request = tl::functions::messages::AddChatUser {
                    chat_id: channel.id,
                    user_id: user,
                    fwd_limit: 0,
                };
                client.invoke(&request).await.map(drop)
            }
            EntityKind::User => {
                return Err(EnlistError::Rpc {
                    code: 400,
                    name: "PEER_ID_INVALID".into(),
                });
            }
        };

        result.map_err(|e| match map_invocation(e) {
            EnlistError::PrivacyRestricted { .. } => EnlistError::PrivacyRestricted {
                user_id: member.id,
            },
            other => other,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marked_ids_match_their_peer() {
        let channel = PackedChat {
            ty: PackedType::Megagroup,
            id: 1234567890,
            access_hash: Some(1),
        };
        assert!(id_matches(&channel, 1234567890));
        assert!(id_matches(&channel, -1001234567890));
        assert!(!id_matches(&channel, -1234567890));

        let chat = PackedChat {
            ty: PackedType::Chat,
            id: 42,
            access_hash: None,
        };
        assert!(id_matches(&chat, -42));
    }

    #[test]
    fn flood_waits_are_never_slept_through() {
        assert_eq!(init_params().flood_sleep_threshold, 0);
    }

    #[test]
    fn missing_credentials_are_a_config_error() {
        let config = TelegramConfig::default();
        assert!(matches!(
            MtprotoClient::new(&config),
            Err(EnlistError::Config(_))
        ));
    }
}
