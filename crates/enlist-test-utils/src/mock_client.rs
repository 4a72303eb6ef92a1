// SPDX-FileCopyrightText: 2026 Enlist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted messaging platform for deterministic testing.
//!
//! `MockClient` implements [`MessagingClient`] over in-memory groups,
//! memberships, invite links, and per-user invite failures. Every platform
//! call is recorded for assertions.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use enlist_core::{EnlistError, EntityKind, Member, MessagingClient, ResolvedEntity};

/// A failure the mock returns for an invite attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedFailure {
    PrivacyRestricted,
    FloodWait(u64),
    Rpc(&'static str),
    Transport,
}

impl ScriptedFailure {
    fn to_error(&self, user_id: i64) -> EnlistError {
        match self {
            Self::PrivacyRestricted => EnlistError::PrivacyRestricted { user_id },
            Self::FloodWait(seconds) => EnlistError::FloodWait { seconds: *seconds },
            Self::Rpc(name) => EnlistError::Rpc {
                code: 400,
                name: (*name).to_string(),
            },
            Self::Transport => EnlistError::Transport {
                message: "connection reset".into(),
                source: None,
            },
        }
    }
}

/// A recorded platform call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ImportInvite(String),
    CheckInvite(String),
    Resolve(String),
    Participants(i64),
    Invite { channel: i64, user: i64 },
}

#[derive(Default)]
struct LoginScript {
    code: String,
    password: Option<String>,
    rejected_phones: HashSet<String>,
    throttled: bool,
    challenges: HashMap<String, String>,
    password_pending: bool,
}

/// In-memory stand-in for the platform client.
pub struct MockClient {
    groups: HashMap<String, ResolvedEntity>,
    invites: HashMap<String, ResolvedEntity>,
    joined_invites: Mutex<HashSet<String>>,
    members: HashMap<i64, Vec<Member>>,
    failures: HashMap<i64, ScriptedFailure>,
    fail_connect: bool,
    connected: AtomicBool,
    authorized: AtomicBool,
    saves: AtomicUsize,
    login: Mutex<LoginScript>,
    calls: Mutex<Vec<Call>>,
}

/// Shorthand for a supergroup/channel entity.
pub fn channel(id: i64, title: &str) -> ResolvedEntity {
    ResolvedEntity {
        id,
        kind: EntityKind::Channel,
        access_hash: Some(id * 7),
        title: Some(title.to_string()),
    }
}

/// Members with the given ids, in order.
pub fn members(ids: &[i64]) -> Vec<Member> {
    ids.iter().copied().map(Member::new).collect()
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockClient {
    /// An unauthorized client with no groups. The login code is `12345`.
    pub fn new() -> Self {
        Self {
            groups: HashMap::new(),
            invites: HashMap::new(),
            joined_invites: Mutex::new(HashSet::new()),
            members: HashMap::new(),
            failures: HashMap::new(),
            fail_connect: false,
            connected: AtomicBool::new(false),
            authorized: AtomicBool::new(false),
            saves: AtomicUsize::new(0),
            login: Mutex::new(LoginScript {
                code: "12345".to_string(),
                ..LoginScript::default()
            }),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Registers a group resolvable by `reference`, with its membership.
    pub fn with_group(mut self, reference: &str, entity: ResolvedEntity, list: Vec<Member>) -> Self {
        self.members.insert(entity.id, list);
        self.groups.insert(reference.to_string(), entity);
        self
    }

    /// Registers a private invite hash that leads to `entity`.
    ///
    /// The entity is only discoverable through the invite lookup; generic
    /// resolution of the link fails unless the link is also added as a group.
    pub fn with_private_invite(mut self, hash: &str, entity: ResolvedEntity, list: Vec<Member>) -> Self {
        self.members.insert(entity.id, list);
        self.invites.insert(hash.to_string(), entity);
        self
    }

    /// Marks the account as already joined through `hash`.
    pub fn already_joined(self, hash: &str) -> Self {
        lock(&self.joined_invites).insert(hash.to_string());
        self
    }

    /// Makes inviting `user_id` fail with `failure`.
    pub fn with_invite_failure(mut self, user_id: i64, failure: ScriptedFailure) -> Self {
        self.failures.insert(user_id, failure);
        self
    }

    /// Requires a two-factor password after the code step.
    pub fn with_two_factor(self, password: &str) -> Self {
        lock(&self.login).password = Some(password.to_string());
        self
    }

    /// Rejects `phone` as invalid when a code is requested.
    pub fn rejecting_phone(self, phone: &str) -> Self {
        lock(&self.login).rejected_phones.insert(phone.to_string());
        self
    }

    /// Throttles every login code request.
    pub fn throttling_codes(self) -> Self {
        lock(&self.login).throttled = true;
        self
    }

    pub fn authorized(self) -> Self {
        self.authorized.store(true, Ordering::SeqCst);
        self
    }

    pub fn failing_connect(mut self) -> Self {
        self.fail_connect = true;
        self
    }

    /// All recorded calls, in order.
    pub fn calls(&self) -> Vec<Call> {
        lock(&self.calls).clone()
    }

    /// User ids an invite was attempted for, in order.
    pub fn invite_attempts(&self) -> Vec<i64> {
        lock(&self.calls)
            .iter()
            .filter_map(|call| match call {
                Call::Invite { user, .. } => Some(*user),
                _ => None,
            })
            .collect()
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    pub fn session_saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    fn record(&self, call: Call) {
        lock(&self.calls).push(call);
    }
}

impl Default for MockClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessagingClient for MockClient {
    async fn connect(&self) -> Result<(), EnlistError> {
        if self.fail_connect {
            return Err(EnlistError::Transport {
                message: "network unreachable".into(),
                source: None,
            });
        }
        self.connected.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn is_authorized(&self) -> Result<bool, EnlistError> {
        Ok(self.authorized.load(Ordering::SeqCst))
    }

    async fn request_login_code(&self, phone: &str) -> Result<String, EnlistError> {
        let mut login = lock(&self.login);
        if login.rejected_phones.contains(phone) {
            return Err(EnlistError::InvalidPhone(phone.to_string()));
        }
        if login.throttled {
            return Err(EnlistError::FloodWait { seconds: 60 });
        }
        let challenge = format!("challenge-{}", login.challenges.len() + 1);
        login.challenges.insert(phone.to_string(), challenge.clone());
        Ok(challenge)
    }

    async fn sign_in(&self, phone: &str, code: &str, challenge: &str) -> Result<(), EnlistError> {
        let mut login = lock(&self.login);
        if login.challenges.get(phone).map(String::as_str) != Some(challenge) {
            return Err(EnlistError::Login("PHONE_CODE_EXPIRED".into()));
        }
        if code != login.code {
            return Err(EnlistError::Login("PHONE_CODE_INVALID".into()));
        }
        if login.password.is_some() {
            login.password_pending = true;
            return Err(EnlistError::PasswordRequired);
        }
        self.authorized.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn check_password(&self, password: &str) -> Result<(), EnlistError> {
        let mut login = lock(&self.login);
        if !login.password_pending {
            return Err(EnlistError::Login("no pending password challenge".into()));
        }
        if login.password.as_deref() != Some(password) {
            return Err(EnlistError::Login("PASSWORD_HASH_INVALID".into()));
        }
        login.password_pending = false;
        self.authorized.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn save_session(&self) -> Result<(), EnlistError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn import_chat_invite(&self, hash: &str) -> Result<(), EnlistError> {
        self.record(Call::ImportInvite(hash.to_string()));
        if !self.invites.contains_key(hash) {
            return Err(EnlistError::Rpc {
                code: 400,
                name: "INVITE_HASH_INVALID".into(),
            });
        }
        if !lock(&self.joined_invites).insert(hash.to_string()) {
            return Err(EnlistError::AlreadyParticipant);
        }
        Ok(())
    }

    async fn check_chat_invite(&self, hash: &str) -> Result<Option<ResolvedEntity>, EnlistError> {
        self.record(Call::CheckInvite(hash.to_string()));
        if !lock(&self.joined_invites).contains(hash) {
            return Ok(None);
        }
        Ok(self.invites.get(hash).cloned())
    }

    async fn resolve(&self, reference: &str) -> Result<Option<ResolvedEntity>, EnlistError> {
        self.record(Call::Resolve(reference.to_string()));
        Ok(self.groups.get(reference).cloned())
    }

    async fn participants(&self, group: &ResolvedEntity) -> Result<Vec<Member>, EnlistError> {
        self.record(Call::Participants(group.id));
        self.members
            .get(&group.id)
            .cloned()
            .ok_or_else(|| EnlistError::Rpc {
                code: 400,
                name: "CHANNEL_PRIVATE".into(),
            })
    }

    async fn invite_to_channel(
        &self,
        channel: &ResolvedEntity,
        member: &Member,
    ) -> Result<(), EnlistError> {
        self.record(Call::Invite {
            channel: channel.id,
            user: member.id,
        });
        match self.failures.get(&member.id) {
            Some(failure) => Err(failure.to_error(member.id)),
            None => Ok(()),
        }
    }
}
