// SPDX-FileCopyrightText: 2026 Enlist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Messaging client trait for the user-account RPC API (MTProto).

use async_trait::async_trait;

use crate::error::EnlistError;
use crate::types::{Member, ResolvedEntity};

/// A connected user-account session on the messaging platform.
///
/// Implementations own the transport and the persisted session token. All
/// platform failures are reported as classified [`EnlistError`] variants so
/// callers can branch on recovery policy without inspecting RPC names.
#[async_trait]
pub trait MessagingClient: Send + Sync + 'static {
    /// Establishes transport connectivity. Calling it again is a no-op.
    async fn connect(&self) -> Result<(), EnlistError>;

    /// Returns true if the persisted session is authorized for an account.
    async fn is_authorized(&self) -> Result<bool, EnlistError>;

    /// Asks the platform to send a login code to `phone`.
    ///
    /// Returns an opaque challenge handle that must be passed to [`sign_in`].
    ///
    /// [`sign_in`]: MessagingClient::sign_in
    async fn request_login_code(&self, phone: &str) -> Result<String, EnlistError>;

    /// Completes the code step of login.
    ///
    /// Fails with [`EnlistError::PasswordRequired`] for two-factor accounts;
    /// the client then keeps the pending password challenge for
    /// [`check_password`](MessagingClient::check_password).
    async fn sign_in(&self, phone: &str, code: &str, challenge: &str)
    -> Result<(), EnlistError>;

    /// Completes a pending two-factor challenge.
    async fn check_password(&self, password: &str) -> Result<(), EnlistError>;

    /// Persists the session token so the next process start is authorized.
    async fn save_session(&self) -> Result<(), EnlistError>;

    /// Joins a private group by invite hash.
    async fn import_chat_invite(&self, hash: &str) -> Result<(), EnlistError>;

    /// Looks up the group behind an invite hash, if it is visible to the account.
    async fn check_chat_invite(&self, hash: &str) -> Result<Option<ResolvedEntity>, EnlistError>;

    /// Generic resolution of a link, handle, or numeric id.
    async fn resolve(&self, reference: &str) -> Result<Option<ResolvedEntity>, EnlistError>;

    /// Fetches the complete membership of a group, in platform order.
    async fn participants(&self, group: &ResolvedEntity) -> Result<Vec<Member>, EnlistError>;

    /// Invites one user into the target channel.
    async fn invite_to_channel(
        &self,
        channel: &ResolvedEntity,
        member: &Member,
    ) -> Result<(), EnlistError>;
}
