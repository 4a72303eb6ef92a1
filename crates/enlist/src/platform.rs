// SPDX-FileCopyrightText: 2026 Enlist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Platform client selection.

use std::sync::Arc;

use enlist_config::EnlistConfig;
use enlist_core::{EnlistError, MessagingClient};

/// Builds the MTProto client from `[telegram]` settings.
#[cfg(feature = "mtproto")]
pub fn build_client(config: &EnlistConfig) -> Result<Arc<dyn MessagingClient>, EnlistError> {
    let client = enlist_telegram::MtprotoClient::new(&config.telegram)?;
    Ok(Arc::new(client))
}

/// Without the `mtproto` feature there is no platform client to build.
#[cfg(not(feature = "mtproto"))]
pub fn build_client(_config: &EnlistConfig) -> Result<Arc<dyn MessagingClient>, EnlistError> {
    Err(EnlistError::Config(
        "this binary was built without a platform client; rebuild with `--features mtproto`"
            .into(),
    ))
}

#[cfg(all(test, not(feature = "mtproto")))]
mod tests {
    use super::*;

    #[test]
    fn missing_platform_is_a_config_error() {
        assert!(matches!(
            build_client(&EnlistConfig::default()),
            Err(EnlistError::Config(msg)) if msg.contains("mtproto")
        ));
    }
}
