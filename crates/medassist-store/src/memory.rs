use std::sync::Mutex;

use anyhow::{Result, anyhow};

use crate::TokenStore;

/// Process-local token store. Nothing survives a restart.
#[derive(Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a token already "persisted", as if from an earlier run.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load_token(&self) -> Result<Option<String>> {
        let guard = self.token.lock().map_err(|e| anyhow!("token lock poisoned: {}", e))?;
        Ok(guard.clone())
    }

    fn save_token(&self, token: &str) -> Result<()> {
        let mut guard = self.token.lock().map_err(|e| anyhow!("token lock poisoned: {}", e))?;
        *guard = Some(token.to_string());
        Ok(())
    }

    fn clear_token(&self) -> Result<()> {
        let mut guard = self.token.lock().map_err(|e| anyhow!("token lock poisoned: {}", e))?;
        *guard = None;
        Ok(())
    }
}
