//! Session context: configuration, shared gateway and logging lifecycle
//!
//! A host builds one context, calls [`SessionContext::init`] at startup and
//! [`SessionContext::shutdown`] before exit, and hands the context to every
//! [`super::EditorSession`] it creates. The document itself never lives
//! here.

use super::SessionError;
use crate::config::EditorConfig;
use crate::gateway::CallGateway;
use crate::logging;
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct SessionContext {
    config: EditorConfig,
    gateway: Arc<CallGateway>,
}

impl SessionContext {
    /// Context over the engine compiled into this library
    pub fn new(config: EditorConfig) -> Self {
        Self::with_gateway(config, Arc::new(CallGateway::linked()))
    }

    pub fn with_gateway(config: EditorConfig, gateway: Arc<CallGateway>) -> Self {
        Self { config, gateway }
    }

    pub fn from_config_file(path: &Path) -> Result<Self, SessionError> {
        Ok(Self::new(EditorConfig::load(path)?))
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn gateway(&self) -> &Arc<CallGateway> {
        &self.gateway
    }

    /// Install the log backend and apply the configured level
    ///
    /// Only the first call in a process installs a backend; later calls (or
    /// a backend installed by the host beforehand) just update the level,
    /// up or down.
    pub fn init(&self) -> Result<(), SessionError> {
        let level = self.config.log.level_filter()?;
        let file = self.config.log.file.as_deref();

        logging::init(level, file).map_err(|source| SessionError::Io {
            path: file.map(Path::to_path_buf).unwrap_or_default(),
            source,
        })?;

        log::info!("Plan editor session context initialized (log level {})", level);
        Ok(())
    }

    /// Flush buffered log output
    pub fn shutdown(&self) {
        log::info!("Plan editor session context shutting down");
        logging::flush();
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_repeatable() {
        let ctx = SessionContext::default();
        ctx.init().unwrap();
        ctx.init().unwrap();
        ctx.shutdown();
    }

    #[test]
    fn test_init_rejects_bad_level() {
        let mut config = EditorConfig::default();
        config.log.level = "chatty".to_string();
        let ctx = SessionContext::new(config);
        assert!(matches!(ctx.init(), Err(SessionError::Config(_))));
    }

    #[test]
    fn test_contexts_share_gateway_when_cloned() {
        let ctx = SessionContext::default();
        let other = ctx.clone();
        assert!(Arc::ptr_eq(ctx.gateway(), other.gateway()));
    }
}
