//! Configuration accessors
//!
//! A [`ConfigSource`] hands out the current options snapshot on demand.
//! Sessions call it again for every decision that depends on configuration,
//! so an accessor must not assume its previous answer is still in use.

use std::cell::RefCell;
use std::rc::Rc;

use tether_core::{ConfigError, TerminalOptions};

/// Synchronous access to the current options
pub trait ConfigSource {
    fn current(&self) -> Result<TerminalOptions, ConfigError>;
}

impl<F> ConfigSource for F
where
    F: Fn() -> Result<TerminalOptions, ConfigError>,
{
    fn current(&self) -> Result<TerminalOptions, ConfigError> {
        self()
    }
}

/// A fixed snapshot
#[derive(Debug, Clone, Default)]
pub struct StaticConfig(pub TerminalOptions);

impl ConfigSource for StaticConfig {
    fn current(&self) -> Result<TerminalOptions, ConfigError> {
        Ok(self.0.clone())
    }
}

/// A snapshot that can be edited while sessions read it
///
/// Clones share the same options.
#[derive(Debug, Clone, Default)]
pub struct SharedConfig {
    options: Rc<RefCell<TerminalOptions>>,
}

impl SharedConfig {
    pub fn new(options: TerminalOptions) -> Self {
        Self {
            options: Rc::new(RefCell::new(options)),
        }
    }

    /// Edit the options in place
    pub fn update(&self, edit: impl FnOnce(&mut TerminalOptions)) {
        edit(&mut self.options.borrow_mut());
    }

    /// Replace the options wholesale
    pub fn replace(&self, options: TerminalOptions) {
        *self.options.borrow_mut() = options;
    }
}

impl ConfigSource for SharedConfig {
    fn current(&self) -> Result<TerminalOptions, ConfigError> {
        Ok(self.options.borrow().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_config_sees_edits() {
        let config = SharedConfig::new(TerminalOptions::default());
        let reader = config.clone();
        assert!(reader.current().unwrap().fit_on_resize);
        config.update(|o| o.fit_on_resize = false);
        assert!(!reader.current().unwrap().fit_on_resize);
    }

    #[test]
    fn test_closure_source() {
        let source = || -> Result<TerminalOptions, ConfigError> {
            Err(ConfigError::Read("offline".to_string()))
        };
        assert!(source.current().is_err());
    }

    #[test]
    fn test_boxed_static_source() {
        let source: Box<dyn ConfigSource> = Box::new(StaticConfig(TerminalOptions {
            font_size: 14.0,
            ..TerminalOptions::default()
        }));
        assert_eq!(source.current().unwrap().font_size, 14.0);
    }
}
