//! Headless event script runner
//!
//! Drives a host context from a line-oriented script. Each line is one
//! command; blank lines and `#` comments are skipped:
//!
//! ```text
//! resize 1024 768   # container changed size, run the resize protocol
//! fit off           # stop refitting on resize
//! theme Dracula     # applies to the next session
//! restart           # start a new session in the same container
//! detach            # remove the container
//! attach 800 600    # provide a new container
//! save              # invoke the save-configuration callback
//! close             # invoke the close-configuration callback
//! end               # end the active session
//! ```

use std::io::BufRead;

use tether_core::{HeadlessContainer, PixelSize};
use tether_session::{ConfigSource, HostContext, Transport};
use thiserror::Error;

use crate::config::FileConfig;

/// Script error
#[derive(Error, Debug)]
pub enum ScriptError {
    /// Script could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A line is not a valid command
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },
}

/// One script command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Resize(PixelSize),
    Fit(bool),
    Theme(String),
    Restart,
    Detach,
    Attach(PixelSize),
    Save,
    Close,
    End,
}

impl Command {
    /// Parse one line; `Ok(None)` for blank lines and comments
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let line = line.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        let command = match word {
            "resize" => Command::Resize(parse_size(rest)?),
            "attach" => Command::Attach(parse_size(rest)?),
            "fit" => match rest {
                "on" | "true" => Command::Fit(true),
                "off" | "false" => Command::Fit(false),
                _ => return Err(format!("expected 'fit on' or 'fit off', got 'fit {}'", rest)),
            },
            "theme" if !rest.is_empty() => Command::Theme(rest.to_string()),
            "theme" => return Err("theme needs a name".to_string()),
            "restart" => Command::Restart,
            "detach" => Command::Detach,
            "save" => Command::Save,
            "close" => Command::Close,
            "end" => Command::End,
            other => return Err(format!("unknown command '{}'", other)),
        };
        Ok(Some(command))
    }
}

fn parse_size(args: &str) -> Result<PixelSize, String> {
    let mut parts = args.split_whitespace().map(str::parse::<u32>);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(Ok(width)), Some(Ok(height)), None) => Ok(PixelSize::new(width, height)),
        _ => Err(format!("expected WIDTH HEIGHT in pixels, got '{}'", args)),
    }
}

/// Counters reported when a script finishes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub commands: usize,
    pub resizes_sent: usize,
    pub sessions_started: usize,
    pub failures: usize,
}

/// Script runner bound to one host
pub struct Runner<F: FnMut() -> Box<dyn Transport>> {
    host: HostContext,
    config: FileConfig,
    connect: F,
    summary: RunSummary,
}

impl<F: FnMut() -> Box<dyn Transport>> Runner<F> {
    /// `connect` opens a fresh transport for every session
    pub fn new(host: HostContext, config: FileConfig, connect: F) -> Self {
        Self {
            host,
            config,
            connect,
            summary: RunSummary::default(),
        }
    }

    pub fn host(&self) -> &HostContext {
        &self.host
    }

    pub fn summary(&self) -> RunSummary {
        self.summary
    }

    /// Start a session and announce its initial geometry
    pub fn start(&mut self) -> bool {
        let transport = (self.connect)();
        match self
            .host
            .start_session(transport, Box::new(self.config.clone()))
        {
            Ok(id) => {
                log::info!("Started {}", id);
                self.summary.sessions_started += 1;
                self.resize();
                true
            }
            Err(e) => {
                log::error!("Failed to start session: {}", e);
                self.summary.failures += 1;
                false
            }
        }
    }

    fn resize(&mut self) {
        match self.host.dispatch_resize() {
            Some(outcome) if outcome.delivered => self.summary.resizes_sent += 1,
            Some(_) => self.summary.failures += 1,
            None => log::debug!("Resize with no active session"),
        }
    }

    /// Execute one command
    pub fn execute(&mut self, command: Command) {
        self.summary.commands += 1;
        match command {
            Command::Resize(size) => {
                match self.host.container_mut() {
                    Some(container) => container.set_pixel_size(size),
                    None => log::warn!("Resize without a container"),
                }
                self.resize();
            }
            Command::Fit(fit) => self.config.set_fit_on_resize(fit),
            Command::Theme(name) => {
                if let Err(e) = self.host.registry().lookup(&name) {
                    log::warn!("{}; the default theme will be used", e);
                }
                self.config.set_theme(name);
            }
            Command::Restart => {
                self.start();
            }
            Command::Detach => {
                self.host.take_container();
            }
            Command::Attach(size) => {
                self.host.set_container(HeadlessContainer::new(size));
            }
            Command::Save => {
                let saved = self
                    .config
                    .current()
                    .and_then(|options| self.host.save_config(&options));
                if let Err(e) = saved {
                    log::error!("Failed to save configuration: {}", e);
                    self.summary.failures += 1;
                }
            }
            Command::Close => {
                self.host.close_config();
            }
            Command::End => self.host.end_session(),
        }
    }

    /// Execute every command in `reader`, stopping at the first syntax error
    pub fn run(&mut self, reader: impl BufRead) -> Result<RunSummary, ScriptError> {
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let command = Command::parse(&line).map_err(|message| ScriptError::Syntax {
                line: index + 1,
                message,
            })?;
            if let Some(command) = command {
                log::debug!("Executing {:?}", command);
                self.execute(command);
            }
        }
        Ok(self.summary)
    }

    /// End the active session and hand back the host
    pub fn finish(mut self) -> HostContext {
        self.host.end_session();
        self.host
    }
}
