//! Process-backed Walnut driver.
//!
//! Walnut runs as a JVM child process. The automaton under analysis is
//! written into Walnut's word-automata library as `LL`, `eval` commands are
//! streamed to the prover's stdin, and each verdict is read back from the
//! `Result/<name>.txt` file the prover writes, polled under a deadline.

use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use addax_automata::Automaton;

use crate::oracle::{ProverError, ProverOracle};
use crate::query::{word_automaton_text, ProverQuery};

/// Configuration for a Walnut installation.
#[derive(Debug, Clone)]
pub struct WalnutConfig {
    /// Walnut home directory (contains `bin`, `Word Automata Library`,
    /// `Result`).
    pub home: PathBuf,
    /// JVM binary to launch.
    pub java_bin: String,
    /// Extra JVM arguments (heap sizing and the like).
    pub jvm_args: Vec<String>,
    /// Keep the prover's per-query log files instead of deleting them.
    pub keep_logs: bool,
    /// Delay between polls of the result file.
    pub poll_interval: Duration,
    /// How long to wait for a result file before giving up.
    pub result_timeout: Duration,
}

impl WalnutConfig {
    pub fn new(home: impl Into<PathBuf>) -> Self {
        Self {
            home: home.into(),
            java_bin: "java".to_string(),
            jvm_args: Vec::new(),
            keep_logs: false,
            poll_interval: Duration::from_millis(5),
            result_timeout: Duration::from_secs(600),
        }
    }

    fn class_path(&self) -> PathBuf {
        self.home.join("bin")
    }

    fn library_file(&self) -> PathBuf {
        self.home.join("Word Automata Library").join("LL.txt")
    }

    fn result_dir(&self) -> PathBuf {
        self.home.join("Result")
    }
}

/// A live Walnut session implementing [`ProverOracle`].
#[derive(Debug)]
pub struct WalnutProver {
    config: WalnutConfig,
    child: Option<Child>,
    canonical: Option<String>,
}

impl WalnutProver {
    pub fn new(config: WalnutConfig) -> Self {
        Self {
            config,
            child: None,
            canonical: None,
        }
    }

    pub fn config(&self) -> &WalnutConfig {
        &self.config
    }

    fn ensure_started(&mut self) -> Result<(), ProverError> {
        if self.child.is_some() {
            return Ok(());
        }
        let mut command = Command::new(&self.config.java_bin);
        command
            .args(&self.config.jvm_args)
            .arg("-cp")
            .arg(self.config.class_path())
            .arg("Main.prover")
            .stdin(Stdio::piped())
            // Verdicts arrive through result files; the console streams are
            // not part of the protocol.
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        let child = command.spawn().map_err(|e| ProverError::Spawn {
            command: format!("{} -cp {} Main.prover", self.config.java_bin, self.config.class_path().display()),
            reason: e.to_string(),
        })?;
        debug!(pid = child.id(), "started walnut prover");
        self.child = Some(child);
        Ok(())
    }

    fn submit(&mut self, command_text: &str) -> Result<(), ProverError> {
        self.ensure_started()?;
        if let Some(child) = self.child.as_mut() {
            if let Some(stdin) = child.stdin.as_mut() {
                stdin.write_all(command_text.as_bytes())?;
                stdin.flush()?;
            }
        }
        Ok(())
    }

    fn await_result(&self, name: &str) -> Result<bool, ProverError> {
        let path = self.config.result_dir().join(format!("{name}.txt"));
        let deadline = Instant::now() + self.config.result_timeout;
        loop {
            if let Ok(contents) = fs::read_to_string(&path) {
                if let Some(line) = contents.lines().next() {
                    return match line.trim() {
                        "true" => Ok(true),
                        "false" => Ok(false),
                        other => Err(ProverError::MalformedResponse {
                            name: name.to_string(),
                            response: other.to_string(),
                        }),
                    };
                }
            }
            if Instant::now() >= deadline {
                return Err(ProverError::ResultTimeout {
                    name: name.to_string(),
                    waited_secs: self.config.result_timeout.as_secs(),
                });
            }
            thread::sleep(self.config.poll_interval);
        }
    }

    fn cleanup_artifacts(&self, name: &str) {
        let dir = self.config.result_dir();
        remove_quietly(&dir.join(format!("{name}.txt")));
        remove_quietly(&dir.join(format!("{name}.gv")));
        if !self.config.keep_logs {
            remove_quietly(&dir.join(format!("{name}_log.txt")));
        }
    }
}

fn remove_quietly(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!(path = %path.display(), error = %e, "failed to remove prover artifact");
        }
    }
}

impl ProverOracle for WalnutProver {
    fn load_word_automaton(&mut self, aut: &Automaton) -> Result<(), ProverError> {
        let path = self.config.library_file();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, word_automaton_text(aut))?;
        self.canonical = Some(aut.canonical_description().to_string());
        debug!(automaton = aut.canonical_description(), "loaded word automaton");
        Ok(())
    }

    fn confirm(&mut self, query: &ProverQuery) -> Result<bool, ProverError> {
        let canonical = self
            .canonical
            .clone()
            .ok_or(ProverError::AutomatonNotLoaded)?;
        let name = query.result_name(&canonical);
        self.submit(&query.eval_command(&canonical))?;
        let verdict = self.await_result(&name);
        self.cleanup_artifacts(&name);
        debug!(name, ?verdict, "prover verdict");
        verdict
    }
}

impl Drop for WalnutProver {
    fn drop(&mut self) {
        if let Some(mut child) = self.child.take() {
            if let Some(stdin) = child.stdin.as_mut() {
                let _ = stdin.write_all(b"exit:");
                let _ = stdin.flush();
            }
            let _ = child.wait();
        }
    }
}
