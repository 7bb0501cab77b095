use std::process::Stdio;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use pagelens_core::translation::{language_name, TranslationResult};

use crate::prelude::*;

/// Environment variable carrying the target language code to a translator
/// program.
pub const TARGET_LANG_ENV: &str = "PAGELENS_TARGET_LANG";
/// Environment variable carrying the target language display name.
pub const TARGET_LANG_NAME_ENV: &str = "PAGELENS_TARGET_LANG_NAME";

/// A translation collaborator.  Retries and backoff, if any, belong to the
/// implementation.
#[async_trait]
pub trait Translator: Send + Sync {
    fn name(&self) -> &str;

    async fn translate(&self, text: &str, target_lang: &str) -> Result<TranslationResult>;
}

/// Returns every text unchanged.  Used for layout previews and dry runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityTranslator;

#[async_trait]
impl Translator for IdentityTranslator {
    fn name(&self) -> &str {
        "identity"
    }

    async fn translate(&self, text: &str, _target_lang: &str) -> Result<TranslationResult> {
        Ok(TranslationResult {
            translated_text: text.to_string(),
            detected_source_lang: None,
        })
    }
}

/// Runs an external program once per text.
///
/// The text goes to the program's stdin and the translation is read from
/// its stdout, either as plain text or as a JSON object
/// `{"translatedText": ..., "detectedSourceLang": ...}`.  The target language
/// is passed in `PAGELENS_TARGET_LANG` (code) and
/// `PAGELENS_TARGET_LANG_NAME` (English name).
#[derive(Debug, Clone)]
pub struct CommandTranslator {
    program: String,
    args: Vec<String>,
}

impl CommandTranslator {
    /// Parse a shell-style command line such as `trans -b :tr`.
    pub fn parse(command_line: &str) -> Result<Self> {
        let mut parts = shlex::split(command_line)
            .ok_or_else(|| Error::Input(f!("unbalanced quotes in translator command: {command_line}")))?
            .into_iter();
        let program = parts
            .next()
            .ok_or_else(|| Error::Input("translator command is empty".to_string()))?;
        Ok(Self {
            program,
            args: parts.collect(),
        })
    }
}

fn parse_output(stdout: &str) -> Option<TranslationResult> {
    let trimmed = stdout.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.starts_with('{') {
        if let Ok(result) = serde_json::from_str::<TranslationResult>(trimmed) {
            return Some(result);
        }
    }
    Some(TranslationResult {
        translated_text: stdout.trim_end_matches(['\n', '\r']).to_string(),
        detected_source_lang: None,
    })
}

#[async_trait]
impl Translator for CommandTranslator {
    fn name(&self) -> &str {
        &self.program
    }

    async fn translate(&self, text: &str, target_lang: &str) -> Result<TranslationResult> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .env(TARGET_LANG_ENV, target_lang)
            .env(TARGET_LANG_NAME_ENV, language_name(target_lang))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .wrap_err_with(|| f!("failed to start translator '{}'", self.program))?;

        let mut stdin = child.stdin.take().ok_or_eyre("translator stdin unavailable")?;
        let input = text.to_string();
        let writer = tokio::spawn(async move {
            stdin.write_all(input.as_bytes()).await?;
            stdin.shutdown().await
        });

        let output = child.wait_with_output().await?;
        // Exit status is reported ahead of a broken stdin pipe.
        let written = writer.await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Translator(f!(
                "'{}' exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            ))
            .into());
        }
        written.wrap_err("failed to write text to translator")?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_output(&stdout)
            .ok_or_else(|| Error::Translator(f!("'{}' produced no output", self.program)).into())
    }
}

/// Pick the translator for a command line, falling back to the identity
/// translator when none is configured.
pub fn from_command(command: Option<&str>) -> Result<Arc<dyn Translator>> {
    match command.map(str::trim).filter(|c| !c.is_empty()) {
        Some(command_line) => Ok(Arc::new(CommandTranslator::parse(command_line)?)),
        None => {
            log::warn!("no translator command configured, using identity translator");
            Ok(Arc::new(IdentityTranslator))
        }
    }
}
