//! Remuxer backed by the ffmpeg executable.

use std::path::Path;
use std::sync::Arc;

use super::options_builder::{format_tokens_pretty, FfmpegOptionsBuilder};
use super::types::{RemuxError, RemuxResult};
use super::Remuxer;
use crate::arrangement::RemapInstruction;
use crate::config::RemuxSettings;
use crate::logging::SessionLogger;
use crate::runner::{AbortCheck, CommandRunner};

/// Runs `ffmpeg -c copy` with the mapping built from an arrangement.
pub struct FfmpegRemuxer {
    program: String,
    settings: RemuxSettings,
    runner: CommandRunner,
    logger: Option<Arc<SessionLogger>>,
    show_options_pretty: bool,
    show_options_json: bool,
}

impl FfmpegRemuxer {
    pub fn new(program: impl Into<String>, settings: RemuxSettings) -> Self {
        let runner = CommandRunner::with_timeout_secs(settings.timeout_secs);
        Self {
            program: program.into(),
            settings,
            runner,
            logger: None,
            show_options_pretty: false,
            show_options_json: false,
        }
    }

    /// Record commands and tool output in a session log.
    pub fn with_logger(mut self, logger: Arc<SessionLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Choose how the command is dumped into the session log.
    pub fn log_options(mut self, pretty: bool, json: bool) -> Self {
        self.show_options_pretty = pretty;
        self.show_options_json = json;
        self
    }

    fn check_paths(&self, input: &Path, output: &Path) -> RemuxResult<()> {
        if !input.exists() {
            return Err(RemuxError::InputNotFound(input.to_path_buf()));
        }
        if output == input {
            return Err(RemuxError::OutputIsInput(output.to_path_buf()));
        }
        if output.exists() {
            if !self.settings.overwrite {
                return Err(RemuxError::OutputExists(output.to_path_buf()));
            }
            if let Some(logger) = &self.logger {
                logger.warn(&format!("Overwriting {}", output.display()));
            }
        }
        Ok(())
    }

    fn log_command(&self, tokens: &[String]) {
        let Some(logger) = &self.logger else {
            return;
        };
        logger.command(&format!("{} {}", self.program, tokens.join(" ")));
        if self.show_options_pretty {
            logger.log_options_pretty(&self.program, &format_tokens_pretty(tokens));
        }
        if self.show_options_json {
            logger.log_options_json(&self.program, tokens);
        }
    }
}

impl Remuxer for FfmpegRemuxer {
    fn remux(
        &self,
        input: &Path,
        output: &Path,
        instructions: &[RemapInstruction],
        abort: AbortCheck<'_>,
    ) -> RemuxResult<()> {
        if instructions.is_empty() {
            return Err(RemuxError::NothingSelected);
        }
        self.check_paths(input, output)?;

        let tokens = FfmpegOptionsBuilder::new(input, output, instructions, &self.settings).build();

        if let Some(logger) = &self.logger {
            logger.phase(&format!("Remux {}", input.display()));
            logger.clear_tail();
        }
        self.log_command(&tokens);

        let result = self.runner.run(&self.program, &tokens, abort);

        let out = match result {
            Ok(out) => out,
            Err(e) => {
                if let Some(logger) = &self.logger {
                    logger.error(&e.to_string());
                }
                return Err(e.into());
            }
        };

        if let Some(logger) = &self.logger {
            logger.output_lines(&out.stdout, false);
            logger.output_lines(&out.stderr, true);
        }

        if !out.success {
            let message = out
                .stderr
                .lines()
                .rev()
                .find(|l| !l.trim().is_empty())
                .unwrap_or("")
                .trim()
                .to_string();
            if let Some(logger) = &self.logger {
                logger.error(&format!("{} exited with code {}", self.program, out.exit_code));
                logger.show_tail(&self.program);
                logger.flush();
            }
            return Err(RemuxError::ToolFailed {
                tool: self.program.clone(),
                exit_code: out.exit_code,
                message,
            });
        }

        tracing::info!(
            "Remuxed {} -> {} ({} streams)",
            input.display(),
            output.display(),
            instructions.len()
        );
        if let Some(logger) = &self.logger {
            logger.success(&format!("Wrote {}", output.display()));
            logger.flush();
        }
        Ok(())
    }
}
