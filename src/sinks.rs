//! Clipboard and speech backed by external programs.

use crate::session::{ClipboardSink, SpeechSink};
use anyhow::{bail, Context, Result};
use log::{debug, warn};
use std::io::Write;
use std::process::{Child, Command, Stdio};

/// Words per minute of espeak at rate 1.0.
const BASE_SPEECH_WPM: f32 = 175.0;

fn spawn_with_input(
    program: &[String],
    substitutions: &[(&str, String)],
    text: &str,
) -> Result<Child> {
    let (name, args) = match program.split_first() {
        Some(parts) => parts,
        None => bail!("Empty command"),
    };

    let args: Vec<String> = args
        .iter()
        .map(|arg| {
            substitutions
                .iter()
                .fold(arg.clone(), |acc, (key, value)| acc.replace(key, value))
        })
        .collect();

    debug!("Spawning {} {:?}", name, args);
    let mut child = Command::new(name)
        .args(&args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!("Failed to run {}", name))?;

    if let Some(mut stdin) = child.stdin.take() {
        if let Err(e) = stdin.write_all(text.as_bytes()) {
            drop(stdin);
            if let Err(e) = child.kill() {
                debug!("{} already finished: {}", name, e);
            }
            if let Err(e) = child.wait() {
                warn!("Failed to reap {}: {}", name, e);
            }
            return Err(e).with_context(|| format!("Failed to send text to {}", name));
        }
    }

    Ok(child)
}

/// Copies by piping text into a program such as `xclip` or `pbcopy`.
pub struct CommandClipboard {
    command: Vec<String>,
}

impl CommandClipboard {
    pub fn new(command: Vec<String>) -> Self {
        Self { command }
    }
}

impl ClipboardSink for CommandClipboard {
    fn copy(&mut self, text: &str) -> Result<()> {
        let mut child = spawn_with_input(&self.command, &[], text)?;
        let status = child.wait().context("Clipboard command did not finish")?;
        if !status.success() {
            bail!("Clipboard command exited with {}", status);
        }
        Ok(())
    }
}

/// Speaks by piping text into a TTS program. `{rate}` in the arguments is
/// replaced by the rate multiplier and `{wpm}` by the matching words per minute.
pub struct CommandSpeech {
    command: Vec<String>,
    playing: Option<Child>,
}

impl CommandSpeech {
    pub fn new(command: Vec<String>) -> Self {
        Self {
            command,
            playing: None,
        }
    }
}

impl SpeechSink for CommandSpeech {
    fn start(&mut self, text: &str, rate: f32) -> Result<()> {
        self.stop();
        let substitutions = [
            ("{rate}", rate.to_string()),
            ("{wpm}", ((BASE_SPEECH_WPM * rate).round() as u32).to_string()),
        ];
        self.playing = Some(spawn_with_input(&self.command, &substitutions, text)?);
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(mut child) = self.playing.take() {
            if let Err(e) = child.kill() {
                debug!("Speech process already finished: {}", e);
            }
            if let Err(e) = child.wait() {
                warn!("Failed to reap speech process: {}", e);
            }
        }
    }

    fn finish(&mut self) -> Result<()> {
        if let Some(mut child) = self.playing.take() {
            child.wait().context("Speech command did not finish")?;
        }
        Ok(())
    }
}

impl Drop for CommandSpeech {
    fn drop(&mut self) {
        self.stop();
    }
}
