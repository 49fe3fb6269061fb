//! Line-oriented input for the interactive screens.
//!
//! Screens talk to a [`Prompter`] rather than to stdin so their flows can be
//! driven by a script in tests.

use std::fmt;
use std::io::{self, BufRead, Write};

/// Source of typed answers.
pub trait Prompter {
    /// Show `prompt` and read one line without its terminator. `None` at end of input.
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>>;

    /// Show text that needs no answer (menus, pickers, notices).
    fn show(&mut self, text: &str);
}

/// Input ended while a screen was waiting for an answer.
#[derive(Debug)]
pub struct InputClosed;

impl fmt::Display for InputClosed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("input closed")
    }
}

impl std::error::Error for InputClosed {}

/// Prompts on stderr, answers from stdin.
pub struct StdinPrompter;

impl Prompter for StdinPrompter {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        let mut stderr = io::stderr().lock();
        write!(stderr, "{prompt}")?;
        stderr.flush()?;

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn show(&mut self, text: &str) {
        eprintln!("{text}");
    }
}

/// Ask for a trimmed answer. Blank answers are returned as empty strings.
pub fn answer(prompter: &mut dyn Prompter, label: &str) -> anyhow::Result<String> {
    let line = prompter
        .read_line(&format!("{label}: "))?
        .ok_or(InputClosed)?;
    Ok(line.trim().to_string())
}

/// Ask for a field showing its current value; a blank answer keeps it.
pub fn field(prompter: &mut dyn Prompter, label: &str, current: &str) -> anyhow::Result<String> {
    if current.is_empty() {
        return answer(prompter, label);
    }
    let line = prompter
        .read_line(&format!("{label} [{current}]: "))?
        .ok_or(InputClosed)?;
    let trimmed = line.trim();
    Ok(if trimmed.is_empty() {
        current.to_string()
    } else {
        trimmed.to_string()
    })
}

/// Use `preset` when given, otherwise ask.
pub fn preset_or_ask(
    prompter: &mut dyn Prompter,
    label: &str,
    preset: Option<&str>,
) -> anyhow::Result<String> {
    match preset {
        Some(value) => Ok(value.to_string()),
        None => answer(prompter, label),
    }
}

pub fn yes_no(prompter: &mut dyn Prompter, label: &str, current: bool) -> anyhow::Result<bool> {
    let hint = if current { "Y/n" } else { "y/N" };
    loop {
        let line = prompter
            .read_line(&format!("{label} [{hint}]: "))?
            .ok_or(InputClosed)?;
        match line.trim().to_ascii_lowercase().as_str() {
            "" => return Ok(current),
            "y" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            _ => prompter.show("Please answer y or n."),
        }
    }
}

/// Show a numbered menu with `0) Back` and return the chosen index, or `None` for back.
pub fn menu(prompter: &mut dyn Prompter, title: &str, options: &[&str]) -> anyhow::Result<Option<usize>> {
    let mut text = format!("\n{title}");
    for (index, option) in options.iter().enumerate() {
        text.push_str(&format!("\n  {}) {option}", index + 1));
    }
    text.push_str("\n  0) Back");
    prompter.show(&text);

    loop {
        let choice = answer(prompter, "Choose")?;
        match choice.parse::<usize>() {
            Ok(0) => return Ok(None),
            Ok(n) if n <= options.len() => return Ok(Some(n - 1)),
            _ => prompter.show(&format!("Enter a number from 0 to {}.", options.len())),
        }
    }
}

#[cfg(test)]
pub(crate) use scripted::ScriptedPrompter;
