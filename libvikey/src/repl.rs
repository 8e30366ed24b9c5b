//! Line-driven key session used by `vikey run`.
//!
//! Each input line names one key press (`a`, `shift+a`, `ctrl+space`,
//! `cmd+c`) or a session boundary (`activate`, `deactivate`). The press runs
//! through the controller against an in-memory text field and the resulting
//! text is echoed back.

use std::io::{BufRead, Write};

use libvikey_core::keycode;
use libvikey_core::{EngineBackend, EventController, KeyEvent, Modifiers, TextBuffer};

/// One parsed input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Key(KeyEvent),
    Activate,
    Deactivate,
}

/// Parse a key description like `ctrl+shift+a`.
pub fn parse_step(line: &str) -> Result<Step, String> {
    let line = line.trim();
    match line.to_ascii_lowercase().as_str() {
        "activate" => return Ok(Step::Activate),
        "deactivate" => return Ok(Step::Deactivate),
        _ => {}
    }

    // A lone "+" is the key itself, not a separator.
    let (prefix, key) = match line.rsplit_once('+') {
        Some((prefix, "")) => (prefix.strip_suffix('+').unwrap_or(prefix), "="),
        Some((prefix, key)) => (prefix, key),
        None => ("", line),
    };

    let mut modifiers = Modifiers::empty();
    for part in prefix.split('+').filter(|p| !p.is_empty()) {
        modifiers |= match part.to_ascii_lowercase().as_str() {
            "shift" => Modifiers::SHIFT,
            "ctrl" | "control" => Modifiers::CONTROL,
            "caps" | "capslock" => Modifiers::CAPS_LOCK,
            "cmd" | "command" | "super" => Modifiers::COMMAND,
            "alt" | "opt" | "option" => Modifiers::OPTION,
            other => return Err(format!("unknown modifier '{}'", other)),
        };
    }

    let key_code = keycode::from_name(key).ok_or_else(|| format!("unknown key '{}'", key))?;
    Ok(Step::Key(KeyEvent::key_down(key_code, modifiers)))
}

/// Feed every line of `input` to the controller, reporting to `out`.
pub fn run<B, R, W>(
    controller: &mut EventController<B>,
    input: R,
    mut out: W,
) -> anyhow::Result<TextBuffer>
where
    B: EngineBackend,
    R: BufRead,
    W: Write,
{
    let mut buffer = TextBuffer::new();

    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        match parse_step(&line) {
            Ok(Step::Key(event)) => {
                let result = controller.handle(&event, &mut buffer);
                let ops = buffer.take_ops();
                writeln!(
                    out,
                    "{:<14} {:<11} ops={:<3} text='{}'{}",
                    line.trim(),
                    if result.is_handled() { "consumed" } else { "passthrough" },
                    ops.len(),
                    buffer.text(),
                    if controller.is_enabled() { "" } else { " [off]" }
                )?;
            }
            Ok(Step::Activate) => {
                controller.activate();
                writeln!(out, "session activated")?;
            }
            Ok(Step::Deactivate) => {
                controller.deactivate();
                writeln!(out, "session deactivated")?;
            }
            Err(e) => writeln!(out, "error: {}", e)?,
        }
    }

    Ok(buffer)
}
