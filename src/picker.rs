//! Inline single-select prompt over the commit list.
//!
//! Runs on the alternate screen in raw mode; arrows or j/k to move, Enter to
//! pick, Esc or q to dismiss. The detail line of the highlighted row is shown
//! at the bottom of the screen.

use std::io::{self, Write};

use anyhow::Result;
use crossterm::{
  cursor,
  event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
  execute, queue,
  style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
  terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};

use crate::ui::PickItem;

// Rows taken by chrome around the list: title, placeholder, spacer, detail, hints.
const CHROME_ROWS: u16 = 5;

/// Present `items` and return the chosen index, or `None` when dismissed.
pub fn select(title: &str, placeholder: &str, items: &[PickItem]) -> Result<Option<usize>> {
  if items.is_empty() {
    return Ok(None);
  }

  terminal::enable_raw_mode()?;
  execute!(io::stdout(), EnterAlternateScreen, cursor::Hide)?;
  // Restore the terminal on every exit path.
  let _restore = scopeguard::guard((), |_| {
    let _ = execute!(io::stdout(), cursor::Show, LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
  });

  let mut selected = 0usize;
  let mut offset = 0usize;

  loop {
    draw(title, placeholder, items, selected, &mut offset)?;
    let Event::Key(key) = event::read()? else {
      continue;
    };
    if key.kind != KeyEventKind::Press {
      continue;
    }
    match key.code {
      KeyCode::Up | KeyCode::Char('k') => selected = selected.saturating_sub(1),
      KeyCode::Down | KeyCode::Char('j') => {
        if selected + 1 < items.len() {
          selected += 1;
        }
      }
      KeyCode::Home => selected = 0,
      KeyCode::End => selected = items.len() - 1,
      KeyCode::Enter => return Ok(Some(selected)),
      KeyCode::Esc | KeyCode::Char('q') => return Ok(None),
      KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return Ok(None),
      _ => {}
    }
  }
}

fn draw(
  title: &str,
  placeholder: &str,
  items: &[PickItem],
  selected: usize,
  offset: &mut usize,
) -> Result<()> {
  let (cols, rows) = terminal::size()?;
  let width = cols as usize;
  let visible = rows.saturating_sub(CHROME_ROWS).max(1) as usize;
  *offset = adjust_offset(selected, *offset, visible);

  let mut out = io::stdout();
  queue!(out, Clear(ClearType::All), cursor::MoveTo(0, 0))?;
  queue!(
    out,
    SetAttribute(Attribute::Bold),
    Print(clip(title, width)),
    SetAttribute(Attribute::Reset)
  )?;
  queue!(
    out,
    cursor::MoveTo(0, 1),
    SetForegroundColor(Color::DarkGrey),
    Print(clip(placeholder, width)),
    ResetColor
  )?;

  for (row, ix) in (*offset..(*offset + visible).min(items.len())).enumerate() {
    let item = &items[ix];
    let marker = if ix == selected { ">" } else { " " };
    let line = format!("{marker} {}  {}", item.label, item.description);
    queue!(out, cursor::MoveTo(0, row as u16 + 3))?;
    if ix == selected {
      queue!(
        out,
        SetForegroundColor(Color::Cyan),
        SetAttribute(Attribute::Bold),
        Print(clip(&line, width)),
        SetAttribute(Attribute::Reset),
        ResetColor
      )?;
    } else {
      queue!(out, Print(clip(&line, width)))?;
    }
  }

  queue!(
    out,
    cursor::MoveTo(0, rows.saturating_sub(2)),
    SetForegroundColor(Color::Yellow),
    Print(clip(&items[selected].detail, width)),
    ResetColor
  )?;
  queue!(
    out,
    cursor::MoveTo(0, rows.saturating_sub(1)),
    SetForegroundColor(Color::DarkGrey),
    Print(clip("[up/down or j/k] Move  [Enter] Select  [Esc] Cancel", width)),
    ResetColor
  )?;

  out.flush()?;
  Ok(())
}

/// Scroll the window just enough to keep the highlighted row visible.
fn adjust_offset(selected: usize, offset: usize, visible: usize) -> usize {
  if selected < offset {
    selected
  } else if selected >= offset + visible {
    selected + 1 - visible
  } else {
    offset
  }
}

fn clip(text: &str, width: usize) -> String {
  text.chars().take(width.saturating_sub(1).max(1)).collect()
}
