//! Player: the real-time loop that drives a scene in the terminal.
//!
//! Each frame it polls input until the frame deadline, ticks the scene with
//! the measured delta, then draws whatever the renderer reports as changed.
//! The scene decides what happens; the player only moves time and keys.

use std::io::{self, Write};
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::{cursor, execute, queue, style, terminal};

use crate::config::StageConfig;
use crate::renderer::Renderer;
use crate::scene::Scene;
use crate::types::{Color, Frame, NamedColor, Style};

pub struct Player {
    scene: Scene,
    renderer: Renderer,
    config: StageConfig,
}

impl Player {
    pub fn new(scene: Scene, config: StageConfig) -> Self {
        let renderer = Renderer::new(scene.contract());
        Self {
            scene,
            renderer,
            config,
        }
    }

    /// Run the scene until the quit key is pressed.
    ///
    /// Sets up the terminal, enters the loop, and restores the terminal on
    /// exit (even on error).
    pub fn play(&mut self) -> Result<()> {
        let (term_w, term_h) = terminal::size()?;
        let contract = self.scene.contract();
        // +1: one row for the status bar
        if term_w < contract.width || term_h < contract.height + 1 {
            bail!(
                "Terminal too small: need {}x{}, have {}x{}",
                contract.width,
                contract.height + 1,
                term_w,
                term_h,
            );
        }

        let mut stdout = io::stdout();
        terminal::enable_raw_mode()?;
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::Clear(terminal::ClearType::All),
        )?;

        let result = self.run_loop(&mut stdout);

        // Always restore terminal state.
        let _ = execute!(stdout, cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();

        result
    }

    // -----------------------------------------------------------------------
    // Event loop
    // -----------------------------------------------------------------------

    fn run_loop(&mut self, stdout: &mut io::Stdout) -> Result<()> {
        let frame_time = Duration::from_secs(1) / self.config.fps.max(1);
        let mut last = Instant::now();
        tracing::info!(fps = self.config.fps, "player started");

        self.render_frame(stdout)?;
        loop {
            let timeout = frame_time.saturating_sub(last.elapsed());
            if event::poll(timeout)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        if self.config.is_quit(&key) {
                            break;
                        }
                        if let Some(input) = self.config.input_for(&key) {
                            tracing::debug!(?input, "input");
                            self.scene.handle_input(input).context("scene input failed")?;
                        }
                    }
                    Event::Resize(_, _) => {
                        self.renderer.reset();
                        queue!(stdout, terminal::Clear(terminal::ClearType::All))?;
                    }
                    _ => {}
                }
            }

            if last.elapsed() < frame_time {
                continue;
            }
            let now = Instant::now();
            let delta = now - last;
            last = now;

            self.scene.tick(delta).context("scene tick failed")?;
            self.render_frame(stdout)?;
        }

        tracing::info!(clock = ?self.scene.clock(), "player stopped");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Terminal output
    // -----------------------------------------------------------------------

    fn render_frame(&mut self, stdout: &mut io::Stdout) -> Result<()> {
        match self.renderer.render(&self.scene.draw()) {
            Frame::Full { cells } => {
                for (y, row) in cells.iter().enumerate() {
                    queue!(stdout, cursor::MoveTo(0, y as u16))?;
                    for cell in row {
                        let cs = to_content_style(&cell.style);
                        queue!(stdout, style::PrintStyledContent(style::StyledContent::new(cs, cell.ch)))?;
                    }
                }
            }
            Frame::Diff { changes } => {
                for change in changes {
                    let cs = to_content_style(&change.cell.style);
                    queue!(
                        stdout,
                        cursor::MoveTo(change.x, change.y),
                        style::PrintStyledContent(style::StyledContent::new(cs, change.cell.ch)),
                    )?;
                }
            }
        }
        self.render_status(stdout)?;
        stdout.flush()?;
        Ok(())
    }

    fn render_status(&self, stdout: &mut io::Stdout) -> Result<()> {
        let status_y = self.scene.contract().height;
        let (_, term_h) = terminal::size()?;
        if status_y >= term_h {
            return Ok(()); // No room for status bar.
        }

        let keys = &self.config.key_bindings;
        let clock = self.scene.clock().as_secs_f32();
        let items = [
            format!("{clock:>7.1}s "),
            format!("[{}/{}] choose", keys.up, keys.down),
            format!("[{}] select", keys.select),
            format!("[{}] advance", keys.click),
            format!("[{}] quit", keys.quit),
        ];

        queue!(
            stdout,
            cursor::MoveTo(0, status_y),
            terminal::Clear(terminal::ClearType::CurrentLine),
        )?;
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                queue!(stdout, style::Print("  "))?;
            }
            print_hint(stdout, item)?;
        }
        Ok(())
    }
}

/// Print a status item, bolding any text inside `[...]` brackets.
/// Text outside brackets is printed dim.
fn print_hint(stdout: &mut io::Stdout, item: &str) -> Result<()> {
    let mut rest = item;
    while !rest.is_empty() {
        let (plain, bracketed) = match rest.find('[') {
            Some(open) => rest.split_at(open),
            None => (rest, ""),
        };
        if !plain.is_empty() {
            queue!(
                stdout,
                style::SetAttribute(style::Attribute::Dim),
                style::Print(plain),
                style::SetAttribute(style::Attribute::Reset),
            )?;
        }
        let Some(close) = bracketed.find(']') else {
            queue!(stdout, style::Print(bracketed))?;
            break;
        };
        queue!(
            stdout,
            style::SetAttribute(style::Attribute::Bold),
            style::Print(&bracketed[..=close]),
            style::SetAttribute(style::Attribute::Reset),
        )?;
        rest = &bracketed[close + 1..];
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Style conversion
// ---------------------------------------------------------------------------

pub fn to_content_style(s: &Style) -> style::ContentStyle {
    let mut cs = style::ContentStyle::default();
    if let Some(fg) = &s.fg {
        cs.foreground_color = Some(to_ct_color(fg));
    }
    if let Some(bg) = &s.bg {
        cs.background_color = Some(to_ct_color(bg));
    }
    if s.bold {
        cs.attributes.set(style::Attribute::Bold);
    }
    if s.dim {
        cs.attributes.set(style::Attribute::Dim);
    }
    cs
}

pub fn to_ct_color(c: &Color) -> style::Color {
    match c {
        Color::Named(n) => match n {
            NamedColor::Black => style::Color::Black,
            NamedColor::Red => style::Color::Red,
            NamedColor::Green => style::Color::Green,
            NamedColor::Yellow => style::Color::Yellow,
            NamedColor::Blue => style::Color::Blue,
            NamedColor::Magenta => style::Color::Magenta,
            NamedColor::Cyan => style::Color::Cyan,
            NamedColor::White => style::Color::White,
        },
        Color::Rgb { r, g, b } => style::Color::Rgb {
            r: *r,
            g: *g,
            b: *b,
        },
    }
}
