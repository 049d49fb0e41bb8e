//! Frame rendering
//!
//! Formats the whole screen to a String with crossterm styling and emits
//! it in one write per event. Raw mode needs explicit CRLF line endings.

use crossterm::cursor;
use crossterm::style::Stylize;
use crossterm::terminal::{Clear, ClearType};
use crossterm::Command;
use std::fmt::Write;

use crate::grid::Position;
use crate::runtime::GameLoop;
use crate::session::{Phase, Session};

const CRLF: &str = "\r\n";

/// Render the full frame for the current phase.
pub fn render_frame(game: &GameLoop) -> String {
    let mut out = clear_and_home();
    match game.session.phase {
        Phase::NotStarted => write_start_screen(&mut out, &game.session),
        Phase::Running => write_live_view(&mut out, game),
        Phase::Over => write_game_over(&mut out, &game.session),
    }
    out
}

fn clear_and_home() -> String {
    let mut buf = String::new();
    let _ = Clear(ClearType::All).write_ansi(&mut buf);
    let _ = cursor::MoveTo(0, 0).write_ansi(&mut buf);
    buf
}

fn write_start_screen(out: &mut String, session: &Session) {
    let _ = write!(out, "{}{CRLF}{CRLF}", "Welcome to Speech Webgrid!".bold());
    let _ = write!(
        out,
        "Reach as many goals as you can in {} seconds.{CRLF}",
        session.session_secs
    );
    let _ = write!(
        out,
        "Arrow keys move; say \"up\", \"down\", \"left\" or \"right\" with voice input.{CRLF}{CRLF}"
    );
    let _ = write!(out, "{}{CRLF}", "Press enter to start, q to quit.".yellow());
    if let Some(err) = &session.last_error {
        let _ = write!(out, "{CRLF}{}{CRLF}", format!("Error: {}", err).red());
    }
}

fn write_live_view(out: &mut String, game: &GameLoop) {
    let session = &game.session;
    let _ = write!(out, "{}{CRLF}{CRLF}", "Speech Webgrid".bold());
    write_grid(out, session);
    let _ = write!(
        out,
        "{CRLF}Time remaining: {:>3}s   Score: {}{CRLF}",
        session.time_remaining_secs, session.score
    );
    let _ = write!(
        out,
        "Total bits: {}   BPS: {:.2}{CRLF}",
        session.total_bits,
        session.bits_per_second()
    );
    if let Some(cmd) = session.last_command {
        let _ = write!(out, "Last command: {}{CRLF}", cmd.word());
    }
    if let Some(partial) = &game.partial {
        let _ = write!(
            out,
            "{}{CRLF}",
            format!("Heard so far: {}", partial).dark_grey()
        );
    }
    if let Some(err) = &session.last_error {
        let _ = write!(out, "{}{CRLF}", format!("Error: {}", err).red());
    }
}

fn write_grid(out: &mut String, session: &Session) {
    for row in 0..session.grid_size {
        for col in 0..session.grid_size {
            let cell = Position::new(row, col);
            if cell == session.user {
                let _ = write!(out, " {}", "U".blue().bold());
            } else if cell == session.goal {
                let _ = write!(out, " {}", "G".green().bold());
            } else {
                let _ = write!(out, " {}", ".".dark_grey());
            }
        }
        out.push_str(CRLF);
    }
}

fn write_game_over(out: &mut String, session: &Session) {
    let _ = write!(out, "{}{CRLF}{CRLF}", "Game Over!".red().bold());
    let _ = write!(out, "Final score: {}{CRLF}", session.score);
    let _ = write!(out, "Total bits: {}{CRLF}", session.total_bits);
    let _ = write!(out, "Final BPS: {:.2}{CRLF}{CRLF}", session.bits_per_second());
    let _ = write!(
        out,
        "{}{CRLF}",
        "Press enter to play again, q to quit.".yellow()
    );
}
