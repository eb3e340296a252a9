use std::fmt::Write;

use sweeper_core::*;

pub(crate) const HELP: &str = "\
Commands:
  o X Y   open a cell (or just `X Y`)
  f X Y   toggle a flag
  p X Y   press with modifier: preview the 3x3 neighbourhood
  c       release: open the previewed neighbourhood if it is safe
  n       new game
  h       this help
  q       quit
Legend: # hidden, F flag, . empty, 1-8 count, * mine, X exploded,
        + safe preview, ! unsafe preview";

fn cell_glyph(session: &Session, preview: Option<&PreviewResult>, coords: Coord2) -> char {
    let Ok(view) = session.cell_view(coords) else {
        return ' ';
    };
    let status = session.status();

    if status == GameStatus::Lost && view.is_mine == Some(true) {
        return if session.triggered_mine() == Some(coords) {
            'X'
        } else {
            '*'
        };
    }
    if let Some(preview) = preview.filter(|preview| preview.contains(coords)) {
        return if preview.is_safe() { '+' } else { '!' };
    }
    if view.revealed {
        return match view.adjacent_mine_count {
            Some(0) => '.',
            Some(count) => char::from(b'0' + count),
            None => '*',
        };
    }
    // mines left hidden on a won board count as flagged
    if view.flagged || (status == GameStatus::Won && view.is_mine == Some(true)) {
        'F'
    } else {
        '#'
    }
}

fn status_line(session: &Session) -> String {
    match session.status() {
        GameStatus::Lost => "Game Over, any command starts a new game".to_owned(),
        GameStatus::Won => "You win! Any command starts a new game".to_owned(),
        GameStatus::Playing => format!(
            "Mines left: {} | o X Y open, f X Y flag, p X Y preview, c commit, h help",
            session.mines_left()
        ),
    }
}

/// Draws the board with x along the top and y down the side, followed by the status line.
pub(crate) fn render(session: &Session, preview: Option<&PreviewResult>) -> String {
    let (width, height) = session.size();
    let mut out = String::new();

    out.push_str("    ");
    for x in 0..width {
        out.push(char::from(b'0' + x % 10));
    }
    out.push('\n');

    for y in 0..height {
        let _ = write!(out, "{y:>3} ");
        for x in 0..width {
            out.push(cell_glyph(session, preview, (x, y)));
        }
        out.push('\n');
    }

    out.push_str(&status_line(session));
    out.push('\n');
    out
}
