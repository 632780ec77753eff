use std::io::{self, Write};

use golife::{pos, Population, Pos};

/// An off-screen frame: one `String` per terminal line, drawn in a single write.
pub struct Canvas {
    lines: Vec<String>,
    width: usize,
    height: usize,
}

impl Canvas {
    /// A canvas covering the terminal, minus the bottom line kept for the status bar.
    pub fn from_screen() -> io::Result<Self> {
        let (width, height) = termion::terminal_size()?;
        Ok(Self::new(width as usize, height.saturating_sub(1) as usize))
    }

    pub fn new(width: usize, height: usize) -> Self {
        let lines = (0..height).map(|_| " ".repeat(width)).collect();
        Self {
            height,
            lines,
            width,
        }
    }

    pub fn layer(&mut self, f: impl Fn(Pos) -> Option<char>) {
        for y in 0..self.height {
            let line: String = (0..self.width)
                .map(|x| f(pos!(x, y)))
                .zip(self.lines[y].chars())
                .map(|(drawn, old)| drawn.unwrap_or(old))
                .collect();
            self.lines[y] = line;
        }
    }

    /// Draws the cells of `population` visible from `origin`; out-of-board space is dotted.
    pub fn draw_population(&mut self, population: &Population, origin: Pos) {
        self.layer(|screen| {
            let pos = origin + screen;
            match population.get(pos) {
                Some(cell) if cell.is_active() => Some('#'),
                Some(_) => Some(' '),
                None => Some('·'),
            }
        });
    }

    pub fn display(&self, status: &str, out: &mut impl Write) -> io::Result<()> {
        write!(out, "{}", termion::clear::All)?;
        for (index, line) in self.lines.iter().enumerate() {
            let goto = termion::cursor::Goto(1, index as u16 + 1);
            write!(out, "{goto}{line}")?;
        }
        let goto = termion::cursor::Goto(1, self.height as u16 + 1);
        write!(out, "{goto}{}{status}{}", termion::style::Invert, termion::style::Reset)?;
        out.flush()
    }
}
