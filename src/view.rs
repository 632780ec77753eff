use std::{
    io::{self, stdin, stdout, Write},
    sync::mpsc,
    thread::{self, JoinHandle},
    time::Duration,
};

use golife::{pos, Pos, SimHandle, Status};
use log::{error, warn};
use termion::{event::Key, input::TermRead, raw::IntoRawMode};

use canvas::Canvas;
mod canvas;

/// Read-only terminal projection of a running simulation, plus its key bindings.
pub struct View {
    thread: JoinHandle<()>,
}

impl View {
    pub fn spawn(handle: SimHandle, interval: Duration, rule: String) -> Self {
        let thread = thread::spawn(move || {
            if let Err(err) = view_loop(handle, interval, rule) {
                error!("view stopped: {err}");
            }
        });
        Self { thread }
    }

    pub fn join(self) {
        if self.thread.join().is_err() {
            error!("view thread panicked");
        }
    }
}

#[derive(Debug)]
pub enum Dir {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug)]
pub enum InputCmd {
    Exit,
    Move(Dir),
    Toggle,
    Step,
    Reset,
    Randomize,
}

/// Reads keys until quit; raw mode itself is owned by [`view_loop`].
fn input_loop(sender: mpsc::Sender<InputCmd>) -> io::Result<()> {
    for key in stdin().keys() {
        let command = match key? {
            Key::Char('q') | Key::Ctrl('c') => InputCmd::Exit,
            Key::Char(' ') => InputCmd::Toggle,
            Key::Char('s') => InputCmd::Step,
            Key::Char('r') => InputCmd::Reset,
            Key::Char('n') => InputCmd::Randomize,
            Key::Up => InputCmd::Move(Dir::Up),
            Key::Down => InputCmd::Move(Dir::Down),
            Key::Left => InputCmd::Move(Dir::Left),
            Key::Right => InputCmd::Move(Dir::Right),
            _ => continue,
        };

        let exit = matches!(command, InputCmd::Exit);
        if sender.send(command).is_err() || exit {
            break;
        }
    }
    Ok(())
}

const VIEW_REFRESH_INTERVAL: Duration = Duration::from_millis(50);

fn view_loop(handle: SimHandle, interval: Duration, rule: String) -> golife::Result<()> {
    // dropping the guard restores the terminal, on the error path too
    let mut out = stdout().into_raw_mode()?;
    let (sender, receiver) = mpsc::channel();
    let input = thread::spawn(move || {
        if let Err(err) = input_loop(sender) {
            error!("input stopped: {err}");
        }
    });

    let result = draw_loop(&receiver, &handle, &mut out, interval, &rule);
    let _ = write!(out, "{}{}", termion::clear::All, termion::cursor::Goto(1, 1));
    let _ = out.flush();
    drop(out);
    drop(receiver);

    match &result {
        Ok(()) => {
            if input.join().is_err() {
                warn!("input thread panicked");
            }
        }
        // the input thread is parked on stdin; it stops on its next key or at exit
        Err(err) => error!("view failed: {err}"),
    }
    result
}

fn draw_loop(
    receiver: &mpsc::Receiver<InputCmd>,
    handle: &SimHandle,
    out: &mut impl Write,
    interval: Duration,
    rule: &str,
) -> golife::Result<()> {
    let mut view_origin = pos!(0, 0);
    loop {
        let status = handle.status()?;
        if !handle_inputs(receiver, handle, &mut view_origin, status, interval)? {
            return Ok(());
        }
        let population = handle.population()?;
        let status = handle.status()?;
        let mut canvas = Canvas::from_screen()?;
        canvas.draw_population(&population, view_origin);
        canvas.display(&status_line(&status, rule), out)?;
        thread::sleep(VIEW_REFRESH_INTERVAL);
    }
}

/// Returns `false` once the user asked to quit.
fn handle_inputs(
    receiver: &mpsc::Receiver<InputCmd>,
    handle: &SimHandle,
    view_origin: &mut Pos,
    status: Status,
    interval: Duration,
) -> golife::Result<bool> {
    while let Ok(cmd) = receiver.try_recv() {
        match cmd {
            InputCmd::Exit => return Ok(false),
            InputCmd::Move(direction) => {
                *view_origin = *view_origin
                    + match direction {
                        Dir::Up => pos!(0, -4),
                        Dir::Down => pos!(0, 4),
                        Dir::Left => pos!(-4, 0),
                        Dir::Right => pos!(4, 0),
                    }
            }
            InputCmd::Toggle if status.running => handle.pause()?,
            InputCmd::Toggle => handle.start(interval)?,
            InputCmd::Step => handle.step()?,
            InputCmd::Reset => handle.reset()?,
            InputCmd::Randomize => handle.set_population(None)?,
        }
    }
    Ok(true)
}

fn status_line(status: &Status, rule: &str) -> String {
    let state = if status.running { "running" } else { "paused" };
    format!(
        " {state} | rule {rule} | generation {} | alive {} | [space] start/pause [s] step [r] reset [n] random [q] quit ",
        status.generation, status.alive
    )
}
