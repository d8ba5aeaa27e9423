//! Tilestep terminal entry point
//!
//! Merges stdin lines and timer ticks into one channel and feeds them to the
//! session in arrival order.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::mpsc::{self, Receiver};
use std::thread;

use clap::Parser;

use tilestep::feedback::{self, TerminalFeedback};
use tilestep::platform::{HELP, Input, ThreadTimer, parse_line};
use tilestep::{Command, GameEvent, GameSession, Settings, Tuning};

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Seed for a reproducible first board
    #[arg(long)]
    seed: Option<u64>,
    /// JSON file overriding game balance
    #[arg(long)]
    tuning: Option<PathBuf>,
    /// Start with sound effects off
    #[arg(long)]
    no_sfx: bool,
    /// Start with haptics off
    #[arg(long)]
    no_haptics: bool,
}

enum Message {
    Line(String),
    Session(Command),
    InputClosed,
}

type Session = GameSession<ThreadTimer<Message>>;

enum Flow {
    Continue,
    Quit,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let tuning = match args.tuning.as_deref().map(Tuning::load).transpose() {
        Ok(tuning) => tuning.unwrap_or_default(),
        Err(err) => {
            log::error!("{err}");
            return ExitCode::FAILURE;
        }
    };

    let mut settings = Settings::default();
    settings.set_enable_sfx(!args.no_sfx);
    settings.set_enable_haptics(!args.no_haptics);

    match run(args.seed, tuning, settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(seed: Option<u64>, tuning: Tuning, mut settings: Settings) -> io::Result<()> {
    let (tx, rx) = mpsc::channel();

    let input = tx.clone();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if input.send(Message::Line(line)).is_err() {
                        return;
                    }
                }
                Err(err) => {
                    log::warn!("Failed to read stdin: {err}");
                    break;
                }
            }
        }
        let _ = input.send(Message::InputClosed);
    });

    let timer = ThreadTimer::with_message(tx, |generation| {
        Message::Session(Command::Tick { generation })
    });
    let mut session = GameSession::new(timer, seed, tuning).map_err(io::Error::other)?;
    let mut sink = TerminalFeedback::new(io::stdout());
    let mut out = io::stdout();

    writeln!(out, "{HELP}\n")?;
    render(&mut out, &session)?;

    while let Ok(message) = rx.recv() {
        let command = match message {
            Message::InputClosed => break,
            Message::Session(command) => command,
            Message::Line(line) => match parse_line(&line) {
                Input::Answer(raw) => Command::Submit(raw),
                Input::Reset => Command::Reset { seed: None },
                Input::Quit => break,
                Input::Help => {
                    writeln!(out, "{HELP}")?;
                    status(&mut out, &session)?;
                    continue;
                }
                Input::ToggleSfx => {
                    settings.toggle_sfx();
                    writeln!(out, "Sound {}", on_off(settings.enable_sfx))?;
                    status(&mut out, &session)?;
                    continue;
                }
                Input::ToggleHaptics => {
                    settings.toggle_haptics();
                    writeln!(out, "Haptics {}", on_off(settings.enable_haptics))?;
                    status(&mut out, &session)?;
                    continue;
                }
            },
        };

        let events = session.handle(command);
        for event in &events {
            feedback::dispatch(&settings, event, &mut sink);
        }
        show(&mut out, &session, &events)?;

        if !session.is_running() {
            if let Flow::Quit = summary(&mut out, &rx, &mut session, &mut settings, &mut sink)? {
                break;
            }
        }
    }

    writeln!(out, "\nBye! Final score: {}", session.score())?;
    Ok(())
}

/// Result screen: feedback is silenced until the player leaves it
fn summary(
    out: &mut impl Write,
    rx: &Receiver<Message>,
    session: &mut Session,
    settings: &mut Settings,
    sink: &mut TerminalFeedback<io::Stdout>,
) -> io::Result<Flow> {
    let quiet = settings.suppress();
    writeln!(out, "\n=== Run over ===")?;
    writeln!(out, "Score: {}", session.score())?;
    writeln!(out, "Type r to play again or q to quit.")?;

    while let Ok(message) = rx.recv() {
        let line = match message {
            Message::Line(line) => line,
            Message::InputClosed => return Ok(Flow::Quit),
            // Stale ticks from the finished run
            Message::Session(_) => continue,
        };
        match parse_line(&line) {
            Input::Reset => {
                let events = session.handle(Command::Reset { seed: None });
                for event in &events {
                    feedback::dispatch(&quiet, event, sink);
                }
                drop(quiet);
                render(out, session)?;
                return Ok(Flow::Continue);
            }
            Input::Quit => return Ok(Flow::Quit),
            _ => writeln!(out, "Type r to play again or q to quit.")?,
        }
    }
    Ok(Flow::Quit)
}

/// Redraw after player-driven changes only. Tick decay is picked up by the
/// next prompt so a half-typed answer is never overwritten.
fn show(out: &mut impl Write, session: &Session, events: &[GameEvent]) -> io::Result<()> {
    let mut prompt = false;
    for event in events {
        match event {
            GameEvent::Moved { .. } | GameEvent::RunReset { .. } => return render(out, session),
            GameEvent::Rejected(reason) => {
                writeln!(out, "✗ {reason}")?;
                prompt = true;
            }
            _ => {}
        }
    }
    if prompt { status(out, session) } else { Ok(()) }
}

fn render(out: &mut impl Write, session: &Session) -> io::Result<()> {
    writeln!(out)?;
    write!(out, "{}", session.board())?;
    status(out, session)
}

fn status(out: &mut impl Write, session: &Session) -> io::Result<()> {
    write!(
        out,
        "health {:>3}  score {:>4}  > ",
        session.health(),
        session.score()
    )?;
    out.flush()
}

fn on_off(enabled: bool) -> &'static str {
    if enabled { "on" } else { "off" }
}
