//! Game session: the single serialized command loop
//!
//! Player input, timer ticks and run control all arrive as [`Command`]s.
//! Each command runs to completion before the next is looked at, so a tick
//! that empties health is fully applied (run stopped, timer disarmed) before a
//! later answer is evaluated.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::sim::{
    Board, BoardEngine, GridPos, MoveOutcome, Rejection, RunState, TickOutcome, TickScheduler,
    Timer,
};
use crate::tuning::{Tuning, TuningError};

/// Input to the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Raw player text
    Submit(String),
    /// Already-parsed answer
    Answer(u32),
    /// A timer firing from registration `generation`
    Tick { generation: u64 },
    /// End the run now
    Stop,
    /// Fresh board and run state
    Reset { seed: Option<u64> },
}

/// Change notification published after each command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Moved { from: GridPos, to: GridPos },
    Rejected(Rejection),
    HealthChanged { health: u32 },
    ScoreChanged { score: u64 },
    RunStopped { score: u64 },
    RunReset { seed: u64 },
}

type Observer = Box<dyn FnMut(&GameEvent)>;

pub struct GameSession<T: Timer> {
    engine: BoardEngine,
    run: RunState,
    ticks: TickScheduler<T>,
    observers: Vec<Observer>,
}

impl<T: Timer> GameSession<T> {
    /// Start a session with a generated board and an armed timer
    pub fn new(timer: T, seed: Option<u64>, tuning: Tuning) -> Result<Self, TuningError> {
        Ok(Self::with_engine(BoardEngine::new(seed, tuning)?, timer))
    }

    /// Start a session around an existing engine
    pub fn with_engine(engine: BoardEngine, timer: T) -> Self {
        let tuning = *engine.tuning();
        let run = RunState::new(tuning.starting_health);
        let mut ticks = TickScheduler::new(timer, &tuning);
        ticks.sync(&run);
        log::info!("Session started (seed {})", engine.seed());
        Self {
            engine,
            run,
            ticks,
            observers: Vec::new(),
        }
    }

    /// Register a callback that sees every event, in order
    pub fn subscribe(&mut self, observer: impl FnMut(&GameEvent) + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn health(&self) -> u32 {
        self.run.health()
    }

    pub fn score(&self) -> u64 {
        self.run.score()
    }

    pub fn is_running(&self) -> bool {
        self.run.is_running()
    }

    pub fn run(&self) -> &RunState {
        &self.run
    }

    pub fn engine(&self) -> &BoardEngine {
        &self.engine
    }

    pub fn board(&self) -> &Board {
        self.engine.board()
    }

    pub fn tuning(&self) -> &Tuning {
        self.engine.tuning()
    }

    pub fn ticks(&self) -> &TickScheduler<T> {
        &self.ticks
    }

    /// Generation a tick must carry to be applied
    pub fn tick_generation(&self) -> u64 {
        self.ticks.generation()
    }

    /// Apply one command and publish the events it produced
    pub fn handle(&mut self, command: Command) -> Vec<GameEvent> {
        let events = match command {
            Command::Submit(raw) => {
                let outcome = self.engine.submit_input(&mut self.run, &raw);
                self.move_events(outcome)
            }
            Command::Answer(value) => {
                let outcome = self.engine.submit_answer(&mut self.run, value);
                self.move_events(outcome)
            }
            Command::Tick { generation } => self.tick(generation),
            Command::Stop => self.stop(),
            Command::Reset { seed } => self.reset(seed),
        };

        self.ticks.sync(&self.run);
        for event in &events {
            for observer in &mut self.observers {
                observer(event);
            }
        }
        events
    }

    fn move_events(&self, outcome: MoveOutcome) -> Vec<GameEvent> {
        match outcome {
            MoveOutcome::Moved { from, to } => vec![
                GameEvent::Moved { from, to },
                GameEvent::ScoreChanged {
                    score: self.run.score(),
                },
                GameEvent::HealthChanged {
                    health: self.run.health(),
                },
            ],
            MoveOutcome::Rejected(reason) => vec![GameEvent::Rejected(reason)],
        }
    }

    fn tick(&mut self, generation: u64) -> Vec<GameEvent> {
        match self.ticks.tick(&mut self.run, generation) {
            TickOutcome::Ignored => Vec::new(),
            TickOutcome::Decayed { health } => vec![GameEvent::HealthChanged { health }],
            TickOutcome::RunEnded => vec![
                GameEvent::HealthChanged { health: 0 },
                GameEvent::RunStopped {
                    score: self.run.score(),
                },
            ],
        }
    }

    fn stop(&mut self) -> Vec<GameEvent> {
        if !self.run.is_running() {
            return Vec::new();
        }
        self.run.set_running(false);
        log::info!("Run stopped with score {}", self.run.score());
        vec![GameEvent::RunStopped {
            score: self.run.score(),
        }]
    }

    fn reset(&mut self, seed: Option<u64>) -> Vec<GameEvent> {
        self.run.reset();
        self.engine.initialize(seed);
        log::info!("Run reset (seed {})", self.engine.seed());
        vec![
            GameEvent::RunReset {
                seed: self.engine.seed(),
            },
            GameEvent::HealthChanged {
                health: self.run.health(),
            },
            GameEvent::ScoreChanged {
                score: self.run.score(),
            },
        ]
    }
}

impl<T: Timer + fmt::Debug> fmt::Debug for GameSession<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameSession")
            .field("engine", &self.engine)
            .field("run", &self.run)
            .field("ticks", &self.ticks)
            .field("observers", &self.observers.len())
            .finish()
    }
}
