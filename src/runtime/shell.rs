//! Line-oriented admin shell over a [`Simulation`].
//!
//! Parsing and execution are separate: [`Command`] turns one line into a typed
//! request (or a [`CommandError`] for the operator), and [`Shell`] applies it
//! and writes human-readable output to any [`Write`] sink.

use std::io::{self, BufRead, Write};
use std::ops::ControlFlow;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use tracing::debug;

use crate::core::SyncMechanism;
use crate::runtime::simulation::Simulation;
use crate::runtime::worker::WorkerRole;

const HELP: &[&str] = &[
    "help - Display available commands",
    "add-producer <id> <delayMs> - Add a new producer",
    "remove-producer <id> - Remove a producer",
    "add-consumer <id> <delayMs> - Add a new consumer",
    "remove-consumer <id> - Remove a consumer",
    "add-reader <id> <delayMs> - Add a new reader",
    "remove-reader <id> - Remove a reader",
    "switch-sync <mechanism> - Switch synchronization mechanism (MUTEX, RWLOCK, CHANNEL)",
    "state - Display ticket pool state",
    "exit - Exit the simulation",
];

/// One parsed shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `add-producer|add-consumer|add-reader <id> <delayMs>`
    AddWorker {
        /// Worker role.
        role: WorkerRole,
        /// Worker id.
        id: String,
        /// Pause between iterations, in milliseconds.
        delay_ms: u64,
    },
    /// `remove-producer|remove-consumer|remove-reader <id>`
    RemoveWorker {
        /// Worker role.
        role: WorkerRole,
        /// Worker id.
        id: String,
    },
    /// `switch-sync <MECHANISM>`
    SwitchSync(SyncMechanism),
    /// `state`
    State,
    /// `help`
    Help,
    /// `exit`
    Exit,
}

/// Operator input that could not be turned into a [`Command`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// The line was blank.
    #[error("empty command")]
    Empty,
    /// Too few arguments for a known command.
    #[error("Invalid command format. Use: {usage}")]
    Usage {
        /// Expected form.
        usage: &'static str,
    },
    /// A numeric argument did not parse as a non-negative integer.
    #[error("Invalid number format: `{0}`")]
    InvalidNumber(String),
    /// The mechanism name is not recognised.
    #[error("Invalid mechanism `{0}`. Use: MUTEX, RWLOCK, or CHANNEL")]
    InvalidMechanism(String),
    /// The command word is not recognised.
    #[error("Unknown command `{0}`. Type 'help' for available commands.")]
    Unknown(String),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut parts = line.split_whitespace();
        let word = parts.next().ok_or(CommandError::Empty)?;
        let args: Vec<&str> = parts.collect();

        let add = |role: WorkerRole, usage: &'static str| -> Result<Self, CommandError> {
            let [id, delay, ..] = args.as_slice() else {
                return Err(CommandError::Usage { usage });
            };
            let delay_ms = delay
                .parse()
                .map_err(|_| CommandError::InvalidNumber((*delay).to_string()))?;
            Ok(Self::AddWorker {
                role,
                id: (*id).to_string(),
                delay_ms,
            })
        };
        let remove = |role: WorkerRole, usage: &'static str| -> Result<Self, CommandError> {
            let [id, ..] = args.as_slice() else {
                return Err(CommandError::Usage { usage });
            };
            Ok(Self::RemoveWorker {
                role,
                id: (*id).to_string(),
            })
        };

        match word {
            "help" => Ok(Self::Help),
            "state" => Ok(Self::State),
            "exit" => Ok(Self::Exit),
            "add-producer" => add(WorkerRole::Producer, "add-producer <id> <delayMs>"),
            "add-consumer" => add(WorkerRole::Consumer, "add-consumer <id> <delayMs>"),
            "add-reader" => add(WorkerRole::Reader, "add-reader <id> <delayMs>"),
            "remove-producer" => remove(WorkerRole::Producer, "remove-producer <id>"),
            "remove-consumer" => remove(WorkerRole::Consumer, "remove-consumer <id>"),
            "remove-reader" => remove(WorkerRole::Reader, "remove-reader <id>"),
            "switch-sync" => {
                let [name, ..] = args.as_slice() else {
                    return Err(CommandError::Usage {
                        usage: "switch-sync <mechanism>",
                    });
                };
                name.parse()
                    .map(Self::SwitchSync)
                    .map_err(|_| CommandError::InvalidMechanism((*name).to_string()))
            }
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

/// Interactive front end: executes commands against a simulation.
#[derive(Debug)]
pub struct Shell<W: Write> {
    simulation: Simulation,
    out: W,
}

impl<W: Write> Shell<W> {
    /// Wrap `simulation`, writing operator output to `out`.
    pub const fn new(simulation: Simulation, out: W) -> Self {
        Self { simulation, out }
    }

    /// The simulation being driven.
    pub const fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    /// Output sink, e.g. to inspect a buffer in tests.
    pub const fn output(&self) -> &W {
        &self.out
    }

    /// Parse and execute one line. Blank lines do nothing.
    ///
    /// Returns `Break` after `exit`.
    pub fn execute_line(&mut self, line: &str) -> io::Result<ControlFlow<()>> {
        match line.parse::<Command>() {
            Ok(command) => self.execute(command),
            Err(CommandError::Empty) => Ok(ControlFlow::Continue(())),
            Err(err) => {
                debug!(line, error = %err, "rejected shell input");
                writeln!(self.out, "{err}")?;
                Ok(ControlFlow::Continue(()))
            }
        }
    }

    /// Execute a parsed command.
    pub fn execute(&mut self, command: Command) -> io::Result<ControlFlow<()>> {
        match command {
            Command::Help => self.print_help()?,
            Command::State => write!(self.out, "{}", self.simulation.state())?,
            Command::Exit => return Ok(ControlFlow::Break(())),
            Command::SwitchSync(mechanism) => {
                self.simulation.switch_mechanism(mechanism);
                writeln!(self.out, "Switched to {mechanism} implementation")?;
            }
            Command::AddWorker { role, id, delay_ms } => {
                match self
                    .simulation
                    .add_worker(role, &id, Duration::from_millis(delay_ms))
                {
                    Ok(()) => writeln!(self.out, "{} {id} added", role.label())?,
                    Err(err) => writeln!(self.out, "Error: {err}")?,
                }
            }
            Command::RemoveWorker { role, id } => {
                match self.simulation.remove_worker(role, &id) {
                    Some(_) => writeln!(self.out, "{} {id} removed", role.label())?,
                    None => writeln!(self.out, "{} {id} not found", role.label())?,
                }
            }
        }
        Ok(ControlFlow::Continue(()))
    }

    /// Run the read-eval loop until `exit` or end of input, then stop every
    /// worker.
    pub fn run<R: BufRead>(&mut self, input: R) -> io::Result<()> {
        writeln!(self.out, "Welcome to Ticket System Simulation")?;
        writeln!(self.out, "Pool capacity: {}", self.simulation.pool().capacity())?;
        writeln!(self.out, "Available commands:")?;
        self.print_help()?;

        let mut lines = input.lines();
        loop {
            write!(self.out, "> ")?;
            self.out.flush()?;
            let Some(line) = lines.next() else {
                break;
            };
            if self.execute_line(&line?)?.is_break() {
                break;
            }
        }

        for (role, id) in self.simulation.shutdown() {
            writeln!(self.out, "{} {id} removed", role.label())?;
        }
        self.out.flush()
    }

    fn print_help(&mut self) -> io::Result<()> {
        for line in HELP {
            writeln!(self.out, "{line}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_add_worker() {
        assert_eq!(
            "add-producer P1 250".parse::<Command>().unwrap(),
            Command::AddWorker {
                role: WorkerRole::Producer,
                id: "P1".into(),
                delay_ms: 250,
            }
        );
        assert_eq!(
            "  add-reader   R9  0  extra".parse::<Command>().unwrap(),
            Command::AddWorker {
                role: WorkerRole::Reader,
                id: "R9".into(),
                delay_ms: 0,
            }
        );
    }

    #[test]
    fn test_parse_rejects_bad_delay() {
        assert_eq!(
            "add-consumer C1 fast".parse::<Command>(),
            Err(CommandError::InvalidNumber("fast".into()))
        );
        assert_eq!(
            "add-consumer C1 -5".parse::<Command>(),
            Err(CommandError::InvalidNumber("-5".into()))
        );
    }

    #[test]
    fn test_parse_missing_arguments() {
        assert_eq!(
            "add-producer P1".parse::<Command>(),
            Err(CommandError::Usage {
                usage: "add-producer <id> <delayMs>"
            })
        );
        assert_eq!(
            "remove-reader".parse::<Command>(),
            Err(CommandError::Usage {
                usage: "remove-reader <id>"
            })
        );
        assert_eq!(
            "switch-sync".parse::<Command>(),
            Err(CommandError::Usage {
                usage: "switch-sync <mechanism>"
            })
        );
    }

    #[test]
    fn test_parse_switch_sync() {
        assert_eq!(
            "switch-sync RWLOCK".parse::<Command>().unwrap(),
            Command::SwitchSync(SyncMechanism::RwLock)
        );
        assert_eq!(
            "switch-sync FUTEX".parse::<Command>(),
            Err(CommandError::InvalidMechanism("FUTEX".into()))
        );
    }

    #[test]
    fn test_parse_unknown_and_empty() {
        assert_eq!(
            "launch".parse::<Command>(),
            Err(CommandError::Unknown("launch".into()))
        );
        assert_eq!("   ".parse::<Command>(), Err(CommandError::Empty));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            CommandError::Usage {
                usage: "remove-producer <id>"
            }
            .to_string(),
            "Invalid command format. Use: remove-producer <id>"
        );
        assert_eq!(
            CommandError::Unknown("x".into()).to_string(),
            "Unknown command `x`. Type 'help' for available commands."
        );
    }
}
