//! Tests for mechanism and command parsing

use ticket_pool::core::{SyncMechanism, Ticket};
use ticket_pool::runtime::{Command, CommandError, WorkerRole};

#[test]
fn test_mechanism_names() {
    let names: Vec<String> = SyncMechanism::ALL.iter().map(ToString::to_string).collect();
    assert_eq!(names, ["MUTEX", "RWLOCK", "CHANNEL"]);
    assert_eq!(SyncMechanism::default(), SyncMechanism::Mutex);
}

#[test]
fn test_mechanism_parse_is_case_insensitive() {
    for text in ["mutex", "Mutex", "MUTEX", "synchronized"] {
        assert_eq!(text.parse::<SyncMechanism>().unwrap(), SyncMechanism::Mutex);
    }
    for text in ["rwlock", "RwLock", "reentrant_lock"] {
        assert_eq!(text.parse::<SyncMechanism>().unwrap(), SyncMechanism::RwLock);
    }
    assert!("".parse::<SyncMechanism>().is_err());
}

#[test]
fn test_ticket_serde_is_plain_string() {
    let json = serde_json::to_string(&Ticket::from("Ticket-C1-3")).unwrap();
    assert_eq!(json, "\"Ticket-C1-3\"");
}

#[test]
fn test_every_command_parses() {
    let cases = [
        ("help", Command::Help),
        ("state", Command::State),
        ("exit", Command::Exit),
        (
            "remove-consumer C2",
            Command::RemoveWorker {
                role: WorkerRole::Consumer,
                id: "C2".into(),
            },
        ),
        (
            "add-consumer C2 100",
            Command::AddWorker {
                role: WorkerRole::Consumer,
                id: "C2".into(),
                delay_ms: 100,
            },
        ),
        ("switch-sync blocking_queue", Command::SwitchSync(SyncMechanism::Channel)),
    ];
    for (line, expected) in cases {
        assert_eq!(line.parse::<Command>().unwrap(), expected, "{line}");
    }
}

#[test]
fn test_commands_are_case_sensitive() {
    assert_eq!(
        "HELP".parse::<Command>(),
        Err(CommandError::Unknown("HELP".into()))
    );
}
