use std::io::Cursor;

use h5sh_io::mock::MockConsoleInput;
use h5sh_io::{
    create_terminal, probe_raw_mode, EditorConfig, FallbackTerminal, Terminal, TerminalKind,
    TerminalPreference,
};

#[test]
fn test_probe_leaves_terminal_restored() {
    let mut input = MockConsoleInput::new();
    let stats = input.mode_stats();

    assert_eq!(probe_raw_mode(&mut input), TerminalKind::Vt100);
    assert!(!stats.is_raw());
    // probing does not consume input
    input.queue_text("ls");
    assert_eq!(input.queued_byte_count(), 2);
}

#[test]
fn test_probe_failure_selects_fallback() {
    let mut input = MockConsoleInput::failing_raw_mode();
    assert_eq!(probe_raw_mode(&mut input), TerminalKind::Fallback);
    assert_eq!(input.mode_stats().restored(), 1);
}

#[test]
fn test_plain_preference_never_probes() {
    let config = EditorConfig::default().with_max_history(10);
    let term = create_terminal(&config, TerminalPreference::Plain);
    assert_eq!(term.kind(), TerminalKind::Fallback);
    assert_eq!(term.history().max_len(), 10);
}

#[test]
fn test_fallback_shares_history_contract() {
    let config = EditorConfig::default().with_max_history(2);
    let mut term = FallbackTerminal::new(Cursor::new(b"a\na\nb\nc\n".to_vec()), Vec::new(), &config);

    for expected in ["a", "a", "b", "c"] {
        assert_eq!(term.get_input("").unwrap(), expected);
    }
    assert_eq!(term.history().iter().collect::<Vec<_>>(), vec!["b", "c"]);
    assert_eq!(term.history().pointer(), 2);
    assert_eq!(term.get_input("").unwrap(), "exit");
    assert_eq!(term.history().len(), 2);
}
