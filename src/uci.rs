//! Universal Chess Interface (UCI) command processing.
//!
//! UCI is a line-based text protocol between chess engines and graphical
//! interfaces. This module parses one command line at a time and applies it
//! to the engine's session position, returning the protocol lines to send.
//!
//! ## Supported Commands
//!
//! - `uci` - Identify the engine, answer `uciok`
//! - `setoption ...` - Accepted and ignored
//! - `isready` - Answer `readyok`
//! - `ucinewgame` - Reset to the initial position
//! - `position startpos [moves ...]` - Initial position plus moves
//! - `position fen <6 fields> [moves ...]` - FEN position plus moves
//! - `go ...` - Search at the configured depth, answer `bestmove <move>`
//! - `stop` - Accepted; a running search is not interrupted
//! - `quit` - Raise the quit flag
//!
//! Anything else is silently ignored, as the protocol requires.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use std::sync::atomic::AtomicBool;
//! use badchess_rust::constants::EngineConfig;
//! use badchess_rust::uci::UciEngine;
//!
//! let engine = UciEngine::new(EngineConfig::default(), Arc::new(AtomicBool::new(false)));
//! assert_eq!(engine.execute("isready").unwrap(), vec!["readyok".to_string()]);
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, info, warn};
use thiserror::Error;

use crate::constants::{EngineConfig, ENGINE_AUTHOR, ENGINE_NAME};
use crate::position::{parse_fen, play_moves, start_position, str_move, Position, PositionError};
use crate::search::{find_best_move, SearchError};

/// Number of whitespace-separated fields in a FEN description.
const FEN_FIELDS: usize = 6;

/// Errors raised while handling a command. None of them is fatal: the
/// command is dropped and nothing is sent back.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// `position` with neither `startpos` nor `fen`.
    #[error("position: expected `startpos` or `fen`")]
    MissingPositionKind,
    /// `position fen` with fewer than six FEN fields.
    #[error("position fen: expected 6 fields, got {0}")]
    ShortFen(usize),
    /// Something other than `moves` after the position description.
    #[error("position: expected `moves`, got `{0}`")]
    UnexpectedToken(String),
    #[error(transparent)]
    Position(#[from] PositionError),
    #[error(transparent)]
    Search(#[from] SearchError),
}

/// A parsed UCI command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UciCommand {
    Uci,
    SetOption(String),
    IsReady,
    UciNewGame,
    /// `fen` is `None` for `startpos`.
    Position {
        fen: Option<String>,
        moves: Vec<String>,
    },
    Go,
    Stop,
    Quit,
}

impl UciCommand {
    /// Parse one input line.
    ///
    /// Returns `Ok(None)` for blank lines and unknown commands, and an error
    /// for a known command with malformed fields.
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((&command, args)) = words.split_first() else {
            return Ok(None);
        };

        let cmd = match command {
            "uci" => Self::Uci,
            "setoption" => Self::SetOption(args.join(" ")),
            "isready" => Self::IsReady,
            "ucinewgame" => Self::UciNewGame,
            "position" => Self::parse_position(args)?,
            "go" => Self::Go,
            "stop" => Self::Stop,
            "quit" => Self::Quit,
            _ => return Ok(None),
        };
        Ok(Some(cmd))
    }

    /// Parse the arguments of `position [startpos | fen <f1..f6>] [moves ...]`.
    fn parse_position(args: &[&str]) -> Result<Self, CommandError> {
        let (fen, rest) = match args.split_first() {
            Some((&"startpos", rest)) => (None, rest),
            Some((&"fen", rest)) => {
                let fields = rest.iter().take(FEN_FIELDS).count();
                if fields < FEN_FIELDS {
                    return Err(CommandError::ShortFen(fields));
                }
                let (fen, rest) = rest.split_at(FEN_FIELDS);
                (Some(fen.join(" ")), rest)
            }
            _ => return Err(CommandError::MissingPositionKind),
        };

        let moves = match rest.split_first() {
            None => Vec::new(),
            Some((&"moves", moves)) => moves.iter().map(|m| m.to_string()).collect(),
            Some((other, _)) => return Err(CommandError::UnexpectedToken(other.to_string())),
        };

        Ok(Self::Position { fen, moves })
    }
}

/// UCI engine state: the session position and the shared quit flag.
///
/// All methods take `&self` so one engine can be shared between the
/// consumer threads; the position is guarded by a mutex.
pub struct UciEngine {
    /// Current game position
    pos: Mutex<Position>,
    /// Depth settings used by `go`
    config: EngineConfig,
    /// Raised by `quit`, observed by every loop thread
    quit: Arc<AtomicBool>,
}

impl UciEngine {
    /// Create an engine at the initial position.
    pub fn new(config: EngineConfig, quit: Arc<AtomicBool>) -> Self {
        Self {
            pos: Mutex::new(start_position()),
            config,
            quit,
        }
    }

    /// A copy of the current session position.
    pub fn position(&self) -> Position {
        *self.session()
    }

    /// Has `quit` been received?
    pub fn quit_requested(&self) -> bool {
        self.quit.load(Ordering::Acquire)
    }

    fn session(&self) -> MutexGuard<'_, Position> {
        self.pos.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Handle one protocol line and return the lines to send back.
    pub fn execute(&self, line: &str) -> Result<Vec<String>, CommandError> {
        debug!("Command received: {line}");
        match UciCommand::parse(line)? {
            Some(cmd) => self.apply(cmd),
            None => Ok(Vec::new()),
        }
    }

    /// Apply a parsed command.
    pub fn apply(&self, cmd: UciCommand) -> Result<Vec<String>, CommandError> {
        match cmd {
            UciCommand::Uci => Ok(vec![
                format!("id name {ENGINE_NAME}"),
                format!("id author {ENGINE_AUTHOR}"),
                "uciok".to_string(),
            ]),

            UciCommand::SetOption(option) => {
                warn!("setoption ignored: {option}");
                Ok(Vec::new())
            }

            UciCommand::IsReady => Ok(vec!["readyok".to_string()]),

            UciCommand::UciNewGame => {
                *self.session() = start_position();
                Ok(Vec::new())
            }

            UciCommand::Position { fen, moves } => {
                // Build the whole position first so a bad move leaves the session as it was.
                let base = match fen {
                    Some(fen) => parse_fen(&fen)?,
                    None => start_position(),
                };
                let pos = play_moves(&base, moves.as_slice())?;
                *self.session() = pos;
                Ok(Vec::new())
            }

            UciCommand::Go => {
                let pos = self.position();
                let result = find_best_move(&pos, self.config.depth, self.config.max_depth)?;
                if result.best_move().is_none() {
                    info!("no legal moves in {pos}");
                }
                Ok(vec![format!("bestmove {}", str_move(result.best_move()))])
            }

            UciCommand::Stop => {
                debug!("stop has no effect on a running search");
                Ok(Vec::new())
            }

            UciCommand::Quit => {
                self.quit.store(true, Ordering::Release);
                debug!("exit set");
                Ok(Vec::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::{legal_moves, parse_move};

    fn engine() -> UciEngine {
        UciEngine::new(EngineConfig::default(), Arc::new(AtomicBool::new(false)))
    }

    #[test]
    fn test_parse_blank_and_unknown() {
        assert_eq!(UciCommand::parse(""), Ok(None));
        assert_eq!(UciCommand::parse("   "), Ok(None));
        assert_eq!(UciCommand::parse("debug on"), Ok(None));
        assert_eq!(UciCommand::parse("ponderhit"), Ok(None));
    }

    #[test]
    fn test_parse_startpos_with_moves() {
        let cmd = UciCommand::parse("position startpos moves e2e4 e7e5").unwrap();
        assert_eq!(
            cmd,
            Some(UciCommand::Position {
                fen: None,
                moves: vec!["e2e4".to_string(), "e7e5".to_string()],
            })
        );
    }

    #[test]
    fn test_parse_startpos_without_moves() {
        let cmd = UciCommand::parse("position startpos").unwrap();
        assert_eq!(cmd, Some(UciCommand::Position { fen: None, moves: vec![] }));
    }

    #[test]
    fn test_parse_fen() {
        let cmd = UciCommand::parse(
            "position fen rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1 moves e7e5",
        )
        .unwrap();
        assert_eq!(
            cmd,
            Some(UciCommand::Position {
                fen: Some("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1".to_string()),
                moves: vec!["e7e5".to_string()],
            })
        );
    }

    #[test]
    fn test_parse_malformed_position() {
        assert_eq!(UciCommand::parse("position"), Err(CommandError::MissingPositionKind));
        assert_eq!(UciCommand::parse("position somewhere"), Err(CommandError::MissingPositionKind));
        assert_eq!(UciCommand::parse("position fen 8/8/8 w"), Err(CommandError::ShortFen(2)));
        assert_eq!(
            UciCommand::parse("position startpos e2e4"),
            Err(CommandError::UnexpectedToken("e2e4".to_string()))
        );
    }

    #[test]
    fn test_uci_command() {
        let engine = engine();
        let response = engine.execute("uci").unwrap();
        assert_eq!(response, vec!["id name badchess", "id author Kevin Schaul", "uciok"]);
    }

    #[test]
    fn test_isready_command() {
        assert_eq!(engine().execute("isready").unwrap(), vec!["readyok"]);
    }

    #[test]
    fn test_silent_commands() {
        let engine = engine();
        for line in ["setoption name Hash value 16", "stop", "ucinewgame", "register later", ""] {
            assert!(engine.execute(line).unwrap().is_empty(), "{line} produced output");
        }
        assert!(!engine.quit_requested());
    }

    #[test]
    fn test_position_replaces_rather_than_appends() {
        let engine = engine();
        engine.execute("position startpos moves e2e4").unwrap();
        engine.execute("position startpos moves e2e4 e7e5").unwrap();
        let expected = play_moves(&start_position(), &["e2e4", "e7e5"]).unwrap();
        assert_eq!(engine.position(), expected);
    }

    #[test]
    fn test_position_fen_with_moves() {
        let engine = engine();
        engine
            .execute("position fen 4k3/8/8/8/8/8/4P3/4K3 w - - 0 1 moves e2e4 e8d7")
            .unwrap();
        let base = parse_fen("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1").unwrap();
        let expected = play_moves(&base, &["e2e4", "e8d7"]).unwrap();
        assert_eq!(engine.position(), expected);
    }

    #[test]
    fn test_bad_position_keeps_session() {
        let engine = engine();
        engine.execute("position startpos moves d2d4").unwrap();
        let before = engine.position();

        assert!(engine.execute("position startpos moves e2e4 e2e4").is_err());
        assert!(engine.execute("position fen not a real fen at all").is_err());
        assert!(engine.execute("position fen 8/8").is_err());
        assert_eq!(engine.position(), before);
    }

    #[test]
    fn test_ucinewgame_resets() {
        let engine = engine();
        engine.execute("position startpos moves e2e4").unwrap();
        engine.execute("ucinewgame").unwrap();
        assert_eq!(engine.position(), start_position());
    }

    #[test]
    fn test_go_returns_legal_move() {
        let engine = engine();
        engine.execute("position startpos moves e2e4 e7e5").unwrap();
        let response = engine.execute("go wtime 1000 btime 1000").unwrap();
        assert_eq!(response.len(), 1);
        let token = response[0].strip_prefix("bestmove ").unwrap();
        let pos = engine.position();
        assert!(parse_move(&pos, token).is_ok());
        assert_eq!(legal_moves(&pos).len(), 29);
    }

    #[test]
    fn test_go_without_legal_moves() {
        let engine = engine();
        engine.execute("position fen 7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert_eq!(engine.execute("go").unwrap(), vec!["bestmove 0000"]);
    }

    #[test]
    fn test_go_rejects_bad_depth() {
        let config = EngineConfig {
            depth: 5,
            max_depth: 4,
            ..EngineConfig::default()
        };
        let engine = UciEngine::new(config, Arc::new(AtomicBool::new(false)));
        let err = engine.execute("go").unwrap_err();
        assert_eq!(
            err,
            CommandError::Search(SearchError::DepthTooLarge { depth: 5, max_depth: 4 })
        );
    }

    #[test]
    fn test_quit_sets_flag() {
        let quit = Arc::new(AtomicBool::new(false));
        let engine = UciEngine::new(EngineConfig::default(), Arc::clone(&quit));
        assert!(engine.execute("quit").unwrap().is_empty());
        assert!(quit.load(Ordering::Acquire));
        assert!(engine.quit_requested());
    }
}
