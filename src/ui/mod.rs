pub mod commands;
pub mod session;
pub mod terminal;

pub use commands::{parse_line, SessionCommand};
pub use session::{spawn_stdin_reader, Flow, InteractiveSession, SessionEvent};
