//! Subcommands of the vrank CLI.

mod committers;
pub use committers::CommittersCommand;

mod download;
pub use download::DownloadCommand;

mod score;
pub use score::ScoreCommand;
