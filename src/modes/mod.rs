pub mod agent_play;
pub mod human;
pub mod session;
pub mod train;
pub mod tui;

pub use agent_play::{AgentPlayMode, PlaybackSpeed};
pub use human::HumanMode;
pub use session::PlaySession;
pub use train::{EpisodeSummary, TrainConfig, TrainMode};
