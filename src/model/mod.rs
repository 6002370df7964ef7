pub mod ids;
pub mod member;
pub mod channel;
pub mod pool;
pub mod round;
pub mod group;
pub mod history;
pub mod settings;

// Re-exports for convenience
pub use ids::Id;
pub use member::Member;
pub use channel::{Channel, ChannelConfig};
pub use pool::{CandidatePool, CandidateProvider};
pub use round::{Round, RoundCounts};
pub use group::{Group, Outcome};
pub use history::{CaptainHistory, HistoryFact, MeetingHistory};
pub use settings::SolverSettings;
