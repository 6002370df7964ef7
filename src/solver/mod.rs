//! Group formation: the partitioning search, leftover placement and
//! captain selection.

pub mod captain;
pub mod leftover;
pub mod partition;
pub mod rules;

pub use captain::choose_captain;
pub use leftover::{resolve, Leftover, Resolution};
pub use partition::{Deadline, Partition, Partitioner};
pub use rules::GroupRules;
