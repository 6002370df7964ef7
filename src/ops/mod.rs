pub mod channel_ops;
pub mod followup_ops;
pub mod group_ops;
pub mod round_ops;
pub mod sweep_ops;
