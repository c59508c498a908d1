mod realtime;
mod redis_broadcaster;

pub use realtime::{BroadcastMessage, LogBroadcaster, RealtimeBroadcaster};
pub use redis_broadcaster::RedisBroadcaster;
