//! 同步原语模块
//!
//! 基于 embassy-sync 封装:
//! - `primitives`: 统一 RawMutex 的类型别名
//! - `queue`: 有界队列门面 (本示例唯一的任务间共享资源)

pub mod primitives;
pub mod queue;

pub use primitives::{CriticalChannel, CriticalMutex};
pub use queue::BoundedQueue;
