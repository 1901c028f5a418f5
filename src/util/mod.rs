//! 工具模块
//!
//! - `log`: 条件编译日志系统

pub mod log;
