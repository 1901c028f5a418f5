//! QueueDemo - ESP32-S3 抢占式队列通信示例库
//!
//! FRDM-KL25Z FreeRTOS "Week 3 - Example 01" 的 Embassy 移植版。
//! 本库提供以下核心功能:
//! - 有界队列封装 (基于 embassy-sync Channel)
//! - 共享串口控制台 (固定格式化缓冲区)
//! - 两级优先级的发送/接收任务
//! - 条件编译日志系统
//!
//! 调度器和队列算法均为外部原语 (esp-rtos / embassy-sync)，
//! 本库只实现其上的生产者/消费者协议。

#![cfg_attr(not(test), no_std)]

pub mod tasks;
pub mod sync;
pub mod serial;
pub mod util;

// ===== 重导出常用类型 =====
pub use sync::queue::{BoundedQueue, QueueCreateError, QueueFull, ReceiveTimeout};
pub use serial::Console;

// ===== 版本信息 =====
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// 系统配置常量
///
/// 时序常量是策略参数而非正确性条件: 只要接收超时大于
/// 发送周期，接收方就能始终排空队列。
pub mod config {
    use embassy_time::Duration;

    /// 队列容量 (元素个数)
    pub const QUEUE_CAPACITY: usize = 5;

    /// 发送任务的固定延迟
    pub const SEND_INTERVAL: Duration = Duration::from_millis(50);

    /// 接收任务的有界等待时长
    pub const RECEIVE_TIMEOUT: Duration = Duration::from_millis(100);

    /// 发送任务 1 的标签值 (即发送的负载)
    pub const SENDER_TAG_1: i32 = 100;

    /// 发送任务 2 的标签值
    pub const SENDER_TAG_2: i32 = 200;

    /// 串口波特率
    pub const SERIAL_BAUD_RATE: u32 = 921_600;

    /// 串口发送格式化缓冲区大小 (字节)
    pub const TX_BUFFER_SIZE: usize = 128;
}

/// 队列元素为 4 字节有符号整数，容量 5
pub type ValueQueue = BoundedQueue<i32, { config::QUEUE_CAPACITY }>;
