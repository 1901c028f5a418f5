//! 接收任务
//!
//! 以有界等待从共享队列取值并在串口上报告。接收任务运行在
//! 更高优先级的中断执行器上，队列一旦非空即抢占发送任务，
//! 因此每次轮询前队列都应当已被排空。

use embassy_time::Duration;
use embedded_io::Write;
use portable_atomic::{AtomicU32, Ordering};

use crate::serial::Console;
use crate::sync::queue::ReceiveTimeout;
use crate::util::log::*;
use crate::ValueQueue;

use super::{MSG_QUEUE_NOT_EMPTY, MSG_RECEIVE_TIMEOUT};

// ===== 软错误统计 =====
/// 接收超时事件总数
static RECEIVE_TIMEOUTS: AtomicU32 = AtomicU32::new(0);

/// 占用量异常 (轮询前队列非空) 事件总数
static OCCUPANCY_VIOLATIONS: AtomicU32 = AtomicU32::new(0);

/// 一次接收轮询的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiveOutcome {
    /// 在等待窗口内取到值
    Received(i32),
    /// 等待窗口内无数据
    TimedOut,
}

/// 单次接收轮询
///
/// 先检查占用量: 接收方优先级更高，正常情况下此时队列必空，
/// 非空说明时序参数失调；随后做有界等待接收。两类异常都只
/// 记录诊断，不致命。`timeout` 作为参数传入，测试可以直接
/// 构造超时而不必依赖真实的 50/100ms 时序。
pub async fn poll_once<W: Write>(
    queue: &ValueQueue,
    console: &Console<W>,
    timeout: Duration,
) -> ReceiveOutcome {
    if !queue.is_empty() {
        OCCUPANCY_VIOLATIONS.fetch_add(1, Ordering::Relaxed);
        log_warn!("unexpected queue occupancy: {}", queue.len());
        console.write_line(MSG_QUEUE_NOT_EMPTY).await;
    }

    match queue.receive_timeout(timeout).await {
        Ok(value) => {
            console
                .write_fmt(format_args!("Received = {:4}\r\n", value))
                .await;
            ReceiveOutcome::Received(value)
        }
        Err(ReceiveTimeout) => {
            RECEIVE_TIMEOUTS.fetch_add(1, Ordering::Relaxed);
            console.write_line(MSG_RECEIVE_TIMEOUT).await;
            ReceiveOutcome::TimedOut
        }
    }
}

/// 接收任务主循环，永不返回
pub async fn run<W: Write>(queue: &ValueQueue, console: &Console<W>, timeout: Duration) {
    log_info!("Receiver task started");

    let mut received: u64 = 0;

    loop {
        if let ReceiveOutcome::Received(_) = poll_once(queue, console, timeout).await {
            received += 1;
            if received % 100 == 0 {
                log_debug!("Receiver: {} values received", received);
            }
        }
    }
}

/// 接收超时事件总数
pub fn receive_timeouts() -> u32 {
    RECEIVE_TIMEOUTS.load(Ordering::Relaxed)
}

/// 占用量异常事件总数
pub fn occupancy_violations() -> u32 {
    OCCUPANCY_VIOLATIONS.load(Ordering::Relaxed)
}

// ===== 固件任务封装 =====

/// 接收任务入口，运行在高优先级中断执行器
#[cfg(feature = "firmware")]
#[embassy_executor::task]
pub async fn receiver_task(
    queue: &'static ValueQueue,
    console: &'static crate::serial::SerialConsole,
) {
    run(queue, console, crate::config::RECEIVE_TIMEOUT).await;
}
