//! 发送任务
//!
//! 周期性地把自己的标签值非阻塞发送进共享队列。
//! 两个实例以不同标签 (100 / 200) 运行在同一个任务池里。

use embassy_time::{Duration, Timer};
use embedded_io::Write;
use portable_atomic::{AtomicU32, Ordering};

use crate::serial::Console;
use crate::util::log::*;
use crate::ValueQueue;

use super::MSG_QUEUE_FULL;

// ===== 软错误统计 =====
/// 发送失败 (队列满) 事件总数
static SEND_FAILURES: AtomicU32 = AtomicU32::new(0);

/// 一次发送尝试的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// 值已入队
    Sent,
    /// 队列满，值被丢弃并记录诊断
    QueueFull,
}

/// 单次非阻塞发送尝试
///
/// 负载设计上保证接收方排空快于发送方填充，队列满因此是
/// 应用层异常: 记录诊断后继续，绝不致命。
pub async fn send_once<W: Write>(
    queue: &ValueQueue,
    console: &Console<W>,
    tag: i32,
) -> SendOutcome {
    match queue.try_send(tag) {
        Ok(()) => SendOutcome::Sent,
        Err(_) => {
            SEND_FAILURES.fetch_add(1, Ordering::Relaxed);
            console.write_line(MSG_QUEUE_FULL).await;
            SendOutcome::QueueFull
        }
    }
}

/// 发送任务主循环，永不返回
///
/// 每次迭代先做固定延迟，再零等待发送标签值，失败只报告。
pub async fn run<W: Write>(
    queue: &ValueQueue,
    console: &Console<W>,
    tag: i32,
    interval: Duration,
) {
    log_info!("Sender task started (tag = {})", tag);

    let mut sent: u64 = 0;

    loop {
        // 留出时间让 UART 把数据发完
        Timer::after(interval).await;

        if let SendOutcome::Sent = send_once(queue, console, tag).await {
            sent += 1;
            if sent % 100 == 0 {
                log_debug!("Sender {}: {} values sent", tag, sent);
            }
        }
    }
}

/// 发送失败事件总数
pub fn send_failures() -> u32 {
    SEND_FAILURES.load(Ordering::Relaxed)
}

// ===== 固件任务封装 =====

/// 发送任务入口，两个实例共用一个任务池
#[cfg(feature = "firmware")]
#[embassy_executor::task(pool_size = 2)]
pub async fn sender_task(
    queue: &'static ValueQueue,
    console: &'static crate::serial::SerialConsole,
    tag: i32,
) {
    run(queue, console, tag, crate::config::SEND_INTERVAL).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_futures::block_on;

    #[test]
    fn test_send_once_enqueues_tag() {
        let queue = ValueQueue::new("q");
        let console = Console::new(std::vec::Vec::new());

        let outcome = block_on(send_once(&queue, &console, 100));

        assert_eq!(outcome, SendOutcome::Sent);
        assert_eq!(queue.len(), 1);
        assert!(console.into_writer().is_empty());
    }

    #[test]
    fn test_send_on_full_queue_reports_and_keeps_occupancy() {
        let queue = ValueQueue::new("q");
        let console = Console::new(std::vec::Vec::new());

        for _ in 0..queue.capacity() {
            queue.try_send(200).unwrap();
        }
        let failures_before = send_failures();

        let outcome = block_on(send_once(&queue, &console, 200));

        assert_eq!(outcome, SendOutcome::QueueFull);
        assert_eq!(queue.len(), queue.capacity());
        assert!(send_failures() > failures_before);

        let output = std::string::String::from_utf8(console.into_writer()).unwrap();
        assert_eq!(output, MSG_QUEUE_FULL);
    }
}
