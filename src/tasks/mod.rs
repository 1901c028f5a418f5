//! 任务模块
//!
//! 两级优先级的生产者/消费者协议:
//! - `sender`: 发送任务 ×2，线程执行器 (低优先级)
//! - `receiver`: 接收任务 ×1，中断执行器 (高优先级)
//!
//! 接收方优先级严格高于发送方，队列一旦非空，接收方总是先于
//! 任何发送方被调度。这是本示例要演示的核心性质。

pub mod receiver;
pub mod sender;

// ===== 协议输出字面量 (与原始示例逐字节一致) =====

/// 启动横幅第一行
pub const BANNER_TITLE: &str = "\r\nFRDM-KL25Z FreeRTOS demo Week 3 - Example 01\r\n";

/// 启动横幅第二行
pub const BANNER_AUTHOR: &str = "By Hugo Arends\r\n\r\n";

/// 发送失败诊断 (队列满)
pub const MSG_QUEUE_FULL: &str = "Could not send to the queue.\r\n";

/// 占用量异常诊断 (接收前队列应为空)
pub const MSG_QUEUE_NOT_EMPTY: &str = "Queue should have been empty!\r\n";

/// 接收超时诊断
pub const MSG_RECEIVE_TIMEOUT: &str = "Could not receive from the queue.\r\n";

#[cfg(test)]
mod tests {
    use super::receiver::{poll_once, ReceiveOutcome};
    use super::sender::send_once;
    use super::*;
    use crate::serial::Console;
    use crate::ValueQueue;
    use embassy_futures::block_on;
    use embassy_futures::join::join3;
    use embassy_time::{Duration, Timer};

    /// 两个发送者与一个接收者并发运行一段完整交换。
    ///
    /// 时序按比例缩小 (5/7ms 发送间隔对 100ms 接收超时)，
    /// 超时与队列满诊断在正确调参下不应出现。
    #[test]
    fn test_producer_consumer_roundtrip() {
        let queue = ValueQueue::new("xQueue");
        let console = Console::new(std::vec::Vec::new());

        let received = block_on(async {
            let mut received = std::vec::Vec::new();
            join3(
                async {
                    for _ in 0..5 {
                        Timer::after(Duration::from_millis(5)).await;
                        send_once(&queue, &console, 100).await;
                    }
                },
                async {
                    for _ in 0..5 {
                        Timer::after(Duration::from_millis(7)).await;
                        send_once(&queue, &console, 200).await;
                    }
                },
                async {
                    for _ in 0..10 {
                        if let ReceiveOutcome::Received(value) =
                            poll_once(&queue, &console, Duration::from_millis(100)).await
                        {
                            received.push(value);
                        }
                    }
                },
            )
            .await;
            received
        });

        // 每个值不多不少、原样到达
        assert_eq!(received.len(), 10);
        assert_eq!(received.iter().filter(|&&v| v == 100).count(), 5);
        assert_eq!(received.iter().filter(|&&v| v == 200).count(), 5);
        assert!(queue.is_empty());

        let output = std::string::String::from_utf8(console.into_writer()).unwrap();
        assert_eq!(output.matches("Received = ").count(), 10);
        assert!(!output.contains(MSG_QUEUE_FULL));
        assert!(!output.contains(MSG_RECEIVE_TIMEOUT));
    }
}
