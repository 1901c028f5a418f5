//! 有界队列门面
//!
//! 对 `embassy-sync` MPMC 通道的薄封装，把本示例依赖的队列契约
//! 显式化:
//! - `try_send`: 非阻塞发送，队列满时返回被拒绝的值
//! - `send`: 阻塞发送，有空位时提前唤醒
//! - `receive` / `receive_timeout`: 阻塞接收，可选有界等待
//! - `len` / `capacity`: 占用量查询
//!
//! 队列本身的 FIFO 序、容量上界与唤醒语义由 embassy-sync 保证；
//! 多个发送者之间的相对顺序不作保证。

use embassy_time::{with_timeout, Duration};
use static_cell::StaticCell;

use crate::sync::primitives::CriticalChannel;

/// 非阻塞发送被拒绝 (队列满)，携带未能入队的值
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueFull<T>(pub T);

/// 有界等待在取到数据前超时
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiveTimeout;

/// 队列的一次性初始化失败 (静态存储已被占用)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueCreateError;

/// 固定容量的任务间消息队列
///
/// # Type Parameters
/// * `T` - 元素类型
/// * `N` - 容量
///
/// # Example
/// ```ignore
/// static CELL: StaticCell<BoundedQueue<i32, 5>> = StaticCell::new();
///
/// let queue = BoundedQueue::claim(&CELL, "xQueue")?;
/// queue.try_send(100)?;
/// let value = queue.receive_timeout(Duration::from_millis(100)).await?;
/// ```
pub struct BoundedQueue<T, const N: usize> {
    /// 调试名 (队列注册表的等价物)
    name: &'static str,
    channel: CriticalChannel<T, N>,
}

impl<T, const N: usize> BoundedQueue<T, N> {
    /// 创建空队列
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            channel: CriticalChannel::new(),
        }
    }

    /// 从静态存储中一次性初始化队列
    ///
    /// 第二次调用返回 `QueueCreateError`，对应原始实现中
    /// 队列分配失败的致命路径。
    pub fn claim(
        cell: &'static StaticCell<Self>,
        name: &'static str,
    ) -> Result<&'static Self, QueueCreateError>
    where
        T: 'static,
    {
        match cell.try_init(Self::new(name)) {
            Some(queue) => Ok(queue),
            None => Err(QueueCreateError),
        }
    }

    /// 队列调试名
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// 非阻塞发送
    ///
    /// 队列满时立即返回 `QueueFull`，值原样奉还，占用量不变。
    pub fn try_send(&self, value: T) -> Result<(), QueueFull<T>> {
        match self.channel.try_send(value) {
            Ok(()) => Ok(()),
            Err(embassy_sync::channel::TrySendError::Full(v)) => Err(QueueFull(v)),
        }
    }

    /// 阻塞发送: 队列满时挂起当前任务，直到出现空位
    pub async fn send(&self, value: T) {
        self.channel.send(value).await;
    }

    /// 阻塞接收: 队列空时挂起当前任务，直到有数据
    pub async fn receive(&self) -> T {
        self.channel.receive().await
    }

    /// 有界等待接收
    ///
    /// 最多挂起 `timeout`；期间有数据到达则提前唤醒并取走。
    pub async fn receive_timeout(&self, timeout: Duration) -> Result<T, ReceiveTimeout> {
        with_timeout(timeout, self.channel.receive())
            .await
            .map_err(|_| ReceiveTimeout)
    }

    /// 当前缓冲的元素数量
    pub fn len(&self) -> usize {
        self.channel.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.channel.is_empty()
    }

    /// 是否已满
    pub fn is_full(&self) -> bool {
        self.channel.is_full()
    }

    /// 容量
    pub const fn capacity(&self) -> usize {
        N
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_futures::block_on;
    use embassy_futures::join::join;
    use embassy_time::Timer;

    #[test]
    fn test_occupancy_never_exceeds_capacity() {
        let q: BoundedQueue<i32, 5> = BoundedQueue::new("q");

        assert!(q.is_empty());
        assert_eq!(q.capacity(), 5);

        for i in 0..5 {
            assert_eq!(q.try_send(i), Ok(()));
        }
        assert!(q.is_full());
        assert_eq!(q.len(), 5);

        // 第 6 个元素被拒绝，值原样返回，占用量不变
        assert_eq!(q.try_send(42), Err(QueueFull(42)));
        assert_eq!(q.len(), 5);
    }

    #[test]
    fn test_single_sender_fifo_order() {
        let q: BoundedQueue<i32, 5> = BoundedQueue::new("q");

        for i in [10, 20, 30] {
            q.try_send(i).unwrap();
        }

        block_on(async {
            assert_eq!(q.receive().await, 10);
            assert_eq!(q.receive().await, 20);
            assert_eq!(q.receive().await, 30);
        });
        assert!(q.is_empty());
    }

    #[test]
    fn test_receive_timeout_on_empty_queue() {
        let q: BoundedQueue<i32, 5> = BoundedQueue::new("q");

        let result = block_on(q.receive_timeout(Duration::from_millis(10)));
        assert_eq!(result, Err(ReceiveTimeout));
    }

    #[test]
    fn test_receive_within_timeout() {
        let q: BoundedQueue<i32, 5> = BoundedQueue::new("q");
        q.try_send(100).unwrap();

        let result = block_on(q.receive_timeout(Duration::from_millis(10)));
        assert_eq!(result, Ok(100));
        assert!(q.is_empty());
    }

    #[test]
    fn test_blocking_send_wakes_on_space() {
        let q: BoundedQueue<i32, 5> = BoundedQueue::new("q");
        for i in 0..5 {
            q.try_send(i).unwrap();
        }

        block_on(async {
            let (_, first) = join(q.send(5), async {
                Timer::after(Duration::from_millis(10)).await;
                q.receive().await
            })
            .await;
            assert_eq!(first, 0);
        });

        // 被阻塞的发送在腾出空位后完成
        assert_eq!(q.len(), 5);
    }

    #[test]
    fn test_claim_fails_on_second_use() {
        static CELL: StaticCell<BoundedQueue<i32, 5>> = StaticCell::new();

        let q = BoundedQueue::claim(&CELL, "xQueue").unwrap();
        assert_eq!(q.name(), "xQueue");

        assert_eq!(
            BoundedQueue::claim(&CELL, "xQueue").err(),
            Some(QueueCreateError)
        );
    }
}
