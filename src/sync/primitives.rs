//! 同步原语封装
//!
//! 统一使用 CriticalSectionRawMutex，保证任务跨执行器
//! (线程执行器与中断执行器) 共享时的正确性。

use embassy_sync::{
    blocking_mutex::raw::CriticalSectionRawMutex,
    channel::Channel,
    mutex::Mutex,
};

/// 临界区通道 - MPMC 消息队列
///
/// 支持多发送者多接收者，固定容量。阻塞操作在条件满足时提前唤醒。
///
/// # Type Parameters
/// * `T` - 消息类型
/// * `N` - 队列容量
pub type CriticalChannel<T, const N: usize> = Channel<CriticalSectionRawMutex, T, N>;

/// 临界区互斥锁 - 异步互斥访问
///
/// 本示例中用于在三个任务间共享串口发送端。
///
/// # Example
/// ```ignore
/// static SHARED: CriticalMutex<u32> = CriticalMutex::new(0);
///
/// {
///     let mut guard = SHARED.lock().await;
///     *guard += 1;
/// } // 自动释放锁
/// ```
pub type CriticalMutex<T> = Mutex<CriticalSectionRawMutex, T>;
