//! 串口控制台
//!
//! 三个任务共享的行式文本输出。发送端放在异步互斥锁后面，
//! 格式化经过固定大小的发送缓冲区，超出部分截断。
//!
//! `W` 只要求 `embedded_io::Write`: 固件中是 UART0 的阻塞发送半部，
//! 宿主机测试中是 `Vec<u8>`。

use core::fmt::Write as _;

use embedded_io::Write;
use heapless::Vec;

use crate::config::TX_BUFFER_SIZE;
use crate::sync::primitives::CriticalMutex;

/// 截断式行缓冲区
///
/// 容量写满后丢弃后续字节而不是报错，保证一次格式化
/// 永远产生一行完整落在缓冲区内的输出。协议输出为纯 ASCII，
/// 按字节截断不会切坏字符。
struct LineBuffer<const N: usize> {
    buf: Vec<u8, N>,
}

impl<const N: usize> LineBuffer<N> {
    const fn new() -> Self {
        Self { buf: Vec::new() }
    }

    fn as_bytes(&self) -> &[u8] {
        &self.buf
    }
}

impl<const N: usize> core::fmt::Write for LineBuffer<N> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        let room = N - self.buf.len();
        let take = s.len().min(room);
        let _ = self.buf.extend_from_slice(&s.as_bytes()[..take]);
        Ok(())
    }
}

/// 共享串口控制台
///
/// # Example
/// ```ignore
/// let console = Console::new(uart_tx);
/// console.write_line("Hello\r\n").await;
/// console.write_fmt(format_args!("Received = {:4}\r\n", value)).await;
/// ```
pub struct Console<W: Write> {
    tx: CriticalMutex<W>,
}

impl<W: Write> Console<W> {
    /// 接管发送端，创建控制台
    pub const fn new(tx: W) -> Self {
        Self {
            tx: CriticalMutex::new(tx),
        }
    }

    /// 输出一段原始文本 (调用方自带行结束符)
    ///
    /// 控制台本身就是诊断通道，写失败无处上报，静默丢弃。
    pub async fn write_line(&self, line: &str) {
        self.write_bytes(line.as_bytes()).await;
    }

    /// 格式化输出
    ///
    /// 先在 `TX_BUFFER_SIZE` 字节的栈缓冲区内完成格式化，
    /// 超出缓冲区的内容截断。
    pub async fn write_fmt(&self, args: core::fmt::Arguments<'_>) {
        let mut buf: LineBuffer<TX_BUFFER_SIZE> = LineBuffer::new();
        let _ = write!(buf, "{}", args);
        self.write_bytes(buf.as_bytes()).await;
    }

    async fn write_bytes(&self, bytes: &[u8]) {
        let mut tx = self.tx.lock().await;
        let _ = tx.write_all(bytes);
        let _ = tx.flush();
    }

    /// 归还发送端 (测试中用于取回输出)
    pub fn into_writer(self) -> W {
        self.tx.into_inner()
    }
}

// ===== 固件侧具体类型 =====

/// UART0 阻塞发送半部上的控制台
#[cfg(feature = "firmware")]
pub type SerialConsole = Console<esp_hal::uart::UartTx<'static, esp_hal::Blocking>>;
