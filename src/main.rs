//! QueueDemo - ESP32-S3 抢占式队列通信示例
//!
//! FRDM-KL25Z FreeRTOS "Week 3 - Example 01" 的 Embassy 移植版:
//! - 两个发送任务运行在线程执行器 (低优先级)，每 50ms 非阻塞发送
//!   各自的标签值 (100 / 200)
//! - 一个接收任务运行在 Priority2 中断执行器，以 100ms 有界等待
//!   接收并在串口上报告
//!
//! 队列一旦非空，接收任务立即抢占发送任务，接收前占用量
//! 因此应当始终为 0。
//!
//! 硬件目标: ESP32-S3 (串口 UART0, 921600 波特)

#![no_std]
#![no_main]

use embassy_executor::Spawner;
use embassy_time::{Duration, Timer};
use esp_hal::{
    clock::CpuClock,
    gpio::{Level, Output, OutputConfig},
    interrupt::{software::SoftwareInterruptControl, Priority},
    timer::timg::TimerGroup,
    uart::{Config as UartConfig, Uart},
};
use esp_rtos::embassy::InterruptExecutor;
use static_cell::StaticCell;

use queue_demo_rtos::serial::{Console, SerialConsole};
use queue_demo_rtos::tasks::{self, receiver, sender};
use queue_demo_rtos::{config, ValueQueue};

#[allow(unused_imports)]
use queue_demo_rtos::util::log::*;

esp_bootloader_esp_idf::esp_app_desc!();

// ===== Panic Handler =====
#[cfg(feature = "dev")]
use esp_backtrace as _;

#[cfg(not(feature = "dev"))]
#[panic_handler]
fn panic(_info: &core::panic::PanicInfo) -> ! {
    // 致命错误的停机路径: 原地驻留
    loop {
        core::hint::spin_loop();
    }
}

// ===== 静态分配 =====
/// 接收任务的高优先级执行器
static RECEIVER_EXECUTOR: StaticCell<InterruptExecutor<2>> = StaticCell::new();

/// 任务间共享队列的存储
static VALUE_QUEUE: StaticCell<ValueQueue> = StaticCell::new();

/// 共享串口控制台的存储
static CONSOLE: StaticCell<SerialConsole> = StaticCell::new();

// ===== 主入口点 =====
#[esp_rtos::main]
async fn main(low_prio_spawner: Spawner) {
    // ========================================
    // 1. 硬件初始化
    // ========================================
    let peripherals =
        esp_hal::init(esp_hal::Config::default().with_cpu_clock(CpuClock::max()));

    // 板载 LED: 仅上电配置，对应原始示例的 rgb_init
    let _led = Output::new(peripherals.GPIO2, Level::Low, OutputConfig::default());

    // ========================================
    // 2. 串口初始化 (UART0, 921600 8N1)
    // ========================================
    let uart_config = UartConfig::default().with_baudrate(config::SERIAL_BAUD_RATE);
    let uart = Uart::new(peripherals.UART0, uart_config)
        .expect("invalid UART configuration")
        .with_tx(peripherals.GPIO43)
        .with_rx(peripherals.GPIO44);
    let (_rx, tx) = uart.split();

    let console: &'static SerialConsole = CONSOLE.init(Console::new(tx));

    console.write_line(tasks::BANNER_TITLE).await;
    console.write_line(tasks::BANNER_AUTHOR).await;

    // ========================================
    // 3. 启动调度器 (Embassy 时间驱动 + 软件中断)
    // ========================================
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    let sw_ints = SoftwareInterruptControl::new(peripherals.SW_INTERRUPT);
    esp_rtos::start(timg0.timer0, sw_ints.software_interrupt0);

    log_info!("esp-rtos started");

    // ========================================
    // 4. 创建队列
    // ========================================
    // 创建失败等同于原始实现中的致命停机，只是带上可诊断的错误类型
    let queue = match ValueQueue::claim(&VALUE_QUEUE, "xQueue") {
        Ok(queue) => queue,
        Err(err) => {
            log_error!("Queue creation failed");
            panic!("queue creation failed: {:?}", err);
        }
    };

    // ========================================
    // 5. 发送任务 ×2 (线程执行器, 低优先级)
    // ========================================
    low_prio_spawner.must_spawn(sender::sender_task(queue, console, config::SENDER_TAG_1));
    low_prio_spawner.must_spawn(sender::sender_task(queue, console, config::SENDER_TAG_2));

    // ========================================
    // 6. 接收任务 (Priority2 中断执行器)
    // ========================================
    let receiver_executor =
        RECEIVER_EXECUTOR.init(InterruptExecutor::new(sw_ints.software_interrupt2));
    let receiver_spawner = receiver_executor.start(Priority::Priority2);

    receiver_spawner.must_spawn(receiver::receiver_task(queue, console));

    log_info!(
        "All tasks spawned, queue capacity = {}",
        queue.capacity()
    );

    // ========================================
    // 7. 主循环 - 周期性软错误统计
    // ========================================
    loop {
        Timer::after(Duration::from_secs(60)).await;

        log_info!(
            "stats: send_failures={} receive_timeouts={} occupancy_violations={}",
            sender::send_failures(),
            receiver::receive_timeouts(),
            receiver::occupancy_violations()
        );
    }
}
