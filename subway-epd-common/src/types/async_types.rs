use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

/// 全局互斥锁类型别名
///
/// 宿主机上使用 critical-section 的 std 实现，可在多线程运行时中跨任务共享。
/// 锁内只能做同步操作，不允许跨越 await 点持有。
pub type GlobalMutex<T> = Mutex<CriticalSectionRawMutex, T>;

/// 后台任务的停止信号
pub type StopSignal = Signal<CriticalSectionRawMutex, ()>;
