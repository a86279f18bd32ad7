//! 定时器封装模块
//!
//! 基于 `gloo-timers`。

use std::time::Duration;

use gloo_timers::callback::Timeout;

/// 一次性延时任务
///
/// 封装 `setTimeout`。当 `Delay` 被 drop 时，尚未触发的回调会被取消，
/// 因此持有者（通常是组件的 `StoredValue`）卸载后不会再执行。
pub struct Delay {
    _timeout: Timeout,
}

impl Delay {
    pub fn new<F>(delay: Duration, callback: F) -> Self
    where
        F: FnOnce() + 'static,
    {
        let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        Self {
            _timeout: Timeout::new(millis, callback),
        }
    }
}
