//! # Notify 模块
//!
//! 完成通知与"过渡中"信号。
//!
//! - [`Completion`]：一个方向的完成通知。持久回调每次到达终点都会触发；
//!   单次回调只属于某一次 Show/Hide 调用，触发后即丢弃。
//! - [`EasingSignal`] / [`WaitSync`]：`is_easing` 标志及其等待点。

use std::cell::{Cell, RefCell};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

/// 单次完成回调
pub type OneShot = Box<dyn FnOnce()>;

/// 持久完成回调
pub type Listener = Box<dyn FnMut()>;

/// 一个方向的完成通知
#[derive(Default)]
pub struct Completion {
    listeners: Vec<Listener>,
    one_shot: Option<OneShot>,
}

impl fmt::Debug for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completion")
            .field("listeners", &self.listeners.len())
            .field("one_shot", &self.one_shot.is_some())
            .finish()
    }
}

impl Completion {
    /// 订阅持久回调
    pub fn subscribe(&mut self, listener: Listener) {
        self.listeners.push(listener);
    }

    /// 替换单次回调（`None` 即清除）
    pub fn set_one_shot(&mut self, one_shot: Option<OneShot>) {
        self.one_shot = one_shot;
    }

    /// 丢弃单次回调（不调用）
    pub fn clear_one_shot(&mut self) {
        self.one_shot = None;
    }

    pub fn has_one_shot(&self) -> bool {
        self.one_shot.is_some()
    }

    /// 先触发全部持久回调，再触发并清除单次回调
    pub fn fire(&mut self) {
        for listener in &mut self.listeners {
            listener();
        }
        if let Some(one_shot) = self.one_shot.take() {
            one_shot();
        }
    }
}

#[derive(Debug, Default)]
struct SignalState {
    easing: Cell<bool>,
    wakers: RefCell<Vec<Waker>>,
}

/// `is_easing` 标志
///
/// 标志从 `true` 变为 `false` 时唤醒所有等待中的 [`WaitSync`]。
#[derive(Debug, Clone, Default)]
pub struct EasingSignal {
    state: Rc<SignalState>,
}

impl EasingSignal {
    pub fn get(&self) -> bool {
        self.state.easing.get()
    }

    pub fn set(&self, easing: bool) {
        let was = self.state.easing.replace(easing);
        if was && !easing {
            let wakers = std::mem::take(&mut *self.state.wakers.borrow_mut());
            for waker in wakers {
                waker.wake();
            }
        }
    }

    /// 创建等待点
    pub fn wait(&self) -> WaitSync {
        WaitSync {
            state: self.state.clone(),
        }
    }
}

/// 等待当前过渡结束
///
/// 可以作为 `Future` 交给执行器，也可以由逐帧宿主调用 [`WaitSync::is_ready`] 轮询。
/// 创建时已空闲的话立即就绪。
#[derive(Debug, Clone)]
#[must_use = "WaitSync 不被轮询就不会等待"]
pub struct WaitSync {
    state: Rc<SignalState>,
}

impl WaitSync {
    pub fn is_ready(&self) -> bool {
        !self.state.easing.get()
    }
}

/// 同方向重启（先取消再启动新任务）时标志会短暂经历 `true → false → true`，
/// 等待者因此被唤醒一次；重新轮询时标志已恢复为 `true`，返回 `Pending`。
impl Future for WaitSync {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.is_ready() {
            return Poll::Ready(());
        }
        let mut wakers = self.state.wakers.borrow_mut();
        if !wakers.iter().any(|w| w.will_wake(cx.waker())) {
            wakers.push(cx.waker().clone());
        }
        Poll::Pending
    }
}
