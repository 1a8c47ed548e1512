use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::broadcast;
use tracing::warn;

/// 广播通道容量，慢速订阅者落后超过这个数量会丢失旧事件
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// 忽略文件更新的生命周期观察者
pub trait IgnoredUpdateListener: Send + Sync {
    /// 一轮重新扫描开始
    fn update_started(&self);

    /// 一轮重新扫描结束（无论成功与否）
    fn update_finished(&self);
}

/// 生命周期事件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateEvent {
    Started,
    Finished,
}

/// 监听器总线 - 同步地把开始/结束事件分发给所有已注册的观察者
///
/// 每个观察者的回调相互隔离：某个观察者 panic 只会被记录，不影响其他观察者。
/// 需要在独立任务中处理事件的观察者可以改用 [`ListenerBus::subscribe`]。
pub struct ListenerBus {
    listeners: RwLock<Vec<Arc<dyn IgnoredUpdateListener>>>,
    events: broadcast::Sender<UpdateEvent>,
}

impl ListenerBus {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            listeners: RwLock::new(Vec::new()),
            events,
        }
    }

    /// 注册观察者，同一个观察者重复注册只保留一份
    pub fn register(&self, listener: Arc<dyn IgnoredUpdateListener>) {
        let mut listeners = self.listeners.write().unwrap_or_else(PoisonError::into_inner);
        if !listeners.iter().any(|l| Arc::ptr_eq(l, &listener)) {
            listeners.push(listener);
        }
    }

    /// 注销观察者，返回是否确实注销了
    pub fn unregister(&self, listener: &Arc<dyn IgnoredUpdateListener>) -> bool {
        let mut listeners = self.listeners.write().unwrap_or_else(PoisonError::into_inner);
        let before = listeners.len();
        listeners.retain(|l| !Arc::ptr_eq(l, listener));
        listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// 订阅事件通道
    pub fn subscribe(&self) -> broadcast::Receiver<UpdateEvent> {
        self.events.subscribe()
    }

    pub fn notify_started(&self) {
        self.dispatch(UpdateEvent::Started);
    }

    pub fn notify_finished(&self) {
        self.dispatch(UpdateEvent::Finished);
    }

    fn dispatch(&self, event: UpdateEvent) {
        // 先复制一份快照再回调，观察者可以在回调里注册或注销自己
        let snapshot: Vec<_> = self
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        for listener in snapshot {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| match event {
                UpdateEvent::Started => listener.update_started(),
                UpdateEvent::Finished => listener.update_finished(),
            }));

            if let Err(payload) = outcome {
                warn!(event = ?event, reason = panic_message(&*payload), "忽略文件更新监听器执行失败");
            }
        }

        // 没有订阅者时发送失败是正常情况
        let _ = self.events.send(event);
    }
}

impl Default for ListenerBus {
    fn default() -> Self {
        Self::new()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "未知错误"
    }
}
