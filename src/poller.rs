//! 周期轮询句柄：创建即启动定时任务，`stop()` 或 drop 时取消。

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// 拥有一个按固定周期执行回调的后台任务
#[derive(Debug)]
pub struct Poller {
    handle: JoinHandle<()>,
}

impl Poller {
    /// 立即执行第一次，之后每隔 `period` 执行一次；上一轮未完成时跳过错过的 tick
    pub fn start<F, Fut>(period: Duration, mut tick: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period.max(Duration::from_millis(1)));
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                tick().await;
            }
        });
        Self { handle }
    }

    /// 停止轮询
    pub fn stop(self) {
        drop(self);
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::Poller;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn counting_poller(period: Duration) -> (Poller, Arc<AtomicUsize>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let poller = Poller::start(period, move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });
        (poller, hits)
    }

    #[tokio::test]
    async fn ticks_until_dropped() {
        let (poller, hits) = counting_poller(Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(poller.is_running());
        assert!(hits.load(Ordering::SeqCst) >= 2);

        drop(poller);
        let after_drop = hits.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(hits.load(Ordering::SeqCst), after_drop);
    }

    #[tokio::test]
    async fn stop_cancels_the_task() {
        let (poller, hits) = counting_poller(Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(25)).await;
        poller.stop();
        let after_stop = hits.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(40)).await;
        assert_eq!(hits.load(Ordering::SeqCst), after_stop);
    }
}
