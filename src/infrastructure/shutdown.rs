use tokio::sync::watch;

/// Broadcasts a single stop request to every long-running part of the app.
#[derive(Clone)]
pub struct Shutdown {
    sender: watch::Sender<bool>,
}

/// One component's view of the stop request.
pub struct ShutdownListener {
    component: &'static str,
    receiver: watch::Receiver<bool>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(false);
        Self { sender }
    }

    pub fn subscribe(&self, component: &'static str) -> ShutdownListener {
        ShutdownListener {
            component,
            receiver: self.sender.subscribe(),
        }
    }

    pub fn trigger(&self) {
        self.sender.send_replace(true);
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownListener {
    /// Resolves once a stop was requested, including one sent before subscribing.
    /// Never resolves if every `Shutdown` handle is gone without triggering.
    pub async fn notified(&mut self) {
        if self.receiver.wait_for(|stop| *stop).await.is_err() {
            futures::future::pending::<()>().await;
        }
        tracing::info!(component = self.component, "shutdown observed");
    }
}

/// Turns Ctrl-C, and SIGTERM on unix, into a stop request.
pub fn install_signal_handlers(shutdown: Shutdown) {
    tokio::spawn(async move {
        let signal = wait_for_signal().await;
        tracing::info!(signal, "stop signal received");
        shutdown.trigger();
    });
}

async fn wait_for_signal() -> &'static str {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => "interrupt",
            Err(err) => {
                tracing::warn!(error = %err, "cannot listen for ctrl-c");
                futures::future::pending().await
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                "terminate"
            }
            Err(err) => {
                tracing::warn!(error = %err, "cannot listen for SIGTERM");
                futures::future::pending().await
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = futures::future::pending::<&'static str>();

    tokio::select! {
        name = ctrl_c => name,
        name = terminate => name,
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn every_listener_sees_trigger() {
        let shutdown = Shutdown::new();
        let mut session = shutdown.subscribe("session");
        let mut scan = shutdown.subscribe("scan");

        let early = tokio::time::timeout(Duration::from_millis(20), session.notified()).await;
        assert!(early.is_err());

        shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(1), session.notified())
            .await
            .unwrap();
        tokio::time::timeout(Duration::from_secs(1), scan.notified())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn late_subscriber_sees_earlier_trigger() {
        let shutdown = Shutdown::new();
        shutdown.trigger();
        let mut late = shutdown.subscribe("late");
        tokio::time::timeout(Duration::from_secs(1), late.notified())
            .await
            .unwrap();
    }
}
