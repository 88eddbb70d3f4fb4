//! Progress events and the sinks that receive them.
//!
//! Two independent channels are reported while installing:
//!
//! - [`DownloadProgress`] for byte-level download progress
//! - [`TaskProgress`] for human-readable task milestones
//!
//! Sinks are called synchronously on the installing thread, in order. Any
//! `Fn(DownloadProgress)` / `Fn(TaskProgress)` closure is a sink.

use std::sync::mpsc::Sender;

/// Byte-level progress of one download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadProgress {
    Start { url: String, label: String },
    Update { downloaded: u64, total: u64 },
    End { success: bool, message: String },
}

/// A task milestone.
///
/// `name` announces a new task; `message` reports within the current task;
/// `completed` marks the task as finished.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskProgress {
    pub name: String,
    pub message: String,
    pub completed: bool,
}

impl TaskProgress {
    /// Start of a task called `name`.
    pub fn started(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Intermediate message.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    /// Final message of a task.
    pub fn completed(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            completed: true,
            ..Self::default()
        }
    }
}

pub trait DownloadProgressSink {
    fn on_download(&self, progress: DownloadProgress);
}

pub trait TaskProgressSink {
    fn on_task(&self, progress: TaskProgress);
}

impl<F: Fn(DownloadProgress)> DownloadProgressSink for F {
    fn on_download(&self, progress: DownloadProgress) {
        self(progress)
    }
}

impl<F: Fn(TaskProgress)> TaskProgressSink for F {
    fn on_task(&self, progress: TaskProgress) {
        self(progress)
    }
}

/// Forwards events into an [`mpsc`](std::sync::mpsc) channel.
///
/// Events sent after the receiver is dropped are discarded.
#[derive(Debug, Clone)]
pub struct ChannelSink<T>(pub Sender<T>);

impl DownloadProgressSink for ChannelSink<DownloadProgress> {
    fn on_download(&self, progress: DownloadProgress) {
        let _ = self.0.send(progress);
    }
}

impl TaskProgressSink for ChannelSink<TaskProgress> {
    fn on_task(&self, progress: TaskProgress) {
        let _ = self.0.send(progress);
    }
}

/// Writes events to the `tracing` log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DownloadProgressSink for LogSink {
    fn on_download(&self, progress: DownloadProgress) {
        match progress {
            DownloadProgress::Start { url, label } => {
                tracing::info!(%url, %label, "Download started")
            }
            DownloadProgress::Update { downloaded, total } => {
                tracing::trace!(downloaded, total, "Download progress")
            }
            DownloadProgress::End { success, message } => {
                tracing::info!(success, %message, "Download finished")
            }
        }
    }
}

impl TaskProgressSink for LogSink {
    fn on_task(&self, progress: TaskProgress) {
        tracing::info!(
            name = %progress.name,
            message = %progress.message,
            completed = progress.completed,
            "Task progress"
        );
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl DownloadProgressSink for NoopSink {
    fn on_download(&self, _progress: DownloadProgress) {}
}

impl TaskProgressSink for NoopSink {
    fn on_task(&self, _progress: TaskProgress) {}
}
