//! Terminal rendering of install progress.

use colored::Colorize;
use libman_core::{DownloadProgress, DownloadProgressSink, TaskProgress, TaskProgressSink};

/// Prints task milestones to stdout and download failures to stderr.
pub struct TerminalProgress {
    pub verbose: bool,
}

impl TaskProgressSink for TerminalProgress {
    fn on_task(&self, progress: TaskProgress) {
        if !progress.name.is_empty() {
            println!("{} {}", "=>".cyan().bold(), progress.name);
        }
        if progress.message.is_empty() {
            return;
        }
        if progress.completed {
            println!("{} {}", "ok".green().bold(), progress.message);
        } else {
            println!("   {}", progress.message.dimmed());
        }
    }
}

impl DownloadProgressSink for TerminalProgress {
    fn on_download(&self, progress: DownloadProgress) {
        match progress {
            DownloadProgress::Start { url, label } => {
                if self.verbose {
                    println!("   {} {}", label.dimmed(), url.dimmed());
                }
            }
            DownloadProgress::Update { .. } => {}
            DownloadProgress::End { success, message } => {
                if !success {
                    eprintln!("{} {}", "warning:".yellow().bold(), message);
                } else if !message.is_empty() {
                    println!("   {}", message.dimmed());
                }
            }
        }
    }
}
