//! Append-only daily conversation log.
//!
//! Each exchange is one JSON object per line in
//! `<log_dir>/conversations_<YYYYMMDD>.txt`, dated by local time.

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::debug;

use crate::locale::Locale;

/// How the user message reached the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Text,
    Voice,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationRecord {
    pub timestamp: DateTime<Local>,
    #[serde(rename = "type")]
    pub channel: Channel,
    pub user_message: String,
    pub bot_response: String,
    pub locale: Locale,
}

impl ConversationRecord {
    pub fn new(channel: Channel, user_message: &str, bot_response: &str, locale: Locale) -> Self {
        Self {
            timestamp: Local::now(),
            channel,
            user_message: user_message.to_string(),
            bot_response: bot_response.to_string(),
            locale,
        }
    }
}

pub struct ConversationLog {
    dir: PathBuf,
    // Serializes appends so concurrent requests never interleave lines.
    write_lock: Mutex<()>,
}

impl ConversationLog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Log file that holds records written on `timestamp`'s date.
    pub fn file_for(&self, timestamp: &DateTime<Local>) -> PathBuf {
        self.dir
            .join(format!("conversations_{}.txt", timestamp.format("%Y%m%d")))
    }

    pub async fn append(&self, record: &ConversationRecord) -> Result<()> {
        let mut line =
            serde_json::to_string(record).context("Failed to serialize conversation record")?;
        line.push('\n');

        let path = self.file_for(&record.timestamp);

        let _guard = self.write_lock.lock().await;
        fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("Failed to create log directory {}", self.dir.display()))?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .with_context(|| format!("Failed to open conversation log {}", path.display()))?;
        file.write_all(line.as_bytes())
            .await
            .with_context(|| format!("Failed to write conversation log {}", path.display()))?;
        file.flush().await?;

        debug!(path = %path.display(), "Appended conversation record");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::sync::Arc;
    use tempfile::TempDir;
    use tokio::task::JoinSet;

    #[test]
    fn test_file_name_uses_local_date() {
        let log = ConversationLog::new("logs");
        let timestamp = Local.with_ymd_and_hms(2024, 3, 9, 14, 30, 0).unwrap();
        assert_eq!(
            log.file_for(&timestamp),
            PathBuf::from("logs").join("conversations_20240309.txt")
        );
    }

    #[test]
    fn test_record_serializes_channel_as_type() {
        let record = ConversationRecord::new(Channel::Voice, "Labas", "Sveiki", Locale::Lithuanian);
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["type"], "voice");
        assert_eq!(value["user_message"], "Labas");
        assert_eq!(value["bot_response"], "Sveiki");
        assert_eq!(value["locale"], "lt");
        assert!(value["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_append_creates_directory_and_adds_lines() {
        let temp_dir = TempDir::new().unwrap();
        let log = ConversationLog::new(temp_dir.path().join("nested"));

        let first = ConversationRecord::new(Channel::Text, "Привет", "Здравствуйте", Locale::Russian);
        let second = ConversationRecord::new(Channel::Voice, "Hello", "Hi", Locale::English);
        log.append(&first).await.unwrap();
        log.append(&second).await.unwrap();

        let contents = std::fs::read_to_string(log.file_for(&first.timestamp)).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        // Non-ASCII text is stored as-is, not \u-escaped.
        assert!(lines[0].contains("Привет"));

        let parsed: ConversationRecord = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(parsed.channel, Channel::Voice);
        assert_eq!(parsed.user_message, "Hello");
        assert_eq!(parsed.locale, Locale::English);
    }

    #[tokio::test]
    async fn test_append_keeps_existing_content() {
        let temp_dir = TempDir::new().unwrap();
        let log = ConversationLog::new(temp_dir.path());
        let record = ConversationRecord::new(Channel::Text, "a", "b", Locale::English);
        let path = log.file_for(&record.timestamp);
        std::fs::write(&path, "earlier line\n").unwrap();

        log.append(&record).await.unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("earlier line\n"));
        assert_eq!(contents.lines().count(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_appends_write_whole_lines() {
        let temp_dir = TempDir::new().unwrap();
        let log = Arc::new(ConversationLog::new(temp_dir.path()));
        let long_reply = "ž".repeat(4096);

        let mut tasks = JoinSet::new();
        for i in 0..50 {
            let log = Arc::clone(&log);
            let reply = long_reply.clone();
            tasks.spawn(async move {
                let record =
                    ConversationRecord::new(Channel::Text, &format!("message {i}"), &reply, Locale::Lithuanian);
                log.append(&record).await
            });
        }
        while let Some(result) = tasks.join_next().await {
            result.unwrap().unwrap();
        }

        let mut lines = Vec::new();
        for entry in std::fs::read_dir(temp_dir.path()).unwrap() {
            let contents = std::fs::read_to_string(entry.unwrap().path()).unwrap();
            lines.extend(contents.lines().map(str::to_string));
        }
        assert_eq!(lines.len(), 50);

        let mut messages: Vec<String> = lines
            .iter()
            .map(|line| {
                let record: ConversationRecord = serde_json::from_str(line).unwrap();
                assert_eq!(record.bot_response, long_reply);
                record.user_message
            })
            .collect();
        messages.sort();
        messages.dedup();
        assert_eq!(messages.len(), 50);
    }
}
