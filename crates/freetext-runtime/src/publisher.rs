//! Grade publishers.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use freetext_core::traits::{GradeEvent, GradePublisher};

use crate::error::StoreError;

/// Publishes grades as structured log records.
#[derive(Debug, Default)]
pub struct LogPublisher;

#[async_trait]
impl GradePublisher for LogPublisher {
    fn name(&self) -> &str {
        "log"
    }

    async fn publish(&self, event: &GradeEvent) -> anyhow::Result<()> {
        tracing::info!(
            event_id = %event.id,
            course = %event.context.course_id,
            block = %event.context.block_id,
            student = event.context.student_id.as_deref().unwrap_or(""),
            value = event.value,
            max_value = event.max_value,
            "grade"
        );
        Ok(())
    }
}

/// Appends each grade event as one JSON line.
#[derive(Debug)]
pub struct JsonlPublisher {
    path: PathBuf,
}

impl JsonlPublisher {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl GradePublisher for JsonlPublisher {
    fn name(&self) -> &str {
        "jsonl"
    }

    async fn publish(&self, event: &GradeEvent) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::io(parent, e))?;
        }

        let mut line = serde_json::to_string(event)?;
        line.push('\n');

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| StoreError::io(&self.path, e))?;
        file.write_all(line.as_bytes())
            .await
            .map_err(|e| StoreError::io(&self.path, e))?;
        file.flush()
            .await
            .map_err(|e| StoreError::io(&self.path, e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use freetext_core::block::Grade;
    use freetext_core::BlockContext;

    fn event(value: f64) -> GradeEvent {
        GradeEvent::new(
            BlockContext::learner("c", "b", "s"),
            Grade {
                value,
                max_value: 10,
            },
        )
    }

    #[tokio::test]
    async fn jsonl_appends_one_line_per_event() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grades.jsonl");
        let publisher = JsonlPublisher::new(&path);

        publisher.publish(&event(5.0)).await.unwrap();
        publisher.publish(&event(10.0)).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<GradeEvent> = content
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].value, 5.0);
        assert_eq!(lines[1].value, 10.0);
    }

    #[tokio::test]
    async fn log_publisher_never_fails() {
        LogPublisher.publish(&event(1.0)).await.unwrap();
    }
}
