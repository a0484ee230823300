use seatplan_layout::LayoutDocument;
use std::path::Path;
use tracing::info;

use crate::error::StoreError;

/// Read a whole layout document from a JSON file.
pub async fn read_document(path: impl AsRef<Path>) -> Result<LayoutDocument, StoreError> {
    let bytes = tokio::fs::read(path.as_ref()).await?;
    let document: LayoutDocument = serde_json::from_slice(&bytes)?;
    info!(
        "Read layout document {} ({} rows, {} seats)",
        path.as_ref().display(),
        document.rows.len(),
        document.seats.len()
    );
    Ok(document)
}

/// Write a layout document as pretty-printed JSON, replacing the file.
pub async fn write_document(path: impl AsRef<Path>, document: &LayoutDocument) -> Result<(), StoreError> {
    let json = serde_json::to_vec_pretty(document)?;
    tokio::fs::write(path.as_ref(), json).await?;
    info!("Wrote layout document {}", path.as_ref().display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use seatplan_layout::DocumentSeat;

    #[tokio::test]
    async fn test_write_then_read() {
        let path = std::env::temp_dir().join(format!("seatplan-{}.json", uuid::Uuid::new_v4()));
        let document = LayoutDocument {
            rows: vec!["A".to_string()],
            seats: vec![DocumentSeat {
                row_name: "A".to_string(),
                number: Some("3".to_string()),
                position_x: 90.0,
                ..Default::default()
            }],
        };

        write_document(&path, &document).await.unwrap();
        let read = read_document(&path).await.unwrap();
        tokio::fs::remove_file(&path).await.unwrap();

        assert_eq!(read, document);
    }

    #[tokio::test]
    async fn test_malformed_document_is_rejected() {
        let path = std::env::temp_dir().join(format!("seatplan-{}.json", uuid::Uuid::new_v4()));
        tokio::fs::write(&path, b"{\"rows\": 3}").await.unwrap();

        let result = read_document(&path).await;
        tokio::fs::remove_file(&path).await.unwrap();

        assert!(matches!(result, Err(StoreError::Json(_))));
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let result = read_document("/nonexistent/seatplan/layout.json").await;
        assert!(matches!(result, Err(StoreError::Io(_))));
    }
}
