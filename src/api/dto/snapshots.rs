//! Query parameters for snapshot reads.

use crate::domain::entities::SnapshotKind;
use crate::error::AppError;
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::json;

/// `GET /api/snapshots/{domain}?kind=current|latest|dated&date=YYYYMMDD`
///
/// `kind` defaults to `current`; a dated read without `date` means today (UTC).
#[derive(Debug, Default, Deserialize)]
pub struct SnapshotQuery {
    pub kind: Option<String>,
    pub date: Option<String>,
}

impl SnapshotQuery {
    pub fn to_kind(&self) -> Result<SnapshotKind, AppError> {
        match self.kind.as_deref().unwrap_or("current") {
            "current" => Ok(SnapshotKind::Current),
            "latest" => Ok(SnapshotKind::Latest),
            "dated" => {
                let date = match &self.date {
                    Some(raw) => NaiveDate::parse_from_str(raw, "%Y%m%d").map_err(|_| {
                        AppError::bad_request(
                            "Invalid date, expected YYYYMMDD",
                            json!({ "date": raw }),
                        )
                    })?,
                    None => Utc::now().date_naive(),
                };
                Ok(SnapshotKind::Dated(date))
            }
            other => Err(AppError::bad_request(
                "Invalid snapshot kind",
                json!({ "kind": other, "allowed": ["current", "latest", "dated"] }),
            )),
        }
    }
}
