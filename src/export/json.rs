//! JSON materials report.

use crate::error::Result;
use crate::session::{MaterialRow, Summary};
use serde::Serialize;

/// Summary plus table rows, as written by [`report_json`].
#[derive(Debug, Clone, Serialize)]
pub struct MaterialReport<'a> {
    pub summary: Summary,
    pub materials: &'a [MaterialRow],
}

/// Render rows and summary as pretty-printed JSON.
pub fn report_json(rows: &[MaterialRow], summary: &Summary) -> Result<String> {
    let report = MaterialReport {
        summary: *summary,
        materials: rows,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}
