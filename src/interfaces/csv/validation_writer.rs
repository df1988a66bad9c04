use crate::error::Result;
use crate::interfaces::csv::validation_reader::ValidationRequest;
use crate::validation::ValidationResult;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct ReportRow<'a> {
    method: &'a str,
    code: &'a str,
    #[serde(rename = "type")]
    field: &'a str,
    error: &'a str,
}

/// Writes one CSV line per validated request; the `error` column is empty
/// for valid values.
pub struct ValidationReportWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> ValidationReportWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write(&mut self, request: &ValidationRequest, result: &ValidationResult) -> Result<()> {
        self.writer.serialize(ReportRow {
            method: &request.method,
            code: &request.code,
            field: request.field.as_str(),
            error: result.error.as_ref().map_or("", |e| e.as_str()),
        })?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
