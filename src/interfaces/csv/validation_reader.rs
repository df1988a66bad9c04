use crate::error::{CheckoutError, Result};
use crate::validation::FieldType;
use serde::Deserialize;
use std::io::Read;

/// One field value to validate, as read from a batch file.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct ValidationRequest {
    pub method: String,
    pub code: String,
    #[serde(rename = "type")]
    pub field: FieldType,
    #[serde(default)]
    pub value1: String,
    #[serde(default)]
    pub value2: String,
}

/// Reads validation requests from a CSV source with the header
/// `method,code,type,value1,value2`.
///
/// Whitespace around fields is trimmed and short records are accepted, so the
/// trailing value columns may be left out.
pub struct ValidationRequestReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> ValidationRequestReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Lazily deserializes the rows, one `Result` per record.
    pub fn requests(self) -> impl Iterator<Item = Result<ValidationRequest>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(CheckoutError::from))
    }
}
