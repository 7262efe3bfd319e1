//! CSV ingestion of operations.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use commission_common::{parse_date, Currency, Money, Operation, OperationType, UserId, UserType};
use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::debug;

use crate::error::IngestError;

/// Number of fields in an operation record:
/// `date,user_id,user_type,operation_type,amount,currency`.
const FIELD_COUNT: usize = 6;

/// Read every operation from a headerless CSV source, in input order.
/// Stops at the first malformed record.
pub fn read_operations<R: Read>(reader: R) -> Result<Vec<Operation>, IngestError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut operations = Vec::new();
    let mut record = StringRecord::new();
    loop {
        let line = reader.position().line();
        match reader.read_record(&mut record) {
            Ok(true) => {}
            Ok(false) => break,
            Err(source) => return Err(IngestError::Csv { line, source }),
        }
        let line = record.position().map_or(line, |p| p.line());
        operations.push(parse_operation(&record, line)?);
    }

    debug!(operations = operations.len(), "Read operations");
    Ok(operations)
}

/// Open `path` and read its operations.
pub fn read_operations_from_path(path: impl AsRef<Path>) -> Result<Vec<Operation>, IngestError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| IngestError::Open {
        path: path.display().to_string(),
        source,
    })?;
    read_operations(BufReader::new(file))
}

fn parse_operation(record: &StringRecord, line: u64) -> Result<Operation, IngestError> {
    if record.len() != FIELD_COUNT {
        return Err(IngestError::InvalidField {
            line,
            field: "record",
            value: format!("{} fields, expected {}", record.len(), FIELD_COUNT),
        });
    }

    let field = |index: usize| record.get(index).unwrap_or_default();
    let invalid = |field: &'static str, value: &str| IngestError::InvalidField {
        line,
        field,
        value: value.to_string(),
    };
    let unknown = |source| IngestError::UnknownVariant { line, source };

    let date = parse_date(field(0)).map_err(|_| invalid("date", field(0)))?;
    let user_id = field(1).parse::<UserId>().map_err(|_| invalid("user id", field(1)))?;
    let user_type = field(2).parse::<UserType>().map_err(unknown)?;
    let operation_type = field(3).parse::<OperationType>().map_err(unknown)?;

    let currency = field(5);
    if currency.is_empty() {
        return Err(invalid("currency", currency));
    }
    let amount = Money::from_str(field(4), Currency::new(currency))
        .map_err(|_| invalid("amount", field(4)))?;

    Ok(Operation::new(date, user_id, user_type, operation_type, amount))
}
