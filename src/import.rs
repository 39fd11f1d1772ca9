// 📥 Import - Flat CSV exports from the backing store → in-memory records
//
// Headers are the snake_case field names of ReceivableRecord / ContractRecord.
// Dates are ISO (YYYY-MM-DD). Empty optional cells become None.

use crate::contract::ContractRecord;
use crate::receivable::ReceivableRecord;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::Read;
use std::path::Path;

fn read_records<T, R, V>(reader: R, kind: &str, validate: V) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    R: Read,
    V: Fn(&T) -> Result<()>,
{
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let mut records = Vec::new();

    for (index, result) in rdr.deserialize::<T>().enumerate() {
        // Header is line 1, first data row is line 2
        let line = index + 2;
        let record = result.with_context(|| format!("Failed to deserialize {} at line {}", kind, line))?;
        validate(&record).with_context(|| format!("Invalid {} at line {}", kind, line))?;
        records.push(record);
    }

    Ok(records)
}

pub fn read_receivables<R: Read>(reader: R) -> Result<Vec<ReceivableRecord>> {
    read_records(reader, "receivable", |_: &ReceivableRecord| Ok(()))
}

pub fn read_contracts<R: Read>(reader: R) -> Result<Vec<ContractRecord>> {
    read_records(reader, "contract", ContractRecord::validate)
}

pub fn load_receivables_csv(csv_path: &Path) -> Result<Vec<ReceivableRecord>> {
    let file = File::open(csv_path)
        .with_context(|| format!("Failed to open receivables CSV: {}", csv_path.display()))?;

    let records = read_receivables(file)
        .with_context(|| format!("Failed to load receivables from {}", csv_path.display()))?;

    tracing::info!(path = %csv_path.display(), count = records.len(), "loaded receivables");
    Ok(records)
}

pub fn load_contracts_csv(csv_path: &Path) -> Result<Vec<ContractRecord>> {
    let file = File::open(csv_path)
        .with_context(|| format!("Failed to open contracts CSV: {}", csv_path.display()))?;

    let records = read_contracts(file)
        .with_context(|| format!("Failed to load contracts from {}", csv_path.display()))?;

    tracing::info!(path = %csv_path.display(), count = records.len(), "loaded contracts");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::AmendmentMarker;
    use crate::receivable::ClientType;
    use chrono::NaiveDate;

    #[test]
    fn test_read_receivables() {
        let data = "\
id,client_name,client_type,project_name,total_amount,paid_amount,due_date
R-1,경기도청,관급,오염토 반출,5000000,1000000,2025-03-31
R-2,(주)대성,private,,200000,200000,2025-05-01
";

        let records = read_receivables(data.as_bytes()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "R-1");
        assert_eq!(records[0].client_type, ClientType::Public);
        assert_eq!(records[0].due_date, NaiveDate::from_ymd_opt(2025, 3, 31).unwrap());
        assert_eq!(records[1].client_type, ClientType::Private);
        assert_eq!(records[1].project_name, "");
    }

    #[test]
    fn test_read_receivables_reports_bad_row() {
        let data = "\
client_name,total_amount,paid_amount,due_date
A,100,0,2025-01-01
B,abc,0,2025-01-01
";

        let err = read_receivables(data.as_bytes()).unwrap_err();

        assert!(format!("{:#}", err).contains("line 3"));
    }

    #[test]
    fn test_read_contracts_with_empty_project_key() {
        let data = "\
id,project_key,project_name,client_name,amendment_marker,contract_date,start_date,end_date,contract_amount,progress_percentage
C-1,P-1,부지 정화,환경공단,신규,2025-01-10,,,1000,40
C-2,P-1,부지 정화 변경,환경공단,변경,2025-04-02,,,250,60
C-3,,키 없음,,new,,,,90,0
";

        let records = read_contracts(data.as_bytes()).unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].amendment_marker, AmendmentMarker::New);
        assert_eq!(records[1].amendment_marker, AmendmentMarker::Change);
        assert_eq!(records[0].start_date, None);
        assert_eq!(records[2].project_key, None);
        assert_eq!(records[2].grouping_key(), None);
    }

    #[test]
    fn test_read_contracts_rejects_progress_over_100() {
        let data = "\
project_key,contract_amount,progress_percentage
P,1,100
P,1,150
";

        let err = read_contracts(data.as_bytes()).unwrap_err();
        let message = format!("{:#}", err);

        assert!(message.contains("Invalid contract at line 3"));
        assert!(message.contains("progress_percentage 150"));
    }

    #[test]
    fn test_missing_file_has_context() {
        let err = load_contracts_csv(Path::new("/nonexistent/contracts.csv")).unwrap_err();

        assert!(err.to_string().contains("contracts.csv"));
    }
}
