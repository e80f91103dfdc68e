// src/tables/csv_export.rs

use anyhow::{Context, Result};
use std::io::Read;

use super::RawTable;

/// Read a flat CSV export into a single table: first record is the header.
///
/// Records may have any number of fields; short rows are left for the
/// consumer to reject. An empty input yields `None`.
pub fn read_table<R: Read>(reader: R) -> Result<Option<RawTable>> {
    let mut rdr = ::csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(::csv::Trim::All)
        .from_reader(reader);

    let mut records = rdr.records().enumerate();
    let headers: Vec<String> = match records.next() {
        Some((_, rec)) => rec
            .context("CSV parse error in header record")?
            .iter()
            .map(str::to_string)
            .collect(),
        None => return Ok(None),
    };

    let mut rows = Vec::new();
    for (idx, rec) in records {
        let rec = rec.with_context(|| format!("CSV parse error at record {}", idx))?;
        rows.push(rec.iter().map(str::to_string).collect());
    }

    Ok(Some(RawTable { headers, rows }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn header_and_rows() -> Result<()> {
        let data = "API Name,Instance Memory,vCPUs\n\
                    m5.large,8 GiB,2 vCPUs\n\
                    \"m5.xlarge\",\"16 GiB\", 4 vCPUs \n";
        let table = read_table(Cursor::new(data))?.expect("one table");
        assert_eq!(table.headers, vec!["API Name", "Instance Memory", "vCPUs"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1], vec!["m5.xlarge", "16 GiB", "4 vCPUs"]);
        Ok(())
    }

    #[test]
    fn empty_input() -> Result<()> {
        assert!(read_table(Cursor::new(""))?.is_none());
        Ok(())
    }
}
