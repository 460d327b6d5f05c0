// src/export.rs

use anyhow::{Context, Result};
use arrow::record_batch::RecordBatch;
use parquet::{
    arrow::ArrowWriter,
    basic::Compression,
    file::{
        properties::WriterProperties,
        reader::{FileReader, SerializedFileReader},
    },
};
use serde::Serialize;
use std::{fs::File, path::Path};
use tracing::info;

/// One column of a written Parquet file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParquetColumn {
    pub name: String,
    pub physical_type: String,
    pub logical_type: Option<String>,
}

/// Row count and columns of a written Parquet file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParquetSummary {
    pub rows: i64,
    pub row_groups: usize,
    pub columns: Vec<ParquetColumn>,
}

/// Write the cleaned batch to `path` as a Snappy-compressed Parquet file.
#[tracing::instrument(level = "info", skip(batch, path), fields(path = %path.as_ref().display()))]
pub fn write_parquet<P: AsRef<Path>>(batch: &RecordBatch, path: P) -> Result<()> {
    let file = File::create(&path)
        .with_context(|| format!("creating parquet file {:?}", path.as_ref()))?;
    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();
    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))
        .context("creating Arrow writer for cleaned listings")?;
    writer.write(batch).context("writing cleaned listings batch")?;
    writer.close().context("closing parquet writer")?;
    info!(rows = batch.num_rows(), "wrote cleaned listings");
    Ok(())
}

/// Open a Parquet file and read its metadata.
pub fn read_parquet_summary<P: AsRef<Path>>(path: P) -> Result<ParquetSummary> {
    let file =
        File::open(&path).with_context(|| format!("opening parquet file {:?}", path.as_ref()))?;
    let reader = SerializedFileReader::new(file)
        .with_context(|| format!("reading parquet metadata of {:?}", path.as_ref()))?;
    let meta = reader.metadata();
    let file_meta = meta.file_metadata();

    let columns = file_meta
        .schema_descr()
        .columns()
        .iter()
        .map(|col| ParquetColumn {
            name: col.name().to_string(),
            physical_type: format!("{:?}", col.physical_type()),
            logical_type: col.logical_type().map(|lt| format!("{:?}", lt)),
        })
        .collect();

    Ok(ParquetSummary {
        rows: file_meta.num_rows(),
        row_groups: meta.num_row_groups(),
        columns,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PrepareConfig;
    use crate::process::{load_vehicles_from_reader, prepare, to_record_batch};
    use tempfile::tempdir;

    #[test]
    fn writes_and_reads_back_metadata() -> Result<()> {
        let csv = "\
price,model_year,model,condition,cylinders,fuel,odometer,transmission,type,paint_color,is_4wd,date_posted,days_listed
5000,2015,nissan altima,good,4,gas,100000,automatic,sedan,,,2019-01-02,10
6000,,nissan altima,good,4,gas,,automatic,sedan,red,1,2019-03-15,
";
        let mut table = load_vehicles_from_reader(csv.as_bytes())?;
        prepare(&mut table, &PrepareConfig::default())?;
        let batch = to_record_batch(&table)?;

        let dir = tempdir()?;
        let path = dir.path().join("cleaned.parquet");
        write_parquet(&batch, &path)?;

        let summary = read_parquet_summary(&path)?;
        assert_eq!(summary.rows, 2);
        assert_eq!(summary.columns.len(), 14);
        let model_year = summary
            .columns
            .iter()
            .find(|c| c.name == "model_year")
            .expect("model_year column");
        assert_eq!(model_year.physical_type, "INT64");
        Ok(())
    }
}
