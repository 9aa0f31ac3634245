use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::models::PriceBar;

/// Default download name for a ticker's series
pub fn default_filename(ticker: &str) -> String {
    format!("{}_data.csv", ticker)
}

/// Write bars as CSV with a `date,open,high,low,close,adj_close,volume` header
pub fn write_csv<W: Write>(writer: W, bars: &[PriceBar]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    if bars.is_empty() {
        wtr.write_record(["date", "open", "high", "low", "close", "adj_close", "volume"])?;
    }
    for bar in bars {
        wtr.serialize(bar)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write bars to a CSV file at `path`
pub fn export_csv(path: &Path, bars: &[PriceBar]) -> Result<()> {
    let file = File::create(path)?;
    write_csv(file, bars)?;
    tracing::info!("Exported {} bars to {}", bars.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_bars() -> Vec<PriceBar> {
        vec![
            PriceBar {
                date: NaiveDate::from_ymd_opt(2024, 5, 14).unwrap(),
                open: 100.5,
                high: 102.25,
                low: 99.75,
                close: 101.0,
                adj_close: 101.0,
                volume: 286_000,
            },
            PriceBar {
                date: NaiveDate::from_ymd_opt(2024, 5, 15).unwrap(),
                open: 101.2,
                high: 103.0,
                low: 100.1,
                close: 102.4,
                adj_close: 102.4,
                volume: 250_123,
            },
        ]
    }

    #[test]
    fn test_default_filename() {
        assert_eq!(default_filename("GOOGL"), "GOOGL_data.csv");
    }

    #[test]
    fn test_write_csv_column_order() {
        let mut buf = Vec::new();
        write_csv(&mut buf, &sample_bars()).unwrap();

        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "date,open,high,low,close,adj_close,volume");
        assert_eq!(lines[1], "2024-05-14,100.5,102.25,99.75,101.0,101.0,286000");
        assert_eq!(lines[2], "2024-05-15,101.2,103.0,100.1,102.4,102.4,250123");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_write_csv_empty_still_has_header() {
        let mut buf = Vec::new();
        write_csv(&mut buf, &[]).unwrap();

        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "date,open,high,low,close,adj_close,volume\n"
        );
    }

    #[test]
    fn test_csv_reads_back() {
        let mut buf = Vec::new();
        write_csv(&mut buf, &sample_bars()).unwrap();

        let mut rdr = csv::Reader::from_reader(buf.as_slice());
        let parsed: Vec<PriceBar> = rdr.deserialize().collect::<std::result::Result<_, _>>().unwrap();

        assert_eq!(parsed, sample_bars());
    }
}
