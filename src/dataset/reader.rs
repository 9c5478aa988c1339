use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::iter::Enumerate;
use std::path::Path;

use tracing::warn;

use super::{DatasetError, DatasetRecord};

/// Parse one whitespace-separated probability line.
///
/// `line` is only used for error reporting.
pub fn parse_probabilities(text: &str, line: usize) -> Result<Vec<f64>, DatasetError> {
    let mut probabilities = Vec::new();

    for token in text.split_whitespace() {
        let value: f64 = token
            .parse()
            .map_err(|_| DatasetError::InvalidProbability {
                line,
                token: token.to_string(),
            })?;

        if !value.is_finite() {
            return Err(DatasetError::NonFiniteProbability {
                line,
                token: token.to_string(),
            });
        }
        if value < 0.0 {
            return Err(DatasetError::NegativeProbability { line, value });
        }
        probabilities.push(value);
    }

    if probabilities.is_empty() {
        return Err(DatasetError::EmptyRecord { line });
    }

    Ok(probabilities)
}

/// Streaming reader yielding one [`DatasetRecord`] per header/probability pair
///
/// Iteration stops after the first error.
#[derive(Debug)]
pub struct DatasetReader<R: BufRead> {
    lines: Enumerate<Lines<R>>,
    failed: bool,
}

impl DatasetReader<BufReader<File>> {
    /// Open a data file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DatasetError> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> DatasetReader<R> {
    /// Wrap any buffered reader
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines().enumerate(),
            failed: false,
        }
    }

    fn next_line(&mut self) -> Option<Result<(usize, String), DatasetError>> {
        self.lines
            .next()
            .map(|(idx, line)| line.map(|text| (idx + 1, text)).map_err(DatasetError::from))
    }

    fn read_record(&mut self) -> Option<Result<DatasetRecord, DatasetError>> {
        // Skip blank separators up to the next header.
        let (header_line, header) = loop {
            match self.next_line()? {
                Ok((_, text)) if text.trim().is_empty() => continue,
                Ok(entry) => break entry,
                Err(err) => return Some(Err(err)),
            }
        };

        let (line, text) = match self.next_line() {
            Some(Ok(entry)) => entry,
            Some(Err(err)) => return Some(Err(err)),
            None => {
                return Some(Err(DatasetError::MissingProbabilities { line: header_line }));
            }
        };

        let probabilities = match parse_probabilities(&text, line) {
            Ok(values) => values,
            Err(err) => return Some(Err(err)),
        };

        let record = DatasetRecord {
            label: header.trim().to_string(),
            line: header_line,
            probabilities,
        };

        if let Some(declared) = record.declared_len() {
            if declared != record.probabilities.len() {
                warn!(
                    line = header_line,
                    declared,
                    actual = record.probabilities.len(),
                    "header key count disagrees with probability line"
                );
            }
        }

        Some(Ok(record))
    }
}

impl<R: BufRead> Iterator for DatasetReader<R> {
    type Item = Result<DatasetRecord, DatasetError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let item = self.read_record();
        if matches!(item, Some(Err(_))) {
            self.failed = true;
        }
        item
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_line() {
        let values = parse_probabilities("0.1 0.2\t0.4  0.3", 2).unwrap();
        assert_eq!(values, vec![0.1, 0.2, 0.4, 0.3]);
    }

    #[test]
    fn test_parse_rejects_bad_tokens() {
        assert!(matches!(
            parse_probabilities("0.1 abc", 7),
            Err(DatasetError::InvalidProbability { line: 7, ref token }) if token == "abc"
        ));
        assert!(matches!(
            parse_probabilities("0.1 -0.2", 3),
            Err(DatasetError::NegativeProbability { line: 3, .. })
        ));
        assert!(matches!(
            parse_probabilities("NaN", 1),
            Err(DatasetError::NonFiniteProbability { line: 1, .. })
        ));
        assert!(matches!(
            parse_probabilities("   ", 4),
            Err(DatasetError::EmptyRecord { line: 4 })
        ));
    }

    #[test]
    fn test_records_and_blank_lines() {
        let input = "4\n0.1 0.2 0.4 0.3\n\n1\n0.5\n\n";
        let records: Vec<DatasetRecord> = DatasetReader::new(Cursor::new(input))
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].label, "4");
        assert_eq!(records[0].line, 1);
        assert_eq!(records[0].declared_len(), Some(4));
        assert_eq!(records[1].line, 4);
        assert_eq!(records[1].probabilities, vec![0.5]);
    }

    #[test]
    fn test_dangling_header() {
        let mut reader = DatasetReader::new(Cursor::new("1\n0.5\n2\n"));
        assert!(reader.next().unwrap().is_ok());
        assert!(matches!(
            reader.next(),
            Some(Err(DatasetError::MissingProbabilities { line: 3 }))
        ));
        assert!(reader.next().is_none());
    }
}
