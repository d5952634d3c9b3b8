use crate::corpus::{parse_sequence, CorpusStats, RawCounts};
use crate::error::{PentaforgeError, PfResult};
use crate::keymap::{LetterId, LETTER_COUNT};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_reader(reader)
}

fn parse_count(raw: &str, context: &str) -> PfResult<f64> {
    raw.parse::<f64>()
        .ok()
        .filter(|c| c.is_finite() && *c >= 0.0)
        .ok_or_else(|| {
            PentaforgeError::Config(format!("Invalid count '{}' for {}", raw, context))
        })
}

/// Reads `letter,count` rows. Letters absent from the file count zero.
pub fn load_unigrams<R: Read>(reader: R) -> PfResult<[f64; LETTER_COUNT]> {
    let mut counts = [0.0; LETTER_COUNT];
    let mut rdr = csv_reader(reader);

    for record in rdr.records() {
        let record = record?;
        if record.len() < 2 {
            return Err(PentaforgeError::Config(format!(
                "Unigram row {:?} needs a letter and a count",
                record
            )));
        }
        let token = &record[0];
        let mut chars = token.chars();
        let letter = match (chars.next().and_then(LetterId::from_char), chars.next()) {
            (Some(l), None) => l,
            _ => {
                return Err(PentaforgeError::Config(format!(
                    "Unigram '{}' is not a single letter",
                    token
                )))
            }
        };
        counts[letter.index()] += parse_count(&record[1], token)?;
    }

    debug!(
        "Loaded unigrams: {} letters with non-zero counts",
        counts.iter().filter(|&&c| c > 0.0).count()
    );
    Ok(counts)
}

/// Reads `sequence,count` rows of five letter sequences.
pub fn load_pentagrams<R: Read>(reader: R) -> PfResult<Vec<([LetterId; 5], f64)>> {
    let mut entries = Vec::new();
    let mut rdr = csv_reader(reader);

    for record in rdr.records() {
        let record = record?;
        if record.len() < 2 {
            return Err(PentaforgeError::Config(format!(
                "Pentagram row {:?} needs a sequence and a count",
                record
            )));
        }
        let seq = parse_sequence(&record[0])?;
        entries.push((seq, parse_count(&record[1], &record[0])?));
    }

    debug!("Loaded {} pentagram rows", entries.len());
    Ok(entries)
}

/// Reads both count tables from disk and normalizes them.
pub fn load_corpus<P1: AsRef<Path>, P2: AsRef<Path>>(
    unigram_path: P1,
    pentagram_path: P2,
) -> PfResult<CorpusStats> {
    info!(
        "📚 Loading corpus: {} + {}",
        unigram_path.as_ref().display(),
        pentagram_path.as_ref().display()
    );
    let unigrams = load_unigrams(File::open(unigram_path)?)?;
    let pentagrams = load_pentagrams(File::open(pentagram_path)?)?;
    CorpusStats::from_counts(RawCounts {
        unigrams,
        pentagrams,
    })
}
