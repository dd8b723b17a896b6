use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};

use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

use crate::errors::{Result, TrimmerError};

/// One FASTQ record. The separator line is always the literal `+` and is
/// not stored. Invariant after parsing: `seq.len() == qual.len()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastqRecord {
    pub header: String,
    pub seq: String,
    pub qual: String,
}

impl FastqRecord {
    pub fn new(header: String, seq: String, qual: String) -> Self {
        Self { header, seq, qual }
    }
}

fn strip_line_ending(line: &mut String) {
    if line.ends_with('\n') { line.pop(); }
    if line.ends_with('\r') { line.pop(); }
}

/// Sequential FASTQ parser over a decompressed text stream. Lazy and
/// non-restartable; every structural violation is fatal because the
/// remaining stream framing cannot be trusted after one.
pub struct Reader {
    reader: Box<dyn BufRead>,
}

impl Reader {
    /// Open a file path, transparently decompressing `.gz` input.
    pub fn open(path: &str) -> Result<Self> {
        let f = File::open(path)?;
        let reader: Box<dyn BufRead> = if path.ends_with(".gz") {
            Box::new(BufReader::new(MultiGzDecoder::new(f)))
        } else {
            Box::new(BufReader::new(f))
        };
        Ok(Self { reader })
    }

    pub fn from_bufread(reader: Box<dyn BufRead>) -> Self {
        Self { reader }
    }

    /// Next record, or `None` at clean end of stream.
    pub fn next_record(&mut self) -> Result<Option<FastqRecord>> {
        let mut header = String::new();
        if self.reader.read_line(&mut header)? == 0 {
            return Ok(None);
        }

        let mut seq = String::new();
        let mut plus = String::new();
        let mut qual = String::new();
        for (n, line) in [(1usize, &mut seq), (2, &mut plus), (3, &mut qual)] {
            if self.reader.read_line(line)? == 0 {
                return Err(TrimmerError::TruncatedRecord { lines_read: n });
            }
        }

        strip_line_ending(&mut header);
        strip_line_ending(&mut seq);
        strip_line_ending(&mut plus);
        strip_line_ending(&mut qual);

        if !header.starts_with('@') {
            return Err(TrimmerError::InvalidHeader { line: header });
        }
        if plus != "+" {
            return Err(TrimmerError::InvalidSeparator { line: plus });
        }
        if seq.len() != qual.len() {
            return Err(TrimmerError::LengthMismatch {
                seq_len: seq.len(),
                qual_len: qual.len(),
            });
        }

        Ok(Some(FastqRecord { header, seq, qual }))
    }
}

// Owned concretely rather than as Box<dyn Write> so finish() can run the
// gzip finalization and surface its error instead of losing it in Drop.
enum Sink {
    Plain(File),
    Gz(GzEncoder<File>),
}

/// FASTQ serializer, gzip-compressing when the path ends in `.gz`.
pub struct Writer {
    sink: Sink,
}

impl Writer {
    pub fn create(path: &str, compression_level: u32) -> Result<Self> {
        let f = File::create(path)?;
        let sink = if path.ends_with(".gz") {
            Sink::Gz(GzEncoder::new(f, Compression::new(compression_level)))
        } else {
            Sink::Plain(f)
        };
        Ok(Self { sink })
    }

    fn inner(&mut self) -> &mut dyn Write {
        match &mut self.sink {
            Sink::Plain(f) => f,
            Sink::Gz(gz) => gz,
        }
    }

    pub fn write_record(&mut self, rec: &FastqRecord) -> io::Result<()> {
        let w = self.inner();
        w.write_all(rec.header.as_bytes())?; w.write_all(b"\n")?;
        w.write_all(rec.seq.as_bytes())?;    w.write_all(b"\n")?;
        w.write_all(b"+\n")?;
        w.write_all(rec.qual.as_bytes())?;   w.write_all(b"\n")?;
        Ok(())
    }

    /// Flush buffered output and finish any compression stream. The gzip
    /// trailer is written here, so a finalization failure is reported
    /// rather than swallowed on drop.
    pub fn finish(self) -> io::Result<()> {
        match self.sink {
            Sink::Plain(mut f) => f.flush(),
            Sink::Gz(gz) => {
                let mut f = gz.finish()?;
                f.flush()
            }
        }
    }
}
