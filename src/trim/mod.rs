use crate::fastq::FastqRecord;

/// Why a read was dropped. Exactly one category applies per read; the
/// categories are checked in adapter -> length -> quality order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    AdapterMissing,
    TooShort,
    LowQuality,
}

/// Adapter sequence supplied once per run. Only the leading `min5_match`
/// bases take part in matching; an adapter shorter than `min5_match` is
/// matched in full.
#[derive(Debug, Clone)]
pub struct Adapter {
    seq: String,
    prefix_len: usize,
}

impl Adapter {
    pub fn new(seq: &str, min5_match: usize) -> Self {
        let prefix_len = min5_match.min(seq.len());
        Self { seq: seq.to_string(), prefix_len }
    }

    /// The match prefix searched for in each read.
    pub fn prefix(&self) -> &str {
        &self.seq[..self.prefix_len]
    }
}

/// Immutable trimming configuration, shared read-only across workers.
#[derive(Debug, Clone, Copy)]
pub struct TrimParams {
    pub min_len: usize,
    pub trim5: usize,
    pub trim3: usize,
    pub max_error: f64,
}

/// Error probability of one Phred+33 quality character: 10^(-(code-33)/10).
pub fn phred33_to_error(qual: u8) -> f64 {
    10f64.powf(-((qual as f64) - 33.0) / 10.0)
}

/// Mean per-base error probability over a quality string. An empty slice
/// reports 1.0 so it can never pass the quality check; callers reject
/// zero-length windows as too short before getting here.
pub fn mean_error(quality: &[u8]) -> f64 {
    if quality.is_empty() {
        return 1.0;
    }
    let total: f64 = quality.iter().map(|&q| phred33_to_error(q)).sum();
    total / quality.len() as f64
}

/// Trimming decision for one read: locate the adapter prefix, cut the
/// retained window, check its length and mean error. Pure; safe to call
/// concurrently on disjoint reads.
pub fn trim_read(
    read: &FastqRecord,
    adapter: &Adapter,
    params: &TrimParams,
) -> Result<FastqRecord, Rejection> {
    let adapter_index = match read.seq.find(adapter.prefix()) {
        Some(i) => i,
        None => return Err(Rejection::AdapterMissing),
    };

    // Retained window is [trim5, adapter_index - trim3). An inverted or
    // empty window is TooShort, never a slice panic or a NaN mean.
    let start = params.trim5;
    let end = match adapter_index.checked_sub(params.trim3) {
        Some(e) => e,
        None => return Err(Rejection::TooShort),
    };
    if end <= start || end - start < params.min_len {
        return Err(Rejection::TooShort);
    }

    let seq = &read.seq[start..end];
    let qual = &read.qual[start..end];

    if mean_error(qual.as_bytes()) >= params.max_error {
        return Err(Rejection::LowQuality);
    }

    Ok(FastqRecord {
        header: read.header.clone(),
        seq: seq.to_string(),
        qual: qual.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(seq: &str, qual: &str) -> FastqRecord {
        FastqRecord::new("@Header".to_string(), seq.to_string(), qual.to_string())
    }

    fn params(min_len: usize, trim5: usize, trim3: usize, max_error: f64) -> TrimParams {
        TrimParams { min_len, trim5, trim3, max_error }
    }

    #[test]
    fn test_phred33_to_error() {
        // code 33 = Q0 = certain error
        assert!((phred33_to_error(b'!') - 1.0).abs() < 1e-5);
        // code 43 = Q10
        assert!((phred33_to_error(b'+') - 0.1).abs() < 1e-5);
        // code 60 = Q27
        assert!((phred33_to_error(b'<') - 0.002).abs() < 1e-4);
    }

    #[test]
    fn test_mean_error() {
        assert!((mean_error(b"!!!!!") - 1.0).abs() < 1e-5);
        let expected = (1.0 + 0.1 + 0.002 + 0.0002) / 4.0;
        assert!((mean_error(&[33, 43, 60, 70]) - expected).abs() < 1e-4);
        // empty slice must never read as passing
        assert!(mean_error(b"") >= 1.0);
    }

    #[test]
    fn test_adapter_prefix_clamped() {
        let a = Adapter::new("ATCC", 8);
        assert_eq!(a.prefix(), "ATCC");
        let a = Adapter::new("ATCCGGTT", 4);
        assert_eq!(a.prefix(), "ATCC");
    }

    #[test]
    fn test_adapter_missing() {
        let a = Adapter::new("TTTT", 3);
        let r = trim_read(&read("ATCGATCG", "FFFFFFFF"), &a, &params(4, 0, 0, 0.1));
        assert_eq!(r.unwrap_err(), Rejection::AdapterMissing);
    }

    #[test]
    fn test_too_short() {
        let a = Adapter::new("ATCC", 4);
        let r = trim_read(&read("ATCGATCC", "FFFFFFFF"), &a, &params(10, 0, 0, 0.1));
        assert_eq!(r.unwrap_err(), Rejection::TooShort);
    }

    #[test]
    fn test_low_quality() {
        let a = Adapter::new("ATCC", 4);
        let r = trim_read(&read("ATCGATCC", "!!!!!!!!"), &a, &params(2, 0, 0, 0.1));
        assert_eq!(r.unwrap_err(), Rejection::LowQuality);
    }

    #[test]
    fn test_successful_trim() {
        let a = Adapter::new("ATCC", 4);
        let r = trim_read(&read("ATCGATCC", "FFFFFFFF"), &a, &params(2, 0, 0, 0.1)).unwrap();
        assert_eq!(r.header, "@Header");
        assert_eq!(r.seq, "ATCG");
        assert_eq!(r.qual, "FFFF");
    }

    #[test]
    fn test_trim5() {
        let a = Adapter::new("ATCC", 4);
        let r = trim_read(&read("ATCGATCC", "FFFFFFFF"), &a, &params(2, 2, 0, 0.1)).unwrap();
        assert_eq!(r.seq, "CG");
        assert_eq!(r.qual, "FF");
    }

    #[test]
    fn test_trim3() {
        let a = Adapter::new("ATCC", 4);
        let r = trim_read(&read("ATCGATCC", "FFFFFFFF"), &a, &params(2, 0, 2, 0.1)).unwrap();
        assert_eq!(r.seq, "AT");
        assert_eq!(r.qual, "FF");
    }

    #[test]
    fn test_trim5_and_trim3() {
        let a = Adapter::new("ATCC", 4);
        let r = trim_read(&read("ATCGATCC", "FFFFFFFF"), &a, &params(2, 1, 1, 0.1)).unwrap();
        assert_eq!(r.seq, "TC");
        assert_eq!(r.qual, "FF");
    }

    #[test]
    fn test_trim5_past_adapter_is_too_short() {
        // window becomes empty/inverted, never a slice panic
        let a = Adapter::new("ATCC", 4);
        let r = trim_read(&read("ATCGATCC", "FFFFFFFF"), &a, &params(2, 5, 0, 0.1));
        assert_eq!(r.unwrap_err(), Rejection::TooShort);
    }

    #[test]
    fn test_trim3_past_adapter_is_too_short() {
        let a = Adapter::new("ATCC", 4);
        let r = trim_read(&read("ATCGATCC", "FFFFFFFF"), &a, &params(2, 0, 5, 0.1));
        assert_eq!(r.unwrap_err(), Rejection::TooShort);
    }

    #[test]
    fn test_trim3_underflow_is_too_short() {
        // adapter at position 0, trim3 larger than the match index
        let a = Adapter::new("ATCG", 4);
        let r = trim_read(&read("ATCGAAAA", "FFFFFFFF"), &a, &params(0, 0, 2, 0.1));
        assert_eq!(r.unwrap_err(), Rejection::TooShort);
    }

    #[test]
    fn test_min_len_zero_empty_window_is_too_short() {
        // adapter at 0 with no flanks leaves a zero-length window; this is
        // TooShort even with min_len 0, so the mean is never computed
        let a = Adapter::new("ATCG", 4);
        let r = trim_read(&read("ATCGAAAA", "FFFFFFFF"), &a, &params(0, 0, 0, 0.1));
        assert_eq!(r.unwrap_err(), Rejection::TooShort);
    }

    #[test]
    fn test_surviving_read_length_invariant() {
        let a = Adapter::new("ATCACG", 4);
        let seq = "GATCGGAAGAGCACACGTCTGAACTCCAGTCACATCACGATCTCGTATGC";
        let qual = "BCCFFFFFFHHHHHJJJJJJJJJJJJJJJJJJJJJJJJJJJJJJJJJFJJ";
        let p = params(5, 2, 2, 0.1);
        let r = trim_read(&read(seq, qual), &a, &p).unwrap();
        assert_eq!(r.seq.len(), r.qual.len());
        assert!(r.seq.len() >= p.min_len);
    }
}
