use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "scram_trimmer", version = "0.1.0", about = "Adapter trimming and quality filtering for small-RNA FASTQ data")]
pub struct Cli {
    /// Input FASTQ file (.gz supported), required
    #[arg(short = 'i', long = "input")]
    pub input: Option<String>,

    /// Output FASTQ file (.gz supported), required
    #[arg(short = 'o', long = "output")]
    pub output: Option<String>,

    /// Adapter sequence, required
    #[arg(short = 'a', long = "adapter")]
    pub adapter: Option<String>,

    // Trimming options
    #[arg(long = "min-len", default_value_t = 18)]
    pub min_len: usize,
    #[arg(long = "trim5", default_value_t = 0)]
    pub trim5: usize,
    #[arg(long = "trim3", default_value_t = 0)]
    pub trim3: usize,
    #[arg(long = "min5-match", default_value_t = 8)]
    pub min5_match: usize,
    #[arg(long = "max-error", default_value_t = 0.1)]
    pub max_error: f64,

    // Threading
    /// Worker threads (0 = all cores)
    #[arg(short = 'w', long = "threads", default_value_t = 0)]
    pub threads: usize,

    // Performance tuning
    #[arg(long = "batch-size", default_value_t = 10000)]
    pub batch_size: usize,
    /// Bounded channel depth (0 = threads * 2)
    #[arg(long = "queue-depth", default_value_t = 0)]
    pub queue_depth: usize,
    #[arg(short = 'z', long = "compression", default_value_t = 4)]
    pub compression: u32,

    // Reporting
    /// Optional JSON statistics file
    #[arg(long = "json")]
    pub json: Option<String>,
}

impl Cli {
    /// Effective worker count after resolving 0 = all cores.
    pub fn thread_num(&self) -> usize {
        if self.threads == 0 { num_cpus::get() } else { self.threads }
    }

    /// Effective channel depth after resolving 0 = threads * 2.
    pub fn effective_queue_depth(&self) -> usize {
        if self.queue_depth == 0 { self.thread_num() * 2 } else { self.queue_depth }
    }

    /// Effective batch size; 0 falls back to the default.
    pub fn effective_batch_size(&self) -> usize {
        if self.batch_size == 0 { 10000 } else { self.batch_size }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["scram_trimmer", "-i", "in.fq.gz", "-o", "out.fq.gz", "-a", "TGGAATTC"]);
        assert_eq!(cli.min_len, 18);
        assert_eq!(cli.trim5, 0);
        assert_eq!(cli.trim3, 0);
        assert_eq!(cli.min5_match, 8);
        assert!((cli.max_error - 0.1).abs() < f64::EPSILON);
        assert_eq!(cli.batch_size, 10000);
    }

    #[test]
    fn test_queue_depth_fallback() {
        let cli = Cli::parse_from(["scram_trimmer", "-w", "4", "--queue-depth", "0"]);
        assert_eq!(cli.effective_queue_depth(), 8);
        assert_eq!(cli.thread_num(), 4);
    }

    #[test]
    fn test_missing_required_is_none() {
        let cli = Cli::parse_from(["scram_trimmer"]);
        assert!(cli.input.is_none());
        assert!(cli.output.is_none());
        assert!(cli.adapter.is_none());
    }
}
