use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::Arc;
use std::thread;

use crossbeam::channel::{bounded, Receiver, Sender};
use log::debug;

use crate::errors::{Result, TrimmerError};
use crate::fastq::{FastqRecord, Reader, Writer};
use crate::stats::{Stats, StatsSnapshot};
use crate::trim::{trim_read, Adapter, TrimParams};

/// One batch of parsed reads, tagged with its position in the input.
pub struct Batch {
    pub id: u64,
    pub reads: Vec<FastqRecord>,
}

/// Surviving reads of one batch after trimming.
pub struct ProcessedBatch {
    pub id: u64,
    pub reads: Vec<FastqRecord>,
}

// Min-heap ordering by batch id, so the writer can emit batches in input
// order even though workers complete them out of order.
struct OrderedBatch(ProcessedBatch);

impl PartialEq for OrderedBatch {
    fn eq(&self, other: &Self) -> bool {
        self.0.id == other.0.id
    }
}
impl Eq for OrderedBatch {}
impl PartialOrd for OrderedBatch {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for OrderedBatch {
    fn cmp(&self, other: &Self) -> Ordering {
        other.0.id.cmp(&self.0.id)
    }
}

/// Everything a run needs; immutable once the pipeline starts.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub input: String,
    pub output: String,
    pub adapter: Adapter,
    pub params: TrimParams,
    pub threads: usize,
    pub batch_size: usize,
    pub queue_depth: usize,
    pub compression: u32,
}

/// Run the full pipeline: one reader (this thread), a fixed pool of
/// trimming workers, and one writer thread draining a bounded channel.
/// Returns the statistics snapshot taken after every thread has joined.
///
/// On a fatal parse or I/O error the run aborts; output already written
/// before the error is not rolled back, so the output file must be treated
/// as invalid whenever this returns an error.
pub fn run(cfg: &PipelineConfig) -> Result<StatsSnapshot> {
    let threads = cfg.threads.max(1);
    let batch_size = cfg.batch_size.max(1);
    let queue_depth = cfg.queue_depth.max(1);

    let (tx_batch, rx_batch): (Sender<Batch>, Receiver<Batch>) = bounded(queue_depth);
    let (tx_out, rx_out): (Sender<ProcessedBatch>, Receiver<ProcessedBatch>) = bounded(queue_depth);

    let stats = Arc::new(Stats::new());
    let adapter = Arc::new(cfg.adapter.clone());
    let params = cfg.params;

    // 1. Worker pool. Concurrency is bounded by the pool size, not by the
    // number of batches in the input.
    let mut workers = Vec::with_capacity(threads);
    for _ in 0..threads {
        let rx = rx_batch.clone();
        let tx = tx_out.clone();
        let stats = stats.clone();
        let adapter = adapter.clone();

        workers.push(thread::spawn(move || {
            while let Ok(batch) = rx.recv() {
                let mut survivors = Vec::with_capacity(batch.reads.len());
                for read in batch.reads {
                    stats.incr_total();
                    match trim_read(&read, &adapter, &params) {
                        Ok(trimmed) => {
                            stats.incr_trimmed();
                            survivors.push(trimmed);
                        }
                        Err(rejection) => stats.record_rejection(rejection),
                    }
                }
                // A send failure means the writer died; its error surfaces
                // from the join below.
                if tx.send(ProcessedBatch { id: batch.id, reads: survivors }).is_err() {
                    break;
                }
            }
        }));
    }

    // Drop the run-scope channel ends the threads have cloned: rx_out
    // closes once all workers finish, and rx_batch disconnects once all
    // workers exit so a reader blocked in send fails fast instead of
    // waiting on a receiver nobody polls.
    drop(tx_out);
    drop(rx_batch);

    // 2. Writer thread.
    let output = cfg.output.clone();
    let compression = cfg.compression;
    let writer_handle = thread::spawn(move || -> Result<()> {
        let mut writer = Writer::create(&output, compression)?;
        let mut next_id = 0u64;
        let mut pending = BinaryHeap::new();

        for batch in rx_out {
            pending.push(OrderedBatch(batch));
            while let Some(top) = pending.peek() {
                if top.0.id != next_id {
                    break;
                }
                let OrderedBatch(batch) = pending.pop().unwrap();
                for read in &batch.reads {
                    writer.write_record(read)?;
                }
                next_id += 1;
            }
        }
        writer.finish()?;
        Ok(())
    });

    // 3. Reader on the calling thread.
    let read_result = (|| -> Result<()> {
        let mut reader = Reader::open(&cfg.input)?;
        let mut reads = Vec::with_capacity(batch_size);
        let mut batch_id = 0u64;

        while let Some(record) = reader.next_record()? {
            reads.push(record);
            if reads.len() >= batch_size {
                let full = std::mem::replace(&mut reads, Vec::with_capacity(batch_size));
                if tx_batch.send(Batch { id: batch_id, reads: full }).is_err() {
                    break;
                }
                batch_id += 1;
            }
        }
        if !reads.is_empty() {
            let _ = tx_batch.send(Batch { id: batch_id, reads });
            batch_id += 1;
        }
        debug!("reader finished after {batch_id} batches");
        Ok(())
    })();

    // Close the batch channel so workers drain and exit, then join
    // everything before surfacing any error.
    drop(tx_batch);
    let mut panicked = false;
    for worker in workers {
        panicked |= worker.join().is_err();
    }
    let write_result = match writer_handle.join() {
        Ok(result) => result,
        Err(_) => {
            panicked = true;
            Ok(())
        }
    };

    read_result?;
    write_result?;
    if panicked {
        return Err(TrimmerError::ThreadPanic);
    }

    Ok(stats.snapshot())
}
