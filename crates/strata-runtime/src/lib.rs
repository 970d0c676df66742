//! Background chunk generation: a worker pool fed by a job queue, with
//! in-flight de-duplication per chunk coordinate.
#![forbid(unsafe_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, unbounded};
use hashbrown::HashSet;
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};
use strata_chunk::{Chunk, ChunkStore};
use strata_world::{ChunkCoord, TerrainGenerator};

#[derive(Clone, Debug)]
pub struct GenJob {
    pub coord: ChunkCoord,
    pub chunk_size: usize,
    pub generator: Arc<TerrainGenerator>,
    pub job_id: u64,
}

pub struct GenOut {
    pub chunk: Chunk,
    pub generator: Arc<TerrainGenerator>,
    pub job_id: u64,
    pub t_gen_ms: u32,
}

fn process_gen_job(job: GenJob, tx: &Sender<GenOut>) {
    let GenJob {
        coord,
        chunk_size,
        generator,
        job_id,
    } = job;
    let t0 = Instant::now();
    let (ox, oy) = coord.origin(chunk_size);
    let block = generator.generate_block(ox, oy, chunk_size, chunk_size);
    let t_gen_ms = t0.elapsed().as_millis().min(u128::from(u32::MAX)) as u32;
    let _ = tx.send(GenOut {
        chunk: Chunk::new(coord, block),
        generator,
        job_id,
        t_gen_ms,
    });
}

pub struct ChunkWorkers {
    job_tx: Sender<GenJob>,
    res_rx: Receiver<GenOut>,
    _pool: Arc<ThreadPool>,
    queued: Arc<AtomicUsize>,
    inflight: Arc<AtomicUsize>,
    pending: HashSet<u64>,
    next_job_id: u64,
    pub workers: usize,
}

impl ChunkWorkers {
    /// One worker per available core, leaving one for the caller.
    pub fn with_default_threads() -> Result<Self, ThreadPoolBuildError> {
        let n = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4)
            .saturating_sub(1)
            .max(1);
        Self::new(n)
    }

    pub fn new(workers: usize) -> Result<Self, ThreadPoolBuildError> {
        let workers = workers.max(1);
        let (job_tx, job_rx) = unbounded::<GenJob>();
        let (res_tx, res_rx) = unbounded::<GenOut>();
        let pool = Arc::new(
            ThreadPoolBuilder::new()
                .num_threads(workers)
                .thread_name(|i| format!("strata-gen-{i}"))
                .build()?,
        );
        let queued = Arc::new(AtomicUsize::new(0));
        let inflight = Arc::new(AtomicUsize::new(0));
        for _ in 0..workers {
            let rx = job_rx.clone();
            let tx = res_tx.clone();
            let queued = queued.clone();
            let inflight = inflight.clone();
            pool.spawn(move || {
                while let Ok(job) = rx.recv() {
                    queued.fetch_sub(1, Ordering::Relaxed);
                    inflight.fetch_add(1, Ordering::Relaxed);
                    process_gen_job(job, &tx);
                    inflight.fetch_sub(1, Ordering::Relaxed);
                }
            });
        }
        log::info!(target: "runtime", "started {workers} chunk generation worker(s)");
        Ok(Self {
            job_tx,
            res_rx,
            _pool: pool,
            queued,
            inflight,
            pending: HashSet::new(),
            next_job_id: 0,
            workers,
        })
    }

    #[inline]
    pub fn is_pending(&self, coord: ChunkCoord) -> bool {
        self.pending.contains(&coord.pack())
    }

    #[inline]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Queue generation of `coord` unless it is cached or already in flight.
    pub fn request(&mut self, store: &ChunkStore, coord: ChunkCoord) -> bool {
        if store.is_loaded(coord) || !self.pending.insert(coord.pack()) {
            return false;
        }
        let job = GenJob {
            coord,
            chunk_size: store.chunk_size(),
            generator: Arc::clone(store.generator()),
            job_id: self.next_job_id,
        };
        self.next_job_id += 1;
        self.queued.fetch_add(1, Ordering::Relaxed);
        if self.job_tx.send(job).is_err() {
            self.queued.fetch_sub(1, Ordering::Relaxed);
            self.pending.remove(&coord.pack());
            return false;
        }
        true
    }

    /// Request every missing chunk within `radius` of the reference tile,
    /// nearest first. Returns how many jobs were queued.
    pub fn request_around(&mut self, store: &ChunkStore, ref_x: i32, ref_y: i32, radius: i32) -> usize {
        store
            .missing_around(ref_x, ref_y, radius)
            .into_iter()
            .filter(|c| self.request(store, *c))
            .count()
    }

    fn publish(&mut self, store: &mut ChunkStore, out: GenOut) -> bool {
        let coord = out.chunk.coord;
        self.pending.remove(&coord.pack());
        if !Arc::ptr_eq(&out.generator, store.generator()) {
            log::debug!(
                target: "runtime",
                "dropping chunk ({}, {}) built for a replaced generator",
                coord.cx, coord.cy
            );
            return false;
        }
        log::trace!(
            target: "runtime",
            "job {} chunk ({}, {}) in {}ms",
            out.job_id, coord.cx, coord.cy, out.t_gen_ms
        );
        store.insert_generated(out.chunk)
    }

    /// Publish finished chunks into `store` without blocking. Returns how many
    /// were inserted.
    pub fn drain_into(&mut self, store: &mut ChunkStore) -> usize {
        let results: Vec<GenOut> = self.res_rx.try_iter().collect();
        let mut inserted = 0;
        for out in results {
            if self.publish(store, out) {
                inserted += 1;
            }
        }
        inserted
    }

    /// Block until every pending job has been published or `timeout` passes.
    /// Returns `true` when nothing is left pending.
    pub fn finish(&mut self, store: &mut ChunkStore, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while !self.pending.is_empty() {
            let left = deadline.saturating_duration_since(Instant::now());
            match self.res_rx.recv_timeout(left) {
                Ok(out) => {
                    self.publish(store, out);
                }
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        self.pending.is_empty()
    }

    /// (queued, in flight)
    pub fn queue_debug_counts(&self) -> (usize, usize) {
        (
            self.queued.load(Ordering::Relaxed),
            self.inflight.load(Ordering::Relaxed),
        )
    }
}
