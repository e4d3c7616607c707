//! pipeline/encrypt.rs
//! Message encryption: header + sealed records.
//!
//! Flow:
//! 1. Resolve the header (caller's, or fresh salt with 64 KiB records).
//! 2. Frame the data with `PaddedRecords`, or take a caller `RecordSource`.
//! 3. Derive the key schedule once, then seal record `seq = 0, 1, ...` with
//!    `nonce(seq)`, sequentially or on the ordered worker pool.
//! 4. Output is `header || records`, or records only when detached.

use tracing::debug;

use crate::constants::MAX_PREALLOC;
use crate::crypto::{CryptoEngine, CryptoProvider, RustCryptoProvider};
use crate::pipeline::engine_for;
use crate::pipeline::options::EncryptOptions;
use crate::pipeline::parallel::run_ordered;
use crate::records::{unpad, PaddedRecords, PlainTextRecord, RecordError, RecordSource};
use crate::telemetry::{Stage, TelemetryCounters, TelemetrySnapshot, TelemetryTimer};
use crate::types::EceError;

/// Encrypt `data` under `secret` with the default crypto provider.
pub fn encrypt(data: &[u8], secret: &[u8], options: &EncryptOptions) -> Result<Vec<u8>, EceError> {
    encrypt_with(RustCryptoProvider, data, secret, options)
}

pub fn encrypt_with<P: CryptoProvider>(
    provider: P,
    data: &[u8],
    secret: &[u8],
    options: &EncryptOptions,
) -> Result<Vec<u8>, EceError> {
    encrypt_instrumented(provider, data, secret, options).map(|(out, _)| out)
}

/// Encrypt and report counters, stage timings and derivation stats.
pub fn encrypt_with_telemetry(
    data: &[u8],
    secret: &[u8],
    options: &EncryptOptions,
) -> Result<(Vec<u8>, TelemetrySnapshot), EceError> {
    encrypt_instrumented(RustCryptoProvider, data, secret, options)
}

/// Encrypt records produced by a caller-supplied source.
///
/// `options.extra_padding` is ignored: padding is the source's business.
/// Every record must be 1..=`rs - 16` bytes and the source must produce
/// exactly `record_count()` records.
pub fn encrypt_records<S>(
    source: S,
    secret: &[u8],
    options: &EncryptOptions,
) -> Result<Vec<u8>, EceError>
where
    S: RecordSource + Send,
{
    encrypt_records_with(RustCryptoProvider, source, secret, options)
}

pub fn encrypt_records_with<P, S>(
    provider: P,
    source: S,
    secret: &[u8],
    options: &EncryptOptions,
) -> Result<Vec<u8>, EceError>
where
    P: CryptoProvider,
    S: RecordSource + Send,
{
    let mut counters = TelemetryCounters::default();
    let mut timer = TelemetryTimer::new();
    let engine = engine_for(provider, secret, options.header.clone(), options.info.as_deref())?;
    seal_message(&engine, source, options, &mut counters, &mut timer)
}

fn encrypt_instrumented<P: CryptoProvider>(
    provider: P,
    data: &[u8],
    secret: &[u8],
    options: &EncryptOptions,
) -> Result<(Vec<u8>, TelemetrySnapshot), EceError> {
    let mut counters = TelemetryCounters::default();
    let mut timer = TelemetryTimer::new();

    let engine = engine_for(provider, secret, options.header.clone(), options.info.as_deref())?;
    let rs = engine.header().rs();
    let framer = timer.time(Stage::Frame, || {
        PaddedRecords::with_padding(data, rs, options.extra_padding)
    })?;

    let out = seal_message(&engine, framer, options, &mut counters, &mut timer)?;
    timer.finish();

    let snapshot = TelemetrySnapshot::from(&counters, &timer, engine.derivation_stats());
    Ok((out, snapshot))
}

struct SealedRecord {
    data_len: usize,
    padded_len: usize,
    ciphertext: Vec<u8>,
}

fn seal_record<P: CryptoProvider>(
    engine: &CryptoEngine<P>,
    record: &PlainTextRecord,
    seq: u64,
    max_len: usize,
) -> Result<SealedRecord, EceError> {
    if record.is_empty() {
        return Err(RecordError::EmptyRecord { seq }.into());
    }
    if record.len() > max_len {
        return Err(RecordError::RecordTooLarge { seq, len: record.len(), max: max_len }.into());
    }
    let ciphertext = engine.encrypt_record(record.as_bytes(), seq)?;
    Ok(SealedRecord {
        data_len: unpad(record.as_bytes()).len(),
        padded_len: record.len(),
        ciphertext,
    })
}

fn seal_message<P, S>(
    engine: &CryptoEngine<P>,
    mut source: S,
    options: &EncryptOptions,
    counters: &mut TelemetryCounters,
    timer: &mut TelemetryTimer,
) -> Result<Vec<u8>, EceError>
where
    P: CryptoProvider,
    S: RecordSource + Send,
{
    let header = engine.header();
    let announced = source.record_count();
    let max_len = header.record_plaintext_len();
    let workers = options.parallelism.worker_count();

    debug!(
        records = announced,
        rs = header.rs(),
        keyid = %crate::utils::fmt_bytes(header.keyid()),
        embed_header = options.embed_header,
        workers,
        "encrypting message"
    );

    timer.time(Stage::Derive, || engine.prepare())?;

    let header_bytes = timer.time(Stage::Encode, || header.to_bytes());
    counters.add_header(header_bytes.len());

    let body_capacity = announced.saturating_mul(header.rs() as usize).min(MAX_PREALLOC);
    let mut out = Vec::with_capacity(header_bytes.len() + body_capacity);
    if options.embed_header {
        out.extend_from_slice(&header_bytes);
    }

    let produced = if options.parallelism.is_parallel() {
        let jobs = std::iter::from_fn(|| source.next_record())
            .zip(0u64..)
            .map(|(record, seq)| (seq, record));
        let sealed = timer.time(Stage::Seal, || {
            run_ordered(jobs, workers, |seq, record: PlainTextRecord| {
                seal_record(engine, &record, seq, max_len)
            })
        })?;

        let produced = sealed.len();
        timer.time(Stage::Encode, || {
            for s in &sealed {
                out.extend_from_slice(&s.ciphertext);
            }
        });
        for s in &sealed {
            counters.add_record(s.data_len, s.padded_len);
        }
        produced
    } else {
        let mut seq = 0u64;
        while let Some(record) = timer.time(Stage::Frame, || source.next_record()) {
            let sealed = timer.time(Stage::Seal, || seal_record(engine, &record, seq, max_len))?;
            counters.add_record(sealed.data_len, sealed.padded_len);
            out.extend_from_slice(&sealed.ciphertext);
            seq += 1;
        }
        seq as usize
    };

    if produced != announced {
        return Err(RecordError::CountMismatch { announced, produced }.into());
    }

    debug!(records = produced, bytes = out.len(), "message encrypted");
    Ok(out)
}
