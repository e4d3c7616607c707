//! pipeline/decrypt.rs
//! Message decryption: resolve header, open records in order, strip padding.
//!
//! Record `i` is the `i`-th `rs`-sized chunk after the header. A short last
//! chunk is accepted as long as it can hold a tag and one byte. The record
//! position (`seq`, last or not) is fixed by the chunking, so reordered or
//! dropped records fail authentication or, in strict mode, the delimiter check.
//! A body with no records is the empty message. Nothing is returned unless
//! every record opens.

use tracing::debug;

use crate::constants::{MAX_PREALLOC, TAG_LEN};
use crate::crypto::{CryptoEngine, CryptoProvider, RustCryptoProvider};
use crate::headers::{Header, HeaderError};
use crate::pipeline::engine_for;
use crate::pipeline::options::DecryptOptions;
use crate::pipeline::parallel::run_ordered;
use crate::records::{unpad_record, RecordError};
use crate::telemetry::{Stage, TelemetryCounters, TelemetrySnapshot, TelemetryTimer};
use crate::types::EceError;

/// Decrypt an envelope with the default crypto provider.
pub fn decrypt(data: &[u8], secret: &[u8], options: &DecryptOptions) -> Result<Vec<u8>, EceError> {
    decrypt_with(RustCryptoProvider, data, secret, options)
}

/// Decrypt under a header the caller already holds.
///
/// `data` still starts with the serialized header, which is skipped, not
/// parsed. For records-only input use `DecryptOptions::detached`.
pub fn decrypt_with_header(
    data: &[u8],
    secret: &[u8],
    header: &Header,
) -> Result<Vec<u8>, EceError> {
    decrypt(data, secret, &DecryptOptions::default().with_header(header.clone()))
}

pub fn decrypt_with<P: CryptoProvider>(
    provider: P,
    data: &[u8],
    secret: &[u8],
    options: &DecryptOptions,
) -> Result<Vec<u8>, EceError> {
    decrypt_instrumented(provider, data, secret, options).map(|(out, _)| out)
}

pub fn decrypt_with_telemetry(
    data: &[u8],
    secret: &[u8],
    options: &DecryptOptions,
) -> Result<(Vec<u8>, TelemetrySnapshot), EceError> {
    decrypt_instrumented(RustCryptoProvider, data, secret, options)
}

fn open_record<P: CryptoProvider>(
    engine: &CryptoEngine<P>,
    chunk: &[u8],
    seq: u64,
) -> Result<Vec<u8>, EceError> {
    if chunk.len() <= TAG_LEN {
        return Err(RecordError::TruncatedRecord { seq, len: chunk.len(), min: TAG_LEN + 1 }.into());
    }
    Ok(engine.decrypt_record(chunk, seq)?)
}

fn decrypt_instrumented<P: CryptoProvider>(
    provider: P,
    data: &[u8],
    secret: &[u8],
    options: &DecryptOptions,
) -> Result<(Vec<u8>, TelemetrySnapshot), EceError> {
    let mut counters = TelemetryCounters::default();
    let mut timer = TelemetryTimer::new();

    let header = match &options.header {
        Some(header) => header.clone(),
        None if options.header_embedded => timer.time(Stage::Decode, || Header::from_bytes(data))?,
        None => return Err(EceError::MissingHeader),
    };
    counters.add_header(header.byte_len());

    let body = if options.header_embedded {
        data.get(header.byte_len()..).ok_or(HeaderError::HeaderSize {
            have: data.len(),
            need: header.byte_len(),
        })?
    } else {
        data
    };

    let engine = engine_for(provider, secret, Some(header), options.info.as_deref())?;
    let rs = engine.header().rs() as usize;
    let count = body.len().div_ceil(rs);
    let workers = options.parallelism.worker_count();

    debug!(
        records = count,
        rs,
        keyid = %crate::utils::fmt_bytes(engine.header().keyid()),
        padding = ?options.padding,
        workers,
        "decrypting message"
    );

    timer.time(Stage::Derive, || engine.prepare())?;

    let mut out = Vec::with_capacity(body.len().min(MAX_PREALLOC));
    let chunks = body.chunks(rs).zip(0u64..).map(|(chunk, seq)| (seq, chunk));
    let is_final = |seq: u64| seq as usize + 1 == count;

    if options.parallelism.is_parallel() {
        let opened = timer.time(Stage::Open, || {
            run_ordered(chunks, workers, |seq, chunk: &[u8]| open_record(&engine, chunk, seq))
        })?;
        for (record, seq) in opened.iter().zip(0u64..) {
            let plain = timer.time(Stage::Unpad, || {
                unpad_record(record, seq, is_final(seq), options.padding)
            })?;
            counters.add_record(plain.len(), record.len());
            out.extend_from_slice(plain);
        }
    } else {
        for (seq, chunk) in chunks {
            let record = timer.time(Stage::Open, || open_record(&engine, chunk, seq))?;
            let plain = timer.time(Stage::Unpad, || {
                unpad_record(&record, seq, is_final(seq), options.padding)
            })?;
            counters.add_record(plain.len(), record.len());
            out.extend_from_slice(plain);
        }
    }
    timer.finish();

    debug!(records = count, bytes = out.len(), "message decrypted");
    let snapshot = TelemetrySnapshot::from(&counters, &timer, engine.derivation_stats());
    Ok((out, snapshot))
}
