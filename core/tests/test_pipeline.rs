// End-to-end encrypt/decrypt suite: RFC 8188 vectors, detached headers,
// strict vs lenient padding, truncation and tampering.

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use ece_core::crypto::CryptoError;
    use ece_core::headers::{Header, HeaderError, HeaderOptions, Salt};
    use ece_core::pipeline::{
        decrypt, decrypt_with_header, encrypt, encrypt_records, DecryptOptions, EncryptOptions,
        Parallelism,
    };
    use ece_core::records::{PaddedRecords, PlainTextRecord, RecordError, RecordSource};
    use ece_core::utils::{decode_base64_url, encode_base64_url};
    use ece_core::EceError;
    use proptest::prelude::*;

    const WALRUS: &[u8] = b"I am the walrus";

    fn b64(s: &str) -> Vec<u8> {
        decode_base64_url(s).unwrap()
    }

    fn header(rs: u64) -> Header {
        Header::from_parts(Salt::from([0x42; 16]), rs, Vec::new()).unwrap()
    }

    /// Two-record walrus envelope from RFC 8188 §3.2.
    fn rfc_two_records() -> (Vec<u8>, Vec<u8>) {
        let envelope = b64(
            "uNCkWiNYzKTnBN9ji3-qWAAAABkCYTHOG8chz_gnvgOqdGYovxyjuqRyJFjEDyoF1Fvkj6hQPdPHI51OEUKEpgz3SsLWIqS_uA",
        );
        (envelope, b64("BO3ZVPxUlnLORbVGMpbT1Q"))
    }

    // ## 1️⃣ RFC 8188 vectors

    #[test]
    fn rfc8188_single_record() {
        let h = Header::from_base64_url("I1BsxtFttlv3u_Oo94xnmwAAEAAA").unwrap();
        let secret = b64("yqdlZ-tYemfogSmv7Ws5PQ");

        let out = encrypt(WALRUS, &secret, &EncryptOptions::default().with_header(h)).unwrap();
        assert_eq!(
            encode_base64_url(&out),
            "I1BsxtFttlv3u_Oo94xnmwAAEAAA-NAVub2qFgBEuQKRapoZu-IxkIva3MEB1PD-ly8Thjg"
        );

        assert_eq!(decrypt(&out, &secret, &DecryptOptions::default()).unwrap(), WALRUS);
        assert_eq!(decrypt(&out, &secret, &DecryptOptions::default().strict()).unwrap(), WALRUS);
    }

    #[test]
    fn rfc8188_multiple_records() {
        let (envelope, secret) = rfc_two_records();
        let h = Header::from_base64_url("uNCkWiNYzKTnBN9ji3-qWAAAABkCYTE").unwrap();

        let opts = EncryptOptions::default().with_header(h.clone()).with_extra_padding(1);
        let out = encrypt(WALRUS, &secret, &opts).unwrap();
        assert_eq!(out, envelope);
        assert_eq!(out.len(), h.byte_len() + 2 * 25);

        assert_eq!(decrypt(&envelope, &secret, &DecryptOptions::default()).unwrap(), WALRUS);
        assert_eq!(
            decrypt(&envelope, &secret, &DecryptOptions::default().strict()).unwrap(),
            WALRUS
        );
        assert_eq!(decrypt_with_header(&envelope, &secret, &h).unwrap(), WALRUS);
    }

    // ## 2️⃣ Round trips

    #[test]
    fn empty_plaintext_is_header_only() {
        let h = header(4096);
        let opts = EncryptOptions::default().with_header(h.clone());
        let out = encrypt(b"", b"secret", &opts).unwrap();
        assert_eq!(out, h.to_bytes());

        assert_eq!(decrypt(&out, b"secret", &DecryptOptions::default()).unwrap(), b"");
        assert_eq!(decrypt(&out, b"secret", &DecryptOptions::default().strict()).unwrap(), b"");

        let padded = encrypt(b"", b"secret", &opts.clone().with_extra_padding(5)).unwrap();
        assert_eq!(padded.len(), h.byte_len());

        let detached = encrypt(b"", b"secret", &opts.detached()).unwrap();
        assert!(detached.is_empty());
    }

    #[test]
    fn default_header_uses_fresh_salt() {
        let a = encrypt(WALRUS, b"secret", &EncryptOptions::default()).unwrap();
        let b = encrypt(WALRUS, b"secret", &EncryptOptions::default()).unwrap();
        assert_ne!(a[..16], b[..16]);
        assert_ne!(a, b);

        let h = Header::from_bytes(&a).unwrap();
        assert_eq!(h.rs(), 65536);
        assert_eq!(decrypt(&a, b"secret", &DecryptOptions::default()).unwrap(), WALRUS);
    }

    #[test]
    fn keyid_travels_in_header() {
        let h = Header::new(HeaderOptions::default().with_rs(100).with_keyid(b"key-7".to_vec()))
            .unwrap();
        let out = encrypt(WALRUS, b"s", &EncryptOptions::default().with_header(h)).unwrap();
        assert_eq!(Header::from_bytes(&out).unwrap().keyid(), b"key-7");
        assert_eq!(decrypt(&out, b"s", &DecryptOptions::default()).unwrap(), WALRUS);
    }

    #[test]
    fn detached_header() {
        let h = header(64);
        let data = vec![0x5a; 500];
        let opts = EncryptOptions::default().with_header(h.clone()).detached();
        let records = encrypt(&data, b"k", &opts).unwrap();
        // 47 data bytes per record: ten full records, then 30 bytes + delimiter + tag.
        assert_eq!(records.len(), 10 * 64 + 30 + 1 + 16);

        let opts = DecryptOptions::default().with_header(h.clone()).detached();
        assert_eq!(decrypt(&records, b"k", &opts).unwrap(), data);

        // Header can ride out of band as base64url.
        let h2 = Header::from_base64_url(&h.to_base64_url()).unwrap();
        let opts = DecryptOptions::default().with_header(h2).detached();
        assert_eq!(decrypt(&records, b"k", &opts).unwrap(), data);

        assert_eq!(
            decrypt(&records, b"k", &DecryptOptions::default().detached()).unwrap_err(),
            EceError::MissingHeader
        );
    }

    #[test]
    fn supplied_header_skips_embedded_one() {
        let h = header(32);
        let out = encrypt(WALRUS, b"k", &EncryptOptions::default().with_header(h.clone())).unwrap();
        assert_eq!(decrypt_with_header(&out, b"k", &h).unwrap(), WALRUS);

        let err = decrypt_with_header(&out[..10], b"k", &h).unwrap_err();
        assert_eq!(err, EceError::Header(HeaderError::HeaderSize { have: 10, need: 21 }));
    }

    #[test]
    fn info_override_binds_the_cek() {
        let h = header(128);
        let info = b"Content-Encoding: custom\0".to_vec();
        let out = encrypt(
            WALRUS,
            b"k",
            &EncryptOptions::default().with_header(h).with_info(info.clone()),
        )
        .unwrap();

        assert!(decrypt(&out, b"k", &DecryptOptions::default())
            .unwrap_err()
            .is_authentication_failure());
        let opts = DecryptOptions::default().with_info(info);
        assert_eq!(decrypt(&out, b"k", &opts).unwrap(), WALRUS);
    }

    #[test]
    fn padding_out_of_range_fails_before_sealing() {
        let opts = EncryptOptions::default().with_header(header(25)).with_extra_padding(8);
        assert_eq!(
            encrypt(WALRUS, b"k", &opts).unwrap_err(),
            EceError::Record(RecordError::ExtraPadding { have: 8, max: 7 })
        );
    }

    // ## 3️⃣ Failures

    #[test]
    fn wrong_secret_fails_authentication() {
        let (envelope, _) = rfc_two_records();
        let err = decrypt(&envelope, b"not the secret", &DecryptOptions::default()).unwrap_err();
        assert_eq!(err, EceError::Crypto(CryptoError::AuthenticationFailed));
    }

    #[test]
    fn any_flipped_byte_fails_authentication() {
        let (envelope, secret) = rfc_two_records();
        for i in 23..envelope.len() {
            let mut bad = envelope.clone();
            bad[i] ^= 0x80;
            let err = decrypt(&bad, &secret, &DecryptOptions::default()).unwrap_err();
            assert!(err.is_authentication_failure(), "byte {i}: {err}");
        }
    }

    #[test]
    fn swapped_records_fail_authentication() {
        let (envelope, secret) = rfc_two_records();
        let mut swapped = envelope[..23].to_vec();
        swapped.extend_from_slice(&envelope[48..73]);
        swapped.extend_from_slice(&envelope[23..48]);
        assert!(decrypt(&swapped, &secret, &DecryptOptions::default())
            .unwrap_err()
            .is_authentication_failure());
    }

    #[test]
    fn short_final_chunk_is_truncation() {
        let (envelope, secret) = rfc_two_records();
        let cut = &envelope[..23 + 25 + 10];
        assert_eq!(
            decrypt(cut, &secret, &DecryptOptions::default()).unwrap_err(),
            EceError::Record(RecordError::TruncatedRecord { seq: 1, len: 10, min: 17 })
        );
    }

    #[test]
    fn dropped_final_record_caught_in_strict_mode() {
        let (envelope, secret) = rfc_two_records();
        let first_only = &envelope[..23 + 25];

        // Lenient mode cannot tell.
        assert_eq!(decrypt(first_only, &secret, &DecryptOptions::default()).unwrap(), b"I am th");

        assert_eq!(
            decrypt(first_only, &secret, &DecryptOptions::default().strict()).unwrap_err(),
            EceError::Record(RecordError::UnexpectedDelimiter {
                seq: 0,
                found: 0x01,
                expected: 0x02
            })
        );
    }

    #[test]
    fn header_without_records_is_empty_message() {
        let h = header(4096);
        let bytes = h.to_bytes();
        assert_eq!(decrypt(&bytes, b"k", &DecryptOptions::default()).unwrap(), b"");

        let strict = DecryptOptions::default().strict().with_parallelism(Parallelism::Fixed(3));
        assert_eq!(decrypt(&bytes, b"k", &strict).unwrap(), b"");

        let detached = DecryptOptions::default().with_header(h).detached().strict();
        assert_eq!(decrypt(&[], b"k", &detached).unwrap(), b"");
    }

    #[test]
    fn undecodable_header() {
        assert_eq!(
            decrypt(&[0u8; 12], b"k", &DecryptOptions::default()).unwrap_err(),
            EceError::Header(HeaderError::HeaderSize { have: 12, need: 21 })
        );
    }

    // ## 4️⃣ Custom record sources

    struct FixedRecords {
        records: VecDeque<PlainTextRecord>,
        announced: usize,
    }

    impl FixedRecords {
        fn new(records: Vec<Vec<u8>>, announced: usize) -> Self {
            Self { records: records.into_iter().map(PlainTextRecord::from).collect(), announced }
        }
    }

    impl RecordSource for FixedRecords {
        fn record_count(&self) -> usize {
            self.announced
        }

        fn has_next(&self) -> bool {
            !self.records.is_empty()
        }

        fn next_record(&mut self) -> Option<PlainTextRecord> {
            self.records.pop_front()
        }
    }

    #[test]
    fn custom_source_with_short_records() {
        let h = header(32);
        let opts = EncryptOptions::default().with_header(h);
        let source = FixedRecords::new(
            vec![b"ab\x01".to_vec(), b"cd\x01\x00\x00".to_vec(), b"e\x02".to_vec()],
            3,
        );
        let out = encrypt_records(source, b"k", &opts).unwrap();

        // Every record seals to its own length + 16; the decryptor still
        // chunks by rs, so short records only work as the final one.
        assert_eq!(out.len(), 21 + 19 + 21 + 18);

        let single = FixedRecords::new(vec![b"hello\x02\x00".to_vec()], 1);
        let out = encrypt_records(single, b"k", &opts).unwrap();
        assert_eq!(decrypt(&out, b"k", &DecryptOptions::default().strict()).unwrap(), b"hello");
    }

    #[test]
    fn custom_source_matching_framer_output_decrypts() {
        let h = header(40);
        let data: Vec<u8> = (0..=255).collect();
        let opts = EncryptOptions::default().with_header(h.clone()).with_extra_padding(3);

        let framer = PaddedRecords::with_padding(&data, h.rs(), 3).unwrap();
        let via_source = encrypt_records(framer, b"k", &opts).unwrap();
        assert_eq!(via_source, encrypt(&data, b"k", &opts).unwrap());
    }

    #[test]
    fn custom_source_errors() {
        let opts = EncryptOptions::default().with_header(header(20));

        let too_long = FixedRecords::new(vec![b"toolong\x02".to_vec()], 1);
        let err = encrypt_records(too_long, b"k", &opts).unwrap_err();
        assert_eq!(err, EceError::Record(RecordError::RecordTooLarge { seq: 0, len: 8, max: 4 }));

        let empty = FixedRecords::new(vec![b"a\x01".to_vec(), Vec::new()], 2);
        let err = encrypt_records(empty, b"k", &opts).unwrap_err();
        assert_eq!(err, EceError::Record(RecordError::EmptyRecord { seq: 1 }));

        let short = FixedRecords::new(vec![b"a\x01".to_vec(), b"b\x02".to_vec()], 3);
        let err = encrypt_records(short, b"k", &opts).unwrap_err();
        assert_eq!(
            err,
            EceError::Record(RecordError::CountMismatch { announced: 3, produced: 2 })
        );
    }

    // ## 5️⃣ Properties

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_roundtrip(
            data in proptest::collection::vec(any::<u8>(), 0..2048),
            secret in proptest::collection::vec(any::<u8>(), 1..48),
            rs in 18u64..300,
            pad_seed in any::<usize>(),
            workers in 1usize..4,
        ) {
            let pad = pad_seed % (rs as usize - 17);
            let h = Header::from_parts(Salt::random(), rs, Vec::new()).unwrap();
            let enc = EncryptOptions::default()
                .with_header(h)
                .with_extra_padding(pad)
                .with_parallelism(Parallelism::Fixed(workers));

            let out = encrypt(&data, &secret, &enc).unwrap();
            let dec = DecryptOptions::default()
                .strict()
                .with_parallelism(Parallelism::Fixed(workers));
            prop_assert_eq!(decrypt(&out, &secret, &dec).unwrap(), data.clone());
            prop_assert_eq!(decrypt(&out, &secret, &DecryptOptions::default()).unwrap(), data);
        }
    }
}
