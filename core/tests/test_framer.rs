// Record framer suite.
//
// Catches:
// * records overflowing rs once the tag is added
// * padding-only trailing records
// * wrong delimiter placement (0x02 anywhere but the last record)
// * data loss or reordering across record boundaries

#[cfg(test)]
mod tests {
    use ece_core::records::{
        unpad, unpad_strict, PaddedRecords, PlainTextRecord, RecordDelimiter, RecordError,
        RecordSource,
    };
    use proptest::prelude::*;

    fn frame(data: &[u8], rs: u32, pad: usize) -> Vec<PlainTextRecord> {
        PaddedRecords::with_padding(data, rs, pad).unwrap().collect()
    }

    #[test]
    fn single_record_when_data_fits() {
        let records = frame(b"I am the walrus", 4096, 0);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].as_bytes(), b"I am the walrus\x02");
    }

    #[test]
    fn full_records_then_short_final() {
        // rs = 20: 4 plaintext bytes per record, 3 data bytes.
        let records = frame(b"abcdefgh", 20, 0);
        let bytes: Vec<&[u8]> = records.iter().map(|r| r.as_bytes()).collect();
        assert_eq!(bytes, vec![&b"abc\x01"[..], &b"def\x01"[..], &b"gh\x02"[..]]);
    }

    #[test]
    fn final_record_gets_padding_when_room() {
        // rs = 22: 6 plaintext bytes, 3 data bytes with 2 bytes of padding.
        let records = frame(b"abcdefg", 22, 2);
        let bytes: Vec<&[u8]> = records.iter().map(|r| r.as_bytes()).collect();
        assert_eq!(
            bytes,
            vec![&b"abc\x01\x00\x00"[..], &b"defg\x02\x00"[..]]
        );
    }

    #[test]
    fn cursor_contract() {
        let mut f = PaddedRecords::new(b"abcdefgh", 20).unwrap();
        assert_eq!(f.record_count(), 3);
        assert_eq!(f.data_len(), 3);
        assert_eq!(f.record_len(), 4);
        assert_eq!(f.len(), 3);

        let mut seen = 0;
        while f.has_next() {
            assert!(f.next_record().is_some());
            seen += 1;
        }
        assert_eq!(seen, 3);
        assert_eq!(f.remaining(), 0);
        // Not restartable.
        assert!(f.next_record().is_none());
        assert!(!f.has_next());
    }

    #[test]
    fn max_padding_rs_minus_18_accepted_rs_minus_17_rejected() {
        let rs = 40u32;
        let f = PaddedRecords::with_padding(b"0123456789", rs, 22).unwrap();
        assert_eq!(f.data_len(), 1);
        // The tenth byte rides in the ninth record's padding budget.
        assert_eq!(f.record_count(), 9);

        assert_eq!(
            PaddedRecords::with_padding(b"x", rs, 23).unwrap_err(),
            RecordError::ExtraPadding { have: 23, max: 22 }
        );
    }

    #[test]
    fn delimiter_registry() {
        assert_eq!(RecordDelimiter::try_from(0x01).unwrap(), RecordDelimiter::Record);
        assert_eq!(RecordDelimiter::try_from(0x02).unwrap(), RecordDelimiter::Final);
        assert!(RecordDelimiter::try_from(0x00).is_err());
        assert!(RecordDelimiter::try_from(0x03).is_err());
    }

    proptest! {
        #[test]
        fn prop_framer_invariants(
            data in proptest::collection::vec(any::<u8>(), 0..600),
            rs in 18u32..80,
            pad_seed in any::<usize>(),
        ) {
            let max_pad = rs as usize - 18;
            let pad = pad_seed % (max_pad + 1);
            let framer = PaddedRecords::with_padding(&data, rs, pad).unwrap();
            let announced = framer.record_count();
            let records: Vec<_> = framer.collect();

            prop_assert_eq!(records.len(), announced);
            prop_assert_eq!(records.is_empty(), data.is_empty());

            let mut joined = Vec::new();
            for (i, r) in records.iter().enumerate() {
                let is_final = i + 1 == records.len();
                prop_assert!(r.len() <= rs as usize - 16);

                let body = unpad_strict(r.as_bytes(), i as u64, is_final).unwrap();
                prop_assert_eq!(body, unpad(r.as_bytes()));
                if !is_final {
                    // Full data, full padding.
                    prop_assert_eq!(r.len(), rs as usize - 16);
                    prop_assert!(!body.is_empty());
                }
                joined.extend_from_slice(body);
            }
            prop_assert_eq!(joined, data.clone());

            // No record exists only to carry padding.
            if let Some(last) = records.last() {
                prop_assert!(!unpad(last.as_bytes()).is_empty());
            }
        }
    }
}
