/// Integration tests: every codec the registry hands out honours the same
/// encode/decode contract, and packed bitmaps survive serialization.
use glyphpack_codecs::{codec_by_id, create, create_by_name, create_with, unpack_bitmap, RleCodec};
use glyphpack_core::{
    compression_ratio, pack, space_saved, unpack, BitmapInfo, CodecError, CodecOptions,
    CounterWidth, Encoding, OutputBound, PackedBitmap,
};

/// Generate `len` deterministic bytes using a simple LCG.
fn pseudo_random_bytes(len: usize, seed: u64) -> Vec<u8> {
    let mut rng = seed;
    (0..len)
        .map(|_| {
            rng = rng
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            (rng >> 56) as u8
        })
        .collect()
}

/// A fake 1-channel glyph atlas: mostly zero, with short solid strokes.
fn glyph_atlas(width: usize, height: usize) -> Vec<u8> {
    let mut pixels = vec![0u8; width * height];
    for y in 0..height {
        if y % 8 < 5 {
            for x in (y % 16)..(y % 16 + 6).min(width) {
                pixels[y * width + x] = 0xFF;
            }
        }
    }
    pixels
}

fn sample_buffers() -> Vec<(&'static str, Vec<u8>)> {
    vec![
        ("empty", Vec::new()),
        ("single", vec![0x7F]),
        ("all zero", vec![0x00; 1000]),
        ("all 0xff", vec![0xFF; 70_000]),
        ("alternating", (0..513).map(|i| if i % 2 == 0 { 0x00 } else { 0xFF }).collect()),
        ("random", pseudo_random_bytes(4096, 0xDEAD_BEEF)),
        ("atlas", glyph_atlas(64, 64)),
    ]
}

fn all_options() -> Vec<CodecOptions> {
    vec![
        CodecOptions::default(),
        CodecOptions::default().with_counter_width(CounterWidth::U16),
    ]
}

// ── tests ──────────────────────────────────────────────────────────────────

#[test]
fn test_roundtrip_every_codec() {
    for options in all_options() {
        for encoding in Encoding::ALL {
            let codec = create_with(encoding, &options);
            for (label, data) in sample_buffers() {
                let encoded = codec.encode(&data).unwrap();
                let decoded = codec.decode(&encoded, data.len()).unwrap();
                assert_eq!(
                    decoded, data,
                    "{} ({}) round-trip should be byte-exact for {} buffer",
                    encoding, options.counter_width, label
                );
            }
        }
    }
}

#[test]
fn test_decode_capacity_is_an_upper_bound() {
    for options in all_options() {
        for encoding in Encoding::ALL {
            let codec = create_with(encoding, &options);
            for (label, data) in sample_buffers() {
                let encoded = codec.encode(&data).unwrap();
                for capacity in [data.len() + 1, data.len() * 2 + 16, 1usize << 50, usize::MAX] {
                    let decoded = codec.decode(&encoded, capacity).unwrap();
                    assert_eq!(
                        decoded.len(),
                        data.len(),
                        "{} ({}) decoding {} buffer with capacity {} should yield the true length",
                        encoding,
                        options.counter_width,
                        label,
                        capacity
                    );
                    assert_eq!(decoded, data);
                }
            }
        }
    }
}

#[test]
fn test_identity_codec_returns_input() {
    let codec = create(Encoding::None);
    assert_eq!(codec.encoding(), Encoding::None);
    for (_, data) in sample_buffers() {
        assert_eq!(codec.encode(&data).unwrap(), data);
        assert_eq!(codec.decode(&data, data.len()).unwrap(), data);
    }
}

#[test]
fn test_placeholder_codecs_have_unit_ratio() {
    let data = glyph_atlas(32, 32);
    for encoding in [Encoding::Dictionary, Encoding::Entropy] {
        let codec = create(encoding);
        assert_eq!(codec.encoding(), encoding);
        let encoded = codec.encode(&data).unwrap();
        assert_eq!(compression_ratio(&encoded, &data), 1.0);
    }
}

#[test]
fn test_registry_by_name_and_id() {
    let options = CodecOptions::default();
    assert_eq!(create_by_name("rle", &options).unwrap().encoding(), Encoding::RunLength);
    assert_eq!(create_by_name("none", &options).unwrap().encoding(), Encoding::None);
    assert_eq!(create_by_name("lzw", &options).unwrap().encoding(), Encoding::Dictionary);
    assert_eq!(create_by_name("huff", &options).unwrap().encoding(), Encoding::Entropy);
    assert_eq!(codec_by_id(1, &options).unwrap().encoding(), Encoding::RunLength);

    let err = create_by_name("zstd", &options).err().unwrap();
    assert_eq!(err, CodecError::UnsupportedEncoding("zstd".to_string()));
    assert!(!err.is_recoverable());
    assert!(matches!(
        codec_by_id(42, &options),
        Err(CodecError::UnsupportedEncoding(_))
    ));
}

#[test]
fn test_registry_passes_counter_width_through() {
    let options = CodecOptions::default().with_counter_width(CounterWidth::U16);
    let codec = create_with(Encoding::RunLength, &options);
    assert_eq!(codec.options().counter_width, CounterWidth::U16);

    // 1000 identical bytes fit in one 16-bit packet but need four 8-bit ones.
    let data = vec![0x20u8; 1000];
    assert_eq!(codec.encode(&data).unwrap().len(), 3);
    assert_eq!(create(Encoding::RunLength).encode(&data).unwrap().len(), 8);
}

#[test]
fn test_rle_compresses_glyph_atlas() {
    let data = glyph_atlas(128, 128);
    let codec = create(Encoding::RunLength);
    let encoded = codec.encode(&data).unwrap();
    assert!(
        encoded.len() < data.len() / 4,
        "rle should shrink a sparse atlas: encoded={} raw={}",
        encoded.len(),
        data.len()
    );
    assert!(compression_ratio(&encoded, &data) > 4.0);
    assert_ne!(space_saved(&encoded, &data), "0 B");
}

#[test]
fn test_pack_roundtrip_through_bytes() {
    let data = glyph_atlas(64, 32);
    let info = BitmapInfo::new(64, 32, 1);
    let codec = create(Encoding::RunLength);

    let packed = pack(codec.as_ref(), info, data.clone()).unwrap();
    assert!(packed.is_compressed());
    assert_eq!(packed.raw_len, data.len());

    let bytes = packed.to_bytes();
    let restored = PackedBitmap::from_bytes(&bytes).unwrap();
    assert_eq!(restored, packed);

    let codec = create_with(restored.encoding, &restored.codec_options());
    assert_eq!(unpack(codec.as_ref(), &restored).unwrap(), data);
    assert_eq!(unpack_bitmap(&restored).unwrap(), data);
}

#[test]
fn test_unpack_bitmap_uses_recorded_counter_width() {
    let data = vec![0x11u8; 4096];
    let options = CodecOptions::default().with_counter_width(CounterWidth::U16);
    let codec = create_with(Encoding::RunLength, &options);
    let packed = pack(codec.as_ref(), BitmapInfo::new(64, 64, 1), data.clone()).unwrap();
    assert_eq!(packed.counter_width, CounterWidth::U16);

    let restored = PackedBitmap::from_bytes(&packed.to_bytes()).unwrap();
    assert_eq!(unpack_bitmap(&restored).unwrap(), data);
}

#[test]
#[cfg(target_pointer_width = "64")]
fn test_oversized_raw_len_in_header_is_rejected_without_allocating() {
    // A consistent header claiming a 1 TiB bitmap around a 3-byte payload.
    let forged = PackedBitmap {
        encoding: Encoding::RunLength,
        counter_width: CounterWidth::U8,
        info: BitmapInfo::new(1 << 20, 1 << 20, 1),
        raw_len: 1usize << 40,
        payload: vec![0x03, 0x41],
    };
    let restored = PackedBitmap::from_bytes(&forged.to_bytes()).unwrap();
    assert!(matches!(
        unpack_bitmap(&restored),
        Err(CodecError::MalformedPack(_))
    ));
}

#[test]
fn test_pack_falls_back_when_rle_expands() {
    let data = vec![0x00, 0x01, 0x02];
    let packed = pack(create(Encoding::RunLength).as_ref(), BitmapInfo::flat(3).unwrap(), data.clone()).unwrap();
    assert_eq!(packed.encoding, Encoding::None);
    assert_eq!(packed.payload, data);
    assert_eq!(packed.stats().space_saved(), "0 B");
}

#[test]
fn test_pack_falls_back_when_capacity_runs_out() {
    let data = pseudo_random_bytes(256, 7);
    let codec = RleCodec::new(CounterWidth::U16).with_output_bound(OutputBound::Factor(2));
    let packed = pack(&codec, BitmapInfo::new(16, 16, 1), data.clone()).unwrap();
    assert!(!packed.is_compressed());
    assert_eq!(packed.payload, data);
}

#[test]
fn test_pack_rejects_bad_bitmaps() {
    let codec = create(Encoding::RunLength);
    assert!(matches!(
        pack(codec.as_ref(), BitmapInfo::flat(0).unwrap(), Vec::new()),
        Err(CodecError::InvalidInput(_))
    ));
    assert!(matches!(
        pack(codec.as_ref(), BitmapInfo::new(4, 4, 4), vec![0u8; 16]),
        Err(CodecError::InvalidInput(_))
    ));
    assert!(matches!(
        pack(codec.as_ref(), BitmapInfo::new(4, 4, 5), vec![0u8; 80]),
        Err(CodecError::InvalidInput(_))
    ));
}

#[test]
fn test_unpack_codec_mismatch_error() {
    let data = glyph_atlas(16, 16);
    let packed = pack(create(Encoding::RunLength).as_ref(), BitmapInfo::new(16, 16, 1), data).unwrap();

    let err = unpack(create(Encoding::None).as_ref(), &packed).unwrap_err();
    assert!(
        err.to_string().contains("codec mismatch"),
        "error message should mention codec mismatch, got: {err}"
    );
}

#[test]
fn test_corrupted_payload_is_detected() {
    let data = glyph_atlas(32, 32);
    let packed = pack(create(Encoding::RunLength).as_ref(), BitmapInfo::new(32, 32, 1), data).unwrap();
    let mut bytes = packed.to_bytes();
    let last = bytes.len() - 1;
    bytes[last] ^= 0x55;

    assert!(matches!(
        PackedBitmap::from_bytes(&bytes),
        Err(CodecError::ChecksumMismatch { .. })
    ));
    assert!(matches!(
        PackedBitmap::from_bytes(&bytes[..20]),
        Err(CodecError::MalformedPack(_))
    ));
    assert!(matches!(
        PackedBitmap::from_bytes(&bytes[..bytes.len() - 1]),
        Err(CodecError::MalformedPack(_))
    ));
}
