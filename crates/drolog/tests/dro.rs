use std::io::Cursor;

use drolog::dro::{
    Codemap, DroError, DroHeader, DroReader, HardwareType, PairKind, QuietOptions, StreamEnd,
    quiet_file, transcode, write_output,
};

const SHORT_DELAY: u8 = 0x00;
const LONG_DELAY: u8 = 0x01;

/// Builds DRO captures for tests.
///
/// Registers are added through `write`, which allocates codemap entries on
/// first use the way DOSBox does.
struct DroBuilder {
    header: DroHeader,
    codemap: Vec<u8>,
    pairs: Vec<[u8; 2]>,
}

impl DroBuilder {
    fn new() -> Self {
        Self {
            header: DroHeader {
                short_delay_code: SHORT_DELAY,
                long_delay_code: LONG_DELAY,
                hardware_type: HardwareType::DualOpl2,
                ..DroHeader::default()
            },
            // slots 0 and 1 are taken by the delay codes
            codemap: vec![0xFF, 0xFF],
            pairs: Vec::new(),
        }
    }

    fn index_of(&mut self, register: u8) -> u8 {
        let found = self.codemap.iter().skip(2).position(|r| *r == register);
        match found {
            Some(pos) => (pos + 2) as u8,
            None => {
                self.codemap.push(register);
                (self.codemap.len() - 1) as u8
            }
        }
    }

    fn write(&mut self, register: u8, value: u8) -> &mut Self {
        let index = self.index_of(register);
        self.pairs.push([index, value]);
        self
    }

    fn write_high(&mut self, register: u8, value: u8) -> &mut Self {
        let index = self.index_of(register);
        self.pairs.push([index | 0x80, value]);
        self
    }

    fn short_delay(&mut self, ms: u8) -> &mut Self {
        self.pairs.push([SHORT_DELAY, ms]);
        self
    }

    fn long_delay(&mut self, blocks: u8) -> &mut Self {
        self.pairs.push([LONG_DELAY, blocks]);
        self
    }

    fn build(&self) -> Vec<u8> {
        let header = DroHeader {
            length_pairs: self.pairs.len() as u32,
            codemap_length: self.codemap.len() as u8,
            ..self.header.clone()
        };
        let mut bytes = header.to_bytes().to_vec();
        bytes.extend_from_slice(&self.codemap);
        for pair in &self.pairs {
            bytes.extend_from_slice(pair);
        }
        bytes
    }
}

/// A short song touching both synthesis modes, both banks and both delays.
fn song() -> Vec<u8> {
    let mut b = DroBuilder::new();
    b.write(0x01, 0x20)
        .write(0x20, 0x01)
        .write(0x23, 0x01)
        .write(0xC0, 0x0E) // ch 0 FM
        .write(0xC1, 0x01) // additive
        .write(0x40, 0x92)
        .write(0x41, 0x1F)
        .write(0x42, 0x30)
        .write(0x43, 0x4A)
        .write(0x44, 0x3F)
        .write(0x54, 0xC7)
        .write(0xA0, 0x6D)
        .write(0xB0, 0x31)
        .short_delay(99)
        .write_high(0x43, 0x28)
        .write(0xB0, 0x11)
        .long_delay(1)
        .write(0x55, 0x0A);
    b.build()
}

fn quieted(input: &[u8], reduction: u32) -> Vec<u8> {
    let reader = DroReader::new(Cursor::new(input.to_vec())).expect("valid capture");
    let (header, codemap, stream) = reader.into_parts();
    let mut out = Vec::new();
    write_output(
        &mut out,
        &header,
        &codemap,
        transcode(stream, &header, &codemap, reduction),
    )
    .expect("transcoding failed");
    out
}

fn pair_bytes(capture: &[u8]) -> &[u8] {
    let codemap_len = capture[0x19] as usize;
    &capture[26 + codemap_len..]
}

#[test]
fn size_is_preserved_for_any_reduction() {
    let input = song();
    for reduction in [0, 1, 5, 31, 63, 64, 1000] {
        assert_eq!(quieted(&input, reduction).len(), input.len());
    }
}

#[test]
fn header_and_codemap_are_copied_verbatim() {
    let input = song();
    let output = quieted(&input, 5);
    let prefix = 26 + input[0x19] as usize;
    assert_eq!(output[..prefix], input[..prefix]);
}

#[test]
fn zero_reduction_is_identity() {
    let input = song();
    assert_eq!(quieted(&input, 0), input);
}

#[test]
fn non_level_and_delay_pairs_pass_through() {
    let input = song();
    let reader = DroReader::new(Cursor::new(input.clone())).unwrap();
    let (header, codemap, stream) = reader.into_parts();

    for pair in transcode(stream, &header, &codemap, 63) {
        let pair = pair.unwrap();
        match pair.kind {
            PairKind::ShortDelay | PairKind::LongDelay => assert!(!pair.is_modified()),
            PairKind::Write { register } if !(0x40..=0x55).contains(&register) => {
                assert!(!pair.is_modified(), "register 0x{:02X} changed", register)
            }
            PairKind::Write { .. } => {}
        }
        assert_eq!(pair.output().register, pair.input.register);
    }
}

#[test]
fn modified_levels_keep_ksl_bits_and_clamp() {
    let input = song();
    let output = quieted(&input, 63);
    let before = pair_bytes(&input);
    let after = pair_bytes(&output);

    let mut modified = 0;
    for (i, o) in before.chunks(2).zip(after.chunks(2)) {
        assert_eq!(i[0], o[0]);
        if i[1] != o[1] {
            modified += 1;
            assert_eq!(o[1] & 0xC0, i[1] & 0xC0);
            assert_eq!(o[1] & 0x3F, 0);
        }
    }
    assert_eq!(modified, 6);
}

#[test]
fn mode_decides_which_operators_change() {
    let input = song();
    let reader = DroReader::new(Cursor::new(input)).unwrap();
    let (header, codemap, stream) = reader.into_parts();

    let changed: Vec<u8> = transcode(stream, &header, &codemap, 5)
        .map(|p| p.unwrap())
        .filter(|p| p.is_modified())
        .filter_map(|p| match p.kind {
            PairKind::Write { register } => Some(register),
            _ => None,
        })
        .collect();

    // 0x40/0x41 sit on 0xC0 (FM): 0x40, 0x41 are modulators and untouched.
    // 0x42/0x43 sit on 0xC1 (additive): both change.
    // 0x44 is a carrier on 0xC2 (FM). 0x54/0x55 are carriers on 0xC8 (FM).
    assert_eq!(changed, vec![0x42, 0x43, 0x44, 0x54, 0x43, 0x55]);
}

#[test]
fn reference_scenario() {
    // short delay 0x00, long delay 0x02, codemap [0x43]
    let header = DroHeader {
        length_pairs: 3,
        short_delay_code: 0x00,
        long_delay_code: 0x02,
        codemap_length: 2,
        ..DroHeader::default()
    };
    let codemap = Codemap::new(vec![0x43, 0x43]);
    let body = vec![0x00, 0x20, 0x00, 0x30, 0x01, 0x25];

    let out: Vec<_> = transcode(Cursor::new(body), &header, &codemap, 5)
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(out[0].kind, PairKind::ShortDelay);
    assert_eq!(out[0].value, 0x20);
    assert_eq!(out[1].kind, PairKind::ShortDelay);
    assert_eq!(out[1].value, 0x30);
    assert_eq!(out[2].kind, PairKind::Write { register: 0x43 });
    assert_eq!(out[2].value, 0x20);
}

#[test]
fn unclamped_reductions_are_additive() {
    // the smallest audible level value in `song` is 7, so 3 + 4 never goes below 0
    let input = song();
    let twice = quieted(&quieted(&input, 3), 4);
    let once = quieted(&input, 7);
    assert_eq!(twice, once);
}

#[test]
fn clamping_is_not_reversible() {
    let input = song();
    let twice = quieted(&quieted(&input, 40), 40);
    let once = quieted(&input, 80);
    assert_eq!(twice, once);
    assert_ne!(quieted(&quieted(&input, 63), 0), input);
}

#[test]
fn truncated_capture_keeps_what_was_read() {
    let mut input = song();
    input.truncate(input.len() - 3);

    let reader = DroReader::new(Cursor::new(input.clone())).unwrap();
    let (header, codemap, stream) = reader.into_parts();
    let mut pass = transcode(stream, &header, &codemap, 5);
    let mut out = Vec::new();
    let written = write_output(&mut out, &header, &codemap, pass.by_ref()).unwrap();

    assert_eq!(written, header.length_pairs - 2);
    assert_eq!(out.len(), input.len() - 1);
    assert_eq!(
        pass.summary().end,
        StreamEnd::Truncated {
            expected: header.length_pairs,
            read: header.length_pairs - 2,
        }
    );
}

#[test]
fn bad_signature_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let input_path = dir.path().join("bad.dro");
    let output_path = dir.path().join("out.dro");
    let mut input = song();
    input[..8].copy_from_slice(b"DBRAWOPX");
    std::fs::write(&input_path, &input).unwrap();

    let result = quiet_file(&input_path, &output_path, &QuietOptions::default(), |_| {});
    assert!(matches!(result, Err(DroError::BadSignature(sig)) if &sig == b"DBRAWOPX"));
    assert!(!output_path.exists());
}

#[test]
fn quiet_file_round_trip_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let input_path = dir.path().join("song.dro");
    let output_path = dir.path().join("song-quiet.dro");
    let input = song();
    std::fs::write(&input_path, &input).unwrap();

    let mut seen = 0;
    let summary = quiet_file(
        &input_path,
        &output_path,
        &QuietOptions::default(),
        |_| seen += 1,
    )
    .unwrap();

    let output = std::fs::read(&output_path).unwrap();
    assert_eq!(output, quieted(&input, 5));
    assert_eq!(seen, summary.pairs_read);
    assert_eq!(summary.pairs_read, 18);
    assert_eq!(summary.pairs_modified, 6);
    assert_eq!(summary.end, StreamEnd::Complete);
}

#[test]
fn quiet_file_respects_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let input_path = dir.path().join("song.dro");
    let output_path = dir.path().join("song-quiet.dro");
    std::fs::write(&input_path, song()).unwrap();
    std::fs::write(&output_path, b"keep me").unwrap();

    let result = quiet_file(&input_path, &output_path, &QuietOptions::default(), |_| {});
    assert!(matches!(result, Err(DroError::OutputAlreadyExists(_))));
    assert_eq!(std::fs::read(&output_path).unwrap(), b"keep me");

    let options = QuietOptions {
        overwrite: true,
        ..QuietOptions::default()
    };
    quiet_file(&input_path, &output_path, &options, |_| {}).unwrap();
    assert_eq!(std::fs::read(&output_path).unwrap().len(), song().len());
}

#[test]
fn quieting_a_file_onto_itself_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("long.dro");
    let mut b = DroBuilder::new();
    for _ in 0..20_000 {
        b.write(0x43, 0x25).short_delay(1);
    }
    let input = b.build();
    std::fs::write(&path, &input).unwrap();

    let options = QuietOptions {
        overwrite: true,
        ..QuietOptions::default()
    };
    let alias = dir.path().join(".").join("long.dro");
    for output in [&path, &alias] {
        let result = quiet_file(&path, output, &options, |_| {});
        assert!(matches!(result, Err(DroError::SameFile(_))));
        assert_eq!(std::fs::read(&path).unwrap(), input);
    }
}

#[test]
fn missing_input_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let result = quiet_file(
        &dir.path().join("nope.dro"),
        &dir.path().join("out.dro"),
        &QuietOptions::default(),
        |_| {},
    );
    assert!(matches!(result, Err(DroError::InputNotFound(_))));
}
