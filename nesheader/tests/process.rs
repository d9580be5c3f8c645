use std::fs;
use std::path::Path;

use nesheader::{process_file, Outcome, HEADER_LEN, MAGIC};

fn headered(len: usize) -> Vec<u8> {
    let mut data = MAGIC.to_vec();
    data.extend((MAGIC.len()..len).map(|i| (i as u8).wrapping_mul(31)));
    data
}

fn entries(dir: &Path) -> usize {
    fs::read_dir(dir).unwrap().count()
}

#[test]
fn thirty_two_byte_rom() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("rom.nes");
    let data = headered(32);
    fs::write(&input, &data).unwrap();

    let outcome = process_file(&input).unwrap();
    let output = dir.path().join("rom.unh");
    assert_eq!(outcome, Outcome::Created(output.clone()));

    let stripped = fs::read(&output).unwrap();
    assert_eq!(stripped.len(), 16);
    assert_eq!(stripped, &data[HEADER_LEN..]);
    // input untouched
    assert_eq!(fs::read(&input).unwrap(), data);
}

#[test]
fn output_is_input_minus_header() {
    let dir = tempfile::tempdir().unwrap();
    for len in [16, 17, 40, 0x4010, 0x6011] {
        let input = dir.path().join(format!("rom{}.nes", len));
        let data = headered(len);
        fs::write(&input, &data).unwrap();

        let Outcome::Created(output) = process_file(&input).unwrap() else {
            panic!("{} bytes: no copy created", len);
        };
        let stripped = fs::read(&output).unwrap();
        assert_eq!(stripped.len(), len - HEADER_LEN);
        assert_eq!(stripped, &data[HEADER_LEN..]);
    }
}

#[test]
fn unheadered_rom_creates_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("raw.nes");
    let mut data = headered(32);
    data[3] = 0x00;
    fs::write(&input, &data).unwrap();

    assert_eq!(process_file(&input).unwrap(), Outcome::AlreadyUnheadered);
    assert_eq!(entries(dir.path()), 1);
}

#[test]
fn tiny_files_are_unheadered() {
    let dir = tempfile::tempdir().unwrap();
    for (i, data) in [&b""[..], &b"N"[..], &b"NE"[..], &b"NES"[..]].into_iter().enumerate() {
        let input = dir.path().join(format!("tiny{}.nes", i));
        fs::write(&input, data).unwrap();
        assert_eq!(process_file(&input).unwrap(), Outcome::AlreadyUnheadered);
    }
    assert_eq!(entries(dir.path()), 4);
}

#[test]
fn second_run_reports_existing_copy() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("rom.nes");
    let output = dir.path().join("rom.unh");
    fs::write(&input, headered(64)).unwrap();

    assert_eq!(process_file(&input).unwrap(), Outcome::Created(output.clone()));
    let first = fs::read(&output).unwrap();

    // change the source so an overwrite would show
    fs::write(&input, headered(80)).unwrap();
    assert_eq!(process_file(&input).unwrap(), Outcome::CopyExists(output.clone()));
    assert_eq!(fs::read(&output).unwrap(), first);
    assert_eq!(entries(dir.path()), 2);
}
