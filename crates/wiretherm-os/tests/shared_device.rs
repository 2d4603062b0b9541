mod fake_line;

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use embedded_hal_mock::eh1::delay::NoopDelay;

use wiretherm::ds18b20::Ds18b20;
use wiretherm::timing::TimingProfile;

use wiretherm_os::device::SharedDs18b20;
use wiretherm_os::error::ErrorKind;

use fake_line::{FakeLine, LineOp};

// Short conversion waits keep the tests fast; every other timing is
// irrelevant under the no-op delay.
fn test_timing(conversion_wait_ms: u32) -> TimingProfile {
    TimingProfile {
        conversion_wait_ms,
        ..TimingProfile::DS18B20
    }
}

fn expect_reset() -> Vec<LineOp> {
    vec![
        LineOp::SetLow,
        LineOp::SetHigh,
        LineOp::SetHigh,
        LineOp::Sample,
        LineOp::SetHigh,
    ]
}

fn expect_write_byte(byte: u8) -> Vec<LineOp> {
    (0..8)
        .flat_map(|i| {
            let bit = (byte >> i) & 1 != 0;
            vec![
                LineOp::SetHigh,
                LineOp::SetLow,
                if bit { LineOp::SetHigh } else { LineOp::SetLow },
                LineOp::SetHigh,
            ]
        })
        .collect()
}

fn expect_read_byte() -> Vec<LineOp> {
    (0..8)
        .flat_map(|_| vec![LineOp::SetLow, LineOp::SetHigh, LineOp::Sample])
        .collect()
}

// The exact bus footprint of one successful sample transaction.
fn expect_transaction() -> Vec<LineOp> {
    [
        expect_reset(),
        expect_write_byte(0xCC),
        expect_write_byte(0x44),
        expect_reset(),
        expect_write_byte(0xCC),
        expect_write_byte(0xBE),
        expect_read_byte(),
        expect_read_byte(),
    ]
    .into_iter()
    .flatten()
    .collect()
}

#[test]
fn test_concurrent_samples_never_interleave() {
    let (line, log) = FakeLine::new(0x0191);
    let sensor = Ds18b20::with_timing(line, NoopDelay::new(), test_timing(5));
    let shared = Arc::new(SharedDs18b20::new(sensor));

    let mut handles = Vec::new();
    for _ in 0..2 {
        let shared = Arc::clone(&shared);
        handles.push(thread::spawn(move || shared.sample()));
    }
    for handle in handles {
        let sample = handle.join().unwrap().unwrap();
        assert_eq!(sample.celsius_e4(), 250_625);
    }

    let log = log.lock().unwrap();

    // Strict serialization: the line changes hands exactly once, so each
    // transaction's operations form one contiguous run.
    let hand_overs = log.windows(2).filter(|pair| pair[0].0 != pair[1].0).count();
    assert_eq!(hand_overs, 1);

    // And each run is exactly one complete command sequence.
    let expected = expect_transaction();
    let ops: Vec<LineOp> = log.iter().map(|(_, op)| *op).collect();
    assert_eq!(ops.len(), expected.len() * 2);
    assert_eq!(&ops[..expected.len()], &expected[..]);
    assert_eq!(&ops[expected.len()..], &expected[..]);
}

#[test]
fn test_sample_decodes_negative_register() {
    let (line, _log) = FakeLine::new(0xFE6F);
    let sensor = Ds18b20::with_timing(line, NoopDelay::new(), test_timing(1));
    let shared = SharedDs18b20::new(sensor);

    let sample = shared.sample().unwrap();
    assert_eq!(sample.raw(), 0xFE6F);
    assert_eq!(sample.celsius_e4(), -250_625);
}

#[test]
fn test_try_sample_reports_busy_bus() {
    let (line, _log) = FakeLine::new(0x0191);
    let sensor = Ds18b20::with_timing(line, NoopDelay::new(), test_timing(200));
    let shared = Arc::new(SharedDs18b20::new(sensor));

    let background = {
        let shared = Arc::clone(&shared);
        thread::spawn(move || shared.sample())
    };

    // Let the background transaction reach its conversion wait.
    thread::sleep(Duration::from_millis(50));
    let err = shared.try_sample().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BusBusy);

    background.join().unwrap().unwrap();

    // Once the transaction completes the line is free again.
    assert!(shared.try_sample().is_ok());
}

#[test]
fn test_absent_sensor_stops_after_reset() {
    let (line, log) = FakeLine::absent();
    let sensor = Ds18b20::with_timing(line, NoopDelay::new(), test_timing(1));
    let shared = SharedDs18b20::new(sensor);

    let err = shared.sample().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoResponse);

    // The failed presence check aborts the transaction: nothing beyond
    // the reset sequence ever touches the line.
    let ops: Vec<LineOp> = log.lock().unwrap().iter().map(|(_, op)| *op).collect();
    assert_eq!(ops, expect_reset());
}
