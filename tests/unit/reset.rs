//! Unit tests for the software reset handshake

use crate::common::{create_bounded_driver, create_mock_driver, MockDelay};
use as7421::Error;

#[test]
fn reset_polls_until_the_bit_clears() {
    let (mut driver, interface) = create_mock_driver();

    // Reset stays in progress for 3 poll cycles, then clears: the driver
    // must observe it with exactly N + 1 = 4 status reads after the command
    interface.set_reset_cycles(3);
    driver.init(&mut MockDelay).unwrap();

    assert_eq!(interface.reads_after_first_write(0x38), 4);
    assert_eq!(interface.get_register(0x38) & 0x01, 0);
}

#[test]
fn reset_that_completes_immediately_polls_once() {
    let (mut driver, interface) = create_mock_driver();

    driver.init(&mut MockDelay).unwrap();

    assert_eq!(interface.reads_after_first_write(0x38), 1);
}

#[test]
fn unresponsive_device_surfaces_a_timeout() {
    let (mut driver, interface) = create_bounded_driver(5, 1_000);

    interface.set_reset_cycles(u32::MAX);
    let result = driver.init(&mut MockDelay);

    assert_eq!(result.unwrap_err(), Error::Unresponsive);
    // Every allowed poll performed one real status read
    assert_eq!(interface.reads_after_first_write(0x38), 5);
}

#[test]
fn is_resetting_tracks_the_status_bit() {
    let (mut driver, interface) = create_mock_driver();

    interface.set_register(0x38, 0x01);
    assert!(driver.is_resetting().unwrap());

    interface.set_register(0x38, 0x00);
    assert!(!driver.is_resetting().unwrap());
}
