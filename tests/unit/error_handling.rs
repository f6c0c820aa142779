//! Unit tests for error handling and recovery

use crate::common::{create_mock_driver, MockDelay, MockError};
use as7421::Error;

#[test]
fn read_failure_propagates_unmodified() {
    let (mut driver, interface) = create_mock_driver();
    driver.init(&mut MockDelay).unwrap();

    interface.fail_next_read();

    let result = driver.device_id();
    assert_eq!(result.unwrap_err(), Error::Bus(MockError::Communication));
}

#[test]
fn read_failure_is_transient() {
    let (mut driver, interface) = create_mock_driver();
    driver.init(&mut MockDelay).unwrap();

    interface.fail_next_read();
    assert!(driver.device_id().is_err());

    // Only one operation was poisoned
    interface.set_register(0x70, 0x23);
    assert_eq!(driver.device_id().unwrap(), 0x23);
}

#[test]
fn write_failure_propagates() {
    let (mut driver, interface) = create_mock_driver();
    driver.init(&mut MockDelay).unwrap();

    interface.fail_next_write();

    let result = driver.powerup();
    assert_eq!(result.unwrap_err(), Error::Bus(MockError::Communication));
}

#[test]
fn rmw_pre_read_failure_aborts_the_set() {
    let (mut driver, interface) = create_mock_driver();
    driver.init(&mut MockDelay).unwrap();
    interface.clear_operations();

    // set() reads the current image first; failing that read must abort
    // before anything is written
    interface.fail_next_read();
    assert!(driver.powerup().is_err());
    assert_eq!(interface.write_count(0x60), 0);
}

#[test]
fn schema_errors_are_synchronous() {
    let (mut driver, _interface) = create_mock_driver();

    let map = driver.register_map();
    assert_eq!(map.get("NOPE").unwrap_err(), Error::UnknownRegister);
    assert_eq!(
        map.set("ENABLE", &[("NOPE", as7421::Value::Uint(0))])
            .unwrap_err(),
        Error::UnknownField
    );
}
