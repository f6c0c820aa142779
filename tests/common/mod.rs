//! Common test utilities and mock implementations

pub mod mock_interface;

pub use mock_interface::{MockError, MockInterface, Operation};
pub use test_utils::{create_bounded_driver, create_mock_driver, MockDelay};
