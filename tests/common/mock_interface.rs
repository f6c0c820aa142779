//! Mock interface implementation for testing the AS7421 driver

use device_driver::RegisterInterface;
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

/// Records operations performed on the mock interface
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Read register operation (one entry per byte of a burst)
    ReadRegister {
        /// Register address
        address: u8,
        /// Value that was returned
        value: u8,
    },
    /// Write register operation (one entry per byte of a burst)
    WriteRegister {
        /// Register address
        address: u8,
        /// Value that was written
        value: u8,
    },
}

const CFG_MISC: u8 = 0x38;
const STATUS_6: u8 = 0x76;
const STATUS_7: u8 = 0x77;
const TEMP: u8 = 0x78;
const CHANNEL_BASE: u8 = 0x80;

/// Shared state for mock interface (uses interior mutability)
#[derive(Debug)]
struct MockState {
    /// Simulated register values, address -> value
    registers: HashMap<u8, u8>,

    /// Operations log for verification
    operations: Vec<Operation>,

    /// Failure injection flags
    fail_next_read: bool,
    fail_next_write: bool,

    /// Reset simulation: once SW_RESET is written, this many status reads
    /// still report the reset in progress before the bit clears
    reset_cycles: u32,
    resetting: bool,

    /// Scripted status values, consumed one per read; when exhausted the
    /// stored register value is returned
    status6_sequence: VecDeque<u8>,
    status7_sequence: VecDeque<u8>,
}

impl MockState {
    fn new() -> Self {
        Self {
            registers: HashMap::new(),
            operations: Vec::new(),
            fail_next_read: false,
            fail_next_write: false,
            reset_cycles: 0,
            resetting: false,
            status6_sequence: VecDeque::new(),
            status7_sequence: VecDeque::new(),
        }
    }

    fn read_byte(&mut self, address: u8) -> u8 {
        match address {
            CFG_MISC if self.resetting => {
                let stored = self.registers.get(&CFG_MISC).copied().unwrap_or(0);
                if self.reset_cycles > 0 {
                    self.reset_cycles -= 1;
                    stored | 0x01
                } else {
                    self.resetting = false;
                    let cleared = stored & !0x01;
                    self.registers.insert(CFG_MISC, cleared);
                    cleared
                }
            }
            STATUS_6 => match self.status6_sequence.pop_front() {
                Some(value) => value,
                None => self.registers.get(&STATUS_6).copied().unwrap_or(0),
            },
            STATUS_7 => match self.status7_sequence.pop_front() {
                Some(value) => value,
                None => self.registers.get(&STATUS_7).copied().unwrap_or(0),
            },
            _ => self.registers.get(&address).copied().unwrap_or(0),
        }
    }
}

/// Mock interface for testing
#[derive(Clone)]
pub struct MockInterface {
    state: Rc<RefCell<MockState>>,
}

impl MockInterface {
    /// Create a new mock interface with an all-zero register space
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(MockState::new())),
        }
    }

    /// Set a register value
    pub fn set_register(&self, address: u8, value: u8) {
        self.state.borrow_mut().registers.insert(address, value);
    }

    /// Get a register value
    pub fn get_register(&self, address: u8) -> u8 {
        self.state
            .borrow()
            .registers
            .get(&address)
            .copied()
            .unwrap_or(0)
    }

    /// After the next SW_RESET write, report the reset as still in progress
    /// for this many status reads before clearing the bit
    pub fn set_reset_cycles(&self, cycles: u32) {
        self.state.borrow_mut().reset_cycles = cycles;
    }

    /// Script the STATUS_6 values returned by successive reads
    #[allow(dead_code)]
    pub fn script_status6(&self, values: &[u8]) {
        self.state.borrow_mut().status6_sequence = values.iter().copied().collect();
    }

    /// Script the STATUS_7 values returned by successive reads
    #[allow(dead_code)]
    pub fn script_status7(&self, values: &[u8]) {
        self.state.borrow_mut().status7_sequence = values.iter().copied().collect();
    }

    /// Set one channel group's 16 counts (returned post-byte-swap as given)
    #[allow(dead_code)]
    pub fn set_channel_data(&self, group: usize, values: [u16; 16]) {
        let base = CHANNEL_BASE + 0x20 * group as u8;
        let mut state = self.state.borrow_mut();
        for (idx, value) in values.iter().enumerate() {
            // The chip delivers the low byte at the lower address; the
            // driver's byte-swap adapter undoes this on decode.
            let [low, high] = value.to_le_bytes();
            state.registers.insert(base + 2 * idx as u8, low);
            state.registers.insert(base + 2 * idx as u8 + 1, high);
        }
    }

    /// Set the four die temperatures (natural byte order, no swap)
    #[allow(dead_code)]
    pub fn set_temperature_data(&self, values: [u16; 4]) {
        let mut state = self.state.borrow_mut();
        for (idx, value) in values.iter().enumerate() {
            let [high, low] = value.to_be_bytes();
            state.registers.insert(TEMP + 2 * idx as u8, high);
            state.registers.insert(TEMP + 2 * idx as u8 + 1, low);
        }
    }

    /// Inject a read failure on the next read operation
    pub fn fail_next_read(&self) {
        self.state.borrow_mut().fail_next_read = true;
    }

    /// Inject a write failure on the next write operation
    #[allow(dead_code)]
    pub fn fail_next_write(&self) {
        self.state.borrow_mut().fail_next_write = true;
    }

    /// Get the operations log
    #[allow(dead_code)]
    pub fn operations(&self) -> Vec<Operation> {
        self.state.borrow().operations.clone()
    }

    /// Clear the operations log
    #[allow(dead_code)]
    pub fn clear_operations(&self) {
        self.state.borrow_mut().operations.clear();
    }

    /// Count read operations touching an address
    pub fn read_count(&self, address: u8) -> usize {
        self.state
            .borrow()
            .operations
            .iter()
            .filter(|op| matches!(op, Operation::ReadRegister { address: a, .. } if *a == address))
            .count()
    }

    /// Count write operations touching an address
    pub fn write_count(&self, address: u8) -> usize {
        self.state
            .borrow()
            .operations
            .iter()
            .filter(|op| matches!(op, Operation::WriteRegister { address: a, .. } if *a == address))
            .count()
    }

    /// Count reads of an address that happened after the first write to it
    #[allow(dead_code)]
    pub fn reads_after_first_write(&self, address: u8) -> usize {
        let state = self.state.borrow();
        let first_write = state
            .operations
            .iter()
            .position(|op| matches!(op, Operation::WriteRegister { address: a, .. } if *a == address));
        match first_write {
            Some(pos) => state.operations[pos..]
                .iter()
                .filter(
                    |op| matches!(op, Operation::ReadRegister { address: a, .. } if *a == address),
                )
                .count(),
            None => 0,
        }
    }
}

/// Mock error type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockError {
    /// Simulated communication error
    Communication,
}

impl RegisterInterface for MockInterface {
    type Error = MockError;
    type AddressType = u8;

    fn read_register(
        &mut self,
        address: Self::AddressType,
        _size_bits: u32,
        read_data: &mut [u8],
    ) -> Result<(), Self::Error> {
        let mut state = self.state.borrow_mut();

        if state.fail_next_read {
            state.fail_next_read = false;
            return Err(MockError::Communication);
        }

        for (i, byte) in read_data.iter_mut().enumerate() {
            let reg_addr = address.wrapping_add(i as u8);
            *byte = state.read_byte(reg_addr);
            state.operations.push(Operation::ReadRegister {
                address: reg_addr,
                value: *byte,
            });
        }

        Ok(())
    }

    fn write_register(
        &mut self,
        address: Self::AddressType,
        _size_bits: u32,
        write_data: &[u8],
    ) -> Result<(), Self::Error> {
        let mut state = self.state.borrow_mut();

        if state.fail_next_write {
            state.fail_next_write = false;
            return Err(MockError::Communication);
        }

        for (i, &byte) in write_data.iter().enumerate() {
            let reg_addr = address.wrapping_add(i as u8);
            state.registers.insert(reg_addr, byte);
            state.operations.push(Operation::WriteRegister {
                address: reg_addr,
                value: byte,
            });

            // A SW_RESET write arms the reset countdown
            if reg_addr == CFG_MISC && byte & 0x01 != 0 {
                state.resetting = true;
            }
        }

        Ok(())
    }
}

impl Default for MockInterface {
    fn default() -> Self {
        Self::new()
    }
}
