//! Register definitions for the AS7421
//!
//! The whole chip map lives in one immutable [`REGISTERS`] table built from
//! const constructors; the driver binds it by reference into a
//! [`RegisterMap`](crate::regmap::RegisterMap) at construction and nothing
//! mutates it afterwards.
//!
//! ## Layout notes
//! - Registers wider than 8 bits span consecutive addresses and are accessed
//!   as one burst (LTF_ITIME/LTF_WTIME 24-bit, LTF_CCOUNT and STATUS_ASAT
//!   16-bit, TEMP 64-bit, CHANNEL_A..D 256-bit).
//! - The indirect RAM window CFG_RAM_0..31 (0x40–0x5F) is the payload path
//!   for SMUX routing and analog gain; the target bank is selected through
//!   CFG_RAM first.
//! - STATUS_6 sits at 0x76 and STATUS_7 at 0x77 per the documented map.

use crate::adapter::Adapter;
use crate::regmap::{BitField, Register};

// ==================== LOOKUP TABLES ====================

const LED_AUTO: Adapter = Adapter::Lookup(&[
    ("OFF", 0b00),
    ("OFF1ON2", 0b01),
    ("ON1OFF2", 0b10),
    ("ON", 0b11),
]);

const LTF_CYCLE: Adapter = Adapter::Lookup(&[
    ("A", 0b00),
    ("AB", 0b01),
    ("ABC", 0b10),
    ("ABCD", 0b11),
]);

const LED_CURRENT: Adapter = Adapter::Lookup(&[("50mA", 0), ("75mA", 1)]);

const RAM_OFFSET: Adapter = Adapter::Lookup(&[
    ("UNSET", 0x00),
    ("SMUX_A", 0x0C),
    ("SMUX_B", 0x0D),
    ("SMUX_C", 0x0E),
    ("SMUX_D", 0x0F),
    ("ASETUP_AB", 0x10),
    ("ASETUP_CD", 0x11),
    ("COMPDAC", 0x12),
]);

const AZ_WTIME: Adapter = Adapter::Lookup(&[
    ("32us", 0b00),
    ("64us", 0b01),
    ("128us", 0b10),
    ("256us", 0b11),
]);

// ==================== FIELD TABLES ====================

static CFG_MISC_FIELDS: [BitField; 3] = [
    BitField::new("LED_WAIT_OFF", 0b0000_0100),
    BitField::new("WAIT_CYCLE_ON", 0b0000_0010),
    BitField::new("SW_RESET", 0b0000_0001),
];

static CFG_LED_MULT_FIELDS: [BitField; 1] = [BitField::new("LED_MULT", 0xFF)];

static LTF_CCOUNT_FIELDS: [BitField; 1] =
    [BitField::new("CCOUNT", 0xFFFF).with_adapter(Adapter::ByteSwap16)];

static LED_WAIT_FIELDS: [BitField; 1] = [BitField::new("LED_WAIT", 0xFF)];

/// Shared by all 32 registers of the indirect RAM window
static RAM_VALUE: [BitField; 1] = [BitField::new("VALUE", 0xFF)];

static ENABLE_FIELDS: [BitField; 6] = [
    BitField::new("LTF_MODE", 0b1100_0000),
    BitField::new("LED_AUTO", 0b0011_0000).with_adapter(LED_AUTO),
    BitField::new("SYNC_EN", 0b0000_1000),
    BitField::new("TSD_EN", 0b0000_0100),
    BitField::new("LTF_EN", 0b0000_0010),
    BitField::new("POWERON", 0b0000_0001),
];

static LTF_ITIME_FIELDS: [BitField; 1] =
    [BitField::new("ITIME", 0xFF_FFFF).with_adapter(Adapter::FixedPointTime)];

static LTF_WTIME_FIELDS: [BitField; 1] =
    [BitField::new("WTIME", 0xFF_FFFF).with_adapter(Adapter::FixedPointTime)];

static CFG_LTF_FIELDS: [BitField; 2] = [
    BitField::new("LTF_CYCLE", 0b0001_1000).with_adapter(LTF_CYCLE),
    BitField::new("CLKMOD", 0b0000_0111),
];

static CFG_LED_FIELDS: [BitField; 4] = [
    BitField::new("SET_LED_ON", 0b1000_0000),
    BitField::new("LED_OFF_EN", 0b0100_0000),
    BitField::new("LED_OFFSET", 0b0011_0000),
    BitField::new("LED_CURRENT", 0b0000_0111).with_adapter(LED_CURRENT),
];

static LTF_ICOUNT_FIELDS: [BitField; 1] = [BitField::new("ICOUNT", 0xFF)];

static CFG_RAM_FIELDS: [BitField; 2] = [
    BitField::new("REG_BANK", 0b1000_0000),
    BitField::new("RAM_OFFSET", 0b0001_1111).with_adapter(RAM_OFFSET),
];

static CFG_AZ_FIELDS: [BitField; 5] = [
    BitField::new("AZ_ON", 0b1000_0000),
    BitField::new("AZ_WTIME", 0b0110_0000).with_adapter(AZ_WTIME),
    BitField::new("AZ_EN", 0b0001_0000),
    BitField::new("AZ_CYCLE", 0b0000_1000),
    BitField::new("AZ_ITERATION", 0b0000_0111),
];

static STATUS_0_FIELDS: [BitField; 1] = [BitField::new("DEV_ID", 0b0011_1111)];

static STATUS_1_FIELDS: [BitField; 1] = [BitField::new("REV_ID", 0b0011_1111)];

static STATUS_ASAT_FIELDS: [BitField; 16] = [
    BitField::new("ASAT_0", 1 << 0),
    BitField::new("ASAT_1", 1 << 1),
    BitField::new("ASAT_2", 1 << 2),
    BitField::new("ASAT_3", 1 << 3),
    BitField::new("ASAT_4", 1 << 4),
    BitField::new("ASAT_5", 1 << 5),
    BitField::new("ASAT_6", 1 << 6),
    BitField::new("ASAT_7", 1 << 7),
    BitField::new("ASAT_8", 1 << 8),
    BitField::new("ASAT_9", 1 << 9),
    BitField::new("ASAT_10", 1 << 10),
    BitField::new("ASAT_11", 1 << 11),
    BitField::new("ASAT_12", 1 << 12),
    BitField::new("ASAT_13", 1 << 13),
    BitField::new("ASAT_14", 1 << 14),
    BitField::new("ASAT_15", 1 << 15),
];

static STATUS_6_FIELDS: [BitField; 2] = [
    BitField::new("LTF_READY", 0b0010_0000),
    BitField::new("LTF_BUSY", 0b0001_0000),
];

static STATUS_7_FIELDS: [BitField; 7] = [
    BitField::new("I2C_DATA_POINTER", 0b1100_0000),
    BitField::new("DLOST", 0b0010_0000),
    BitField::new("DSAT", 0b0001_0000),
    BitField::new("ASAT", 0b0000_1000),
    BitField::new("TSD", 0b0000_0100),
    BitField::new("AZ", 0b0000_0010),
    BitField::new("ADATA", 0b0000_0001),
];

/// Four 16-bit die temperatures, one per channel group, natural byte order
static TEMP_FIELDS: [BitField; 4] = [
    BitField::shifted("TEMP_A", 0xFFFF, 48),
    BitField::shifted("TEMP_B", 0xFFFF, 32),
    BitField::shifted("TEMP_C", 0xFFFF, 16),
    BitField::shifted("TEMP_D", 0xFFFF, 0),
];

/// Sixteen byte-swapped 16-bit counts; shared by all four channel groups
static CHANNEL_FIELDS: [BitField; 16] = [
    BitField::shifted("CH0", 0xFFFF, 240).with_adapter(Adapter::ByteSwap16),
    BitField::shifted("CH1", 0xFFFF, 224).with_adapter(Adapter::ByteSwap16),
    BitField::shifted("CH2", 0xFFFF, 208).with_adapter(Adapter::ByteSwap16),
    BitField::shifted("CH3", 0xFFFF, 192).with_adapter(Adapter::ByteSwap16),
    BitField::shifted("CH4", 0xFFFF, 176).with_adapter(Adapter::ByteSwap16),
    BitField::shifted("CH5", 0xFFFF, 160).with_adapter(Adapter::ByteSwap16),
    BitField::shifted("CH6", 0xFFFF, 144).with_adapter(Adapter::ByteSwap16),
    BitField::shifted("CH7", 0xFFFF, 128).with_adapter(Adapter::ByteSwap16),
    BitField::shifted("CH8", 0xFFFF, 112).with_adapter(Adapter::ByteSwap16),
    BitField::shifted("CH9", 0xFFFF, 96).with_adapter(Adapter::ByteSwap16),
    BitField::shifted("CH10", 0xFFFF, 80).with_adapter(Adapter::ByteSwap16),
    BitField::shifted("CH11", 0xFFFF, 64).with_adapter(Adapter::ByteSwap16),
    BitField::shifted("CH12", 0xFFFF, 48).with_adapter(Adapter::ByteSwap16),
    BitField::shifted("CH13", 0xFFFF, 32).with_adapter(Adapter::ByteSwap16),
    BitField::shifted("CH14", 0xFFFF, 16).with_adapter(Adapter::ByteSwap16),
    BitField::shifted("CH15", 0xFFFF, 0).with_adapter(Adapter::ByteSwap16),
];

// ==================== REGISTER TABLE ====================

/// The complete AS7421 register schema
pub static REGISTERS: [Register; 54] = [
    Register::new("CFG_MISC", 0x38, &CFG_MISC_FIELDS),
    Register::new("CFG_LED_MULT", 0x39, &CFG_LED_MULT_FIELDS),
    Register::new("LTF_CCOUNT", 0x3A, &LTF_CCOUNT_FIELDS).with_bit_width(16),
    Register::new("LED_WAIT", 0x3D, &LED_WAIT_FIELDS),
    Register::new("CFG_RAM_0", 0x40, &RAM_VALUE),
    Register::new("CFG_RAM_1", 0x41, &RAM_VALUE),
    Register::new("CFG_RAM_2", 0x42, &RAM_VALUE),
    Register::new("CFG_RAM_3", 0x43, &RAM_VALUE),
    Register::new("CFG_RAM_4", 0x44, &RAM_VALUE),
    Register::new("CFG_RAM_5", 0x45, &RAM_VALUE),
    Register::new("CFG_RAM_6", 0x46, &RAM_VALUE),
    Register::new("CFG_RAM_7", 0x47, &RAM_VALUE),
    Register::new("CFG_RAM_8", 0x48, &RAM_VALUE),
    Register::new("CFG_RAM_9", 0x49, &RAM_VALUE),
    Register::new("CFG_RAM_10", 0x4A, &RAM_VALUE),
    Register::new("CFG_RAM_11", 0x4B, &RAM_VALUE),
    Register::new("CFG_RAM_12", 0x4C, &RAM_VALUE),
    Register::new("CFG_RAM_13", 0x4D, &RAM_VALUE),
    Register::new("CFG_RAM_14", 0x4E, &RAM_VALUE),
    Register::new("CFG_RAM_15", 0x4F, &RAM_VALUE),
    Register::new("CFG_RAM_16", 0x50, &RAM_VALUE),
    Register::new("CFG_RAM_17", 0x51, &RAM_VALUE),
    Register::new("CFG_RAM_18", 0x52, &RAM_VALUE),
    Register::new("CFG_RAM_19", 0x53, &RAM_VALUE),
    Register::new("CFG_RAM_20", 0x54, &RAM_VALUE),
    Register::new("CFG_RAM_21", 0x55, &RAM_VALUE),
    Register::new("CFG_RAM_22", 0x56, &RAM_VALUE),
    Register::new("CFG_RAM_23", 0x57, &RAM_VALUE),
    Register::new("CFG_RAM_24", 0x58, &RAM_VALUE),
    Register::new("CFG_RAM_25", 0x59, &RAM_VALUE),
    Register::new("CFG_RAM_26", 0x5A, &RAM_VALUE),
    Register::new("CFG_RAM_27", 0x5B, &RAM_VALUE),
    Register::new("CFG_RAM_28", 0x5C, &RAM_VALUE),
    Register::new("CFG_RAM_29", 0x5D, &RAM_VALUE),
    Register::new("CFG_RAM_30", 0x5E, &RAM_VALUE),
    Register::new("CFG_RAM_31", 0x5F, &RAM_VALUE),
    Register::new("ENABLE", 0x60, &ENABLE_FIELDS),
    Register::new("LTF_ITIME", 0x61, &LTF_ITIME_FIELDS).with_bit_width(24),
    Register::new("LTF_WTIME", 0x64, &LTF_WTIME_FIELDS).with_bit_width(24),
    Register::new("CFG_LTF", 0x67, &CFG_LTF_FIELDS),
    Register::new("CFG_LED", 0x68, &CFG_LED_FIELDS),
    Register::new("LTF_ICOUNT", 0x69, &LTF_ICOUNT_FIELDS),
    Register::new("CFG_RAM", 0x6A, &CFG_RAM_FIELDS),
    Register::new("CFG_AZ", 0x6D, &CFG_AZ_FIELDS),
    Register::new("STATUS_0", 0x70, &STATUS_0_FIELDS).read_only(),
    Register::new("STATUS_1", 0x71, &STATUS_1_FIELDS).read_only(),
    Register::new("STATUS_ASAT", 0x72, &STATUS_ASAT_FIELDS)
        .with_bit_width(16)
        .read_only(),
    Register::new("STATUS_6", 0x76, &STATUS_6_FIELDS).read_only(),
    Register::new("STATUS_7", 0x77, &STATUS_7_FIELDS)
        .read_only()
        .volatile(),
    Register::new("TEMP", 0x78, &TEMP_FIELDS).with_bit_width(64).read_only(),
    Register::new("CHANNEL_A", 0x80, &CHANNEL_FIELDS)
        .with_bit_width(256)
        .read_only(),
    Register::new("CHANNEL_B", 0xA0, &CHANNEL_FIELDS)
        .with_bit_width(256)
        .read_only(),
    Register::new("CHANNEL_C", 0xC0, &CHANNEL_FIELDS)
        .with_bit_width(256)
        .read_only(),
    Register::new("CHANNEL_D", 0xE0, &CHANNEL_FIELDS)
        .with_bit_width(256)
        .read_only(),
];

/// Register names of the indirect RAM window, in address order
pub(crate) static RAM_WINDOW: [&str; 32] = [
    "CFG_RAM_0",
    "CFG_RAM_1",
    "CFG_RAM_2",
    "CFG_RAM_3",
    "CFG_RAM_4",
    "CFG_RAM_5",
    "CFG_RAM_6",
    "CFG_RAM_7",
    "CFG_RAM_8",
    "CFG_RAM_9",
    "CFG_RAM_10",
    "CFG_RAM_11",
    "CFG_RAM_12",
    "CFG_RAM_13",
    "CFG_RAM_14",
    "CFG_RAM_15",
    "CFG_RAM_16",
    "CFG_RAM_17",
    "CFG_RAM_18",
    "CFG_RAM_19",
    "CFG_RAM_20",
    "CFG_RAM_21",
    "CFG_RAM_22",
    "CFG_RAM_23",
    "CFG_RAM_24",
    "CFG_RAM_25",
    "CFG_RAM_26",
    "CFG_RAM_27",
    "CFG_RAM_28",
    "CFG_RAM_29",
    "CFG_RAM_30",
    "CFG_RAM_31",
];

/// Approximate center wavelength of each spectral channel, in nanometers
///
/// Indexed the same way [`read_all_channels`](crate::As7421::read_all_channels)
/// orders its output: group A channels 0–15, then B, C, D. These are opaque
/// calibration constants for the default SMUX routing, not computed values.
pub static ESTIMATED_WAVELENGTHS: [u16; 64] = [
    930, 770, 760, 990, 790, 895, 955, 880, 825, 875, 835, 845, 1020, 950, 1010, 995, //
    750, 980, 780, 970, 965, 860, 915, 805, 820, 830, 855, 830, 1000, 1015, 900, 1045, //
    775, 920, 765, 910, 975, 865, 935, 885, 800, 830, 850, 830, 890, 1040, 1005, 1035, //
    755, 795, 925, 785, 960, 905, 940, 985, 810, 840, 815, 870, 1025, 1050, 1030, 945,
];
