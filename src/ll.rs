//! Low-level register and interface definitions for APDS-9960

use embedded_hal::i2c::I2c;

/// I2C address of the APDS-9960
pub const I2C_ADDRESS: u8 = 0x39;

/// Value of the ID register on a genuine APDS-9960
pub const CHIP_ID: u8 = 0xAB;

/// Data bytes sent per I2C write transaction (AILTL..AIHTH)
pub const MAX_WRITE_LEN: usize = 4;

/// Register addresses
#[allow(missing_docs)]
pub mod reg {
    pub const ENABLE: u8 = 0x80;
    pub const ATIME: u8 = 0x81;
    pub const WTIME: u8 = 0x83;
    pub const AILTL: u8 = 0x84;
    pub const AIHTL: u8 = 0x86;
    pub const PILT: u8 = 0x89;
    pub const PIHT: u8 = 0x8B;
    pub const PERS: u8 = 0x8C;
    pub const CONFIG1: u8 = 0x8D;
    pub const PPULSE: u8 = 0x8E;
    pub const CONTROL: u8 = 0x8F;
    pub const CONFIG2: u8 = 0x90;
    pub const ID: u8 = 0x92;
    pub const STATUS: u8 = 0x93;
    pub const CDATAL: u8 = 0x94;
    pub const PDATA: u8 = 0x9C;
    pub const POFFSET_UR: u8 = 0x9D;
    pub const POFFSET_DL: u8 = 0x9E;
    pub const CONFIG3: u8 = 0x9F;
    pub const GPENTH: u8 = 0xA0;
    pub const GEXTH: u8 = 0xA1;
    pub const GCONF1: u8 = 0xA2;
    pub const GCONF2: u8 = 0xA3;
    pub const GOFFSET_U: u8 = 0xA4;
    pub const GOFFSET_D: u8 = 0xA5;
    pub const GPULSE: u8 = 0xA6;
    pub const GOFFSET_L: u8 = 0xA7;
    pub const GOFFSET_R: u8 = 0xA9;
    pub const GCONF3: u8 = 0xAA;
    pub const GCONF4: u8 = 0xAB;
    pub const GFLVL: u8 = 0xAE;
    pub const GSTATUS: u8 = 0xAF;
    pub const IFORCE: u8 = 0xE4;
    pub const PICLEAR: u8 = 0xE5;
    pub const CICLEAR: u8 = 0xE6;
    pub const AICLEAR: u8 = 0xE7;
    pub const GFIFO_U: u8 = 0xFC;
}

/// Bit masks and field positions
#[allow(missing_docs)]
pub mod bits {
    // ENABLE
    pub const PON: u8 = 1 << 0;
    pub const AEN: u8 = 1 << 1;
    pub const PEN: u8 = 1 << 2;
    pub const WEN: u8 = 1 << 3;
    pub const AIEN: u8 = 1 << 4;
    pub const PIEN: u8 = 1 << 5;
    pub const GEN: u8 = 1 << 6;

    // PERS
    pub const PPERS_SHIFT: u8 = 4;
    pub const PPERS_MASK: u8 = 0xF0;
    pub const APERS_MASK: u8 = 0x0F;

    // CONFIG1
    pub const WLONG: u8 = 1 << 1;

    // PPULSE / GPULSE
    pub const PLEN_SHIFT: u8 = 6;
    pub const PLEN_MASK: u8 = 0xC0;
    pub const PULSE_MASK: u8 = 0x3F;

    // CONTROL
    pub const LDRIVE_SHIFT: u8 = 6;
    pub const LDRIVE_MASK: u8 = 0xC0;
    pub const PGAIN_SHIFT: u8 = 2;
    pub const PGAIN_MASK: u8 = 0x0C;
    pub const AGAIN_MASK: u8 = 0x03;

    // CONFIG2
    pub const PSIEN: u8 = 1 << 7;
    pub const CPSIEN: u8 = 1 << 6;
    pub const LED_BOOST_SHIFT: u8 = 4;
    pub const LED_BOOST_MASK: u8 = 0x30;

    // STATUS
    pub const CPSAT: u8 = 1 << 7;
    pub const PGSAT: u8 = 1 << 6;
    pub const PINT: u8 = 1 << 5;
    pub const AINT: u8 = 1 << 4;
    pub const GINT: u8 = 1 << 2;
    pub const PVALID: u8 = 1 << 1;
    pub const AVALID: u8 = 1 << 0;

    // CONFIG3
    pub const PCMP: u8 = 1 << 5;
    pub const SAI: u8 = 1 << 4;
    pub const PMASK_U: u8 = 1 << 3;
    pub const PMASK_D: u8 = 1 << 2;
    pub const PMASK_L: u8 = 1 << 1;
    pub const PMASK_R: u8 = 1 << 0;

    // GCONF1
    pub const GFIFOTH_SHIFT: u8 = 6;
    pub const GFIFOTH_MASK: u8 = 0xC0;
    pub const GEXMSK_SHIFT: u8 = 2;
    pub const GEXMSK_MASK: u8 = 0x3C;
    pub const GEXPERS_MASK: u8 = 0x03;

    // GCONF2
    pub const GGAIN_SHIFT: u8 = 5;
    pub const GGAIN_MASK: u8 = 0x60;
    pub const GLDRIVE_SHIFT: u8 = 3;
    pub const GLDRIVE_MASK: u8 = 0x18;
    pub const GWTIME_MASK: u8 = 0x07;

    // GCONF3
    pub const GDIMS_MASK: u8 = 0x03;

    // GCONF4
    pub const GFIFO_CLR: u8 = 1 << 2;
    pub const GIEN: u8 = 1 << 1;
    pub const GMODE: u8 = 1 << 0;

    // GSTATUS
    pub const GFOV: u8 = 1 << 1;
    pub const GVALID: u8 = 1 << 0;
}

/// Bus capability the driver is linked against.
///
/// `init` acquires the bus and `deinit` releases it. Register reads auto-increment,
/// so a multi-byte `data` buffer covers consecutive registers. A write with an
/// empty `data` slice is an address-only command (used by the interrupt clear
/// registers).
pub trait BusInterface {
    /// Error type reported by the underlying transport
    type Error: core::fmt::Debug;

    /// Acquire the bus
    fn init(&mut self) -> Result<(), Self::Error>;

    /// Release the bus
    fn deinit(&mut self) -> Result<(), Self::Error>;

    /// Read `data.len()` bytes starting at `address`
    fn read_register(&mut self, address: u8, data: &mut [u8]) -> Result<(), Self::Error>;

    /// Write `data` starting at `address`
    fn write_register(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error>;
}

/// Bus interface over any blocking `embedded-hal` I2C implementation
#[derive(Debug)]
pub struct I2cInterface<I2c> {
    /// The I2C interface
    pub i2c: I2c,
}

impl<I2C> I2cInterface<I2C> {
    /// Wrap an I2C bus
    pub fn new(i2c: I2C) -> Self {
        Self { i2c }
    }
}

impl<I2cTrait: I2c> BusInterface for I2cInterface<I2cTrait> {
    type Error = I2cTrait::Error;

    // The embedded-hal bus is already open by the time it is handed over.
    fn init(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn deinit(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn read_register(&mut self, address: u8, data: &mut [u8]) -> Result<(), Self::Error> {
        self.i2c.write_read(I2C_ADDRESS, &[address], data)
    }

    fn write_register(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error> {
        if data.is_empty() {
            return self.i2c.write(I2C_ADDRESS, &[address]);
        }

        // Wider payloads continue in a new transaction at the next register
        let mut buf = [0u8; 1 + MAX_WRITE_LEN];
        for (i, chunk) in data.chunks(MAX_WRITE_LEN).enumerate() {
            buf[0] = address.wrapping_add((i * MAX_WRITE_LEN) as u8);
            buf[1..1 + chunk.len()].copy_from_slice(chunk);
            self.i2c.write(I2C_ADDRESS, &buf[..1 + chunk.len()])?;
        }
        Ok(())
    }
}
