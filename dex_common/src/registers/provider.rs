//! Register access seam between the supervision core and the bus layer.

/// Key/value access to a mechanism's hardware registers.
///
/// Bit names are strings resolved once from the register descriptor when a
/// supervisor is constructed and never change afterwards. The provider is
/// shared between the command writer and the status reader, so mutation
/// goes through `&self`; implementations supply their own interior
/// mutability and locking.
///
/// # Contract
///
/// - `has_*_bit` existence checks back the construction-time validation;
///   after a supervisor validates its descriptor, reads and writes of the
///   resolved bits must not fail.
/// - Reads of unknown status bits return 0; writes to unknown control bits
///   are ignored. Neither is an error at this seam.
pub trait RegisterProvider: Send + Sync {
    /// True when the mechanism exposes the named control bit.
    fn has_control_bit(&self, mechanism: &str, bit: &str) -> bool;

    /// True when the mechanism exposes the named status bit.
    fn has_status_bit(&self, mechanism: &str, bit: &str) -> bool;

    /// Write a control bit or word.
    fn set_control_value(&self, mechanism: &str, bit: &str, value: i32);

    /// Read back a status bit or word.
    fn get_status_value(&self, mechanism: &str, bit: &str) -> i32;
}
