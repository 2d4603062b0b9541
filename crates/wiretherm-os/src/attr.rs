use std::io::Write;

use wiretherm::ds18b20::Temperature;

use crate::error::Result;

/// Scale factor of the textual attribute value.
///
/// The attribute reports the temperature multiplied by 10000 as a plain
/// integer, so consumers divide by this constant instead of parsing
/// floating point.
pub const TEMP_ATTR_SCALE: i32 = 10_000;

/// Renders the textual temperature attribute.
///
/// The format is `temp = <value>\n` where `<value>` is the decoded
/// temperature multiplied by [`TEMP_ATTR_SCALE`]: a sample of 25.0625 C
/// renders as `temp = 250625\n`.
#[must_use]
pub fn render_temp(sample: Temperature) -> String {
    format!("temp = {}\n", sample.celsius_e4())
}

/// Writes the textual temperature attribute to a consumer-facing sink.
///
/// # Errors
///
/// Returns an error of kind [`crate::error::ErrorKind::TransferFault`] if
/// the sink rejects the write. The sample itself is already decoded at
/// this point; a transfer fault never indicates a bad reading.
pub fn write_temp<W: Write>(mut sink: W, sample: Temperature) -> Result<()> {
    sink.write_all(render_temp(sample).as_bytes())?;
    Ok(())
}

/// The fixed-size binary payload of a sample: the raw 16-bit register,
/// pre-decode, little endian.
#[must_use]
pub fn raw_payload(sample: Temperature) -> [u8; 2] {
    sample.raw().to_le_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::error::ErrorKind;

    #[test]
    fn test_render_positive_sample() {
        assert_eq!(render_temp(Temperature::from_raw(0x0191)), "temp = 250625\n");
    }

    #[test]
    fn test_render_negative_sample() {
        assert_eq!(
            render_temp(Temperature::from_raw(0xFE6F)),
            "temp = -250625\n"
        );
    }

    #[test]
    fn test_write_temp_to_sink() {
        let mut sink = Vec::new();

        write_temp(&mut sink, Temperature::from_raw(0x0191)).unwrap();

        assert_eq!(sink, b"temp = 250625\n");
    }

    #[test]
    fn test_write_temp_transfer_fault() {
        // A zero-capacity sink that refuses all writes.
        struct Refusing;
        impl Write for Refusing {
            fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("surface gone"))
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let err = write_temp(Refusing, Temperature::from_raw(0x0191)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TransferFault);
    }

    #[test]
    fn test_raw_payload_is_little_endian() {
        assert_eq!(raw_payload(Temperature::from_raw(0x0191)), [0x91, 0x01]);
    }
}
