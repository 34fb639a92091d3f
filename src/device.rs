/// Where PRN and MUL send their values. The CPU calls `emit` once per
/// printed value.
pub trait OutputDevice {
    fn emit(&mut self, value: u8);
}

/// Prints each value in decimal on its own line.
#[derive(Debug, Default)]
pub struct StdoutDevice;

impl OutputDevice for StdoutDevice {
    fn emit(&mut self, value: u8) {
        println!("{}", value);
    }
}

/// Collects values in order.
impl OutputDevice for Vec<u8> {
    fn emit(&mut self, value: u8) {
        self.push(value);
    }
}
