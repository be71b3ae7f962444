//! Waveform recording for simulation output.
//!
//! The [`WaveformRecorder`] trait abstracts waveform output. [`VcdRecorder`]
//! writes the IEEE 1364 Value Change Dump text format, viewable in GTKWave or
//! Surfer. The kernel only reports actual changes, so recorders do not
//! deduplicate.

use std::io::Write;

use lifo_common::LogicVec;

use crate::error::SimError;
use crate::signal::{Direction, Port, PORT_COUNT};

/// Trait for recording simulation waveforms.
pub trait WaveformRecorder {
    /// Opens a new scope (hierarchy level).
    fn begin_scope(&mut self, name: &str) -> Result<(), SimError>;

    /// Registers a port for recording inside the current scope.
    fn register_port(&mut self, port: Port) -> Result<(), SimError>;

    /// Closes the current scope.
    fn end_scope(&mut self) -> Result<(), SimError>;

    /// Records a value change at the given time (in femtoseconds).
    fn record_change(&mut self, time_fs: u64, port: Port, value: &LogicVec)
        -> Result<(), SimError>;

    /// Finalizes the output (flush, write trailer).
    fn finalize(&mut self) -> Result<(), SimError>;
}

/// VCD recorder following IEEE 1364.
///
/// Identifier codes are printable ASCII characters starting from `!`.
pub struct VcdRecorder<W: Write> {
    writer: W,
    /// Identifier code per port, indexed by [`Port::index`].
    codes: [Option<char>; PORT_COUNT],
    next_code: u8,
    header_written: bool,
    current_time: Option<u64>,
}

impl<W: Write> VcdRecorder<W> {
    /// Creates a new VCD recorder writing to the given output.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            codes: [None; PORT_COUNT],
            next_code: b'!',
            header_written: false,
            current_time: None,
        }
    }

    /// Consumes the recorder, returning the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn ensure_header(&mut self) -> Result<(), SimError> {
        if self.header_written {
            return Ok(());
        }
        self.header_written = true;
        writeln!(self.writer, "$date")?;
        writeln!(self.writer, "  Simulation date")?;
        writeln!(self.writer, "$end")?;
        writeln!(self.writer, "$version")?;
        writeln!(self.writer, "  lifo stack simulator")?;
        writeln!(self.writer, "$end")?;
        writeln!(self.writer, "$timescale")?;
        writeln!(self.writer, "  1fs")?;
        writeln!(self.writer, "$end")?;
        Ok(())
    }

    /// Formats a value as a VCD value string (`0`/`1`/`x` or `b...`).
    fn format_value(value: &LogicVec) -> String {
        let width = value.width();
        if width == 1 {
            return value.get(0).vcd_char().to_string();
        }
        let mut s = String::with_capacity(width as usize + 1);
        s.push('b');
        for i in (0..width).rev() {
            s.push(value.get(i).vcd_char());
        }
        s
    }
}

impl<W: Write> WaveformRecorder for VcdRecorder<W> {
    fn begin_scope(&mut self, name: &str) -> Result<(), SimError> {
        self.ensure_header()?;
        writeln!(self.writer, "$scope module {name} $end")?;
        Ok(())
    }

    fn register_port(&mut self, port: Port) -> Result<(), SimError> {
        self.ensure_header()?;
        let code = self.next_code as char;
        self.next_code += 1;
        let kind = match port.direction() {
            Direction::Input => "wire",
            Direction::Output => "reg",
        };
        writeln!(
            self.writer,
            "$var {kind} {width} {code} {name} $end",
            width = port.width(),
            name = port.name()
        )?;
        self.codes[port.index()] = Some(code);
        Ok(())
    }

    fn end_scope(&mut self) -> Result<(), SimError> {
        writeln!(self.writer, "$upscope $end")?;
        Ok(())
    }

    fn record_change(
        &mut self,
        time_fs: u64,
        port: Port,
        value: &LogicVec,
    ) -> Result<(), SimError> {
        let code = self.codes[port.index()].ok_or_else(|| SimError::UnknownSignal(format!(
            "{} (not registered with the VCD recorder)",
            port.name()
        )))?;

        if self.current_time != Some(time_fs) {
            if self.current_time.is_none() {
                self.ensure_header()?;
                writeln!(self.writer, "$enddefinitions $end")?;
                writeln!(self.writer, "$dumpvars")?;
            }
            writeln!(self.writer, "#{time_fs}")?;
            self.current_time = Some(time_fs);
        }

        let val = Self::format_value(value);
        if value.width() == 1 {
            writeln!(self.writer, "{val}{code}")?;
        } else {
            writeln!(self.writer, "{val} {code}")?;
        }
        Ok(())
    }

    fn finalize(&mut self) -> Result<(), SimError> {
        if self.current_time.is_none() {
            self.ensure_header()?;
            writeln!(self.writer, "$enddefinitions $end")?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
