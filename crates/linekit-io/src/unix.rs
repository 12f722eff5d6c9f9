//! Unix console backend: termios raw mode, blocking byte reads, and
//! VT-style output over the standard descriptors.

use std::fs::File;
use std::io::{self, BufRead};
use std::os::unix::io::AsRawFd;

use linekit_core::{AsAny, ConsoleError, ConsoleInput, ConsoleOutput, ConsoleResult, RawModeGuard};

/// Character-at-a-time input over stdin.
///
/// Raw mode is scoped to each [`ConsoleInput::read_byte`] call: the previous
/// termios settings are captured, raw mode is entered, one byte is read, and
/// the settings are restored by the returned guard even if the read fails.
/// Display writes therefore always happen in cooked mode.
pub struct UnixConsoleInput {
    stdin_fd: i32,
}

impl UnixConsoleInput {
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            stdin_fd: io::stdin().as_raw_fd(),
        })
    }

    /// Enable raw (unbuffered, unechoed) mode until the guard is dropped.
    pub fn enable_raw_mode(&self) -> ConsoleResult<RawModeGuard> {
        let fd = self.stdin_fd;
        let mut original: libc::termios = unsafe { std::mem::zeroed() };
        if unsafe { libc::tcgetattr(fd, &mut original) } != 0 {
            return Err(ConsoleError::Terminal(io::Error::last_os_error().to_string()));
        }

        let mut raw = original;
        raw.c_lflag &= !(libc::ICANON | libc::ECHO | libc::ECHOE | libc::ECHOK | libc::ISIG | libc::IEXTEN);
        raw.c_iflag &= !(libc::IXON | libc::ICRNL | libc::INLCR | libc::IGNCR | libc::BRKINT | libc::ISTRIP);
        raw.c_oflag &= !libc::OPOST;
        raw.c_cflag &= !libc::CSIZE;
        raw.c_cflag |= libc::CS8;
        raw.c_cc[libc::VMIN] = 1; // block until one byte arrives
        raw.c_cc[libc::VTIME] = 0;
        if unsafe { libc::tcsetattr(fd, libc::TCSADRAIN, &raw) } != 0 {
            return Err(ConsoleError::Terminal(io::Error::last_os_error().to_string()));
        }

        let restore_fn = move || unsafe {
            let _ = libc::tcsetattr(fd, libc::TCSADRAIN, &original);
        };
        Ok(RawModeGuard::new(restore_fn, "unix termios".to_string()))
    }

    fn fd_window_width(fd: i32) -> Option<u16> {
        let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
        if unsafe { libc::ioctl(fd, libc::TIOCGWINSZ, &mut ws) } == -1 {
            return None;
        }
        (ws.ws_col > 0).then_some(ws.ws_col)
    }
}

impl ConsoleInput for UnixConsoleInput {
    fn read_byte(&mut self) -> ConsoleResult<Option<u8>> {
        let _guard = self.enable_raw_mode()?;
        let mut buf = [0u8; 1];
        loop {
            let result = unsafe {
                libc::read(self.stdin_fd, buf.as_mut_ptr() as *mut libc::c_void, buf.len())
            };
            if result == -1 {
                let error = io::Error::last_os_error();
                if error.raw_os_error() == Some(libc::EINTR) {
                    continue;
                }
                return Err(ConsoleError::Io(error.to_string()));
            }
            return Ok(if result == 0 { None } else { Some(buf[0]) });
        }
    }

    fn read_line(&mut self) -> ConsoleResult<Option<String>> {
        let mut line = String::new();
        let read = io::stdin()
            .lock()
            .read_line(&mut line)
            .map_err(|e| ConsoleError::Io(e.to_string()))?;
        Ok((read > 0).then_some(line))
    }

    fn is_tty(&self) -> bool {
        unsafe { libc::isatty(self.stdin_fd) == 1 }
    }

    fn window_width(&self) -> Option<u16> {
        for fd in [self.stdin_fd, libc::STDOUT_FILENO, libc::STDERR_FILENO] {
            if let Some(cols) = Self::fd_window_width(fd) {
                return Some(cols);
            }
        }
        // Last resort: the controlling terminal itself.
        if let Ok(tty) = File::open("/dev/tty") {
            if let Some(cols) = Self::fd_window_width(tty.as_raw_fd()) {
                return Some(cols);
            }
        }
        log::debug!("window size ioctl failed on stdio and /dev/tty");
        None
    }
}

impl AsAny for UnixConsoleInput {
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

/// VT output over stdout, written at the descriptor level.
pub struct UnixConsoleOutput {
    stdout_fd: i32,
}

impl UnixConsoleOutput {
    pub fn new() -> Self {
        Self {
            stdout_fd: libc::STDOUT_FILENO,
        }
    }

    fn write_bytes(&self, bytes: &[u8]) -> ConsoleResult<()> {
        let mut written = 0;
        while written < bytes.len() {
            let result = unsafe {
                libc::write(
                    self.stdout_fd,
                    bytes[written..].as_ptr() as *const libc::c_void,
                    bytes.len() - written,
                )
            };
            if result == -1 {
                let error = io::Error::last_os_error();
                if error.raw_os_error() == Some(libc::EINTR) {
                    continue;
                }
                return Err(ConsoleError::Io(error.to_string()));
            }
            written += result as usize;
        }
        Ok(())
    }
}

impl Default for UnixConsoleOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleOutput for UnixConsoleOutput {
    fn write_text(&mut self, text: &str) -> ConsoleResult<()> {
        self.write_bytes(text.as_bytes())
    }

    fn flush(&mut self) -> ConsoleResult<()> {
        // Descriptor-level writes are not buffered.
        Ok(())
    }
}

impl AsAny for UnixConsoleOutput {
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}
