//! Terminal handling with raw ANSI escape sequences
//! No external TUI libraries - just termios and escape codes

use std::collections::VecDeque;
use std::io::{self, Read, Write};
use std::os::unix::io::{AsRawFd, RawFd};

/// DOS color palette (16 colors)
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(u8)]
#[allow(dead_code)]
pub enum Color {
    Black = 0,
    Blue = 1,
    Green = 2,
    Cyan = 3,
    Red = 4,
    Magenta = 5,
    Brown = 6,
    LightGray = 7,
    DarkGray = 8,
    LightBlue = 9,
    LightGreen = 10,
    LightCyan = 11,
    LightRed = 12,
    LightMagenta = 13,
    Yellow = 14,
    White = 15,
}

impl Color {
    /// Offset from the ANSI base code (30 for foreground, 40 for background).
    /// DOS orders the low three bits blue-green-red, ANSI red-green-blue.
    fn ansi_offset(self) -> u8 {
        const DOS_TO_ANSI: [u8; 8] = [0, 4, 2, 6, 1, 5, 3, 7];
        let dos = self as u8;
        let bright = if dos >= 8 { 60 } else { 0 };
        DOS_TO_ANSI[usize::from(dos & 7)] + bright
    }
}

/// SGR sequence selecting a foreground and background color
pub fn sgr(fg: Color, bg: Color) -> String {
    format!("\x1b[{};{}m", 30 + fg.ansi_offset(), 40 + bg.ansi_offset())
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    /// Any other button, the wheel, or a drag
    Other,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MouseEvent {
    pub button: MouseButton,
    pub row: u16,
    pub col: u16,
    /// False for a release
    pub pressed: bool,
}

/// Key events including special keys
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    Escape,
    Backspace,
    Tab,
    ShiftTab,
    Up,
    Down,
    Left,
    Right,
    /// F1-F4
    F(u8),
    Ctrl(char),
    Mouse(MouseEvent),
    Unknown(Vec<u8>),
}

/// Saved terminal settings, restored on drop
struct RawMode {
    fd: RawFd,
    saved: libc::termios,
}

impl RawMode {
    /// Disable canonical mode, echo and signals; reads become non-blocking
    fn enable(fd: RawFd) -> io::Result<Self> {
        // SAFETY: termios is plain data filled in by tcgetattr.
        let mut termios: libc::termios = unsafe { std::mem::zeroed() };
        if unsafe { libc::tcgetattr(fd, &mut termios) } != 0 {
            return Err(io::Error::last_os_error());
        }
        let saved = termios;

        termios.c_lflag &= !(libc::ECHO | libc::ICANON | libc::ISIG | libc::IEXTEN);
        termios.c_iflag &= !(libc::IXON | libc::ICRNL | libc::BRKINT | libc::INPCK | libc::ISTRIP);
        termios.c_oflag &= !libc::OPOST;
        termios.c_cflag |= libc::CS8;
        termios.c_cc[libc::VMIN] = 0;
        termios.c_cc[libc::VTIME] = 0;

        // SAFETY: termios was initialised by tcgetattr above.
        if unsafe { libc::tcsetattr(fd, libc::TCSAFLUSH, &termios) } != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(Self { fd, saved })
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        // SAFETY: restores settings previously returned by tcgetattr.
        unsafe {
            libc::tcsetattr(self.fd, libc::TCSAFLUSH, &self.saved);
        }
    }
}

/// Hide cursor, report mouse presses and releases in SGR form, clear
const ENTER_SEQUENCE: &str = "\x1b[?25l\x1b[?1000h\x1b[?1006h\x1b[2J\x1b[H";
/// Stop mouse reporting, show cursor, reset colors, clear
const LEAVE_SEQUENCE: &str = "\x1b[?1006l\x1b[?1000l\x1b[?25h\x1b[0m\x1b[2J\x1b[H";

/// The controlling terminal in raw mode
///
/// Dropping it restores the original settings and clears the screen.
pub struct Terminal {
    stdout: io::Stdout,
    size: (u16, u16),
    /// Bytes of a sequence whose tail has not been read yet
    pending: Vec<u8>,
    /// Keys decoded but not yet returned
    keys: VecDeque<Key>,
    // Dropped after `Drop::drop` has written the leave sequence
    _raw: RawMode,
}

impl Terminal {
    pub fn new() -> io::Result<Self> {
        let raw = RawMode::enable(io::stdin().as_raw_fd())?;
        let mut term = Self {
            stdout: io::stdout(),
            size: window_size().unwrap_or((80, 25)),
            pending: Vec::new(),
            keys: VecDeque::new(),
            _raw: raw,
        };
        term.write_raw(ENTER_SEQUENCE)?;
        term.flush()?;
        Ok(term)
    }

    /// Columns and rows
    pub fn size(&self) -> (u16, u16) {
        self.size
    }

    /// Re-read the window size
    pub fn update_size(&mut self) {
        if let Some(size) = window_size() {
            self.size = size;
        }
    }

    pub fn write_raw(&mut self, s: &str) -> io::Result<()> {
        self.stdout.write_all(s.as_bytes())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.stdout.flush()
    }

    /// Next key without blocking. Returns None when no input is pending.
    ///
    /// One read may carry several keys; the extra ones are queued.
    pub fn read_key(&mut self) -> io::Result<Option<Key>> {
        if self.keys.is_empty() {
            self.read_pending()?;
        }
        Ok(self.keys.pop_front())
    }

    fn read_pending(&mut self) -> io::Result<()> {
        let mut buf = [0u8; 64];
        let mut stdin = io::stdin();

        let len = stdin.read(&mut buf)?;
        if len == 0 {
            return Ok(());
        }
        self.pending.extend_from_slice(&buf[..len]);

        // A trailing ESC may start a sequence that has not arrived yet
        if self.pending.last() == Some(&0x1b) {
            std::thread::sleep(std::time::Duration::from_millis(10));
            let more = stdin.read(&mut buf).unwrap_or(0);
            self.pending.extend_from_slice(&buf[..more]);
        }

        let (keys, consumed) = parse_keys(&self.pending);
        self.pending.drain(..consumed);
        self.keys.extend(keys);

        if self.pending.len() > MAX_PENDING {
            self.keys.push_back(Key::Unknown(std::mem::take(&mut self.pending)));
        }
        Ok(())
    }
}

/// Longest unterminated sequence kept while waiting for its tail
const MAX_PENDING: usize = 64;

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = self.write_raw(LEAVE_SEQUENCE);
        let _ = self.flush();
    }
}

fn window_size() -> Option<(u16, u16)> {
    // SAFETY: winsize is plain data and TIOCGWINSZ only writes into it.
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let ok = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &mut ws) } == 0;
    (ok && ws.ws_col > 0 && ws.ws_row > 0).then_some((ws.ws_col, ws.ws_row))
}

/// Split a byte stream into keys
///
/// Returns the keys and the number of bytes they used. Bytes after that
/// count are the start of a sequence still waiting for its tail.
pub fn parse_keys(buf: &[u8]) -> (Vec<Key>, usize) {
    let mut keys = Vec::new();
    let mut consumed = 0;
    while let Some((key, len)) = next_key(&buf[consumed..]) {
        keys.push(key);
        consumed += len;
    }
    (keys, consumed)
}

/// First key of `buf` and its length in bytes; None when `buf` is empty
/// or ends inside a sequence
fn next_key(buf: &[u8]) -> Option<(Key, usize)> {
    let len = match buf {
        [] => return None,
        [0x1b, b'[', rest @ ..] => {
            // CSI: parameter and intermediate bytes, then one final byte
            let end = rest.iter().position(|b| !(0x20..=0x3f).contains(b))?;
            if (0x40..=0x7e).contains(&rest[end]) {
                end + 3
            } else {
                // Malformed; give up on what was read so far
                return Some((Key::Unknown(buf[..end + 2].to_vec()), end + 2));
            }
        }
        [0x1b, b'O'] => return None,
        [0x1b, b'O', ..] => 3,
        // ESC followed by anything else is a plain Escape
        [0x1b, ..] => 1,
        [lead, ..] => {
            let width = utf8_width(*lead);
            if buf.len() < width {
                return None;
            }
            width
        }
    };
    Some((parse_key(&buf[..len]), len))
}

fn utf8_width(lead: u8) -> usize {
    match lead {
        0xc0..=0xdf => 2,
        0xe0..=0xef => 3,
        0xf0..=0xf7 => 4,
        _ => 1,
    }
}

/// Decode the bytes of exactly one key
pub fn parse_key(buf: &[u8]) -> Key {
    let key = match buf {
        [0x1b] => Some(Key::Escape),
        [0x1b, rest @ ..] => parse_escape(rest),
        [b'\r' | b'\n'] => Some(Key::Enter),
        [b'\t'] => Some(Key::Tab),
        [0x7f | 0x08] => Some(Key::Backspace),
        [c @ 1..=26] => Some(Key::Ctrl(char::from(b'a' + *c - 1))),
        _ => single_char(buf).map(Key::Char),
    };
    key.unwrap_or_else(|| Key::Unknown(buf.to_vec()))
}

/// The one printable character a UTF-8 buffer holds, if that is all it holds
fn single_char(buf: &[u8]) -> Option<char> {
    let mut chars = std::str::from_utf8(buf).ok()?.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if !c.is_control() => Some(c),
        _ => None,
    }
}

/// Decode what follows ESC
fn parse_escape(seq: &[u8]) -> Option<Key> {
    let key = match seq {
        [b'[', b'<', body @ ..] => Key::Mouse(parse_sgr_mouse(body)?),
        [b'[', b'A'] => Key::Up,
        [b'[', b'B'] => Key::Down,
        [b'[', b'C'] => Key::Right,
        [b'[', b'D'] => Key::Left,
        [b'[', b'Z'] => Key::ShiftTab,
        [b'O', f @ b'P'..=b'S'] => Key::F(*f - b'P' + 1),
        [b'[', b'1', d @ b'1'..=b'4', b'~'] => Key::F(*d - b'0'),
        _ => return None,
    };
    Some(key)
}

/// SGR mouse report body: `Cb;Cx;Cy` then `M` (press) or `m` (release)
fn parse_sgr_mouse(body: &[u8]) -> Option<MouseEvent> {
    let (last, fields) = body.split_last()?;
    let pressed = match last {
        b'M' => true,
        b'm' => false,
        _ => return None,
    };

    let mut numbers = std::str::from_utf8(fields).ok()?.split(';').map(str::parse::<u16>);
    let cb = numbers.next()?.ok()?;
    let col = numbers.next()?.ok()?;
    let row = numbers.next()?.ok()?;
    if numbers.next().is_some() {
        return None;
    }

    // Low bits pick the button; 32 marks a drag and 64 the wheel
    let button = if cb & 0b0110_0011 == 0 {
        MouseButton::Left
    } else {
        MouseButton::Other
    };
    Some(MouseEvent { button, row, col, pressed })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_keys() {
        assert_eq!(parse_key(b"\r"), Key::Enter);
        assert_eq!(parse_key(b"\t"), Key::Tab);
        assert_eq!(parse_key(b"\x1b"), Key::Escape);
        assert_eq!(parse_key(b"\x1b[Z"), Key::ShiftTab);
        assert_eq!(parse_key(b" "), Key::Char(' '));
        assert_eq!(parse_key("é".as_bytes()), Key::Char('é'));
        assert_eq!(parse_key(&[0x03]), Key::Ctrl('c'));
    }

    #[test]
    fn test_parse_function_keys() {
        assert_eq!(parse_key(b"\x1bOP"), Key::F(1));
        assert_eq!(parse_key(b"\x1b[11~"), Key::F(1));
        assert_eq!(parse_key(b"\x1bOQ"), Key::F(2));
        assert_eq!(parse_key(b"\x1b[14~"), Key::F(4));
    }

    #[test]
    fn test_parse_sgr_mouse_press_and_release() {
        assert_eq!(
            parse_key(b"\x1b[<0;12;5M"),
            Key::Mouse(MouseEvent {
                button: MouseButton::Left,
                row: 5,
                col: 12,
                pressed: true,
            })
        );

        match parse_key(b"\x1b[<0;12;5m") {
            Key::Mouse(ev) => assert!(!ev.pressed, "lowercase m is a release"),
            other => panic!("expected mouse event, got {:?}", other),
        }

        match parse_key(b"\x1b[<64;1;1M") {
            Key::Mouse(ev) => assert_eq!(ev.button, MouseButton::Other, "wheel is not a click"),
            other => panic!("expected mouse event, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_unknown_sequences() {
        assert_eq!(parse_key(b"\x1b[99~"), Key::Unknown(b"\x1b[99~".to_vec()));
        assert_eq!(parse_key(b"ab"), Key::Unknown(b"ab".to_vec()));
        assert_eq!(parse_key(b"\x1b[<0;1M"), Key::Unknown(b"\x1b[<0;1M".to_vec()));
    }

    #[test]
    fn test_parse_keys_splits_coalesced_input() {
        let (keys, used) = parse_keys(b"\x1b[<0;12;5M\x1b[<0;12;5m");
        assert_eq!(used, 20);
        assert_eq!(
            keys,
            vec![
                Key::Mouse(MouseEvent { button: MouseButton::Left, row: 5, col: 12, pressed: true }),
                Key::Mouse(MouseEvent { button: MouseButton::Left, row: 5, col: 12, pressed: false }),
            ]
        );

        assert_eq!(parse_keys(b"\t\r"), (vec![Key::Tab, Key::Enter], 2));
        assert_eq!(parse_keys(b"\tx\t"), (vec![Key::Tab, Key::Char('x'), Key::Tab], 3));
        assert_eq!(
            parse_keys("\x1bOPé\x1b".as_bytes()),
            (vec![Key::F(1), Key::Char('é'), Key::Escape], 6)
        );
    }

    #[test]
    fn test_parse_keys_keeps_partial_tail() {
        let (keys, used) = parse_keys(b"\t\x1b[<0;12");
        assert_eq!(keys, vec![Key::Tab]);
        assert_eq!(used, 1, "unterminated mouse report waits for more bytes");

        let (keys, used) = parse_keys(&[b'a', 0xc3]);
        assert_eq!(keys, vec![Key::Char('a')]);
        assert_eq!(used, 1, "split UTF-8 character waits for more bytes");

        assert_eq!(parse_keys(b"\x1b["), (vec![], 0));
    }

    #[test]
    fn test_parse_keys_skips_unknown_sequences() {
        let (keys, used) = parse_keys(b"\x1b[99~\r");
        assert_eq!(keys, vec![Key::Unknown(b"\x1b[99~".to_vec()), Key::Enter]);
        assert_eq!(used, 6);
    }

    #[test]
    fn test_sgr_maps_dos_palette() {
        assert_eq!(sgr(Color::White, Color::Blue), "\x1b[97;44m");
        assert_eq!(sgr(Color::Black, Color::Cyan), "\x1b[30;46m");
        assert_eq!(sgr(Color::LightRed, Color::Brown), "\x1b[91;43m");
    }
}
