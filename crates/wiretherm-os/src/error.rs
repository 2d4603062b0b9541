use std::borrow::Cow;

/// All possible error kinds.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// No presence pulse was detected on reset; the sensor did not
    /// respond. Recoverable: the caller may retry the whole transaction.
    NoResponse,
    /// Another sample transaction is in flight and the caller declined to
    /// wait for it.
    BusBusy,
    /// The decoded result could not be copied to the consumer-facing read
    /// surface.
    TransferFault,
    /// Errors encountered while accessing the physical line.
    Line,
}

impl ErrorKind {
    pub(crate) const fn description(self) -> &'static str {
        match self {
            Self::NoResponse => "No Response",
            Self::BusBusy => "Bus Busy",
            Self::TransferFault => "Transfer Fault",
            Self::Line => "Line",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// A library error.
pub struct Error {
    kind: ErrorKind,
    description: Cow<'static, str>,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.format(f)
    }
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.format(f)
    }
}

impl std::error::Error for Error {}

impl Error {
    pub(crate) fn new(kind: ErrorKind, description: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            description: description.into(),
        }
    }

    /// Returns the kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    fn format(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.kind)?;
        write!(f, "Cause: {}", self.description)
    }
}

impl<E> From<wiretherm::ds18b20::Error<E>> for Error
where
    E: std::fmt::Debug,
{
    fn from(e: wiretherm::ds18b20::Error<E>) -> Self {
        match e {
            wiretherm::ds18b20::Error::NoResponse => {
                Self::new(ErrorKind::NoResponse, "no presence pulse on reset")
            }
            wiretherm::ds18b20::Error::CrcMismatch => {
                Self::new(ErrorKind::Line, "scratchpad failed CRC validation")
            }
            wiretherm::ds18b20::Error::Line(e) => Self::new(ErrorKind::Line, format!("{e:?}")),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::new(ErrorKind::TransferFault, e.to_string())
    }
}

/// A specialized [`Result`] type for [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
