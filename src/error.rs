// Copyright 2026 The trustm-pal developers
// See LICENSE.txt file for terms

use std::error;
use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

/// Error type shared by every operation in the crate.
///
/// Vendor status codes never cross this boundary; a non-success status
/// from the secure element always collapses into [`ErrorKind::Internal`].
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    origin: Option<Box<dyn error::Error + Send + Sync>>,
    errmsg: Option<String>,
}

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[non_exhaustive]
pub enum ErrorKind {
    /* Caller fault, detected before any hardware interaction */
    InvalidArgument,
    /* Vendor call returned non-success, or a format conversion failed */
    Internal,
    /* Operation attempted on a keypair that was never initialized */
    Uninitialized,
}

impl Error {
    pub fn invalid_argument() -> Error {
        Error {
            kind: ErrorKind::InvalidArgument,
            origin: None,
            errmsg: None,
        }
    }

    pub fn internal() -> Error {
        Error {
            kind: ErrorKind::Internal,
            origin: None,
            errmsg: None,
        }
    }

    pub fn uninitialized() -> Error {
        Error {
            kind: ErrorKind::Uninitialized,
            origin: None,
            errmsg: None,
        }
    }

    pub fn with_errmsg(kind: ErrorKind, errmsg: String) -> Error {
        Error {
            kind: kind,
            origin: None,
            errmsg: Some(errmsg),
        }
    }

    pub fn from_error<E>(kind: ErrorKind, error: E) -> Error
    where
        E: Into<Box<dyn error::Error + Send + Sync>>,
    {
        Error {
            kind: kind,
            origin: Some(error.into()),
            errmsg: None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self.kind {
            ErrorKind::InvalidArgument => "invalid argument",
            ErrorKind::Internal => "internal failure",
            ErrorKind::Uninitialized => "keypair not initialized",
        };
        if let Some(ref e) = self.errmsg {
            write!(f, "{}: {}", name, e)
        } else if let Some(ref e) = self.origin {
            write!(f, "{}: {}", name, e)
        } else {
            write!(f, "{}", name)
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        self.origin
            .as_ref()
            .map(|e| e.as_ref() as &(dyn error::Error + 'static))
    }
}

/// Allows facade code to bail with `Err(ErrorKind::Internal)?`
impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error {
            kind: kind,
            origin: None,
            errmsg: None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Error {
        Error::from_error(ErrorKind::Internal, error)
    }
}

impl From<std::num::TryFromIntError> for Error {
    fn from(error: std::num::TryFromIntError) -> Error {
        Error::from_error(ErrorKind::Internal, error)
    }
}

#[macro_export]
macro_rules! err_invalid {
    () => {
        Err($crate::error::Error::invalid_argument())
    };
    ($err_str:expr) => {
        Err($crate::error::Error::with_errmsg(
            $crate::error::ErrorKind::InvalidArgument,
            $err_str.to_string(),
        ))
    };
}

#[macro_export]
macro_rules! err_internal {
    () => {
        Err($crate::error::Error::internal())
    };
    ($err_str:expr) => {
        Err($crate::error::Error::with_errmsg(
            $crate::error::ErrorKind::Internal,
            $err_str.to_string(),
        ))
    };
}

#[macro_export]
macro_rules! map_err {
    ($map:expr, $kind:expr) => {{
        $map.map_err(|e| $crate::error::Error::from_error($kind, e))
    }};
}
