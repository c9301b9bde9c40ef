// Display errors
//
// Fatal errors (`InitError`, `DisplayError::Allocation`) unwind to the owner of
// the display, which is expected to shut it down. `AssetError` only covers the
// optional window icon and is logged and ignored where it occurs.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Errors that prevent the display from starting
#[derive(Debug)]
pub enum InitError {
    /// The windowing subsystem could not be initialized
    Windowing(String),

    /// The display surface (window or GPU surface) could not be created
    Surface(String),

    /// The font asset does not exist
    FontMissing(PathBuf),

    /// The font asset exists but could not be decoded
    FontCorrupt { path: PathBuf, reason: String },
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitError::Windowing(e) => write!(f, "Windowing initialization failed: {}", e),
            InitError::Surface(e) => write!(f, "Display surface creation failed: {}", e),
            InitError::FontMissing(path) => write!(f, "Font not found: {}", path.display()),
            InitError::FontCorrupt { path, reason } => {
                write!(f, "Font {} is corrupt: {}", path.display(), reason)
            }
        }
    }
}

impl std::error::Error for InitError {}

/// Errors raised by display operations
#[derive(Debug)]
pub enum DisplayError {
    /// Fatal initialization failure
    Init(InitError),

    /// Surface or frame allocation failed
    Allocation(String),

    /// Requested logical resolution or scale is not positive
    InvalidSize { width: u32, height: u32, scale: f32 },

    /// Cell index outside the text grid
    OutOfRange { index: usize, len: usize },

    /// The render context failed to show a frame
    Render(String),

    /// The display has already been shut down
    ShutDown,
}

impl fmt::Display for DisplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayError::Init(e) => write!(f, "{}", e),
            DisplayError::Allocation(e) => write!(f, "Allocation failed: {}", e),
            DisplayError::InvalidSize {
                width,
                height,
                scale,
            } => write!(
                f,
                "Invalid screen size {}x{} at scale {}",
                width, height, scale
            ),
            DisplayError::OutOfRange { index, len } => {
                write!(f, "Cell index {} out of range (grid has {} cells)", index, len)
            }
            DisplayError::Render(e) => write!(f, "Render error: {}", e),
            DisplayError::ShutDown => write!(f, "Display has been shut down"),
        }
    }
}

impl std::error::Error for DisplayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DisplayError::Init(e) => Some(e),
            _ => None,
        }
    }
}

impl From<InitError> for DisplayError {
    fn from(e: InitError) -> Self {
        DisplayError::Init(e)
    }
}

impl DisplayError {
    /// Whether the display can keep running after this error
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            DisplayError::OutOfRange { .. } | DisplayError::ShutDown
        )
    }
}

/// Errors loading optional image assets
#[derive(Debug)]
pub enum AssetError {
    /// I/O error
    Io(io::Error),

    /// PNG decoding error
    Decode(png::DecodingError),

    /// Image decoded but cannot be used as a surface
    Unsupported(String),
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetError::Io(e) => write!(f, "I/O error: {}", e),
            AssetError::Decode(e) => write!(f, "PNG decoding error: {}", e),
            AssetError::Unsupported(e) => write!(f, "Unsupported image: {}", e),
        }
    }
}

impl std::error::Error for AssetError {}

impl From<io::Error> for AssetError {
    fn from(e: io::Error) -> Self {
        AssetError::Io(e)
    }
}

impl From<png::DecodingError> for AssetError {
    fn from(e: png::DecodingError) -> Self {
        AssetError::Decode(e)
    }
}
