// Text Grid - Logical character cells and their attribute flags
//
// Cells are addressed by linear index (`row * width + col`). Codes and flags
// live in two parallel arrays that are always `width * height` long.

use super::error::DisplayError;
use super::flags::{CellCode, TextFlags};

/// Character cell grid sized to the logical resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextGrid {
    width: u32,
    height: u32,
    codes: Vec<CellCode>,
    flags: Vec<TextFlags>,
}

impl TextGrid {
    /// Create a grid with every cell zeroed
    pub fn new(width: u32, height: u32) -> Result<Self, DisplayError> {
        let len = (width as usize)
            .checked_mul(height as usize)
            .ok_or_else(|| {
                DisplayError::Allocation(format!("text grid {}x{} is too large", width, height))
            })?;

        let mut codes = Vec::new();
        let mut flags = Vec::new();
        codes
            .try_reserve_exact(len)
            .and_then(|_| flags.try_reserve_exact(len))
            .map_err(|e| {
                DisplayError::Allocation(format!("text grid {}x{}: {}", width, height, e))
            })?;
        codes.resize(len, CellCode::default());
        flags.resize(len, TextFlags::empty());

        Ok(Self {
            width,
            height,
            codes,
            flags,
        })
    }

    /// Width in cells
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in cells
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Whether the grid has no cells
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Linear index of a cell, if it lies on the grid
    pub fn index_of(&self, col: u32, row: u32) -> Option<usize> {
        if col >= self.width || row >= self.height {
            return None;
        }
        Some(row as usize * self.width as usize + col as usize)
    }

    /// Column and row of a linear index
    pub fn position_of(&self, index: usize) -> Option<(u32, u32)> {
        if index >= self.len() {
            return None;
        }
        let width = self.width as usize;
        Some(((index % width) as u32, (index / width) as u32))
    }

    fn check(&self, index: usize) -> Result<(), DisplayError> {
        if index >= self.len() {
            return Err(DisplayError::OutOfRange {
                index,
                len: self.len(),
            });
        }
        Ok(())
    }

    /// Store a cell code and its flags
    ///
    /// Only the grid is touched; drawing the cell is a separate step.
    pub fn set_cell(
        &mut self,
        index: usize,
        code: CellCode,
        flags: TextFlags,
    ) -> Result<(), DisplayError> {
        self.check(index)?;
        self.codes[index] = code;
        self.flags[index] = flags;
        Ok(())
    }

    /// Flags of a cell
    pub fn flags(&self, index: usize) -> Result<TextFlags, DisplayError> {
        self.check(index)?;
        Ok(self.flags[index])
    }

    /// Code of a cell
    pub fn code(&self, index: usize) -> Result<CellCode, DisplayError> {
        self.check(index)?;
        Ok(self.codes[index])
    }

    /// Linear indices of every cell flagged as blinking, in ascending order
    pub fn blinking_cells(&self) -> impl Iterator<Item = usize> + '_ {
        self.flags
            .iter()
            .enumerate()
            .filter(|(_, flags)| flags.is_blinking())
            .map(|(i, _)| i)
    }
}
